//! Demo SDK routes served by `segtrie serve`.

use serde_json::json;

use crate::error::{Error, Result};
use crate::handler::{HandlerRequest, HandlerResponse};
use crate::router::Router;

/// Build the demo routing table.
///
/// | Route                                | Reads                               |
/// |--------------------------------------|-------------------------------------|
/// | `GET /health`                        | nothing                             |
/// | `GET /api/sdk/v3/latest_version/:os` | path variable `os`                  |
/// | `POST /api/sdk/v3/bugs`              | body field `state_hash`             |
/// | `GET /api/sdk/v3/bugs/:id`           | path variable `id` as an integer    |
/// | `DELETE /api/sdk/v3/bugs/:id`        | header `x-api-key`                  |
pub fn demo_router() -> Result<Router> {
    let mut router = Router::new();
    router.get("/health", |_req: &HandlerRequest| {
        Ok(HandlerResponse::json(200, json!({ "status": "ok" })))
    })?;
    router.get("/api/sdk/v3/latest_version/:os", latest_version)?;
    router.post("/api/sdk/v3/bugs", report_bug)?;
    router.get("/api/sdk/v3/bugs/:id", get_bug)?;
    router.delete("/api/sdk/v3/bugs/:id", delete_bug)?;
    Ok(router)
}

fn latest_version(req: &HandlerRequest) -> Result<HandlerResponse> {
    let version = match req.params.get("os")?.as_str()? {
        "android" => "1.0",
        "ios" => "1.2",
        _ => "0.0",
    };
    Ok(HandlerResponse::json(200, json!({ "version": version })))
}

fn report_bug(req: &HandlerRequest) -> Result<HandlerResponse> {
    let state_hash = req.params.data().get("state_hash")?;
    if state_hash.is_null() {
        return Err(Error::unprocessable_entity("state_hash is required"));
    }
    Ok(HandlerResponse::json(
        200,
        json!({ "id": state_hash.to_string_lossy() }),
    ))
}

fn get_bug(req: &HandlerRequest) -> Result<HandlerResponse> {
    let id = req.params.get("id")?.as_long()?;
    Ok(HandlerResponse::json(200, json!({ "id": id, "state": "open" })))
}

fn delete_bug(req: &HandlerRequest) -> Result<HandlerResponse> {
    if req.get_header("x-api-key").is_none() {
        return Err(Error::unauthorized("missing x-api-key"));
    }
    let id = req.params.get("id")?.as_long()?;
    Ok(HandlerResponse::json(200, json!({ "deleted": id })))
}
