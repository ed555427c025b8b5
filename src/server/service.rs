use http::StatusCode;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

use super::body::decode_body;
use super::request::{parse_request, ParsedRequest};
use super::response::{
    status_for, write_error, write_handler_response, write_json_error, write_preflight,
};
use crate::handler::{DispatchOutcome, HandlerRequest};
use crate::params::Params;
use crate::router::Router;
use crate::runtime_config::RuntimeConfig;

/// `may_minihttp` service routing every request through a shared [`Router`].
///
/// Cloned once per connection; clones share the same routing table.
#[derive(Clone)]
pub struct AppService {
    pub router: Arc<Router>,
    pub config: RuntimeConfig,
}

impl AppService {
    #[must_use]
    pub fn new(router: Arc<Router>, config: RuntimeConfig) -> Self {
        Self { router, config }
    }

    fn handle(&self, parsed: ParsedRequest, res: &mut Response) {
        let start = Instant::now();
        let payload = decode_body(&parsed.body, parsed.content_type());
        let ParsedRequest {
            method,
            path,
            headers,
            ..
        } = parsed;
        let request =
            HandlerRequest::new(method.clone(), path.clone(), Params::new(payload))
                .with_headers(headers);

        let router = Arc::clone(&self.router);
        let outcome = panic::catch_unwind(AssertUnwindSafe(move || router.dispatch(request)));

        let status = match outcome {
            Ok(Ok(DispatchOutcome::Handled(resp))) => {
                let status = resp.status;
                write_handler_response(res, resp);
                status
            }
            Ok(Ok(DispatchOutcome::Preflight)) => {
                write_preflight(res);
                200
            }
            Ok(Err(err)) => {
                let status = status_for(&err);
                if status.is_server_error() {
                    warn!(method = %method, path = %path, error = %err, "Request failed");
                } else if err.is_type_error() {
                    debug!(method = %method, path = %path, error = %err, "Request payload rejected");
                }
                write_error(res, &err);
                status.as_u16()
            }
            Err(_) => {
                error!(method = %method, path = %path, "Handler panicked");
                write_json_error(res, StatusCode::INTERNAL_SERVER_ERROR, "handler panicked");
                500
            }
        };

        debug!(
            method = %method,
            path = %path,
            status = status,
            latency_us = start.elapsed().as_micros(),
            "Request completed"
        );
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        match parse_request(req, self.config.max_body_bytes) {
            Ok(parsed) => self.handle(parsed, res),
            Err(err) => write_error(res, &err),
        }
        Ok(())
    }
}
