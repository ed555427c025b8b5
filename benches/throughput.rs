use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use segtrie::server::decode_body;
use segtrie::{HandlerRequest, HandlerResponse, Params, Router, Value};
use std::hint::black_box;

const ROUTES: &[(Method, &str)] = &[
    (Method::GET, "/"),
    (Method::GET, "/zoo/animals"),
    (Method::POST, "/zoo/animals"),
    (Method::GET, "/zoo/animals/:id"),
    (Method::PUT, "/zoo/animals/:id"),
    (Method::PATCH, "/zoo/animals/:id"),
    (Method::DELETE, "/zoo/animals/:id"),
    (Method::GET, "/zoo/animals/:id/toys/:toy_id"),
    (
        Method::GET,
        "/zoo/:category/animals/:id/habitats/:habitat_id/sections/:section_id",
    ),
    (
        Method::POST,
        "/inventory/:warehouse_id/feeds/:feed_id/items/:item_id/batches/:batch_id",
    ),
    (Method::GET, "/complex/:a/:b/:c/:d/:e/:f/:g/:h/:i"),
    (Method::GET, "/zoo/health"),
];

fn build_router() -> Router {
    let mut router = Router::new();
    for (method, path) in ROUTES {
        router
            .add_route(method.clone(), path, |_req: &HandlerRequest| {
                Ok(HandlerResponse::json(200, serde_json::Value::Null))
            })
            .expect("benchmark routes are unique");
    }
    router
}

fn bench_route_throughput(c: &mut Criterion) {
    let router = build_router();
    let test_paths = [
        (Method::GET, "/zoo/animals/123"),
        (Method::GET, "/zoo/animals/123/toys/456"),
        (Method::GET, "/zoo/cats/animals/123/habitats/88/sections/5"),
        (Method::POST, "/inventory/1/feeds/2/items/3/batches/4"),
        (Method::GET, "/complex/1/2/3/4/5/6/7/8/9"),
    ];

    c.bench_function("route_match", |b| {
        b.iter(|| {
            for (method, path) in &test_paths {
                let req = HandlerRequest::new(method.clone(), *path, Params::new(Value::Null));
                black_box(router.dispatch(req).is_ok());
            }
        })
    });

    c.bench_function("route_miss", |b| {
        b.iter(|| {
            let req = HandlerRequest::new(Method::GET, "/zoo/animals/1/cages", Params::default());
            black_box(router.dispatch(req).is_err());
        })
    });
}

fn bench_body_decode(c: &mut Criterion) {
    let json = br#"{"state_hash":"7amada","device":{"os":"android","version":"1.0"},"tags":[1,2,3]}"#;
    c.bench_function("decode_json_body", |b| {
        b.iter(|| black_box(decode_body(black_box(json), Some("application/json"))))
    });
}

criterion_group!(benches, bench_route_throughput, bench_body_decode);
criterion_main!(benches);
