pub mod body;
pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use body::decode_body;
pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_request, split_target, ParsedRequest};
pub use response::{error_message, status_for};
pub use service::AppService;
