pub mod request_context;
pub mod response;

pub use request_context::request_context_middleware;
pub use response::{ApiResponse, ApiResult};
