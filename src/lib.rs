pub mod bml;
pub mod cache;
pub mod config;
pub mod context;
pub mod deeplink;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod policy;
pub mod ral;
pub mod services;

pub use error::{Error, ErrorKind, Result};
