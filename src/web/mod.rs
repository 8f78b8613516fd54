mod error;
pub mod handler;
mod log;
pub mod midware;
pub mod routes;
pub mod serve;
pub mod types;

pub use error::{ClientError, Error, Result};
pub use handler::WaitlistHandler;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
