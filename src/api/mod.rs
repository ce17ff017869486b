mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::{ApiError, ErrorKind, classify_status, classify_transport};
pub use types::{Language, Translation, Usage};
