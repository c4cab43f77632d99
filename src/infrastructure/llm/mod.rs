//! Upstream LLM transport

pub mod http_client;
pub mod vision;

pub use http_client::{HttpClient, HttpClientTrait};
pub use vision::VisionClient;
