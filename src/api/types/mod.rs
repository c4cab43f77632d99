//! API request/response types

pub mod error;
pub mod json;
pub mod provider;
pub mod recognize;
pub mod settings;

pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse};
pub use json::Json;
pub use provider::{CreateProviderRequest, ProviderView, UpdateProviderModelRequest};
pub use recognize::{RecognizeRequest, RecognizeResponse};
pub use settings::{SettingsView, UpdateSettingsRequest};
