//! Domain layer - core entities and business rules

pub mod error;
pub mod llm;
pub mod provider;
pub mod recognition;

pub use error::DomainError;
pub use llm::{ContentPart, Message, MessageRole};
pub use provider::{ProviderConfig, ProviderRecord};
pub use recognition::{AttemptLog, RecognitionItem, RecognitionResult};
