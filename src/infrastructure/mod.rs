pub mod crypto;
pub mod llm;
pub mod logging;
pub mod manager;
pub mod normalizer;
pub mod prompts;
pub mod registry;
pub mod store;
