//! Chat message types shared with the vision provider client

mod message;

pub use message::{ContentPart, Message, MessageRole};
