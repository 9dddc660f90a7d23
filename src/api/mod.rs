pub mod client;
pub mod models;
pub mod response;

pub use client::{CompletionClient, HttpCompletionClient};
pub use models::RequestBody;
