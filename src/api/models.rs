use crate::models::ChatMessage;
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct RequestBody<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub max_tokens: u32,
    pub stream: bool,
}
