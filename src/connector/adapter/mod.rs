mod azure_openai_client;
mod scripted_chat_client;

pub use azure_openai_client::*;
pub use scripted_chat_client::*;
