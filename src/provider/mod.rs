//! OpenAI-compatible chat-completion client and wire types.

mod client;
mod types;


pub use client::ProviderClient;
pub use types::*;
