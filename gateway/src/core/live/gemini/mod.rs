//! Gemini Live provider.

mod client;
mod config;
pub mod messages;

pub use client::{GeminiConnector, GeminiReceiver, GeminiSender};
pub use config::{
    DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_REGION, DEFAULT_GEMINI_VOICE, GEMINI_INPUT_AUDIO_MIME,
    GEMINI_SETUP_TIMEOUT, GeminiSettings,
};
