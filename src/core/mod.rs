pub mod attachment;
pub mod compose;
pub mod config;
pub mod credentials;
pub mod gemini;
pub mod message;
pub mod session;
