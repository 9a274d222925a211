//! A terminal chat client for the Gemini `generateContent` API.
//!
//! - [`core`] owns the chat session controller, request shaping, the HTTP
//!   client and configuration.
//! - [`ui`] renders the terminal interface and runs the event loop.
//! - [`cli`] parses arguments and dispatches to the interactive chat or the
//!   one-shot `say` command.
//! - [`api`] defines the request/response payloads.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
