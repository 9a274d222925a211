pub mod chat_loop;
pub mod lifecycle;
pub mod renderer;
pub mod state;
pub mod theme;
