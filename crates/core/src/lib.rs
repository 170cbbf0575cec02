#![deny(rust_2018_idioms)]

pub mod area;
pub mod chat;
pub mod commands;
pub mod config;
pub mod player;
pub mod scheduler;
pub mod session;

pub use config::SessionConfig;
pub use session::{GameState, Session};
