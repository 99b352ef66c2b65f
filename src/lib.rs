//! Floating chat window layout and state management.

pub mod chat;
pub mod config;
pub mod event;
pub mod theme;
