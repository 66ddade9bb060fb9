pub mod config;
pub mod editor;
pub mod error;
pub mod prompt;
pub mod render;
pub mod theme;
