use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_PREVIEW_WIDTH: usize = 50;
pub const DEFAULT_OUTLINE_WIDTH: u16 = 40;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "blocks",
    version,
    about = "Split plain text into numbered titles and paragraphs and work through them"
)]
pub struct Config {
    /// Plain text file to open (created on first save if missing)
    pub path: PathBuf,

    /// Write logs to this file; the terminal itself is used for drawing
    #[arg(long, env = "BLOCKS_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Characters of block text shown in the block list
    #[arg(long, default_value_t = DEFAULT_PREVIEW_WIDTH)]
    pub preview_width: usize,

    /// Width of the outline panel in columns
    #[arg(long, default_value_t = DEFAULT_OUTLINE_WIDTH)]
    pub outline_width: u16,
}

impl Config {
    /// Filter directive for the log subscriber: `BLOCKS_LOG`, then
    /// `RUST_LOG`, then `info`.
    pub fn log_directive() -> String {
        std::env::var("BLOCKS_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string())
    }
}
