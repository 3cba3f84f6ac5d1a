// Library exports shared by the gif-maker and batch-gif-maker binaries
pub mod cli;
pub mod config_file;
pub mod image_processing;
pub mod json_output;
pub mod utils;

// Re-export commonly used types
pub use cli::{BatchArgs, GifArgs, SingleArgs};
pub use image_processing::{
    BatchSummary, Dimensions, EngineConfig, GifEngine, GifOptions, GifOutcome, SequenceStatus,
};
pub use json_output::JsonMessage;
