/// Service layer for the video-message lifecycle
pub mod processor;

pub use processor::{ProcessingMode, VideoProcessor};
