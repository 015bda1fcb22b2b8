//! Frame sinks.
//!
//! Sinks consume rendered frames in frame order and are driven by
//! [`crate::pipeline::FramePipeline::run`].

/// `ffmpeg` muxing for file mode, and encoder profile selection.
pub mod ffmpeg;
/// Live MPEG-TS transcoding and the single-client stream endpoint.
pub mod live;
/// Generic frame sink trait and built-in sinks.
pub mod sink;

pub use ffmpeg::{EncoderProfile, FfmpegFileSink, MuxOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use live::{LiveSink, StreamServer, TranscoderCommand};
pub use sink::{FrameSink, InMemorySink, RawFileSink, SinkConfig};
