//! audio-viz renders audio-reactive visualizer frames on the CPU and streams them into `ffmpeg`.
//!
//! A run looks like this:
//!
//! - Build a [`Composition`] from a preset or a [`SceneFile`]
//! - Open a [`SpectrumSource`] (usually an [`FftAnalyser`] over the input audio)
//! - Drive a [`FramePipeline`] into a [`FrameSink`]: a raw file muxed afterwards, or a live
//!   transcoder served over HTTP
#![forbid(unsafe_code)]

mod foundation;

/// Animation variants and their configuration.
pub mod animation;
/// Ordered animation layers and presets.
pub mod composition;
/// Video presets, scene files and output layout.
pub mod config;
/// Frame sinks: in-memory, raw file, `ffmpeg` mux and live transcoding.
pub mod encode;
/// The backpressured frame loop.
pub mod pipeline;
/// CPU raster backend.
pub mod render;
/// Drawing primitives and styles.
pub mod shapes;
/// Spectrum mapping and audio analysis.
pub mod spectrum;

pub use crate::foundation::color::Color;
pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Fps, FrameIndex, Point, Rect, Rgba8Premul, Vec2,
};
pub use crate::foundation::error::{VizError, VizResult};
pub use crate::foundation::math::{polar, rotate_about};

pub use crate::animation::{Animation, AnimationConfig, AnimationKind, AnimationOverrides, Edges};
pub use crate::composition::{Composition, LayerSpec, Preset};
pub use crate::config::{OutputLayout, SceneFile, VideoPreset};
pub use crate::encode::{
    EncoderProfile, FfmpegFileSink, FrameSink, InMemorySink, LiveSink, RawFileSink, SinkConfig,
    StreamServer, TranscoderCommand,
};
pub use crate::pipeline::{FramePipeline, PipelineOpts, PipelineState, PipelineStats};
pub use crate::render::{Background, CpuRaster, FrameRGBA};
pub use crate::shapes::{DisplayList, DrawOp, Glow, Paint, Primitive, ShapeStyle, Shapes};
pub use crate::spectrum::{
    AnalyserOpts, FftAnalyser, FrequencyBand, SpectrumSource, WorkingSpectrum,
};
