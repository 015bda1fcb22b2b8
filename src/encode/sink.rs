use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{VizError, VizResult};
use crate::render::FrameRGBA;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
}

impl SinkConfig {
    /// Bytes in one packed RGBA8 frame.
    pub fn frame_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }

    pub(crate) fn check_frame(&self, frame: &FrameRGBA) -> VizResult<()> {
        if frame.width != self.width || frame.height != self.height {
            return Err(VizError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.width, self.height
            )));
        }
        if frame.data.len() != self.frame_len() {
            return Err(VizError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        Ok(())
    }
}

/// Sink contract for consuming rendered frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order, each index
/// at most once. A sink may block inside `push_frame`; that is how a slow consumer pushes back on
/// the producer.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> VizResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> VizResult<()>;
    /// Called once after the last frame is pushed. Not called when the run fails.
    fn end(&mut self) -> VizResult<()>;
}

/// Rejects repeated or decreasing frame indices.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct OrderGuard {
    last: Option<FrameIndex>,
}

impl OrderGuard {
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn advance(&mut self, idx: FrameIndex) -> VizResult<()> {
        if let Some(last) = self.last
            && idx.0 <= last.0
        {
            return Err(VizError::encode(format!(
                "out-of-order frame index {} after {}",
                idx.0, last.0
            )));
        }
        self.last = Some(idx);
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames, in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> VizResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> VizResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> VizResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Appends raw RGBA8 frames to a local file, to be muxed once the run completes.
pub struct RawFileSink {
    path: PathBuf,
    out: Option<BufWriter<std::fs::File>>,
    cfg: Option<SinkConfig>,
    order: OrderGuard,
    bytes_written: u64,
}

impl RawFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            out: None,
            cfg: None,
            order: OrderGuard::default(),
            bytes_written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl FrameSink for RawFileSink {
    fn begin(&mut self, cfg: SinkConfig) -> VizResult<()> {
        use anyhow::Context as _;

        super::ffmpeg::ensure_parent_dir(&self.path)?;
        let file = std::fs::File::create(&self.path)
            .with_context(|| format!("failed to create raw stream '{}'", self.path.display()))?;
        self.out = Some(BufWriter::with_capacity(cfg.frame_len().max(8192), file));
        self.cfg = Some(cfg);
        self.order.reset();
        self.bytes_written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> VizResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| VizError::encode("raw sink not started"))?;
        self.order.advance(idx)?;
        cfg.check_frame(frame)?;

        let Some(out) = self.out.as_mut() else {
            return Err(VizError::encode("raw sink is already finalized"));
        };
        out.write_all(&frame.data).map_err(|e| {
            VizError::encode(format!(
                "failed to write frame {} to '{}': {e}",
                idx.0,
                self.path.display()
            ))
        })?;
        self.bytes_written += frame.data.len() as u64;
        Ok(())
    }

    fn end(&mut self) -> VizResult<()> {
        let mut out = self
            .out
            .take()
            .ok_or_else(|| VizError::encode("raw sink not started"))?;
        out.flush().map_err(|e| {
            VizError::encode(format!(
                "failed to flush raw stream '{}': {e}",
                self.path.display()
            ))
        })?;
        self.cfg = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
