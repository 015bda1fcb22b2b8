//! The frame loop.
//!
//! [`FramePipeline::run`] renders frames on the calling thread and hands them to a sink running on
//! a scoped encoder thread. The two are joined by a bounded channel: when the sink falls behind,
//! `send` blocks and rendering waits. Frames are never dropped or reordered.

use crate::composition::Composition;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::color::Color;
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{VizError, VizResult};
use crate::render::{Background, CpuRaster, FrameRGBA, TimestampLabel};
use crate::shapes::DisplayList;
use crate::spectrum::SpectrumSource;
use std::path::PathBuf;
use std::sync::mpsc;

/// Frames whose spectrum summary is logged at debug level.
const LOGGED_SPECTRA: u64 = 5;

/// Where the frame loop is. `Done` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Rendering(FrameIndex),
    Delivering(FrameIndex),
    Finalizing,
    Done,
    Failed,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Options controlling one pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineOpts {
    pub canvas: Canvas,
    pub fps: Fps,
    /// Seconds to render; `0` renders the whole source, rounded up to whole seconds.
    pub duration_secs: f64,
    /// Bounded channel capacity between the frame loop and the encoder thread.
    pub channel_capacity: usize,
    /// Background image; a missing or undecodable image falls back to black.
    pub background: Option<PathBuf>,
    /// Overlay the playback time in the bottom-right corner.
    pub timestamp: bool,
    /// Font file for the timestamp; a system monospace face is used when unset or unreadable.
    pub font: Option<PathBuf>,
    /// Save the first, middle and last frame as PNGs into this directory.
    pub debug_frames: Option<PathBuf>,
    /// File name prefix for debug PNGs.
    pub debug_prefix: String,
}

impl PipelineOpts {
    pub fn new(canvas: Canvas, fps: Fps) -> Self {
        Self {
            canvas,
            fps,
            duration_secs: 0.0,
            channel_capacity: 4,
            background: None,
            timestamp: false,
            font: None,
            debug_frames: None,
            debug_prefix: "debug".to_owned(),
        }
    }
}

/// Counters reported by [`FramePipeline::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub frames_total: u64,
    pub frames_written: u64,
    pub bytes_written: u64,
}

/// Seconds a run covers: `duration_secs`, or the source length rounded up when that is `0`.
pub fn resolve_duration(duration_secs: f64, source_secs: f64) -> f64 {
    if duration_secs > 0.0 {
        duration_secs
    } else {
        source_secs.max(0.0).ceil()
    }
}

struct FrameMsg {
    idx: FrameIndex,
    frame: FrameRGBA,
}

type ProgressFn = Box<dyn FnMut(u64, u64)>;

/// Owns the raster surface, the composition and every per-frame buffer for one session.
pub struct FramePipeline {
    opts: PipelineOpts,
    composition: Composition,
    raster: CpuRaster,
    background: Option<Background>,
    label: Option<TimestampLabel>,
    list: DisplayList,
    state: PipelineState,
    progress: Option<ProgressFn>,
}

impl FramePipeline {
    /// Validate `composition` against the canvas and set up the surface. Fails before any frame is
    /// rendered.
    pub fn new(composition: Composition, opts: PipelineOpts) -> VizResult<Self> {
        composition.validate(opts.canvas)?;
        let raster = CpuRaster::new(opts.canvas)?;
        let background = opts
            .background
            .as_deref()
            .map(|path| Background::load_or_black(path, opts.canvas));
        let label = opts
            .timestamp
            .then(|| TimestampLabel::new(Color::WHITE, opts.font.as_deref()));
        Ok(Self {
            opts,
            composition,
            raster,
            background,
            label,
            list: DisplayList::new(),
            state: PipelineState::Idle,
            progress: None,
        })
    }

    /// Called with `(frames_done, frames_total)` after every rendered frame.
    pub fn on_progress(mut self, f: impl FnMut(u64, u64) + 'static) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn opts(&self) -> &PipelineOpts {
        &self.opts
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn composition_mut(&mut self) -> &mut Composition {
        &mut self.composition
    }

    /// Seconds the run covers for `source`.
    pub fn duration_secs(&self, source: &dyn SpectrumSource) -> f64 {
        resolve_duration(self.opts.duration_secs, source.duration_secs())
    }

    /// `ceil(duration * fps)`.
    pub fn total_frames(&self, source: &dyn SpectrumSource) -> u64 {
        self.opts.fps.secs_to_frames_ceil(self.duration_secs(source))
    }

    /// Render every frame and deliver it to `sink`. On success the sink has been ended; on failure
    /// it has not, and the state is `Failed`.
    pub fn run(
        &mut self,
        source: &mut dyn SpectrumSource,
        sink: &mut dyn FrameSink,
    ) -> VizResult<PipelineStats> {
        if self.state != PipelineState::Idle {
            return Err(VizError::validation("pipeline has already run"));
        }
        let res = self.run_inner(source, sink);
        self.state = if res.is_ok() {
            PipelineState::Done
        } else {
            PipelineState::Failed
        };
        match &res {
            Ok(stats) => tracing::info!(
                frames = stats.frames_written,
                bytes = stats.bytes_written,
                "pipeline finished"
            ),
            Err(e) => tracing::error!(error = %e, "pipeline failed"),
        }
        res
    }

    fn run_inner(
        &mut self,
        source: &mut dyn SpectrumSource,
        sink: &mut dyn FrameSink,
    ) -> VizResult<PipelineStats> {
        let bins = source.bin_count();
        if bins == 0 {
            return Err(VizError::analysis("analysis window has zero bins"));
        }
        let total = self.total_frames(source);
        if total == 0 {
            return Err(VizError::validation("nothing to render: zero frames"));
        }

        let canvas = self.opts.canvas;
        let cfg = SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.opts.fps,
        };
        let cap = self.opts.channel_capacity.max(1);
        tracing::info!(
            width = canvas.width,
            height = canvas.height,
            fps = self.opts.fps.as_f64(),
            frames = total,
            layers = self.composition.len(),
            "pipeline started"
        );
        self.composition.start();

        std::thread::scope(|scope| -> VizResult<PipelineStats> {
            let (tx, rx) = mpsc::sync_channel::<FrameMsg>(cap);
            // Spent buffers flow back so the loop reuses them instead of allocating per frame.
            let (recycle_tx, recycle_rx) = mpsc::channel::<Vec<u8>>();
            let sink_ref: &mut dyn FrameSink = sink;

            let enc = scope.spawn(move || -> VizResult<(u64, u64)> {
                sink_ref.begin(cfg)?;
                let mut frames = 0u64;
                let mut bytes = 0u64;
                for msg in rx.iter() {
                    sink_ref.push_frame(msg.idx, &msg.frame)?;
                    frames += 1;
                    bytes += msg.frame.data.len() as u64;
                    let _ = recycle_tx.send(msg.frame.data);
                }
                if frames != total {
                    return Err(VizError::encode(format!(
                        "frame stream ended after {frames} of {total} frames"
                    )));
                }
                sink_ref.end()?;
                Ok((frames, bytes))
            });

            let produce_res = self.produce(source, &tx, &recycle_rx, total, bins);
            if produce_res.is_ok() {
                self.state = PipelineState::Finalizing;
            }
            drop(tx);
            let enc_res = enc
                .join()
                .map_err(|_| VizError::encode("encoder thread panicked"))?;

            match produce_res {
                // The encoder hung up first; its error is the cause.
                Err(Produce::SinkClosed) => {
                    enc_res?;
                    Err(VizError::encode("sink stopped accepting frames"))
                }
                Err(Produce::Failed(e)) => Err(e),
                Ok(()) => {
                    let (frames_written, bytes_written) = enc_res?;
                    Ok(PipelineStats {
                        frames_total: total,
                        frames_written,
                        bytes_written,
                    })
                }
            }
        })
    }

    fn produce(
        &mut self,
        source: &mut dyn SpectrumSource,
        tx: &mpsc::SyncSender<FrameMsg>,
        recycled: &mpsc::Receiver<Vec<u8>>,
        total: u64,
        bins: usize,
    ) -> Result<(), Produce> {
        let canvas = self.opts.canvas;
        let mut snapshot = vec![0u8; bins];

        for f in 0..total {
            let idx = FrameIndex(f);
            self.state = PipelineState::Rendering(idx);
            source.next_snapshot(&mut snapshot)?;
            if f < LOGGED_SPECTRA {
                log_spectrum(f, &snapshot);
            }

            let mut data = recycled
                .try_recv()
                .unwrap_or_else(|_| vec![0u8; canvas.frame_len()]);
            self.render_frame(idx, &snapshot, &mut data)?;
            let frame = FrameRGBA {
                width: canvas.width,
                height: canvas.height,
                data,
            };
            self.save_debug_frame(idx, total, &frame);

            self.state = PipelineState::Delivering(idx);
            tx.send(FrameMsg { idx, frame })
                .map_err(|_| Produce::SinkClosed)?;

            if let Some(progress) = self.progress.as_mut() {
                progress(f + 1, total);
            }
        }
        Ok(())
    }

    fn render_frame(&mut self, idx: FrameIndex, snapshot: &[u8], out: &mut [u8]) -> VizResult<()> {
        let canvas = self.opts.canvas;
        match &self.background {
            Some(bg) => self.raster.draw_background(bg)?,
            None => self.raster.clear(),
        }

        self.list.clear();
        self.composition.draw(snapshot, &mut self.list, canvas)?;
        self.raster.render_list(&self.list)?;
        if let Some(label) = self.label.as_mut() {
            let secs = self.opts.fps.frames_to_secs(idx.0);
            self.raster.draw_label(label, secs)?;
        }
        self.raster.read_rgba8_into(out)
    }

    fn save_debug_frame(&self, idx: FrameIndex, total: u64, frame: &FrameRGBA) {
        let Some(dir) = self.opts.debug_frames.as_ref() else {
            return;
        };
        if idx.0 != 0 && idx.0 != total / 2 && idx.0 != total - 1 {
            return;
        }
        let path = dir.join(format!("{}-frame-{}.png", self.opts.debug_prefix, idx.0));
        let res = crate::encode::ensure_parent_dir(&path).and_then(|()| frame.save_png(&path));
        match res {
            Ok(()) => tracing::info!(path = %path.display(), "saved debug frame"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to save debug frame"),
        }
    }
}

enum Produce {
    SinkClosed,
    Failed(VizError),
}

impl From<VizError> for Produce {
    fn from(e: VizError) -> Self {
        Self::Failed(e)
    }
}

fn log_spectrum(frame: u64, snapshot: &[u8]) {
    let min = snapshot.iter().copied().min().unwrap_or(0);
    let max = snapshot.iter().copied().max().unwrap_or(0);
    let sum: u64 = snapshot.iter().map(|&v| u64::from(v)).sum();
    let avg = sum as f64 / snapshot.len().max(1) as f64;
    let non_zero = snapshot.iter().filter(|&&v| v > 0).count();
    tracing::debug!(frame, min, max, avg, non_zero, bins = snapshot.len(), "spectrum");
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
