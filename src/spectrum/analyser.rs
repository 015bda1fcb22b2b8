use crate::foundation::core::Fps;
use crate::foundation::error::{VizError, VizResult};
use rustfft::{Fft, FftPlanner, num_complex::Complex};
use std::path::Path;
use std::sync::Arc;

/// Producer of one spectrum snapshot per rendered frame.
///
/// Contract: every call to [`SpectrumSource::next_snapshot`] reflects the next sequential analysis
/// window of the source audio. The pipeline calls it exactly once per produced frame.
pub trait SpectrumSource: Send {
    /// Fixed number of bins `N` for the session.
    fn bin_count(&self) -> usize;
    /// Fill `out` (length `bin_count()`) with the next snapshot.
    fn next_snapshot(&mut self, out: &mut [u8]) -> VizResult<()>;
    /// Duration of the source audio in seconds.
    fn duration_secs(&self) -> f64;
}

/// Analyser parameters. Defaults mirror a browser `AnalyserNode` configured for visualizers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalyserOpts {
    /// FFT window length; yields `fft_size / 2` bins.
    pub fft_size: usize,
    /// Exponential smoothing between consecutive windows, `0..1`.
    pub smoothing: f32,
    pub min_db: f32,
    pub max_db: f32,
    /// Sample rate PCM is decoded at.
    pub sample_rate: u32,
}

impl Default for AnalyserOpts {
    fn default() -> Self {
        Self {
            fft_size: 1024,
            smoothing: 0.85,
            min_db: -100.0,
            max_db: -30.0,
            sample_rate: 44_100,
        }
    }
}

/// FFT analyser over decoded mono PCM that advances one frame of audio per snapshot.
pub struct FftAnalyser {
    opts: AnalyserOpts,
    pcm: Vec<f32>,
    samples_per_frame: f64,
    next_frame: u64,

    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buf: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
}

impl FftAnalyser {
    pub fn new(pcm: Vec<f32>, fps: Fps, opts: AnalyserOpts) -> VizResult<Self> {
        if opts.fft_size < 32 || !opts.fft_size.is_power_of_two() {
            return Err(VizError::analysis(format!(
                "fft_size must be a power of two >= 32, got {}",
                opts.fft_size
            )));
        }
        if opts.sample_rate == 0 {
            return Err(VizError::analysis("sample_rate must be non-zero"));
        }
        if !(0.0..1.0).contains(&opts.smoothing) {
            return Err(VizError::analysis("smoothing must be in [0, 1)"));
        }
        if opts.max_db <= opts.min_db {
            return Err(VizError::analysis("max_db must be greater than min_db"));
        }

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(opts.fft_size);
        let scratch = vec![Complex::default(); fft.get_inplace_scratch_len()];

        Ok(Self {
            samples_per_frame: f64::from(opts.sample_rate) / fps.as_f64(),
            pcm,
            next_frame: 0,
            window: blackman_window(opts.fft_size),
            buf: vec![Complex::default(); opts.fft_size],
            scratch,
            smoothed: vec![0.0; opts.fft_size / 2],
            fft,
            opts,
        })
    }

    /// Decode `path` through `ffmpeg` and build an analyser over it.
    pub fn from_file(path: &Path, fps: Fps, opts: AnalyserOpts) -> VizResult<Self> {
        let pcm = decode_audio_mono(path, opts.sample_rate)?;
        tracing::debug!(
            path = %path.display(),
            samples = pcm.len(),
            sample_rate = opts.sample_rate,
            "decoded source audio"
        );
        Self::new(pcm, fps, opts)
    }

    /// Index of the next window to be analysed.
    pub fn position(&self) -> u64 {
        self.next_frame
    }

    fn window_end(&self, frame: u64) -> usize {
        ((frame + 1) as f64 * self.samples_per_frame).round() as usize
    }
}

impl SpectrumSource for FftAnalyser {
    fn bin_count(&self) -> usize {
        self.opts.fft_size / 2
    }

    fn next_snapshot(&mut self, out: &mut [u8]) -> VizResult<()> {
        let n = self.opts.fft_size;
        if out.len() != n / 2 {
            return Err(VizError::analysis(format!(
                "snapshot buffer has {} bins, analyser produces {}",
                out.len(),
                n / 2
            )));
        }

        // Window of `n` samples ending at this frame's last sample, zero-padded outside the PCM.
        let end = self.window_end(self.next_frame) as isize;
        let start = end - n as isize;
        for (k, (slot, w)) in self.buf.iter_mut().zip(&self.window).enumerate() {
            let idx = start + k as isize;
            let s = if idx >= 0 {
                self.pcm.get(idx as usize).copied().unwrap_or(0.0)
            } else {
                0.0
            };
            *slot = Complex::new(s * w, 0.0);
        }
        self.fft.process_with_scratch(&mut self.buf, &mut self.scratch);

        let tau = self.opts.smoothing;
        let range = self.opts.max_db - self.opts.min_db;
        for (bin, (o, prev)) in out.iter_mut().zip(self.smoothed.iter_mut()).enumerate() {
            let mag = self.buf[bin].norm() / n as f32;
            let s = tau * *prev + (1.0 - tau) * mag;
            *prev = if s.is_finite() { s } else { 0.0 };
            let db = if *prev > 0.0 {
                20.0 * prev.log10()
            } else {
                f32::NEG_INFINITY
            };
            let scaled = 255.0 / range * (db - self.opts.min_db);
            *o = scaled.clamp(0.0, 255.0) as u8;
        }

        self.next_frame += 1;
        Ok(())
    }

    fn duration_secs(&self) -> f64 {
        self.pcm.len() as f64 / f64::from(self.opts.sample_rate)
    }
}

fn blackman_window(n: usize) -> Vec<f32> {
    const ALPHA: f64 = 0.16;
    let a0 = 0.5 * (1.0 - ALPHA);
    let a1 = 0.5;
    let a2 = 0.5 * ALPHA;
    (0..n)
        .map(|i| {
            let x = i as f64 / n as f64;
            let w = a0 - a1 * (2.0 * std::f64::consts::PI * x).cos()
                + a2 * (4.0 * std::f64::consts::PI * x).cos();
            w as f32
        })
        .collect()
}

/// Decode any audio file to mono `f32` PCM at `sample_rate` through the system `ffmpeg`.
pub fn decode_audio_mono(path: &Path, sample_rate: u32) -> VizResult<Vec<f32>> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "1",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| VizError::analysis(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        return Err(VizError::analysis(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            msg.trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(VizError::analysis(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let mut pcm = Vec::<f32>::with_capacity(out.stdout.len() / 4);
    for chunk in out.stdout.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    Ok(pcm)
}

#[cfg(test)]
#[path = "../../tests/unit/spectrum/analyser.rs"]
mod tests;
