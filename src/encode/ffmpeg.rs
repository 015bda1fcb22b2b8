use crate::encode::sink::{FrameSink, RawFileSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{VizError, VizResult};
use crate::render::FrameRGBA;
use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Video codec flags handed to `ffmpeg`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncoderProfile {
    /// `libx264`, slow preset, CRF 15.
    Cpu,
    /// `h264_nvenc`, constant QP 18.
    Nvenc,
}

impl EncoderProfile {
    /// Look for an NVIDIA GPU. If the lookup command fails, there is no GPU.
    pub fn detect() -> Self {
        let listing = if cfg!(windows) {
            Command::new("nvidia-smi").stderr(Stdio::null()).output()
        } else {
            Command::new("lspci").stderr(Stdio::null()).output()
        };
        let found = listing
            .map(|out| {
                String::from_utf8_lossy(&out.stdout)
                    .to_ascii_lowercase()
                    .contains("nvidia")
            })
            .unwrap_or(false);
        let profile = if found { Self::Nvenc } else { Self::Cpu };
        tracing::info!(?profile, "selected encoder profile");
        profile
    }

    /// Output codec arguments, up to but excluding the pixel format.
    pub fn codec_args(self) -> &'static [&'static str] {
        match self {
            Self::Nvenc => &[
                "-c:v",
                "h264_nvenc",
                "-preset",
                "slow",
                "-b:v",
                "20M",
                "-maxrate",
                "25M",
                "-bufsize",
                "20M",
                "-rc:v",
                "constqp",
                "-qp",
                "18",
                "-profile:v",
                "high",
                "-spatial-aq",
                "1",
                "-aq-strength",
                "8",
                "-a53cc",
                "0",
            ],
            Self::Cpu => &[
                "-c:v",
                "libx264",
                "-preset",
                "slow",
                "-profile:v",
                "high",
                "-crf",
                "15",
                "-x264-params",
                "ref=6:qcomp=0.8:colorprim=bt709:transfer=bt709:colormatrix=bt709",
            ],
        }
    }
}

/// Inputs for muxing a finished raw RGBA stream against the source audio.
#[derive(Clone, Debug)]
pub struct MuxOpts {
    pub raw_path: PathBuf,
    pub audio_path: PathBuf,
    pub out_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    /// Output duration; the longer input is cut to this.
    pub duration_secs: f64,
    pub profile: EncoderProfile,
}

/// Raw video input arguments shared by file and live mode.
pub(crate) fn rawvideo_input_args(width: u32, height: u32, fps: Fps) -> Vec<String> {
    vec![
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgba".into(),
        "-s".into(),
        format!("{width}x{height}"),
        "-framerate".into(),
        format!("{}/{}", fps.num, fps.den),
    ]
}

/// Full `ffmpeg` argument list for [`mux_raw_video`].
pub fn mux_args(opts: &MuxOpts) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-loglevel".into(), "error".into()];
    args.extend(
        rawvideo_input_args(opts.width, opts.height, opts.fps)
            .into_iter()
            .map(OsString::from),
    );
    args.push("-i".into());
    args.push(opts.raw_path.clone().into_os_string());
    args.push("-i".into());
    args.push(opts.audio_path.clone().into_os_string());
    args.extend(opts.profile.codec_args().iter().map(OsString::from));
    for a in [
        "-pix_fmt",
        "yuv420p",
        "-vf",
        "format=yuv420p,colorspace=bt709:iall=bt709:fast=1",
        "-t",
    ] {
        args.push(a.into());
    }
    args.push(format!("{}", opts.duration_secs).into());
    args.push(opts.out_path.clone().into_os_string());
    args
}

/// Run `ffmpeg` to mux a raw RGBA stream and the source audio into one container file.
pub fn mux_raw_video(opts: &MuxOpts) -> VizResult<()> {
    if !opts.width.is_multiple_of(2) || !opts.height.is_multiple_of(2) {
        return Err(VizError::validation(
            "width/height must be even (required for yuv420p output)",
        ));
    }
    ensure_parent_dir(&opts.out_path)?;
    if !is_ffmpeg_on_path() {
        return Err(VizError::encode(
            "ffmpeg is required for MP4 encoding, but was not found on PATH",
        ));
    }

    tracing::info!(
        raw = %opts.raw_path.display(),
        out = %opts.out_path.display(),
        profile = ?opts.profile,
        "muxing video"
    );
    let mut child = Command::new("ffmpeg")
        .args(mux_args(opts))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            VizError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

    let mut stderr_bytes = Vec::new();
    if let Some(mut stderr) = child.stderr.take() {
        stderr
            .read_to_end(&mut stderr_bytes)
            .map_err(|e| VizError::encode(format!("ffmpeg stderr read failed: {e}")))?;
    }
    let status = child
        .wait()
        .map_err(|e| VizError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
    if !status.success() {
        let stderr = String::from_utf8_lossy(&stderr_bytes);
        return Err(VizError::encode(format!(
            "ffmpeg exited with status {}: {}",
            status,
            stderr.trim()
        )));
    }
    Ok(())
}

/// File-mode sink: frames go to a raw stream on disk, muxed with the audio once the run ends.
///
/// The raw stream is removed after muxing unless `keep_raw` is set, and also when the sink is
/// dropped before `end` succeeds.
pub struct FfmpegFileSink {
    raw: RawFileSink,
    audio_path: PathBuf,
    out_path: PathBuf,
    duration_secs: f64,
    profile: EncoderProfile,
    keep_raw: bool,
    cfg: Option<SinkConfig>,
    raw_guard: TempFileGuard,
}

impl FfmpegFileSink {
    pub fn new(
        raw_path: impl Into<PathBuf>,
        audio_path: impl Into<PathBuf>,
        out_path: impl Into<PathBuf>,
        duration_secs: f64,
        profile: EncoderProfile,
    ) -> Self {
        Self {
            raw: RawFileSink::new(raw_path),
            audio_path: audio_path.into(),
            out_path: out_path.into(),
            duration_secs,
            profile,
            keep_raw: false,
            cfg: None,
            raw_guard: TempFileGuard(None),
        }
    }

    /// Leave the raw stream on disk after muxing.
    pub fn keep_raw(mut self, keep: bool) -> Self {
        self.keep_raw = keep;
        self
    }

    pub fn out_path(&self) -> &Path {
        &self.out_path
    }

    pub fn raw_path(&self) -> &Path {
        self.raw.path()
    }
}

impl FrameSink for FfmpegFileSink {
    fn begin(&mut self, cfg: SinkConfig) -> VizResult<()> {
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(VizError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        self.raw.begin(cfg)?;
        if !self.keep_raw {
            self.raw_guard.0 = Some(self.raw.path().to_path_buf());
        }
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> VizResult<()> {
        self.raw.push_frame(idx, frame)
    }

    fn end(&mut self) -> VizResult<()> {
        self.raw.end()?;
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| VizError::encode("ffmpeg sink not started"))?;
        mux_raw_video(&MuxOpts {
            raw_path: self.raw.path().to_path_buf(),
            audio_path: self.audio_path.clone(),
            out_path: self.out_path.clone(),
            width: cfg.width,
            height: cfg.height,
            fps: cfg.fps,
            duration_secs: self.duration_secs,
            profile: self.profile,
        })?;
        // Removes the raw stream unless it is being kept.
        drop(std::mem::replace(&mut self.raw_guard, TempFileGuard(None)));
        Ok(())
    }
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> VizResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
