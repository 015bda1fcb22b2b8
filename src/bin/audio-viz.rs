use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

use anyhow::Context as _;
use audio_viz::config::file_timestamp;
use audio_viz::{
    AnalyserOpts, Composition, EncoderProfile, FfmpegFileSink, FftAnalyser, Fps,
    FramePipeline, LiveSink, OutputLayout, PipelineOpts, SceneFile, StreamServer,
    TranscoderCommand, VideoPreset,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "audio-viz", version, about = "Generate audio visualization videos")]
struct Cli {
    /// Input audio file.
    #[arg(short, long)]
    input: PathBuf,

    /// Output root directory.
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Video resolution preset (360p, 480p, 720p, 1080p, 1440p, 2160p, 4320p).
    #[arg(short, long, default_value = "1080p")]
    resolution: String,

    /// Seconds to render; 0 renders the whole file.
    #[arg(short, long, default_value_t = 10.0)]
    duration: f64,

    #[arg(short, long, default_value_t = 15)]
    fps: u32,

    /// Animation preset: 0-3 or an animation name.
    #[arg(short, long, default_value = "0")]
    preset: String,

    /// JSON scene file; takes precedence over --preset.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Background image, scaled to cover the frame.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Overlay the playback time.
    #[arg(long, default_value_t = false)]
    timestamp: bool,

    /// Font file (TTF/OTF) for --timestamp; defaults to a system monospace face.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Keep the raw stream and save first/middle/last frames as PNGs.
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Stream MPEG-TS over HTTP instead of writing an MP4.
    #[arg(long, default_value_t = false)]
    live: bool,

    /// Port for --live.
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let started = Instant::now();

    let video = VideoPreset::find(&cli.resolution)?;
    let canvas = video.canvas()?;
    let fps = Fps::whole(cli.fps)?;
    let (composition, preset_label) = load_composition(&cli)?;

    let layout = OutputLayout::new(&cli.output, cli.debug);
    layout.create()?;
    let stamp = file_timestamp(SystemTime::now());

    let mut opts = PipelineOpts::new(canvas, fps);
    opts.duration_secs = cli.duration.max(0.0);
    opts.background = cli.background.clone();
    opts.timestamp = cli.timestamp;
    opts.font = cli.font.clone();
    opts.debug_frames = layout.image_dir();
    opts.debug_prefix = stamp.clone();
    let pipeline = FramePipeline::new(composition, opts)?;

    let mut analyser = FftAnalyser::from_file(&cli.input, fps, AnalyserOpts::default())
        .with_context(|| format!("failed to analyse '{}'", cli.input.display()))?;
    let duration = pipeline.duration_secs(&analyser);
    let total = pipeline.total_frames(&analyser);
    let profile = EncoderProfile::detect();
    tracing::info!(
        video = video.label,
        duration,
        frames = total,
        preset = %preset_label,
        "generating video"
    );

    let frames_bar = frame_bar(total);
    let encode_spinner = ProgressBar::new_spinner();
    let mut pipeline = {
        let bar = frames_bar.clone();
        let spinner = encode_spinner.clone();
        let finishing = if cli.live { "Finishing stream" } else { "Video Encoding" };
        pipeline.on_progress(move |done, total| {
            bar.set_position(done);
            if done == total {
                bar.finish();
                spinner.set_message(finishing);
                spinner.enable_steady_tick(Duration::from_millis(100));
            }
        })
    };

    let stats = if cli.live {
        let tx = LiveSink::channel();
        let server = StreamServer::start(SocketAddr::from(([127, 0, 0, 1], cli.port)), tx.clone())?;
        eprintln!("Stream available at: {}", server.url());
        let command =
            TranscoderCommand::ffmpeg_mpegts(&cli.input, canvas.width, canvas.height, fps, profile);
        let mut sink = LiveSink::new(command, tx);
        let res = pipeline.run(&mut analyser, &mut sink);
        encode_spinner.finish_and_clear();
        server.stop()?;
        res?
    } else {
        let out_path = layout.mp4_path(&stamp, &preset_label);
        let mut sink = FfmpegFileSink::new(
            layout.raw_path(&stamp),
            &cli.input,
            &out_path,
            duration,
            profile,
        )
        .keep_raw(cli.debug);
        let res = pipeline.run(&mut analyser, &mut sink);
        encode_spinner.finish_and_clear();
        let stats = res?;
        eprintln!("wrote {}", out_path.display());
        if cli.debug {
            eprintln!("raw stream kept at {}", sink.raw_path().display());
        }
        stats
    };

    tracing::info!(
        frames = stats.frames_written,
        bytes = stats.bytes_written,
        secs = started.elapsed().as_secs_f64(),
        "done"
    );
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// The scene file when given, otherwise the named preset. Returns the label used in file names.
fn load_composition(cli: &Cli) -> anyhow::Result<(Composition, String)> {
    if let Some(path) = cli.scene.as_ref() {
        let comp = SceneFile::load(path)?.into_composition()?;
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "scene".to_owned());
        return Ok((comp, label));
    }
    let mut comp = Composition::new();
    comp.apply_named_preset(&cli.preset)?;
    Ok((comp, cli.preset.trim().to_owned()))
}

fn frame_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("Frame Processing [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar
}
