//! Live mode: frames are piped into a transcoder whose MPEG-TS output is served over HTTP.
//!
//! The transcoder's stdout is relayed by a reader thread into a [`broadcast`] channel. With no
//! subscriber the relayed chunks are dropped, so the transcoder never blocks on an absent reader.
//! [`StreamServer`] subscribes one HTTP client at a time to that channel.

use crate::encode::ffmpeg::{EncoderProfile, rawvideo_input_args};
use crate::encode::sink::{FrameSink, OrderGuard, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{VizError, VizResult};
use crate::render::FrameRGBA;
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use std::ffi::OsString;
use std::io::{Read, Write as _};
use std::net::SocketAddr;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{broadcast, watch};

/// Chunks buffered per subscriber before a slow client starts skipping.
pub const LIVE_CHANNEL_CAPACITY: usize = 256;
const RELAY_CHUNK: usize = 64 * 1024;

/// Program and arguments of the live transcoder. It reads raw RGBA frames on stdin and writes the
/// stream to stdout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscoderCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl TranscoderCommand {
    pub fn new<I, S>(program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `ffmpeg` muxing stdin frames and `audio` into MPEG-TS on stdout.
    pub fn ffmpeg_mpegts(
        audio: &Path,
        width: u32,
        height: u32,
        fps: Fps,
        profile: EncoderProfile,
    ) -> Self {
        let mut args: Vec<OsString> = vec!["-loglevel".into(), "error".into()];
        args.extend(
            rawvideo_input_args(width, height, fps)
                .into_iter()
                .map(OsString::from),
        );
        args.extend(["-i".into(), "pipe:0".into(), "-i".into()]);
        args.push(audio.as_os_str().to_owned());
        args.extend(profile.codec_args().iter().map(OsString::from));
        args.extend(
            ["-pix_fmt", "yuv420p", "-shortest", "-f", "mpegts", "pipe:1"]
                .into_iter()
                .map(OsString::from),
        );
        Self {
            program: "ffmpeg".into(),
            args,
        }
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }
}

/// Sink writing frames straight into a live transcoder process.
pub struct LiveSink {
    command: TranscoderCommand,
    tx: broadcast::Sender<Bytes>,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    relay: Option<std::thread::JoinHandle<std::io::Result<u64>>>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    order: OrderGuard,
    relayed_bytes: u64,
}

impl LiveSink {
    pub fn new(command: TranscoderCommand, tx: broadcast::Sender<Bytes>) -> Self {
        Self {
            command,
            tx,
            child: None,
            stdin: None,
            relay: None,
            stderr_drain: None,
            cfg: None,
            order: OrderGuard::default(),
            relayed_bytes: 0,
        }
    }

    /// A fresh output channel for a sink and its [`StreamServer`].
    pub fn channel() -> broadcast::Sender<Bytes> {
        broadcast::channel(LIVE_CHANNEL_CAPACITY).0
    }

    /// Bytes the transcoder produced, known once `end` returns.
    pub fn relayed_bytes(&self) -> u64 {
        self.relayed_bytes
    }

    fn exited_early(&mut self) -> VizResult<()> {
        let Some(child) = self.child.as_mut() else {
            return Err(VizError::encode("live sink not started"));
        };
        match child.try_wait() {
            Ok(Some(status)) => Err(VizError::encode(format!(
                "transcoder exited unexpectedly with status {status}"
            ))),
            Ok(None) => Ok(()),
            Err(e) => Err(VizError::encode(format!(
                "failed to poll transcoder status: {e}"
            ))),
        }
    }
}

impl FrameSink for LiveSink {
    fn begin(&mut self, cfg: SinkConfig) -> VizResult<()> {
        let mut child = Command::new(&self.command.program)
            .args(&self.command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                VizError::encode(format!(
                    "failed to spawn transcoder '{}': {e}",
                    self.command.program.to_string_lossy()
                ))
            })?;
        tracing::info!(
            program = %self.command.program.to_string_lossy(),
            width = cfg.width,
            height = cfg.height,
            "live transcoder started"
        );

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| VizError::encode("failed to open transcoder stdin (unexpected)"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| VizError::encode("failed to open transcoder stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| VizError::encode("failed to open transcoder stderr (unexpected)"))?;

        let tx = self.tx.clone();
        let relay = std::thread::spawn(move || {
            let mut buf = vec![0u8; RELAY_CHUNK];
            let mut total = 0u64;
            loop {
                let n = stdout.read(&mut buf)?;
                if n == 0 {
                    return Ok(total);
                }
                total += n as u64;
                // No subscriber: drop the chunk.
                let _ = tx.send(Bytes::copy_from_slice(&buf[..n]));
            }
        });
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.relay = Some(relay);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.order.reset();
        self.relayed_bytes = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> VizResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| VizError::encode("live sink not started"))?;
        self.order.advance(idx)?;
        cfg.check_frame(frame)?;
        self.exited_early()?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(VizError::encode("live sink is already finalized"));
        };
        stdin.write_all(&frame.data).map_err(|e| {
            VizError::encode(format!(
                "failed to write frame {} to transcoder stdin: {e}",
                idx.0
            ))
        })
    }

    fn end(&mut self) -> VizResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| VizError::encode("live sink not started"))?;
        let status = child
            .wait()
            .map_err(|e| VizError::encode(format!("failed to wait for transcoder: {e}")))?;

        if let Some(handle) = self.relay.take() {
            self.relayed_bytes = handle
                .join()
                .map_err(|_| VizError::encode("transcoder relay thread panicked"))?
                .map_err(|e| VizError::encode(format!("transcoder stdout read failed: {e}")))?;
        }
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| VizError::encode("transcoder stderr drain thread panicked"))?
                .map_err(|e| VizError::encode(format!("transcoder stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(VizError::encode(format!(
                "transcoder exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        tracing::info!(bytes = self.relayed_bytes, "live transcoder finished");
        self.cfg = None;
        Ok(())
    }
}

impl Drop for LiveSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[derive(Clone)]
struct StreamState {
    tx: broadcast::Sender<Bytes>,
    client: Arc<AtomicBool>,
    shutdown: watch::Receiver<bool>,
}

/// Releases the single client slot when the response body is dropped.
struct ClientSlot(Arc<AtomicBool>);

impl Drop for ClientSlot {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Minimal HTTP endpoint serving `GET /stream` to one client at a time.
///
/// Runs on its own `tokio` runtime so the synchronous frame loop never has to be async.
pub struct StreamServer {
    addr: SocketAddr,
    client: Arc<AtomicBool>,
    shutdown: watch::Sender<bool>,
    task: Option<tokio::task::JoinHandle<std::io::Result<()>>>,
    runtime: Option<tokio::runtime::Runtime>,
}

impl StreamServer {
    /// Bind `addr` (port 0 picks a free port) and serve chunks published on `tx`.
    pub fn start(addr: SocketAddr, tx: broadcast::Sender<Bytes>) -> VizResult<Self> {
        use anyhow::Context as _;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("audio-viz-stream")
            .enable_all()
            .build()
            .context("failed to build stream server runtime")?;
        let listener = runtime
            .block_on(tokio::net::TcpListener::bind(addr))
            .with_context(|| format!("failed to bind stream server on {addr}"))?;
        let addr = listener
            .local_addr()
            .context("failed to read stream server address")?;

        let client = Arc::new(AtomicBool::new(false));
        let (shutdown, shutdown_rx) = watch::channel(false);
        let state = StreamState {
            tx,
            client: Arc::clone(&client),
            shutdown: shutdown_rx.clone(),
        };
        let app = axum::Router::new()
            .route("/stream", axum::routing::get(stream_handler))
            .with_state(state);

        let mut signal = shutdown_rx;
        let task = runtime.spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = signal.wait_for(|stop| *stop).await;
                })
                .await
        });
        tracing::info!(url = %format!("http://{addr}/stream"), "stream available");

        Ok(Self {
            addr,
            client,
            shutdown,
            task: Some(task),
            runtime: Some(runtime),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn url(&self) -> String {
        format!("http://{}/stream", self.addr)
    }

    /// `true` while a client holds the stream.
    pub fn has_client(&self) -> bool {
        self.client.load(Ordering::Acquire)
    }

    /// End every open stream and shut the server down.
    pub fn stop(mut self) -> VizResult<()> {
        self.shutdown_inner()
    }

    fn shutdown_inner(&mut self) -> VizResult<()> {
        let _ = self.shutdown.send(true);
        let (Some(runtime), Some(task)) = (self.runtime.take(), self.task.take()) else {
            return Ok(());
        };
        let res = runtime.block_on(task);
        runtime.shutdown_timeout(std::time::Duration::from_secs(1));
        res.map_err(|e| VizError::encode(format!("stream server task failed: {e}")))?
            .map_err(|e| VizError::encode(format!("stream server error: {e}")))
    }
}

impl Drop for StreamServer {
    fn drop(&mut self) {
        let _ = self.shutdown_inner();
    }
}

async fn stream_handler(State(state): State<StreamState>) -> Response {
    if state
        .client
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return (StatusCode::CONFLICT, "stream already has a client").into_response();
    }
    let slot = ClientSlot(Arc::clone(&state.client));
    let rx = state.tx.subscribe();
    tracing::info!("stream client connected");

    let body = futures::stream::unfold(
        (rx, state.shutdown, slot),
        |(mut rx, mut shutdown, slot)| async move {
            loop {
                tokio::select! {
                    msg = rx.recv() => match msg {
                        Ok(chunk) => {
                            return Some((Ok::<Bytes, std::io::Error>(chunk), (rx, shutdown, slot)));
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "stream client lagging; chunks skipped");
                        }
                        Err(broadcast::error::RecvError::Closed) => return None,
                    },
                    _ = shutdown.changed() => return None,
                }
            }
        },
    );

    (
        [
            (header::CONTENT_TYPE, "video/mp2t"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(body),
    )
        .into_response()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/live.rs"]
mod tests;
