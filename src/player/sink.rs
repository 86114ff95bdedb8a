//! Audio output seam
//!
//! `AudioSink` is the playback controller's view of the audio device: start
//! a stream by URL, pause, resume, stop. The production implementation runs
//! rodio on a dedicated thread (the output stream handle is not `Send`),
//! fed over a channel; a finished track is reported back as a
//! [`PlayerEvent::TrackEnded`] so the app can auto-advance.

use std::future::Future;
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tokio::sync::{mpsc, oneshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
    TrackEnded,
}

pub trait AudioSink: Send + Sync + 'static {
    /// Start playing the stream at `url`, replacing whatever is playing.
    /// Resolves once playback has started (or failed to).
    fn play(&self, url: &str) -> impl Future<Output = Result<()>> + Send;
    fn pause(&self);
    fn resume(&self);
    fn stop(&self);
}

enum SinkCmd {
    Play {
        url: String,
        done: oneshot::Sender<Result<()>>,
    },
    Pause,
    Resume,
    Stop,
}

/// Rodio-backed sink. Cheap to clone handles are not needed; the struct
/// itself is only a channel sender.
pub struct RodioSink {
    tx: mpsc::UnboundedSender<SinkCmd>,
}

impl RodioSink {
    pub fn new(events: mpsc::UnboundedSender<PlayerEvent>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        std::thread::spawn(move || sink_thread(rx, events));
        Self { tx }
    }
}

impl AudioSink for RodioSink {
    fn play(&self, url: &str) -> impl Future<Output = Result<()>> + Send {
        let tx = self.tx.clone();
        let url = url.to_string();
        async move {
            let (done_tx, done_rx) = oneshot::channel();
            tx.send(SinkCmd::Play { url, done: done_tx })
                .map_err(|_| anyhow!("audio thread is gone"))?;
            done_rx
                .await
                .map_err(|_| anyhow!("audio thread dropped the request"))?
        }
    }

    fn pause(&self) {
        let _ = self.tx.send(SinkCmd::Pause);
    }

    fn resume(&self) {
        let _ = self.tx.send(SinkCmd::Resume);
    }

    fn stop(&self) {
        let _ = self.tx.send(SinkCmd::Stop);
    }
}

fn sink_thread(
    mut rx: mpsc::UnboundedReceiver<SinkCmd>,
    events: mpsc::UnboundedSender<PlayerEvent>,
) {
    let http = reqwest::blocking::Client::new();
    // Lazy: opening the output device can fail (headless CI, missing ALSA),
    // and that failure belongs to the first Play, not to construction.
    let mut output: Option<(OutputStream, OutputStreamHandle)> = None;
    let mut active: Option<Arc<Sink>> = None;
    // Bumped on every Play/Stop so a drain watcher for a replaced track
    // cannot emit a TrackEnded for it.
    let live = Arc::new(AtomicU64::new(0));

    while let Some(cmd) = rx.blocking_recv() {
        match cmd {
            SinkCmd::Play { url, done } => {
                if let Some(old) = active.take() {
                    old.stop();
                }
                let generation = live.fetch_add(1, Ordering::SeqCst) + 1;
                let result = match start_stream(&http, &mut output, &url) {
                    Ok(sink) => {
                        spawn_drain_watcher(sink.clone(), live.clone(), generation, events.clone());
                        active = Some(sink);
                        Ok(())
                    }
                    Err(e) => {
                        tracing::warn!(url = %url, error = %e, "Failed to start stream");
                        Err(e)
                    }
                };
                let _ = done.send(result);
            }
            SinkCmd::Pause => {
                if let Some(sink) = &active {
                    sink.pause();
                }
            }
            SinkCmd::Resume => {
                if let Some(sink) = &active {
                    sink.play();
                }
            }
            SinkCmd::Stop => {
                live.fetch_add(1, Ordering::SeqCst);
                if let Some(sink) = active.take() {
                    sink.stop();
                }
            }
        }
    }
}

fn start_stream(
    http: &reqwest::blocking::Client,
    output: &mut Option<(OutputStream, OutputStreamHandle)>,
    url: &str,
) -> Result<Arc<Sink>> {
    if output.is_none() {
        *output = Some(OutputStream::try_default()?);
    }
    let Some((_, handle)) = output.as_ref() else {
        return Err(anyhow!("audio output unavailable"));
    };

    let bytes = http.get(url).send()?.error_for_status()?.bytes()?;
    tracing::debug!(url, bytes = bytes.len(), "Stream fetched");

    let decoder = rodio::Decoder::new(Cursor::new(bytes.to_vec()))?;
    let sink = Sink::try_new(handle)?;
    sink.append(decoder);
    Ok(Arc::new(sink))
}

fn spawn_drain_watcher(
    sink: Arc<Sink>,
    live: Arc<AtomicU64>,
    generation: u64,
    events: mpsc::UnboundedSender<PlayerEvent>,
) {
    std::thread::spawn(move || {
        sink.sleep_until_end();
        if live.load(Ordering::SeqCst) == generation {
            let _ = events.send(PlayerEvent::TrackEnded);
        }
    });
}
