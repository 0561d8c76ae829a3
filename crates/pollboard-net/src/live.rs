// Live-update listener over Server-Sent Events.
//
// Subscribes to the backend's event stream and forwards connection changes
// and `poll-updated` payloads as `LiveEvent`s over an mpsc channel for the
// app event loop to consume. The event source reconnects on its own; each
// drop and recovery is reported once.

use futures_util::stream::Stream;
use futures_util::StreamExt;
use reqwest_eventsource::{Event, RequestBuilderExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use pollboard_core::model::Poll;
use pollboard_core::protocol::LiveEvent;

/// SSE event name carrying a full poll record.
pub const POLL_UPDATED_EVENT: &str = "poll-updated";

/// One item from the event source, stripped of transport types.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Open,
    Message { event: String, data: String },
    Lost(String),
}

impl From<Result<Event, reqwest_eventsource::Error>> for Signal {
    fn from(item: Result<Event, reqwest_eventsource::Error>) -> Self {
        match item {
            Ok(Event::Open) => Signal::Open,
            Ok(Event::Message(msg)) => Signal::Message {
                event: msg.event,
                data: msg.data,
            },
            Err(reqwest_eventsource::Error::InvalidStatusCode(status, _)) => {
                Signal::Lost(format!("server returned status {status}"))
            }
            Err(e) => Signal::Lost(e.to_string()),
        }
    }
}

/// Decode a message into a poll update, or `None` if it is not one.
pub(crate) fn parse_poll_update(event: &str, data: &str) -> Option<Poll> {
    if event != POLL_UPDATED_EVENT {
        debug!(event, "ignoring SSE event");
        return None;
    }
    match serde_json::from_str(data) {
        Ok(poll) => Some(poll),
        Err(e) => {
            warn!("Malformed {} payload: {}", POLL_UPDATED_EVENT, e);
            None
        }
    }
}

/// Forward signals from any [`Stream`] through `tx` as [`LiveEvent`]s.
///
/// Connection changes are only reported on transitions. Returns `Err(())`
/// if the receiver is dropped.
pub async fn forward_signals<St>(mut stream: St, tx: &mpsc::Sender<LiveEvent>) -> Result<(), ()>
where
    St: Stream<Item = Signal> + Unpin,
{
    let mut connected = false;

    while let Some(signal) = stream.next().await {
        let event = match signal {
            Signal::Open => {
                if connected {
                    continue;
                }
                info!("Live update stream opened");
                connected = true;
                LiveEvent::Connected
            }
            Signal::Lost(reason) => {
                warn!("Live update stream error: {}", reason);
                if !connected {
                    continue;
                }
                connected = false;
                LiveEvent::Disconnected
            }
            Signal::Message { event, data } => match parse_poll_update(&event, &data) {
                Some(poll) => LiveEvent::PollUpdated(poll),
                None => continue,
            },
        };

        if tx.send(event).await.is_err() {
            return Err(());
        }
    }

    if connected && tx.send(LiveEvent::Disconnected).await.is_err() {
        return Err(());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Handle to a running listener. Dropping it stops the listener and closes
/// the stream.
pub struct LiveSubscription {
    handle: JoinHandle<()>,
}

impl LiveSubscription {
    pub fn close(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for LiveSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start listening for live updates at `url`.
pub fn subscribe(url: impl Into<String>, tx: mpsc::Sender<LiveEvent>) -> LiveSubscription {
    let url = url.into();
    let handle = tokio::spawn(async move {
        info!("Subscribing to live updates at {}", url);
        let mut source = match reqwest::Client::new().get(url.as_str()).eventsource() {
            Ok(source) => source,
            Err(e) => {
                warn!("Failed to create event source: {}", e);
                return;
            }
        };

        let signals = source.by_ref().map(Signal::from);
        if forward_signals(signals, &tx).await.is_err() {
            debug!("Live event receiver dropped");
        }
        source.close();
        info!("Live update listener stopped");
    });
    LiveSubscription { handle }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
