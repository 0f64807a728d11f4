//! Realtime project chat stream over WebSocket.
//!
//! One logical connection per (user, project). [`RealtimeLink`] is the
//! handle the UI holds; the transport task that owns the socket is spawned
//! per [`StreamSession`] and reconnects with exponential backoff until told
//! to close.
//!
//! All socket code is gated behind `#[cfg(feature = "hydrate")]` since it
//! requires a browser environment. The link bookkeeping is plain Rust.
//!
//! SERIALIZATION
//! =============
//! Opening a new session closes the previous one first, and the new
//! transport task waits for the old one to report closed before it
//! connects. Two sockets for the same tab never overlap.

#[cfg(test)]
#[path = "message_stream_test.rs"]
mod message_stream_test;

use futures::channel::{mpsc, oneshot};

use crate::net::types::{ChatMessage, OutgoingMessage};

#[cfg(feature = "hydrate")]
use crate::config::ClientConfig;
#[cfg(feature = "hydrate")]
use crate::state::chat::{ChatState, ConnectionStatus};

pub const RECONNECT_INITIAL_MS: u32 = 1000;
pub const RECONNECT_MAX_MS: u32 = 10_000;

/// Close code plus human-readable reason sent with the WebSocket close frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CloseReason {
    pub code: u16,
    pub reason: &'static str,
}

impl CloseReason {
    pub const IDENTITY_SWITCH: Self = Self { code: 4001, reason: "identity switch" };
    pub const LOGOUT: Self = Self { code: 1000, reason: "logout" };
    pub const PROJECT_CHANGE: Self = Self { code: 1000, reason: "project change" };
    pub const LEFT_CHAT: Self = Self { code: 1000, reason: "left chat" };
}

/// Which channel a connection serves.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StreamKey {
    pub user_id: String,
    pub project_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamCommand {
    Send(OutgoingMessage),
    Close(CloseReason),
}

/// Everything a transport task needs for one connection lifetime.
pub struct StreamSession {
    pub key: StreamKey,
    pub commands: mpsc::UnboundedReceiver<StreamCommand>,
    /// Resolves once the previous connection has fully closed.
    pub after: Option<oneshot::Receiver<()>>,
    /// Fire (or drop) when this connection has fully closed.
    pub closed: oneshot::Sender<()>,
}

struct StreamHandle {
    key: StreamKey,
    commands: mpsc::UnboundedSender<StreamCommand>,
    closed: oneshot::Receiver<()>,
}

/// The single realtime connection slot for this tab.
#[derive(Default)]
pub struct RealtimeLink {
    active: Option<StreamHandle>,
    /// Closed signal of a connection closed while no other was open; the
    /// next session waits on it. Never set while `active` is.
    closing: Option<oneshot::Receiver<()>>,
}

impl std::fmt::Debug for RealtimeLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeLink")
            .field("active", &self.active.as_ref().map(|h| &h.key))
            .field("closing", &self.closing.is_some())
            .finish()
    }
}

impl RealtimeLink {
    pub fn active_key(&self) -> Option<&StreamKey> {
        self.active.as_ref().map(|h| &h.key)
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Register a connection for `key`, closing any existing one first.
    ///
    /// Returns `None` when `key` is already the open connection.
    pub fn open(&mut self, key: StreamKey) -> Option<StreamSession> {
        if self.active_key() == Some(&key) {
            return None;
        }
        let after = self
            .take_closing(CloseReason::PROJECT_CHANGE)
            .or_else(|| self.closing.take());
        let (command_tx, command_rx) = mpsc::unbounded();
        let (closed_tx, closed_rx) = oneshot::channel();
        self.active = Some(StreamHandle {
            key: key.clone(),
            commands: command_tx,
            closed: closed_rx,
        });
        Some(StreamSession {
            key,
            commands: command_rx,
            after,
            closed: closed_tx,
        })
    }

    /// Ask the open connection to close with `reason`. Returns whether a
    /// connection was open.
    ///
    /// The connection's closed signal is kept so the next [`open`] still
    /// waits for this socket to finish closing.
    ///
    /// [`open`]: RealtimeLink::open
    pub fn close(&mut self, reason: CloseReason) -> bool {
        match self.take_closing(reason) {
            Some(closed) => {
                self.closing = Some(closed);
                true
            }
            None => false,
        }
    }

    /// Queue `message` on the open connection.
    pub fn send(&self, message: OutgoingMessage) -> bool {
        self.active
            .as_ref()
            .is_some_and(|h| h.commands.unbounded_send(StreamCommand::Send(message)).is_ok())
    }

    fn take_closing(&mut self, reason: CloseReason) -> Option<oneshot::Receiver<()>> {
        let handle = self.active.take()?;
        let _ = handle.commands.unbounded_send(StreamCommand::Close(reason));
        Some(handle.closed)
    }
}

/// WebSocket URL for `key` under `ws_base`.
pub fn stream_url(ws_base: &str, key: &StreamKey) -> String {
    format!(
        "{ws_base}/ws/messages?userId={}&projectId={}",
        urlencoding::encode(&key.user_id),
        urlencoding::encode(&key.project_id)
    )
}

/// Parse one incoming text frame into a chat message.
pub fn parse_message_event(text: &str) -> Option<ChatMessage> {
    serde_json::from_str(text).ok()
}

/// Build an outgoing message with a fresh client-side id.
pub fn outgoing_message(content: &str) -> OutgoingMessage {
    OutgoingMessage {
        id: uuid::Uuid::new_v4().to_string(),
        content: content.to_owned(),
    }
}

pub fn next_backoff(current_ms: u32) -> u32 {
    current_ms.saturating_mul(2).min(RECONNECT_MAX_MS)
}

/// Drain commands queued while disconnected. Returns `true` when the
/// session should stop (close requested or link dropped).
pub fn drain_idle_commands(commands: &mut mpsc::UnboundedReceiver<StreamCommand>) -> bool {
    loop {
        match commands.try_next() {
            Ok(Some(StreamCommand::Close(_)) | None) => return true,
            Ok(Some(StreamCommand::Send(_))) => {}
            Err(_) => return false,
        }
    }
}

/// Spawn the transport task for `session`.
#[cfg(feature = "hydrate")]
pub fn spawn_message_stream(config: ClientConfig, session: StreamSession, chat: leptos::prelude::RwSignal<ChatState>) {
    leptos::task::spawn_local(message_stream_loop(config, session, chat));
}

#[cfg(feature = "hydrate")]
enum ConnectionEnd {
    Requested,
    Dropped,
}

#[cfg(feature = "hydrate")]
async fn message_stream_loop(config: ClientConfig, session: StreamSession, chat: leptos::prelude::RwSignal<ChatState>) {
    use leptos::prelude::Update;

    let StreamSession { key, mut commands, after, closed } = session;
    if let Some(after) = after {
        let _ = after.await;
    }

    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    let url = stream_url(&config.resolve_ws_base(&origin), &key);
    let mut backoff_ms = RECONNECT_INITIAL_MS;

    loop {
        chat.update(|c| c.connection = ConnectionStatus::Connecting);
        match run_connection(&url, &mut commands, chat).await {
            Ok(ConnectionEnd::Requested) => break,
            Ok(ConnectionEnd::Dropped) => {
                leptos::logging::log!("chat stream dropped for project {}", key.project_id);
            }
            Err(e) => {
                leptos::logging::warn!("chat stream error: {e}");
            }
        }
        chat.update(|c| c.connection = ConnectionStatus::Disconnected);

        gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(backoff_ms))).await;
        backoff_ms = next_backoff(backoff_ms);
        if drain_idle_commands(&mut commands) {
            break;
        }
    }

    chat.update(|c| c.connection = ConnectionStatus::Disconnected);
    let _ = closed.send(());
}

#[cfg(feature = "hydrate")]
async fn run_connection(
    url: &str,
    commands: &mut mpsc::UnboundedReceiver<StreamCommand>,
    chat: leptos::prelude::RwSignal<ChatState>,
) -> Result<ConnectionEnd, String> {
    use futures::future::Either;
    use futures::{SinkExt, StreamExt};
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;
    use leptos::prelude::Update;

    let mut ws = WebSocket::open(url).map_err(|e| e.to_string())?;
    chat.update(|c| c.connection = ConnectionStatus::Connected);

    loop {
        let event = match futures::future::select(commands.next(), ws.next()).await {
            Either::Left((command, _)) => Either::Left(command),
            Either::Right((incoming, _)) => Either::Right(incoming),
        };
        match event {
            Either::Left(Some(StreamCommand::Send(message))) => {
                let text = serde_json::to_string(&message).map_err(|e| e.to_string())?;
                ws.send(Message::Text(text)).await.map_err(|e| e.to_string())?;
            }
            Either::Left(Some(StreamCommand::Close(reason))) => {
                let _ = ws.close(Some(reason.code), Some(reason.reason));
                return Ok(ConnectionEnd::Requested);
            }
            Either::Left(None) => {
                let _ = ws.close(Some(CloseReason::LEFT_CHAT.code), Some(CloseReason::LEFT_CHAT.reason));
                return Ok(ConnectionEnd::Requested);
            }
            Either::Right(Some(Ok(Message::Text(text)))) => {
                if let Some(message) = parse_message_event(&text) {
                    chat.update(|c| {
                        c.append(message);
                    });
                }
            }
            Either::Right(Some(Ok(Message::Bytes(_)))) => {}
            Either::Right(Some(Err(e))) => return Err(e.to_string()),
            Either::Right(None) => return Ok(ConnectionEnd::Dropped),
        }
    }
}
