// twitch_eventsub/runtime.rs

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use tokio::sync::watch;
use tokio::time::Duration;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::tungstenite::Error as WsError;
use tracing::{debug, error, info, trace, warn};

use intermission_common::models::{ChannelIdentity, SessionInfo, Subscription};

use crate::Error;
use crate::platforms::twitch_helix::requests::eventsub::CHAT_MESSAGE_TYPE;
use crate::platforms::twitch_helix::{HelixApi, SubscriptionRequest};
use crate::services::twitch::identity_resolver::IdentityResolver;

use super::events::{parse_frame, EventSubFrame};
use super::ChatEventHandler;

pub const EVENTSUB_WS_URL: &str = "wss://eventsub.wss.twitch.tv/ws";

/// How long the server gets to send `session_welcome` after the socket opens.
const WELCOME_TIMEOUT: Duration = Duration::from_secs(10);
/// Slack on top of the advertised keepalive before the connection is declared dead.
const KEEPALIVE_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    AwaitingWelcome,
    Subscribing,
    Listening,
    Closed,
    Faulted,
}

/// What the socket handed us next.
enum Inbound {
    Text(String),
    /// Server sent a close frame.
    Closed,
    /// The stream ended with no close frame.
    Ended,
    Shutdown,
}

/// One EventSub websocket session: welcome handshake, per-channel chat
/// subscriptions, then the receive loop. No reconnect: when the connection goes
/// away the session is over.
pub struct EventSubSession {
    url: String,
    helix: Arc<dyn HelixApi>,
    bot_user_id: String,
    handler: Arc<dyn ChatEventHandler>,
    channels: Vec<ChannelIdentity>,
    state: SessionState,
    session: Option<SessionInfo>,
    subscriptions: HashMap<String, Subscription>,
}

impl EventSubSession {
    pub fn new(
        helix: Arc<dyn HelixApi>,
        bot_user_id: &str,
        handler: Arc<dyn ChatEventHandler>,
    ) -> Self {
        Self {
            url: EVENTSUB_WS_URL.to_string(),
            helix,
            bot_user_id: bot_user_id.to_string(),
            handler,
            channels: Vec::new(),
            state: SessionState::Disconnected,
            session: None,
            subscriptions: HashMap::new(),
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    /// Uses already-resolved channels instead of resolving in [`start`](Self::start).
    pub fn with_channels(mut self, channels: Vec<ChannelIdentity>) -> Self {
        self.channels = channels;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session_info(&self) -> Option<&SessionInfo> {
        self.session.as_ref()
    }

    /// login -> subscription created on the current session.
    pub fn subscriptions(&self) -> &HashMap<String, Subscription> {
        &self.subscriptions
    }

    pub fn channels(&self) -> &[ChannelIdentity] {
        &self.channels
    }

    /// Resolves `logins`, then connects and runs until shutdown, server close, or failure.
    ///
    /// Zero resolvable channels is fatal before any connection is attempted.
    pub async fn start(&mut self, logins: &[String], shutdown: watch::Receiver<bool>) -> Result<(), Error> {
        let resolver = IdentityResolver::new(self.helix.clone());
        self.channels = resolver.resolve(logins).await?;
        if self.channels.is_empty() {
            error!("[EventSub] None of {:?} resolved to a channel", logins);
            return Err(Error::NoChannels);
        }
        self.run(shutdown).await
    }

    /// Connects to the EventSub endpoint and drives it. Closes the socket best-effort on the way out.
    pub async fn run(&mut self, shutdown: watch::Receiver<bool>) -> Result<(), Error> {
        if self.channels.is_empty() {
            return Err(Error::NoChannels);
        }

        self.state = SessionState::Connecting;
        let (mut ws, _) = match connect_async(self.url.as_str()).await {
            Ok(pair) => pair,
            Err(e) => {
                error!("[EventSub] connect error: {}", e);
                self.state = SessionState::Disconnected;
                return Err(Error::WebSocket(e.to_string()));
            }
        };
        info!("[EventSub] connected → {}", self.url);

        let result = self.drive(&mut ws, shutdown).await;

        if let Err(e) = ws.close(None).await {
            trace!("[EventSub] close failed (ignored): {}", e);
        }
        result
    }

    /// Runs the handshake and receive loop over any websocket message stream.
    pub async fn drive<S>(&mut self, stream: &mut S, mut shutdown: watch::Receiver<bool>) -> Result<(), Error>
    where
        S: Stream<Item = Result<Message, WsError>> + Unpin,
    {
        self.state = SessionState::AwaitingWelcome;
        self.session = None;
        self.subscriptions.clear();

        let first = match next_inbound(stream, &mut shutdown, WELCOME_TIMEOUT).await {
            Ok(Inbound::Text(txt)) => txt,
            Ok(Inbound::Shutdown) => {
                info!("[EventSub] shutdown requested before welcome");
                self.state = SessionState::Closed;
                return Ok(());
            }
            Ok(Inbound::Closed) | Ok(Inbound::Ended) => {
                return Err(self.fault("connection closed before session_welcome".into()));
            }
            Err(e) => return Err(self.fault(format!("no session_welcome: {e}"))),
        };

        let info = match parse_frame(&first) {
            Ok(EventSubFrame::Welcome(info)) => info,
            _ => return Err(self.fault(format!("Unexpected first message: {first}"))),
        };
        info!(
            "[EventSub] session={} keepalive={}s",
            info.session_id,
            info.keepalive_timeout.as_secs()
        );
        let Some(keepalive_deadline) = info.keepalive_timeout.checked_add(KEEPALIVE_GRACE) else {
            return Err(self.fault(format!(
                "keepalive_timeout_seconds out of range: {}",
                info.keepalive_timeout.as_secs()
            )));
        };
        let session_id = info.session_id.clone();
        self.session = Some(info);

        self.state = SessionState::Subscribing;
        self.subscribe_all(&session_id).await;

        self.state = SessionState::Listening;
        loop {
            match next_inbound(stream, &mut shutdown, keepalive_deadline).await {
                Ok(Inbound::Text(txt)) => self.handle_text(&txt).await,
                Ok(Inbound::Shutdown) => {
                    info!("[EventSub] shutdown requested, closing session");
                    self.state = SessionState::Closed;
                    return Ok(());
                }
                Ok(Inbound::Closed) => {
                    info!("[EventSub] websocket closed gracefully.");
                    self.state = SessionState::Closed;
                    return Ok(());
                }
                Ok(Inbound::Ended) => {
                    warn!("[EventSub] stream ended without a close frame");
                    self.state = SessionState::Disconnected;
                    return Err(Error::WebSocket("connection dropped".into()));
                }
                Err(e) => {
                    error!("[EventSub] loop error: {}", e);
                    self.state = SessionState::Disconnected;
                    return Err(e);
                }
            }
        }
    }

    fn fault(&mut self, msg: String) -> Error {
        error!("[EventSub] {}", msg);
        self.state = SessionState::Faulted;
        Error::Protocol(msg)
    }

    /// One `channel.chat.message` subscription per channel. Failures skip that channel.
    async fn subscribe_all(&mut self, session_id: &str) {
        for channel in &self.channels {
            let request = SubscriptionRequest::chat_message(&channel.numeric_id, &self.bot_user_id, session_id);
            debug!("[EventSub] subscribing #{} => {:?}", channel.login, request);

            match self.helix.create_eventsub_subscription(&request).await {
                Ok(subscription_id) => {
                    info!("[EventSub] subscribed to #{} ({})", channel.login, channel.numeric_id);
                    self.subscriptions.insert(
                        channel.login.clone(),
                        Subscription {
                            channel_login: channel.login.clone(),
                            channel_id: channel.numeric_id.clone(),
                            subscription_id,
                        },
                    );
                }
                Err(e) => {
                    error!("[EventSub] could not subscribe to #{}: {}", channel.login, e);
                }
            }
        }

        if self.subscriptions.is_empty() {
            warn!("[EventSub] no chat subscriptions succeeded; listening anyway");
        }
    }

    async fn handle_text(&mut self, txt: &str) {
        let frame = match parse_frame(txt) {
            Ok(f) => f,
            Err(e) => {
                warn!("[EventSub] dropping unreadable frame ({}): {}", e, txt);
                return;
            }
        };

        if matches!(frame, EventSubFrame::Keepalive) {
            trace!("[EventSub] Received TEXT (health check): {}", txt);
        } else {
            debug!("[EventSub] Received TEXT: {}", txt);
        }

        match frame {
            EventSubFrame::Keepalive => {}
            EventSubFrame::Notification(env) => {
                if env.subscription.sub_type == CHAT_MESSAGE_TYPE {
                    self.handler.on_chat_event(&env.event).await;
                } else {
                    debug!("[EventSub] ignoring notification type={}", env.subscription.sub_type);
                }
            }
            EventSubFrame::Revocation(sub) => {
                let login = self
                    .subscriptions
                    .values()
                    .find(|s| s.subscription_id == sub.id)
                    .map(|s| s.channel_login.as_str())
                    .unwrap_or("?");
                warn!(
                    "[EventSub] subscription revoked: id={} type={} status={} channel=#{}",
                    sub.id, sub.sub_type, sub.status, login
                );
            }
            EventSubFrame::Reconnect { reconnect_url } => {
                warn!("[EventSub] server asked to reconnect to {:?}; not supported, ignoring", reconnect_url);
            }
            EventSubFrame::Welcome(info) => {
                warn!("[EventSub] unexpected second welcome (session={}), ignoring", info.session_id);
            }
            EventSubFrame::Unknown(t) => debug!("[EventSub] unhandled message_type={:?}", t),
        }
    }
}

/// Waits for the next text frame, skipping control and binary frames.
///
/// Every frame received resets `idle_timeout`; running out of it is a websocket error.
async fn next_inbound<S>(
    stream: &mut S,
    shutdown: &mut watch::Receiver<bool>,
    idle_timeout: Duration,
) -> Result<Inbound, Error>
where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
{
    loop {
        let next = tokio::select! {
            biased;
            _ = shutdown_requested(shutdown) => return Ok(Inbound::Shutdown),
            res = tokio::time::timeout(idle_timeout, stream.next()) => res,
        };

        let msg = match next {
            Err(_) => return Err(Error::WebSocket("keepalive timeout".into())),
            Ok(None) => return Ok(Inbound::Ended),
            Ok(Some(Err(e))) => return Err(Error::WebSocket(e.to_string())),
            Ok(Some(Ok(msg))) => msg,
        };

        match msg {
            Message::Text(txt) => return Ok(Inbound::Text(txt.as_str().to_owned())),
            Message::Close(frame) => {
                debug!("[EventSub] close frame: {:?}", frame);
                return Ok(Inbound::Closed);
            }
            _ => continue,
        }
    }
}

/// Resolves once the flag is `true`. Never resolves if the sender is gone.
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
