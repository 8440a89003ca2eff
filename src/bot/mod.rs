//! The bot handle.
//!
//! [`Bot`] is a cheap clone over shared session state. Triggers receive a
//! `&Bot` and use the same send helpers as external code.

mod incoming;
mod send;

pub use incoming::Incoming;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, Once, RwLock};
use slirc_proto::{Message, Prefix};
use tokio::sync::{mpsc, watch};
use tokio_rustls::rustls::ClientConfig;
use tokio_util::sync::CancellationToken;
use tracing::{info_span, Instrument, Span};

use crate::config::{validate, BotConfig};
use crate::error::BotError;
use crate::handlers::{builtin, Handler, Registry, SaslAuth};
use crate::network::connection::{self, SessionQueues};
use crate::network::handoff::HandoffAddr;
use crate::network::Running;
use crate::state::{Channel, Channels, SessionState};

/// Capacity of the incoming queue. A consumer this far behind stalls reads.
const INCOMING_CAPACITY: usize = 64;

/// Builder for a [`Bot`]. Options apply once, at [`BotBuilder::build`].
pub struct BotBuilder {
    config: BotConfig,
    span: Option<Span>,
    tls: Option<Arc<ClientConfig>>,
}

impl BotBuilder {
    /// Log through `span` instead of the default `bot{host, nick}` span.
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// TLS client settings for `ssl` sessions. Defaults to the platform roots.
    pub fn tls_config(mut self, config: Arc<ClientConfig>) -> Self {
        self.tls = Some(config);
        self
    }

    /// Validate the config and create the bot with its built-in triggers.
    pub fn build(self) -> Result<(Bot, Incoming), BotError> {
        validate(&self.config).map_err(BotError::Config)?;

        let span = self.span.unwrap_or_else(|| {
            info_span!("bot", host = %self.config.host, nick = %self.config.nick)
        });
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let (incoming_tx, incoming_rx) = mpsc::channel(INCOMING_CAPACITY);
        let (state, _) = watch::channel(SessionState::Disconnected);

        let inner = BotInner {
            nick: RwLock::new(self.config.nick.clone()),
            prefix: RwLock::new(Prefix::placeholder(&self.config.nick)),
            channels: Channels::new(self.config.stats_dir().map(Into::into)),
            registry: Registry::new(),
            sasl: Arc::new(SaslAuth::new()),
            sasl_installed: Once::new(),
            outgoing: outgoing_tx,
            queues: Mutex::new(Some(SessionQueues {
                outgoing: outgoing_rx,
                incoming: incoming_tx,
            })),
            state,
            shutdown: CancellationToken::new(),
            started_at: Utc::now(),
            span,
            tls: self.tls,
            config: self.config,
        };
        let bot = Bot {
            inner: Arc::new(inner),
        };

        // PING first, so keepalives never wait behind user triggers.
        bot.add_trigger(builtin::ping_pong());
        bot.add_trigger(builtin::capture_own_prefix());
        bot.add_trigger(builtin::track_own_nick());
        bot.add_trigger(builtin::join_channels());

        Ok((bot, Incoming::new(incoming_rx)))
    }
}

struct BotInner {
    config: BotConfig,
    nick: RwLock<String>,
    prefix: RwLock<Prefix>,
    channels: Channels,
    registry: Registry,
    sasl: Arc<SaslAuth>,
    sasl_installed: Once,
    outgoing: mpsc::UnboundedSender<String>,
    /// Taken by the session when it starts.
    queues: Mutex<Option<SessionQueues>>,
    state: watch::Sender<SessionState>,
    shutdown: CancellationToken,
    started_at: DateTime<Utc>,
    span: Span,
    tls: Option<Arc<ClientConfig>>,
}

/// An IRC bot: one server session plus its triggers and channel state.
///
/// ```no_run
/// use slirc_bot::{Bot, BotConfig, Trigger};
///
/// # async fn run() -> Result<(), slirc_bot::BotError> {
/// let mut config = BotConfig::new("irc.libera.chat:6667", "slircbot");
/// config.channels = vec!["#slircbot".into()];
///
/// let (bot, mut incoming) = Bot::new(config)?;
/// bot.add_trigger(Trigger::new(
///     |_, msg| msg.command == "PRIVMSG" && msg.content == "-ping",
///     |bot, msg| {
///         bot.reply(msg, "pong");
///         true
///     },
/// ));
///
/// let running = bot.start().await?;
/// while let Some(msg) = incoming.recv().await {
///     println!("{msg}");
/// }
/// running.wait().await
/// # }
/// ```
#[derive(Clone)]
pub struct Bot {
    inner: Arc<BotInner>,
}

impl Bot {
    pub fn builder(config: BotConfig) -> BotBuilder {
        BotBuilder {
            config,
            span: None,
            tls: None,
        }
    }

    /// Build a bot with default options.
    pub fn new(config: BotConfig) -> Result<(Bot, Incoming), BotError> {
        Self::builder(config).build()
    }

    // === Session ===

    /// Connect (or take over a running instance's connection) and start the
    /// session in the background.
    ///
    /// Dial failures are returned here. Later failures end the session and
    /// close the incoming queue.
    pub async fn start(&self) -> Result<Running, BotError> {
        let queues = self
            .inner
            .queues
            .lock()
            .take()
            .ok_or(BotError::AlreadyStarted)?;
        let span = self.inner.span.clone();
        connection::start(self, queues).instrument(span).await
    }

    /// [`start`](Self::start), then wait for the session to end.
    pub async fn run(&self) -> Result<(), BotError> {
        self.start().await?.wait().await
    }

    /// End the session. The incoming queue closes once the read loop stops.
    pub fn close(&self) {
        self.inner.shutdown.cancel();
    }

    pub fn state(&self) -> SessionState {
        *self.inner.state.borrow()
    }

    /// Subscribe to session state changes.
    pub fn watch_state(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    // === Triggers ===

    /// Register a handler. Handlers run in registration order.
    pub fn add_trigger(&self, handler: impl Handler + 'static) {
        self.add_handler(Arc::new(handler));
    }

    pub fn add_handler(&self, handler: Arc<dyn Handler>) {
        self.inner.registry.add(handler);
    }

    /// Start SASL PLAIN: install the authenticator (once) and request the
    /// capability. Registration must follow with NICK and USER.
    pub fn sasl_authenticate(&self, username: &str, password: &str) {
        let sasl = &self.inner.sasl;
        sasl.set_credentials(username, password);
        self.inner
            .sasl_installed
            .call_once(|| self.add_handler(Arc::clone(sasl) as Arc<dyn Handler>));
        sasl.begin(self);
    }

    // === Identity ===

    pub fn config(&self) -> &BotConfig {
        &self.inner.config
    }

    /// Current nick, following server-confirmed changes.
    pub fn nick(&self) -> String {
        self.inner.nick.read().clone()
    }

    /// Our prefix as the server sees it. A padded placeholder until the
    /// server has echoed one of our JOINs.
    pub fn prefix(&self) -> Prefix {
        self.inner.prefix.read().clone()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.inner.started_at
    }

    pub fn uptime(&self) -> Duration {
        (Utc::now() - self.inner.started_at)
            .to_std()
            .unwrap_or_default()
    }

    // === Channels ===

    /// Snapshot of a joined channel.
    pub fn channel(&self, name: &str) -> Option<Channel> {
        self.inner.channels.get(name)
    }

    /// Names of the joined channels.
    pub fn channels(&self) -> Vec<String> {
        self.inner.channels.names()
    }

    // === Session internals ===

    /// Run dispatch and channel tracking for one inbound message.
    /// Returns `true` if a handler consumed it.
    pub(crate) fn process(&self, msg: &Message) -> bool {
        if msg.is_numeric() {
            self.inner.state.send_if_modified(|state| {
                let registering = *state == SessionState::Registering;
                if registering {
                    *state = SessionState::Active;
                }
                registering
            });
        }

        let consumed = self.inner.registry.dispatch(self, msg);
        self.inner.channels.observe(&self.nick(), msg);
        consumed
    }

    pub(crate) fn set_state(&self, state: SessionState) {
        self.inner.state.send_replace(state);
    }

    pub(crate) fn set_prefix(&self, prefix: Prefix) {
        *self.inner.prefix.write() = prefix;
    }

    pub(crate) fn set_current_nick(&self, nick: &str) {
        *self.inner.nick.write() = nick.to_owned();
    }

    pub(crate) fn shutdown_token(&self) -> CancellationToken {
        self.inner.shutdown.clone()
    }

    pub(crate) fn span(&self) -> &Span {
        &self.inner.span
    }

    pub(crate) fn tls_config(&self) -> Option<Arc<ClientConfig>> {
        self.inner.tls.clone()
    }

    pub(crate) fn handoff_addr(&self) -> HandoffAddr {
        HandoffAddr::new(&self.inner.config.host, &self.inner.config.nick)
    }

    #[cfg(test)]
    pub(crate) fn take_outgoing(&self) -> Option<mpsc::UnboundedReceiver<String>> {
        self.inner.queues.lock().take().map(|queues| queues.outgoing)
    }
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("host", &self.inner.config.host)
            .field("nick", &*self.inner.nick.read())
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BotConfig {
        let mut config = BotConfig::new("localhost:6667", "bot");
        config.stats_dir = Default::default();
        config
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = Bot::new(BotConfig::new("no-port", "bot")).unwrap_err();
        assert!(matches!(err, BotError::Config(errors) if errors.len() == 1));
    }

    #[test]
    fn new_bot_has_defaults() {
        let (bot, _incoming) = Bot::new(config()).unwrap();
        assert_eq!(bot.nick(), "bot");
        assert_eq!(bot.prefix(), Prefix::placeholder("bot"));
        assert_eq!(bot.state(), SessionState::Disconnected);
        assert!(bot.channels().is_empty());
        assert!(bot.uptime() < Duration::from_secs(60));
    }

    #[test]
    fn first_numeric_activates_registering_session() {
        let (bot, _incoming) = Bot::new(config()).unwrap();
        let _out = bot.take_outgoing();

        bot.set_state(SessionState::Registering);
        bot.process(&Message::parse(":srv NOTICE * :hello").unwrap());
        assert_eq!(bot.state(), SessionState::Registering);

        bot.process(&Message::parse(":srv 001 bot :Welcome").unwrap());
        assert_eq!(bot.state(), SessionState::Active);
    }

    #[test]
    fn ping_is_consumed_before_user_triggers() {
        let (bot, _incoming) = Bot::new(config()).unwrap();
        let mut out = bot.take_outgoing().unwrap();
        bot.add_trigger(crate::Trigger::new(
            |_, msg| msg.command == "PING",
            |_, _| panic!("user trigger saw a PING"),
        ));

        assert!(bot.process(&Message::parse("PING :abc").unwrap()));
        assert_eq!(out.try_recv().unwrap(), "PONG :abc");
    }

    #[test]
    fn own_join_is_tracked() {
        let (bot, _incoming) = Bot::new(config()).unwrap();
        let _out = bot.take_outgoing();

        bot.process(&Message::parse(":bot!~b@example.org JOIN #rust").unwrap());
        assert_eq!(bot.prefix().host, "example.org");
        assert!(bot.channel("#rust").is_some());
    }

    #[test]
    fn sasl_handler_installed_once() {
        let (bot, _incoming) = Bot::new(config()).unwrap();
        let mut out = bot.take_outgoing().unwrap();
        let builtins = bot.inner.registry.len();

        bot.sasl_authenticate("bot", "pw");
        bot.sasl_authenticate("bot", "pw2");
        assert_eq!(bot.inner.registry.len(), builtins + 1);
        assert_eq!(out.try_recv().unwrap(), "CAP REQ :sasl");
    }

    #[tokio::test]
    async fn start_without_queues_fails() {
        let (bot, _incoming) = Bot::new(config()).unwrap();
        let _out = bot.take_outgoing();
        assert!(matches!(bot.start().await, Err(BotError::AlreadyStarted)));
    }
}
