//! slircbot - run an IRC bot from a TOML config file.

use slirc_bot::config::{validate, Config, LogFormat};
use slirc_bot::{Bot, Trigger};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "slircbot.toml".to_string());
    let config = Config::load(&config_path)?;

    init_tracing(config.logging.format);

    if let Err(errors) = validate(&config.bot) {
        for e in &errors {
            error!(path = %config_path, "Invalid config: {}", e);
        }
        anyhow::bail!("{} configuration error(s) in {}", errors.len(), config_path);
    }

    info!(
        host = %config.bot.host,
        nick = %config.bot.nick,
        tls = config.bot.ssl,
        hijack = config.bot.hijack,
        "Starting slircbot"
    );

    let (bot, mut incoming) = Bot::new(config.bot)?;
    bot.add_trigger(Trigger::new(
        |_, msg| msg.command == "PRIVMSG" && msg.content.trim() == "-info",
        |bot, msg| {
            bot.reply(msg, concat!("slircbot ", env!("CARGO_PKG_VERSION")));
            true
        },
    ));
    bot.add_trigger(Trigger::new(
        |_, msg| msg.command == "PRIVMSG" && msg.content.trim() == "-uptime",
        |bot, msg| {
            let text = format!(
                "Started: {}, Uptime: {}s",
                bot.started_at().format("%Y-%m-%d %H:%M:%S UTC"),
                bot.uptime().as_secs()
            );
            bot.reply(msg, &text);
            true
        },
    ));

    let running = bot.start().await?;

    let printer = tokio::spawn(async move {
        while let Some(msg) = incoming.recv().await {
            if msg.command == "PRIVMSG" {
                info!(from = %msg.from, to = %msg.to, "{}", msg.content);
            }
        }
    });

    let session = running.wait();
    tokio::pin!(session);
    let result = tokio::select! {
        result = &mut session => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, closing session");
            bot.close();
            session.await
        }
    };
    let _ = printer.await;

    if let Err(e) = &result {
        error!(error = %e, "Session failed");
    }
    info!("slircbot stopped");
    result.map_err(Into::into)
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
