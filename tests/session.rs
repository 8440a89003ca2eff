//! Integration tests for the session engine.
//!
//! Each test runs a bot against a scripted server on localhost.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use common::server::WAIT;
use common::{test_config, MockServer};
use slirc_bot::{Bot, BotError, SessionState, Trigger};
use tokio::time::timeout;

#[tokio::test]
async fn registers_with_pass_user_nick() -> anyhow::Result<()> {
    let server = MockServer::bind().await?;
    let mut config = test_config(&server.address(), "regbot");
    config.password = Some("hunter2".into());
    config.realname = Some("Registration Bot".into());

    let (bot, _incoming) = Bot::new(config)?;
    let running = bot.start().await?;
    let mut conn = server.accept().await?;

    assert_eq!(conn.recv_line().await?, "PASS hunter2");
    assert_eq!(conn.recv_line().await?, "USER regbot 8 * :Registration Bot");
    assert_eq!(conn.recv_line().await?, "NICK regbot");
    assert_eq!(bot.state(), SessionState::Registering);

    conn.send_raw(":irc.test 001 regbot :Welcome").await?;
    let mut state = bot.watch_state();
    timeout(WAIT, state.wait_for(|s| s.is_active())).await??;

    bot.close();
    running.wait().await?;
    assert_eq!(bot.state(), SessionState::Disconnected);
    Ok(())
}

#[tokio::test]
async fn registers_without_pass_by_default() -> anyhow::Result<()> {
    let server = MockServer::bind().await?;
    let (bot, _incoming) = Bot::new(test_config(&server.address(), "nopass"))?;
    let running = bot.start().await?;
    let mut conn = server.accept().await?;

    // realname defaults to the nick
    assert_eq!(conn.recv_line().await?, "USER nopass 8 * :nopass");
    assert_eq!(conn.recv_line().await?, "NICK nopass");

    bot.close();
    running.wait().await?;
    Ok(())
}

#[tokio::test]
async fn ping_is_answered_and_not_delivered() -> anyhow::Result<()> {
    let server = MockServer::bind().await?;
    let (bot, mut incoming) = Bot::new(test_config(&server.address(), "pingbot"))?;
    let running = bot.start().await?;
    let mut conn = server.accept().await?;
    conn.register("pingbot").await?;

    conn.send_raw("PING :irc.test").await?;
    assert_eq!(conn.recv_line().await?, "PONG :irc.test");
    conn.send_raw(":alice!a@example.org PRIVMSG pingbot :hello").await?;

    let welcome = timeout(WAIT, incoming.recv()).await?.context("queue closed")?;
    assert_eq!(welcome.command, "001");
    let next = timeout(WAIT, incoming.recv()).await?.context("queue closed")?;
    assert_eq!(next.command, "PRIVMSG");
    assert_eq!(next.content, "hello");
    assert_eq!(next.from, "alice");

    bot.close();
    running.wait().await?;
    Ok(())
}

#[tokio::test]
async fn consuming_trigger_suppresses_delivery() -> anyhow::Result<()> {
    let server = MockServer::bind().await?;
    let (bot, mut incoming) = Bot::new(test_config(&server.address(), "trigbot"))?;

    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    bot.add_trigger(Trigger::new(
        |_, msg| msg.command == "PRIVMSG",
        move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        },
    ));
    bot.add_trigger(Trigger::new(
        |_, msg| msg.command == "PRIVMSG" && msg.content == "-info",
        |bot, msg| {
            bot.reply(msg, "trigbot here");
            true
        },
    ));

    let running = bot.start().await?;
    let mut conn = server.accept().await?;
    conn.register("trigbot").await?;

    conn.send_raw(":alice!a@example.org PRIVMSG #rust :-info").await?;
    assert_eq!(conn.recv_line().await?, "PRIVMSG #rust :trigbot here");
    conn.send_raw(":alice!a@example.org PRIVMSG #rust :just chatting").await?;

    let msg = timeout(WAIT, incoming.wait_for(|m| m.command == "PRIVMSG"))
        .await?
        .context("queue closed")?;
    assert_eq!(msg.content, "just chatting");
    assert_eq!(seen.load(Ordering::SeqCst), 2);

    bot.close();
    running.wait().await?;
    Ok(())
}

#[tokio::test]
async fn joins_configured_channels_once() -> anyhow::Result<()> {
    let server = MockServer::bind().await?;
    let mut config = test_config(&server.address(), "joinbot");
    config.channels = vec!["#rust".into(), "#secret:hunter2".into()];
    let (bot, _incoming) = Bot::new(config)?;
    let running = bot.start().await?;
    let mut conn = server.accept().await?;

    conn.register("joinbot").await?;
    assert_eq!(conn.recv_line().await?, "JOIN #rust");
    assert_eq!(conn.recv_line().await?, "JOIN #secret hunter2");

    // end of MOTD also marks registration; nothing is joined twice
    conn.send_raw(":irc.test 376 joinbot :End of /MOTD command.").await?;
    conn.send_raw("PING :sync").await?;
    assert_eq!(conn.recv_line().await?, "PONG :sync");

    conn.send_raw(":joinbot!~jb@bots.example.org JOIN #rust").await?;
    conn.send_raw(":alice!a@example.org JOIN #rust").await?;
    conn.send_raw(":alice!a@example.org PRIVMSG #rust :hi").await?;
    conn.send_raw("PING :tracked").await?;
    assert_eq!(conn.recv_line().await?, "PONG :tracked");

    let channel = bot.channel("#rust").context("not tracking #rust")?;
    assert!(channel.user("alice").is_some());
    assert_eq!(channel.count("alice"), 1);
    assert_eq!(bot.prefix().to_string(), "joinbot!~jb@bots.example.org");

    bot.close();
    running.wait().await?;
    Ok(())
}

#[tokio::test]
async fn throttle_spaces_outbound_lines() -> anyhow::Result<()> {
    let server = MockServer::bind().await?;
    let mut config = test_config(&server.address(), "slowbot");
    config.throttle_delay_ms = 100;
    let (bot, _incoming) = Bot::new(config)?;
    let running = bot.start().await?;
    let mut conn = server.accept().await?;
    conn.register("slowbot").await?;

    for n in 1..=3 {
        bot.msg("#rust", &format!("line {n}"));
    }
    assert_eq!(conn.recv_line().await?, "PRIVMSG #rust :line 1");
    let first = Instant::now();
    assert_eq!(conn.recv_line().await?, "PRIVMSG #rust :line 2");
    assert_eq!(conn.recv_line().await?, "PRIVMSG #rust :line 3");
    assert!(first.elapsed() >= Duration::from_millis(180));

    bot.close();
    running.wait().await?;
    Ok(())
}

#[tokio::test]
async fn silent_server_ends_session() -> anyhow::Result<()> {
    let server = MockServer::bind().await?;
    let mut config = test_config(&server.address(), "idlebot");
    config.ping_timeout_ms = 300;
    let (bot, mut incoming) = Bot::new(config)?;
    let running = bot.start().await?;
    let mut conn = server.accept().await?;
    conn.register("idlebot").await?;

    let never = timeout(WAIT, incoming.wait_for(|m| m.command == "PRIVMSG")).await?;
    assert!(never.is_none());
    assert!(conn.closed().await);

    timeout(WAIT, running.wait()).await??;
    assert_eq!(bot.state(), SessionState::Disconnected);
    Ok(())
}

#[tokio::test]
async fn server_disconnect_closes_incoming() -> anyhow::Result<()> {
    let server = MockServer::bind().await?;
    let (bot, mut incoming) = Bot::new(test_config(&server.address(), "dropbot"))?;
    let running = bot.start().await?;
    let mut conn = server.accept().await?;
    conn.register("dropbot").await?;
    conn.send_raw("ERROR :Closing link").await?;
    drop(conn);

    let error = timeout(WAIT, incoming.wait_for(|m| m.command == "ERROR"))
        .await?
        .context("ERROR not delivered")?;
    assert_eq!(error.content, "Closing link");
    assert!(timeout(WAIT, incoming.recv()).await?.is_none());

    timeout(WAIT, running.wait()).await??;
    Ok(())
}

#[tokio::test]
async fn close_hangs_up() -> anyhow::Result<()> {
    let server = MockServer::bind().await?;
    let (bot, mut incoming) = Bot::new(test_config(&server.address(), "quitbot"))?;
    let running = bot.start().await?;
    let mut conn = server.accept().await?;
    conn.register("quitbot").await?;

    bot.close();
    assert!(conn.closed().await);
    assert!(timeout(WAIT, incoming.wait_for(|_| false)).await?.is_none());
    running.wait().await?;
    Ok(())
}

#[tokio::test]
async fn dial_failure_is_returned() -> anyhow::Result<()> {
    // bind and drop to get a port nobody listens on
    let address = MockServer::bind().await?.address();
    let (bot, _incoming) = Bot::new(test_config(&address, "lonelybot"))?;

    let err = bot.start().await.unwrap_err();
    assert!(matches!(err, BotError::Connect { .. }), "{err}");
    assert_eq!(bot.state(), SessionState::Disconnected);
    Ok(())
}

#[tokio::test]
async fn second_start_is_rejected() -> anyhow::Result<()> {
    let server = MockServer::bind().await?;
    let (bot, _incoming) = Bot::new(test_config(&server.address(), "oncebot"))?;
    let running = bot.start().await?;
    let _conn = server.accept().await?;

    assert!(matches!(bot.start().await, Err(BotError::AlreadyStarted)));

    bot.close();
    running.wait().await?;
    Ok(())
}
