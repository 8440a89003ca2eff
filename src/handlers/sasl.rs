//! SASL PLAIN authentication during registration.
//!
//! ```text
//! -> CAP REQ :sasl
//! <- CAP * ACK :sasl          -> AUTHENTICATE PLAIN
//! <- AUTHENTICATE +           -> AUTHENTICATE <base64(user\0user\0pass)>
//! <- 903 / 904                -> CAP END
//! ```
//!
//! The authenticator never consumes messages, so the exchange is still
//! visible to user triggers and the incoming queue.

use parking_lot::Mutex;
use slirc_proto::sasl::{chunk_response, encode_plain_with_authzid, CAPABILITY, MECHANISM_PLAIN};
use slirc_proto::{command, response, Message};
use tracing::{debug, info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::trigger::Handler;
use crate::bot::Bot;

#[derive(Default, Zeroize, ZeroizeOnDrop)]
struct Credentials {
    username: String,
    password: String,
}

/// Drives the SASL PLAIN exchange for one bot.
#[derive(Default)]
pub struct SaslAuth {
    credentials: Mutex<Credentials>,
}

impl SaslAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the credentials used for the next exchange.
    pub fn set_credentials(&self, username: &str, password: &str) {
        let mut credentials = self.credentials.lock();
        credentials.zeroize();
        credentials.username.push_str(username);
        credentials.password.push_str(password);
    }

    /// Open the exchange by requesting the capability.
    pub fn begin(&self, bot: &Bot) {
        debug!("Requesting SASL capability");
        bot.send(command::cap_req(CAPABILITY));
    }

    fn is_ack(msg: &Message) -> bool {
        msg.command == "CAP" && msg.param(1) == Some("ACK") && msg.content.trim() == CAPABILITY
    }

    fn respond(&self, bot: &Bot) {
        let credentials = self.credentials.lock();
        let mut payload = encode_plain_with_authzid(
            &credentials.username,
            &credentials.username,
            &credentials.password,
        );
        drop(credentials);

        for chunk in chunk_response(&payload) {
            bot.send(command::authenticate(chunk));
        }
        payload.zeroize();
    }
}

impl Handler for SaslAuth {
    fn handle(&self, bot: &Bot, msg: &Message) -> bool {
        if Self::is_ack(msg) {
            bot.send(command::authenticate(MECHANISM_PLAIN));
        } else if msg.command == "AUTHENTICATE"
            && msg.param(0).unwrap_or(msg.content.as_str()) == "+"
        {
            self.respond(bot);
        } else if msg.command == response::RPL_SASLSUCCESS {
            info!("SASL authentication succeeded");
            bot.send(command::cap_end());
        } else if msg.command == response::ERR_SASLFAIL {
            warn!(reason = %msg.content, "SASL authentication failed");
            bot.send(command::cap_end());
        }
        false
    }
}
