//! Trigger handlers.
//!
//! Every inbound message is offered to the registered handlers in order.
//! The first handler that reports the message as consumed stops the walk and
//! keeps the message off the incoming queue.
//!
//! - [`trigger`]: the [`Handler`] trait and closure-based [`Trigger`]s
//! - [`registry`]: the ordered handler list and dispatch
//! - [`builtin`]: handlers every bot installs (PING, auto-join, own prefix)
//! - [`sasl`]: the SASL PLAIN authenticator

pub(crate) mod builtin;
mod registry;
mod sasl;
mod trigger;

pub use registry::Registry;
pub use sasl::SaslAuth;
pub use trigger::{Handler, OnceTrigger, Trigger};
