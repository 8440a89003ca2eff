//! Handler trait and closure triggers.

use parking_lot::Once;
use slirc_proto::Message;

use crate::bot::Bot;

/// Something that reacts to inbound messages.
///
/// `handle` runs on the session's read path, so it should queue work rather
/// than block. Return `true` to consume the message: later handlers do not
/// see it and it is not delivered to the incoming queue.
pub trait Handler: Send + Sync {
    fn handle(&self, bot: &Bot, msg: &Message) -> bool;
}

type Condition = Box<dyn Fn(&Bot, &Message) -> bool + Send + Sync>;
type Action = Box<dyn Fn(&Bot, &Message) -> bool + Send + Sync>;

/// A condition and an action. The action runs only when the condition holds.
///
/// ```no_run
/// use slirc_bot::Trigger;
///
/// let hello = Trigger::new(
///     |_, msg| msg.command == "PRIVMSG" && msg.content == "-hello",
///     |bot, msg| {
///         bot.reply(msg, "hello!");
///         false
///     },
/// );
/// ```
pub struct Trigger {
    condition: Condition,
    action: Action,
}

impl Trigger {
    pub fn new<C, A>(condition: C, action: A) -> Self
    where
        C: Fn(&Bot, &Message) -> bool + Send + Sync + 'static,
        A: Fn(&Bot, &Message) -> bool + Send + Sync + 'static,
    {
        Self {
            condition: Box::new(condition),
            action: Box::new(action),
        }
    }

    /// Wrap this trigger so its action runs at most once.
    pub fn once(self) -> OnceTrigger {
        OnceTrigger {
            trigger: self,
            fired: Once::new(),
        }
    }
}

impl Handler for Trigger {
    fn handle(&self, bot: &Bot, msg: &Message) -> bool {
        (self.condition)(bot, msg) && (self.action)(bot, msg)
    }
}

/// A [`Trigger`] whose action fires on the first matching message only.
pub struct OnceTrigger {
    trigger: Trigger,
    fired: Once,
}

impl OnceTrigger {
    pub fn has_fired(&self) -> bool {
        self.fired.state().done()
    }
}

impl Handler for OnceTrigger {
    fn handle(&self, bot: &Bot, msg: &Message) -> bool {
        if self.has_fired() || !(self.trigger.condition)(bot, msg) {
            return false;
        }
        let mut consumed = false;
        self.fired
            .call_once(|| consumed = (self.trigger.action)(bot, msg));
        consumed
    }
}
