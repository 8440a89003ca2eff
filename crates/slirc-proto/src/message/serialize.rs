use std::fmt;

use super::types::Message;

impl fmt::Display for Message {
    /// Render back to wire form, without the line terminator.
    ///
    /// The trailing parameter is emitted only when non-empty, so the output
    /// reparses to the same prefix, command, params and content.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", prefix)?;
        }
        f.write_str(&self.command)?;
        for param in &self.params {
            write!(f, " {}", param)?;
        }
        if !self.content.is_empty() {
            write!(f, " :{}", self.content)?;
        }
        Ok(())
    }
}
