//! Per-user mode bitmask.

/// Modes known for a user in a channel, as a bitmask.
///
/// Letters: `a` away, `i` invisible, `w` wallops, `r` restricted,
/// `o` operator, `O` local operator, `s` server notices, `v` voice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct UserModes(u32);

impl UserModes {
    pub const AWAY: Self = Self(1);
    pub const INVISIBLE: Self = Self(1 << 1);
    pub const WALLOPS: Self = Self(1 << 2);
    pub const RESTRICTED: Self = Self(1 << 3);
    pub const OPERATOR: Self = Self(1 << 4);
    pub const LOCAL_OPERATOR: Self = Self(1 << 5);
    pub const SERVER_NOTICES: Self = Self(1 << 6);
    pub const VOICE: Self = Self(1 << 7);

    /// The flag for a mode letter, if it is one we track.
    pub fn from_char(c: char) -> Option<Self> {
        let flag = match c {
            'a' => Self::AWAY,
            'i' => Self::INVISIBLE,
            'w' => Self::WALLOPS,
            'r' => Self::RESTRICTED,
            'o' => Self::OPERATOR,
            'O' => Self::LOCAL_OPERATOR,
            's' => Self::SERVER_NOTICES,
            'v' => Self::VOICE,
            _ => return None,
        };
        Some(flag)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Apply a single signed letter, e.g. `('+', 'o')`. Unknown letters are ignored.
    pub fn apply(&mut self, adding: bool, letter: char) {
        if let Some(flag) = Self::from_char(letter) {
            if adding {
                self.insert(flag);
            } else {
                self.remove(flag);
            }
        }
    }
}
