//! Byte classification.
//!
//! A fixed 256-entry table decides in O(1) whether a byte starts a markup
//! construct. Only ASCII bytes are ever triggers, so continuation bytes of
//! multi-byte sequences always fall through to plain text without decoding.

/// A byte that may start a markup construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Star,
    Tilde,
    Backtick,
    Backslash,
    Underscore,
    Bang,
    OpenBracket,
    CloseBracket,
}

impl Trigger {
    pub const fn byte(self) -> u8 {
        match self {
            Trigger::Star => b'*',
            Trigger::Tilde => b'~',
            Trigger::Backtick => b'`',
            Trigger::Backslash => b'\\',
            Trigger::Underscore => b'_',
            Trigger::Bang => b'!',
            Trigger::OpenBracket => b'[',
            Trigger::CloseBracket => b']',
        }
    }
}

const ALL: [Trigger; 8] = [
    Trigger::Star,
    Trigger::Tilde,
    Trigger::Backtick,
    Trigger::Backslash,
    Trigger::Underscore,
    Trigger::Bang,
    Trigger::OpenBracket,
    Trigger::CloseBracket,
];

static TABLE: [Option<Trigger>; 256] = build_table();

const fn build_table() -> [Option<Trigger>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < ALL.len() {
        table[ALL[i].byte() as usize] = Some(ALL[i]);
        i += 1;
    }
    table
}

/// Look up the trigger owning `byte`, if any.
#[inline]
pub fn classify(byte: u8) -> Option<Trigger> {
    TABLE[byte as usize]
}

/// Whether `ch` is one of the trigger characters.
pub fn is_trigger_char(ch: char) -> bool {
    ch.is_ascii() && classify(ch as u8).is_some()
}
