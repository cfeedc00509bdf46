//! Keystrokes delivered by the host accelerator hook, and what a panel
//! answers back

use std::fmt;

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);

    pub const fn new(ctrl: bool, shift: bool, alt: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 0b0001;
        }
        if shift {
            bits |= 0b0010;
        }
        if alt {
            bits |= 0b0100;
        }
        Modifiers(bits)
    }

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0001 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0010 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0100 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The same set with shift cleared
    #[inline]
    pub const fn without_shift(self) -> Modifiers {
        Modifiers(self.0 & !0b0010)
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl() {
            parts.push("Ctrl");
        }
        if self.shift() {
            parts.push("Shift");
        }
        if self.alt() {
            parts.push("Alt");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// Keys the framework distinguishes; everything else arrives as `Other`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key (normalized to lowercase)
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    /// Host virtual-key code with no named variant
    Other(u32),
}

/// Whether the key went down or up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyPhase {
    Down,
    Up,
}

/// A keystroke as seen by the accelerator hook
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub mods: Modifiers,
    pub phase: KeyPhase,
}

impl KeyEvent {
    pub const fn down(key: KeyCode, mods: Modifiers) -> Self {
        Self {
            key,
            mods,
            phase: KeyPhase::Down,
        }
    }

    pub const fn up(key: KeyCode, mods: Modifiers) -> Self {
        Self {
            key,
            mods,
            phase: KeyPhase::Up,
        }
    }

    pub fn char(c: char, mods: Modifiers) -> Self {
        Self::down(KeyCode::Char(c.to_ascii_lowercase()), mods)
    }

    pub fn is_down(&self) -> bool {
        self.phase == KeyPhase::Down
    }
}

/// Answer to the host's accelerator hook
///
/// The host ABI encodes these as integers; see [`KeyDisposition::code`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Not ours; the host continues its normal processing
    Ignored,
    /// Consumed by the panel
    Handled,
    /// Let the focused native control process it and nobody else
    ToControl,
    /// The panel has focus but doesn't want the key; run the host's global
    /// action for it
    PassToHost,
}

impl KeyDisposition {
    pub const fn code(self) -> i32 {
        match self {
            KeyDisposition::Ignored => 0,
            KeyDisposition::Handled => 1,
            KeyDisposition::ToControl => -1,
            KeyDisposition::PassToHost => -666,
        }
    }

    pub const fn is_claimed(self) -> bool {
        !matches!(self, KeyDisposition::Ignored)
    }
}
