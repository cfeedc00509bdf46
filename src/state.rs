//! Persisted panel state codec
//!
//! Every panel stores one binary blob under its id: a fixed 24-byte header
//! followed by the panel's own opaque view bytes.
//!
//! ```text
//! offset  size  field
//!      0     4  rect.left     i32 LE
//!      4     4  rect.top      i32 LE
//!      8     4  rect.right    i32 LE
//!     12     4  rect.bottom   i32 LE
//!     16     4  dock slot     i32 LE
//!     20     4  flags         i32 LE  (bit0 open, bit1 docked)
//!     24     …  view trailer  opaque
//! ```
//!
//! The header is always little-endian so a blob written on one host
//! platform loads unchanged on another.

use thiserror::Error;

use crate::geometry::Rect;

/// Size of the fixed header in bytes
pub const HEADER_LEN: usize = 24;

const FLAG_OPEN: i32 = 1;
const FLAG_DOCKED: i32 = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("state blob too short: {len} bytes, header needs {HEADER_LEN}")]
    Truncated { len: usize },
}

/// Geometry and dock placement of a panel
///
/// This record survives while the window is closed so the next `show`
/// can restore it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelState {
    /// Floating window rectangle in screen coordinates
    pub rect: Rect,
    /// Which docker the panel last occupied
    pub dock_slot: i32,
    /// Raw flag word; unknown bits are carried through untouched
    pub flags: i32,
}

impl PanelState {
    pub fn is_open(&self) -> bool {
        self.flags & FLAG_OPEN != 0
    }

    pub fn is_docked(&self) -> bool {
        self.flags & FLAG_DOCKED != 0
    }

    pub fn set_open(&mut self, open: bool) {
        if open {
            self.flags |= FLAG_OPEN;
        } else {
            self.flags &= !FLAG_OPEN;
        }
    }

    pub fn set_docked(&mut self, docked: bool) {
        if docked {
            self.flags |= FLAG_DOCKED;
        } else {
            self.flags &= !FLAG_DOCKED;
        }
    }

    pub fn toggle_docked(&mut self) {
        self.flags ^= FLAG_DOCKED;
    }

    /// Append the little-endian header to `out`
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        for word in [
            self.rect.left,
            self.rect.top,
            self.rect.right,
            self.rect.bottom,
            self.dock_slot,
            self.flags,
        ] {
            out.extend_from_slice(&word.to_le_bytes());
        }
    }

    /// Decode the header from the front of `bytes`
    pub fn decode(bytes: &[u8]) -> Result<Self, StateError> {
        if bytes.len() < HEADER_LEN {
            return Err(StateError::Truncated { len: bytes.len() });
        }
        let word = |i: usize| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&bytes[i * 4..i * 4 + 4]);
            i32::from_le_bytes(raw)
        };
        Ok(Self {
            rect: Rect::new(word(0), word(1), word(2), word(3)),
            dock_slot: word(4),
            flags: word(5),
        })
    }
}

/// Encode a header plus view trailer into a single blob
pub fn encode(state: &PanelState, view: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + view.len());
    state.encode_into(&mut out);
    out.extend_from_slice(view);
    out
}

/// Split a blob into its header and view trailer
pub fn decode(bytes: &[u8]) -> Result<(PanelState, &[u8]), StateError> {
    let state = PanelState::decode(bytes)?;
    Ok((state, &bytes[HEADER_LEN..]))
}
