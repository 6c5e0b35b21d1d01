//! Persisted knob value: `"[<node bits>,<item bits>]"`.
//!
//! The encoder is strict. The decoder is a best-effort scanner because the
//! host's free-text layer has been known to mangle this string.

use serde::{Deserialize, Serialize};

use crate::bits::{StateBits, CHECKED, UNCHECKED};

/// Terminates the node field.
pub const FIELD_SEPARATOR: u8 = b',';

/// Terminates the item field.
pub const CLOSE: u8 = b']';

/// Both state fields of a knob.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KnobValue {
    pub node_states: StateBits,
    pub item_states: StateBits,
}

impl KnobValue {
    pub fn new(node_states: StateBits, item_states: StateBits) -> Self {
        Self {
            node_states,
            item_states,
        }
    }

    /// Strict encoding. An empty value is `"[,]"`.
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.node_states.len() + self.item_states.len() + 3);
        out.push('[');
        out.push_str(self.node_states.as_str());
        out.push(FIELD_SEPARATOR as char);
        out.push_str(self.item_states.as_str());
        out.push(CLOSE as char);
        out
    }

    /// Tolerant decoding; never fails.
    ///
    /// Bytes other than `0`, `1`, `,` and `]` are skipped. `,` ends the node
    /// field, `]` ends the item field, and anything after that is ignored.
    /// The opening `[` is skipped like any other stray byte.
    pub fn deserialize(text: &str) -> Self {
        let mut bytes = text.bytes();
        let mut node_states = StateBits::new();
        let mut item_states = StateBits::new();

        for b in bytes.by_ref() {
            match b {
                FIELD_SEPARATOR => break,
                b if b == CHECKED as u8 => node_states.push(true),
                b if b == UNCHECKED as u8 => node_states.push(false),
                _ => {}
            }
        }
        for b in bytes {
            match b {
                CLOSE => break,
                b if b == CHECKED as u8 => item_states.push(true),
                b if b == UNCHECKED as u8 => item_states.push(false),
                _ => {}
            }
        }

        Self {
            node_states,
            item_states,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.node_states.is_empty() && self.item_states.is_empty()
    }

    pub fn clear(&mut self) {
        self.node_states.clear();
        self.item_states.clear();
    }
}

impl std::fmt::Display for KnobValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]", self.node_states, self.item_states)
    }
}
