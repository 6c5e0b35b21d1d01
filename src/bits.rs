//! Compact boolean sequences stored as ASCII `'0'`/`'1'` text.
//!
//! The persisted knob value and the host's hash both consume the raw text,
//! so the sequence keeps that representation instead of a packed bitset.

use serde::{Deserialize, Serialize};

/// Character stored for a checked entry.
pub const CHECKED: char = '1';

/// Character stored for an unchecked entry.
pub const UNCHECKED: char = '0';

#[inline]
const fn bit_char(value: bool) -> char {
    if value { CHECKED } else { UNCHECKED }
}

/// An ordered sequence of check flags.
///
/// Only `'0'` and `'1'` are ever stored; every constructor filters its input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct StateBits(String);

impl StateBits {
    pub const fn new() -> Self {
        Self(String::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(String::with_capacity(capacity))
    }

    /// Keep the `'0'`/`'1'` bytes of `text`, silently dropping everything else.
    pub fn from_lossy(text: &str) -> Self {
        Self(text.chars().filter(|&c| c == CHECKED || c == UNCHECKED).collect())
    }

    /// A sequence of `len` copies of `value`.
    pub fn filled(len: usize, value: bool) -> Self {
        Self(std::iter::repeat_n(bit_char(value), len).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flag at `index`, or `None` past the end.
    #[inline]
    pub fn get(&self, index: usize) -> Option<bool> {
        self.0
            .as_bytes()
            .get(index)
            .map(|&b| b == CHECKED as u8)
    }

    /// Overwrite the flag at `index`.
    ///
    /// Returns `false` (and leaves the sequence untouched) when `index` is
    /// out of range.
    pub fn set(&mut self, index: usize, value: bool) -> bool {
        if index >= self.len() {
            return false;
        }
        let mut buf = [0u8; 4];
        self.0
            .replace_range(index..index + 1, bit_char(value).encode_utf8(&mut buf));
        true
    }

    #[inline]
    pub fn push(&mut self, value: bool) {
        self.0.push(bit_char(value));
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Raw text form, e.g. `"1101"`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.bytes().map(|b| b == CHECKED as u8)
    }

    /// Number of checked entries.
    pub fn count_checked(&self) -> usize {
        self.iter().filter(|&b| b).count()
    }
}

impl From<String> for StateBits {
    fn from(text: String) -> Self {
        if text.bytes().all(|b| b == CHECKED as u8 || b == UNCHECKED as u8) {
            Self(text)
        } else {
            Self::from_lossy(&text)
        }
    }
}

impl From<StateBits> for String {
    fn from(bits: StateBits) -> Self {
        bits.0
    }
}

impl FromIterator<bool> for StateBits {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Self(iter.into_iter().map(bit_char).collect())
    }
}

impl Extend<bool> for StateBits {
    fn extend<T: IntoIterator<Item = bool>>(&mut self, iter: T) {
        self.0.extend(iter.into_iter().map(bit_char));
    }
}

impl AsRef<str> for StateBits {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for StateBits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
