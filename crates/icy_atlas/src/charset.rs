use crate::{AtlasError, Result};

/// First printable ASCII character (space).
pub const FIRST_PRINTABLE: char = ' ';

/// Last printable ASCII character (tilde).
pub const LAST_PRINTABLE: char = '~';

/// Ordered, immutable list of characters placed into the atlas.
///
/// The position of a character in the set is its column in the atlas,
/// so a consumer locates glyph `i` at `x = i * cell_width`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSet {
    chars: Vec<char>,
}

impl Default for CharacterSet {
    fn default() -> Self {
        Self::printable_ascii()
    }
}

impl CharacterSet {
    /// All 95 printable ASCII characters, `' '..='~'`.
    pub fn printable_ascii() -> Self {
        Self {
            chars: (FIRST_PRINTABLE..=LAST_PRINTABLE).collect(),
        }
    }

    /// Builds a set from an explicit sequence, keeping its order.
    ///
    /// Only printable ASCII is accepted and every character may appear once,
    /// otherwise column indices would become ambiguous.
    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Result<Self> {
        let mut result: Vec<char> = Vec::new();
        for ch in chars {
            if !is_printable_ascii(ch) {
                return Err(AtlasError::UnsupportedCharacter(ch));
            }
            if result.contains(&ch) {
                return Err(AtlasError::DuplicateCharacter(ch));
            }
            result.push(ch);
        }
        Ok(Self { chars: result })
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    /// Column of `ch` in the atlas, if present.
    pub fn index_of(&self, ch: char) -> Option<usize> {
        self.chars.iter().position(|c| *c == ch)
    }

    pub fn as_slice(&self) -> &[char] {
        &self.chars
    }
}

pub fn is_printable_ascii(ch: char) -> bool {
    (FIRST_PRINTABLE..=LAST_PRINTABLE).contains(&ch)
}
