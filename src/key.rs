//! Interned Lexical Tokens
//!
//! A [`Key`] names one lexical fragment of generated source: a type name, a
//! qualifier or an identifier. Keys are backed by the global
//! [`interner`](crate::utils::interner), so two keys are equal exactly when
//! their text is equal, and comparing or hashing them never touches the
//! string data.
//!
//! The null key ([`Key::NULL`]) stands for "absent", for example a stage
//! variable without an interpolation qualifier or a block without an
//! instance name. Interning the empty string also yields the null key.

use std::fmt;

use crate::utils::interner::{self, Symbol};

/// Immutable interned token. `Copy`, value-comparable and thread-safe.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Key(Option<Symbol>);

impl Key {
    /// The absent key.
    pub const NULL: Key = Key(None);

    /// Interns `text` and returns its key. Empty text gives [`Key::NULL`].
    #[must_use]
    pub fn new(text: &str) -> Self {
        if text.is_empty() {
            Self::NULL
        } else {
            Self(Some(interner::intern(text)))
        }
    }

    /// Returns the key of `text` only if it was interned before.
    #[must_use]
    pub fn lookup(text: &str) -> Option<Self> {
        if text.is_empty() {
            return Some(Self::NULL);
        }
        interner::get(text).map(|sym| Self(Some(sym)))
    }

    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0.is_none()
    }

    /// Underlying symbol, `None` for the null key.
    #[inline]
    #[must_use]
    pub const fn symbol(self) -> Option<Symbol> {
        self.0
    }

    /// Text of the key; the null key resolves to `""`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.0.map_or("", interner::resolve)
    }

    /// `Some(self)` unless null.
    #[inline]
    #[must_use]
    pub const fn non_null(self) -> Option<Self> {
        if self.0.is_some() { Some(self) } else { None }
    }
}

impl From<&str> for Key {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<&String> for Key {
    fn from(text: &String) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("Key(null)")
        } else {
            write!(f, "Key({:?})", self.as_str())
        }
    }
}
