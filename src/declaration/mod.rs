//! Shader Interface Declarations
//!
//! Every declaration kind emitted into a shader stage:
//!
//! - [`StageInput`] / [`StageOutput`]: varyings addressed by location
//! - [`UniformBlock`] / [`ShaderStorageBlock`]: buffer-backed blocks addressed
//!   by set and binding
//! - [`Structure`]: named aggregate types referenced by blocks
//!
//! All kinds share the [`DeclarationTrait`] contract and are gathered into the
//! closed [`Declaration`] enum for the generator.
//!
//! # Array sizes
//!
//! [`ArraySize`] uses the three-way convention of the interface:
//!
//! | Raw | Variant | Suffix |
//! |-----|---------|--------|
//! | `-1` | [`ArraySize::Unsized`] | `[]` |
//! | `0` | [`ArraySize::Scalar`] | none |
//! | `N > 0` | [`ArraySize::Fixed`] | `[N]` |

mod block;
mod member;
mod stage;
mod structure;

use std::num::NonZeroU32;

pub use block::{BufferBackedBlock, MemoryQualifier, ShaderStorageBlock, UniformBlock};
pub use member::Member;
pub(crate) use member::MAX_STRUCTURE_DEPTH;
pub use stage::{StageInput, StageOutput, StageVariable};
pub use structure::Structure;
pub(crate) use structure::StructureEmitter;

use crate::key::Key;

// ============================================================================
// Array size convention
// ============================================================================

/// Array dimension of a variable, member or block instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ArraySize {
    /// Flexible array sized at runtime by the bound buffer (`[]`).
    Unsized,
    /// Not an array.
    #[default]
    Scalar,
    /// Fixed-length array (`[N]`).
    Fixed(NonZeroU32),
}

impl ArraySize {
    /// Decodes the raw convention: negative is unsized, zero is scalar.
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        match u32::try_from(raw) {
            Err(_) => Self::Unsized,
            Ok(n) => Self::fixed(n),
        }
    }

    /// Fixed-length array of `n` elements; `0` gives [`ArraySize::Scalar`].
    #[must_use]
    pub fn fixed(n: u32) -> Self {
        NonZeroU32::new(n).map_or(Self::Scalar, Self::Fixed)
    }

    #[must_use]
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Unsized => -1,
            Self::Scalar => 0,
            Self::Fixed(n) => i32::try_from(n.get()).unwrap_or(i32::MAX),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_array(self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_non_fixed(self) -> bool {
        matches!(self, Self::Unsized)
    }

    /// Element count of a fixed array, `1` for scalars, `None` when unsized.
    #[must_use]
    pub fn element_count(self) -> Option<usize> {
        match self {
            Self::Unsized => None,
            Self::Scalar => Some(1),
            Self::Fixed(n) => usize::try_from(n.get()).ok(),
        }
    }

    /// Declarator suffix: `[]`, `[N]` or nothing.
    #[must_use]
    pub fn suffix(self) -> String {
        match self {
            Self::Unsized => "[]".to_owned(),
            Self::Scalar => String::new(),
            Self::Fixed(n) => format!("[{n}]"),
        }
    }
}

impl From<i32> for ArraySize {
    fn from(raw: i32) -> Self {
        Self::from_raw(raw)
    }
}

// ============================================================================
// Insertion-ordered keyed storage
// ============================================================================

/// Name-keyed entries kept in first-insertion order.
///
/// Re-inserting an existing key replaces the value in place, so the entry
/// keeps the position of its first insertion.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyedEntries<V> {
    entries: Vec<(Key, V)>,
}

impl<V> Default for KeyedEntries<V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<V> KeyedEntries<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites. Returns the previous value for `key`.
    pub fn insert(&mut self, key: Key, value: V) -> Option<V> {
        match self.position(key) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: Key) -> Option<&V> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn position(&self, key: Key) -> Option<usize> {
        self.entries.iter().position(|(k, _)| *k == key)
    }

    #[must_use]
    pub fn contains_key(&self, key: Key) -> bool {
        self.position(key).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, &V)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

/// Structures visible to a block, keyed by structure name.
pub type StructureMap = KeyedEntries<Structure>;

// ============================================================================
// Declaration contract
// ============================================================================

/// Contract shared by every declaration kind.
pub trait DeclarationTrait {
    /// Declared name; for blocks this is the block name.
    fn name(&self) -> Key;

    /// `true` when both the type and the name are present.
    fn is_valid(&self) -> bool;

    /// Complete GLSL text of the declaration, newline-terminated.
    fn source_code(&self) -> String;

    /// Fixed memory footprint in bytes; `0` for varyings.
    fn byte_size(&self) -> usize;
}

/// Kind tag of a [`Declaration`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeclarationKind {
    Structure,
    StageInput,
    UniformBlock,
    ShaderStorageBlock,
    StageOutput,
}

impl DeclarationKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Structure => "Structure",
            Self::StageInput => "Stage input",
            Self::UniformBlock => "Uniform block",
            Self::ShaderStorageBlock => "Shader storage block",
            Self::StageOutput => "Stage output",
        }
    }
}

/// Closed set of declaration kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum Declaration {
    StageInput(StageInput),
    StageOutput(StageOutput),
    UniformBlock(UniformBlock),
    ShaderStorageBlock(ShaderStorageBlock),
    Structure(Structure),
}

impl Declaration {
    #[must_use]
    pub const fn kind(&self) -> DeclarationKind {
        match self {
            Self::StageInput(_) => DeclarationKind::StageInput,
            Self::StageOutput(_) => DeclarationKind::StageOutput,
            Self::UniformBlock(_) => DeclarationKind::UniformBlock,
            Self::ShaderStorageBlock(_) => DeclarationKind::ShaderStorageBlock,
            Self::Structure(_) => DeclarationKind::Structure,
        }
    }

    fn as_trait(&self) -> &dyn DeclarationTrait {
        match self {
            Self::StageInput(d) => d,
            Self::StageOutput(d) => d,
            Self::UniformBlock(d) => d,
            Self::ShaderStorageBlock(d) => d,
            Self::Structure(d) => d,
        }
    }
}

impl DeclarationTrait for Declaration {
    fn name(&self) -> Key {
        self.as_trait().name()
    }

    fn is_valid(&self) -> bool {
        self.as_trait().is_valid()
    }

    fn source_code(&self) -> String {
        self.as_trait().source_code()
    }

    fn byte_size(&self) -> usize {
        self.as_trait().byte_size()
    }
}

macro_rules! impl_from_declaration {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Declaration {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_declaration!(StageInput, StageOutput, UniformBlock, ShaderStorageBlock, Structure);
