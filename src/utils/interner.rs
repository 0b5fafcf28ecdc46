//! Global String Interner
//!
//! Maps shader tokens (type names, qualifiers, identifiers) to compact integer
//! symbols so they can be compared and hashed as integers. This is the storage
//! behind [`Key`](crate::key::Key).
//!
//! The interner is process-wide and thread-safe; interned strings live for the
//! whole program, so resolved text can be handed out as `&'static str`.

use std::sync::LazyLock;

use lasso::{Spur, ThreadedRodeo};

/// Global interner instance.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::new);

/// Compact integer identifier of an interned string.
pub type Symbol = Spur;

/// Interns a string and returns its symbol.
///
/// Returns the existing symbol when the string is already in the pool.
#[inline]
pub fn intern(s: &str) -> Symbol {
    INTERNER.get_or_intern(s)
}

/// Looks up the symbol of an already interned string without allocating.
#[inline]
#[must_use]
pub fn get(s: &str) -> Option<Symbol> {
    INTERNER.get(s)
}

/// Resolves a symbol back to its string.
///
/// # Panics
/// Panics if the symbol was not produced by this interner.
#[inline]
#[must_use]
pub fn resolve(sym: Symbol) -> &'static str {
    // The rodeo is never dropped, so the borrow is effectively 'static.
    let interner: &'static ThreadedRodeo = &INTERNER;
    interner.resolve(&sym)
}

/// Number of distinct strings interned so far.
#[must_use]
pub fn len() -> usize {
    INTERNER.len()
}

/// Pre-interns the reserved GLSL vocabulary.
///
/// Called before the first generation pass so the hot path only performs
/// lookups for keywords, qualifiers and built-in type names.
pub fn preload_reserved_keywords() {
    let reserved = [
        // Qualifiers
        "const", "uniform", "in", "out", "inout", "buffer", "layout", "struct",
        // Layout parameters
        "set", "binding", "location", "offset", "align", "push_constant",
        // Memory layouts
        "shared", "packed", "std140", "std430",
        // Interpolation
        "flat", "smooth", "noperspective", "centroid",
        // Memory qualifiers
        "coherent", "volatile", "restrict", "readonly", "writeonly",
        // Literal types
        "void", "bool", "int", "uint", "float", "double",
        "vec2", "vec3", "vec4", "ivec2", "ivec3", "ivec4", "uvec2", "uvec3", "uvec4",
        "mat2", "mat3", "mat4",
    ];

    for name in reserved {
        intern(name);
    }
}
