//! GLSL Variable Types
//!
//! Classifies the type [`Key`] of a declaration into a [`VariableType`], which
//! is what the memory layout rules operate on. Names that are not built-in
//! GLSL types (`None` from [`VariableType::from_key`]) are structure names.

use std::fmt;

use crate::key::Key;

/// Component type of scalars, vectors and matrices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    UInt,
    Float,
    Double,
}

impl ScalarKind {
    /// Size in bytes of one component inside a buffer-backed block.
    ///
    /// `bool` occupies a full 32-bit word in GLSL buffer memory.
    #[inline]
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Double => 8,
            Self::Bool | Self::Int | Self::UInt | Self::Float => 4,
        }
    }

    const fn scalar_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    const fn vector_prefix(self) -> &'static str {
        match self {
            Self::Bool => "bvec",
            Self::Int => "ivec",
            Self::UInt => "uvec",
            Self::Float => "vec",
            Self::Double => "dvec",
        }
    }
}

/// Built-in GLSL type of a variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariableType {
    Void,
    Scalar(ScalarKind),
    /// `components` is 2, 3 or 4.
    Vector { kind: ScalarKind, components: u8 },
    /// Column-major `columns` x `rows` matrix. `kind` is `Float` or `Double`.
    Matrix { kind: ScalarKind, columns: u8, rows: u8 },
    /// Samplers, images, textures, subpass inputs and atomic counters. These
    /// have no representation inside buffer memory.
    Opaque,
}

const OPAQUE_PREFIXES: &[&str] = &[
    "sampler", "isampler", "usampler", "image", "iimage", "uimage", "texture", "itexture",
    "utexture", "subpassInput", "isubpassInput", "usubpassInput",
];

impl VariableType {
    /// Classifies a type key. Returns `None` for the null key and for names
    /// that are not built-in types.
    #[must_use]
    pub fn from_key(key: Key) -> Option<Self> {
        if key.is_null() {
            return None;
        }
        Self::from_glsl_name(key.as_str())
    }

    #[must_use]
    pub fn from_glsl_name(name: &str) -> Option<Self> {
        let scalar = match name {
            "void" => return Some(Self::Void),
            "atomic_uint" => return Some(Self::Opaque),
            "bool" => Some(ScalarKind::Bool),
            "int" => Some(ScalarKind::Int),
            "uint" => Some(ScalarKind::UInt),
            "float" => Some(ScalarKind::Float),
            "double" => Some(ScalarKind::Double),
            _ => None,
        };
        if let Some(kind) = scalar {
            return Some(Self::Scalar(kind));
        }

        if let Some(ty) = Self::parse_vector(name).or_else(|| Self::parse_matrix(name)) {
            return Some(ty);
        }

        OPAQUE_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix))
            .then_some(Self::Opaque)
    }

    fn parse_vector(name: &str) -> Option<Self> {
        let (kind, rest) = [
            ScalarKind::Bool,
            ScalarKind::Int,
            ScalarKind::UInt,
            ScalarKind::Double,
            ScalarKind::Float,
        ]
        .into_iter()
        .find_map(|kind| name.strip_prefix(kind.vector_prefix()).map(|rest| (kind, rest)))?;

        let components = parse_dimension(rest)?;
        Some(Self::Vector { kind, components })
    }

    fn parse_matrix(name: &str) -> Option<Self> {
        let (kind, rest) = if let Some(rest) = name.strip_prefix("dmat") {
            (ScalarKind::Double, rest)
        } else {
            (ScalarKind::Float, name.strip_prefix("mat")?)
        };

        match rest.split_once('x') {
            None => {
                let n = parse_dimension(rest)?;
                Some(Self::Matrix { kind, columns: n, rows: n })
            }
            Some((columns, rows)) => Some(Self::Matrix {
                kind,
                columns: parse_dimension(columns)?,
                rows: parse_dimension(rows)?,
            }),
        }
    }

    /// Canonical GLSL spelling. Opaque types have no single spelling and
    /// render as `"opaque"`.
    #[must_use]
    pub fn glsl_name(self) -> String {
        match self {
            Self::Void => "void".to_owned(),
            Self::Scalar(kind) => kind.scalar_name().to_owned(),
            Self::Vector { kind, components } => format!("{}{}", kind.vector_prefix(), components),
            Self::Matrix { kind, columns, rows } => {
                let prefix = if kind == ScalarKind::Double { "dmat" } else { "mat" };
                if columns == rows {
                    format!("{prefix}{columns}")
                } else {
                    format!("{prefix}{columns}x{rows}")
                }
            }
            Self::Opaque => "opaque".to_owned(),
        }
    }

    /// Interned key of [`glsl_name`](Self::glsl_name).
    #[must_use]
    pub fn key(self) -> Key {
        Key::new(&self.glsl_name())
    }

    #[must_use]
    pub const fn is_opaque(self) -> bool {
        matches!(self, Self::Opaque)
    }
}

fn parse_dimension(text: &str) -> Option<u8> {
    match text {
        "2" => Some(2),
        "3" => Some(3),
        "4" => Some(4),
        _ => None,
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.glsl_name())
    }
}
