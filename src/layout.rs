//! Buffer Memory Layouts
//!
//! Offsets and sizes of members inside buffer-backed blocks, following the
//! GLSL `packed`, `std140` and `std430` rules. Host code uses these numbers to
//! write buffers, so they must match what the GPU reads byte-for-byte.
//!
//! | Rule | `std430` | `std140` | `packed` |
//! |------|----------|----------|----------|
//! | scalar | size, align = component size | same | same |
//! | vec2 | align 2 × component | same | align = component |
//! | vec3 / vec4 | align 4 × component | same | align = component |
//! | array stride | round_up(size, align) | rounded up to 16 | element size |
//! | struct align | max member align | rounded up to 16 | max member align |
//! | struct size | rounded up to align | rounded up to align | no tail padding |
//!
//! Matrices are laid out as arrays of column vectors.

use serde::{Deserialize, Serialize};

use crate::key::Key;
use crate::keys;
use crate::types::{ScalarKind, VariableType};

/// Base alignment of arrays and structures under `std140`.
const STD140_ROUND: usize = 16;

/// Memory-layout policy of a buffer-backed block. Fixed at block construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryLayout {
    Packed,
    #[default]
    Std140,
    Std430,
}

/// Size and base alignment of a type under a given policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeLayout {
    pub size: usize,
    pub align: usize,
}

/// Aggregate layout of a structure or block body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructLayout {
    pub layout: TypeLayout,
    /// Byte offset of each member, in member order.
    pub offsets: Vec<usize>,
}

/// One member fed into [`MemoryLayout::struct_layout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberShape {
    /// A member with a known size.
    Sized(TypeLayout),
    /// A flexible trailing array; only its element layout is known.
    Unsized(TypeLayout),
}

#[inline]
#[must_use]
pub const fn round_up(value: usize, align: usize) -> usize {
    if align == 0 {
        value
    } else {
        value.div_ceil(align).saturating_mul(align)
    }
}

impl MemoryLayout {
    /// Layout keyword as emitted in `layout (...)` qualifiers.
    #[must_use]
    pub fn keyword(self) -> Key {
        match self {
            Self::Packed => *keys::PACKED,
            Self::Std140 => *keys::STD140,
            Self::Std430 => *keys::STD430,
        }
    }

    /// Layout of a built-in type. `None` for `void` and opaque types, which
    /// cannot live in buffer memory.
    #[must_use]
    pub fn type_layout(self, ty: VariableType) -> Option<TypeLayout> {
        match ty {
            VariableType::Void | VariableType::Opaque => None,
            VariableType::Scalar(kind) => Some(TypeLayout { size: kind.size(), align: kind.size() }),
            VariableType::Vector { kind, components } => Some(self.vector_layout(kind, components)),
            VariableType::Matrix { kind, columns, rows } => {
                let column = self.vector_layout(kind, rows);
                Some(self.array_layout(column, usize::from(columns)))
            }
        }
    }

    fn vector_layout(self, kind: ScalarKind, components: u8) -> TypeLayout {
        let component = kind.size();
        let size = component * usize::from(components);
        let align = match self {
            Self::Packed => component,
            Self::Std140 | Self::Std430 => match components {
                2 => component * 2,
                _ => component * 4,
            },
        };
        TypeLayout { size, align }
    }

    /// Distance in bytes between two consecutive array elements.
    #[must_use]
    pub fn array_stride(self, element: TypeLayout) -> usize {
        match self {
            Self::Packed => element.size,
            Self::Std430 => round_up(element.size, element.align),
            Self::Std140 => round_up(element.size, element.align.max(STD140_ROUND)),
        }
    }

    /// Layout of a fixed-length array of `count` elements. Sizes saturate at
    /// `usize::MAX` instead of overflowing.
    #[must_use]
    pub fn array_layout(self, element: TypeLayout, count: usize) -> TypeLayout {
        TypeLayout {
            size: self.array_stride(element).saturating_mul(count),
            align: self.array_align(element),
        }
    }

    fn array_align(self, element: TypeLayout) -> usize {
        match self {
            Self::Std140 => round_up(element.align, STD140_ROUND),
            Self::Packed | Self::Std430 => element.align,
        }
    }

    /// Lays out members in order and returns the aggregate layout with each
    /// member's offset.
    ///
    /// A [`MemberShape::Unsized`] member is placed at its aligned offset and
    /// contributes no size; the reported size is the fixed part of the block.
    #[must_use]
    pub fn struct_layout(self, members: impl IntoIterator<Item = MemberShape>) -> StructLayout {
        let mut offset = 0usize;
        let mut max_align = 1usize;
        let mut offsets = Vec::new();
        let mut runtime_sized = false;

        for member in members {
            let (layout, sized) = match member {
                MemberShape::Sized(layout) => (layout, true),
                MemberShape::Unsized(element) => (
                    TypeLayout { size: 0, align: self.array_align(element) },
                    false,
                ),
            };

            let align = layout.align.max(1);
            max_align = max_align.max(align);
            offset = round_up(offset, align);
            offsets.push(offset);
            offset = offset.saturating_add(layout.size);
            runtime_sized |= !sized;
        }

        let align = match self {
            Self::Std140 => round_up(max_align, STD140_ROUND),
            Self::Packed | Self::Std430 => max_align,
        };
        let size = match self {
            Self::Packed => offset,
            _ if runtime_sized => offset,
            Self::Std140 | Self::Std430 => round_up(offset, align),
        };

        StructLayout { layout: TypeLayout { size, align }, offsets }
    }
}
