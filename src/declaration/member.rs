use crate::errors::{Result, ShaderGenError};
use crate::key::Key;
use crate::layout::{MemberShape, MemoryLayout, TypeLayout};
use crate::types::VariableType;

use super::{ArraySize, StructureMap};

/// Nesting depth at which structure resolution gives up. Guards against
/// self-referencing structure definitions.
pub(crate) const MAX_STRUCTURE_DEPTH: usize = 16;

/// A field of a block or structure: `<type> <name><suffix>;`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Member {
    ty: Key,
    name: Key,
    array_size: ArraySize,
}

impl Member {
    #[must_use]
    pub fn new(ty: impl Into<Key>, name: impl Into<Key>, array_size: ArraySize) -> Self {
        Self { ty: ty.into(), name: name.into(), array_size }
    }

    /// Non-array member.
    #[must_use]
    pub fn scalar(ty: impl Into<Key>, name: impl Into<Key>) -> Self {
        Self::new(ty, name, ArraySize::Scalar)
    }

    #[inline]
    #[must_use]
    pub fn ty(&self) -> Key {
        self.ty
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> Key {
        self.name
    }

    #[inline]
    #[must_use]
    pub fn array_size(&self) -> ArraySize {
        self.array_size
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.ty.is_null() && !self.name.is_null()
    }

    /// Fails with [`ShaderGenError::InvalidMember`] unless [`is_valid`](Self::is_valid).
    pub(crate) fn ensure_valid(&self, owner: Key) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }
        Err(ShaderGenError::InvalidMember {
            owner: owner.as_str().to_owned(),
            ty: self.ty.as_str().to_owned(),
            name: self.name.as_str().to_owned(),
        })
    }

    /// Declaration line without indentation.
    #[must_use]
    pub fn source_code(&self) -> String {
        format!("{} {}{};\n", self.ty, self.name, self.array_size.suffix())
    }

    /// Built-in type of the member, `None` when it names a structure.
    #[must_use]
    pub fn variable_type(&self) -> Option<VariableType> {
        VariableType::from_key(self.ty)
    }

    /// Layout of the member under `policy`, resolving structure types through
    /// `structures`. Returns `None` when the type cannot live in a buffer.
    pub(crate) fn shape(
        &self,
        policy: MemoryLayout,
        structures: &StructureMap,
        depth: usize,
    ) -> Option<MemberShape> {
        let element = self.element_layout(policy, structures, depth)?;

        Some(match self.array_size {
            ArraySize::Unsized => MemberShape::Unsized(element),
            ArraySize::Scalar => MemberShape::Sized(element),
            ArraySize::Fixed(_) => {
                let count = self.array_size.element_count().unwrap_or(0);
                MemberShape::Sized(policy.array_layout(element, count))
            }
        })
    }

    fn element_layout(
        &self,
        policy: MemoryLayout,
        structures: &StructureMap,
        depth: usize,
    ) -> Option<TypeLayout> {
        if let Some(ty) = self.variable_type() {
            return policy.type_layout(ty);
        }

        if depth >= MAX_STRUCTURE_DEPTH {
            log::warn!("Structure nesting too deep while resolving member '{}'", self.name);
            return None;
        }

        structures
            .get(self.ty)
            .map(|structure| structure.layout_at_depth(policy, structures, depth + 1).layout)
    }
}
