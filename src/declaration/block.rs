use std::ops::Deref;

use bitflags::bitflags;

use crate::errors::{Result, ShaderGenError};
use crate::key::Key;
use crate::keys;
use crate::layout::{MemoryLayout, StructLayout};

use super::structure::layout_members;
use super::{ArraySize, DeclarationTrait, KeyedEntries, Member, Structure, StructureEmitter, StructureMap};

bitflags! {
    /// Memory qualifiers of a shader storage block.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MemoryQualifier: u8 {
        const COHERENT   = 1 << 0;
        const VOLATILE   = 1 << 1;
        const RESTRICT   = 1 << 2;
        const READ_ONLY  = 1 << 3;
        const WRITE_ONLY = 1 << 4;
    }
}

impl MemoryQualifier {
    /// Qualifier keywords in emission order.
    #[must_use]
    pub fn keywords(self) -> Vec<Key> {
        [
            (Self::COHERENT, &keys::COHERENT),
            (Self::VOLATILE, &keys::VOLATILE),
            (Self::RESTRICT, &keys::RESTRICT),
            (Self::READ_ONLY, &keys::READ_ONLY),
            (Self::WRITE_ONLY, &keys::WRITE_ONLY),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, key)| **key)
        .collect()
    }
}

// ============================================================================
// Shared block base
// ============================================================================

/// State shared by uniform and storage blocks: addressing, layout policy,
/// ordered members and referenced structures.
#[derive(Clone, Debug, PartialEq)]
pub struct BufferBackedBlock {
    set: u32,
    binding: u32,
    layout: MemoryLayout,
    name: Key,
    instance_name: Key,
    array_size: ArraySize,
    members: KeyedEntries<Member>,
    structures: StructureMap,
}

impl BufferBackedBlock {
    fn new(
        set: u32,
        binding: u32,
        layout: MemoryLayout,
        name: Key,
        instance_name: Key,
        array_size: ArraySize,
    ) -> Self {
        Self {
            set,
            binding,
            layout,
            name,
            instance_name,
            array_size,
            members: KeyedEntries::new(),
            structures: StructureMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> Key {
        self.name
    }

    #[inline]
    #[must_use]
    pub fn set(&self) -> u32 {
        self.set
    }

    #[inline]
    #[must_use]
    pub fn binding(&self) -> u32 {
        self.binding
    }

    #[inline]
    #[must_use]
    pub fn memory_layout(&self) -> MemoryLayout {
        self.layout
    }

    #[inline]
    #[must_use]
    pub fn instance_name(&self) -> Key {
        self.instance_name
    }

    #[inline]
    #[must_use]
    pub fn array_size(&self) -> ArraySize {
        self.array_size
    }

    #[must_use]
    pub fn members(&self) -> &KeyedEntries<Member> {
        &self.members
    }

    #[must_use]
    pub fn structures(&self) -> &StructureMap {
        &self.structures
    }

    fn add_structure(&mut self, key: impl Into<Key>, structure: Structure) {
        self.structures.insert(key.into(), structure);
    }

    /// Aggregate layout of the block body under its own policy.
    #[must_use]
    pub fn layout(&self) -> StructLayout {
        layout_members(self.name, self.members.values(), self.layout, &self.structures, 0)
    }

    /// Byte offset of every member, in member order.
    #[must_use]
    pub fn member_offsets(&self) -> Vec<(Key, usize)> {
        self.members.keys().zip(self.layout().offsets).collect()
    }

    /// Text of every referenced structure, in registration order except that
    /// a structure always follows the structures it uses.
    #[must_use]
    pub fn structures_source_code(&self) -> String {
        let mut emitter = StructureEmitter::default();
        for structure in self.structures.values() {
            emitter.emit(structure, Some(&self.structures));
        }
        emitter.finish()
    }

    /// The block declaration alone, without its structures.
    fn body_source_code(&self, qualifiers: &[Key], keyword: Key) -> String {
        let mut code = format!(
            "{} ({}, {} = {}, {} = {}) ",
            *keys::LAYOUT,
            self.layout.keyword(),
            *keys::SET,
            self.set,
            *keys::BINDING,
            self.binding
        );
        for qualifier in qualifiers {
            code.push_str(qualifier.as_str());
            code.push(' ');
        }
        code.push_str(&format!("{keyword} {}\n{{\n", self.name));

        for member in self.members.values() {
            code.push('\t');
            code.push_str(&member.source_code());
        }

        match self.instance_name.non_null() {
            Some(instance) => code.push_str(&format!("}} {instance}{};\n", self.array_size.suffix())),
            None => code.push_str("};\n"),
        }
        code
    }

    fn insert_member(&mut self, key: Key, member: Member) -> Result<()> {
        member.ensure_valid(self.name)?;
        self.members.insert(key, member);
        Ok(())
    }

    fn unsized_slot(&self) -> Option<(usize, Key)> {
        self.members
            .values()
            .enumerate()
            .find(|(_, member)| member.array_size() == ArraySize::Unsized)
            .map(|(index, member)| (index, member.name()))
    }
}

// ============================================================================
// Uniform block
// ============================================================================

/// `uniform` block backed by a uniform buffer.
///
/// ```text
/// layout (std140, set = 0, binding = 1) uniform CameraData
/// {
///     mat4 viewProjection;
///     vec3 cameraPosition;
/// };
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UniformBlock(BufferBackedBlock);

impl UniformBlock {
    /// `instance_name` may be [`Key::NULL`].
    ///
    /// # Errors
    ///
    /// [`ShaderGenError::UnsizedUniformBlockArray`] when `array_size` is
    /// [`ArraySize::Unsized`]; only storage blocks may be runtime-sized.
    pub fn new(
        set: u32,
        binding: u32,
        layout: MemoryLayout,
        name: impl Into<Key>,
        instance_name: impl Into<Key>,
        array_size: ArraySize,
    ) -> Result<Self> {
        let name = name.into();
        if array_size == ArraySize::Unsized {
            return Err(ShaderGenError::UnsizedUniformBlockArray { block: name.as_str().to_owned() });
        }
        Ok(Self(BufferBackedBlock::new(set, binding, layout, name, instance_name.into(), array_size)))
    }

    /// Inserts or overwrites the member stored under `key`.
    ///
    /// # Errors
    ///
    /// - [`ShaderGenError::InvalidMember`] when the member lacks a type or name.
    /// - [`ShaderGenError::UnsizedArrayInUniformBlock`] for a flexible array
    ///   member; uniform buffers have a fixed size.
    pub fn add_member(&mut self, key: impl Into<Key>, member: Member) -> Result<()> {
        if member.array_size() == ArraySize::Unsized {
            return Err(ShaderGenError::UnsizedArrayInUniformBlock {
                block: self.0.name.as_str().to_owned(),
                member: member.name().as_str().to_owned(),
            });
        }
        self.0.insert_member(key.into(), member)
    }

    /// Registers a structure used by the members. Overwrites in place.
    pub fn add_structure(&mut self, key: impl Into<Key>, structure: Structure) {
        self.0.add_structure(key, structure);
    }

    /// The block declaration without its structures.
    #[must_use]
    pub fn body_source_code(&self) -> String {
        self.0.body_source_code(&[], *keys::UNIFORM)
    }
}

impl Deref for UniformBlock {
    type Target = BufferBackedBlock;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DeclarationTrait for UniformBlock {
    fn name(&self) -> Key {
        self.0.name
    }

    fn is_valid(&self) -> bool {
        !self.0.name.is_null()
    }

    fn source_code(&self) -> String {
        self.0.structures_source_code() + &self.body_source_code()
    }

    fn byte_size(&self) -> usize {
        self.0.layout().layout.size
    }
}

// ============================================================================
// Shader storage block
// ============================================================================

/// `buffer` block backed by a storage buffer. May end with one flexible array.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderStorageBlock {
    block: BufferBackedBlock,
    qualifiers: MemoryQualifier,
}

impl ShaderStorageBlock {
    /// `instance_name` may be [`Key::NULL`].
    #[must_use]
    pub fn new(
        set: u32,
        binding: u32,
        layout: MemoryLayout,
        name: impl Into<Key>,
        instance_name: impl Into<Key>,
        array_size: ArraySize,
    ) -> Self {
        Self {
            block: BufferBackedBlock::new(set, binding, layout, name.into(), instance_name.into(), array_size),
            qualifiers: MemoryQualifier::empty(),
        }
    }

    #[must_use]
    pub fn with_qualifiers(mut self, qualifiers: MemoryQualifier) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    #[must_use]
    pub fn qualifiers(&self) -> MemoryQualifier {
        self.qualifiers
    }

    /// Inserts or overwrites the member stored under `key`. An overwritten
    /// member keeps its position.
    ///
    /// # Errors
    ///
    /// - [`ShaderGenError::InvalidMember`] when the member lacks a type or name.
    /// - [`ShaderGenError::UnsizedArrayNotLast`] when the insertion would
    ///   leave a flexible array anywhere but in the last position.
    pub fn add_member(&mut self, key: impl Into<Key>, member: Member) -> Result<()> {
        member.ensure_valid(self.block.name)?;
        let key = key.into();
        let count = self.block.members.len();
        let (slot, last_slot) = match self.block.members.position(key) {
            Some(index) => (index, count - 1),
            None => (count, count),
        };
        let other_unsized = self.block.unsized_slot().filter(|(index, _)| *index != slot);

        let violation = if member.array_size() == ArraySize::Unsized {
            if slot == last_slot {
                other_unsized.map(|(_, name)| name)
            } else {
                Some(member.name())
            }
        } else {
            other_unsized
                .filter(|(index, _)| *index != last_slot)
                .map(|(_, name)| name)
        };

        if let Some(offending) = violation {
            return Err(ShaderGenError::UnsizedArrayNotLast {
                block: self.block.name.as_str().to_owned(),
                member: offending.as_str().to_owned(),
            });
        }

        self.block.insert_member(key, member)
    }

    pub fn add_structure(&mut self, key: impl Into<Key>, structure: Structure) {
        self.block.add_structure(key, structure);
    }

    /// `true` when the last member is a flexible array.
    #[must_use]
    pub fn has_runtime_array(&self) -> bool {
        self.block.unsized_slot().is_some()
    }

    /// The block declaration without its structures.
    #[must_use]
    pub fn body_source_code(&self) -> String {
        self.block.body_source_code(&self.qualifiers.keywords(), *keys::BUFFER)
    }
}

impl Deref for ShaderStorageBlock {
    type Target = BufferBackedBlock;

    fn deref(&self) -> &Self::Target {
        &self.block
    }
}

impl DeclarationTrait for ShaderStorageBlock {
    fn name(&self) -> Key {
        self.block.name
    }

    fn is_valid(&self) -> bool {
        !self.block.name.is_null()
    }

    fn source_code(&self) -> String {
        self.block.structures_source_code() + &self.body_source_code()
    }

    /// Size of the fixed part; a trailing flexible array adds nothing.
    fn byte_size(&self) -> usize {
        self.block.layout().layout.size
    }
}
