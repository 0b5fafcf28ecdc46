use rustc_hash::FxHashMap;

use crate::errors::{Result, ShaderGenError};
use crate::key::Key;
use crate::layout::{MemberShape, MemoryLayout, StructLayout, TypeLayout};

use super::{ArraySize, DeclarationTrait, KeyedEntries, MAX_STRUCTURE_DEPTH, Member, StructureMap};

/// Named aggregate type, emitted ahead of any block that uses it.
///
/// ```text
/// struct LightData
/// {
///     vec4 color;
///     vec3 direction;
/// };
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Structure {
    name: Key,
    members: KeyedEntries<Member>,
}

impl Structure {
    #[must_use]
    pub fn new(name: impl Into<Key>) -> Self {
        Self { name: name.into(), members: KeyedEntries::new() }
    }

    /// Inserts or overwrites the member stored under `key`. A member keeps
    /// the position of the first insertion of its key.
    ///
    /// # Errors
    ///
    /// - [`ShaderGenError::InvalidMember`] when the member lacks a type or name.
    /// - [`ShaderGenError::UnsizedArrayInStructure`] for a flexible array member.
    pub fn add_member(&mut self, key: impl Into<Key>, member: Member) -> Result<()> {
        member.ensure_valid(self.name)?;
        if member.array_size() == ArraySize::Unsized {
            return Err(ShaderGenError::UnsizedArrayInStructure {
                structure: self.name.as_str().to_owned(),
                member: member.name().as_str().to_owned(),
            });
        }
        self.members.insert(key.into(), member);
        Ok(())
    }

    /// Builder form of [`add_member`](Self::add_member), keyed by member name.
    ///
    /// # Errors
    ///
    /// Same as [`add_member`](Self::add_member).
    pub fn with_member(mut self, member: Member) -> Result<Self> {
        self.add_member(member.name(), member)?;
        Ok(self)
    }

    #[must_use]
    pub fn members(&self) -> &KeyedEntries<Member> {
        &self.members
    }

    /// Layout of the structure under `policy`; nested structure types are
    /// looked up in `structures`.
    #[must_use]
    pub fn layout(&self, policy: MemoryLayout, structures: &StructureMap) -> StructLayout {
        self.layout_at_depth(policy, structures, 0)
    }

    pub(crate) fn layout_at_depth(
        &self,
        policy: MemoryLayout,
        structures: &StructureMap,
        depth: usize,
    ) -> StructLayout {
        layout_members(self.name, self.members.values(), policy, structures, depth)
    }
}

impl DeclarationTrait for Structure {
    fn name(&self) -> Key {
        self.name
    }

    fn is_valid(&self) -> bool {
        !self.name.is_null()
    }

    fn source_code(&self) -> String {
        let mut code = format!("struct {}\n{{\n", self.name);
        for member in self.members.values() {
            code.push('\t');
            code.push_str(&member.source_code());
        }
        code.push_str("};\n");
        code
    }

    /// `std140` size. Nested structures cannot be resolved here and count as
    /// zero; use [`Structure::layout`] with the block's structures instead.
    fn byte_size(&self) -> usize {
        self.layout(MemoryLayout::Std140, &StructureMap::new()).layout.size
    }
}

/// Lays out `members` in order. Members of unresolved types occupy no space.
pub(crate) fn layout_members<'a>(
    owner: Key,
    members: impl Iterator<Item = &'a Member>,
    policy: MemoryLayout,
    structures: &StructureMap,
    depth: usize,
) -> StructLayout {
    let shapes = members.map(|member| {
        member.shape(policy, structures, depth).unwrap_or_else(|| {
            log::warn!(
                "Cannot resolve the layout of member '{}' ({}) in '{}', counted as 0 bytes",
                member.name(),
                member.ty(),
                owner
            );
            MemberShape::Sized(TypeLayout { size: 0, align: 1 })
        })
    });
    policy.struct_layout(shapes)
}

// ============================================================================
// Dependency-ordered emission
// ============================================================================

/// Emits structure definitions once each, every structure after the
/// structures its members use.
///
/// Member types resolve against the scope the structure was registered in
/// (a block's structure map) and then against the standalone structures.
#[derive(Default)]
pub(crate) struct StructureEmitter<'a> {
    standalone: Vec<&'a Structure>,
    emitted: FxHashMap<Key, &'a Structure>,
    code: String,
}

impl<'a> StructureEmitter<'a> {
    pub(crate) fn new(standalone: Vec<&'a Structure>) -> Self {
        Self { standalone, ..Self::default() }
    }

    pub(crate) fn emit(&mut self, structure: &'a Structure, scope: Option<&'a StructureMap>) {
        self.emit_at_depth(structure, scope, 0);
    }

    pub(crate) fn finish(self) -> String {
        self.code
    }

    fn emit_at_depth(&mut self, structure: &'a Structure, scope: Option<&'a StructureMap>, depth: usize) {
        if self.already_emitted(structure) {
            return;
        }
        if depth >= MAX_STRUCTURE_DEPTH {
            log::warn!("Structure nesting too deep while ordering '{}'", structure.name);
            return;
        }

        for member in structure.members.values() {
            if member.variable_type().is_some() {
                continue;
            }
            if let Some(dependency) = self.lookup(scope, member.ty()) {
                self.emit_at_depth(dependency, scope, depth + 1);
            }
        }

        // A self-referencing chain may have emitted it while recursing.
        if self.already_emitted(structure) {
            return;
        }
        self.emitted.insert(structure.name, structure);
        self.code.push_str(&structure.source_code());
    }

    fn already_emitted(&self, structure: &Structure) -> bool {
        let Some(previous) = self.emitted.get(&structure.name) else {
            return false;
        };
        if *previous != structure {
            log::warn!(
                "Conflicting definitions of structure '{}', keeping the first one emitted",
                structure.name
            );
        }
        true
    }

    fn lookup(&self, scope: Option<&'a StructureMap>, ty: Key) -> Option<&'a Structure> {
        scope
            .and_then(|structures| structures.get(ty))
            .or_else(|| self.standalone.iter().copied().find(|s| s.name == ty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light_data() -> Structure {
        Structure::new("LightData")
            .with_member(Member::scalar("vec4", "color"))
            .and_then(|s| s.with_member(Member::scalar("vec3", "direction")))
            .unwrap()
    }

    #[test]
    fn test_source_code() {
        assert_eq!(
            light_data().source_code(),
            "struct LightData\n{\n\tvec4 color;\n\tvec3 direction;\n};\n"
        );
    }

    #[test]
    fn test_rejects_unsized_member() {
        let mut structure = Structure::new("Broken");
        let result = structure.add_member("values", Member::new("float", "values", ArraySize::Unsized));
        assert!(matches!(result, Err(ShaderGenError::UnsizedArrayInStructure { .. })));
        assert!(structure.members().is_empty());
    }

    #[test]
    fn test_byte_size_is_std140() {
        // vec4 + vec3 = 28, rounded up to the 16 byte structure alignment.
        assert_eq!(light_data().byte_size(), 32);
        assert_eq!(light_data().layout(MemoryLayout::Packed, &StructureMap::new()).layout.size, 28);
    }

    #[test]
    fn test_nested_structure_layout() {
        let mut structures = StructureMap::new();
        structures.insert(Key::new("LightData"), light_data());

        let scene = Structure::new("Scene")
            .with_member(Member::new("LightData", "lights", ArraySize::fixed(2)))
            .and_then(|s| s.with_member(Member::scalar("uint", "lightCount")))
            .unwrap();

        let layout = scene.layout(MemoryLayout::Std430, &structures);
        assert_eq!(layout.offsets, vec![0, 64]);
        assert_eq!(layout.layout.size, 80);
    }

    #[test]
    fn test_rejects_invalid_member() {
        let mut structure = Structure::new("Broken");
        let result = structure.add_member("x", Member::scalar("float", Key::NULL));
        assert!(matches!(result, Err(ShaderGenError::InvalidMember { .. })));
        let result = structure.add_member("y", Member::scalar(Key::NULL, "y"));
        assert!(matches!(result, Err(ShaderGenError::InvalidMember { .. })));
        assert!(structure.members().is_empty());
    }

    #[test]
    fn test_emitter_orders_dependencies_first() {
        let scene = Structure::new("Scene")
            .with_member(Member::scalar("LightData", "sun"))
            .and_then(|s| s.with_member(Member::scalar("float", "exposure")))
            .unwrap();

        let mut structures = StructureMap::new();
        structures.insert(Key::new("Scene"), scene);
        structures.insert(Key::new("LightData"), light_data());

        let mut emitter = StructureEmitter::default();
        for structure in structures.values() {
            emitter.emit(structure, Some(&structures));
        }
        let code = emitter.finish();

        assert_eq!(code.matches("struct LightData").count(), 1);
        assert!(code.find("struct LightData").unwrap() < code.find("struct Scene").unwrap());
    }

    #[test]
    fn test_emitter_survives_self_reference() {
        let node = Structure::new("Node").with_member(Member::scalar("Node", "next")).unwrap();
        let mut structures = StructureMap::new();
        structures.insert(Key::new("Node"), node);

        let mut emitter = StructureEmitter::default();
        for structure in structures.values() {
            emitter.emit(structure, Some(&structures));
        }
        assert_eq!(emitter.finish().matches("struct Node").count(), 1);
    }

    #[test]
    fn test_validity() {
        assert!(Structure::new("A").is_valid());
        assert!(!Structure::new("").is_valid());
    }
}
