use std::fmt;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::declaration::{Declaration, DeclarationKind, DeclarationTrait};
use crate::key::Key;

use super::ShaderStage;

/// `#extension <name> : <behavior>` directive.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Extension {
    pub name: String,
    pub behavior: String,
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#extension {} : {}", self.name, self.behavior)
    }
}

/// Everything one shader stage declares, collected before generation.
///
/// Built once, then handed by reference to
/// [`ShaderGenerator::generate`](super::ShaderGenerator::generate). A frozen
/// definition can be shared between threads.
#[derive(Clone, Debug)]
pub struct ShaderDefinition {
    stage: ShaderStage,
    name: String,
    declarations: Vec<Declaration>,
    declared: FxHashSet<(DeclarationKind, Key)>,
    extensions: SmallVec<[Extension; 2]>,
    main_body: Option<String>,
}

impl ShaderDefinition {
    #[must_use]
    pub fn new(stage: ShaderStage, name: impl Into<String>) -> Self {
        Self {
            stage,
            name: name.into(),
            declarations: Vec::new(),
            declared: FxHashSet::default(),
            extensions: SmallVec::new(),
            main_body: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records a declaration. A second declaration of the same kind and name
    /// is ignored and `false` is returned; the first one wins.
    pub fn declare(&mut self, declaration: impl Into<Declaration>) -> bool {
        let declaration = declaration.into();
        let id = (declaration.kind(), declaration.name());

        if !self.declared.insert(id) {
            log::warn!(
                "{} '{}' is already declared in {} '{}', ignoring",
                id.0.label(),
                id.1,
                self.stage,
                self.name
            );
            return false;
        }

        self.declarations.push(declaration);
        true
    }

    /// Declarations in declaration order.
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn add_extension(&mut self, name: impl Into<String>, behavior: impl Into<String>) {
        self.extensions.push(Extension { name: name.into(), behavior: behavior.into() });
    }

    #[must_use]
    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// Statements placed inside `void main ()`.
    pub fn set_main_body(&mut self, body: impl Into<String>) {
        self.main_body = Some(body.into());
    }

    #[must_use]
    pub fn main_body(&self) -> Option<&str> {
        self.main_body.as_deref()
    }

    #[must_use]
    pub fn declaration_stats(&self) -> DeclarationStats {
        let mut stats = DeclarationStats::default();
        for declaration in &self.declarations {
            let counter = match declaration.kind() {
                DeclarationKind::Structure => &mut stats.structures,
                DeclarationKind::StageInput => &mut stats.stage_inputs,
                DeclarationKind::UniformBlock => &mut stats.uniform_blocks,
                DeclarationKind::ShaderStorageBlock => &mut stats.storage_blocks,
                DeclarationKind::StageOutput => &mut stats.stage_outputs,
            };
            *counter += 1;
        }
        stats
    }
}

/// Declaration counts per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DeclarationStats {
    pub structures: usize,
    pub stage_inputs: usize,
    pub uniform_blocks: usize,
    pub storage_blocks: usize,
    pub stage_outputs: usize,
}

impl DeclarationStats {
    #[must_use]
    pub fn total(&self) -> usize {
        self.structures + self.stage_inputs + self.uniform_blocks + self.storage_blocks + self.stage_outputs
    }
}

impl fmt::Display for DeclarationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Shader declarations :")?;
        writeln!(f, "Structure : {}", self.structures)?;
        writeln!(f, "Uniform block : {}", self.uniform_blocks)?;
        writeln!(f, "Shader storage block : {}", self.storage_blocks)?;
        writeln!(f, "Stage input : {}", self.stage_inputs)?;
        writeln!(f, "Stage output : {}", self.stage_outputs)
    }
}
