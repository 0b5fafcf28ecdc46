//! Shader Stage Generation
//!
//! Turns a [`ShaderDefinition`] into GLSL source in one pass:
//!
//! 1. **Filter**: drop declarations that are invalid, stage variables with a
//!    flexible array, and stage inputs whose vertex attribute the geometry
//!    lacks. Dropping is silent; it is how optional shader permutations work.
//! 2. **Order**: structures referenced by blocks first (first reference wins,
//!    dependencies before their users), then standalone structures, stage inputs, uniform blocks, storage blocks
//!    and stage outputs, each group in declaration order.
//! 3. **Emit**: render the sections through the embedded stage template.
//!
//! The same definition and geometry always produce byte-identical text, so
//! [`ShaderSource::hash`] is usable as a cache key.
//!
//! ```rust,ignore
//! let generator = ShaderGenerator::new(GeneratorConfig::default())?;
//! let source = generator.generate(&definition, &VertexAttributes::POSITION)?;
//! println!("{}", source.code);
//! ```

mod config;
mod definition;
mod source;

use std::fmt;

use minijinja::{Environment, syntax::SyntaxConfig};
use serde::Serialize;

pub use config::{GeneratorConfig, GlslProfile};
pub use definition::{DeclarationStats, Extension, ShaderDefinition};
pub use source::{BlockBinding, ShaderSource};

use crate::declaration::{
    BufferBackedBlock, Declaration, DeclarationTrait, ShaderStorageBlock, StageInput, StageOutput,
    Structure, StructureEmitter, UniformBlock,
};
use crate::errors::{Result, ShaderGenError};
use crate::geometry::GeometryInterface;
use crate::utils::interner;

const STAGE_TEMPLATE_NAME: &str = "stage.glsl";
const STAGE_TEMPLATE: &str = include_str!("templates/stage.glsl");

/// Programmable pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderStage {
    Vertex,
    TessellationControl,
    TessellationEvaluation,
    Geometry,
    Fragment,
    Compute,
}

impl ShaderStage {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vertex => "VertexShader",
            Self::TessellationControl => "TessellationControlShader",
            Self::TessellationEvaluation => "TessellationEvaluationShader",
            Self::Geometry => "GeometryShader",
            Self::Fragment => "FragmentShader",
            Self::Compute => "ComputeShader",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Template context
// ============================================================================

#[derive(Serialize)]
struct Section {
    title: &'static str,
    code: String,
}

#[derive(Serialize)]
struct StageContext<'a> {
    version: u32,
    profile: &'static str,
    extensions: Vec<String>,
    stage: &'static str,
    name: &'a str,
    section_comments: bool,
    sections: [Section; 5],
    main_body: Option<&'a str>,
}

/// Declarations that survived filtering, grouped by kind.
#[derive(Default)]
struct Survivors<'a> {
    structures: Vec<&'a Structure>,
    stage_inputs: Vec<&'a StageInput>,
    uniform_blocks: Vec<&'a UniformBlock>,
    storage_blocks: Vec<&'a ShaderStorageBlock>,
    stage_outputs: Vec<&'a StageOutput>,
}

impl Survivors<'_> {
    fn is_empty(&self) -> bool {
        self.structures.is_empty()
            && self.stage_inputs.is_empty()
            && self.uniform_blocks.is_empty()
            && self.storage_blocks.is_empty()
            && self.stage_outputs.is_empty()
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Stateless stage source generator. Holds only configuration and the
/// compiled stage template, so one instance serves any number of threads.
pub struct ShaderGenerator {
    config: GeneratorConfig,
    env: Environment<'static>,
}

impl ShaderGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        interner::preload_reserved_keywords();

        let mut env = Environment::new();

        let syntax = SyntaxConfig::builder()
            .block_delimiters("{$", "$}")
            .variable_delimiters("{{", "}}")
            .build()?;

        env.set_syntax(syntax);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_undefined_behavior(minijinja::UndefinedBehavior::SemiStrict);
        env.add_template(STAGE_TEMPLATE_NAME, STAGE_TEMPLATE)?;

        Ok(Self { config, env })
    }

    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates the source of `definition` for a pipeline using `geometry`.
    ///
    /// # Errors
    ///
    /// - [`ShaderGenError::NoDeclarations`] when every declaration was
    ///   filtered out and the definition has no main body.
    /// - [`ShaderGenError::Template`] when rendering fails.
    pub fn generate<G>(&self, definition: &ShaderDefinition, geometry: &G) -> Result<ShaderSource>
    where
        G: GeometryInterface + ?Sized,
    {
        log::trace!("Generating {} '{}'", definition.stage(), definition.name());
        log::debug!("{}", definition.declaration_stats());

        let survivors = Self::filter(definition, geometry);

        if survivors.is_empty() && definition.main_body().is_none() {
            return Err(ShaderGenError::NoDeclarations {
                stage: definition.stage().to_string(),
                name: definition.name().to_owned(),
            });
        }

        log::trace!("Ordering declarations of '{}'", definition.name());
        let sections = Self::order(&survivors);

        log::trace!("Emitting '{}'", definition.name());
        let code = self.emit(definition, sections)?;

        let uniform_blocks = survivors.uniform_blocks.iter().map(|b| binding_of(b)).collect();
        let storage_blocks = survivors.storage_blocks.iter().map(|b| binding_of(b)).collect();

        let source = ShaderSource::new(
            definition.stage(),
            definition.name().to_owned(),
            code,
            uniform_blocks,
            storage_blocks,
        );

        log::debug!(
            "Generated {} '{}': {} lines, hash {:032x}",
            source.stage,
            source.name,
            source.line_count(),
            source.hash
        );

        Ok(source)
    }

    fn filter<'a, G>(definition: &'a ShaderDefinition, geometry: &G) -> Survivors<'a>
    where
        G: GeometryInterface + ?Sized,
    {
        let mut survivors = Survivors::default();

        for declaration in definition.declarations() {
            if !declaration.is_valid() {
                log::debug!(
                    "Skipping invalid {} '{}' in '{}'",
                    declaration.kind().label(),
                    declaration.name(),
                    definition.name()
                );
                continue;
            }

            match declaration {
                Declaration::StageInput(input) => {
                    if input.is_non_fixed_array_size() {
                        log::debug!("Skipping unsized stage input '{}'", input.name());
                        continue;
                    }
                    if let Some(attribute) = input.required_attribute()
                        && !geometry.has_attribute(attribute)
                    {
                        log::debug!(
                            "Skipping stage input '{}': geometry has no {attribute:?} attribute",
                            input.name()
                        );
                        continue;
                    }
                    survivors.stage_inputs.push(input);
                }
                Declaration::StageOutput(output) => {
                    if output.is_non_fixed_array_size() {
                        log::debug!("Skipping unsized stage output '{}'", output.name());
                        continue;
                    }
                    survivors.stage_outputs.push(output);
                }
                Declaration::UniformBlock(block) => survivors.uniform_blocks.push(block),
                Declaration::ShaderStorageBlock(block) => survivors.storage_blocks.push(block),
                Declaration::Structure(structure) => survivors.structures.push(structure),
            }
        }

        survivors
    }

    fn order<'a>(survivors: &Survivors<'a>) -> [Section; 5] {
        let mut emitter = StructureEmitter::new(survivors.structures.clone());

        for &block in &survivors.uniform_blocks {
            let scope = block.structures();
            for structure in scope.values() {
                emitter.emit(structure, Some(scope));
            }
        }
        for &block in &survivors.storage_blocks {
            let scope = block.structures();
            for structure in scope.values() {
                emitter.emit(structure, Some(scope));
            }
        }
        for &structure in &survivors.structures {
            emitter.emit(structure, None);
        }
        let structures = emitter.finish();

        [
            Section { title: "Structures", code: structures },
            Section {
                title: "Stage inputs (From previous stage)",
                code: survivors.stage_inputs.iter().map(|d| d.source_code()).collect(),
            },
            Section {
                title: "Uniform blocks",
                code: survivors.uniform_blocks.iter().map(|d| d.body_source_code()).collect(),
            },
            Section {
                title: "Shader storage blocks",
                code: survivors.storage_blocks.iter().map(|d| d.body_source_code()).collect(),
            },
            Section {
                title: "Stage outputs (To next stage)",
                code: survivors.stage_outputs.iter().map(|d| d.source_code()).collect(),
            },
        ]
    }

    fn emit(&self, definition: &ShaderDefinition, sections: [Section; 5]) -> Result<String> {
        let context = StageContext {
            version: self.config.glsl_version,
            profile: self.config.profile.as_str(),
            extensions: definition.extensions().iter().map(ToString::to_string).collect(),
            stage: definition.stage().label(),
            name: definition.name(),
            section_comments: self.config.section_comments,
            sections,
            main_body: definition.main_body().map(|body| body.trim_end_matches('\n')),
        };

        let template = self.env.get_template(STAGE_TEMPLATE_NAME)?;
        let mut code = template.render(&context)?;

        // Exactly one newline at the end, whichever section came last.
        code.truncate(code.trim_end_matches('\n').len());
        code.push('\n');
        Ok(code)
    }
}

fn binding_of(block: &BufferBackedBlock) -> BlockBinding {
    BlockBinding {
        name: block.name(),
        set: block.set(),
        binding: block.binding(),
        byte_size: block.layout().layout.size,
    }
}
