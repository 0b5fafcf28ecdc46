#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Typed GLSL shader-interface declarations and deterministic stage source
//! generation.
//!
//! Declarations ([`StageInput`], [`StageOutput`], [`UniformBlock`],
//! [`ShaderStorageBlock`], [`Structure`]) are assembled into a
//! [`ShaderDefinition`], and a [`ShaderGenerator`] turns the definition into
//! GLSL text for a given geometry. Blocks also report their `std140`,
//! `std430` or `packed` byte layout so host code can fill the buffers.

pub mod declaration;
pub mod errors;
pub mod generator;
pub mod geometry;
pub mod key;
pub mod keys;
pub mod layout;
pub mod types;
pub mod utils;

pub use declaration::{
    ArraySize, Declaration, DeclarationKind, DeclarationTrait, MemoryQualifier, Member, ShaderStorageBlock,
    StageInput, StageOutput, Structure, UniformBlock,
};
pub use errors::{Result, ShaderGenError};
pub use generator::{GeneratorConfig, GlslProfile, ShaderDefinition, ShaderGenerator, ShaderSource, ShaderStage};
pub use geometry::{GeometryInterface, VertexAttributeType, VertexAttributes};
pub use key::Key;
pub use layout::MemoryLayout;
pub use types::VariableType;
pub use utils::interner;
