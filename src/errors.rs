//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`ShaderGenError`] covers:
//! - Structural violations rejected while declarations are assembled
//! - Generation passes with nothing to emit
//! - Template rendering and configuration parsing failures
//!
//! Invalid top-level declarations (missing type or name) are not errors: the
//! generator drops them silently. Invalid members are rejected on insertion.
//!
//! # Usage
//!
//! Fallible APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, ShaderGenError>`.
//!
//! ```rust,ignore
//! use glsl_interface::errors::{Result, ShaderGenError};
//!
//! fn build() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type of the shader interface generator.
#[derive(Error, Debug)]
pub enum ShaderGenError {
    // ========================================================================
    // Declaration Assembly Errors
    // ========================================================================
    /// A uniform block received a flexible array member.
    #[error("Uniform block '{block}' cannot hold the unsized array '{member}'")]
    UnsizedArrayInUniformBlock {
        /// Block name
        block: String,
        /// Offending member name
        member: String,
    },

    /// A storage block flexible array would not be the last member.
    #[error("Unsized array '{member}' must be the last member of storage block '{block}'")]
    UnsizedArrayNotLast {
        /// Block name
        block: String,
        /// Name of the flexible array member
        member: String,
    },

    /// A structure received a flexible array member.
    #[error("Structure '{structure}' cannot hold the unsized array '{member}'")]
    UnsizedArrayInStructure {
        /// Structure name
        structure: String,
        /// Offending member name
        member: String,
    },

    /// A uniform block was given a flexible instance array.
    #[error("Uniform block '{block}' cannot be an unsized array")]
    UnsizedUniformBlockArray {
        /// Block name
        block: String,
    },

    /// A member without a type or a name was added to a block or structure.
    #[error("'{owner}' cannot hold a member without type or name (type '{ty}', name '{name}')")]
    InvalidMember {
        /// Block or structure name
        owner: String,
        /// Member type, empty when missing
        ty: String,
        /// Member name, empty when missing
        name: String,
    },

    // ========================================================================
    // Generation Errors
    // ========================================================================
    /// No declaration survived filtering and there is no main body.
    #[error("{stage} '{name}' has nothing to generate")]
    NoDeclarations {
        /// Stage of the shader
        stage: String,
        /// Shader name
        name: String,
    },

    /// The stage template failed to compile or render.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Generator configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// A specialized Result type for shader interface operations.
pub type Result<T> = std::result::Result<T, ShaderGenError>;
