use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// GLSL profile written after the `#version` number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlslProfile {
    #[default]
    Core,
    Compatibility,
    Es,
}

impl GlslProfile {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Compatibility => "compatibility",
            Self::Es => "es",
        }
    }
}

impl fmt::Display for GlslProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings shared by every stage a [`ShaderGenerator`](super::ShaderGenerator)
/// produces.
///
/// Missing JSON fields fall back to their defaults:
///
/// ```json
/// { "glsl_version": 460, "profile": "core", "section_comments": false }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number written in the `#version` directive.
    pub glsl_version: u32,
    pub profile: GlslProfile,
    /// Emit a `/* ... */` banner per section, and `/* No ... */` for empty ones.
    pub section_comments: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            glsl_version: 450,
            profile: GlslProfile::Core,
            section_comments: true,
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    #[must_use]
    pub fn with_version(mut self, glsl_version: u32, profile: GlslProfile) -> Self {
        self.glsl_version = glsl_version;
        self.profile = profile;
        self
    }
}
