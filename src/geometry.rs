//! Geometry Capabilities
//!
//! The generator asks the geometry whether a vertex attribute exists before
//! emitting a stage input that reads it. [`GeometryInterface`] is that query;
//! [`VertexAttributes`] is the stock implementation for callers that only
//! know which attributes a mesh carries.
//!
//! Attribute locations are fixed: matrices span one location per column, so
//! the model matrix occupies locations 9 to 12 and the normal matrix 13 to 15.

use bitflags::bitflags;

use crate::key::Key;
use crate::keys;

/// Per-vertex (or per-instance) attribute with a fixed shader location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexAttributeType {
    Position,
    Tangent,
    Binormal,
    Normal,
    Primary2DTextureCoordinates,
    Primary3DTextureCoordinates,
    Secondary2DTextureCoordinates,
    Secondary3DTextureCoordinates,
    VertexColor,
    ModelMatrix,
    NormalModelMatrix,
}

impl VertexAttributeType {
    pub const ALL: [Self; 11] = [
        Self::Position,
        Self::Tangent,
        Self::Binormal,
        Self::Normal,
        Self::Primary2DTextureCoordinates,
        Self::Primary3DTextureCoordinates,
        Self::Secondary2DTextureCoordinates,
        Self::Secondary3DTextureCoordinates,
        Self::VertexColor,
        Self::ModelMatrix,
        Self::NormalModelMatrix,
    ];

    /// First shader location of the attribute.
    #[must_use]
    pub const fn location(self) -> u32 {
        match self {
            Self::Position => 0,
            Self::Tangent => 1,
            Self::Binormal => 2,
            Self::Normal => 3,
            Self::Primary2DTextureCoordinates => 4,
            Self::Primary3DTextureCoordinates => 5,
            Self::Secondary2DTextureCoordinates => 6,
            Self::Secondary3DTextureCoordinates => 7,
            Self::VertexColor => 8,
            Self::ModelMatrix => 9,
            Self::NormalModelMatrix => 13,
        }
    }

    #[must_use]
    pub fn glsl_type(self) -> Key {
        match self {
            Self::Position
            | Self::Tangent
            | Self::Binormal
            | Self::Normal
            | Self::Primary3DTextureCoordinates
            | Self::Secondary3DTextureCoordinates => *keys::VEC3,
            Self::Primary2DTextureCoordinates | Self::Secondary2DTextureCoordinates => *keys::VEC2,
            Self::VertexColor => *keys::VEC4,
            Self::ModelMatrix => *keys::MAT4,
            Self::NormalModelMatrix => *keys::MAT3,
        }
    }

    /// Name of the shader variable that receives the attribute.
    #[must_use]
    pub fn variable_name(self) -> Key {
        match self {
            Self::Position => *keys::ATTR_POSITION,
            Self::Tangent => *keys::ATTR_TANGENT,
            Self::Binormal => *keys::ATTR_BINORMAL,
            Self::Normal => *keys::ATTR_NORMAL,
            Self::Primary2DTextureCoordinates => *keys::ATTR_PRIMARY_2D_TEX_COORDS,
            Self::Primary3DTextureCoordinates => *keys::ATTR_PRIMARY_3D_TEX_COORDS,
            Self::Secondary2DTextureCoordinates => *keys::ATTR_SECONDARY_2D_TEX_COORDS,
            Self::Secondary3DTextureCoordinates => *keys::ATTR_SECONDARY_3D_TEX_COORDS,
            Self::VertexColor => *keys::ATTR_COLOR,
            Self::ModelMatrix => *keys::ATTR_MODEL_MATRIX,
            Self::NormalModelMatrix => *keys::ATTR_NORMAL_MODEL_MATRIX,
        }
    }

    #[must_use]
    pub const fn flag(self) -> VertexAttributes {
        match self {
            Self::Position => VertexAttributes::POSITION,
            Self::Tangent => VertexAttributes::TANGENT,
            Self::Binormal => VertexAttributes::BINORMAL,
            Self::Normal => VertexAttributes::NORMAL,
            Self::Primary2DTextureCoordinates => VertexAttributes::PRIMARY_TEX_COORDS_2D,
            Self::Primary3DTextureCoordinates => VertexAttributes::PRIMARY_TEX_COORDS_3D,
            Self::Secondary2DTextureCoordinates => VertexAttributes::SECONDARY_TEX_COORDS_2D,
            Self::Secondary3DTextureCoordinates => VertexAttributes::SECONDARY_TEX_COORDS_3D,
            Self::VertexColor => VertexAttributes::VERTEX_COLOR,
            Self::ModelMatrix => VertexAttributes::MODEL_MATRIX,
            Self::NormalModelMatrix => VertexAttributes::NORMAL_MODEL_MATRIX,
        }
    }
}

bitflags! {
    /// Set of attributes present in a vertex buffer layout.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct VertexAttributes: u32 {
        const POSITION                = 1 << 0;
        const TANGENT                 = 1 << 1;
        const BINORMAL                = 1 << 2;
        const NORMAL                  = 1 << 3;
        const PRIMARY_TEX_COORDS_2D   = 1 << 4;
        const PRIMARY_TEX_COORDS_3D   = 1 << 5;
        const SECONDARY_TEX_COORDS_2D = 1 << 6;
        const SECONDARY_TEX_COORDS_3D = 1 << 7;
        const VERTEX_COLOR            = 1 << 8;
        const MODEL_MATRIX            = 1 << 9;
        const NORMAL_MODEL_MATRIX     = 1 << 10;
    }
}

/// Capability query answered by the geometry bound to a pipeline.
pub trait GeometryInterface {
    /// `true` when the geometry provides `attribute` in the requested format.
    fn has_attribute(&self, attribute: VertexAttributeType) -> bool;
}

impl GeometryInterface for VertexAttributes {
    fn has_attribute(&self, attribute: VertexAttributeType) -> bool {
        self.contains(attribute.flag())
    }
}

impl<T: GeometryInterface + ?Sized> GeometryInterface for &T {
    fn has_attribute(&self, attribute: VertexAttributeType) -> bool {
        (**self).has_attribute(attribute)
    }
}

impl FromIterator<VertexAttributeType> for VertexAttributes {
    fn from_iter<I: IntoIterator<Item = VertexAttributeType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |acc, attribute| acc | attribute.flag())
    }
}
