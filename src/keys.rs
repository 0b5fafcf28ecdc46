//! Well-Known Keys
//!
//! Process-wide, read-only [`Key`] constants for the GLSL vocabulary used by
//! the declarations. Each constant is interned on first use and never changes
//! afterwards, so the statics are freely shared between concurrent generation
//! passes.
//!
//! ```rust,ignore
//! use glsl_interface::keys;
//!
//! let qualifier = *keys::FLAT;
//! assert_eq!(qualifier.as_str(), "flat");
//! ```

use std::sync::LazyLock;

use crate::key::Key;

macro_rules! define_keys {
    (
        $(
            $(#[$meta:meta])*
            $name:ident => $text:literal
        ),* $(,)?
    ) => {
        $(
            $(#[$meta])*
            pub static $name: LazyLock<Key> = LazyLock::new(|| Key::new($text));
        )*

        /// Every well-known token, in declaration order.
        pub const ALL_TOKENS: &[&str] = &[$($text),*];
    };
}

define_keys! {
    // Qualifiers
    CONST => "const",
    UNIFORM => "uniform",
    IN => "in",
    OUT => "out",
    BUFFER => "buffer",
    LAYOUT => "layout",
    STRUCT => "struct",

    // Layout parameters
    SET => "set",
    BINDING => "binding",
    LOCATION => "location",

    // Memory layouts
    PACKED => "packed",
    STD140 => "std140",
    STD430 => "std430",

    // Interpolation qualifiers
    FLAT => "flat",
    SMOOTH => "smooth",
    NO_PERSPECTIVE => "noperspective",
    CENTROID => "centroid",

    // Memory qualifiers (storage blocks)
    COHERENT => "coherent",
    VOLATILE => "volatile",
    RESTRICT => "restrict",
    READ_ONLY => "readonly",
    WRITE_ONLY => "writeonly",

    // Literal types
    VOID => "void",
    BOOL => "bool",
    INT => "int",
    UINT => "uint",
    FLOAT => "float",
    DOUBLE => "double",
    VEC2 => "vec2",
    VEC3 => "vec3",
    VEC4 => "vec4",
    IVEC2 => "ivec2",
    IVEC3 => "ivec3",
    IVEC4 => "ivec4",
    UVEC2 => "uvec2",
    UVEC3 => "uvec3",
    UVEC4 => "uvec4",
    MAT2 => "mat2",
    MAT3 => "mat3",
    MAT4 => "mat4",

    // Vertex attribute variables
    /// `gl_Vertex` replacement.
    ATTR_POSITION => "sva_Vertex",
    ATTR_TANGENT => "sva_Tangent",
    ATTR_BINORMAL => "sva_Binormal",
    ATTR_NORMAL => "sva_Normal",
    ATTR_COLOR => "sva_Color",
    ATTR_PRIMARY_2D_TEX_COORDS => "sva_2DTexCoord0",
    ATTR_PRIMARY_3D_TEX_COORDS => "sva_3DTexCoord0",
    ATTR_SECONDARY_2D_TEX_COORDS => "sva_2DTexCoord1",
    ATTR_SECONDARY_3D_TEX_COORDS => "sva_3DTexCoord1",
    ATTR_MODEL_MATRIX => "sva_ModelMatrix",
    ATTR_NORMAL_MODEL_MATRIX => "sva_NormalModelMatrix",
}
