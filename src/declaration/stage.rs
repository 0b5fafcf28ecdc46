use crate::geometry::VertexAttributeType;
use crate::key::Key;
use crate::keys;

use super::{ArraySize, DeclarationTrait};

/// Data shared by stage inputs and outputs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StageVariable {
    location: u32,
    ty: Key,
    name: Key,
    interpolation: Key,
    array_size: ArraySize,
}

impl StageVariable {
    /// `interpolation` may be [`Key::NULL`].
    #[must_use]
    pub fn new(
        location: u32,
        ty: impl Into<Key>,
        name: impl Into<Key>,
        interpolation: impl Into<Key>,
        array_size: ArraySize,
    ) -> Self {
        Self {
            location,
            ty: ty.into(),
            name: name.into(),
            interpolation: interpolation.into(),
            array_size,
        }
    }

    #[inline]
    #[must_use]
    pub fn location(&self) -> u32 {
        self.location
    }

    #[inline]
    #[must_use]
    pub fn ty(&self) -> Key {
        self.ty
    }

    #[inline]
    #[must_use]
    pub fn interpolation(&self) -> Key {
        self.interpolation
    }

    #[inline]
    #[must_use]
    pub fn array_size(&self) -> ArraySize {
        self.array_size
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        self.array_size.is_array()
    }

    #[must_use]
    pub fn is_non_fixed_array_size(&self) -> bool {
        self.array_size.is_non_fixed()
    }

    fn is_valid(&self) -> bool {
        !self.ty.is_null() && !self.name.is_null()
    }

    fn source_code(&self, direction: Key) -> String {
        let mut code = format!("{} ({} = {}) ", *keys::LAYOUT, *keys::LOCATION, self.location);
        if let Some(interpolation) = self.interpolation.non_null() {
            code.push_str(interpolation.as_str());
            code.push(' ');
        }
        code.push_str(&format!(
            "{direction} {} {}{};\n",
            self.ty,
            self.name,
            self.array_size.suffix()
        ));
        code
    }
}

/// Value received from the previous stage, or a vertex attribute in a
/// vertex shader.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StageInput {
    variable: StageVariable,
    required_attribute: Option<VertexAttributeType>,
}

impl StageInput {
    #[must_use]
    pub fn new(
        location: u32,
        ty: impl Into<Key>,
        name: impl Into<Key>,
        interpolation: impl Into<Key>,
        array_size: ArraySize,
    ) -> Self {
        Self {
            variable: StageVariable::new(location, ty, name, interpolation, array_size),
            required_attribute: None,
        }
    }

    /// Input bound to a vertex attribute at its fixed location. The generator
    /// drops it when the geometry lacks the attribute.
    #[must_use]
    pub fn from_vertex_attribute(attribute: VertexAttributeType) -> Self {
        Self {
            variable: StageVariable::new(
                attribute.location(),
                attribute.glsl_type(),
                attribute.variable_name(),
                Key::NULL,
                ArraySize::Scalar,
            ),
            required_attribute: Some(attribute),
        }
    }

    /// Makes the input conditional on `attribute` being present.
    #[must_use]
    pub fn requiring(mut self, attribute: VertexAttributeType) -> Self {
        self.required_attribute = Some(attribute);
        self
    }

    #[must_use]
    pub fn required_attribute(&self) -> Option<VertexAttributeType> {
        self.required_attribute
    }

    #[must_use]
    pub fn variable(&self) -> &StageVariable {
        &self.variable
    }
}

impl std::ops::Deref for StageInput {
    type Target = StageVariable;

    fn deref(&self) -> &Self::Target {
        &self.variable
    }
}

impl DeclarationTrait for StageInput {
    fn name(&self) -> Key {
        self.variable.name
    }

    fn is_valid(&self) -> bool {
        self.variable.is_valid()
    }

    fn source_code(&self) -> String {
        self.variable.source_code(*keys::IN)
    }

    fn byte_size(&self) -> usize {
        0
    }
}

/// Value passed to the next stage.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StageOutput(StageVariable);

impl StageOutput {
    #[must_use]
    pub fn new(
        location: u32,
        ty: impl Into<Key>,
        name: impl Into<Key>,
        interpolation: impl Into<Key>,
        array_size: ArraySize,
    ) -> Self {
        Self(StageVariable::new(location, ty, name, interpolation, array_size))
    }

    #[must_use]
    pub fn variable(&self) -> &StageVariable {
        &self.0
    }
}

impl std::ops::Deref for StageOutput {
    type Target = StageVariable;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DeclarationTrait for StageOutput {
    fn name(&self) -> Key {
        self.0.name
    }

    fn is_valid(&self) -> bool {
        self.0.is_valid()
    }

    fn source_code(&self) -> String {
        self.0.source_code(*keys::OUT)
    }

    fn byte_size(&self) -> usize {
        0
    }
}
