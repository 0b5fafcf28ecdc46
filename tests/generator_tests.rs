//! Generator Tests
//!
//! Tests for:
//! - ShaderGenerator: section order, headers, extensions, main body
//! - Filtering: invalid declarations, unsized varyings, missing vertex attributes
//! - Structure hoisting: first-reference order, dependency order and deduplication
//! - Determinism: identical inputs give identical text and hash
//! - Concurrency: independent definitions generated on parallel threads

use std::sync::Arc;
use std::thread;

use glsl_interface::declaration::{ArraySize, Member};
use glsl_interface::generator::BlockBinding;
use glsl_interface::{
    GeneratorConfig, GlslProfile, Key, MemoryLayout, ShaderDefinition, ShaderGenError, ShaderGenerator,
    ShaderStage, ShaderStorageBlock, StageInput, StageOutput, Structure, UniformBlock, VertexAttributeType,
    VertexAttributes, keys,
};

fn generator() -> ShaderGenerator {
    let _ = env_logger::builder().is_test(true).try_init();
    ShaderGenerator::new(GeneratorConfig::default()).unwrap()
}

fn light_structure() -> Structure {
    let mut light = Structure::new("LightData");
    light.add_member("color", Member::scalar("vec4", "color")).unwrap();
    light.add_member("direction", Member::scalar("vec3", "direction")).unwrap();
    light
}

fn material_structure() -> Structure {
    let mut material = Structure::new("MaterialData");
    material.add_member("albedo", Member::scalar("vec4", "albedo")).unwrap();
    material
}

fn camera_block() -> UniformBlock {
    let mut block = UniformBlock::new(0, 1, MemoryLayout::Std140, "CameraData", Key::NULL, ArraySize::Scalar).unwrap();
    block.add_member("viewProjection", Member::scalar("mat4", "viewProjection")).unwrap();
    block.add_member("cameraPosition", Member::scalar("vec3", "cameraPosition")).unwrap();
    block
}

fn lights_block() -> ShaderStorageBlock {
    let mut block = ShaderStorageBlock::new(0, 2, MemoryLayout::Std430, "Lights", Key::NULL, ArraySize::Scalar);
    block.add_structure("LightData", light_structure());
    block.add_member("lights", Member::new("LightData", "lights", ArraySize::Unsized)).unwrap();
    block
}

fn vertex_definition() -> ShaderDefinition {
    let mut definition = ShaderDefinition::new(ShaderStage::Vertex, "MeshVertex");
    definition.declare(StageOutput::new(0, "vec3", "worldNormal", *keys::SMOOTH, ArraySize::Scalar));
    definition.declare(lights_block());
    definition.declare(camera_block());
    definition.declare(StageInput::from_vertex_attribute(VertexAttributeType::Position));
    definition.declare(StageInput::from_vertex_attribute(VertexAttributeType::Normal));
    definition.declare(StageInput::from_vertex_attribute(VertexAttributeType::Primary2DTextureCoordinates));
    definition.set_main_body("\tgl_Position = viewProjection * vec4(sva_Vertex, 1.0);\n");
    definition
}

fn position(code: &str, needle: &str) -> usize {
    code.find(needle).unwrap_or_else(|| panic!("'{needle}' not found in:\n{code}"))
}

// ============================================================================
// Section ordering
// ============================================================================

#[test]
fn sections_follow_fixed_order() {
    let geometry = VertexAttributes::POSITION | VertexAttributes::NORMAL | VertexAttributes::PRIMARY_TEX_COORDS_2D;
    let source = generator().generate(&vertex_definition(), &geometry).unwrap();
    let code = &source.code;

    let structure = position(code, "struct LightData");
    let input = position(code, "in vec3 sva_Vertex;");
    let uniform = position(code, "uniform CameraData");
    let storage = position(code, "buffer Lights");
    let output = position(code, "out vec3 worldNormal;");
    let main = position(code, "void main ()");

    assert!(structure < input);
    assert!(input < uniform);
    assert!(uniform < storage);
    assert!(storage < output);
    assert!(output < main);
}

#[test]
fn full_vertex_stage_text() {
    let geometry = VertexAttributes::POSITION | VertexAttributes::PRIMARY_TEX_COORDS_2D;
    let source = generator().generate(&vertex_definition(), &geometry).unwrap();

    let expected = "\
#version 450 core

/* VertexShader : MeshVertex */

/* Structures */
struct LightData
{
\tvec4 color;
\tvec3 direction;
};

/* Stage inputs (From previous stage) */
layout (location = 0) in vec3 sva_Vertex;
layout (location = 4) in vec2 sva_2DTexCoord0;

/* Uniform blocks */
layout (std140, set = 0, binding = 1) uniform CameraData
{
\tmat4 viewProjection;
\tvec3 cameraPosition;
};

/* Shader storage blocks */
layout (std430, set = 0, binding = 2) buffer Lights
{
\tLightData lights[];
};

/* Stage outputs (To next stage) */
layout (location = 0) smooth out vec3 worldNormal;

void main ()
{
\tgl_Position = viewProjection * vec4(sva_Vertex, 1.0);
}
";
    assert_eq!(source.code, expected);
}

#[test]
fn empty_sections_are_commented() {
    let mut definition = ShaderDefinition::new(ShaderStage::Fragment, "Flat");
    definition.declare(StageOutput::new(0, "vec4", "fragColor", Key::NULL, ArraySize::Scalar));

    let code = generator().generate(&definition, &VertexAttributes::empty()).unwrap().code;
    assert!(code.contains("/* No Structures */\n\n"));
    assert!(code.contains("/* No Stage inputs (From previous stage) */\n\n"));
    assert!(code.contains("/* No Uniform blocks */\n\n"));
    assert!(code.contains("/* No Shader storage blocks */\n\n"));
}

#[test]
fn section_comments_can_be_disabled() {
    let config = GeneratorConfig { section_comments: false, ..GeneratorConfig::default() };
    let generator = ShaderGenerator::new(config).unwrap();

    let mut definition = ShaderDefinition::new(ShaderStage::Fragment, "Bare");
    definition.declare(StageOutput::new(0, "vec4", "fragColor", Key::NULL, ArraySize::Scalar));

    let code = generator.generate(&definition, &VertexAttributes::empty()).unwrap().code;
    assert!(!code.contains("/* No"));
    assert!(!code.contains("/* Stage outputs"));
    assert!(code.contains("layout (location = 0) out vec4 fragColor;\n"));
}

#[test]
fn version_profile_and_extensions() {
    let generator = ShaderGenerator::new(GeneratorConfig::default().with_version(460, GlslProfile::Compatibility)).unwrap();

    let mut definition = ShaderDefinition::new(ShaderStage::Compute, "Cull");
    definition.add_extension("GL_EXT_nonuniform_qualifier", "enable");
    definition.set_main_body("");

    let code = generator.generate(&definition, &VertexAttributes::empty()).unwrap().code;
    assert!(code.starts_with(
        "#version 460 compatibility\n#extension GL_EXT_nonuniform_qualifier : enable\n\n/* ComputeShader : Cull */\n"
    ));
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn inputs_for_missing_attributes_are_dropped() {
    let source = generator().generate(&vertex_definition(), &VertexAttributes::POSITION).unwrap();

    assert!(source.code.contains("sva_Vertex"));
    assert!(!source.code.contains("sva_Normal"));
    assert!(!source.code.contains("sva_2DTexCoord0"));
}

#[test]
fn attribute_format_is_part_of_the_query() {
    let mut definition = ShaderDefinition::new(ShaderStage::Vertex, "Coords");
    definition.declare(StageInput::from_vertex_attribute(VertexAttributeType::Primary3DTextureCoordinates));
    definition.declare(StageOutput::new(0, "vec3", "uvw", Key::NULL, ArraySize::Scalar));

    let only_2d = VertexAttributes::PRIMARY_TEX_COORDS_2D;
    let code = generator().generate(&definition, &only_2d).unwrap().code;
    assert!(!code.contains("sva_3DTexCoord0"));

    let with_3d = VertexAttributes::PRIMARY_TEX_COORDS_3D;
    let code = generator().generate(&definition, &with_3d).unwrap().code;
    assert!(code.contains("layout (location = 5) in vec3 sva_3DTexCoord0;\n"));
}

#[test]
fn invalid_declarations_are_skipped() {
    let mut definition = ShaderDefinition::new(ShaderStage::Fragment, "Invalid");
    definition.declare(StageInput::new(0, "", "missingType", Key::NULL, ArraySize::Scalar));
    definition.declare(StageOutput::new(0, "vec4", Key::NULL, Key::NULL, ArraySize::Scalar));
    definition.declare(StageOutput::new(1, "vec4", "fragColor", Key::NULL, ArraySize::Scalar));

    let code = generator().generate(&definition, &VertexAttributes::empty()).unwrap().code;
    assert!(!code.contains("missingType"));
    assert_eq!(code.matches("layout (location").count(), 1);
}

#[test]
fn unsized_stage_variables_are_skipped() {
    let mut definition = ShaderDefinition::new(ShaderStage::Geometry, "Unsized");
    definition.declare(StageInput::new(0, "vec3", "positions", Key::NULL, ArraySize::Unsized));
    definition.declare(StageInput::new(1, "vec3", "normals", Key::NULL, ArraySize::fixed(3)));

    let code = generator().generate(&definition, &VertexAttributes::empty()).unwrap().code;
    assert!(!code.contains("positions"));
    assert!(code.contains("in vec3 normals[3];"));
}

#[test]
fn nothing_left_is_an_error() {
    let mut definition = ShaderDefinition::new(ShaderStage::Vertex, "Nothing");
    definition.declare(StageInput::from_vertex_attribute(VertexAttributeType::Tangent));

    match generator().generate(&definition, &VertexAttributes::POSITION) {
        Err(ShaderGenError::NoDeclarations { stage, name }) => {
            assert_eq!(stage, "VertexShader");
            assert_eq!(name, "Nothing");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

// ============================================================================
// Structure hoisting
// ============================================================================

#[test]
fn shared_structures_are_emitted_once() {
    let mut material_block = UniformBlock::new(1, 0, MemoryLayout::Std140, "Material", Key::NULL, ArraySize::Scalar).unwrap();
    material_block.add_structure("MaterialData", material_structure());
    material_block.add_structure("LightData", light_structure());
    material_block.add_member("material", Member::scalar("MaterialData", "material")).unwrap();
    material_block.add_member("sun", Member::scalar("LightData", "sun")).unwrap();

    let mut definition = ShaderDefinition::new(ShaderStage::Fragment, "Shared");
    definition.declare(lights_block());
    definition.declare(material_block);
    definition.declare(light_structure());

    let code = generator().generate(&definition, &VertexAttributes::empty()).unwrap().code;
    assert_eq!(code.matches("struct LightData").count(), 1);
    assert_eq!(code.matches("struct MaterialData").count(), 1);
    // Uniform block references are hoisted before storage block references.
    assert!(position(&code, "struct MaterialData") < position(&code, "struct LightData"));
}

#[test]
fn standalone_structures_follow_referenced_ones() {
    let mut definition = ShaderDefinition::new(ShaderStage::Fragment, "Standalone");
    definition.declare(material_structure());
    definition.declare(lights_block());

    let code = generator().generate(&definition, &VertexAttributes::empty()).unwrap().code;
    assert!(position(&code, "struct LightData") < position(&code, "struct MaterialData"));
}

#[test]
fn hoisted_structures_follow_their_dependencies() {
    let mut scene = Structure::new("Scene");
    scene.add_member("sun", Member::scalar("LightData", "sun")).unwrap();

    let mut block = UniformBlock::new(0, 0, MemoryLayout::Std140, "Frame", Key::NULL, ArraySize::Scalar).unwrap();
    block.add_structure("Scene", scene);
    block.add_structure("LightData", light_structure());
    block.add_member("scene", Member::scalar("Scene", "scene")).unwrap();

    let mut definition = ShaderDefinition::new(ShaderStage::Fragment, "Nested");
    definition.declare(block);

    let code = generator().generate(&definition, &VertexAttributes::empty()).unwrap().code;
    assert_eq!(code.matches("struct LightData").count(), 1);
    assert!(position(&code, "struct LightData") < position(&code, "struct Scene"));
}

#[test]
fn block_structures_can_use_standalone_ones() {
    let mut scene = Structure::new("Scene");
    scene.add_member("material", Member::scalar("MaterialData", "material")).unwrap();

    let mut block = UniformBlock::new(0, 0, MemoryLayout::Std140, "Frame", Key::NULL, ArraySize::Scalar).unwrap();
    block.add_structure("Scene", scene);
    block.add_member("scene", Member::scalar("Scene", "scene")).unwrap();

    let mut definition = ShaderDefinition::new(ShaderStage::Fragment, "Standalone");
    definition.declare(block);
    definition.declare(material_structure());

    let code = generator().generate(&definition, &VertexAttributes::empty()).unwrap().code;
    assert_eq!(code.matches("struct MaterialData").count(), 1);
    assert!(position(&code, "struct MaterialData") < position(&code, "struct Scene"));
}

#[test]
fn conflicting_structure_definitions_keep_the_first() {
    let mut wide = Structure::new("LightData");
    wide.add_member("color", Member::scalar("vec4", "color")).unwrap();
    wide.add_member("range", Member::scalar("float", "range")).unwrap();

    let mut block = UniformBlock::new(1, 0, MemoryLayout::Std140, "Sun", Key::NULL, ArraySize::Scalar).unwrap();
    block.add_structure("LightData", wide);
    block.add_member("sun", Member::scalar("LightData", "sun")).unwrap();

    let mut definition = ShaderDefinition::new(ShaderStage::Fragment, "Conflict");
    definition.declare(block);
    definition.declare(lights_block());

    let code = generator().generate(&definition, &VertexAttributes::empty()).unwrap().code;
    assert_eq!(code.matches("struct LightData").count(), 1);
    assert!(code.contains("\tfloat range;\n"));
    assert!(!code.contains("\tvec3 direction;\n"));
}

#[test]
fn output_ends_with_one_newline() {
    let mut definition = ShaderDefinition::new(ShaderStage::Fragment, "Tail");
    definition.declare(material_structure());

    let code = generator().generate(&definition, &VertexAttributes::empty()).unwrap().code;
    assert!(code.ends_with("/* No Stage outputs (To next stage) */\n"));
    assert!(!code.ends_with("\n\n"));
}

// ============================================================================
// Results
// ============================================================================

#[test]
fn duplicate_declarations_keep_the_first() {
    let mut definition = ShaderDefinition::new(ShaderStage::Fragment, "Duplicates");
    assert!(definition.declare(StageOutput::new(0, "vec4", "fragColor", Key::NULL, ArraySize::Scalar)));
    assert!(!definition.declare(StageOutput::new(3, "vec3", "fragColor", Key::NULL, ArraySize::Scalar)));

    let code = generator().generate(&definition, &VertexAttributes::empty()).unwrap().code;
    assert!(code.contains("layout (location = 0) out vec4 fragColor;"));
    assert!(!code.contains("location = 3"));
}

#[test]
fn block_bindings_are_reported() {
    let source = generator().generate(&vertex_definition(), &VertexAttributes::all()).unwrap();

    assert_eq!(
        source.uniform_blocks,
        vec![BlockBinding { name: Key::new("CameraData"), set: 0, binding: 1, byte_size: 80 }]
    );
    assert_eq!(source.storage_blocks.len(), 1);
    assert_eq!(source.storage_blocks[0].name.as_str(), "Lights");
    assert_eq!(source.storage_blocks[0].byte_size, 0);
}

#[test]
fn generation_is_deterministic() {
    let generator = generator();
    let geometry = VertexAttributes::all();

    let first = generator.generate(&vertex_definition(), &geometry).unwrap();
    let second = generator.generate(&vertex_definition(), &geometry).unwrap();
    assert_eq!(first.code, second.code);
    assert_eq!(first.hash, second.hash);

    let other = generator.generate(&vertex_definition(), &VertexAttributes::POSITION).unwrap();
    assert_ne!(first.hash, other.hash);
}

#[test]
fn stages_generate_in_parallel() {
    let generator = Arc::new(generator());
    let definition = Arc::new(vertex_definition());
    let expected = generator.generate(definition.as_ref(), &VertexAttributes::all()).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let generator = Arc::clone(&generator);
            let definition = Arc::clone(&definition);
            thread::spawn(move || generator.generate(definition.as_ref(), &VertexAttributes::all()).unwrap())
        })
        .collect();

    for handle in handles {
        let source = handle.join().unwrap();
        assert_eq!(source.hash, expected.hash);
        assert_eq!(source.code, expected.code);
    }
}
