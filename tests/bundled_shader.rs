//! Checks on the shader file shipped in `res/shaders`.

use hello_quad::{DemoConfig, ShaderProgramSource, Stage};

fn bundled() -> ShaderProgramSource {
    ShaderProgramSource::from_file(DemoConfig::default().shader_path).unwrap()
}

#[test]
fn both_stages_are_present() {
    let source = bundled();

    assert!(source.stage(Stage::Vertex).contains("gl_Position"));
    assert!(source.stage(Stage::Fragment).contains("u_Color"));
}

#[test]
fn markers_are_stripped() {
    let source = bundled();

    for stage in [Stage::Vertex, Stage::Fragment] {
        assert!(!source.stage(stage).contains("#shader"), "{stage} kept a marker");
    }
}

#[test]
fn uniform_name_matches_config() {
    let config = DemoConfig::default();
    let source = bundled();

    assert!(source.fragment.contains(&format!("uniform vec4 {};", config.color_uniform)));
}

#[test]
fn version_header_is_prepended() {
    let header = hello_quad::version_header(3, 3, false).unwrap();
    let source = bundled().with_version_header(header);

    assert!(source.vertex.starts_with("#version 330 core\n"));
    assert!(source.fragment.starts_with("#version 330 core\n"));
}
