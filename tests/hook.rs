//! Whole call sequences, fed through the loader hook the way a host would.
use std::sync::{Arc, Mutex};

use gl_layer::{
    decode::{Args, Value},
    gl,
    program::Status,
    texture::Target,
    Config, Layer, ProgramName, ShaderName, TextureName, Version,
};

/// A layer reporting into a shared buffer.
fn layer() -> anyhow::Result<(Layer, Arc<Mutex<Vec<String>>>)> {
    let mut layer = Layer::new();
    layer.init(Config::new(Version::new(4, 6)), None)?;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    layer.set_output(move |message: &str| sink.lock().unwrap().push(message.to_owned()))?;
    Ok((layer, seen))
}

fn hook<const N: usize>(layer: &mut Layer, name: &str, args: [Value; N]) -> anyhow::Result<()> {
    layer.hook(name, N, &mut Args::new(args))?;
    Ok(())
}

#[test]
fn checked_shader_attaches_silently() -> anyhow::Result<()> {
    let (mut layer, seen) = layer()?;
    hook(&mut layer, "glCompileShader", [Value::UInt(1)])?;
    hook(
        &mut layer,
        "glGetShaderiv",
        [
            Value::UInt(1),
            Value::UInt(gl::COMPILE_STATUS),
            Value::Int(1),
        ],
    )?;
    hook(
        &mut layer,
        "glAttachShader",
        [Value::UInt(10), Value::UInt(1)],
    )?;

    assert!(seen.lock().unwrap().is_empty());
    let context = layer.context().unwrap();
    assert_eq!(
        context.program(ProgramName(10)).unwrap().shaders(),
        [ShaderName(1)]
    );
    Ok(())
}

#[test]
fn unchecked_shader_is_reported_once() -> anyhow::Result<()> {
    let (mut layer, seen) = layer()?;
    hook(&mut layer, "glCompileShader", [Value::UInt(1)])?;
    hook(
        &mut layer,
        "glAttachShader",
        [Value::UInt(10), Value::UInt(1)],
    )?;

    assert_eq!(
        *seen.lock().unwrap(),
        ["glAttachShader(program = 10, shader = 1): \
          Always check shader compilation status before trying to use the object."]
    );
    let context = layer.context().unwrap();
    assert_eq!(
        context.program(ProgramName(10)).unwrap().shaders(),
        [ShaderName(1)]
    );
    Ok(())
}

#[test]
fn uncompiled_shader_is_an_invalid_handle() -> anyhow::Result<()> {
    let (mut layer, seen) = layer()?;
    hook(
        &mut layer,
        "glAttachShader",
        [Value::UInt(10), Value::UInt(1)],
    )?;

    assert_eq!(
        *seen.lock().unwrap(),
        ["glAttachShader(program = 10, shader = 1): Invalid shader handle."]
    );
    assert!(layer.context().unwrap().program(ProgramName(10)).is_none());
    Ok(())
}

#[test]
fn texture_keeps_its_first_target() -> anyhow::Result<()> {
    let (mut layer, seen) = layer()?;
    hook(
        &mut layer,
        "glGenTextures",
        [Value::Int(1), Value::UIntArray(vec![5])],
    )?;
    hook(
        &mut layer,
        "glBindTexture",
        [Value::UInt(gl::TEXTURE_2D), Value::UInt(5)],
    )?;
    hook(
        &mut layer,
        "glBindTexture",
        [Value::UInt(gl::TEXTURE_3D), Value::UInt(5)],
    )?;

    assert_eq!(
        *seen.lock().unwrap(),
        ["glBindTexture(target = GL_TEXTURE_3D, texture = 5): \
          Invalid texture target (texture is already GL_TEXTURE_2D)."]
    );
    let context = layer.context().unwrap();
    assert_eq!(context.bound_texture(Target::D2), Some(TextureName(5)));
    assert_eq!(context.bound_texture(Target::D3), None);
    Ok(())
}

#[test]
fn full_program_lifecycle() -> anyhow::Result<()> {
    let (mut layer, seen) = layer()?;
    for shader in [1, 2] {
        hook(&mut layer, "glCompileShader", [Value::UInt(shader)])?;
        hook(
            &mut layer,
            "glGetShaderiv",
            [
                Value::UInt(shader),
                Value::UInt(gl::COMPILE_STATUS),
                Value::Int(1),
            ],
        )?;
        hook(
            &mut layer,
            "glAttachShader",
            [Value::UInt(3), Value::UInt(shader)],
        )?;
    }
    hook(&mut layer, "glLinkProgram", [Value::UInt(3)])?;
    hook(
        &mut layer,
        "glGetProgramiv",
        [
            Value::UInt(3),
            Value::UInt(gl::LINK_STATUS),
            Value::Int(1),
        ],
    )?;
    hook(&mut layer, "glUseProgram", [Value::UInt(3)])?;
    hook(&mut layer, "glDeleteProgram", [Value::UInt(3)])?;

    assert!(seen.lock().unwrap().is_empty());
    let context = layer.context().unwrap();
    assert_eq!(context.current_program(), Some(ProgramName(3)));
    assert!(context.program(ProgramName(3)).is_none());
    assert_eq!(
        context.shader(ShaderName(2)).unwrap().compile_status(),
        Status::Ok
    );

    // Deleted, so it can't be made current again.
    hook(&mut layer, "glUseProgram", [Value::UInt(0)])?;
    hook(&mut layer, "glUseProgram", [Value::UInt(3)])?;
    assert_eq!(
        *seen.lock().unwrap(),
        ["glUseProgram(program = 3): Invalid program handle."]
    );
    assert_eq!(layer.context().unwrap().current_program(), None);
    Ok(())
}

#[test]
fn create_then_delete_textures() -> anyhow::Result<()> {
    let (mut layer, seen) = layer()?;
    hook(
        &mut layer,
        "glCreateTextures",
        [
            Value::UInt(gl::TEXTURE_2D_ARRAY),
            Value::Int(2),
            Value::UIntArray(vec![7, 8]),
        ],
    )?;
    hook(
        &mut layer,
        "glBindTexture",
        [Value::UInt(gl::TEXTURE_2D_ARRAY), Value::UInt(8)],
    )?;
    hook(
        &mut layer,
        "glDeleteTextures",
        [Value::Int(2), Value::UIntArray(vec![7, 8])],
    )?;
    assert!(seen.lock().unwrap().is_empty());

    hook(
        &mut layer,
        "glBindTexture",
        [Value::UInt(gl::TEXTURE_2D_ARRAY), Value::UInt(7)],
    )?;
    assert_eq!(
        *seen.lock().unwrap(),
        ["glBindTexture(target = GL_TEXTURE_2D_ARRAY, texture = 7): Invalid texture handle."]
    );
    Ok(())
}

#[test]
fn unknown_target_is_a_decode_error() -> anyhow::Result<()> {
    let (mut layer, seen) = layer()?;
    let err = layer
        .hook(
            "glBindTexture",
            2,
            &mut Args::new([Value::UInt(gl::FLOAT), Value::UInt(5)]),
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "could not decode arguments of glBindTexture");
    let source = std::error::Error::source(&err).map(ToString::to_string);
    assert_eq!(source.as_deref(), Some("unknown texture target 0x1406"));
    assert!(seen.lock().unwrap().is_empty());
    Ok(())
}
