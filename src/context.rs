//! The validation engine.
//!
//! [`Context`] keeps the shadow copy of the host's objects and checks each [`Call`] against it.
//! Every tracked GL function has an operation here of the same name. An operation checks its
//! preconditions, updates the shadow state, and reports what it found through the [`Sink`].
//! Nothing here ever fails from the host's point of view: a bad call gets a diagnostic and
//! the layer carries on.

use std::collections::HashMap;

use crate::{
    call::Call,
    diagnostic::{Diagnostic, Violation},
    gl::{
        self,
        types::{GLenum, GLint},
    },
    introspect::Introspect,
    output::{Sink, Stdout},
    program::{Program, Shader, Status, UniformInfo},
    texture::{Bindings, Target, Texture},
    Checks, Config, ProgramName, ShaderName, TextureName, Version,
};

/// Shadow state of one GL context, plus the settings it was created with.
pub struct Context {
    version: Version,
    checks: Checks,
    introspect: Option<Box<dyn Introspect>>,
    sink: Box<dyn Sink>,

    // Not programs!
    shaders: HashMap<ShaderName, Shader>,
    programs: HashMap<ProgramName, Program>,
    textures: HashMap<TextureName, Texture>,

    current_program: Option<ProgramName>,
    bound_textures: Bindings,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("version", &self.version)
            .field("checks", &self.checks)
            .field("shaders", &self.shaders)
            .field("programs", &self.programs)
            .field("textures", &self.textures)
            .field("current_program", &self.current_program)
            .field("bound_textures", &self.bound_textures)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// An empty context, reporting to standard output.
    ///
    /// Without `introspect`, linked programs are tracked but their uniforms are not.
    #[must_use]
    pub fn new(config: Config, introspect: Option<Box<dyn Introspect>>) -> Self {
        Self {
            version: config.version,
            checks: config.checks,
            introspect,
            sink: Box::new(Stdout),
            shaders: HashMap::new(),
            programs: HashMap::new(),
            textures: HashMap::new(),
            current_program: None,
            bound_textures: Bindings::default(),
        }
    }
    /// Send future diagnostics to `sink`.
    pub fn set_output(&mut self, sink: impl Sink + 'static) {
        self.sink = Box::new(sink);
    }
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }
    #[must_use]
    pub fn checks(&self) -> Checks {
        self.checks
    }

    #[must_use]
    pub fn shader(&self, name: ShaderName) -> Option<&Shader> {
        self.shaders.get(&name)
    }
    #[must_use]
    pub fn program(&self, name: ProgramName) -> Option<&Program> {
        self.programs.get(&name)
    }
    #[must_use]
    pub fn texture(&self, name: TextureName) -> Option<&Texture> {
        self.textures.get(&name)
    }
    /// The program of the last successful `glUseProgram`, if any.
    ///
    /// This may name a program that has since been deleted - the GL keeps a deleted program
    /// alive for as long as it's in use, and so do we.
    #[must_use]
    pub fn current_program(&self) -> Option<ProgramName> {
        self.current_program
    }
    #[must_use]
    pub fn bound_texture(&self, target: Target) -> Option<TextureName> {
        self.bound_textures.get(target)
    }
    #[must_use]
    pub fn bound_textures(&self) -> &Bindings {
        &self.bound_textures
    }

    fn report(&mut self, call: Call, violation: Violation) {
        if !self.checks.contains(violation.check()) {
            tracing::trace!(%call, %violation, "diagnostic suppressed");
            return;
        }
        let diagnostic = Diagnostic { call, violation };
        tracing::debug!(kind = ?violation.kind(), "{diagnostic}");
        self.sink.emit(&diagnostic.to_string());
    }

    /// Run the operation matching `call`.
    pub fn dispatch(&mut self, call: Call) {
        tracing::trace!(%call, "dispatch");
        match call {
            Call::CompileShader { shader } => self.compile_shader(shader),
            Call::GetShaderiv {
                shader,
                pname,
                value,
            } => self.get_shader_iv(shader, pname, value),
            Call::AttachShader { program, shader } => self.attach_shader(program, shader),
            Call::GetProgramiv {
                program,
                pname,
                value,
            } => self.get_program_iv(program, pname, value),
            Call::LinkProgram { program } => self.link_program(program),
            Call::UseProgram { program } => self.use_program(program),
            Call::DeleteProgram { program } => self.delete_program(program),
            Call::GenTextures { textures } => self.gen_textures(&textures),
            Call::CreateTextures { target, textures } => self.create_textures(target, &textures),
            Call::BindTexture { target, texture } => self.bind_texture(target, texture),
            Call::DeleteTextures { textures } => self.delete_textures(&textures),
        }
    }

    /// `glCompileShader`. Starts tracking `shader`.
    // We can't see the return value of glCreateShader, so this is where shaders are born.
    #[doc(alias = "glCompileShader")]
    pub fn compile_shader(&mut self, shader: ShaderName) {
        if self.shaders.contains_key(&shader) {
            self.report(
                Call::CompileShader { shader },
                Violation::ShaderAlreadyCompiled,
            );
            return;
        }
        self.shaders.insert(shader, Shader::new(shader));
    }

    /// `glGetShaderiv`. For `GL_COMPILE_STATUS`, records the answer the GL gave the host.
    #[doc(alias = "glGetShaderiv")]
    pub fn get_shader_iv(&mut self, shader: ShaderName, pname: GLenum, value: GLint) {
        if pname != gl::COMPILE_STATUS {
            return;
        }
        let Some(tracked) = self.shaders.get_mut(&shader) else {
            self.report(
                Call::GetShaderiv {
                    shader,
                    pname,
                    value,
                },
                Violation::InvalidShader,
            );
            return;
        };
        tracked.compile_status = Status::from_gl(value);
    }

    /// `glAttachShader`. Starts tracking `program` if this is its first shader.
    ///
    /// Attaching a shader whose compile status is unknown or bad is reported, but the shader
    /// is still attached - the GL will happily do so too.
    #[doc(alias = "glAttachShader")]
    pub fn attach_shader(&mut self, program: ProgramName, shader: ShaderName) {
        let call = || Call::AttachShader { program, shader };
        let Some(status) = self.shaders.get(&shader).map(Shader::compile_status) else {
            self.report(call(), Violation::InvalidShader);
            return;
        };
        match status {
            Status::Unchecked => self.report(call(), Violation::ShaderStatusUnchecked),
            Status::Failed => self.report(call(), Violation::ShaderCompileFailed),
            Status::Ok => (),
        }

        // Same deal as shaders, glCreateProgram is invisible so the first attach creates it.
        self.programs
            .entry(program)
            .or_insert_with(|| Program::new(program))
            .shaders
            .push(shader);
    }

    /// `glGetProgramiv`. For `GL_LINK_STATUS`, records the answer the GL gave the host.
    #[doc(alias = "glGetProgramiv")]
    pub fn get_program_iv(&mut self, program: ProgramName, pname: GLenum, value: GLint) {
        if pname != gl::LINK_STATUS {
            return;
        }
        let Some(tracked) = self.programs.get_mut(&program) else {
            self.report(
                Call::GetProgramiv {
                    program,
                    pname,
                    value,
                },
                Violation::InvalidProgram,
            );
            return;
        };
        tracked.link_status = Status::from_gl(value);
    }

    /// `glLinkProgram`. Rebuilds the program's uniform table from the GL.
    ///
    /// This does not touch the link status: like compiling, the host has to ask.
    #[doc(alias = "glLinkProgram")]
    pub fn link_program(&mut self, program: ProgramName) {
        if !self.programs.contains_key(&program) {
            self.report(Call::LinkProgram { program }, Violation::InvalidProgram);
            return;
        }
        let uniforms = match self.introspect.as_deref() {
            Some(introspect) => active_uniforms(introspect, program),
            None => {
                tracing::trace!(%program, "no introspection, uniforms not tracked");
                Default::default()
            }
        };
        tracing::debug!(%program, uniforms = uniforms.len(), "linked");
        if let Some(tracked) = self.programs.get_mut(&program) {
            tracked.uniforms = uniforms;
        }
    }

    /// `glUseProgram`. Program 0 unbinds, anything else must be linked and checked.
    #[doc(alias = "glUseProgram")]
    pub fn use_program(&mut self, program: ProgramName) {
        if program.is_zero() {
            self.current_program = None;
            return;
        }
        if self.validate_program_status(program) {
            self.current_program = Some(program);
        }
    }

    /// Whether `program` is tracked and the host saw it link successfully. Reports why not.
    pub fn validate_program_status(&mut self, program: ProgramName) -> bool {
        let call = || Call::UseProgram { program };
        let Some(status) = self.programs.get(&program).map(Program::link_status) else {
            self.report(call(), Violation::InvalidProgram);
            return false;
        };
        match status {
            Status::Unchecked => {
                self.report(call(), Violation::ProgramStatusUnchecked);
                false
            }
            Status::Failed => {
                self.report(call(), Violation::ProgramLinkFailed);
                false
            }
            Status::Ok => true,
        }
    }

    /// `glDeleteProgram`. Stops tracking `program`.
    ///
    /// The current program stays current, even if it's this one: the GL only flags an in-use
    /// program for deletion and carries on using it.
    #[doc(alias = "glDeleteProgram")]
    pub fn delete_program(&mut self, program: ProgramName) {
        if self.programs.remove(&program).is_none() {
            self.report(Call::DeleteProgram { program }, Violation::InvalidProgram);
        }
    }

    /// `glGenTextures`. Starts tracking each name, with no target yet.
    #[doc(alias = "glGenTextures")]
    pub fn gen_textures(&mut self, textures: &[TextureName]) {
        for &texture in textures {
            self.textures
                .entry(texture)
                .or_insert_with(|| Texture::new(texture));
        }
    }

    /// `glCreateTextures`. Starts tracking each name, associated with `target` right away.
    #[doc(alias = "glCreateTextures")]
    pub fn create_textures(&mut self, target: Target, textures: &[TextureName]) {
        for &texture in textures {
            let associated = self
                .textures
                .entry(texture)
                .or_insert_with(|| Texture::new(texture))
                .associate(target);
            if let Err(existing) = associated {
                self.report(
                    Call::CreateTextures {
                        target,
                        textures: textures.to_vec(),
                    },
                    Violation::TextureTargetMismatch { existing },
                );
            }
        }
    }

    /// `glBindTexture`. The first bind of a `glGenTextures` name fixes its target.
    #[doc(alias = "glBindTexture")]
    pub fn bind_texture(&mut self, target: Target, texture: TextureName) {
        if texture.is_zero() {
            // Default texture, never tracked.
            return;
        }
        let call = || Call::BindTexture { target, texture };
        let Some(tracked) = self.textures.get_mut(&texture) else {
            self.report(call(), Violation::InvalidTexture);
            return;
        };
        if let Err(existing) = tracked.associate(target) {
            self.report(call(), Violation::TextureTargetMismatch { existing });
            return;
        }
        self.bound_textures.set(target, texture);
    }

    /// `glDeleteTextures`. Stops tracking each name. Unknown names are ignored, as by the GL.
    #[doc(alias = "glDeleteTextures")]
    pub fn delete_textures(&mut self, textures: &[TextureName]) {
        for texture in textures {
            if self.textures.remove(texture).is_none() {
                tracing::trace!(%texture, "deleting untracked texture");
            }
        }
    }
}

/// Ask the GL for every active uniform of a freshly linked program, keyed by location.
fn active_uniforms(
    introspect: &dyn Introspect,
    program: ProgramName,
) -> std::collections::BTreeMap<GLint, UniformInfo> {
    let count = introspect.program_iv(program, gl::ACTIVE_UNIFORMS);
    let max_name_length = introspect.program_iv(program, gl::ACTIVE_UNIFORM_MAX_LENGTH);
    let max_name_length = usize::try_from(max_name_length).unwrap_or(0);

    let mut uniforms = std::collections::BTreeMap::new();
    for index in 0..u32::try_from(count).unwrap_or(0) {
        let Some(uniform) = introspect.active_uniform(program, index, max_name_length) else {
            tracing::trace!(%program, index, "active uniform query failed");
            continue;
        };
        let location = introspect.uniform_location(program, &uniform.name);
        if location < 0 {
            // Uniform block members have no location.
            tracing::trace!(%program, name = ?uniform.name, "uniform has no location");
            continue;
        }
        uniforms.insert(
            location,
            UniformInfo {
                array_size: uniform.array_size,
                ty: uniform.ty,
            },
        );
    }
    uniforms
}
