use std::{
    ffi::{CString, NulError},
    io,
    path::{Path, PathBuf},
    ptr::null,
};

use gl::types::{GLenum, GLint, GLuint};
use thiserror::Error;

/// Capacity for driver info logs. Longer logs get truncated.
const INFO_LOG_CAP: usize = 512;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("could not read shader source {path:?}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("program failed to link: {log}")]
    Link { log: String },
    #[error("shader source contains an interior NUL byte")]
    InvalidSource(#[from] NulError),
}

/// One compiled shader object.
///
/// Transient: these only exist inside [`ShaderProgram`] construction, get
/// attached, and release their handle on drop whether or not linking
/// succeeded. They never appear in the public surface.
struct CompiledShader {
    id: GLuint,
}

impl CompiledShader {
    fn compile(stage: ShaderStage, source: &str) -> Result<Self, ShaderError> {
        // Reject interior NULs before touching the driver.
        let source = CString::new(source)?;
        unsafe {
            let shader = CompiledShader {
                id: gl::CreateShader(stage.gl_enum()),
            };
            gl::ShaderSource(shader.id, 1, &source.as_ptr(), null());
            gl::CompileShader(shader.id);

            let mut success = 0;
            gl::GetShaderiv(shader.id, gl::COMPILE_STATUS, &mut success);
            if success != gl::TRUE.into() {
                let mut infolog: Vec<u8> = vec![0; INFO_LOG_CAP];
                let mut length = 0;
                gl::GetShaderInfoLog(
                    shader.id,
                    INFO_LOG_CAP as i32,
                    &mut length,
                    infolog.as_mut_ptr().cast(),
                );
                infolog.truncate(length.max(0) as usize);
                return Err(ShaderError::Compile {
                    stage,
                    log: String::from_utf8_lossy(&infolog).into_owned(),
                });
            }
            Ok(shader)
        }
    }
}

impl Drop for CompiledShader {
    fn drop(&mut self) {
        unsafe { gl::DeleteShader(self.id) }
    }
}

/// A linked GPU program. Holding one means linking succeeded; there is no
/// half-built state to observe.
#[derive(Debug)]
pub struct ShaderProgram {
    id: GLuint,
}

impl ShaderProgram {
    /// Read both stage sources from disk, then compile and link them.
    pub fn from_files(
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let vertex_src = read_source(vertex_path.as_ref())?;
        let fragment_src = read_source(fragment_path.as_ref())?;
        Self::from_sources(&vertex_src, &fragment_src)
    }

    /// Compile and link a vertex/fragment pair from in-memory source.
    ///
    /// The current-program binding is left untouched; nothing is bound until
    /// [`ShaderProgram::bind`].
    pub fn from_sources(vertex_src: &str, fragment_src: &str) -> Result<Self, ShaderError> {
        let vertex = CompiledShader::compile(ShaderStage::Vertex, vertex_src)?;
        let fragment = CompiledShader::compile(ShaderStage::Fragment, fragment_src)?;

        unsafe {
            let id = gl::CreateProgram();
            gl::AttachShader(id, vertex.id);
            gl::AttachShader(id, fragment.id);
            gl::LinkProgram(id);

            let mut success = 0;
            gl::GetProgramiv(id, gl::LINK_STATUS, &mut success);
            if success != gl::TRUE.into() {
                let mut infolog: Vec<u8> = vec![0; INFO_LOG_CAP];
                let mut length = 0;
                gl::GetProgramInfoLog(
                    id,
                    INFO_LOG_CAP as i32,
                    &mut length,
                    infolog.as_mut_ptr().cast(),
                );
                infolog.truncate(length.max(0) as usize);
                gl::DeleteProgram(id);
                return Err(ShaderError::Link {
                    log: String::from_utf8_lossy(&infolog).into_owned(),
                });
            }
            Ok(ShaderProgram { id })
        }
        // `vertex` and `fragment` drop here on every path, deleting the
        // transient shader objects now that the program owns the linked code.
    }

    /// Make this the context's current program.
    pub fn bind(&self) {
        unsafe { gl::UseProgram(self.id) }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_int(name, GLint::from(value));
    }

    pub fn set_int(&self, name: &str, value: i32) {
        if let Some(location) = self.uniform_location(name) {
            unsafe { gl::Uniform1i(location, value) }
        }
    }

    pub fn set_float(&self, name: &str, value: f32) {
        if let Some(location) = self.uniform_location(name) {
            unsafe { gl::Uniform1f(location, value) }
        }
    }

    pub fn set_vec4(&self, name: &str, value: [f32; 4]) {
        if let Some(location) = self.uniform_location(name) {
            unsafe { gl::Uniform4f(location, value[0], value[1], value[2], value[3]) }
        }
    }

    /// Resolve a uniform name to its location, re-binding this program first
    /// so the write lands here no matter what was bound before.
    ///
    /// A name the linker kept no location for resolves to `None` and the
    /// caller skips the write. That mirrors what the driver does with
    /// location -1 anyway, so unknown names stay a quiet no-op.
    fn uniform_location(&self, name: &str) -> Option<GLint> {
        let Ok(c_name) = CString::new(name) else {
            tracing::debug!(uniform = name, "uniform name contains NUL, ignoring write");
            return None;
        };
        self.bind();
        let location = unsafe { gl::GetUniformLocation(self.id, c_name.as_ptr()) };
        if location < 0 {
            tracing::debug!(uniform = name, "uniform not found in program, ignoring write");
            return None;
        }
        Some(location)
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::SourceRead {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // None of these may reach an actual gl call: the test process has no GL
    // context, and every entry point below fails before the first one.

    #[test]
    fn missing_vertex_file_reports_its_path() {
        let err = ShaderProgram::from_files("glsl/no_such_file.glsl", "glsl/frag_shader.glsl")
            .unwrap_err();
        match err {
            ShaderError::SourceRead { path, .. } => {
                assert_eq!(path, PathBuf::from("glsl/no_such_file.glsl"));
            }
            other => panic!("expected SourceRead, got {other:?}"),
        }
    }

    #[test]
    fn missing_fragment_file_reports_its_path() {
        let err = ShaderProgram::from_files("glsl/vert_shader.glsl", "glsl/also_missing.glsl")
            .unwrap_err();
        match err {
            ShaderError::SourceRead { path, .. } => {
                assert_eq!(path, PathBuf::from("glsl/also_missing.glsl"));
            }
            other => panic!("expected SourceRead, got {other:?}"),
        }
    }

    #[test]
    fn interior_nul_is_rejected_before_compilation() {
        let err = ShaderProgram::from_sources("void main() {\0}", "").unwrap_err();
        assert!(matches!(err, ShaderError::InvalidSource(_)));
    }

    #[test]
    fn stage_names_match_their_gl_enums() {
        assert_eq!(ShaderStage::Vertex.gl_enum(), gl::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_enum(), gl::FRAGMENT_SHADER);
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }

    #[test]
    fn compile_error_display_names_the_stage() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            log: "0:1(1): error: syntax error".to_owned(),
        };
        let message = err.to_string();
        assert!(message.contains("fragment"), "got: {message}");
        assert!(message.contains("syntax error"), "got: {message}");
    }

    #[test]
    fn source_read_error_carries_the_io_cause() {
        let err = read_source(Path::new("glsl/no_such_file.glsl")).unwrap_err();
        let ShaderError::SourceRead { source, .. } = &err else {
            panic!("expected SourceRead, got {err:?}");
        };
        assert_eq!(source.kind(), io::ErrorKind::NotFound);
    }
}
