// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `hello-quad`.
//
// `hello-quad` is free software: you can redistribute it and/or modify it under the
// terms of either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
//   version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `hello-quad` is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR
// PURPOSE. See the GNU Lesser General Public License or the Mozilla Public License for more
// details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `hello-quad`. If not, see <https://www.gnu.org/licenses/>.

//! Error type and OpenGL error checking.

use glow::HasContext;

use std::fmt;
use std::io;
use std::path::PathBuf;

/// A shader stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// The vertex stage.
    Vertex,

    /// The fragment stage.
    Fragment,
}

impl Stage {
    /// The matching `glow` shader type.
    pub fn gl_type(self) -> u32 {
        match self {
            Stage::Vertex => glow::VERTEX_SHADER,
            Stage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        })
    }
}

/// Everything that can go wrong while setting up or drawing the quad.
#[derive(Debug)]
pub enum Error {
    /// The shader file could not be read.
    Io {
        /// The file we tried to read.
        path: PathBuf,

        /// The underlying error.
        source: io::Error,
    },

    /// A shader stage failed to compile.
    Compile {
        /// The stage that failed.
        stage: Stage,

        /// The driver's info log.
        log: String,
    },

    /// The program failed to link.
    Link(String),

    /// The context is older than what the shaders need.
    UnsupportedVersion(String),

    /// A GL call raised an error or failed to create an object.
    Gl(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { path, source } => {
                write!(f, "failed to read shader file {}: {}", path.display(), source)
            }
            Error::Compile { stage, log } => {
                write!(f, "failed to compile {stage} shader: {}", log.trim_end())
            }
            Error::Link(log) => write!(f, "failed to link program: {}", log.trim_end()),
            Error::UnsupportedVersion(version) => {
                write!(f, "OpenGL 3.3 (or 3.0 ES) or higher is required, got {version}")
            }
            Error::Gl(msg) => write!(f, "gl error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Gl(s)
    }
}

/// Lifts `glow`'s stringly-typed errors into [`Error`].
pub(crate) trait ResultExt<T, E> {
    fn gl_err(self) -> Result<T, Error>;
}

impl<T, E: Into<Error>> ResultExt<T, E> for Result<T, E> {
    fn gl_err(self) -> Result<T, Error> {
        self.map_err(Into::into)
    }
}

/// Get the symbolic name of a GL error code.
pub fn error_name(code: u32) -> &'static str {
    match code {
        glow::NO_ERROR => "GL_NO_ERROR",
        glow::INVALID_ENUM => "GL_INVALID_ENUM",
        glow::INVALID_VALUE => "GL_INVALID_VALUE",
        glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
        glow::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        glow::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        glow::CONTEXT_LOST => "GL_CONTEXT_LOST",
        _ => "Unknown GL error",
    }
}

/// Drain every pending GL error.
pub fn clear_errors(h: &(impl HasContext + ?Sized)) {
    // A lost context keeps reporting CONTEXT_LOST forever.
    let mut remaining = 64;
    while remaining > 0 && unsafe { h.get_error() } != glow::NO_ERROR {
        remaining -= 1;
    }
}

/// Drain pending GL errors, logging each against `call`.
///
/// Returns the first error seen, if any.
pub fn check_errors(h: &(impl HasContext + ?Sized), call: &str) -> Result<(), Error> {
    drain_errors(|| unsafe { h.get_error() }, call)
}

fn drain_errors(mut next_error: impl FnMut() -> u32, call: &str) -> Result<(), Error> {
    let mut first = None;
    let mut remaining = 64;

    while remaining > 0 {
        let err = next_error();
        if err == glow::NO_ERROR {
            break;
        }

        let name = error_name(err);
        tracing::error!("[OpenGL Error] ({name}): {call}");
        first.get_or_insert(name);
        remaining -= 1;
    }

    match first {
        Some(name) => Err(Error::Gl(format!("{name} in {call}"))),
        None => Ok(()),
    }
}

/// Run a GL expression between [`clear_errors`] and [`check_errors`].
///
/// Evaluates to `Result<T, Error>` where `T` is the type of the expression.
#[macro_export]
macro_rules! gl_call {
    ($ctx:expr, $e:expr) => {{
        let ctx = &$ctx;
        $crate::error::clear_errors(&**ctx);
        let value = $e;
        $crate::error::check_errors(
            &**ctx,
            concat!(stringify!($e), " (", file!(), ":", line!(), ")"),
        )
        .map(|()| value)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    #[test]
    fn names_known_codes() {
        assert_eq!(error_name(glow::INVALID_ENUM), "GL_INVALID_ENUM");
        assert_eq!(error_name(glow::OUT_OF_MEMORY), "GL_OUT_OF_MEMORY");
        assert_eq!(error_name(0xdead), "Unknown GL error");
    }

    #[test]
    fn compile_error_mentions_stage() {
        let err = Error::Compile {
            stage: Stage::Fragment,
            log: "0:3: syntax error\n".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to compile fragment shader: 0:3: syntax error"
        );
    }

    #[test]
    fn io_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::io(
            "missing.shader",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.to_string().contains("missing.shader"));
        assert!(err.source().is_some());
    }

    fn next_from<'a>(codes: &'a [u32], reads: &'a Cell<usize>) -> impl FnMut() -> u32 + 'a {
        move || {
            let i = reads.get();
            reads.set(i + 1);
            codes.get(i).copied().unwrap_or(glow::NO_ERROR)
        }
    }

    #[test]
    fn no_pending_errors_is_ok() {
        let reads = Cell::new(0);
        assert!(drain_errors(next_from(&[], &reads), "glClear").is_ok());
        assert_eq!(reads.get(), 1);
    }

    #[test]
    fn first_error_wins_and_all_are_drained() {
        let codes = [glow::INVALID_VALUE, glow::INVALID_ENUM, glow::OUT_OF_MEMORY];
        let reads = Cell::new(0);

        match drain_errors(next_from(&codes, &reads), "glDrawElements") {
            Err(Error::Gl(msg)) => assert_eq!(msg, "GL_INVALID_VALUE in glDrawElements"),
            other => panic!("unexpected result: {other:?}"),
        }

        // Three errors plus the terminating NO_ERROR.
        assert_eq!(reads.get(), 4);
    }

    #[test]
    fn endless_errors_stop_after_a_bound() {
        let mut reads = 0;
        let result = drain_errors(
            || {
                reads += 1;
                glow::CONTEXT_LOST
            },
            "glFlush",
        );

        assert!(result.is_err());
        assert_eq!(reads, 64);
    }

    #[test]
    fn stage_maps_to_gl_type() {
        assert_eq!(Stage::Vertex.gl_type(), glow::VERTEX_SHADER);
        assert_eq!(Stage::Fragment.gl_type(), glow::FRAGMENT_SHADER);
    }
}
