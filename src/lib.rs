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

//! Draws a single animated quad with OpenGL.
//!
//! The pieces are thin: a parser that splits one shader file on
//! `#shader` markers, a compile-and-link routine, owned wrappers around the
//! vertex buffer, index buffer and vertex array, and a [`Renderer`] that clears
//! and draws. Every GL object holds an [`Rc`] of the [`glow`] context and deletes
//! itself on drop.
//!
//! The binary in `src/main.rs` sets up a window and context with [`glutin`] and
//! runs the frame loop.
//!
//! [`Rc`]: std::rc::Rc
//! [`glow`]: https://crates.io/crates/glow
//! [`glutin`]: https://crates.io/crates/glutin

pub mod animation;
pub mod buffer;
pub mod config;
pub mod error;
pub mod geometry;
pub mod renderer;
pub mod shader;
pub mod source;
pub mod vertex_array;

pub use animation::ColorPulse;
pub use buffer::{IndexBuffer, VertexBuffer};
pub use config::DemoConfig;
pub use error::{Error, Stage};
pub use geometry::{Position, QUAD_INDICES, QUAD_POSITIONS};
pub use renderer::Renderer;
pub use shader::Shader;
pub use source::ShaderProgramSource;
pub use vertex_array::{VertexArray, VertexBufferLayout};

/// Pick the `#version` line for a context, or reject it as too old.
///
/// Desktop contexts need 3.3, embedded ones 3.0.
pub fn version_header(major: u32, minor: u32, is_embedded: bool) -> Result<&'static str, Error> {
    let supported = if is_embedded {
        major >= 3
    } else {
        major >= 4 || (major == 3 && minor >= 3)
    };

    if !supported {
        let kind = if is_embedded { " ES" } else { "" };
        return Err(Error::UnsupportedVersion(format!("{major}.{minor}{kind}")));
    }

    Ok(if is_embedded {
        "#version 300 es"
    } else {
        "#version 330 core"
    })
}

/// Run `body` on a freshly created GL object, deleting the object if `body` fails.
pub(crate) fn delete_on_error<T: Copy, R, E>(
    handle: T,
    mut delete: impl FnMut(T),
    body: impl FnOnce(T) -> Result<R, E>,
) -> Result<R, E> {
    let guard = CallOnDrop(|| delete(handle));
    let result = body(handle);

    if result.is_ok() {
        std::mem::forget(guard);
    }

    result
}

pub(crate) struct CallOnDrop<F: FnMut()>(pub(crate) F);

impl<F: FnMut()> Drop for CallOnDrop<F> {
    fn drop(&mut self) {
        (self.0)();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_needs_three_three() {
        assert_eq!(version_header(3, 3, false).unwrap(), "#version 330 core");
        assert_eq!(version_header(4, 6, false).unwrap(), "#version 330 core");
        assert!(version_header(3, 2, false).is_err());
        assert!(version_header(2, 1, false).is_err());
    }

    #[test]
    fn embedded_needs_three() {
        assert_eq!(version_header(3, 0, true).unwrap(), "#version 300 es");
        assert!(matches!(
            version_header(2, 0, true),
            Err(Error::UnsupportedVersion(v)) if v == "2.0 ES"
        ));
    }

    #[test]
    fn failed_setup_deletes_the_handle() {
        let mut deleted = Vec::new();
        let result: Result<(), &str> =
            delete_on_error(3u32, |handle| deleted.push(handle), |_| Err("upload failed"));

        assert_eq!(result, Err("upload failed"));
        assert_eq!(deleted, [3]);
    }

    #[test]
    fn successful_setup_keeps_the_handle() {
        let mut deleted = Vec::new();
        let result = delete_on_error(
            5u32,
            |handle| deleted.push(handle),
            |handle| Ok::<_, ()>(handle * 2),
        );

        assert_eq!(result, Ok(10));
        assert!(deleted.is_empty());
    }

    #[test]
    fn call_on_drop_runs_once() {
        use std::cell::Cell;

        let calls = Cell::new(0);
        {
            let _guard = CallOnDrop(|| calls.set(calls.get() + 1));
        }
        assert_eq!(calls.get(), 1);
    }
}
