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

//! Compiling and linking shader programs.

use crate::error::{Error, ResultExt, Stage};
use crate::source::ShaderProgramSource;
use crate::CallOnDrop;

use ahash::AHashMap;
use glow::HasContext;

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

/// Compile a single shader stage.
///
/// On failure the shader object is deleted and the info log is returned.
///
/// # Safety
///
/// `context` must be current.
pub unsafe fn compile_shader<H: HasContext + ?Sized>(
    context: &H,
    stage: Stage,
    source: &str,
) -> Result<H::Shader, Error> {
    let shader = context.create_shader(stage.gl_type()).gl_err()?;
    let _call_on_drop = CallOnDrop(|| context.delete_shader(shader));

    context.shader_source(shader, source);
    context.compile_shader(shader);

    if !context.get_shader_compile_status(shader) {
        let log = context.get_shader_info_log(shader);
        tracing::error!("failed to compile {stage} shader: {}", log.trim_end());
        return Err(Error::Compile { stage, log });
    }

    mem::forget(_call_on_drop);
    Ok(shader)
}

/// Compile both stages and link them into a program.
///
/// The intermediate shader objects are detached and deleted whether or not
/// linking succeeds.
///
/// # Safety
///
/// `context` must be current.
pub unsafe fn create_program<H: HasContext + ?Sized>(
    context: &H,
    vertex_shader: &str,
    fragment_shader: &str,
) -> Result<H::Program, Error> {
    let vertex_shader = compile_shader(context, Stage::Vertex, vertex_shader)?;
    let _delete_vertex = CallOnDrop(|| context.delete_shader(vertex_shader));
    let fragment_shader = compile_shader(context, Stage::Fragment, fragment_shader)?;
    let _delete_fragment = CallOnDrop(|| context.delete_shader(fragment_shader));

    let program = context.create_program().gl_err()?;
    let _call_on_drop = CallOnDrop(|| context.delete_program(program));

    context.attach_shader(program, vertex_shader);
    context.attach_shader(program, fragment_shader);
    let _detach_shaders = CallOnDrop(|| {
        context.detach_shader(program, vertex_shader);
        context.detach_shader(program, fragment_shader);
    });
    context.link_program(program);

    if !context.get_program_link_status(program) {
        let log = context.get_program_info_log(program);
        tracing::error!("failed to link program: {}", log.trim_end());
        return Err(Error::Link(log));
    }

    mem::forget(_call_on_drop);
    Ok(program)
}

/// Uniform locations by name, including the names the program doesn't have.
struct UniformCache<L> {
    locations: AHashMap<String, Option<L>>,
}

impl<L> UniformCache<L> {
    fn new() -> Self {
        Self {
            locations: AHashMap::new(),
        }
    }

    /// Get the location of `name`, asking `lookup` only the first time.
    fn location(&mut self, name: &str, lookup: impl FnOnce() -> Option<L>) -> Option<&L> {
        if !self.locations.contains_key(name) {
            let location = lookup();
            if location.is_none() {
                tracing::warn!("uniform {name} doesn't exist in the program");
            }
            self.locations.insert(name.to_owned(), location);
        }

        self.locations.get(name).and_then(Option::as_ref)
    }
}

/// A linked shader program with a cache of uniform locations.
pub struct Shader<H: HasContext + ?Sized> {
    context: Rc<H>,
    program: H::Program,
    uniforms: RefCell<UniformCache<H::UniformLocation>>,
}

impl<H: HasContext + ?Sized> Shader<H> {
    /// Compile and link `source`.
    ///
    /// # Safety
    ///
    /// `context` must be current, and must still be current when this is dropped.
    pub unsafe fn new(context: Rc<H>, source: &ShaderProgramSource) -> Result<Self, Error> {
        let program = create_program(&*context, &source.vertex, &source.fragment)?;

        Ok(Self {
            context,
            program,
            uniforms: RefCell::new(UniformCache::new()),
        })
    }

    /// The raw program handle.
    pub fn program(&self) -> H::Program {
        self.program
    }

    /// Make this the active program.
    pub fn bind(&self) {
        unsafe {
            self.context.use_program(Some(self.program));
        }
    }

    /// Clear the active program.
    pub fn unbind(&self) {
        unsafe {
            self.context.use_program(None);
        }
    }

    /// Set a `vec4` uniform on this program.
    ///
    /// The program must be bound. Uniforms the driver doesn't know about are
    /// reported once and then ignored.
    pub fn set_uniform_4f(&self, name: &str, [x, y, z, w]: [f32; 4]) {
        let mut uniforms = self.uniforms.borrow_mut();
        let location = uniforms.location(name, || unsafe {
            self.context.get_uniform_location(self.program, name)
        });

        if let Some(location) = location {
            unsafe {
                self.context.uniform_4_f32(Some(location), x, y, z, w);
            }
        }
    }
}

impl<H: HasContext + ?Sized> Drop for Shader<H> {
    fn drop(&mut self) {
        unsafe {
            self.context.delete_program(self.program);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_uniform_is_looked_up_once() {
        let mut cache = UniformCache::new();
        let mut lookups = 0;

        for _ in 0..3 {
            let location = cache.location("u_Color", || {
                lookups += 1;
                Some(7)
            });
            assert_eq!(location, Some(&7));
        }

        assert_eq!(lookups, 1);
    }

    #[test]
    fn missing_uniform_is_remembered() {
        let mut cache = UniformCache::<u32>::new();
        let mut lookups = 0;

        for _ in 0..3 {
            let location = cache.location("u_Missing", || {
                lookups += 1;
                None
            });
            assert!(location.is_none());
        }

        assert_eq!(lookups, 1);
    }

    #[test]
    fn names_are_cached_separately() {
        let mut cache = UniformCache::new();

        assert_eq!(cache.location("u_A", || Some(1)), Some(&1));
        assert_eq!(cache.location("u_B", || Some(2)), Some(&2));
        assert_eq!(cache.location("u_A", || Some(99)), Some(&1));
    }
}
