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

//! Clearing the frame and issuing draw calls.

use crate::buffer::IndexBuffer;
use crate::error::Error;
use crate::gl_call;
use crate::shader::Shader;
use crate::vertex_array::VertexArray;

use glow::HasContext;

use std::rc::Rc;

/// Issues the per-frame GL calls.
pub struct Renderer<H: HasContext + ?Sized> {
    context: Rc<H>,
    clear_color: [f32; 4],
}

impl<H: HasContext + ?Sized> Renderer<H> {
    /// Create a renderer that clears to `clear_color`.
    pub fn new(context: Rc<H>, clear_color: [f32; 4]) -> Self {
        Self {
            context,
            clear_color,
        }
    }

    /// Get the underlying context.
    pub fn context(&self) -> &Rc<H> {
        &self.context
    }

    /// Set the viewport to cover a `width` by `height` surface.
    pub fn resize(&self, width: u32, height: u32) {
        unsafe {
            self.context.viewport(0, 0, width as i32, height as i32);
        }
    }

    /// Clear the color buffer.
    pub fn clear(&self) -> Result<(), Error> {
        let [r, g, b, a] = self.clear_color;

        unsafe {
            self.context.clear_color(r, g, b, a);
            gl_call!(self.context, self.context.clear(glow::COLOR_BUFFER_BIT))
        }
    }

    /// Draw the indexed triangles in `vertex_array` with `shader`.
    pub fn draw(
        &self,
        vertex_array: &VertexArray<H>,
        index_buffer: &IndexBuffer<H>,
        shader: &Shader<H>,
    ) -> Result<(), Error> {
        shader.bind();
        vertex_array.bind();
        index_buffer.bind();

        unsafe {
            gl_call!(
                self.context,
                self.context.draw_elements(
                    glow::TRIANGLES,
                    index_buffer.count() as i32,
                    glow::UNSIGNED_INT,
                    0,
                )
            )
        }
    }
}
