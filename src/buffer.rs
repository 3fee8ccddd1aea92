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

//! Owned vertex and index buffers.

use crate::error::{Error, ResultExt};
use crate::{delete_on_error, gl_call};

use bytemuck::Pod;
use glow::HasContext;

use std::fmt;
use std::rc::Rc;

/// A `GL_ARRAY_BUFFER` holding static vertex data.
pub struct VertexBuffer<H: HasContext + ?Sized> {
    context: Rc<H>,
    buffer: H::Buffer,
    size: usize,
}

impl<H: HasContext + ?Sized> fmt::Debug for VertexBuffer<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexBuffer")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl<H: HasContext + ?Sized> VertexBuffer<H> {
    /// Create a buffer and upload `data` into it.
    ///
    /// The buffer is left bound.
    ///
    /// # Safety
    ///
    /// `context` must be current, and must still be current when this is dropped.
    pub unsafe fn new<T: Pod>(context: Rc<H>, data: &[T]) -> Result<Self, Error> {
        let buffer = context.create_buffer().gl_err()?;
        let size = delete_on_error(
            buffer,
            |buffer| context.delete_buffer(buffer),
            |buffer| -> Result<usize, Error> {
                let bytes: &[u8] = bytemuck::cast_slice(data);

                context.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
                gl_call!(
                    context,
                    context.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytes, glow::STATIC_DRAW)
                )?;

                Ok(bytes.len())
            },
        )?;

        Ok(Self {
            context,
            buffer,
            size,
        })
    }

    /// Bind this buffer to `GL_ARRAY_BUFFER`.
    pub fn bind(&self) {
        unsafe {
            self.context
                .bind_buffer(glow::ARRAY_BUFFER, Some(self.buffer));
        }
    }

    /// Unbind `GL_ARRAY_BUFFER`.
    pub fn unbind(&self) {
        unsafe {
            self.context.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    /// The size of the uploaded data in bytes.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl<H: HasContext + ?Sized> Drop for VertexBuffer<H> {
    fn drop(&mut self) {
        unsafe {
            self.context.delete_buffer(self.buffer);
        }
    }
}

/// A `GL_ELEMENT_ARRAY_BUFFER` of `u32` indices.
pub struct IndexBuffer<H: HasContext + ?Sized> {
    context: Rc<H>,
    buffer: H::Buffer,
    count: usize,
}

impl<H: HasContext + ?Sized> fmt::Debug for IndexBuffer<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexBuffer")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl<H: HasContext + ?Sized> IndexBuffer<H> {
    /// Create a buffer and upload `indices` into it.
    ///
    /// Element array bindings are part of vertex array state, so the vertex
    /// array this belongs to should be bound first.
    ///
    /// # Safety
    ///
    /// `context` must be current, and must still be current when this is dropped.
    pub unsafe fn new(context: Rc<H>, indices: &[u32]) -> Result<Self, Error> {
        let buffer = context.create_buffer().gl_err()?;
        delete_on_error(
            buffer,
            |buffer| context.delete_buffer(buffer),
            |buffer| -> Result<(), Error> {
                context.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(buffer));
                gl_call!(
                    context,
                    context.buffer_data_u8_slice(
                        glow::ELEMENT_ARRAY_BUFFER,
                        bytemuck::cast_slice(indices),
                        glow::STATIC_DRAW,
                    )
                )
            },
        )?;

        Ok(Self {
            count: indices.len(),
            context,
            buffer,
        })
    }

    /// Bind this buffer to `GL_ELEMENT_ARRAY_BUFFER`.
    pub fn bind(&self) {
        unsafe {
            self.context
                .bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.buffer));
        }
    }

    /// Unbind `GL_ELEMENT_ARRAY_BUFFER`.
    pub fn unbind(&self) {
        unsafe {
            self.context.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
        }
    }

    /// The number of indices in the buffer.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl<H: HasContext + ?Sized> Drop for IndexBuffer<H> {
    fn drop(&mut self) {
        unsafe {
            self.context.delete_buffer(self.buffer);
        }
    }
}
