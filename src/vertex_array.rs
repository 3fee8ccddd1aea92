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

//! Vertex arrays and the attribute layouts that describe them.

use crate::buffer::VertexBuffer;
use crate::error::{Error, ResultExt};
use crate::gl_call;

use glow::HasContext;

use std::fmt;
use std::rc::Rc;

/// A scalar type that can appear in a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    /// `GL_FLOAT`
    F32,

    /// `GL_UNSIGNED_INT`
    U32,

    /// `GL_UNSIGNED_BYTE`
    U8,
}

impl AttributeType {
    /// The size of one component in bytes.
    pub fn size(self) -> usize {
        match self {
            AttributeType::F32 | AttributeType::U32 => 4,
            AttributeType::U8 => 1,
        }
    }

    fn gl_type(self) -> u32 {
        match self {
            AttributeType::F32 => glow::FLOAT,
            AttributeType::U32 => glow::UNSIGNED_INT,
            AttributeType::U8 => glow::UNSIGNED_BYTE,
        }
    }
}

/// One attribute in a [`VertexBufferLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBufferElement {
    /// Number of components, between one and four.
    pub count: u32,

    /// The component type.
    pub data_type: AttributeType,

    /// Whether integer data is normalized into `[0, 1]`.
    pub normalized: bool,
}

impl VertexBufferElement {
    /// The size of the whole attribute in bytes.
    pub fn size(&self) -> usize {
        self.count as usize * self.data_type.size()
    }
}

/// The interleaved attributes of a vertex buffer, in attribute-index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexBufferLayout {
    elements: Vec<VertexBufferElement>,
    stride: usize,
}

impl VertexBufferLayout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, count: u32, data_type: AttributeType, normalized: bool) -> &mut Self {
        let element = VertexBufferElement {
            count,
            data_type,
            normalized,
        };
        self.stride += element.size();
        self.elements.push(element);
        self
    }

    /// Append an attribute of `count` floats.
    pub fn push_f32(&mut self, count: u32) -> &mut Self {
        self.push(count, AttributeType::F32, false)
    }

    /// Append an attribute of `count` unsigned integers.
    pub fn push_u32(&mut self, count: u32) -> &mut Self {
        self.push(count, AttributeType::U32, false)
    }

    /// Append an attribute of `count` normalized bytes.
    pub fn push_u8(&mut self, count: u32) -> &mut Self {
        self.push(count, AttributeType::U8, true)
    }

    /// The attributes in order.
    pub fn elements(&self) -> &[VertexBufferElement] {
        &self.elements
    }

    /// The distance between consecutive vertices in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Each attribute paired with its byte offset into a vertex.
    pub fn offsets(&self) -> impl Iterator<Item = (usize, &VertexBufferElement)> + '_ {
        self.elements.iter().scan(0, |offset, element| {
            let this = *offset;
            *offset += element.size();
            Some((this, element))
        })
    }
}

/// A vertex array object.
pub struct VertexArray<H: HasContext + ?Sized> {
    context: Rc<H>,
    vao: H::VertexArray,
}

impl<H: HasContext + ?Sized> fmt::Debug for VertexArray<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexArray").finish_non_exhaustive()
    }
}

impl<H: HasContext + ?Sized> VertexArray<H> {
    /// Create an empty vertex array.
    ///
    /// # Safety
    ///
    /// `context` must be current, and must still be current when this is dropped.
    pub unsafe fn new(context: Rc<H>) -> Result<Self, Error> {
        let vao = context.create_vertex_array().gl_err()?;
        Ok(Self { context, vao })
    }

    /// Describe the attributes of `buffer` according to `layout`.
    ///
    /// Leaves this vertex array bound.
    pub fn add_buffer(
        &self,
        buffer: &VertexBuffer<H>,
        layout: &VertexBufferLayout,
    ) -> Result<(), Error> {
        self.bind();
        buffer.bind();

        let stride = layout.stride() as i32;
        for (index, (offset, element)) in layout.offsets().enumerate() {
            let index = index as u32;
            unsafe {
                gl_call!(self.context, {
                    self.context.enable_vertex_attrib_array(index);
                    self.context.vertex_attrib_pointer_f32(
                        index,
                        element.count as i32,
                        element.data_type.gl_type(),
                        element.normalized,
                        stride,
                        offset as i32,
                    );
                })?;
            }
        }

        Ok(())
    }

    /// Bind this vertex array.
    pub fn bind(&self) {
        unsafe {
            self.context.bind_vertex_array(Some(self.vao));
        }
    }

    /// Unbind the current vertex array.
    pub fn unbind(&self) {
        unsafe {
            self.context.bind_vertex_array(None);
        }
    }
}

impl<H: HasContext + ?Sized> Drop for VertexArray<H> {
    fn drop(&mut self) {
        unsafe {
            self.context.delete_vertex_array(self.vao);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_grows_with_each_element() {
        let mut layout = VertexBufferLayout::new();
        layout.push_f32(2).push_f32(2).push_u8(4);

        assert_eq!(layout.stride(), 2 * 4 + 2 * 4 + 4);
        assert_eq!(layout.elements().len(), 3);
        assert!(layout.elements()[2].normalized);
        assert!(!layout.elements()[0].normalized);
    }

    #[test]
    fn offsets_are_running_sums() {
        let mut layout = VertexBufferLayout::new();
        layout.push_f32(3).push_u32(1).push_u8(4);

        let offsets: Vec<_> = layout.offsets().map(|(offset, _)| offset).collect();
        assert_eq!(offsets, [0, 12, 16]);
    }

    #[test]
    fn position_only_layout() {
        let mut layout = VertexBufferLayout::new();
        layout.push_f32(2);

        assert_eq!(layout.stride(), std::mem::size_of::<crate::Position>());
    }

    #[test]
    fn empty_layout_has_no_stride() {
        let layout = VertexBufferLayout::new();
        assert_eq!(layout.stride(), 0);
        assert_eq!(layout.offsets().count(), 0);
    }
}
