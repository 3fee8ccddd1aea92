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

//! The quad that gets drawn.

/// A 2D vertex position in normalized device coordinates.
pub type Position = [f32; 2];

/// Corners of a centered square, counter-clockwise from the bottom left.
pub const QUAD_POSITIONS: [Position; 4] = [
    [-0.5, -0.5],
    [0.5, -0.5],
    [0.5, 0.5],
    [-0.5, 0.5],
];

/// Two triangles covering [`QUAD_POSITIONS`].
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_in_bounds() {
        assert!(QUAD_INDICES
            .iter()
            .all(|&i| (i as usize) < QUAD_POSITIONS.len()));
    }

    #[test]
    fn triangles_share_the_diagonal() {
        let (first, second) = QUAD_INDICES.split_at(3);
        let shared = first.iter().filter(|&i| second.contains(i)).count();
        assert_eq!(shared, 2);
    }

    #[test]
    fn positions_cast_to_bytes() {
        let bytes: &[u8] = bytemuck::cast_slice(&QUAD_POSITIONS);
        assert_eq!(bytes.len(), 4 * 2 * std::mem::size_of::<f32>());
    }
}
