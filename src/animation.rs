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

//! The pulsing color fed to the fragment shader.

/// A red channel that bounces between zero and one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPulse {
    value: f32,
    step: f32,
}

impl Default for ColorPulse {
    fn default() -> Self {
        Self::new(0.05)
    }
}

impl ColorPulse {
    /// Start at zero, moving up by `step` per frame.
    ///
    /// The step is clamped to at most one.
    pub fn new(step: f32) -> Self {
        Self {
            value: 0.0,
            step: step.abs().min(1.0),
        }
    }

    /// The current red channel.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// The current color, as RGBA.
    pub fn rgba(&self) -> [f32; 4] {
        [self.value, 0.3, 0.8, 1.0]
    }

    /// Move one step, reflecting off either end of `[0, 1]`.
    pub fn advance(&mut self) -> f32 {
        let next = self.value + self.step;

        self.value = if next > 1.0 {
            self.step = -self.step.abs();
            2.0 - next
        } else if next < 0.0 {
            self.step = self.step.abs();
            -next
        } else {
            next
        };

        self.value
    }
}
