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

//! Settings for the demo window.

use std::path::PathBuf;

/// Where the bundled shader file lives.
pub const DEFAULT_SHADER_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/res/shaders/basic.shader");

/// Window and rendering settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// The window title.
    pub title: String,

    /// The initial inner width of the window.
    pub width: u32,

    /// The initial inner height of the window.
    pub height: u32,

    /// The shader file to load.
    pub shader_path: PathBuf,

    /// The `vec4` uniform driven by the color animation.
    pub color_uniform: String,

    /// The per-frame step of the color animation.
    pub color_step: f32,

    /// The color the frame is cleared to.
    pub clear_color: [f32; 4],

    /// Whether to wait for vertical blank between frames.
    pub vsync: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "Hello World".into(),
            width: 640,
            height: 480,
            shader_path: DEFAULT_SHADER_PATH.into(),
            color_uniform: "u_Color".into(),
            color_step: 0.05,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            vsync: true,
        }
    }
}

impl DemoConfig {
    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the initial window size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the shader file to load.
    pub fn with_shader_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.shader_path = path.into();
        self
    }

    /// Set the clear color.
    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    /// Enable or disable vsync.
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_window() {
        let config = DemoConfig::default();
        assert_eq!(config.title, "Hello World");
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.color_uniform, "u_Color");
        assert!(config.vsync);
    }

    #[test]
    fn default_shader_ships_with_the_crate() {
        assert!(DemoConfig::default().shader_path.is_file());
    }

    #[test]
    fn builders_override_fields() {
        let config = DemoConfig::default()
            .with_title("quad")
            .with_size(800, 600)
            .with_shader_path("other.shader")
            .with_clear_color([1.0; 4])
            .with_vsync(false);

        assert_eq!(config.title, "quad");
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.shader_path, PathBuf::from("other.shader"));
        assert_eq!(config.clear_color, [1.0; 4]);
        assert!(!config.vsync);
    }
}
