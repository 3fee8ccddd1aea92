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

//! Splitting a single shader file into its vertex and fragment sources.
//!
//! The file format is plain text. A line containing `#shader vertex` or
//! `#shader fragment` switches the active section, and every other line is
//! appended verbatim to whichever section is active.

use crate::error::{Error, Stage};

use std::fs;
use std::path::Path;

const MARKER: &str = "#shader";
const VERSION_DIRECTIVE: &str = "#version";

/// The vertex and fragment sources read out of a shader file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderProgramSource {
    /// Source for the vertex stage.
    pub vertex: String,

    /// Source for the fragment stage.
    pub fragment: String,
}

impl ShaderProgramSource {
    /// Split `text` on its `#shader` markers.
    ///
    /// Lines that come before the first recognized marker belong to no stage and
    /// are dropped. A marker that names neither stage leaves the active section
    /// unchanged.
    pub fn parse(text: &str) -> Self {
        let mut source = Self::default();
        let mut active = None;

        for line in text.lines() {
            if line.contains(MARKER) {
                if line.contains("vertex") {
                    active = Some(Stage::Vertex);
                } else if line.contains("fragment") {
                    active = Some(Stage::Fragment);
                }
                continue;
            }

            let section = match active {
                Some(Stage::Vertex) => &mut source.vertex,
                Some(Stage::Fragment) => &mut source.fragment,
                None => continue,
            };

            section.push_str(line);
            section.push('\n');
        }

        source
    }

    /// Read and parse the shader file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let source = Self::parse(&text);
        tracing::debug!(
            path = %path.display(),
            vertex_len = source.vertex.len(),
            fragment_len = source.fragment.len(),
            "parsed shader file"
        );

        Ok(source)
    }

    /// Get the source for one stage.
    pub fn stage(&self, stage: Stage) -> &str {
        match stage {
            Stage::Vertex => &self.vertex,
            Stage::Fragment => &self.fragment,
        }
    }

    /// Prefix both sections with `header`, unless a section already declares its
    /// own `#version`.
    pub fn with_version_header(self, header: &str) -> Self {
        let prefix = |section: String| {
            if section.trim_start().starts_with(VERSION_DIRECTIVE) {
                section
            } else {
                format!("{header}\n{section}")
            }
        };

        Self {
            vertex: prefix(self.vertex),
            fragment: prefix(self.fragment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &str = "\
#shader vertex
in vec4 position;
void main() { gl_Position = position; }

#shader fragment
uniform vec4 u_Color;
out vec4 color;
void main() { color = u_Color; }
";

    #[test]
    fn splits_into_two_sections() {
        let source = ShaderProgramSource::parse(BASIC);

        assert_eq!(
            source.vertex,
            "in vec4 position;\nvoid main() { gl_Position = position; }\n\n"
        );
        assert_eq!(
            source.fragment,
            "uniform vec4 u_Color;\nout vec4 color;\nvoid main() { color = u_Color; }\n"
        );
    }

    #[test]
    fn sections_may_come_in_any_order() {
        let source = ShaderProgramSource::parse("#shader fragment\nf\n#shader vertex\nv\n");
        assert_eq!(source.vertex, "v\n");
        assert_eq!(source.fragment, "f\n");
    }

    #[test]
    fn repeated_markers_append() {
        let text = "#shader vertex\na\n#shader fragment\nb\n#shader vertex\nc\n";
        let source = ShaderProgramSource::parse(text);
        assert_eq!(source.vertex, "a\nc\n");
        assert_eq!(source.fragment, "b\n");
    }

    #[test]
    fn lines_before_first_marker_are_dropped() {
        let source = ShaderProgramSource::parse("// header\n#shader vertex\nv\n");
        assert_eq!(source.vertex, "v\n");
        assert!(source.fragment.is_empty());
    }

    #[test]
    fn unknown_marker_keeps_active_section() {
        let text = "#shader vertex\na\n#shader geometry\nb\n";
        let source = ShaderProgramSource::parse(text);
        assert_eq!(source.vertex, "a\nb\n");
    }

    #[test]
    fn marker_needs_no_exact_spacing() {
        let source = ShaderProgramSource::parse("  #shader   vertex  \nv\n");
        assert_eq!(source.vertex, "v\n");
    }

    #[test]
    fn crlf_input_is_normalized() {
        let source = ShaderProgramSource::parse("#shader vertex\r\nv\r\n#shader fragment\r\nf\r\n");
        assert_eq!(source.vertex, "v\n");
        assert_eq!(source.fragment, "f\n");
    }

    #[test]
    fn empty_input_gives_empty_sections() {
        assert_eq!(ShaderProgramSource::parse(""), ShaderProgramSource::default());
    }

    #[test]
    fn version_header_is_added_once() {
        let source = ShaderProgramSource {
            vertex: "void main() {}\n".into(),
            fragment: "#version 300 es\nvoid main() {}\n".into(),
        }
        .with_version_header("#version 330 core");

        assert_eq!(source.vertex, "#version 330 core\nvoid main() {}\n");
        assert_eq!(source.fragment, "#version 300 es\nvoid main() {}\n");
    }

    #[test]
    fn stage_accessor() {
        let source = ShaderProgramSource::parse(BASIC);
        assert!(source.stage(Stage::Vertex).contains("gl_Position"));
        assert!(source.stage(Stage::Fragment).contains("u_Color"));
    }

    #[test]
    fn reads_from_disk() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BASIC.as_bytes()).unwrap();

        let source = ShaderProgramSource::from_file(file.path()).unwrap();
        assert_eq!(source, ShaderProgramSource::parse(BASIC));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShaderProgramSource::from_file(dir.path().join("nope.shader")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
