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

//! Opens a window and draws a quad whose color pulses every frame.

use hello_quad::{
    ColorPulse, DemoConfig, Error as DemoError, IndexBuffer, Renderer, Shader,
    ShaderProgramSource, VertexArray, VertexBuffer, VertexBufferLayout, QUAD_INDICES,
    QUAD_POSITIONS,
};

use glow::HasContext;

use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{Display, GetGlDisplay};
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};

use raw_window_handle::HasRawWindowHandle;

use tracing_subscriber::EnvFilter;

use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{EventLoop, EventLoopWindowTarget};
use winit::window::{Window, WindowBuilder};

use std::error::Error;
use std::num::NonZeroU32;
use std::rc::Rc;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = DemoConfig::default();
    let event_loop = EventLoop::new();
    let setup = GlutinSetup::new(&event_loop, &config)?;
    setup.run(event_loop, config)
}

/// Everything that is created once the context is current.
struct Scene {
    renderer: Renderer<glow::Context>,
    shader: Shader<glow::Context>,
    vertex_array: VertexArray<glow::Context>,
    index_buffer: IndexBuffer<glow::Context>,
    _vertex_buffer: VertexBuffer<glow::Context>,
    pulse: ColorPulse,
    color_uniform: String,
}

impl Scene {
    /// Load the shaders and upload the quad.
    ///
    /// # Safety
    ///
    /// `context` must be current for as long as the scene lives.
    unsafe fn new(context: Rc<glow::Context>, config: &DemoConfig) -> Result<Self, DemoError> {
        let version = context.version();
        let header =
            hello_quad::version_header(version.major, version.minor, version.is_embedded)?;

        let source =
            ShaderProgramSource::from_file(&config.shader_path)?.with_version_header(header);
        let shader = Shader::new(context.clone(), &source)?;

        let vertex_array = VertexArray::new(context.clone())?;
        vertex_array.bind();

        let vertex_buffer = VertexBuffer::new(context.clone(), &QUAD_POSITIONS)?;
        let mut layout = VertexBufferLayout::new();
        layout.push_f32(2);
        vertex_array.add_buffer(&vertex_buffer, &layout)?;

        let index_buffer = IndexBuffer::new(context.clone(), &QUAD_INDICES)?;

        // Leave nothing bound; each frame binds what it draws.
        vertex_array.unbind();
        vertex_buffer.unbind();
        index_buffer.unbind();
        shader.unbind();

        Ok(Self {
            renderer: Renderer::new(context, config.clear_color),
            shader,
            vertex_array,
            index_buffer,
            _vertex_buffer: vertex_buffer,
            pulse: ColorPulse::new(config.color_step),
            color_uniform: config.color_uniform.clone(),
        })
    }

    fn render(&mut self) -> Result<(), DemoError> {
        self.renderer.clear()?;

        self.shader.bind();
        self.shader
            .set_uniform_4f(&self.color_uniform, self.pulse.rgba());

        self.renderer
            .draw(&self.vertex_array, &self.index_buffer, &self.shader)?;

        self.pulse.advance();
        Ok(())
    }
}

enum ContextState {
    NotCurrent(NotCurrentContext),
    Current {
        context: PossiblyCurrentContext,
        surface: Surface<WindowSurface>,
        window: Window,
    },
    Hole,
}

impl Default for ContextState {
    fn default() -> Self {
        Self::Hole
    }
}

struct GlutinSetup {
    display: Display,
    gl_config: Config,
    state: ContextState,
    window: Option<Window>,
}

fn make_window_builder(config: &DemoConfig) -> WindowBuilder {
    WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(config.width, config.height))
}

impl GlutinSetup {
    fn new<T>(
        event_loop: &EventLoopWindowTarget<T>,
        config: &DemoConfig,
    ) -> Result<Self, Box<dyn Error>> {
        // Windows needs the window before it can pick a config.
        let window = if cfg!(windows) {
            Some(make_window_builder(config))
        } else {
            None
        };

        let display = DisplayBuilder::new().with_window_builder(window);
        let (window, gl_config) =
            display.build(event_loop, ConfigTemplateBuilder::new(), |configs| {
                // The picker has to hand back a config, so there is no error to return.
                match most_samples(configs, |config| config.num_samples()) {
                    Some(config) => config,
                    None => {
                        tracing::error!("the display offers no OpenGL configs");
                        std::process::exit(1);
                    }
                }
            })?;

        tracing::debug!("picked GL config: {:?}", &gl_config);

        // Prefer a 3.3 core context, then whatever the platform hands out.
        let window_handle = window.as_ref().map(|w| w.raw_window_handle());
        let contexts = [
            ContextAttributesBuilder::new()
                .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
                .with_profile(GlProfile::Core)
                .build(window_handle),
            ContextAttributesBuilder::new().build(window_handle),
            ContextAttributesBuilder::new()
                .with_context_api(ContextApi::Gles(Some(Version::new(3, 0))))
                .build(window_handle),
        ];

        let display = gl_config.display();
        let context = contexts
            .iter()
            .find_map(|attrs| unsafe { display.create_context(&gl_config, attrs).ok() })
            .ok_or("could not create an OpenGL context")?;

        Ok(Self {
            display,
            gl_config,
            state: ContextState::NotCurrent(context),
            window,
        })
    }

    /// Create the surface and make the context current.
    ///
    /// Returns a function that loads `glow` for the context. It should only be
    /// called once per context, since it also installs the debug callback.
    fn make_current<T>(
        &mut self,
        window_target: &EventLoopWindowTarget<T>,
        config: &DemoConfig,
    ) -> Result<impl FnOnce() -> glow::Context, Box<dyn Error>> {
        let window = match self.window.take() {
            Some(window) => window,
            None => glutin_winit::finalize_window(
                window_target,
                make_window_builder(config),
                &self.gl_config,
            )?,
        };

        let attrs = window.build_surface_attributes(<_>::default());
        let surface = unsafe {
            self.display
                .create_window_surface(&self.gl_config, &attrs)?
        };

        let context = match std::mem::take(&mut self.state) {
            ContextState::NotCurrent(context) => context.make_current(&surface)?,
            _ => return Err("context is already current".into()),
        };

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(err) = surface.set_swap_interval(&context, interval) {
            tracing::warn!("error setting swap interval: {err:?}");
        }

        self.state = ContextState::Current {
            context,
            surface,
            window,
        };

        let display = self.display.clone();
        Ok(move || {
            #[cfg_attr(target_vendor = "apple", allow(unused_mut))]
            let mut glow_context = unsafe {
                glow::Context::from_loader_function_cstr(|s| {
                    display.get_proc_address(s) as *const _
                })
            };

            unsafe {
                tracing::info!("{}", glow_context.get_parameter_string(glow::VERSION));

                #[cfg(not(target_vendor = "apple"))]
                if glow_context.supported_extensions().contains("GL_KHR_debug") {
                    glow_context.enable(glow::DEBUG_OUTPUT);
                    glow_context.debug_message_callback(debug_message_callback);
                }
            }

            glow_context
        })
    }

    fn run(mut self, event_loop: EventLoop<()>, config: DemoConfig) -> Result<(), Box<dyn Error>> {
        let mut scene: Option<Scene> = None;

        event_loop.run(move |event, window_target, control_flow| {
            control_flow.set_poll();

            match event {
                Event::Resumed => {
                    if matches!(self.state, ContextState::Current { .. }) {
                        return;
                    }

                    let generator = match self.make_current(window_target, &config) {
                        Ok(generator) => generator,
                        Err(err) => {
                            tracing::error!("failed to set up the GL context: {err}");
                            control_flow.set_exit_with_code(1);
                            return;
                        }
                    };

                    // The scene keeps its glow context across suspends.
                    let loaded = get_or_try_init(&mut scene, || {
                        // SAFETY: The context was just made current.
                        unsafe { Scene::new(Rc::new(generator()), &config) }
                    });
                    if let Err(err) = loaded {
                        tracing::error!("{err}");
                        control_flow.set_exit_with_code(1);
                    }
                }
                Event::Suspended => {
                    // Android may take the native window away; the surface has to go
                    // first, but the context and its objects survive.
                    if !matches!(self.state, ContextState::Current { .. }) {
                        return;
                    }

                    if let ContextState::Current { context, .. } = std::mem::take(&mut self.state)
                    {
                        match context.make_not_current() {
                            Ok(context) => self.state = ContextState::NotCurrent(context),
                            Err(err) => {
                                tracing::error!("failed to release the context: {err}");
                                control_flow.set_exit_with_code(1);
                            }
                        }
                    }
                }
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::Resized(size) => {
                        if let (Some(width), Some(height)) =
                            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                        {
                            if let ContextState::Current {
                                context, surface, ..
                            } = &self.state
                            {
                                surface.resize(context, width, height);
                                if let Some(scene) = &scene {
                                    scene.renderer.resize(size.width, size.height);
                                }
                            }
                        }
                    }
                    WindowEvent::CloseRequested => control_flow.set_exit(),
                    _ => (),
                },
                Event::RedrawEventsCleared => {
                    if let (
                        ContextState::Current {
                            context,
                            surface,
                            window,
                        },
                        Some(scene),
                    ) = (&self.state, scene.as_mut())
                    {
                        if let Err(err) = scene.render() {
                            tracing::error!("failed to draw frame: {err}");
                        }

                        window.request_redraw();

                        if let Err(err) = surface.swap_buffers(context) {
                            tracing::error!("failed to swap buffers: {err}");
                        }
                    }
                }
                Event::LoopDestroyed => {
                    // GL objects go before the context they live in.
                    drop(scene.take());
                    self.state = ContextState::Hole;
                }
                _ => (),
            }
        })
    }
}

/// Pick the item with the most samples.
fn most_samples<C>(configs: impl Iterator<Item = C>, samples: impl Fn(&C) -> u8) -> Option<C> {
    configs.max_by_key(|config| samples(config))
}

/// Fill `slot` with `init` if it is empty.
fn get_or_try_init<T, E>(
    slot: &mut Option<T>,
    init: impl FnOnce() -> Result<T, E>,
) -> Result<&mut T, E> {
    let value = match slot.take() {
        Some(value) => value,
        None => init()?,
    };

    Ok(slot.insert(value))
}

#[cfg(not(target_vendor = "apple"))]
fn debug_message_callback(source: u32, ty: u32, id: u32, severity: u32, message: &str) {
    let source = match source {
        glow::DEBUG_SOURCE_API => "API",
        glow::DEBUG_SOURCE_WINDOW_SYSTEM => "Window System",
        glow::DEBUG_SOURCE_SHADER_COMPILER => "Shader Compiler",
        glow::DEBUG_SOURCE_THIRD_PARTY => "Third Party",
        glow::DEBUG_SOURCE_APPLICATION => "Application",
        _ => "Other",
    };

    let ty = match ty {
        glow::DEBUG_TYPE_ERROR => "Error",
        glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "Deprecated Behavior",
        glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "Undefined Behavior",
        glow::DEBUG_TYPE_PORTABILITY => "Portability",
        glow::DEBUG_TYPE_PERFORMANCE => "Performance",
        glow::DEBUG_TYPE_MARKER => "Marker",
        _ => "Other",
    };

    match severity {
        glow::DEBUG_SEVERITY_HIGH => tracing::error!("{ty}-{id} ({source}): {message}"),
        glow::DEBUG_SEVERITY_MEDIUM => tracing::warn!("{ty}-{id} ({source}): {message}"),
        glow::DEBUG_SEVERITY_LOW => tracing::info!("{ty}-{id} ({source}): {message}"),
        glow::DEBUG_SEVERITY_NOTIFICATION => tracing::debug!("{ty}-{id} ({source}): {message}"),
        _ => (),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_is_filled_once() {
        let mut slot = None;
        let mut inits = 0;

        for _ in 0..3 {
            let value = get_or_try_init(&mut slot, || {
                inits += 1;
                Ok::<_, ()>(42)
            });
            assert_eq!(value, Ok(&mut 42));
        }

        assert_eq!(inits, 1);
    }

    #[test]
    fn filled_slot_never_runs_init() {
        let mut slot = Some("scene");
        let mut ran = false;

        let value = get_or_try_init(&mut slot, || {
            ran = true;
            Err::<&str, _>("should not load")
        });

        assert_eq!(value, Ok(&mut "scene"));
        assert!(!ran);
    }

    #[test]
    fn failed_init_leaves_slot_empty() {
        let mut slot: Option<u32> = None;

        assert_eq!(get_or_try_init(&mut slot, || Err("no shader")), Err("no shader"));
        assert!(slot.is_none());
    }

    #[test]
    fn picks_the_most_samples() {
        let configs = [(0, "plain"), (4, "msaa4"), (2, "msaa2")];
        let best = most_samples(configs.into_iter(), |&(samples, _)| samples);

        assert_eq!(best, Some((4, "msaa4")));
    }

    #[test]
    fn no_configs_is_none() {
        assert_eq!(most_samples(std::iter::empty::<u8>(), |&s| s), None);
    }
}
