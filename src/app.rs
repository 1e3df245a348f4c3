//! The scene driver: window, event loop, and the per-frame update/render
//! cycle.
//!
//! [`run`] takes a configured [`SolarSystem`] and drives it: GPU resources
//! are created lazily on `resumed` (winit hands out the window there), then
//! every redraw polls input, applies camera commands, recomputes body
//! positions from the elapsed time, and issues the skybox and body passes.
//!
//! Controls: arrow keys or left-drag rotate the camera, the scroll wheel
//! zooms, `W`/`F` switch wireframe/fill, `Escape` or `Q` quits.

use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes, WindowId};

use crate::body::SolarSystem;
use crate::body_pass::{BodyInstance, BodyPass};
use crate::camera::Camera;
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::skybox::Skybox;
use crate::texture::{Cubemap, Texture};

/// Keyboard rotation speed in radians per second.
const ROTATE_SPEED: f32 = 1.2;
/// Mouse-drag rotation in radians per pixel.
const DRAG_SENSITIVITY: f32 = 0.005;
/// Field-of-view change per scroll line, in degrees.
const ZOOM_SENSITIVITY: f32 = 2.0;
/// Face size of the procedural starfield fallback.
const STARFIELD_SIZE: u32 = 512;

/// Configuration for the viewer window and scene assets.
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Paths to the six skybox faces (+X, -X, +Y, -Y, +Z, -Z). When absent
    /// or unloadable, a procedural starfield is used instead.
    pub skybox_faces: Option<[String; 6]>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Orrery".to_string(),
            width: 1024,
            height: 768,
            skybox_faces: None,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Use the six given images as the skybox (+X, -X, +Y, -Y, +Z, -Z).
    pub fn skybox<S: Into<String>>(mut self, faces: [S; 6]) -> Self {
        self.skybox_faces = Some(faces.map(Into::into));
        self
    }
}

/// Run the viewer until the window is closed.
///
/// # Example
/// ```no_run
/// use orrery::{AppConfig, CelestialBody, SolarSystem, run};
///
/// let mut system = SolarSystem::new();
/// let sun = system.add(CelestialBody::star(3.0, 64));
/// system.add(CelestialBody::planet(1.0, 48, sun, 10.0, 12.0));
///
/// run(AppConfig::new().title("Orrery"), system);
/// ```
pub fn run(config: AppConfig, system: SolarSystem) {
    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::Pending {
        config,
        system: Some(system),
    };
    event_loop.run_app(&mut app).unwrap();
}

enum App {
    Pending {
        config: AppConfig,
        system: Option<SolarSystem>,
    },
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        system: SolarSystem,
        camera: Camera,
        input: Input,
        skybox: Skybox,
        body_pass: BodyPass,
        instances: Vec<BodyInstance>,
        start_time: Instant,
        last_frame: Instant,
    },
}

impl App {
    /// Load the cubemap named by the config, falling back to the procedural
    /// starfield when no faces are configured or loading fails.
    fn load_cubemap(gpu: &GpuContext, config: &AppConfig) -> Cubemap {
        match &config.skybox_faces {
            Some(paths) => match Cubemap::from_files(gpu, paths) {
                Ok(cubemap) => cubemap,
                Err(e) => {
                    log::warn!("skybox load failed ({e}); using procedural starfield");
                    Cubemap::starfield(gpu, STARFIELD_SIZE, 0)
                }
            },
            None => Cubemap::starfield(gpu, STARFIELD_SIZE, 0),
        }
    }

    /// Load a body's surface texture, falling back to a procedural surface
    /// tinted with the body's color.
    fn load_body_texture(gpu: &GpuContext, index: usize, body: &crate::body::CelestialBody) -> Texture {
        match &body.texture_path {
            Some(path) => match Texture::from_file(gpu, path) {
                Ok(texture) => texture,
                Err(e) => {
                    log::warn!("texture '{path}' failed to load ({e}); using procedural surface");
                    Texture::surface(gpu, 256, index as u32, body.color)
                }
            },
            None => Texture::surface(gpu, 256, index as u32, body.color),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let App::Pending { config, system } = self {
            let window_attrs = WindowAttributes::default()
                .with_title(&config.title)
                .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

            let window = Arc::new(event_loop.create_window(window_attrs).unwrap());
            let gpu = GpuContext::new(window.clone());

            let system = system.take().unwrap();

            let mut camera = Camera::new().at([0.0, 10.0, 28.0]).fov(45.0).clip(0.1, 500.0);
            camera.set_aspect(gpu.aspect());

            let cubemap = Self::load_cubemap(&gpu, config);
            let skybox = Skybox::new(&gpu, &cubemap);

            let body_pass = BodyPass::new(&gpu);
            let instances: Vec<BodyInstance> = system
                .iter()
                .enumerate()
                .map(|(i, body)| {
                    let texture = Self::load_body_texture(&gpu, i, body);
                    body_pass.instance(&gpu, body, &texture)
                })
                .collect();

            log::info!("scene ready: {} bodies", system.len());

            *self = App::Running {
                window,
                gpu,
                system,
                camera,
                input: Input::new(),
                skybox,
                body_pass,
                instances,
                start_time: Instant::now(),
                last_frame: Instant::now(),
            };
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let App::Running {
            window,
            gpu,
            system,
            camera,
            input,
            skybox,
            body_pass,
            instances,
            start_time,
            last_frame,
        } = self
        else {
            return;
        };

        input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
                camera.set_aspect(gpu.aspect());
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let time = start_time.elapsed().as_secs_f32();
                let dt = now.duration_since(*last_frame).as_secs_f32();
                *last_frame = now;

                if input.key_pressed(KeyCode::Escape) || input.key_pressed(KeyCode::KeyQ) {
                    event_loop.exit();
                    return;
                }
                if input.key_pressed(KeyCode::KeyW) && !body_pass.set_wireframe(true) {
                    log::warn!("wireframe rasterization not supported by this adapter");
                }
                if input.key_pressed(KeyCode::KeyF) {
                    body_pass.set_wireframe(false);
                }

                // Camera commands: held arrow keys and mouse drag rotate,
                // the scroll wheel zooms.
                if input.key_down(KeyCode::ArrowLeft) {
                    camera.yaw(ROTATE_SPEED * dt);
                }
                if input.key_down(KeyCode::ArrowRight) {
                    camera.yaw(-ROTATE_SPEED * dt);
                }
                if input.key_down(KeyCode::ArrowUp) {
                    camera.pitch(ROTATE_SPEED * dt);
                }
                if input.key_down(KeyCode::ArrowDown) {
                    camera.pitch(-ROTATE_SPEED * dt);
                }
                if input.mouse_down(MouseButton::Left) {
                    let delta = input.mouse_delta();
                    camera.yaw(-delta.x * DRAG_SENSITIVITY);
                    camera.pitch(delta.y * DRAG_SENSITIVITY);
                }
                let scroll = input.scroll_delta();
                if scroll.y != 0.0 {
                    camera.zoom(scroll.y * ZOOM_SENSITIVITY);
                }

                // Positions are derived from elapsed time; recompute before
                // the draw calls read the transforms.
                system.update(time);

                body_pass.ensure_depth_size(gpu);
                body_pass.update_camera(gpu, camera, time);
                skybox.update(gpu, camera);
                for (body, instance) in system.iter().zip(instances.iter()) {
                    body_pass.update_instance(gpu, instance, body, time);
                }

                let output = gpu.surface.get_current_texture().unwrap();
                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                let mut encoder = gpu
                    .device
                    .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                        label: Some("Frame Encoder"),
                    });

                {
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Scene Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        })],
                        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                            view: body_pass.depth_view(),
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        }),
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    });

                    // Skybox first, with depth relaxed; bodies after, with
                    // ordinary depth testing.
                    skybox.render(&mut render_pass);
                    body_pass.render(&mut render_pass, instances);
                }

                gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                input.begin_frame();
                window.request_redraw();
            }
            _ => {}
        }
    }
}
