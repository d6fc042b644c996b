use image::RgbaImage;
use sphere_tracer_lib::{
    application::{AppState, Application, Layer, Screen},
    config,
    renderer::{FrameQuad, Vertex},
    texture::Texture,
    FrameDriver, Scene,
};
use wgpu::{
    include_wgsl, CommandEncoderDescriptor, PipelineLayoutDescriptor, RenderPassColorAttachment,
    RenderPassDescriptor, RenderPipelineDescriptor, TextureViewDescriptor,
};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
};

struct RayTracingCPU {
    driver: FrameDriver,
    frame: RgbaImage,
    texture: Texture,
    frame_bind_group: wgpu::BindGroup,
    render_pipeline: wgpu::RenderPipeline,
    quad: FrameQuad,
    snapshots: u32,
}

impl RayTracingCPU {
    fn save_snapshot(&mut self) {
        let path = format!("frame-{}.png", self.snapshots);
        match self.frame.save(&path) {
            Ok(()) => {
                self.snapshots += 1;
                tracing::info!(path = %path, "snapshot saved");
            }
            Err(err) => tracing::error!(path = %path, "failed to save snapshot: {err}"),
        }
    }
}

impl Layer for RayTracingCPU {
    type LayerErr = std::convert::Infallible;

    fn start(screen: &mut Screen, app: &AppState) -> Self {
        let shader = screen
            .device
            .create_shader_module(include_wgsl!("asset/shader/frame_quad.wgsl"));

        let quad = FrameQuad::new(&screen.device);

        let driver = FrameDriver::new(Scene::three_spheres_on_floor());
        tracing::info!(
            spheres = driver.scene().spheres.len(),
            width = config::WIDTH,
            height = config::HEIGHT,
            "scene ready"
        );

        let mut frame = RgbaImage::new(config::WIDTH, config::HEIGHT);
        driver.render(app.elapsed(), &mut frame);
        let texture = Texture::from_image(
            &screen.device,
            &screen.queue,
            &frame,
            Some("Frame texture"),
        );

        let texture_bind_group_layout =
            screen
                .device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                multisampled: false,
                                view_dimension: wgpu::TextureViewDimension::D2,
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                    label: Some("texture_bind_group_layout"),
                });

        let frame_bind_group = screen.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
            label: Some("frame_bind_group"),
        });

        let render_pipeline_layout =
            screen
                .device
                .create_pipeline_layout(&PipelineLayoutDescriptor {
                    label: Some("Render Pipeline Layout"),
                    bind_group_layouts: &[&texture_bind_group_layout],
                    push_constant_ranges: &[],
                });

        let render_pipeline = screen
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some("Render Pipeline"),
                layout: Some(&render_pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    buffers: &[Vertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: screen.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
            });

        Self {
            driver,
            frame,
            texture,
            frame_bind_group,
            render_pipeline,
            quad,
            snapshots: 0,
        }
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>, _app: &AppState, _screen: &mut Screen) {
        // the raster is fixed; the quad stretches to the window
        tracing::debug!(
            width = new_size.width,
            height = new_size.height,
            "window resized"
        );
    }

    fn process_event(&mut self, event: &Event<()>, _screen: &mut Screen) {
        if let Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(VirtualKeyCode::F12),
                            ..
                        },
                    ..
                },
            ..
        } = event
        {
            self.save_snapshot();
        }
    }

    fn update(&mut self, app: &AppState, screen: &mut Screen) {
        self.driver.render(app.elapsed(), &mut self.frame);
        self.texture.update_data(&screen.queue, &self.frame);
        tracing::trace!(frame_time = app.frame_time(), "frame uploaded");
    }

    fn render(&mut self, _app: &AppState, screen: &mut Screen) -> Result<(), wgpu::SurfaceError> {
        let output = screen.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&TextureViewDescriptor::default());
        let mut encoder = screen
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(config::CLEAR_COLOR),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            self.quad.draw(&mut render_pass);
        }

        screen.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn shutdown(&mut self, _app: &AppState, _screen: &mut Screen) -> Result<(), Self::LayerErr> {
        tracing::info!("exiting");
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = pollster::block_on(Application::<RayTracingCPU>::init()) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}
