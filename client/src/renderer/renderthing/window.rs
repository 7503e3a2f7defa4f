use std::{sync::Arc, time::Duration};

use log::{error, info};
use pixels::{Pixels, PixelsBuilder, SurfaceTexture, wgpu::TextureFormat};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowAttributes, WindowId},
};

use super::{frame::RenderFrame, sleeper::Sleeper};

pub(super) struct RendererWindow {
    config: RendererWindowConfig,
    resumed_window: Option<ResumedWindow>,
    sleeper: Sleeper,
}

impl RendererWindow {
    pub fn new(config: RendererWindowConfig) -> Self {
        let sleeper = {
            let target_frame_time = Duration::from_micros(1_000_000 / config.target_fps.max(1));
            Sleeper::new(target_frame_time)
        };

        Self {
            config,
            resumed_window: None,
            sleeper,
        }
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<ResumedWindow> {
        let window = Arc::new({
            let window_size = LogicalSize::new(self.config.width as f64, self.config.height as f64);

            event_loop.create_window(
                WindowAttributes::default()
                    .with_title(self.config.title.clone())
                    .with_inner_size(window_size),
            )?
        });

        let pixels = {
            let window_size = window.inner_size();

            let surface_texture =
                SurfaceTexture::new(window_size.width, window_size.height, window.clone());

            PixelsBuilder::new(window_size.width, window_size.height, surface_texture)
                .texture_format(TextureFormat::Rgba8UnormSrgb)
                .build()?
        };

        Ok(ResumedWindow { window, pixels })
    }
}

pub struct RendererWindowConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
    pub target_fps: u64,
    pub draw_callback: Box<dyn FnMut(RenderFrame)>,
    pub event_callback: Option<Box<dyn FnMut(&WindowEvent)>>,
}

struct ResumedWindow {
    window: Arc<Window>,
    pixels: Pixels<'static>,
}

impl ApplicationHandler for RendererWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.resumed_window.is_some() {
            return;
        }

        match self.create_window(event_loop) {
            Ok(resumed_window) => {
                resumed_window.window.request_redraw();
                self.resumed_window = Some(resumed_window);
            }
            Err(e) => {
                error!("Couldn't create the window: {e:?}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(ResumedWindow { window, pixels }) = self.resumed_window.as_mut() else {
            return;
        };

        match event {
            WindowEvent::RedrawRequested => {
                let PhysicalSize { width, height } = window.inner_size();

                let next_frame = RenderFrame {
                    width,
                    height,
                    buffer: pixels.frame_mut(),
                };

                (self.config.draw_callback)(next_frame);

                if let Err(e) = pixels.render() {
                    error!("Rendering failed: {e}");
                    event_loop.exit();
                    return;
                }

                // FIXME: Throttling here blocks the whole event loop, resizing feels sluggish because of it.
                self.sleeper.sleep();
                window.request_redraw();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if width == 0 || height == 0 {
                    // Minimized.
                    return;
                }

                if let Err(e) = pixels
                    .resize_surface(width, height)
                    .and_then(|()| pixels.resize_buffer(width, height))
                {
                    error!("Couldn't resize to {width}x{height}: {e}");
                }
                window.request_redraw();
            }
            WindowEvent::CloseRequested => {
                info!("Window closed");
                event_loop.exit();
            }
            _ => {}
        }

        if let Some(event_callback) = &mut self.config.event_callback {
            event_callback(&event);
        }
    }
}
