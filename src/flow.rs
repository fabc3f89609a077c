//! Application shell and event loop.
//!
//! [`App`] is the winit [`ApplicationHandler`]. On `resumed` it creates the
//! window and the [`AppState`] (GPU context, scene, camera rig, debug panel and
//! render loop), fires off the texture loads and starts the render loop. From
//! then on it routes events:
//!
//! 1. resize and scale-factor changes go to the viewport resize handler
//! 2. pointer input goes to the orbit controller
//! 3. keyboard input goes to the debug panel
//! 4. redraw requests run one [`RenderLoop::tick`]
//! 5. finished texture loads arrive as [`GlobeEvent::TextureLoaded`]

use std::{fmt::Debug, sync::Arc};

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    keyboard::PhysicalKey,
    window::Window,
};

use crate::{
    camera::{Camera, OrbitController},
    context::Context,
    data_structures::scene_graph::{GlobeScene, SceneOptions},
    debug::DebugPanel,
    frame::{RenderLoop, SystemClock},
    render::{Frame, GpuScene},
    resources::texture::{TextureSlot, group_by_path, load_image},
    viewport::ViewportState,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Element the web build renders into.
#[cfg(target_arch = "wasm32")]
const CANVAS_SELECTOR: &str = "canvas.webgl";

/// Top-level configuration of a globe application.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobeOptions {
    pub title: String,
    pub clear_colour: wgpu::Color,
    pub scene: SceneOptions,
}

impl GlobeOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_scene(mut self, scene: SceneOptions) -> Self {
        self.scene = scene;
        self
    }
}

impl Default for GlobeOptions {
    fn default() -> Self {
        Self {
            title: "globe-flow".to_string(),
            clear_colour: wgpu::Color::BLACK,
            scene: SceneOptions::default(),
        }
    }
}

/// Everything a running globe owns.
pub struct AppState {
    pub(crate) ctx: Context,
    gpu: GpuScene,
    scene: GlobeScene,
    camera: Camera,
    controls: OrbitController,
    debug: DebugPanel,
    render_loop: RenderLoop<SystemClock>,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, options: &GlobeOptions) -> Self {
        let scene = GlobeScene::build(&options.scene);
        let camera = Camera::default();
        let ctx = Context::new(window, &camera, scene.lights(), options.clear_colour).await;
        let ctx = match ctx {
            Ok(ctx) => ctx,
            Err(e) => panic!(
                "App initialization failed. Cannot create the main context: {:#}",
                e
            ),
        };
        let gpu = GpuScene::new(&ctx, &scene);
        let debug = DebugPanel::for_options(&options.scene, &scene);
        Self {
            ctx,
            gpu,
            scene,
            camera,
            controls: OrbitController::new(),
            debug,
            render_loop: RenderLoop::new(SystemClock::new()),
            is_surface_configured: false,
        }
    }

    fn resize(&mut self, viewport: ViewportState) {
        if self.ctx.resize(viewport) {
            self.is_surface_configured = true;
            self.controls
                .set_viewport_height(self.ctx.window.inner_size().height as f32);
            let window = self.ctx.window.clone();
            self.render_loop.resume(window.as_ref());
        }
    }

    fn resize_to_window(&mut self) {
        let window = self.ctx.window.clone();
        self.resize(ViewportState::from_physical(
            window.inner_size(),
            window.scale_factor(),
        ));
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        if let PhysicalKey::Code(code) = event.physical_key {
            if self.debug.handle_key(code).is_some() {
                self.debug.apply(&mut self.scene);
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if !self.is_surface_configured {
            // Picked up again by the first resize that gives the surface a size
            self.render_loop.skip();
            return;
        }
        let window = self.ctx.window.clone();
        let mut frame = Frame {
            ctx: &mut self.ctx,
            gpu: &mut self.gpu,
        };
        let drawn = self.render_loop.tick(
            &mut self.scene,
            &mut self.camera,
            &mut self.controls,
            &mut frame,
            window.as_ref(),
        );
        match drawn {
            Ok(()) => (),
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.resize_to_window();
            }
            Err(wgpu::SurfaceError::Timeout) => log::warn!("Surface timeout"),
            Err(e) => {
                log::error!("Unable to render {}", e);
                event_loop.exit();
            }
        }
    }
}

impl Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("viewport", &self.ctx.viewport)
            .field("camera", &self.camera)
            .field("render_loop", &self.render_loop.state())
            .field("is_surface_configured", &self.is_surface_configured)
            .finish()
    }
}

/// Messages delivered to the event loop through its proxy.
pub enum GlobeEvent {
    /// The web build finished creating its state.
    Initialized(Box<AppState>),
    TextureLoaded {
        slot: TextureSlot,
        image: image::DynamicImage,
    },
}

impl Debug for GlobeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(state) => f.debug_tuple("Initialized").field(state).finish(),
            Self::TextureLoaded { slot, image } => f
                .debug_struct("TextureLoaded")
                .field("slot", slot)
                .field("size", &(image.width(), image.height()))
                .finish(),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<GlobeEvent>,
    options: GlobeOptions,
    state: Option<AppState>,
}

impl App {
    fn new(event_loop: &EventLoop<GlobeEvent>, options: GlobeOptions) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            options,
            state: None,
        })
    }

    /// Size the surface, request the textures and kick off the first frame.
    fn start(&mut self) {
        let slots = match &mut self.state {
            Some(state) => {
                state.resize_to_window();
                state.scene.texture_slots()
            }
            None => return,
        };
        self.spawn_texture_loads(&slots);
        if let Some(state) = &mut self.state {
            let window = state.ctx.window.clone();
            state.render_loop.start(window.as_ref());
        }
    }

    /// Fetch every distinct file once and deliver it to each slot it backs.
    fn spawn_texture_loads(&self, slots: &[TextureSlot]) {
        for (path, group) in group_by_path(slots) {
            log::info!("loading {} for {:?}", path, group);
            let proxy = self.proxy.clone();
            let load = async move {
                match load_image(group[0]).await {
                    Ok(image) => {
                        for &slot in &group {
                            let event = GlobeEvent::TextureLoaded {
                                slot,
                                image: image.clone(),
                            };
                            if proxy.send_event(event).is_err() {
                                log::debug!("event loop closed before {:?} arrived", slot);
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        log::warn!("could not load {}, keeping placeholder: {:#}", path, e)
                    }
                }
            };

            #[cfg(not(target_arch = "wasm32"))]
            self.async_runtime.spawn(load);

            #[cfg(target_arch = "wasm32")]
            wasm_bindgen_futures::spawn_local(load);
        }
    }
}

impl ApplicationHandler<GlobeEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title(&self.options.title);

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.query_selector(CANVAS_SELECTOR).ok().flatten())
                .and_then(|element| element.dyn_into::<web_sys::HtmlCanvasElement>().ok());
            window_attributes = match canvas {
                Some(canvas) => window_attributes.with_canvas(Some(canvas)),
                None => {
                    log::warn!("no {} element, appending a canvas", CANVAS_SELECTOR);
                    window_attributes.with_append(true)
                }
            };
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Cannot create a window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let options = self.options.clone();
        let init_future = async move { AppState::new(window, &options).await };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let app_state = self.async_runtime.block_on(init_future);
            self.state = Some(app_state);
            self.start();
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let app_state = init_future.await;
                assert!(
                    proxy
                        .send_event(GlobeEvent::Initialized(Box::new(app_state)))
                        .is_ok()
                );
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: GlobeEvent) {
        match event {
            GlobeEvent::Initialized(state) => {
                // This is the message from our wasm `spawn_local`
                self.state = Some(*state);
                self.start();
            }
            GlobeEvent::TextureLoaded { slot, image } => {
                if let Some(state) = &mut self.state {
                    state.gpu.replace_texture(
                        &state.ctx.device,
                        &state.ctx.queue,
                        &state.scene,
                        slot,
                        image,
                    );
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        if state.controls.handle_window_events(&event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                let scale_factor = state.ctx.window.scale_factor();
                state.resize(ViewportState::from_physical(size, scale_factor));
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = state.ctx.window.inner_size();
                state.resize(ViewportState::from_physical(size, scale_factor));
            }
            WindowEvent::KeyboardInput { event, .. } => state.handle_key(&event),
            WindowEvent::RedrawRequested => state.redraw(event_loop),
            _ => {}
        }
    }
}

/// Open a window and run the globe until it is closed.
pub fn run(options: GlobeOptions) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<GlobeEvent> = EventLoop::with_user_event().build()?;

    let mut app = App::new(&event_loop, options)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}
