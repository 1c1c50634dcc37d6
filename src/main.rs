//! Wire Orrery entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, PointerEvent, WheelEvent};

    use wire_orrery::renderer::WireRenderState;
    use wire_orrery::tooltip::dom::DomTooltip;
    use wire_orrery::{FrameDriver, SceneContext, SceneError, Settings, Viewport};

    /// App instance holding all state
    struct App {
        ctx: SceneContext,
        driver: FrameDriver,
        render_state: Option<WireRenderState>,
        tooltip: DomTooltip,
        canvas: HtmlCanvasElement,
        /// Outstanding requestAnimationFrame handle
        raf_handle: Option<i32>,
    }

    impl App {
        /// Match the canvas to the window, capped device pixels
        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let viewport = window_size(&window);
            let (width, height) = viewport.surface_size(window.device_pixel_ratio());

            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.ctx.resize(viewport.width, viewport.height);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
        }

        fn show_tooltip(&mut self) {
            self.tooltip.apply(self.ctx.tooltip.state());
        }
    }

    fn window_size(window: &web_sys::Window) -> Viewport {
        let w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);
        let h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);
        Viewport::new(w as u32, h as u32)
    }

    pub async fn run() -> Result<(), SceneError> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Wire Orrery starting...");

        let window = web_sys::window().ok_or_else(|| SceneError::Dom("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| SceneError::Dom("no document".into()))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| SceneError::Dom("no canvas".into()))?
            .dyn_into()
            .map_err(|_| SceneError::Dom("#canvas is not a canvas".into()))?;

        let viewport = window_size(&window);
        let (width, height) = viewport.surface_size(window.device_pixel_ratio());
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let ctx = SceneContext::new(Settings::default(), viewport, seed)?;

        // Initialize WebGPU (WebGL2 fallback)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = WireRenderState::new(surface, &adapter, width, height, &ctx.scene).await?;
        let tooltip = DomTooltip::new(&document)?;

        let app = Rc::new(RefCell::new(App {
            ctx,
            driver: FrameDriver::new(),
            render_state: Some(render_state),
            tooltip,
            canvas: canvas.clone(),
            raf_handle: None,
        }));

        setup_hover(app.clone());
        setup_controls(&canvas, app.clone());
        setup_resize(app.clone());
        setup_keyboard(app.clone());

        // Start frame loop
        let start = app.borrow_mut().driver.start();
        if start {
            let handle = request_animation_frame(app.clone());
            app.borrow_mut().raf_handle = handle;
        }

        log::info!("Wire Orrery running!");
        Ok(())
    }

    /// Hover picking follows the pointer anywhere in the window
    fn setup_hover(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let mut a = app.borrow_mut();
            let pointer = Vec2::new(event.client_x() as f32, event.client_y() as f32);
            a.ctx.pointer_move(pointer);
            a.show_tooltip();
        });
        let _ = window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Orbit controls: drag to rotate or pan, wheel to zoom
    fn setup_controls(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Pointer down
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let _ = canvas_clone.set_pointer_capture(event.pointer_id());
                let pointer = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                app.borrow_mut().ctx.pointer_down(event.button(), pointer);
            });
            let _ = canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer move (drag only; hover has its own listener)
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let pointer = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                app.borrow_mut().ctx.drag(pointer);
            });
            let _ = canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let _ = canvas_clone.release_pointer_capture(event.pointer_id());
                app.borrow_mut().ctx.pointer_up();
            });
            let _ = canvas.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Wheel zoom
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                event.prevent_default();
                app.borrow_mut().ctx.wheel(event.delta_y() as f32);
            });
            let _ = canvas.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Right drag pans; keep the browser menu out of the way
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
            });
            let _ = canvas.add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            match event.key().as_str() {
                "p" | "P" | " " => {
                    let needs_frame = app.borrow_mut().driver.toggle();
                    if needs_frame {
                        let handle = request_animation_frame(app.clone());
                        app.borrow_mut().raf_handle = handle;
                    }
                }
                "Escape" => {
                    let mut a = app.borrow_mut();
                    a.driver.cancel();
                    if let Some(handle) = a.raf_handle.take() {
                        if let Some(window) = web_sys::window() {
                            let _ = window.cancel_animation_frame(handle);
                        }
                    }
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Ask for the next refresh; the handle allows cancelling it
    fn request_animation_frame(app: Rc<RefCell<App>>) -> Option<i32> {
        let window = web_sys::window()?;
        let closure = Closure::once(move |_time: f64| {
            frame_loop(app);
        });
        let handle = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
        handle
    }

    fn frame_loop(app: Rc<RefCell<App>>) {
        let mut guard = app.borrow_mut();
        let a = &mut *guard;
        a.raf_handle = None;

        let Some(render_state) = a.render_state.as_mut() else {
            return;
        };

        let mut next = None;
        let result = a.driver.tick(&mut a.ctx, &mut *render_state, || {
            next = request_animation_frame(app.clone());
        });
        if next.is_some() {
            a.raf_handle = next;
        }

        match result {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_state.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run().await.map_err(|e| {
        log::error!("Startup failed: {e}");
        JsValue::from_str(&e.to_string())
    })
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::convert::Infallible;

    use glam::Vec3;

    use wire_orrery::camera::PerspectiveCamera;
    use wire_orrery::frame::SceneRenderer;
    use wire_orrery::geometry::{Mesh, MeshLibrary, SPHERE_SEGMENTS};
    use wire_orrery::renderer::DrawBatch;
    use wire_orrery::sim::SceneGraph;

    /// Builds each frame's draw batch without a GPU
    pub struct BatchRenderer {
        sun_triangles: Vec<Vec3>,
        meshes: MeshLibrary,
        pub lines: usize,
    }

    impl BatchRenderer {
        pub fn new(scene: &SceneGraph) -> Self {
            Self {
                sun_triangles: Mesh::sphere(scene.sun.radius, SPHERE_SEGMENTS.0, SPHERE_SEGMENTS.1)
                    .triangle_vertices(),
                meshes: MeshLibrary::new(),
                lines: 0,
            }
        }
    }

    impl SceneRenderer for BatchRenderer {
        type Error = Infallible;

        fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> Result<(), Self::Error> {
            let batch = DrawBatch::build(scene, camera.eye, &self.sun_triangles, &self.meshes, true);
            self.lines = batch.lines.len() / 2;
            if scene.frame % 25 == 0 {
                for shape in &scene.shapes {
                    log::debug!(
                        "frame {} {}: angle {:.3} at ({:.2}, {:.2}, {:.2})",
                        scene.frame,
                        shape.name,
                        shape.angle,
                        shape.position.x,
                        shape.position.y,
                        shape.position.z
                    );
                }
            }
            Ok(())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use wire_orrery::{FrameDriver, SceneContext, Settings, Viewport};

    env_logger::init();
    log::info!("Wire Orrery (native) starting...");
    log::info!("Native mode runs the scene headless - run with `trunk serve` for the web version");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut ctx = match SceneContext::new(Settings::default(), Viewport::new(1280, 720), seed) {
        Ok(ctx) => ctx,
        Err(e) => {
            log::error!("Startup failed: {e}");
            std::process::exit(1);
        }
    };
    let mut renderer = headless::BatchRenderer::new(&ctx.scene);
    let mut driver = FrameDriver::new();

    let mut scheduled = driver.start();
    let frames = ctx.settings.headless_frames;
    while scheduled && driver.frames() < u64::from(frames) {
        scheduled = false;
        let Ok(_) = driver.tick(&mut ctx, &mut renderer, || scheduled = true);
    }
    driver.cancel();

    println!("\nAfter {} frames ({} edges per frame):", driver.frames(), renderer.lines);
    for shape in &ctx.scene.shapes {
        println!(
            "  {:<7} angle {:>7.3}  position ({:>6.2}, {:>5.2}, {:>6.2})",
            shape.name, shape.angle, shape.position.x, shape.position.y, shape.position.z
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
