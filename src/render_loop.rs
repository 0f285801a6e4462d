use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::model::{AssetId, RenderSample, Viewer, ZoomAnchor};
use crate::state::InteractionMode;

/// Milliseconds source for touch sample timestamps.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// `performance.now()`, or 0 when the page has no performance object.
#[derive(Clone, Copy, Debug, Default)]
pub struct PerformanceClock;

impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }
}

/// Where rendered samples end up.
pub trait DisplaySurface {
    fn show_frame(&mut self, asset: &AssetId);
    fn set_transform(&mut self, zoom: f64, anchor: ZoomAnchor);
    fn set_grabbing(&mut self, grabbing: bool);
}

/// Ticks the viewer once per step and forwards changes to the surface.
pub struct RenderLoop<S: DisplaySurface> {
    surface: S,
    running: bool,
    ticks: u64,
    applied: Option<RenderSample>,
}

impl<S: DisplaySurface> RenderLoop<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            running: false,
            ticks: 0,
            applied: None,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            log::debug!("render loop started");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            log::debug!("render loop stopped after {} ticks", self.ticks);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mirrors an interaction mode change onto the surface's grab affordance.
    pub fn notify_mode(&mut self, mode: InteractionMode) {
        self.surface.set_grabbing(mode == InteractionMode::Dragging);
    }

    /// Runs one tick. Returns whether anything was written to the surface.
    /// A stopped loop does nothing.
    pub fn step(&mut self, viewer: &mut Viewer) -> bool {
        if !self.running {
            return false;
        }
        self.ticks += 1;
        match viewer.tick() {
            Some(sample) => self.apply(sample),
            None => false,
        }
    }

    fn apply(&mut self, sample: RenderSample) -> bool {
        let prev = self.applied.as_ref();
        let asset_changed = prev.is_none_or(|p| p.asset != sample.asset);
        let transform_changed =
            prev.is_none_or(|p| p.zoom != sample.zoom || p.anchor != sample.anchor);
        if asset_changed {
            self.surface.show_frame(&sample.asset);
        }
        if transform_changed {
            self.surface.set_transform(sample.zoom, sample.anchor);
        }
        self.applied = Some(sample);
        asset_changed || transform_changed
    }
}

/// Drives a [`RenderLoop`] from `requestAnimationFrame` for as long as the
/// render loop reports itself running.
pub struct AnimationFrameLoop<S: DisplaySurface + 'static> {
    render_loop: Rc<RefCell<RenderLoop<S>>>,
    raf_id: Rc<RefCell<Option<i32>>>,
    callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl<S: DisplaySurface + 'static> AnimationFrameLoop<S> {
    pub fn start(
        render_loop: Rc<RefCell<RenderLoop<S>>>,
        viewer: Rc<RefCell<Viewer>>,
    ) -> Option<Self> {
        let window = web_sys::window()?;
        render_loop.borrow_mut().start();
        let raf_id = Rc::new(RefCell::new(None));
        let closure_cell: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> =
            Rc::new(RefCell::new(None));
        {
            let render_loop = render_loop.clone();
            let raf_id_loop = raf_id.clone();
            let closure_cell_loop = closure_cell.clone();
            let window_loop = window.clone();
            *closure_cell.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
                if !render_loop.borrow().is_running() {
                    return;
                }
                render_loop.borrow_mut().step(&mut viewer.borrow_mut());
                if let Some(cb) = closure_cell_loop.borrow().as_ref() {
                    if let Ok(id) = window_loop.request_animation_frame(cb.as_ref().unchecked_ref())
                    {
                        *raf_id_loop.borrow_mut() = Some(id);
                    }
                }
            }) as Box<dyn FnMut(f64)>));
        }
        if let Some(cb) = closure_cell.borrow().as_ref() {
            match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                Ok(id) => *raf_id.borrow_mut() = Some(id),
                Err(e) => {
                    log::error!("requestAnimationFrame failed: {:?}", e);
                    render_loop.borrow_mut().stop();
                    return None;
                }
            }
        }
        Some(Self {
            render_loop,
            raf_id,
            callback: closure_cell,
        })
    }

    pub fn stop(&self) {
        self.render_loop.borrow_mut().stop();
        if let Some(id) = self.raf_id.borrow_mut().take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }
}

impl<S: DisplaySurface + 'static> Drop for AnimationFrameLoop<S> {
    fn drop(&mut self) {
        self.stop();
        // break the closure's self reference so it can be freed
        self.callback.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;

    #[derive(Debug, Default)]
    struct RecordingSurface {
        frames: Vec<String>,
        transforms: Vec<(f64, ZoomAnchor)>,
        grabbing: Vec<bool>,
    }

    impl DisplaySurface for RecordingSurface {
        fn show_frame(&mut self, asset: &AssetId) {
            self.frames.push(asset.to_string());
        }
        fn set_transform(&mut self, zoom: f64, anchor: ZoomAnchor) {
            self.transforms.push((zoom, anchor));
        }
        fn set_grabbing(&mut self, grabbing: bool) {
            self.grabbing.push(grabbing);
        }
    }

    fn setup() -> (RenderLoop<RecordingSurface>, Viewer) {
        (
            RenderLoop::new(RecordingSurface::default()),
            Viewer::new(&ViewerConfig::default()),
        )
    }

    #[test]
    fn stopped_loop_does_not_tick() {
        let (mut rl, mut viewer) = setup();
        assert!(!rl.step(&mut viewer));
        assert_eq!(rl.ticks(), 0);
        assert!(rl.surface().frames.is_empty());
    }

    #[test]
    fn first_step_paints_the_initial_frame_and_transform() {
        let (mut rl, mut viewer) = setup();
        rl.start();
        assert!(rl.step(&mut viewer));
        assert_eq!(rl.surface().frames, ["images/0001.jpg"]);
        assert_eq!(rl.surface().transforms, [(1.0, ZoomAnchor::CENTER)]);
    }

    #[test]
    fn idle_steps_keep_ticking_without_writes() {
        let (mut rl, mut viewer) = setup();
        rl.start();
        rl.step(&mut viewer);
        for _ in 0..10 {
            assert!(!rl.step(&mut viewer));
        }
        assert_eq!(rl.ticks(), 11);
        assert_eq!(rl.surface().frames.len(), 1);
        assert_eq!(rl.surface().transforms.len(), 1);
    }

    #[test]
    fn rotation_swaps_frames_without_rewriting_the_transform() {
        let (mut rl, mut viewer) = setup();
        rl.start();
        rl.step(&mut viewer);
        viewer.pointer_down(0.0);
        viewer.pointer_move(30.0);
        viewer.pointer_up();
        for _ in 0..60 {
            rl.step(&mut viewer);
        }
        let frames = &rl.surface().frames;
        assert_eq!(frames.last().map(String::as_str), Some("images/0010.jpg"));
        assert!(frames.windows(2).all(|w| w[0] != w[1]));
        assert_eq!(rl.surface().transforms.len(), 1);
    }

    #[test]
    fn zooming_rewrites_only_the_transform() {
        let (mut rl, mut viewer) = setup();
        rl.start();
        rl.step(&mut viewer);
        let rect = crate::state::SurfaceRect {
            left: 0.0,
            top: 0.0,
            width: 200.0,
            height: 100.0,
        };
        viewer.wheel(50.0, 75.0, rect, -1000.0);
        for _ in 0..100 {
            rl.step(&mut viewer);
        }
        let s = rl.surface();
        assert_eq!(s.frames.len(), 1);
        assert!(s.transforms.len() > 1);
        let (zoom, anchor) = *s.transforms.last().unwrap();
        assert!((zoom - 2.0).abs() <= 0.01);
        assert_eq!(anchor, ZoomAnchor { x: 25.0, y: 75.0 });
    }

    #[test]
    fn mode_changes_toggle_the_grab_affordance() {
        let (mut rl, mut viewer) = setup();
        if let Some(mode) = viewer.pointer_down(10.0) {
            rl.notify_mode(mode);
        }
        if let Some(mode) = viewer.pointer_up() {
            rl.notify_mode(mode);
        }
        if let Some(mode) = viewer.touch_start(&[
            crate::state::TouchPoint::new(0.0, 0.0),
            crate::state::TouchPoint::new(50.0, 0.0),
        ]) {
            rl.notify_mode(mode);
        }
        assert_eq!(rl.surface().grabbing, [true, false, false]);
    }

    #[test]
    fn stop_halts_and_start_resumes() {
        let (mut rl, mut viewer) = setup();
        rl.start();
        rl.step(&mut viewer);
        rl.stop();
        assert!(!rl.is_running());
        rl.step(&mut viewer);
        assert_eq!(rl.ticks(), 1);
        rl.start();
        rl.step(&mut viewer);
        assert_eq!(rl.ticks(), 2);
    }

    #[cfg(target_arch = "wasm32")]
    mod frame_loop {
        use super::*;
        use wasm_bindgen_test::*;

        wasm_bindgen_test_configure!(run_in_browser);

        fn shared() -> (Rc<RefCell<RenderLoop<RecordingSurface>>>, Rc<RefCell<Viewer>>) {
            let (rl, viewer) = setup();
            (Rc::new(RefCell::new(rl)), Rc::new(RefCell::new(viewer)))
        }

        #[wasm_bindgen_test]
        fn driver_starts_and_stops_the_render_loop() {
            let (rl, viewer) = shared();
            let frames = AnimationFrameLoop::start(rl.clone(), viewer).unwrap();
            assert!(rl.borrow().is_running());
            frames.stop();
            assert!(!rl.borrow().is_running());
            assert!(frames.raf_id.borrow().is_none());
        }

        #[wasm_bindgen_test]
        fn dropping_the_driver_leaves_the_loop_stopped() {
            let (rl, viewer) = shared();
            drop(AnimationFrameLoop::start(rl.clone(), viewer.clone()).unwrap());
            assert!(!rl.borrow().is_running());
            assert!(!rl.borrow_mut().step(&mut viewer.borrow_mut()));
            assert_eq!(rl.borrow().ticks(), 0);
        }
    }
}
