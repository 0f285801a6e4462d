//! Core turntable model.
//! `Viewer` owns the single motion state and gesture tracker for a session; the
//! browser glue only ever talks to it.

pub mod frames;
pub mod motion;

pub use frames::{AssetId, FrameIndexer};
pub use motion::{MotionState, RenderSample, TickContext, ZoomAnchor};

use crate::config::ViewerConfig;
use crate::state::{GestureTracker, InteractionMode, SurfaceRect, TouchPoint};

#[derive(Clone, Debug)]
pub struct Viewer {
    motion: MotionState,
    gestures: GestureTracker,
}

impl Viewer {
    pub fn new(cfg: &ViewerConfig) -> Self {
        Self {
            motion: MotionState::new(cfg),
            gestures: GestureTracker::new(cfg),
        }
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    pub fn tick(&mut self) -> Option<RenderSample> {
        let ctx = TickContext {
            dragging: self.gestures.is_dragging(),
        };
        self.motion.tick(ctx)
    }

    pub fn pointer_down(&mut self, x: f64) -> Option<InteractionMode> {
        self.gestures.pointer_down(&mut self.motion, x)
    }

    pub fn pointer_move(&mut self, x: f64) {
        self.gestures.pointer_move(&mut self.motion, x)
    }

    pub fn pointer_up(&mut self) -> Option<InteractionMode> {
        self.gestures.pointer_up(&mut self.motion)
    }

    pub fn wheel(&mut self, client_x: f64, client_y: f64, rect: SurfaceRect, delta_y: f64) {
        self.gestures
            .wheel(&mut self.motion, client_x, client_y, rect, delta_y)
    }

    pub fn touch_start(&mut self, touches: &[TouchPoint]) -> Option<InteractionMode> {
        self.gestures.touch_start(&mut self.motion, touches)
    }

    pub fn touch_move(&mut self, touches: &[TouchPoint], now: f64) {
        self.gestures.touch_move(&mut self.motion, touches, now)
    }

    pub fn touch_end(&mut self, remaining: usize) -> Option<InteractionMode> {
        self.gestures.touch_end(&mut self.motion, remaining)
    }
}
