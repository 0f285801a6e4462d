use super::touch::{TouchHistory, TouchPoint, TouchSample};
use crate::config::ViewerConfig;
use crate::model::MotionState;

/// Pinch distances below this (in CSS px) are never used as a divisor.
pub const MIN_PINCH_DISTANCE: f64 = 1.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
    #[default]
    Idle,
    Dragging,
    Pinching,
}

/// Bounding box of the display surface in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PinchStart {
    distance: f64,
    zoom: f64,
}

/// Turns raw input into writes on the motion targets.
///
/// Every handler returns the new [`InteractionMode`] when the call changed it,
/// so the caller can update the surface's grab affordance.
#[derive(Clone, Debug)]
pub struct GestureTracker {
    mode: InteractionMode,
    sensitivity: f64,
    drag_velocity_factor: f64,
    zoom_sensitivity: f64,
    last_x: f64,
    pinch: Option<PinchStart>,
    touch_history: TouchHistory,
}

impl GestureTracker {
    pub fn new(cfg: &ViewerConfig) -> Self {
        Self {
            mode: InteractionMode::Idle,
            sensitivity: cfg.sensitivity,
            drag_velocity_factor: cfg.drag_velocity_factor,
            zoom_sensitivity: cfg.zoom_sensitivity,
            last_x: 0.0,
            pinch: None,
            touch_history: TouchHistory::default(),
        }
    }

    #[cfg(test)]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn is_dragging(&self) -> bool {
        self.mode == InteractionMode::Dragging
    }

    #[cfg(test)]
    pub fn touch_history(&self) -> &TouchHistory {
        &self.touch_history
    }

    fn set_mode(&mut self, mode: InteractionMode) -> Option<InteractionMode> {
        if self.mode == mode {
            return None;
        }
        log::debug!("interaction {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        Some(mode)
    }

    fn frame_delta(&self, x: f64) -> f64 {
        (x - self.last_x) * self.sensitivity
    }

    pub fn pointer_down(&mut self, motion: &mut MotionState, x: f64) -> Option<InteractionMode> {
        if !x.is_finite() {
            return None;
        }
        self.last_x = x;
        motion.set_velocity(0.0);
        self.set_mode(InteractionMode::Dragging)
    }

    pub fn pointer_move(&mut self, motion: &mut MotionState, x: f64) {
        if !self.is_dragging() || !x.is_finite() {
            return;
        }
        let frame_delta = self.frame_delta(x);
        motion.nudge_target(frame_delta);
        motion.set_velocity(frame_delta * self.drag_velocity_factor);
        self.last_x = x;
    }

    /// Release always drops the velocity; momentum does not outlive the drag.
    pub fn pointer_up(&mut self, motion: &mut MotionState) -> Option<InteractionMode> {
        motion.set_velocity(0.0);
        self.set_mode(InteractionMode::Idle)
    }

    /// Zooms toward the cursor. The caller always prevents the default scroll.
    pub fn wheel(
        &mut self,
        motion: &mut MotionState,
        client_x: f64,
        client_y: f64,
        rect: SurfaceRect,
        delta_y: f64,
    ) {
        if rect.width > 0.0 && rect.height > 0.0 {
            let x = (client_x - rect.left) / rect.width * 100.0;
            let y = (client_y - rect.top) / rect.height * 100.0;
            motion.set_anchor(x, y);
        }
        if !delta_y.is_finite() {
            return;
        }
        let zoom_factor = 1.0 + (-delta_y * self.zoom_sensitivity);
        motion.set_target_zoom(motion.target_zoom() * zoom_factor);
    }

    pub fn touch_start(
        &mut self,
        motion: &mut MotionState,
        touches: &[TouchPoint],
    ) -> Option<InteractionMode> {
        if touches.iter().any(|t| !t.is_finite()) {
            return None;
        }
        match touches {
            [a, b] => {
                self.pinch = Some(PinchStart {
                    distance: a.distance_to(b),
                    zoom: motion.current_zoom(),
                });
                self.set_mode(InteractionMode::Pinching)
            }
            [only] => {
                self.last_x = only.x;
                motion.set_velocity(0.0);
                self.touch_history.clear();
                self.set_mode(InteractionMode::Dragging)
            }
            _ => None,
        }
    }

    /// `now` stamps the recorded touch sample, in milliseconds.
    pub fn touch_move(&mut self, motion: &mut MotionState, touches: &[TouchPoint], now: f64) {
        if touches.iter().any(|t| !t.is_finite()) {
            return;
        }
        match touches {
            [a, b] => self.pinch_to(motion, a.distance_to(b)),
            [only] if self.is_dragging() => {
                let frame_delta = self.frame_delta(only.x);
                motion.nudge_target(frame_delta);
                self.touch_history.push(TouchSample {
                    delta: frame_delta,
                    timestamp: now,
                });
                self.last_x = only.x;
            }
            _ => {}
        }
    }

    fn pinch_to(&mut self, motion: &mut MotionState, distance: f64) {
        let Some(start) = self.pinch.as_mut() else {
            return;
        };
        if start.distance < MIN_PINCH_DISTANCE {
            // fingers landed on top of each other; measure from here instead
            if distance >= MIN_PINCH_DISTANCE {
                start.distance = distance;
            }
            return;
        }
        let scale = distance / start.distance;
        motion.set_target_zoom(start.zoom * scale);
    }

    /// `remaining` is the number of contacts still on the surface.
    pub fn touch_end(
        &mut self,
        motion: &mut MotionState,
        remaining: usize,
    ) -> Option<InteractionMode> {
        if remaining > 0 {
            return None;
        }
        self.pinch = None;
        motion.set_velocity(0.0);
        self.set_mode(InteractionMode::Idle)
    }
}
