use super::frames::{AssetId, FrameIndexer};
use crate::config::ViewerConfig;

/// Rotation differences at or below this are treated as converged.
pub const FRAME_EPSILON: f64 = 0.01;
/// Zoom differences at or below this are treated as converged.
pub const ZOOM_EPSILON: f64 = 0.01;

/// Transform origin in percent of the display surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomAnchor {
    pub x: f64,
    pub y: f64,
}

impl ZoomAnchor {
    pub const CENTER: ZoomAnchor = ZoomAnchor { x: 50.0, y: 50.0 };

    pub fn clamped(x: f64, y: f64) -> Self {
        Self {
            x: x.clamp(0.0, 100.0),
            y: y.clamp(0.0, 100.0),
        }
    }
}

impl Default for ZoomAnchor {
    fn default() -> Self {
        Self::CENTER
    }
}

/// What the display surface should show after a tick.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSample {
    pub frame: u32,
    pub asset: AssetId,
    pub zoom: f64,
    pub anchor: ZoomAnchor,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickContext {
    /// While a drag is held, velocity is kept but not applied.
    pub dragging: bool,
}

#[derive(Clone, Debug)]
pub struct MotionState {
    indexer: FrameIndexer,
    lerp_factor: f64,
    momentum_decay: f64,
    min_velocity: f64,
    zoom_ease: f64,
    min_zoom: f64,
    max_zoom: f64,

    current_rotation: f64,
    target_rotation: f64,
    velocity: f64,
    current_zoom: f64,
    target_zoom: f64,
    anchor: ZoomAnchor,

    displayed_frame: u32,
    displayed_anchor: ZoomAnchor,
    last_sample: Option<RenderSample>,
}

impl MotionState {
    pub fn new(cfg: &ViewerConfig) -> Self {
        let min_zoom = cfg.min_zoom;
        let max_zoom = cfg.max_zoom.max(min_zoom);
        let start_zoom = 1.0_f64.max(min_zoom).min(max_zoom);
        Self {
            indexer: FrameIndexer::new(cfg),
            lerp_factor: cfg.lerp_factor,
            momentum_decay: cfg.momentum_decay,
            min_velocity: cfg.min_velocity,
            zoom_ease: cfg.zoom_ease,
            min_zoom,
            max_zoom,
            current_rotation: 1.0,
            target_rotation: 1.0,
            velocity: 0.0,
            current_zoom: start_zoom,
            target_zoom: start_zoom,
            anchor: ZoomAnchor::CENTER,
            displayed_frame: 1,
            displayed_anchor: ZoomAnchor::CENTER,
            last_sample: None,
        }
    }

    pub fn indexer(&self) -> &FrameIndexer {
        &self.indexer
    }
    #[cfg(test)]
    pub fn current_rotation(&self) -> f64 {
        self.current_rotation
    }
    #[cfg(test)]
    pub fn target_rotation(&self) -> f64 {
        self.target_rotation
    }
    #[cfg(test)]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }
    pub fn current_zoom(&self) -> f64 {
        self.current_zoom
    }
    pub fn target_zoom(&self) -> f64 {
        self.target_zoom
    }
    #[cfg(test)]
    pub fn anchor(&self) -> ZoomAnchor {
        self.anchor
    }

    /// Moves the rotation target by `frames`. Wrapping happens on the next tick.
    pub fn nudge_target(&mut self, frames: f64) {
        if !frames.is_finite() {
            log::debug!("discarding non-finite rotation step");
            return;
        }
        self.target_rotation += frames;
    }

    pub fn set_velocity(&mut self, velocity: f64) {
        if !velocity.is_finite() {
            log::debug!("discarding non-finite velocity");
            return;
        }
        self.velocity = velocity;
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }

    pub fn set_target_zoom(&mut self, zoom: f64) {
        if zoom.is_nan() {
            log::debug!("discarding NaN zoom target");
            return;
        }
        self.target_zoom = self.clamp_zoom(zoom);
    }

    pub fn set_anchor(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            log::debug!("discarding non-finite zoom anchor");
            return;
        }
        self.anchor = ZoomAnchor::clamped(x, y);
    }

    /// Picks the shorter way around the circle for a raw `target - current` difference.
    pub fn shortest_path(&self, diff: f64) -> f64 {
        let n = self.indexer.total() as f64;
        if diff.abs() > n / 2.0 {
            if diff > 0.0 { diff - n } else { diff + n }
        } else {
            diff
        }
    }

    /// Whether another tick would change anything.
    #[cfg(test)]
    pub fn is_settled(&self) -> bool {
        let diff = self.shortest_path(self.target_rotation - self.current_rotation);
        diff.abs() <= FRAME_EPSILON
            && self.velocity.abs() <= self.min_velocity
            && (self.target_zoom - self.current_zoom).abs() <= ZOOM_EPSILON
    }

    /// Advances the simulation one step. Returns a sample only when what the
    /// surface should show differs from the previously returned one.
    pub fn tick(&mut self, ctx: TickContext) -> Option<RenderSample> {
        let diff = self.shortest_path(self.target_rotation - self.current_rotation);

        if diff.abs() > FRAME_EPSILON || self.velocity.abs() > self.min_velocity {
            self.current_rotation += diff * self.lerp_factor;

            if !ctx.dragging {
                self.target_rotation += self.velocity;
                self.velocity *= self.momentum_decay;
                if self.velocity.abs() < self.min_velocity {
                    self.velocity = 0.0;
                }
            }

            self.current_rotation = self.indexer.wrap(self.current_rotation);
            self.target_rotation = self.indexer.wrap(self.target_rotation);
            self.displayed_frame = self.indexer.frame_for(self.current_rotation);
        }

        let zoom_diff = self.target_zoom - self.current_zoom;
        if zoom_diff.abs() > ZOOM_EPSILON {
            self.current_zoom = self.clamp_zoom(self.current_zoom + zoom_diff * self.zoom_ease);
            self.displayed_anchor = self.anchor;
        }

        let sample = RenderSample {
            frame: self.displayed_frame,
            asset: self.indexer.resolve(self.displayed_frame),
            zoom: self.current_zoom,
            anchor: self.displayed_anchor,
        };
        if self.last_sample.as_ref() == Some(&sample) {
            return None;
        }
        self.last_sample = Some(sample.clone());
        Some(sample)
    }
}
