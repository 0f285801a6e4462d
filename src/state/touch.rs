// Touch contact geometry and the per-move sample history
use std::collections::VecDeque;

pub const TOUCH_HISTORY_CAPACITY: usize = 5;

/// One active contact, in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_to(&self, other: &TouchPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchSample {
    /// Frames moved by this sample.
    pub delta: f64,
    /// Milliseconds, from the viewer clock.
    pub timestamp: f64,
}

/// Most recent single-finger move samples, oldest evicted first.
#[derive(Clone, Debug, Default)]
pub struct TouchHistory {
    samples: VecDeque<TouchSample>,
}

impl TouchHistory {
    pub fn push(&mut self, sample: TouchSample) {
        self.samples.push_back(sample);
        while self.samples.len() > TOUCH_HISTORY_CAPACITY {
            self.samples.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &TouchSample> {
        self.samples.iter()
    }
}
