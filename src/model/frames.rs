use std::fmt;

use crate::config::ViewerConfig;

/// Path of one frame image, e.g. `images/0007.jpg`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetId(String);

impl AssetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps continuous rotation values onto the circular `1..=N` frame sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameIndexer {
    total: u32,
    dir: String,
    extension: String,
    digits: usize,
}

impl FrameIndexer {
    pub fn new(cfg: &ViewerConfig) -> Self {
        Self {
            total: cfg.total_frames.max(1),
            dir: cfg.asset_dir.clone(),
            extension: cfg.asset_extension.clone(),
            digits: cfg.frame_digits,
        }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Normalizes `value` onto the circle that starts at frame 1 with period N.
    /// `N + 1` and `1` are the same point, so results lie in `[1, N + 1)`.
    /// Non-finite input maps to frame 1.
    pub fn wrap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return 1.0;
        }
        let n = self.total as f64;
        if (1.0..n + 1.0).contains(&value) {
            return value;
        }
        let wrapped = (value - 1.0).rem_euclid(n) + 1.0;
        // rem_euclid can round up to exactly n for tiny negative offsets
        if wrapped >= n + 1.0 { 1.0 } else { wrapped }
    }

    /// Rounds a rotation to the nearest displayable frame in `1..=N`.
    pub fn frame_for(&self, rotation: f64) -> u32 {
        let rounded = self.wrap(rotation).round();
        // rounding can land on N + 1, which is frame 1 again
        self.wrap(rounded).round() as u32
    }

    pub fn resolve(&self, index: u32) -> AssetId {
        AssetId(format!(
            "{}/{:0width$}.{}",
            self.dir,
            index,
            self.extension,
            width = self.digits
        ))
    }

    /// Every asset in display order, for preloading.
    pub fn all_assets(&self) -> impl Iterator<Item = AssetId> + '_ {
        (1..=self.total).map(|i| self.resolve(i))
    }
}
