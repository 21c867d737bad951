use serde::{Deserialize, Serialize};

/// How long a lantern pair stays lit before the answer buttons appear.
/// Fixed by the test protocol, not configurable.
pub const LANTERN_EXPOSURE_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Per-plate answer window; expiry records an unanswered trial.
    pub ishihara_time_limit_ms: u64,
    /// Number of plates drawn from the plate set for one session.
    pub plate_count: usize,
    /// Side of the square area a synthetic plate is generated for.
    pub plate_area_diameter: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ishihara_time_limit_ms: 15_000,
            plate_count: 6,
            plate_area_diameter: 600.0,
        }
    }
}
