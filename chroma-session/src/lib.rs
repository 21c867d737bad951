pub mod config;
pub mod content;
pub mod outcome;
pub mod state;
pub mod trial;

pub use config::{SessionConfig, LANTERN_EXPOSURE_MS};
pub use content::{
    default_plates, lantern_sequence, load_plates, load_plates_from_path, select_plates,
    ContentError, LANTERN_SEQUENCE,
};
pub use outcome::SessionOutcome;
pub use state::{SessionEvent, SessionStateMachine, TestSession};
pub use trial::{ActiveTrial, TrialTimestamps};
