pub mod classification;
pub mod phase;
pub mod stimulus;
pub mod trial;

pub use classification::{
    ClassificationResult, ClassificationSource, IshiharaCategory, LanternVerdict,
};
pub use phase::SequencerState;
pub use stimulus::{
    Difficulty, LightColor, LightPair, LightPairSpec, ParseLightError, PlateKind, PlateSpec,
    TestItem, TestType,
};
pub use trial::{Response, TrialRecord};
