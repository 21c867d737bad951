use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which of the two perceptual tests a session runs.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    Ishihara,
    Lantern,
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestType::Ishihara => f.write_str("ishihara"),
            TestType::Lantern => f.write_str("lantern"),
        }
    }
}

#[derive(Copy, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Whether a plate ships with a pre-rendered image or must be synthesized.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlateKind {
    SyntheticRequired,
    AssetAvailable,
}

/// One Ishihara plate as loaded from a content source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateSpec {
    pub id: u32,
    pub correct_answer: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    pub kind: PlateKind,
}

impl PlateSpec {
    pub fn synthetic(id: u32, correct_answer: &str, difficulty: Difficulty) -> Self {
        Self {
            id,
            correct_answer: correct_answer.to_string(),
            difficulty,
            image_ref: None,
            kind: PlateKind::SyntheticRequired,
        }
    }

    /// Image reference to try, if the plate claims to have one.
    pub fn asset(&self) -> Option<&str> {
        match self.kind {
            PlateKind::AssetAvailable => self.image_ref.as_deref(),
            PlateKind::SyntheticRequired => None,
        }
    }
}

#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightColor {
    Red,
    Green,
    White,
}

impl LightColor {
    pub const ALL: [LightColor; 3] = [LightColor::Red, LightColor::Green, LightColor::White];

    pub fn as_str(&self) -> &'static str {
        match self {
            LightColor::Red => "red",
            LightColor::Green => "green",
            LightColor::White => "white",
        }
    }

    pub fn is_red_or_green(&self) -> bool {
        matches!(self, LightColor::Red | LightColor::Green)
    }

    /// Display color of the lamp.
    pub fn rgba(&self) -> [u8; 4] {
        match self {
            LightColor::Red => [230, 40, 30, 255],
            LightColor::Green => [40, 200, 90, 255],
            LightColor::White => [245, 240, 225, 255],
        }
    }
}

impl fmt::Display for LightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseLightError {
    #[error("Unknown light color: {0}")]
    UnknownColor(String),

    #[error("Malformed light pair: {0}")]
    MalformedPair(String),
}

impl FromStr for LightColor {
    type Err = ParseLightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" | "r" => Ok(LightColor::Red),
            "green" | "g" => Ok(LightColor::Green),
            "white" | "w" => Ok(LightColor::White),
            other => Err(ParseLightError::UnknownColor(other.to_string())),
        }
    }
}

/// Left and right lamp colors. Rendered as `left/right`, e.g. `red/green`.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LightPair {
    pub left: LightColor,
    pub right: LightColor,
}

impl LightPair {
    pub const fn new(left: LightColor, right: LightColor) -> Self {
        Self { left, right }
    }

    /// Both lamps are red or green; white anywhere excludes the pair.
    pub fn is_red_green(&self) -> bool {
        self.left.is_red_or_green() && self.right.is_red_or_green()
    }
}

impl fmt::Display for LightPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.left, self.right)
    }
}

impl FromStr for LightPair {
    type Err = ParseLightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (left, right) = s
            .split_once('/')
            .ok_or_else(|| ParseLightError::MalformedPair(s.to_string()))?;
        Ok(LightPair::new(left.parse()?, right.parse()?))
    }
}

/// One entry of the lantern sequence.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightPairSpec {
    pub index: u32,
    pub left: LightColor,
    pub right: LightColor,
}

impl LightPairSpec {
    pub const fn new(index: u32, left: LightColor, right: LightColor) -> Self {
        Self { index, left, right }
    }

    pub fn pair(&self) -> LightPair {
        LightPair::new(self.left, self.right)
    }
}

/// A single presentable item of either test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TestItem {
    Plate(PlateSpec),
    LightPair(LightPairSpec),
}

impl TestItem {
    pub fn id(&self) -> u32 {
        match self {
            TestItem::Plate(p) => p.id,
            TestItem::LightPair(l) => l.index,
        }
    }

    pub fn test_type(&self) -> TestType {
        match self {
            TestItem::Plate(_) => TestType::Ishihara,
            TestItem::LightPair(_) => TestType::Lantern,
        }
    }

    /// Canonical answer string as stored in trial records.
    pub fn correct_answer(&self) -> String {
        match self {
            TestItem::Plate(p) => p.correct_answer.clone(),
            TestItem::LightPair(l) => l.pair().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_pair_round_trips_through_display() {
        let pair = LightPair::new(LightColor::Red, LightColor::White);
        assert_eq!(pair.to_string(), "red/white");
        assert_eq!("red/white".parse::<LightPair>().unwrap(), pair);
        assert_eq!(" G / r ".parse::<LightPair>().unwrap().to_string(), "green/red");
    }

    #[test]
    fn light_pair_rejects_garbage() {
        assert_eq!(
            "red".parse::<LightPair>(),
            Err(ParseLightError::MalformedPair("red".to_string()))
        );
        assert!(matches!(
            "red/blue".parse::<LightPair>(),
            Err(ParseLightError::UnknownColor(_))
        ));
    }

    #[test]
    fn red_green_membership_excludes_white() {
        use LightColor::*;
        assert!(LightPair::new(Red, Green).is_red_green());
        assert!(LightPair::new(Green, Green).is_red_green());
        assert!(!LightPair::new(White, White).is_red_green());
        assert!(!LightPair::new(Red, White).is_red_green());
    }

    #[test]
    fn asset_requires_matching_kind() {
        let mut plate = PlateSpec::synthetic(3, "29", Difficulty::Medium);
        plate.image_ref = Some("plates/3.png".into());
        assert_eq!(plate.asset(), None);
        plate.kind = PlateKind::AssetAvailable;
        assert_eq!(plate.asset(), Some("plates/3.png"));
    }

    #[test]
    fn plate_spec_uses_camel_case_on_the_wire() {
        let json = r#"{"id":7,"correctAnswer":"74","difficulty":"hard","kind":"synthetic_required"}"#;
        let plate: PlateSpec = serde_json::from_str(json).unwrap();
        assert_eq!(plate, PlateSpec::synthetic(7, "74", Difficulty::Hard));
    }

    #[test]
    fn item_answers_are_canonical_strings() {
        let plate = TestItem::Plate(PlateSpec::synthetic(1, "12", Difficulty::Easy));
        let light = TestItem::LightPair(LightPairSpec::new(4, LightColor::Green, LightColor::Red));
        assert_eq!(plate.correct_answer(), "12");
        assert_eq!(light.correct_answer(), "green/red");
        assert_eq!(light.id(), 4);
        assert_eq!(light.test_type(), TestType::Lantern);
    }
}
