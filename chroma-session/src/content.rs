//! Test items: Ishihara plate sets and the lantern sequence.

use chroma_core::LightColor::{Green, Red, White};
use chroma_core::{Difficulty, LightPairSpec, PlateKind, PlateSpec};
use rand::Rng;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to read plate set {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid plate set JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate plate id: {0}")]
    DuplicateId(u32),

    #[error("Plate {id} has an invalid answer: {answer:?}")]
    InvalidAnswer { id: u32, answer: String },

    #[error("Plate set is empty")]
    Empty,
}

/// The clinical lantern order. Never shuffled.
pub const LANTERN_SEQUENCE: [LightPairSpec; 11] = [
    LightPairSpec::new(0, Red, Green),
    LightPairSpec::new(1, White, Red),
    LightPairSpec::new(2, Green, White),
    LightPairSpec::new(3, Red, Red),
    LightPairSpec::new(4, Green, Green),
    LightPairSpec::new(5, White, Green),
    LightPairSpec::new(6, Red, White),
    LightPairSpec::new(7, Green, Red),
    LightPairSpec::new(8, White, White),
    LightPairSpec::new(9, Green, Green),
    LightPairSpec::new(10, Red, Green),
];

pub fn lantern_sequence() -> Vec<LightPairSpec> {
    LANTERN_SEQUENCE.to_vec()
}

/// Built-in plate set with image references under `plates/`.
pub fn default_plates() -> Vec<PlateSpec> {
    [
        (1, "12", Difficulty::Easy),
        (2, "8", Difficulty::Easy),
        (3, "29", Difficulty::Medium),
        (4, "5", Difficulty::Medium),
        (5, "3", Difficulty::Medium),
        (6, "15", Difficulty::Medium),
        (7, "74", Difficulty::Hard),
        (8, "45", Difficulty::Hard),
    ]
    .into_iter()
    .map(|(id, answer, difficulty)| PlateSpec {
        id,
        correct_answer: answer.to_string(),
        difficulty,
        image_ref: Some(format!("plates/plate_{id:02}.png")),
        kind: PlateKind::AssetAvailable,
    })
    .collect()
}

/// Picks `count` plates at random and returns them in id order.
pub fn select_plates<R: Rng + ?Sized>(
    plates: &[PlateSpec],
    count: usize,
    rng: &mut R,
) -> Vec<PlateSpec> {
    let amount = count.min(plates.len());
    let mut picked: Vec<PlateSpec> = rand::seq::index::sample(rng, plates.len(), amount)
        .into_iter()
        .map(|i| plates[i].clone())
        .collect();
    picked.sort_by_key(|p| p.id);
    picked
}

/// Parses and validates a JSON array of plates.
pub fn load_plates(json: &str) -> Result<Vec<PlateSpec>, ContentError> {
    let plates: Vec<PlateSpec> = serde_json::from_str(json)?;
    validate(plates)
}

pub fn load_plates_from_path(path: &Path) -> Result<Vec<PlateSpec>, ContentError> {
    let json = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let plates = load_plates(&json)?;
    tracing::info!(path = %path.display(), plates = plates.len(), "Loaded plate set");
    Ok(plates)
}

fn validate(plates: Vec<PlateSpec>) -> Result<Vec<PlateSpec>, ContentError> {
    if plates.is_empty() {
        return Err(ContentError::Empty);
    }
    let mut seen = HashSet::new();
    plates
        .into_iter()
        .map(|mut plate| {
            if !seen.insert(plate.id) {
                return Err(ContentError::DuplicateId(plate.id));
            }
            let answer = &plate.correct_answer;
            if answer.is_empty() || !answer.chars().all(|c| c.is_ascii_digit()) {
                return Err(ContentError::InvalidAnswer {
                    id: plate.id,
                    answer: answer.clone(),
                });
            }
            if plate.kind == PlateKind::AssetAvailable && plate.image_ref.is_none() {
                tracing::warn!(plate = plate.id, "Plate claims an asset but has no image_ref");
                plate.kind = PlateKind::SyntheticRequired;
            }
            Ok(plate)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn lantern_sequence_is_fixed() {
        let seq = lantern_sequence();
        assert_eq!(seq.len(), 11);
        assert_eq!(seq, lantern_sequence());
        for (i, spec) in seq.iter().enumerate() {
            assert_eq!(spec.index as usize, i);
        }
        assert_eq!(seq.iter().filter(|s| s.pair().is_red_green()).count(), 6);
    }

    #[test]
    fn default_plates_are_valid() {
        let plates = default_plates();
        assert_eq!(plates.len(), 8);
        let json = serde_json::to_string(&plates).unwrap();
        assert_eq!(load_plates(&json).unwrap(), plates);
    }

    #[test]
    fn selection_is_sorted_and_bounded() {
        let plates = default_plates();
        let mut rng = StdRng::seed_from_u64(9);
        let picked = select_plates(&plates, 6, &mut rng);
        assert_eq!(picked.len(), 6);
        assert!(picked.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(select_plates(&plates, 50, &mut rng).len(), 8);
        assert!(select_plates(&[], 3, &mut rng).is_empty());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = r#"[
            {"id":1,"correctAnswer":"12","difficulty":"easy","kind":"synthetic_required"},
            {"id":1,"correctAnswer":"8","difficulty":"easy","kind":"synthetic_required"}
        ]"#;
        assert!(matches!(load_plates(json), Err(ContentError::DuplicateId(1))));
    }

    #[test]
    fn rejects_non_digit_answers() {
        let json = r#"[{"id":4,"correctAnswer":"1a","difficulty":"hard","kind":"synthetic_required"}]"#;
        assert!(matches!(
            load_plates(json),
            Err(ContentError::InvalidAnswer { id: 4, .. })
        ));
        assert!(matches!(load_plates("[]"), Err(ContentError::Empty)));
        assert!(matches!(load_plates("{"), Err(ContentError::Json(_))));
    }

    #[test]
    fn asset_kind_without_image_is_downgraded() {
        let json = r#"[{"id":2,"correctAnswer":"6","difficulty":"medium","kind":"asset_available"}]"#;
        let plates = load_plates(json).unwrap();
        assert_eq!(plates[0].kind, PlateKind::SyntheticRequired);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_plates_from_path(Path::new("/nonexistent/plates.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/plates.json"));
    }
}
