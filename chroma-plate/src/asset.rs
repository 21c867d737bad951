//! Plate stimulus resolution: pre-rendered image when available, synthetic
//! plate otherwise.

use crate::error::AssetError;
use crate::generator::{DotPlate, PlateGenerator};
use chroma_core::PlateSpec;
use rand::Rng;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Source of pre-rendered plate images.
pub trait AssetSource {
    fn load(&self, plate: &PlateSpec) -> Result<Pixmap, AssetError>;
}

impl<A: AssetSource + ?Sized> AssetSource for Box<A> {
    fn load(&self, plate: &PlateSpec) -> Result<Pixmap, AssetError> {
        (**self).load(plate)
    }
}

/// Source that never has an image, forcing procedural plates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetSource for NoAssets {
    fn load(&self, plate: &PlateSpec) -> Result<Pixmap, AssetError> {
        Err(AssetError::NoImage(plate.id))
    }
}

/// PNG files resolved relative to a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirectoryAssets {
    fn load(&self, plate: &PlateSpec) -> Result<Pixmap, AssetError> {
        let image_ref = plate.asset().ok_or(AssetError::NoImage(plate.id))?;
        let path = self.root.join(image_ref);
        if !path.is_file() {
            return Err(AssetError::NotFound(path));
        }
        tracing::trace!(path = %path.display(), "Loading plate image");
        Pixmap::load_png(&path).map_err(|e| AssetError::Decode {
            path,
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub enum Stimulus {
    Image(Arc<Pixmap>),
    Synthetic(Arc<DotPlate>),
}

impl Stimulus {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Stimulus::Synthetic(_))
    }
}

/// Resolves plates to stimuli, caching per plate id. Any asset failure falls
/// back to the generator, so resolution always succeeds.
pub struct StimulusResolver<A: AssetSource> {
    assets: A,
    generator: PlateGenerator,
    area_diameter: f32,
    cache: HashMap<u32, Stimulus>,
}

impl<A: AssetSource> StimulusResolver<A> {
    pub fn new(assets: A, generator: PlateGenerator, area_diameter: f32) -> Self {
        Self {
            assets,
            generator,
            area_diameter,
            cache: HashMap::new(),
        }
    }

    pub fn resolve<R: Rng + ?Sized>(
        &mut self,
        plate: &PlateSpec,
        plate_index: usize,
        rng: &mut R,
    ) -> Stimulus {
        if let Some(hit) = self.cache.get(&plate.id) {
            return hit.clone();
        }

        let stimulus = match self.assets.load(plate) {
            Ok(pixmap) => Stimulus::Image(Arc::new(pixmap)),
            Err(e) => {
                match e {
                    AssetError::NoImage(_) => {
                        tracing::debug!(plate = plate.id, "Synthesizing plate")
                    }
                    _ => tracing::warn!(
                        plate = plate.id,
                        error = %e,
                        "Plate asset unavailable, falling back to synthetic plate"
                    ),
                }
                let dots = self.generator.generate(
                    &plate.correct_answer,
                    self.area_diameter,
                    plate_index,
                    rng,
                );
                Stimulus::Synthetic(Arc::new(dots))
            }
        };

        self.cache.insert(plate.id, stimulus.clone());
        stimulus
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
