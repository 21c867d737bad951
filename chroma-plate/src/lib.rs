pub mod asset;
pub mod error;
pub mod generator;
pub mod glyph;
pub mod palette;
pub mod render;

pub use asset::{AssetSource, DirectoryAssets, NoAssets, Stimulus, StimulusResolver};
pub use error::{AssetError, RenderError};
pub use generator::{generate_plate, DotPlate, DotPoint, GeneratorConfig, PlateGenerator};
pub use glyph::{Glyph, Segment};
pub use palette::{scheme_for_plate, HueGroup, HueScheme, Rgb, SCHEMES};
pub use render::{draw_image, draw_plate, encode_png, render_plate, stroke_text};
