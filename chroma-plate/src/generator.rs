//! Procedural Ishihara-style plates.
//!
//! A plate is two dot scatters on a square area of side `diameter`, with the
//! disk centered at `(diameter / 2, diameter / 2)`. Background dots are spread
//! with uniform areal density; foreground dots trace the digit strokes.

use crate::glyph::Glyph;
use crate::palette::{scheme_for_plate, HueGroup, HueScheme, Rgb};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Width of one glyph slot relative to the font size.
const GLYPH_ASPECT: f32 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub background_dots: usize,
    pub stroke_samples: usize,
    pub keep_probability: f64,
    /// Gap between the dot field and the plate edge, as a fraction of the diameter.
    pub margin_ratio: f32,
    pub background_radius: (f32, f32),
    pub foreground_radius: (f32, f32),
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            background_dots: 1000,
            stroke_samples: 200,
            keep_probability: 0.7,
            margin_ratio: 0.03,
            background_radius: (2.0, 5.0),
            foreground_radius: (1.5, 3.5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DotPoint {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DotPlate {
    pub diameter: f32,
    pub scheme: HueScheme,
    pub background: Vec<DotPoint>,
    pub foreground: Vec<DotPoint>,
}

impl DotPlate {
    pub fn dot_count(&self) -> usize {
        self.background.len() + self.foreground.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlateGenerator {
    pub config: GeneratorConfig,
}

impl PlateGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Synthesizes a plate for `digits`. Never fails: a non-positive or
    /// non-finite diameter is treated as 1, characters outside `0-9` are
    /// drawn as rings and an empty string yields a background-only plate.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        digits: &str,
        area_diameter: f32,
        plate_index: usize,
        rng: &mut R,
    ) -> DotPlate {
        let diameter = if area_diameter.is_finite() && area_diameter > 0.0 {
            area_diameter
        } else {
            1.0
        };
        let scheme = scheme_for_plate(plate_index);
        let center = diameter * 0.5;
        let radius = (center - diameter * self.config.margin_ratio.clamp(0.0, 0.5)).max(0.0);

        let background = self.scatter_background(center, radius, scheme.background, rng);
        let foreground = self.trace_digits(digits, center, radius, scheme.foreground, rng);

        tracing::trace!(
            digits,
            plate_index,
            background = background.len(),
            foreground = foreground.len(),
            "Generated synthetic plate"
        );

        DotPlate {
            diameter,
            scheme,
            background,
            foreground,
        }
    }

    fn scatter_background<R: Rng + ?Sized>(
        &self,
        center: f32,
        radius: f32,
        group: HueGroup,
        rng: &mut R,
    ) -> Vec<DotPoint> {
        let count = self.config.background_dots.max(1);
        (0..count)
            .map(|_| {
                // sqrt keeps the density uniform per unit area
                let distance = radius * rng.random::<f32>().sqrt();
                let angle = rng.random_range(0.0..TAU);
                DotPoint {
                    x: center + distance * angle.cos(),
                    y: center + distance * angle.sin(),
                    radius: sample(rng, self.config.background_radius),
                    color: pick(rng, group),
                }
            })
            .collect()
    }

    fn trace_digits<R: Rng + ?Sized>(
        &self,
        digits: &str,
        center: f32,
        radius: f32,
        group: HueGroup,
        rng: &mut R,
    ) -> Vec<DotPoint> {
        let glyphs: Vec<Glyph> = digits.chars().map(Glyph::for_char).collect();
        if glyphs.is_empty() {
            return Vec::new();
        }

        let n = glyphs.len() as f32;
        let font_size = (radius * 1.1).min(radius * 1.6 / (GLYPH_ASPECT * n));
        let glyph_width = font_size * GLYPH_ASPECT;
        let left = center - glyph_width * n * 0.5;
        let top = center - font_size * 0.5;

        let steps = self.config.stroke_samples.max(1);
        let keep = self.config.keep_probability.clamp(0.0, 1.0);
        let mut dots = Vec::with_capacity(glyphs.len() * steps);

        for (slot, glyph) in glyphs.iter().enumerate() {
            let slot_left = left + glyph_width * slot as f32;
            let place = |(u, v): (f32, f32)| (slot_left + u * glyph_width, top + v * font_size);
            let before = dots.len();

            for i in 0..steps {
                let t = i as f32 / (steps - 1).max(1) as f32;
                let point = glyph.stroke_point(t);
                if rng.random_bool(keep) {
                    let (x, y) = place(point);
                    dots.push(DotPoint {
                        x,
                        y,
                        radius: sample(rng, self.config.foreground_radius),
                        color: pick(rng, group),
                    });
                }
            }

            // a glyph that lost every sample still shows its starting point
            if dots.len() == before {
                let (x, y) = place(glyph.stroke_point(0.0));
                dots.push(DotPoint {
                    x,
                    y,
                    radius: sample(rng, self.config.foreground_radius),
                    color: pick(rng, group),
                });
            }
        }
        dots
    }
}

fn sample<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, group: HueGroup) -> Rgb {
    let colors = group.colors();
    colors[rng.random_range(0..colors.len())]
}

/// Default-configured plate on the thread RNG with the first hue pairing.
pub fn generate_plate(digits: &str, area_diameter: f32) -> DotPlate {
    PlateGenerator::default().generate(digits, area_diameter, 0, &mut rand::rng())
}
