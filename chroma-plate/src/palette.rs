//! Named hue groups for synthetic plates.
//!
//! Colors inside one group sit within a narrow band of relative luminance, so
//! the digit on a plate differs from its background by hue rather than by
//! brightness.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// WCAG relative luminance of the sRGB color, in `[0, 1]`.
    pub fn relative_luminance(&self) -> f32 {
        fn linear(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HueGroup {
    Red,
    Orange,
    Green,
    Olive,
    Neutral,
    Violet,
}

const RED: [Rgb; 4] = [
    Rgb::new(226, 110, 90),
    Rgb::new(234, 120, 98),
    Rgb::new(220, 104, 96),
    Rgb::new(238, 126, 88),
];

const ORANGE: [Rgb; 4] = [
    Rgb::new(222, 138, 64),
    Rgb::new(230, 146, 78),
    Rgb::new(214, 130, 70),
    Rgb::new(236, 150, 60),
];

const GREEN: [Rgb; 4] = [
    Rgb::new(118, 168, 96),
    Rgb::new(132, 172, 104),
    Rgb::new(108, 164, 110),
    Rgb::new(124, 176, 90),
];

const OLIVE: [Rgb; 4] = [
    Rgb::new(160, 164, 86),
    Rgb::new(170, 170, 94),
    Rgb::new(152, 160, 90),
    Rgb::new(166, 168, 80),
];

const NEUTRAL: [Rgb; 4] = [
    Rgb::new(172, 164, 140),
    Rgb::new(180, 170, 146),
    Rgb::new(166, 160, 142),
    Rgb::new(176, 166, 134),
];

const VIOLET: [Rgb; 4] = [
    Rgb::new(150, 128, 196),
    Rgb::new(160, 136, 204),
    Rgb::new(142, 124, 190),
    Rgb::new(156, 130, 200),
];

impl HueGroup {
    pub const ALL: [HueGroup; 6] = [
        HueGroup::Red,
        HueGroup::Orange,
        HueGroup::Green,
        HueGroup::Olive,
        HueGroup::Neutral,
        HueGroup::Violet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HueGroup::Red => "red",
            HueGroup::Orange => "orange",
            HueGroup::Green => "green",
            HueGroup::Olive => "olive",
            HueGroup::Neutral => "neutral",
            HueGroup::Violet => "violet",
        }
    }

    pub fn colors(&self) -> &'static [Rgb] {
        match self {
            HueGroup::Red => &RED,
            HueGroup::Orange => &ORANGE,
            HueGroup::Green => &GREEN,
            HueGroup::Olive => &OLIVE,
            HueGroup::Neutral => &NEUTRAL,
            HueGroup::Violet => &VIOLET,
        }
    }

    pub fn contains(&self, color: Rgb) -> bool {
        self.colors().contains(&color)
    }
}

/// Background/foreground pairing used for one plate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HueScheme {
    pub background: HueGroup,
    pub foreground: HueGroup,
}

impl HueScheme {
    const fn new(background: HueGroup, foreground: HueGroup) -> Self {
        Self {
            background,
            foreground,
        }
    }
}

/// Rotation of pairings so consecutive plates look different.
pub const SCHEMES: [HueScheme; 5] = [
    HueScheme::new(HueGroup::Green, HueGroup::Red),
    HueScheme::new(HueGroup::Olive, HueGroup::Orange),
    HueScheme::new(HueGroup::Neutral, HueGroup::Red),
    HueScheme::new(HueGroup::Orange, HueGroup::Green),
    HueScheme::new(HueGroup::Violet, HueGroup::Olive),
];

pub fn scheme_for_plate(plate_index: usize) -> HueScheme {
    SCHEMES[plate_index % SCHEMES.len()]
}
