//! Parametric stroke definitions for the digits 0-9.
//!
//! Glyphs live in a unit box: `x` runs left to right and `y` top to bottom,
//! both in `[0, 1]`. Arc angles are in degrees on the same y-down axes, so
//! 90° points straight down.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line {
        from: (f32, f32),
        to: (f32, f32),
    },
    Arc {
        center: (f32, f32),
        radii: (f32, f32),
        start_deg: f32,
        end_deg: f32,
    },
}

impl Segment {
    pub fn point_at(&self, t: f32) -> (f32, f32) {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Segment::Line { from, to } => (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t),
            Segment::Arc {
                center,
                radii,
                start_deg,
                end_deg,
            } => {
                let theta = (start_deg + (end_deg - start_deg) * t).to_radians();
                (center.0 + radii.0 * theta.cos(), center.1 + radii.1 * theta.sin())
            }
        }
    }

    /// Arc lengths use the mean radius; close enough to spread samples evenly.
    pub fn length(&self) -> f32 {
        match *self {
            Segment::Line { from, to } => (to.0 - from.0).hypot(to.1 - from.1),
            Segment::Arc {
                radii,
                start_deg,
                end_deg,
                ..
            } => (end_deg - start_deg).to_radians().abs() * (radii.0 + radii.1) * 0.5,
        }
    }
}

const fn line(from: (f32, f32), to: (f32, f32)) -> Segment {
    Segment::Line { from, to }
}

const fn arc(center: (f32, f32), radii: (f32, f32), start_deg: f32, end_deg: f32) -> Segment {
    Segment::Arc {
        center,
        radii,
        start_deg,
        end_deg,
    }
}

const ZERO: [Segment; 1] = [arc((0.5, 0.5), (0.38, 0.45), 0.0, 360.0)];
const ONE: [Segment; 2] = [
    line((0.3, 0.22), (0.56, 0.05)),
    line((0.56, 0.05), (0.56, 0.95)),
];
const TWO: [Segment; 3] = [
    arc((0.5, 0.3), (0.35, 0.25), 180.0, 405.0),
    line((0.747, 0.477), (0.1, 0.95)),
    line((0.1, 0.95), (0.9, 0.95)),
];
const THREE: [Segment; 2] = [
    arc((0.5, 0.28), (0.35, 0.23), 200.0, 450.0),
    arc((0.5, 0.73), (0.38, 0.22), 270.0, 520.0),
];
const FOUR: [Segment; 3] = [
    line((0.7, 0.95), (0.7, 0.05)),
    line((0.7, 0.05), (0.1, 0.65)),
    line((0.1, 0.65), (0.9, 0.65)),
];
const FIVE: [Segment; 3] = [
    line((0.85, 0.05), (0.22, 0.05)),
    line((0.22, 0.05), (0.18, 0.45)),
    arc((0.5, 0.67), (0.37, 0.28), 220.0, 520.0),
];
const SIX: [Segment; 2] = [
    line((0.68, 0.05), (0.13, 0.68)),
    arc((0.5, 0.68), (0.37, 0.27), 180.0, 540.0),
];
const SEVEN: [Segment; 2] = [
    line((0.1, 0.05), (0.9, 0.05)),
    line((0.9, 0.05), (0.35, 0.95)),
];
const EIGHT: [Segment; 2] = [
    arc((0.5, 0.27), (0.3, 0.22), 90.0, 450.0),
    arc((0.5, 0.72), (0.37, 0.23), 270.0, 630.0),
];
const NINE: [Segment; 2] = [
    arc((0.5, 0.32), (0.37, 0.27), 0.0, 360.0),
    line((0.87, 0.32), (0.35, 0.95)),
];
const RING: [Segment; 1] = [arc((0.5, 0.5), (0.42, 0.42), 0.0, 360.0)];

/// Stroke outline of one character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    segments: &'static [Segment],
    fallback: bool,
}

impl Glyph {
    /// Digits map to their strokes; anything else becomes a plain ring.
    pub fn for_char(c: char) -> Glyph {
        let segments: &'static [Segment] = match c {
            '0' => &ZERO,
            '1' => &ONE,
            '2' => &TWO,
            '3' => &THREE,
            '4' => &FOUR,
            '5' => &FIVE,
            '6' => &SIX,
            '7' => &SEVEN,
            '8' => &EIGHT,
            '9' => &NINE,
            _ => {
                return Glyph {
                    segments: &RING,
                    fallback: true,
                }
            }
        };
        Glyph {
            segments,
            fallback: false,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn segments(&self) -> &'static [Segment] {
        self.segments
    }

    /// Point at arc-length fraction `t` along the whole glyph.
    pub fn stroke_point(&self, t: f32) -> (f32, f32) {
        let total: f32 = self.segments.iter().map(Segment::length).sum();
        let first = self.segments[0];
        if total <= f32::EPSILON {
            return first.point_at(0.0);
        }

        let mut remaining = t.clamp(0.0, 1.0) * total;
        for seg in self.segments {
            let len = seg.length();
            if remaining <= len {
                let local = if len > 0.0 { remaining / len } else { 0.0 };
                return seg.point_at(local);
            }
            remaining -= len;
        }
        self.segments[self.segments.len() - 1].point_at(1.0)
    }

    /// Evenly spaced points along each segment, one polyline per segment.
    pub fn polylines(&self, steps_per_segment: usize) -> Vec<Vec<(f32, f32)>> {
        let steps = steps_per_segment.max(1);
        self.segments
            .iter()
            .map(|seg| {
                (0..=steps)
                    .map(|i| seg.point_at(i as f32 / steps as f32))
                    .collect()
            })
            .collect()
    }
}
