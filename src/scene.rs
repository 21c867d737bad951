use chroma_core::{LightColor, LightPair};
use chroma_plate::{draw_image, draw_plate, stroke_text, Stimulus};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

const BACKGROUND: [u8; 4] = [18, 18, 22, 255];
const FOREGROUND: [u8; 4] = [220, 220, 220, 255];
const DIM: [u8; 4] = [70, 70, 78, 255];
const TRACK: [u8; 4] = [45, 45, 52, 255];

const VERDICT_GOOD: [u8; 4] = [60, 180, 90, 255];
const VERDICT_MILD: [u8; 4] = [230, 170, 40, 255];
const VERDICT_BAD: [u8; 4] = [210, 60, 50, 255];
const VERDICT_OTHER: [u8; 4] = [90, 130, 200, 255];

/// What the screen shows this frame.
pub enum View<'a> {
    Plate {
        item_id: u32,
        stimulus: &'a Stimulus,
        typed: &'a str,
        /// Fraction of the answer window still left, 0..=1.
        time_left: f32,
    },
    Lights {
        /// `None` once the exposure has ended.
        shown: Option<LightPair>,
        picked: &'a [LightColor],
    },
    Result {
        category: &'a str,
        accuracy_pct: f64,
        passed: Option<bool>,
        pending_remote: bool,
    },
    /// Nothing running: not started yet, or aborted.
    Idle,
}

pub struct Frame<'a> {
    pub view: View<'a>,
    /// `(finished, total)` trials.
    pub progress: (usize, usize),
}

/// Draws frames for a fixed-size surface. The current plate is rasterized once
/// per trial and blitted afterwards.
pub struct Scene {
    width: u32,
    height: u32,
    plate_cache: Option<(PlateKey, Pixmap)>,
}

/// A cached raster is only valid for the same plate at the same pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlateKey {
    item_id: u32,
    side: u32,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            plate_cache: None,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.plate_cache = None;
    }

    fn unit(&self) -> f32 {
        self.width.min(self.height) as f32
    }

    pub fn render(&mut self, canvas: &mut Pixmap, frame: &Frame) {
        canvas.fill(color(BACKGROUND));

        match &frame.view {
            View::Plate {
                item_id,
                stimulus,
                typed,
                time_left,
            } => {
                self.draw_plate_view(canvas, *item_id, stimulus);
                self.draw_entry(canvas, typed);
                self.draw_bar(canvas, 0.04, *time_left, FOREGROUND);
            }
            View::Lights { shown, picked } => self.draw_lights(canvas, *shown, picked),
            View::Result {
                category,
                accuracy_pct,
                passed,
                pending_remote,
            } => self.draw_result(canvas, category, *accuracy_pct, *passed, *pending_remote),
            View::Idle => {
                let (cx, cy) = self.center();
                fill_circle(canvas, cx, cy, self.unit() * 0.08, DIM);
            }
        }

        let (done, total) = frame.progress;
        if total > 0 {
            self.draw_bar(canvas, 0.95, done as f32 / total as f32, DIM);
        }
    }

    fn center(&self) -> (f32, f32) {
        (self.width as f32 * 0.5, self.height as f32 * 0.45)
    }

    fn plate_square(&self) -> (f32, f32, f32) {
        let side = self.unit() * 0.7;
        let (cx, cy) = self.center();
        (cx - side * 0.5, cy - side * 0.5, side)
    }

    fn draw_plate_view(&mut self, canvas: &mut Pixmap, item_id: u32, stimulus: &Stimulus) {
        let (x, y, side) = self.plate_square();
        let key = PlateKey {
            item_id,
            side: side.round() as u32,
        };
        let fresh = !matches!(&self.plate_cache, Some((cached, _)) if *cached == key);
        if fresh {
            self.plate_cache = rasterize(stimulus, side).map(|p| (key, p));
        }
        match &self.plate_cache {
            Some((_, cached)) => {
                draw_image(canvas, cached, (x, y), side);
            }
            None => match stimulus {
                Stimulus::Image(image) => draw_image(canvas, image, (x, y), side),
                Stimulus::Synthetic(plate) => draw_plate(canvas, plate, (x, y), side),
            },
        }
    }

    fn draw_entry(&self, canvas: &mut Pixmap, typed: &str) {
        let (_, y, side) = self.plate_square();
        let height = self.unit() * 0.07;
        let slot = height * 0.75;
        let width = slot * typed.chars().count().max(1) as f32;
        let x = self.width as f32 * 0.5 - width * 0.5;
        let top = y + side + height * 0.4;

        if typed.is_empty() {
            let rect = Rect::from_xywh(x, top + height, slot * 0.8, height * 0.08);
            if let Some(rect) = rect {
                canvas.fill_rect(rect, &paint(DIM), Transform::identity(), None);
            }
        } else {
            stroke_text(canvas, typed, (x, top), height, FOREGROUND);
        }
    }

    fn draw_lights(&self, canvas: &mut Pixmap, shown: Option<LightPair>, picked: &[LightColor]) {
        let (cx, cy) = self.center();
        let radius = self.unit() * 0.06;
        let offset = radius * 2.5;
        let slots = [(cx - offset, cy), (cx + offset, cy)];

        match shown {
            Some(pair) => {
                for ((x, y), light) in slots.into_iter().zip([pair.left, pair.right]) {
                    fill_circle(canvas, x, y, radius, light.rgba());
                }
            }
            None => {
                for (i, (x, y)) in slots.into_iter().enumerate() {
                    match picked.get(i) {
                        Some(light) => fill_circle(canvas, x, y, radius, light.rgba()),
                        None => stroke_circle(canvas, x, y, radius, DIM),
                    }
                }
                // legend: R, G, W in key order
                let swatch = radius * 0.4;
                let legend_y = cy + radius * 3.5;
                for (i, light) in LightColor::ALL.into_iter().enumerate() {
                    let x = cx + (i as f32 - 1.0) * swatch * 3.0;
                    fill_circle(canvas, x, legend_y, swatch, light.rgba());
                }
            }
        }
    }

    fn draw_result(
        &self,
        canvas: &mut Pixmap,
        category: &str,
        accuracy_pct: f64,
        passed: Option<bool>,
        pending_remote: bool,
    ) {
        let (cx, cy) = self.center();
        let radius = self.unit() * 0.12;
        fill_circle(canvas, cx, cy, radius, verdict_color(category, passed));
        if pending_remote {
            stroke_circle(canvas, cx, cy, radius * 1.2, DIM);
        }

        let height = self.unit() * 0.08;
        let text = format!("{}", accuracy_pct.round() as i64);
        let width = height * 0.75 * text.len() as f32;
        stroke_text(
            canvas,
            &text,
            (cx - width * 0.5, cy + radius * 1.6),
            height,
            FOREGROUND,
        );
    }

    /// Horizontal bar across the middle 60% of the screen at `y_ratio`.
    fn draw_bar(&self, canvas: &mut Pixmap, y_ratio: f32, fill: f32, fill_color: [u8; 4]) {
        let w = self.width as f32 * 0.6;
        let h = (self.unit() * 0.008).max(2.0);
        let x = self.width as f32 * 0.2;
        let y = self.height as f32 * y_ratio;
        if let Some(track) = Rect::from_xywh(x, y, w, h) {
            canvas.fill_rect(track, &paint(TRACK), Transform::identity(), None);
        }
        let fill = fill.clamp(0.0, 1.0);
        if let Some(bar) = Rect::from_xywh(x, y, w * fill, h) {
            canvas.fill_rect(bar, &paint(fill_color), Transform::identity(), None);
        }
    }
}

fn rasterize(stimulus: &Stimulus, side: f32) -> Option<Pixmap> {
    let size = side.round().max(1.0) as u32;
    let mut pixmap = Pixmap::new(size, size)?;
    match stimulus {
        Stimulus::Image(image) => draw_image(&mut pixmap, image, (0.0, 0.0), side),
        Stimulus::Synthetic(plate) => draw_plate(&mut pixmap, plate, (0.0, 0.0), side),
    }
    Some(pixmap)
}

/// Known local categories get fixed colors; anything else a remote service
/// sends is shown in a neutral hue.
pub fn verdict_color(category: &str, passed: Option<bool>) -> [u8; 4] {
    match (passed, category) {
        (Some(true), _) | (None, "Normal") => VERDICT_GOOD,
        (Some(false), _) | (None, "Strong Deficiency") => VERDICT_BAD,
        (None, "Mild Deficiency") => VERDICT_MILD,
        _ => VERDICT_OTHER,
    }
}

fn color(rgba: [u8; 4]) -> Color {
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

fn paint(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.anti_alias = true;
    paint.set_color(color(rgba));
    paint
}

fn fill_circle(canvas: &mut Pixmap, x: f32, y: f32, r: f32, rgba: [u8; 4]) {
    if let Some(path) = PathBuilder::from_circle(x, y, r) {
        canvas.fill_path(&path, &paint(rgba), FillRule::Winding, Transform::identity(), None);
    }
}

fn stroke_circle(canvas: &mut Pixmap, x: f32, y: f32, r: f32, rgba: [u8; 4]) {
    if let Some(path) = PathBuilder::from_circle(x, y, r) {
        let stroke = Stroke {
            width: (r * 0.06).max(1.0),
            ..Stroke::default()
        };
        canvas.stroke_path(&path, &paint(rgba), &stroke, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_plate::generate_plate;
    use std::sync::Arc;

    fn pixel(canvas: &Pixmap, x: f32, y: f32) -> [u8; 3] {
        let p = canvas
            .pixel(x as u32, y as u32)
            .expect("inside canvas")
            .demultiply();
        [p.red(), p.green(), p.blue()]
    }

    #[test]
    fn lights_are_drawn_while_shown() {
        let mut scene = Scene::new(400, 300);
        let mut canvas = Pixmap::new(400, 300).unwrap();
        let frame = Frame {
            view: View::Lights {
                shown: Some(LightPair::new(LightColor::Red, LightColor::Green)),
                picked: &[],
            },
            progress: (0, 11),
        };
        scene.render(&mut canvas, &frame);

        let (cx, cy) = scene.center();
        let offset = scene.unit() * 0.06 * 2.5;
        let rgb = LightColor::Red.rgba();
        assert_eq!(pixel(&canvas, cx - offset, cy), [rgb[0], rgb[1], rgb[2]]);
        let rgb = LightColor::Green.rgba();
        assert_eq!(pixel(&canvas, cx + offset, cy), [rgb[0], rgb[1], rgb[2]]);
    }

    #[test]
    fn hidden_lights_show_only_picked_colors() {
        let mut scene = Scene::new(400, 300);
        let mut canvas = Pixmap::new(400, 300).unwrap();
        let frame = Frame {
            view: View::Lights {
                shown: None,
                picked: &[LightColor::White],
            },
            progress: (3, 11),
        };
        scene.render(&mut canvas, &frame);

        let (cx, cy) = scene.center();
        let offset = scene.unit() * 0.06 * 2.5;
        let rgb = LightColor::White.rgba();
        assert_eq!(pixel(&canvas, cx - offset, cy), [rgb[0], rgb[1], rgb[2]]);
        let bg = [BACKGROUND[0], BACKGROUND[1], BACKGROUND[2]];
        assert_eq!(pixel(&canvas, cx + offset, cy), bg);
    }

    #[test]
    fn plate_is_cached_per_item_and_size() {
        let mut scene = Scene::new(320, 240);
        let mut canvas = Pixmap::new(320, 240).unwrap();
        let stimulus = Stimulus::Synthetic(Arc::new(generate_plate("8", 200.0)));
        let frame = Frame {
            view: View::Plate {
                item_id: 2,
                stimulus: &stimulus,
                typed: "8",
                time_left: 0.5,
            },
            progress: (1, 6),
        };
        for _ in 0..2 {
            scene.render(&mut canvas, &frame);
        }
        let small = PlateKey { item_id: 2, side: 168 };
        assert!(matches!(&scene.plate_cache, Some((key, p)) if *key == small && p.width() == 168));

        scene.resize(640, 480);
        assert!(scene.plate_cache.is_none());
        let mut canvas = Pixmap::new(640, 480).unwrap();
        scene.render(&mut canvas, &frame);
        let large = PlateKey { item_id: 2, side: 336 };
        assert!(matches!(&scene.plate_cache, Some((key, _)) if *key == large));

        // a size change without a resize call still re-rasterizes
        scene.width = 320;
        scene.height = 240;
        scene.render(&mut canvas, &frame);
        assert!(matches!(&scene.plate_cache, Some((key, _)) if *key == small));
    }

    #[test]
    fn verdict_colors() {
        assert_eq!(verdict_color("FIT", Some(true)), VERDICT_GOOD);
        assert_eq!(verdict_color("UNFIT", Some(false)), VERDICT_BAD);
        assert_eq!(verdict_color("Normal", None), VERDICT_GOOD);
        assert_eq!(verdict_color("Mild Deficiency", None), VERDICT_MILD);
        assert_eq!(verdict_color("Strong Deficiency", None), VERDICT_BAD);
        assert_eq!(verdict_color("Deuteranomaly", None), VERDICT_OTHER);
    }

    #[test]
    fn result_screen_uses_verdict_color() {
        let mut scene = Scene::new(300, 300);
        let mut canvas = Pixmap::new(300, 300).unwrap();
        let frame = Frame {
            view: View::Result {
                category: "FIT",
                accuracy_pct: 100.0,
                passed: Some(true),
                pending_remote: false,
            },
            progress: (11, 11),
        };
        scene.render(&mut canvas, &frame);
        let (cx, cy) = scene.center();
        assert_eq!(
            pixel(&canvas, cx, cy),
            [VERDICT_GOOD[0], VERDICT_GOOD[1], VERDICT_GOOD[2]]
        );
    }
}
