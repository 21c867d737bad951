use crate::error::RenderError;
use crate::generator::{DotPlate, DotPoint};
use crate::glyph::Glyph;
use tiny_skia::{
    Color, FillRule, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint,
    Stroke, Transform,
};

/// Paper tone visible between the dots.
const PLATE_BASE: [u8; 4] = [236, 230, 214, 255];
const BACKDROP: [u8; 4] = [0, 0, 0, 255];

/// Rasterizes a plate onto a fresh `size`×`size` canvas.
pub fn render_plate(plate: &DotPlate, size: u32) -> Result<Pixmap, RenderError> {
    let mut pixmap = Pixmap::new(size, size).ok_or(RenderError::UnsupportedDimensions {
        width: size,
        height: size,
    })?;
    pixmap.fill(Color::from_rgba8(BACKDROP[0], BACKDROP[1], BACKDROP[2], BACKDROP[3]));
    draw_plate(&mut pixmap, plate, (0.0, 0.0), size as f32);
    Ok(pixmap)
}

/// Draws `plate` scaled into the square at `origin` with side `size`.
pub fn draw_plate(pixmap: &mut Pixmap, plate: &DotPlate, origin: (f32, f32), size: f32) {
    let scale = size / plate.diameter;
    let transform = Transform::from_scale(scale, scale).post_translate(origin.0, origin.1);

    let mut paint = Paint::default();
    paint.anti_alias = true;

    let half = plate.diameter * 0.5;
    if let Some(base) = PathBuilder::from_circle(half, half, half) {
        paint.set_color(Color::from_rgba8(
            PLATE_BASE[0],
            PLATE_BASE[1],
            PLATE_BASE[2],
            PLATE_BASE[3],
        ));
        pixmap.fill_path(&base, &paint, FillRule::Winding, transform, None);
    }

    for dot in plate.background.iter().chain(&plate.foreground) {
        fill_dot(pixmap, &mut paint, dot, transform);
    }
}

fn fill_dot(pixmap: &mut Pixmap, paint: &mut Paint, dot: &DotPoint, transform: Transform) {
    let Some(path) = PathBuilder::from_circle(dot.x, dot.y, dot.radius) else {
        return;
    };
    let [r, g, b, a] = dot.color.rgba();
    paint.set_color(Color::from_rgba8(r, g, b, a));
    pixmap.fill_path(&path, paint, FillRule::Winding, transform, None);
}

/// Draws a pre-rendered plate image scaled into the square at `origin`.
pub fn draw_image(pixmap: &mut Pixmap, image: &Pixmap, origin: (f32, f32), size: f32) {
    let sx = size / image.width().max(1) as f32;
    let sy = size / image.height().max(1) as f32;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(
        0,
        0,
        image.as_ref(),
        &paint,
        Transform::from_scale(sx, sy).post_translate(origin.0, origin.1),
        None,
    );
}

/// Strokes `text` with the plate glyph outlines, `height` pixels tall, with
/// its top-left corner at `origin`. Returns the drawn width.
pub fn stroke_text(
    pixmap: &mut Pixmap,
    text: &str,
    origin: (f32, f32),
    height: f32,
    color: [u8; 4],
) -> f32 {
    let glyph_width = height * 0.6;
    let advance = height * 0.75;

    let mut paint = Paint::default();
    paint.anti_alias = true;
    paint.set_color(Color::from_rgba8(color[0], color[1], color[2], color[3]));
    let stroke = Stroke {
        width: (height * 0.08).max(1.0),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    let mut x = origin.0;
    for c in text.chars() {
        let glyph = Glyph::for_char(c);
        let mut pb = PathBuilder::new();
        for line in glyph.polylines(24) {
            let mut points = line.into_iter();
            if let Some((u, v)) = points.next() {
                pb.move_to(x + u * glyph_width, origin.1 + v * height);
            }
            for (u, v) in points {
                pb.line_to(x + u * glyph_width, origin.1 + v * height);
            }
        }
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
        x += advance;
    }
    x - origin.0
}

pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    pixmap
        .encode_png()
        .map_err(|e| RenderError::PngEncode(e.to_string()))
}
