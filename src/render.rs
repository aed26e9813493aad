// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

use rusttype::{point, Font, PositionedGlyph, Scale};

pub type Rgb = (u8, u8, u8);

#[derive(Clone, Debug)]
pub enum DrawCommand {
    Clear(Rgb),
    Disc {
        cx: f64,
        cy: f64,
        radius: f64,
        color: Rgb,
    },
    /// Pie slice starting at `start_degrees` (clockwise from 12 o'clock) and
    /// extending clockwise by `span_degrees`.
    Sector {
        cx: f64,
        cy: f64,
        radius: f64,
        start_degrees: f64,
        span_degrees: f64,
        color: Rgb,
        alpha: f32,
    },
    Line {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        thickness: f32,
        color: Rgb,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        color: Rgb,
    },
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Rgb,
        outline: Option<f32>,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        font_size: f32,
        color: Rgb,
    },
}

#[derive(Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Text commands are skipped when no font is available.
    pub fn render(&self, canvas: &mut Canvas, font: Option<&Font>) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Disc {
                    cx,
                    cy,
                    radius,
                    color,
                } => fill_sector(canvas, *cx, *cy, *radius, 0.0, 360.0, *color, 1.0),
                DrawCommand::Sector {
                    cx,
                    cy,
                    radius,
                    start_degrees,
                    span_degrees,
                    color,
                    alpha,
                } => fill_sector(
                    canvas,
                    *cx,
                    *cy,
                    *radius,
                    *start_degrees,
                    *span_degrees,
                    *color,
                    *alpha,
                ),
                DrawCommand::Line {
                    x0,
                    y0,
                    x1,
                    y1,
                    thickness,
                    color,
                } => draw_thick_line_aa(canvas, *x0, *y0, *x1, *y1, *thickness, *color),
                DrawCommand::Polygon { points, color } => fill_polygon(canvas, points, *color),
                DrawCommand::Rect {
                    x,
                    y,
                    w,
                    h,
                    color,
                    outline,
                } => match outline {
                    None => fill_polygon(
                        canvas,
                        &[(*x, *y), (x + w, *y), (x + w, y + h), (*x, y + h)],
                        *color,
                    ),
                    Some(thickness) => {
                        for (x0, y0, x1, y1) in [
                            (*x, *y, x + w, *y),
                            (*x, y + h, x + w, y + h),
                            (*x, *y, *x, y + h),
                            (x + w, *y, x + w, y + h),
                        ] {
                            draw_thick_line_aa(canvas, x0, y0, x1, y1, *thickness, *color);
                        }
                    }
                },
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font_size,
                    color,
                } => {
                    if let Some(font) = font {
                        draw_text(canvas, *x, *y, text, font, Scale::uniform(*font_size), *color);
                    }
                }
            }
        }
    }
}

// ============================================================================
// CORE DATA TYPES
// ============================================================================

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    /// `frame` is RGBA8, `width * height * 4` bytes.
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Rgb) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.0, color.1, color.2, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        self.frame
            .get(idx..idx + 3)
            .map(|px| (px[0], px[1], px[2]))
    }

    fn blend(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let a = alpha.clamp(0.0, 1.0);
        let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
        dst[0] = mix(color.0, dst[0]);
        dst[1] = mix(color.1, dst[1]);
        dst[2] = mix(color.2, dst[2]);
        dst[3] = 0xff;
    }
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

/// Clockwise angle in degrees from 12 o'clock for an offset from the center.
pub fn clock_angle(dx: f64, dy: f64) -> f64 {
    dx.atan2(-dy).to_degrees().rem_euclid(360.0)
}

/// Screen position of a point `along` pixels from the center in direction
/// `angle_degrees` (clockwise from 12), shifted `across` pixels to the right
/// of that direction.
pub fn polar(cx: f64, cy: f64, angle_degrees: f64, along: f64, across: f64) -> (f64, f64) {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    (
        cx + along * sin + across * cos,
        cy - along * cos + across * sin,
    )
}

fn fill_sector(
    canvas: &mut Canvas,
    cx: f64,
    cy: f64,
    radius: f64,
    start_degrees: f64,
    span_degrees: f64,
    color: Rgb,
    alpha: f32,
) {
    if radius <= 0.0 || span_degrees <= 0.0 || alpha <= 0.0 {
        return;
    }
    let full = span_degrees >= 360.0;
    let min_x = (cx - radius - 1.0).floor().max(0.0) as i32;
    let max_x = (cx + radius + 1.0).ceil().min(canvas.width as f64 - 1.0) as i32;
    let min_y = (cy - radius - 1.0).floor().max(0.0) as i32;
    let max_y = (cy + radius + 1.0).ceil().min(canvas.height as f64 - 1.0) as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let aa = (radius - dist + 0.5).clamp(0.0, 1.0);
            if aa <= 0.0 {
                continue;
            }
            if !full {
                let offset = (clock_angle(dx, dy) - start_degrees).rem_euclid(360.0);
                if offset > span_degrees {
                    continue;
                }
            }
            canvas.blend(x, y, color, aa as f32 * alpha);
        }
    }
}

fn draw_thick_line_aa(
    canvas: &mut Canvas,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    thickness: f32,
    color: Rgb,
) {
    let pad = thickness.ceil() as f64 + 1.0;
    let min_x = (x0.min(x1) - pad).floor() as i32;
    let max_x = (x0.max(x1) + pad).ceil() as i32;
    let min_y = (y0.min(y1) - pad).floor() as i32;
    let max_y = (y0.max(y1) + pad).ceil() as i32;
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len_sq = (dx * dx + dy * dy).max(f64::EPSILON);
    let half = thickness as f64 / 2.0;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f64 - x0;
            let py = y as f64 - y0;
            let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
            let lx = x0 + t * dx;
            let ly = y0 + t * dy;
            let dist = ((lx - x as f64).powi(2) + (ly - y as f64).powi(2)).sqrt();
            let aa = (1.0 - (dist - half).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa > 0.01 {
                canvas.blend(x, y, color, aa as f32);
            }
        }
    }
}

fn point_in_polygon(points: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

const POLYGON_SAMPLES: [(f64, f64); 4] = [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)];

/// Even-odd fill with 2x2 supersampling for soft edges.
fn fill_polygon(canvas: &mut Canvas, points: &[(f64, f64)], color: Rgb) {
    if points.len() < 3 {
        return;
    }
    let (min_x, max_x, min_y, max_y) = points.iter().fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(min_x, max_x, min_y, max_y), &(x, y)| {
            (min_x.min(x), max_x.max(x), min_y.min(y), max_y.max(y))
        },
    );
    let min_x = min_x.floor().max(0.0) as i32;
    let max_x = max_x.ceil().min(canvas.width as f64 - 1.0) as i32;
    let min_y = min_y.floor().max(0.0) as i32;
    let max_y = max_y.ceil().min(canvas.height as f64 - 1.0) as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let hits = POLYGON_SAMPLES
                .iter()
                .filter(|(sx, sy)| point_in_polygon(points, x as f64 + sx, y as f64 + sy))
                .count();
            if hits > 0 {
                canvas.blend(x, y, color, hits as f32 / POLYGON_SAMPLES.len() as f32);
            }
        }
    }
}

/// Draws `text` centered on (x, y).
fn draw_text(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    text: &str,
    font: &Font,
    scale: Scale,
    color: Rgb,
) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();
    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    let width_px = if min_x < max_x { max_x - min_x } else { 0 };
    let height_px = if min_y < max_y { max_y - min_y } else { 0 };
    let offset_x = x - width_px / 2;
    let offset_y = y - height_px / 2;
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                canvas.blend(px, py, color, v);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = (0xff, 0x00, 0x00);
    const WHITE: Rgb = (0xff, 0xff, 0xff);

    fn with_canvas(width: usize, height: usize, f: impl FnOnce(&mut Canvas)) {
        let mut frame = vec![0u8; width * height * 4];
        let mut canvas = Canvas::new(&mut frame, width, height);
        f(&mut canvas);
    }

    #[test]
    fn clock_angle_directions() {
        assert!((clock_angle(0.0, -1.0) - 0.0).abs() < 1e-9);
        assert!((clock_angle(1.0, 0.0) - 90.0).abs() < 1e-9);
        assert!((clock_angle(0.0, 1.0) - 180.0).abs() < 1e-9);
        assert!((clock_angle(-1.0, 0.0) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn polar_points_up_at_twelve() {
        let (x, y) = polar(100.0, 100.0, 0.0, 50.0, 0.0);
        assert!((x - 100.0).abs() < 1e-9 && (y - 50.0).abs() < 1e-9);
        let (x, y) = polar(100.0, 100.0, 90.0, 50.0, 0.0);
        assert!((x - 150.0).abs() < 1e-9 && (y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn sector_covers_only_its_quadrant() {
        with_canvas(40, 40, |canvas| {
            canvas.clear(WHITE);
            let mut scene = Scene::new();
            scene.add_command(DrawCommand::Sector {
                cx: 20.0,
                cy: 20.0,
                radius: 15.0,
                start_degrees: 0.0,
                span_degrees: 90.0,
                color: RED,
                alpha: 1.0,
            });
            scene.render(canvas, None);
            // upper right is painted, lower left is not
            assert_eq!(canvas.pixel(26, 12), Some(RED));
            assert_eq!(canvas.pixel(12, 26), Some(WHITE));
        });
    }

    #[test]
    fn polygon_fill_and_text_without_font() {
        with_canvas(20, 20, |canvas| {
            canvas.clear(WHITE);
            let mut scene = Scene::new();
            scene.add_command(DrawCommand::Rect {
                x: 2.0,
                y: 2.0,
                w: 8.0,
                h: 8.0,
                color: RED,
                outline: None,
            });
            scene.add_command(DrawCommand::Text {
                x: 15,
                y: 15,
                text: "12".to_string(),
                font_size: 10.0,
                color: RED,
            });
            scene.render(canvas, None);
            assert_eq!(canvas.pixel(5, 5), Some(RED));
            assert_eq!(canvas.pixel(15, 15), Some(WHITE));
        });
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        with_canvas(10, 10, |canvas| {
            let mut scene = Scene::new();
            scene.add_command(DrawCommand::Disc {
                cx: -50.0,
                cy: 500.0,
                radius: 20.0,
                color: RED,
            });
            scene.add_command(DrawCommand::Line {
                x0: -100.0,
                y0: -100.0,
                x1: 200.0,
                y1: 200.0,
                thickness: 3.0,
                color: RED,
            });
            scene.render(canvas, None);
            assert_eq!(canvas.pixel(5, 5), Some(RED));
        });
    }
}
