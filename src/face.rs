//! Clock face composition: face disc, seconds arc, strokes, numerals, hands.

use crate::animation::HandAngles;
use crate::config::ClockConfig;
use crate::render::{polar, DrawCommand, Scene};

/// Where the face sits in the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceLayout {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    /// Framebuffer pixels per logical pixel.
    pub scale: f64,
}

impl FaceLayout {
    /// The face fills a square of the window height on the left side.
    pub fn new(width: usize, height: usize, config: &ClockConfig) -> Self {
        let scale = (width as f64 / config.window_width.max(1) as f64)
            .min(height as f64 / config.window_height.max(1) as f64);
        let side = config.window_height as f64 * scale;
        Self {
            cx: side / 2.0,
            cy: side / 2.0,
            radius: config.clock_radius * scale,
            scale,
        }
    }
}

/// Clockwise (start, span) in degrees covered by an arc of the given length,
/// or `None` when the arc is empty.
///
/// The arc is anchored at 12 o'clock: positive lengths extend
/// counter-clockwise (the part of the minute still to come), negative lengths
/// extend clockwise (the part already elapsed).
pub fn arc_coverage(length_degrees: f64) -> Option<(f64, f64)> {
    if length_degrees.abs() >= 360.0 {
        Some((0.0, 360.0))
    } else if length_degrees > 0.0 {
        Some((360.0 - length_degrees, length_degrees))
    } else if length_degrees < 0.0 {
        Some((0.0, -length_degrees))
    } else {
        None
    }
}

/// Rectangle lying along a radius, from `inner` to `outer` distance.
fn radial_rect(layout: &FaceLayout, angle: f64, inner: f64, outer: f64, width: f64) -> Vec<(f64, f64)> {
    let half = width / 2.0;
    [(-half, inner), (-half, outer), (half, outer), (half, inner)]
        .iter()
        .map(|&(across, along)| polar(layout.cx, layout.cy, angle, along, across))
        .collect()
}

fn hand_outline(layout: &FaceLayout, angle: f64, shape: &[(f64, f64)]) -> Vec<(f64, f64)> {
    shape
        .iter()
        .map(|&(across, along)| polar(layout.cx, layout.cy, angle, along, across))
        .collect()
}

pub fn add_face(scene: &mut Scene, layout: &FaceLayout, angles: &HandAngles, config: &ClockConfig) {
    let s = layout.scale;
    let r = layout.radius;

    scene.add_command(DrawCommand::Disc {
        cx: layout.cx,
        cy: layout.cy,
        radius: r,
        color: config.face_color.as_tuple(),
    });

    if let Some((start_degrees, span_degrees)) = arc_coverage(angles.arc_length) {
        scene.add_command(DrawCommand::Sector {
            cx: layout.cx,
            cy: layout.cy,
            radius: r,
            start_degrees,
            span_degrees,
            color: config.arc_color.as_tuple(),
            alpha: config.arc_alpha,
        });
    }

    // Hour and minute strokes share a center line just inside the rim.
    let stroke_color = config.stroke_color.as_tuple();
    let hour_h = config.hour_stroke_height * s;
    let stroke_center = r - hour_h / 2.0;
    for i in 0..60 {
        let angle = 6.0 * i as f64;
        let (w, h) = if i % 5 == 0 {
            (config.hour_stroke_width * s, hour_h)
        } else {
            (config.minute_stroke_width * s, config.minute_stroke_height * s)
        };
        scene.add_command(DrawCommand::Polygon {
            points: radial_rect(layout, angle, stroke_center - h / 2.0, stroke_center + h / 2.0, w),
            color: stroke_color,
        });
    }

    let numeral_radius = config.numeral_radius_factor * r;
    for i in 0..12 {
        let (x, y) = polar(layout.cx, layout.cy, 30.0 * i as f64, numeral_radius, 0.0);
        scene.add_command(DrawCommand::Text {
            x: x.round() as i32,
            y: y.round() as i32,
            text: (if i == 0 { 12 } else { i }).to_string(),
            font_size: config.numeral_font_size * s as f32,
            color: config.numeral_color.as_tuple(),
        });
    }

    let hand_color = config.hand_color.as_tuple();
    let hour_shape = [
        (-3.0 * s, -3.0 * s),
        (-8.0 * s, 0.2 * r),
        (0.0, 0.5 * r),
        (8.0 * s, 0.2 * r),
        (3.0 * s, -3.0 * s),
    ];
    add_hand(scene, layout, angles.hour, &hour_shape, 8.0 * s, hand_color);

    let minute_shape = [
        (-3.0 * s, -3.0 * s),
        (-5.0 * s, 0.3 * r),
        (0.0, 0.75 * r),
        (5.0 * s, 0.3 * r),
        (3.0 * s, -3.0 * s),
    ];
    add_hand(scene, layout, angles.minute, &minute_shape, 6.0 * s, hand_color);

    let second_shape = [
        (-3.0 * s, -40.0 * s),
        (-3.0 * s, -10.0 * s),
        (-1.0 * s, -10.0 * s),
        (-1.0 * s, 0.85 * r),
        (1.0 * s, 0.85 * r),
        (1.0 * s, -10.0 * s),
        (3.0 * s, -10.0 * s),
        (3.0 * s, -40.0 * s),
    ];
    add_hand(
        scene,
        layout,
        angles.second,
        &second_shape,
        5.0 * s,
        config.second_hand_color.as_tuple(),
    );
}

fn add_hand(
    scene: &mut Scene,
    layout: &FaceLayout,
    angle: f64,
    shape: &[(f64, f64)],
    hub_radius: f64,
    color: (u8, u8, u8),
) {
    scene.add_command(DrawCommand::Polygon {
        points: hand_outline(layout, angle, shape),
        color,
    });
    scene.add_command(DrawCommand::Disc {
        cx: layout.cx,
        cy: layout.cy,
        radius: hub_radius,
        color,
    });
}
