//! Drawing surface abstraction
//!
//! `Surface` is the small slice of a 2D canvas API the frame drawer needs.
//! `DisplayList` records calls so they can be replayed onto any other surface.

use glam::Vec2;

use crate::sim::Rect;

/// Linear RGBA colour, components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba8(0, 0, 0, 0.0);
    pub const WHITE: Self = Self::hex(0xffffff);

    /// From 8-bit channels and a 0..=1 alpha (CSS `rgba()` style)
    pub const fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    /// Opaque colour from `0xRRGGBB`
    pub const fn hex(rgb: u32) -> Self {
        Self::rgba8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 1.0)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// CSS `rgba(...)` string
    pub fn css(&self) -> String {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({},{},{},{})",
            byte(self.r),
            byte(self.g),
            byte(self.b),
            self.a.clamp(0.0, 1.0)
        )
    }
}

/// Gradient stop; `offset` in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Color,
}

/// Fill style
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Gradient along the segment `start -> end`
    Linear {
        start: Vec2,
        end: Vec2,
        stops: Vec<ColorStop>,
    },
    /// Two-circle radial gradient
    Radial {
        inner_center: Vec2,
        inner_radius: f32,
        center: Vec2,
        radius: f32,
        stops: Vec<ColorStop>,
    },
}

fn to_stops(stops: &[(f32, Color)]) -> Vec<ColorStop> {
    stops
        .iter()
        .map(|&(offset, color)| ColorStop { offset, color })
        .collect()
}

impl Paint {
    pub fn linear(start: Vec2, end: Vec2, stops: &[(f32, Color)]) -> Self {
        Paint::Linear {
            start,
            end,
            stops: to_stops(stops),
        }
    }

    pub fn radial(
        inner_center: Vec2,
        inner_radius: f32,
        center: Vec2,
        radius: f32,
        stops: &[(f32, Color)],
    ) -> Self {
        Paint::Radial {
            inner_center,
            inner_radius,
            center,
            radius,
            stops: to_stops(stops),
        }
    }

    /// Approximate colour at a point (exact for solid and linear paints)
    pub fn sample(&self, p: Vec2) -> Color {
        match self {
            Paint::Solid(c) => *c,
            Paint::Linear { start, end, stops } => {
                let axis = *end - *start;
                let len_sq = axis.length_squared();
                let t = if len_sq > 0.0 {
                    (p - *start).dot(axis) / len_sq
                } else {
                    0.0
                };
                sample_stops(stops, t)
            }
            Paint::Radial {
                inner_center,
                inner_radius,
                center,
                radius,
                stops,
            } => {
                let span = radius - inner_radius;
                let t = if span > 0.0 {
                    // Distance measured from the focus blends toward the outer center
                    let focus = inner_center.lerp(*center, 0.5);
                    ((p - focus).length() - inner_radius) / span
                } else {
                    0.0
                };
                sample_stops(stops, t)
            }
        }
    }
}

/// Piecewise-linear lookup, clamped to the first and last stop
pub fn sample_stops(stops: &[ColorStop], t: f32) -> Color {
    let Some(first) = stops.first() else {
        return Color::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let u = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return a.color.lerp(b.color, u);
        }
    }
    stops.last().map_or(first.color, |s| s.color)
}

/// Text appearance; text is always centered on its anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Pixel size
    pub size: f32,
    /// CSS font weight
    pub weight: u16,
    pub color: Color,
    /// Shadow glow colour and blur radius
    pub glow: Option<(Color, f32)>,
}

/// 2D drawing target
///
/// Transform and alpha state follow canvas semantics: `save`/`restore` push
/// and pop both, and `set_alpha` replaces (not multiplies) the global alpha.
pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, radians: f32);
    fn set_alpha(&mut self, alpha: f32);

    fn fill_rect(&mut self, rect: Rect, paint: &Paint);
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32);
    /// Convex polygon
    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint);
    /// Closed outline
    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, width: f32);
    fn text(&mut self, text: &str, anchor: Vec2, style: &TextStyle);
}

/// One recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
    SetAlpha(f32),
    FillRect {
        rect: Rect,
        paint: Paint,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        paint: Paint,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        color: Color,
        width: f32,
    },
    FillPolygon {
        points: Vec<Vec2>,
        paint: Paint,
    },
    StrokePolygon {
        points: Vec<Vec2>,
        color: Color,
        width: f32,
    },
    Text {
        text: String,
        anchor: Vec2,
        style: TextStyle,
    },
}

/// Recording surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Issue every recorded call, in order, on `target`
    pub fn replay(&self, target: &mut dyn Surface) {
        for cmd in &self.commands {
            match cmd {
                DrawCommand::Save => target.save(),
                DrawCommand::Restore => target.restore(),
                DrawCommand::Translate(v) => target.translate(*v),
                DrawCommand::Rotate(r) => target.rotate(*r),
                DrawCommand::SetAlpha(a) => target.set_alpha(*a),
                DrawCommand::FillRect { rect, paint } => target.fill_rect(*rect, paint),
                DrawCommand::StrokeRect { rect, color, width } => {
                    target.stroke_rect(*rect, *color, *width)
                }
                DrawCommand::Line {
                    from,
                    to,
                    color,
                    width,
                } => target.line(*from, *to, *color, *width),
                DrawCommand::FillCircle {
                    center,
                    radius,
                    paint,
                } => target.fill_circle(*center, *radius, paint),
                DrawCommand::StrokeCircle {
                    center,
                    radius,
                    color,
                    width,
                } => target.stroke_circle(*center, *radius, *color, *width),
                DrawCommand::FillPolygon { points, paint } => target.fill_polygon(points, paint),
                DrawCommand::StrokePolygon {
                    points,
                    color,
                    width,
                } => target.stroke_polygon(points, *color, *width),
                DrawCommand::Text {
                    text,
                    anchor,
                    style,
                } => target.text(text, *anchor, style),
            }
        }
    }
}

impl Surface for DisplayList {
    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.commands.push(DrawCommand::Translate(offset));
    }

    fn rotate(&mut self, radians: f32) {
        self.commands.push(DrawCommand::Rotate(radians));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::SetAlpha(alpha));
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            paint: paint.clone(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.commands
            .push(DrawCommand::StrokeRect { rect, color, width });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            paint: paint.clone(),
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color,
            width,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            paint: paint.clone(),
        });
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, width: f32) {
        self.commands.push(DrawCommand::StrokePolygon {
            points: points.to_vec(),
            color,
            width,
        });
    }

    fn text(&mut self, text: &str, anchor: Vec2, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            anchor,
            style: *style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        let c = Color::hex(0x00ffff);
        assert_eq!(c.to_array(), [0.0, 1.0, 1.0, 1.0]);
        assert_eq!(c.css(), "rgba(0,255,255,1)");
        assert_eq!(c.with_alpha(0.5).css(), "rgba(0,255,255,0.5)");
    }

    #[test]
    fn test_sample_stops_clamps_and_interpolates() {
        let stops = to_stops(&[(0.0, Color::hex(0x000000)), (1.0, Color::WHITE)]);
        assert_eq!(sample_stops(&stops, -1.0), Color::hex(0x000000));
        assert_eq!(sample_stops(&stops, 2.0), Color::WHITE);
        let mid = sample_stops(&stops, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert_eq!(sample_stops(&[], 0.5), Color::TRANSPARENT);
    }

    #[test]
    fn test_linear_sample_projects_onto_axis() {
        let paint = Paint::linear(
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            &[(0.0, Color::TRANSPARENT), (1.0, Color::WHITE)],
        );
        // y is irrelevant for a horizontal gradient
        assert_eq!(paint.sample(Vec2::new(10.0, 50.0)), Color::WHITE);
        assert_eq!(paint.sample(Vec2::new(0.0, -3.0)), Color::TRANSPARENT);
    }

    #[test]
    fn test_display_list_replay_preserves_order() {
        let mut list = DisplayList::new();
        list.save();
        list.translate(Vec2::new(1.0, 2.0));
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), &Paint::Solid(Color::WHITE));
        list.text("+1", Vec2::ZERO, &TextStyle {
            size: 14.0,
            weight: 700,
            color: Color::WHITE,
            glow: None,
        });
        list.restore();

        let mut copy = DisplayList::new();
        list.replay(&mut copy);
        assert_eq!(copy, list);
        assert_eq!(copy.len(), 5);
    }
}
