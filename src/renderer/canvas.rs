//! `Surface` over a browser `CanvasRenderingContext2d`

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

use super::surface::{Color, ColorStop, Paint, Surface, TextStyle};
use crate::sim::Rect;

const FONT_FAMILY: &str = "'Orbitron', monospace";

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

fn check(result: Result<(), JsValue>, what: &str) {
    if let Err(e) = result {
        log::warn!("Canvas {} failed: {:?}", what, e);
    }
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Grab the 2D context of a canvas element
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self::new(ctx))
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    /// Map CSS pixels to device pixels for the next frame
    pub fn set_pixel_ratio(&self, ratio: f64) {
        check(
            self.ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0),
            "set_transform",
        );
    }

    fn gradient<'p>(&self, paint: &'p Paint) -> Option<(CanvasGradient, &'p [ColorStop])> {
        match paint {
            Paint::Solid(_) => None,
            Paint::Linear { start, end, stops } => {
                let g = self.ctx.create_linear_gradient(
                    start.x as f64,
                    start.y as f64,
                    end.x as f64,
                    end.y as f64,
                );
                Some((g, stops.as_slice()))
            }
            Paint::Radial {
                inner_center,
                inner_radius,
                center,
                radius,
                stops,
            } => {
                let g = self
                    .ctx
                    .create_radial_gradient(
                        inner_center.x as f64,
                        inner_center.y as f64,
                        *inner_radius as f64,
                        center.x as f64,
                        center.y as f64,
                        *radius as f64,
                    )
                    .ok()?;
                Some((g, stops.as_slice()))
            }
        }
    }

    fn set_fill(&self, paint: &Paint) {
        match self.gradient(paint) {
            Some((g, stops)) => {
                for stop in stops {
                    check(
                        g.add_color_stop(stop.offset.clamp(0.0, 1.0), &stop.color.css()),
                        "add_color_stop",
                    );
                }
                self.ctx.set_fill_style_canvas_gradient(&g);
            }
            None => {
                let color = match paint {
                    Paint::Solid(c) => *c,
                    _ => Color::TRANSPARENT,
                };
                self.ctx.set_fill_style_str(&color.css());
            }
        }
    }

    fn set_stroke(&self, color: Color, width: f32) {
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(width as f64);
    }

    fn trace_polygon(&self, points: &[Vec2]) -> bool {
        let Some((first, rest)) = points.split_first() else {
            return false;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        true
    }

    fn trace_circle(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        check(
            self.ctx.arc(
                center.x as f64,
                center.y as f64,
                radius.max(0.0) as f64,
                0.0,
                std::f64::consts::TAU,
            ),
            "arc",
        );
    }
}

impl Surface for CanvasSurface {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        check(self.ctx.translate(offset.x as f64, offset.y as f64), "translate");
    }

    fn rotate(&mut self, radians: f32) {
        check(self.ctx.rotate(radians as f64), "rotate");
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.set_fill(paint);
        self.ctx.fill_rect(
            rect.min.x as f64,
            rect.min.y as f64,
            rect.size.x as f64,
            rect.size.y as f64,
        );
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.set_stroke(color, width);
        self.ctx.stroke_rect(
            rect.min.x as f64,
            rect.min.y as f64,
            rect.size.x as f64,
            rect.size.y as f64,
        );
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.set_stroke(color, width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.set_fill(paint);
        self.trace_circle(center, radius);
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32) {
        self.set_stroke(color, width);
        self.trace_circle(center, radius);
        self.ctx.stroke();
    }

    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint) {
        self.set_fill(paint);
        if self.trace_polygon(points) {
            self.ctx.fill();
        }
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, width: f32) {
        self.set_stroke(color, width);
        if self.trace_polygon(points) {
            self.ctx.stroke();
        }
    }

    fn text(&mut self, text: &str, anchor: Vec2, style: &TextStyle) {
        self.ctx.save();
        self.ctx
            .set_font(&format!("{} {}px {}", style.weight, style.size, FONT_FAMILY));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(&style.color.css());
        if let Some((glow, blur)) = style.glow {
            self.ctx.set_shadow_color(&glow.css());
            self.ctx.set_shadow_blur(blur as f64);
        }
        check(
            self.ctx.fill_text(text, anchor.x as f64, anchor.y as f64),
            "fill_text",
        );
        self.ctx.restore();
    }
}
