//! Ritytan som scenen ritas mot
//!
//! Ytan har en transformstack i stil med en 2D-kontext: `translate` och
//! `scale` påverkar allt som ritas efteråt, `save`/`restore` sparar och
//! återställer transformen.

use egui::{Align2, Color32, Pos2, Rect, Stroke, Vec2};

pub trait Surface {
    /// Töm hela ytan med en färg
    fn clear(&mut self, color: Color32);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn scale(&mut self, factor: f32);

    /// Om ytan kan fylla rektanglar med rundade hörn
    fn supports_rounded_rect(&self) -> bool;
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, fill: Color32, stroke: Stroke);
    fn fill_rect(&mut self, rect: Rect, fill: Color32, stroke: Stroke);
    fn fill_circle(&mut self, center: Pos2, radius: f32, fill: Color32);
    fn text(&mut self, pos: Pos2, align: Align2, text: &str, size: f32, color: Color32);
    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke);
}

/// Translation och skala, tillämpas som `translation + p * scale`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub translation: Vec2,
    pub scale: f32,
}

impl Default for Affine {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Affine {
    pub fn apply(&self, pos: Pos2) -> Pos2 {
        Pos2::ZERO + self.translation + pos.to_vec2() * self.scale
    }

    pub fn apply_rect(&self, rect: Rect) -> Rect {
        Rect::from_min_max(self.apply(rect.min), self.apply(rect.max))
    }

    pub fn apply_len(&self, len: f32) -> f32 {
        len * self.scale
    }
}

/// Aktuell transform plus sparade kopior
#[derive(Debug, Clone, Default)]
pub struct TransformStack {
    current: Affine,
    saved: Vec<Affine>,
}

impl TransformStack {
    pub fn current(&self) -> Affine {
        self.current
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Återställ senast sparade. Tom stack lämnar transformen orörd.
    pub fn restore(&mut self) {
        if let Some(previous) = self.saved.pop() {
            self.current = previous;
        }
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.current.translation += offset * self.current.scale;
    }

    pub fn scale(&mut self, factor: f32) {
        self.current.scale *= factor;
    }
}

/// Ett inspelat ritanrop i ytans koordinater (efter transform)
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color32),
    RoundedRect { rect: Rect, radius: f32, fill: Color32 },
    Rect { rect: Rect, fill: Color32 },
    Circle { center: Pos2, radius: f32, fill: Color32 },
    Text { pos: Pos2, text: String, size: f32, color: Color32 },
    Line { from: Pos2, to: Pos2, width: f32 },
}

/// Yta som bara spelar in anropen
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
    stack: TransformStack,
    rounded: bool,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            stack: TransformStack::default(),
            rounded: true,
        }
    }

    /// Yta utan stöd för rundade hörn
    pub fn without_rounded_rect() -> Self {
        Self {
            rounded: false,
            ..Self::new()
        }
    }

    pub fn transform(&self) -> Affine {
        self.stack.current()
    }

    pub fn save_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Antal ritade noder (rektanglar med eller utan rundade hörn)
    pub fn node_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::RoundedRect { .. } | DrawCommand::Rect { .. }))
            .count()
    }

    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color32) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn save(&mut self) {
        self.stack.save();
    }

    fn restore(&mut self) {
        self.stack.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        self.stack.translate(offset);
    }

    fn scale(&mut self, factor: f32) {
        self.stack.scale(factor);
    }

    fn supports_rounded_rect(&self) -> bool {
        self.rounded
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, fill: Color32, _stroke: Stroke) {
        let t = self.stack.current();
        self.commands.push(DrawCommand::RoundedRect {
            rect: t.apply_rect(rect),
            radius: t.apply_len(radius),
            fill,
        });
    }

    fn fill_rect(&mut self, rect: Rect, fill: Color32, _stroke: Stroke) {
        let t = self.stack.current();
        self.commands.push(DrawCommand::Rect {
            rect: t.apply_rect(rect),
            fill,
        });
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32, fill: Color32) {
        let t = self.stack.current();
        self.commands.push(DrawCommand::Circle {
            center: t.apply(center),
            radius: t.apply_len(radius),
            fill,
        });
    }

    fn text(&mut self, pos: Pos2, _align: Align2, text: &str, size: f32, color: Color32) {
        let t = self.stack.current();
        self.commands.push(DrawCommand::Text {
            pos: t.apply(pos),
            text: text.to_string(),
            size: t.apply_len(size),
            color,
        });
    }

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        let t = self.stack.current();
        self.commands.push(DrawCommand::Line {
            from: t.apply(from),
            to: t.apply(to),
            width: t.apply_len(stroke.width),
        });
    }
}
