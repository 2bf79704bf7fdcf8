use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Rounding, Stroke, Vec2};

use super::surface::{Surface, TransformStack};

/// Ritar mot en egui-painter. Logiska koordinater räknas från `origin`,
/// normalt övre vänstra hörnet av den allokerade ytan.
pub struct EguiSurface<'p> {
    painter: &'p Painter,
    area: Rect,
    stack: TransformStack,
}

impl<'p> EguiSurface<'p> {
    pub fn new(painter: &'p Painter, area: Rect) -> Self {
        let mut stack = TransformStack::default();
        stack.translate(area.min.to_vec2());
        Self {
            painter,
            area,
            stack,
        }
    }

    fn to_screen(&self, pos: Pos2) -> Pos2 {
        self.stack.current().apply(pos)
    }

    fn stroke(&self, stroke: Stroke) -> Stroke {
        Stroke::new(self.stack.current().apply_len(stroke.width), stroke.color)
    }
}

impl Surface for EguiSurface<'_> {
    fn clear(&mut self, color: Color32) {
        self.painter.rect_filled(self.area, 0.0, color);
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
        true
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, fill: Color32, stroke: Stroke) {
        let t = self.stack.current();
        self.painter.rect(
            t.apply_rect(rect),
            Rounding::same(t.apply_len(radius)),
            fill,
            self.stroke(stroke),
        );
    }

    fn fill_rect(&mut self, rect: Rect, fill: Color32, stroke: Stroke) {
        let t = self.stack.current();
        self.painter.rect(t.apply_rect(rect), Rounding::ZERO, fill, self.stroke(stroke));
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32, fill: Color32) {
        let t = self.stack.current();
        self.painter
            .circle_filled(t.apply(center), t.apply_len(radius), fill);
    }

    fn text(&mut self, pos: Pos2, align: Align2, text: &str, size: f32, color: Color32) {
        let size = self.stack.current().apply_len(size);
        // Text under en pixel ritas inte
        if size < 1.0 {
            return;
        }
        self.painter.text(
            self.to_screen(pos),
            align,
            text,
            FontId::proportional(size),
            color,
        );
    }

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.painter
            .line_segment([self.to_screen(from), self.to_screen(to)], self.stroke(stroke));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::epaint::{ClippedShape, Shape};
    use egui::{Context, LayerId, RawInput};

    fn paint(draw: impl Fn(&mut EguiSurface<'_>)) -> Vec<Shape> {
        let ctx = Context::default();
        let screen = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
        let input = RawInput {
            screen_rect: Some(screen),
            ..Default::default()
        };
        let output = ctx.run(input, |ctx| {
            let painter = Painter::new(ctx.clone(), LayerId::background(), screen);
            let area = Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(400.0, 300.0));
            let mut surface = EguiSurface::new(&painter, area);
            draw(&mut surface);
        });
        output
            .shapes
            .into_iter()
            .map(|ClippedShape { shape, .. }| shape)
            .collect()
    }

    #[test]
    fn test_shapes_follow_area_and_scale() {
        let shapes = paint(|s| {
            s.scale(2.0);
            s.fill_circle(Pos2::new(10.0, 10.0), 5.0, Color32::RED);
            s.line(Pos2::ZERO, Pos2::new(20.0, 0.0), Stroke::new(1.0, Color32::BLACK));
        });

        assert_eq!(shapes.len(), 2);
        match &shapes[0] {
            Shape::Circle(circle) => {
                assert_eq!(circle.center, Pos2::new(120.0, 70.0));
                assert_eq!(circle.radius, 10.0);
            }
            other => panic!("väntade cirkel, fick {:?}", other),
        }
        match &shapes[1] {
            Shape::LineSegment { points, stroke } => {
                assert_eq!(points[0], Pos2::new(100.0, 50.0));
                assert_eq!(points[1], Pos2::new(140.0, 50.0));
                assert_eq!(stroke.width, 2.0);
            }
            other => panic!("väntade linje, fick {:?}", other),
        }
    }

    #[test]
    fn test_restore_drops_inner_transform() {
        let shapes = paint(|s| {
            s.save();
            s.translate(Vec2::new(30.0, 0.0));
            s.restore();
            s.fill_rect(
                Rect::from_min_size(Pos2::ZERO, Vec2::new(10.0, 10.0)),
                Color32::WHITE,
                Stroke::NONE,
            );
        });

        match shapes.as_slice() {
            [Shape::Rect(rect)] => assert_eq!(rect.rect.min, Pos2::new(100.0, 50.0)),
            other => panic!("väntade en rektangel, fick {:?}", other),
        }
    }

    #[test]
    fn test_tiny_text_is_skipped() {
        let readable = paint(|s| {
            s.text(Pos2::new(5.0, 5.0), Align2::LEFT_TOP, "Jajang", 14.0, Color32::BLACK);
        });
        assert!(matches!(readable.as_slice(), [Shape::Text(_)]));

        let tiny = paint(|s| {
            s.scale(0.05);
            s.text(Pos2::new(5.0, 5.0), Align2::LEFT_TOP, "Jajang", 14.0, Color32::BLACK);
            s.fill_circle(Pos2::new(5.0, 5.0), 40.0, Color32::BLUE);
        });
        assert_eq!(tiny.len(), 1);
        assert!(matches!(tiny[0], Shape::Circle(_)));
    }
}
