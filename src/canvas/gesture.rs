//! Indata för ritytan: mus, hjul och pekskärm blir `InputEvent`
//!
//! Koordinater är ytans klientkoordinater i pixlar. Hjulets riktning följer
//! webbläsarens konvention: negativ `delta_y` betyder scroll uppåt.

use std::collections::BTreeMap;

use egui::{Event, Pos2, Rect, Response, TouchId, TouchPhase, Ui, Vec2};

use super::transform::{GestureState, TransformController};

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown(Pos2),
    PointerMove(Pos2),
    PointerUp,
    PointerLeave,
    Wheel { delta_y: f32 },
    /// Alla aktiva fingrar efter händelsen
    TouchStart(Vec<Pos2>),
    TouchMove(Vec<Pos2>),
    TouchEnd(Vec<Pos2>),
    ZoomIn,
    ZoomOut,
    Reset,
}

fn finger_distance(touches: &[Pos2]) -> Option<f32> {
    match touches {
        [a, b, ..] => Some(a.distance(*b)),
        _ => None,
    }
}

impl TransformController {
    /// Tillämpa en händelse. Returnerar true om vyn ändrades.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown(pos) => {
                self.begin_pan(*pos);
                false
            }
            InputEvent::PointerMove(pos) => self.pan_to(*pos),
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                self.end_gesture();
                false
            }
            InputEvent::Wheel { delta_y } => self.wheel(*delta_y),
            InputEvent::TouchStart(touches) => {
                self.start_touches(touches);
                false
            }
            InputEvent::TouchMove(touches) => match (touches.as_slice(), self.state()) {
                ([single], GestureState::Panning { .. }) => self.pan_to(*single),
                ([_], _) => false,
                (_, GestureState::Pinching { .. }) => {
                    finger_distance(touches).map_or(false, |d| self.pinch_to(d))
                }
                _ => {
                    // Andra fingret kom utan egen start
                    self.start_touches(touches);
                    false
                }
            },
            InputEvent::TouchEnd(remaining) => {
                self.start_touches(remaining);
                false
            }
            InputEvent::ZoomIn => self.zoom_in(),
            InputEvent::ZoomOut => self.zoom_out(),
            InputEvent::Reset => {
                self.reset();
                true
            }
        }
    }

    fn start_touches(&mut self, touches: &[Pos2]) {
        match touches {
            [] => self.end_gesture(),
            [single] => self.begin_pan(*single),
            _ => {
                if let Some(distance) = finger_distance(touches) {
                    self.begin_pinch(distance);
                }
            }
        }
    }
}

/// Översätter en egui-ram till `InputEvent`. Håller reda på fingrar per id;
/// så länge något finger är nere ignoreras mushändelser.
#[derive(Debug, Default)]
pub struct EguiInputAdapter {
    touches: BTreeMap<u64, Pos2>,
}

impl EguiInputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    fn snapshot(&self) -> Vec<Pos2> {
        self.touches.values().copied().collect()
    }

    /// Läs ramens indata för ytan `response`
    pub fn collect(&mut self, ui: &Ui, response: &Response) -> Vec<InputEvent> {
        let raw_events = ui.input(|i| i.events.clone());
        let mut events = self.touch_events(&raw_events, response.rect);
        let touch_active = !self.touches.is_empty() || !events.is_empty();

        if !touch_active {
            if response.drag_started() {
                if let Some(pos) = response.interact_pointer_pos() {
                    events.push(InputEvent::PointerDown(pos));
                }
            }
            if response.dragged() {
                if let Some(pos) = response.interact_pointer_pos() {
                    events.push(InputEvent::PointerMove(pos));
                }
            }
            if response.drag_stopped() {
                events.push(InputEvent::PointerUp);
            }
        }

        if response.hovered() {
            // Hjulet tillhör ytan: förbruka det så att omgivande ScrollArea står still
            let scroll_y = ui.input_mut(|i| {
                let y = i.raw_scroll_delta.y;
                i.raw_scroll_delta = Vec2::ZERO;
                i.smooth_scroll_delta = Vec2::ZERO;
                y
            });
            if scroll_y != 0.0 {
                // egui: positivt y är scroll uppåt
                events.push(InputEvent::Wheel { delta_y: -scroll_y });
            }
        }

        events
    }

    fn touch_events(&mut self, raw_events: &[Event], area: Rect) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in raw_events {
            let Event::Touch { id, phase, pos, .. } = event else {
                continue;
            };
            let TouchId(key) = *id;

            match phase {
                TouchPhase::Start => {
                    if !area.contains(*pos) {
                        continue;
                    }
                    self.touches.insert(key, *pos);
                    events.push(InputEvent::TouchStart(self.snapshot()));
                }
                TouchPhase::Move => {
                    let Some(tracked) = self.touches.get_mut(&key) else {
                        continue;
                    };
                    *tracked = *pos;
                    events.push(InputEvent::TouchMove(self.snapshot()));
                }
                TouchPhase::End | TouchPhase::Cancel => {
                    if self.touches.remove(&key).is_some() {
                        events.push(InputEvent::TouchEnd(self.snapshot()));
                    }
                }
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2, TouchDeviceId};

    fn touch(id: u64, phase: TouchPhase, x: f32, y: f32) -> Event {
        Event::Touch {
            device_id: TouchDeviceId(0),
            id: TouchId(id),
            phase,
            pos: pos2(x, y),
            force: None,
        }
    }

    #[test]
    fn test_pointer_drag_pans() {
        let mut controller = TransformController::default();
        controller.handle(&InputEvent::PointerDown(pos2(10.0, 10.0)));
        assert!(controller.handle(&InputEvent::PointerMove(pos2(25.0, 5.0))));
        controller.handle(&InputEvent::PointerLeave);

        assert_eq!(controller.position(), vec2(15.0, -5.0));
        assert!(!controller.handle(&InputEvent::PointerMove(pos2(100.0, 100.0))));
    }

    #[test]
    fn test_two_finger_pinch_then_lift_one_finger() {
        let mut controller = TransformController::default();
        controller.handle(&InputEvent::TouchStart(vec![pos2(0.0, 0.0)]));
        controller.handle(&InputEvent::TouchStart(vec![pos2(0.0, 0.0), pos2(100.0, 0.0)]));
        assert!(matches!(controller.state(), GestureState::Pinching { .. }));

        assert!(controller.handle(&InputEvent::TouchMove(vec![pos2(0.0, 0.0), pos2(200.0, 0.0)])));
        assert!((controller.scale() - 2.0).abs() < 1e-6);

        // Kvarvarande finger panorerar från där det står
        controller.handle(&InputEvent::TouchEnd(vec![pos2(200.0, 0.0)]));
        controller.handle(&InputEvent::TouchMove(vec![pos2(210.0, 20.0)]));
        assert_eq!(controller.position(), vec2(10.0, 20.0));

        controller.handle(&InputEvent::TouchEnd(vec![]));
        assert_eq!(controller.state(), GestureState::Idle);
    }

    #[test]
    fn test_reset_event() {
        let mut controller = TransformController::default();
        controller.handle(&InputEvent::ZoomIn);
        controller.handle(&InputEvent::Wheel { delta_y: -120.0 });
        assert!(controller.handle(&InputEvent::Reset));
        assert_eq!(controller.scale(), 1.0);
        assert_eq!(controller.position(), vec2(0.0, 0.0));
    }

    #[test]
    fn test_adapter_tracks_touches_inside_area() {
        let mut adapter = EguiInputAdapter::new();
        let area = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));

        let events = adapter.touch_events(
            &[
                touch(1, TouchPhase::Start, 10.0, 10.0),
                touch(2, TouchPhase::Start, 900.0, 10.0),
                touch(2, TouchPhase::Move, 910.0, 10.0),
                touch(3, TouchPhase::Start, 110.0, 10.0),
                touch(1, TouchPhase::Move, 20.0, 10.0),
            ],
            area,
        );

        assert_eq!(
            events,
            vec![
                InputEvent::TouchStart(vec![pos2(10.0, 10.0)]),
                InputEvent::TouchStart(vec![pos2(10.0, 10.0), pos2(110.0, 10.0)]),
                InputEvent::TouchMove(vec![pos2(20.0, 10.0), pos2(110.0, 10.0)]),
            ]
        );

        let events = adapter.touch_events(&[touch(3, TouchPhase::Cancel, 0.0, 0.0)], area);
        assert_eq!(events, vec![InputEvent::TouchEnd(vec![pos2(20.0, 10.0)])]);
        assert_eq!(adapter.active_touches(), 1);
    }

    /// En ram med ytan överst i en ScrollArea följd av långt innehåll.
    /// Returnerar ytans händelser och ScrollAreans förskjutning.
    fn scrolled_canvas_frame(
        ctx: &egui::Context,
        adapter: &mut EguiInputAdapter,
        events: Vec<Event>,
    ) -> (Vec<InputEvent>, Vec2) {
        let raw = egui::RawInput {
            screen_rect: Some(Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0))),
            events,
            ..Default::default()
        };

        let mut collected = Vec::new();
        let mut offset = Vec2::ZERO;
        let _ = ctx.run(raw, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let output = egui::ScrollArea::vertical().show(ui, |ui| {
                    let (response, _painter) =
                        ui.allocate_painter(vec2(700.0, 400.0), egui::Sense::click_and_drag());
                    collected = adapter.collect(ui, &response);
                    ui.allocate_space(vec2(700.0, 800.0));
                });
                offset = output.state.offset;
            });
        });

        (collected, offset)
    }

    #[test]
    fn test_wheel_over_canvas_does_not_scroll_page() {
        let ctx = egui::Context::default();
        let mut adapter = EguiInputAdapter::new();
        let hover = Event::PointerMoved(pos2(200.0, 200.0));

        scrolled_canvas_frame(&ctx, &mut adapter, vec![hover.clone()]);
        let (events, _) = scrolled_canvas_frame(
            &ctx,
            &mut adapter,
            vec![
                hover.clone(),
                Event::MouseWheel {
                    unit: egui::MouseWheelUnit::Point,
                    delta: vec2(0.0, -50.0),
                    modifiers: egui::Modifiers::NONE,
                },
            ],
        );
        assert!(matches!(events.as_slice(), [InputEvent::Wheel { delta_y }] if *delta_y > 0.0));

        // Ytterligare ramar så att en utjämnad scroll hinner verka
        let mut offset = Vec2::ZERO;
        for _ in 0..3 {
            offset = scrolled_canvas_frame(&ctx, &mut adapter, vec![hover.clone()]).1;
        }
        assert_eq!(offset, Vec2::ZERO);
    }
}
