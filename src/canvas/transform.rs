//! Vytransform (skala + förskjutning) och gesttillstånd

use egui::{Pos2, Vec2};

use crate::models::ViewConfig;

/// Avbildning från logiska enheter till ytans pixlar: `position + p * scale`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub position: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            position: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    pub fn to_screen(&self, logical: Pos2) -> Pos2 {
        Pos2::ZERO + self.position + logical.to_vec2() * self.scale
    }

    pub fn to_logical(&self, screen: Pos2) -> Pos2 {
        Pos2::ZERO + (screen.to_vec2() - self.position) / self.scale
    }
}

/// Pågående gest med det som behövs för nästa steg
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Panning {
        pointer_origin: Pos2,
        start_position: Vec2,
    },
    Pinching {
        last_distance: f32,
    },
}

#[derive(Debug, Clone)]
pub struct TransformController {
    view: ViewTransform,
    state: GestureState,
    config: ViewConfig,
}

impl Default for TransformController {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl TransformController {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            view: ViewTransform::default(),
            state: GestureState::Idle,
            config,
        }
    }

    pub fn view(&self) -> ViewTransform {
        self.view
    }

    pub fn scale(&self) -> f32 {
        self.view.scale
    }

    pub fn position(&self) -> Vec2 {
        self.view.position
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.config.min_scale, self.config.max_scale)
    }

    fn in_range(&self, scale: f32) -> bool {
        (self.config.min_scale..=self.config.max_scale).contains(&scale)
    }

    pub fn begin_pan(&mut self, pointer: Pos2) {
        self.state = GestureState::Panning {
            pointer_origin: pointer,
            start_position: self.view.position,
        };
    }

    /// Flytta relativt gestens start. Returnerar true om vyn ändrades.
    pub fn pan_to(&mut self, pointer: Pos2) -> bool {
        let GestureState::Panning {
            pointer_origin,
            start_position,
        } = self.state
        else {
            return false;
        };

        let position = start_position + (pointer - pointer_origin);
        let changed = position != self.view.position;
        self.view.position = position;
        changed
    }

    pub fn begin_pinch(&mut self, distance: f32) {
        self.state = if distance > 0.0 {
            GestureState::Pinching {
                last_distance: distance,
            }
        } else {
            GestureState::Idle
        };
    }

    /// Zooma med kvoten mot förra avståndet och spara det nya som referens
    pub fn pinch_to(&mut self, distance: f32) -> bool {
        let GestureState::Pinching { last_distance } = self.state else {
            return false;
        };
        if distance <= 0.0 {
            return false;
        }

        let scale = self.clamp(self.view.scale * (distance / last_distance));
        let changed = scale != self.view.scale;
        self.view.scale = scale;
        self.state = GestureState::Pinching {
            last_distance: distance,
        };
        changed
    }

    pub fn end_gesture(&mut self) {
        self.state = GestureState::Idle;
    }

    /// Scrollhjul. Negativ `delta_y` zoomar in. Ett steg som hamnar utanför
    /// intervallet ignoreras helt.
    pub fn wheel(&mut self, delta_y: f32) -> bool {
        if delta_y == 0.0 {
            return false;
        }

        let step = self.config.wheel_step;
        let factor = if delta_y < 0.0 { 1.0 + step } else { 1.0 - step };
        let scale = self.view.scale * factor;

        if !self.in_range(scale) {
            return false;
        }
        self.view.scale = scale;
        true
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_by(self.config.button_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_by(-self.config.button_step)
    }

    fn zoom_by(&mut self, step: f32) -> bool {
        let scale = self.clamp(self.view.scale + step);
        let changed = scale != self.view.scale;
        self.view.scale = scale;
        changed
    }

    pub fn reset(&mut self) {
        self.view = ViewTransform::default();
        self.state = GestureState::Idle;
    }
}
