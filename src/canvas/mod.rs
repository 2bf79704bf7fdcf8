//! Ritning och vyhantering för familjeträdet
//!
//! Modulerna här kräver inget fönster: `RecordingSurface` räcker för att
//! rita och `TransformController` drivs av vanliga `InputEvent`.

pub mod egui_surface;
pub mod gesture;
pub mod render;
pub mod surface;
pub mod transform;

pub use egui_surface::EguiSurface;
pub use gesture::{EguiInputAdapter, InputEvent};
pub use render::{render_scene, RenderStyle};
pub use surface::{Affine, DrawCommand, RecordingSurface, Surface, TransformStack};
pub use transform::{GestureState, TransformController, ViewTransform};
