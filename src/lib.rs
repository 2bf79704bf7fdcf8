//! Silsilah - Släktträd för familjer
//!
//! Layout, ritning och panorering/zoom av ett familjeträd, med en native
//! desktop-applikation byggd på egui.

pub mod canvas;
pub mod db;
pub mod models;
pub mod services;
pub mod ui;
pub mod utils;

// Re-exports
pub use canvas::{render_scene, InputEvent, RenderStyle, Surface, TransformController, ViewTransform};
pub use db::Database;
pub use models::*;
pub use services::{layout_family, FamilyGraph, MemberStore, TreeLayout};
pub use ui::{AppState, View};
