//! Ritning av ett utlagt familjeträd
//!
//! Hela scenen ritas om varje gång: töm, tillämpa vytransformen, linjer
//! först och noderna ovanpå.

use egui::{pos2, Align2, Color32, Rect, Stroke};

use super::surface::Surface;
use super::transform::ViewTransform;
use crate::models::{LayoutConfig, MemberRole};
use crate::services::{PlacedNode, TreeLayout};

/// Färger och mått för noder och linjer
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub background: Color32,
    pub connector: Stroke,
    pub node_border: Stroke,
    pub corner_radius: f32,
    pub head_fill: Color32,
    pub spouse_fill: Color32,
    pub child_fill: Color32,
    pub other_fill: Color32,
    pub avatar_fill: Color32,
    pub avatar_radius: f32,
    /// Avatarens mitt relativt nodens mitt
    pub avatar_offset_y: f32,
    pub name_color: Color32,
    pub name_size: f32,
    pub name_offset_y: f32,
    pub label_color: Color32,
    pub label_size: f32,
    pub label_offset_y: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Color32::WHITE,
            connector: Stroke::new(2.0, Color32::from_rgb(0x6B, 0x72, 0x80)),
            node_border: Stroke::new(1.0, Color32::from_rgb(0x9C, 0xA3, 0xAF)),
            corner_radius: 10.0,
            head_fill: Color32::from_rgb(0xFE, 0xF3, 0xC7),
            spouse_fill: Color32::from_rgb(0xFC, 0xE7, 0xF3),
            child_fill: Color32::from_rgb(0xDB, 0xEA, 0xFE),
            other_fill: Color32::from_rgb(0xDC, 0xFC, 0xE7),
            avatar_fill: Color32::from_rgb(0xD1, 0xD5, 0xDB),
            avatar_radius: 15.0,
            avatar_offset_y: -15.0,
            name_color: Color32::from_rgb(0x1F, 0x29, 0x37),
            name_size: 12.0,
            name_offset_y: 10.0,
            label_color: Color32::from_rgb(0x6B, 0x72, 0x80),
            label_size: 10.0,
            label_offset_y: 25.0,
        }
    }
}

impl RenderStyle {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            corner_radius: config.corner_radius,
            ..Self::default()
        }
    }

    pub fn fill_for(&self, role: MemberRole) -> Color32 {
        match role {
            MemberRole::Head => self.head_fill,
            MemberRole::Spouse => self.spouse_fill,
            MemberRole::Child => self.child_fill,
            MemberRole::Other => self.other_fill,
        }
    }
}

/// Rita hela scenen. Samma indata ger samma anrop mot ytan.
pub fn render_scene(
    surface: &mut dyn Surface,
    layout: &TreeLayout,
    view: &ViewTransform,
    style: &RenderStyle,
) {
    surface.clear(style.background);

    surface.save();
    surface.translate(view.position);
    surface.scale(view.scale);

    for connector in &layout.connectors {
        surface.line(connector.from, connector.to, style.connector);
    }

    let rounded = surface.supports_rounded_rect();
    for node in &layout.nodes {
        draw_node(surface, node, layout.node_rect(node), rounded, style);
    }

    surface.restore();
}

fn draw_node(
    surface: &mut dyn Surface,
    node: &PlacedNode,
    rect: Rect,
    rounded: bool,
    style: &RenderStyle,
) {
    let fill = style.fill_for(node.role);
    if rounded {
        surface.fill_rounded_rect(rect, style.corner_radius, fill, style.node_border);
    } else {
        surface.fill_rect(rect, fill, style.node_border);
    }

    let center = node.pos;
    surface.fill_circle(
        pos2(center.x, center.y + style.avatar_offset_y),
        style.avatar_radius,
        style.avatar_fill,
    );

    // Baslinjen ligger på y, som i en vanlig textrad
    surface.text(
        pos2(center.x, center.y + style.name_offset_y),
        Align2::CENTER_BOTTOM,
        &node.name,
        style.name_size,
        style.name_color,
    );
    surface.text(
        pos2(center.x, center.y + style.label_offset_y),
        Align2::CENTER_BOTTOM,
        &node.label,
        style.label_size,
        style.label_color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::surface::{DrawCommand, RecordingSurface};
    use crate::models::FamilyMember;
    use crate::services::{layout_family, FamilyGraph};
    use egui::vec2;

    fn member(id: &str, name: &str, relationship: &str) -> FamilyMember {
        let mut m = FamilyMember::new("fam1", name, relationship);
        m.id = id.into();
        m
    }

    fn scenario() -> TreeLayout {
        let mut head = FamilyMember::new_head("fam1", "A", "Ayah");
        head.id = "1".into();
        let members = vec![head, member("2", "B", "Istri"), member("3", "C", "Anak")];
        let graph = FamilyGraph::new(&members, "fam1");
        layout_family(&graph, &LayoutConfig::default(), 800.0).unwrap()
    }

    #[test]
    fn test_connectors_before_nodes() {
        let layout = scenario();
        let mut surface = RecordingSurface::new();
        render_scene(&mut surface, &layout, &ViewTransform::default(), &RenderStyle::default());

        assert!(matches!(surface.commands[0], DrawCommand::Clear(_)));
        assert_eq!(surface.node_count(), 3);
        assert_eq!(surface.line_count(), layout.connectors.len());

        let last_line = surface
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Line { .. }))
            .unwrap();
        let first_node = surface
            .commands
            .iter()
            .position(|c| matches!(c, DrawCommand::RoundedRect { .. }))
            .unwrap();
        assert!(last_line < first_node);
        assert_eq!(surface.save_depth(), 0);
    }

    #[test]
    fn test_role_colors_and_text() {
        let layout = scenario();
        let style = RenderStyle::default();
        let mut surface = RecordingSurface::new();
        render_scene(&mut surface, &layout, &ViewTransform::default(), &style);

        let fills: Vec<Color32> = surface
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::RoundedRect { fill, .. } => Some(*fill),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![style.head_fill, style.spouse_fill, style.child_fill]);

        assert!(surface.commands.contains(&DrawCommand::Text {
            pos: pos2(325.0, 110.0),
            text: "A".into(),
            size: 12.0,
            color: style.name_color,
        }));
        assert!(surface.commands.contains(&DrawCommand::Circle {
            center: pos2(400.0, 235.0),
            radius: 15.0,
            fill: style.avatar_fill,
        }));
    }

    #[test]
    fn test_plain_rect_fallback() {
        let layout = scenario();
        let mut surface = RecordingSurface::without_rounded_rect();
        render_scene(&mut surface, &layout, &ViewTransform::default(), &RenderStyle::default());

        assert_eq!(surface.node_count(), 3);
        assert!(!surface
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::RoundedRect { .. })));
    }

    #[test]
    fn test_view_transform_applies_to_everything() {
        let layout = scenario();
        let view = ViewTransform {
            scale: 2.0,
            position: vec2(10.0, -5.0),
        };
        let mut surface = RecordingSurface::new();
        render_scene(&mut surface, &layout, &view, &RenderStyle::default());

        let first_rect = surface
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::RoundedRect { rect, radius, .. } => Some((*rect, *radius)),
                _ => None,
            })
            .unwrap();
        // Överhuvudet: mitt (325, 100), 120x80
        assert_eq!(first_rect.0.min, pos2(10.0 + 265.0 * 2.0, -5.0 + 60.0 * 2.0));
        assert_eq!(first_rect.1, 20.0);
        assert_eq!(surface.transform(), Default::default());
    }

    #[test]
    fn test_empty_layout_draws_only_background() {
        let mut surface = RecordingSurface::new();
        render_scene(
            &mut surface,
            &TreeLayout::default(),
            &ViewTransform::default(),
            &RenderStyle::default(),
        );

        assert_eq!(surface.commands.len(), 1);
        assert_eq!(surface.node_count(), 0);
        assert_eq!(surface.line_count(), 0);
    }
}
