//! Layout av familjeträdet i logiska enheter
//!
//! Föräldrar på en rad, barnen centrerade under dem, varje barns make/maka
//! bredvid barnet som ett delpar och barnbarn en generation längre ner.
//! Övriga släktingar får en egen rad under den djupaste generationen.
//! Ingen kollisionshantering mellan breda delträd.

use std::collections::HashSet;

use egui::{pos2, vec2, Pos2, Rect, Vec2};

use crate::models::{FamilyMember, LayoutConfig, MemberRole};
use crate::services::FamilyGraph;

/// Avstånd mellan en nod och den horisontella linjen ovanför eller under den
const BAR_DROP: f32 = 20.0;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Länkarna mellan medlemmar bildar en cykel vid {member_id}")]
    Cycle { member_id: String },
}

/// En placerad medlem. `role` är platsens roll (färgen), inte nödvändigtvis den lagrade.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub member_id: String,
    pub name: String,
    pub label: String,
    pub role: MemberRole,
    pub pos: Pos2,
}

/// Rak linje mellan två punkter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub from: Pos2,
    pub to: Pos2,
}

impl Connector {
    fn horizontal(y: f32, x1: f32, x2: f32) -> Self {
        Self {
            from: pos2(x1, y),
            to: pos2(x2, y),
        }
    }

    fn vertical(x: f32, y1: f32, y2: f32) -> Self {
        Self {
            from: pos2(x, y1),
            to: pos2(x, y2),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeLayout {
    pub nodes: Vec<PlacedNode>,
    pub connectors: Vec<Connector>,
    pub node_size: Vec2,
}

impl TreeLayout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, member_id: &str) -> Option<&PlacedNode> {
        self.nodes.iter().find(|n| n.member_id == member_id)
    }

    pub fn node_rect(&self, node: &PlacedNode) -> Rect {
        Rect::from_center_size(node.pos, self.node_size)
    }

    /// Omslutande rektangel för alla noder
    pub fn bounds(&self) -> Option<Rect> {
        self.nodes
            .iter()
            .map(|n| self.node_rect(n))
            .reduce(|acc, rect| acc.union(rect))
    }

    /// Översta noden under en punkt i logiska koordinater
    pub fn node_at(&self, point: Pos2) -> Option<&PlacedNode> {
        self.nodes
            .iter()
            .rev()
            .find(|n| self.node_rect(n).contains(point))
    }
}

/// Beräkna layout för en familj. `canvas_width` är ytans logiska bredd.
pub fn layout_family(
    graph: &FamilyGraph<'_>,
    config: &LayoutConfig,
    canvas_width: f32,
) -> Result<TreeLayout, LayoutError> {
    check_cycles(graph)?;

    let mut builder = LayoutBuilder {
        graph,
        config,
        layout: TreeLayout {
            node_size: vec2(config.node_width, config.node_height),
            ..TreeLayout::default()
        },
        visited: HashSet::new(),
        deepest_y: None,
    };

    let center_x = canvas_width / 2.0;
    builder.place_parents(center_x);

    let children = graph.children();
    if !children.is_empty() {
        builder.place_generation(children, center_x, config.children_y)?;
    }

    builder.place_others(center_x);

    tracing::debug!(
        "Layout för {}: {} noder, {} linjer",
        graph.family_id(),
        builder.layout.nodes.len(),
        builder.layout.connectors.len()
    );

    Ok(builder.layout)
}

/// Följ varje medlems länkkedja inom familjen och avbryt om den går runt
fn check_cycles(graph: &FamilyGraph<'_>) -> Result<(), LayoutError> {
    for start in graph.members() {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut current = Some(*start);

        while let Some(member) = current {
            if !seen.insert(member.id.as_str()) {
                return Err(LayoutError::Cycle {
                    member_id: member.id.clone(),
                });
            }
            current = member.parent_id.as_deref().and_then(|id| graph.get(id));
        }
    }
    Ok(())
}

struct LayoutBuilder<'g, 'a> {
    graph: &'g FamilyGraph<'a>,
    config: &'g LayoutConfig,
    layout: TreeLayout,
    visited: HashSet<String>,
    /// Y för den lägsta rad som har fått barn eller ättlingar
    deepest_y: Option<f32>,
}

impl LayoutBuilder<'_, '_> {
    fn push_node(&mut self, member: &FamilyMember, role: MemberRole, x: f32, y: f32) {
        self.layout.nodes.push(PlacedNode {
            member_id: member.id.clone(),
            name: member.name.clone(),
            label: member.relationship.clone(),
            role,
            pos: pos2(x, y),
        });
    }

    fn push(&mut self, connector: Connector) {
        self.layout.connectors.push(connector);
    }

    fn place_parents(&mut self, center_x: f32) {
        let config = self.config;
        let y = config.parents_y;
        let bar_y = y + config.node_height / 2.0 + BAR_DROP;
        let has_children = !self.graph.children().is_empty();

        match (self.graph.head(), self.graph.spouse()) {
            (Some(head), Some(spouse)) => {
                let half = config.parent_gap / 2.0;
                self.push(Connector::horizontal(bar_y, center_x - half, center_x + half));
                if has_children {
                    self.push(Connector::vertical(center_x, bar_y, config.children_y - BAR_DROP));
                }
                self.push_node(head, MemberRole::Head, center_x - half, y);
                self.push_node(spouse, MemberRole::Spouse, center_x + half, y);
            }
            (Some(single), None) | (None, Some(single)) => {
                if has_children {
                    self.push(Connector::vertical(center_x, bar_y, config.children_y - BAR_DROP));
                }
                let role = if single.is_head_of_family() {
                    MemberRole::Head
                } else {
                    MemberRole::Spouse
                };
                self.push_node(single, role, center_x, y);
            }
            (None, None) => {}
        }
    }

    /// Placera en syskonrad centrerad kring `center_x` och fortsätt nedåt
    fn place_generation(
        &mut self,
        members: &[&FamilyMember],
        center_x: f32,
        y: f32,
    ) -> Result<(), LayoutError> {
        let config = self.config;
        let count = members.len();
        let span = (count as f32 - 1.0) * config.sibling_gap;

        if count > 1 {
            self.push(Connector::horizontal(
                y - BAR_DROP,
                center_x - span / 2.0,
                center_x + span / 2.0,
            ));
        }
        self.deepest_y = Some(self.deepest_y.map_or(y, |d| d.max(y)));

        for (index, member) in members.iter().enumerate() {
            if !self.visited.insert(member.id.clone()) {
                return Err(LayoutError::Cycle {
                    member_id: member.id.clone(),
                });
            }

            let slot_x = center_x + (index as f32 - (count as f32 - 1.0) / 2.0) * config.sibling_gap;
            self.push(Connector::vertical(slot_x, y - BAR_DROP, y));

            match self.graph.spouse_of(&member.id) {
                Some(spouse) => {
                    let offset = config.couple_offset;
                    self.push(Connector::horizontal(
                        y + config.node_height / 2.0,
                        slot_x - offset,
                        slot_x + offset,
                    ));
                    self.push_node(member, MemberRole::Child, slot_x - offset, y);
                    self.push_node(spouse, MemberRole::Spouse, slot_x + offset, y);
                }
                None => self.push_node(member, MemberRole::Child, slot_x, y),
            }

            let descendants = self.graph.children_of(&member.id);
            if !descendants.is_empty() {
                let next_y = y + config.generation_gap;
                self.push(Connector::vertical(
                    slot_x,
                    y + config.node_height / 2.0,
                    next_y - BAR_DROP,
                ));
                self.place_generation(&descendants, slot_x, next_y)?;
            }
        }

        Ok(())
    }

    fn place_others(&mut self, center_x: f32) {
        let config = self.config;
        let graph = self.graph;
        let others = graph.others();
        if others.is_empty() {
            return;
        }

        // Behåll avståndet till barnraden även när ättlingar ligger djupare
        let row_gap = config.others_y - config.children_y;
        let y = match self.deepest_y {
            Some(deepest) if deepest > config.children_y => config.others_y.max(deepest + row_gap),
            _ => config.others_y,
        };

        let count = others.len();
        for (index, other) in others.iter().enumerate() {
            let x = center_x + (index as f32 - (count as f32 - 1.0) / 2.0) * config.sibling_gap;
            self.push(Connector::vertical(x, y - config.node_height / 2.0, y));
            self.push_node(other, MemberRole::Other, x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f32 = 800.0;

    fn member(id: &str, name: &str, relationship: &str) -> FamilyMember {
        let mut m = FamilyMember::new("fam1", name, relationship);
        m.id = id.into();
        m
    }

    fn head(id: &str, name: &str) -> FamilyMember {
        let mut m = FamilyMember::new_head("fam1", name, "Ayah");
        m.id = id.into();
        m
    }

    fn layout(members: &[FamilyMember]) -> TreeLayout {
        let graph = FamilyGraph::new(members, "fam1");
        layout_family(&graph, &LayoutConfig::default(), WIDTH).unwrap()
    }

    fn pos(layout: &TreeLayout, id: &str) -> Pos2 {
        layout.node(id).unwrap().pos
    }

    #[test]
    fn test_three_member_scenario() {
        let members = vec![
            head("1", "A"),
            member("2", "B", "Istri"),
            member("3", "C", "Anak"),
        ];
        let layout = layout(&members);

        assert_eq!(pos(&layout, "1"), pos2(325.0, 100.0));
        assert_eq!(pos(&layout, "2"), pos2(475.0, 100.0));
        assert_eq!(pos(&layout, "3"), pos2(400.0, 250.0));

        // Föräldralinje, en lodrät linje från mitten ner och barnets stump
        let vertical_from_parents: Vec<&Connector> = layout
            .connectors
            .iter()
            .filter(|c| c.from.x == 400.0 && c.from.y == 160.0)
            .collect();
        assert_eq!(vertical_from_parents.len(), 1);
        assert_eq!(vertical_from_parents[0].to, pos2(400.0, 230.0));
        assert_eq!(layout.connectors.len(), 3);
    }

    #[test]
    fn test_empty_family_draws_nothing() {
        let layout = layout(&[]);
        assert!(layout.nodes.is_empty());
        assert!(layout.connectors.is_empty());
        assert!(layout.bounds().is_none());
    }

    #[test]
    fn test_single_parent_is_centered() {
        let members = vec![head("1", "A")];
        let layout = layout(&members);

        assert_eq!(pos(&layout, "1"), pos2(400.0, 100.0));
        assert!(layout.connectors.is_empty());
    }

    #[test]
    fn test_children_are_symmetric_under_parents() {
        let members = vec![
            head("1", "A"),
            member("2", "B", "Ibu"),
            member("3", "C", "Anak"),
            member("4", "D", "Anak"),
            member("5", "E", "Anak"),
            member("6", "F", "Anak"),
        ];
        let layout = layout(&members);

        let parents_mid = (pos(&layout, "1").x + pos(&layout, "2").x) / 2.0;
        let children: Vec<f32> = ["3", "4", "5", "6"].iter().map(|id| pos(&layout, id).x).collect();
        let children_mid = children.iter().sum::<f32>() / children.len() as f32;

        assert_eq!(parents_mid, children_mid);
        assert_eq!(children, vec![175.0, 325.0, 475.0, 625.0]);
    }

    #[test]
    fn test_child_spouse_forms_sub_couple() {
        let members = vec![
            head("1", "Bapak Jajang"),
            member("2", "Ibu Iin", "Ibu"),
            member("8", "Andi", "Anak"),
            member("9", "Siti", "Istri").with_parent("8"),
        ];
        let layout = layout(&members);

        assert_eq!(pos(&layout, "8"), pos2(370.0, 250.0));
        assert_eq!(pos(&layout, "9"), pos2(430.0, 250.0));
        assert_eq!(layout.node("9").unwrap().role, MemberRole::Spouse);
        assert!(layout
            .connectors
            .contains(&Connector::horizontal(290.0, 370.0, 430.0)));
    }

    #[test]
    fn test_every_placed_member_drawn_once() {
        let members = vec![
            head("1", "Bapak Jajang"),
            member("2", "Ibu Iin", "Ibu"),
            member("3", "Jajang", "Anak"),
            member("8", "Andi", "Anak"),
            member("9", "Siti", "Istri").with_parent("8"),
            member("10", "Budi", "Cucu").with_parent("8"),
            member("11", "Kakek", "Kakek/Nenek"),
            member("12", "Paman", "Saudara"),
        ];
        let graph = FamilyGraph::new(&members, "fam1");
        let layout = layout_family(&graph, &LayoutConfig::default(), WIDTH).unwrap();

        assert_eq!(layout.nodes.len(), members.len() - graph.unplaced().len());
        let unique: HashSet<&str> = layout.nodes.iter().map(|n| n.member_id.as_str()).collect();
        assert_eq!(unique.len(), layout.nodes.len());
    }

    #[test]
    fn test_grandchildren_push_others_down() {
        let members = vec![
            head("1", "A"),
            member("8", "Andi", "Anak"),
            member("10", "Budi", "Cucu").with_parent("8"),
            member("11", "Kakek", "Kakek/Nenek"),
        ];
        let layout = layout(&members);

        assert_eq!(pos(&layout, "10"), pos2(400.0, 400.0));
        assert_eq!(layout.node("10").unwrap().role, MemberRole::Child);
        assert_eq!(pos(&layout, "11"), pos2(400.0, 600.0));
    }

    #[test]
    fn test_others_row_without_descendants() {
        let members = vec![
            head("1", "A"),
            member("11", "Kakek", "Kakek/Nenek"),
            member("12", "Paman", "Saudara"),
        ];
        let layout = layout(&members);

        assert_eq!(pos(&layout, "11"), pos2(325.0, 450.0));
        assert_eq!(pos(&layout, "12"), pos2(475.0, 450.0));
        assert!(layout
            .connectors
            .contains(&Connector::vertical(325.0, 410.0, 450.0)));
    }

    #[test]
    fn test_cycle_is_reported() {
        let members = vec![
            head("1", "A"),
            member("3", "C", "Anak").with_parent("4"),
            member("4", "D", "Anak").with_parent("3"),
        ];
        let graph = FamilyGraph::new(&members, "fam1");
        let err = layout_family(&graph, &LayoutConfig::default(), WIDTH).unwrap_err();

        assert!(matches!(err, LayoutError::Cycle { .. }));
    }

    #[test]
    fn test_node_at_and_bounds() {
        let members = vec![head("1", "A"), member("2", "B", "Istri")];
        let layout = layout(&members);

        assert_eq!(layout.node_at(pos2(330.0, 110.0)).unwrap().member_id, "1");
        assert!(layout.node_at(pos2(400.0, 100.0)).is_none());

        let bounds = layout.bounds().unwrap();
        assert_eq!(bounds.min, pos2(265.0, 60.0));
        assert_eq!(bounds.max, pos2(535.0, 140.0));
    }
}
