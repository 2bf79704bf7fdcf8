//! Tjänster för Silsilah
//!
//! Innehåller affärslogik som inte hör hemma i UI eller databas.

pub mod export;
pub mod family_graph;
pub mod member_store;
pub mod sample;
pub mod tree_layout;

pub use export::{ExportFormat, ExportResult, ExportService, ImportResult};
pub use family_graph::{FamilyGraph, LabelClassification};
pub use member_store::MemberStore;
pub use tree_layout::{layout_family, Connector, LayoutError, PlacedNode, TreeLayout};
