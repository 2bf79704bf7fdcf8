pub mod family_list;
pub mod family_tree;

pub use family_list::FamilyListView;
pub use family_tree::FamilyTreeView;
