use serde::{Deserialize, Serialize};

/// Ett släktträd i registret. Namnet är överhuvudets namn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: String,
    pub head_id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Family {
    pub fn new(id: impl Into<String>, head_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            head_id: head_id.into(),
            name: name.into(),
            created_at: None,
        }
    }

    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            "Tidak Dikenal".to_string()
        } else {
            format!("Keluarga {}", self.name)
        }
    }
}

/// Familj med medlemsantal (för registerlistan)
#[derive(Debug, Clone)]
pub struct FamilySummary {
    pub family: Family,
    pub member_count: i64,
}
