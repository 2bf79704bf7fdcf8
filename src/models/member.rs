use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::date::age_between;

/// Roll i familjen. Lagras på medlemmen när den registreras;
/// relationsetiketten är bara visningstext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Head,
    Spouse,
    Child,
    #[default]
    Other,
}

impl MemberRole {
    /// Härled roll från en fri etikett.
    ///
    /// Reglerna prövas i ordning huvud → make/maka → barn, skiftlägesokänsligt,
    /// och första träff vinner. En etikett som matchar både "anak" och "ibu"
    /// blir alltså `Spouse`.
    pub fn infer(label: &str, is_head: bool) -> Self {
        let label = label.to_lowercase();

        if is_head || label.contains("kepala keluarga") || label.contains("ayah") {
            Self::Head
        } else if label.contains("istri") || label.contains("ibu") || label.contains("suami") {
            Self::Spouse
        } else if label.contains("anak") {
            Self::Child
        } else {
            Self::Other
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Head => "Kepala Keluarga",
            Self::Spouse => "Pasangan",
            Self::Child => "Anak",
            Self::Other => "Kerabat",
        }
    }

    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Spouse => "spouse",
            Self::Child => "child",
            Self::Other => "other",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "head" => Self::Head,
            "spouse" => Self::Spouse,
            "child" => Self::Child,
            _ => Self::Other,
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Head, Self::Spouse, Self::Child, Self::Other]
    }
}

/// Etiketter som formuläret erbjuder
pub const RELATIONSHIP_LABELS: &[&str] = &[
    "Istri",
    "Suami",
    "Anak",
    "Cucu",
    "Saudara",
    "Orang Tua",
    "Kakek/Nenek",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: String,
    pub family_id: String,
    pub name: String,
    /// Fri etikett, t.ex. "Ayah", "Istri", "Anak"
    pub relationship: String,
    #[serde(default)]
    pub role: MemberRole,
    #[serde(default)]
    pub is_head: bool,
    pub age: Option<i32>,
    pub birth_date: Option<NaiveDate>,
    /// För make/maka till ett barn: barnets id. Annars förälderns id.
    pub parent_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl FamilyMember {
    /// Ny medlem med roll härledd från etiketten
    pub fn new(family_id: impl Into<String>, name: impl Into<String>, relationship: impl Into<String>) -> Self {
        let relationship = relationship.into();
        Self {
            id: String::new(),
            family_id: family_id.into(),
            name: name.into(),
            role: MemberRole::infer(&relationship, false),
            relationship,
            is_head: false,
            age: None,
            birth_date: None,
            parent_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Ny familjeöverhuvud
    pub fn new_head(family_id: impl Into<String>, name: impl Into<String>, relationship: impl Into<String>) -> Self {
        Self {
            role: MemberRole::Head,
            is_head: true,
            ..Self::new(family_id, name, relationship)
        }
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_role(mut self, role: MemberRole) -> Self {
        self.role = role;
        self.is_head = role == MemberRole::Head;
        self
    }

    /// Överhuvud om flaggan är satt eller rollen säger det
    pub fn is_head_of_family(&self) -> bool {
        self.is_head || self.role == MemberRole::Head
    }

    /// Räkna om ålder från födelsedatum. Utan födelsedatum behålls angiven ålder.
    pub fn calculate_age(&mut self) {
        if let Some(birth) = self.birth_date {
            self.age = age_between(birth, Utc::now().date_naive());
        }
    }

    pub fn age_display(&self) -> String {
        match self.age {
            Some(age) => format!("{} tahun", age),
            None => "-".to_string(),
        }
    }

    pub fn status_display(&self) -> &'static str {
        if self.is_head_of_family() {
            "Kepala Keluarga"
        } else {
            "Anggota"
        }
    }

    pub fn validate(&self) -> Result<(), MemberValidationError> {
        if self.name.trim().is_empty() {
            return Err(MemberValidationError::MissingName);
        }

        if self.family_id.is_empty() {
            return Err(MemberValidationError::MissingFamily);
        }

        if let Some(age) = self.age {
            if !(0..=150).contains(&age) {
                return Err(MemberValidationError::InvalidAge(age));
            }
        }

        if self.parent_id.as_deref() == Some(self.id.as_str()) && !self.id.is_empty() {
            return Err(MemberValidationError::SelfParent);
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MemberValidationError {
    #[error("Namn krävs")]
    MissingName,
    #[error("Medlemmen saknar familj")]
    MissingFamily,
    #[error("Ogiltig ålder: {0}")]
    InvalidAge(i32),
    #[error("En medlem kan inte länkas till sig själv")]
    SelfParent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_role_from_label() {
        assert_eq!(MemberRole::infer("Ayah", false), MemberRole::Head);
        assert_eq!(MemberRole::infer("Kepala Keluarga", false), MemberRole::Head);
        assert_eq!(MemberRole::infer("Istri", false), MemberRole::Spouse);
        assert_eq!(MemberRole::infer("IBU", false), MemberRole::Spouse);
        assert_eq!(MemberRole::infer("suami", false), MemberRole::Spouse);
        assert_eq!(MemberRole::infer("Anak", false), MemberRole::Child);
        assert_eq!(MemberRole::infer("Cucu", false), MemberRole::Other);
        assert_eq!(MemberRole::infer("Saudara", true), MemberRole::Head);
    }

    #[test]
    fn test_infer_first_rule_wins() {
        // Matchar både "anak" och "ibu"; make/maka-regeln prövas först
        assert_eq!(MemberRole::infer("Anak Ibu", false), MemberRole::Spouse);
        assert_eq!(MemberRole::infer("Ayah Anak", false), MemberRole::Head);
    }

    #[test]
    fn test_role_db_roundtrip_defaults_to_other() {
        for role in MemberRole::all() {
            assert_eq!(MemberRole::from_db_str(role.as_db_str()), *role);
        }
        assert_eq!(MemberRole::from_db_str("okänd"), MemberRole::Other);
    }

    #[test]
    fn test_validation() {
        let valid = FamilyMember::new("fam1", "Naisa", "Anak").with_age(15);
        assert!(valid.validate().is_ok());

        let nameless = FamilyMember::new("fam1", "  ", "Anak");
        assert_eq!(nameless.validate(), Err(MemberValidationError::MissingName));

        let too_old = FamilyMember::new("fam1", "Opa", "Kakek/Nenek").with_age(151);
        assert_eq!(too_old.validate(), Err(MemberValidationError::InvalidAge(151)));

        let mut looped = FamilyMember::new("fam1", "Siti", "Istri");
        looped.id = "9".into();
        looped.parent_id = Some("9".into());
        assert_eq!(looped.validate(), Err(MemberValidationError::SelfParent));
    }

    #[test]
    fn test_calculate_age_keeps_entered_age_without_birth_date() {
        let mut member = FamilyMember::new("fam1", "Rizki", "Anak").with_age(20);
        member.calculate_age();
        assert_eq!(member.age, Some(20));

        member.birth_date = NaiveDate::from_ymd_opt(2000, 1, 1);
        member.calculate_age();
        assert!(member.age.unwrap() >= 24);
    }
}
