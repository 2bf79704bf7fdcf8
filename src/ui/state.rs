use crate::models::{FamilyMember, MemberRole};
use crate::utils::date::{format_date, parse_date};

/// Aktuell vy i applikationen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    FamilyList,
    FamilyTree,
}

/// Centraliserat applikationstillstånd
#[derive(Debug, Default)]
pub struct AppState {
    /// Aktuell vy
    pub current_view: View,

    /// Vald familj (för trädvyn)
    pub selected_family_id: Option<String>,

    /// Visar medlemsformulär
    pub show_member_form: bool,

    /// Medlem som redigeras (None = ny medlem)
    pub editing_member_id: Option<String>,

    /// Visar formulär för ny familj
    pub show_family_form: bool,

    /// Visar bekräftelsedialog
    pub show_confirm_dialog: bool,
    pub confirm_dialog_message: String,
    pub confirm_dialog_action: Option<ConfirmAction>,

    /// Statusmeddelande
    pub status_message: Option<StatusMessage>,

    /// Dark mode
    pub dark_mode: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigera till vy
    pub fn navigate(&mut self, view: View) {
        self.current_view = view;
    }

    /// Öppna trädet för en familj
    pub fn open_family(&mut self, family_id: &str) {
        self.selected_family_id = Some(family_id.to_string());
        self.current_view = View::FamilyTree;
    }

    /// Öppna medlemsformulär för ny medlem
    pub fn open_new_member_form(&mut self) {
        self.editing_member_id = None;
        self.show_member_form = true;
    }

    /// Öppna medlemsformulär för redigering
    pub fn open_edit_member_form(&mut self, member_id: &str) {
        self.editing_member_id = Some(member_id.to_string());
        self.show_member_form = true;
    }

    /// Stäng medlemsformulär
    pub fn close_member_form(&mut self) {
        self.show_member_form = false;
        self.editing_member_id = None;
    }

    /// Visa bekräftelsedialog
    pub fn show_confirm(&mut self, message: &str, action: ConfirmAction) {
        self.confirm_dialog_message = message.to_string();
        self.confirm_dialog_action = Some(action);
        self.show_confirm_dialog = true;
    }

    /// Stäng bekräftelsedialog
    pub fn close_confirm(&mut self) {
        self.show_confirm_dialog = false;
        self.confirm_dialog_action = None;
    }

    /// Visa statusmeddelande
    pub fn show_status(&mut self, message: &str, status_type: StatusType) {
        self.status_message = Some(StatusMessage {
            text: message.to_string(),
            status_type,
            created_at: std::time::Instant::now(),
        });
    }

    /// Visa framgångsmeddelande
    pub fn show_success(&mut self, message: &str) {
        self.show_status(message, StatusType::Success);
    }

    /// Visa felmeddelande
    pub fn show_error(&mut self, message: &str) {
        self.show_status(message, StatusType::Error);
    }

    /// Rensa statusmeddelande om det är för gammalt
    pub fn clear_old_status(&mut self) {
        if let Some(ref status) = self.status_message {
            if status.created_at.elapsed().as_secs() > 5 {
                self.status_message = None;
            }
        }
    }
}

/// Typ av bekräftelseåtgärd
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteMember(String),
    DeleteFamily(String),
}

/// Statusmeddelande
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub status_type: StatusType,
    pub created_at: std::time::Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    Success,
    Error,
    Warning,
    Info,
}

/// Formulärdata för familjemedlem
#[derive(Debug, Clone, PartialEq)]
pub struct MemberFormData {
    pub name: String,
    pub relationship: String,
    pub role: MemberRole,
    /// Sätts när användaren själv väljer roll, annars följer rollen etiketten
    pub role_locked: bool,
    pub age: String,
    pub birth_date: String,
    pub parent_id: Option<String>,
}

impl Default for MemberFormData {
    fn default() -> Self {
        Self {
            name: String::new(),
            relationship: String::new(),
            role: MemberRole::Other,
            role_locked: false,
            age: String::new(),
            birth_date: String::new(),
            parent_id: None,
        }
    }
}

impl MemberFormData {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn from_member(member: &FamilyMember) -> Self {
        Self {
            name: member.name.clone(),
            relationship: member.relationship.clone(),
            role: member.role,
            role_locked: true,
            age: member.age.map(|a| a.to_string()).unwrap_or_default(),
            birth_date: member.birth_date.map(format_date).unwrap_or_default(),
            parent_id: member.parent_id.clone(),
        }
    }

    /// Uppdatera rollen från etiketten om användaren inte valt en själv
    pub fn sync_role_from_label(&mut self) {
        if !self.role_locked {
            self.role = MemberRole::infer(&self.relationship, false);
        }
    }

    /// Bara make/maka kan kopplas till ett barn
    pub fn can_link_to_child(&self) -> bool {
        self.role == MemberRole::Spouse
    }

    /// Skriv formulärets värden till en medlem (fullständig ersättning)
    pub fn apply_to(&self, member: &mut FamilyMember) -> Result<(), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Nama wajib diisi".to_string());
        }

        let age = match self.age.trim() {
            "" => None,
            text => Some(
                text.parse::<i32>()
                    .map_err(|_| format!("Umur tidak valid: {}", text))?,
            ),
        };

        let birth_date = match self.birth_date.trim() {
            "" => None,
            text => Some(parse_date(text).ok_or_else(|| format!("Tanggal lahir tidak valid: {}", text))?),
        };

        // Formuläret styr bara make/maka-länken, andra länkar lämnas orörda
        let was_spouse = member.role == MemberRole::Spouse;

        member.name = name.to_string();
        member.relationship = self.relationship.trim().to_string();
        member.role = self.role;
        member.is_head = self.role == MemberRole::Head;
        member.age = age;
        member.birth_date = birth_date;
        if self.can_link_to_child() {
            member.parent_id = self.parent_id.clone().filter(|id| !id.is_empty());
        } else if was_spouse {
            member.parent_id = None;
        }

        Ok(())
    }
}

/// Formulärdata för ny familj (anges via dess överhuvud)
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyFormData {
    pub head_name: String,
    pub relationship: String,
    pub age: String,
}

impl Default for FamilyFormData {
    fn default() -> Self {
        Self {
            head_name: String::new(),
            relationship: "Kepala Keluarga".to_string(),
            age: String::new(),
        }
    }
}

impl FamilyFormData {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn parsed_age(&self) -> Result<Option<i32>, String> {
        match self.age.trim() {
            "" => Ok(None),
            text => text
                .parse::<i32>()
                .map(Some)
                .map_err(|_| format!("Umur tidak valid: {}", text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_follows_label_until_locked() {
        let mut form = MemberFormData::default();
        form.relationship = "Istri".into();
        form.sync_role_from_label();
        assert_eq!(form.role, MemberRole::Spouse);

        form.role = MemberRole::Other;
        form.role_locked = true;
        form.relationship = "Anak".into();
        form.sync_role_from_label();
        assert_eq!(form.role, MemberRole::Other);
    }

    #[test]
    fn test_apply_to_replaces_fields() {
        let mut member = FamilyMember::new("fam1", "Siti", "Istri").with_parent("8");
        let mut form = MemberFormData::from_member(&member);
        form.name = "  Siti Aminah ".into();
        form.age = "24".into();
        form.apply_to(&mut member).unwrap();

        assert_eq!(member.name, "Siti Aminah");
        assert_eq!(member.age, Some(24));
        assert_eq!(member.parent_id.as_deref(), Some("8"));

        // Utan make/maka-roll försvinner länken
        form.role = MemberRole::Child;
        form.apply_to(&mut member).unwrap();
        assert!(member.parent_id.is_none());
    }

    #[test]
    fn test_apply_to_keeps_descendant_link() {
        let mut grandchild = FamilyMember::new("fam1", "Raka", "Cucu")
            .with_role(MemberRole::Child)
            .with_parent("8");
        let mut form = MemberFormData::from_member(&grandchild);
        form.age = "3".into();
        form.apply_to(&mut grandchild).unwrap();

        assert_eq!(grandchild.age, Some(3));
        assert_eq!(grandchild.parent_id.as_deref(), Some("8"));

        // Byte till Övrig behåller också länken
        form.role = MemberRole::Other;
        form.apply_to(&mut grandchild).unwrap();
        assert_eq!(grandchild.parent_id.as_deref(), Some("8"));
    }

    #[test]
    fn test_apply_to_rejects_bad_input() {
        let mut member = FamilyMember::new("fam1", "Naisa", "Anak");
        let mut form = MemberFormData::from_member(&member);

        form.age = "lima belas".into();
        assert!(form.apply_to(&mut member).is_err());

        form.age = String::new();
        form.name = " ".into();
        assert!(form.apply_to(&mut member).is_err());
        assert_eq!(member.name, "Naisa");
    }

    #[test]
    fn test_family_form_age() {
        let mut form = FamilyFormData::default();
        assert_eq!(form.relationship, "Kepala Keluarga");
        assert_eq!(form.parsed_age(), Ok(None));
        form.age = "50".into();
        assert_eq!(form.parsed_age(), Ok(Some(50)));
        form.age = "x".into();
        assert!(form.parsed_age().is_err());
    }
}
