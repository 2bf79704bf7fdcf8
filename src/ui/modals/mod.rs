pub mod confirm_dialog;
pub mod family_form;
pub mod member_form;

pub use confirm_dialog::ConfirmDialog;
pub use family_form::FamilyFormModal;
pub use member_form::MemberFormModal;
