use egui::{self, RichText};

use crate::db::Database;
use crate::ui::{
    state::{AppState, ConfirmAction},
    theme::{Colors, Icons},
    View,
};

pub struct ConfirmDialog;

impl ConfirmDialog {
    /// Visar bekräftelsedialog. Returnerar åtgärden om den bekräftades och lyckades.
    pub fn show(ctx: &egui::Context, state: &mut AppState, db: &Database) -> Option<ConfirmAction> {
        if !state.show_confirm_dialog {
            return None;
        }

        let mut result = None;

        egui::Window::new("Konfirmasi")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(300.0);

                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(Icons::DELETE).size(32.0).color(Colors::WARNING));
                    ui.add_space(8.0);
                    ui.label(&state.confirm_dialog_message);
                });

                ui.add_space(16.0);

                ui.horizontal(|ui| {
                    if ui.button("Batal").clicked() {
                        state.close_confirm();
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(RichText::new("Hapus").color(Colors::ERROR)).clicked() {
                            if let Some(action) = state.confirm_dialog_action.clone() {
                                if Self::execute_action(&action, state, db) {
                                    result = Some(action);
                                }
                            }
                            state.close_confirm();
                        }
                    });
                });
            });

        result
    }

    fn execute_action(action: &ConfirmAction, state: &mut AppState, db: &Database) -> bool {
        let outcome = match action {
            ConfirmAction::DeleteMember(id) => db.members().delete(id).map(|_| {
                state.show_success("Anggota keluarga dihapus");
            }),
            ConfirmAction::DeleteFamily(id) => db.families().delete(id).map(|_| {
                state.show_success("Silsilah keluarga dihapus");
                if state.selected_family_id.as_deref() == Some(id.as_str()) {
                    state.selected_family_id = None;
                    state.navigate(View::FamilyList);
                }
            }),
        };

        match outcome {
            Ok(()) => true,
            Err(e) => {
                state.show_error(&format!("Gagal menghapus: {}", e));
                false
            }
        }
    }
}
