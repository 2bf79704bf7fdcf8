use egui::{self, RichText};

use crate::db::Database;
use crate::models::FamilySummary;
use crate::services::{sample, ExportService};
use crate::ui::{
    state::{AppState, ConfirmAction},
    theme::{Colors, Icons},
};
use crate::utils::path::display_path;

/// Registret över alla familjer
pub struct FamilyListView {
    families_cache: Vec<FamilySummary>,
    needs_refresh: bool,
}

impl Default for FamilyListView {
    fn default() -> Self {
        Self::new()
    }
}

impl FamilyListView {
    pub fn new() -> Self {
        Self {
            families_cache: Vec::new(),
            needs_refresh: true,
        }
    }

    pub fn mark_needs_refresh(&mut self) {
        self.needs_refresh = true;
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, db: &Database) {
        if self.needs_refresh {
            self.refresh(state, db);
            self.needs_refresh = false;
        }

        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.heading(format!("{} Silsilah Keluarga", Icons::PEOPLE));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(format!("{} Tambah Keluarga", Icons::ADD)).clicked() {
                        state.show_family_form = true;
                    }
                    if ui.button(format!("{} Impor JSON", Icons::IMPORT)).clicked() {
                        self.do_import(state, db);
                    }
                });
            });

            ui.add_space(8.0);
            ui.separator();

            if self.families_cache.is_empty() {
                self.show_empty(ui, state, db);
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                let mut to_open = None;
                let mut to_delete = None;

                for summary in &self.families_cache {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.label(RichText::new(summary.family.display_name()).strong().size(16.0));
                                ui.label(
                                    RichText::new(format!("{} anggota", summary.member_count))
                                        .small()
                                        .color(Colors::TEXT_SECONDARY),
                                );
                            });

                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui
                                    .button(RichText::new(Icons::DELETE).color(Colors::ERROR))
                                    .on_hover_text("Hapus silsilah")
                                    .clicked()
                                {
                                    to_delete = Some(summary.family.clone());
                                }
                                if ui.button(format!("{} Lihat Silsilah", Icons::TREE)).clicked() {
                                    to_open = Some(summary.family.id.clone());
                                }
                            });
                        });
                    });
                    ui.add_space(4.0);
                }

                if let Some(id) = to_open {
                    state.open_family(&id);
                }
                if let Some(family) = to_delete {
                    state.show_confirm(
                        &format!("Hapus {} beserta semua anggotanya?", family.display_name()),
                        ConfirmAction::DeleteFamily(family.id),
                    );
                }
            });
        });
    }

    fn show_empty(&mut self, ui: &mut egui::Ui, state: &mut AppState, db: &Database) {
        ui.vertical_centered(|ui| {
            ui.add_space(50.0);
            ui.label(RichText::new("Belum ada silsilah keluarga").color(Colors::TEXT_MUTED));
            ui.add_space(20.0);
            if ui.button("Muat data contoh").clicked() {
                match sample::seed_if_empty(db) {
                    Ok(count) => {
                        state.show_success(&format!("{} keluarga contoh dimuat", count));
                        self.needs_refresh = true;
                    }
                    Err(e) => state.show_error(&format!("Gagal memuat data contoh: {}", e)),
                }
            }
        });
    }

    fn do_import(&mut self, state: &mut AppState, db: &Database) {
        let file_dialog = rfd::FileDialog::new().add_filter("JSON", &["json"]);

        if let Some(path) = file_dialog.pick_file() {
            match ExportService::new(db).import_from_file(&path) {
                Ok(result) => {
                    state.show_success(&format!("{} anggota diimpor dari {}", result.member_count, display_path(&path)));
                    self.needs_refresh = true;
                    state.open_family(&result.family_id);
                }
                Err(e) => state.show_error(&format!("Impor gagal: {}", e)),
            }
        }
    }

    fn refresh(&mut self, state: &mut AppState, db: &Database) {
        match db.families().find_all() {
            Ok(families) => self.families_cache = families,
            Err(e) => {
                tracing::error!("Kunde inte läsa familjer: {}", e);
                state.show_error(&format!("Gagal memuat data: {}", e));
            }
        }
    }
}
