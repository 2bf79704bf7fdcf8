use egui::{self, RichText};

use crate::db::Database;
use crate::ui::{
    state::{AppState, FamilyFormData},
    theme::Colors,
};

/// Ny familj skapas genom att ange dess överhuvud
pub struct FamilyFormModal {
    form_data: FamilyFormData,
    error_message: Option<String>,
}

impl Default for FamilyFormModal {
    fn default() -> Self {
        Self::new()
    }
}

impl FamilyFormModal {
    pub fn new() -> Self {
        Self {
            form_data: FamilyFormData::default(),
            error_message: None,
        }
    }

    /// Visar modalen och returnerar true om den ska stängas
    pub fn show(&mut self, ctx: &egui::Context, state: &mut AppState, db: &Database) -> bool {
        let mut should_close = false;

        egui::Window::new("Tambah Silsilah Keluarga")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(360.0);

                egui::Grid::new("family_form_grid")
                    .num_columns(2)
                    .spacing([8.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("Nama Kepala Keluarga:");
                        ui.text_edit_singleline(&mut self.form_data.head_name);
                        ui.end_row();

                        ui.label("Hubungan:");
                        ui.text_edit_singleline(&mut self.form_data.relationship);
                        ui.end_row();

                        ui.label("Umur:");
                        ui.add(egui::TextEdit::singleline(&mut self.form_data.age).desired_width(60.0));
                        ui.end_row();
                    });

                if let Some(ref error) = self.error_message {
                    ui.add_space(8.0);
                    ui.label(RichText::new(error).color(Colors::ERROR));
                }

                ui.add_space(16.0);

                ui.horizontal(|ui| {
                    if ui.button("Batal").clicked() {
                        self.reset();
                        should_close = true;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Simpan").clicked() {
                            match self.save(db) {
                                Ok(family_id) => {
                                    self.reset();
                                    should_close = true;
                                    state.show_success("Silsilah keluarga dibuat");
                                    state.open_family(&family_id);
                                }
                                Err(e) => self.error_message = Some(e),
                            }
                        }
                    });
                });
            });

        should_close
    }

    fn save(&self, db: &Database) -> Result<String, String> {
        let age = self.form_data.parsed_age()?;
        let relationship = match self.form_data.relationship.trim() {
            "" => "Kepala Keluarga",
            label => label,
        };

        let (family, _) = db
            .families()
            .create_with_head(&self.form_data.head_name, relationship, age)
            .map_err(|e| e.to_string())?;

        Ok(family.id)
    }

    fn reset(&mut self) {
        self.form_data.clear();
        self.error_message = None;
    }
}
