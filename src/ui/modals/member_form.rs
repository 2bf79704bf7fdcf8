use egui::{self, RichText};

use crate::db::Database;
use crate::models::{FamilyMember, MemberRole, RELATIONSHIP_LABELS};
use crate::services::MemberStore;
use crate::ui::{
    state::{AppState, MemberFormData},
    theme::Colors,
};

pub struct MemberFormModal {
    form_data: MemberFormData,
    error_message: Option<String>,
    /// Vilken medlem formuläret är ifyllt för (None = ny)
    loaded_for: Option<Option<String>>,
    /// Senast sparade medlem, hämtas av vyn som speglar den
    saved: Option<FamilyMember>,
}

impl Default for MemberFormModal {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberFormModal {
    pub fn new() -> Self {
        Self {
            form_data: MemberFormData::default(),
            error_message: None,
            loaded_for: None,
            saved: None,
        }
    }

    /// Ta medlemmen som sparades när modalen stängdes
    pub fn take_saved(&mut self) -> Option<FamilyMember> {
        self.saved.take()
    }

    /// Visar modalen och returnerar true om den ska stängas
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        state: &mut AppState,
        db: &Database,
        family_id: &str,
        store: &MemberStore,
    ) -> bool {
        let mut should_close = false;

        // Fyll i formuläret en gång per öppning
        if self.loaded_for.as_ref() != Some(&state.editing_member_id) {
            self.form_data = match state.editing_member_id.as_deref().and_then(|id| store.get(id)) {
                Some(member) => MemberFormData::from_member(member),
                None => MemberFormData::default(),
            };
            self.error_message = None;
            self.loaded_for = Some(state.editing_member_id.clone());
        }

        let title = if state.editing_member_id.is_some() {
            "Edit Anggota Keluarga"
        } else {
            "Tambah Anggota Keluarga"
        };

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(420.0);

                egui::Grid::new("member_form_grid")
                    .num_columns(2)
                    .spacing([8.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("Nama:");
                        ui.text_edit_singleline(&mut self.form_data.name);
                        ui.end_row();

                        ui.label("Hubungan:");
                        ui.horizontal(|ui| {
                            let mut label_changed = ui
                                .add(
                                    egui::TextEdit::singleline(&mut self.form_data.relationship)
                                        .desired_width(160.0),
                                )
                                .changed();

                            egui::ComboBox::from_id_salt("member_relationship")
                                .selected_text("Pilih")
                                .show_ui(ui, |ui| {
                                    for label in RELATIONSHIP_LABELS {
                                        if ui
                                            .selectable_label(self.form_data.relationship == *label, *label)
                                            .clicked()
                                        {
                                            self.form_data.relationship = label.to_string();
                                            label_changed = true;
                                        }
                                    }
                                });

                            if label_changed {
                                self.form_data.sync_role_from_label();
                            }
                        });
                        ui.end_row();

                        ui.label("Peran:");
                        egui::ComboBox::from_id_salt("member_role")
                            .selected_text(self.form_data.role.display_name())
                            .show_ui(ui, |ui| {
                                for role in MemberRole::all() {
                                    if ui
                                        .selectable_value(&mut self.form_data.role, *role, role.display_name())
                                        .clicked()
                                    {
                                        self.form_data.role_locked = true;
                                    }
                                }
                            });
                        ui.end_row();

                        ui.label("Umur:");
                        ui.add(egui::TextEdit::singleline(&mut self.form_data.age).desired_width(60.0));
                        ui.end_row();

                        ui.label("Tanggal lahir:");
                        ui.horizontal(|ui| {
                            ui.add(
                                egui::TextEdit::singleline(&mut self.form_data.birth_date)
                                    .desired_width(100.0),
                            );
                            ui.label(RichText::new("YYYY-MM-DD").small().color(Colors::TEXT_MUTED));
                        });
                        ui.end_row();

                        if self.form_data.can_link_to_child() {
                            ui.label("Pasangan dari:");
                            self.show_child_picker(ui, store, family_id, state.editing_member_id.as_deref());
                            ui.end_row();
                        }
                    });

                // Felmeddelande
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
                            match self.save(state, db, family_id, store) {
                                Ok(member) => {
                                    self.reset();
                                    should_close = true;
                                    state.show_success(&format!("{} disimpan", member.name));
                                    self.saved = Some(member);
                                }
                                Err(e) => {
                                    self.error_message = Some(e);
                                }
                            }
                        }
                    });
                });
            });

        should_close
    }

    /// Välj vilket barn en make/maka är gift med
    fn show_child_picker(
        &mut self,
        ui: &mut egui::Ui,
        store: &MemberStore,
        family_id: &str,
        editing_id: Option<&str>,
    ) {
        let children: Vec<&FamilyMember> = store
            .in_family(family_id)
            .filter(|m| m.role == MemberRole::Child && Some(m.id.as_str()) != editing_id)
            .collect();

        let selected_text = self
            .form_data
            .parent_id
            .as_deref()
            .and_then(|id| store.get(id))
            .map(|m| m.name.clone())
            .unwrap_or_else(|| "Tidak ada".to_string());

        egui::ComboBox::from_id_salt("member_parent")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.form_data.parent_id, None, "Tidak ada");
                for child in children {
                    ui.selectable_value(
                        &mut self.form_data.parent_id,
                        Some(child.id.clone()),
                        &child.name,
                    );
                }
            });
    }

    fn save(
        &mut self,
        state: &AppState,
        db: &Database,
        family_id: &str,
        store: &MemberStore,
    ) -> Result<FamilyMember, String> {
        match state.editing_member_id.as_deref() {
            Some(id) => {
                let mut member = store
                    .get(id)
                    .cloned()
                    .ok_or_else(|| format!("Anggota {} tidak ditemukan", id))?;
                self.form_data.apply_to(&mut member)?;
                db.members().update(&mut member).map_err(|e| e.to_string())?;
                tracing::info!("Uppdaterade medlem {}", member.id);
                Ok(member)
            }
            None => {
                let mut member = FamilyMember::new(family_id, "", "");
                self.form_data.apply_to(&mut member)?;
                db.members().create(&mut member).map_err(|e| e.to_string())?;
                Ok(member)
            }
        }
    }

    fn reset(&mut self) {
        self.form_data.clear();
        self.error_message = None;
        self.loaded_for = None;
    }
}
