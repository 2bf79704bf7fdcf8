//! Trädvy för en familj: rityta med panorering och zoom samt medlemstabell

use egui::{self, vec2, RichText, Sense};

use crate::canvas::{render_scene, EguiInputAdapter, EguiSurface, InputEvent, RenderStyle, TransformController};
use crate::db::Database;
use crate::models::{AppSettings, Family, FamilyMember, LayoutConfig};
use crate::services::{layout_family, ExportFormat, ExportService, FamilyGraph, LayoutError, MemberStore, TreeLayout};
use crate::ui::{
    state::{AppState, ConfirmAction},
    theme::{canvas_background, Colors, Icons},
    View,
};
use crate::utils::path::display_path;

pub struct FamilyTreeView {
    family_id: Option<String>,
    family: Option<Family>,
    /// Namn i rubriken (överhuvud eller make/maka)
    title: String,
    store: MemberStore,
    /// Layout för aktuell bredd, None = räkna om
    layout: Option<Result<TreeLayout, LayoutError>>,
    layout_width: f32,
    layout_config: LayoutConfig,
    controller: TransformController,
    input: EguiInputAdapter,
    needs_refresh: bool,
}

impl FamilyTreeView {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            family_id: None,
            family: None,
            title: String::new(),
            store: MemberStore::new(),
            layout: None,
            layout_width: 0.0,
            layout_config: settings.layout.clone(),
            controller: TransformController::new(settings.view.clone()),
            input: EguiInputAdapter::new(),
            needs_refresh: true,
        }
    }

    pub fn mark_needs_refresh(&mut self) {
        self.needs_refresh = true;
    }

    /// Medlemmarna som visas just nu
    pub fn store(&self) -> &MemberStore {
        &self.store
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, db: &Database) {
        let Some(family_id) = state.selected_family_id.clone() else {
            ui.vertical_centered(|ui| {
                ui.add_space(50.0);
                ui.label(RichText::new("Pilih keluarga terlebih dahulu").color(Colors::TEXT_MUTED));
                ui.add_space(20.0);
                if ui.button(format!("{} Kembali", Icons::ARROW_LEFT)).clicked() {
                    state.navigate(View::FamilyList);
                }
            });
            return;
        };

        if self.needs_refresh || self.family_id.as_deref() != Some(family_id.as_str()) {
            self.refresh(state, db, &family_id);
            self.needs_refresh = false;
        }

        self.show_header(ui, state, db);
        ui.separator();

        self.show_canvas(ui, state);

        ui.add_space(4.0);
        ui.label(
            RichText::new("Gunakan scroll untuk zoom, drag untuk menggeser. Klik dua kali untuk mengedit.")
                .small()
                .color(Colors::TEXT_MUTED),
        );

        ui.add_space(16.0);
        egui::ScrollArea::vertical().show(ui, |ui| {
            self.show_member_table(ui, state, &family_id);
        });
    }

    fn show_header(&mut self, ui: &mut egui::Ui, state: &mut AppState, db: &Database) {
        ui.horizontal(|ui| {
            if ui.button(Icons::ARROW_LEFT).on_hover_text("Kembali").clicked() {
                state.navigate(View::FamilyList);
            }
            ui.heading(format!("{} Pohon Keluarga {}", Icons::TREE, self.title));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.menu_button(format!("{} Ekspor", Icons::EXPORT), |ui| {
                    for format in [ExportFormat::Json, ExportFormat::Csv] {
                        if ui.button(format.display_name()).clicked() {
                            self.do_export(state, db, format);
                            ui.close_menu();
                        }
                    }
                });

                if ui.button(format!("{} Tambah Anggota Keluarga", Icons::ADD)).clicked() {
                    state.open_new_member_form();
                }
            });
        });

        ui.horizontal(|ui| {
            let mut events = Vec::new();
            if ui.button("−").on_hover_text("Perkecil").clicked() {
                events.push(InputEvent::ZoomOut);
            }
            ui.label(format!("{:.0}%", self.controller.scale() * 100.0));
            if ui.button("+").on_hover_text("Perbesar").clicked() {
                events.push(InputEvent::ZoomIn);
            }
            if ui.button(format!("{} Reset Tampilan", Icons::RESET)).clicked() {
                events.push(InputEvent::Reset);
            }
            for event in &events {
                self.controller.handle(event);
            }
        });
    }

    fn show_canvas(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        // Lämna plats åt medlemstabellen under ytan
        let height = self
            .layout_config
            .canvas_height
            .min(ui.available_height() * 0.7)
            .max(200.0);
        let size = vec2(ui.available_width(), height);
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let rect = response.rect;

        if self.layout.is_none() || self.layout_width != rect.width() {
            self.relayout(rect.width());
        }

        let mut changed = false;
        for event in self.input.collect(ui, &response) {
            changed |= self.controller.handle(&event);
        }
        if changed {
            ui.ctx().request_repaint();
        }

        let view = self.controller.view();
        let style = RenderStyle {
            background: canvas_background(state.dark_mode),
            ..RenderStyle::from_config(&self.layout_config)
        };

        match &self.layout {
            Some(Ok(layout)) => {
                let mut surface = EguiSurface::new(&painter, rect);
                render_scene(&mut surface, layout, &view, &style);

                if response.double_clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        let logical = view.to_logical((pos - rect.min).to_pos2());
                        if let Some(node) = layout.node_at(logical) {
                            state.open_edit_member_form(&node.member_id);
                        }
                    }
                }
            }
            Some(Err(e)) => {
                painter.rect_filled(rect, 0.0, style.background);
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    format!("Silsilah tidak dapat digambar: {}", e),
                    egui::FontId::proportional(14.0),
                    Colors::ERROR,
                );
            }
            None => {}
        }
    }

    fn show_member_table(&mut self, ui: &mut egui::Ui, state: &mut AppState, family_id: &str) {
        ui.heading("Anggota Keluarga");
        ui.add_space(8.0);

        if self.store.is_empty() {
            ui.label(RichText::new("Belum ada anggota").color(Colors::TEXT_MUTED));
            return;
        }

        let mut to_edit = None;
        let mut to_delete = None;

        egui::Grid::new("member_table")
            .num_columns(5)
            .striped(true)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Nama").strong());
                ui.label(RichText::new("Hubungan").strong());
                ui.label(RichText::new("Umur").strong());
                ui.label(RichText::new("Status").strong());
                ui.label("");
                ui.end_row();

                for member in self.store.in_family(family_id) {
                    ui.label(&member.name);
                    ui.label(&member.relationship);
                    ui.label(member.age_display());
                    let status = if member.is_head_of_family() {
                        RichText::new(member.status_display()).color(Colors::PRIMARY)
                    } else {
                        RichText::new(member.status_display()).color(Colors::TEXT_SECONDARY)
                    };
                    ui.label(status);

                    ui.horizontal(|ui| {
                        if ui.small_button(format!("{} Edit", Icons::EDIT)).clicked() {
                            to_edit = Some(member.id.clone());
                        }
                        // Överhuvudet tas bort tillsammans med familjen
                        if !member.is_head_of_family()
                            && ui
                                .small_button(RichText::new(format!("{} Hapus", Icons::DELETE)).color(Colors::ERROR))
                                .clicked()
                        {
                            to_delete = Some((member.id.clone(), member.name.clone()));
                        }
                    });
                    ui.end_row();
                }
            });

        if let Some(id) = to_edit {
            state.open_edit_member_form(&id);
        }
        if let Some((id, name)) = to_delete {
            state.show_confirm(
                &format!("Hapus {} dari silsilah?", name),
                ConfirmAction::DeleteMember(id),
            );
        }
    }

    fn do_export(&self, state: &mut AppState, db: &Database, format: ExportFormat) {
        let Some(family) = &self.family else {
            return;
        };

        let filename = ExportService::generate_filename(family, format);
        let file_dialog = rfd::FileDialog::new()
            .set_file_name(&filename)
            .add_filter(format.display_name(), &[format.extension()]);

        if let Some(path) = file_dialog.save_file() {
            match ExportService::new(db).export_to_file(&family.id, format, &path) {
                Ok(result) => {
                    state.show_success(&format!("{} disimpan ke {}", result.summary(), display_path(&path)));
                }
                Err(e) => state.show_error(&format!("Ekspor gagal: {}", e)),
            }
        }
    }

    fn relayout(&mut self, width: f32) {
        let Some(family_id) = self.family_id.as_deref() else {
            return;
        };

        let graph = FamilyGraph::from_store(&self.store, family_id);
        let result = layout_family(&graph, &self.layout_config, width);
        if let Err(e) = &result {
            tracing::warn!("Layout misslyckades för familj {}: {}", family_id, e);
        }

        self.layout = Some(result);
        self.layout_width = width;
    }

    fn refresh(&mut self, state: &mut AppState, db: &Database, family_id: &str) {
        if self.family_id.as_deref() != Some(family_id) {
            self.controller.reset();
        }
        self.family_id = Some(family_id.to_string());
        self.layout = None;

        self.family = match db.families().find_by_id(family_id) {
            Ok(family) => family,
            Err(e) => {
                state.show_error(&format!("Gagal memuat keluarga: {}", e));
                None
            }
        };

        match db.members().find_by_family(family_id) {
            Ok(members) => self.store.replace_all(members),
            Err(e) => {
                tracing::error!("Kunde inte läsa medlemmar: {}", e);
                state.show_error(&format!("Gagal memuat anggota: {}", e));
                self.store.replace_all(Vec::new());
            }
        }

        self.update_title();
    }

    fn update_title(&mut self) {
        let Some(family_id) = self.family_id.as_deref() else {
            self.title.clear();
            return;
        };

        let graph = FamilyGraph::from_store(&self.store, family_id);
        self.title = graph
            .title_name()
            .map(str::to_string)
            .or_else(|| self.family.as_ref().map(|f| f.name.clone()))
            .unwrap_or_default();
    }

    /// Spegla en medlem som just sparats i databasen
    pub fn apply_saved_member(&mut self, member: FamilyMember) {
        if self.family_id.as_deref() != Some(member.family_id.as_str()) {
            self.needs_refresh = true;
            return;
        }

        // Familjen bär överhuvudets namn
        if member.is_head_of_family() {
            if let Some(family) = &mut self.family {
                family.name = member.name.clone();
            }
        }

        self.store.upsert(member);
        self.layout = None;
        self.update_title();
    }

    /// Spegla en medlem som just tagits bort ur databasen
    pub fn apply_removed_member(&mut self, member_id: &str) {
        if self.store.remove(member_id).is_some() {
            self.layout = None;
            self.update_title();
        }
    }
}
