//! Huvudapplikation för Silsilah

use anyhow::{Context, Result};
use eframe::egui;
use std::sync::Arc;

use crate::db::Database;
use crate::models::AppSettings;
use crate::ui::{
    modals::{ConfirmDialog, FamilyFormModal, MemberFormModal},
    state::{AppState, ConfirmAction},
    theme::{configure_style, Colors, Icons},
    views::{FamilyListView, FamilyTreeView},
    StatusType, View,
};
use crate::utils::path::get_database_path;

/// Huvudapplikation
pub struct SilsilahApp {
    db: Arc<Database>,
    state: AppState,
    app_settings: AppSettings,

    // Vyer
    family_list: FamilyListView,
    family_tree: FamilyTreeView,

    // Modals
    member_form_modal: MemberFormModal,
    family_form_modal: FamilyFormModal,

    style_initialized: bool,
}

impl SilsilahApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Result<Self> {
        let app_settings = AppSettings::load();

        let db_path = get_database_path();
        tracing::info!("Öppnar databas: {:?}", db_path);

        let db = match Database::open(&db_path).and_then(|db| db.migrate().map(|_| db)) {
            Ok(db) => db,
            Err(e) => {
                tracing::error!("Kunde inte öppna databas: {}", e);
                // Reserv: in-memory, inget sparas
                Database::open_in_memory().context("Kunde inte skapa in-memory databas")?
            }
        };

        let mut state = AppState::new();
        state.dark_mode = app_settings.dark_mode;

        Ok(Self {
            db: Arc::new(db),
            state,
            family_list: FamilyListView::new(),
            family_tree: FamilyTreeView::new(&app_settings),
            member_form_modal: MemberFormModal::new(),
            family_form_modal: FamilyFormModal::new(),
            app_settings,
            style_initialized: false,
        })
    }

    /// Uppdatera vyn som just blev aktiv
    fn handle_view_change(&mut self, new_view: View) {
        match new_view {
            View::FamilyList => self.family_list.mark_needs_refresh(),
            View::FamilyTree => self.family_tree.mark_needs_refresh(),
        }
    }

    fn toggle_dark_mode(&mut self, ctx: &egui::Context) {
        self.state.dark_mode = !self.state.dark_mode;
        configure_style(ctx, self.state.dark_mode);

        self.app_settings.dark_mode = self.state.dark_mode;
        if let Err(e) = self.app_settings.save() {
            tracing::warn!("Kunde inte spara inställningar: {}", e);
        }
    }

    fn refresh_views(&mut self) {
        self.family_list.mark_needs_refresh();
        self.family_tree.mark_needs_refresh();
    }
}

impl eframe::App for SilsilahApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.style_initialized {
            configure_style(ctx, self.state.dark_mode);
            self.style_initialized = true;
        }

        self.state.clear_old_status();

        let view_before = self.state.current_view;

        // Topbar
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Silsilah");
                ui.separator();

                if ui
                    .selectable_label(
                        self.state.current_view == View::FamilyList,
                        format!("{} Keluarga", Icons::PEOPLE),
                    )
                    .clicked()
                {
                    self.state.navigate(View::FamilyList);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mode_icon = if self.state.dark_mode { "🌙" } else { "☀" };
                    if ui.button(mode_icon).on_hover_text("Mode gelap").clicked() {
                        self.toggle_dark_mode(ctx);
                    }

                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                            .small()
                            .weak(),
                    );
                });
            });
        });

        // Statusbar
        if let Some(ref status) = self.state.status_message {
            egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                let color = match status.status_type {
                    StatusType::Success => Colors::SUCCESS,
                    StatusType::Error => Colors::ERROR,
                    StatusType::Warning => Colors::WARNING,
                    StatusType::Info => Colors::INFO,
                };
                ui.colored_label(color, &status.text);
            });
        }

        // Huvudinnehåll
        egui::CentralPanel::default().show(ctx, |ui| match self.state.current_view {
            View::FamilyList => self.family_list.show(ui, &mut self.state, &self.db),
            View::FamilyTree => self.family_tree.show(ui, &mut self.state, &self.db),
        });

        // Modals
        if self.state.show_family_form && self.family_form_modal.show(ctx, &mut self.state, &self.db) {
            self.state.show_family_form = false;
            self.refresh_views();
        }

        if self.state.show_member_form {
            match self.state.selected_family_id.clone() {
                Some(family_id) => {
                    if self.member_form_modal.show(
                        ctx,
                        &mut self.state,
                        &self.db,
                        &family_id,
                        self.family_tree.store(),
                    ) {
                        self.state.close_member_form();
                        if let Some(member) = self.member_form_modal.take_saved() {
                            self.family_tree.apply_saved_member(member);
                            self.family_list.mark_needs_refresh();
                        }
                    }
                }
                None => self.state.close_member_form(),
            }
        }

        match ConfirmDialog::show(ctx, &mut self.state, &self.db) {
            Some(ConfirmAction::DeleteMember(id)) => {
                self.family_tree.apply_removed_member(&id);
                self.family_list.mark_needs_refresh();
            }
            Some(ConfirmAction::DeleteFamily(_)) => self.refresh_views(),
            None => {}
        }

        if self.state.current_view != view_before {
            self.handle_view_change(self.state.current_view);
        }
    }
}
