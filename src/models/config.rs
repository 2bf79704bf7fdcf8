use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::utils::path::get_settings_path;

/// Konstanter för trädlayouten (logiska enheter)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Logisk bredd om ytan inte anger någon
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub parents_y: f32,
    pub children_y: f32,
    pub others_y: f32,
    /// Avstånd mellan föräldrarna
    pub parent_gap: f32,
    /// Avstånd mellan syskon och mellan övriga släktingar
    pub sibling_gap: f32,
    /// Förskjutning för barn och make/maka i ett delpar (±)
    pub couple_offset: f32,
    /// Vertikalt steg per generation
    pub generation_gap: f32,
    pub node_width: f32,
    pub node_height: f32,
    pub corner_radius: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            parents_y: 100.0,
            children_y: 250.0,
            others_y: 450.0,
            parent_gap: 150.0,
            sibling_gap: 150.0,
            couple_offset: 30.0,
            generation_gap: 150.0,
            node_width: 120.0,
            node_height: 80.0,
            corner_radius: 10.0,
        }
    }
}

/// Gränser för zoom och panorering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Relativ ändring per scrollsteg
    pub wheel_step: f32,
    /// Absolut ändring per klick på zoomknapparna
    pub button_step: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 3.0,
            wheel_step: 0.1,
            button_step: 0.1,
        }
    }
}

/// Applikationsinställningar som inte sparas i databasen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub dark_mode: bool,
    pub window_width: f32,
    pub window_height: f32,
    pub layout: LayoutConfig,
    pub view: ViewConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            window_width: 1280.0,
            window_height: 800.0,
            layout: LayoutConfig::default(),
            view: ViewConfig::default(),
        }
    }
}

impl AppSettings {
    /// Ladda från standardsökvägen, defaults om filen saknas eller är trasig
    pub fn load() -> Self {
        Self::load_from(&get_settings_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };

        match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Kunde inte läsa {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&get_settings_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_settings_toml_roundtrip() {
        let mut settings = AppSettings::default();
        settings.dark_mode = true;
        settings.view.max_scale = 4.0;

        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let loaded: AppSettings = toml::from_str(&toml_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let partial = r#"
dark_mode = true

[layout]
children_y = 300.0
"#;
        let loaded: AppSettings = toml::from_str(partial).unwrap();
        assert!(loaded.dark_mode);
        assert_eq!(loaded.layout.children_y, 300.0);
        assert_eq!(loaded.layout.parents_y, 100.0);
        assert_eq!(loaded.view, ViewConfig::default());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut settings = AppSettings::default();
        settings.window_width = 1024.0;
        settings.save_to(&path).unwrap();

        assert_eq!(AppSettings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_or_broken_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert_eq!(AppSettings::load_from(&missing), AppSettings::default());

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "dark_mode = [").unwrap();
        assert_eq!(AppSettings::load_from(&broken), AppSettings::default());
    }
}
