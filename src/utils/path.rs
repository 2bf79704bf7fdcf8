use std::path::{Path, PathBuf};

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("id", "silsilah", "Silsilah")
}

/// Hämta databassökväg
pub fn get_database_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("silsilah.db"))
        .unwrap_or_else(|| PathBuf::from("silsilah.db"))
}

/// Hämta sökväg till settings.toml
pub fn get_settings_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("settings.toml"))
        .unwrap_or_else(|| PathBuf::from("settings.toml"))
}

/// Normalisera sökväg för visning
pub fn display_path(path: &Path) -> String {
    // Förkorta hemkatalogen till ~
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

/// Skapa ett säkert filnamn från en sträng
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Bapak Jajang"), "Bapak Jajang");
        assert_eq!(sanitize_filename("keluarga/jajang"), "keluarga_jajang");
        assert_eq!(sanitize_filename(" a:b "), "a_b");
    }

    #[test]
    fn test_settings_path_is_toml() {
        let path = get_settings_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
    }
}
