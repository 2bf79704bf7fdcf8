//! Export och import av en familj (JSON, CSV)

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::db::Database;
use crate::models::{Family, FamilyMember, MemberRole};
use crate::utils::path::sanitize_filename;
use crate::utils::AppError;

const EXPORT_VERSION: u32 = 1;

/// Exportformat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
        }
    }
}

/// En familj med alla medlemmar, som den skrivs till JSON
#[derive(Debug, Serialize)]
pub struct FamilyExport<'a> {
    pub version: u32,
    pub exported_at: String,
    pub family: &'a Family,
    pub members: &'a [FamilyMember],
}

/// Inläst exportfil. Roll får saknas och härleds då från etiketten.
#[derive(Debug, Deserialize)]
struct FamilyImport {
    #[serde(default)]
    version: u32,
    family: Family,
    members: Vec<ImportedMember>,
}

#[derive(Debug, Deserialize)]
struct ImportedMember {
    id: String,
    name: String,
    #[serde(default)]
    relationship: String,
    #[serde(default)]
    role: Option<MemberRole>,
    #[serde(default)]
    is_head: bool,
    #[serde(default)]
    age: Option<i32>,
    #[serde(default)]
    birth_date: Option<NaiveDate>,
    #[serde(default)]
    parent_id: Option<String>,
}

impl ImportedMember {
    fn into_member(self, family_id: &str) -> FamilyMember {
        let role = self
            .role
            .unwrap_or_else(|| MemberRole::infer(&self.relationship, self.is_head));

        let mut member = FamilyMember::new(family_id, self.name, self.relationship).with_role(role);
        member.id = self.id;
        member.is_head = self.is_head || role == MemberRole::Head;
        member.age = self.age;
        member.birth_date = self.birth_date;
        member.parent_id = self.parent_id;
        member
    }
}

/// Export-tjänst
pub struct ExportService<'a> {
    db: &'a Database,
}

impl<'a> ExportService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Generera filnamn för export
    pub fn generate_filename(family: &Family, format: ExportFormat) -> String {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        format!(
            "silsilah_{}_{}.{}",
            sanitize_filename(&family.name.to_lowercase()).replace(' ', "_"),
            timestamp,
            format.extension()
        )
    }

    /// Exportera en familj till fil
    pub fn export_to_file(
        &self,
        family_id: &str,
        format: ExportFormat,
        path: &Path,
    ) -> Result<ExportResult> {
        let family = self
            .db
            .families()
            .find_by_id(family_id)?
            .ok_or_else(|| AppError::not_found(format!("Familj {}", family_id)))?;
        let members = self.db.members().find_by_family(family_id)?;

        let content = match format {
            ExportFormat::Json => Self::family_to_json(&family, &members)?,
            ExportFormat::Csv => Self::members_to_csv(&members),
        };

        std::fs::write(path, &content).context("Kunde inte skriva fil")?;
        tracing::info!("Exporterade familj {} till {:?}", family_id, path);

        Ok(ExportResult {
            format,
            member_count: members.len(),
            file_size: content.len(),
        })
    }

    pub fn family_to_json(family: &Family, members: &[FamilyMember]) -> Result<String> {
        let export = FamilyExport {
            version: EXPORT_VERSION,
            exported_at: Utc::now().to_rfc3339(),
            family,
            members,
        };
        serde_json::to_string_pretty(&export).context("JSON serialisering misslyckades")
    }

    /// Konvertera medlemmar till CSV
    pub fn members_to_csv(members: &[FamilyMember]) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("id,name,relationship,role,is_head,age,birth_date,parent_id\n");

        // Rader
        for m in members {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                Self::csv_escape(&m.id),
                Self::csv_escape(&m.name),
                Self::csv_escape(&m.relationship),
                m.role.as_db_str(),
                m.is_head_of_family(),
                m.age.map(|a| a.to_string()).unwrap_or_default(),
                m.birth_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
                Self::csv_escape(m.parent_id.as_deref().unwrap_or("")),
            ));
        }

        csv
    }

    /// Importera en JSON-export från fil
    pub fn import_from_file(&self, path: &Path) -> Result<ImportResult> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Kunde inte läsa {:?}", path))?;
        self.import_json(&content)
    }

    /// Importera en familj med befintliga id:n. Inget skrivs om familjen
    /// eller något medlems-id redan finns.
    pub fn import_json(&self, content: &str) -> Result<ImportResult> {
        let import: FamilyImport = serde_json::from_str(content).map_err(AppError::from)?;
        if import.version > EXPORT_VERSION {
            tracing::warn!("Exportfil har okänd version {}", import.version);
        }

        let family = import.family;
        let members: Vec<FamilyMember> = import
            .members
            .into_iter()
            .map(|m| m.into_member(&family.id))
            .collect();

        self.check_import(&family, &members)?;

        self.db.families().insert(&family)?;
        if let Err(e) = self.insert_members(&members) {
            // Ta bort det som hann skrivas, medlemmarna följer med
            if let Err(cleanup) = self.db.families().delete(&family.id) {
                tracing::error!("Kunde inte städa upp efter import: {}", cleanup);
            }
            return Err(e);
        }

        tracing::info!("Importerade familj {} med {} medlemmar", family.id, members.len());
        Ok(ImportResult {
            family_id: family.id,
            member_count: members.len(),
        })
    }

    fn check_import(&self, family: &Family, members: &[FamilyMember]) -> Result<()> {
        if self.db.families().find_by_id(&family.id)?.is_some() {
            return Err(AppError::already_exists(format!("Familj {}", family.id)).into());
        }

        let mut ids = HashSet::new();
        for member in members {
            if member.id.trim().is_empty() {
                return Err(AppError::validation(format!("Medlem {} saknar id", member.name)).into());
            }
            if !ids.insert(member.id.as_str()) {
                return Err(AppError::already_exists(format!("Medlem {}", member.id)).into());
            }
            if self.db.members().find_by_id(&member.id)?.is_some() {
                return Err(AppError::already_exists(format!("Medlem {}", member.id)).into());
            }
            member
                .validate()
                .map_err(|e| AppError::validation(format!("{}: {}", member.name, e)))?;
        }

        let heads = members.iter().filter(|m| m.is_head_of_family()).count();
        if heads > 1 {
            return Err(AppError::validation("Familjen har mer än ett överhuvud").into());
        }

        Ok(())
    }

    /// Skriv medlemmarna utan länkar först och sätt länkarna sedan,
    /// så att ordningen i filen inte spelar roll.
    fn insert_members(&self, members: &[FamilyMember]) -> Result<()> {
        let repo = self.db.members();
        let ids: HashSet<&str> = members.iter().map(|m| m.id.as_str()).collect();

        for member in members {
            let mut unlinked = member.clone();
            unlinked.parent_id = None;
            repo.create(&mut unlinked)?;
        }

        for member in members {
            let Some(parent_id) = member.parent_id.as_deref() else {
                continue;
            };
            if !ids.contains(parent_id) {
                tracing::warn!("Släpper länk från {} till okänd medlem {}", member.id, parent_id);
                continue;
            }
            repo.update(&mut member.clone())?;
        }

        Ok(())
    }

    /// Escape CSV-värde
    fn csv_escape(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

/// Resultat av export
#[derive(Debug)]
pub struct ExportResult {
    pub format: ExportFormat,
    pub member_count: usize,
    pub file_size: usize,
}

impl ExportResult {
    pub fn summary(&self) -> String {
        format!(
            "{} exporterad: {} medlemmar, {} bytes",
            self.format.display_name(),
            self.member_count,
            self.file_size
        )
    }
}

/// Resultat av import
#[derive(Debug)]
pub struct ImportResult {
    pub family_id: String,
    pub member_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (Database, String) {
        let db = Database::open_in_memory().unwrap();
        let (family, _) = db
            .families()
            .create_with_head("Bapak Jajang", "Ayah", Some(45))
            .unwrap();

        let mut andi = FamilyMember::new(&family.id, "Andi", "Anak").with_age(25);
        db.members().create(&mut andi).unwrap();
        let mut siti = FamilyMember::new(&family.id, "Siti, S.Pd", "Istri").with_parent(&andi.id);
        db.members().create(&mut siti).unwrap();

        (db, family.id)
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(ExportService::csv_escape("hello"), "hello");
        assert_eq!(ExportService::csv_escape("hello,world"), "\"hello,world\"");
        assert_eq!(
            ExportService::csv_escape("say \"hello\""),
            "\"say \"\"hello\"\"\""
        );
    }

    #[test]
    fn test_generate_filename() {
        let family = Family::new("fam1", "1", "Bapak Jajang");
        let filename = ExportService::generate_filename(&family, ExportFormat::Json);
        assert!(filename.starts_with("silsilah_bapak_jajang_"));
        assert!(filename.ends_with(".json"));
    }

    #[test]
    fn test_members_to_csv() {
        let (db, family_id) = seeded();
        let members = db.members().find_by_family(&family_id).unwrap();

        let csv = ExportService::members_to_csv(&members);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains(",Bapak Jajang,Ayah,head,true,45,,"));
        assert!(lines[3].contains("\"Siti, S.Pd\",Istri,spouse,false"));
    }

    #[test]
    fn test_export_then_import_into_fresh_database() {
        let (db, family_id) = seeded();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("familj.json");

        let result = ExportService::new(&db)
            .export_to_file(&family_id, ExportFormat::Json, &path)
            .unwrap();
        assert_eq!(result.member_count, 3);

        let target = Database::open_in_memory().unwrap();
        let imported = ExportService::new(&target).import_from_file(&path).unwrap();
        assert_eq!(imported.family_id, family_id);
        assert_eq!(imported.member_count, 3);

        let members = target.members().find_by_family(&family_id).unwrap();
        let siti = members.iter().find(|m| m.name.starts_with("Siti")).unwrap();
        let andi = members.iter().find(|m| m.name == "Andi").unwrap();
        assert_eq!(siti.parent_id.as_deref(), Some(andi.id.as_str()));
    }

    #[test]
    fn test_import_rejects_existing_family() {
        let (db, family_id) = seeded();
        let family = db.families().find_by_id(&family_id).unwrap().unwrap();
        let members = db.members().find_by_family(&family_id).unwrap();
        let json = ExportService::family_to_json(&family, &members).unwrap();

        let err = ExportService::new(&db).import_json(&json).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::AlreadyExists(_))
        ));
        assert_eq!(db.members().count_by_family(&family_id).unwrap(), 3);
    }

    #[test]
    fn test_import_infers_missing_roles() {
        let json = r#"{
            "family": { "id": "fam2", "head_id": "5", "name": "Bapak Surya" },
            "members": [
                { "id": "5", "name": "Bapak Surya", "relationship": "Ayah", "age": 50 },
                { "id": "6", "name": "Ibu Lestari", "relationship": "Ibu", "age": 47 },
                { "id": "7", "name": "Rizki", "relationship": "Anak", "age": 20 }
            ]
        }"#;

        let db = Database::open_in_memory().unwrap();
        ExportService::new(&db).import_json(json).unwrap();

        let members = db.members().find_by_family("fam2").unwrap();
        let roles: Vec<MemberRole> = members.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![MemberRole::Head, MemberRole::Spouse, MemberRole::Child]);
        assert!(members[0].is_head);
    }
}
