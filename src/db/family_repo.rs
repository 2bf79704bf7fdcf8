use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

use super::{generate_id, lock};
use crate::models::{Family, FamilyMember, FamilySummary};
use crate::utils::AppError;

pub struct FamilyRepository {
    conn: Arc<Mutex<Connection>>,
}

impl FamilyRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Hämta alla familjer med antal medlemmar
    pub fn find_all(&self) -> Result<Vec<FamilySummary>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT f.id, f.head_id, f.name, f.created_at,
                    (SELECT COUNT(*) FROM family_members m WHERE m.family_id = f.id)
             FROM families f
             ORDER BY f.rowid",
        )?;

        let families = stmt
            .query_map([], |row| {
                Ok(FamilySummary {
                    family: Self::row_to_family(row),
                    member_count: row.get(4).unwrap_or(0),
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(families)
    }

    /// Hämta familj via ID
    pub fn find_by_id(&self, id: &str) -> Result<Option<Family>> {
        let conn = lock(&self.conn)?;
        let family = conn
            .query_row(
                "SELECT id, head_id, name, created_at FROM families WHERE id = ?",
                [id],
                |row| Ok(Self::row_to_family(row)),
            )
            .optional()?;

        Ok(family)
    }

    /// Skapa en familj tillsammans med dess överhuvud
    pub fn create_with_head(
        &self,
        head_name: &str,
        relationship: &str,
        age: Option<i32>,
    ) -> Result<(Family, FamilyMember)> {
        let head_name = head_name.trim();
        if head_name.is_empty() {
            return Err(AppError::validation("Namn på familjeöverhuvud krävs").into());
        }

        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;

        let family_id = generate_id(&tx, "families", "fam")?;
        let head_id = generate_id(&tx, "family_members", "")?;

        let family = Family::new(&family_id, &head_id, head_name);
        let mut head = FamilyMember::new_head(&family_id, head_name, relationship);
        head.id = head_id;
        head.age = age;
        head.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        tx.execute(
            "INSERT INTO families (id, head_id, name) VALUES (?1, ?2, ?3)",
            params![family.id, family.head_id, family.name],
        )?;
        tx.execute(
            "INSERT INTO family_members (id, family_id, name, relationship, role, is_head, age)
             VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
            params![
                head.id,
                head.family_id,
                head.name,
                head.relationship,
                head.role.as_db_str(),
                head.age,
            ],
        )?;
        tx.commit().context("Kunde inte spara ny familj")?;

        tracing::info!("Skapade familj {} ({})", family.id, family.name);
        Ok((family, head))
    }

    /// Spara en importerad familj med befintliga id:n
    pub fn insert(&self, family: &Family) -> Result<()> {
        let conn = lock(&self.conn)?;

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM families WHERE id = ?)",
            [&family.id],
            |row| row.get(0),
        )?;
        if exists {
            return Err(AppError::already_exists(format!("Familj {}", family.id)).into());
        }

        conn.execute(
            "INSERT INTO families (id, head_id, name) VALUES (?1, ?2, ?3)",
            params![family.id, family.head_id, family.name],
        )?;

        Ok(())
    }

    /// Ta bort familj, medlemmarna följer med via ON DELETE CASCADE
    pub fn delete(&self, id: &str) -> Result<()> {
        let conn = lock(&self.conn)?;
        let rows = conn.execute("DELETE FROM families WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Familj med ID {}", id)).into());
        }

        tracing::info!("Raderade familj {}", id);
        Ok(())
    }

    /// Räkna antal familjer
    pub fn count(&self) -> Result<i64> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM families", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_family(row: &Row) -> Family {
        Family {
            id: row.get(0).unwrap_or_default(),
            head_id: row.get(1).unwrap_or_default(),
            name: row.get(2).unwrap_or_default(),
            created_at: row.get(3).ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::MemberRole;

    #[test]
    fn test_create_with_head() {
        let db = Database::open_in_memory().unwrap();

        let (family, head) = db
            .families()
            .create_with_head("Bapak Surya", "Kepala Keluarga", Some(50))
            .unwrap();

        assert!(family.id.starts_with("fam"));
        assert_eq!(family.head_id, head.id);
        assert_eq!(head.role, MemberRole::Head);

        let members = db.members().find_by_family(&family.id).unwrap();
        assert_eq!(members.len(), 1);
        assert!(members[0].is_head);
        assert_eq!(members[0].age, Some(50));
    }

    #[test]
    fn test_empty_head_name_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.families().create_with_head("   ", "Ayah", None).is_err());
        assert_eq!(db.families().count().unwrap(), 0);
    }

    #[test]
    fn test_find_all_counts_members() {
        let db = Database::open_in_memory().unwrap();
        let (first, _) = db.families().create_with_head("Bapak Jajang", "Ayah", Some(45)).unwrap();
        db.families().create_with_head("Bapak Surya", "Ayah", Some(50)).unwrap();

        let mut child = FamilyMember::new(&first.id, "Naisa", "Anak").with_age(15);
        db.members().create(&mut child).unwrap();

        let all = db.families().find_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].family.name, "Bapak Jajang");
        assert_eq!(all[0].member_count, 2);
        assert_eq!(all[1].member_count, 1);
    }

    #[test]
    fn test_delete_cascades_to_members() {
        let db = Database::open_in_memory().unwrap();
        let (family, head) = db.families().create_with_head("Bapak Jajang", "Ayah", None).unwrap();

        db.families().delete(&family.id).unwrap();

        assert!(db.families().find_by_id(&family.id).unwrap().is_none());
        assert!(db.members().find_by_id(&head.id).unwrap().is_none());
        assert!(db.families().delete(&family.id).is_err());
    }
}
