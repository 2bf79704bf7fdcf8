use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

use super::{generate_id, lock};
use crate::models::{FamilyMember, MemberRole};
use crate::utils::AppError;

const SELECT_COLUMNS: &str = "SELECT id, family_id, name, relationship, role, is_head, age,
        birth_date, parent_id, created_at, updated_at
 FROM family_members";

pub struct MemberRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MemberRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Hämta alla medlemmar i en familj, i insättningsordning
    pub fn find_by_family(&self, family_id: &str) -> Result<Vec<FamilyMember>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE family_id = ? ORDER BY rowid",
            SELECT_COLUMNS
        ))?;

        let members = stmt
            .query_map([family_id], |row| Ok(Self::row_to_member(row)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(members)
    }

    /// Hämta medlem via ID
    pub fn find_by_id(&self, id: &str) -> Result<Option<FamilyMember>> {
        let conn = lock(&self.conn)?;
        Self::find_with(&conn, id)
    }

    /// Skapa ny medlem. Tomt id ersätts med ett genererat.
    pub fn create(&self, member: &mut FamilyMember) -> Result<String> {
        member.calculate_age();

        let conn = lock(&self.conn)?;

        if member.id.is_empty() {
            member.id = generate_id(&conn, "family_members", "")?;
        } else if Self::find_with(&conn, &member.id)?.is_some() {
            return Err(AppError::already_exists(format!("Medlem {}", member.id)).into());
        }

        Self::check_member(&conn, member)?;

        conn.execute(
            "INSERT INTO family_members (id, family_id, name, relationship, role, is_head,
                                         age, birth_date, parent_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                member.id,
                member.family_id,
                member.name.trim(),
                member.relationship,
                member.role.as_db_str(),
                member.is_head_of_family(),
                member.age,
                member.birth_date.map(|d| d.to_string()),
                member.parent_id,
            ],
        )?;

        tracing::info!("Skapade medlem {} i familj {}", member.id, member.family_id);
        Ok(member.id.clone())
    }

    /// Uppdatera medlem (fullständig ersättning av posten)
    pub fn update(&self, member: &mut FamilyMember) -> Result<()> {
        if member.id.is_empty() {
            return Err(anyhow!("Medlem har inget ID"));
        }
        member.calculate_age();

        let conn = lock(&self.conn)?;
        Self::check_member(&conn, member)?;

        let rows = conn.execute(
            "UPDATE family_members SET
                name = ?1, relationship = ?2, role = ?3, is_head = ?4, age = ?5,
                birth_date = ?6, parent_id = ?7, updated_at = datetime('now')
             WHERE id = ?8",
            params![
                member.name.trim(),
                member.relationship,
                member.role.as_db_str(),
                member.is_head_of_family(),
                member.age,
                member.birth_date.map(|d| d.to_string()),
                member.parent_id,
                member.id,
            ],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Medlem med ID {}", member.id)).into());
        }

        // Familjen bär överhuvudets namn
        if member.is_head_of_family() {
            conn.execute(
                "UPDATE families SET name = ?1, head_id = ?2 WHERE id = ?3",
                params![member.name.trim(), member.id, member.family_id],
            )?;
        }

        Ok(())
    }

    /// Ta bort medlem. Länkar som pekade på den lämnas kvar och ignoreras vid ritning.
    pub fn delete(&self, id: &str) -> Result<()> {
        let conn = lock(&self.conn)?;
        let rows = conn.execute("DELETE FROM family_members WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Medlem med ID {}", id)).into());
        }

        Ok(())
    }

    /// Räkna medlemmar i en familj
    pub fn count_by_family(&self, family_id: &str) -> Result<i64> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM family_members WHERE family_id = ?",
            [family_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn find_with(conn: &Connection, id: &str) -> Result<Option<FamilyMember>> {
        let member = conn
            .query_row(&format!("{} WHERE id = ?", SELECT_COLUMNS), [id], |row| {
                Ok(Self::row_to_member(row))
            })
            .optional()?;

        Ok(member)
    }

    /// Validering som kräver databasen: familjen finns, högst ett överhuvud,
    /// och `parent_id` pekar inom samma familj.
    fn check_member(conn: &Connection, member: &FamilyMember) -> Result<()> {
        member
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let family_exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM families WHERE id = ?)",
            [&member.family_id],
            |row| row.get(0),
        )?;
        if !family_exists {
            return Err(AppError::not_found(format!("Familj {}", member.family_id)).into());
        }

        if member.is_head_of_family() {
            let other_head: Option<String> = conn
                .query_row(
                    "SELECT name FROM family_members
                     WHERE family_id = ?1 AND id != ?2 AND (is_head = 1 OR role = 'head')
                     LIMIT 1",
                    params![member.family_id, member.id],
                    |row| row.get(0),
                )
                .optional()?;

            if let Some(name) = other_head {
                return Err(AppError::validation(format!(
                    "Familjen har redan ett överhuvud ({})",
                    name
                ))
                .into());
            }
        }

        if let Some(parent_id) = &member.parent_id {
            let parent_family: Option<String> = conn
                .query_row(
                    "SELECT family_id FROM family_members WHERE id = ?",
                    [parent_id],
                    |row| row.get(0),
                )
                .optional()?;

            match parent_family {
                Some(family_id) if family_id == member.family_id => {}
                Some(_) => {
                    return Err(AppError::validation(
                        "Länkad medlem tillhör en annan familj",
                    )
                    .into())
                }
                None => {
                    return Err(AppError::not_found(format!("Länkad medlem {}", parent_id)).into())
                }
            }
        }

        Ok(())
    }

    fn row_to_member(row: &Row) -> FamilyMember {
        FamilyMember {
            id: row.get(0).unwrap_or_default(),
            family_id: row.get(1).unwrap_or_default(),
            name: row.get(2).unwrap_or_default(),
            relationship: row.get(3).unwrap_or_default(),
            role: row
                .get::<_, String>(4)
                .map(|s| MemberRole::from_db_str(&s))
                .unwrap_or_default(),
            is_head: row.get(5).unwrap_or(false),
            age: row.get::<_, Option<i32>>(6).ok().flatten(),
            birth_date: row
                .get::<_, Option<String>>(7)
                .ok()
                .flatten()
                .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
            parent_id: row.get::<_, Option<String>>(8).ok().flatten(),
            created_at: row.get(9).ok(),
            updated_at: row.get(10).ok(),
        }
    }
}
