/// SQL-schema för Silsilah

pub const SCHEMA_VERSION: i32 = 2;

pub const CREATE_TABLES: &str = r#"
-- Familjer (ett släktträd per rad)
CREATE TABLE IF NOT EXISTS families (
    id TEXT PRIMARY KEY,
    head_id TEXT NOT NULL,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Familjemedlemmar, rowid ger insättningsordningen
CREATE TABLE IF NOT EXISTS family_members (
    id TEXT PRIMARY KEY,
    family_id TEXT NOT NULL,
    name TEXT NOT NULL,
    relationship TEXT NOT NULL DEFAULT '',
    role TEXT NOT NULL DEFAULT 'other',
    is_head INTEGER NOT NULL DEFAULT 0,
    age INTEGER,
    birth_date TEXT,
    parent_id TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (family_id) REFERENCES families(id) ON DELETE CASCADE,
    CHECK (length(trim(name)) > 0)
);

CREATE INDEX IF NOT EXISTS idx_members_family ON family_members(family_id);
CREATE INDEX IF NOT EXISTS idx_members_parent ON family_members(parent_id);

-- Migrationshistorik
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
