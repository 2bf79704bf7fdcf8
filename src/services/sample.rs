//! Demofamiljer för en tom databas

use anyhow::Result;

use crate::db::Database;
use crate::models::{Family, FamilyMember};

struct DemoMember {
    name: &'static str,
    relationship: &'static str,
    age: i32,
    /// Index i samma lista för make/maka till ett barn
    spouse_of: Option<usize>,
}

struct DemoFamily {
    head: (&'static str, &'static str, i32),
    members: &'static [DemoMember],
}

const DEMO_FAMILIES: &[DemoFamily] = &[
    DemoFamily {
        head: ("Bapak Jajang", "Ayah", 45),
        members: &[
            DemoMember { name: "Ibu Iin Kartini", relationship: "Ibu", age: 42, spouse_of: None },
            DemoMember { name: "Jajang", relationship: "Anak", age: 18, spouse_of: None },
            DemoMember { name: "Naisa", relationship: "Anak", age: 15, spouse_of: None },
            DemoMember { name: "Andi", relationship: "Anak", age: 25, spouse_of: None },
            DemoMember { name: "Siti", relationship: "Istri", age: 23, spouse_of: Some(3) },
        ],
    },
    DemoFamily {
        head: ("Bapak Surya", "Ayah", 50),
        members: &[
            DemoMember { name: "Ibu Lestari", relationship: "Ibu", age: 47, spouse_of: None },
            DemoMember { name: "Rizki", relationship: "Anak", age: 20, spouse_of: None },
        ],
    },
];

/// Lägg in demofamiljerna
pub fn seed_demo_families(db: &Database) -> Result<Vec<Family>> {
    let mut created = Vec::new();

    for demo in DEMO_FAMILIES {
        let (name, relationship, age) = demo.head;
        let (family, _) = db.families().create_with_head(name, relationship, Some(age))?;

        let mut ids: Vec<String> = Vec::with_capacity(demo.members.len());
        for entry in demo.members {
            let mut member = FamilyMember::new(&family.id, entry.name, entry.relationship)
                .with_age(entry.age);
            if let Some(index) = entry.spouse_of {
                member.parent_id = ids.get(index).cloned();
            }
            ids.push(db.members().create(&mut member)?);
        }

        created.push(family);
    }

    tracing::info!("Lade in {} demofamiljer", created.len());
    Ok(created)
}

/// Lägg in demofamiljerna om registret är tomt. Returnerar antal nya familjer.
pub fn seed_if_empty(db: &Database) -> Result<usize> {
    if db.families().count()? > 0 {
        return Ok(0);
    }
    Ok(seed_demo_families(db)?.len())
}
