//! Ägd minneskopia av en familjs medlemmar
//!
//! Trädvyn äger en `MemberStore` och lånar ut den till graf, layout och
//! ritning. Den fylls med `replace_all` när familjen läses in. Sparade och
//! borttagna medlemmar skrivs först till databasen och speglas sedan här med
//! `upsert` och `remove`, utan att hela familjen läses om.

use std::collections::HashMap;

use crate::models::FamilyMember;

#[derive(Debug, Clone, Default)]
pub struct MemberStore {
    members: HashMap<String, FamilyMember>,
    /// Insättningsordning, styr "första träff vinner"
    order: Vec<String>,
}

impl MemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bygg från en lista. Dubbletter av id ersätter tidigare post men behåller platsen.
    pub fn from_members(members: impl IntoIterator<Item = FamilyMember>) -> Self {
        let mut store = Self::new();
        for member in members {
            store.upsert(member);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FamilyMember> {
        self.members.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains_key(id)
    }

    /// Alla medlemmar i insättningsordning
    pub fn iter(&self) -> impl Iterator<Item = &FamilyMember> {
        self.order.iter().filter_map(|id| self.members.get(id))
    }

    /// Medlemmar i en viss familj, i insättningsordning
    pub fn in_family<'a>(&'a self, family_id: &'a str) -> impl Iterator<Item = &'a FamilyMember> + 'a {
        self.iter().filter(move |m| m.family_id == family_id)
    }

    /// Lägg till ny medlem. Returnerar false om id redan finns.
    pub fn add(&mut self, member: FamilyMember) -> bool {
        if self.members.contains_key(&member.id) {
            return false;
        }
        self.order.push(member.id.clone());
        self.members.insert(member.id.clone(), member);
        true
    }

    /// Ersätt en befintlig post. Returnerar den gamla om den fanns.
    pub fn update(&mut self, member: FamilyMember) -> Option<FamilyMember> {
        let slot = self.members.get_mut(&member.id)?;
        Some(std::mem::replace(slot, member))
    }

    /// Lägg till eller ersätt
    pub fn upsert(&mut self, member: FamilyMember) {
        if self.contains(&member.id) {
            self.update(member);
        } else {
            self.add(member);
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<FamilyMember> {
        let removed = self.members.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    /// Ersätt hela innehållet (efter omladdning från databasen)
    pub fn replace_all(&mut self, members: impl IntoIterator<Item = FamilyMember>) {
        *self = Self::from_members(members);
    }
}
