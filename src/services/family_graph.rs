//! Härledda relationer i en familj
//!
//! Varje medlem får högst en plats i trädet: föräldraraden (överhuvud och
//! make/maka), barnraden, under ett barn (make/maka eller ättling) eller
//! raden med övriga släktingar. Det som inte får någon plats hamnar i
//! `unplaced` och loggas.

use std::collections::HashSet;

use crate::models::{FamilyMember, MemberRole};
use crate::services::MemberStore;

/// Rollindelning av en familjs medlemmar
#[derive(Debug, Clone)]
pub struct FamilyGraph<'a> {
    family_id: String,
    members: Vec<&'a FamilyMember>,
    head: Option<&'a FamilyMember>,
    spouse: Option<&'a FamilyMember>,
    children: Vec<&'a FamilyMember>,
    others: Vec<&'a FamilyMember>,
    unplaced: Vec<&'a FamilyMember>,
}

impl<'a> FamilyGraph<'a> {
    /// Bygg grafen för en familj ur en samling medlemmar (samlingens ordning gäller)
    pub fn new<I>(members: I, family_id: &str) -> Self
    where
        I: IntoIterator<Item = &'a FamilyMember>,
    {
        let members: Vec<&FamilyMember> = members
            .into_iter()
            .filter(|m| m.family_id == family_id)
            .collect();

        let mut graph = Self {
            family_id: family_id.to_string(),
            members,
            head: None,
            spouse: None,
            children: Vec::new(),
            others: Vec::new(),
            unplaced: Vec::new(),
        };
        graph.classify();
        graph
    }

    pub fn from_store(store: &'a MemberStore, family_id: &str) -> Self {
        Self::new(store.iter(), family_id)
    }

    fn classify(&mut self) {
        self.head = self.members.iter().copied().find(|m| m.is_head_of_family());
        let head_id = self.head.map(|m| m.id.as_str());

        self.spouse = self
            .members
            .iter()
            .copied()
            .filter(|m| !m.is_head_of_family() && m.role == MemberRole::Spouse)
            .find(|m| self.anchors_at(m, &[head_id]));
        let spouse_id = self.spouse.map(|m| m.id.as_str());
        let roots = [head_id, spouse_id];

        self.children = self
            .members
            .iter()
            .copied()
            .filter(|m| !m.is_head_of_family() && m.role == MemberRole::Child)
            .filter(|m| self.anchors_at(m, &roots))
            .collect();

        self.others = self
            .members
            .iter()
            .copied()
            .filter(|m| !m.is_head_of_family() && m.role == MemberRole::Other)
            .filter(|m| self.anchors_at(m, &roots))
            .collect();

        let placed = self.placed_ids();
        self.unplaced = self
            .members
            .iter()
            .copied()
            .filter(|m| !placed.contains(m.id.as_str()))
            .collect();

        for member in &self.unplaced {
            tracing::warn!(
                "Medlem {} ({}) i familj {} får ingen plats i trädet",
                member.id,
                member.name,
                self.family_id
            );
        }
    }

    /// Sant om medlemmen saknar länk, har en länk som inte pekar på någon
    /// i familjen, eller pekar på någon av `roots`.
    fn anchors_at(&self, member: &FamilyMember, roots: &[Option<&str>]) -> bool {
        match member.parent_id.as_deref() {
            None => true,
            Some(parent) if !self.contains(parent) => true,
            Some(parent) => roots.iter().flatten().any(|root| *root == parent),
        }
    }

    /// Alla id:n som har en plats i trädet
    fn placed_ids(&self) -> HashSet<&'a str> {
        let mut placed: HashSet<&str> = HashSet::new();
        placed.extend(self.head.map(|m| m.id.as_str()));
        placed.extend(self.spouse.map(|m| m.id.as_str()));
        placed.extend(self.others.iter().map(|m| m.id.as_str()));

        let mut stack: Vec<&FamilyMember> = self.children.clone();
        while let Some(member) = stack.pop() {
            if !placed.insert(member.id.as_str()) {
                continue;
            }
            if let Some(spouse) = self.spouse_of(&member.id) {
                placed.insert(spouse.id.as_str());
            }
            stack.extend(self.children_of(&member.id));
        }

        placed
    }

    pub fn family_id(&self) -> &str {
        &self.family_id
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&'a FamilyMember> {
        self.members.iter().copied().find(|m| m.id == id)
    }

    /// Alla medlemmar i familjen, i samlingens ordning
    pub fn members(&self) -> &[&'a FamilyMember] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn head(&self) -> Option<&'a FamilyMember> {
        self.head
    }

    pub fn spouse(&self) -> Option<&'a FamilyMember> {
        self.spouse
    }

    pub fn children(&self) -> &[&'a FamilyMember] {
        &self.children
    }

    pub fn others(&self) -> &[&'a FamilyMember] {
        &self.others
    }

    pub fn unplaced(&self) -> &[&'a FamilyMember] {
        &self.unplaced
    }

    /// Första make/maka som är länkad till medlemmen
    pub fn spouse_of(&self, member_id: &str) -> Option<&'a FamilyMember> {
        self.members.iter().copied().find(|m| {
            m.role == MemberRole::Spouse
                && !m.is_head_of_family()
                && m.parent_id.as_deref() == Some(member_id)
                && self.spouse.map_or(true, |s| s.id != m.id)
        })
    }

    /// Ättlingar länkade direkt till medlemmen
    pub fn children_of(&self, member_id: &str) -> Vec<&'a FamilyMember> {
        self.members
            .iter()
            .copied()
            .filter(|m| {
                matches!(m.role, MemberRole::Child | MemberRole::Other)
                    && !m.is_head_of_family()
                    && m.parent_id.as_deref() == Some(member_id)
            })
            .collect()
    }

    /// Namn att visa i rubriken: överhuvudet, annars make/maka
    pub fn title_name(&self) -> Option<&'a str> {
        self.head.or(self.spouse).map(|m| m.name.as_str())
    }

    /// Indelning enbart efter etiketten, utan lagrade roller
    pub fn classify_by_label<I>(members: I, family_id: &str) -> LabelClassification<'a>
    where
        I: IntoIterator<Item = &'a FamilyMember>,
    {
        LabelClassification::new(members, family_id)
    }
}

/// Indelning efter relationsetikett: skiftlägesokänslig delsträngsmatchning,
/// första träff i samlingens ordning vinner. En medlem kan hamna i flera fack.
#[derive(Debug, Clone)]
pub struct LabelClassification<'a> {
    pub members: Vec<&'a FamilyMember>,
    pub head: Option<&'a FamilyMember>,
    pub spouse: Option<&'a FamilyMember>,
    pub children: Vec<&'a FamilyMember>,
    pub others: Vec<&'a FamilyMember>,
}

impl<'a> LabelClassification<'a> {
    fn new<I>(members: I, family_id: &str) -> Self
    where
        I: IntoIterator<Item = &'a FamilyMember>,
    {
        let members: Vec<&FamilyMember> = members
            .into_iter()
            .filter(|m| m.family_id == family_id)
            .collect();

        let head = members.iter().copied().find(|m| {
            m.is_head || label_has(m, &["kepala keluarga", "ayah"])
        });
        let spouse = members
            .iter()
            .copied()
            .find(|m| label_has(m, &["istri", "ibu"]));
        let children = members
            .iter()
            .copied()
            .filter(|m| label_has(m, &["anak"]))
            .collect();
        let others = members
            .iter()
            .copied()
            .filter(|m| !m.is_head && !label_has(m, &["istri", "ibu", "suami", "ayah", "anak"]))
            .collect();

        Self {
            members,
            head,
            spouse,
            children,
            others,
        }
    }

    pub fn spouse_of(&self, member_id: &str) -> Option<&'a FamilyMember> {
        self.members.iter().copied().find(|m| {
            label_has(m, &["istri", "suami"]) && m.parent_id.as_deref() == Some(member_id)
        })
    }
}

fn label_has(member: &FamilyMember, needles: &[&str]) -> bool {
    let label = member.relationship.to_lowercase();
    needles.iter().any(|needle| label.contains(needle))
}
