//! Read-only access to the person/family graph.
//!
//! The layout engine only ever walks the graph through [`FamilyGraph`].
//! [`Database`] is the in-memory implementation used by hosts that already
//! hold the exported person and family tables.

use std::fmt;

use crate::types::{FamilyId, Gender, PersonId};

/// A dated, placed event (birth, death, marriage)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub year: Option<i32>,
    pub place: Option<String>,
}

impl Event {
    pub fn new(year: Option<i32>, place: Option<&str>) -> Self {
        Self {
            year,
            place: place.map(str::to_string),
        }
    }

    pub fn year(year: i32) -> Self {
        Self::new(Some(year), None)
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.place.as_deref().is_none_or(str::is_empty)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.year, self.place.as_deref()) {
            (Some(year), Some(place)) if !place.is_empty() => write!(f, "{year}, {place}"),
            (Some(year), _) => write!(f, "{year}"),
            (None, Some(place)) => write!(f, "{place}"),
            (None, None) => Ok(()),
        }
    }
}

/// One person of the exported table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub gender: Gender,
    pub name: String,
    pub short_name: String,
    pub birth: Event,
    pub death: Event,
    /// Families in which this person is a spouse, in union order
    pub spouse_families: Vec<FamilyId>,
    /// Families in which this person is a child
    pub parent_families: Vec<FamilyId>,
}

impl Person {
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        let name = name.into();
        Self {
            gender,
            short_name: name.clone(),
            name,
            ..Self::default()
        }
    }

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = short_name.into();
        self
    }

    pub fn with_birth(mut self, birth: Event) -> Self {
        self.birth = birth;
        self
    }

    pub fn with_death(mut self, death: Event) -> Self {
        self.death = death;
        self
    }

    /// Life span as printed under the name, e.g. `1850-1920`
    pub fn years(&self) -> Option<String> {
        match (self.birth.year, self.death.year) {
            (None, None) => None,
            (Some(b), None) => Some(format!("{b}-")),
            (None, Some(d)) => Some(format!("-{d}")),
            (Some(b), Some(d)) => Some(format!("{b}-{d}")),
        }
    }
}

/// One family (union) of the exported table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Family {
    pub spouses: Vec<PersonId>,
    pub children: Vec<PersonId>,
    pub marriage: Event,
}

/// Traversal over the family-relationship graph.
///
/// Every list is returned in the exporter's native order; the layout never
/// sorts, so that order decides angle and row order in the charts.
pub trait FamilyGraph {
    fn person(&self, id: PersonId) -> Option<&Person>;

    fn family(&self, id: FamilyId) -> Option<&Family>;

    fn person_count(&self) -> usize;

    fn contains(&self, id: PersonId) -> bool {
        self.person(id).is_some()
    }

    fn spouse_families(&self, id: PersonId) -> &[FamilyId] {
        self.person(id)
            .map(|p| p.spouse_families.as_slice())
            .unwrap_or(&[])
    }

    fn parent_families(&self, id: PersonId) -> &[FamilyId] {
        self.person(id)
            .map(|p| p.parent_families.as_slice())
            .unwrap_or(&[])
    }

    fn spouses_in(&self, family: FamilyId) -> &[PersonId] {
        self.family(family)
            .map(|f| f.spouses.as_slice())
            .unwrap_or(&[])
    }

    fn children_in(&self, family: FamilyId) -> &[PersonId] {
        self.family(family)
            .map(|f| f.children.as_slice())
            .unwrap_or(&[])
    }

    /// Spouses of `family` other than `person`
    fn partners_in(&self, family: FamilyId, person: PersonId) -> Vec<PersonId> {
        self.spouses_in(family)
            .iter()
            .copied()
            .filter(|&s| s != person)
            .collect()
    }

    fn parents(&self, id: PersonId) -> Vec<PersonId> {
        let mut out = Vec::new();
        for &fam in self.parent_families(id) {
            push_unique(&mut out, self.spouses_in(fam).iter().copied());
        }
        out
    }

    fn spouses(&self, id: PersonId) -> Vec<PersonId> {
        let mut out = Vec::new();
        for &fam in self.spouse_families(id) {
            push_unique(&mut out, self.partners_in(fam, id));
        }
        out
    }

    /// Full and half siblings, excluding the person
    fn siblings(&self, id: PersonId) -> Vec<PersonId> {
        let mut out = Vec::new();
        for &fam in self.parent_families(id) {
            push_unique(
                &mut out,
                self.children_in(fam).iter().copied().filter(|&c| c != id),
            );
        }
        out
    }

    fn children(&self, id: PersonId) -> Vec<PersonId> {
        let mut out = Vec::new();
        for &fam in self.spouse_families(id) {
            push_unique(&mut out, self.children_in(fam).iter().copied());
        }
        out
    }
}

fn push_unique(out: &mut Vec<PersonId>, items: impl IntoIterator<Item = PersonId>) {
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
}

/// Dense in-memory person and family tables
#[derive(Debug, Clone, Default)]
pub struct Database {
    persons: Vec<Person>,
    families: Vec<Family>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap tables exported elsewhere; family links are taken as-is.
    pub fn from_tables(persons: Vec<Person>, families: Vec<Family>) -> Self {
        Self { persons, families }
    }

    pub fn add_person(&mut self, person: Person) -> PersonId {
        self.persons.push(person);
        PersonId(self.persons.len() - 1)
    }

    /// Add a family and link it back from its spouses and children
    pub fn add_family(&mut self, spouses: &[PersonId], children: &[PersonId]) -> FamilyId {
        self.add_family_with(Family {
            spouses: spouses.to_vec(),
            children: children.to_vec(),
            marriage: Event::default(),
        })
    }

    pub fn add_family_with(&mut self, family: Family) -> FamilyId {
        let id = FamilyId(self.families.len());
        for s in &family.spouses {
            if let Some(p) = self.persons.get_mut(s.0) {
                p.spouse_families.push(id);
            }
        }
        for c in &family.children {
            if let Some(p) = self.persons.get_mut(c.0) {
                p.parent_families.push(id);
            }
        }
        self.families.push(family);
        id
    }

    pub fn families(&self) -> &[Family] {
        &self.families
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }
}

impl FamilyGraph for Database {
    fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons.get(id.0)
    }

    fn family(&self, id: FamilyId) -> Option<&Family> {
        self.families.get(id.0)
    }

    fn person_count(&self) -> usize {
        self.persons.len()
    }
}
