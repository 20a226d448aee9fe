//! Strongly-typed identifiers shared by every module.
//!
//! Person and family tables are dense arrays, so ids are plain indices
//! wrapped in newtypes to keep them from being mixed up.

use std::fmt;

/// Index into the person table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct PersonId(pub usize);

/// Index into the family table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct FamilyId(pub usize);

/// Index into a layout's node list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(pub usize);

impl PersonId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl FamilyId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I{}", self.0)
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Recorded gender of a person
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

/// Styling class of a painted node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeClass {
    Male,
    Female,
    Unknown,
    /// Placeholder slot for a family without a recorded spouse
    Fictive,
}

impl NodeClass {
    pub fn css_class(self) -> &'static str {
        match self {
            NodeClass::Male => "male",
            NodeClass::Female => "female",
            NodeClass::Unknown => "unknown",
            NodeClass::Fictive => "fictive",
        }
    }
}

impl From<Gender> for NodeClass {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Male => NodeClass::Male,
            Gender::Female => NodeClass::Female,
            Gender::Unknown => NodeClass::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_with_prefix() {
        assert_eq!(PersonId(12).to_string(), "I12");
        assert_eq!(FamilyId(3).to_string(), "F3");
        assert_eq!(NodeId(7).to_string(), "7");
    }

    #[test]
    fn gender_maps_to_css_class() {
        assert_eq!(NodeClass::from(Gender::Female).css_class(), "female");
        assert_eq!(NodeClass::from(Gender::default()).css_class(), "unknown");
        assert_eq!(NodeClass::Fictive.css_class(), "fictive");
    }
}
