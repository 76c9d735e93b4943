use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Sentinel generation label for profiles seen before any section header.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Mentioned,
    MentionedBy,
    Spouse,
    Parent,
    Child,
    StepParent,
    StepChild,
    Sibling,
    Cousin,
    InLaw,
    Friend,
    BusinessPartner,
    Neighbor,
    Classmate,
    Godparent,
    Godchild,
}

impl RelationKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mentioned => "mentioned",
            Self::MentionedBy => "mentioned_by",
            Self::Spouse => "spouse",
            Self::Parent => "parent",
            Self::Child => "child",
            Self::StepParent => "step_parent",
            Self::StepChild => "step_child",
            Self::Sibling => "sibling",
            Self::Cousin => "cousin",
            Self::InLaw => "in_law",
            Self::Friend => "friend",
            Self::BusinessPartner => "business_partner",
            Self::Neighbor => "neighbor",
            Self::Classmate => "classmate",
            Self::Godparent => "godparent",
            Self::Godchild => "godchild",
        }
    }

    /// Every kind has an inverse; symmetric kinds map to themselves.
    #[must_use]
    pub fn inverse(&self) -> Self {
        match self {
            Self::Mentioned => Self::MentionedBy,
            Self::MentionedBy => Self::Mentioned,
            Self::Parent => Self::Child,
            Self::Child => Self::Parent,
            Self::StepParent => Self::StepChild,
            Self::StepChild => Self::StepParent,
            Self::Godparent => Self::Godchild,
            Self::Godchild => Self::Godparent,
            other => *other,
        }
    }

    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        matches!(
            self,
            Self::Spouse
                | Self::Sibling
                | Self::Cousin
                | Self::InLaw
                | Self::Friend
                | Self::BusinessPartner
                | Self::Neighbor
                | Self::Classmate
        )
    }

    /// Kinds that only make sense between people whose lifetimes overlap.
    #[must_use]
    pub fn implies_contemporary(&self) -> bool {
        matches!(
            self,
            Self::Spouse | Self::BusinessPartner | Self::Friend | Self::Classmate
        )
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mentioned" => Ok(Self::Mentioned),
            "mentioned_by" => Ok(Self::MentionedBy),
            "spouse" => Ok(Self::Spouse),
            "parent" => Ok(Self::Parent),
            "child" => Ok(Self::Child),
            "step_parent" => Ok(Self::StepParent),
            "step_child" => Ok(Self::StepChild),
            "sibling" => Ok(Self::Sibling),
            "cousin" => Ok(Self::Cousin),
            "in_law" => Ok(Self::InLaw),
            "friend" => Ok(Self::Friend),
            "business_partner" => Ok(Self::BusinessPartner),
            "neighbor" => Ok(Self::Neighbor),
            "classmate" => Ok(Self::Classmate),
            "godparent" => Ok(Self::Godparent),
            "godchild" => Ok(Self::Godchild),
            _ => Err(crate::Error::InvalidRelationKind(s.to_string())),
        }
    }
}

/// A mention link discovered in a profile's notes. Links are symmetric by
/// construction: the reciprocal pass synthesizes the reverse entry with the
/// inverted kind if the target does not already link back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLink {
    pub target_id: String,
    pub relation_type: RelationKind,
    pub source_text: String,
}

impl RelatedLink {
    #[must_use]
    pub fn new(target_id: String, relation_type: RelationKind, source_text: String) -> Self {
        Self {
            target_id,
            relation_type,
            source_text,
        }
    }
}

/// City/county/state/country decomposition of a location string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceParts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl PlaceParts {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.county.is_none() && self.state.is_none() && self.country.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub born_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub born_location: Option<String>,
    #[serde(rename = "born_year_int", skip_serializing_if = "Option::is_none")]
    pub born_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub born_location_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub born_hierarchy: Option<PlaceParts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub died_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub died_location: Option<String>,
    #[serde(rename = "died_year_int", skip_serializing_if = "Option::is_none")]
    pub died_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub died_location_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub died_hierarchy: Option<PlaceParts>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeEventKind {
    Birth,
    Death,
    Voyage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeEvent {
    pub year: i32,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub kind: LifeEventKind,
}

/// A sea passage extracted from a profile's notes, either from an explicit
/// `[Ship: ...]` tag or from natural-language phrasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voyage {
    pub ship_name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival: Option<String>,
    pub class: String,
}

impl Voyage {
    #[must_use]
    pub fn new(ship_name: String) -> Self {
        Self {
            ship_name,
            ship_type: None,
            year: None,
            departure: None,
            arrival: None,
            class: "Passenger".to_string(),
        }
    }
}

/// An inferred correlation between a profile's given name and a structural
/// ancestor who carried the same one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingEcho {
    pub ancestor_id: String,
    pub shared_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub notes: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub life_events: Vec<LifeEvent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub voyages: Vec<Voyage>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub associates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub naming_echo: Option<NamingEcho>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relations {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub parents: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub children: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub spouses: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub doc_paragraph_index: usize,
}

/// Canonical profiles come straight from an identifier token in the source
/// text. Synthetic children are manufactured from a parsed "children" field
/// and live only until reconciliation matches them to a canonical profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProfileKind {
    Canonical,
    SyntheticChild { parent_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub lineage: String,
    pub generation: String,
    #[serde(flatten)]
    pub kind: ProfileKind,
    pub vital_stats: VitalStats,
    pub story: Story,
    pub relations: Relations,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_links: Vec<RelatedLink>,
    pub metadata: Metadata,
}

impl Profile {
    #[must_use]
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            lineage: String::new(),
            generation: UNCATEGORIZED.to_string(),
            kind: ProfileKind::Canonical,
            vital_stats: VitalStats::default(),
            story: Story::default(),
            relations: Relations::default(),
            related_links: Vec::new(),
            metadata: Metadata::default(),
        }
    }

    #[must_use]
    pub fn synthetic_child(id: String, name: String, parent_id: String) -> Self {
        let mut profile = Self::new(id, name);
        profile.kind = ProfileKind::SyntheticChild { parent_id };
        profile
    }

    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        matches!(self.kind, ProfileKind::SyntheticChild { .. })
    }

    /// The back-reference carried by synthetic child profiles.
    #[must_use]
    pub fn synthetic_parent_id(&self) -> Option<&str> {
        match &self.kind {
            ProfileKind::SyntheticChild { parent_id } => Some(parent_id),
            ProfileKind::Canonical => None,
        }
    }

    /// Whether this profile already carries a mention link to `target_id`.
    #[must_use]
    pub fn links_to(&self, target_id: &str) -> bool {
        self.related_links.iter().any(|l| l.target_id == target_id)
    }
}
