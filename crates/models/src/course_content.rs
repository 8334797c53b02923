use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fmt::{Display, Formatter, Result as FmtResult},
    ops::Deref,
};
use strum::{AsRefStr, EnumString};
use uuid::Uuid;

/// Kind of content an item within a section holds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemType {
    Lecture,
    Quiz,
    Resource,
}

impl ItemType {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}

/// A single piece of course content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub item_type: ItemType,
}

impl Item {
    pub fn is_lecture(&self) -> bool {
        self.item_type == ItemType::Lecture
    }
}

/// An ordered group of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Section {
    /// Ids of the lecture items in this section, in order
    pub fn lecture_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.items
            .iter()
            .filter(|item| item.is_lecture())
            .map(|item| item.id)
    }
}

/// The full content structure of a course, stored as one JSON document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sea_orm::FromJsonQueryResult))]
#[serde(transparent)]
pub struct Sections(pub Vec<Section>);

impl Sections {
    pub fn lecture_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.0.iter().flat_map(Section::lecture_ids)
    }

    /// Number of lecture items across all sections
    pub fn lecture_count(&self) -> usize {
        self.lecture_ids().count()
    }

    pub fn find_item(&self, item_id: Uuid) -> Option<&Item> {
        self.0
            .iter()
            .flat_map(|section| section.items.iter())
            .find(|item| item.id == item_id)
    }

    pub fn contains_lecture(&self, lecture_id: Uuid) -> bool {
        self.find_item(lecture_id).is_some_and(Item::is_lecture)
    }

    /// Checks that titles are present and that ids are unique
    pub fn validate(&self) -> Result<(), ContentError> {
        let mut section_ids = HashSet::new();
        let mut item_ids = HashSet::new();

        for section in &self.0 {
            if section.title.trim().is_empty() {
                return Err(ContentError::EmptyTitle(section.id));
            }
            if !section_ids.insert(section.id) {
                return Err(ContentError::DuplicateSection(section.id));
            }

            for item in &section.items {
                if item.title.trim().is_empty() {
                    return Err(ContentError::EmptyTitle(item.id));
                }
                if !item_ids.insert(item.id) {
                    return Err(ContentError::DuplicateItem(item.id));
                }
            }
        }

        Ok(())
    }
}

impl Deref for Sections {
    type Target = [Section];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Section>> for Sections {
    fn from(sections: Vec<Section>) -> Self {
        Sections(sections)
    }
}

/// Reasons a course structure is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    EmptyTitle(Uuid),
    DuplicateSection(Uuid),
    DuplicateItem(Uuid),
}

impl Display for ContentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::EmptyTitle(id) => write!(f, "Section or item {id} has an empty title"),
            Self::DuplicateSection(id) => write!(f, "Section id {id} is used more than once"),
            Self::DuplicateItem(id) => write!(f, "Item id {id} is used more than once"),
        }
    }
}

impl std::error::Error for ContentError {}
