//! # Tags
//!
//! The closed enumeration of photo categories. A tag is the partition key for
//! subscriptions and selects the sender identity and the notification text.

use crate::errors::UnknownTag;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Photo category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Nature,
    Food,
    Travel,
    Sports,
    People,
    Pets,
    ArtAndFashion,
}

impl Tag {
    /// Every tag, in canonical order.
    pub const ALL: [Tag; 7] = [
        Tag::Nature,
        Tag::Food,
        Tag::Travel,
        Tag::Sports,
        Tag::People,
        Tag::Pets,
        Tag::ArtAndFashion,
    ];

    /// The wire label, exactly as clients send it.
    pub fn label(&self) -> &'static str {
        match self {
            Tag::Nature => "Nature",
            Tag::Food => "Food",
            Tag::Travel => "Travel",
            Tag::Sports => "Sports",
            Tag::People => "People",
            Tag::Pets => "Pets",
            Tag::ArtAndFashion => "Art & Fashion",
        }
    }

    /// Parse a wire label. Matching is exact and case sensitive.
    pub fn from_label(label: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|tag| tag.label() == label)
    }

    /// Upper-case identifier used in environment variable names.
    pub fn env_suffix(&self) -> &'static str {
        match self {
            Tag::Nature => "NATURE",
            Tag::Food => "FOOD",
            Tag::Travel => "TRAVEL",
            Tag::Sports => "SPORTS",
            Tag::People => "PEOPLE",
            Tag::Pets => "PETS",
            Tag::ArtAndFashion => "ART_FASHION",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::from_label(s).ok_or_else(|| UnknownTag(s.to_string()))
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Tag::from_label(&label).ok_or_else(|| serde::de::Error::custom(UnknownTag(label)))
    }
}
