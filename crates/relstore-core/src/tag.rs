//! Relation tags as written in declarations.
//!
//! A tag is either a qualifier (I/O and optimizer hints, opaque to storage)
//! or a representation choice. Only [`RelationRepresentation::Eqrel`] changes
//! how this store inserts; every other representation is stored plainly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A tag attached to a relation declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationTag {
    Input,
    Output,
    Printsize,
    Overridable,
    Inline,
    NoInline,
    Magic,
    NoMagic,
    Suppressed,
    Brie,
    Btree,
    BtreeMin,
    BtreeMax,
    BtreeSum,
    BtreeDelete,
    Eqrel,
}

/// Tags that do not pick a data structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationQualifier {
    Input,
    Output,
    Printsize,
    Overridable,
    Inline,
    NoInline,
    Magic,
    NoMagic,
    Suppressed,
}

/// The data structure requested for a relation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationRepresentation {
    #[default]
    Default,
    Brie,
    Btree,
    BtreeMin,
    BtreeMax,
    BtreeSum,
    BtreeDelete,
    Eqrel,
    Provenance,
    Info,
}

const TAG_NAMES: [(RelationTag, &str); 16] = [
    (RelationTag::Input, "input"),
    (RelationTag::Output, "output"),
    (RelationTag::Printsize, "printsize"),
    (RelationTag::Overridable, "overridable"),
    (RelationTag::Inline, "inline"),
    (RelationTag::NoInline, "no_inline"),
    (RelationTag::Magic, "magic"),
    (RelationTag::NoMagic, "no_magic"),
    (RelationTag::Suppressed, "suppressed"),
    (RelationTag::Brie, "brie"),
    (RelationTag::Btree, "btree"),
    (RelationTag::BtreeMin, "btree_min"),
    (RelationTag::BtreeMax, "btree_max"),
    (RelationTag::BtreeSum, "btree_sum"),
    (RelationTag::BtreeDelete, "btree_delete"),
    (RelationTag::Eqrel, "eqrel"),
];

impl RelationTag {
    pub fn name(self) -> &'static str {
        TAG_NAMES
            .iter()
            .find(|(tag, _)| *tag == self)
            .map_or("?", |(_, name)| name)
    }

    pub fn is_qualifier(self) -> bool {
        self.qualifier().is_some()
    }

    pub fn is_representation(self) -> bool {
        self.representation().is_some()
    }

    pub fn qualifier(self) -> Option<RelationQualifier> {
        Some(match self {
            RelationTag::Input => RelationQualifier::Input,
            RelationTag::Output => RelationQualifier::Output,
            RelationTag::Printsize => RelationQualifier::Printsize,
            RelationTag::Overridable => RelationQualifier::Overridable,
            RelationTag::Inline => RelationQualifier::Inline,
            RelationTag::NoInline => RelationQualifier::NoInline,
            RelationTag::Magic => RelationQualifier::Magic,
            RelationTag::NoMagic => RelationQualifier::NoMagic,
            RelationTag::Suppressed => RelationQualifier::Suppressed,
            _ => return None,
        })
    }

    pub fn representation(self) -> Option<RelationRepresentation> {
        Some(match self {
            RelationTag::Brie => RelationRepresentation::Brie,
            RelationTag::Btree => RelationRepresentation::Btree,
            RelationTag::BtreeMin => RelationRepresentation::BtreeMin,
            RelationTag::BtreeMax => RelationRepresentation::BtreeMax,
            RelationTag::BtreeSum => RelationRepresentation::BtreeSum,
            RelationTag::BtreeDelete => RelationRepresentation::BtreeDelete,
            RelationTag::Eqrel => RelationRepresentation::Eqrel,
            _ => return None,
        })
    }
}

impl fmt::Display for RelationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RelationTag {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TAG_NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(tag, _)| *tag)
            .ok_or_else(|| StoreError::UnknownTag(s.to_string()))
    }
}

impl fmt::Display for RelationQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationQualifier::Input => "input",
            RelationQualifier::Output => "output",
            RelationQualifier::Printsize => "printsize",
            RelationQualifier::Overridable => "overridable",
            RelationQualifier::Inline => "inline",
            RelationQualifier::NoInline => "no_inline",
            RelationQualifier::Magic => "magic",
            RelationQualifier::NoMagic => "no_magic",
            RelationQualifier::Suppressed => "suppressed",
        };
        f.write_str(name)
    }
}

impl fmt::Display for RelationRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationRepresentation::Default => "default",
            RelationRepresentation::Brie => "brie",
            RelationRepresentation::Btree => "btree",
            RelationRepresentation::BtreeMin => "btree_min",
            RelationRepresentation::BtreeMax => "btree_max",
            RelationRepresentation::BtreeSum => "btree_sum",
            RelationRepresentation::BtreeDelete => "btree_delete",
            RelationRepresentation::Eqrel => "eqrel",
            RelationRepresentation::Provenance => "provenance",
            RelationRepresentation::Info => "info",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_partition() {
        for (tag, _) in TAG_NAMES {
            assert_ne!(tag.is_qualifier(), tag.is_representation(), "{tag}");
        }
    }

    #[test]
    fn test_parse_round_trip() {
        for (tag, name) in TAG_NAMES {
            assert_eq!(name.parse::<RelationTag>().unwrap(), tag);
            assert_eq!(tag.to_string(), name);
        }
        assert_eq!(
            "union".parse::<RelationTag>(),
            Err(StoreError::UnknownTag("union".into()))
        );
    }

    #[test]
    fn test_conversions() {
        assert_eq!(
            RelationTag::Eqrel.representation(),
            Some(RelationRepresentation::Eqrel)
        );
        assert_eq!(RelationTag::Eqrel.qualifier(), None);
        assert_eq!(RelationTag::NoInline.qualifier(), Some(RelationQualifier::NoInline));
        assert_eq!(RelationQualifier::NoInline.to_string(), "no_inline");
        assert_eq!(RelationRepresentation::default().to_string(), "default");
    }
}
