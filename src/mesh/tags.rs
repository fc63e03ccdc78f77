// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tag definitions and values

use serde::{Deserialize, Serialize};
use std::fmt;

pub const GEOM_DIMENSION_TAG_NAME: &str = "GEOM_DIMENSION";
pub const GLOBAL_ID_TAG_NAME: &str = "GLOBAL_ID";
pub const NAME_TAG_NAME: &str = "NAME";
pub const CATEGORY_TAG_NAME: &str = "CATEGORY";
pub const FACETING_TOL_TAG_NAME: &str = "FACETING_TOL";
pub const GEOMETRY_RESABS_TAG_NAME: &str = "GEOMETRY_RESABS";
/// Prefix of the tags holding additional group names
pub const EXTRA_NAME_TAG_PREFIX: &str = "EXTRA_NAME";

/// Size in bytes of the `NAME` tag, including the terminator
pub const NAME_TAG_SIZE: usize = 32;
/// Size in bytes of the `CATEGORY` tag, including the terminator
pub const CATEGORY_TAG_SIZE: usize = 32;

/// Handle of a defined tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagType {
    Integer,
    Double,
    Opaque,
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagType::Integer => f.write_str("integer"),
            TagType::Double => f.write_str("double"),
            TagType::Opaque => f.write_str("opaque"),
        }
    }
}

/// Value stored in a tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TagValue {
    Integer(i32),
    Double(f64),
    Opaque(String),
}

impl TagValue {
    pub fn tag_type(&self) -> TagType {
        match self {
            TagValue::Integer(_) => TagType::Integer,
            TagValue::Double(_) => TagType::Double,
            TagValue::Opaque(_) => TagType::Opaque,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            TagValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            TagValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Opaque(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Integer(v) => write!(f, "{}", v),
            TagValue::Double(v) => write!(f, "{}", v),
            TagValue::Opaque(v) => f.write_str(v),
        }
    }
}

/// Definition of a tag in a mesh database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDefinition {
    pub name: String,
    pub data_type: TagType,
    /// Capacity in bytes for opaque tags, 1 for scalar tags
    pub size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<TagValue>,
}

impl TagDefinition {
    pub fn integer(name: &str, default: Option<i32>) -> Self {
        Self {
            name: name.to_string(),
            data_type: TagType::Integer,
            size: 1,
            default: default.map(TagValue::Integer),
        }
    }

    pub fn double(name: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: TagType::Double,
            size: 1,
            default: None,
        }
    }

    pub fn opaque(name: &str, size: usize) -> Self {
        Self {
            name: name.to_string(),
            data_type: TagType::Opaque,
            size,
            default: None,
        }
    }

    /// Whether `value` can be stored in this tag
    pub fn accepts(&self, value: &TagValue) -> bool {
        match value {
            // Opaque values are stored with a terminator
            TagValue::Opaque(text) => self.data_type == TagType::Opaque && text.len() < self.size,
            other => other.tag_type() == self.data_type,
        }
    }
}

/// Name of the `index`-th additional name tag
pub fn extra_name_tag_name(index: usize) -> String {
    format!("{}{}", EXTRA_NAME_TAG_PREFIX, index)
}

/// Cut `text` to at most `max_bytes` bytes on a character boundary.
///
/// Returns `None` when no truncation was needed.
pub fn truncate_to_bytes(text: &str, max_bytes: usize) -> Option<&str> {
    if text.len() <= max_bytes {
        return None;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    Some(&text[..end])
}
