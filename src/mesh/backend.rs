// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh database backend contract

use super::{EntityHandle, Tag, TagDefinition, TagType, TagValue};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Error type for mesh database operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("Unknown entity handle: {0}")]
    UnknownHandle(EntityHandle),

    #[error("Entity {0} is not a set")]
    NotASet(EntityHandle),

    #[error("Entity {0} is not a vertex")]
    NotAVertex(EntityHandle),

    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    #[error("Tag {name} is already defined with a different type or size")]
    TagConflict { name: String },

    #[error("Tag {name} expects {expected} data, got {found}")]
    TagTypeMismatch {
        name: String,
        expected: TagType,
        found: TagType,
    },

    #[error("Value does not fit in tag {name} ({size} bytes)")]
    ValueTooLong { name: String, size: usize },

    #[error("{kind} element needs {expected} vertices, got {found}")]
    InvalidConnectivity {
        kind: ElementKind,
        expected: usize,
        found: usize,
    },

    #[error("File I/O error: {0}")]
    Io(String),

    #[error("Invalid mesh document: {0}")]
    Format(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl From<std::io::Error> for MeshError {
    fn from(err: std::io::Error) -> Self {
        MeshError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MeshError {
    fn from(err: serde_json::Error) -> Self {
        MeshError::Format(err.to_string())
    }
}

/// Result type for mesh database operations
pub type MeshResult<T> = Result<T, MeshError>;

/// Membership semantics of an entity-set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetKind {
    /// Keeps insertion order and duplicates
    Ordered,
    /// Keeps each member once
    Unordered,
}

/// Kind of mesh element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Edge,
    Triangle,
}

impl ElementKind {
    pub fn vertex_count(self) -> usize {
        match self {
            ElementKind::Edge => 2,
            ElementKind::Triangle => 3,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Edge => f.write_str("Edge"),
            ElementKind::Triangle => f.write_str("Triangle"),
        }
    }
}

/// Orientation of an entity relative to a containing entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sense {
    Forward,
    Reverse,
    Both,
}

impl Sense {
    pub fn code(self) -> i32 {
        match self {
            Sense::Forward => 1,
            Sense::Reverse => -1,
            Sense::Both => 0,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Sense::Forward),
            -1 => Some(Sense::Reverse),
            0 => Some(Sense::Both),
            _ => None,
        }
    }

    /// Combine two senses recorded against the same container
    pub fn merge(self, other: Sense) -> Sense {
        if self == other {
            self
        } else {
            Sense::Both
        }
    }
}

/// Handle-based mesh database.
///
/// Every call can fail; the exporter treats any failure as fatal.
pub trait MeshBackend {
    /// Define a tag. Defining an identical tag again returns the existing handle.
    fn define_tag(&mut self, definition: TagDefinition) -> MeshResult<Tag>;

    /// Look up a tag by name
    fn tag_handle(&self, name: &str) -> MeshResult<Tag>;

    fn tag_definition(&self, tag: Tag) -> MeshResult<TagDefinition>;

    fn create_set(&mut self, kind: SetKind) -> MeshResult<EntityHandle>;

    fn create_vertex(&mut self, position: Point3<f64>) -> MeshResult<EntityHandle>;

    fn create_element(
        &mut self,
        kind: ElementKind,
        connectivity: &[EntityHandle],
    ) -> MeshResult<EntityHandle>;

    /// Add entities to a set
    fn add_entities(&mut self, set: EntityHandle, entities: &[EntityHandle]) -> MeshResult<()>;

    /// Store a tag value. `EntityHandle::ROOT` tags the database itself.
    fn set_tag(&mut self, tag: Tag, entity: EntityHandle, value: TagValue) -> MeshResult<()>;

    /// Read a tag value, falling back to the tag default
    fn get_tag(&self, tag: Tag, entity: EntityHandle) -> MeshResult<Option<TagValue>>;

    /// Record the sense of `entity` relative to `container`
    fn set_sense(
        &mut self,
        entity: EntityHandle,
        container: EntityHandle,
        sense: Sense,
    ) -> MeshResult<()>;

    fn senses(&self, entity: EntityHandle) -> MeshResult<Vec<(EntityHandle, Sense)>>;

    fn add_parent_child(&mut self, parent: EntityHandle, child: EntityHandle) -> MeshResult<()>;

    fn parents(&self, set: EntityHandle) -> MeshResult<Vec<EntityHandle>>;

    fn children(&self, set: EntityHandle) -> MeshResult<Vec<EntityHandle>>;

    fn members(&self, set: EntityHandle) -> MeshResult<Vec<EntityHandle>>;

    fn vertex_position(&self, vertex: EntityHandle) -> MeshResult<Point3<f64>>;

    fn connectivity(&self, element: EntityHandle) -> MeshResult<Vec<EntityHandle>>;

    /// Every entity in the database, in creation order
    fn all_entities(&self) -> MeshResult<Vec<EntityHandle>>;

    /// Persist the whole database to `path`
    fn write_file(&self, path: &Path) -> MeshResult<()>;

    /// Release all entities and tags
    fn delete_mesh(&mut self) -> MeshResult<()>;
}
