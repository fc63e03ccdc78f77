// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh module - handle-based mesh database and its in-memory backend

mod backend;
mod handle;
mod memory;
mod tags;

pub use backend::{ElementKind, MeshBackend, MeshError, MeshResult, Sense, SetKind};
pub use handle::EntityHandle;
pub use memory::{MemoryMesh, MeshEntity, MeshSet};
pub use tags::{
    extra_name_tag_name, truncate_to_bytes, Tag, TagDefinition, TagType, TagValue,
    CATEGORY_TAG_NAME, CATEGORY_TAG_SIZE, EXTRA_NAME_TAG_PREFIX, FACETING_TOL_TAG_NAME,
    GEOMETRY_RESABS_TAG_NAME, GEOM_DIMENSION_TAG_NAME, GLOBAL_ID_TAG_NAME, NAME_TAG_NAME,
    NAME_TAG_SIZE,
};
