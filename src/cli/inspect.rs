// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Summary of a written mesh database

use crate::geometry::BoundingBox;
use crate::mesh::{
    ElementKind, MemoryMesh, MeshBackend, MeshEntity, MeshResult, CATEGORY_TAG_NAME,
    FACETING_TOL_TAG_NAME, GEOMETRY_RESABS_TAG_NAME,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Entity counts and file-level tolerances of a mesh database
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshInventory {
    /// Entity-sets per `CATEGORY` value
    pub categories: BTreeMap<String, usize>,
    pub sets: usize,
    pub vertices: usize,
    pub edges: usize,
    pub triangles: usize,
    pub faceting_tolerance: Option<f64>,
    pub geometry_resabs: Option<f64>,
    pub bounds: BoundingBox,
}

impl MeshInventory {
    pub fn of(mesh: &MemoryMesh) -> MeshResult<Self> {
        let mut inventory = MeshInventory {
            categories: BTreeMap::new(),
            sets: 0,
            vertices: 0,
            edges: 0,
            triangles: 0,
            faceting_tolerance: file_tolerance(mesh, FACETING_TOL_TAG_NAME)?,
            geometry_resabs: file_tolerance(mesh, GEOMETRY_RESABS_TAG_NAME)?,
            bounds: BoundingBox::empty(),
        };

        for (_, entity) in mesh.entities() {
            match entity {
                MeshEntity::Vertex(position) => {
                    inventory.vertices += 1;
                    inventory.bounds.expand_to_include(position);
                }
                MeshEntity::Element { kind, .. } => match kind {
                    ElementKind::Edge => inventory.edges += 1,
                    ElementKind::Triangle => inventory.triangles += 1,
                },
                MeshEntity::Set(_) => inventory.sets += 1,
            }
        }

        if let Ok(category) = mesh.tag_handle(CATEGORY_TAG_NAME) {
            for value in mesh.tag_values(category)?.values() {
                if let Some(name) = value.as_str() {
                    *inventory.categories.entry(name.to_string()).or_default() += 1;
                }
            }
        }
        Ok(inventory)
    }

    /// Number of sets with the given category
    pub fn category(&self, name: &str) -> usize {
        self.categories.get(name).copied().unwrap_or(0)
    }
}

fn file_tolerance(mesh: &MemoryMesh, name: &str) -> MeshResult<Option<f64>> {
    let Ok(tag) = mesh.tag_handle(name) else {
        return Ok(None);
    };
    Ok(mesh
        .tag_values(tag)?
        .values()
        .find_map(|value| value.as_double()))
}
