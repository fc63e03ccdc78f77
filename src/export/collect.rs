// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Topology collection

use crate::topology::{
    BodyRef, Dimension, EdgeRef, EntityCounts, EntityRef, FaceRef, GroupRef, HostModel, VertexRef,
};
use tracing::debug;

/// Entities of one export, per dimension
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    pub vertices: Vec<VertexRef>,
    pub edges: Vec<EdgeRef>,
    pub faces: Vec<FaceRef>,
    pub bodies: Vec<BodyRef>,
    pub groups: Vec<GroupRef>,
}

impl Topology {
    /// Entities of one dimension in collection order
    pub fn entities(&self, dim: Dimension) -> Vec<EntityRef> {
        match dim {
            Dimension::Vertex => self.vertices.iter().map(|&v| v.into()).collect(),
            Dimension::Curve => self.edges.iter().map(|&e| e.into()).collect(),
            Dimension::Surface => self.faces.iter().map(|&f| f.into()).collect(),
            Dimension::Volume => self.bodies.iter().map(|&b| b.into()).collect(),
            Dimension::Group => self.groups.iter().map(|&g| g.into()).collect(),
        }
    }

    pub fn counts(&self) -> EntityCounts {
        EntityCounts {
            vertices: self.vertices.len(),
            edges: self.edges.len(),
            faces: self.faces.len(),
            bodies: self.bodies.len(),
            groups: self.groups.len(),
        }
    }
}

/// Enumerate everything the host model exposes.
///
/// Vertices are found through edge endpoints; a missing endpoint is
/// skipped.
pub fn collect<M: HostModel + ?Sized>(model: &M) -> Topology {
    let edges = model.edges();
    let mut vertices: Vec<VertexRef> = Vec::new();
    let mut seen = ahash::AHashSet::new();
    for &edge in &edges {
        let (start, end) = model.edge_vertices(edge);
        if start.is_none() || end.is_none() {
            debug!("{} is missing an end vertex", edge);
        }
        for vertex in [start, end].into_iter().flatten() {
            if seen.insert(vertex) {
                vertices.push(vertex);
            }
        }
    }

    Topology {
        vertices,
        edges,
        faces: model.faces(),
        bodies: model.bodies(),
        groups: model.groups(),
    }
}
