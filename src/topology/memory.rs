// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! In-memory B-rep model
//!
//! `BrepModel` is the serializable description of a model together with
//! its precomputed tessellation. `MemoryModel` indexes it and answers the
//! host queries the exporter needs.

use super::{
    BodyRef, EdgeRef, EdgeUse, EntityRef, FaceRef, FaceUse, GroupRef, HostModel,
    TessellationService, UseSense, VertexRef,
};
use crate::geometry::{CurveFacets, FacetParams, SurfaceFacets};
use ahash::AHashMap;
use anyhow::{Context, Result};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexDef {
    pub id: VertexRef,
    pub position: Point3<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDef {
    pub id: EdgeRef,
    pub start: Option<VertexRef>,
    pub end: Option<VertexRef>,
    #[serde(default)]
    pub reversed: bool,
    /// Curve samples from start to end
    #[serde(default)]
    pub samples: Vec<Point3<f64>>,
}

/// An edge as used by one face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoEdge {
    pub edge: EdgeRef,
    #[serde(default)]
    pub sense: UseSense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDef {
    pub id: FaceRef,
    pub edges: Vec<CoEdge>,
    #[serde(default)]
    pub uses: Vec<FaceUse>,
    #[serde(default)]
    pub reversed: bool,
    #[serde(default)]
    pub tessellation: SurfaceFacets,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDef {
    pub id: BodyRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDef {
    pub id: GroupRef,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub members: Vec<EntityRef>,
}

/// A body made of several exported volumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeDef {
    pub id: BodyRef,
    pub volumes: Vec<BodyRef>,
}

/// Serializable B-rep model with precomputed tessellation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrepModel {
    #[serde(default)]
    pub vertices: Vec<VertexDef>,
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
    #[serde(default)]
    pub faces: Vec<FaceDef>,
    #[serde(default)]
    pub bodies: Vec<BodyDef>,
    #[serde(default)]
    pub groups: Vec<GroupDef>,
    #[serde(default)]
    pub composites: Vec<CompositeDef>,
    /// Host capability: composite bodies expose their volumes
    #[serde(default)]
    pub enumerate_subvolumes: bool,
}

impl BrepModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("Failed to parse B-rep model")
    }

    /// Load a model from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read model file: {:?}", path.as_ref()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to load model file: {:?}", path.as_ref()))
    }

    /// Save the model as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize model")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write model file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn into_host(self) -> MemoryModel {
        MemoryModel::new(self)
    }
}

/// Indexed view of a `BrepModel` implementing the host interfaces
#[derive(Debug, Clone)]
pub struct MemoryModel {
    model: BrepModel,
    vertices: AHashMap<VertexRef, usize>,
    edges: AHashMap<EdgeRef, usize>,
    faces: AHashMap<FaceRef, usize>,
    groups: AHashMap<GroupRef, usize>,
    composites: AHashMap<BodyRef, usize>,
    vertex_edges: AHashMap<VertexRef, Vec<EdgeRef>>,
    edge_uses: AHashMap<EdgeRef, Vec<EdgeUse>>,
    body_faces: AHashMap<BodyRef, Vec<FaceRef>>,
}

impl MemoryModel {
    pub fn new(model: BrepModel) -> Self {
        let vertices = index_by(&model.vertices, |v| v.id);
        let edges = index_by(&model.edges, |e| e.id);
        let faces = index_by(&model.faces, |f| f.id);
        let groups = index_by(&model.groups, |g| g.id);
        let composites = index_by(&model.composites, |c| c.id);

        let mut vertex_edges: AHashMap<VertexRef, Vec<EdgeRef>> = AHashMap::new();
        for edge in &model.edges {
            for vertex in [edge.start, edge.end].into_iter().flatten() {
                let list = vertex_edges.entry(vertex).or_default();
                if !list.contains(&edge.id) {
                    list.push(edge.id);
                }
            }
        }

        let mut edge_uses: AHashMap<EdgeRef, Vec<EdgeUse>> = AHashMap::new();
        let mut body_faces: AHashMap<BodyRef, Vec<FaceRef>> = AHashMap::new();
        for face in &model.faces {
            for coedge in &face.edges {
                edge_uses.entry(coedge.edge).or_default().push(EdgeUse {
                    face: face.id,
                    sense: coedge.sense,
                });
            }
            for face_use in &face.uses {
                let list = body_faces.entry(face_use.body).or_default();
                if !list.contains(&face.id) {
                    list.push(face.id);
                }
            }
        }

        Self {
            model,
            vertices,
            edges,
            faces,
            groups,
            composites,
            vertex_edges,
            edge_uses,
            body_faces,
        }
    }

    /// Get a reference to the underlying model
    pub fn model(&self) -> &BrepModel {
        &self.model
    }

    pub fn into_model(self) -> BrepModel {
        self.model
    }

    fn edge(&self, edge: EdgeRef) -> Option<&EdgeDef> {
        self.edges.get(&edge).map(|&i| &self.model.edges[i])
    }

    fn face(&self, face: FaceRef) -> Option<&FaceDef> {
        self.faces.get(&face).map(|&i| &self.model.faces[i])
    }

    fn group(&self, group: GroupRef) -> Option<&GroupDef> {
        self.groups.get(&group).map(|&i| &self.model.groups[i])
    }

    fn known_vertex(&self, vertex: Option<VertexRef>) -> Option<VertexRef> {
        vertex.filter(|v| self.vertices.contains_key(v))
    }
}

fn index_by<T, K: std::hash::Hash + Eq>(items: &[T], key: impl Fn(&T) -> K) -> AHashMap<K, usize> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| (key(item), i))
        .collect()
}

impl HostModel for MemoryModel {
    fn bodies(&self) -> Vec<BodyRef> {
        self.model.bodies.iter().map(|b| b.id).collect()
    }

    fn faces(&self) -> Vec<FaceRef> {
        self.model.faces.iter().map(|f| f.id).collect()
    }

    fn edges(&self) -> Vec<EdgeRef> {
        self.model.edges.iter().map(|e| e.id).collect()
    }

    fn groups(&self) -> Vec<GroupRef> {
        self.model.groups.iter().map(|g| g.id).collect()
    }

    fn edge_vertices(&self, edge: EdgeRef) -> (Option<VertexRef>, Option<VertexRef>) {
        match self.edge(edge) {
            Some(def) => (self.known_vertex(def.start), self.known_vertex(def.end)),
            None => (None, None),
        }
    }

    fn edge_faces(&self, edge: EdgeRef) -> Vec<FaceRef> {
        let mut faces: Vec<FaceRef> = Vec::new();
        for edge_use in self.edge_uses.get(&edge).into_iter().flatten() {
            if !faces.contains(&edge_use.face) {
                faces.push(edge_use.face);
            }
        }
        faces
    }

    fn edge_uses(&self, edge: EdgeRef) -> Vec<EdgeUse> {
        self.edge_uses.get(&edge).cloned().unwrap_or_default()
    }

    fn edge_is_reversed(&self, edge: EdgeRef) -> bool {
        self.edge(edge).map(|e| e.reversed).unwrap_or(false)
    }

    fn vertex_position(&self, vertex: VertexRef) -> Option<Point3<f64>> {
        self.vertices
            .get(&vertex)
            .map(|&i| self.model.vertices[i].position)
    }

    fn vertex_edges(&self, vertex: VertexRef) -> Vec<EdgeRef> {
        self.vertex_edges.get(&vertex).cloned().unwrap_or_default()
    }

    fn face_bodies(&self, face: FaceRef) -> Vec<BodyRef> {
        let mut bodies: Vec<BodyRef> = Vec::new();
        for face_use in self.face_uses(face) {
            if !bodies.contains(&face_use.body) {
                bodies.push(face_use.body);
            }
        }
        bodies
    }

    fn face_uses(&self, face: FaceRef) -> Vec<FaceUse> {
        self.face(face).map(|f| f.uses.clone()).unwrap_or_default()
    }

    fn face_edges(&self, face: FaceRef) -> Vec<EdgeRef> {
        let mut edges: Vec<EdgeRef> = Vec::new();
        for coedge in self.face(face).map(|f| f.edges.as_slice()).unwrap_or_default() {
            if !edges.contains(&coedge.edge) {
                edges.push(coedge.edge);
            }
        }
        edges
    }

    fn face_is_reversed(&self, face: FaceRef) -> bool {
        self.face(face).map(|f| f.reversed).unwrap_or(false)
    }

    fn body_faces(&self, body: BodyRef) -> Vec<FaceRef> {
        self.body_faces.get(&body).cloned().unwrap_or_default()
    }

    fn body_edges(&self, body: BodyRef) -> Vec<EdgeRef> {
        let mut edges: Vec<EdgeRef> = Vec::new();
        for face in self.body_faces(body) {
            for edge in self.face_edges(face) {
                if !edges.contains(&edge) {
                    edges.push(edge);
                }
            }
        }
        edges
    }

    fn group_names(&self, group: GroupRef) -> Vec<String> {
        self.group(group).map(|g| g.names.clone()).unwrap_or_default()
    }

    fn group_members(&self, group: GroupRef) -> Vec<EntityRef> {
        self.group(group).map(|g| g.members.clone()).unwrap_or_default()
    }

    fn can_enumerate_subvolumes(&self) -> bool {
        self.model.enumerate_subvolumes
    }

    fn subvolumes(&self, body: BodyRef) -> Vec<BodyRef> {
        self.composites
            .get(&body)
            .map(|&i| self.model.composites[i].volumes.clone())
            .unwrap_or_default()
    }
}

impl TessellationService for MemoryModel {
    /// Returns the stored samples; the tolerances were applied when the
    /// model was built.
    fn facet_curve(&self, edge: EdgeRef, _params: &FacetParams) -> CurveFacets {
        self.edge(edge)
            .map(|e| CurveFacets::new(e.samples.clone()))
            .unwrap_or_default()
    }

    fn facet_surface(&self, face: FaceRef, _params: &FacetParams) -> SurfaceFacets {
        self.face(face)
            .map(|f| f.tessellation.clone())
            .unwrap_or_default()
    }
}
