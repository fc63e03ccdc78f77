// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Programmatic construction of B-rep models
//!
//! Used to build sample models and test fixtures. Every entity is given a
//! fresh key per kind, starting at 1.

use super::memory::{
    BodyDef, BrepModel, CoEdge, CompositeDef, EdgeDef, FaceDef, GroupDef, MemoryModel, VertexDef,
};
use super::{BodyRef, EdgeRef, EntityRef, FaceRef, FaceUse, GroupRef, UseSense, VertexRef};
use crate::geometry::SurfaceFacets;
use ahash::AHashMap;
use nalgebra::Point3;
use std::f64::consts::PI;

/// Corner loops of the six cuboid faces, counter-clockwise seen from outside.
/// Corner `i` sits at (`i & 1`, `i >> 1 & 1`, `i >> 2 & 1`) in unit coordinates.
const CUBOID_FACES: [[usize; 4]; 6] = [
    [0, 2, 3, 1],
    [4, 5, 7, 6],
    [0, 1, 5, 4],
    [2, 6, 7, 3],
    [0, 4, 6, 2],
    [1, 3, 7, 5],
];

const CUBOID_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (2, 3),
    (4, 5),
    (6, 7),
    (0, 2),
    (1, 3),
    (4, 6),
    (5, 7),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Builder for `BrepModel`
#[derive(Debug, Clone)]
pub struct BrepBuilder {
    model: BrepModel,
    next_vertex: u64,
    next_edge: u64,
    next_face: u64,
    next_body: u64,
    next_group: u64,
    segments: usize,
}

impl Default for BrepBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BrepBuilder {
    pub fn new() -> Self {
        Self {
            model: BrepModel::new(),
            next_vertex: 1,
            next_edge: 1,
            next_face: 1,
            next_body: 1,
            next_group: 1,
            segments: 1,
        }
    }

    /// Number of segments used to sample straight edges
    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments.max(1);
        self
    }

    /// Let composite bodies be broken down into their volumes
    pub fn enumerate_subvolumes(mut self, enabled: bool) -> Self {
        self.model.enumerate_subvolumes = enabled;
        self
    }

    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexRef {
        let id = VertexRef(self.next_vertex);
        self.next_vertex += 1;
        self.model.vertices.push(VertexDef { id, position });
        id
    }

    /// Add an edge with explicit curve samples
    pub fn add_edge(
        &mut self,
        start: Option<VertexRef>,
        end: Option<VertexRef>,
        samples: Vec<Point3<f64>>,
    ) -> EdgeRef {
        let id = EdgeRef(self.next_edge);
        self.next_edge += 1;
        self.model.edges.push(EdgeDef {
            id,
            start,
            end,
            reversed: false,
            samples,
        });
        id
    }

    /// Add a straight edge between two existing vertices
    pub fn add_line(&mut self, start: VertexRef, end: VertexRef) -> EdgeRef {
        let samples = match (self.position(start), self.position(end)) {
            (Some(a), Some(b)) => (0..=self.segments)
                .map(|i| {
                    let t = i as f64 / self.segments as f64;
                    a + (b - a) * t
                })
                .collect(),
            _ => Vec::new(),
        };
        self.add_edge(Some(start), Some(end), samples)
    }

    /// Add a closed circular edge in the XY plane, starting and ending at
    /// a single new vertex.
    pub fn add_circle(&mut self, center: Point3<f64>, radius: f64, segments: usize) -> EdgeRef {
        let segments = segments.max(3);
        let start = self.add_vertex(center + nalgebra::Vector3::new(radius, 0.0, 0.0));
        let samples = (0..=segments)
            .map(|i| {
                // Close the loop on the exact start position
                let angle = if i == segments {
                    0.0
                } else {
                    2.0 * PI * i as f64 / segments as f64
                };
                center + nalgebra::Vector3::new(radius * angle.cos(), radius * angle.sin(), 0.0)
            })
            .collect();
        self.add_edge(Some(start), Some(start), samples)
    }

    /// Mark an edge as running against its underlying curve
    pub fn set_edge_reversed(&mut self, edge: EdgeRef, reversed: bool) {
        if let Some(def) = self.model.edges.iter_mut().find(|e| e.id == edge) {
            def.reversed = reversed;
        }
    }

    /// Add a face bounded by the given edge uses
    pub fn add_face(&mut self, edges: Vec<CoEdge>, tessellation: SurfaceFacets) -> FaceRef {
        let id = FaceRef(self.next_face);
        self.next_face += 1;
        self.model.faces.push(FaceDef {
            id,
            edges,
            uses: Vec::new(),
            reversed: false,
            tessellation,
        });
        id
    }

    pub fn set_face_reversed(&mut self, face: FaceRef, reversed: bool) {
        if let Some(def) = self.model.faces.iter_mut().find(|f| f.id == face) {
            def.reversed = reversed;
        }
    }

    /// Replace the stored tessellation of a face
    pub fn set_tessellation(&mut self, face: FaceRef, tessellation: SurfaceFacets) {
        if let Some(def) = self.model.faces.iter_mut().find(|f| f.id == face) {
            def.tessellation = tessellation;
        }
    }

    /// Replace the stored samples of an edge
    pub fn set_samples(&mut self, edge: EdgeRef, samples: Vec<Point3<f64>>) {
        if let Some(def) = self.model.edges.iter_mut().find(|e| e.id == edge) {
            def.samples = samples;
        }
    }

    pub fn add_body(&mut self, name: Option<&str>) -> BodyRef {
        let id = BodyRef(self.next_body);
        self.next_body += 1;
        self.model.bodies.push(BodyDef {
            id,
            name: name.map(str::to_string),
        });
        id
    }

    /// Make `body` use `face` with the given sense. Unknown faces are ignored.
    pub fn attach_face(&mut self, face: FaceRef, body: BodyRef, sense: UseSense) {
        if let Some(def) = self.model.faces.iter_mut().find(|f| f.id == face) {
            def.uses.push(FaceUse { body, sense });
        }
    }

    /// Add an axis-aligned box body with outward facing faces
    pub fn cuboid(&mut self, min: Point3<f64>, max: Point3<f64>) -> BodyRef {
        let body = self.add_body(None);

        let corners: Vec<Point3<f64>> = (0..8)
            .map(|i| {
                Point3::new(
                    if i & 1 == 0 { min.x } else { max.x },
                    if (i >> 1) & 1 == 0 { min.y } else { max.y },
                    if (i >> 2) & 1 == 0 { min.z } else { max.z },
                )
            })
            .collect();
        let vertices: Vec<VertexRef> = corners.iter().map(|&p| self.add_vertex(p)).collect();

        let mut edges: AHashMap<(usize, usize), EdgeRef> = AHashMap::new();
        for &(a, b) in &CUBOID_EDGES {
            let edge = self.add_line(vertices[a], vertices[b]);
            edges.insert((a, b), edge);
        }

        for corner_loop in &CUBOID_FACES {
            let mut coedges = Vec::with_capacity(4);
            for k in 0..4 {
                let a = corner_loop[k];
                let b = corner_loop[(k + 1) % 4];
                let (key, sense) = if a < b {
                    ((a, b), UseSense::Forward)
                } else {
                    ((b, a), UseSense::Reversed)
                };
                if let Some(&edge) = edges.get(&key) {
                    coedges.push(CoEdge { edge, sense });
                }
            }
            let points = corner_loop.iter().map(|&i| corners[i]).collect();
            let face = self.add_face(
                coedges,
                SurfaceFacets::new(points, vec![[0, 1, 2], [0, 2, 3]]),
            );
            self.attach_face(face, body, UseSense::Forward);
        }

        body
    }

    pub fn add_group(&mut self, names: &[&str], members: Vec<EntityRef>) -> GroupRef {
        let id = GroupRef(self.next_group);
        self.next_group += 1;
        self.model.groups.push(GroupDef {
            id,
            names: names.iter().map(|n| n.to_string()).collect(),
            members,
        });
        id
    }

    /// Add a composite body made of existing volumes. The composite itself
    /// is not an exported volume.
    pub fn add_composite(&mut self, volumes: Vec<BodyRef>) -> BodyRef {
        let id = BodyRef(self.next_body);
        self.next_body += 1;
        self.model.composites.push(CompositeDef { id, volumes });
        id
    }

    pub fn position(&self, vertex: VertexRef) -> Option<Point3<f64>> {
        self.model
            .vertices
            .iter()
            .find(|v| v.id == vertex)
            .map(|v| v.position)
    }

    pub fn model(&self) -> &BrepModel {
        &self.model
    }

    pub fn build(self) -> BrepModel {
        self.model
    }

    pub fn into_host(self) -> MemoryModel {
        MemoryModel::new(self.model)
    }
}

/// Two boxes side by side with a material group and a boundary group
pub fn demo_model() -> BrepModel {
    let mut builder = BrepBuilder::new().with_segments(4);
    let left = builder.cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 10.0));
    let right = builder.cuboid(Point3::new(12.0, 0.0, 0.0), Point3::new(22.0, 10.0, 10.0));
    builder.add_group(&["mat:steel"], vec![left.into(), right.into()]);
    builder.add_group(&["boundary:vacuum", "graveyard"], vec![FaceRef(1).into()]);
    builder.build()
}
