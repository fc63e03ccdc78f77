// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Host model query and tessellation interfaces
//!
//! The host kernel exposes bottom-up adjacency (an edge knows its faces,
//! a face knows its bodies). The exporter only ever queries in that
//! direction and inverts the relationship itself.

use super::{BodyRef, EdgeRef, EdgeUse, EntityRef, FaceRef, FaceUse, GroupRef, VertexRef};
use crate::geometry::{CurveFacets, FacetParams, SurfaceFacets};
use nalgebra::Point3;

/// Read-only queries against a live B-rep model
pub trait HostModel {
    /// All bodies of the active model
    fn bodies(&self) -> Vec<BodyRef>;

    /// All faces of the active model
    fn faces(&self) -> Vec<FaceRef>;

    /// All edges of the active model
    fn edges(&self) -> Vec<EdgeRef>;

    /// All named groups of the active model
    fn groups(&self) -> Vec<GroupRef>;

    /// Start and end vertex of an edge. Either may be missing.
    fn edge_vertices(&self, edge: EdgeRef) -> (Option<VertexRef>, Option<VertexRef>);

    /// Faces bounded by an edge
    fn edge_faces(&self, edge: EdgeRef) -> Vec<FaceRef>;

    /// Oriented uses of an edge by its faces
    fn edge_uses(&self, edge: EdgeRef) -> Vec<EdgeUse>;

    /// Whether the edge runs against its underlying curve
    fn edge_is_reversed(&self, _edge: EdgeRef) -> bool {
        false
    }

    /// Position of a vertex, `None` if the host cannot resolve it
    fn vertex_position(&self, vertex: VertexRef) -> Option<Point3<f64>>;

    /// Edges meeting at a vertex
    fn vertex_edges(&self, vertex: VertexRef) -> Vec<EdgeRef>;

    /// Bodies bounded by a face
    fn face_bodies(&self, face: FaceRef) -> Vec<BodyRef>;

    /// Oriented uses of a face by its bodies
    fn face_uses(&self, face: FaceRef) -> Vec<FaceUse>;

    fn face_edges(&self, face: FaceRef) -> Vec<EdgeRef>;

    /// Whether the face normal runs against its underlying surface
    fn face_is_reversed(&self, face: FaceRef) -> bool;

    fn body_faces(&self, body: BodyRef) -> Vec<FaceRef>;

    fn body_edges(&self, body: BodyRef) -> Vec<EdgeRef>;

    /// Names of a group, primary name first
    fn group_names(&self, group: GroupRef) -> Vec<String>;

    fn group_members(&self, group: GroupRef) -> Vec<EntityRef>;

    /// Whether composite bodies can be broken down into their volumes
    fn can_enumerate_subvolumes(&self) -> bool {
        false
    }

    /// Volumes making up a composite body
    fn subvolumes(&self, _body: BodyRef) -> Vec<BodyRef> {
        Vec::new()
    }

    /// Distinct vertices bounding a face, in edge order
    fn face_vertices(&self, face: FaceRef) -> Vec<VertexRef> {
        let mut vertices = Vec::new();
        for edge in self.face_edges(face) {
            let (start, end) = self.edge_vertices(edge);
            for vertex in [start, end].into_iter().flatten() {
                if !vertices.contains(&vertex) {
                    vertices.push(vertex);
                }
            }
        }
        vertices
    }
}

/// Black-box faceting service of the host kernel.
///
/// Failures are reported as empty results, never as errors.
pub trait TessellationService {
    fn facet_curve(&self, edge: EdgeRef, params: &FacetParams) -> CurveFacets;

    fn facet_surface(&self, face: FaceRef, params: &FacetParams) -> SurfaceFacets;
}
