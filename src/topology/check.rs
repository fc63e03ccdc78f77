// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Pre-export consistency check of a B-rep model
//!
//! Runs the same host queries as the exporter without touching a mesh
//! database and lists everything the export would warn about.

use super::{BodyRef, EdgeRef, FaceRef, HostModel, TessellationService, VertexRef};
use crate::geometry::{coincident, BoundingBox, FacetParams, GEOMETRY_RESABS};
use serde::Serialize;
use std::fmt;

/// A single problem found in the model
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum CheckIssue {
    MissingEndpoint { edge: EdgeRef },
    UnresolvedVertex { vertex: VertexRef },
    FreeEdge { edge: EdgeRef },
    FreeFace { face: FaceRef },
    EmptyBody { body: BodyRef },
    EmptyCurve { edge: EdgeRef },
    EmptySurface { face: FaceRef },
    InvalidFacetIndex { face: FaceRef, index: usize },
    CurveEndMismatch { edge: EdgeRef },
}

impl fmt::Display for CheckIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckIssue::MissingEndpoint { edge } => write!(f, "{} is missing an end vertex", edge),
            CheckIssue::UnresolvedVertex { vertex } => {
                write!(f, "{} has no position", vertex)
            }
            CheckIssue::FreeEdge { edge } => write!(f, "{} bounds no face", edge),
            CheckIssue::FreeFace { face } => write!(f, "{} bounds no body", face),
            CheckIssue::EmptyBody { body } => write!(f, "{} has no faces", body),
            CheckIssue::EmptyCurve { edge } => write!(f, "{} has no facets", edge),
            CheckIssue::EmptySurface { face } => write!(f, "{} has no facets", face),
            CheckIssue::InvalidFacetIndex { face, index } => {
                write!(f, "{} references missing facet point {}", face, index)
            }
            CheckIssue::CurveEndMismatch { edge } => {
                write!(f, "vertices not at ends of curve {}", edge)
            }
        }
    }
}

/// Entity counts of a model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
    pub bodies: usize,
    pub groups: usize,
}

/// Result of `check_model`
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub counts: EntityCounts,
    pub bounds: BoundingBox,
    pub issues: Vec<CheckIssue>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check a host model for problems that would show up during export
pub fn check_model<M>(model: &M, params: &FacetParams) -> CheckReport
where
    M: HostModel + TessellationService,
{
    let mut issues = Vec::new();
    let mut bounds = BoundingBox::empty();
    let mut vertices: Vec<VertexRef> = Vec::new();

    let edges = model.edges();
    for &edge in &edges {
        let (start, end) = model.edge_vertices(edge);
        if start.is_none() || end.is_none() {
            issues.push(CheckIssue::MissingEndpoint { edge });
        }
        for vertex in [start, end].into_iter().flatten() {
            if !vertices.contains(&vertex) {
                vertices.push(vertex);
            }
        }

        if model.edge_faces(edge).is_empty() {
            issues.push(CheckIssue::FreeEdge { edge });
        }

        let mut facets = model.facet_curve(edge, params);
        if facets.is_empty() {
            issues.push(CheckIssue::EmptyCurve { edge });
            continue;
        }
        if model.edge_is_reversed(edge) {
            facets.points.reverse();
        }
        for point in &facets.points {
            bounds.expand_to_include(point);
        }

        let first = facets.points.first();
        let last = facets.points.last();
        let start_ok = end_matches(model, start, first);
        let end_ok = end_matches(model, end, last);
        if facets.len() >= 2 && !(start_ok && end_ok) {
            issues.push(CheckIssue::CurveEndMismatch { edge });
        }
    }

    for &vertex in &vertices {
        match model.vertex_position(vertex) {
            Some(position) => bounds.expand_to_include(&position),
            None => issues.push(CheckIssue::UnresolvedVertex { vertex }),
        }
    }

    let faces = model.faces();
    for &face in &faces {
        if model.face_bodies(face).is_empty() {
            issues.push(CheckIssue::FreeFace { face });
        }
        let facets = model.facet_surface(face, params);
        if facets.facet_count() == 0 {
            issues.push(CheckIssue::EmptySurface { face });
            continue;
        }
        if let Some(index) = facets.first_invalid_index() {
            issues.push(CheckIssue::InvalidFacetIndex { face, index });
        }
        for point in &facets.points {
            bounds.expand_to_include(point);
        }
    }

    let bodies = model.bodies();
    for &body in &bodies {
        if model.body_faces(body).is_empty() {
            issues.push(CheckIssue::EmptyBody { body });
        }
    }

    CheckReport {
        counts: EntityCounts {
            vertices: vertices.len(),
            edges: edges.len(),
            faces: faces.len(),
            bodies: bodies.len(),
            groups: model.groups().len(),
        },
        bounds,
        issues,
    }
}

/// A missing vertex or sample is reported elsewhere, so it counts as a match
fn end_matches<M: HostModel>(
    model: &M,
    vertex: Option<VertexRef>,
    sample: Option<&nalgebra::Point3<f64>>,
) -> bool {
    match (vertex.and_then(|v| model.vertex_position(v)), sample) {
        (Some(position), Some(sample)) => coincident(&position, sample, GEOMETRY_RESABS),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SurfaceFacets;
    use crate::topology::BrepBuilder;
    use nalgebra::Point3;

    #[test]
    fn test_clean_cuboid() {
        let mut builder = BrepBuilder::new().with_segments(2);
        builder.cuboid(Point3::origin(), Point3::new(2.0, 2.0, 2.0));
        let report = check_model(&builder.into_host(), &FacetParams::default());
        assert!(report.is_ok(), "{:?}", report.issues);
        assert_eq!(report.counts.vertices, 8);
        assert_eq!(report.counts.edges, 12);
        assert_eq!(report.bounds.max, Point3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_reports_problems() {
        let mut builder = BrepBuilder::new();
        builder.cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        builder.set_samples(EdgeRef(1), Vec::new());
        builder.set_samples(
            EdgeRef(2),
            vec![Point3::new(0.5, 1.0, 0.0), Point3::new(1.0, 1.0, 0.0)],
        );
        builder.set_tessellation(
            FaceRef(1),
            SurfaceFacets::new(vec![Point3::origin()], vec![[0, 1, 2]]),
        );
        let a = builder.add_vertex(Point3::new(5.0, 5.0, 5.0));
        let wire = builder.add_edge(Some(a), None, vec![Point3::new(5.0, 5.0, 5.0)]);

        let report = check_model(&builder.into_host(), &FacetParams::default());
        assert!(report.issues.contains(&CheckIssue::EmptyCurve { edge: EdgeRef(1) }));
        assert!(report
            .issues
            .contains(&CheckIssue::CurveEndMismatch { edge: EdgeRef(2) }));
        assert!(report.issues.contains(&CheckIssue::InvalidFacetIndex {
            face: FaceRef(1),
            index: 1
        }));
        assert!(report.issues.contains(&CheckIssue::MissingEndpoint { edge: wire }));
        assert!(report.issues.contains(&CheckIssue::FreeEdge { edge: wire }));
    }
}
