// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Faceting and vertex sharing tests

use anyhow::Result;
use approx::assert_relative_eq;
use dagmc_export::export::{collect, DagmcExporter, ExportConfig, UniqueIdRegistry};
use dagmc_export::io;
use dagmc_export::mesh::{
    EntityHandle, MemoryMesh, MeshBackend, MeshEntity, SetKind, TagValue, GLOBAL_ID_TAG_NAME,
};
use dagmc_export::geometry::{CurveFacets, FacetParams, SurfaceFacets};
use dagmc_export::topology::{
    BodyRef, BrepBuilder, EdgeRef, EdgeUse, EntityRef, FaceRef, FaceUse, GroupRef, HostModel,
    MemoryModel, TessellationService, VertexRef,
};
use nalgebra::Point3;
use std::cell::RefCell;
use tempfile::tempdir;

fn export(host: &MemoryModel, config: ExportConfig) -> Result<MemoryMesh> {
    let mut exporter = DagmcExporter::new(config);
    exporter.build(host)?;
    Ok(exporter.into_backend())
}

fn set_of(
    mesh: &MemoryMesh,
    host: &MemoryModel,
    entity: impl Into<EntityRef>,
) -> Result<EntityHandle> {
    let ids = UniqueIdRegistry::for_topology(&collect(host));
    let global_id = mesh.tag_handle(GLOBAL_ID_TAG_NAME)?;
    let sets = mesh.sets_with_tag(global_id, &TagValue::Integer(ids.lookup(entity)?))?;
    Ok(sets[0])
}

#[test]
fn test_adjacent_faces_share_vertex_points() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("box.json");
    let mut builder = BrepBuilder::new().with_segments(3);
    builder.cuboid(Point3::origin(), Point3::new(2.0, 2.0, 2.0));
    let host = builder.into_host();

    export(
        &host,
        ExportConfig {
            output_filename: output.clone(),
            ..Default::default()
        },
    )?;
    let mesh = io::read_document(&output)?;

    let bottom = mesh.members(set_of(&mesh, &host, FaceRef(1))?)?;
    let front = mesh.members(set_of(&mesh, &host, FaceRef(3))?)?;
    let shared: Vec<_> = bottom
        .iter()
        .filter(|h| matches!(mesh.entity(**h), Some(MeshEntity::Vertex(_))))
        .filter(|h| front.contains(*h))
        .collect();
    assert_eq!(shared.len(), 2);

    // eight corners plus two interior points on each of the twelve edges
    let points = mesh
        .entities()
        .filter(|(_, e)| matches!(e, MeshEntity::Vertex(_)))
        .count();
    assert_eq!(points, 8 + 12 * 2);
    Ok(())
}

#[test]
fn test_closed_curve_in_file() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("circle.json");
    let mut builder = BrepBuilder::new();
    let circle = builder.add_circle(Point3::new(1.0, 1.0, 0.0), 3.0, 12);
    let host = builder.into_host();

    let summary = DagmcExporter::new(ExportConfig {
        output_filename: output.clone(),
        ..Default::default()
    })
    .execute(&host)?;
    assert_eq!(summary.inconsistent_curves, 0);
    assert_eq!(summary.curve_end_warnings, 0);

    let mesh = io::read_document(&output)?;
    let curve = set_of(&mesh, &host, circle)?;
    assert_eq!(mesh.set(curve)?.kind, SetKind::Ordered);

    let members = mesh.members(curve)?;
    let (points, edges): (Vec<&EntityHandle>, Vec<&EntityHandle>) = members
        .iter()
        .partition(|h| matches!(mesh.entity(**h), Some(MeshEntity::Vertex(_))));
    assert_eq!(points.len(), 12);
    assert_eq!(edges.len(), 12);

    for point in points {
        let p = mesh.vertex_position(*point)?;
        assert_relative_eq!((p - Point3::new(1.0, 1.0, 0.0)).norm(), 3.0, epsilon = 1e-9);
    }
    // the last segment closes the loop on the first point
    let last = mesh.connectivity(*edges[11])?;
    assert_eq!(last[1], members[0]);
    Ok(())
}

#[test]
fn test_warning_suppression_over_budget() -> Result<()> {
    let dir = tempdir()?;
    let mut builder = BrepBuilder::new();
    for i in 0..12 {
        let x = i as f64 * 5.0;
        let a = builder.add_vertex(Point3::new(x, 0.0, 0.0));
        let b = builder.add_vertex(Point3::new(x + 1.0, 0.0, 0.0));
        // samples end short of the second vertex
        builder.add_edge(
            Some(a),
            Some(b),
            vec![Point3::new(x, 0.0, 0.0), Point3::new(x + 0.9, 0.0, 0.0)],
        );
    }
    let host = builder.into_host();

    let config = ExportConfig {
        output_filename: dir.path().join("wires.json"),
        curve_warning_budget: 5,
        ..Default::default()
    };
    let summary = DagmcExporter::new(config.clone()).execute(&host)?;
    assert_eq!(summary.curve_end_warnings, 12);
    assert_eq!(summary.suppressed_curve_warnings, 7);

    let verbose = ExportConfig {
        verbose: true,
        ..config
    };
    let summary = DagmcExporter::new(verbose).execute(&host)?;
    assert_eq!(summary.suppressed_curve_warnings, 0);
    Ok(())
}

#[test]
fn test_surface_failure_is_recoverable() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("box.json");
    let mut builder = BrepBuilder::new();
    builder.cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
    builder.set_tessellation(FaceRef(4), Default::default());
    let host = builder.into_host();

    let mesh = export(
        &host,
        ExportConfig {
            output_filename: output.clone(),
            ..Default::default()
        },
    )?;
    assert!(output.exists());
    let surface = set_of(&mesh, &host, FaceRef(4))?;
    assert!(mesh.members(surface)?.is_empty());
    Ok(())
}

#[test]
fn test_free_sheet_is_faceted() -> Result<()> {
    let dir = tempdir()?;
    let mut builder = BrepBuilder::new();
    builder.cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
    let host_model = {
        let mut model = builder.build();
        // detach the top face from the body
        model.faces[1].uses.clear();
        model
    };
    let host = host_model.into_host();

    let mesh = export(
        &host,
        ExportConfig {
            output_filename: dir.path().join("sheet.json"),
            ..Default::default()
        },
    )?;
    let top = mesh.members(set_of(&mesh, &host, FaceRef(2))?)?;
    let triangles = top
        .iter()
        .filter(|h| matches!(mesh.entity(**h), Some(MeshEntity::Element { .. })))
        .count();
    assert_eq!(triangles, 2);
    Ok(())
}

/// Wraps a `MemoryModel`, records the tolerances of every faceting call and
/// hides the position of some vertices
struct RecordingModel {
    inner: MemoryModel,
    params: RefCell<Vec<FacetParams>>,
    unplaced: Vec<VertexRef>,
}

impl RecordingModel {
    fn new(inner: MemoryModel) -> Self {
        Self {
            inner,
            params: RefCell::new(Vec::new()),
            unplaced: Vec::new(),
        }
    }
}

impl HostModel for RecordingModel {
    fn bodies(&self) -> Vec<BodyRef> {
        self.inner.bodies()
    }

    fn faces(&self) -> Vec<FaceRef> {
        self.inner.faces()
    }

    fn edges(&self) -> Vec<EdgeRef> {
        self.inner.edges()
    }

    fn groups(&self) -> Vec<GroupRef> {
        self.inner.groups()
    }

    fn edge_vertices(&self, edge: EdgeRef) -> (Option<VertexRef>, Option<VertexRef>) {
        self.inner.edge_vertices(edge)
    }

    fn edge_faces(&self, edge: EdgeRef) -> Vec<FaceRef> {
        self.inner.edge_faces(edge)
    }

    fn edge_uses(&self, edge: EdgeRef) -> Vec<EdgeUse> {
        self.inner.edge_uses(edge)
    }

    fn edge_is_reversed(&self, edge: EdgeRef) -> bool {
        self.inner.edge_is_reversed(edge)
    }

    fn vertex_position(&self, vertex: VertexRef) -> Option<Point3<f64>> {
        if self.unplaced.contains(&vertex) {
            return None;
        }
        self.inner.vertex_position(vertex)
    }

    fn vertex_edges(&self, vertex: VertexRef) -> Vec<EdgeRef> {
        self.inner.vertex_edges(vertex)
    }

    fn face_bodies(&self, face: FaceRef) -> Vec<BodyRef> {
        self.inner.face_bodies(face)
    }

    fn face_uses(&self, face: FaceRef) -> Vec<FaceUse> {
        self.inner.face_uses(face)
    }

    fn face_edges(&self, face: FaceRef) -> Vec<EdgeRef> {
        self.inner.face_edges(face)
    }

    fn face_is_reversed(&self, face: FaceRef) -> bool {
        self.inner.face_is_reversed(face)
    }

    fn body_faces(&self, body: BodyRef) -> Vec<FaceRef> {
        self.inner.body_faces(body)
    }

    fn body_edges(&self, body: BodyRef) -> Vec<EdgeRef> {
        self.inner.body_edges(body)
    }

    fn group_names(&self, group: GroupRef) -> Vec<String> {
        self.inner.group_names(group)
    }

    fn group_members(&self, group: GroupRef) -> Vec<EntityRef> {
        self.inner.group_members(group)
    }

    fn can_enumerate_subvolumes(&self) -> bool {
        self.inner.can_enumerate_subvolumes()
    }

    fn subvolumes(&self, body: BodyRef) -> Vec<BodyRef> {
        self.inner.subvolumes(body)
    }
}

impl TessellationService for RecordingModel {
    fn facet_curve(&self, edge: EdgeRef, params: &FacetParams) -> CurveFacets {
        self.params.borrow_mut().push(*params);
        self.inner.facet_curve(edge, params)
    }

    fn facet_surface(&self, face: FaceRef, params: &FacetParams) -> SurfaceFacets {
        self.params.borrow_mut().push(*params);
        self.inner.facet_surface(face, params)
    }
}

#[test]
fn test_configured_tolerances_reach_tessellation() -> Result<()> {
    let dir = tempdir()?;
    let mut builder = BrepBuilder::new();
    builder.cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
    let host = RecordingModel::new(builder.into_host());

    let config = ExportConfig {
        output_filename: dir.path().join("box.json"),
        faceting_tolerance: 0.05,
        normal_tolerance: 12,
        length_tolerance: 0.3,
        ..Default::default()
    };
    DagmcExporter::new(config).execute(&host)?;

    let expected = FacetParams {
        faceting_tolerance: 0.05,
        normal_tolerance: 12,
        length_tolerance: 0.3,
    };
    let calls = host.params.borrow();
    // twelve curves and six surfaces
    assert_eq!(calls.len(), 18);
    assert!(calls.iter().all(|params| *params == expected));
    Ok(())
}

#[test]
fn test_closed_curve_without_vertex_point_stays_closed() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("loop.json");
    let mut builder = BrepBuilder::new();
    let corner = builder.add_vertex(Point3::origin());
    let edge = builder.add_edge(
        Some(corner),
        Some(corner),
        vec![
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::origin(),
        ],
    );
    let mut host = RecordingModel::new(builder.into_host());
    host.unplaced.push(corner);

    let summary = DagmcExporter::new(ExportConfig {
        output_filename: output.clone(),
        ..Default::default()
    })
    .execute(&host)?;
    // only the missing position is reported
    assert_eq!(summary.inconsistent_curves, 1);

    let mesh = io::read_document(&output)?;
    let members = mesh.members(set_of(&mesh, &host.inner, edge)?)?;
    let (points, elements): (Vec<&EntityHandle>, Vec<&EntityHandle>) = members
        .iter()
        .partition(|h| matches!(mesh.entity(**h), Some(MeshEntity::Vertex(_))));
    assert_eq!(points.len(), 3);
    assert_eq!(elements.len(), 3);
    // the last segment closes the loop on the first point
    let last = mesh.connectivity(*elements[2])?;
    assert_eq!(last[1], *points[0]);
    Ok(())
}
