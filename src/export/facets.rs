// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Curve and surface facets
//!
//! Vertex points are created first so that curve ends and surface corners
//! can share them. Each edge and face is faceted once, body by body, curves
//! before surfaces.

use super::{ExportContext, ExportError, ExportResult, WarningDisposition};
use crate::geometry::{coincident, GEOMETRY_RESABS};
use crate::mesh::{ElementKind, EntityHandle, MeshBackend};
use crate::topology::{EdgeRef, FaceRef, HostModel, TessellationService, VertexRef};
use ahash::AHashSet;
use nalgebra::Point3;
use tracing::{debug, warn};

impl ExportContext {
    /// Give every vertex set a mesh point and map the vertex to that point
    pub fn create_vertices<M, B>(&mut self, model: &M, backend: &mut B) -> ExportResult<()>
    where
        M: HostModel + ?Sized,
        B: MeshBackend + ?Sized,
    {
        for vertex in self.topology.vertices.clone() {
            let Some(&set) = self.maps.vertices.get(&vertex) else {
                continue;
            };
            match model.vertex_position(vertex) {
                Some(position) => {
                    let point = backend.create_vertex(position)?;
                    backend.add_entities(set, &[point])?;
                    self.maps.vertices.insert(vertex, point);
                }
                None => {
                    warn!("{} has no position, curves ending there get new points", vertex);
                    self.maps.vertices.remove(&vertex);
                    self.summary.inconsistent_curves += 1;
                }
            }
        }
        Ok(())
    }

    /// Facet every exported edge and face
    pub fn facet_model<M, B>(&mut self, model: &M, backend: &mut B) -> ExportResult<()>
    where
        M: HostModel + TessellationService + ?Sized,
        B: MeshBackend + ?Sized,
    {
        let mut done_edges: AHashSet<EdgeRef> = AHashSet::new();
        let mut done_faces: AHashSet<FaceRef> = AHashSet::new();

        for body in self.topology.bodies.clone() {
            for edge in model.body_edges(body) {
                if self.maps.edges.contains_key(&edge) && done_edges.insert(edge) {
                    self.facet_curve(model, backend, edge)?;
                }
            }
            for face in model.body_faces(body) {
                if self.maps.faces.contains_key(&face) && done_faces.insert(face) {
                    self.facet_surface(model, backend, face)?;
                }
            }
        }

        // free wires and sheets
        for edge in self.topology.edges.clone() {
            if done_edges.insert(edge) {
                self.facet_curve(model, backend, edge)?;
            }
        }
        for face in self.topology.faces.clone() {
            if done_faces.insert(face) {
                self.facet_surface(model, backend, face)?;
            }
        }
        Ok(())
    }

    /// Turn the curve samples of one edge into points and edge elements
    pub fn facet_curve<M, B>(&mut self, model: &M, backend: &mut B, edge: EdgeRef) -> ExportResult<()>
    where
        M: HostModel + TessellationService + ?Sized,
        B: MeshBackend + ?Sized,
    {
        let Some(&curve) = self.maps.edges.get(&edge) else {
            return Ok(());
        };
        let id = self.ids.lookup(edge)?;

        let mut points = model.facet_curve(edge, &self.params).points;
        if points.is_empty() {
            if self.config.fatal_on_curves {
                return Err(ExportError::CurveFacetingFailed { id });
            }
            warn!("Failed to facet curve {}", id);
            self.summary.failed_curves.push(id);
            return Ok(());
        }
        if model.edge_is_reversed(edge) {
            points.reverse();
        }

        let (start, end) = model.edge_vertices(edge);
        let topology_closed = start.is_some() && start == end;

        if points.len() < 2 {
            let point = start.and_then(|v| self.maps.vertices.get(&v).copied());
            match point {
                Some(point) if topology_closed => backend.add_entities(curve, &[point])?,
                _ => warn!("No faceting for curve {}", id),
            }
            return Ok(());
        }

        let first = points[0];
        let last = points[points.len() - 1];
        if coincident(&first, &last, GEOMETRY_RESABS) != topology_closed {
            warn!("Topology and geometry inconsistent for possibly closed curve {}", id);
            self.summary.inconsistent_curves += 1;
        }

        let off_end = |vertex: Option<VertexRef>, sample: &Point3<f64>| {
            vertex
                .and_then(|v| model.vertex_position(v))
                .is_some_and(|position| {
                    (position - sample).norm_squared() > GEOMETRY_RESABS * GEOMETRY_RESABS
                })
        };
        if off_end(start, &first) || off_end(end, &last) {
            match self.curve_warnings.record() {
                WarningDisposition::Emit => warn!("Vertices not at ends of curve {}", id),
                WarningDisposition::EmitLast => {
                    warn!("Vertices not at ends of curve {}", id);
                    warn!("Further instances of this warning will be suppressed...");
                }
                WarningDisposition::Suppress => {}
            }
        }

        let mut vertices: Vec<EntityHandle> = Vec::with_capacity(points.len());
        let start_point = self.end_point(backend, start, first)?;
        vertices.push(start_point);
        for &sample in &points[1..points.len() - 1] {
            vertices.push(backend.create_vertex(sample)?);
        }
        // a closed loop ends on its start point even when the vertex has none
        let end_point = if topology_closed {
            start_point
        } else {
            self.end_point(backend, end, last)?
        };
        vertices.push(end_point);

        let mut elements: Vec<EntityHandle> = Vec::with_capacity(vertices.len() - 1);
        for pair in vertices.windows(2) {
            elements.push(backend.create_element(ElementKind::Edge, pair)?);
        }

        if vertices.first() == vertices.last() {
            vertices.pop();
        }
        backend.add_entities(curve, &vertices)?;
        backend.add_entities(curve, &elements)?;
        debug!("Curve {}: {} points, {} edges", id, vertices.len(), elements.len());
        Ok(())
    }

    /// Point of a curve end: the vertex point, or a new point when the
    /// vertex has none
    fn end_point<B: MeshBackend + ?Sized>(
        &self,
        backend: &mut B,
        vertex: Option<VertexRef>,
        sample: Point3<f64>,
    ) -> ExportResult<EntityHandle> {
        match vertex.and_then(|v| self.maps.vertices.get(&v).copied()) {
            Some(point) => Ok(point),
            None => Ok(backend.create_vertex(sample)?),
        }
    }

    /// Turn the tessellation of one face into points and triangles, reusing
    /// the vertex points at the face corners
    pub fn facet_surface<M, B>(&mut self, model: &M, backend: &mut B, face: FaceRef) -> ExportResult<()>
    where
        M: HostModel + TessellationService + ?Sized,
        B: MeshBackend + ?Sized,
    {
        let Some(&surface) = self.maps.faces.get(&face) else {
            return Ok(());
        };
        let id = self.ids.lookup(face)?;

        let data = model.facet_surface(face, &self.params);
        if data.facets.is_empty() {
            warn!("Failed to facet surface {}", id);
            self.summary.failed_surfaces.push(id);
            return Ok(());
        }
        if let Some(index) = data.first_invalid_index() {
            return Err(ExportError::InvalidFacetData { id, index });
        }

        let mut handles: Vec<Option<EntityHandle>> = vec![None; data.points.len()];
        for vertex in model.face_vertices(face) {
            let Some(&point) = self.maps.vertices.get(&vertex) else {
                continue;
            };
            let Some(position) = model.vertex_position(vertex) else {
                continue;
            };
            let mut matched = false;
            for (i, sample) in data.points.iter().enumerate() {
                if !coincident(&position, sample, GEOMETRY_RESABS) {
                    continue;
                }
                if matched || handles[i].is_some() {
                    warn!("Coincident vertices in surface {}", id);
                    self.summary.ambiguous_coincidences += 1;
                }
                if !matched {
                    handles[i] = Some(point);
                    matched = true;
                }
            }
        }

        let mut points: Vec<EntityHandle> = Vec::with_capacity(data.points.len());
        for (slot, sample) in handles.iter_mut().zip(&data.points) {
            let point = match *slot {
                Some(point) => point,
                None => backend.create_vertex(*sample)?,
            };
            *slot = Some(point);
            points.push(point);
        }

        let mut triangles: Vec<EntityHandle> = Vec::with_capacity(data.facets.len());
        for facet in &data.facets {
            let connectivity = [points[facet[0]], points[facet[1]], points[facet[2]]];
            triangles.push(backend.create_element(ElementKind::Triangle, &connectivity)?);
        }

        backend.add_entities(surface, &points)?;
        backend.add_entities(surface, &triangles)?;
        debug!("Surface {}: {} points, {} triangles", id, points.len(), triangles.len());
        Ok(())
    }
}
