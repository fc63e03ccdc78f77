// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Parent/child links between entity-sets
//!
//! The host answers adjacency bottom-up, so every link is found from the
//! child and registered on the parent.

use super::{ExportContext, ExportResult};
use crate::mesh::{EntityHandle, MeshBackend};
use crate::topology::HostModel;
use std::fmt::Display;
use tracing::warn;

impl ExportContext {
    /// Link vertex sets to edge sets, edge sets to face sets and face sets
    /// to volume sets
    pub fn link_hierarchy<M, B>(&mut self, model: &M, backend: &mut B) -> ExportResult<()>
    where
        M: HostModel + ?Sized,
        B: MeshBackend + ?Sized,
    {
        for vertex in self.topology.vertices.clone() {
            let Some(&child) = self.maps.vertices.get(&vertex) else {
                continue;
            };
            for edge in model.vertex_edges(vertex) {
                let parent = self.maps.edges.get(&edge).copied();
                self.link(backend, parent, child, &edge, &vertex)?;
            }
        }

        for edge in self.topology.edges.clone() {
            let Some(&child) = self.maps.edges.get(&edge) else {
                continue;
            };
            for face in model.edge_faces(edge) {
                let parent = self.maps.faces.get(&face).copied();
                self.link(backend, parent, child, &face, &edge)?;
            }
        }

        for face in self.topology.faces.clone() {
            let Some(&child) = self.maps.faces.get(&face) else {
                continue;
            };
            for body in model.face_bodies(face) {
                let parent = self.maps.bodies.get(&body).copied();
                self.link(backend, parent, child, &body, &face)?;
            }
        }

        Ok(())
    }

    fn link<B: MeshBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        parent: Option<EntityHandle>,
        child: EntityHandle,
        parent_entity: &dyn Display,
        child_entity: &dyn Display,
    ) -> ExportResult<()> {
        match parent {
            Some(parent) => backend.add_parent_child(parent, child)?,
            None => {
                warn!(
                    "{} is adjacent to {} which is not exported, skipping link",
                    child_entity, parent_entity
                );
                self.summary.unmapped_links += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{collect, ExportConfig};
    use crate::mesh::MemoryMesh;
    use crate::topology::{BrepBuilder, EdgeRef};
    use nalgebra::Point3;

    #[test]
    fn test_edge_is_child_of_both_faces() -> ExportResult<()> {
        let mut builder = BrepBuilder::new();
        builder.cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let host = builder.into_host();

        let mut mesh = MemoryMesh::new();
        let mut context = ExportContext::new(&mut mesh, &ExportConfig::default())?;
        context.topology = collect(&host);
        context.build_all_entity_sets(&mut mesh)?;
        context.link_hierarchy(&host, &mut mesh)?;

        let edge_set = context.maps.edges[&EdgeRef(1)];
        let parents = mesh.parents(edge_set)?;
        assert_eq!(parents.len(), 2);
        for face in host.edge_faces(EdgeRef(1)) {
            let face_set = context.maps.faces[&face];
            assert!(parents.contains(&face_set));
            assert!(mesh.children(face_set)?.contains(&edge_set));
        }

        let volume_set = *context.maps.bodies.values().next().unwrap();
        assert_eq!(mesh.children(volume_set)?.len(), 6);
        assert_eq!(context.summary.unmapped_links, 0);
        Ok(())
    }

    #[test]
    fn test_unmapped_parent_is_counted() -> ExportResult<()> {
        let mut builder = BrepBuilder::new();
        builder.cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let host = builder.into_host();

        let mut mesh = MemoryMesh::new();
        let mut context = ExportContext::new(&mut mesh, &ExportConfig::default())?;
        context.topology = collect(&host);
        // export the faces without their body
        context.topology.bodies.clear();
        context.build_all_entity_sets(&mut mesh)?;
        context.link_hierarchy(&host, &mut mesh)?;

        assert_eq!(context.summary.unmapped_links, 6);
        Ok(())
    }
}
