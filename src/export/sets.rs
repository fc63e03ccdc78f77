// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Entity-set creation

use super::{ExportContext, ExportResult};
use crate::mesh::{EntityHandle, MeshBackend, SetKind, TagValue};
use crate::topology::{Dimension, EntityRef};
use tracing::info;

impl ExportContext {
    /// Create one tagged set per collected entity, volumes first
    pub fn build_all_entity_sets<B: MeshBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> ExportResult<()> {
        for dim in Dimension::TOPOLOGICAL_DESCENDING {
            let entities = self.topology.entities(dim);
            info!(
                "Found {} entities of dimension {}, geometry type {}",
                entities.len(),
                dim.index(),
                dim
            );
            self.build_entity_sets(backend, dim, &entities)?;
        }
        Ok(())
    }

    /// Create and tag a set for each entity of one dimension
    pub fn build_entity_sets<B: MeshBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        dim: Dimension,
        entities: &[EntityRef],
    ) -> ExportResult<()> {
        // Curve facets are stored in order along the curve
        let kind = if dim == Dimension::Curve {
            SetKind::Ordered
        } else {
            SetKind::Unordered
        };
        for &entity in entities {
            let set = backend.create_set(kind)?;
            self.tag_entity_set(backend, set, dim, entity)?;
            self.maps.insert(entity, set);
        }
        Ok(())
    }

    /// Write the dimension, id and category tags
    fn tag_entity_set<B: MeshBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        set: EntityHandle,
        dim: Dimension,
        entity: EntityRef,
    ) -> ExportResult<()> {
        backend.set_tag(
            self.tags.geom_dimension,
            set,
            TagValue::Integer(dim.index()),
        )?;
        let id = self.ids.get_or_assign(entity);
        backend.set_tag(self.tags.global_id, set, TagValue::Integer(id))?;
        backend.set_tag(
            self.tags.category,
            set,
            TagValue::Opaque(dim.category().to_string()),
        )?;
        Ok(())
    }
}
