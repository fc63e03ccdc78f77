// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Unique id registry

use super::{ExportError, ExportResult, Topology};
use crate::topology::{Dimension, EntityRef};
use ahash::AHashMap;

/// Hands out ids 1, 2, 3, ... to entities on first sight
#[derive(Debug, Clone, Default)]
pub struct UniqueIdRegistry {
    ids: AHashMap<EntityRef, i32>,
    order: Vec<EntityRef>,
}

impl UniqueIdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ids an export of `topology` hands out: volumes, surfaces,
    /// curves and vertices, then groups
    pub fn for_topology(topology: &Topology) -> Self {
        let mut ids = Self::new();
        for dim in Dimension::TOPOLOGICAL_DESCENDING {
            for entity in topology.entities(dim) {
                ids.get_or_assign(entity);
            }
        }
        for &group in &topology.groups {
            ids.get_or_assign(group);
        }
        ids
    }

    /// Id of `entity`, assigning the next one if it has none yet
    pub fn get_or_assign(&mut self, entity: impl Into<EntityRef>) -> i32 {
        let entity = entity.into();
        if let Some(&id) = self.ids.get(&entity) {
            return id;
        }
        self.order.push(entity);
        let id = self.order.len() as i32;
        self.ids.insert(entity, id);
        id
    }

    /// Id of an entity that must already be registered
    pub fn lookup(&self, entity: impl Into<EntityRef>) -> ExportResult<i32> {
        let entity = entity.into();
        self.ids
            .get(&entity)
            .copied()
            .ok_or(ExportError::NotRegistered(entity))
    }

    /// Reverse lookup
    pub fn entity_of(&self, id: i32) -> Option<EntityRef> {
        usize::try_from(id)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.order.get(i))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entities and their ids in assignment order
    pub fn iter(&self) -> impl Iterator<Item = (EntityRef, i32)> + '_ {
        self.order
            .iter()
            .enumerate()
            .map(|(i, entity)| (*entity, i as i32 + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{BodyRef, EdgeRef, FaceRef, GroupRef, VertexRef};

    #[test]
    fn test_ids_are_stable() {
        let mut ids = UniqueIdRegistry::new();
        assert_eq!(ids.get_or_assign(FaceRef(10)), 1);
        assert_eq!(ids.get_or_assign(EdgeRef(10)), 2);
        assert_eq!(ids.get_or_assign(FaceRef(10)), 1);
        assert_eq!(ids.len(), 2);
        assert_eq!(ids.entity_of(2), Some(EntityRef::Edge(EdgeRef(10))));
        assert_eq!(ids.entity_of(0), None);
    }

    #[test]
    fn test_lookup_before_assignment() {
        let mut ids = UniqueIdRegistry::new();
        assert_eq!(
            ids.lookup(EdgeRef(3)),
            Err(ExportError::NotRegistered(EntityRef::Edge(EdgeRef(3))))
        );
        ids.get_or_assign(EdgeRef(3));
        assert_eq!(ids.lookup(EdgeRef(3)), Ok(1));
    }

    #[test]
    fn test_n_entities_get_one_to_n() {
        let mut ids = UniqueIdRegistry::new();
        let assigned: Vec<i32> = (0..50).map(|k| ids.get_or_assign(EdgeRef(k * 7))).collect();
        assert_eq!(assigned, (1..=50).collect::<Vec<_>>());
    }

    #[test]
    fn test_topology_order() {
        let topology = Topology {
            vertices: vec![VertexRef(1)],
            edges: vec![EdgeRef(1)],
            faces: vec![FaceRef(1), FaceRef(2)],
            bodies: vec![BodyRef(1)],
            groups: vec![GroupRef(1)],
        };
        let ids = UniqueIdRegistry::for_topology(&topology);
        assert_eq!(ids.lookup(BodyRef(1)), Ok(1));
        assert_eq!(ids.lookup(FaceRef(2)), Ok(3));
        assert_eq!(ids.lookup(VertexRef(1)), Ok(5));
        assert_eq!(ids.lookup(GroupRef(1)), Ok(6));
    }
}
