// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! In-memory mesh database

use super::{
    ElementKind, EntityHandle, MeshBackend, MeshError, MeshResult, Sense, SetKind, Tag,
    TagDefinition, TagValue,
};
use ahash::{AHashMap, AHashSet};
use nalgebra::Point3;
use std::collections::BTreeMap;
use std::path::Path;

/// Entity-set with members, parent/child links and senses
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSet {
    pub kind: SetKind,
    members: Vec<EntityHandle>,
    member_index: AHashSet<EntityHandle>,
    pub parents: Vec<EntityHandle>,
    pub children: Vec<EntityHandle>,
    /// Sense of this set relative to each container
    pub senses: Vec<(EntityHandle, Sense)>,
}

impl MeshSet {
    pub fn new(kind: SetKind) -> Self {
        Self {
            kind,
            members: Vec::new(),
            member_index: AHashSet::new(),
            parents: Vec::new(),
            children: Vec::new(),
            senses: Vec::new(),
        }
    }

    pub fn add(&mut self, entity: EntityHandle) {
        match self.kind {
            SetKind::Ordered => {
                self.members.push(entity);
                self.member_index.insert(entity);
            }
            SetKind::Unordered => {
                if self.member_index.insert(entity) {
                    self.members.push(entity);
                }
            }
        }
    }

    pub fn members(&self) -> &[EntityHandle] {
        &self.members
    }

    pub fn contains(&self, entity: EntityHandle) -> bool {
        self.member_index.contains(&entity)
    }

    fn record_sense(&mut self, container: EntityHandle, sense: Sense) {
        match self.senses.iter_mut().find(|(c, _)| *c == container) {
            Some(entry) => entry.1 = entry.1.merge(sense),
            None => self.senses.push((container, sense)),
        }
    }
}

/// Anything a handle can name
#[derive(Debug, Clone, PartialEq)]
pub enum MeshEntity {
    Vertex(Point3<f64>),
    Element {
        kind: ElementKind,
        connectivity: Vec<EntityHandle>,
    },
    Set(MeshSet),
}

/// Mesh database held entirely in memory
#[derive(Debug, Clone)]
pub struct MemoryMesh {
    next_handle: u64,
    entities: BTreeMap<EntityHandle, MeshEntity>,
    tags: Vec<TagDefinition>,
    tag_names: AHashMap<String, Tag>,
    tag_values: Vec<BTreeMap<EntityHandle, TagValue>>,
}

impl Default for MemoryMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMesh {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            entities: BTreeMap::new(),
            tags: Vec::new(),
            tag_names: AHashMap::new(),
            tag_values: Vec::new(),
        }
    }

    /// Get the number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, handle: EntityHandle) -> Option<&MeshEntity> {
        self.entities.get(&handle)
    }

    /// All entities in handle order
    pub fn entities(&self) -> impl Iterator<Item = (EntityHandle, &MeshEntity)> {
        self.entities.iter().map(|(h, e)| (*h, e))
    }

    /// Tag definitions in definition order
    pub fn tags(&self) -> impl Iterator<Item = (Tag, &TagDefinition)> {
        self.tags
            .iter()
            .enumerate()
            .map(|(i, def)| (Tag(i as u32), def))
    }

    /// Explicitly stored values of a tag, in handle order
    pub fn tag_values(&self, tag: Tag) -> MeshResult<&BTreeMap<EntityHandle, TagValue>> {
        self.tag_values
            .get(tag.0 as usize)
            .ok_or_else(|| MeshError::UnknownTag(format!("{:?}", tag)))
    }

    /// Handles of all sets whose `tag` equals `value`
    pub fn sets_with_tag(&self, tag: Tag, value: &TagValue) -> MeshResult<Vec<EntityHandle>> {
        Ok(self
            .tag_values(tag)?
            .iter()
            .filter(|(handle, v)| *v == value && self.set(**handle).is_ok())
            .map(|(handle, _)| *handle)
            .collect())
    }

    /// Insert an entity under a known handle, used when reading a document
    pub fn insert_entity(&mut self, handle: EntityHandle, entity: MeshEntity) -> MeshResult<()> {
        if !handle.is_valid() || self.entities.contains_key(&handle) {
            return Err(MeshError::Format(format!("duplicate or reserved handle {}", handle)));
        }
        self.entities.insert(handle, entity);
        self.next_handle = self.next_handle.max(handle.0 + 1);
        Ok(())
    }

    pub fn set(&self, handle: EntityHandle) -> MeshResult<&MeshSet> {
        match self.entities.get(&handle) {
            Some(MeshEntity::Set(set)) => Ok(set),
            Some(_) => Err(MeshError::NotASet(handle)),
            None => Err(MeshError::UnknownHandle(handle)),
        }
    }

    fn set_mut(&mut self, handle: EntityHandle) -> MeshResult<&mut MeshSet> {
        match self.entities.get_mut(&handle) {
            Some(MeshEntity::Set(set)) => Ok(set),
            Some(_) => Err(MeshError::NotASet(handle)),
            None => Err(MeshError::UnknownHandle(handle)),
        }
    }

    fn check_exists(&self, handle: EntityHandle) -> MeshResult<()> {
        if self.entities.contains_key(&handle) {
            Ok(())
        } else {
            Err(MeshError::UnknownHandle(handle))
        }
    }

    fn definition(&self, tag: Tag) -> MeshResult<&TagDefinition> {
        self.tags
            .get(tag.0 as usize)
            .ok_or_else(|| MeshError::UnknownTag(format!("{:?}", tag)))
    }

    fn allocate(&mut self, entity: MeshEntity) -> EntityHandle {
        let handle = EntityHandle(self.next_handle);
        self.next_handle += 1;
        self.entities.insert(handle, entity);
        handle
    }
}

impl MeshBackend for MemoryMesh {
    fn define_tag(&mut self, definition: TagDefinition) -> MeshResult<Tag> {
        if let Some(&tag) = self.tag_names.get(&definition.name) {
            let existing = self.definition(tag)?;
            if existing.data_type != definition.data_type || existing.size != definition.size {
                return Err(MeshError::TagConflict {
                    name: definition.name,
                });
            }
            return Ok(tag);
        }
        let tag = Tag(self.tags.len() as u32);
        self.tag_names.insert(definition.name.clone(), tag);
        self.tags.push(definition);
        self.tag_values.push(BTreeMap::new());
        Ok(tag)
    }

    fn tag_handle(&self, name: &str) -> MeshResult<Tag> {
        self.tag_names
            .get(name)
            .copied()
            .ok_or_else(|| MeshError::UnknownTag(name.to_string()))
    }

    fn tag_definition(&self, tag: Tag) -> MeshResult<TagDefinition> {
        self.definition(tag).cloned()
    }

    fn create_set(&mut self, kind: SetKind) -> MeshResult<EntityHandle> {
        Ok(self.allocate(MeshEntity::Set(MeshSet::new(kind))))
    }

    fn create_vertex(&mut self, position: Point3<f64>) -> MeshResult<EntityHandle> {
        Ok(self.allocate(MeshEntity::Vertex(position)))
    }

    fn create_element(
        &mut self,
        kind: ElementKind,
        connectivity: &[EntityHandle],
    ) -> MeshResult<EntityHandle> {
        if connectivity.len() != kind.vertex_count() {
            return Err(MeshError::InvalidConnectivity {
                kind,
                expected: kind.vertex_count(),
                found: connectivity.len(),
            });
        }
        for &vertex in connectivity {
            match self.entities.get(&vertex) {
                Some(MeshEntity::Vertex(_)) => {}
                Some(_) => return Err(MeshError::NotAVertex(vertex)),
                None => return Err(MeshError::UnknownHandle(vertex)),
            }
        }
        Ok(self.allocate(MeshEntity::Element {
            kind,
            connectivity: connectivity.to_vec(),
        }))
    }

    fn add_entities(&mut self, set: EntityHandle, entities: &[EntityHandle]) -> MeshResult<()> {
        for &entity in entities {
            self.check_exists(entity)?;
        }
        let target = self.set_mut(set)?;
        for &entity in entities {
            target.add(entity);
        }
        Ok(())
    }

    fn set_tag(&mut self, tag: Tag, entity: EntityHandle, value: TagValue) -> MeshResult<()> {
        if entity != EntityHandle::ROOT {
            self.check_exists(entity)?;
        }
        let definition = self.definition(tag)?;
        if value.tag_type() != definition.data_type {
            return Err(MeshError::TagTypeMismatch {
                name: definition.name.clone(),
                expected: definition.data_type,
                found: value.tag_type(),
            });
        }
        if !definition.accepts(&value) {
            return Err(MeshError::ValueTooLong {
                name: definition.name.clone(),
                size: definition.size,
            });
        }
        if let Some(values) = self.tag_values.get_mut(tag.0 as usize) {
            values.insert(entity, value);
        }
        Ok(())
    }

    fn get_tag(&self, tag: Tag, entity: EntityHandle) -> MeshResult<Option<TagValue>> {
        if entity != EntityHandle::ROOT {
            self.check_exists(entity)?;
        }
        let definition = self.definition(tag)?;
        Ok(self
            .tag_values(tag)?
            .get(&entity)
            .cloned()
            .or_else(|| definition.default.clone()))
    }

    fn set_sense(
        &mut self,
        entity: EntityHandle,
        container: EntityHandle,
        sense: Sense,
    ) -> MeshResult<()> {
        self.set(container)?;
        self.set_mut(entity)?.record_sense(container, sense);
        Ok(())
    }

    fn senses(&self, entity: EntityHandle) -> MeshResult<Vec<(EntityHandle, Sense)>> {
        Ok(self.set(entity)?.senses.clone())
    }

    fn add_parent_child(&mut self, parent: EntityHandle, child: EntityHandle) -> MeshResult<()> {
        self.set(parent)?;
        self.set(child)?;
        let parent_set = self.set_mut(parent)?;
        if !parent_set.children.contains(&child) {
            parent_set.children.push(child);
        }
        let child_set = self.set_mut(child)?;
        if !child_set.parents.contains(&parent) {
            child_set.parents.push(parent);
        }
        Ok(())
    }

    fn parents(&self, set: EntityHandle) -> MeshResult<Vec<EntityHandle>> {
        Ok(self.set(set)?.parents.clone())
    }

    fn children(&self, set: EntityHandle) -> MeshResult<Vec<EntityHandle>> {
        Ok(self.set(set)?.children.clone())
    }

    fn members(&self, set: EntityHandle) -> MeshResult<Vec<EntityHandle>> {
        Ok(self.set(set)?.members().to_vec())
    }

    fn vertex_position(&self, vertex: EntityHandle) -> MeshResult<Point3<f64>> {
        match self.entities.get(&vertex) {
            Some(MeshEntity::Vertex(position)) => Ok(*position),
            Some(_) => Err(MeshError::NotAVertex(vertex)),
            None => Err(MeshError::UnknownHandle(vertex)),
        }
    }

    fn connectivity(&self, element: EntityHandle) -> MeshResult<Vec<EntityHandle>> {
        match self.entities.get(&element) {
            Some(MeshEntity::Element { connectivity, .. }) => Ok(connectivity.clone()),
            Some(_) => Err(MeshError::OperationFailed(format!(
                "entity {} is not an element",
                element
            ))),
            None => Err(MeshError::UnknownHandle(element)),
        }
    }

    fn all_entities(&self) -> MeshResult<Vec<EntityHandle>> {
        Ok(self.entities.keys().copied().collect())
    }

    fn write_file(&self, path: &Path) -> MeshResult<()> {
        crate::io::write_document(self, path)
    }

    fn delete_mesh(&mut self) -> MeshResult<()> {
        *self = MemoryMesh::new();
        Ok(())
    }
}
