// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Group sets and their membership

use super::{ExportContext, ExportResult};
use crate::mesh::{
    extra_name_tag_name, truncate_to_bytes, EntityHandle, MeshBackend, SetKind, Tag,
    TagDefinition, TagValue, NAME_TAG_SIZE,
};
use crate::topology::{BodyRef, Dimension, EntityRef, HostModel};
use tracing::warn;

impl ExportContext {
    /// Create the group sets, then fill them
    pub fn store_groups<M, B>(&mut self, model: &M, backend: &mut B) -> ExportResult<()>
    where
        M: HostModel + ?Sized,
        B: MeshBackend + ?Sized,
    {
        self.create_group_sets(model, backend)?;
        self.store_group_content(model, backend)
    }

    fn create_group_sets<M, B>(&mut self, model: &M, backend: &mut B) -> ExportResult<()>
    where
        M: HostModel + ?Sized,
        B: MeshBackend + ?Sized,
    {
        let mut extra_name_tags: Vec<Tag> = Vec::new();

        for group in self.topology.groups.clone() {
            let set = backend.create_set(SetKind::Unordered)?;

            let names = model.group_names(group);
            if let Some(first) = names.first() {
                let name = fit_name(first);
                backend.set_tag(self.tags.name, set, TagValue::Opaque(name))?;
            }
            if names.len() > 1 {
                for j in extra_name_tags.len()..names.len() {
                    let tag = backend
                        .define_tag(TagDefinition::opaque(&extra_name_tag_name(j), NAME_TAG_SIZE))?;
                    extra_name_tags.push(tag);
                }
                for (name, &tag) in names.iter().zip(&extra_name_tags) {
                    backend.set_tag(tag, set, TagValue::Opaque(fit_name(name)))?;
                }
            }

            let id = self.ids.get_or_assign(group);
            backend.set_tag(self.tags.global_id, set, TagValue::Integer(id))?;
            backend.set_tag(
                self.tags.category,
                set,
                TagValue::Opaque(Dimension::Group.category().to_string()),
            )?;

            self.maps.groups.insert(group, set);
        }
        Ok(())
    }

    fn store_group_content<M, B>(&mut self, model: &M, backend: &mut B) -> ExportResult<()>
    where
        M: HostModel + ?Sized,
        B: MeshBackend + ?Sized,
    {
        for group in self.topology.groups.clone() {
            let Some(&set) = self.maps.groups.get(&group) else {
                continue;
            };
            let mut handles: Vec<EntityHandle> = Vec::new();
            for member in model.group_members(group) {
                if let Some(handle) = self.maps.get(member) {
                    handles.push(handle);
                    continue;
                }
                match member {
                    EntityRef::Body(body) => self.resolve_composite(model, body, &mut handles),
                    other => {
                        warn!("Member {} of {} is not exported", other, group);
                        self.summary.unresolved_group_members += 1;
                    }
                }
            }
            if !handles.is_empty() {
                backend.add_entities(set, &handles)?;
            }
        }
        Ok(())
    }

    /// A body that is not an exported volume stands for its sub-volumes
    fn resolve_composite<M: HostModel + ?Sized>(
        &mut self,
        model: &M,
        body: BodyRef,
        handles: &mut Vec<EntityHandle>,
    ) {
        if !model.can_enumerate_subvolumes() {
            warn!("Cannot break down composite {}, skipping group member", body);
            self.summary.unresolved_group_members += 1;
            return;
        }
        for volume in model.subvolumes(body) {
            match self.maps.bodies.get(&volume) {
                Some(&handle) => handles.push(handle),
                None => {
                    warn!("Composite {} has orphan volume {}", body, volume);
                    self.summary.unresolved_group_members += 1;
                }
            }
        }
    }
}

/// Fit a group name into the `NAME` tag, warning when it is cut
fn fit_name(name: &str) -> String {
    match truncate_to_bytes(name, NAME_TAG_SIZE - 1) {
        Some(truncated) => {
            warn!("Group name '{}' truncated to '{}'", name, truncated);
            truncated.to_string()
        }
        None => name.to_string(),
    }
}
