// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Neutral mesh document format

use crate::mesh::{
    ElementKind, EntityHandle, MemoryMesh, MeshBackend, MeshEntity, MeshError, MeshResult,
    MeshSet, Sense, SetKind, TagDefinition, TagValue,
};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

pub const FORMAT_NAME: &str = "dagmc-mesh";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentHeader {
    pub format: String,
    pub version: u32,
    pub generator: String,
    /// RFC 3339 creation time
    pub created: String,
}

impl DocumentHeader {
    pub fn new() -> Self {
        Self {
            format: FORMAT_NAME.to_string(),
            version: FORMAT_VERSION,
            generator: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            created: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl Default for DocumentHeader {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    pub handle: EntityHandle,
    pub position: Point3<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub handle: EntityHandle,
    pub kind: ElementKind,
    pub connectivity: Vec<EntityHandle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenseRecord {
    pub container: EntityHandle,
    /// 1 forward, -1 reverse, 0 both
    pub sense: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    pub handle: EntityHandle,
    pub kind: SetKind,
    #[serde(default)]
    pub members: Vec<EntityHandle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<EntityHandle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EntityHandle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub senses: Vec<SenseRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    pub definition: TagDefinition,
    #[serde(default)]
    pub values: Vec<(EntityHandle, TagValue)>,
}

/// A complete mesh database as written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshDocument {
    pub header: DocumentHeader,
    #[serde(default)]
    pub tags: Vec<TagRecord>,
    #[serde(default)]
    pub vertices: Vec<VertexRecord>,
    #[serde(default)]
    pub elements: Vec<ElementRecord>,
    #[serde(default)]
    pub sets: Vec<SetRecord>,
}

impl MeshDocument {
    /// Snapshot a mesh database
    pub fn from_mesh(mesh: &MemoryMesh) -> Self {
        let mut document = MeshDocument {
            header: DocumentHeader::new(),
            tags: Vec::new(),
            vertices: Vec::new(),
            elements: Vec::new(),
            sets: Vec::new(),
        };

        for (handle, entity) in mesh.entities() {
            match entity {
                MeshEntity::Vertex(position) => document.vertices.push(VertexRecord {
                    handle,
                    position: *position,
                }),
                MeshEntity::Element { kind, connectivity } => {
                    document.elements.push(ElementRecord {
                        handle,
                        kind: *kind,
                        connectivity: connectivity.clone(),
                    })
                }
                MeshEntity::Set(set) => document.sets.push(SetRecord {
                    handle,
                    kind: set.kind,
                    members: set.members().to_vec(),
                    parents: set.parents.clone(),
                    children: set.children.clone(),
                    senses: set
                        .senses
                        .iter()
                        .map(|&(container, sense)| SenseRecord {
                            container,
                            sense: sense.code(),
                        })
                        .collect(),
                }),
            }
        }

        for (tag, definition) in mesh.tags() {
            let values = mesh
                .tag_values(tag)
                .map(|values| values.iter().map(|(h, v)| (*h, v.clone())).collect())
                .unwrap_or_default();
            document.tags.push(TagRecord {
                definition: definition.clone(),
                values,
            });
        }

        document
    }

    /// Rebuild the mesh database described by this document
    pub fn into_mesh(self) -> MeshResult<MemoryMesh> {
        if self.header.format != FORMAT_NAME {
            return Err(MeshError::Format(format!(
                "expected format {}, found {}",
                FORMAT_NAME, self.header.format
            )));
        }
        if self.header.version > FORMAT_VERSION {
            return Err(MeshError::Format(format!(
                "unsupported version {}",
                self.header.version
            )));
        }

        let mut mesh = MemoryMesh::new();
        for vertex in self.vertices {
            mesh.insert_entity(vertex.handle, MeshEntity::Vertex(vertex.position))?;
        }
        for element in self.elements {
            if element.connectivity.len() != element.kind.vertex_count() {
                return Err(MeshError::InvalidConnectivity {
                    kind: element.kind,
                    expected: element.kind.vertex_count(),
                    found: element.connectivity.len(),
                });
            }
            mesh.insert_entity(
                element.handle,
                MeshEntity::Element {
                    kind: element.kind,
                    connectivity: element.connectivity,
                },
            )?;
        }

        for record in self.sets {
            let mut set = MeshSet::new(record.kind);
            for member in record.members {
                set.add(member);
            }
            set.parents = record.parents;
            set.children = record.children;
            for sense in record.senses {
                let value = Sense::from_code(sense.sense).ok_or_else(|| {
                    MeshError::Format(format!("invalid sense code {}", sense.sense))
                })?;
                set.senses.push((sense.container, value));
            }
            mesh.insert_entity(record.handle, MeshEntity::Set(set))?;
        }

        for record in self.tags {
            let tag = mesh.define_tag(record.definition)?;
            for (handle, value) in record.values {
                mesh.set_tag(tag, handle, value)?;
            }
        }

        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::GLOBAL_ID_TAG_NAME;

    #[test]
    fn test_rejects_foreign_format() {
        let mut document = MeshDocument::from_mesh(&MemoryMesh::new());
        document.header.format = "other".to_string();
        assert!(matches!(document.into_mesh(), Err(MeshError::Format(_))));
    }

    #[test]
    fn test_rejects_bad_sense_code() -> MeshResult<()> {
        let mut mesh = MemoryMesh::new();
        let volume = mesh.create_set(SetKind::Unordered)?;
        let surface = mesh.create_set(SetKind::Unordered)?;
        mesh.set_sense(surface, volume, Sense::Reverse)?;

        let mut document = MeshDocument::from_mesh(&mesh);
        assert_eq!(document.sets[1].senses[0].sense, -1);
        document.sets[1].senses[0].sense = 5;
        assert!(document.into_mesh().is_err());
        Ok(())
    }

    #[test]
    fn test_snapshot_keeps_handles() -> MeshResult<()> {
        let mut mesh = MemoryMesh::new();
        let id = mesh.define_tag(TagDefinition::integer(GLOBAL_ID_TAG_NAME, Some(0)))?;
        let set = mesh.create_set(SetKind::Ordered)?;
        let a = mesh.create_vertex(Point3::origin())?;
        let b = mesh.create_vertex(Point3::new(0.0, 0.0, 1.0))?;
        let edge = mesh.create_element(ElementKind::Edge, &[a, b])?;
        mesh.add_entities(set, &[a, b, edge])?;
        mesh.set_tag(id, set, TagValue::Integer(3))?;

        let back = MeshDocument::from_mesh(&mesh).into_mesh()?;
        let id = back.tag_handle(GLOBAL_ID_TAG_NAME)?;
        assert_eq!(back.members(set)?, vec![a, b, edge]);
        assert_eq!(back.get_tag(id, set)?, Some(TagValue::Integer(3)));
        assert_eq!(back.connectivity(edge)?, vec![a, b]);
        Ok(())
    }
}
