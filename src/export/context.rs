// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-export state shared by the pipeline phases

use super::{
    ExportConfig, ExportError, ExportResult, ExportSummary, Topology, UniqueIdRegistry,
    WarningBudget,
};
use crate::geometry::{FacetParams, GEOMETRY_RESABS};
use crate::mesh::{
    EntityHandle, MeshBackend, SetKind, Tag, TagDefinition, TagValue, CATEGORY_TAG_NAME,
    CATEGORY_TAG_SIZE, FACETING_TOL_TAG_NAME, GEOMETRY_RESABS_TAG_NAME, GEOM_DIMENSION_TAG_NAME,
    GLOBAL_ID_TAG_NAME, NAME_TAG_NAME, NAME_TAG_SIZE,
};
use crate::topology::{BodyRef, EdgeRef, EntityRef, FaceRef, GroupRef, VertexRef};
use ahash::AHashMap;
use tracing::info;

/// Handles of the tags every export writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeomTags {
    pub geom_dimension: Tag,
    pub global_id: Tag,
    pub name: Tag,
    pub category: Tag,
    pub faceting_tol: Tag,
    pub geometry_resabs: Tag,
}

impl GeomTags {
    pub fn define<B: MeshBackend + ?Sized>(backend: &mut B) -> ExportResult<Self> {
        Ok(Self {
            geom_dimension: backend
                .define_tag(TagDefinition::integer(GEOM_DIMENSION_TAG_NAME, Some(-1)))?,
            global_id: backend.define_tag(TagDefinition::integer(GLOBAL_ID_TAG_NAME, Some(0)))?,
            name: backend.define_tag(TagDefinition::opaque(NAME_TAG_NAME, NAME_TAG_SIZE))?,
            category: backend
                .define_tag(TagDefinition::opaque(CATEGORY_TAG_NAME, CATEGORY_TAG_SIZE))?,
            faceting_tol: backend.define_tag(TagDefinition::double(FACETING_TOL_TAG_NAME))?,
            geometry_resabs: backend.define_tag(TagDefinition::double(GEOMETRY_RESABS_TAG_NAME))?,
        })
    }
}

/// Topology entity to mesh handle, one map per dimension plus groups.
///
/// Vertex entries name the vertex set until points are created, then the
/// vertex point.
#[derive(Debug, Clone, Default)]
pub struct EntityMaps {
    pub vertices: AHashMap<VertexRef, EntityHandle>,
    pub edges: AHashMap<EdgeRef, EntityHandle>,
    pub faces: AHashMap<FaceRef, EntityHandle>,
    pub bodies: AHashMap<BodyRef, EntityHandle>,
    pub groups: AHashMap<GroupRef, EntityHandle>,
}

impl EntityMaps {
    pub fn insert(&mut self, entity: EntityRef, handle: EntityHandle) {
        match entity {
            EntityRef::Vertex(v) => {
                self.vertices.insert(v, handle);
            }
            EntityRef::Edge(e) => {
                self.edges.insert(e, handle);
            }
            EntityRef::Face(f) => {
                self.faces.insert(f, handle);
            }
            EntityRef::Body(b) => {
                self.bodies.insert(b, handle);
            }
            EntityRef::Group(g) => {
                self.groups.insert(g, handle);
            }
        }
    }

    pub fn get(&self, entity: EntityRef) -> Option<EntityHandle> {
        match entity {
            EntityRef::Vertex(v) => self.vertices.get(&v),
            EntityRef::Edge(e) => self.edges.get(&e),
            EntityRef::Face(f) => self.faces.get(&f),
            EntityRef::Body(b) => self.bodies.get(&b),
            EntityRef::Group(g) => self.groups.get(&g),
        }
        .copied()
    }

    /// Drop the body and group maps once containment, senses and groups
    /// are stored
    pub fn clear_containers(&mut self) {
        self.bodies.clear();
        self.groups.clear();
    }
}

/// State of one export run
#[derive(Debug)]
pub struct ExportContext {
    pub config: ExportConfig,
    pub params: FacetParams,
    pub tags: GeomTags,
    pub file_set: EntityHandle,
    pub topology: Topology,
    pub ids: UniqueIdRegistry,
    pub maps: EntityMaps,
    pub summary: ExportSummary,
    pub curve_warnings: WarningBudget,
}

impl ExportContext {
    /// Define the tags and create the file set carrying the tolerances
    pub fn new<B: MeshBackend + ?Sized>(
        backend: &mut B,
        config: &ExportConfig,
    ) -> ExportResult<Self> {
        let tags = GeomTags::define(backend)?;
        let file_set = backend.create_set(SetKind::Unordered)?;

        info!("Setting faceting tolerance to {}", config.faceting_tolerance);
        backend.set_tag(
            tags.faceting_tol,
            file_set,
            TagValue::Double(config.faceting_tolerance),
        )?;
        info!("Setting length tolerance to {}", config.length_tolerance);
        info!("Setting normal tolerance to {}", config.normal_tolerance);
        backend.set_tag(
            tags.geometry_resabs,
            file_set,
            TagValue::Double(GEOMETRY_RESABS),
        )?;
        if config.verbose && config.fatal_on_curves {
            info!("This export will fail if curves fail to facet");
        }

        Ok(Self {
            config: config.clone(),
            params: config.facet_params(),
            tags,
            file_set,
            topology: Topology::default(),
            ids: UniqueIdRegistry::new(),
            maps: EntityMaps::default(),
            summary: ExportSummary {
                output: config.output_filename.clone(),
                ..Default::default()
            },
            curve_warnings: WarningBudget::new(config.curve_warning_budget, config.verbose),
        })
    }

    /// Add every entity except the file set itself to the file set
    pub fn gather<B: MeshBackend + ?Sized>(&mut self, backend: &mut B) -> ExportResult<()> {
        if !backend.members(self.file_set)?.is_empty() {
            return Err(ExportError::GatherSetNotEmpty);
        }
        let entities: Vec<EntityHandle> = backend
            .all_entities()?
            .into_iter()
            .filter(|&h| h != self.file_set)
            .collect();
        backend.add_entities(self.file_set, &entities)?;
        self.summary.mesh_entities = entities.len() + 1;
        Ok(())
    }

    /// Close the run and hand out the summary
    pub fn finish(mut self) -> ExportSummary {
        self.summary.counts = self.topology.counts();
        self.summary.curve_end_warnings = self.curve_warnings.events();
        self.summary.suppressed_curve_warnings = self.curve_warnings.suppressed();
        self.summary
    }
}
