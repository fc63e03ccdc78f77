// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-to-end export tests

use anyhow::Result;
use dagmc_export::export::{collect, DagmcExporter, ExportConfig, ExportError, UniqueIdRegistry};
use dagmc_export::io;
use dagmc_export::mesh::{
    extra_name_tag_name, ElementKind, MemoryMesh, MeshBackend, MeshEntity, Sense, TagValue,
    CATEGORY_TAG_NAME,
    GEOM_DIMENSION_TAG_NAME, GLOBAL_ID_TAG_NAME, NAME_TAG_NAME,
};
use dagmc_export::topology::{demo_model, BrepBuilder, EdgeRef, FaceRef, MemoryModel, UseSense};
use nalgebra::Point3;
use std::path::Path;
use tempfile::tempdir;

fn config_for(path: &Path) -> ExportConfig {
    ExportConfig {
        output_filename: path.to_path_buf(),
        ..Default::default()
    }
}

/// Check that every entity's set carries its id, dimension and category
fn assert_tags_match(mesh: &MemoryMesh, host: &MemoryModel) -> Result<()> {
    let global_id = mesh.tag_handle(GLOBAL_ID_TAG_NAME)?;
    let dimension = mesh.tag_handle(GEOM_DIMENSION_TAG_NAME)?;
    let category = mesh.tag_handle(CATEGORY_TAG_NAME)?;

    let ids = UniqueIdRegistry::for_topology(&collect(host));
    for (entity, id) in ids.iter() {
        let sets = mesh.sets_with_tag(global_id, &TagValue::Integer(id))?;
        assert_eq!(sets.len(), 1, "{} should have exactly one set", entity);
        let set = sets[0];

        let dim = entity.dimension();
        assert_eq!(
            mesh.get_tag(category, set)?,
            Some(TagValue::Opaque(dim.category().to_string()))
        );
        let expected = if dim.index() == 4 { -1 } else { dim.index() };
        assert_eq!(mesh.get_tag(dimension, set)?, Some(TagValue::Integer(expected)));
    }
    Ok(())
}

#[test]
fn test_tags_round_trip_through_backend_and_file() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("demo.json");
    let host = demo_model().into_host();

    let mut exporter = DagmcExporter::new(config_for(&output));
    let summary = exporter.build(&host)?;
    assert!(summary.is_clean());

    assert_tags_match(exporter.backend(), &host)?;
    let written = io::read_document(&output)?;
    assert_tags_match(&written, &host)?;
    assert_eq!(written.len(), exporter.backend().len());
    Ok(())
}

#[test]
fn test_ids_are_stable_across_exports() -> Result<()> {
    let dir = tempdir()?;
    let host = demo_model().into_host();

    let mut first = DagmcExporter::new(config_for(&dir.path().join("a.json")));
    first.build(&host)?;
    let mut second = DagmcExporter::new(config_for(&dir.path().join("b.json")));
    second.build(&host)?;

    let a = first.backend();
    let b = second.backend();
    let tag_a = a.tag_handle(GLOBAL_ID_TAG_NAME)?;
    let tag_b = b.tag_handle(GLOBAL_ID_TAG_NAME)?;
    assert_eq!(a.tag_values(tag_a)?, b.tag_values(tag_b)?);
    Ok(())
}

#[test]
fn test_non_fatal_curve_failure() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("box.json");
    let mut builder = BrepBuilder::new();
    builder.cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
    builder.set_samples(EdgeRef(3), Vec::new());
    let host = builder.into_host();

    let summary = DagmcExporter::new(config_for(&output)).execute(&host)?;
    // one volume and six surfaces come before the curves
    assert_eq!(summary.failed_curves, vec![10]);
    assert_eq!(summary.failed_curve_count(), 1);
    assert!(!summary.is_clean());
    assert!(output.exists());
    Ok(())
}

#[test]
fn test_fatal_curve_failure_writes_partial_output() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("box.json");
    let mut builder = BrepBuilder::new();
    builder.cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
    builder.set_samples(EdgeRef(3), Vec::new());
    let host = builder.into_host();

    let config = ExportConfig {
        fatal_on_curves: true,
        ..config_for(&output)
    };
    let mut exporter = DagmcExporter::new(config);
    let result = exporter.execute(&host);
    assert_eq!(result, Err(ExportError::CurveFacetingFailed { id: 10 }));
    assert!(exporter.backend().is_empty());

    // everything built before the failing curve is in the file
    let mesh = io::read_document(&output)?;
    let global_id = mesh.tag_handle(GLOBAL_ID_TAG_NAME)?;
    let set_of = |id: i32| -> Result<_> {
        let sets = mesh.sets_with_tag(global_id, &TagValue::Integer(id))?;
        Ok(sets[0])
    };
    let ids = UniqueIdRegistry::for_topology(&collect(&host));
    assert!(!mesh.members(set_of(ids.lookup(EdgeRef(1))?)?)?.is_empty());
    assert!(!mesh.members(set_of(ids.lookup(EdgeRef(2))?)?)?.is_empty());
    assert!(mesh.members(set_of(10)?)?.is_empty());
    assert!(mesh.members(set_of(ids.lookup(EdgeRef(4))?)?)?.is_empty());

    // surfaces come after the curves of their body
    let triangles = mesh
        .entities()
        .filter(|(_, e)| matches!(e, MeshEntity::Element { kind: ElementKind::Triangle, .. }))
        .count();
    assert_eq!(triangles, 0);
    Ok(())
}

#[test]
fn test_groups_in_written_file() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("demo.json");
    let host = demo_model().into_host();
    DagmcExporter::new(config_for(&output)).execute(&host)?;

    let mesh = io::read_document(&output)?;
    let name = mesh.tag_handle(NAME_TAG_NAME)?;
    let category = mesh.tag_handle(CATEGORY_TAG_NAME)?;

    let steel = mesh.sets_with_tag(name, &TagValue::Opaque("mat:steel".to_string()))?;
    assert_eq!(steel.len(), 1);
    let members = mesh.members(steel[0])?;
    assert_eq!(members.len(), 2);
    for member in members {
        assert_eq!(
            mesh.get_tag(category, member)?,
            Some(TagValue::Opaque("Volume".to_string()))
        );
    }

    let boundary = mesh.sets_with_tag(name, &TagValue::Opaque("boundary:vacuum".to_string()))?;
    assert_eq!(boundary.len(), 1);
    let extra = mesh.tag_handle(&extra_name_tag_name(1))?;
    assert_eq!(
        mesh.get_tag(extra, boundary[0])?,
        Some(TagValue::Opaque("graveyard".to_string()))
    );
    let members = mesh.members(boundary[0])?;
    assert_eq!(members.len(), 1);
    assert_eq!(
        mesh.get_tag(category, members[0])?,
        Some(TagValue::Opaque("Surface".to_string()))
    );
    Ok(())
}

#[test]
fn test_hierarchy_and_senses_in_written_file() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("shared.json");
    let mut builder = BrepBuilder::new();
    let left = builder.cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
    let right = builder.add_body(Some("right"));
    builder.attach_face(FaceRef(6), right, UseSense::Reversed);
    let host = builder.into_host();

    let mut exporter = DagmcExporter::new(config_for(&output));
    exporter.build(&host)?;
    let mesh = io::read_document(&output)?;
    let global_id = mesh.tag_handle(GLOBAL_ID_TAG_NAME)?;

    let set_of = |id: i32| -> Result<_> {
        let sets = mesh.sets_with_tag(global_id, &TagValue::Integer(id))?;
        Ok(sets[0])
    };
    let ids = UniqueIdRegistry::for_topology(&collect(&host));
    let left_set = set_of(ids.lookup(left)?)?;
    let right_set = set_of(ids.lookup(right)?)?;
    let shared = set_of(ids.lookup(FaceRef(6))?)?;

    assert_eq!(mesh.children(left_set)?.len(), 6);
    assert_eq!(mesh.children(right_set)?, vec![shared]);
    assert_eq!(
        mesh.senses(shared)?,
        vec![(left_set, Sense::Forward), (right_set, Sense::Reverse)]
    );
    Ok(())
}

#[test]
fn test_composite_group_members() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("assembly.json");
    let mut builder = BrepBuilder::new().enumerate_subvolumes(true);
    let a = builder.cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
    let b = builder.cuboid(Point3::new(2.0, 0.0, 0.0), Point3::new(3.0, 1.0, 1.0));
    let composite = builder.add_composite(vec![a, b]);
    builder.add_group(&["assembly"], vec![composite.into()]);
    let host = builder.into_host();

    let mut exporter = DagmcExporter::new(config_for(&output));
    let summary = exporter.build(&host)?;
    assert_eq!(summary.unresolved_group_members, 0);

    let mesh = exporter.backend();
    let name = mesh.tag_handle(NAME_TAG_NAME)?;
    let group = mesh.sets_with_tag(name, &TagValue::Opaque("assembly".to_string()))?;
    assert_eq!(mesh.members(group[0])?.len(), 2);
    Ok(())
}

#[test]
fn test_file_set_holds_everything() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("demo.json");
    let mut exporter = DagmcExporter::new(config_for(&output));
    let summary = exporter.build(&demo_model().into_host())?;

    let mesh = exporter.backend();
    let all = mesh.all_entities()?;
    // the file set is created first and holds every other entity
    let file_set = all[0];
    assert_eq!(mesh.members(file_set)?.len(), all.len() - 1);
    assert_eq!(summary.mesh_entities, all.len());
    Ok(())
}
