// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - reading and writing mesh documents

mod document;

pub use document::{
    DocumentHeader, ElementRecord, MeshDocument, SenseRecord, SetRecord, TagRecord, VertexRecord,
    FORMAT_NAME, FORMAT_VERSION,
};

use crate::mesh::{MemoryMesh, MeshResult};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write a mesh database to `path` as a JSON mesh document
pub fn write_document(mesh: &MemoryMesh, path: &Path) -> MeshResult<()> {
    let document = MeshDocument::from_mesh(mesh);
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &document)?;
    writer.flush()?;
    Ok(())
}

/// Load a mesh document without rebuilding the database
pub fn load_document(path: &Path) -> MeshResult<MeshDocument> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Read a mesh document back into a mesh database
pub fn read_document(path: &Path) -> MeshResult<MemoryMesh> {
    load_document(path)?.into_mesh()
}
