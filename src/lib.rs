// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! DAGMC-style mesh export
//!
//! Turns the topology of a B-rep solid model (vertices, edges, faces,
//! bodies and named groups) into a handle-addressed mesh database: one
//! tagged entity-set per topological entity, parent/child links, senses,
//! faceted curves and surfaces with shared vertex points, and group sets.

pub mod cli;
pub mod export;
pub mod geometry;
pub mod io;
pub mod mesh;
pub mod topology;

pub use export::{DagmcExporter, ExportConfig, ExportError, ExportResult, ExportSummary};
pub use mesh::{MemoryMesh, MeshBackend};
pub use topology::{BrepModel, HostModel, MemoryModel, TessellationService};

use std::path::Path;

/// Load a B-rep model file and export it with `config`
pub fn export_file(path: impl AsRef<Path>, config: ExportConfig) -> anyhow::Result<ExportSummary> {
    let host = BrepModel::load(path)?.into_host();
    let mut exporter = DagmcExporter::new(config);
    Ok(exporter.execute(&host)?)
}
