// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export driver

use super::{collect, ExportConfig, ExportContext, ExportResult, ExportSummary};
use crate::mesh::{MemoryMesh, MeshBackend};
use crate::topology::{HostModel, TessellationService};
use tracing::{error, info, warn};

/// Exports a host model into a mesh database and writes it to disk
#[derive(Debug)]
pub struct DagmcExporter<B: MeshBackend = MemoryMesh> {
    config: ExportConfig,
    backend: B,
}

impl DagmcExporter<MemoryMesh> {
    /// Create an exporter writing through an in-memory mesh
    pub fn new(config: ExportConfig) -> Self {
        Self::with_backend(config, MemoryMesh::new())
    }
}

impl<B: MeshBackend> DagmcExporter<B> {
    pub fn with_backend(config: ExportConfig, backend: B) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Run the export and write the output file, keeping the mesh database
    /// for inspection.
    ///
    /// A fatal error in a phase still gathers and writes whatever was built
    /// before it, then returns the error.
    pub fn build<M>(&mut self, model: &M) -> ExportResult<ExportSummary>
    where
        M: HostModel + TessellationService + ?Sized,
    {
        self.config.validate()?;
        let backend = &mut self.backend;
        let mut context = ExportContext::new(backend, &self.config)?;

        let phases = Self::run_phases(&mut context, model, backend);
        let written = context.gather(backend).and_then(|()| {
            info!("Writing {}", self.config.output_filename.display());
            Ok(backend.write_file(&self.config.output_filename)?)
        });

        match (phases, written) {
            (Ok(()), Ok(())) => {
                let summary = context.finish();
                summary.log();
                Ok(summary)
            }
            (Ok(()), Err(err)) => Err(err),
            (Err(err), Ok(())) => {
                error!("Export aborted, wrote partial output: {}", err);
                Err(err)
            }
            (Err(err), Err(write_err)) => {
                error!("Export aborted: {}", err);
                warn!("Failed to write partial output: {}", write_err);
                Err(err)
            }
        }
    }

    fn run_phases<M>(context: &mut ExportContext, model: &M, backend: &mut B) -> ExportResult<()>
    where
        M: HostModel + TessellationService + ?Sized,
    {
        context.topology = collect(model);
        context.build_all_entity_sets(backend)?;
        context.link_hierarchy(model, backend)?;
        context.store_surface_senses(model, backend)?;
        context.store_curve_senses(model, backend)?;
        context.store_groups(model, backend)?;
        context.maps.clear_containers();

        context.create_vertices(model, backend)?;
        context.facet_model(model, backend)
    }

    /// Run the export, then release the mesh database whatever the outcome
    pub fn execute<M>(&mut self, model: &M) -> ExportResult<ExportSummary>
    where
        M: HostModel + TessellationService + ?Sized,
    {
        let result = self.build(model);
        match self.backend.delete_mesh() {
            Ok(()) => result,
            Err(err) if result.is_ok() => Err(err.into()),
            Err(err) => {
                warn!("Failed to release mesh database: {}", err);
                result
            }
        }
    }
}
