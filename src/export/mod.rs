// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export module - B-rep topology to a handle-addressed mesh database
//!
//! The pipeline runs in fixed phases over one `ExportContext`: entity-sets,
//! parent/child links, senses, groups, vertex points, facets, gather and
//! write.

mod collect;
mod config;
mod context;
mod error;
mod exporter;
mod facets;
mod groups;
mod hierarchy;
mod ids;
mod report;
mod senses;
mod sets;

pub use collect::{collect, Topology};
pub use config::{ExportConfig, OptionValue, CONFIG_FILE_NAME};
pub use context::{EntityMaps, ExportContext, GeomTags};
pub use error::{ExportError, ExportResult};
pub use exporter::DagmcExporter;
pub use ids::UniqueIdRegistry;
pub use report::{ExportSummary, WarningBudget, WarningDisposition};
pub use senses::resolve_sense;
