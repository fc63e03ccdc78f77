// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export errors

use crate::mesh::MeshError;
use crate::topology::EntityRef;
use thiserror::Error;

/// Fatal export failures. Recoverable problems are counted in the summary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    #[error("Mesh database error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Failed to facet curve {id}")]
    CurveFacetingFailed { id: i32 },

    #[error("No unique id assigned to {0}")]
    NotRegistered(EntityRef),

    #[error("Invalid facet data for surface {id}: point index {index} out of range")]
    InvalidFacetData { id: i32, index: usize },

    #[error("Unknown entities found in the gather set")]
    GatherSetNotEmpty,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;
