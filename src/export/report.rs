// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export summary and warning rate limiting

use crate::topology::EntityCounts;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// What a rate-limited warning should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningDisposition {
    Emit,
    /// Emit, then announce that further instances are suppressed
    EmitLast,
    Suppress,
}

/// Counts down a fixed number of warnings before suppressing the rest
#[derive(Debug, Clone)]
pub struct WarningBudget {
    remaining: i64,
    verbose: bool,
    events: usize,
}

impl WarningBudget {
    pub fn new(budget: usize, verbose: bool) -> Self {
        Self {
            remaining: budget as i64,
            verbose,
            events: 0,
        }
    }

    /// Record one event
    pub fn record(&mut self) -> WarningDisposition {
        self.events += 1;
        self.remaining -= 1;
        if self.verbose || self.remaining > 0 {
            WarningDisposition::Emit
        } else if self.remaining == 0 {
            WarningDisposition::EmitLast
        } else {
            WarningDisposition::Suppress
        }
    }

    /// Events recorded so far
    pub fn events(&self) -> usize {
        self.events
    }

    /// Events that were not shown
    pub fn suppressed(&self) -> usize {
        if self.verbose || self.remaining >= 0 {
            0
        } else {
            (-self.remaining) as usize
        }
    }
}

/// Outcome of a completed export
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportSummary {
    pub counts: EntityCounts,
    /// Entities in the mesh database when it was written
    pub mesh_entities: usize,
    pub output: PathBuf,
    /// Unique ids of curves that could not be faceted
    pub failed_curves: Vec<i32>,
    /// Unique ids of surfaces that could not be faceted
    pub failed_surfaces: Vec<i32>,
    pub curve_end_warnings: usize,
    pub suppressed_curve_warnings: usize,
    pub inconsistent_curves: usize,
    pub ambiguous_coincidences: usize,
    pub unmapped_links: usize,
    pub unresolved_group_members: usize,
}

impl ExportSummary {
    pub fn failed_curve_count(&self) -> usize {
        self.failed_curves.len()
    }

    pub fn failed_surface_count(&self) -> usize {
        self.failed_surfaces.len()
    }

    /// Whether the export completed without any recoverable problem
    pub fn is_clean(&self) -> bool {
        self.failed_curves.is_empty()
            && self.failed_surfaces.is_empty()
            && self.curve_end_warnings == 0
            && self.inconsistent_curves == 0
            && self.ambiguous_coincidences == 0
            && self.unmapped_links == 0
            && self.unresolved_group_members == 0
    }

    /// Log the faceting summary
    pub fn log(&self) {
        info!("***** Faceting Summary Information *****");
        if self.failed_curves.is_empty() {
            info!("----- All curves faceted correctly -----");
        } else {
            warn!(
                "There were {} curves that could not be faceted: {:?}",
                self.failed_curve_count(),
                self.failed_curves
            );
        }
        if self.failed_surfaces.is_empty() {
            info!("----- All surfaces faceted correctly -----");
        } else {
            warn!(
                "There were {} surfaces that could not be faceted: {:?}",
                self.failed_surface_count(),
                self.failed_surfaces
            );
        }
        if self.suppressed_curve_warnings > 0 {
            info!(
                "Suppressed {} 'vertices not at ends of curve' warnings",
                self.suppressed_curve_warnings
            );
        }
        info!("***** End of Faceting Summary Information *****");
    }
}
