// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - tolerances, tessellation buffers and bounds

mod bbox;
mod tessellation;
mod tolerance;

pub use bbox::BoundingBox;
pub use tessellation::{CurveFacets, FacetParams, SurfaceFacets};
pub use tolerance::{coincident, GEOMETRY_RESABS};
