// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Distance tolerances

use nalgebra::Point3;

/// If the distance between two points is less than `GEOMETRY_RESABS`
/// the points are considered to be identical.
pub const GEOMETRY_RESABS: f64 = 1.0e-6;

/// Check whether two points lie within `tolerance` of each other.
///
/// Compares squared distances so no square root is taken.
pub fn coincident(a: &Point3<f64>, b: &Point3<f64>, tolerance: f64) -> bool {
    (a - b).norm_squared() < tolerance * tolerance
}
