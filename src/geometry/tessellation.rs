// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tessellation buffers returned by the host geometry kernel

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Tolerances passed to the tessellation service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacetParams {
    /// Maximum distance between a facet and the true geometry
    pub faceting_tolerance: f64,
    /// Maximum angle between adjacent facet normals, in degrees
    pub normal_tolerance: u32,
    /// Maximum facet edge length, zero for unlimited
    pub length_tolerance: f64,
}

impl Default for FacetParams {
    fn default() -> Self {
        Self {
            faceting_tolerance: 1.0e-3,
            normal_tolerance: 5,
            length_tolerance: 0.0,
        }
    }
}

/// Ordered sample points approximating a curve
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveFacets {
    pub points: Vec<Point3<f64>>,
}

impl CurveFacets {
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }

    /// An empty result means the kernel failed to facet the curve
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Sample points plus triangle index triples approximating a surface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceFacets {
    pub points: Vec<Point3<f64>>,
    pub facets: Vec<[usize; 3]>,
}

impl SurfaceFacets {
    pub fn new(points: Vec<Point3<f64>>, facets: Vec<[usize; 3]>) -> Self {
        Self { points, facets }
    }

    /// Get the number of triangles
    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    /// First facet index that does not address a sample point
    pub fn first_invalid_index(&self) -> Option<usize> {
        self.facets
            .iter()
            .flat_map(|f| f.iter().copied())
            .find(|&i| i >= self.points.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_facet_index() {
        let facets = SurfaceFacets::new(
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
            vec![[0, 1, 2], [0, 2, 3]],
        );
        assert_eq!(facets.first_invalid_index(), Some(3));
        assert_eq!(facets.facet_count(), 2);
    }
}
