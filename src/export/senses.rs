// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Sense records between adjacent entity-sets
//!
//! A face may bound several bodies and every use is recorded. Surfaces
//! are not checked for a single forward and a single reverse volume.

use super::{ExportContext, ExportResult};
use crate::mesh::{MeshBackend, Sense};
use crate::topology::{HostModel, UseSense};
use tracing::warn;

/// Sense of a use relative to the orientation of the used entity
pub fn resolve_sense(use_sense: UseSense, reversed: bool) -> Sense {
    match use_sense {
        UseSense::Unknown => Sense::Both,
        sense if sense == UseSense::from_reversed(reversed) => Sense::Forward,
        _ => Sense::Reverse,
    }
}

impl ExportContext {
    /// Record the sense of every surface relative to its volumes
    pub fn store_surface_senses<M, B>(&mut self, model: &M, backend: &mut B) -> ExportResult<()>
    where
        M: HostModel + ?Sized,
        B: MeshBackend + ?Sized,
    {
        for face in self.topology.faces.clone() {
            let Some(&surface) = self.maps.faces.get(&face) else {
                continue;
            };
            let reversed = model.face_is_reversed(face);
            for face_use in model.face_uses(face) {
                match self.maps.bodies.get(&face_use.body) {
                    Some(&volume) => {
                        backend.set_sense(
                            surface,
                            volume,
                            resolve_sense(face_use.sense, reversed),
                        )?;
                    }
                    None => {
                        warn!("{} is used by unexported {}", face, face_use.body);
                        self.summary.unmapped_links += 1;
                    }
                }
            }
        }
        Ok(())
    }

    /// Record the sense of every curve relative to its surfaces
    pub fn store_curve_senses<M, B>(&mut self, model: &M, backend: &mut B) -> ExportResult<()>
    where
        M: HostModel + ?Sized,
        B: MeshBackend + ?Sized,
    {
        for edge in self.topology.edges.clone() {
            let Some(&curve) = self.maps.edges.get(&edge) else {
                continue;
            };
            let reversed = model.edge_is_reversed(edge);
            for edge_use in model.edge_uses(edge) {
                match self.maps.faces.get(&edge_use.face) {
                    Some(&surface) => {
                        backend.set_sense(curve, surface, resolve_sense(edge_use.sense, reversed))?;
                    }
                    None => {
                        warn!("{} is used by unexported {}", edge, edge_use.face);
                        self.summary.unmapped_links += 1;
                    }
                }
            }
        }
        Ok(())
    }
}
