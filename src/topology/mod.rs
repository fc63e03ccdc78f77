// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Topology module - host B-rep interfaces and an in-memory model

mod builder;
mod check;
mod entity;
mod memory;
mod model;

pub use builder::{demo_model, BrepBuilder};
pub use check::{check_model, CheckIssue, CheckReport, EntityCounts};
pub use entity::{
    BodyRef, Dimension, EdgeRef, EdgeUse, EntityRef, FaceRef, FaceUse, GroupRef, UseSense,
    VertexRef,
};
pub use memory::{
    BodyDef, BrepModel, CoEdge, CompositeDef, EdgeDef, FaceDef, GroupDef, MemoryModel, VertexDef,
};
pub use model::{HostModel, TessellationService};
