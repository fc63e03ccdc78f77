// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem for the exporter

pub mod inspect;
pub mod reporter;

pub use inspect::MeshInventory;
pub use reporter::Reporter;
