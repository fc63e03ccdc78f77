// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Entity handles into the mesh database

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle naming a set, point or element in a mesh database
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityHandle(pub u64);

impl EntityHandle {
    /// Reserved handle. Never names a created entity.
    pub const INVALID: EntityHandle = EntityHandle(0);

    /// The database itself, used when tagging global data
    pub const ROOT: EntityHandle = EntityHandle(0);

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
