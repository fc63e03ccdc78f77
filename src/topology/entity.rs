// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Typed references to host topology entities

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! topo_ref {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

topo_ref!(
    /// Reference to a B-rep vertex
    VertexRef,
    "vertex"
);
topo_ref!(
    /// Reference to a B-rep edge (curve)
    EdgeRef,
    "edge"
);
topo_ref!(
    /// Reference to a B-rep face (surface)
    FaceRef,
    "face"
);
topo_ref!(
    /// Reference to a B-rep body (volume)
    BodyRef,
    "body"
);
topo_ref!(
    /// Reference to a named group
    GroupRef,
    "group"
);

/// Geometric dimension of an exported entity-set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    Vertex,
    Curve,
    Surface,
    Volume,
    Group,
}

impl Dimension {
    /// Topological dimensions in the order entity-sets are built
    pub const TOPOLOGICAL_DESCENDING: [Dimension; 4] = [
        Dimension::Volume,
        Dimension::Surface,
        Dimension::Curve,
        Dimension::Vertex,
    ];

    /// Value stored in the `GEOM_DIMENSION` tag
    pub fn index(self) -> i32 {
        match self {
            Dimension::Vertex => 0,
            Dimension::Curve => 1,
            Dimension::Surface => 2,
            Dimension::Volume => 3,
            Dimension::Group => 4,
        }
    }

    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Dimension::Vertex),
            1 => Some(Dimension::Curve),
            2 => Some(Dimension::Surface),
            3 => Some(Dimension::Volume),
            4 => Some(Dimension::Group),
            _ => None,
        }
    }

    /// Value stored in the `CATEGORY` tag
    pub fn category(self) -> &'static str {
        match self {
            Dimension::Vertex => "Vertex",
            Dimension::Curve => "Curve",
            Dimension::Surface => "Surface",
            Dimension::Volume => "Volume",
            Dimension::Group => "Group",
        }
    }

    pub fn from_category(name: &str) -> Option<Self> {
        match name {
            "Vertex" => Some(Dimension::Vertex),
            "Curve" => Some(Dimension::Curve),
            "Surface" => Some(Dimension::Surface),
            "Volume" => Some(Dimension::Volume),
            "Group" => Some(Dimension::Group),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}

/// Any object that can be exported or appear as a group member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Vertex(VertexRef),
    Edge(EdgeRef),
    Face(FaceRef),
    Body(BodyRef),
    Group(GroupRef),
}

impl EntityRef {
    pub fn dimension(self) -> Dimension {
        match self {
            EntityRef::Vertex(_) => Dimension::Vertex,
            EntityRef::Edge(_) => Dimension::Curve,
            EntityRef::Face(_) => Dimension::Surface,
            EntityRef::Body(_) => Dimension::Volume,
            EntityRef::Group(_) => Dimension::Group,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Vertex(v) => v.fmt(f),
            EntityRef::Edge(e) => e.fmt(f),
            EntityRef::Face(s) => s.fmt(f),
            EntityRef::Body(b) => b.fmt(f),
            EntityRef::Group(g) => g.fmt(f),
        }
    }
}

impl From<VertexRef> for EntityRef {
    fn from(v: VertexRef) -> Self {
        EntityRef::Vertex(v)
    }
}

impl From<EdgeRef> for EntityRef {
    fn from(e: EdgeRef) -> Self {
        EntityRef::Edge(e)
    }
}

impl From<FaceRef> for EntityRef {
    fn from(f: FaceRef) -> Self {
        EntityRef::Face(f)
    }
}

impl From<BodyRef> for EntityRef {
    fn from(b: BodyRef) -> Self {
        EntityRef::Body(b)
    }
}

impl From<GroupRef> for EntityRef {
    fn from(g: GroupRef) -> Self {
        EntityRef::Group(g)
    }
}

/// Orientation of a face or edge use as reported by the host kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseSense {
    #[default]
    Forward,
    Reversed,
    Unknown,
}

impl UseSense {
    pub fn from_reversed(reversed: bool) -> Self {
        if reversed {
            UseSense::Reversed
        } else {
            UseSense::Forward
        }
    }
}

/// A face bounding a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceUse {
    pub body: BodyRef,
    #[serde(default)]
    pub sense: UseSense,
}

/// An edge bounding a face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeUse {
    pub face: FaceRef,
    #[serde(default)]
    pub sense: UseSense,
}
