//! Plan-view geometry of a road's reference line.
//!
//! Only the parts needed for turn classification are modelled: the segment
//! length and, for arcs, the signed curvature. Positive curvature bends left
//! when travelling in increasing s, negative curvature bends right.

use serde::{Deserialize, Serialize};

/// Kind of a plan-view geometry segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeometryKind {
    /// Straight line.
    Line,
    /// Clothoid transition. Ignored by turn classification.
    Spiral {
        /// Curvature at the segment start (1/m).
        curv_start: f64,
        /// Curvature at the segment end (1/m).
        curv_end: f64,
    },
    /// Constant-curvature arc.
    Arc {
        /// Signed curvature (1/m). Magnitude is 1/radius.
        curvature: f64,
    },
}

/// One segment of a road's plan-view geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometrySegment {
    /// Start of the segment along the reference line (meters).
    #[serde(default)]
    pub s: f64,
    /// Segment length (meters).
    pub length: f64,
    /// Segment shape.
    #[serde(flatten)]
    pub kind: GeometryKind,
}

impl GeometrySegment {
    /// Create a straight segment.
    pub fn line(s: f64, length: f64) -> Self {
        Self {
            s,
            length,
            kind: GeometryKind::Line,
        }
    }

    /// Create an arc segment with the given signed curvature.
    pub fn arc(s: f64, length: f64, curvature: f64) -> Self {
        Self {
            s,
            length,
            kind: GeometryKind::Arc { curvature },
        }
    }

    /// Create a spiral segment.
    pub fn spiral(s: f64, length: f64, curv_start: f64, curv_end: f64) -> Self {
        Self {
            s,
            length,
            kind: GeometryKind::Spiral {
                curv_start,
                curv_end,
            },
        }
    }

    /// Curvature of the segment if it is an arc.
    pub fn arc_curvature(&self) -> Option<f64> {
        match self.kind {
            GeometryKind::Arc { curvature } => Some(curvature),
            _ => None,
        }
    }
}
