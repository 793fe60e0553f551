//! Turn direction classification from road curvature.
//!
//! The lane entered right after an intersection tells which way the route
//! turns. Its road's arc segments are integrated into total left and right
//! turning (`|length × curvature|`), and the two totals decide the
//! direction:
//!
//! ```text
//! (right <= 0.2 and left == 0) or (left <= 0.2 and right == 0)  -> Straight
//! right > 3 × left                                              -> Right
//! left  > 3 × right                                             -> Left
//! otherwise                                                     -> first curve (LightLeft / LightRight)
//! ```
//!
//! Only arcs count. Lines carry no curvature and spirals are ignored, as are
//! arcs of 0.5 m or less.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::network::GeometrySegment;

// ─────────────────────────────────────────────────────────────────────────────
// Thresholds
// ─────────────────────────────────────────────────────────────────────────────

/// Arcs this short or shorter are ignored.
pub const MIN_ARC_LENGTH: f64 = 0.5;

/// Integrated curvature at or below which a one-sided curve counts as straight.
pub const STRAIGHT_TOLERANCE: f64 = 0.2;

/// Factor by which one side must dominate the other for a full turn.
pub const DOMINANCE_RATIO: f64 = 3.0;

/// Most probable turn direction at an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Sharp left turn.
    Left,
    /// Slight left turn or lane change to the left.
    LightLeft,
    /// No turn.
    Straight,
    /// Slight right turn or lane change to the right.
    LightRight,
    /// Sharp right turn.
    Right,
    /// Direction not available.
    Unknown,
}

impl Direction {
    /// Human-readable name for logging and output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "Left",
            Direction::LightLeft => "LightLeft",
            Direction::Straight => "Straight",
            Direction::LightRight => "LightRight",
            Direction::Right => "Right",
            Direction::Unknown => "Unknown",
        }
    }

    /// Whether the direction turns left (sharp or light).
    pub fn is_left(&self) -> bool {
        matches!(self, Direction::Left | Direction::LightLeft)
    }

    /// Whether the direction turns right (sharp or light).
    pub fn is_right(&self) -> bool {
        matches!(self, Direction::Right | Direction::LightRight)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationRule {
    /// Curvature too low or one-sided and slight.
    Straight,
    /// Right turning dominates.
    RightDominant,
    /// Left turning dominates.
    LeftDominant,
    /// Neither side dominates; the first curve decides.
    FirstCurve,
}

/// Result of classifying a road's geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// The classified direction.
    pub direction: Direction,
    /// The rule that decided it.
    pub rule: ClassificationRule,
    /// Integrated left turning.
    pub left: f64,
    /// Integrated right turning.
    pub right: f64,
}

/// Classify the turn direction of a road's geometry.
///
/// `entered_forward` tells whether the road is driven from its start
/// (increasing s). Driven backwards the segments are visited in reverse
/// and the curvature sign flips.
pub fn classify(segments: &[GeometrySegment], entered_forward: bool) -> Classification {
    let mut left = 0.0;
    let mut right = 0.0;
    let mut first_curve = Direction::Unknown;

    let arcs = segments.iter().filter_map(|segment| {
        let curvature = segment.arc_curvature()?;
        (segment.length > MIN_ARC_LENGTH).then_some((segment.length, curvature))
    });

    let mut accumulate = |length: f64, curvature: f64| {
        // Negative curvature bends right when driven forward.
        let signed = if entered_forward { curvature } else { -curvature };
        let amount = (length * curvature).abs();
        let side = if signed < 0.0 {
            right += amount;
            Direction::LightRight
        } else if signed > 0.0 {
            left += amount;
            Direction::LightLeft
        } else {
            return;
        };
        if first_curve == Direction::Unknown {
            first_curve = side;
        }
    };

    if entered_forward {
        arcs.for_each(|(length, curvature)| accumulate(length, curvature));
    } else {
        arcs.rev()
            .for_each(|(length, curvature)| accumulate(length, curvature));
    }

    let (direction, rule) = if (right <= STRAIGHT_TOLERANCE && left == 0.0)
        || (left <= STRAIGHT_TOLERANCE && right == 0.0)
    {
        (Direction::Straight, ClassificationRule::Straight)
    } else if right > DOMINANCE_RATIO * left {
        (Direction::Right, ClassificationRule::RightDominant)
    } else if left > DOMINANCE_RATIO * right {
        (Direction::Left, ClassificationRule::LeftDominant)
    } else {
        (first_curve, ClassificationRule::FirstCurve)
    };

    Classification {
        direction,
        rule,
        left,
        right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_right_arc() {
        let result = classify(&[GeometrySegment::arc(0.0, 100.0, -0.01)], true);
        assert_eq!(result.direction, Direction::Right);
        assert_eq!(result.rule, ClassificationRule::RightDominant);
        assert!((result.right - 1.0).abs() < 1e-12);
        assert_eq!(result.left, 0.0);
    }

    #[test]
    fn test_reversed_traversal_flips_sign() {
        let result = classify(&[GeometrySegment::arc(0.0, 100.0, -0.01)], false);
        assert_eq!(result.direction, Direction::Left);
        assert!((result.left - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_balanced_curves_use_first_curve() {
        // left 1.0 then right 0.4: 1.0 is not > 3 × 0.4, so the first curve decides.
        let segments = [
            GeometrySegment::arc(0.0, 50.0, 0.02),
            GeometrySegment::arc(50.0, 40.0, -0.01),
        ];
        let result = classify(&segments, true);
        assert_eq!(result.rule, ClassificationRule::FirstCurve);
        assert_eq!(result.direction, Direction::LightLeft);
        assert!(result.direction.is_left());

        // Driven backwards the right arc comes first and becomes a left bend.
        let reversed = classify(&segments, false);
        assert_eq!(reversed.rule, ClassificationRule::FirstCurve);
        assert_eq!(reversed.direction, Direction::LightLeft);
        assert!((reversed.left - 0.4).abs() < 1e-12);
        assert!((reversed.right - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_slight_curve_is_straight() {
        let result = classify(&[GeometrySegment::arc(0.0, 10.0, 0.02)], true);
        assert_eq!(result.direction, Direction::Straight);
        assert_eq!(result.rule, ClassificationRule::Straight);
    }

    #[test]
    fn test_ignores_short_arcs_lines_and_spirals() {
        let segments = [
            GeometrySegment::line(0.0, 20.0),
            GeometrySegment::arc(20.0, 0.5, -5.0),
            GeometrySegment::spiral(20.5, 30.0, 0.0, -0.1),
        ];
        let result = classify(&segments, true);
        assert_eq!(result.direction, Direction::Straight);
        assert_eq!(result.right, 0.0);
    }

    #[test]
    fn test_no_geometry_is_straight() {
        assert_eq!(classify(&[], true).direction, Direction::Straight);
    }

    #[test]
    fn test_dominant_left() {
        let segments = [
            GeometrySegment::arc(0.0, 10.0, -0.01),
            GeometrySegment::arc(10.0, 30.0, 0.05),
        ];
        let result = classify(&segments, true);
        assert_eq!(result.direction, Direction::Left);
        assert_eq!(result.rule, ClassificationRule::LeftDominant);
    }
}
