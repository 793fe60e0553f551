//! Per-distance announcement latch.
//!
//! Each announcement position (1000 m, 500 m, ... before an intersection)
//! owns one latch. A latch fires once when the approach enters its window
//! and re-arms only after the approach leaves it again:
//!
//! ```text
//! Armed --[approaching, turning direction]--> Announced   (emits cue)
//! Announced --[not approaching]--> Armed
//! ```

use super::direction::Direction;

/// Arm/disarm state for one announcement distance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementLatch {
    position: i32,
    postfix: String,
    announced: bool,
}

impl AnnouncementLatch {
    /// Create an armed latch for an announcement `position` meters before
    /// the intersection.
    pub fn new(position: i32) -> Self {
        let postfix = if position <= 10 {
            String::new()
        } else if position >= 1000 {
            "In1km".to_string()
        } else {
            format!("In{}m", position)
        };
        Self {
            position,
            postfix,
            announced: false,
        }
    }

    /// Distance before the intersection this latch announces at.
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Whether the latch fired during the current approach.
    pub fn is_announced(&self) -> bool {
        self.announced
    }

    /// Cue name for a direction, or `None` for directions that are never
    /// announced.
    pub fn cue(&self, direction: Direction) -> Option<String> {
        let prefix = match direction {
            Direction::Right => "TurnRight",
            Direction::Left => "TurnLeft",
            Direction::LightLeft => "KeepLeft",
            Direction::LightRight => "KeepRight",
            Direction::Straight | Direction::Unknown => return None,
        };
        Some(format!("{}{}", prefix, self.postfix))
    }

    /// Advance the latch by one tick.
    ///
    /// Returns the cue to announce when the latch fires.
    pub fn update(&mut self, approaching: bool, direction: Direction) -> Option<String> {
        let mut fired = None;

        if approaching && !self.announced {
            if let Some(cue) = self.cue(direction) {
                self.announced = true;
                fired = Some(cue);
            }
        }

        if self.announced && !approaching {
            self.announced = false;
        }

        fired
    }
}
