//! In-memory mission store

use heapless::Vec;

use super::{MissionError, MissionStore, Waypoint, MAX_WAYPOINTS};

/// Fixed-capacity waypoint list
///
/// The list validates when it is non-empty, only its final waypoint
/// carries the end-of-list flag and every position lies on the globe.
#[derive(Debug, Clone, Default)]
pub struct MissionList {
    waypoints: Vec<Waypoint, MAX_WAYPOINTS>,
}

impl MissionList {
    /// Create an empty list
    pub const fn new() -> Self {
        Self {
            waypoints: Vec::new(),
        }
    }

    /// Check if mission is empty
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// All waypoints in order
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }
}

impl MissionStore for MissionList {
    fn count(&self) -> u16 {
        self.waypoints.len() as u16
    }

    fn waypoint(&self, index: u16) -> Option<Waypoint> {
        self.waypoints.get(index as usize).copied()
    }

    fn set_waypoint(&mut self, index: u16, waypoint: Waypoint) -> Result<(), MissionError> {
        let slot = index as usize;
        if slot >= MAX_WAYPOINTS {
            return Err(MissionError::Full {
                capacity: MAX_WAYPOINTS,
            });
        }
        if slot > self.waypoints.len() {
            return Err(MissionError::OutOfSequence {
                index,
                count: self.count(),
            });
        }

        // Writing index 0 starts a new list, any later write truncates after it
        self.waypoints.truncate(slot);
        self.waypoints
            .push(waypoint)
            .map_err(|_| MissionError::Full {
                capacity: MAX_WAYPOINTS,
            })
    }

    fn reset(&mut self) {
        self.waypoints.clear();
    }

    fn is_valid(&self) -> bool {
        let Some((last, rest)) = self.waypoints.split_last() else {
            return false;
        };
        last.is_last()
            && rest.iter().all(|wp| !wp.is_last())
            && self.waypoints.iter().all(Waypoint::has_valid_position)
    }
}
