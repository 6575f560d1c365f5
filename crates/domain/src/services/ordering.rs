//! Manual ordering of catalogue entries.
//!
//! Products and testimonials carry an integer `sort_order`. Moving an entry
//! swaps its value with the nearest neighbour in the requested direction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Direction of a move within a sorted list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    /// Towards smaller sort order values.
    Up,
    /// Towards larger sort order values.
    Down,
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveDirection::Up => write!(f, "up"),
            MoveDirection::Down => write!(f, "down"),
        }
    }
}

impl FromStr for MoveDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" => Ok(MoveDirection::Up),
            "down" => Ok(MoveDirection::Down),
            _ => Err(format!("Invalid move direction: {}", s)),
        }
    }
}

/// Body of the admin move endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MoveRequest {
    pub direction: MoveDirection,
}

/// Result of a move. `moved` is false when the entry was already at the edge.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MoveResponse {
    pub id: Uuid,
    pub direction: MoveDirection,
    pub moved: bool,
}

/// An entry position: id and current sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSlot {
    pub id: Uuid,
    pub sort_order: i32,
}

/// The two updates needed to perform a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSwap {
    pub moved: SortSlot,
    pub displaced: SortSlot,
}

impl SortSwap {
    /// Plans the swap between `current` and its `neighbour`.
    ///
    /// The returned slots hold the *new* sort orders. Returns `None` when
    /// there is no neighbour or the neighbour is on the wrong side.
    pub fn plan(current: SortSlot, neighbour: Option<SortSlot>, direction: MoveDirection) -> Option<Self> {
        let neighbour = neighbour?;
        let valid = match direction {
            MoveDirection::Up => neighbour.sort_order < current.sort_order,
            MoveDirection::Down => neighbour.sort_order > current.sort_order,
        };
        if !valid || neighbour.id == current.id {
            return None;
        }

        Some(Self {
            moved: SortSlot {
                id: current.id,
                sort_order: neighbour.sort_order,
            },
            displaced: SortSlot {
                id: neighbour.id,
                sort_order: current.sort_order,
            },
        })
    }
}

/// Sort order for an entry appended after the current maximum.
pub fn next_sort_order(current_max: Option<i32>) -> i32 {
    current_max.map(|max| max.saturating_add(1)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(sort_order: i32) -> SortSlot {
        SortSlot {
            id: Uuid::new_v4(),
            sort_order,
        }
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("up".parse::<MoveDirection>().unwrap(), MoveDirection::Up);
        assert_eq!("DOWN".parse::<MoveDirection>().unwrap(), MoveDirection::Down);
        assert!("left".parse::<MoveDirection>().is_err());
        assert_eq!(MoveDirection::Down.to_string(), "down");
    }

    #[test]
    fn test_direction_serde() {
        let d: MoveDirection = serde_json::from_str("\"up\"").unwrap();
        assert_eq!(d, MoveDirection::Up);
    }

    #[test]
    fn test_plan_up_swaps_values() {
        let current = slot(5);
        let above = slot(3);
        let swap = SortSwap::plan(current, Some(above), MoveDirection::Up).unwrap();
        assert_eq!(swap.moved.id, current.id);
        assert_eq!(swap.moved.sort_order, 3);
        assert_eq!(swap.displaced.id, above.id);
        assert_eq!(swap.displaced.sort_order, 5);
    }

    #[test]
    fn test_plan_down_swaps_values() {
        let current = slot(1);
        let below = slot(2);
        let swap = SortSwap::plan(current, Some(below), MoveDirection::Down).unwrap();
        assert_eq!(swap.moved.sort_order, 2);
        assert_eq!(swap.displaced.sort_order, 1);
    }

    #[test]
    fn test_plan_without_neighbour_is_noop() {
        assert!(SortSwap::plan(slot(0), None, MoveDirection::Up).is_none());
    }

    #[test]
    fn test_plan_rejects_wrong_side() {
        assert!(SortSwap::plan(slot(2), Some(slot(4)), MoveDirection::Up).is_none());
        assert!(SortSwap::plan(slot(2), Some(slot(2)), MoveDirection::Down).is_none());
    }

    #[test]
    fn test_next_sort_order() {
        assert_eq!(next_sort_order(None), 0);
        assert_eq!(next_sort_order(Some(4)), 5);
        assert_eq!(next_sort_order(Some(i32::MAX)), i32::MAX);
    }
}
