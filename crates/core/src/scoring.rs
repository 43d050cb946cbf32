//! Scoring module - points per cleared token and goal progression
//!
//! - A resolved match is worth `points_per_piece * match_len`.
//! - When the round timer expires with the goal met, the next goal is
//!   `goal + ceil(points * goal_percentage)`.

/// Points for clearing a run of `len` tokens.
pub fn score_for(len: usize, points_per_piece: u64) -> u64 {
    points_per_piece.saturating_mul(len as u64)
}

/// Raise the goal after it has been beaten.
pub fn next_goal(goal: u64, points: u64, goal_percentage: f64) -> u64 {
    let bonus = (points as f64 * goal_percentage).ceil();
    // Float-to-int `as` saturates, NaN maps to 0.
    goal.saturating_add(bonus as u64)
}

/// Whether the current points meet the goal.
pub fn goal_met(points: u64, goal: u64) -> bool {
    points >= goal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_for_is_linear_in_length() {
        assert_eq!(score_for(3, 10), 30);
        assert_eq!(score_for(4, 10), 40);
        assert_eq!(score_for(5, 7), 35);
        assert_eq!(score_for(0, 10), 0);
    }

    #[test]
    fn test_score_for_saturates() {
        assert_eq!(score_for(3, u64::MAX), u64::MAX);
    }

    #[test]
    fn test_next_goal_rounds_up() {
        assert_eq!(next_goal(100, 150, 0.5), 175);
        assert_eq!(next_goal(100, 151, 0.5), 176);
        assert_eq!(next_goal(100, 10, 0.01), 101);
        assert_eq!(next_goal(100, 0, 0.5), 100);
    }

    #[test]
    fn test_goal_met_boundary() {
        assert!(goal_met(100, 100));
        assert!(!goal_met(99, 100));
    }
}
