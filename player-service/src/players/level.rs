//! Level curve
//!
//! `level = trunc(sqrt(2500 + 200 * experience) - 50) / 100`
//!
//! `untilNextLevel = 50 * (level + 1) * (level + 2) - experience`

use super::model::Player;

/// Level and remaining experience derived from a single experience value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
    pub level: i32,
    pub until_next_level: i64,
}

impl Progression {
    /// Derive both values from `experience`
    pub fn from_experience(experience: i64) -> Self {
        let level = level_for(experience);
        Self {
            level,
            until_next_level: until_next_level(level, experience),
        }
    }
}

/// Level reached with `experience` points
pub fn level_for(experience: i64) -> i32 {
    let root = (2500.0 + 200.0 * experience as f64).sqrt();
    // `as` truncates toward zero and maps NaN to 0
    (root - 50.0) as i32 / 100
}

/// Experience still needed to leave `level`
pub fn until_next_level(level: i32, experience: i64) -> i64 {
    let level = i64::from(level);
    50 * (level + 1) * (level + 2) - experience
}

impl Player {
    /// Recompute `level` and `until_next_level` from `experience`
    pub fn recalculate_progression(&mut self) {
        let progression = Progression::from_experience(self.experience);
        self.level = progression.level;
        self.until_next_level = progression.until_next_level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_points() {
        assert_eq!(
            Progression::from_experience(0),
            Progression { level: 0, until_next_level: 100 }
        );
        assert_eq!(
            Progression::from_experience(99),
            Progression { level: 0, until_next_level: 1 }
        );
        assert_eq!(
            Progression::from_experience(100),
            Progression { level: 1, until_next_level: 200 }
        );
        assert_eq!(
            Progression::from_experience(300),
            Progression { level: 2, until_next_level: 300 }
        );
        assert_eq!(
            Progression::from_experience(10_000_000),
            Progression { level: 446, until_next_level: 12_800 }
        );
    }

    #[test]
    fn test_level_is_monotonic_and_until_positive() {
        let mut previous = 0;
        for experience in 0..=50_000 {
            let progression = Progression::from_experience(experience);
            assert!(progression.level >= previous, "level dropped at {experience}");
            assert!(progression.until_next_level > 0, "until not positive at {experience}");
            previous = progression.level;
        }
    }
}
