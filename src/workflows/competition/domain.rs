use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lookback windows the scorer operates over.
pub const WEEK_WINDOW_DAYS: i64 = 7;
pub const MONTH_WINDOW_DAYS: i64 = 30;

/// Bonus for each chore completed strictly before its due date.
pub const EARLY_FINISH_BONUS: u32 = 5;
/// Bonus when a house completes every chore opened in the last week.
pub const PERFECT_WEEK_BONUS: u32 = 25;
/// Bonus per scheduled event involving the house within the window.
pub const EVENT_ATTENDANCE_BONUS: u32 = 10;

/// Badge thresholds on total points.
pub const GOLD_THRESHOLD: u32 = 450;
pub const SILVER_THRESHOLD: u32 = 350;
pub const BRONZE_THRESHOLD: u32 = 250;

/// Achievement thresholds. Category comparisons are strict.
pub const CHORE_CHAMPIONS_THRESHOLD: u32 = 150;
pub const PUNCTUALITY_PROS_THRESHOLD: u32 = 80;
pub const FULL_HOUSE_THRESHOLD: u32 = 90;
pub const TRIPLE_CROWN_THRESHOLD: u32 = 500;

pub const CHORE_CHAMPIONS: &str = "Chore Champions";
pub const PUNCTUALITY_PROS: &str = "Punctuality Pros";
pub const FULL_HOUSE: &str = "Full House";
pub const TRIPLE_CROWN: &str = "Triple Crown";

/// The five competition categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    ChoreCompletion,
    Punctuality,
    Teamwork,
    Cleanliness,
    Participation,
}

impl ScoreCategory {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreCategory::ChoreCompletion => "chore_completion",
            ScoreCategory::Punctuality => "punctuality",
            ScoreCategory::Teamwork => "teamwork",
            ScoreCategory::Cleanliness => "cleanliness",
            ScoreCategory::Participation => "participation",
        }
    }
}

/// Point totals per category for one house and window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPoints {
    pub chore_completion: u32,
    pub punctuality: u32,
    pub teamwork: u32,
    pub cleanliness: u32,
    pub participation: u32,
}

impl CategoryPoints {
    pub fn total(&self) -> u32 {
        self.chore_completion
            + self.punctuality
            + self.teamwork
            + self.cleanliness
            + self.participation
    }
}

/// Threshold-derived label on a house's cumulative total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Badge {
    Gold,
    Silver,
    Bronze,
}

impl Badge {
    pub const fn label(self) -> &'static str {
        match self {
            Badge::Gold => "Gold",
            Badge::Silver => "Silver",
            Badge::Bronze => "Bronze",
        }
    }

    pub fn from_points(total: u32) -> Option<Self> {
        if total > GOLD_THRESHOLD {
            Some(Badge::Gold)
        } else if total > SILVER_THRESHOLD {
            Some(Badge::Silver)
        } else if total > BRONZE_THRESHOLD {
            Some(Badge::Bronze)
        } else {
            None
        }
    }
}

/// One house's ranked competition entry. Recomputed fully on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseScore {
    pub house: String,
    pub categories: CategoryPoints,
    pub total_points: u32,
    /// 1-based; ties keep original house order.
    pub rank: u32,
    pub badge: Option<Badge>,
    #[serde(skip_deserializing)]
    pub achievements: Vec<&'static str>,
}

/// Achievements unlocked by a scored entry.
pub fn achievements(categories: &CategoryPoints, total: u32) -> Vec<&'static str> {
    let mut unlocked = Vec::new();
    if categories.chore_completion > CHORE_CHAMPIONS_THRESHOLD {
        unlocked.push(CHORE_CHAMPIONS);
    }
    if categories.punctuality > PUNCTUALITY_PROS_THRESHOLD {
        unlocked.push(PUNCTUALITY_PROS);
    }
    if categories.participation > FULL_HOUSE_THRESHOLD {
        unlocked.push(FULL_HOUSE);
    }
    if total > TRIPLE_CROWN_THRESHOLD {
        unlocked.push(TRIPLE_CROWN);
    }
    unlocked
}

/// Immutable activity record for a manual point grant. The engine only
/// constructs it; persisting is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointAward {
    pub house: String,
    pub category: ScoreCategory,
    pub points: u32,
    pub reason: String,
    pub awarded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badges_follow_documented_thresholds() {
        assert_eq!(Badge::from_points(451), Some(Badge::Gold));
        assert_eq!(Badge::from_points(450), Some(Badge::Silver));
        assert_eq!(Badge::from_points(351), Some(Badge::Silver));
        assert_eq!(Badge::from_points(350), Some(Badge::Bronze));
        assert_eq!(Badge::from_points(251), Some(Badge::Bronze));
        assert_eq!(Badge::from_points(250), None);
        assert_eq!(Badge::from_points(0), None);
    }

    #[test]
    fn chore_champions_unlocks_above_threshold() {
        let strong = CategoryPoints {
            chore_completion: CHORE_CHAMPIONS_THRESHOLD + 1,
            ..CategoryPoints::default()
        };
        assert!(achievements(&strong, strong.total()).contains(&CHORE_CHAMPIONS));

        let at_threshold = CategoryPoints {
            chore_completion: CHORE_CHAMPIONS_THRESHOLD,
            ..CategoryPoints::default()
        };
        assert!(!achievements(&at_threshold, at_threshold.total()).contains(&CHORE_CHAMPIONS));
    }

    #[test]
    fn total_sums_all_five_categories() {
        let points = CategoryPoints {
            chore_completion: 100,
            punctuality: 40,
            teamwork: 30,
            cleanliness: 20,
            participation: 10,
        };
        assert_eq!(points.total(), 200);
    }
}
