use crate::aspects::Aspect;
use crate::ephemeris::Body;
use crate::synastry::weights::summary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relationship dimensions scored by synastry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Love,
    Friendship,
    Teamwork,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Love, Category::Friendship, Category::Teamwork];

    /// Body whose element placement feeds the element term.
    pub fn key_body(self) -> Body {
        match self {
            Category::Love => Body::Venus,
            Category::Friendship => Body::Sun,
            Category::Teamwork => Body::Mars,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Love => "love",
            Category::Friendship => "friendship",
            Category::Teamwork => "teamwork",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A star count, always in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Stars(u8);

impl Stars {
    pub fn new(count: u8) -> Option<Self> {
        (1..=5).contains(&count).then_some(Self(count))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Stars {
    type Error = String;

    fn try_from(count: u8) -> Result<Self, Self::Error> {
        Self::new(count).ok_or_else(|| format!("star rating {count} outside 1..=5"))
    }
}

impl From<Stars> for u8 {
    fn from(stars: Stars) -> u8 {
        stars.0
    }
}

/// One to five stars, or no rating at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Stars(Stars),
    Unavailable,
}

impl Rating {
    /// Star breakpoints for a capped category score.
    pub fn from_score(score: f64) -> Self {
        let stars = if score >= 4.5 {
            5
        } else if score >= 3.5 {
            4
        } else if score >= 2.5 {
            3
        } else if score >= 1.5 {
            2
        } else {
            1
        };
        Rating::Stars(Stars(stars))
    }

    /// Star count, 0 when unavailable.
    pub fn value(self) -> u8 {
        match self {
            Rating::Stars(stars) => stars.get(),
            Rating::Unavailable => 0,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Rating::Stars(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: Category,
    pub rating: Rating,
    /// Capped raw score, 0 when unavailable
    pub score: f64,
    pub rationale: String,
}

/// Cross aspect ranked by its significance to the relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedAspect {
    pub aspect: Aspect,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub love: CategoryResult,
    pub friendship: CategoryResult,
    pub teamwork: CategoryResult,
    pub summary: String,
    pub key_aspects: Vec<WeightedAspect>,
}

impl CompatibilityResult {
    /// All three categories unrated, with `reason` in each rationale.
    pub fn unavailable(reason: &str) -> Self {
        let category = |category: Category| CategoryResult {
            category,
            rating: Rating::Unavailable,
            score: 0.0,
            rationale: format!("Not rated: {reason}"),
        };
        Self {
            love: category(Category::Love),
            friendship: category(Category::Friendship),
            teamwork: category(Category::Teamwork),
            summary: summary([Rating::Unavailable; 3]),
            key_aspects: Vec::new(),
        }
    }

    pub fn category(&self, category: Category) -> &CategoryResult {
        match category {
            Category::Love => &self.love,
            Category::Friendship => &self.friendship,
            Category::Teamwork => &self.teamwork,
        }
    }

    pub fn ratings(&self) -> [Rating; 3] {
        [self.love.rating, self.friendship.rating, self.teamwork.rating]
    }

    pub fn is_available(&self) -> bool {
        self.ratings().iter().all(|r| r.is_available())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints() {
        assert_eq!(Rating::from_score(5.0).value(), 5);
        assert_eq!(Rating::from_score(4.5).value(), 5);
        assert_eq!(Rating::from_score(4.49).value(), 4);
        assert_eq!(Rating::from_score(2.5).value(), 3);
        assert_eq!(Rating::from_score(1.5).value(), 2);
        assert_eq!(Rating::from_score(0.0).value(), 1);
    }

    #[test]
    fn stars_stay_in_range() {
        assert!(Stars::new(0).is_none());
        assert!(Stars::new(6).is_none());
        assert_eq!(Stars::new(3).map(Stars::get), Some(3));

        let rating: Rating = serde_json::from_str(r#"{"stars":4}"#).unwrap();
        assert_eq!(rating, Rating::from_score(4.0));
        assert!(serde_json::from_str::<Rating>(r#"{"stars":0}"#).is_err());
        assert!(serde_json::from_str::<Rating>(r#"{"stars":9}"#).is_err());
        assert_eq!(serde_json::to_string(&rating).unwrap(), r#"{"stars":4}"#);
    }

    #[test]
    fn unavailable_result_explains_itself() {
        let result = CompatibilityResult::unavailable("provider offline");
        assert!(result.ratings().iter().all(|r| r.value() == 0));
        assert!(result.love.rationale.contains("provider offline"));
        assert!(!result.summary.is_empty());
        assert!(!result.is_available());
    }

    #[test]
    fn unavailable_reads_as_zero() {
        assert_eq!(Rating::Unavailable.value(), 0);
        assert_eq!(Rating::from_score(3.0).value(), 3);
        assert!(!Rating::Unavailable.is_available());
    }
}
