//! Fixed weighting tables for compatibility scoring.

use crate::ephemeris::Body;
use crate::synastry::types::{Category, Rating};
use crate::western::Element;
use std::collections::HashMap;

/// Extra teamwork affinity for an endpoint that rules its chart's 10th house.
pub const TENTH_RULER_BONUS: f64 = 0.05;

/// Weight of the element term in a category score.
pub const ELEMENT_WEIGHT: f64 = 0.1;

pub const MAX_SCORE: f64 = 5.0;

type PairTable = HashMap<(Body, Body), f64>;

fn table(entries: &[(Body, Body, f64)]) -> PairTable {
    entries
        .iter()
        .map(|&(a, b, weight)| (ordered(a, b), weight))
        .collect()
}

fn ordered(a: Body, b: Body) -> (Body, Body) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

lazy_static::lazy_static! {
    static ref LOVE: PairTable = table(&[
        (Body::Venus, Body::Mars, 0.4),
        (Body::Sun, Body::Moon, 0.3),
        (Body::Venus, Body::Venus, 0.2),
    ]);
    static ref FRIENDSHIP: PairTable = table(&[
        (Body::Sun, Body::Sun, 0.3),
        (Body::Mercury, Body::Mercury, 0.3),
        (Body::Jupiter, Body::Sun, 0.3),
    ]);
    static ref TEAMWORK: PairTable = table(&[
        (Body::Mars, Body::Mars, 0.3),
        (Body::Saturn, Body::Saturn, 0.3),
        (Body::Mercury, Body::Mars, 0.3),
    ]);
}

/// Affinity of a body pair for a category, independent of direction.
///
/// A mixed pair such as Venus/Mars can occur in two directions across two
/// charts, so each direction carries half the table weight.
pub fn pair_affinity(category: Category, a: Body, b: Body) -> f64 {
    let table: &PairTable = match category {
        Category::Love => &*LOVE,
        Category::Friendship => &*FRIENDSHIP,
        Category::Teamwork => &*TEAMWORK,
    };
    match table.get(&ordered(a, b)) {
        Some(&weight) if a == b => weight,
        Some(&weight) => weight / 2.0,
        None => 0.0,
    }
}

/// Compatibility of two elements on the star scale.
pub fn element_score(a: Element, b: Element) -> f64 {
    if a == b {
        5.0
    } else if a.is_complementary(b) {
        4.0
    } else {
        2.0
    }
}

pub fn rationale(category: Category, rating: Rating) -> &'static str {
    use Category::*;
    match (category, rating.value()) {
        (Love, 5) => "Romantic and physical currents run together; attraction and tenderness reinforce each other.",
        (Love, 4) => "Warm mutual attraction with only a few points of friction.",
        (Love, 3) => "Affection is present but asks for patience where desires differ.",
        (Love, 2) => "Attraction is uneven; closeness needs deliberate effort from both sides.",
        (Love, _) => "Few romantic links between the charts; affection has little support here.",
        (Friendship, 5) => "Easy understanding and shared outlook make for a natural friendship.",
        (Friendship, 4) => "Good rapport and common ground with room for lively disagreement.",
        (Friendship, 3) => "Friendly enough, though interests and rhythms only partly overlap.",
        (Friendship, 2) => "Communication takes work; the two outlooks often run at cross purposes.",
        (Friendship, _) => "Little shared ground between the charts for everyday companionship.",
        (Teamwork, 5) => "Drive and discipline line up; together the pair gets things done.",
        (Teamwork, 4) => "Complementary working styles with a solid shared sense of purpose.",
        (Teamwork, 3) => "Workable cooperation once roles and pace are agreed.",
        (Teamwork, 2) => "Different methods and tempos make joint work slow going.",
        (Teamwork, _) => "Ambitions pull in different directions; shared projects meet resistance.",
    }
}

/// Qualitative label for the three ratings.
pub fn summary(ratings: [Rating; 3]) -> String {
    if ratings.iter().any(|r| !r.is_available()) {
        return "Compatibility could not be assessed because planetary positions were unavailable.".to_string();
    }
    let mean = ratings.iter().map(|r| f64::from(r.value())).sum::<f64>() / 3.0;
    let label = if mean >= 4.5 {
        "Exceptional"
    } else if mean >= 3.5 {
        "Strong"
    } else if mean >= 2.5 {
        "Balanced"
    } else if mean >= 1.5 {
        "Challenging"
    } else {
        "Difficult"
    };
    format!(
        "{label} overall compatibility: love {}/5, friendship {}/5, teamwork {}/5.",
        ratings[0].value(),
        ratings[1].value(),
        ratings[2].value()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affinity_is_symmetric() {
        for category in Category::ALL {
            for a in Body::ALL {
                for b in Body::ALL {
                    assert_eq!(pair_affinity(category, a, b), pair_affinity(category, b, a));
                }
            }
        }
    }

    #[test]
    fn mixed_pairs_split_weight() {
        assert_eq!(pair_affinity(Category::Love, Body::Venus, Body::Mars), 0.2);
        assert_eq!(pair_affinity(Category::Love, Body::Venus, Body::Venus), 0.2);
        assert_eq!(pair_affinity(Category::Friendship, Body::Sun, Body::Jupiter), 0.15);
        assert_eq!(pair_affinity(Category::Teamwork, Body::Moon, Body::Pluto), 0.0);
    }

    #[test]
    fn element_matrix() {
        assert_eq!(element_score(Element::Fire, Element::Fire), 5.0);
        assert_eq!(element_score(Element::Earth, Element::Water), 4.0);
        assert_eq!(element_score(Element::Fire, Element::Water), 2.0);
    }

    #[test]
    fn summary_depends_only_on_ratings() {
        let r = [Rating::from_score(4.0), Rating::from_score(4.0), Rating::from_score(3.0)];
        assert_eq!(summary(r), summary(r));
        assert!(summary(r).starts_with("Strong"));
        assert!(summary([Rating::Unavailable; 3]).contains("unavailable"));
    }
}
