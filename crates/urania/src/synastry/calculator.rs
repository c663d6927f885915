use crate::aspects::{Aspect, AspectCalculator, ChartLayer, PhaseMode};
use crate::chart::Chart;
use crate::settings::SynastrySettings;
use crate::synastry::types::{Category, CategoryResult, CompatibilityResult, Rating, WeightedAspect};
use crate::synastry::weights::{
    element_score, pair_affinity, rationale, summary, ELEMENT_WEIGHT, MAX_SCORE, TENTH_RULER_BONUS,
};
use crate::ephemeris::Body;
use log::debug;

/// Compares two charts through their cross aspects.
///
/// Scores are symmetric: swapping the charts yields identical ratings and
/// scores because every per-aspect contribution is direction-free and the
/// contributions are summed in sorted order.
pub struct SynastryCalculator<'a> {
    settings: &'a SynastrySettings,
    aspects: AspectCalculator,
}

impl<'a> SynastryCalculator<'a> {
    pub fn new(settings: &'a SynastrySettings) -> Self {
        Self {
            settings,
            aspects: AspectCalculator::new(),
        }
    }

    pub fn compute(&self, a: &Chart, b: &Chart) -> CompatibilityResult {
        let cross = self.aspects.cross_aspects(
            &a.aspect_points(ChartLayer::First),
            &b.aspect_points(ChartLayer::Second),
            &self.settings.aspects,
            PhaseMode::Static,
        );
        let rulers = Rulers {
            first: a.tenth_house_ruler(),
            second: b.tenth_house_ruler(),
        };

        let [love, friendship, teamwork] =
            Category::ALL.map(|category| self.score_category(category, a, b, &cross, &rulers));

        let key_aspects = self.key_aspects(&cross, &rulers);
        let summary = summary([love.rating, friendship.rating, teamwork.rating]);

        debug!(
            "synastry: {} cross aspects, ratings {}/{}/{}",
            cross.len(),
            love.rating.value(),
            friendship.rating.value(),
            teamwork.rating.value()
        );

        CompatibilityResult {
            love,
            friendship,
            teamwork,
            summary,
            key_aspects,
        }
    }

    fn score_category(
        &self,
        category: Category,
        a: &Chart,
        b: &Chart,
        cross: &[Aspect],
        rulers: &Rulers,
    ) -> CategoryResult {
        let mut contributions: Vec<f64> = cross
            .iter()
            .map(|aspect| aspect.kind.harmony() * affinity(category, aspect, rulers))
            .filter(|c| *c != 0.0)
            .collect();

        let key = category.key_body();
        let elements = element_score(a.body(key).sign.element(), b.body(key).sign.element());
        contributions.push(ELEMENT_WEIGHT * elements);

        contributions.sort_by(f64::total_cmp);
        let score = contributions.iter().sum::<f64>().min(MAX_SCORE);
        let rating = Rating::from_score(score);

        CategoryResult {
            category,
            rating,
            score,
            rationale: rationale(category, rating).to_string(),
        }
    }

    fn key_aspects(&self, cross: &[Aspect], rulers: &Rulers) -> Vec<WeightedAspect> {
        let mut weighted: Vec<WeightedAspect> = cross
            .iter()
            .map(|aspect| {
                let affinities: f64 = Category::ALL
                    .iter()
                    .map(|&category| affinity(category, aspect, rulers))
                    .sum();
                let closeness = 1.0 - aspect.abs_orb() / aspect.tolerance;
                WeightedAspect {
                    aspect: aspect.clone(),
                    weight: aspect.kind.harmony() * (1.0 + affinities) * closeness,
                }
            })
            .collect();

        weighted.sort_by(|x, y| {
            y.weight
                .total_cmp(&x.weight)
                .then_with(|| x.aspect.abs_orb().total_cmp(&y.aspect.abs_orb()))
                .then_with(|| pair_key(&x.aspect).cmp(&pair_key(&y.aspect)))
        });
        weighted.truncate(self.settings.key_aspect_count);
        weighted
    }
}

struct Rulers {
    first: Body,
    second: Body,
}

/// Category affinity of one cross aspect, including the teamwork bonus for
/// endpoints that rule their chart's 10th house.
fn affinity(category: Category, aspect: &Aspect, rulers: &Rulers) -> f64 {
    let mut value = pair_affinity(category, aspect.from.body, aspect.to.body);
    if category == Category::Teamwork {
        if aspect.from.body == rulers.first {
            value += TENTH_RULER_BONUS;
        }
        if aspect.to.body == rulers.second {
            value += TENTH_RULER_BONUS;
        }
    }
    value
}

fn pair_key(aspect: &Aspect) -> (Body, Body) {
    (aspect.from.body, aspect.to.body)
}

