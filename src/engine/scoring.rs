use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::engine::{CoOccurrenceMatrix, TransactionIndex};
use crate::models::{Product, TransactionLine};

/// How candidate products are scored against the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// Lift-normalized association strength: observed joint support over the
    /// support expected if the two products were independent.
    #[default]
    Lift,
    /// Plain sum of co-occurrence counts with the cart items. This is the
    /// looser legacy scoring; it applies the same exclusion filters but
    /// ignores the minimum co-occurrence threshold.
    CoOccurrenceCount,
}

/// A recommended product together with its accumulated score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,
    pub score: f64,
}

/// Ranks zero-waste products by statistical association with a cart.
///
/// All derived structures are built once, in the constructor, from the raw
/// transaction lines; every recommendation call afterward is a pure read, so
/// a shared engine can serve concurrent callers without locking.
pub struct RecommendationEngine {
    index: TransactionIndex,
    matrix: CoOccurrenceMatrix,
}

impl RecommendationEngine {
    pub fn new(lines: &[TransactionLine]) -> Self {
        let index = TransactionIndex::build(lines);
        let matrix = CoOccurrenceMatrix::build(&index);
        Self { index, matrix }
    }

    /// Looks up a product's catalog entry by id.
    pub fn lookup(&self, product_id: &str) -> Option<&Product> {
        self.index.lookup(product_id)
    }

    /// Read-only view of the full catalog.
    pub fn all_products(&self) -> &HashMap<String, Product> {
        self.index.all_products()
    }

    /// Read-only view of the per-transaction product sets.
    pub fn transactions(&self) -> &HashMap<String, HashSet<String>> {
        self.index.transactions()
    }

    /// Co-occurrence counts for one product; empty for unknown ids.
    pub fn co_occurrence(&self, product_id: &str) -> &HashMap<String, u32> {
        self.matrix.co_occurrence(product_id)
    }

    /// Number of distinct transactions containing the product.
    pub fn frequency(&self, product_id: &str) -> u32 {
        self.matrix.frequency(product_id)
    }

    pub fn total_transactions(&self) -> usize {
        self.matrix.total_transactions()
    }

    /// Top-`limit` zero-waste products associated with the cart.
    pub fn recommend(
        &self,
        cart: &[String],
        limit: usize,
        min_co_occurrence: u32,
        strategy: ScoringStrategy,
    ) -> Vec<Product> {
        self.recommend_scored(cart, limit, min_co_occurrence, strategy)
            .into_iter()
            .map(|scored| scored.product)
            .collect()
    }

    /// Like [`recommend`](Self::recommend) but keeps the accumulated score
    /// attached to each product, for callers that want the full rundown.
    ///
    /// Guarantees: only zero-waste products, never a cart member, no
    /// duplicates, at most `limit` entries. Unknown cart ids contribute
    /// nothing and are otherwise ignored. An empty result is a valid outcome,
    /// not an error.
    pub fn recommend_scored(
        &self,
        cart: &[String],
        limit: usize,
        min_co_occurrence: u32,
        strategy: ScoringStrategy,
    ) -> Vec<ScoredProduct> {
        let total_transactions = self.matrix.total_transactions();

        // Lift is undefined over an empty history (zero denominator).
        if total_transactions == 0 {
            return Vec::new();
        }

        let mut scores: HashMap<&str, f64> = HashMap::new();

        for cart_item in cart {
            let related_counts = self.matrix.co_occurrence(cart_item);
            if related_counts.is_empty() {
                tracing::debug!(product_id = %cart_item, "no co-occurrence data for cart item");
                continue;
            }

            for (related, &count) in related_counts {
                if strategy == ScoringStrategy::Lift && count < min_co_occurrence {
                    continue;
                }
                if cart.iter().any(|id| id == related) {
                    continue;
                }
                let Some(product) = self.index.lookup(related) else {
                    continue;
                };
                if !product.is_zero_waste {
                    continue;
                }

                let contribution = match strategy {
                    ScoringStrategy::CoOccurrenceCount => f64::from(count),
                    ScoringStrategy::Lift => lift(
                        count,
                        self.matrix.frequency(cart_item),
                        self.matrix.frequency(related),
                        total_transactions,
                    ),
                };

                // Scores from multiple cart items sum per candidate.
                *scores.entry(related.as_str()).or_insert(0.0) += contribution;

                tracing::debug!(
                    cart_item = %cart_item,
                    related = %related,
                    count,
                    contribution,
                    "candidate scored"
                );
            }
        }

        let mut ranked: Vec<(&str, f64)> = scores.into_iter().collect();
        // Score descending; equal scores fall back to id order so identical
        // input always ranks identically.
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        ranked.truncate(limit);

        ranked
            .into_iter()
            .filter_map(|(id, score)| {
                self.index.lookup(id).map(|product| ScoredProduct {
                    product: product.clone(),
                    score,
                })
            })
            .collect()
    }
}

/// Observed joint support over the support expected under independence.
/// Returns 0 when either frequency is 0 rather than dividing by zero.
fn lift(count: u32, freq_a: u32, freq_b: u32, total_transactions: usize) -> f64 {
    if freq_a == 0 || freq_b == 0 {
        return 0.0;
    }

    let total = total_transactions as f64;
    let support_ab = f64::from(count) / total;
    let support_a = f64::from(freq_a) / total;
    let support_b = f64::from(freq_b) / total;

    if support_a > 0.0 && support_b > 0.0 {
        support_ab / (support_a * support_b)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(transaction: &str, product_id: &str, zero_waste: bool) -> TransactionLine {
        serde_json::from_value(serde_json::json!({
            "transaction": transaction,
            "product_id": product_id,
            "zerowaste": zero_waste,
            "description": format!("Product {product_id}"),
            "category": "Test"
        }))
        .unwrap()
    }

    // Transactions: T1 = {A, B}, T2 = {A, B}, T3 = {A, C}; all zero-waste.
    fn abc_engine() -> RecommendationEngine {
        RecommendationEngine::new(&[
            line("T1", "A", true),
            line("T1", "B", true),
            line("T2", "A", true),
            line("T2", "B", true),
            line("T3", "A", true),
            line("T3", "C", true),
        ])
    }

    fn cart(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn recommended_ids(results: &[ScoredProduct]) -> Vec<&str> {
        results.iter().map(|r| r.product.id.as_str()).collect()
    }

    #[test]
    fn test_empty_history_yields_empty_result() {
        let engine = RecommendationEngine::new(&[]);
        let results = engine.recommend(&cart(&["A"]), 3, 1, ScoringStrategy::Lift);
        assert!(results.is_empty());
    }

    #[test]
    fn test_min_co_occurrence_threshold_filters_candidates() {
        let engine = abc_engine();
        // count(A,B) = 2 passes the threshold; count(A,C) = 1 does not.
        let results = engine.recommend_scored(&cart(&["A"]), 3, 2, ScoringStrategy::Lift);
        assert_eq!(recommended_ids(&results), vec!["B"]);
    }

    #[test]
    fn test_limit_one_keeps_the_higher_lift_candidate() {
        // T4 = {C} makes C common enough that co-occurring with A stops
        // looking special: lift(A,B) = 4/3 but lift(A,C) = 2/3.
        let mut lines = vec![
            line("T1", "A", true),
            line("T1", "B", true),
            line("T2", "A", true),
            line("T2", "B", true),
            line("T3", "A", true),
            line("T3", "C", true),
        ];
        lines.push(line("T4", "C", true));
        let engine = RecommendationEngine::new(&lines);

        let results = engine.recommend_scored(&cart(&["A"]), 1, 1, ScoringStrategy::Lift);
        assert_eq!(recommended_ids(&results), vec!["B"]);
        assert!(results[0].score > 1.0);
    }

    #[test]
    fn test_never_recommends_cart_members() {
        let engine = abc_engine();
        let results = engine.recommend(&cart(&["A", "B"]), 10, 1, ScoringStrategy::Lift);
        assert!(results.iter().all(|p| p.id != "A" && p.id != "B"));
    }

    #[test]
    fn test_only_zero_waste_products_are_recommended() {
        let engine = RecommendationEngine::new(&[
            line("T1", "A", true),
            line("T1", "B", false),
            line("T1", "C", true),
            line("T2", "A", true),
            line("T2", "B", false),
        ]);

        let results = engine.recommend_scored(&cart(&["A"]), 10, 1, ScoringStrategy::Lift);
        assert_eq!(recommended_ids(&results), vec!["C"]);
    }

    #[test]
    fn test_result_length_is_capped_by_limit() {
        let engine = abc_engine();
        let results = engine.recommend(&cart(&["A"]), 1, 1, ScoringStrategy::Lift);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_unknown_cart_ids_are_silently_skipped() {
        let engine = abc_engine();
        let with_unknown =
            engine.recommend_scored(&cart(&["missing", "A"]), 3, 2, ScoringStrategy::Lift);
        let without = engine.recommend_scored(&cart(&["A"]), 3, 2, ScoringStrategy::Lift);
        assert_eq!(with_unknown, without);
    }

    #[test]
    fn test_scores_sum_across_cart_items() {
        let engine = abc_engine();
        // A co-occurs with both B and C, so it collects lift from each:
        // lift(B,A) = 1 and lift(C,A) = 1.
        let results = engine.recommend_scored(&cart(&["B", "C"]), 3, 1, ScoringStrategy::Lift);
        assert_eq!(recommended_ids(&results), vec!["A"]);
        assert!((results[0].score - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_raw_count_strategy_sums_counts_and_ignores_threshold() {
        let engine = abc_engine();
        let results =
            engine.recommend_scored(&cart(&["A"]), 3, 5, ScoringStrategy::CoOccurrenceCount);

        assert_eq!(recommended_ids(&results), vec!["B", "C"]);
        assert_eq!(results[0].score, 2.0);
        assert_eq!(results[1].score, 1.0);
    }

    #[test]
    fn test_looser_threshold_yields_a_superset() {
        let engine = abc_engine();
        let strict = engine.recommend(&cart(&["A"]), 3, 2, ScoringStrategy::Lift);
        let loose = engine.recommend(&cart(&["A"]), 3, 1, ScoringStrategy::Lift);

        assert!(loose.len() >= strict.len());
        for product in &strict {
            assert!(loose.iter().any(|p| p.id == product.id));
        }
    }

    #[test]
    fn test_equal_scores_rank_by_id() {
        // B and C both co-occur with A exactly once and appear in one
        // transaction each, so their lifts are identical.
        let engine = RecommendationEngine::new(&[
            line("T1", "A", true),
            line("T1", "B", true),
            line("T2", "A", true),
            line("T2", "C", true),
        ]);

        let results = engine.recommend_scored(&cart(&["A"]), 3, 1, ScoringStrategy::Lift);
        assert_eq!(recommended_ids(&results), vec!["B", "C"]);
        assert_eq!(results[0].score, results[1].score);
    }

    #[test]
    fn test_no_duplicate_recommendations() {
        let engine = abc_engine();
        let results = engine.recommend(&cart(&["B", "C"]), 10, 1, ScoringStrategy::Lift);
        let mut ids: Vec<&str> = results.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), results.len());
    }
}
