use serde::Serialize;

use crate::engine::RecommendationEngine;

/// Aggregate shape of the transaction history.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionStats {
    pub total_transactions: usize,
    pub average_items_per_transaction: f64,
    pub average_zero_waste_items_per_transaction: f64,
}

/// Computes basket-size averages over the indexed history.
///
/// Items are counted after per-transaction deduplication, so a product
/// bought twice in one transaction counts once. An empty history yields
/// zeroed averages rather than an error.
pub fn transaction_stats(engine: &RecommendationEngine) -> TransactionStats {
    let total_transactions = engine.total_transactions();
    if total_transactions == 0 {
        return TransactionStats {
            total_transactions: 0,
            average_items_per_transaction: 0.0,
            average_zero_waste_items_per_transaction: 0.0,
        };
    }

    let mut total_items = 0usize;
    let mut total_zero_waste_items = 0usize;
    for items in engine.transactions().values() {
        total_items += items.len();
        total_zero_waste_items += items
            .iter()
            .filter(|id| engine.lookup(id).is_some_and(|p| p.is_zero_waste))
            .count();
    }

    TransactionStats {
        total_transactions,
        average_items_per_transaction: total_items as f64 / total_transactions as f64,
        average_zero_waste_items_per_transaction: total_zero_waste_items as f64
            / total_transactions as f64,
    }
}
