use std::collections::HashMap;
use std::sync::OnceLock;

use crate::engine::TransactionIndex;

/// Pairwise co-occurrence counts plus per-product transaction frequencies.
///
/// `counts[A][B]` is the number of transactions containing both A and B; both
/// directions are stored, so `counts[A][B] == counts[B][A]`. An absent entry
/// means a count of 0.
///
/// Construction is O(Σ k²) over the distinct-item count k of each
/// transaction. That is fine for retail-sized baskets; it is not suitable for
/// baskets with thousands of distinct items.
pub struct CoOccurrenceMatrix {
    counts: HashMap<String, HashMap<String, u32>>,
    frequencies: HashMap<String, u32>,
    total_transactions: usize,
}

impl CoOccurrenceMatrix {
    pub fn build(index: &TransactionIndex) -> Self {
        let mut counts: HashMap<String, HashMap<String, u32>> = HashMap::new();
        let mut frequencies: HashMap<String, u32> = HashMap::new();

        for items in index.transactions().values() {
            // The index already deduplicated items, so each member counts
            // toward frequency exactly once per transaction.
            for id in items {
                *frequencies.entry(id.clone()).or_insert(0) += 1;
            }

            for a in items {
                for b in items {
                    if a != b {
                        *counts
                            .entry(a.clone())
                            .or_default()
                            .entry(b.clone())
                            .or_insert(0) += 1;
                    }
                }
            }
        }

        tracing::debug!(
            products = counts.len(),
            transactions = index.transaction_count(),
            "co-occurrence matrix built"
        );

        Self {
            counts,
            frequencies,
            total_transactions: index.transaction_count(),
        }
    }

    /// Co-occurrence counts for one product; empty for unknown ids.
    pub fn co_occurrence(&self, product_id: &str) -> &HashMap<String, u32> {
        static EMPTY: OnceLock<HashMap<String, u32>> = OnceLock::new();
        self.counts
            .get(product_id)
            .unwrap_or_else(|| EMPTY.get_or_init(HashMap::new))
    }

    /// Number of distinct transactions containing the product; 0 for unknown ids.
    pub fn frequency(&self, product_id: &str) -> u32 {
        self.frequencies.get(product_id).copied().unwrap_or(0)
    }

    pub fn total_transactions(&self) -> usize {
        self.total_transactions
    }
}
