use std::collections::{HashMap, HashSet};

use crate::models::{Product, TransactionLine};

/// Groups raw purchase lines into per-transaction sets of distinct product
/// ids and owns the catalog of products discovered while indexing.
///
/// Built once from the transaction log and read-only afterward.
pub struct TransactionIndex {
    transactions: HashMap<String, HashSet<String>>,
    products: HashMap<String, Product>,
}

impl TransactionIndex {
    pub fn build(lines: &[TransactionLine]) -> Self {
        let mut transactions: HashMap<String, HashSet<String>> = HashMap::new();
        let mut products: HashMap<String, Product> = HashMap::new();

        for line in lines {
            // Set semantics: repeated lines for the same product within one
            // transaction collapse to a single membership.
            transactions
                .entry(line.transaction.clone())
                .or_default()
                .insert(line.product_id.clone());

            // First line for a product id wins; later lines never overwrite
            // its metadata, even if their fields differ.
            products
                .entry(line.product_id.clone())
                .or_insert_with(|| Product::from_line(line));
        }

        tracing::debug!(
            transactions = transactions.len(),
            products = products.len(),
            "transaction index built"
        );

        Self {
            transactions,
            products,
        }
    }

    /// Looks up a product's catalog entry by id.
    pub fn lookup(&self, product_id: &str) -> Option<&Product> {
        self.products.get(product_id)
    }

    /// Read-only view of the full catalog.
    pub fn all_products(&self) -> &HashMap<String, Product> {
        &self.products
    }

    /// Read-only view of the per-transaction product sets.
    pub fn transactions(&self) -> &HashMap<String, HashSet<String>> {
        &self.transactions
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}
