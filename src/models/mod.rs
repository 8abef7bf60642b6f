use serde::{Deserialize, Deserializer, Serialize};

/// One catalog product.
///
/// Created from the first transaction line that mentions its id and immutable
/// afterward; later lines for the same id never overwrite these fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub is_zero_waste: bool,
    pub description: String,
    pub category: String,
    pub subcategory: Option<String>,
}

impl Product {
    pub fn from_line(line: &TransactionLine) -> Self {
        Self {
            id: line.product_id.clone(),
            is_zero_waste: line.zero_waste,
            description: line.description.clone(),
            category: line.category.clone(),
            subcategory: line.subcategory.clone(),
        }
    }
}

/// One raw purchase line as stored in the transaction log.
///
/// Field names mirror the log format. Transaction ids may be JSON strings or
/// numbers, and the zero-waste flag may be a bool or 0/1; both are coerced
/// during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionLine {
    #[serde(deserialize_with = "string_or_number")]
    pub transaction: String,
    pub product_id: String,
    #[serde(rename = "zerowaste", deserialize_with = "lenient_bool")]
    pub zero_waste: bool,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
}

/// A curated set of products sold together as one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub product_ids: Vec<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(i64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrNumber {
        Bool(bool),
        Number(i64),
    }

    Ok(match BoolOrNumber::deserialize(deserializer)? {
        BoolOrNumber::Bool(b) => b,
        BoolOrNumber::Number(n) => n != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transaction_line_deserializes_full_record() {
        let line: TransactionLine = serde_json::from_value(json!({
            "transaction": "T100",
            "product_id": "UX6E2",
            "zerowaste": true,
            "description": "Bar soap",
            "category": "Personal Care",
            "subcategory": "Shower"
        }))
        .unwrap();

        assert_eq!(line.transaction, "T100");
        assert_eq!(line.product_id, "UX6E2");
        assert!(line.zero_waste);
        assert_eq!(line.subcategory.as_deref(), Some("Shower"));
    }

    #[test]
    fn test_transaction_line_coerces_numeric_fields() {
        let line: TransactionLine = serde_json::from_value(json!({
            "transaction": 42,
            "product_id": "rEa04",
            "zerowaste": 1,
            "description": "Dish brush",
            "category": "Cleaning"
        }))
        .unwrap();

        assert_eq!(line.transaction, "42");
        assert!(line.zero_waste);
        assert_eq!(line.subcategory, None);
    }

    #[test]
    fn test_transaction_line_zero_means_not_zero_waste() {
        let line: TransactionLine = serde_json::from_value(json!({
            "transaction": "T1",
            "product_id": "p1",
            "zerowaste": 0,
            "description": "Plastic sponge",
            "category": "Cleaning"
        }))
        .unwrap();

        assert!(!line.zero_waste);
    }

    #[test]
    fn test_product_from_line_copies_metadata() {
        let line: TransactionLine = serde_json::from_value(json!({
            "transaction": "T1",
            "product_id": "87E4N",
            "zerowaste": true,
            "description": "Shampoo bar",
            "category": "Personal Care",
            "subcategory": "Hair"
        }))
        .unwrap();

        let product = Product::from_line(&line);
        assert_eq!(product.id, "87E4N");
        assert!(product.is_zero_waste);
        assert_eq!(product.description, "Shampoo bar");
        assert_eq!(product.category, "Personal Care");
        assert_eq!(product.subcategory.as_deref(), Some("Hair"));
    }
}
