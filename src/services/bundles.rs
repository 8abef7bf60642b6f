use crate::models::Bundle;

/// The curated bundles offered on the storefront.
///
/// Product ids reference the transaction-log catalog; a bundle may list ids
/// the current log does not know about, which the cart view flags as unknown.
pub fn curated_bundles() -> Vec<Bundle> {
    vec![
        Bundle {
            id: "eco_starter_kit".to_string(),
            name: "Environmentally Friendly Shower Care Bundle".to_string(),
            description: "Zero-waste shower supplies!!".to_string(),
            image: Some("soap.jpg".to_string()),
            product_ids: vec![
                "UX6E2".to_string(),
                "XBjsO".to_string(),
                "87E4N".to_string(),
            ],
        },
        Bundle {
            id: "cleaning_essentials".to_string(),
            name: "Zero-Waste Cleaning Bundle".to_string(),
            description: "Clean without harming the environment!".to_string(),
            image: Some("cleaning.jpg".to_string()),
            product_ids: vec![
                "rEa04".to_string(),
                "yqm3d".to_string(),
                "952W6".to_string(),
            ],
        },
        Bundle {
            id: "personal_care".to_string(),
            name: "Beans and Legumes Bundle".to_string(),
            description: "Feel good with healthy sustainable food!".to_string(),
            image: Some("beans.jpg".to_string()),
            product_ids: vec![
                "Qr7iQ".to_string(),
                "vx11x".to_string(),
                "lOUDi".to_string(),
                "9thuF".to_string(),
                "7YodN".to_string(),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_ids_are_unique() {
        let bundles = curated_bundles();
        let mut ids: Vec<&str> = bundles.iter().map(|b| b.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), bundles.len());
    }

    #[test]
    fn test_every_bundle_has_products() {
        for bundle in curated_bundles() {
            assert!(!bundle.product_ids.is_empty(), "bundle {} is empty", bundle.id);
        }
    }
}
