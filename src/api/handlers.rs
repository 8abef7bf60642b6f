use std::path::Path as FilePath;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::engine::{RecommendationEngine, ScoredProduct, ScoringStrategy};
use crate::error::{AppError, AppResult};
use crate::middleware::session::SessionId;
use crate::models::{Bundle, Product};
use crate::services::{loader, stats};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AddBundleRequest {
    pub bundle_id: String,
}

#[derive(Debug, Serialize)]
pub struct CartItem {
    pub product_id: String,
    /// `None` when the catalog no longer knows the id
    pub product: Option<Product>,
}

#[derive(Debug, Serialize)]
pub struct CartSummary {
    pub total_items: usize,
    pub zero_waste_items: usize,
    pub zero_waste_percentage: f64,
    pub discount_eligible: bool,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub summary: CartSummary,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    pub limit: Option<usize>,
    pub min_co_occurrence: Option<u32>,
    pub strategy: Option<ScoringStrategy>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub strategy: ScoringStrategy,
    /// Threshold the returned results were produced with; lower than the
    /// requested one when the fallback kicked in
    pub min_co_occurrence: u32,
    pub recommendations: Vec<ScoredProduct>,
}

#[derive(Debug, Serialize)]
pub struct BundleItem {
    pub product_id: String,
    pub product: Option<Product>,
}

#[derive(Debug, Serialize)]
pub struct BundleResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub items: Vec<BundleItem>,
}

impl BundleResponse {
    fn from_bundle(bundle: &Bundle, engine: &RecommendationEngine) -> Self {
        Self {
            id: bundle.id.clone(),
            name: bundle.name.clone(),
            description: bundle.description.clone(),
            image: bundle.image.clone(),
            items: bundle
                .product_ids
                .iter()
                .map(|id| BundleItem {
                    product_id: id.clone(),
                    product: engine.lookup(id).cloned(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub products: usize,
    pub transactions: usize,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Get the full product catalog
pub async fn get_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    let engine = state.engine().await;
    let mut products: Vec<Product> = engine.all_products().values().cloned().collect();
    products.sort_by(|a, b| a.id.cmp(&b.id));
    Json(products)
}

/// Get a random sample of products the session has not carted yet
pub async fn discover_products(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> Json<Vec<Product>> {
    let engine = state.engine().await;
    let cart = state.cart(session.0).await;

    let mut available: Vec<&Product> = engine
        .all_products()
        .values()
        .filter(|product| !cart.contains(&product.id))
        .collect();
    available.shuffle(&mut rand::thread_rng());
    available.truncate(state.config.discover_count);

    Json(available.into_iter().cloned().collect())
}

/// Get the session's cart with resolved products and a zero-waste summary
pub async fn get_cart(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> Json<CartResponse> {
    let engine = state.engine().await;
    let cart = state.cart(session.0).await;
    Json(build_cart_response(&cart, &engine))
}

/// Add a product to the session's cart
///
/// Unknown products are rejected; adding a product already in the cart is a
/// no-op.
pub async fn add_cart_item(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Json(request): Json<AddItemRequest>,
) -> AppResult<StatusCode> {
    let engine = state.engine().await;
    if engine.lookup(&request.product_id).is_none() {
        return Err(AppError::NotFound(format!(
            "Unknown product: {}",
            request.product_id
        )));
    }

    let inserted = state
        .with_cart(session.0, |cart| {
            if cart.contains(&request.product_id) {
                false
            } else {
                cart.push(request.product_id.clone());
                true
            }
        })
        .await;

    Ok(if inserted {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    })
}

/// Remove a product from the session's cart
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(product_id): Path<String>,
) -> StatusCode {
    state
        .with_cart(session.0, |cart| cart.retain(|id| id != &product_id))
        .await;
    StatusCode::OK
}

/// Empty the session's cart
pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> StatusCode {
    state.with_cart(session.0, |cart| cart.clear()).await;
    StatusCode::OK
}

/// Add every product of a curated bundle to the session's cart
pub async fn add_bundle(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Json(request): Json<AddBundleRequest>,
) -> AppResult<StatusCode> {
    let bundle = state
        .bundles
        .iter()
        .find(|b| b.id == request.bundle_id)
        .ok_or_else(|| AppError::NotFound(format!("Unknown bundle: {}", request.bundle_id)))?
        .clone();

    state
        .with_cart(session.0, |cart| {
            for product_id in &bundle.product_ids {
                if !cart.contains(product_id) {
                    cart.push(product_id.clone());
                }
            }
        })
        .await;

    Ok(StatusCode::OK)
}

/// Get the curated bundles with resolved product metadata
pub async fn get_bundles(State(state): State<AppState>) -> Json<Vec<BundleResponse>> {
    let engine = state.engine().await;
    let bundles = state
        .bundles
        .iter()
        .map(|bundle| BundleResponse::from_bundle(bundle, &engine))
        .collect();
    Json(bundles)
}

/// Get top-K zero-waste recommendations for the session's cart
///
/// Uses the lift strategy with the configured minimum co-occurrence and, when
/// that yields fewer than `limit` results, retries once with a threshold of 1.
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Query(params): Query<RecommendationParams>,
) -> AppResult<Json<RecommendationResponse>> {
    let limit = params.limit.unwrap_or(state.config.recommendation_limit);
    if limit == 0 {
        return Err(AppError::InvalidInput("limit must be positive".to_string()));
    }
    let requested_min = params
        .min_co_occurrence
        .unwrap_or(state.config.min_co_occurrence);
    let strategy = params.strategy.unwrap_or_default();

    let engine = state.engine().await;
    let cart = state.cart(session.0).await;

    let mut min_co_occurrence = requested_min;
    let mut recommendations = engine.recommend_scored(&cart, limit, min_co_occurrence, strategy);

    if strategy == ScoringStrategy::Lift
        && recommendations.len() < limit
        && min_co_occurrence > 1
    {
        min_co_occurrence = 1;
        recommendations = engine.recommend_scored(&cart, limit, min_co_occurrence, strategy);
        tracing::debug!(
            requested_min,
            found = recommendations.len(),
            "retried with loosened co-occurrence threshold"
        );
    }

    Ok(Json(RecommendationResponse {
        strategy,
        min_co_occurrence,
        recommendations,
    }))
}

/// Get aggregate statistics over the transaction history
pub async fn get_stats(State(state): State<AppState>) -> Json<stats::TransactionStats> {
    let engine = state.engine().await;
    Json(stats::transaction_stats(&engine))
}

/// Re-read the transaction log, rebuild the engine and swap it in
pub async fn reload_engine(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let lines = loader::load_transaction_lines(FilePath::new(&state.config.transactions_path))?;
    let engine = RecommendationEngine::new(&lines);
    let response = ReloadResponse {
        products: engine.all_products().len(),
        transactions: engine.total_transactions(),
    };

    state.swap_engine(engine).await;
    tracing::info!(
        products = response.products,
        transactions = response.transactions,
        "recommendation engine reloaded"
    );

    Ok(Json(response))
}

fn build_cart_response(cart: &[String], engine: &RecommendationEngine) -> CartResponse {
    let items: Vec<CartItem> = cart
        .iter()
        .map(|id| CartItem {
            product_id: id.clone(),
            product: engine.lookup(id).cloned(),
        })
        .collect();

    let total_items = items.len();
    let zero_waste_items = items
        .iter()
        .filter(|item| item.product.as_ref().is_some_and(|p| p.is_zero_waste))
        .count();
    let zero_waste_percentage = if total_items > 0 {
        zero_waste_items as f64 / total_items as f64 * 100.0
    } else {
        0.0
    };

    CartResponse {
        items,
        summary: CartSummary {
            total_items,
            zero_waste_items,
            zero_waste_percentage,
            // Storefront discount rule: mostly zero-waste and a real basket.
            discount_eligible: zero_waste_percentage >= 75.0 && total_items > 4,
        },
    }
}
