use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;
use crate::engine::RecommendationEngine;
use crate::models::Bundle;

/// Shared application state
///
/// The engine itself is immutable; concurrent recommendation reads need no
/// locking. The outer lock only exists so an admin reload can rebuild off to
/// the side and swap the `Arc` in without interleaving with readers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    engine: Arc<RwLock<Arc<RecommendationEngine>>>,
    carts: Arc<RwLock<HashMap<Uuid, Vec<String>>>>,
    pub bundles: Arc<Vec<Bundle>>,
}

impl AppState {
    /// Creates application state around a prebuilt engine
    pub fn new(config: Config, engine: RecommendationEngine, bundles: Vec<Bundle>) -> Self {
        Self {
            config: Arc::new(config),
            engine: Arc::new(RwLock::new(Arc::new(engine))),
            carts: Arc::new(RwLock::new(HashMap::new())),
            bundles: Arc::new(bundles),
        }
    }

    /// Current engine snapshot; the lock is held only long enough to clone
    /// the `Arc` out
    pub async fn engine(&self) -> Arc<RecommendationEngine> {
        self.engine.read().await.clone()
    }

    /// Replaces the engine with a freshly built one
    pub async fn swap_engine(&self, engine: RecommendationEngine) {
        *self.engine.write().await = Arc::new(engine);
    }

    /// The session's cart, empty if the session has no cart yet
    pub async fn cart(&self, session: Uuid) -> Vec<String> {
        self.carts
            .read()
            .await
            .get(&session)
            .cloned()
            .unwrap_or_default()
    }

    /// Runs a mutation against the session's cart
    pub async fn with_cart<F, T>(&self, session: Uuid, mutate: F) -> T
    where
        F: FnOnce(&mut Vec<String>) -> T,
    {
        let mut carts = self.carts.write().await;
        mutate(carts.entry(session).or_default())
    }
}
