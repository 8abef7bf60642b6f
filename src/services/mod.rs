pub mod bundles;
pub mod loader;
pub mod stats;
