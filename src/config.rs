//! Router tunables

use crate::error::{Result, RouterError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Heuristic constants for the depth search.
///
/// Defaults are empirical; none of them is a correctness guarantee.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterConfig {
    /// Gas units charged per counterparty
    pub gas_units_per_counterparty: f64,
    /// Wei per native unit
    pub wei_per_native_unit: f64,
    /// Lookahead blend weights, each in [0, 1]
    pub depth_factors: Vec<f64>,
    /// Chunk size before scaling
    pub base_chunk_size: f64,
    /// Order sizes at or above this scale the chunk by order_size / threshold
    pub order_size_chunk_threshold: f64,
    /// Pool counts at or above this scale the chunk by pool_count / threshold
    pub pool_count_chunk_threshold: usize,
    /// Cap on prefixes tried per depth factor, starting at the minimal feasible one
    pub max_prefixes_per_depth: Option<usize>,
    /// Relative tolerance for treating the order as filled
    pub fill_epsilon: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            gas_units_per_counterparty: 100_000.0,
            wei_per_native_unit: 1e18,
            depth_factors: vec![0.0, 0.5, 1.0],
            base_chunk_size: 1.0,
            order_size_chunk_threshold: 100_000.0,
            pool_count_chunk_threshold: 50,
            max_prefixes_per_depth: None,
            fill_epsilon: 1e-9,
        }
    }
}

impl RouterConfig {
    /// Loads overrides from a JSON file; absent keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let cfg: Self = serde_json::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects values the router cannot work with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("gasUnitsPerCounterparty", self.gas_units_per_counterparty),
            ("weiPerNativeUnit", self.wei_per_native_unit),
            ("baseChunkSize", self.base_chunk_size),
            ("orderSizeChunkThreshold", self.order_size_chunk_threshold),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(RouterError::InvalidConfig(format!("{name} must be finite and > 0 (got {v})")));
            }
        }
        if self.pool_count_chunk_threshold == 0 {
            return Err(RouterError::InvalidConfig("poolCountChunkThreshold must be ≥ 1".into()));
        }
        if self.depth_factors.is_empty() {
            return Err(RouterError::InvalidConfig("depthFactors must not be empty".into()));
        }
        if let Some(f) = self.depth_factors.iter().find(|f| !(0.0..=1.0).contains(*f)) {
            return Err(RouterError::InvalidConfig(format!("depth factor {f} outside [0, 1]")));
        }
        if self.max_prefixes_per_depth == Some(0) {
            return Err(RouterError::InvalidConfig("maxPrefixesPerDepth must be ≥ 1".into()));
        }
        if !self.fill_epsilon.is_finite() || self.fill_epsilon < 0.0 {
            return Err(RouterError::InvalidConfig(format!("fillEpsilon must be ≥ 0 (got {})", self.fill_epsilon)));
        }
        Ok(())
    }

    /// Chunk size for an order: base, scaled up for large orders and large pool sets.
    pub fn chunk_size(&self, order_size: f64, pool_count: usize) -> f64 {
        let mut chunk = self.base_chunk_size;
        if order_size >= self.order_size_chunk_threshold {
            chunk = order_size / self.order_size_chunk_threshold;
        }
        if pool_count >= self.pool_count_chunk_threshold {
            chunk *= pool_count as f64 / self.pool_count_chunk_threshold as f64;
        }
        chunk
    }
}
