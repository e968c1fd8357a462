//! Gas-aware depth search around the greedy allocator
//!
//! Every extra counterparty costs roughly fixed execution overhead, so the
//! cheapest curve allocation is not always the cheapest purchase. The router
//! re-ranks pools under several lookahead depths, tries every feasible prefix
//! of each ranking, and keeps the trial with the lowest premium + gas.

use crate::allocator::{AllocationRequest, AllocationResult, CounterpartyAllocation, MarginalCostAllocator};
use crate::config::RouterConfig;
use crate::gas::GasModel;
use crate::pool::{arena, total_unlocked, Pool};
use serde::{Deserialize, Serialize};

/// Order parameters plus gas pricing for one routing call.
///
/// The chunk size is derived by the router, not supplied.
#[derive(Clone, Copy, Debug)]
pub struct DepthRoutingRequest<'a> {
    /// Candidate pools, read-only
    pub pools: &'a [Pool],
    /// Quantity to buy, in underlying order units
    pub order_size: f64,
    /// Strike, carried for downstream unit conversion
    pub strike_price: f64,
    /// Gas price per unit, in wei
    pub gas_price_wei: f64,
    /// Native asset price in quote currency
    pub native_price: f64,
}

/// Winning trial. All-zero with no counterparties when the order is infeasible.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthRoutingResult {
    /// Curve premium, net of gas
    pub premium: f64,
    /// Premium plus estimated gas
    pub premium_plus_gas: f64,
    /// Filled pools in fill order
    pub counterparties: Vec<CounterpartyAllocation>,
}

impl DepthRoutingResult {
    /// Estimated gas component
    pub fn gas(&self) -> f64 { self.premium_plus_gas - self.premium }
    /// True for the infeasible sentinel.
    pub fn is_empty(&self) -> bool { self.counterparties.is_empty() }
}

/// Depth/gas-aware meta-optimizer over [`MarginalCostAllocator`].
#[derive(Clone, Debug, Default)]
pub struct DepthSearchRouter {
    /// Search tunables
    pub config: RouterConfig,
}

impl DepthSearchRouter {
    /// Router with the given tunables.
    pub fn new(config: RouterConfig) -> Self { Self { config } }

    /// Runs the full search and returns the cheapest trial by premium + gas.
    pub fn route(&self, req: &DepthRoutingRequest<'_>) -> DepthRoutingResult {
        let n = req.pools.len();
        if n == 0 || total_unlocked(req.pools) < req.order_size {
            tracing::debug!(order_size = req.order_size, pools = n, "order exceeds unlocked capital");
            return DepthRoutingResult::default();
        }

        let cfg = &self.config;
        let chunk = cfg.chunk_size(req.order_size, n);
        let gas = GasModel {
            gas_units_per_counterparty: cfg.gas_units_per_counterparty,
            gas_price_wei: req.gas_price_wei,
            wei_per_native_unit: cfg.wei_per_native_unit,
            native_price: req.native_price,
        }
        .table(n);
        let allocator = MarginalCostAllocator::new(cfg.fill_epsilon);
        tracing::debug!(chunk, pools = n, depths = cfg.depth_factors.len(), "starting depth search");

        let mut best: Option<(f64, AllocationResult)> = None;
        for &depth in &cfg.depth_factors {
            let ranked = rank_pools(req.pools, req.order_size, chunk, depth);
            let Some(start) = start_index(&ranked, req.order_size) else { continue };
            let end = cfg.max_prefixes_per_depth.map_or(n, |k| (start + k).min(n));
            tracing::debug!(depth, start, end, "ranked pools");

            for i in start..end {
                let trial = allocator.allocate(&AllocationRequest {
                    pools: &ranked[..=i],
                    order_size: req.order_size,
                    chunk_size: chunk,
                    strike_price: req.strike_price,
                });
                if trial.is_empty() { continue; }
                let score = trial.premium + gas.cost(trial.counterparties.len());
                tracing::trace!(depth, prefix = i + 1, score, counterparties = trial.counterparties.len());
                if best.as_ref().map_or(true, |(s, _)| score < *s) {
                    best = Some((score, trial));
                }
            }
        }

        match best {
            Some((premium_plus_gas, trial)) => {
                let premium = premium_plus_gas - gas.cost(trial.counterparties.len());
                tracing::debug!(premium, premium_plus_gas, counterparties = trial.counterparties.len(), "best trial");
                DepthRoutingResult { premium, premium_plus_gas, counterparties: trial.counterparties }
            }
            None => DepthRoutingResult::default(),
        }
    }
}

/// Lookahead used to rank a pool: chunk·(1 − depth) + min(remaining, order)·depth
pub fn lookup_depth(chunk: f64, remaining_capacity: f64, order_size: f64, depth: f64) -> f64 {
    chunk * (1.0 - depth) + remaining_capacity.min(order_size) * depth
}

/// Copies `pools` into ascending order of marginal cost over their lookahead.
/// The sort is stable, so equal keys keep input order. Exhausted pools sink.
pub fn rank_pools(pools: &[Pool], order_size: f64, chunk: f64, depth: f64) -> Vec<Pool> {
    let mut states = arena(pools);
    for s in states.iter_mut() {
        let look = lookup_depth(chunk, s.remaining(), order_size, depth);
        s.refresh_estimate(look);
    }
    states.sort_by(|a, b| a.marginal_cost_estimate.total_cmp(&b.marginal_cost_estimate));
    states.into_iter().map(|s| s.pool.clone()).collect()
}

/// Last index of the shortest prefix whose unlocked capital covers the order.
pub fn start_index(pools: &[Pool], order_size: f64) -> Option<usize> {
    let mut cum = 0.0;
    for (i, p) in pools.iter().enumerate() {
        cum += p.unlocked();
        if cum >= order_size { return Some(i); }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::PricingCurve;

    fn pool(id: &str, a: f64, capital: f64, locked: f64) -> Pool {
        Pool {
            id: id.into(),
            lp_address: format!("0x{id}"),
            capital,
            locked_capital: locked,
            curve: PricingCurve::linear(a),
            criteria: String::new(),
        }
    }

    #[test]
    fn depth_blends_chunk_and_capacity() {
        assert_eq!(lookup_depth(1.0, 500.0, 100.0, 0.0), 1.0);
        assert_eq!(lookup_depth(1.0, 500.0, 100.0, 1.0), 100.0);
        assert_eq!(lookup_depth(1.0, 50.0, 100.0, 0.5), 25.5);
    }

    #[test]
    fn far_lookahead_can_reorder_pools() {
        // steep but cheap for the first unit vs. flat at 0.5
        let steep = pool("steep", 1.0, 10.0, 0.0);
        let flat = Pool { curve: PricingCurve { a: 0.0, d: 0.5, ..PricingCurve::linear(0.0) }, ..pool("flat", 0.0, 10_000.0, 0.0) };
        let pools = vec![flat, steep];
        let ids = |depth| -> Vec<String> { rank_pools(&pools, 100.0, 1.0, depth).into_iter().map(|p| p.id).collect() };
        assert_eq!(ids(0.0), vec!["steep", "flat"]);
        assert_eq!(ids(1.0), vec!["flat", "steep"]);
    }

    #[test]
    fn start_index_is_first_covering_prefix() {
        let pools = vec![pool("a", 1.0, 30.0, 0.0), pool("b", 1.0, 30.0, 10.0), pool("c", 1.0, 30.0, 0.0)];
        assert_eq!(start_index(&pools, 30.0), Some(0));
        assert_eq!(start_index(&pools, 50.0), Some(1));
        assert_eq!(start_index(&pools, 80.0), Some(2));
        assert_eq!(start_index(&pools, 81.0), None);
    }

    #[test]
    fn expensive_gas_prefers_fewer_counterparties() {
        let pools = vec![pool("x", 1.0, 1000.0, 0.0), pool("y", 1.0, 1000.0, 0.0)];
        let base = DepthRoutingRequest { pools: &pools, order_size: 100.0, strike_price: 1.0, gas_price_wei: 0.0, native_price: 2000.0 };

        let free = DepthSearchRouter::default().route(&base);
        assert_eq!(free.counterparties.len(), 2);
        assert!((free.premium - 5.0).abs() < 1e-9);

        let pricey = DepthSearchRouter::default().route(&DepthRoutingRequest { gas_price_wei: 100e9, ..base });
        assert_eq!(pricey.counterparties.len(), 1);
        assert!((pricey.premium - 10.0).abs() < 1e-9);
        assert!((pricey.gas() - 20.0).abs() < 1e-9);
    }
}
