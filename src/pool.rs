//! Liquidity pools and per-run allocation state

use crate::curves::{Curve, PricingCurve};
use serde::{Deserialize, Serialize};

/// A liquidity provider's capital commitment priced by a curve
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    /// Pool identifier
    pub id: String,
    /// Liquidity provider address
    pub lp_address: String,
    /// Total capital committed (size)
    pub capital: f64,
    /// Capital already locked by earlier purchases
    pub locked_capital: f64,
    /// Unit-price curve
    pub curve: PricingCurve,
    /// Opaque matching criteria passed through to the transaction builder
    #[serde(default)]
    pub criteria: String,
}

impl Pool {
    /// capital − locked. Informational; see [`Pool::remaining_capacity`].
    pub fn unlocked(&self) -> f64 { self.capital - self.locked_capital }

    /// max_utilization · capital
    pub fn usable_capital(&self) -> f64 { self.curve.max_utilization * self.capital }

    /// What the pool can still absorb: max_utilization · capital − locked
    pub fn remaining_capacity(&self) -> f64 { (self.usable_capital() - self.locked_capital).max(0.0) }

    /// V(q) for this pool
    pub fn cumulative_cost(&self, q: f64) -> f64 { self.curve.cumulative_cost(q, self.capital) }

    /// Average unit cost of the next `delta` on top of fill level `from`
    pub fn marginal_cost(&self, from: f64, delta: f64) -> f64 {
        self.curve.marginal_cost(self.capital, from, delta)
    }

    /// Exact price of adding `amount` on top of the locked capital.
    pub fn cost_of_fill(&self, amount: f64) -> f64 {
        self.cumulative_cost(self.locked_capital + amount) - self.cumulative_cost(self.locked_capital)
    }
}

/// Sum of `remaining_capacity` over `pools`.
pub fn total_remaining_capacity(pools: &[Pool]) -> f64 {
    pools.iter().map(Pool::remaining_capacity).sum()
}

/// Sum of `unlocked` over `pools`.
pub fn total_unlocked(pools: &[Pool]) -> f64 {
    pools.iter().map(Pool::unlocked).sum()
}

/// One pool's mutable state during a single allocation run.
///
/// Borrows the caller's pool read-only; all mutation lands here.
#[derive(Clone, Debug)]
pub struct PoolAllocationState<'a> {
    /// Snapshot being filled
    pub pool: &'a Pool,
    /// Amount tentatively allocated this run
    pub ordered_fill: f64,
    /// Current ascending-sort key
    pub marginal_cost_estimate: f64,
}

impl<'a> PoolAllocationState<'a> {
    /// Fresh state with zero fill.
    pub fn new(pool: &'a Pool) -> Self {
        Self { pool, ordered_fill: 0.0, marginal_cost_estimate: 0.0 }
    }

    /// Fill level including locked capital
    pub fn level(&self) -> f64 { self.pool.locked_capital + self.ordered_fill }

    /// Capacity left after this run's fill.
    pub fn remaining(&self) -> f64 { (self.pool.usable_capital() - self.level()).max(0.0) }

    /// Re-estimates the cost of the next `chunk` from the current level and
    /// stores it as the sort key. The increment is truncated to what is left
    /// so the curve is never evaluated past max utilization.
    pub fn refresh_estimate(&mut self, chunk: f64) -> f64 {
        let delta = chunk.min(self.remaining());
        self.marginal_cost_estimate = if delta > 0.0 {
            self.pool.marginal_cost(self.level(), delta)
        } else {
            f64::INFINITY
        };
        self.marginal_cost_estimate
    }
}

/// Builds a fresh arena of allocation records over `pools`.
pub fn arena(pools: &[Pool]) -> Vec<PoolAllocationState<'_>> {
    pools.iter().map(PoolAllocationState::new).collect()
}
