//! Post-hoc checks of an allocation against the pools it was drawn from

use crate::allocator::CounterpartyAllocation;
use crate::error::{Result, RouterError};
use crate::pool::Pool;
use serde::Serialize;

/// Verification report for one allocation
#[derive(Debug, Serialize)]
pub struct Report {
    /// Number of counterparties checked
    pub counterparties: usize,
    /// Compensated sum of allocated amounts
    pub filled: f64,
    /// Order size the allocation was meant to fill
    pub order_size: f64,
    /// |filled − order_size| within tolerance
    pub exact_fill: bool,
    /// Every pool stays within max_utilization · capital
    pub capacity_ok: bool,
    /// Premium recomputed from the curves
    pub premium_recomputed: f64,
    /// Relative error against the reported premium
    pub rel_err_premium: f64,
}

/// Recomputes fill and premium for `counterparties` and checks capacity.
///
/// Fails only if a counterparty names a pool not present in `pools`.
pub fn verify_allocation(
    pools: &[Pool],
    order_size: f64,
    premium: f64,
    counterparties: &[CounterpartyAllocation],
    tol: f64,
) -> Result<Report> {
    let mut sum = 0.0_f64;
    let mut comp = 0.0_f64;
    let mut premium_recomputed = 0.0;
    let mut capacity_ok = true;

    for c in counterparties {
        let pool = pools.iter().find(|p| p.id == c.pool_id).ok_or_else(|| RouterError::InvalidPool {
            id: c.pool_id.clone(),
            reason: "allocated pool missing from snapshot".into(),
        })?;
        let t = sum + c.amount;
        if sum.abs() >= c.amount.abs() { comp += (sum - t) + c.amount; } else { comp += (c.amount - t) + sum; }
        sum = t;

        if c.amount < 0.0 || pool.locked_capital + c.amount > pool.usable_capital() * (1.0 + tol) {
            capacity_ok = false;
        }
        premium_recomputed += pool.cost_of_fill(c.amount);
    }
    let filled = sum + comp;
    let rel = if premium_recomputed.abs() > 0.0 { (premium - premium_recomputed).abs() / premium_recomputed.abs() } else { premium.abs() };

    Ok(Report {
        counterparties: counterparties.len(),
        filled,
        order_size,
        exact_fill: (filled - order_size).abs() <= tol * order_size.max(1.0),
        capacity_ok,
        premium_recomputed,
        rel_err_premium: rel,
    })
}
