//! Premium-vs-size sampling for charts and exports

use crate::allocator::{AllocationRequest, MarginalCostAllocator};
use crate::config::RouterConfig;
use crate::error::Result;
use crate::pool::Pool;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// One point of the sampled bonding curve
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    /// Order size
    pub size: f64,
    /// Allocator premium at this size; 0 when infeasible
    pub premium: f64,
    /// premium / size
    pub unit_price: f64,
    /// Number of pools filled
    pub counterparties: usize,
}

impl SamplePoint {
    /// False for sizes the pools could not absorb.
    pub fn is_feasible(&self) -> bool { self.counterparties > 0 }
}

/// Runs the allocator at `steps` evenly spaced sizes in (0, max_size].
///
/// Each size gets its own allocation run over the untouched pool snapshot.
pub fn sample(pools: &[Pool], max_size: f64, steps: usize, strike_price: f64, config: &RouterConfig) -> Vec<SamplePoint> {
    let allocator = MarginalCostAllocator::new(config.fill_epsilon);
    (1..=steps)
        .map(|k| {
            let size = max_size * k as f64 / steps as f64;
            let r = allocator.allocate(&AllocationRequest {
                pools,
                order_size: size,
                chunk_size: config.chunk_size(size, pools.len()),
                strike_price,
            });
            SamplePoint {
                size,
                premium: r.premium,
                unit_price: if r.is_empty() { 0.0 } else { r.premium / size },
                counterparties: r.counterparties.len(),
            }
        })
        .collect()
}

/// Writes points as CSV with a single header row.
pub fn write_csv<W: Write>(writer: W, points: &[SamplePoint]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for p in points {
        wtr.serialize(p)?;
    }
    wtr.flush()?;
    Ok(())
}
