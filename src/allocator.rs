//! Greedy marginal-cost allocation across pools

use crate::curves::PricingCurve;
use crate::pool::{arena, total_remaining_capacity, Pool};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Input to a single allocation run
#[derive(Clone, Copy, Debug)]
pub struct AllocationRequest<'a> {
    /// Candidate pools, read-only
    pub pools: &'a [Pool],
    /// Quantity to fill, in underlying order units
    pub order_size: f64,
    /// Increment per greedy step (ΔX)
    pub chunk_size: f64,
    /// Strike, carried for conversion into instrument units downstream
    pub strike_price: f64,
}

/// One line of an allocation: how much a pool fills
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterpartyAllocation {
    /// Pool identifier
    pub pool_id: String,
    /// Liquidity provider address
    pub lp_address: String,
    /// Amount in underlying order units
    pub amount: f64,
    /// Curve the pool priced with
    pub curve: PricingCurve,
    /// Pool criteria, passed through
    pub criteria: String,
}

/// Allocator output. An empty counterparty list means the order was infeasible.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    /// Sum of exact curve cost over filled pools
    pub premium: f64,
    /// Filled pools in the order they were first touched
    pub counterparties: Vec<CounterpartyAllocation>,
}

impl AllocationResult {
    /// True for the no-allocation sentinel.
    pub fn is_empty(&self) -> bool { self.counterparties.is_empty() }

    /// Total amount allocated across counterparties.
    pub fn filled(&self) -> f64 { self.counterparties.iter().map(|c| c.amount).sum() }
}

/// Heap entry: min-heap on cost, ties go to the lower input index.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    cost: f64,
    index: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}
impl Eq for Candidate {}
impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed for min-heap
        other.cost.total_cmp(&self.cost).then_with(|| other.index.cmp(&self.index))
    }
}

/// Greedy chunked allocator: always fills the next chunk from whichever pool
/// currently quotes the lowest marginal cost. Myopic, never backtracks.
#[derive(Clone, Copy, Debug)]
pub struct MarginalCostAllocator {
    /// Remaining order size at or below `epsilon · max(order_size, 1)` counts as filled
    pub epsilon: f64,
}

impl Default for MarginalCostAllocator {
    fn default() -> Self { Self { epsilon: 1e-9 } }
}

impl MarginalCostAllocator {
    /// Allocator with a custom termination tolerance.
    pub fn new(epsilon: f64) -> Self { Self { epsilon } }

    /// Fills `req.order_size` across `req.pools`.
    ///
    /// Returns the empty sentinel when aggregate remaining capacity is below
    /// the order size. The caller's pools are never mutated.
    pub fn allocate(&self, req: &AllocationRequest<'_>) -> AllocationResult {
        if total_remaining_capacity(req.pools) < req.order_size {
            return AllocationResult::default();
        }
        let chunk = req.chunk_size;
        let eps = self.epsilon * req.order_size.max(1.0);

        let mut states = arena(req.pools);
        let mut heap = BinaryHeap::with_capacity(states.len());
        for (index, s) in states.iter_mut().enumerate() {
            if s.remaining() > 0.0 {
                heap.push(Candidate { cost: s.refresh_estimate(chunk), index });
            }
        }

        let mut remaining = req.order_size;
        let mut first_filled: Vec<usize> = Vec::new();
        while remaining > eps {
            let Some(Candidate { index, .. }) = heap.pop() else {
                tracing::warn!(remaining, "queue drained before order was filled; returning partial fill");
                break;
            };
            let s = &mut states[index];
            let fill = chunk.min(s.remaining()).min(remaining);
            if fill > 0.0 && s.ordered_fill == 0.0 {
                first_filled.push(index);
            }
            s.ordered_fill += fill;
            remaining -= fill;
            if remaining <= eps { break; }
            if s.remaining() > 0.0 {
                let cost = s.refresh_estimate(chunk);
                heap.push(Candidate { cost, index });
            }
        }

        let mut premium = 0.0;
        let counterparties = first_filled
            .into_iter()
            .map(|i| {
                let s = &states[i];
                premium += s.pool.cost_of_fill(s.ordered_fill);
                CounterpartyAllocation {
                    pool_id: s.pool.id.clone(),
                    lp_address: s.pool.lp_address.clone(),
                    amount: s.ordered_fill,
                    curve: s.pool.curve,
                    criteria: s.pool.criteria.clone(),
                }
            })
            .collect();
        AllocationResult { premium, counterparties }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(id: &str, a: f64, capital: f64) -> Pool {
        Pool {
            id: id.into(),
            lp_address: format!("0x{id}"),
            capital,
            locked_capital: 0.0,
            curve: PricingCurve::linear(a),
            criteria: String::new(),
        }
    }

    #[test]
    fn heap_pops_cheapest_then_lowest_index() {
        let mut h = BinaryHeap::new();
        h.push(Candidate { cost: 2.0, index: 0 });
        h.push(Candidate { cost: 1.0, index: 2 });
        h.push(Candidate { cost: 1.0, index: 1 });
        assert_eq!(h.pop().map(|c| c.index), Some(1));
        assert_eq!(h.pop().map(|c| c.index), Some(2));
        assert_eq!(h.pop().map(|c| c.index), Some(0));
    }

    #[test]
    fn identical_pools_split_evenly_in_input_order() {
        let pools = vec![pool("x", 1.0, 100.0), pool("y", 1.0, 100.0)];
        let req = AllocationRequest { pools: &pools, order_size: 40.0, chunk_size: 10.0, strike_price: 1.0 };
        let r = MarginalCostAllocator::default().allocate(&req);
        assert_eq!(r.counterparties.len(), 2);
        assert_eq!(r.counterparties[0].pool_id, "x");
        assert_eq!(r.counterparties[0].amount, 20.0);
        assert_eq!(r.counterparties[1].amount, 20.0);
        // 2 · 20² / 100
        assert!((r.premium - 8.0).abs() < 1e-12);
    }

    #[test]
    fn chunk_larger_than_pool_is_truncated() {
        let pools = vec![pool("small", 1.0, 5.0), pool("big", 20.0, 1000.0)];
        let req = AllocationRequest { pools: &pools, order_size: 8.0, chunk_size: 100.0, strike_price: 1.0 };
        let r = MarginalCostAllocator::default().allocate(&req);
        let small = r.counterparties.iter().find(|c| c.pool_id == "small").map(|c| c.amount);
        assert_eq!(small, Some(5.0));
        assert!((r.filled() - 8.0).abs() < 1e-12);
    }
}
