use approx::assert_relative_eq;
use lprouter::allocator::{AllocationRequest, MarginalCostAllocator};
use lprouter::config::RouterConfig;
use lprouter::curves::{Curve, PricingCurve};
use lprouter::pool::{total_remaining_capacity, Pool};
use lprouter::router::{DepthRoutingRequest, DepthSearchRouter};
use proptest::prelude::*;

fn arb_pool() -> impl Strategy<Value = Pool> {
    (
        10.0f64..200.0,  // capital
        0.0f64..0.5,     // locked fraction of usable capital
        0.1f64..5.0,     // a
        0.0f64..3.0,     // b
        0.5f64..3.0,     // c
        0.0f64..0.5,     // d
        0.5f64..=1.0,    // max utilization
    )
        .prop_map(|(capital, locked_frac, a, b, c, d, max_utilization)| Pool {
            id: String::new(),
            lp_address: String::new(),
            capital,
            locked_capital: locked_frac * max_utilization * capital,
            curve: PricingCurve { a, b, c, d, max_utilization },
            criteria: String::new(),
        })
}

fn arb_pools() -> impl Strategy<Value = Vec<Pool>> {
    prop::collection::vec(arb_pool(), 1..6).prop_map(|mut pools| {
        for (i, p) in pools.iter_mut().enumerate() {
            p.id = format!("pool-{i}");
            p.lp_address = format!("0x{i:040x}");
        }
        pools
    })
}

fn request<'a>(pools: &'a [Pool], order_size: f64, gas_price_wei: f64) -> DepthRoutingRequest<'a> {
    DepthRoutingRequest { pools, order_size, strike_price: 1.0, gas_price_wei, native_price: 2000.0 }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn allocator_fills_exactly_within_capacity(
        pools in arb_pools(),
        frac in 0.01f64..0.99,
        chunk in 0.5f64..5.0,
    ) {
        let order = frac * total_remaining_capacity(&pools);
        let r = MarginalCostAllocator::default().allocate(&AllocationRequest {
            pools: &pools, order_size: order, chunk_size: chunk, strike_price: 1.0,
        });
        prop_assert!((r.filled() - order).abs() <= 1e-6 * order.max(1.0), "filled {} of {}", r.filled(), order);
        for c in &r.counterparties {
            let p = pools.iter().find(|p| p.id == c.pool_id).unwrap();
            prop_assert!(c.amount > 0.0);
            prop_assert!(p.locked_capital + c.amount <= p.usable_capital() * (1.0 + 1e-12));
        }
        let exact: f64 = r.counterparties.iter()
            .map(|c| pools.iter().find(|p| p.id == c.pool_id).unwrap().cost_of_fill(c.amount))
            .sum();
        assert_relative_eq!(r.premium, exact, max_relative = 1e-12);
    }

    #[test]
    fn oversized_orders_return_the_sentinel(pools in arb_pools(), excess in 1.001f64..3.0) {
        let order = excess * total_remaining_capacity(&pools);
        let r = MarginalCostAllocator::default().allocate(&AllocationRequest {
            pools: &pools, order_size: order, chunk_size: 1.0, strike_price: 1.0,
        });
        prop_assert_eq!(r.premium, 0.0);
        prop_assert!(r.counterparties.is_empty());
    }

    #[test]
    fn routing_is_deterministic(pools in arb_pools(), frac in 0.05f64..0.9, gwei in 0.0f64..200.0) {
        let order = frac * total_remaining_capacity(&pools);
        let router = DepthSearchRouter::default();
        let first = router.route(&request(&pools, order, gwei * 1e9));
        let second = router.route(&request(&pools, order, gwei * 1e9));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn wider_search_never_scores_worse(pools in arb_pools(), frac in 0.05f64..0.9, gwei in 0.0f64..200.0) {
        let order = frac * total_remaining_capacity(&pools);
        let full = DepthSearchRouter::default().route(&request(&pools, order, gwei * 1e9));
        let narrow = DepthSearchRouter::new(RouterConfig { max_prefixes_per_depth: Some(1), ..Default::default() })
            .route(&request(&pools, order, gwei * 1e9));
        if !narrow.is_empty() {
            prop_assert!(!full.is_empty());
            prop_assert!(full.premium_plus_gas <= narrow.premium_plus_gas);
        }
    }

    #[test]
    fn routed_fill_matches_order(pools in arb_pools(), frac in 0.05f64..0.9) {
        let order = frac * total_remaining_capacity(&pools);
        let r = DepthSearchRouter::default().route(&request(&pools, order, 30e9));
        // every pool's remaining capacity is within its unlocked capital, so some prefix is feasible
        prop_assert!(!r.is_empty());
        let filled: f64 = r.counterparties.iter().map(|c| c.amount).sum();
        prop_assert!((filled - order).abs() <= 1e-6 * order.max(1.0));
        prop_assert!(r.premium_plus_gas >= r.premium);
    }

    #[test]
    fn marginal_cost_matches_cumulative_difference(
        a in 0.1f64..5.0, b in 0.0f64..3.0, c in 0.5f64..3.0,
        capital in 10.0f64..1000.0, from_frac in 0.0f64..0.5, delta_frac in 0.01f64..0.5,
    ) {
        let curve = PricingCurve { a, b, c, d: 0.0, max_utilization: 1.0 };
        let from = from_frac * capital;
        let delta = delta_frac * capital;
        let m = curve.marginal_cost(capital, from, delta);
        let v = curve.cumulative_cost(from + delta, capital) - curve.cumulative_cost(from, capital);
        assert_relative_eq!(m * delta, v, max_relative = 1e-9);
        prop_assert!(m >= 0.0);
    }
}
