#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
//! Library entry for the liquidity router.
//!
//! Splits an option purchase across independent liquidity pools, each pricing
//! supply on a nonlinear curve, minimizing premium plus the gas cost of
//! touching more counterparties. Pure and synchronous: every call works on
//! its own copy of the pool state, so independent calls can run on separate
//! threads.
//!
//! # Modules
//! - [`curves`]: Pricing curve and cumulative/marginal cost
//! - [`pool`]: Pools and per-run allocation state
//! - [`allocator`]: Greedy marginal-cost allocator
//! - [`router`]: Depth/gas-aware search over the allocator
//! - [`sampler`]: Premium-vs-size sweeps
//! - [`snapshot`]: Wire snapshots and boundary validation
//! - [`verifier`]: Post-hoc allocation checks
//! - [`plot`]: Visualization (optional in binaries)

/// Pricing curve and cost functions
pub mod curves;

/// Pools and per-run allocation state
pub mod pool;

/// Greedy chunked allocator
pub mod allocator;

/// Gas-cost model
pub mod gas;

/// Router tunables
pub mod config;

/// Depth/gas-aware routing search
pub mod router;

/// Premium-vs-size sampling
pub mod sampler;

/// Wire snapshots and input validation
pub mod snapshot;

/// Verification of allocation invariants
pub mod verifier;

/// Visualization utilities for generating charts
pub mod plot;

/// Error types
pub mod error;

pub use allocator::{AllocationRequest, AllocationResult, CounterpartyAllocation, MarginalCostAllocator};
pub use config::RouterConfig;
pub use curves::{Curve, PricingCurve};
pub use error::{Result, RouterError};
pub use pool::Pool;
pub use router::{DepthRoutingRequest, DepthRoutingResult, DepthSearchRouter};
