//! Wire-format pool snapshots and boundary validation
//!
//! Indexers hand out numbers as decimal strings. Everything is parsed and
//! checked here so the routing core can assume well-formed pools.

use crate::curves::PricingCurve;
use crate::error::{Result, RouterError};
use crate::pool::Pool;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Curve parameters as decimal strings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveSnapshot {
    /// a
    pub a: String,
    /// b
    pub b: String,
    /// c
    pub c: String,
    /// d
    pub d: String,
    /// Utilization cap
    pub max_utilization: String,
}

/// One pool as delivered by the data layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot {
    /// Pool identifier
    pub identifier: String,
    /// Liquidity provider address
    pub lp_address: String,
    /// Total capital
    pub total_capital: String,
    /// Locked capital
    pub locked_capital: String,
    /// Curve parameters
    pub curve: CurveSnapshot,
    /// Opaque criteria blob
    #[serde(default)]
    pub criteria: String,
}

fn parse_num(field: &'static str, raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RouterError::InvalidNumber { field, value: raw.to_string() }),
    }
}

impl CurveSnapshot {
    /// Parses into a numeric curve; every parameter must be finite.
    pub fn parse(&self) -> Result<PricingCurve> {
        let curve = PricingCurve {
            a: parse_num("a", &self.a)?,
            b: parse_num("b", &self.b)?,
            c: parse_num("c", &self.c)?,
            d: parse_num("d", &self.d)?,
            max_utilization: parse_num("maxUtilization", &self.max_utilization)?,
        };
        Ok(curve)
    }
}

impl PoolSnapshot {
    /// Converts to a validated [`Pool`].
    pub fn into_pool(self) -> Result<Pool> {
        let invalid = |reason: String| RouterError::InvalidPool { id: self.identifier.clone(), reason };
        let curve = self.curve.parse()?;
        if !curve.is_well_formed() {
            return Err(invalid(format!("maxUtilization must be in (0, 1] (got {})", curve.max_utilization)));
        }
        let capital = parse_num("totalCapital", &self.total_capital)?;
        let locked = parse_num("lockedCapital", &self.locked_capital)?;
        if capital <= 0.0 {
            return Err(invalid(format!("capital must be > 0 (got {capital})")));
        }
        if locked < 0.0 || locked > curve.max_utilization * capital {
            return Err(invalid(format!(
                "locked capital {locked} outside [0, {}]",
                curve.max_utilization * capital
            )));
        }
        Ok(Pool {
            id: self.identifier,
            lp_address: self.lp_address,
            capital,
            locked_capital: locked,
            curve,
            criteria: self.criteria,
        })
    }
}

/// Reads a JSON array of snapshots and validates each one.
pub fn load_pools<R: Read>(reader: R) -> Result<Vec<Pool>> {
    let snaps: Vec<PoolSnapshot> = serde_json::from_reader(reader)?;
    snaps.into_iter().map(PoolSnapshot::into_pool).collect()
}

/// Rejects orders the core cannot meaningfully route.
pub fn validate_order(pools: &[Pool], order_size: f64) -> Result<()> {
    if !order_size.is_finite() || order_size <= 0.0 {
        return Err(RouterError::InvalidOrder(format!("order size must be finite and > 0 (got {order_size})")));
    }
    if pools.is_empty() {
        return Err(RouterError::InvalidOrder("no pools supplied".into()));
    }
    Ok(())
}
