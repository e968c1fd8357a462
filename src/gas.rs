//! Execution-cost model for multi-counterparty purchases

use serde::{Deserialize, Serialize};

/// Gas cost in quote currency.
///
/// Each counterparty adds roughly `gas_units_per_counterparty` of execution
/// overhead, paid at `gas_price_wei` per unit and converted from wei through
/// the native asset's quote price.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GasModel {
    /// Gas units per counterparty (empirical)
    pub gas_units_per_counterparty: f64,
    /// Gas price per unit, in wei
    pub gas_price_wei: f64,
    /// Wei per native unit (1e18 on EVM chains)
    pub wei_per_native_unit: f64,
    /// Native asset price in quote currency
    pub native_price: f64,
}

impl GasModel {
    /// Quote-currency cost of one gas unit.
    #[inline] fn unit_cost(&self) -> f64 {
        self.gas_price_wei / self.wei_per_native_unit * self.native_price
    }

    /// Cost of a purchase touching `counterparties` pools.
    pub fn cost_for(&self, counterparties: usize) -> f64 {
        self.gas_units_per_counterparty * counterparties as f64 * self.unit_cost()
    }

    /// Lookup table: entry k is the cost for k + 1 counterparties, k < `max_counterparties`.
    pub fn table(&self, max_counterparties: usize) -> GasTable {
        GasTable((1..=max_counterparties).map(|i| self.cost_for(i)).collect())
    }
}

/// Precomputed gas costs by counterparty count.
#[derive(Clone, Debug, PartialEq)]
pub struct GasTable(Vec<f64>);

impl GasTable {
    /// Cost for `counterparties` pools; 0 for an empty allocation.
    pub fn cost(&self, counterparties: usize) -> f64 {
        if counterparties == 0 { return 0.0; }
        self.0.get(counterparties - 1).copied().unwrap_or(f64::INFINITY)
    }

    /// Number of entries
    pub fn len(&self) -> usize { self.0.len() }

    /// True when the table holds no entries
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}
