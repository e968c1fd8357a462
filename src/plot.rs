//! Visualization utilities for generating charts

use crate::curves::Curve;
use crate::sampler::SamplePoint;
use anyhow::Result;
use plotters::prelude::*;

/// Generates a premium vs order size chart from sampled points
pub fn plot_premium_vs_size(points: &[SamplePoint], out_path: &str) -> Result<()> {
    let root = BitMapBackend::new(out_path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let data: Vec<(f64, f64)> = points.iter().filter(|p| p.is_feasible()).map(|p| (p.size, p.premium)).collect();
    let x_max = points.last().map(|p| p.size).unwrap_or(1.0).max(1e-12);
    let y_max = data.iter().map(|(_, y)| *y).fold(0.0, f64::max).max(1e-12);
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Premium vs Order Size", ("sans-serif", 28))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, 0.0..(y_max * 1.05))?;
    chart.configure_mesh().draw()?;
    chart.draw_series(LineSeries::new(data, &BLACK))?;
    root.present()?;
    Ok(())
}

/// Generates a unit price vs utilization chart for one curve
pub fn plot_price_vs_utilization<C: Curve>(c: &C, out_path: &str) -> Result<()> {
    let root = BitMapBackend::new(out_path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let u_max = c.max_utilization();
    let pts: Vec<(f64, f64)> = (0..=500)
        .map(|i| {
            let u = u_max * i as f64 / 500.0;
            (u, c.evaluate(u))
        })
        .collect();
    let y_min = pts.iter().map(|(_, y)| *y).fold(0.0, f64::min);
    let y_max = pts.iter().map(|(_, y)| *y).fold(0.0, f64::max).max(1e-12);
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(format!("Unit Price vs Utilization ({})", c.name()), ("sans-serif", 28))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..u_max.max(1e-12), y_min..(y_max * 1.05))?;
    chart.configure_mesh().draw()?;
    chart.draw_series(LineSeries::new(pts, &BLACK))?;
    root.present()?;
    Ok(())
}
