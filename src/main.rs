use lprouter::config::RouterConfig;
use lprouter::plot::{plot_premium_vs_size, plot_price_vs_utilization};
use lprouter::router::{DepthRoutingRequest, DepthRoutingResult, DepthSearchRouter};
use lprouter::sampler::{sample, write_csv};
use lprouter::snapshot::{load_pools, validate_order};
use lprouter::verifier::verify_allocation;
use lprouter::Pool;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs::{create_dir_all, File};
use std::io::BufReader;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "lprouter",
    version,
    about = "Gas-aware option liquidity router"
)]
struct Args {
    #[arg(long, default_value = "route")]
    mode: String,
    /// JSON array of pool snapshots
    #[arg(long)]
    pools: String,
    #[arg(long)]
    order_size: f64,
    #[arg(long, default_value_t = 1.0)]
    strike: f64,
    /// Puts are collateralized in quote; contracts = amount / strike
    #[arg(long, action = clap::ArgAction::SetTrue)]
    put: bool,
    #[arg(long, default_value_t = 20.0)]
    gas_price_gwei: f64,
    /// Native asset price in quote currency
    #[arg(long, default_value_t = 2000.0)]
    native_price: f64,

    /// Optional RouterConfig overrides (JSON)
    #[arg(long)]
    config: Option<String>,

    #[arg(long, default_value_t = 100)]
    steps: usize,
    #[arg(long, default_value = "out")]
    out_dir: String,
    #[arg(long = "no-draw", action = clap::ArgAction::SetFalse, default_value_t = true)]
    draw: bool,
    #[arg(long, action = clap::ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteLine<'a> {
    pool_id: &'a str,
    lp_address: &'a str,
    amount: f64,
    contracts: f64,
    criteria: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteOutput<'a> {
    premium: f64,
    gas: f64,
    premium_plus_gas: f64,
    counterparties: Vec<RouteLine<'a>>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn validate_inputs(args: &Args) -> Result<()> {
    if !args.strike.is_finite() || args.strike <= 0.0 {
        return Err(anyhow!("strike must be finite and > 0 (got {})", args.strike));
    }
    if !args.gas_price_gwei.is_finite() || args.gas_price_gwei < 0.0 {
        return Err(anyhow!("gas_price_gwei must be finite and ≥ 0 (got {})", args.gas_price_gwei));
    }
    if !args.native_price.is_finite() || args.native_price < 0.0 {
        return Err(anyhow!("native_price must be finite and ≥ 0 (got {})", args.native_price));
    }
    if args.steps < 1 {
        return Err(anyhow!("steps must be ≥ 1 (got {})", args.steps));
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    validate_inputs(&args)?;

    let config = match &args.config {
        Some(path) => RouterConfig::from_json_file(path).with_context(|| format!("loading {path}"))?,
        None => RouterConfig::default(),
    };
    let file = File::open(&args.pools).with_context(|| format!("opening {}", args.pools))?;
    let pools = load_pools(BufReader::new(file))?;
    validate_order(&pools, args.order_size)?;
    tracing::info!(pools = pools.len(), order_size = args.order_size, "loaded pool snapshots");

    match args.mode.as_str() {
        "route" => run_route(&args, &pools, config),
        "sample" => run_sample(&args, &pools, &config),
        m => Err(anyhow!("unknown mode: {}", m)),
    }
}

fn run_route(args: &Args, pools: &[Pool], config: RouterConfig) -> Result<()> {
    let router = DepthSearchRouter::new(config);
    let result = router.route(&DepthRoutingRequest {
        pools,
        order_size: args.order_size,
        strike_price: args.strike,
        gas_price_wei: args.gas_price_gwei * 1e9,
        native_price: args.native_price,
    });
    if result.is_empty() {
        return Err(anyhow!(
            "insufficient liquidity: order {} exceeds what the supplied pools can fill",
            args.order_size
        ));
    }

    if args.verbose {
        let rep = verify_allocation(pools, args.order_size, result.premium, &result.counterparties, 1e-6)?;
        tracing::debug!(
            filled = rep.filled,
            exact = rep.exact_fill,
            capacity_ok = rep.capacity_ok,
            rel_err_premium = rep.rel_err_premium,
            "verified allocation"
        );
    }

    println!("{}", serde_json::to_string_pretty(&render(&result, args))?);
    Ok(())
}

fn render<'a>(result: &'a DepthRoutingResult, args: &Args) -> RouteOutput<'a> {
    RouteOutput {
        premium: result.premium,
        gas: result.gas(),
        premium_plus_gas: result.premium_plus_gas,
        counterparties: result
            .counterparties
            .iter()
            .map(|c| RouteLine {
                pool_id: &c.pool_id,
                lp_address: &c.lp_address,
                amount: c.amount,
                contracts: if args.put { c.amount / args.strike } else { c.amount },
                criteria: &c.criteria,
            })
            .collect(),
    }
}

fn run_sample(args: &Args, pools: &[Pool], config: &RouterConfig) -> Result<()> {
    create_dir_all(&args.out_dir)?;
    let points = sample(pools, args.order_size, args.steps, args.strike, config);
    let feasible = points.iter().filter(|p| p.is_feasible()).count();
    tracing::info!(steps = points.len(), feasible, "sampled premium curve");

    let csv_path = format!("{}/samples.csv", &args.out_dir);
    write_csv(File::create(&csv_path)?, &points)?;

    if args.draw {
        plot_premium_vs_size(&points, &format!("{}/premium_vs_size.png", &args.out_dir))?;
        if let Some(first) = pools.first() {
            plot_price_vs_utilization(&first.curve, &format!("{}/price_vs_utilization.png", &args.out_dir))?;
        }
    }
    Ok(())
}
