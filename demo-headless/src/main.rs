use anyhow::{Context, Result};
use clap::Parser;
use reheat_core::{
    FieldPair, FluctuationInitializer, InitializationReport, Initializer, ModelConfiguration,
    SweepReport,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Lattice initial-condition demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "reheat-headless")]
#[command(about = "Generate vacuum-fluctuation initial conditions on a lattice", long_about = None)]
struct Args {
    /// JSON model configuration (missing keys use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sites per axis (overrides `total_gridpoints`)
    #[arg(short = 'n', long)]
    grid_size: Option<usize>,

    /// Comoving box length in program units
    #[arg(short = 'l', long)]
    box_length: Option<f64>,

    /// Conformal expansion rate at initialization
    #[arg(long)]
    adot: Option<f64>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Run the single-field model (drop chi)
    #[arg(long)]
    no_chi: bool,

    /// Print the initialization report as JSON
    #[arg(long)]
    json: bool,
}

fn build_configuration(args: &Args) -> Result<ModelConfiguration> {
    let mut config = match &args.config {
        Some(path) => ModelConfiguration::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ModelConfiguration::default(),
    };

    if let Some(n) = args.grid_size {
        config.total_gridpoints = n
            .checked_pow(3)
            .context("grid size too large for this platform")?;
    }
    if let Some(box_length) = args.box_length {
        config.box_length = box_length;
    }
    if let Some(adot) = args.adot {
        config.adot = adot;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.no_chi {
        config.chi = None;
    }

    config.validate()?;
    Ok(config)
}

fn print_sweep(sweep: &SweepReport) {
    println!("Field '{}':", sweep.field);
    println!("  effective mass²     : {:.6e}", sweep.effective_mass_sq);
    println!(
        "  pairs sampled       : {} ({} self-conjugate, {} unstable)",
        sweep.pairs_sampled, sweep.self_conjugate_modes, sweep.unstable_modes
    );
    println!("  imaginary residual  : {:.3e}", sweep.imaginary_residual);
    println!("  value               : {}", sweep.value_statistics);
    println!("  derivative          : {}", sweep.derivative_statistics);
}

fn print_report(report: &InitializationReport) {
    println!("\n=== Initialization Complete ===\n");
    print_sweep(&report.phi);
    if let Some(chi) = &report.chi {
        print_sweep(chi);
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = build_configuration(&args)?;
    let shape = config.lattice_shape()?;

    info!(
        "Grid {}³ ({} sites), L={}, seed={}",
        shape.size(),
        shape.len(),
        config.box_length,
        config.seed
    );

    let mut phi = FieldPair::new("phi", shape);
    let mut chi = config.has_chi().then(|| FieldPair::new("chi", shape));

    let mut initializer = FluctuationInitializer::new(&config, &mut phi, chi.as_mut())?;
    initializer.initialize();

    let report = initializer
        .report()
        .context("initializer finished without a report")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!(
            "Fluctuation amplitude: {:.6e}",
            initializer.fluctuation_amplitude().value()
        );
        print_report(report);
    }

    Ok(())
}
