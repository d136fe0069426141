//! dataset-runner: headless dataset generator for fraudgraph.
//!
//! Usage:
//!   dataset-runner --seed 42 --out ./out
//!   dataset-runner --config generator.json --out ./out
//!   dataset-runner --seed 42 --noise 500 --out ./out

use anyhow::Result;
use fraudgraph_core::{composer::Composer, config::GeneratorConfig, serialize};
use std::env;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let out: PathBuf = args
        .windows(2)
        .find(|w| w[0] == "--out")
        .map(|w| PathBuf::from(&w[1]))
        .unwrap_or_else(|| PathBuf::from("./out"));

    let mut config = match args.windows(2).find(|w| w[0] == "--config") {
        Some(w) => GeneratorConfig::from_json_file(Path::new(&w[1]))?,
        None => GeneratorConfig::default(),
    };
    if let Some(seed) = parse_arg(&args, "--seed") {
        config.master_seed = seed;
    }
    if let Some(noise) = parse_arg(&args, "--noise") {
        config.noise_transactions = noise;
    }

    println!("fraudgraph — dataset-runner");
    println!("  seed:           {}", config.master_seed);
    println!("  fan threshold:  {}", config.fan_threshold);
    println!("  window (hours): {}", config.window_hours);
    println!("  noise txns:     {}", config.noise_transactions);
    println!("  out dir:        {}", out.display());
    println!();

    let dataset = Composer::build(&config).run()?;
    std::fs::create_dir_all(&out)?;
    let paths = serialize::write_dataset(&dataset, &out)?;

    println!("=== RUN SUMMARY ===");
    println!("  transactions:    {}", dataset.transactions.len());
    println!("  unique accounts: {}", dataset.unique_accounts().len());
    println!("  scenarios:       {}", dataset.manifest.len());
    println!(
        "  must detect:     {}",
        dataset.manifest.must_detect().len()
    );
    println!(
        "  must not flag:   {}",
        dataset.manifest.must_not_flag().len()
    );
    println!();
    println!("  dataset:  {}", paths.csv.display());
    println!("  report:   {}", paths.report.display());
    println!("  manifest: {}", paths.json.display());

    log::info!("run complete");
    Ok(())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
}
