use anyhow::{bail, Context, Result};
use chrono::Local;
use coop_prices::{
    config::Config,
    extract::extract_table,
    fetch::Fetcher,
    normalize::normalize,
    report::{partition, render::render_report},
};
use std::io::Write;
use std::path::Path;
use std::{env, fs, process};
use tempfile::NamedTempFile;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let debug = args.iter().any(|a| a == "-d" || a == "--debug");
    let config_path = args
        .iter()
        .find(|a| !a.starts_with('-'))
        .map(String::as_str)
        .unwrap_or("coop-prices.json");

    if let Err(e) = run(config_path) {
        if debug {
            // Full cause chain, one line each, for post-mortem inspection.
            for (i, cause) in e.chain().enumerate() {
                error!(depth = i, "{}", cause);
            }
        }
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(config_path: &str) -> Result<()> {
    let config = Config::load(config_path)?;

    let fetcher = Fetcher::new(&config)?;
    let html = fetcher.fetch()?;

    let rows = extract_table(&html)?;
    info!(rows = rows.len(), "extracted table rows");

    let records: Vec<_> = rows
        .into_iter()
        .filter_map(|row| normalize(row, &config))
        .collect();
    if records.is_empty() && config.fail_on_empty {
        bail!("no valid produce records found; the site layout may have changed");
    }
    info!(records = records.len(), "normalized records");

    let (local, non_local) = partition(records);
    info!(
        local = local.len(),
        non_local = non_local.len(),
        "partitioned records"
    );

    let template = fs::read_to_string(&config.template_file)
        .with_context(|| format!("reading template {}", config.template_file.display()))?;
    let report = render_report(&template, &local, &non_local, Local::now().naive_local());

    write_atomic(&config.output_file, &report)?;
    println!("HTML file '{}' has been generated.", config.output_file.display());
    Ok(())
}

/// Write the report via a temp file in the destination directory plus a
/// rename, so a failed run never leaves a truncated report behind.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes()).context("writing report")?;
    tmp.persist(path)
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_replaces_existing_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("index.html");
        fs::write(&path, "old")?;

        write_atomic(&path, "new")?;
        assert_eq!(fs::read_to_string(&path)?, "new");
        Ok(())
    }

    #[test]
    fn write_atomic_fails_for_missing_directory() {
        let err = write_atomic(Path::new("no/such/dir/index.html"), "x").unwrap_err();
        assert!(err.to_string().contains("creating temp file"));
    }
}
