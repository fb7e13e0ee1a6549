use anyhow::Result;
use colored::Colorize;
use steward_cli::AppConfig;

pub fn show(cfg: &AppConfig, source: Option<&str>) -> Result<()> {
    println!(
        "{}: {}",
        "Config".cyan(),
        source.unwrap_or("(defaults and environment)")
    );
    println!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
