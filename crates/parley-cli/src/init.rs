//! `parley init` — write a starter configuration file.
//!
//! - Creates `~/.parley/config.json` with defaults
//! - Creates the history directory used by the REPL

use anyhow::Result;
use colored::Colorize;

use parley_core::config::{Config, get_config_path, save_config};
use parley_core::utils::get_data_path;

/// Run the init command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "Parley — Setup".cyan().bold());
    println!();

    let config_path = get_config_path();

    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        let config = Config::default();
        save_config(&config, Some(&config_path))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    }

    let history_dir = get_data_path().join("history");
    std::fs::create_dir_all(&history_dir)?;
    println!("  {} history dir at {}", "✓".green(), history_dir.display());

    println!();
    println!(
        "  Next: set your API key in {} (api.apiKey), or export PARLEY_API__KEY.",
        config_path.display()
    );
    println!();
    Ok(())
}
