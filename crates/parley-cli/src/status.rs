//! `parley status` — show configuration and endpoint status.

use anyhow::Result;
use colored::Colorize;

use parley_core::config::{get_config_path, load_config};

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "Parley Status".cyan().bold());
    println!();

    // Config
    let config_exists = config_path.exists();
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_exists {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    // Endpoint
    println!(
        "  {:<18} {} {}",
        "Endpoint:".bold(),
        config.api.api_base,
        if config.api.is_configured() {
            format!("{} (key set)", "✓".green())
        } else {
            "(no API key)".red().to_string()
        }
    );

    // Models
    println!("  {:<18} {}", "Model:".bold(), config.agent.model);
    println!(
        "  {:<18} {} {}",
        "Audio:".bold(),
        if config.audio.enabled {
            config.audio.model.as_str()
        } else {
            "disabled"
        },
        if config.audio.enabled {
            format!("(player: {})", config.audio.player).dimmed().to_string()
        } else {
            String::new()
        }
    );

    // Limits
    println!(
        "  {:<18} {}",
        "Limits:".bold(),
        format!(
            "max_completion_tokens: {} | max_tool_recursions: {}",
            config.agent.max_completion_tokens, config.agent.max_tool_recursions
        )
        .dimmed()
    );

    // Tools
    println!(
        "  {:<18} {}",
        "Tools:".bold(),
        if config.tools.enabled {
            "enabled (terminal, read_file, write_file, think)".to_string()
        } else {
            "disabled".dimmed().to_string()
        }
    );

    println!();
    Ok(())
}
