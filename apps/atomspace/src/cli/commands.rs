//! # CLI Command Implementations

use crate::error::CliError;
use crate::script::{RunReport, Script, demo_script, load_script, run_script};
use atomspace_core::EngineConfig;
use std::path::Path;

// =============================================================================
// SCENARIO COMMANDS
// =============================================================================

/// Run the built-in demo scenario.
pub fn cmd_demo(config: EngineConfig, json_mode: bool) -> Result<(), CliError> {
    run_and_print(config, &demo_script(), json_mode)
}

/// Replay the script at `path`.
pub fn cmd_run(config: EngineConfig, path: &Path, json_mode: bool) -> Result<(), CliError> {
    let script = load_script(path)?;
    run_and_print(config, &script, json_mode)
}

fn run_and_print(config: EngineConfig, script: &Script, json_mode: bool) -> Result<(), CliError> {
    let report = run_script(config, script)?;

    if json_mode {
        let output = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::Script(format!("cannot render report: {}", e)))?;
        println!("{}", output);
        return Ok(());
    }

    print_report(script, &report);
    Ok(())
}

fn print_report(script: &Script, report: &RunReport) {
    if let Some(description) = &script.description {
        println!("{}", description);
        println!("{}", "=".repeat(description.len()));
    }

    for outcome in &report.outcomes {
        match outcome.result.as_str() {
            // describe steps render multi-line text
            Some(text) => println!("[{:>3}] {}\n{}", outcome.step, outcome.op, text),
            None => println!("[{:>3}] {} {}", outcome.step, outcome.op, outcome.result),
        }
    }

    println!();
    println!("{}", report.stats);
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Show the effective engine configuration.
pub fn cmd_config(config: &EngineConfig, json_mode: bool) -> Result<(), CliError> {
    if json_mode {
        let output = serde_json::to_string_pretty(config)
            .map_err(|e| CliError::Config(format!("cannot render configuration: {}", e)))?;
        println!("{}", output);
        return Ok(());
    }

    println!("AtomSpace Engine Configuration");
    println!("==============================");
    println!("Capacity:             {}", config.capacity);
    println!("Decay rate:           {}", config.decay_rate);
    println!("Attention threshold:  {}", config.attention_threshold);
    println!("Diffusion rate:       {}", config.importance_diffusion_rate);
    println!("Default strength:     {}", config.default_strength);
    println!("Default confidence:   {}", config.default_confidence);

    Ok(())
}
