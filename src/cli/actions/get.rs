//! Get action: print variable values

use anyhow::Result;
use colored::Colorize;

use crate::cli::context::Context;

/// Execute the get action
///
/// A single key prints the bare value; several keys print `KEY=value` lines.
/// Unset keys are reported and make the command fail.
pub fn execute(ctx: &Context, keys: &[String]) -> Result<()> {
    let mut store = ctx.store();
    let requested: Vec<&str> = keys.iter().map(String::as_str).collect();
    let values = store.read_keys(&requested)?;

    let single = values.len() == 1;
    let mut missing = Vec::new();
    for (key, value) in &values {
        match value {
            Some(value) if single => println!("{}", value),
            Some(value) => println!("{}={}", key.cyan(), value),
            None => missing.push(key.as_str()),
        }
    }

    if !missing.is_empty() {
        for key in &missing {
            ctx.print_error(&format!("{} is not set", key));
        }
        anyhow::bail!("{} variable(s) not set", missing.len());
    }
    Ok(())
}
