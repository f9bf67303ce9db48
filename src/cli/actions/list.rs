//! List action: every effective variable, sorted by key

use anyhow::Result;
use colored::Colorize;

use crate::cli::context::Context;
use crate::utils::strings::{mask, truncate_to_width};

/// Get terminal width, defaulting to 80 if unable to detect
fn get_terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Render one `KEY  value` row fitted to `term_width`.
fn format_row(key: &str, value: &str, key_width: usize, term_width: usize) -> String {
    let value = value.replace('\n', "\\n");
    let value_width = term_width.saturating_sub(key_width + 2).max(10);
    format!(
        "{:<width$}  {}",
        key,
        truncate_to_width(&value, value_width),
        width = key_width
    )
}

/// Execute the list action
pub fn execute(ctx: &Context) -> Result<()> {
    let fields = ctx.optional_fields()?;
    let mut store = ctx.store();
    let values = store.read()?;

    if values.is_empty() {
        println!(
            "{}",
            format!("No variables in {}", ctx.env_file.display()).dimmed()
        );
        return Ok(());
    }

    let mut keys: Vec<&String> = values.keys().collect();
    keys.sort();
    let key_width = keys.iter().map(|k| k.chars().count()).max().unwrap_or(0);
    let term_width = get_terminal_width();

    for key in keys {
        let secret = fields.iter().any(|f| &f.key == key && f.secret);
        let value = if secret {
            mask(&values[key], ctx.config.ui.mask_char)
        } else {
            values[key].clone()
        };
        let row = format_row(key, &value, key_width, term_width);
        // Color only the key column; padding is computed on the plain text.
        let (key_part, rest) = row.split_at(key.len());
        println!("{}{}", key_part.cyan(), rest);
    }

    println!();
    println!(
        "{}",
        format!("Total: {} variable(s)", values.len()).dimmed()
    );
    Ok(())
}
