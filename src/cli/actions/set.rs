//! Set action: write variables without prompting

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use std::collections::HashMap;

use crate::cli::args::ConflictStrategy;
use crate::cli::context::Context;
use crate::schema::FieldSchema;
use crate::store::{validate_key, WriteOutcome};
use crate::utils::strings::mask;

/// Split `KEY=VALUE`; the value keeps everything after the first `=`.
pub fn parse_assignment(definition: &str) -> Result<(String, String)> {
    let Some((key, value)) = definition.split_once('=') else {
        anyhow::bail!("Invalid assignment '{}'. Use: KEY=VALUE", definition);
    };
    let key = key.trim();
    validate_key(key)?;
    Ok((key.to_string(), value.to_string()))
}

/// Run `value` through the schema field for `key`, if there is one.
fn check_against_schema(fields: &[FieldSchema], key: &str, value: &str) -> Result<String> {
    match fields.iter().find(|f| f.key == key) {
        Some(field) => Ok(field.process(value)?.to_string()),
        None => Ok(value.to_string()),
    }
}

/// Execute the set action
pub fn execute(ctx: &Context, assignments: &[String], on_conflict: ConflictStrategy) -> Result<()> {
    let fields = ctx.optional_fields()?;
    let is_secret = |key: &str| fields.iter().any(|f| f.key == key && f.secret);
    let shown = |key: &str, value: &str| {
        if is_secret(key) {
            mask(value, ctx.config.ui.mask_char)
        } else {
            value.to_string()
        }
    };

    let mut pairs: Vec<(String, String)> = Vec::new();
    for definition in assignments {
        let (key, value) = parse_assignment(definition)?;
        let value = check_against_schema(&fields, &key, &value)?;
        match pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => pairs.push((key, value)),
        }
    }

    let mut store = ctx.store();
    let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
    let current: HashMap<String, Option<String>> = store.read_keys(&keys)?.into_iter().collect();

    let mut accepted: Vec<(&str, &str)> = Vec::new();
    for (key, value) in &pairs {
        let existing = current.get(key).cloned().flatten();
        match existing {
            Some(existing) if existing == *value => {
                println!("{} {} unchanged", "·".dimmed(), key);
            }
            Some(existing) => {
                let overwrite = match on_conflict {
                    ConflictStrategy::Overwrite => true,
                    ConflictStrategy::Skip => false,
                    ConflictStrategy::Ask => Confirm::new()
                        .with_prompt(format!(
                            "{} is already set to '{}'. Overwrite?",
                            key,
                            shown(key.as_str(), &existing)
                        ))
                        .default(false)
                        .interact()?,
                };
                if overwrite {
                    accepted.push((key.as_str(), value.as_str()));
                } else {
                    ctx.print_warning(&format!("{} already set, skipping", key));
                }
            }
            None => accepted.push((key.as_str(), value.as_str())),
        }
    }

    if accepted.is_empty() {
        println!("{}", "Nothing to write.".dimmed());
        return Ok(());
    }

    if ctx.env_file.exists() {
        if let Some(manager) = ctx.backup_manager() {
            manager.create_backup(&ctx.env_file)?;
        }
    }

    match store.write_all(&accepted)? {
        WriteOutcome::Written => {
            for &(key, value) in &accepted {
                ctx.print_success(&format!("{} = {}", key.cyan(), shown(key, value)));
            }
        }
        WriteOutcome::Unchanged => println!("{}", "Nothing to write.".dimmed()),
    }
    Ok(())
}
