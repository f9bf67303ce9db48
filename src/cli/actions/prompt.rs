//! Interactive prompt over every schema field

use anyhow::Result;
use colored::Colorize;
use std::io::IsTerminal;

use crate::cli::context::Context;
use crate::session::{FieldStatus, Session, SessionReport};
use crate::tui::{InlineRenderer, TerminalKeys};

/// Execute the prompt action
pub fn execute(ctx: &Context) -> Result<()> {
    let fields = ctx.load_fields()?;
    if fields.is_empty() {
        ctx.print_warning(&format!(
            "No fields defined in {}",
            ctx.schema_file.display()
        ));
        return Ok(());
    }

    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        anyhow::bail!("The prompt needs an interactive terminal. Use `envwiz set KEY=VALUE` instead.");
    }

    println!(
        "{} {}",
        "Editing".bold(),
        ctx.env_file.display().to_string().cyan()
    );

    let mut store = ctx.store();
    let mut session = Session::new(&fields, &mut store).with_mask_char(ctx.config.ui.mask_char);
    if let Some(manager) = ctx.backup_manager() {
        session = session.with_backup(manager);
    }

    let report = {
        let mut renderer = InlineRenderer::new(ctx.config.ui.viewport_height)?;
        session.run(&mut TerminalKeys, &mut renderer)?
    };

    print_report(ctx, &report);
    Ok(())
}

fn print_report(ctx: &Context, report: &SessionReport) {
    let skipped = report
        .fields
        .iter()
        .filter(|(_, s)| *s == FieldStatus::Skipped)
        .count();

    if report.cancelled {
        ctx.print_warning(&format!(
            "Cancelled. {} value(s) written before cancelling.",
            report.written()
        ));
        return;
    }

    let mut message = format!(
        "{} value(s) written to {}",
        report.written(),
        ctx.env_file.display()
    );
    if skipped > 0 {
        message.push_str(&format!(", {} skipped", skipped));
    }
    ctx.print_success(&message);
}
