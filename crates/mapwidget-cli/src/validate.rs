//! `validate` command handler.

use std::path::Path;

use anyhow::Context;
use mapwidget_core::{load_widget_config, validate_widget, validation_message};

/// Validate a widget configuration file and print a JSON report.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the configuration has
/// validation errors.
pub(crate) fn run_validate(path: &Path) -> anyhow::Result<()> {
    let config = load_widget_config(path)
        .with_context(|| format!("loading widget configuration {}", path.display()))?;

    let errors = validate_widget(&config);
    let report = serde_json::json!({
        "valid": errors.is_empty(),
        "errors": errors,
        "message": validation_message(&errors),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !errors.is_empty() {
        anyhow::bail!(
            "{} configuration error(s) in {}",
            errors.len(),
            path.display()
        );
    }

    tracing::info!(
        path = %path.display(),
        data_source = config.data_source.kind(),
        "widget configuration is valid"
    );
    Ok(())
}
