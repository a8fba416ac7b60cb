use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use qpcr_optimizer::{
    cli::{Cli, OutputFormat},
    csv_output::CsvOutput,
    display, html_output::HtmlOutput,
    input::{ConditionText, InputCollector, InputFile},
    json_output::JsonOutput,
    optimize::{self, OptimizationResult, OptimizeConfig},
    report::{report_rows, Precision},
};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Render the result in the requested format
fn render(
    result: &OptimizationResult,
    config: &OptimizeConfig,
    format: OutputFormat,
) -> Result<String> {
    let precision = Precision::from(config);
    Ok(match format {
        OutputFormat::Text => display::render_text(result, precision),
        OutputFormat::Json => JsonOutput::new(result, config).to_json()?,
        OutputFormat::Csv => CsvOutput::from_rows(report_rows(result, precision)).to_csv(),
        OutputFormat::Html => HtmlOutput::new(result, precision).to_html(),
    })
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let file = match &args.input {
        Some(path) => Some(
            InputFile::from_path(path)
                .with_context(|| format!("Failed to load input file {}", path.display()))?,
        ),
        None => None,
    };

    let file_settings = file
        .as_ref()
        .and_then(|f| f.settings.clone())
        .unwrap_or_default();
    let config = args.apply_overrides(file_settings);

    let mut collector = InputCollector::new(args.max_conditions);
    if let Some(file) = file {
        collector = collector.with_file(file);
    }
    collector = collector
        .with_reference(args.control_labels.clone(), args.control_values.clone())
        .context("Invalid input")?;
    for spec in &args.conditions {
        collector = collector
            .with_condition(ConditionText::from_spec(spec).context("Invalid input")?);
    }
    let request = collector.collect().context("Invalid input")?;

    let result = optimize::optimize(&request, &config).context("Optimization failed")?;
    let rendered = render(&result, &config, args.format)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("wrote {} bytes to {}", rendered.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
