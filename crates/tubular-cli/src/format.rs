//! Output formats for reports.

use clap::ValueEnum;
use tubular_lib::RenderMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// Full report as pretty-printed JSON.
    Json,
}

impl From<OutputFormat> for RenderMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => RenderMode::PlainText,
            OutputFormat::Json => RenderMode::Json,
        }
    }
}
