use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tubular_cli::catalog::load_catalog;
use tubular_cli::format::OutputFormat;
use tubular_lib::output::MaterialRow;
use tubular_lib::{evaluate_member, render_materials, MemberDefinition};

#[derive(Parser, Debug)]
#[command(author, version, about = "Section and mass properties of tubular members")]
struct Cli {
    /// Material table (CSV). Defaults to $TUBULAR_MATERIALS, then
    /// materials.csv next to the member file.
    #[arg(long, global = true)]
    materials: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a member definition and report its properties.
    Evaluate {
        /// Member definition (JSON).
        member: PathBuf,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
        /// Override the refinement count of the definition.
        #[arg(long)]
        refine: Option<usize>,
        /// Write the report to a file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List the materials in the catalog.
    Materials {
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Evaluate {
            member,
            format,
            refine,
            output,
        } => handle_evaluate(
            cli.materials.as_deref(),
            &member,
            format,
            refine,
            output.as_deref(),
        ),
        Command::Materials { format } => handle_materials(cli.materials.as_deref(), format),
    }
}

fn handle_evaluate(
    materials: Option<&Path>,
    member: &Path,
    format: OutputFormat,
    refine: Option<usize>,
    output: Option<&Path>,
) -> Result<()> {
    let mut definition = MemberDefinition::from_path(member)
        .with_context(|| format!("failed to read member definition {}", member.display()))?;
    if let Some(n) = refine {
        definition.n_refine = n;
    }
    let catalog = load_catalog(materials, Some(member))?;

    let props = evaluate_member(&definition, &catalog)
        .with_context(|| format!("failed to evaluate member {}", member.display()))?;
    let report = props.render(format.into())?;

    match output {
        Some(path) => {
            fs::write(path, &report)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{report}"),
    }
    Ok(())
}

fn handle_materials(materials: Option<&Path>, format: OutputFormat) -> Result<()> {
    let catalog = load_catalog(materials, None)?;
    let sorted = catalog.materials_sorted();
    match format {
        OutputFormat::Text => print!("{}", render_materials(&sorted)),
        OutputFormat::Json => {
            let rows: Vec<MaterialRow> = sorted.iter().map(|m| MaterialRow::from(*m)).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
