//! Model Proto Generator CLI
//!
//! Command-line interface for generating `.proto` files from ORM model registries.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use model_proto_generator_common::{ModelDescriptor, ModelRegistry};
use model_proto_generator_generator::ProtoGenerator;
use model_proto_generator_parser::{RegistryFormat, RegistryLoader, TypeMapper};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "model-proto-generator")]
#[command(version, about = "Generate Protocol Buffer definitions from ORM model metadata", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the proto file for an application or a single model
    #[command(after_help = "EXAMPLES:\n  \
        # Print the proto for every concrete model of an app\n  \
        model-proto-generator generate --registry models.yaml --app library\n\n  \
        # Generate a single model into a file\n  \
        model-proto-generator generate \\\n    \
        --registry models.json \\\n    \
        --app library \\\n    \
        --model Book \\\n    \
        --output ./library/grpc/library.proto")]
    Generate {
        /// Path to the model registry document
        #[arg(short, long)]
        registry: PathBuf,

        /// Registry format (auto-detected if not specified)
        #[arg(short, long)]
        format: Option<RegistryFormatArg>,

        /// Application whose models are generated; also the proto package
        #[arg(short, long)]
        app: String,

        /// Generate only this model
        #[arg(short, long)]
        model: Option<String>,

        /// Output file (printed to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the models of a registry and how their fields map to proto types
    #[command(after_help = "EXAMPLES:\n  \
        # Inspect every application\n  \
        model-proto-generator inspect --registry models.yaml\n\n  \
        # Inspect one application\n  \
        model-proto-generator inspect --registry models.yaml --app library")]
    Inspect {
        /// Path to the model registry document
        #[arg(short, long)]
        registry: PathBuf,

        /// Registry format (auto-detected if not specified)
        #[arg(short, long)]
        format: Option<RegistryFormatArg>,

        /// Only show this application
        #[arg(short, long)]
        app: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RegistryFormatArg {
    /// JSON registry document
    Json,
    /// YAML registry document
    Yaml,
}

impl From<RegistryFormatArg> for RegistryFormat {
    fn from(arg: RegistryFormatArg) -> Self {
        match arg {
            RegistryFormatArg::Json => RegistryFormat::Json,
            RegistryFormatArg::Yaml => RegistryFormat::Yaml,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            registry,
            format,
            app,
            model,
            output,
        } => {
            generate_command(
                registry.as_path(),
                format,
                &app,
                model.as_deref(),
                output.as_deref(),
                cli.verbose,
            )?;
        },
        Commands::Inspect {
            registry,
            format,
            app,
        } => {
            inspect_command(registry.as_path(), format, app.as_deref(), cli.verbose)?;
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_registry(path: &Path, format: Option<RegistryFormatArg>) -> Result<ModelRegistry> {
    RegistryLoader::from_file(path, format.map(Into::into))
        .with_context(|| format!("Failed to load model registry {}", path.display()))
}

fn generate_command(
    registry_path: &Path,
    format: Option<RegistryFormatArg>,
    app: &str,
    model: Option<&str>,
    output: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let registry = load_registry(registry_path, format)?;
    let generator = ProtoGenerator::new(&registry, app, model);
    let scope = match model {
        Some(model) => format!("{}.{}", app, model),
        None => app.to_string(),
    };

    let Some(output) = output else {
        let code = generator
            .generate()
            .with_context(|| format!("Failed to generate proto for {}", scope))?;
        print!("{}", code);
        return Ok(());
    };

    println!(
        "{} Generating proto for {} from {}",
        "→".cyan(),
        scope.yellow(),
        registry_path.display()
    );
    if verbose {
        println!("  Output: {}", output.display());
    }

    generator
        .generate_to_file(output)
        .with_context(|| format!("Failed to generate proto for {}", scope))?;

    println!("{} Wrote {}", "✓".green(), output.display());
    Ok(())
}

fn inspect_command(
    registry_path: &Path,
    format: Option<RegistryFormatArg>,
    app_filter: Option<&str>,
    verbose: bool,
) -> Result<()> {
    let registry = load_registry(registry_path, format)?;

    let apps: Vec<_> = match app_filter {
        Some(name) => vec![registry
            .app(name)
            .with_context(|| format!("Unknown application: {}", name))?],
        None => registry.apps.iter().collect(),
    };

    for app in apps {
        println!("{} {}", "Application:".bold(), app.name.yellow());
        for model in &app.models {
            print_model(model, verbose);
        }
        println!();
    }

    Ok(())
}

fn print_model(model: &ModelDescriptor, verbose: bool) {
    let mut markers = Vec::new();
    if model.is_abstract {
        markers.push("abstract");
    }
    if model.grpc_methods.is_some() {
        markers.push("methods override");
    }
    if model.grpc_messages.is_some() {
        markers.push("messages override");
    }
    if model.uses_struct_requests() {
        markers.push("struct list request");
    }

    if markers.is_empty() {
        println!("  • {}", model.name.cyan());
    } else {
        println!("  • {} ({})", model.name.cyan(), markers.join(", "));
    }

    if !verbose && model.is_abstract {
        return;
    }

    for field in &model.fields {
        let proto_type = TypeMapper::map_type(&field.type_tag);
        let pk = if field.name == model.pk { " [pk]" } else { "" };
        if TypeMapper::is_known(&field.type_tag) {
            println!("    {} {} -> {}{}", field.name, field.type_tag, proto_type, pk);
        } else {
            println!(
                "    {} {} -> {} {}{}",
                field.name,
                field.type_tag,
                proto_type,
                "(unmapped)".dimmed(),
                pk
            );
        }
    }
}
