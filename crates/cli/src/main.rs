//! protostub CLI
//!
//! Command-line interface for extracting service schemas from .proto sources
//! and generating libprotobuf-mutator fuzzing stubs from them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use protostub_common::{Declaration, ProtoFile, Rpc, ScopedSection, StubConfig};
use protostub_generator::{compile_and_prepare, ProtocCompiler, SchemaCompiler, StubSpec};
use protostub_parser::ProtoParser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "protostub")]
#[command(version, about = "Extract service schemas from .proto files and generate fuzzing stubs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a schema file and display the extracted declarations
    #[command(after_help = "EXAMPLES:\n  \
        # Summarize services and messages\n  \
        protostub parse --proto greeter.proto\n\n  \
        # Dump the declaration tree as JSON\n  \
        protostub parse --proto greeter.proto --json")]
    Parse {
        /// Path to the schema source
        #[arg(short, long)]
        proto: PathBuf,

        /// Print the declaration tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a libprotobuf-mutator fuzzing stub for a schema file
    #[command(after_help = "EXAMPLES:\n  \
        # Print the stub to stdout\n  \
        protostub generate --proto greeter.proto\n\n  \
        # Compile with protoc and write the stub next to the generated header\n  \
        protostub generate \\\n    \
        --proto protos/greeter.proto \\\n    \
        --protoc /usr/local/bin/protoc \\\n    \
        --proto-out build/proto \\\n    \
        --output build/greeter_stub.cc\n\n  \
        # Use settings from a config file\n  \
        protostub generate --proto greeter.proto --config protostub.yaml")]
    Generate {
        /// Path to the schema source
        #[arg(short, long)]
        proto: PathBuf,

        /// YAML config file with default settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Package for method paths (defaults to the declared package, then the file name)
        #[arg(long)]
        package: Option<String>,

        /// Directory prefix of the generated header in the stub's #include
        #[arg(long)]
        include_dir: Option<String>,

        /// protoc binary; the schema is compiled before generation when set
        #[arg(long)]
        protoc: Option<PathBuf>,

        /// Output directory for protoc
        #[arg(long)]
        proto_out: Option<PathBuf>,

        /// Stub output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Parse { proto, json } => {
            parse_command(proto.as_path(), json, cli.verbose)?;
        }
        Commands::Generate {
            proto,
            config,
            package,
            include_dir,
            protoc,
            proto_out,
            output,
        } => {
            let overrides = StubConfig {
                protoc,
                proto_out,
                include_dir,
                package,
                output,
            };
            generate_command(proto.as_path(), config.as_deref(), overrides, cli.verbose)?;
        }
    }

    Ok(())
}

/// Library diagnostics go to stderr; DEBUG with --verbose, WARN otherwise
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_schema(proto_path: &Path) -> Result<ProtoFile> {
    let parser = ProtoParser::from_file(proto_path).context("Failed to load schema source")?;
    parser
        .parse()
        .with_context(|| format!("Failed to parse {}", proto_path.display()))
}

fn parse_command(proto_path: &Path, json: bool, verbose: bool) -> Result<()> {
    if json {
        let file = load_schema(proto_path)?;
        println!("{}", file.to_json().context("Failed to serialize schema")?);
        return Ok(());
    }

    println!("{} Parsing schema: {}", "→".cyan(), proto_path.display());
    let file = load_schema(proto_path)?;

    println!("\n{}", "✓ Parse successful!".green().bold());
    println!("\n{}", "Schema:".bold());
    println!(
        "  Package: {}",
        file.package.as_deref().unwrap_or("(none)").yellow()
    );
    if let Some(syntax) = &file.syntax {
        println!("  Syntax: {}", syntax);
    }
    println!("  Services: {}", file.root.services().count());
    println!("  Messages: {}", file.root.messages().count());
    println!("  Enums: {}", file.root.enums().count());

    for service in file.services() {
        println!(
            "\n  • {} ({} rpcs)",
            service.name.cyan(),
            service.rpcs.len()
        );
        for rpc in &service.rpcs {
            println!("    {}", describe_rpc(rpc));
        }
    }

    if verbose {
        println!("\n{}", "Declarations:".bold());
        print_section(&file.root, 1);
    }

    Ok(())
}

/// `Name(Request) → Response [GET /path]`
fn describe_rpc(rpc: &Rpc) -> String {
    let mut line = format!("{}({}) → {}", rpc.name, rpc.request, rpc.response);
    if let Some(method) = rpc.http_method {
        line.push_str(&format!(
            " [{} {}]",
            method.as_str().to_uppercase(),
            rpc.endpoint.as_deref().unwrap_or("")
        ));
    }
    line
}

fn print_section(section: &ScopedSection, depth: usize) {
    let indent = "  ".repeat(depth);

    for declaration in &section.declarations {
        match declaration {
            Declaration::Message(message) => {
                println!("{}message {}", indent, message.name().cyan());
                print_section(&message.body, depth + 1);
            }
            Declaration::Enum(proto_enum) => {
                println!(
                    "{}enum {} [{}]",
                    indent,
                    proto_enum.name.cyan(),
                    proto_enum.values.join(", ")
                );
            }
            Declaration::Service(service) => {
                println!("{}service {}", indent, service.name.cyan());
                for rpc in &service.rpcs {
                    println!("{}  rpc {}", indent, describe_rpc(rpc));
                }
            }
            Declaration::Field(field) => {
                let label = if field.is_array { "repeated " } else { "" };
                println!("{}{}{} {}", indent, label, field.data_type, field.name);
            }
        }
    }
}

/// Progress goes to stderr so a stub printed to stdout can be redirected
fn generate_command(
    proto_path: &Path,
    config_path: Option<&Path>,
    overrides: StubConfig,
    verbose: bool,
) -> Result<()> {
    let file_config = match config_path {
        Some(path) => StubConfig::load(path).context("Failed to load config")?,
        None => StubConfig::default(),
    };
    let config = file_config.merged_with(overrides);
    let proto_out = config.proto_out_dir();

    eprintln!(
        "{} Generating stub from: {}",
        "→".cyan(),
        proto_path.display()
    );

    let file = load_schema(proto_path)?;
    let spec = StubSpec::from_proto_file(
        &file,
        proto_path,
        config.package.as_deref(),
        &config.header_include_dir(),
    );

    eprintln!(
        "{} Found {} rpcs in {} services",
        "✓".green(),
        spec.rpcs.len(),
        file.services().count()
    );

    let compiler = config.protoc.clone().map(ProtocCompiler::new);
    if let Some(compiler) = &compiler {
        eprintln!(
            "{} Compiling schema with {}",
            "→".cyan(),
            compiler.protoc().display()
        );
    }

    let generator = compile_and_prepare(
        compiler.as_ref().map(|c| c as &dyn SchemaCompiler),
        proto_path,
        &proto_out,
        spec,
    )
    .context("Failed to prepare stub generator")?;

    if verbose {
        let spec = generator.spec();
        eprintln!("  Package: {}", spec.package);
        eprintln!("  Include: {}", spec.header_include);
        eprintln!("  Proto out: {}", proto_out.display());
    }

    match &config.output {
        Some(output) => {
            generator
                .generate_to_file(output)
                .context("Failed to generate stub")?;
            eprintln!("\n{}", "✓ Generation complete!".green().bold());
            eprintln!("  📄 {}", output.display());
        }
        None => {
            let rendered = generator.render().context("Failed to generate stub")?;
            print!("{}", rendered);
        }
    }

    Ok(())
}
