//! # sentex-cli
//!
//! Command-line interface for the sentex expression language.
//!
//! Compiles an expression with limits taken from `.sentex.toml`, the
//! environment and flags, then evaluates, checks or prints it.

mod errors;
mod functions;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::*;
use sentex::syntax::visit::{self, NodeRef};
use sentex::{CompiledExpression, Compiler, Config, ExprKind, Options};
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use errors::enhance_error;

#[derive(Parser)]
#[command(name = "sentex")]
#[command(about = "Compile and evaluate sandboxed expressions", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LimitArgs {
    /// Read options from this TOML file instead of searching for .sentex.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fill every unset limit with the untrusted-input preset
    #[arg(long)]
    untrusted: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Evaluate an expression and print the result as JSON")]
    Eval {
        expression: String,
        /// JSON file holding the context
        #[arg(short, long, value_name = "FILE", conflicts_with = "context_json")]
        context: Option<PathBuf>,
        /// Context given inline as JSON
        #[arg(long, value_name = "JSON")]
        context_json: Option<String>,
        /// Pretty-print the result
        #[arg(short, long)]
        pretty: bool,
        #[command(flatten)]
        limits: LimitArgs,
    },
    #[command(about = "Compile an expression and report what it uses")]
    Check {
        expression: String,
        #[command(flatten)]
        limits: LimitArgs,
    },
    #[command(about = "Print the syntax tree of an expression")]
    Ast {
        expression: String,
        #[command(flatten)]
        limits: LimitArgs,
    },
    #[command(about = "List the functions expressions may call")]
    Functions,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli.command) {
        enhance_error(&err).display();
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Eval {
            expression,
            context,
            context_json,
            pretty,
            limits,
        } => {
            let expr = compile(&expression, &limits)?;
            let context = load_context(context, context_json)?;
            let result = expr.evaluate_json(&context)?;
            let output = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{output}");
            Ok(())
        }
        Commands::Check { expression, limits } => check(&compile(&expression, &limits)?),
        Commands::Ast { expression, limits } => {
            print_tree(&compile(&expression, &limits)?);
            Ok(())
        }
        Commands::Functions => {
            for (name, usage) in functions::FUNCTIONS {
                println!("  {:<8} {}", name.cyan().bold(), usage);
            }
            Ok(())
        }
    }
}

fn resolve_options(limits: &LimitArgs) -> Result<Options> {
    let config = match &limits.config {
        Some(path) => Config::from_file(path)?,
        None => {
            let cwd = std::env::current_dir().context("Failed to determine working directory")?;
            Config::load(cwd)?
        }
    }
    .apply_env()?;

    if let Some(path) = &config.path {
        debug!(path = %path.display(), "using config file");
    }

    let mut options = config.into_options();
    if limits.untrusted {
        let preset = Options::untrusted();
        options.max_source_length = options.max_source_length.or(preset.max_source_length);
        options.max_ast_depth = options.max_ast_depth.or(preset.max_ast_depth);
        options.max_eval_operations = options.max_eval_operations.or(preset.max_eval_operations);
    }
    Ok(options)
}

fn compile(source: &str, limits: &LimitArgs) -> Result<CompiledExpression> {
    let compiler = Compiler::new()
        .with_options(resolve_options(limits)?)
        .with_registry(functions::registry()?);
    Ok(compiler.compile(source)?)
}

fn load_context(file: Option<PathBuf>, inline: Option<String>) -> Result<serde_json::Value> {
    if let Some(path) = file {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read context file: {}", path.display()))?;
        return serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {} as JSON", path.display()));
    }
    match inline {
        Some(json) => serde_json::from_str(&json).context("Failed to parse --context-json"),
        None => Ok(serde_json::Value::Object(Default::default())),
    }
}

fn check(expr: &CompiledExpression) -> Result<()> {
    let ast = expr.ast();
    println!("{} {}", "ok".green().bold(), ast);
    println!("  {:<12} {}", "nodes".bold(), visit::node_count(ast));
    println!("  {:<12} {}", "depth".bold(), visit::max_depth(ast));
    println!(
        "  {:<12} {}",
        "identifiers".bold(),
        expr.referenced_identifiers().join(", ")
    );

    let called = expr.called_functions();
    println!("  {:<12} {}", "functions".bold(), called.join(", "));
    for name in called.iter().filter(|name| !expr.registry().contains(name)) {
        println!(
            "{} '{}' is not a known function and will fail at evaluation",
            "warning:".yellow().bold(),
            name
        );
    }
    Ok(())
}

fn print_tree(expr: &CompiledExpression) {
    let mut stack = vec![(NodeRef::Expr(expr.ast()), 0usize)];
    while let Some((node, indent)) = stack.pop() {
        println!("{}{}", "  ".repeat(indent), describe(node));
        stack.extend(node.children().into_iter().rev().map(|child| (child, indent + 1)));
    }
}

fn describe(node: NodeRef<'_>) -> String {
    let expr = match node {
        NodeRef::Property(prop) if prop.shorthand => return "Property (shorthand)".to_string(),
        NodeRef::Property(_) => return "Property".to_string(),
        NodeRef::Expr(expr) => expr,
    };
    let detail = match &expr.kind {
        ExprKind::Literal { raw, .. } => raw.clone(),
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::Unary { op, .. } => op.as_str().to_string(),
        ExprKind::Binary { op, .. } => op.as_str().to_string(),
        ExprKind::Logical { op, .. } => op.as_str().to_string(),
        ExprKind::Member { computed: true, .. } => "[]".to_string(),
        ExprKind::Member { .. } => ".".to_string(),
        ExprKind::Array(items) => format!("{} items", items.len()),
        ExprKind::Object(props) => format!("{} properties", props.len()),
        ExprKind::Call { arguments, .. } => format!("{} arguments", arguments.len()),
        ExprKind::NullishCoalesce { .. } | ExprKind::Conditional { .. } => String::new(),
    };
    format!(
        "{} {} {}",
        expr.kind_name().bold(),
        detail,
        format!("@{}..{}", expr.span.start, expr.span.end).dimmed()
    )
}
