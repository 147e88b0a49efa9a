use clap::{Parser as ClapParser, Subcommand};
use metarule::cli::{self, ApplyOptions, CheckOptions, CliError, OutputFormat, Status};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "metarule")]
#[command(about = "metarule - condition/action rules for editing YAML front matter")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate rule syntax without running anything
    Check {
        /// Condition to validate
        #[arg(short, long)]
        condition: Option<String>,

        /// Action to validate
        #[arg(short, long)]
        action: Option<String>,
    },

    /// Evaluate a condition against a document
    Eval {
        /// The condition to evaluate
        condition: String,

        /// YAML or JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Run an action against a document and print the result
    Apply {
        /// The action to execute
        action: String,

        /// Only run the action when this condition holds
        #[arg(short, long)]
        condition: Option<String>,

        /// YAML or JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Output format of the resulting document
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'metarule docs' to list categories)
        category: String,
    },

    /// Short tutorial
    Onboard,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { condition, action } => run_check(condition, action),
        Commands::Eval { condition, input } => run_eval(condition, input),
        Commands::Apply {
            action,
            condition,
            input,
            format,
            pretty,
        } => run_apply(action, condition, input, format, pretty),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(true)
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
            true
        }),
        Commands::Onboard => {
            print!("{}", cli::get_onboarding_content());
            Ok(true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    }
}

/// Use `--input` when given, otherwise read piped stdin
fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    match input {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn run_check(condition: Option<String>, action: Option<String>) -> Result<bool, CliError> {
    let checked = cli::execute_check(&CheckOptions { condition, action })?;
    if let Some(condition) = checked.condition {
        log::debug!("condition: {:?}", condition);
        println!("Condition syntax is valid");
    }
    if let Some(action) = checked.action {
        println!("Action syntax is valid ({} operation(s))", action.operations.len());
    }
    Ok(true)
}

fn run_eval(condition: String, input: Option<String>) -> Result<bool, CliError> {
    let input = read_input(input)?;
    let matched = cli::execute_eval(&condition, input.as_deref())?;
    println!("{}", matched);
    Ok(matched)
}

fn run_apply(
    action: String,
    condition: Option<String>,
    input: Option<String>,
    format: OutputFormat,
    pretty: bool,
) -> Result<bool, CliError> {
    let options = ApplyOptions {
        action,
        condition,
        input: read_input(input)?,
    };
    let report = cli::execute_apply(&options)?;

    eprintln!("{}", report.status);
    let data = match &report.result {
        Some(result) => {
            for change in &result.changes {
                eprintln!("  {}", change);
            }
            if let Some(warning) = &result.warning {
                eprintln!("  warning: {}", warning);
            }
            if let Some(error) = &result.error {
                eprintln!("  error: {}", error);
                return Ok(false);
            }
            &result.new_data
        }
        None => &report.document.data,
    };

    let rendered = cli::render_document(data, report.document.body.as_deref(), format, pretty)?;
    print!("{}", rendered);
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(report.status != Status::Error)
}
