use clap::{Parser, Subcommand, ValueEnum};
use formbind::{
    get_at_path, parse_path, reduce, update_field, BindingConfig, FieldChange, FieldOptions,
    FormBinding, NegativeIndexPolicy, Value,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "formbind", about = "Inspect and edit JSON form state through paths")]
struct Args {
    /// JSON document holding the application state.
    #[arg(long, short, global = true, env = "FORMBIND_FILE")]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the segments of a parsed path.
    Parse { path: String },
    /// Print the value at a path; exits with 1 when absent.
    Get { path: String },
    /// Write a JSON value at a path and print the new document.
    Set {
        path: String,
        /// JSON text; anything that fails to parse is stored as a string.
        value: String,
        /// Form path the field path is relative to.
        #[arg(long, env = "FORMBIND_STORE_PATH", default_value = "")]
        store_path: String,
    },
    /// Print the props of a form field.
    Field {
        field: String,
        #[arg(long, env = "FORMBIND_STORE_PATH")]
        store_path: String,
        #[arg(long)]
        required: bool,
        #[arg(long, value_enum, env = "FORMBIND_NEGATIVE_INDEX", default_value_t = NegativeIndex::Placeholder)]
        negative_index: NegativeIndex,
        /// Child path suffix appended to the field path, e.g. "[-1].name".
        #[arg(long)]
        child: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NegativeIndex {
    Placeholder,
    FromEnd,
}

impl From<NegativeIndex> for NegativeIndexPolicy {
    fn from(value: NegativeIndex) -> Self {
        match value {
            NegativeIndex::Placeholder => NegativeIndexPolicy::Placeholder,
            NegativeIndex::FromEnd => NegativeIndexPolicy::FromEnd,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "formbind failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match args.command {
        Command::Parse { path } => {
            println!("{}", serde_json::to_string(&parse_path(&path))?);
        }
        Command::Get { path } => {
            let doc = load_state(args.file.as_ref())?;
            match get_at_path(&doc, &parse_path(&path)) {
                Some(value) => println!("{}", serde_json::to_string_pretty(value)?),
                None => {
                    tracing::info!(path = %path, "no value at path");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Set {
            path,
            value,
            store_path,
        } => {
            let doc = load_state(args.file.as_ref())?;
            let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            let next = reduce(&doc, &update_field(store_path, FieldChange { name: path, value }))?;
            println!("{}", serde_json::to_string_pretty(&next)?);
        }
        Command::Field {
            field,
            store_path,
            required,
            negative_index,
            child,
        } => {
            let doc = load_state(args.file.as_ref())?;
            let config = BindingConfig::new(store_path).with_negative_index(negative_index.into());
            let mut form = FormBinding::builder(config).build()?;
            form.sync(&doc);

            let mut options = FieldOptions::new();
            if required {
                options = options.required();
            }
            if let Some(child) = child {
                options = options.key(move |_, _| child.clone());
            }

            let props = form.field_props(&field, options)?;
            println!("{}", serde_json::to_string_pretty(props.props())?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_state(file: Option<&PathBuf>) -> Result<Value, Box<dyn std::error::Error>> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => std::io::read_to_string(std::io::stdin())?,
    };
    Ok(serde_json::from_str(&text)?)
}
