use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use flowstudio_editor::NodeEditor;
use flowstudio_form::compile;
use flowstudio_schema::VariableSchemaDocument;
use flowstudio_store::{FsPersistence, Persistence};

/// Flowstudio - node variable schema tooling for workflow editors
#[derive(Parser)]
#[command(name = "flowstudio")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.flowstudio)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Inspect or validate a schema document
  Schema {
    #[command(subcommand)]
    target: SchemaTarget,
  },

  /// Work with a node's persisted variables
  Node {
    #[command(subcommand)]
    target: NodeTarget,
  },
}

#[derive(Subcommand)]
enum SchemaTarget {
  /// Print the compiled field descriptors for a schema document
  Fields {
    /// Path to the schema document (JSON)
    schema_file: PathBuf,
  },

  /// Validate a values object (read from stdin) against a schema document
  Validate {
    /// Path to the schema document (JSON)
    schema_file: PathBuf,
  },
}

#[derive(Subcommand)]
enum NodeTarget {
  /// Show a node's persisted schema document
  Show {
    /// The node ID to look up
    node_id: String,
  },

  /// Add a variable to a node (meta-form values read from stdin)
  Add {
    /// The node ID to modify
    node_id: String,
  },

  /// Remove a variable from a node
  Remove {
    /// The node ID to modify
    node_id: String,

    /// The variable key to remove
    #[arg(long)]
    key: String,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let data_dir = cli.data_dir.unwrap_or_else(|| {
    dirs::home_dir()
      .expect("could not determine home directory")
      .join(".flowstudio")
  });

  match cli.command {
    Some(Commands::Schema { target }) => match target {
      SchemaTarget::Fields { schema_file } => print_fields(schema_file)?,
      SchemaTarget::Validate { schema_file } => validate_values(schema_file)?,
    },
    Some(Commands::Node { target }) => match target {
      NodeTarget::Show { node_id } => show_node(node_id, data_dir)?,
      NodeTarget::Add { node_id } => add_variable(node_id, data_dir)?,
      NodeTarget::Remove { node_id, key } => remove_variable(node_id, key, data_dir)?,
    },
    None => {
      println!("flowstudio - use --help to see available commands");
    }
  }

  Ok(())
}

fn read_document(schema_file: &PathBuf) -> Result<VariableSchemaDocument> {
  let content = std::fs::read_to_string(schema_file)
    .with_context(|| format!("failed to read schema file: {}", schema_file.display()))?;

  let document: VariableSchemaDocument = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse schema file: {}", schema_file.display()))?;

  document.validate().context("schema document is invalid")?;
  Ok(document)
}

fn print_fields(schema_file: PathBuf) -> Result<()> {
  let document = read_document(&schema_file)?;
  let form = compile(&document, &serde_json::Map::new());

  println!("{}", serde_json::to_string_pretty(form.fields())?);
  Ok(())
}

fn validate_values(schema_file: PathBuf) -> Result<()> {
  let document = read_document(&schema_file)?;

  let values = read_values_from_stdin()?;
  eprintln!("Validating {} value(s)", values.len());

  let form = compile(&document, &values);
  let report = form.validate(&values);
  println!("{}", serde_json::to_string_pretty(&report)?);

  if !report.valid {
    std::process::exit(1);
  }
  Ok(())
}

fn show_node(node_id: String, data_dir: PathBuf) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { show_node_async(node_id, data_dir).await })
}

async fn show_node_async(node_id: String, data_dir: PathBuf) -> Result<()> {
  let persistence = FsPersistence::new(data_dir.join("schemas"));
  let document = persistence
    .load(&node_id)
    .await
    .context("failed to load node document")?;

  match document {
    Some(document) => {
      eprintln!(
        "Node {} has {} variable(s), {} required",
        node_id,
        document.properties.len(),
        document.required.len()
      );
      println!("{}", serde_json::to_string_pretty(&document)?);
    }
    None => {
      eprintln!("No schema stored for node {}", node_id);
    }
  }

  Ok(())
}

fn add_variable(node_id: String, data_dir: PathBuf) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { add_variable_async(node_id, data_dir).await })
}

async fn add_variable_async(node_id: String, data_dir: PathBuf) -> Result<()> {
  let values = read_values_from_stdin()?;

  let persistence = FsPersistence::new(data_dir.join("schemas"));
  let mut editor = NodeEditor::new(persistence);

  editor.select_node(&node_id, false).await?;
  editor.start_create()?;
  editor.submit(&values).await.context("submission rejected")?;

  let document = editor.document();
  eprintln!(
    "Variable added; node {} now has {} variable(s)",
    node_id,
    document.properties.len()
  );
  println!("{}", serde_json::to_string_pretty(&document)?);

  Ok(())
}

fn remove_variable(node_id: String, key: String, data_dir: PathBuf) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { remove_variable_async(node_id, key, data_dir).await })
}

async fn remove_variable_async(node_id: String, key: String, data_dir: PathBuf) -> Result<()> {
  let persistence = FsPersistence::new(data_dir.join("schemas"));
  let mut editor = NodeEditor::new(persistence);

  editor.select_node(&node_id, false).await?;
  editor
    .delete_variable(&key)
    .await
    .with_context(|| format!("failed to remove variable '{}'", key))?;

  eprintln!("Variable {} removed from node {}", key, node_id);
  println!("{}", serde_json::to_string_pretty(&editor.document())?);

  Ok(())
}

fn read_values_from_stdin() -> Result<serde_json::Map<String, serde_json::Value>> {
  use std::io::IsTerminal;

  if io::stdin().is_terminal() {
    // No stdin pipe, use the empty object
    Ok(serde_json::Map::new())
  } else {
    let mut input = String::new();
    io::stdin()
      .read_to_string(&mut input)
      .context("failed to read values from stdin")?;

    if input.trim().is_empty() {
      Ok(serde_json::Map::new())
    } else {
      serde_json::from_str(&input).context("failed to parse values JSON from stdin")
    }
  }
}
