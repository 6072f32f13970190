//! Command-line interface for DynUI
//!
//! One-shot commands operate on the stored configuration and save after each
//! accepted change. `edit` starts an interactive session reading
//! `<path> <value>` lines from stdin.

use crate::config::{
    parse_document, schema, validate_document, AppSettings, FileStorage, KeyValueStorage,
    MemoryStorage, PersistenceAdapter, ValidationSeverity,
};
use crate::logging::{init_logging, LogConfig};
use crate::models::{Configuration, FieldPath, FieldValue};
use crate::services::{
    presenter_for_name, ConfigStore, EditorHandle, EditorSession, RenderSelector, SessionConfig,
};
use crate::ui::html_page;
use crate::{DynUiError, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};

/// DynUI command-line interface
#[derive(Parser, Debug)]
#[command(name = "dynui")]
#[command(about = "Edit a page style configuration and preview it as HTML")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "DynUI Team")]
pub struct DynUiCli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Settings file path
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Directory holding the stored configuration
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is loaded or saved
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Enable JSON output for machine-readable results
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the current configuration
    Show,

    /// List every editable field with its constraint and default
    Fields,

    /// Print one field
    Get {
        /// Dotted field path, e.g. button.radius
        path: String,
    },

    /// Set one field and save
    Set {
        /// Dotted field path, e.g. button.radius
        path: String,

        /// New value; numbers are clamped into the field range
        value: String,
    },

    /// Restore the default configuration and save
    Reset {
        /// Confirm discarding the current configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Write ui-config-<layout>.json
    Export {
        /// Target directory (defaults to the configured export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Merge a JSON document into the configuration and save
    Import {
        /// JSON file to import
        file: PathBuf,
    },

    /// Report how a JSON document would be imported without applying it
    Validate {
        /// JSON file to check
        file: PathBuf,
    },

    /// Render the active layout to HTML
    Preview {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render with this layout instead of the configured one
        #[arg(short, long)]
        layout: Option<String>,
    },

    /// Interactive editing session on stdin
    Edit {
        /// Preview file rewritten after every change
        #[arg(short, long)]
        preview: Option<PathBuf>,
    },
}

/// One line of input in an `edit` session
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Set { path: String, value: String },
    Show,
    Reset,
    Export { dir: Option<PathBuf> },
    Import { file: PathBuf },
    Help,
    Quit,
}

impl ReplCommand {
    /// Parse one input line; the value is the rest of the line so colours and
    /// font stacks may contain spaces
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let command = match (head, rest) {
            ("quit" | "exit", _) => ReplCommand::Quit,
            ("help", _) => ReplCommand::Help,
            ("show", _) => ReplCommand::Show,
            ("reset", _) => ReplCommand::Reset,
            ("export", "") => ReplCommand::Export { dir: None },
            ("export", dir) => ReplCommand::Export {
                dir: Some(PathBuf::from(dir)),
            },
            ("import", "") => return Err("usage: import <file>".to_string()),
            ("import", file) => ReplCommand::Import {
                file: PathBuf::from(file),
            },
            (path, "") => return Err(format!("missing value for '{}'", path)),
            (path, value) => ReplCommand::Set {
                path: path.to_string(),
                value: value.to_string(),
            },
        };
        Ok(Some(command))
    }
}

const REPL_HELP: &str = "\
<path> <value>   set one field, e.g. `button.radius 20`
show             print the configuration
reset            restore defaults
export [dir]     write ui-config-<layout>.json
import <file>    merge a JSON document
quit             save and leave";

/// CLI command executor
pub struct DynUiCliExecutor {
    store: ConfigStore,
    adapter: Arc<PersistenceAdapter>,
    settings: AppSettings,
    json_output: bool,
}

impl DynUiCliExecutor {
    /// Load the stored configuration and, when autosave is on, save every change
    pub fn new(adapter: Arc<PersistenceAdapter>, settings: AppSettings, json_output: bool) -> Self {
        let mut store = ConfigStore::new(adapter.load());
        if settings.autosave {
            adapter.attach(&mut store);
        }

        Self {
            store,
            adapter,
            settings,
            json_output,
        }
    }

    pub fn current(&self) -> Arc<Configuration> {
        self.store.get()
    }

    /// Execute a CLI command
    pub async fn execute(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Show => self.print_config(&self.store.get())?,
            Commands::Fields => self.list_fields()?,
            Commands::Get { path } => self.get_field(&path)?,
            Commands::Set { path, value } => self.set_field(&path, value)?,
            Commands::Reset { force } => {
                if !force {
                    return Err(DynUiError::ConfirmationRequired(
                        "reset discards the current configuration; pass --force".to_string(),
                    )
                    .into());
                }
                let config = self.store.reset();
                self.print_config(&config)?;
            }
            Commands::Export { output } => {
                let dir = output.unwrap_or_else(|| self.settings.export_dir.clone());
                let path = self.export_to(&dir)?;
                self.print_path("exported", &path)?;
            }
            Commands::Import { file } => {
                let bytes = tokio::fs::read(&file).await?;
                let config = crate::trace_performance!("import", {
                    self.adapter.import_document(&mut self.store, &bytes)
                })?;
                info!(file = %file.display(), "Imported configuration");
                self.print_config(&config)?;
            }
            Commands::Validate { file } => self.validate_file(&file).await?,
            Commands::Preview { output, layout } => self.preview(output, layout).await?,
            Commands::Edit { preview } => {
                let preview = preview.unwrap_or_else(|| self.settings.preview_path());
                self.edit(preview).await?;
            }
        }

        Ok(())
    }

    fn list_fields(&self) -> Result<()> {
        if self.json_output {
            let fields: Vec<_> = schema::fields()
                .iter()
                .map(|spec| {
                    serde_json::json!({
                        "path": spec.path,
                        "constraint": spec.constraint.to_string(),
                        "default": spec.default_value().to_json(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&fields)?);
        } else {
            for spec in schema::fields() {
                println!(
                    "{:<26} {:<40} default {}",
                    spec.path,
                    spec.constraint.to_string(),
                    spec.default_value()
                );
            }
        }
        Ok(())
    }

    fn get_field(&self, path: &str) -> Result<()> {
        let spec = schema::lookup(&FieldPath::from(path))?;
        let value = spec.read(&self.store.get());
        if self.json_output {
            let field = serde_json::json!({ "path": spec.path, "value": value.to_json() });
            println!("{}", serde_json::to_string_pretty(&field)?);
        } else {
            println!("{}", value);
        }
        Ok(())
    }

    fn set_field(&mut self, path: &str, value: String) -> Result<()> {
        let path = FieldPath::from(path);
        let config = self.store.apply(&path, &FieldValue::from(value))?;
        let written = schema::lookup(&path)?.read(&config);
        debug!(path = %path, value = %written, "Field updated");

        if self.json_output {
            let field = serde_json::json!({ "path": path.dotted(), "value": written.to_json() });
            println!("{}", serde_json::to_string_pretty(&field)?);
        } else {
            println!("{} = {}", path, written);
        }
        Ok(())
    }

    fn export_to(&self, dir: &Path) -> Result<PathBuf> {
        let document = self.adapter.export_document(&self.store.get())?;
        Ok(document.write_to(dir)?)
    }

    async fn validate_file(&self, file: &Path) -> Result<()> {
        let bytes = tokio::fs::read(file).await?;
        let document = parse_document(&bytes)?;
        let issues = validate_document(&document);

        if self.json_output {
            println!("{}", serde_json::to_string_pretty(&issues)?);
        } else if issues.is_empty() {
            println!("{}: no issues", file.display());
        } else {
            for issue in &issues {
                let tag = match issue.severity {
                    ValidationSeverity::Error => "error",
                    ValidationSeverity::Warning => "warning",
                };
                println!("{:<8} {:<26} {}", tag, issue.path, issue.message);
            }
        }
        Ok(())
    }

    async fn preview(&self, output: Option<PathBuf>, layout: Option<String>) -> Result<()> {
        let config = self.store.get();
        let presenter = match layout {
            Some(name) => presenter_for_name(&name),
            None => RenderSelector::new(&config).active(),
        };
        let html = html_page(presenter, &config);

        match output {
            Some(path) => {
                tokio::fs::write(&path, html).await?;
                self.print_path("preview", &path)?;
            }
            None => print!("{}", html),
        }
        Ok(())
    }

    async fn edit(&self, preview: PathBuf) -> Result<()> {
        if let Some(parent) = preview.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let session = EditorSession::spawn(
            Configuration::clone(&self.store.get()),
            Arc::clone(&self.adapter),
            SessionConfig {
                preview_path: Some(preview.clone()),
                autosave: self.settings.autosave,
                ..SessionConfig::default()
            },
        );
        let handle = session.handle();
        eprintln!("Editing; preview at {}. Type `help` for commands.", preview.display());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            match ReplCommand::parse(&line) {
                Ok(Some(ReplCommand::Quit)) => break,
                Ok(Some(command)) => {
                    if let Err(e) = self.run_repl_command(&handle, command).await {
                        eprintln!("error: {}", e);
                    }
                }
                Ok(None) => {}
                Err(message) => eprintln!("error: {}", message),
            }
        }

        session.shutdown().await?;
        Ok(())
    }

    async fn run_repl_command(&self, handle: &EditorHandle, command: ReplCommand) -> Result<()> {
        match command {
            ReplCommand::Set { path, value } => {
                let field = FieldPath::from(path.as_str());
                let config = handle.set(field.clone(), value).await?;
                println!("{} = {}", field, schema::lookup(&field)?.read(&config));
            }
            ReplCommand::Show => self.print_config(&*handle.snapshot().await?)?,
            ReplCommand::Reset => {
                handle.reset().await?;
                println!("reset to defaults");
            }
            ReplCommand::Export { dir } => {
                let dir = dir.unwrap_or_else(|| self.settings.export_dir.clone());
                let path = handle.export().await?.write_to(&dir)?;
                println!("exported {}", path.display());
            }
            ReplCommand::Import { file } => {
                let bytes = tokio::fs::read(&file).await?;
                handle.import(bytes).await?;
                println!("imported {}", file.display());
            }
            ReplCommand::Help => println!("{}", REPL_HELP),
            ReplCommand::Quit => {}
        }
        Ok(())
    }

    fn print_config(&self, config: &Configuration) -> Result<()> {
        if self.json_output {
            println!("{}", config.to_json_pretty()?);
        } else {
            for spec in schema::fields() {
                println!("{} = {}", spec.path, spec.read(config));
            }
        }
        Ok(())
    }

    fn print_path(&self, action: &str, path: &Path) -> Result<()> {
        if self.json_output {
            let result = serde_json::json!({ action: path.display().to_string() });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{} {}", action, path.display());
        }
        Ok(())
    }
}

/// Storage selected by the global flags
pub fn open_storage(settings: &AppSettings, ephemeral: bool) -> Arc<dyn KeyValueStorage> {
    if ephemeral {
        Arc::new(MemoryStorage::new())
    } else {
        Arc::new(FileStorage::in_dir(settings.storage_dir.clone()))
    }
}

/// Run the CLI interface
pub async fn run_cli() -> Result<()> {
    let cli = DynUiCli::parse();

    let log_config = LogConfig::from_env().with_verbosity(cli.verbose);
    if let Err(e) = init_logging(&log_config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let mut settings = AppSettings::load(cli.settings.as_deref())?;
    if let Some(storage_dir) = cli.storage_dir {
        settings.storage_dir = storage_dir;
    }
    debug!(?settings, "Resolved settings");

    let adapter = Arc::new(PersistenceAdapter::new(open_storage(&settings, cli.ephemeral)));
    let mut executor = DynUiCliExecutor::new(adapter, settings, cli.json);

    if let Err(e) = executor.execute(cli.command).await {
        if cli.json {
            let error_json = serde_json::json!({
                "error": true,
                "message": e.to_string()
            });
            println!("{}", serde_json::to_string_pretty(&error_json)?);
        } else {
            error!("Command failed: {:#}", e);
            eprintln!("error: {:#}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}
