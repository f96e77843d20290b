//! Command-line argument definitions using clap
//!
//! CLI argument structs carry the clap derives and convert into the core
//! parameter types, so core stays free of framework attributes:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → ProcessStore
//! ```

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use serde_json::Value;
use tollgate_core::{
    models::{ProcessData, Role, StatusFilter},
    params::{Id, ListProcesses, PreviewSteps, SaveDraft, SelectRole, SendToNext},
};

/// Role-gated approval workflow with SLA tracking
///
/// Processes move through a fixed sequence of steps, each owned by one role.
/// Select your role with `login`, then save and send the processes waiting
/// on you. Run `serve` to expose the same operations over MCP.
#[derive(Parser)]
#[command(version, about, name = "tollgate")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/tollgate/tollgate.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Seed two demo processes when the store is empty
    #[arg(long, global = true)]
    pub demo: bool,

    /// Prefix of generated process ids (default REQ)
    #[arg(long, global = true)]
    pub id_prefix: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Select the role acting in this session
    Login(LoginArgs),
    /// Forget the selected role
    Logout,
    /// Show the selected role
    Whoami,
    /// Manage processes
    #[command(alias = "p")]
    Process {
        #[command(subcommand)]
        command: ProcessCommands,
    },
    /// List open processes waiting on the selected role
    Tasks,
    /// Show dashboard counters
    Stats,
    /// Show the step catalog, optionally marking which steps apply to answers
    Steps(StepsArgs),
    /// Start the MCP server
    Serve,
}

/// Process subcommands
#[derive(Subcommand)]
pub enum ProcessCommands {
    /// Open a new process at the first step
    Create,
    /// Show a process with its data and history
    Show(IdArgs),
    /// List processes
    #[command(alias = "ls")]
    List(ListArgs),
    /// Save answers on the current step without advancing
    Save(SaveArgs),
    /// Send the current step to the next responsible role
    Send(SendArgs),
    /// Show the history of a process, oldest first
    History(IdArgs),
    /// Export a process as CSV
    Export(ExportArgs),
    /// Follow the SLA of a process' current step
    Watch(WatchArgs),
}

/// Select a role
#[derive(ClapArgs)]
pub struct LoginArgs {
    /// Role key (e.g. fiscal, primary_requester) or its title
    #[arg(value_parser = parse_role)]
    pub role: Role,
}

impl From<LoginArgs> for SelectRole {
    fn from(val: LoginArgs) -> Self {
        SelectRole { role: val.role }
    }
}

/// Address a single process
#[derive(ClapArgs)]
pub struct IdArgs {
    /// Process identifier, e.g. REQ-250114-003
    pub id: String,
}

impl From<IdArgs> for Id {
    fn from(val: IdArgs) -> Self {
        Id { id: val.id }
    }
}

/// List processes
#[derive(ClapArgs)]
pub struct ListArgs {
    /// Only open processes
    #[arg(long, conflicts_with = "completed")]
    pub pending: bool,
    /// Only closed processes
    #[arg(long)]
    pub completed: bool,
    /// Match id, requester name or objective
    #[arg(short, long)]
    pub search: Option<String>,
    /// Only processes waiting on this role
    #[arg(short, long, value_parser = parse_role)]
    pub responsible: Option<Role>,
}

impl From<ListArgs> for ListProcesses {
    fn from(val: ListArgs) -> Self {
        let status = if val.pending {
            StatusFilter::Pending
        } else if val.completed {
            StatusFilter::Completed
        } else {
            StatusFilter::All
        };

        ListProcesses {
            status,
            search: val.search,
            responsible: val.responsible,
        }
    }
}

/// Save a draft
#[derive(ClapArgs)]
pub struct SaveArgs {
    /// Process identifier
    pub id: String,
    /// Answers as key=value; values are read as JSON when possible
    #[arg(value_parser = parse_field, required = true)]
    pub fields: Vec<(String, Value)>,
    /// Save even when the selected role does not own the current step
    #[arg(long)]
    pub force: bool,
}

impl From<&SaveArgs> for SaveDraft {
    fn from(val: &SaveArgs) -> Self {
        SaveDraft {
            id: val.id.clone(),
            data: val.fields.iter().cloned().collect(),
        }
    }
}

/// Send to the next step
#[derive(ClapArgs)]
pub struct SendArgs {
    /// Process identifier
    pub id: String,
    /// Remarks for the next responsible role
    #[arg(short, long)]
    pub notes: Option<String>,
    /// Skip the role check and required-field validation
    #[arg(long)]
    pub force: bool,
}

impl From<&SendArgs> for SendToNext {
    fn from(val: &SendArgs) -> Self {
        SendToNext {
            id: val.id.clone(),
            notes: val.notes.clone(),
        }
    }
}

/// Export a process
#[derive(ClapArgs)]
pub struct ExportArgs {
    /// Process identifier
    pub id: String,
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Follow an SLA
#[derive(ClapArgs)]
pub struct WatchArgs {
    /// Process identifier
    pub id: String,
    /// Stop after this many refreshes (runs until Ctrl-C otherwise)
    #[arg(long)]
    pub ticks: Option<u32>,
    /// Seconds between refreshes
    #[arg(long, default_value_t = 1)]
    pub interval: u64,
}

/// Preview step activation
#[derive(ClapArgs)]
pub struct StepsArgs {
    /// Answers as key=value to evaluate activation against
    #[arg(long = "data", value_parser = parse_field)]
    pub fields: Vec<(String, Value)>,
}

impl From<StepsArgs> for PreviewSteps {
    fn from(val: StepsArgs) -> Self {
        PreviewSteps {
            data: val.fields.into_iter().collect::<ProcessData>(),
        }
    }
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse()
}

/// Parse `key=value`, reading the value as JSON when it is valid JSON.
pub fn parse_field(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{s}'"));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}
