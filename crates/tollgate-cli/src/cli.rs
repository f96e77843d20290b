//! Command handlers for the terminal interface
//!
//! Each handler converts clap arguments into core parameters, calls the
//! [`ProcessStore`] and renders the markdown result. Role gating lives here:
//! the store records whatever it is asked to, so `save` and `send` check
//! that the selected role owns the current step unless `--force` is given.

use std::{io::Write, time::Duration};

use anyhow::{bail, Context, Result};
use jiff::Timestamp;
use log::{info, warn};
use tollgate_core::{
    display::{
        CreateResult, History, LocalDateTime, OperationStatus, ProcessSummaries, StepPreview,
        TransitionResult, UpdateResult,
    },
    export,
    models::ProcessSummary,
    params::{Id, ListProcesses, PreviewSteps, SaveDraft, SelectRole, SendToNext},
    ProcessStore, SlaTier, SlaWatch,
};

use crate::{
    args::{
        Commands, ExportArgs, IdArgs, ListArgs, LoginArgs, ProcessCommands, SaveArgs, SendArgs,
        StepsArgs, WatchArgs,
    },
    mcp::{run_stdio_server, TollgateMcpServer},
    renderer::TerminalRenderer,
};

/// Terminal front end over a process store
pub struct Cli {
    store: ProcessStore,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(store: ProcessStore, renderer: TerminalRenderer) -> Self {
        Self { store, renderer }
    }

    /// Dispatch a command. Without one, open processes are listed.
    pub async fn run(mut self, command: Option<Commands>) -> Result<()> {
        match command {
            Some(Commands::Serve) => {
                info!("Starting Tollgate MCP server");
                return run_stdio_server(TollgateMcpServer::new(self.store))
                    .await
                    .context("MCP server failed");
            }
            Some(Commands::Login(args)) => self.login(args)?,
            Some(Commands::Logout) => self.logout()?,
            Some(Commands::Whoami) => self.whoami()?,
            Some(Commands::Process { command }) => self.handle_process_command(command).await?,
            Some(Commands::Tasks) => self.my_tasks()?,
            Some(Commands::Stats) => self.stats()?,
            Some(Commands::Steps(args)) => self.steps(args)?,
            None => self.list_processes(ListArgs {
                pending: true,
                completed: false,
                search: None,
                responsible: None,
            })?,
        }

        self.finish()
    }

    async fn handle_process_command(&mut self, command: ProcessCommands) -> Result<()> {
        match command {
            ProcessCommands::Create => self.create_process(),
            ProcessCommands::Show(args) => self.show_process(args),
            ProcessCommands::List(args) => self.list_processes(args),
            ProcessCommands::Save(args) => self.save_draft(args),
            ProcessCommands::Send(args) => self.send_to_next(args),
            ProcessCommands::History(args) => self.history(args),
            ProcessCommands::Export(args) => self.export(args),
            ProcessCommands::Watch(args) => self.watch(args).await,
        }
    }

    fn login(&mut self, args: LoginArgs) -> Result<()> {
        let params = SelectRole::from(args);
        self.store.select_role(&params);
        self.renderer.show(&OperationStatus::success(format!(
            "Acting as {} ({})",
            params.role.title(),
            params.role
        )));
        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        self.store.clear_role();
        self.renderer.show(&OperationStatus::success("Role cleared"));
        Ok(())
    }

    fn whoami(&self) -> Result<()> {
        let status = match self.store.current_role() {
            Some(role) => OperationStatus::success(format!("{} ({role})", role.title())),
            None => OperationStatus::failure("No role selected, run `tollgate login <role>`"),
        };
        self.renderer.show(&status);
        Ok(())
    }

    fn create_process(&mut self) -> Result<()> {
        let process = self.store.create_process();
        self.renderer.show(&CreateResult::new(process));
        Ok(())
    }

    fn show_process(&self, args: IdArgs) -> Result<()> {
        let process = self.store.require_process(&Id::from(args))?;
        self.renderer.show(process);
        Ok(())
    }

    fn list_processes(&self, args: ListArgs) -> Result<()> {
        let params = ListProcesses::from(args);
        let summaries = self.store.list_summaries(&params);
        self.renderer.section("Processes", &summaries);
        Ok(())
    }

    fn my_tasks(&self) -> Result<()> {
        let Some(role) = self.store.current_role() else {
            bail!("No role selected, run `tollgate login <role>` first");
        };

        let now = Timestamp::now();
        let summaries = ProcessSummaries(
            self.store
                .my_tasks()
                .into_iter()
                .map(|p| ProcessSummary::at(p, now))
                .collect(),
        );
        self.renderer
            .section(&format!("Waiting on {}", role.title()), &summaries);
        Ok(())
    }

    fn stats(&self) -> Result<()> {
        self.renderer.section("Dashboard", &self.store.stats());
        Ok(())
    }

    fn steps(&self, args: StepsArgs) -> Result<()> {
        let params = PreviewSteps::from(args);
        self.renderer
            .section("Steps", &StepPreview::for_data(&params.data));
        Ok(())
    }

    fn save_draft(&mut self, args: SaveArgs) -> Result<()> {
        let params = SaveDraft::from(&args);
        self.ensure_editable(&params.id, args.force)?;

        let changes = params.data.keys().cloned().collect();
        let process = self.store.save_draft(&params)?;
        self.renderer
            .show(&UpdateResult::with_changes(process, changes));
        Ok(())
    }

    fn send_to_next(&mut self, args: SendArgs) -> Result<()> {
        let params = SendToNext::from(&args);
        self.ensure_editable(&params.id, args.force)?;

        let id = Id {
            id: params.id.clone(),
        };
        if args.force {
            if let Err(e) = self.store.validate_current_step(&id) {
                warn!("Sending anyway: {e}");
            }
        } else {
            self.store.validate_current_step(&id)?;
        }

        let transition = self.store.send_to_next(&params)?;
        let process = self.store.require_process(&id)?.clone();
        self.renderer
            .show(&TransitionResult::new(process, transition));
        Ok(())
    }

    fn history(&self, args: IdArgs) -> Result<()> {
        let process = self.store.require_process(&Id::from(args))?;
        self.renderer.section(
            &format!("History of {}", process.id),
            &History::oldest_first(process),
        );
        Ok(())
    }

    fn export(&self, args: ExportArgs) -> Result<()> {
        let process = self.store.require_process(&Id { id: args.id })?;
        let csv = export::to_csv(process)?;

        match args.output {
            Some(path) => {
                std::fs::write(&path, &csv)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                self.renderer.show(&OperationStatus::success(format!(
                    "Exported {} to {}",
                    process.id,
                    path.display()
                )));
            }
            None => std::io::stdout()
                .write_all(&csv)
                .context("Failed to write CSV to stdout")?,
        }
        Ok(())
    }

    async fn watch(&self, args: WatchArgs) -> Result<()> {
        let process = self.store.require_process(&Id { id: args.id })?;
        if process.closed {
            self.renderer
                .show(&OperationStatus::success(format!("{} is closed", process.id)));
            return Ok(());
        }

        let mut watch = SlaWatch::spawn(
            process.current_timing().copied(),
            Duration::from_secs(args.interval.max(1)),
        );
        let title = tollgate_core::catalog::definition(process.current_step_id).title;
        self.renderer
            .render(&format!("# {} at {title}\n\n", process.id));
        self.renderer.render(&format!("- {}\n", watch.current()));
        if watch.current().tier == SlaTier::Undetermined {
            return Ok(());
        }

        let mut remaining = args.ticks;
        loop {
            if remaining == Some(0) {
                break;
            }
            tokio::select! {
                status = watch.changed() => {
                    let Some(status) = status else { break };
                    self.renderer.render(&format!(
                        "- {}: {status}\n",
                        LocalDateTime(&Timestamp::now())
                    ));
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Stopped watching {}", process.id);
                    break;
                }
            }
            remaining = remaining.map(|n| n - 1);
        }

        watch.stop();
        Ok(())
    }

    /// Refuse edits by a role that does not own the current step.
    fn ensure_editable(&self, id: &str, force: bool) -> Result<()> {
        let id = Id { id: id.to_string() };
        if force {
            self.store.require_process(&id)?;
            warn!("Skipping role check for {}", id.id);
            return Ok(());
        }

        self.store
            .ensure_editable(&id)
            .context("Use `tollgate login <role>` to act as the owner, or pass --force")?;
        Ok(())
    }

    /// Retry a snapshot write that failed during the command.
    fn finish(mut self) -> Result<()> {
        if self.store.is_dirty() {
            self.store
                .flush()
                .context("Changes could not be saved and were lost")?;
        }
        Ok(())
    }
}
