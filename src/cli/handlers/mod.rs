use std::env;
use std::io::{self, Write};

use chrono::{Local, NaiveDateTime};
use crossterm::tty::IsTty;
use tracing::debug;

use crate::cli::commands::*;
use crate::cli::prompt::{Chooser, PromptChooser};
use crate::io::backup::write_backup;
use crate::io::config_io::{load_config, resolve_store};
use crate::io::editor::{edit_text, resolve_editor_command};
use crate::io::store_io::{LoadStatus, StoreFile, load_store, save_store};
use crate::model::config::{ColorMode, Config};
use crate::model::store::TaskStore;
use crate::ops::search::{Category, search};
use crate::render::views::Renderer;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let config = load_config()?;
    let cwd = env::current_dir()?;
    let file = resolve_store(&config, cli.store.as_deref(), cli.here, &cwd);
    debug!(path = %file.path.display(), format = ?file.format, "using store");

    let now = Local::now().naive_local();
    let mut session = Session::open(config, file, cli.color, now);
    let mut chooser = PromptChooser::stdio();
    let mut out = io::stdout().lock();
    session.run(cli.command, &mut chooser, &mut out)?;
    session.finish()
}

/// Whether rendered output gets ANSI styling
pub fn use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => env::var_os("NO_COLOR").is_none() && io::stdout().is_tty(),
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One invocation: load once, run one command, save once if anything
/// changed.
pub struct Session {
    store: TaskStore,
    file: StoreFile,
    status: LoadStatus,
    config: Config,
    renderer: Renderer,
    mutated: bool,
}

impl Session {
    pub fn open(config: Config, file: StoreFile, color: Option<ColorMode>, now: NaiveDateTime) -> Self {
        let (store, status) = load_store(&file, now);
        let color = use_color(color.unwrap_or(config.color));
        Session {
            store,
            file,
            status,
            config,
            renderer: Renderer::new(now, color),
            mutated: false,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_mutated(&self) -> bool {
        self.mutated
    }

    pub fn run(
        &mut self,
        command: Option<Commands>,
        chooser: &mut dyn Chooser,
        out: &mut dyn Write,
    ) -> CmdResult {
        match command {
            None => self.cmd_show(out),
            Some(Commands::Add(args)) => self.cmd_add(args),
            Some(Commands::Filter(args)) => self.cmd_filter(args, out),
            Some(Commands::Find(args)) => self.cmd_find(args, out),
            Some(Commands::Edit(args)) => self.cmd_edit(args, chooser),
            Some(Commands::Do(args)) => self.cmd_do(args, chooser),
            Some(Commands::Undo(args)) => self.cmd_undo(args, chooser),
            Some(Commands::ClearDone(args)) => self.cmd_clear_done(args, chooser),
            Some(Commands::Details(args)) => self.cmd_details(args, out),
        }
    }

    /// Save when the command changed the store or the store was just
    /// migrated. Backups follow changes only.
    pub fn finish(mut self) -> CmdResult {
        if !self.mutated && self.status != LoadStatus::Migrated {
            return Ok(());
        }
        let blob = save_store(&mut self.store, &self.file)?;
        if self.mutated && self.config.backups {
            write_backup(&self.file, &blob, self.store.now())?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read commands
    // -----------------------------------------------------------------------

    fn cmd_show(&self, out: &mut dyn Write) -> CmdResult {
        writeln!(out, "{}", self.renderer.render_short(&self.store))?;
        Ok(())
    }

    fn cmd_filter(&self, args: FilterArgs, out: &mut dyn Write) -> CmdResult {
        let view = self
            .renderer
            .render_search(&self.store, &args.queries, args.case_sensitive);
        writeln!(out, "{}", view)?;
        Ok(())
    }

    fn cmd_details(&self, args: QueryArgs, out: &mut dyn Write) -> CmdResult {
        let view = self.renderer.render_details(&self.store, &args.queries);
        if !view.is_empty() {
            writeln!(out, "{}", view)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Write commands
    // -----------------------------------------------------------------------

    fn cmd_add(&mut self, args: AddArgs) -> CmdResult {
        let text = args.words.join(" ");
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        self.store.add(text);
        self.mutated = true;
        Ok(())
    }

    /// Show matching todo tasks; with no match, add the query as a task
    fn cmd_find(&mut self, args: QueryArgs, out: &mut dyn Write) -> CmdResult {
        let hits = search(&self.store, &args.queries, false, Category::Todo);
        if hits.is_empty() {
            let text = args.queries.join(" ");
            let text = text.trim();
            if !text.is_empty() {
                self.store.add(text);
                self.mutated = true;
                eprintln!("added: {}", text);
            }
        }
        let view = self.renderer.render_search(&self.store, &args.queries, false);
        writeln!(out, "{}", view)?;
        Ok(())
    }

    fn cmd_edit(&mut self, args: QueryArgs, chooser: &mut dyn Chooser) -> CmdResult {
        let picked = self.pick(&args.queries, Category::Todo, "Edit:", chooser)?;
        let Some(task) = picked.into_iter().next() else {
            return Ok(());
        };

        let editor = resolve_editor_command(self.config.editor.as_deref());
        let edited = edit_text(&editor, &task)?;
        let grammar = self.store.grammar();
        let blocks = grammar.block_split(&grammar.normalize(&edited));
        if blocks.len() == 1 && blocks[0] == task {
            debug!("task unchanged after edit");
            return Ok(());
        }

        self.store.edit(&[task], blocks);
        self.mutated = true;
        Ok(())
    }

    fn cmd_do(&mut self, args: QueryArgs, chooser: &mut dyn Chooser) -> CmdResult {
        for task in self.pick(&args.queries, Category::Todo, "Mark done:", chooser)? {
            self.store.do_task(&task);
            self.mutated = true;
        }
        Ok(())
    }

    fn cmd_undo(&mut self, args: QueryArgs, chooser: &mut dyn Chooser) -> CmdResult {
        for task in self.pick(&args.queries, Category::Done, "Undo:", chooser)? {
            self.store.undo(&task);
            self.mutated = true;
        }
        Ok(())
    }

    fn cmd_clear_done(&mut self, args: ClearDoneArgs, chooser: &mut dyn Chooser) -> CmdResult {
        if self.store.done().is_empty() {
            eprintln!("nothing to clear");
            return Ok(());
        }
        let question = format!("Clear {} done task(s)?", self.store.done().len());
        if args.yes || chooser.confirm(&question)? {
            self.store.clear_done();
            self.mutated = true;
        }
        Ok(())
    }

    /// Narrow `category` by `queries` and let the user choose. The chosen
    /// texts are cloned so the store can be mutated afterwards.
    fn pick(
        &self,
        queries: &[String],
        category: Category,
        title: &str,
        chooser: &mut dyn Chooser,
    ) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        let candidates: Vec<String> = search(&self.store, queries, false, category)
            .into_iter()
            .map(str::to_string)
            .collect();
        if candidates.is_empty() {
            eprintln!("no matching tasks");
            return Ok(Vec::new());
        }

        let labels: Vec<String> = candidates
            .iter()
            .map(|task| self.store.info_or_derive(task).header)
            .collect();
        let picked = chooser.choose(title, &labels)?.unwrap_or_default();
        Ok(picked
            .into_iter()
            .filter_map(|i| candidates.get(i).cloned())
            .collect())
    }
}
