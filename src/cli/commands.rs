use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::config::ColorMode;

#[derive(Parser, Debug)]
#[command(name = "tq", about = concat!("tasq v", env!("CARGO_PKG_VERSION"), " - a plain-text todo list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use the store in the current directory
    #[arg(short = 'H', long, global = true)]
    pub here: bool,

    /// Use this store file
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// When to color output
    #[arg(long, global = true, value_enum, value_name = "WHEN")]
    pub color: Option<ColorMode>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task
    Add(AddArgs),
    /// Show tasks matching every query
    Filter(FilterArgs),
    /// Show matching tasks, or add the query as a task if none match
    Find(QueryArgs),
    /// Edit a task in $EDITOR
    Edit(QueryArgs),
    /// Mark tasks done
    Do(QueryArgs),
    /// Move done tasks back to todo
    Undo(QueryArgs),
    /// Delete every done task
    ClearDone(ClearDoneArgs),
    /// Show tasks with their details
    Details(QueryArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Task text (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub words: Vec<String>,
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Match case exactly
    #[arg(short = 's', long)]
    pub case_sensitive: bool,
    /// Substrings that must all occur
    #[arg(required = true, num_args = 1..)]
    pub queries: Vec<String>,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Substrings narrowing the candidates (case-insensitive)
    pub queries: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ClearDoneArgs {
    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}
