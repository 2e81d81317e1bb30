use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "habitus", version, author, about = "Track habits against a weekly target and keep your streaks honest")]
pub struct Cli {
    /// Use this database file instead of the default data directory
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
        /// Target days per week (1-7)
        #[arg(long)]
        target: Option<i64>,
    },
    /// Change a habit's name, description or target
    Edit {
        /// Habit id or name
        habit: String,
        #[arg(long)]
        name: Option<String>,
        /// New description (an empty string clears it)
        #[arg(long)]
        description: Option<String>,
        /// Target days per week (1-7)
        #[arg(long)]
        target: Option<i64>,
    },
    /// Delete a habit and all of its completions
    Remove {
        /// Habit id or name
        habit: String,
    },
    /// List habits, newest first
    List {
        /// Only habits whose name contains this text
        #[arg(long)]
        search: Option<String>,
        /// Only habits completed today
        #[arg(long)]
        completed_today: bool,
    },
    /// Mark a habit as completed
    Done {
        /// Habit id or name
        habit: String,
        /// Date to mark (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove a completion
    Undo {
        /// Habit id or name
        habit: String,
        /// Date to clear (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Show the Monday-Sunday week for a habit
    Week {
        /// Habit id or name
        habit: String,
        /// Any date inside the week to show, defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show consecutive-day streaks
    Streak {
        /// Habit id or name
        habit: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show weekly streaks and completion rates, or totals for all habits
    Stats {
        /// Habit id or name; omit for totals across all habits
        habit: Option<String>,
        /// Weeks included in the weekly completion rate
        #[arg(long)]
        weeks: Option<usize>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration
    Config {
        /// Write the defaults to the config file if it does not exist yet
        #[arg(long)]
        init: bool,
    },
}
