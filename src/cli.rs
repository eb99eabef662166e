//! CLI argument parsing for lanes.

use clap::{ArgGroup, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lanes",
    about = "Kanban boards from the terminal",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/lanes/logs/lanes.log"
)]
pub struct Cli {
    /// Base URL of the board API (default: config file, then LANES_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Create an account
    Signup {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// End the session
    Logout,

    /// List projects
    Projects,

    /// Create a project
    ProjectCreate {
        /// Project name
        name: String,
    },

    /// Rename a project
    ProjectRename {
        /// Project ID
        id: String,

        /// New name
        name: String,
    },

    /// Delete a project
    ProjectDelete {
        /// Project ID
        id: String,
    },

    /// Show a project's board
    Board {
        /// Project ID
        project: String,
    },

    /// Add an empty task to a column
    Add {
        /// Project ID
        project: String,

        /// Column ID
        column: String,
    },

    /// Delete a task
    Rm {
        /// Project ID
        project: String,

        /// Task ID
        task: String,
    },

    /// Replace a task's content
    Edit {
        /// Project ID
        project: String,

        /// Task ID
        task: String,

        /// New content
        content: String,
    },

    /// Drag a task onto another task or a column
    #[command(group(ArgGroup::new("target").required(true).args(["over_task", "over_column", "outside"])))]
    Move {
        /// Project ID
        project: String,

        /// Task ID to drag
        task: String,

        /// Drop onto this task (takes its column and position)
        #[arg(long)]
        over_task: Option<String>,

        /// Drop onto this column's body (keeps flat position)
        #[arg(long)]
        over_column: Option<String>,

        /// Release outside the board (nothing is saved)
        #[arg(long)]
        outside: bool,
    },
}
