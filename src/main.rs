//! Lanes CLI - kanban boards from the terminal.

use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail, eyre};
use lanes::session::SESSION_FILE;
use lanes::{
    AuthForm, AuthMode, Board, BoardApi, Capacity, CardEditor, Config, DragItem, DragOutcome, EditorAction, EditorKey,
    HttpClient, Id, ProjectList, Reconciler, Session,
};
use log::info;
use std::fmt::Display;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;

use cli::{Cli, Command};

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lanes")
}

fn setup_logging() -> Result<()> {
    let log_dir = data_dir().join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("lanes.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Describe a remote failure, noting when it ended the session.
fn remote_failure(session: &Session, err: impl Display) -> eyre::Report {
    if session.reload_count() > 0 {
        eyre!("{} (session ended, run `lanes login` again)", err)
    } else {
        eyre!("{}", err)
    }
}

fn require_login(session: &Session) -> Result<()> {
    if !session.is_authenticated() {
        bail!("Not logged in. Run `lanes login` first.");
    }
    Ok(())
}

fn format_count(count: usize) -> ColoredString {
    let text = count.to_string();
    match Capacity::of(count) {
        Capacity::Normal => text.dimmed(),
        Capacity::Busy => text.yellow(),
        Capacity::Overloaded => text.red(),
    }
}

fn print_board(board: &Board) {
    println!("{}", board.project_name().unwrap_or("Loading...").bold());

    for view in board.column_views() {
        println!();
        println!(
            "{} {} {}",
            format_count(view.count()),
            view.column.title.bold(),
            view.column.id.as_str().dimmed()
        );
        for task in &view.tasks {
            let content = if task.content.is_empty() {
                task.display_content().dimmed()
            } else {
                task.display_content().normal()
            };
            println!("  {} {}", task.id.as_str().cyan(), content);
        }
        if view.can_create() {
            println!("  {}", "+ Add task".dimmed());
        }
    }
}

async fn open_board(api: &Arc<dyn BoardApi>, session: &Arc<Session>, project: &str) -> Result<Board> {
    let mut board = Board::new(Arc::clone(api), Arc::clone(session));
    board
        .activate(Some(Id::from(project)))
        .await
        .map_err(|e| remote_failure(session, e))?;
    Ok(board)
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(&Config::default_path()).context("Failed to load config")?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }

    let session = Arc::new(Session::restore(&data_dir().join(SESSION_FILE)).context("Failed to restore session")?);
    let api: Arc<dyn BoardApi> =
        Arc::new(HttpClient::new(&config, session.cookie().as_deref()).context("Failed to create API client")?);
    let mut projects = ProjectList::new(Reconciler::new(Arc::clone(&api), Arc::clone(&session)));

    match cli.command {
        Command::Login { email, password } => {
            let mut form = AuthForm::new();
            form.email = email;
            form.password = password;
            form.submit(api.as_ref(), &session).await?;
            println!("{} Logged in as {}", "✓".green(), form.email);
        }

        Command::Signup { name, email, password } => {
            let mut form = AuthForm::new();
            form.mode = AuthMode::SignUp;
            form.name = name;
            form.email = email;
            form.password = password;
            form.submit(api.as_ref(), &session).await?;
            println!("{} Account created, now run `lanes login`", "✓".green());
        }

        Command::Logout => {
            require_login(&session)?;
            projects.sign_out().await.map_err(|e| remote_failure(&session, e))?;
            println!("{} Logged out", "✓".green());
        }

        Command::Projects => {
            require_login(&session)?;
            projects.refresh().await.map_err(|e| remote_failure(&session, e))?;

            if projects.projects().is_empty() {
                println!("{}", "No projects yet".dimmed());
            } else {
                for project in projects.projects() {
                    println!("{} {}", project.id.as_str().cyan(), project.name);
                }
            }
        }

        Command::ProjectCreate { name } => {
            require_login(&session)?;
            if !projects.create(&name).await.map_err(|e| remote_failure(&session, e))? {
                bail!("Project name cannot be empty");
            }
            println!("{} Created project {}", "✓".green(), name);
        }

        Command::ProjectRename { id, name } => {
            require_login(&session)?;
            projects
                .rename(&Id::from(id.as_str()), &name)
                .await
                .map_err(|e| remote_failure(&session, e))?;
            println!("{} Renamed {} to {}", "✓".green(), id.cyan(), name);
        }

        Command::ProjectDelete { id } => {
            require_login(&session)?;
            projects
                .delete(&Id::from(id.as_str()))
                .await
                .map_err(|e| remote_failure(&session, e))?;
            println!("{} Deleted project {}", "✓".green(), id.cyan());
        }

        Command::Board { project } => {
            require_login(&session)?;
            let board = open_board(&api, &session, &project).await?;
            print_board(&board);
        }

        Command::Add { project, column } => {
            require_login(&session)?;
            let mut board = open_board(&api, &session, &project).await?;
            board
                .create_task(&Id::from(column))
                .await
                .map_err(|e| remote_failure(&session, e))?;
            print_board(&board);
        }

        Command::Rm { project, task } => {
            require_login(&session)?;
            let mut board = open_board(&api, &session, &project).await?;
            board
                .delete_task(&Id::from(task))
                .await
                .map_err(|e| remote_failure(&session, e))?;
            print_board(&board);
        }

        Command::Edit { project, task, content } => {
            require_login(&session)?;
            let mut board = open_board(&api, &session, &project).await?;
            let Some(current) = board.tasks().iter().find(|t| t.id == task.as_str()) else {
                bail!("Task not found: {}", task);
            };

            let mut editor = CardEditor::new();
            editor.open(current);
            editor.input(content);
            match editor.key(EditorKey::Enter { shift: false }) {
                EditorAction::Save { id, content } => {
                    board
                        .update_task(&id, &content)
                        .await
                        .map_err(|e| remote_failure(&session, e))?;
                }
                EditorAction::Continue | EditorAction::Close => {
                    println!("{} Content unchanged, nothing saved", "→".blue());
                }
            }
            print_board(&board);
        }

        Command::Move {
            project,
            task,
            over_task,
            over_column,
            outside: _,
        } => {
            require_login(&session)?;
            let mut board = open_board(&api, &session, &project).await?;

            if !board.on_drag_start(&DragItem::task(task.as_str())) {
                bail!("Task not found: {}", task);
            }
            let target = over_task
                .map(DragItem::task)
                .or_else(|| over_column.map(DragItem::column));

            board.on_drag_over(target.as_ref());
            let outcome = board
                .on_drag_end(target.as_ref())
                .await
                .map_err(|e| remote_failure(&session, e))?;

            match outcome {
                DragOutcome::Persisted => println!("{} Moved {}", "✓".green(), task.cyan()),
                DragOutcome::Kept | DragOutcome::Ignored => {
                    println!("{} Released outside the board, nothing saved", "→".blue())
                }
            }
            print_board(&board);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    let rt = tokio::runtime::Runtime::new().context("Failed to create runtime")?;
    if let Err(e) = rt.block_on(run(cli)) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
