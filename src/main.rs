use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cliptimer::clipboard::{default_channel, StdioChannel, TextChannel};
use cliptimer::domain::{format_hms, format_hms_blink, TaskId};
use cliptimer::engine::{SharedHistory, SystemClock, TaskStore, UndoHistory};
use cliptimer::persistence::{
    ensure_cliptimer_dir, history_file, init_local_dir, load_history, load_metadata, meta_file, save_history,
    save_metadata, tasks_file, JsonFileStore,
};
use cliptimer::text::SummaryLabels;
use cliptimer::ticker::{blink_tick, display_tick, Blink};
use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cliptimer")]
#[command(about = "Paste a task list, time one task at a time, copy the summary back", long_about = None)]
struct Cli {
    /// Use stdin/stdout instead of the system clipboard
    #[arg(long, global = true)]
    stdio: bool,

    /// Label of the total line in the summary
    #[arg(long, global = true)]
    label_working_time: Option<String>,

    /// Summary text when there are no tasks
    #[arg(long, global = true)]
    label_no_tasks: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Initialize a local .cliptimer directory in the current directory
    Init,
    /// Replace the task list with the clipboard text
    Paste,
    /// Merge the clipboard text (or --text) into the task list
    Append {
        #[arg(long)]
        text: Option<String>,
    },
    /// Copy the summary to the clipboard
    Copy,
    /// Copy the summary to the clipboard and empty the list
    Cut,
    /// Show the task list with live elapsed times
    List,
    /// Start a task, or pause it if it is running
    Toggle { task: String },
    /// Pause the running task
    Pause,
    /// Resume the last paused task
    Resume,
    /// Complete a task (the running one by default)
    Finish { task: Option<String> },
    /// Reopen a completed task
    Restart { task: String },
    /// Remove a task
    Delete { task: String },
    /// Revert the last change to the list
    Undo,
    /// Re-apply the last reverted change
    Redo,
    /// Edit the list as text; the running task is paused meanwhile
    Edit,
    /// Show the running task with a live clock until interrupted
    Watch,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    install_tracing();

    let command = cli.command.unwrap_or(Commands::List);
    if command == Commands::Init {
        let dir = init_local_dir()?;
        println!("Initialized cliptimer directory: {}", dir.display());
        println!("Run 'cliptimer paste' to load a task list.");
        return Ok(());
    }

    let mut labels = SummaryLabels::default();
    if let Some(label) = cli.label_working_time {
        labels.working_time = label;
    }
    if let Some(label) = cli.label_no_tasks {
        labels.no_tasks = label;
    }

    let mut session = Session::open(labels)?;
    let result = run(&mut session, command, cli.stdio);
    session.close()?;
    result
}

fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}

/// Store plus the side files that keep the timer and undo log between runs
struct Session {
    store: TaskStore,
    history: SharedHistory,
    meta_path: PathBuf,
    history_path: PathBuf,
}

impl Session {
    fn open(labels: SummaryLabels) -> Result<Self> {
        let dir = ensure_cliptimer_dir()?;
        let meta_path = meta_file(&dir);
        let history_path = history_file(&dir);

        let undo_history = load_history(&history_path).unwrap_or_else(|err| {
            warn!(error = %err, "could not load undo history, starting fresh");
            UndoHistory::default()
        });
        let history = SharedHistory::new(undo_history);

        let mut store = TaskStore::open(
            Box::new(SystemClock),
            Box::new(history.clone()),
            Box::new(JsonFileStore::new(tasks_file(&dir))),
        )
        .with_labels(labels);

        match load_metadata(&meta_path) {
            Ok(metadata) => store.restore_session(&metadata),
            Err(err) => warn!(error = %err, "could not load session metadata"),
        }

        Ok(Self {
            store,
            history,
            meta_path,
            history_path,
        })
    }

    fn close(&self) -> Result<()> {
        save_metadata(&self.meta_path, &self.store.session_metadata())
            .with_context(|| format!("Failed to save {}", self.meta_path.display()))?;
        save_history(&self.history_path, &self.history.snapshot())
            .with_context(|| format!("Failed to save {}", self.history_path.display()))?;
        Ok(())
    }
}

fn channel(stdio: bool) -> Box<dyn TextChannel> {
    if stdio {
        Box::new(StdioChannel)
    } else {
        default_channel()
    }
}

fn run(session: &mut Session, command: Commands, stdio: bool) -> Result<()> {
    let store = &mut session.store;

    match command {
        Commands::Init => {}
        Commands::Paste => {
            if store.paste_replace(channel(stdio).as_mut())? {
                print_tasks(store);
            } else {
                eprintln!("Clipboard holds no text");
            }
        }
        Commands::Append { text } => {
            match text {
                Some(text) => store.add_tasks(&text),
                None => {
                    if !store.paste_append(channel(stdio).as_mut())? {
                        eprintln!("Clipboard holds no text");
                        return Ok(());
                    }
                }
            }
            print_tasks(store);
        }
        Commands::Copy => {
            store.copy_summary(channel(stdio).as_mut())?;
            if !stdio {
                println!("Summary copied");
            }
        }
        Commands::Cut => {
            if store.cut_all(channel(stdio).as_mut())? {
                if !stdio {
                    println!("Summary copied, task list cleared");
                }
            } else {
                eprintln!("Nothing to cut");
            }
        }
        Commands::List => print_tasks(store),
        Commands::Toggle { task } => {
            let id = resolve_task(store, &task)?;
            store.toggle(id);
            print_tasks(store);
        }
        Commands::Pause => {
            store.pause_active();
            print_tasks(store);
        }
        Commands::Resume => {
            store.restart_last_paused();
            print_tasks(store);
        }
        Commands::Finish { task } => {
            match task {
                Some(task) => {
                    let id = resolve_task(store, &task)?;
                    store.finish_task(id);
                }
                None if store.has_active_task() => store.finish_active_task(),
                None => bail!("No task is running"),
            }
            print_tasks(store);
        }
        Commands::Restart { task } => {
            let id = resolve_task(store, &task)?;
            store.restart_task(id);
            print_tasks(store);
        }
        Commands::Delete { task } => {
            let id = resolve_task(store, &task)?;
            store.delete_task(id);
            print_tasks(store);
        }
        Commands::Undo => match store.undo() {
            Some(label) => println!("Undid: {label}"),
            None => eprintln!("Nothing to undo"),
        },
        Commands::Redo => match store.redo() {
            Some(label) => println!("Redid: {label}"),
            None => eprintln!("Nothing to redo"),
        },
        Commands::Edit => {
            let seed = store.begin_edit();
            let edited = if stdio {
                read_stdin()
            } else {
                edit_external(&seed)
            };
            match edited {
                Ok(text) => store.end_edit(&text),
                Err(err) => {
                    store.end_edit("");
                    return Err(err);
                }
            }
            print_tasks(store);
        }
        Commands::Watch => watch(store)?,
    }

    Ok(())
}

/// Resolve a 1-based position or an exact task name
fn resolve_task(store: &TaskStore, reference: &str) -> Result<TaskId> {
    if let Ok(position) = reference.parse::<usize>() {
        if let Some(task) = position.checked_sub(1).and_then(|i| store.tasks().get(i)) {
            return Ok(task.id);
        }
    }
    match store.find_by_name(reference) {
        Some(task) => Ok(task.id),
        None => bail!("No task matches '{reference}'"),
    }
}

fn print_tasks(store: &TaskStore) {
    let tasks = store.tasks();
    if tasks.is_empty() {
        println!("{}", store.labels().no_tasks);
        return;
    }

    for (index, task) in tasks.iter().enumerate() {
        let marker = if store.is_active(task.id) {
            "▶"
        } else if task.is_completed {
            "✓"
        } else {
            " "
        };
        println!(
            "{:>3}. {} {}  {}",
            index + 1,
            marker,
            task.name,
            format_hms(store.current_elapsed(task))
        );
    }
    println!();
    println!("{}: {}", store.labels().working_time, format_hms(store.total_elapsed()));
}

/// Redraw the running task in place; blink ticks while it runs, display
/// ticks while idle
fn watch(store: &TaskStore) -> Result<()> {
    let mut blink = Blink::default();
    let mut stdout = io::stdout();

    loop {
        let running = match store.active_task() {
            Some(task) => format!(
                "{}  {}",
                task.name,
                format_hms_blink(store.current_elapsed(task), blink.show_colons())
            ),
            None => "No task running".to_string(),
        };
        write!(
            stdout,
            "\r\x1b[2K{running}  ({}: {})",
            store.labels().working_time,
            format_hms(store.total_elapsed())
        )?;
        stdout.flush()?;

        if store.has_active_task() {
            std::thread::sleep(blink_tick());
            blink.tick(true);
        } else {
            std::thread::sleep(display_tick());
            blink.tick(false);
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read from stdin")?;
    Ok(text)
}

/// Let the user edit `seed` in $EDITOR and return the saved text
fn edit_external(seed: &str) -> Result<String> {
    let editor = env::var("EDITOR").unwrap_or_else(|_| {
        if cfg!(windows) {
            "notepad".to_string()
        } else {
            "vi".to_string()
        }
    });

    let mut temp_file = NamedTempFile::new().context("Failed to create a temporary file")?;
    temp_file.write_all(seed.as_bytes())?;
    let temp_path = temp_file.into_temp_path();

    let status = Command::new(&editor)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("Failed to launch editor '{editor}'"))?;
    if !status.success() {
        bail!("Editor '{editor}' exited with {status}");
    }

    fs::read_to_string(&temp_path).context("Failed to read the edited text")
}
