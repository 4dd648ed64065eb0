use std::fs;
use std::path::{Path, PathBuf};

use canvas::animate::animate;
use canvas::doc::default_lineup;
use canvas::persist::{PersistError, Snapshot, export_file, import_file};
use canvas::remote::{NewPlay, PlayUpdate, PlaybookClient, RemoteError};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("play file: {0}")]
    Persist(#[from] PersistError),
    #[error("{path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("nothing to update; pass --name, --folder, or --file")]
    EmptyUpdate,
}

#[derive(Parser, Debug)]
#[command(name = "playbook", about = "Lacrosse playbook API client and play file tools")]
struct Cli {
    #[arg(long, env = "PLAYBOOK_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "PLAYBOOK_USER_ID")]
    user_id: Option<Uuid>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is up.
    Ping,
    Folders(FoldersCommand),
    Plays(PlaysCommand),
    /// Download a play as an export file.
    Export {
        play_id: Uuid,
        #[arg(long, default_value = ".", help = "Directory to write into")]
        out_dir: PathBuf,
    },
    /// Write a new play file with the default lineup.
    New {
        name: String,
        #[arg(long, default_value = ".", help = "Directory to write into")]
        out_dir: PathBuf,
    },
    /// Check a play file against the element schema.
    Validate { file: PathBuf },
    /// Print a play file's elements at a playback position.
    Animate {
        file: PathBuf,
        #[arg(long, default_value_t = 100.0, help = "Playback position, 0 to 100")]
        progress: f64,
    },
}

#[derive(Args, Debug)]
struct FoldersCommand {
    #[command(subcommand)]
    command: FoldersSubcommand,
}

#[derive(Subcommand, Debug)]
enum FoldersSubcommand {
    List,
    Create { name: String },
    Delete { folder_id: Uuid },
}

#[derive(Args, Debug)]
struct PlaysCommand {
    #[command(subcommand)]
    command: PlaysSubcommand,
}

#[derive(Subcommand, Debug)]
enum PlaysSubcommand {
    Recent {
        #[arg(long)]
        limit: Option<u32>,
    },
    List {
        folder_id: Uuid,
    },
    Get {
        play_id: Uuid,
    },
    /// Upload a play file into a folder.
    Create {
        #[arg(long)]
        folder: Uuid,
        #[arg(long)]
        file: PathBuf,
        #[arg(long, help = "Overrides the name stored in the file")]
        name: Option<String>,
    },
    Update {
        play_id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        folder: Option<Uuid>,
        #[arg(long, help = "Replace the canvas with this play file's elements")]
        file: Option<PathBuf>,
    },
    Delete {
        play_id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let client = || connect(&cli.base_url, cli.user_id);

    match cli.command {
        Command::Ping => run_ping(&client()?).await,
        Command::Folders(folders) => run_folders(&client()?, folders).await,
        Command::Plays(plays) => run_plays(&client()?, plays).await,
        Command::Export { play_id, out_dir } => {
            let play = client()?.get_play(play_id).await?;
            let path = write_export(&out_dir, &play.canvas, &play.name)?;
            println!("{}", path.display());
            Ok(())
        }
        Command::New { name, out_dir } => run_new(&name, &out_dir),
        Command::Validate { file } => run_validate(&file),
        Command::Animate { file, progress } => run_animate(&file, progress),
    }
}

fn connect(base_url: &str, user_id: Option<Uuid>) -> Result<PlaybookClient, CliError> {
    let client = PlaybookClient::new(base_url)?;
    Ok(match user_id {
        Some(user_id) => client.with_user(user_id),
        None => client,
    })
}

async fn run_ping(client: &PlaybookClient) -> Result<(), CliError> {
    let response = reqwest::get(client.url("/healthz")).await.map_err(RemoteError::from)?;
    let status = response.status();
    if !status.is_success() {
        return Err(RemoteError::Status { status: status.as_u16(), message: "health check failed".to_owned() }.into());
    }
    println!("ok");
    Ok(())
}

async fn run_folders(client: &PlaybookClient, folders: FoldersCommand) -> Result<(), CliError> {
    match folders.command {
        FoldersSubcommand::List => print_json(&client.list_folders().await?),
        FoldersSubcommand::Create { name } => print_json(&client.create_folder(&name).await?),
        FoldersSubcommand::Delete { folder_id } => {
            client.delete_folder(folder_id).await?;
            println!("deleted folder {folder_id}");
            Ok(())
        }
    }
}

async fn run_plays(client: &PlaybookClient, plays: PlaysCommand) -> Result<(), CliError> {
    match plays.command {
        PlaysSubcommand::Recent { limit } => print_json(&client.recent_plays(limit).await?),
        PlaysSubcommand::List { folder_id } => print_json(&client.folder_plays(folder_id).await?),
        PlaysSubcommand::Get { play_id } => print_json(&client.get_play(play_id).await?),
        PlaysSubcommand::Create { folder, file, name } => {
            let snapshot = read_play_file(&file)?;
            let name = name.unwrap_or(snapshot.play_name);
            let play = NewPlay { name: &name, folder_id: folder, canvas: &snapshot.elements };
            print_json(&client.create_play(&play).await?)
        }
        PlaysSubcommand::Update { play_id, name, folder, file } => {
            let snapshot = file.as_deref().map(read_play_file).transpose()?;
            let update = PlayUpdate {
                name: name.as_deref(),
                folder_id: folder,
                canvas: snapshot.as_ref().map(|s| s.elements.as_slice()),
            };
            if update.name.is_none() && update.folder_id.is_none() && update.canvas.is_none() {
                return Err(CliError::EmptyUpdate);
            }
            print_json(&client.update_play(play_id, &update).await?)
        }
        PlaysSubcommand::Delete { play_id } => {
            client.delete_play(play_id).await?;
            println!("deleted play {play_id}");
            Ok(())
        }
    }
}

// =============================================================================
// OFFLINE FILE TOOLS
// =============================================================================

fn run_validate(file: &Path) -> Result<(), CliError> {
    let snapshot = read_play_file(file)?;
    println!("{}", summarize(&snapshot));
    Ok(())
}

fn run_animate(file: &Path, progress: f64) -> Result<(), CliError> {
    let snapshot = read_play_file(file)?;
    print_json(&animate(&snapshot.elements, progress))
}

fn run_new(name: &str, out_dir: &Path) -> Result<(), CliError> {
    let path = write_export(out_dir, &default_lineup(), name)?;
    println!("{}", path.display());
    Ok(())
}

fn read_play_file(path: &Path) -> Result<Snapshot, CliError> {
    let contents = fs::read_to_string(path).map_err(|source| CliError::Io { path: path.to_owned(), source })?;
    Ok(import_file(&contents)?)
}

fn write_export(out_dir: &Path, elements: &[canvas::doc::Element], name: &str) -> Result<PathBuf, CliError> {
    let exported = export_file(elements, name)?;
    let path = out_dir.join(&exported.file_name);
    fs::write(&path, exported.contents).map_err(|source| CliError::Io { path: path.clone(), source })?;
    Ok(path)
}

/// One-line description of a valid play file.
fn summarize(snapshot: &Snapshot) -> String {
    let name = if snapshot.play_name.is_empty() { "(untitled)" } else { snapshot.play_name.as_str() };
    let arrows = snapshot.elements.iter().filter(|e| e.kind.is_arrow()).count();
    format!("{name}: {} elements, {arrows} arrows", snapshot.elements.len())
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
