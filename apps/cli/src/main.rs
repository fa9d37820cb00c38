mod terminal;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use monolithium_discovery::{FsDiscoverer, PackageDiscoverer};
use monolithium_host::{CommandOutcome, Commands, Host, PackageAction};
use monolithium_project::{pre_populate, FolderItem};
use monolithium_settings::{workspace_settings_path, SettingsStore};
use tracing_subscriber::EnvFilter;

use crate::terminal::{Picker, TerminalHost};

const LOG_ENV: &str = "MONOLITHIUM_LOG";

#[derive(Parser)]
#[command(
    name = "monolithium",
    about = "Pick and open packages of a monorepo workspace",
    author,
    version
)]
struct Cli {
    /// 指定工作目錄；預設為目前目錄。 / Working directory (defaults to current directory).
    #[arg(long, global = true, value_name = "PATH")]
    workspace: Option<PathBuf>,
    /// 使用者設定檔，會被工作區設定覆寫。 / User settings file, overridden by workspace settings.
    #[arg(long, global = true, value_name = "FILE", env = "MONOLITHIUM_SETTINGS")]
    settings: Option<PathBuf>,
    /// 提高記錄詳細程度（可重複）。 / Increase log verbosity (repeatable).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// 列出工作區套件。 / List the packages of the surrounding workspace.
    List(ListArgs),
    /// 開啟單一套件。 / Open one package, preferring its workspace file.
    Open(OpenArgs),
    /// 以選取結果取代資料夾清單。 / Replace the folder list with the selected packages.
    Select(SelectArgs),
    /// 將選取的套件加入資料夾清單。 / Add the selected packages to the folder list.
    Add(SelectArgs),
    /// 顯示目前的資料夾清單。 / Show the current folder list.
    Folders,
}

#[derive(Args)]
struct ListArgs {
    /// 以 JSON 輸出。 / Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct OpenArgs {
    /// 在新視窗開啟。 / Open in a new window.
    #[arg(long)]
    new_window: bool,
    /// 以文字選取套件，不進入互動選單。 / Choose the package by text instead of prompting.
    #[arg(long, value_name = "QUERY")]
    pick: Option<String>,
    /// 交給此編輯器指令開啟。 / Editor command that receives the opened path.
    #[arg(long, value_name = "CMD")]
    editor: Option<String>,
}

#[derive(Args)]
struct SelectArgs {
    /// 以文字選取套件（可重複），不進入互動選單。 / Choose packages by text (repeatable) instead of prompting.
    #[arg(long, value_name = "QUERY")]
    pick: Vec<String>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Cli {
        workspace,
        settings,
        verbose,
        command,
    } = Cli::parse();
    init_tracing(verbose);

    let launch_dir = resolve_workspace(workspace)?;
    let state_root = state_root(&FsDiscoverer, &launch_dir);
    let settings = settings_store(settings, &state_root)?;
    let commands = Commands::new(FsDiscoverer);
    let host = |picker| TerminalHost::new(launch_dir.clone(), &state_root, settings.clone(), picker);

    match command {
        CliCommand::List(args) => execute_list(&commands, &host(Picker::Prompt), args.json),
        CliCommand::Open(args) => {
            let mut host =
                host(Picker::from_queries(args.pick.into_iter().collect())).with_editor(args.editor);
            let action = if args.new_window {
                PackageAction::NewWindow
            } else {
                PackageAction::CurrentWindow
            };
            report(commands.open_package(&mut host, action)?);
            Ok(())
        }
        CliCommand::Select(args) => {
            let mut host = host(Picker::from_queries(args.pick));
            report(commands.select_packages(&mut host, true)?);
            Ok(())
        }
        CliCommand::Add(args) => {
            let mut host = host(Picker::from_queries(args.pick));
            report(commands.select_packages(&mut host, false)?);
            Ok(())
        }
        CliCommand::Folders => {
            for folder in host(Picker::Prompt).workspace_folders()? {
                println!("{}\t{}", folder.name, folder.uri.display());
            }
            Ok(())
        }
    }
}

/// Directory holding `.monolithium/`: the workspace enclosing `launch_dir`,
/// else `launch_dir` itself.
fn state_root<D: PackageDiscoverer>(discoverer: &D, launch_dir: &Path) -> PathBuf {
    match discoverer.discover(launch_dir) {
        Ok(Some(workspace)) => workspace.root().to_path_buf(),
        Ok(None) => launch_dir.to_path_buf(),
        Err(err) => {
            tracing::debug!(%err, dir = %launch_dir.display(), "no workspace for state files");
            launch_dir.to_path_buf()
        }
    }
}

fn execute_list(commands: &Commands<FsDiscoverer>, host: &TerminalHost, json: bool) -> Result<()> {
    let items = match commands.package_folders(host)? {
        Some(items) => pre_populate(items, &host.workspace_folders()?),
        None => Vec::new(),
    };
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&items).context("serialize package list")?
        );
        return Ok(());
    }
    for item in &items {
        print_item(item);
    }
    Ok(())
}

fn print_item(item: &FolderItem) {
    let mark = if item.picked { "*" } else { " " };
    println!(
        "{mark} {}\t{}\t{}",
        item.label,
        item.description,
        item.root.display()
    );
}

fn report(outcome: CommandOutcome) {
    // Opened and replaced folders are printed by the host; aborts stay silent.
    if let CommandOutcome::Aborted(reason) = outcome {
        tracing::debug!(?reason, "nothing to do");
    }
}

fn settings_store(user: Option<PathBuf>, workspace_root: &Path) -> Result<SettingsStore> {
    let mut store = SettingsStore::new();
    if let Some(path) = user {
        store = store.with_layer(resolve_input_path(path)?);
    }
    Ok(store.with_layer(workspace_settings_path(workspace_root)))
}

fn init_tracing(verbose: u8) {
    let configured = [LOG_ENV, "RUST_LOG"]
        .into_iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.trim().is_empty());
    let filter = match configured {
        Some(value) => EnvFilter::new(value),
        None => EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn resolve_workspace(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => resolve_input_path(path),
        None => std::env::current_dir().context("determine current directory"),
    }
}

fn resolve_input_path(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()
            .context("determine current directory")?
            .join(path))
    }
}
