use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use monolithium_host::{Host, HostError, PackageAction};
use monolithium_project::{
    filter_items, matches_query, FolderItem, FolderStateStore, OpenFolderEntry, OpenTarget,
};
use monolithium_settings::{Settings, SettingsError, SettingsStore};

/// How the terminal host answers picker requests.
#[derive(Debug, Clone)]
pub enum Picker {
    /// Non-interactive: items matching any of the queries are chosen.
    Queries(Vec<String>),
    /// Numbered prompt on stderr, answer read from stdin.
    Prompt,
}

impl Picker {
    pub fn from_queries(queries: Vec<String>) -> Self {
        if queries.is_empty() {
            Picker::Prompt
        } else {
            Picker::Queries(queries)
        }
    }
}

/// Terminal rendition of the editor host.
/// 以終端機模擬的編輯器宿主。
///
/// The multi-root folder list lives in `<state_root>/.monolithium/folders.json`,
/// where the state root is the enclosing workspace root. Opening a package
/// prints the target and optionally hands it to an editor command.
pub struct TerminalHost {
    launch_dir: PathBuf,
    folders: FolderStateStore,
    settings: SettingsStore,
    picker: Picker,
    editor: Option<String>,
}

impl TerminalHost {
    pub fn new(
        launch_dir: PathBuf,
        state_root: &Path,
        settings: SettingsStore,
        picker: Picker,
    ) -> Self {
        let folders = FolderStateStore::for_workspace(state_root);
        Self {
            launch_dir,
            folders,
            settings,
            picker,
            editor: None,
        }
    }

    pub fn with_editor(mut self, editor: Option<String>) -> Self {
        self.editor = editor;
        self
    }

    fn prompt(&self, items: &[FolderItem], multi: bool) -> Result<Option<String>, HostError> {
        let mut stderr = io::stderr().lock();
        let write_err = |err: io::Error| HostError::with_source("failed to draw picker", err);
        for (index, item) in items.iter().enumerate() {
            let mark = match (multi, item.picked) {
                (true, true) => "[x] ",
                (true, false) => "[ ] ",
                (false, _) => "",
            };
            writeln!(
                stderr,
                "{:>3}) {mark}{}  {}",
                index + 1,
                item.label,
                item.description
            )
            .map_err(write_err)?;
        }
        let hint = if multi {
            "Select packages (numbers, '.' keeps checked, blank cancels): "
        } else {
            "Select a package (number or text, blank cancels): "
        };
        write!(stderr, "{hint}").map_err(write_err)?;
        stderr.flush().map_err(write_err)?;

        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|err| HostError::with_source("failed to read selection", err))?;
        let answer = line.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }
}

impl Host for TerminalHost {
    fn workspace_folders(&self) -> Result<Vec<OpenFolderEntry>, HostError> {
        self.folders
            .load()
            .map_err(|err| HostError::with_source("failed to read workspace folders", err))
    }

    fn launch_dir(&self) -> Option<PathBuf> {
        Some(self.launch_dir.clone())
    }

    fn settings(&self) -> Result<Settings, SettingsError> {
        self.settings.load()
    }

    fn pick_one(&mut self, items: &[FolderItem]) -> Result<Option<FolderItem>, HostError> {
        let query = match &self.picker {
            Picker::Queries(queries) => queries.first().cloned().unwrap_or_default(),
            Picker::Prompt => match self.prompt(items, false)? {
                Some(answer) => match parse_index(&answer, items.len()) {
                    Some(index) => return Ok(Some(items[index].clone())),
                    None => answer,
                },
                None => return Ok(None),
            },
        };
        let chosen = filter_items(items, &query).into_iter().next().cloned();
        if chosen.is_none() {
            tracing::info!(%query, "no package matches");
        }
        Ok(chosen)
    }

    fn pick_many(&mut self, items: &[FolderItem]) -> Result<Option<Vec<FolderItem>>, HostError> {
        match &self.picker {
            Picker::Queries(queries) => Ok(Some(
                items
                    .iter()
                    .filter(|item| queries.iter().any(|query| matches_query(item, query)))
                    .cloned()
                    .collect(),
            )),
            Picker::Prompt => {
                let Some(answer) = self.prompt(items, true)? else {
                    return Ok(None);
                };
                if answer == "." {
                    return Ok(Some(items.iter().filter(|item| item.picked).cloned().collect()));
                }
                let mut chosen = Vec::new();
                for token in answer
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|token| !token.is_empty())
                {
                    let index = parse_index(token, items.len()).ok_or_else(|| {
                        HostError::new(format!("'{token}' is not a number between 1 and {}", items.len()))
                    })?;
                    if !chosen.contains(&index) {
                        chosen.push(index);
                    }
                }
                chosen.sort_unstable();
                Ok(Some(chosen.into_iter().map(|index| items[index].clone()).collect()))
            }
        }
    }

    fn open_folder(&mut self, target: &OpenTarget, action: PackageAction) -> Result<(), HostError> {
        let path = target.path();
        println!("Opening {} in {action}", path.display());
        let Some(editor) = &self.editor else {
            return Ok(());
        };
        let window_flag = if action.new_window() {
            "--new-window"
        } else {
            "--reuse-window"
        };
        let status = Command::new(editor)
            .arg(window_flag)
            .arg(path)
            .status()
            .map_err(|err| HostError::with_source(format!("failed to launch `{editor}`"), err))?;
        if status.success() {
            Ok(())
        } else {
            Err(HostError::new(format!("`{editor}` exited with {status}")))
        }
    }

    fn update_workspace_folders(&mut self, folders: &[OpenFolderEntry]) -> Result<(), HostError> {
        self.folders
            .replace(folders)
            .map_err(|err| HostError::with_source("failed to update workspace folders", err))?;
        println!("Workspace folders ({}):", folders.len());
        for folder in folders {
            println!("  {}  {}", folder.name, folder.uri.display());
        }
        Ok(())
    }
}

/// One-based index typed at the prompt.
fn parse_index(text: &str, len: usize) -> Option<usize> {
    text.parse::<usize>()
        .ok()
        .filter(|index| (1..=len).contains(index))
        .map(|index| index - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_index_is_one_based_and_bounded() {
        assert_eq!(parse_index("1", 3), Some(0));
        assert_eq!(parse_index("3", 3), Some(2));
        assert_eq!(parse_index("0", 3), None);
        assert_eq!(parse_index("4", 3), None);
        assert_eq!(parse_index("core", 3), None);
    }

    #[test]
    fn empty_query_list_falls_back_to_prompt() {
        assert!(matches!(Picker::from_queries(Vec::new()), Picker::Prompt));
        assert!(matches!(
            Picker::from_queries(vec!["core".into()]),
            Picker::Queries(_)
        ));
    }
}
