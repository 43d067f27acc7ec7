mod backend;
mod update;
mod update_file_picker;


use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use studybuddy_core::{Session, SessionEvent, TaskKind};

use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// Which screen is currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Main,
    FilePicker,
}

/// State for the file picker screen.
#[derive(Debug, Clone)]
pub struct FilePickerState {
    /// Current directory being browsed.
    pub current_dir: PathBuf,
    /// Entries in the current directory (dirs first, then files).
    pub entries: Vec<FileEntry>,
    /// Cursor position in the entries list.
    pub cursor: usize,
}

/// A single entry in the file picker.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

impl FilePickerState {
    pub fn new() -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::in_dir(current_dir)
    }

    pub fn in_dir(dir: PathBuf) -> Self {
        let mut state = Self {
            current_dir: dir,
            entries: Vec::new(),
            cursor: 0,
        };
        state.refresh_entries();
        state
    }

    /// Refresh the entries list from the current directory.
    ///
    /// Only directories and files with a supported suffix are listed.
    pub fn refresh_entries(&mut self) {
        let mut entries = Vec::new();

        // Parent directory entry
        if let Some(parent) = self.current_dir.parent() {
            entries.push(FileEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
            });
        }

        if let Ok(read_dir) = std::fs::read_dir(&self.current_dir) {
            let mut dirs = Vec::new();
            let mut files = Vec::new();

            for entry in read_dir.flatten() {
                let path = entry.path();
                let name = entry.file_name().to_string_lossy().to_string();

                // Skip hidden files/dirs
                if name.starts_with('.') {
                    continue;
                }

                if path.is_dir() {
                    dirs.push(FileEntry {
                        name,
                        path,
                        is_dir: true,
                    });
                } else if studybuddy_ingest::is_supported_path(&path) {
                    files.push(FileEntry {
                        name,
                        path,
                        is_dir: false,
                    });
                }
            }

            dirs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
            files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

            entries.extend(dirs);
            entries.extend(files);
        }

        self.entries = entries;
        self.cursor = 0;
    }

    /// Enter the directory at cursor, or return false if not a directory.
    pub fn enter_directory(&mut self) -> bool {
        if let Some(entry) = self.entries.get(self.cursor)
            && entry.is_dir
        {
            self.current_dir = entry.path.clone();
            self.refresh_entries();
            return true;
        }
        false
    }

    /// The file under the cursor, if it is not a directory.
    pub fn file_at_cursor(&self) -> Option<&Path> {
        self.entries
            .get(self.cursor)
            .filter(|e| !e.is_dir)
            .map(|e| e.path.as_path())
    }
}

/// Main application state.
pub struct App {
    pub screen: Screen,
    /// Document and generation state; replaced on every transition.
    pub session: Session,
    /// Result tab shown in the results pane.
    pub result_tab: TaskKind,
    /// Vertical scroll of the results pane.
    pub scroll: u16,
    /// Transient message for a refused action, cleared by Esc or the next action.
    pub notice: Option<String>,
    pub tick: usize,
    pub theme: Theme,
    pub should_quit: bool,
    pub show_help: bool,
    /// Height of the visible results area (updated on draw, used for page up/down).
    pub visible_rows: usize,
    /// Channel to send commands to the backend listener.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
    pub file_picker: FilePickerState,
}

impl App {
    pub fn new(theme: Theme) -> Self {
        Self {
            screen: Screen::Main,
            session: Session::new(),
            result_tab: TaskKind::Summary,
            scroll: 0,
            notice: None,
            tick: 0,
            theme,
            should_quit: false,
            show_help: false,
            visible_rows: 20,
            backend_cmd_tx: None,
            file_picker: FilePickerState::new(),
        }
    }

    /// Feed one event through the session reducer.
    pub(crate) fn apply(&mut self, event: SessionEvent) {
        let session = std::mem::take(&mut self.session);
        self.session = session.apply(event);
    }

    /// Select `path` as the current document and start extracting it.
    pub fn select_file(&mut self, path: PathBuf) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        tracing::info!(file = %name, "file selected");

        self.apply(SessionEvent::FileSelected { name });
        self.scroll = 0;
        self.notice = None;

        let token = self.session.extraction_token();
        self.send(BackendCommand::Extract { path, token });
    }

    /// Start generating `task` if the session allows it.
    pub fn trigger(&mut self, task: TaskKind) {
        if let Err(e) = self.session.can_generate() {
            self.notice = Some(e.to_string());
            return;
        }

        self.apply(SessionEvent::GenerationStarted { task });
        self.notice = None;
        self.result_tab = task;
        self.scroll = 0;

        if let Some(request) = self.session.pending_request() {
            tracing::info!(task = %task, token = request.token, "generation requested");
            self.send(BackendCommand::Generate { request });
        }
    }

    fn send(&self, cmd: BackendCommand) {
        match &self.backend_cmd_tx {
            Some(tx) => {
                if tx.send(cmd).is_err() {
                    tracing::error!("backend listener is gone");
                }
            }
            None => tracing::debug!(?cmd, "no backend attached"),
        }
    }

    /// Number of lines the current result tab renders to.
    pub fn result_line_count(&self) -> usize {
        crate::view::results::lines(&self.session, self.result_tab, &self.theme).len()
    }

    /// Render the entire UI.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();

        match self.screen {
            Screen::FilePicker => crate::view::file_picker::render_in(f, self, area),
            Screen::Main => {
                let results = crate::view::main_screen::render_in(f, self, area);
                // Tab row plus the body's top and bottom borders
                self.visible_rows = results.height.saturating_sub(3) as usize;
            }
        }

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
    }
}
