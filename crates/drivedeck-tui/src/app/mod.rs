//! Application state and async event loop.

mod render;
pub mod state;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::{info, warn};

use drivedeck_api::{Gateway, GatewayError, HttpGateway};
use drivedeck_core::{
    path as remote_path, AuthSession, DirectoryTree, FileEntry, NavigationState, Settings,
};
use drivedeck_tasks::{TaskEvent, TaskId, TaskOrchestrator};

use crate::event::KeyAction;
use crate::theme::Theme;
use crate::ui::{flatten, TreeState, VisibleItem};

pub use state::{AppMode, LoginForm, Pane, TaskOutcome};

use state::{LoginField, PromptInput};

/// Result type for the application.
pub type AppResult<T = ()> = color_eyre::Result<T>;

/// Tick interval for the event loop in milliseconds.
const TICK_INTERVAL_MS: u64 = 250;

/// Builds a backend gateway for a session.
///
/// The default builds [`HttpGateway`]; tests substitute a stub so the
/// whole login-browse-operate flow runs without a server.
pub type GatewayFactory = Arc<dyn Fn(AuthSession) -> Arc<dyn Gateway> + Send + Sync>;

/// Main application state.
pub struct App {
    settings: Settings,
    mode: AppMode,
    focus: Pane,
    theme: Theme,

    login: LoginForm,
    login_task: Option<TaskId>,

    gateway: Option<Arc<dyn Gateway>>,
    gateway_factory: GatewayFactory,

    orchestrator: TaskOrchestrator<TaskOutcome>,
    task_rx: mpsc::Receiver<TaskEvent<TaskOutcome>>,
    /// Tree paths of in-flight child listings, so a failure can roll the
    /// node back to unloaded.
    pending_loads: HashMap<TaskId, String>,

    tree: DirectoryTree,
    tree_state: TreeState,
    nav: NavigationState,
    files: Vec<FileEntry>,
    file_selected: usize,

    prompt: PromptInput,
    /// File name captured when the save-as prompt opened.
    pending_download: Option<String>,

    status: String,
    error: Option<String>,
    needs_redraw: bool,
}

impl App {
    /// Create the application on the login screen.
    ///
    /// `base_url` is the already-resolved server address used to pre-fill
    /// the login form.
    pub fn new(settings: Settings, base_url: String) -> Self {
        let (orchestrator, task_rx) = TaskOrchestrator::new();
        Self {
            settings,
            mode: AppMode::Login,
            focus: Pane::default(),
            theme: Theme::default(),
            login: LoginForm::new(base_url),
            login_task: None,
            gateway: None,
            gateway_factory: Arc::new(|session| {
                Arc::new(HttpGateway::new(session)) as Arc<dyn Gateway>
            }),
            orchestrator,
            task_rx,
            pending_loads: HashMap::new(),
            tree: DirectoryTree::new(),
            tree_state: TreeState::new(),
            nav: NavigationState::new(),
            files: Vec::new(),
            file_selected: 0,
            prompt: PromptInput::default(),
            pending_download: None,
            status: "Not signed in".to_string(),
            error: None,
            needs_redraw: true,
        }
    }

    /// Replace how gateways are built.
    pub fn with_gateway_factory(mut self, factory: GatewayFactory) -> Self {
        self.gateway_factory = factory;
        self
    }

    /// Run the application with async event loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> AppResult<()> {
        let period = Duration::from_millis(TICK_INTERVAL_MS);
        let mut interval = tokio::time::interval(period);
        let mut events = EventStream::new();

        while self.mode != AppMode::Quit {
            if self.needs_redraw {
                terminal.draw(|frame| self.render(frame))?;
                self.needs_redraw = false;
            }

            tokio::select! {
                biased;

                Some(Ok(event)) = events.next() => {
                    if let Event::Key(key_event) = event {
                        if key_event.kind == KeyEventKind::Press {
                            self.handle_key(key_event);
                        }
                    }
                    self.needs_redraw = true;
                }

                Some(event) = self.task_rx.recv() => {
                    self.on_task_event(event);
                }

                _ = interval.tick() => {
                    // Periodic tick keeps the loop responsive while idle
                }
            }
        }

        Ok(())
    }

    // --- key handling -----------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            AppMode::Login => self.handle_login_key(key),
            AppMode::CreatingDirectory | AppMode::PickingUpload | AppMode::PickingDownload => {
                self.handle_prompt_key(key)
            }
            AppMode::Help => match KeyAction::from_key_event(key) {
                KeyAction::Quit | KeyAction::Cancel | KeyAction::ToggleHelp => {
                    self.mode = AppMode::Normal;
                }
                _ => {}
            },
            AppMode::Normal => {
                // A pending error modal eats the next key press.
                if self.error.is_some() {
                    self.error = None;
                    return;
                }
                let action = KeyAction::from_key_event(key);
                self.handle_action(action);
            }
            AppMode::Quit => {}
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        if self.login.authenticating {
            return;
        }
        match key.code {
            KeyCode::Esc => self.mode = AppMode::Quit,
            KeyCode::Tab | KeyCode::Down => self.login.focus = self.login.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.login.focus = self.login.focus.prev(),
            KeyCode::Enter => self.submit_login(),
            KeyCode::Char(' ') if self.login.focus == LoginField::Remember => {
                self.login.remember = !self.login.remember;
            }
            KeyCode::Backspace => {
                if let Some(field) = self.login.field_mut() {
                    field.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.login.field_mut() {
                    field.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.prompt.clear();
                self.pending_download = None;
                self.mode = AppMode::Normal;
            }
            KeyCode::Enter => {
                let input = self.prompt.take();
                let mode = std::mem::replace(&mut self.mode, AppMode::Normal);
                if input.trim().is_empty() {
                    self.pending_download = None;
                    return;
                }
                match mode {
                    AppMode::CreatingDirectory => self.request_create_directory(&input),
                    AppMode::PickingUpload => self.request_upload(Path::new(input.trim())),
                    AppMode::PickingDownload => {
                        if let Some(filename) = self.pending_download.take() {
                            self.request_download(&filename, Path::new(input.trim()));
                        }
                    }
                    _ => {}
                }
            }
            KeyCode::Backspace => self.prompt.pop(),
            KeyCode::Char(c) => self.prompt.push(c),
            _ => {}
        }
    }

    fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Quit | KeyAction::ForceQuit => self.mode = AppMode::Quit,
            KeyAction::ToggleHelp => self.mode = AppMode::Help,
            KeyAction::ToggleTheme => self.theme = self.theme.toggle(),
            KeyAction::FocusNextPane => self.focus = self.focus.next(),
            KeyAction::MoveUp => match self.focus {
                Pane::Tree => self.tree_state.move_up(1),
                Pane::Files => self.file_selected = self.file_selected.saturating_sub(1),
            },
            KeyAction::MoveDown => match self.focus {
                Pane::Tree => {
                    let max = self.visible_items().len();
                    self.tree_state.move_down(1, max);
                }
                Pane::Files => {
                    if self.file_selected + 1 < self.files.len() {
                        self.file_selected += 1;
                    }
                }
            },
            KeyAction::JumpToTop => match self.focus {
                Pane::Tree => self.tree_state.jump_to_top(),
                Pane::Files => self.file_selected = 0,
            },
            KeyAction::JumpToBottom => match self.focus {
                Pane::Tree => {
                    let max = self.visible_items().len();
                    self.tree_state.jump_to_bottom(max);
                }
                Pane::Files => self.file_selected = self.files.len().saturating_sub(1),
            },
            KeyAction::ToggleExpand => {
                if self.focus == Pane::Tree {
                    if let Some(item) = self.selected_tree_item() {
                        if item.is_directory() && self.tree_state.is_expanded(&item.path) {
                            self.tree_state.collapse(&item.path);
                        } else {
                            self.expand_path(&item.path);
                        }
                    }
                }
            }
            KeyAction::DrillDown => match self.focus {
                Pane::Tree => {
                    if let Some(item) = self.selected_tree_item() {
                        self.expand_path(&item.path);
                        self.load_directory(&item.path);
                    }
                }
                Pane::Files => self.open_download_prompt(),
            },
            KeyAction::NavigateBack => self.navigate_up(),
            KeyAction::Refresh => self.refresh(),
            KeyAction::Upload => {
                self.prompt.clear();
                self.mode = AppMode::PickingUpload;
            }
            KeyAction::Download => self.open_download_prompt(),
            KeyAction::CreateDirectory => {
                self.prompt.clear();
                self.mode = AppMode::CreatingDirectory;
            }
            KeyAction::Cancel | KeyAction::None => {}
        }
    }

    fn open_download_prompt(&mut self) {
        let Some(file) = self.files.get(self.file_selected) else {
            return;
        };
        let name = file.name.to_string();
        self.prompt.set(name.clone());
        self.pending_download = Some(name);
        self.mode = AppMode::PickingDownload;
    }

    // --- backend operations -----------------------------------------------

    /// Validate the login form and spawn the sign-in task.
    pub fn submit_login(&mut self) {
        if self.login.authenticating {
            return;
        }
        let base_url = self.login.base_url.trim().to_string();
        let username = self.login.username.trim().to_string();
        let password = self.login.password.clone();
        if base_url.is_empty() || username.is_empty() || password.is_empty() {
            self.login.error = Some("All fields are required".to_string());
            return;
        }

        self.login.error = None;
        self.login.authenticating = true;
        let remember = self.login.remember;
        // An unauthenticated gateway: login is the one call made without
        // a token.
        let gateway = (self.gateway_factory)(AuthSession::anonymous(base_url.clone()));
        self.login_task = self.orchestrator.spawn("Signing in...", Some("login"), async move {
            let token = gateway.authenticate(&username, &password).await?;
            Ok::<_, GatewayError>(TaskOutcome::LoggedIn {
                base_url,
                token,
                remember,
            })
        });
    }

    /// List `directory` and make it current on completion.
    pub fn load_directory(&mut self, directory: &str) {
        let Some(gateway) = self.gateway.clone() else {
            return;
        };
        let directory = remote_path::canonical(directory);
        let key = format!("list:{directory}");
        let dir = directory.clone();
        self.orchestrator
            .spawn("Loading directory...", Some(&key), async move {
                let files = gateway.list_files(&dir).await?;
                Ok::<_, GatewayError>(TaskOutcome::FilesListed {
                    directory: dir,
                    files,
                })
            });
    }

    /// Re-list the current directory and drop its cached subtree.
    pub fn refresh(&mut self) {
        let Some(gateway) = self.gateway.clone() else {
            return;
        };
        let directory = self.nav.current().to_string();
        let key = format!("refresh:{directory}");
        let dir = directory.clone();
        self.orchestrator
            .spawn("Refreshing...", Some(&key), async move {
                let files = gateway.list_files(&dir).await?;
                Ok::<_, GatewayError>(TaskOutcome::Refreshed {
                    directory: dir,
                    files,
                })
            });
    }

    /// Expand a tree node, fetching its children on first expansion.
    ///
    /// The cache's single-flight gate means re-expanding a node that is
    /// loading or already loaded issues no second request.
    pub fn expand_path(&mut self, path: &str) {
        let path = remote_path::canonical(path);
        self.tree_state.expand(&path);
        if !self.tree.begin_load(&path) {
            return;
        }
        let Some(gateway) = self.gateway.clone() else {
            self.tree.fail_load(&path);
            return;
        };
        let key = format!("expand:{path}");
        let dir = path.clone();
        let id = self
            .orchestrator
            .spawn("Loading subdirectories...", Some(&key), async move {
                let children = gateway.list_directories(&dir).await?;
                Ok::<_, GatewayError>(TaskOutcome::ChildrenListed {
                    directory: dir,
                    children,
                })
            });
        match id {
            Some(id) => {
                self.pending_loads.insert(id, path);
            }
            None => self.tree.fail_load(&path),
        }
    }

    /// Go to the parent of the current directory. No-op at the root.
    pub fn navigate_up(&mut self) {
        if self.nav.at_root() {
            return;
        }
        let parent = self.nav.parent();
        self.load_directory(&parent);
    }

    /// Create a directory under the current one.
    pub fn request_create_directory(&mut self, name: &str) {
        let name = name.trim().to_string();
        if name.is_empty() {
            self.error = Some("Directory name must not be empty".to_string());
            return;
        }
        let Some(gateway) = self.gateway.clone() else {
            return;
        };
        let parent = self.nav.current().to_string();
        let key = format!("mkdir:{parent}");
        let dir = parent.clone();
        self.orchestrator
            .spawn("Creating directory...", Some(&key), async move {
                gateway.create_directory(&dir, &name).await?;
                Ok::<_, GatewayError>(TaskOutcome::DirectoryCreated { parent: dir })
            });
    }

    /// Upload a local file into the current directory.
    pub fn request_upload(&mut self, local: &Path) {
        let Some(gateway) = self.gateway.clone() else {
            return;
        };
        let directory = self.nav.current().to_string();
        let key = format!("upload:{directory}");
        let dir = directory.clone();
        let local = local.to_path_buf();
        self.orchestrator
            .spawn("Uploading file...", Some(&key), async move {
                let file = gateway.upload_file(&dir, &local).await?;
                Ok::<_, GatewayError>(TaskOutcome::Uploaded {
                    directory: dir,
                    file,
                })
            });
    }

    /// Download `filename` from the current directory to a local path.
    pub fn request_download(&mut self, filename: &str, target: &Path) {
        let Some(gateway) = self.gateway.clone() else {
            return;
        };
        let directory = self.nav.current().to_string();
        let key = format!("download:{directory}/{filename}");
        let filename = filename.to_string();
        let target: PathBuf = target.to_path_buf();
        self.orchestrator
            .spawn("Downloading file...", Some(&key), async move {
                gateway.download_file(&directory, &filename, &target).await?;
                Ok::<_, GatewayError>(TaskOutcome::Downloaded { filename, target })
            });
    }

    // --- task completion --------------------------------------------------

    /// Apply one event from a background task.
    pub fn on_task_event(&mut self, event: TaskEvent<TaskOutcome>) {
        self.orchestrator.apply(&event);
        match event {
            TaskEvent::Started { .. } => {
                if let Some(message) = self.orchestrator.active_message() {
                    self.status = message.to_string();
                }
            }
            TaskEvent::Succeeded { id, outcome } => {
                self.pending_loads.remove(&id);
                self.status = "Ready".to_string();
                self.apply_outcome(outcome);
            }
            TaskEvent::Failed { id, message } => {
                if let Some(path) = self.pending_loads.remove(&id) {
                    self.tree.fail_load(&path);
                }
                if self.login_task == Some(id) {
                    self.login_task = None;
                    self.login.authenticating = false;
                    self.login.error = Some(message);
                } else {
                    warn!(%message, "operation failed");
                    self.error = Some(message);
                }
                self.status = "Error".to_string();
            }
        }
        self.needs_redraw = true;
    }

    fn apply_outcome(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::LoggedIn {
                base_url,
                token,
                remember,
            } => {
                info!("signed in");
                if remember {
                    self.settings.base_url = Some(base_url.clone());
                    if let Err(err) = self.settings.save() {
                        warn!(%err, "could not persist settings");
                    }
                }
                let session = AuthSession::new(base_url, Some(token));
                self.gateway = Some((self.gateway_factory)(session));
                self.login_task = None;
                self.login.authenticating = false;
                self.login.password.clear();
                self.mode = AppMode::Normal;

                // Fresh session, fresh cache.
                self.tree = DirectoryTree::new();
                self.tree_state = TreeState::new();
                self.load_directory(remote_path::ROOT);
                self.expand_path(remote_path::ROOT);
            }
            TaskOutcome::FilesListed { directory, files } => {
                self.files = files;
                self.file_selected = 0;
                self.nav.enter(&directory);
            }
            TaskOutcome::Refreshed { directory, files } => {
                self.files = files;
                self.file_selected = 0;
                self.nav.enter(&directory);
                self.tree.invalidate(&directory);
                self.tree_state.retain_cached(&self.tree);
            }
            TaskOutcome::ChildrenListed {
                directory,
                children,
            } => {
                self.tree.complete_load(&directory, children);
            }
            TaskOutcome::Uploaded { directory, file } => {
                self.status = format!("Uploaded {}", file.name);
                // Re-list so the new entry shows with server metadata.
                self.load_directory(&directory);
            }
            TaskOutcome::Downloaded { filename, target } => {
                self.status = format!("Saved {filename} to {}", target.display());
            }
            TaskOutcome::DirectoryCreated { parent } => {
                self.tree.invalidate(&parent);
                self.tree_state.retain_cached(&self.tree);
                self.expand_path(&parent);
                self.load_directory(&parent);
            }
        }
    }

    /// Apply task events until no task is outstanding.
    ///
    /// Headless equivalent of the run loop's receiver arm.
    pub async fn drain_tasks(&mut self) {
        while self.orchestrator.is_busy() {
            match self.task_rx.recv().await {
                Some(event) => self.on_task_event(event),
                None => break,
            }
        }
    }

    // --- accessors --------------------------------------------------------

    fn visible_items(&self) -> Vec<VisibleItem> {
        flatten(&self.tree, &self.tree_state)
    }

    fn selected_tree_item(&self) -> Option<VisibleItem> {
        self.visible_items()
            .get(self.tree_state.selected)
            .cloned()
    }

    /// Current screen.
    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// Listing of the current directory.
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// The cached directory tree.
    pub fn tree(&self) -> &DirectoryTree {
        &self.tree
    }

    /// Canonical path of the current directory.
    pub fn current_directory(&self) -> &str {
        self.nav.current()
    }

    /// Message of the pending error modal, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Status bar text.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Mutable access to the login form.
    pub fn login_mut(&mut self) -> &mut LoginForm {
        &mut self.login
    }
}
