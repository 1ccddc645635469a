//! Event handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Navigation
    MoveUp,
    MoveDown,
    JumpToTop,
    JumpToBottom,

    // Tree operations
    ToggleExpand,

    // Directory navigation
    DrillDown,
    NavigateBack,

    // Remote operations
    /// Upload a local file into the current directory.
    Upload,
    /// Download the selected file.
    Download,
    /// Create a directory under the current one.
    CreateDirectory,
    /// Re-list the current directory.
    Refresh,

    // UI toggles
    FocusNextPane,
    ToggleHelp,
    ToggleTheme,

    // Application
    Cancel,
    Quit,
    ForceQuit,

    // No action
    None,
}

impl KeyAction {
    /// Convert a key event to an action.
    pub fn from_key_event(event: KeyEvent) -> Self {
        match (event.code, event.modifiers) {
            // Quit - only 'q' quits, Esc dismisses dialogs
            (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::ForceQuit,

            (KeyCode::Esc, _) => KeyAction::Cancel,

            // Navigation - vim style
            (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::MoveDown,
            (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::MoveUp,

            // Navigation - arrow keys
            (KeyCode::Down, _) => KeyAction::MoveDown,
            (KeyCode::Up, _) => KeyAction::MoveUp,

            // Jump
            (KeyCode::Char('g'), KeyModifiers::NONE) => KeyAction::JumpToTop,
            (KeyCode::Char('G'), KeyModifiers::SHIFT) => KeyAction::JumpToBottom,
            (KeyCode::Home, _) => KeyAction::JumpToTop,
            (KeyCode::End, _) => KeyAction::JumpToBottom,

            // Tree expand/collapse
            (KeyCode::Char('o'), KeyModifiers::NONE) => KeyAction::ToggleExpand,
            (KeyCode::Char('l'), KeyModifiers::NONE) => KeyAction::ToggleExpand,
            (KeyCode::Right, _) => KeyAction::ToggleExpand,

            // Remote operations
            (KeyCode::Char('u'), KeyModifiers::NONE) => KeyAction::Upload,
            (KeyCode::Char('d'), KeyModifiers::NONE) => KeyAction::Download,
            (KeyCode::Char('A'), KeyModifiers::SHIFT) => KeyAction::CreateDirectory,
            (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Refresh,

            // UI toggles
            (KeyCode::Char('?'), KeyModifiers::NONE) => KeyAction::ToggleHelp,
            (KeyCode::Char('t'), KeyModifiers::NONE) => KeyAction::ToggleTheme,
            (KeyCode::Tab, KeyModifiers::NONE) => KeyAction::FocusNextPane,

            // Directory navigation
            (KeyCode::Enter, _) => KeyAction::DrillDown,
            (KeyCode::Backspace, _) => KeyAction::NavigateBack,
            (KeyCode::Char('-'), KeyModifiers::NONE) => KeyAction::NavigateBack,

            _ => KeyAction::None,
        }
    }
}

/// A section of key bindings for the help display.
pub struct HelpSection {
    pub title: &'static str,
    pub bindings: Vec<KeyBinding>,
}

/// Key binding for display in help.
pub struct KeyBinding {
    pub keys: &'static str,
    pub description: &'static str,
}

/// Get all key bindings organized by section for help display.
pub fn get_help_sections() -> Vec<HelpSection> {
    vec![
        HelpSection {
            title: "Navigation",
            bindings: vec![
                KeyBinding { keys: "j/k ↑/↓", description: "Move up/down" },
                KeyBinding { keys: "Tab", description: "Switch tree/files pane" },
                KeyBinding { keys: "Enter", description: "Open directory / download file" },
                KeyBinding { keys: "Backspace/-", description: "Go to parent directory" },
                KeyBinding { keys: "g/G", description: "Jump to top/bottom" },
                KeyBinding { keys: "o/l →", description: "Expand/collapse tree node" },
            ],
        },
        HelpSection {
            title: "Remote Operations",
            bindings: vec![
                KeyBinding { keys: "u", description: "Upload a file here" },
                KeyBinding { keys: "d", description: "Download selected file" },
                KeyBinding { keys: "A", description: "Create directory (mkdir)" },
                KeyBinding { keys: "r", description: "Refresh current directory" },
            ],
        },
        HelpSection {
            title: "Display",
            bindings: vec![
                KeyBinding { keys: "t", description: "Toggle dark/light theme" },
                KeyBinding { keys: "?", description: "Show this help" },
                KeyBinding { keys: "q", description: "Quit" },
            ],
        },
    ]
}
