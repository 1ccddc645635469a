//! Application state types.

use std::path::PathBuf;

use drivedeck_core::{DirectoryEntry, FileEntry};

/// Which screen the application shows and which modal is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Login screen.
    Login,
    /// Two-pane browser.
    Normal,
    /// Browser with the "new directory" prompt open.
    CreatingDirectory,
    /// Browser with the "local file to upload" prompt open.
    PickingUpload,
    /// Browser with the "save as" prompt open.
    PickingDownload,
    /// Help overlay.
    Help,
    /// Exit requested.
    Quit,
}

/// Which pane has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Tree,
    Files,
}

impl Pane {
    /// Cycle focus to the other pane.
    pub fn next(self) -> Self {
        match self {
            Pane::Tree => Pane::Files,
            Pane::Files => Pane::Tree,
        }
    }
}

/// Focusable field of the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    BaseUrl,
    #[default]
    Username,
    Password,
    Remember,
}

impl LoginField {
    pub fn next(self) -> Self {
        match self {
            LoginField::BaseUrl => LoginField::Username,
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Remember,
            LoginField::Remember => LoginField::BaseUrl,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            LoginField::BaseUrl => LoginField::Remember,
            LoginField::Username => LoginField::BaseUrl,
            LoginField::Password => LoginField::Username,
            LoginField::Remember => LoginField::Password,
        }
    }
}

/// Login screen state.
#[derive(Debug)]
pub struct LoginForm {
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Persist the server address on successful login.
    pub remember: bool,
    pub focus: LoginField,
    /// A sign-in task is in flight; input is locked.
    pub authenticating: bool,
    pub error: Option<String>,
}

impl LoginForm {
    /// Create a form pre-filled with the resolved server address.
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            username: String::new(),
            password: String::new(),
            remember: false,
            focus: LoginField::default(),
            authenticating: false,
            error: None,
        }
    }

    /// Text buffer behind the focused field, if it has one.
    pub fn field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            LoginField::BaseUrl => Some(&mut self.base_url),
            LoginField::Username => Some(&mut self.username),
            LoginField::Password => Some(&mut self.password),
            LoginField::Remember => None,
        }
    }
}

/// One-line text input backing the modal prompts.
#[derive(Debug, Default)]
pub struct PromptInput {
    buffer: String,
}

impl PromptInput {
    pub fn push(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn pop(&mut self) {
        self.buffer.pop();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Take the buffer, leaving the prompt empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Pre-fill the prompt, e.g. with a suggested file name.
    pub fn set(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }
}

/// Result a background task hands back to the UI loop.
///
/// Workers only produce these; every mutation of tree, listing, and
/// session state happens when the loop applies the outcome.
#[derive(Debug)]
pub enum TaskOutcome {
    LoggedIn {
        base_url: String,
        token: String,
        remember: bool,
    },
    FilesListed {
        directory: String,
        files: Vec<FileEntry>,
    },
    /// Like `FilesListed`, but also discards the cached subtree so the
    /// tree pane re-fetches on next expand.
    Refreshed {
        directory: String,
        files: Vec<FileEntry>,
    },
    ChildrenListed {
        directory: String,
        children: Vec<DirectoryEntry>,
    },
    Uploaded {
        directory: String,
        file: FileEntry,
    },
    Downloaded {
        filename: String,
        target: PathBuf,
    },
    DirectoryCreated {
        parent: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_focus_cycles() {
        let mut field = LoginField::BaseUrl;
        for _ in 0..4 {
            field = field.next();
        }
        assert_eq!(field, LoginField::BaseUrl);
        assert_eq!(LoginField::BaseUrl.prev(), LoginField::Remember);
    }

    #[test]
    fn test_remember_field_has_no_text_buffer() {
        let mut form = LoginForm::new("http://localhost:8080/api".into());
        form.focus = LoginField::Remember;
        assert!(form.field_mut().is_none());
        form.focus = LoginField::Password;
        form.field_mut().unwrap().push('x');
        assert_eq!(form.password, "x");
    }

    #[test]
    fn test_prompt_take_resets_buffer() {
        let mut prompt = PromptInput::default();
        prompt.push('a');
        prompt.push('b');
        assert_eq!(prompt.take(), "ab");
        assert_eq!(prompt.as_str(), "");
    }
}
