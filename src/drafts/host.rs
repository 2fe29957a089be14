//! The editor surface the archiver drives.
//!
//! Everything here is implemented by the embedding editor shell. The core only
//! ever talks to buffers and windows through this trait, and every call runs on
//! the host's single event thread.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer:{}", self.0)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window:{}", self.0)
    }
}

/// Position of a buffer inside a window, used for index-addressed closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabIndex {
    pub group: usize,
    pub index: usize,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("stale buffer handle {0}")]
    StaleBuffer(BufferId),
    #[error("stale window handle {0}")]
    StaleWindow(WindowId),
    #[error("host command `{command}` failed: {reason}")]
    Command { command: String, reason: String },
}

pub trait Host {
    fn windows(&self) -> Vec<WindowId>;
    fn buffers(&self, window: WindowId) -> Vec<BufferId>;
    fn active_buffer(&self, window: WindowId) -> Option<BufferId>;
    fn focus_buffer(&mut self, window: WindowId, buffer: BufferId) -> Result<(), HostError>;

    fn buffer_window(&self, buffer: BufferId) -> Option<WindowId>;
    /// Backing file path as the host reports it, if the buffer has one.
    fn file_path(&self, buffer: BufferId) -> Option<String>;
    fn display_name(&self, buffer: BufferId) -> Option<String>;
    /// Content length in characters.
    fn size(&self, buffer: BufferId) -> usize;
    fn text(&self, buffer: BufferId) -> Result<String, HostError>;
    fn is_dirty(&self, buffer: BufferId) -> bool;
    /// With `true`, hides unsaved changes so closing does not prompt for a
    /// save. `false` makes them visible again.
    fn set_scratch(&mut self, buffer: BufferId, scratch: bool) -> Result<(), HostError>;
    fn syntax(&self, buffer: BufferId) -> Option<String>;
    fn encoding(&self, buffer: BufferId) -> Option<String>;

    fn window_folders(&self, window: WindowId) -> Vec<PathBuf>;
    fn window_has_project(&self, window: WindowId) -> bool;
    /// Directory holding the host's installed packages.
    fn packages_path(&self) -> Option<PathBuf>;

    fn tab_index(&self, window: WindowId, buffer: BufferId) -> Option<TabIndex>;
    fn close_by_index(&mut self, window: WindowId, at: TabIndex) -> Result<(), HostError>;
    fn close_buffer(&mut self, buffer: BufferId) -> Result<(), HostError>;

    fn new_buffer(&mut self, window: WindowId) -> Result<BufferId, HostError>;
    fn insert_text(&mut self, buffer: BufferId, text: &str) -> Result<(), HostError>;
    fn set_name(&mut self, buffer: BufferId, name: &str) -> Result<(), HostError>;
    fn set_syntax(&mut self, buffer: BufferId, syntax: &str) -> Result<(), HostError>;
    fn set_encoding(&mut self, buffer: BufferId, encoding: &str) -> Result<(), HostError>;

    fn status_message(&mut self, _text: &str) {}
}
