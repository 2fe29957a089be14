//! In-memory editor used by the unit tests.

use crate::drafts::host::{BufferId, Host, HostError, TabIndex, WindowId};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct FakeBuffer {
    pub window: Option<WindowId>,
    pub file_path: Option<String>,
    pub name: Option<String>,
    pub text: String,
    /// Unsaved changes exist. Hidden from `is_dirty` while `scratch` is set.
    pub dirty: bool,
    pub scratch: bool,
    pub syntax: Option<String>,
    pub encoding: Option<String>,
}

impl FakeBuffer {
    pub fn scratch(text: &str) -> Self {
        Self {
            text: text.to_string(),
            dirty: !text.is_empty(),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn at_path(mut self, path: &str) -> Self {
        self.file_path = Some(path.to_string());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeWindow {
    pub tabs: Vec<BufferId>,
    pub active: Option<BufferId>,
    pub folders: Vec<PathBuf>,
    pub project: bool,
}

#[derive(Debug, Default)]
pub struct FakeHost {
    pub windows: BTreeMap<WindowId, FakeWindow>,
    pub buffers: BTreeMap<BufferId, FakeBuffer>,
    pub packages: Option<PathBuf>,
    pub statuses: Vec<String>,
    pub closed_by_index: Vec<BufferId>,
    pub closed_directly: Vec<BufferId>,
    pub unindexed: BTreeSet<BufferId>,
    pub failing_close: BTreeSet<BufferId>,
    next_id: u64,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_window(&mut self) -> WindowId {
        self.next_id += 1;
        let id = WindowId(self.next_id);
        self.windows.insert(id, FakeWindow::default());
        id
    }

    pub fn add_buffer(&mut self, window: WindowId, mut buffer: FakeBuffer) -> BufferId {
        self.next_id += 1;
        let id = BufferId(self.next_id);
        buffer.window = Some(window);
        self.buffers.insert(id, buffer);
        let win = self.windows.get_mut(&window).expect("window exists");
        win.tabs.push(id);
        win.active = Some(id);
        id
    }

    pub fn buffer(&self, id: BufferId) -> &FakeBuffer {
        self.buffers.get(&id).expect("buffer exists")
    }

    pub fn buffer_mut(&mut self, id: BufferId) -> &mut FakeBuffer {
        self.buffers.get_mut(&id).expect("buffer exists")
    }

    pub fn is_open(&self, id: BufferId) -> bool {
        self.buffers.contains_key(&id)
    }

    fn remove(&mut self, buffer: BufferId) -> Result<(), HostError> {
        let state = self
            .buffers
            .get(&buffer)
            .ok_or(HostError::StaleBuffer(buffer))?;
        if state.dirty && !state.scratch {
            return Err(HostError::Command {
                command: "close".to_string(),
                reason: "save prompt shown".to_string(),
            });
        }
        if self.failing_close.contains(&buffer) {
            return Err(HostError::Command {
                command: "close".to_string(),
                reason: "refused".to_string(),
            });
        }
        let window = state.window;
        self.buffers.remove(&buffer);
        if let Some(win) = window.and_then(|w| self.windows.get_mut(&w)) {
            let pos = win.tabs.iter().position(|b| *b == buffer);
            win.tabs.retain(|b| *b != buffer);
            // Closing any tab moves focus to its neighbour, like real editors do.
            win.active = pos
                .and_then(|p| win.tabs.get(p.saturating_sub(1)).copied())
                .or_else(|| win.tabs.first().copied());
        }
        Ok(())
    }
}

impl Host for FakeHost {
    fn windows(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    fn buffers(&self, window: WindowId) -> Vec<BufferId> {
        self.windows
            .get(&window)
            .map(|w| w.tabs.clone())
            .unwrap_or_default()
    }

    fn active_buffer(&self, window: WindowId) -> Option<BufferId> {
        self.windows.get(&window).and_then(|w| w.active)
    }

    fn focus_buffer(&mut self, window: WindowId, buffer: BufferId) -> Result<(), HostError> {
        let win = self
            .windows
            .get_mut(&window)
            .ok_or(HostError::StaleWindow(window))?;
        if !win.tabs.contains(&buffer) {
            return Err(HostError::StaleBuffer(buffer));
        }
        win.active = Some(buffer);
        Ok(())
    }

    fn buffer_window(&self, buffer: BufferId) -> Option<WindowId> {
        self.buffers.get(&buffer).and_then(|b| b.window)
    }

    fn file_path(&self, buffer: BufferId) -> Option<String> {
        self.buffers.get(&buffer).and_then(|b| b.file_path.clone())
    }

    fn display_name(&self, buffer: BufferId) -> Option<String> {
        self.buffers.get(&buffer).and_then(|b| b.name.clone())
    }

    fn size(&self, buffer: BufferId) -> usize {
        self.buffers
            .get(&buffer)
            .map(|b| b.text.chars().count())
            .unwrap_or(0)
    }

    fn text(&self, buffer: BufferId) -> Result<String, HostError> {
        self.buffers
            .get(&buffer)
            .map(|b| b.text.clone())
            .ok_or(HostError::StaleBuffer(buffer))
    }

    fn is_dirty(&self, buffer: BufferId) -> bool {
        self.buffers.get(&buffer).is_some_and(|b| b.dirty && !b.scratch)
    }

    fn set_scratch(&mut self, buffer: BufferId, scratch: bool) -> Result<(), HostError> {
        let state = self
            .buffers
            .get_mut(&buffer)
            .ok_or(HostError::StaleBuffer(buffer))?;
        state.scratch = scratch;
        Ok(())
    }

    fn syntax(&self, buffer: BufferId) -> Option<String> {
        self.buffers.get(&buffer).and_then(|b| b.syntax.clone())
    }

    fn encoding(&self, buffer: BufferId) -> Option<String> {
        self.buffers.get(&buffer).and_then(|b| b.encoding.clone())
    }

    fn window_folders(&self, window: WindowId) -> Vec<PathBuf> {
        self.windows
            .get(&window)
            .map(|w| w.folders.clone())
            .unwrap_or_default()
    }

    fn window_has_project(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.project)
    }

    fn packages_path(&self) -> Option<PathBuf> {
        self.packages.clone()
    }

    fn tab_index(&self, window: WindowId, buffer: BufferId) -> Option<TabIndex> {
        if self.unindexed.contains(&buffer) {
            return None;
        }
        let win = self.windows.get(&window)?;
        let index = win.tabs.iter().position(|b| *b == buffer)?;
        Some(TabIndex { group: 0, index })
    }

    fn close_by_index(&mut self, window: WindowId, at: TabIndex) -> Result<(), HostError> {
        let buffer = self
            .windows
            .get(&window)
            .and_then(|w| w.tabs.get(at.index).copied())
            .ok_or(HostError::StaleWindow(window))?;
        self.remove(buffer)?;
        self.closed_by_index.push(buffer);
        Ok(())
    }

    fn close_buffer(&mut self, buffer: BufferId) -> Result<(), HostError> {
        self.remove(buffer)?;
        self.closed_directly.push(buffer);
        Ok(())
    }

    fn new_buffer(&mut self, window: WindowId) -> Result<BufferId, HostError> {
        if !self.windows.contains_key(&window) {
            return Err(HostError::StaleWindow(window));
        }
        let buffer = FakeBuffer {
            syntax: Some("Plain Text".to_string()),
            ..FakeBuffer::default()
        };
        Ok(self.add_buffer(window, buffer))
    }

    fn insert_text(&mut self, buffer: BufferId, text: &str) -> Result<(), HostError> {
        let state = self
            .buffers
            .get_mut(&buffer)
            .ok_or(HostError::StaleBuffer(buffer))?;
        state.text.push_str(text);
        state.dirty = true;
        Ok(())
    }

    fn set_name(&mut self, buffer: BufferId, name: &str) -> Result<(), HostError> {
        let state = self
            .buffers
            .get_mut(&buffer)
            .ok_or(HostError::StaleBuffer(buffer))?;
        state.name = Some(name.to_string());
        Ok(())
    }

    fn set_syntax(&mut self, buffer: BufferId, syntax: &str) -> Result<(), HostError> {
        let state = self
            .buffers
            .get_mut(&buffer)
            .ok_or(HostError::StaleBuffer(buffer))?;
        state.syntax = Some(syntax.to_string());
        Ok(())
    }

    fn set_encoding(&mut self, buffer: BufferId, encoding: &str) -> Result<(), HostError> {
        let state = self
            .buffers
            .get_mut(&buffer)
            .ok_or(HostError::StaleBuffer(buffer))?;
        state.encoding = Some(encoding.to_string());
        Ok(())
    }

    fn status_message(&mut self, text: &str) {
        self.statuses.push(text.to_string());
    }
}
