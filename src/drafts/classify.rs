use crate::drafts::host::{BufferId, Host};
use std::path::{Path, PathBuf};

const CONFIG_SUFFIX_KINDS: &[&str] = &[
    "settings",
    "keymap",
    "menu",
    "commands",
    "build",
    "project",
    "workspace",
    "theme",
    "color-scheme",
];

const RESERVED_KEYWORDS: &[&str] = &["package", "preferences", "settings", "keymap", "default"];

const UNTITLED_MARKER: &str = "untitled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    SavedFile,
    Empty,
    ConfigFile,
    ReservedName,
    InPackages,
    InProject,
    NamedFile,
    Clean,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SavedFile => "saved-file",
            Self::Empty => "empty",
            Self::ConfigFile => "config-file",
            Self::ReservedName => "reserved-name",
            Self::InPackages => "in-packages",
            Self::InProject => "in-project",
            Self::NamedFile => "named-file",
            Self::Clean => "clean",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Temporary,
    Skip(SkipReason),
}

impl Eligibility {
    pub fn is_temporary(self) -> bool {
        matches!(self, Self::Temporary)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BufferFacts {
    pub file_path: Option<String>,
    pub display_name: Option<String>,
    pub size: usize,
    pub dirty: bool,
    /// Open folders of the containing window, only when it has a project.
    pub project_folders: Vec<PathBuf>,
    pub packages_path: Option<PathBuf>,
}

impl BufferFacts {
    pub fn gather(host: &dyn Host, buffer: BufferId) -> Self {
        let project_folders = match host.buffer_window(buffer) {
            Some(window) if host.window_has_project(window) => host.window_folders(window),
            _ => Vec::new(),
        };
        Self {
            file_path: host.file_path(buffer).filter(|p| !p.is_empty()),
            display_name: host.display_name(buffer).filter(|n| !n.is_empty()),
            size: host.size(buffer),
            dirty: host.is_dirty(buffer),
            project_folders,
            packages_path: host.packages_path(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    config_suffixes: Vec<String>,
    keywords: Vec<String>,
}

impl Classifier {
    pub fn new(product_name: &str) -> Self {
        let product = product_name.trim().to_lowercase();
        let config_suffixes = CONFIG_SUFFIX_KINDS
            .iter()
            .map(|kind| format!(".{product}-{kind}"))
            .collect();
        let mut keywords = vec![product];
        keywords.extend(RESERVED_KEYWORDS.iter().map(|k| k.to_string()));
        Self {
            config_suffixes,
            keywords,
        }
    }

    fn is_reserved(&self, name: &str) -> Option<SkipReason> {
        let lower = name.to_lowercase();
        if self.config_suffixes.iter().any(|s| lower.ends_with(s)) {
            return Some(SkipReason::ConfigFile);
        }
        if self.keywords.iter().any(|k| lower.contains(k)) {
            return Some(SkipReason::ReservedName);
        }
        None
    }

    pub fn classify(&self, facts: &BufferFacts, path_exists: impl Fn(&Path) -> bool) -> Eligibility {
        let path = facts.file_path.as_deref();

        if path.is_some_and(|p| path_exists(Path::new(p))) {
            return Eligibility::Skip(SkipReason::SavedFile);
        }
        if facts.size == 0 {
            return Eligibility::Skip(SkipReason::Empty);
        }
        for name in [path, facts.display_name.as_deref()].into_iter().flatten() {
            if let Some(reason) = self.is_reserved(name) {
                return Eligibility::Skip(reason);
            }
        }
        if let (Some(p), Some(packages)) = (path, facts.packages_path.as_deref()) {
            if Path::new(p).starts_with(packages) {
                return Eligibility::Skip(SkipReason::InPackages);
            }
        }
        if let Some(p) = path {
            if facts
                .project_folders
                .iter()
                .any(|folder| Path::new(p).starts_with(folder))
            {
                return Eligibility::Skip(SkipReason::InProject);
            }
            if !p.to_lowercase().contains(UNTITLED_MARKER) {
                return Eligibility::Skip(SkipReason::NamedFile);
            }
        }
        if !facts.dirty {
            return Eligibility::Skip(SkipReason::Clean);
        }
        Eligibility::Temporary
    }

    pub fn check(&self, host: &dyn Host, buffer: BufferId) -> Eligibility {
        self.classify(&BufferFacts::gather(host, buffer), Path::exists)
    }

    pub fn is_temporary(&self, host: &dyn Host, buffer: BufferId) -> bool {
        self.check(host, buffer).is_temporary()
    }
}
