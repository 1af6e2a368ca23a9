use crate::remote_path::last_segment;

/// One node of a remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    /// Percent-decoded, server-absolute path.
    pub path: String,
    pub is_directory: bool,
    /// Byte count; 0 for directories or when the server did not report one.
    pub size: u64,
    /// Last-modified timestamp as reported by the server, empty when absent.
    pub modified: String,
    /// Percent-encoded server path, suitable for `UrlBuilder::build`.
    pub fetch_reference: String,
}

impl DirectoryEntry {
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self::new(path, false, size)
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self::new(path, true, 0)
    }

    fn new(path: impl Into<String>, is_directory: bool, size: u64) -> Self {
        let path = path.into();
        let name = last_segment(&path).unwrap_or("/").to_string();
        let fetch_reference = crate::encode_path(&path);
        Self {
            name,
            path,
            is_directory,
            size: if is_directory { 0 } else { size },
            modified: String::new(),
            fetch_reference,
        }
    }

    pub fn with_modified(mut self, modified: impl Into<String>) -> Self {
        self.modified = modified.into();
        self
    }
}

/// A user-selected entry submitted for download.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub path: Option<String>,
    pub name: Option<String>,
    pub is_directory: bool,
    pub size: u64,
}

impl Selection {
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: Some(path.into()),
            name: None,
            is_directory: false,
            size,
        }
    }

    pub fn folder(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            name: None,
            is_directory: true,
            size: 0,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The trimmed path, or `None` when the selection carries no usable path.
    pub fn path(&self) -> Option<&str> {
        self.path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }

    /// Display name: the explicit name, else the last path segment, else a placeholder.
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .or_else(|| self.path().and_then(last_segment))
            .unwrap_or("unknown file")
            .to_string()
    }

    /// View the selection as a file entry so the download filter can judge it.
    pub fn as_entry(&self) -> Option<DirectoryEntry> {
        let path = self.path()?;
        let mut entry = if self.is_directory {
            DirectoryEntry::directory(path)
        } else {
            DirectoryEntry::file(path, self.size)
        };
        entry.name = self.display_name();
        Some(entry)
    }
}
