use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

/// Read access to resources bundled with the hosting plugin.
///
/// `Ok(None)` means the bundle has no entry under that name, which callers
/// treat as "nothing to do" rather than a failure. An `Err` is a real read
/// failure on an entry that exists.
pub trait Resources {
    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>>;

    /// UTF-8 convenience over [`read`](Resources::read).
    fn read_to_string(&self, name: &str) -> io::Result<Option<String>> {
        match self.read(name)? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            None => Ok(None),
        }
    }
}

/// Resources unpacked under a directory, e.g. a plugin's install folder.
#[derive(Debug, Clone)]
pub struct DirResources {
    root: PathBuf,
}

impl DirResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Resources for DirResources {
    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        match std::fs::read(self.root.join(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Resources held in memory: embedded defaults and test fixtures.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(name.into(), bytes.into());
    }
}

impl Resources for MemoryResources {
    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.entries.get(name).cloned())
    }
}
