//! Fragment sources: where pre-recorded samples come from.
//!
//! Fragments are grouped by fragment role (`kick`, `snare`, `bass`, `chord`,
//! `ambient`, ...). A [`FragmentId`] is `role/name`. The directory source
//! maps that onto `<root>/<role>/<name>.wav`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, AudioResult};
use crate::wav;

/// Fragment role holding ambient loops.
pub const AMBIENT_ROLE: &str = "ambient";

/// Identifies one fragment as `role/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentId {
    role: String,
    name: String,
}

impl FragmentId {
    pub fn new(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            name: name.into(),
        }
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.role, self.name)
    }
}

/// Lists and opens fragments. Shared read-only across concurrent loads.
pub trait FragmentSource: Send + Sync {
    /// Fragments of a role in a stable order.
    ///
    /// Fails with [`AudioError::RoleNotFound`] when the role is unknown.
    fn list(&self, role: &str) -> AudioResult<Vec<FragmentId>>;

    /// Decodes one fragment at its native sample rate.
    ///
    /// Fails with [`AudioError::FragmentNotFound`] when it does not exist.
    fn open(&self, id: &FragmentId) -> AudioResult<AudioBuffer>;
}

/// One directory per fragment role, holding `.wav` files.
#[derive(Debug, Clone)]
pub struct DirectoryFragmentSource {
    root: PathBuf,
}

impl DirectoryFragmentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, id: &FragmentId) -> PathBuf {
        self.root.join(&id.role).join(&id.name)
    }
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
}

impl FragmentSource for DirectoryFragmentSource {
    fn list(&self, role: &str) -> AudioResult<Vec<FragmentId>> {
        let dir = self.root.join(role);
        if !dir.is_dir() {
            return Err(AudioError::RoleNotFound {
                role: role.to_string(),
            });
        }

        let mut ids = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                AudioError::Io(e.into_io_error().unwrap_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::Other, "directory walk failed")
                }))
            })?;
            if entry.file_type().is_file() && is_wav(entry.path()) {
                ids.push(FragmentId::new(
                    role,
                    entry.file_name().to_string_lossy().into_owned(),
                ));
            }
        }
        Ok(ids)
    }

    fn open(&self, id: &FragmentId) -> AudioResult<AudioBuffer> {
        let path = self.path_of(id);
        if !path.is_file() {
            return Err(AudioError::not_found(id));
        }
        wav::read_wav(&path)
    }
}

/// Fragments held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFragmentSource {
    roles: BTreeMap<String, Vec<FragmentId>>,
    buffers: HashMap<FragmentId, AudioBuffer>,
}

impl MemoryFragmentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fragment and returns its id. Reinserting a name replaces the
    /// buffer.
    pub fn insert(&mut self, role: &str, name: &str, buffer: AudioBuffer) -> FragmentId {
        let id = FragmentId::new(role, name);
        let ids = self.roles.entry(role.to_string()).or_default();
        if !ids.contains(&id) {
            ids.push(id.clone());
            ids.sort();
        }
        self.buffers.insert(id.clone(), buffer);
        id
    }

    /// Registers a role with no fragments.
    pub fn add_empty_role(&mut self, role: &str) {
        self.roles.entry(role.to_string()).or_default();
    }
}

impl FragmentSource for MemoryFragmentSource {
    fn list(&self, role: &str) -> AudioResult<Vec<FragmentId>> {
        self.roles
            .get(role)
            .cloned()
            .ok_or_else(|| AudioError::RoleNotFound {
                role: role.to_string(),
            })
    }

    fn open(&self, id: &FragmentId) -> AudioResult<AudioBuffer> {
        self.buffers
            .get(id)
            .cloned()
            .ok_or_else(|| AudioError::not_found(id))
    }
}
