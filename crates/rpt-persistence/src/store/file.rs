//! Directory-backed store: one file per key.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::KeyValueStore;

/// Stores each key as `<dir>/<escaped key>.json`.
///
/// Writes go to a temp file that is then renamed over the target, so a
/// crash never leaves a half-written value behind. I/O failures are logged
/// and reported as `None`/`false`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", escape_key(key)))
    }

    fn write_atomic(&self, path: &Path, value: &str) -> io::Result<()> {
        let temp_path = path.with_extension("json.tmp");
        let mut file = File::create(&temp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    }
}

/// Keys contain `:`, which is not portable in file names. Everything outside
/// `[A-Za-z0-9._-]` becomes `%XX`.
fn escape_key(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
            escaped.push(char::from(byte));
        } else {
            escaped.push_str(&format!("%{byte:02X}"));
        }
    }
    escaped
}

/// Inverse of [`escape_key`]. `None` for names it could not have produced.
fn unescape_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut raw = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = name.get(i + 1..i + 3)?;
            raw.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            raw.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(raw).ok()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to read store entry");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> bool {
        let path = self.path_for(key);
        match self.write_atomic(&path, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to write store entry");
                false
            }
        }
    }

    fn remove(&self, key: &str) -> bool {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to remove store entry");
                false
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(dir = %self.dir.display(), error = %e, "failed to list store");
                return Vec::new();
            }
        };
        let mut keys: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                unescape_key(name.strip_suffix(".json")?)
            })
            .collect();
        keys.sort();
        keys
    }
}
