//! File-backed session store.
//!
//! Each key maps to `<dir>/<key>.session`. The first line of the file is the
//! RFC 3339 expiry timestamp, everything after it is the stored value:
//!
//! ```text
//! 2026-10-20T18:04:11.532Z
//! {"players":[{"id":1,"name":"A","balance":100}],"pot":0}
//! ```
//!
//! Writes go to a temporary file that is synced and renamed over the target,
//! so a crash mid-write leaves the previous value intact.

use super::{
    SessionStore,
    errors::{StoreError, StoreResult},
};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use log::debug;
use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

const EXTENSION: &str = "session";

/// Store that keeps one file per key inside a directory
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// * `StoreError::Io` - The directory can't be created
    pub fn new(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }
}

fn decode(key: &str, raw: &[u8]) -> StoreResult<(DateTime<Utc>, Vec<u8>)> {
    let corrupt = |reason: String| StoreError::Corrupt {
        key: key.to_string(),
        reason,
    };

    let newline = raw
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| corrupt("missing expiry header".to_string()))?;
    let header = std::str::from_utf8(&raw[..newline])
        .map_err(|e| corrupt(format!("expiry header is not UTF-8: {e}")))?;
    let expires_at = DateTime::parse_from_rfc3339(header.trim())
        .map_err(|e| corrupt(format!("bad expiry {header:?}: {e}")))?
        .with_timezone(&Utc);

    Ok((expires_at, raw[newline + 1..].to_vec()))
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let (expires_at, value) = decode(key, &raw)?;
        if expires_at <= Utc::now() {
            debug!("Entry {key} expired at {expires_at}");
            return Ok(None);
        }
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &[u8], ttl: Duration) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension(format!("{EXTENSION}.tmp"));
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or(StoreError::InvalidTtl(ttl))?
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(expires_at.as_bytes())?;
            file.write_all(b"\n")?;
            file.write_all(value)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &path)?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
