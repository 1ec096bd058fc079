//! Named sessions: saved ranges plus the settings they were evaluated with.
//!
//! Sessions are keyed by a slug of the user-supplied name. The store is plain
//! CRUD and knows nothing about period accounting.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::{DEFAULT_ANCHOR_DAY, DEFAULT_ANCHOR_MONTH, DEFAULT_MIN_DAYS};
use crate::{Anchor, AnchorError, CalculationConfig, RawRange};

/// Slug used when a name has no usable characters.
pub const FALLBACK_SLUG: &str = "session";

const SESSION_EXTENSION: &str = "json";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session name is required")]
    NameRequired,

    #[error("session not found: {0}")]
    NotFound(String),

    #[error("session storage I/O failed for {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("session file {path} is not valid JSON: {source}")]
    Json {
        path:   PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Lower-cases, turns spaces into `-`, and keeps only alphanumerics, `-` and
/// `_`. Falls back to [`FALLBACK_SLUG`] when nothing survives.
pub fn slugify(name: &str) -> String {
    let slug: String = name
        .trim()
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    if slug.is_empty() {
        FALLBACK_SLUG.to_owned()
    } else {
        slug
    }
}

const fn default_anchor_month() -> u32 {
    DEFAULT_ANCHOR_MONTH
}

const fn default_anchor_day() -> u32 {
    DEFAULT_ANCHOR_DAY
}

const fn default_min_days() -> u32 {
    DEFAULT_MIN_DAYS
}

/// Calculation settings saved with a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSettings {
    #[serde(default = "default_anchor_month")]
    pub anchor_month:   u32,
    #[serde(default = "default_anchor_day")]
    pub anchor_day:     u32,
    #[serde(default = "default_min_days")]
    pub min_days:       u32,
    #[serde(default)]
    pub merge_overlaps: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            anchor_month:   DEFAULT_ANCHOR_MONTH,
            anchor_day:     DEFAULT_ANCHOR_DAY,
            min_days:       DEFAULT_MIN_DAYS,
            merge_overlaps: false,
        }
    }
}

impl SessionSettings {
    /// Builds a calculation config from the saved settings.
    ///
    /// # Errors
    /// Returns `AnchorError` if the saved anchor is invalid.
    pub fn to_config(&self) -> Result<CalculationConfig, AnchorError> {
        let anchor = Anchor::new(self.anchor_month, self.anchor_day)?;
        Ok(CalculationConfig::new(anchor, self.min_days).with_merge_overlaps(self.merge_overlaps))
    }
}

impl From<&CalculationConfig> for SessionSettings {
    fn from(config: &CalculationConfig) -> Self {
        Self {
            anchor_month:   u32::from(config.anchor().month()),
            anchor_day:     u32::from(config.anchor().day()),
            min_days:       config.min_days(),
            merge_overlaps: config.merge_overlaps(),
        }
    }
}

/// A saved session document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub ranges:   Vec<RawRange>,
    #[serde(default)]
    pub settings: SessionSettings,
}

/// Listing entry: slug plus last update as seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub name:    String,
    pub updated: u64,
}

/// Storage for named sessions. Names are slugified by every method.
pub trait SessionStore {
    /// All sessions, most recently updated first.
    ///
    /// # Errors
    /// Returns `SessionError` if the backing storage cannot be read.
    fn list(&self) -> Result<Vec<SessionSummary>, SessionError>;

    /// # Errors
    /// Returns `SessionError::NotFound` if no session has this name.
    fn load(&self, name: &str) -> Result<Session, SessionError>;

    /// Creates or replaces a session and returns its slug.
    ///
    /// # Errors
    /// Returns `SessionError::NameRequired` for a blank name.
    fn save(&self, name: &str, session: &Session) -> Result<String, SessionError>;

    /// Removes a session. Removing a missing session succeeds.
    ///
    /// # Errors
    /// Returns `SessionError` if the backing storage refuses the removal.
    fn delete(&self, name: &str) -> Result<(), SessionError>;
}

/// One `<slug>.json` file per session inside a directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns `SessionError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| SessionError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{SESSION_EXTENSION}", slugify(name)))
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> SessionError + '_ {
    move |source| SessionError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl SessionStore for FileSessionStore {
    #[instrument(level = "debug", skip(self), fields(dir = %self.dir.display()))]
    fn list(&self) -> Result<Vec<SessionSummary>, SessionError> {
        let mut sessions = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(io_error(&self.dir))? {
            let entry = entry.map_err(io_error(&self.dir))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SESSION_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let updated = entry
                .metadata()
                .and_then(|m| m.modified())
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map_or(0, |d| d.as_secs());
            sessions.push(SessionSummary {
                name: name.to_owned(),
                updated,
            });
        }

        sessions.sort_by(|a, b| b.updated.cmp(&a.updated).then_with(|| a.name.cmp(&b.name)));
        debug!(count = sessions.len(), "listed sessions");
        Ok(sessions)
    }

    #[instrument(level = "debug", skip(self))]
    fn load(&self, name: &str) -> Result<Session, SessionError> {
        let path = self.path_for(name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(SessionError::NotFound(slugify(name))),
            Err(source) => return Err(SessionError::Io { path, source }),
        };
        serde_json::from_str(&contents).map_err(|source| SessionError::Json { path, source })
    }

    #[instrument(level = "debug", skip(self, session), fields(ranges = session.ranges.len()))]
    fn save(&self, name: &str, session: &Session) -> Result<String, SessionError> {
        if name.trim().is_empty() {
            return Err(SessionError::NameRequired);
        }
        let path = self.path_for(name);
        let json = serde_json::to_string(session).map_err(|source| SessionError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(io_error(&path))?;

        let slug = slugify(name);
        debug!(%slug, "saved session");
        Ok(slug)
    }

    #[instrument(level = "debug", skip(self))]
    fn delete(&self, name: &str) -> Result<(), SessionError> {
        let path = self.path_for(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Io { path, source }),
        }
    }
}
