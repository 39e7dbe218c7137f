//! Persisted player settings (volume, difficulty, starting ammo)
//!
//! Settings читаются один раз при старте сессии. Store является внешним
//! collaborator: ошибка чтения не блокирует игру, сессия стартует с defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_VOLUME: f32 = 0.5;
pub const DEFAULT_DIFFICULTY: f32 = 1.0;
pub const DEFAULT_STARTING_AMMO: u32 = 10;

/// Session configuration (JSON: `{ "volume", "difficulty", "startingAmmo" }`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Громкость audio cues, в core только пробрасывается
    pub volume: f32,
    /// Множитель скорости камеры и projectiles (> 0)
    pub difficulty: f32,
    pub starting_ammo: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            difficulty: DEFAULT_DIFFICULTY,
            starting_ammo: DEFAULT_STARTING_AMMO,
        }
    }
}

impl Settings {
    /// Reject configurations the simulation cannot run with.
    ///
    /// difficulty <= 0 даёт нулевую скорость projectile → вечный Traveling.
    pub fn validate(self) -> Result<Self, SettingsError> {
        if !self.difficulty.is_finite() || self.difficulty <= 0.0 {
            return Err(SettingsError::InvalidDifficulty(self.difficulty));
        }
        if !self.volume.is_finite() || !(0.0..=1.0).contains(&self.volume) {
            return Err(SettingsError::InvalidVolume(self.volume));
        }
        Ok(self)
    }
}

#[derive(Debug)]
pub enum SettingsError {
    InvalidDifficulty(f32),
    InvalidVolume(f32),
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::InvalidDifficulty(value) => {
                write!(f, "difficulty must be a positive number, got {}", value)
            }
            SettingsError::InvalidVolume(value) => {
                write!(f, "volume must be within [0, 1], got {}", value)
            }
            SettingsError::Io(err) => write!(f, "settings store I/O failed: {}", err),
            SettingsError::Parse(err) => write!(f, "settings document is malformed: {}", err),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(err) => Some(err),
            SettingsError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}

/// Settings persistence (localStorage-like key/value document)
pub trait SettingsStore {
    /// `Ok(None)`: ничего ещё не сохранено
    fn load(&self) -> Result<Option<Settings>, SettingsError>;

    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError>;
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Option<Settings>, SettingsError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let settings: Settings = serde_json::from_str(&raw)?;
        Ok(Some(settings))
    }

    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        let raw = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// In-memory store (tests, hosts без persistence)
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    document: Option<String>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a raw JSON document (as if persisted earlier).
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Some(document.into()),
        }
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<Settings>, SettingsError> {
        match &self.document {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        self.document = Some(serde_json::to_string(settings)?);
        Ok(())
    }
}

/// Load + validate, falling back to defaults on any failure.
///
/// Ошибки store'а логируются как warning: core продолжает работу.
pub fn load_or_default(store: &dyn SettingsStore) -> Settings {
    match store.load() {
        Ok(Some(settings)) => match settings.validate() {
            Ok(valid) => valid,
            Err(err) => {
                crate::logger::log_warning(&format!(
                    "Stored settings rejected ({}), using defaults",
                    err
                ));
                Settings::default()
            }
        },
        Ok(None) => Settings::default(),
        Err(err) => {
            crate::logger::log_warning(&format!(
                "Settings store unavailable ({}), using defaults",
                err
            ));
            Settings::default()
        }
    }
}
