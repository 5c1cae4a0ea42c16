use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::store::schema::Preferences;

const PREFERENCES_FILE: &str = "preferences.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("eqlab");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Parsed JSON of `name`, or `None` when the file is missing or unreadable.
    fn load_value(&self, name: &str) -> Option<Value> {
        let path = self.file_path(name);
        if !path.exists() {
            return None;
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!(%err, path = %path.display(), "could not read store file");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(%err, path = %path.display(), "ignoring malformed store file");
                None
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Best-effort: never fails, falls back to defaults field by field.
    pub fn load_preferences(&self) -> Preferences {
        let mut prefs = Preferences::default();
        if let Some(value) = self.load_value(PREFERENCES_FILE) {
            let rejected = prefs.merge_from_value(&value);
            if rejected > 0 {
                warn!(rejected, "ignored malformed preference fields");
            }
        }
        prefs
    }

    pub fn save_preferences(&self, prefs: &Preferences) -> Result<()> {
        self.save(PREFERENCES_FILE, prefs)
    }
}
