use crate::models::AuthSession;
use anyhow::Result;
use std::fs;
use std::path::PathBuf;

const SESSION_FILE: &str = "session.yaml";

/// Persists the auth session across runs.
///
/// Lives under `~/.pitchside/`; the file holds the serialized token plus the
/// admin record it was issued for.
pub struct SessionStorage {
    config_dir: PathBuf,
}

impl SessionStorage {
    pub fn new() -> Self {
        let config_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pitchside");
        SessionStorage { config_dir }
    }

    /// Storage rooted at an explicit directory
    pub fn at(config_dir: impl Into<PathBuf>) -> Self {
        SessionStorage {
            config_dir: config_dir.into(),
        }
    }

    fn session_path(&self) -> PathBuf {
        self.config_dir.join(SESSION_FILE)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Load the persisted session, if any. A corrupt file reads as no session.
    pub fn load(&self) -> Option<AuthSession> {
        let content = fs::read_to_string(self.session_path()).ok()?;
        serde_yaml::from_str(&content).ok()
    }

    pub fn save(&self, session: &AuthSession) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_yaml::to_string(session)?;
        fs::write(self.session_path(), content)?;
        Ok(())
    }

    /// Remove the persisted session; missing file is not an error.
    pub fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl Default for SessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use tempfile::tempdir;

    fn session() -> AuthSession {
        AuthSession {
            token: "tok_123".into(),
            user: User {
                id: "u1".into(),
                email: "admin@example.com".into(),
                display_name: None,
                is_admin: Some(true),
            },
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let storage = SessionStorage::at(dir.path());
        storage.save(&session()).unwrap();
        assert_eq!(storage.load(), Some(session()));
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let storage = SessionStorage::at(dir.path());
        assert_eq!(storage.load(), None);
    }

    #[test]
    fn test_clear_removes_session() {
        let dir = tempdir().unwrap();
        let storage = SessionStorage::at(dir.path());
        storage.save(&session()).unwrap();
        storage.clear().unwrap();
        assert_eq!(storage.load(), None);
        // clearing twice is fine
        storage.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_reads_as_none() {
        let dir = tempdir().unwrap();
        let storage = SessionStorage::at(dir.path());
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(dir.path().join(SESSION_FILE), "{not yaml: [").unwrap();
        assert_eq!(storage.load(), None);
    }
}
