use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::IntranetResult;
use crate::models::TokenPair;

/// Token pair persisted between CLI runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> IntranetResult<Option<TokenPair>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, tokens: &TokenPair) -> IntranetResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut opts = OpenOptions::new();
        opts.create(true).write(true).truncate(true);
        // owner-only: the file holds bearer credentials
        #[cfg(unix)]
        opts.mode(0o600);
        let mut file = opts.open(&self.path).await?;

        // mode() only applies on creation; tighten files left by older runs
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .await?;
        }

        file.write_all(&serde_json::to_vec_pretty(tokens)?).await?;
        file.flush().await?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    pub async fn clear(&self) -> IntranetResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));
        assert!(store.load().await.unwrap().is_none());

        let tokens = TokenPair {
            access: "a".into(),
            refresh: "r".into(),
        };
        store.save(&tokens).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(tokens));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        // clearing twice is fine
        store.clear().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        // a file left world-readable by an earlier version
        std::fs::write(&path, b"{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let store = SessionStore::new(&path);
        let tokens = TokenPair {
            access: "a".into(),
            refresh: "r".into(),
        };
        store.save(&tokens).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(store.load().await.unwrap(), Some(tokens));

        std::fs::remove_file(&path).unwrap();
        store.save(&TokenPair { access: "b".into(), refresh: "r".into() }).await.unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
