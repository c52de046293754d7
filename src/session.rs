// ============================================================================
// Session : token d'authentification
// ============================================================================
// Objet explicite qui possède le bearer token
//
// CONCEPTS RUST :
// 1. Arc<Session> : partagé entre le client HTTP (worker) et l'App (UI)
// 2. Mutex<Option<String>> : mutabilité intérieure thread-safe
// 3. invalidate() : appelé explicitement sur 401, jamais de lookup ambiant
// ============================================================================

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Contexte de session injecté dans le client HTTP à la construction
#[derive(Debug, Default)]
pub struct Session {
    /// Fichier de persistance (None = session en mémoire seulement)
    path: Option<PathBuf>,

    /// Token courant
    token: Mutex<Option<String>>,
}

impl Session {
    /// Session vide, non persistée
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Session en mémoire avec un token déjà connu
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            path: None,
            token: Mutex::new(Some(token.into())),
        }
    }

    /// Charge la session depuis un fichier
    ///
    /// Fichier absent ou vide = pas de token (ce n'est pas une erreur).
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let token = match std::fs::read_to_string(&path) {
            Ok(content) => {
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Échec de la lecture du fichier de session {}", path.display())
                })
            }
        };

        debug!(path = %path.display(), has_token = token.is_some(), "Session loaded");

        Ok(Self {
            path: Some(path),
            token: Mutex::new(token),
        })
    }

    /// Retourne une copie du token courant
    pub fn token(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Vérifie si un token est présent
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    /// Enregistre un nouveau token (après login) et le persiste
    ///
    /// Le token est utilisable en mémoire même si l'écriture du fichier échoue.
    pub fn store(&self, token: String) -> Result<()> {
        *self.lock() = Some(token.clone());
        info!("Session token stored");

        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Échec de la création du répertoire {}", parent.display())
                })?;
            }
            std::fs::write(path, &token).with_context(|| {
                format!("Échec de l'écriture du fichier de session {}", path.display())
            })?;
        }

        Ok(())
    }

    /// Efface le token (mémoire + fichier)
    ///
    /// Appelé sur toute réponse 401 : fatal pour l'écran courant, retour au login.
    pub fn invalidate(&self) {
        let had_token = self.lock().take().is_some();

        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove session file"),
            }
        }

        info!(had_token, "Session invalidated");
    }

    /// Chemin du fichier de persistance
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // Un mutex empoisonné ne contient qu'un Option<String> : on récupère la valeur
    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_has_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::load(dir.path().join("session.token")).unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_store_then_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.token");

        let session = Session::load(&path).unwrap();
        session.store("abc.def".to_string()).unwrap();
        assert_eq!(session.token().as_deref(), Some("abc.def"));

        let reloaded = Session::load(&path).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("abc.def"));
    }

    #[test]
    fn test_invalidate_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.token");
        std::fs::write(&path, "  tok\n").unwrap();

        let session = Session::load(&path).unwrap();
        assert_eq!(session.token().as_deref(), Some("tok"));

        session.invalidate();
        assert!(!session.is_authenticated());
        assert!(!path.exists());

        // Idempotent
        session.invalidate();
    }

    #[test]
    fn test_empty_file_is_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.token");
        std::fs::write(&path, "\n").unwrap();

        assert!(!Session::load(&path).unwrap().is_authenticated());
    }
}
