// ============================================================================
// Configuration
// ============================================================================
// Ligne de commande + variables d'environnement (clap), avec des valeurs
// par défaut qui pointent vers un serveur local
//
//   [ITEM_ID]         objet à ouvrir directement
//   --api-url         LAZYBID_API_URL       http://localhost:8080/api/v1
//   --timeout-secs    LAZYBID_TIMEOUT_SECS  5
//   --session-file    LAZYBID_SESSION_FILE  <data_dir>/lazybid/session.token
//   --log-dir         LAZYBID_LOG_DIR       ./logs
//
// CONCEPT RUST : derive(Parser)
// - clap génère le parsing, l'aide (--help) et les messages d'erreur
// - env = "..." : la variable d'environnement sert de valeur de repli
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_LOG_DIR: &str = "./logs";

/// Arguments de la ligne de commande
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(author, version, about = "Client terminal du marketplace étudiant", long_about = None)]
pub struct Cli {
    /// Identifiant d'un objet à ouvrir au démarrage
    pub item_id: Option<i64>,

    /// URL de base de l'API
    #[arg(long, env = "LAZYBID_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Timeout de chaque requête HTTP, en secondes
    #[arg(
        long,
        env = "LAZYBID_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Fichier où le token de session est persisté
    #[arg(long, env = "LAZYBID_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Répertoire des logs
    #[arg(long, env = "LAZYBID_LOG_DIR", default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,
}

impl Cli {
    /// Configuration résolue (URL normalisée, fichier de session par défaut)
    pub fn config(&self) -> Config {
        let api_url = self.api_url.trim().trim_end_matches('/');

        Config {
            api_url: if api_url.is_empty() {
                DEFAULT_API_URL.to_string()
            } else {
                api_url.to_string()
            },
            timeout: Duration::from_secs(self.timeout_secs),
            session_file: self.session_file.clone().or_else(default_session_file),
            log_dir: self.log_dir.clone(),
        }
    }
}

/// Configuration du client
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// URL de base de l'API, sans '/' final
    pub api_url: String,

    /// Timeout appliqué à chaque requête HTTP
    pub timeout: Duration,

    /// Fichier où le token de session est persisté (None = mémoire seulement)
    pub session_file: Option<PathBuf>,

    /// Répertoire des logs
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_file: default_session_file(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

/// Emplacement par défaut du token
/// - Linux : ~/.local/share/lazybid/session.token
/// - macOS : ~/Library/Application Support/lazybid/session.token
fn default_session_file() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("lazybid").join("session.token"))
}
