// ============================================================================
// Erreurs de l'API
// ============================================================================
// Taxonomie des échecs d'un appel HTTP, convertis ensuite en état de vue
//
// CONCEPT RUST : thiserror
// - #[derive(Error)] génère Display + std::error::Error
// - Clone + PartialEq : les erreurs voyagent dans les channels et les tests
// ============================================================================

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Échec d'un appel à l'API du marketplace
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Aucune réponse reçue (connexion refusée, timeout, DNS...)
    #[error("Network error: {0}")]
    Network(String),

    /// 401 : session expirée ou absente
    #[error("Unauthorized")]
    Unauthorized,

    /// 404 : contextuel ("objet disparu" ou "pas encore d'enchère")
    #[error("Not found")]
    NotFound,

    /// 4xx avec message éventuel, affiché tel quel à l'utilisateur
    #[error("Rejected: {}", .0.as_deref().unwrap_or("no message"))]
    Validation(Option<String>),

    /// 5xx
    #[error("Server error (HTTP {status})")]
    Server { status: u16, message: Option<String> },

    /// Corps de réponse illisible
    #[error("Unreadable response: {0}")]
    Decode(String),
}

/// Corps d'erreur renvoyé par le serveur : `{"message": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Classe une réponse non-succès à partir de son statut et de son corps
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound,
            s if s.is_client_error() => ApiError::Validation(message),
            s => ApiError::Server {
                status: s.as_u16(),
                message,
            },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}
