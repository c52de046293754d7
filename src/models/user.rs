// ============================================================================
// Structures : utilisateur authentifié, login, solde VC
// ============================================================================

use serde::{Deserialize, Serialize};

/// Utilisateur courant (GET /profile)
///
/// L'id sert uniquement à tester la propriété d'un objet
/// et à exclure les sur-enchères sur soi-même.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    #[serde(rename = "userId")]
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,

    /// Réputation calculée côté serveur à partir des feedbacks
    #[serde(default)]
    pub reputation: Option<i64>,
}

/// Corps de `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Réponse de `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Solde de monnaie virtuelle (GET /virtual-currency/balance)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VcBalance {
    pub balance: f64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub last_updated: Option<String>,
}
