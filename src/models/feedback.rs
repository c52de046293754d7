// ============================================================================
// Structures : réputation et feedbacks reçus
// ============================================================================
// GET /feedback/reputation/{userId} et GET /feedback/user/{userId}
// La réputation est calculée côté serveur, le client ne fait qu'afficher
// ============================================================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Feedback reçu par un utilisateur
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(default)]
    pub feedback_id: Option<i64>,
    #[serde(default)]
    pub giver_username: Option<String>,
    #[serde(default)]
    pub item_title: Option<String>,

    /// ONE_STARS .. FIVE_STARS
    pub score: String,

    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

impl Feedback {
    /// Nombre d'étoiles (None si le score n'est pas une note en étoiles)
    pub fn stars(&self) -> Option<u8> {
        match self.score.as_str() {
            "ONE_STARS" => Some(1),
            "TWO_STARS" => Some(2),
            "THREE_STARS" => Some(3),
            "FOUR_STARS" => Some(4),
            "FIVE_STARS" => Some(5),
            _ => None,
        }
    }
}

/// Réputation agrégée d'un utilisateur
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReputation {
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub reputation: Option<i64>,
    #[serde(default)]
    pub total_reviews: i64,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub one_star_count: i64,
    #[serde(default)]
    pub two_star_count: i64,
    #[serde(default)]
    pub three_star_count: i64,
    #[serde(default)]
    pub four_star_count: i64,
    #[serde(default)]
    pub five_star_count: i64,
}

impl UserReputation {
    /// Répartition des notes, de 5 à 1 étoile
    pub fn star_counts(&self) -> [(u8, i64); 5] {
        [
            (5, self.five_star_count),
            (4, self.four_star_count),
            (3, self.three_star_count),
            (2, self.two_star_count),
            (1, self.one_star_count),
        ]
    }
}
