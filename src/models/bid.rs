// ============================================================================
// Structure : Bid
// ============================================================================
// Enchère la plus haute d'un objet (GET /bids/highest?itemId=...)
// et requête de placement d'enchère (POST /bids)
// ============================================================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Enchère telle que renvoyée par l'API
///
/// Seule l'enchère la plus haute est fetchée, jamais l'historique complet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    #[serde(default)]
    pub bid_id: Option<i64>,
    pub item_id: i64,

    /// Identifiant de l'enchérisseur
    #[serde(rename = "userId")]
    pub bidder_id: i64,

    pub bid_amount: f64,

    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

impl Bid {
    /// Vérifie si l'enchère appartient à l'utilisateur donné
    pub fn is_from(&self, user_id: i64) -> bool {
        self.bidder_id == user_id
    }
}

/// Corps de `POST /bids`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidRequest {
    pub item_id: i64,
    pub bid_amount: f64,
}
