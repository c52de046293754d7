// ============================================================================
// Structure : Item
// ============================================================================
// Représente un objet mis en vente (enchère) sur le marketplace
//
// CONCEPTS RUST :
// 1. #[serde(rename_all = "camelCase")] : mappe "currentPrice" -> current_price
// 2. Option<T> : champs optionnels (buyout, fin d'enchère, images)
// 3. Enum avec serde : "ACTIVE" (JSON) -> ItemStatus::Active (Rust)
// ============================================================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Statut d'un objet côté serveur
///
/// Seul ACTIVE accepte encore des enchères.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemStatus {
    Active,
    Pending,
    Sold,
    Cancelled,
}

impl ItemStatus {
    /// Libellé court pour l'affichage
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Active => "ACTIVE",
            ItemStatus::Pending => "PENDING",
            ItemStatus::Sold => "SOLD",
            ItemStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Résumé du vendeur tel qu'embarqué dans la réponse item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// Objet en vente, tel que renvoyé par `GET /items/{id}`
///
/// DTO en lecture seule : le client ne modifie jamais ces valeurs,
/// il les re-fetch après chaque action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    pub current_price: f64,
    #[serde(default)]
    pub starting_price: f64,

    /// Prix d'achat immédiat (absent si l'objet n'en a pas)
    #[serde(default)]
    pub buyout_price: Option<f64>,

    /// Fin de l'enchère (heure locale du serveur, sans fuseau)
    #[serde(default)]
    pub auction_end_time: Option<NaiveDateTime>,

    pub status: ItemStatus,

    #[serde(default)]
    pub seller_id: Option<i64>,
    #[serde(default)]
    pub seller_username: Option<String>,
    #[serde(default)]
    pub user: Option<UserSummary>,

    #[serde(default)]
    pub primary_image_url: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl Item {
    /// Identifiant du propriétaire (vendeur)
    ///
    /// CONCEPT RUST : Option::or_else
    /// - sellerId est prioritaire
    /// - sinon on se rabat sur user.userId
    pub fn owner_id(&self) -> Option<i64> {
        self.seller_id
            .or_else(|| self.user.as_ref().map(|u| u.user_id))
    }

    /// Vérifie si l'utilisateur donné est le propriétaire de l'objet
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id() == Some(user_id)
    }

    /// Vérifie si l'objet accepte encore des enchères
    pub fn is_active(&self) -> bool {
        self.status == ItemStatus::Active
    }

    /// Nom du vendeur pour l'affichage
    pub fn seller_label(&self) -> String {
        self.seller_username
            .clone()
            .or_else(|| self.user.as_ref().and_then(|u| u.username.clone()))
            .or_else(|| self.owner_id().map(|id| format!("User #{}", id)))
            .unwrap_or_else(|| "?".to_string())
    }

    /// Formatte l'objet pour une ligne de la liste du marketplace
    ///
    /// Format : "Calculatrice TI-84        $45.00   buyout $80.00  ACTIVE"
    pub fn display(&self) -> String {
        let truncated_title = if self.title.chars().count() <= 28 {
            self.title.clone()
        } else {
            let truncated: String = self.title.chars().take(27).collect();
            format!("{}…", truncated)
        };

        let buyout_str = match self.buyout_price {
            Some(price) => format!("buyout ${:.2}", price),
            None => String::new(),
        };

        format!(
            "{:<28} {:>10}  {:<16} {}",
            truncated_title,
            format!("${:.2}", self.current_price),
            buyout_str,
            self.status.label()
        )
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
