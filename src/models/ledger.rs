// ============================================================================
// Structure : VcTransaction
// ============================================================================
// Historique de monnaie virtuelle (GET /virtual-currency/transactions)
// Lecture seule : le serveur règle les ventes et les bonus de feedback
// ============================================================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Ligne du registre de monnaie virtuelle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VcTransaction {
    #[serde(default)]
    pub transaction_id: Option<i64>,

    /// COMPLETED, FEEDBACK_REWARD, FEEDBACK_PENALTY, ...
    #[serde(rename = "type")]
    pub kind: String,

    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub related_item_title: Option<String>,
    #[serde(default)]
    pub seller_id: Option<i64>,
    #[serde(default)]
    pub buyer_id: Option<i64>,
}

impl VcTransaction {
    /// Libellé lisible du type
    pub fn kind_label(&self) -> &str {
        match self.kind.as_str() {
            "COMPLETED" => "Sale",
            "FEEDBACK_REWARD" => "Feedback Reward",
            "FEEDBACK_PENALTY" => "Feedback Penalty",
            other => other,
        }
    }

    /// Montant signé du point de vue de l'utilisateur
    ///
    /// Bonus et pénalités ont leur propre signe ; une vente crédite le
    /// vendeur et débite l'acheteur.
    pub fn signed_amount(&self, user_id: Option<i64>) -> f64 {
        let amount = self.amount.abs();
        match self.kind.as_str() {
            "FEEDBACK_REWARD" => amount,
            "FEEDBACK_PENALTY" => -amount,
            _ if user_id.is_some() && self.seller_id == user_id => amount,
            _ => -amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(seller: i64, buyer: i64) -> VcTransaction {
        VcTransaction {
            transaction_id: Some(1),
            kind: "COMPLETED".to_string(),
            amount: 45.0,
            description: None,
            timestamp: None,
            related_item_title: Some("Lampe".to_string()),
            seller_id: Some(seller),
            buyer_id: Some(buyer),
        }
    }

    #[test]
    fn test_transaction_deserialize() {
        let json = r#"{
            "transactionId": 12,
            "type": "FEEDBACK_PENALTY",
            "amount": 2.5,
            "description": "Negative feedback received",
            "timestamp": "2026-09-14T10:00:00"
        }"#;
        let tx: VcTransaction = serde_json::from_str(json).unwrap();

        assert_eq!(tx.kind_label(), "Feedback Penalty");
        assert_eq!(tx.signed_amount(Some(9)), -2.5);
        assert!(tx.related_item_title.is_none());
    }

    #[test]
    fn test_sale_sign_depends_on_side() {
        assert_eq!(sale(9, 4).signed_amount(Some(9)), 45.0);
        assert_eq!(sale(4, 9).signed_amount(Some(9)), -45.0);
        assert_eq!(sale(4, 9).kind_label(), "Sale");
    }
}
