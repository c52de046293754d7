// ============================================================================
// Module : models
// ============================================================================
// DTOs consommés depuis l'API du marketplace (lecture seule)
// ============================================================================

pub mod bid;      // Enchère la plus haute + requête de placement
pub mod feedback; // Réputation et feedbacks reçus
pub mod item;     // Objet en vente
pub mod ledger;   // Historique de monnaie virtuelle
pub mod search;   // Filtres de recherche
pub mod user;     // Utilisateur authentifié, login, solde VC

// Re-export des structures principales pour simplifier les imports
pub use bid::{Bid, PlaceBidRequest};
pub use feedback::{Feedback, UserReputation};
pub use item::{Item, ItemStatus, UserSummary};
pub use ledger::VcTransaction;
pub use search::{SearchError, SearchQuery, CATEGORIES};
pub use user::{AuthenticatedUser, LoginRequest, LoginResponse, VcBalance};
