// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod dashboard;   // Header, footer, marketplace, routage
pub mod events;      // Gestion des événements clavier
pub mod item_detail; // Page détail d'un objet (4 vues)
pub mod login;       // Écran de connexion
pub mod reputation;  // Réputation et feedbacks d'un utilisateur
pub mod wallet;      // Solde et historique VC

// Re-exports pour simplifier les imports
pub use dashboard::render;
pub use events::{Event, EventHandler};
