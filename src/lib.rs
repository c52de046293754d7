// ============================================================================
// LazyBid - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests d'intégration
// ============================================================================

pub mod api;       // Client REST du marketplace
pub mod app;       // État de l'application
pub mod config;    // Configuration (variables d'environnement)
pub mod item_view; // Réconciliation de la page détail d'un objet
pub mod models;    // Structures de données
pub mod session;   // Token d'authentification
pub mod ui;        // Interface utilisateur
pub mod worker;    // Worker thread async
