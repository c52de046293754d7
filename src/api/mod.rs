// ============================================================================
// Module : api
// ============================================================================
// Client de l'API REST du marketplace + taxonomie d'erreurs
// ============================================================================

pub mod client; // Client reqwest
pub mod error;  // ApiError

use async_trait::async_trait;

use crate::models::{
    AuthenticatedUser, Bid, Feedback, Item, PlaceBidRequest, SearchQuery, UserReputation,
    VcBalance, VcTransaction,
};

// Re-exports pour simplifier les imports
pub use client::ApiClient;
pub use error::ApiError;

/// Surface de l'API consommée par le client
///
/// CONCEPT RUST : Trait comme seam
/// - ApiClient l'implémente avec de vrais appels HTTP
/// - Les tests du worker l'implémentent avec un faux en mémoire
#[async_trait]
pub trait MarketApi: Send + Sync {
    /// POST /auth/login (stocke le token dans la session)
    async fn login(&self, email: &str, password: &str) -> Result<(), ApiError>;

    /// GET /profile
    async fn fetch_profile(&self) -> Result<AuthenticatedUser, ApiError>;

    /// GET /virtual-currency/balance
    async fn fetch_balance(&self) -> Result<VcBalance, ApiError>;

    /// GET /items/active
    async fn fetch_active_items(&self) -> Result<Vec<Item>, ApiError>;

    /// GET /items/search?keyword=&category=
    async fn search_items(&self, query: &SearchQuery) -> Result<Vec<Item>, ApiError>;

    /// GET /items/{id}
    async fn fetch_item(&self, item_id: i64) -> Result<Item, ApiError>;

    /// GET /bids/highest?itemId={id}
    async fn fetch_highest_bid(&self, item_id: i64) -> Result<Bid, ApiError>;

    /// POST /bids
    async fn place_bid(&self, request: &PlaceBidRequest) -> Result<(), ApiError>;

    /// GET /virtual-currency/transactions
    async fn fetch_transactions(&self) -> Result<Vec<VcTransaction>, ApiError>;

    /// GET /feedback/reputation/{userId}
    async fn fetch_reputation(&self, user_id: i64) -> Result<UserReputation, ApiError>;

    /// GET /feedback/user/{userId}
    async fn fetch_feedback(&self, user_id: i64) -> Result<Vec<Feedback>, ApiError>;
}
