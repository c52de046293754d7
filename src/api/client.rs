// ============================================================================
// API Client : marketplace BarterSwap
// ============================================================================
// Client HTTP/JSON pour l'API REST du marketplace
//
// CONCEPTS RUST :
// 1. async/await : les requêtes ne bloquent pas le thread
// 2. Arc<Session> : le token est injecté à la construction, pas lu en global
// 3. Génériques + DeserializeOwned : un seul helper pour toutes les routes
// ============================================================================

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use crate::api::{ApiError, MarketApi};
use crate::config::Config;
use crate::models::{
    AuthenticatedUser, Bid, Feedback, Item, LoginRequest, LoginResponse, PlaceBidRequest,
    SearchQuery, UserReputation, VcBalance, VcTransaction,
};
use crate::session::Session;

/// Client de l'API du marketplace
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    /// Crée le client HTTP à partir de la configuration
    ///
    /// CONCEPT : Default headers
    /// - Content-Type / Accept JSON sur toutes les requêtes
    /// - Le bearer token est ajouté requête par requête (il peut changer)
    pub fn new(config: &Config, session: Arc<Session>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .context("Échec de la création du client HTTP")?;

        debug!(base_url = %config.api_url, timeout = ?config.timeout, "API client created");

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Construit une requête authentifiée
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, url);

        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Envoie la requête et désérialise le corps JSON
    ///
    /// CONCEPT RUST : Conversion d'erreurs avec ?
    /// - reqwest::Error -> ApiError via From (réseau ou décodage)
    /// - statut non-2xx -> ApiError::from_status
    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(builder).await?;

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            error!(error = %e, "Failed to parse JSON response");
            ApiError::Decode(e.to_string())
        })
    }

    /// Envoie la requête et vérifie le statut
    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Request failed before any response");
            ApiError::from(e)
        })?;

        let status = response.status();
        debug!(status = %status, url = %response.url(), "Received HTTP response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status, &body);
        match &err {
            ApiError::NotFound => debug!("Resource not found"),
            ApiError::Unauthorized => warn!("Request unauthorized"),
            other => error!(error = %other, "API returned error status"),
        }
        Err(err)
    }
}

#[async_trait]
impl MarketApi for ApiClient {
    /// Authentifie l'utilisateur et enregistre le token dans la session
    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response: LoginResponse = self
            .send_json(self.request(Method::POST, "/auth/login").json(&body))
            .await?;

        if let Err(e) = self.session.store(response.token) {
            warn!(error = ?e, "Token kept in memory only");
        }

        info!("Login succeeded");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_profile(&self) -> Result<AuthenticatedUser, ApiError> {
        self.send_json(self.request(Method::GET, "/profile")).await
    }

    #[instrument(skip(self))]
    async fn fetch_balance(&self) -> Result<VcBalance, ApiError> {
        self.send_json(self.request(Method::GET, "/virtual-currency/balance"))
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_active_items(&self) -> Result<Vec<Item>, ApiError> {
        let items: Vec<Item> = self
            .send_json(self.request(Method::GET, "/items/active"))
            .await?;
        info!(count = items.len(), "Active items fetched");
        Ok(items)
    }

    /// Seuls les filtres renseignés partent dans la query string
    #[instrument(skip(self))]
    async fn search_items(&self, query: &SearchQuery) -> Result<Vec<Item>, ApiError> {
        let builder = self
            .request(Method::GET, "/items/search")
            .query(&query.params());
        let items: Vec<Item> = self.send_json(builder).await?;
        info!(count = items.len(), "Search results fetched");
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn fetch_item(&self, item_id: i64) -> Result<Item, ApiError> {
        self.send_json(self.request(Method::GET, &format!("/items/{}", item_id)))
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_highest_bid(&self, item_id: i64) -> Result<Bid, ApiError> {
        let builder = self
            .request(Method::GET, "/bids/highest")
            .query(&[("itemId", item_id)]);
        self.send_json(builder).await
    }

    /// Place une enchère ; le corps de la réponse est ignoré
    /// (l'état est toujours re-fetché ou court-circuité par le buyout)
    #[instrument(skip(self), fields(item_id = request.item_id, amount = request.bid_amount))]
    async fn place_bid(&self, request: &PlaceBidRequest) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, "/bids").json(request))
            .await?;
        info!("Bid accepted by server");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_transactions(&self) -> Result<Vec<VcTransaction>, ApiError> {
        self.send_json(self.request(Method::GET, "/virtual-currency/transactions"))
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_reputation(&self, user_id: i64) -> Result<UserReputation, ApiError> {
        let path = format!("/feedback/reputation/{}", user_id);
        self.send_json(self.request(Method::GET, &path)).await
    }

    #[instrument(skip(self))]
    async fn fetch_feedback(&self, user_id: i64) -> Result<Vec<Feedback>, ApiError> {
        let path = format!("/feedback/user/{}", user_id);
        self.send_json(self.request(Method::GET, &path)).await
    }
}
