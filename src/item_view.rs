// ============================================================================
// ItemView : réconciliation de l'état de la page détail d'un objet
// ============================================================================
// Décide, uniquement à partir des réponses de l'API, quelle vue afficher :
// chargement, achat réussi, objet introuvable, ou vue active avec le
// formulaire d'enchère.
//
// CONCEPTS RUST :
// 1. Reducer pur : (ItemView, ItemViewEvent) -> ItemView
// 2. Compteur de génération : les réponses d'un écran démonté sont ignorées
// 3. Flags dérivés recalculés à chaque appel, jamais mis en cache
// ============================================================================

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::models::{AuthenticatedUser, Bid, Item, ItemStatus};

pub const ITEM_FETCH_ERROR: &str = "Failed to fetch item details. Please try again later.";
pub const BID_FETCH_ERROR: &str = "Failed to fetch highest bid.";
pub const BID_REJECTED_FALLBACK: &str = "Failed to place bid. Please try again.";

// ============================================================================
// Vues et événements
// ============================================================================

/// Les quatre vues mutuellement exclusives de la page détail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Un fetch initial est en cours, ou l'identité n'est pas encore connue
    Loading,

    /// L'utilisateur vient d'acheter l'objet (terminal pour la page)
    JustPurchased,

    /// Lien mort / objet supprimé
    NotFound,

    /// Affichage normal
    Active,
}

/// Événements appliqués au reducer
#[derive(Debug, Clone, PartialEq)]
pub enum ItemViewEvent {
    /// Les fetchs item + enchère la plus haute viennent d'être lancés
    FetchStarted { generation: u64, after_bid: bool },

    /// Réponse de `GET /items/{id}`
    ItemLoaded {
        generation: u64,
        result: Result<Item, ApiError>,
    },

    /// Réponse de `GET /bids/highest`
    HighestBidLoaded {
        generation: u64,
        result: Result<Bid, ApiError>,
    },

    /// Identité résolue (None = session anonyme)
    UserResolved(Option<AuthenticatedUser>),

    /// Le serveur a accepté l'enchère
    ///
    /// `buyout_before` est le prix de buyout capturé AVANT la soumission.
    BidSubmitted {
        generation: u64,
        amount: f64,
        buyout_before: Option<f64>,
    },

    /// Le serveur (ou la validation locale) a refusé l'enchère
    BidRejected { generation: u64, message: String },

    /// 401 reçu : la page est abandonnée, retour au login
    AuthExpired { generation: u64 },
}

impl ItemViewEvent {
    /// Génération portée par l'événement (None = indépendant du montage)
    pub fn generation(&self) -> Option<u64> {
        match self {
            ItemViewEvent::FetchStarted { generation, .. }
            | ItemViewEvent::ItemLoaded { generation, .. }
            | ItemViewEvent::HighestBidLoaded { generation, .. }
            | ItemViewEvent::BidSubmitted { generation, .. }
            | ItemViewEvent::BidRejected { generation, .. }
            | ItemViewEvent::AuthExpired { generation } => Some(*generation),
            ItemViewEvent::UserResolved(_) => None,
        }
    }
}

/// Vrai si le montant soumis déclenche l'achat immédiat
pub fn crosses_buyout(amount: f64, buyout_before: Option<f64>) -> bool {
    matches!(buyout_before, Some(buyout) if amount >= buyout)
}

// ============================================================================
// Validation locale de l'enchère
// ============================================================================

/// Refus côté client, avant tout appel réseau
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BidInputError {
    #[error("Please enter a valid amount.")]
    NotNumeric,

    #[error("Bid must be greater than the current price (${current_price:.2}).")]
    TooLow { current_price: f64 },
}

/// Valide le montant saisi : numérique et strictement supérieur au prix courant
///
/// Le serveur reste l'autorité finale sur la validité de l'enchère.
pub fn validate_bid_amount(input: &str, current_price: f64) -> Result<f64, BidInputError> {
    let amount: f64 = input
        .trim()
        .parse()
        .map_err(|_| BidInputError::NotNumeric)?;

    if !amount.is_finite() {
        return Err(BidInputError::NotNumeric);
    }

    if amount <= current_price {
        return Err(BidInputError::TooLow { current_price });
    }

    Ok(amount)
}

// ============================================================================
// État de la page
// ============================================================================

/// État de la page détail, ré-dérivé à chaque cycle de fetch
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    item_id: i64,
    generation: u64,

    item: Option<Item>,
    highest_bid: Option<Bid>,

    /// `GET /bids/highest` a répondu 404
    no_bids: bool,

    /// None tant que l'identité n'est pas résolue
    user: Option<Option<AuthenticatedUser>>,

    // Premières réponses reçues (sortie de Loading)
    item_settled: bool,
    bid_settled: bool,

    // Requêtes en vol (indicateur par requête, pas de verrou global)
    item_pending: bool,
    bid_pending: bool,

    /// Les fetchs en cours ont été lancés juste après une enchère acceptée
    after_bid: bool,

    just_bought: bool,
    not_found: bool,
    auth_expired: bool,

    // Erreurs en ligne, une par source : un fetch réussi n'efface que la sienne
    item_error: Option<String>,
    bid_error: Option<String>,
    form_error: Option<String>,
}

impl ItemView {
    /// Monte la page pour un objet, avec la génération de ce montage
    pub fn new(item_id: i64, generation: u64) -> Self {
        Self {
            item_id,
            generation,
            item: None,
            highest_bid: None,
            no_bids: false,
            user: None,
            item_settled: false,
            bid_settled: false,
            item_pending: false,
            bid_pending: false,
            after_bid: false,
            just_bought: false,
            not_found: false,
            auth_expired: false,
            item_error: None,
            bid_error: None,
            form_error: None,
        }
    }

    /// Applique un événement et retourne le nouvel état
    ///
    /// CONCEPT RUST : self par valeur
    /// - Le reducer consomme l'ancien état et en rend un nouveau
    /// - Aucun état partagé, testable sans UI
    pub fn reduce(mut self, event: ItemViewEvent) -> Self {
        if let Some(generation) = event.generation() {
            if generation != self.generation {
                debug!(
                    event_generation = generation,
                    current = self.generation,
                    "Discarding stale item view event"
                );
                return self;
            }
        }

        match event {
            ItemViewEvent::FetchStarted { after_bid, .. } => {
                self.item_pending = true;
                self.bid_pending = true;
                self.after_bid = after_bid;
            }

            ItemViewEvent::ItemLoaded { result, .. } => {
                self.item_pending = false;
                self.item_settled = true;
                self.apply_item_result(result);
            }

            ItemViewEvent::HighestBidLoaded { result, .. } => {
                self.bid_pending = false;
                self.bid_settled = true;
                self.apply_bid_result(result);
            }

            ItemViewEvent::UserResolved(user) => {
                self.user = Some(user);
                self.check_sold_to_user();
            }

            ItemViewEvent::BidSubmitted {
                amount,
                buyout_before,
                ..
            } => {
                self.form_error = None;

                if crosses_buyout(amount, buyout_before) {
                    info!(item_id = self.item_id, amount, "Bid reached buyout price");
                    self.just_bought = true;
                }
            }

            ItemViewEvent::BidRejected { message, .. } => {
                self.form_error = Some(message);
            }

            ItemViewEvent::AuthExpired { .. } => {
                warn!(item_id = self.item_id, "Session expired on item view");
                self.auth_expired = true;
            }
        }

        self
    }

    /// Version &mut du reducer, pratique pour l'App
    pub fn apply(&mut self, event: ItemViewEvent) {
        let placeholder = ItemView::new(self.item_id, self.generation);
        let current = std::mem::replace(self, placeholder);
        *self = current.reduce(event);
    }

    fn apply_item_result(&mut self, result: Result<Item, ApiError>) {
        match result {
            Ok(item) => {
                self.item = Some(item);
                self.not_found = false;
                self.item_error = None;
                self.check_sold_to_user();
            }
            Err(ApiError::NotFound) if self.after_bid => {
                // L'enchère a clos la vente : l'objet a quitté les annonces actives
                info!(item_id = self.item_id, "Item gone right after a bid");
                self.just_bought = true;
                self.item = None;
                self.item_error = None;
            }
            Err(ApiError::NotFound) => {
                self.not_found = true;
                self.item = None;
            }
            Err(ApiError::Unauthorized) => {
                self.auth_expired = true;
            }
            Err(e) => {
                // Données périmées mais visibles plutôt qu'une page vide
                warn!(item_id = self.item_id, error = %e, "Item fetch failed, keeping previous state");
                self.item_error = Some(ITEM_FETCH_ERROR.to_string());
            }
        }
    }

    fn apply_bid_result(&mut self, result: Result<Bid, ApiError>) {
        match result {
            Ok(bid) => {
                self.highest_bid = Some(bid);
                self.no_bids = false;
                self.bid_error = None;
            }
            Err(ApiError::NotFound) => {
                self.highest_bid = None;
                self.no_bids = true;
                self.bid_error = None;
            }
            Err(ApiError::Unauthorized) => {
                self.auth_expired = true;
            }
            Err(e) => {
                warn!(item_id = self.item_id, error = %e, "Highest bid fetch failed, keeping previous state");
                self.bid_error = Some(BID_FETCH_ERROR.to_string());
            }
        }
    }

    /// Objet SOLD juste après une enchère de l'utilisateur, qui n'en est pas le propriétaire
    ///
    /// Un tiers qui ouvre un objet déjà vendu voit la vue Active, sans formulaire.
    fn check_sold_to_user(&mut self) {
        let sold = self
            .item
            .as_ref()
            .is_some_and(|item| item.status == ItemStatus::Sold);

        if !sold || !self.after_bid {
            return;
        }

        if let (Some(item), Some(Some(user))) = (&self.item, &self.user) {
            if !item.is_owned_by(user.id) {
                self.just_bought = true;
            }
        }
    }

    // ========================================================================
    // Flags dérivés
    // ========================================================================

    /// Un fetch initial est en vol, ou l'identité n'est pas résolue
    pub fn loading(&self) -> bool {
        self.user.is_none() || !self.item_settled || !self.bid_settled
    }

    pub fn just_bought(&self) -> bool {
        self.just_bought
    }

    pub fn no_bids(&self) -> bool {
        self.no_bids
    }

    /// Vrai ssi : ACTIVE, authentifié, pas propriétaire, pas déjà meilleur enchérisseur
    pub fn can_place_bid(&self) -> bool {
        let (Some(item), Some(Some(user))) = (&self.item, &self.user) else {
            return false;
        };

        item.status == ItemStatus::Active
            && !item.is_owned_by(user.id)
            && self
                .highest_bid
                .as_ref()
                .map_or(true, |bid| !bid.is_from(user.id))
    }

    /// Vue à afficher
    ///
    /// CONCEPT RUST : Ordre des tests = priorité des vues
    pub fn view_state(&self) -> ViewState {
        if self.just_bought {
            ViewState::JustPurchased
        } else if self.loading() {
            ViewState::Loading
        } else if self.not_found || self.item.is_none() {
            ViewState::NotFound
        } else {
            ViewState::Active
        }
    }

    // ========================================================================
    // Accesseurs
    // ========================================================================

    pub fn item_id(&self) -> i64 {
        self.item_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    pub fn highest_bid(&self) -> Option<&Bid> {
        self.highest_bid.as_ref()
    }

    /// Erreur en ligne à afficher (formulaire d'abord, puis fetchs)
    pub fn error(&self) -> Option<&str> {
        self.form_error
            .as_deref()
            .or(self.item_error.as_deref())
            .or(self.bid_error.as_deref())
    }

    pub fn auth_expired(&self) -> bool {
        self.auth_expired
    }

    /// Un rafraîchissement est en vol (indicateur discret, la vue reste affichée)
    pub fn refreshing(&self) -> bool {
        self.item_pending || self.bid_pending
    }

    /// Erreur locale (validation du formulaire)
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.form_error = Some(message.into());
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
