// ============================================================================
// Worker : exécution des appels API en arrière-plan
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - L'event loop envoie des AppCommand au worker thread
// - Le worker exécute les appels async sur son propre runtime tokio
// - Les résultats reviennent en AppResult via un second channel
//
// Les commandes de la page détail portent la génération du montage qui les
// a émises : l'App jette les résultats d'un écran déjà démonté.
// ============================================================================

use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;

use tracing::{debug, error, info, warn};

use crate::api::{ApiError, MarketApi};
use crate::item_view::{crosses_buyout, ItemViewEvent, BID_REJECTED_FALLBACK};
use crate::models::{
    AuthenticatedUser, Feedback, Item, PlaceBidRequest, SearchQuery, UserReputation, VcBalance,
    VcTransaction,
};

pub const LOGIN_FAILED: &str = "Invalid email or password";
pub const MARKETPLACE_FETCH_ERROR: &str = "Failed to fetch items. Please try again later.";
pub const SEARCH_FAILED: &str = "Failed to search items.";
pub const WALLET_FETCH_ERROR: &str = "Failed to fetch virtual currency data";
pub const REPUTATION_FETCH_ERROR: &str = "Failed to fetch profile.";

/// Commandes envoyées au worker thread
#[derive(Clone, PartialEq)]
pub enum AppCommand {
    /// POST /auth/login puis chargement du profil
    Login { email: String, password: String },

    /// Résout l'identité (profil) et le solde VC
    LoadSession,

    /// Liste des objets actifs
    LoadMarketplace,

    /// Recherche par mot-clé et/ou catégorie
    SearchMarketplace { query: SearchQuery },

    /// Solde + historique de monnaie virtuelle
    LoadWallet,

    /// Réputation + feedbacks reçus d'un utilisateur
    LoadReputation { user_id: i64 },

    /// Fetchs concurrents item + enchère la plus haute
    LoadItem { item_id: i64, generation: u64 },

    /// Place une enchère déjà validée localement
    SubmitBid {
        item_id: i64,
        generation: u64,
        amount: f64,
        buyout_before: Option<f64>,
    },
}

// Debug manuel : le mot de passe ne doit jamais finir dans les logs
impl std::fmt::Debug for AppCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppCommand::Login { email, .. } => f
                .debug_struct("Login")
                .field("email", email)
                .finish_non_exhaustive(),
            AppCommand::LoadSession => write!(f, "LoadSession"),
            AppCommand::LoadMarketplace => write!(f, "LoadMarketplace"),
            AppCommand::SearchMarketplace { query } => f
                .debug_struct("SearchMarketplace")
                .field("query", query)
                .finish(),
            AppCommand::LoadWallet => write!(f, "LoadWallet"),
            AppCommand::LoadReputation { user_id } => f
                .debug_struct("LoadReputation")
                .field("user_id", user_id)
                .finish(),
            AppCommand::LoadItem { item_id, generation } => f
                .debug_struct("LoadItem")
                .field("item_id", item_id)
                .field("generation", generation)
                .finish(),
            AppCommand::SubmitBid {
                item_id,
                generation,
                amount,
                buyout_before,
            } => f
                .debug_struct("SubmitBid")
                .field("item_id", item_id)
                .field("generation", generation)
                .field("amount", amount)
                .field("buyout_before", buyout_before)
                .finish(),
        }
    }
}

/// Résultats renvoyés par le worker thread
#[derive(Debug, Clone, PartialEq)]
pub enum AppResult {
    /// Token obtenu et stocké dans la session
    LoggedIn,

    /// Échec du login (message affiché tel quel)
    LoginFailed { error: String },

    /// Identité résolue (None = profil indisponible)
    ProfileLoaded { user: Option<AuthenticatedUser> },

    /// Solde de monnaie virtuelle
    BalanceLoaded(VcBalance),

    /// Objets actifs du marketplace
    MarketplaceLoaded(Vec<Item>),

    /// Échec du chargement du marketplace (ou de la recherche)
    MarketplaceError { error: String },

    /// Historique de monnaie virtuelle
    TransactionsLoaded(Vec<VcTransaction>),

    /// Échec du chargement du portefeuille
    WalletError { error: String },

    /// Réputation agrégée
    ReputationLoaded(UserReputation),

    /// Feedbacks reçus
    FeedbackLoaded(Vec<Feedback>),

    /// Échec du chargement de la réputation
    ReputationError { error: String },

    /// Événement pour le reducer de la page détail
    ItemView(ItemViewEvent),

    /// 401 hors page détail : retour au login
    AuthExpired,
}

// ============================================================================
// Flows async (testables avec un faux MarketApi)
// ============================================================================

/// Exécute une commande et envoie ses résultats au fur et à mesure
pub async fn execute<A: MarketApi + ?Sized>(api: &A, command: AppCommand, tx: &mpsc::Sender<AppResult>) {
    match command {
        AppCommand::Login { email, password } => login(api, &email, &password, tx).await,
        AppCommand::LoadSession => load_session(api, tx).await,
        AppCommand::LoadMarketplace => load_marketplace(api, tx).await,
        AppCommand::SearchMarketplace { query } => search_marketplace(api, &query, tx).await,
        AppCommand::LoadWallet => load_wallet(api, tx).await,
        AppCommand::LoadReputation { user_id } => load_reputation(api, user_id, tx).await,
        AppCommand::LoadItem { item_id, generation } => {
            load_item(api, item_id, generation, false, tx).await
        }
        AppCommand::SubmitBid {
            item_id,
            generation,
            amount,
            buyout_before,
        } => submit_bid(api, item_id, generation, amount, buyout_before, tx).await,
    }
}

/// Login puis résolution de l'identité
pub async fn login<A: MarketApi + ?Sized>(api: &A, email: &str, password: &str, tx: &mpsc::Sender<AppResult>) {
    match api.login(email, password).await {
        Ok(()) => {
            info!(email = %email, "User logged in");
            send(tx, AppResult::LoggedIn);
            load_session(api, tx).await;
        }
        Err(e @ ApiError::Network(_)) => {
            error!(error = %e, "Login failed (network)");
            send(tx, AppResult::LoginFailed { error: e.to_string() });
        }
        Err(e) => {
            warn!(error = %e, "Login rejected");
            send(tx, AppResult::LoginFailed { error: LOGIN_FAILED.to_string() });
        }
    }
}

/// Profil (identité) puis solde VC
pub async fn load_session<A: MarketApi + ?Sized>(api: &A, tx: &mpsc::Sender<AppResult>) {
    match api.fetch_profile().await {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, "Profile loaded");
            send(tx, AppResult::ProfileLoaded { user: Some(user) });
        }
        Err(ApiError::Unauthorized) => {
            send(tx, AppResult::AuthExpired);
            return;
        }
        Err(e) => {
            error!(error = %e, "Failed to load profile");
            send(tx, AppResult::ProfileLoaded { user: None });
            return;
        }
    }

    // Le solde est purement informatif
    match api.fetch_balance().await {
        Ok(balance) => send(tx, AppResult::BalanceLoaded(balance)),
        Err(ApiError::Unauthorized) => send(tx, AppResult::AuthExpired),
        Err(e) => warn!(error = %e, "Failed to load VC balance"),
    }
}

/// Liste des objets actifs
pub async fn load_marketplace<A: MarketApi + ?Sized>(api: &A, tx: &mpsc::Sender<AppResult>) {
    match api.fetch_active_items().await {
        Ok(items) => send(tx, AppResult::MarketplaceLoaded(items)),
        Err(ApiError::Unauthorized) => send(tx, AppResult::AuthExpired),
        Err(e) => {
            error!(error = %e, "Failed to load marketplace");
            send(tx, AppResult::MarketplaceError {
                error: MARKETPLACE_FETCH_ERROR.to_string(),
            });
        }
    }
}

/// Recherche dans le marketplace (même résultat que la liste complète)
pub async fn search_marketplace<A: MarketApi + ?Sized>(
    api: &A,
    query: &SearchQuery,
    tx: &mpsc::Sender<AppResult>,
) {
    match api.search_items(query).await {
        Ok(items) => send(tx, AppResult::MarketplaceLoaded(items)),
        Err(ApiError::Unauthorized) => send(tx, AppResult::AuthExpired),
        Err(e) => {
            error!(error = %e, ?query, "Search failed");
            send(tx, AppResult::MarketplaceError {
                error: SEARCH_FAILED.to_string(),
            });
        }
    }
}

/// Solde et historique en parallèle
///
/// Un 401 sur l'un des deux renvoie au login ; sinon ce qui a réussi est
/// affiché et un seul message d'erreur couvre les échecs.
pub async fn load_wallet<A: MarketApi + ?Sized>(api: &A, tx: &mpsc::Sender<AppResult>) {
    let (balance, transactions) = tokio::join!(api.fetch_balance(), api.fetch_transactions());

    if matches!(balance, Err(ApiError::Unauthorized))
        || matches!(transactions, Err(ApiError::Unauthorized))
    {
        send(tx, AppResult::AuthExpired);
        return;
    }

    let mut failed = false;
    match balance {
        Ok(balance) => send(tx, AppResult::BalanceLoaded(balance)),
        Err(e) => {
            error!(error = %e, "Failed to load VC balance");
            failed = true;
        }
    }
    match transactions {
        Ok(transactions) => {
            debug!(count = transactions.len(), "Transactions loaded");
            send(tx, AppResult::TransactionsLoaded(transactions));
        }
        Err(e) => {
            error!(error = %e, "Failed to load VC transactions");
            failed = true;
        }
    }

    if failed {
        send(tx, AppResult::WalletError {
            error: WALLET_FETCH_ERROR.to_string(),
        });
    }
}

/// Réputation et feedbacks en parallèle (même règle que le portefeuille)
pub async fn load_reputation<A: MarketApi + ?Sized>(api: &A, user_id: i64, tx: &mpsc::Sender<AppResult>) {
    let (reputation, feedback) =
        tokio::join!(api.fetch_reputation(user_id), api.fetch_feedback(user_id));

    if matches!(reputation, Err(ApiError::Unauthorized))
        || matches!(feedback, Err(ApiError::Unauthorized))
    {
        send(tx, AppResult::AuthExpired);
        return;
    }

    let mut failed = false;
    match reputation {
        Ok(reputation) => send(tx, AppResult::ReputationLoaded(reputation)),
        Err(e) => {
            error!(user_id, error = %e, "Failed to load reputation");
            failed = true;
        }
    }
    match feedback {
        Ok(feedback) => send(tx, AppResult::FeedbackLoaded(feedback)),
        Err(e) => {
            error!(user_id, error = %e, "Failed to load feedback");
            failed = true;
        }
    }

    if failed {
        send(tx, AppResult::ReputationError {
            error: REPUTATION_FETCH_ERROR.to_string(),
        });
    }
}

/// Fetchs concurrents de l'objet et de l'enchère la plus haute
///
/// CONCEPT RUST : tokio::join!
/// - Les deux requêtes partent en même temps, sans dépendance d'ordre
/// - Chacune envoie son résultat dès qu'elle se termine
pub async fn load_item<A: MarketApi + ?Sized>(
    api: &A,
    item_id: i64,
    generation: u64,
    after_bid: bool,
    tx: &mpsc::Sender<AppResult>,
) {
    debug!(item_id, generation, after_bid, "Fetching item and highest bid");
    send(tx, AppResult::ItemView(ItemViewEvent::FetchStarted { generation, after_bid }));

    let item_tx = tx.clone();
    let bid_tx = tx.clone();

    tokio::join!(
        async move {
            let result = api.fetch_item(item_id).await;
            send(&item_tx, AppResult::ItemView(ItemViewEvent::ItemLoaded { generation, result }));
        },
        async move {
            let result = api.fetch_highest_bid(item_id).await;
            send(&bid_tx, AppResult::ItemView(ItemViewEvent::HighestBidLoaded { generation, result }));
        }
    );
}

/// Place l'enchère puis décide : achat immédiat ou rafraîchissement
///
/// Le buyout est comparé au prix capturé AVANT la soumission, et seulement
/// une fois l'enchère acceptée par le serveur.
pub async fn submit_bid<A: MarketApi + ?Sized>(
    api: &A,
    item_id: i64,
    generation: u64,
    amount: f64,
    buyout_before: Option<f64>,
    tx: &mpsc::Sender<AppResult>,
) {
    let request = PlaceBidRequest {
        item_id,
        bid_amount: amount,
    };

    match api.place_bid(&request).await {
        Ok(()) => {
            send(tx, AppResult::ItemView(ItemViewEvent::BidSubmitted {
                generation,
                amount,
                buyout_before,
            }));

            if crosses_buyout(amount, buyout_before) {
                info!(item_id, amount, "Buyout reached, skipping refetch");
            } else {
                load_item(api, item_id, generation, true, tx).await;
            }
        }
        Err(ApiError::Unauthorized) => {
            send(tx, AppResult::ItemView(ItemViewEvent::AuthExpired { generation }));
        }
        Err(e) => {
            warn!(item_id, amount, error = %e, "Bid rejected");
            let message = match e {
                ApiError::Validation(Some(message)) => message,
                ApiError::Server {
                    message: Some(message),
                    ..
                } => message,
                _ => BID_REJECTED_FALLBACK.to_string(),
            };
            send(tx, AppResult::ItemView(ItemViewEvent::BidRejected { generation, message }));
        }
    }
}

/// Envoie un résultat ; un receiver fermé signifie que l'UI est partie
fn send(tx: &mpsc::Sender<AppResult>, result: AppResult) {
    if tx.send(result).is_err() {
        debug!("Result channel closed, dropping result");
    }
}

// ============================================================================
// Worker thread
// ============================================================================

/// Lance le worker thread avec son runtime tokio
///
/// CONCEPT RUST : Thread + async runtime
/// - std::thread::spawn() : crée un thread OS
/// - block_on() bloque le worker, jamais l'UI
/// - La boucle s'arrête quand l'UI ferme le channel de commandes
pub fn spawn_worker(
    api: Arc<dyn MarketApi>,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = %e, "Failed to create tokio runtime, worker not started");
                return;
            }
        };

        while let Ok(command) = command_rx.recv() {
            info!(?command, "Worker received command");
            runtime.block_on(execute(api.as_ref(), command, &result_tx));
        }

        info!("Worker thread exiting (channel closed)");
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bid, ItemStatus};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Faux serveur en mémoire
    #[derive(Default)]
    struct FakeApi {
        item: Mutex<Option<Result<Item, ApiError>>>,
        highest: Mutex<Option<Result<Bid, ApiError>>>,
        bid_response: Mutex<Option<Result<(), ApiError>>>,
        place_bid_calls: Mutex<Vec<PlaceBidRequest>>,
        item_fetches: Mutex<usize>,
        searches: Mutex<Vec<SearchQuery>>,
        transactions: Mutex<Option<Result<Vec<VcTransaction>, ApiError>>>,
        feedback: Mutex<Option<Result<Vec<Feedback>, ApiError>>>,
    }

    impl FakeApi {
        fn with_item(item: Result<Item, ApiError>, highest: Result<Bid, ApiError>) -> Self {
            let api = Self::default();
            *api.item.lock().unwrap() = Some(item);
            *api.highest.lock().unwrap() = Some(highest);
            api
        }
    }

    #[async_trait]
    impl MarketApi for FakeApi {
        async fn login(&self, _email: &str, password: &str) -> Result<(), ApiError> {
            if password == "secret" {
                Ok(())
            } else {
                Err(ApiError::Unauthorized)
            }
        }

        async fn fetch_profile(&self) -> Result<AuthenticatedUser, ApiError> {
            Ok(AuthenticatedUser {
                id: 9,
                username: "bob".to_string(),
                email: None,
                reputation: Some(4),
            })
        }

        async fn fetch_balance(&self) -> Result<VcBalance, ApiError> {
            Err(ApiError::Server { status: 500, message: None })
        }

        async fn fetch_active_items(&self) -> Result<Vec<Item>, ApiError> {
            Err(ApiError::Unauthorized)
        }

        async fn fetch_item(&self, _item_id: i64) -> Result<Item, ApiError> {
            *self.item_fetches.lock().unwrap() += 1;
            self.item.lock().unwrap().clone().unwrap_or(Err(ApiError::NotFound))
        }

        async fn fetch_highest_bid(&self, _item_id: i64) -> Result<Bid, ApiError> {
            self.highest.lock().unwrap().clone().unwrap_or(Err(ApiError::NotFound))
        }

        async fn place_bid(&self, request: &PlaceBidRequest) -> Result<(), ApiError> {
            self.place_bid_calls.lock().unwrap().push(request.clone());
            self.bid_response.lock().unwrap().clone().unwrap_or(Ok(()))
        }

        async fn search_items(&self, query: &SearchQuery) -> Result<Vec<Item>, ApiError> {
            self.searches.lock().unwrap().push(query.clone());
            match query.category.as_deref() {
                Some("SPORTS") => Err(ApiError::Server { status: 500, message: None }),
                _ => Ok(vec![item(100.0, None)]),
            }
        }

        async fn fetch_transactions(&self) -> Result<Vec<VcTransaction>, ApiError> {
            self.transactions.lock().unwrap().clone().unwrap_or(Ok(Vec::new()))
        }

        async fn fetch_reputation(&self, user_id: i64) -> Result<UserReputation, ApiError> {
            Ok(UserReputation {
                user_id,
                username: Some("alice".to_string()),
                reputation: Some(7),
                total_reviews: 1,
                average_rating: Some(5.0),
                one_star_count: 0,
                two_star_count: 0,
                three_star_count: 0,
                four_star_count: 0,
                five_star_count: 1,
            })
        }

        async fn fetch_feedback(&self, _user_id: i64) -> Result<Vec<Feedback>, ApiError> {
            self.feedback.lock().unwrap().clone().unwrap_or(Ok(Vec::new()))
        }
    }

    fn item(current: f64, buyout: Option<f64>) -> Item {
        Item {
            item_id: 7,
            title: "Vélo".to_string(),
            description: String::new(),
            category: None,
            condition: None,
            current_price: current,
            starting_price: 50.0,
            buyout_price: buyout,
            auction_end_time: None,
            status: ItemStatus::Active,
            seller_id: Some(3),
            seller_username: None,
            user: None,
            primary_image_url: None,
            image_urls: Vec::new(),
        }
    }

    fn collect(rx: &mpsc::Receiver<AppResult>) -> Vec<AppResult> {
        rx.try_iter().collect()
    }

    #[tokio::test]
    async fn test_load_item_emits_both_results() {
        let api = FakeApi::with_item(Ok(item(100.0, None)), Err(ApiError::NotFound));
        let (tx, rx) = mpsc::channel();

        load_item(&api, 7, 2, false, &tx).await;
        let results = collect(&rx);

        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0],
            AppResult::ItemView(ItemViewEvent::FetchStarted { generation: 2, after_bid: false })
        );
        assert!(results.contains(&AppResult::ItemView(ItemViewEvent::HighestBidLoaded {
            generation: 2,
            result: Err(ApiError::NotFound),
        })));
    }

    #[tokio::test]
    async fn test_bid_at_buyout_skips_refetch() {
        let api = FakeApi::with_item(Ok(item(100.0, Some(150.0))), Err(ApiError::NotFound));
        let (tx, rx) = mpsc::channel();

        submit_bid(&api, 7, 1, 160.0, Some(150.0), &tx).await;
        let results = collect(&rx);

        assert_eq!(
            results,
            vec![AppResult::ItemView(ItemViewEvent::BidSubmitted {
                generation: 1,
                amount: 160.0,
                buyout_before: Some(150.0),
            })]
        );
        assert_eq!(*api.item_fetches.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_bid_below_buyout_refetches_after_bid() {
        let api = FakeApi::with_item(Ok(item(120.0, None)), Ok(Bid {
            bid_id: Some(1),
            item_id: 7,
            bidder_id: 9,
            bid_amount: 120.0,
            timestamp: None,
        }));
        let (tx, rx) = mpsc::channel();

        submit_bid(&api, 7, 1, 120.0, None, &tx).await;
        let results = collect(&rx);

        assert_eq!(results.len(), 4);
        assert_eq!(
            results[1],
            AppResult::ItemView(ItemViewEvent::FetchStarted { generation: 1, after_bid: true })
        );
        assert_eq!(*api.item_fetches.lock().unwrap(), 1);
        assert_eq!(api.place_bid_calls.lock().unwrap()[0].bid_amount, 120.0);
    }

    #[tokio::test]
    async fn test_server_rejection_message_is_verbatim() {
        let api = FakeApi::default();
        *api.bid_response.lock().unwrap() =
            Some(Err(ApiError::Validation(Some("Auction has ended".to_string()))));
        let (tx, rx) = mpsc::channel();

        submit_bid(&api, 7, 1, 120.0, None, &tx).await;

        assert_eq!(
            collect(&rx),
            vec![AppResult::ItemView(ItemViewEvent::BidRejected {
                generation: 1,
                message: "Auction has ended".to_string(),
            })]
        );
    }

    #[tokio::test]
    async fn test_rejection_without_message_uses_fallback() {
        let api = FakeApi::default();
        *api.bid_response.lock().unwrap() = Some(Err(ApiError::Network("refused".to_string())));
        let (tx, rx) = mpsc::channel();

        submit_bid(&api, 7, 1, 120.0, None, &tx).await;

        assert_eq!(
            collect(&rx),
            vec![AppResult::ItemView(ItemViewEvent::BidRejected {
                generation: 1,
                message: BID_REJECTED_FALLBACK.to_string(),
            })]
        );
    }

    #[tokio::test]
    async fn test_unauthorized_bid_expires_session() {
        let api = FakeApi::default();
        *api.bid_response.lock().unwrap() = Some(Err(ApiError::Unauthorized));
        let (tx, rx) = mpsc::channel();

        submit_bid(&api, 7, 4, 120.0, None, &tx).await;

        assert_eq!(
            collect(&rx),
            vec![AppResult::ItemView(ItemViewEvent::AuthExpired { generation: 4 })]
        );
    }

    #[tokio::test]
    async fn test_login_then_profile() {
        let api = FakeApi::default();
        let (tx, rx) = mpsc::channel();

        login(&api, "bob@uni.edu", "secret", &tx).await;
        let results = collect(&rx);

        assert_eq!(results[0], AppResult::LoggedIn);
        assert!(matches!(&results[1], AppResult::ProfileLoaded { user: Some(u) } if u.id == 9));
        // Solde en erreur : ignoré, pas de résultat
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let api = FakeApi::default();
        let (tx, rx) = mpsc::channel();

        login(&api, "bob@uni.edu", "wrong", &tx).await;

        assert_eq!(
            collect(&rx),
            vec![AppResult::LoginFailed { error: LOGIN_FAILED.to_string() }]
        );
    }

    #[tokio::test]
    async fn test_marketplace_unauthorized() {
        let api = FakeApi::default();
        let (tx, rx) = mpsc::channel();

        load_marketplace(&api, &tx).await;
        assert_eq!(collect(&rx), vec![AppResult::AuthExpired]);
    }

    #[tokio::test]
    async fn test_search_forwards_query() {
        let api = FakeApi::default();
        let (tx, rx) = mpsc::channel();
        let query = SearchQuery::parse("vélo", "").unwrap();

        search_marketplace(&api, &query, &tx).await;

        assert!(matches!(&collect(&rx)[..], [AppResult::MarketplaceLoaded(items)] if items.len() == 1));
        assert_eq!(api.searches.lock().unwrap()[0], query);
    }

    #[tokio::test]
    async fn test_search_failure_message() {
        let api = FakeApi::default();
        let (tx, rx) = mpsc::channel();

        search_marketplace(&api, &SearchQuery::parse("", "sports").unwrap(), &tx).await;

        assert_eq!(
            collect(&rx),
            vec![AppResult::MarketplaceError { error: SEARCH_FAILED.to_string() }]
        );
    }

    #[tokio::test]
    async fn test_wallet_keeps_transactions_when_balance_fails() {
        // fetch_balance du faux renvoie toujours une 500
        let api = FakeApi::default();
        let (tx, rx) = mpsc::channel();

        load_wallet(&api, &tx).await;

        assert_eq!(
            collect(&rx),
            vec![
                AppResult::TransactionsLoaded(Vec::new()),
                AppResult::WalletError { error: WALLET_FETCH_ERROR.to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn test_wallet_unauthorized_expires_session() {
        let api = FakeApi::default();
        *api.transactions.lock().unwrap() = Some(Err(ApiError::Unauthorized));
        let (tx, rx) = mpsc::channel();

        load_wallet(&api, &tx).await;
        assert_eq!(collect(&rx), vec![AppResult::AuthExpired]);
    }

    #[tokio::test]
    async fn test_reputation_and_feedback() {
        let api = FakeApi::default();
        let (tx, rx) = mpsc::channel();

        load_reputation(&api, 3, &tx).await;
        let results = collect(&rx);

        assert_eq!(results.len(), 2);
        assert!(matches!(&results[0], AppResult::ReputationLoaded(r) if r.user_id == 3));
        assert_eq!(results[1], AppResult::FeedbackLoaded(Vec::new()));
    }

    #[tokio::test]
    async fn test_feedback_failure_reports_error() {
        let api = FakeApi::default();
        *api.feedback.lock().unwrap() = Some(Err(ApiError::NotFound));
        let (tx, rx) = mpsc::channel();

        load_reputation(&api, 3, &tx).await;
        let results = collect(&rx);

        assert!(matches!(results[0], AppResult::ReputationLoaded(_)));
        assert_eq!(
            results[1],
            AppResult::ReputationError { error: REPUTATION_FETCH_ERROR.to_string() }
        );
    }

    #[test]
    fn test_login_debug_hides_password() {
        let command = AppCommand::Login {
            email: "bob@uni.edu".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{:?}", command);
        assert!(debug.contains("bob@uni.edu"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_worker_thread_round_trip() {
        let api: Arc<dyn MarketApi> = Arc::new(FakeApi::with_item(Ok(item(100.0, None)), Err(ApiError::NotFound)));
        let (command_tx, command_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();

        let handle = spawn_worker(api, command_rx, result_tx);
        command_tx.send(AppCommand::LoadItem { item_id: 7, generation: 1 }).unwrap();
        drop(command_tx);
        handle.join().unwrap();

        assert_eq!(result_rx.try_iter().count(), 3);
    }
}
