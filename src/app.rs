// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Les méthodes retournent les AppCommand à envoyer au worker :
//    App ne fait jamais d'I/O réseau elle-même
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// ============================================================================

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::item_view::{validate_bid_amount, ItemView, ItemViewEvent, ViewState};
use crate::models::{
    AuthenticatedUser, Feedback, Item, SearchQuery, UserReputation, VcBalance, VcTransaction,
    CATEGORIES,
};
use crate::session::Session;
use crate::worker::{AppCommand, AppResult};

pub const SESSION_EXPIRED: &str = "Session expired, please log in again.";
pub const BID_NOT_ALLOWED: &str = "You can no longer bid on this item.";

// ============================================================================
// Enum : Screen
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul écran actif à la fois
// - Le compilateur force à gérer tous les cas (exhaustivité)
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Connexion (email + mot de passe)
    Login,

    /// Liste des objets actifs
    Marketplace,

    /// Page détail d'un objet (enchères)
    ItemDetail,

    /// Solde et historique de monnaie virtuelle
    Wallet,

    /// Réputation et feedbacks d'un utilisateur
    Reputation,
}

/// Ce que la ligne de saisie est en train de capturer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPurpose {
    Email,
    Password { email: String },
    BidAmount,
    SearchKeyword,
    SearchCategory { keyword: String },
}

impl InputPurpose {
    /// Filtre des caractères acceptés par la saisie
    pub fn accepts(&self, c: char) -> bool {
        match self {
            InputPurpose::BidAmount => c.is_ascii_digit() || c == '.',
            InputPurpose::Email
            | InputPurpose::Password { .. }
            | InputPurpose::SearchKeyword
            | InputPurpose::SearchCategory { .. } => !c.is_control(),
        }
    }

    /// Vrai si la saisie doit être masquée à l'écran
    pub fn is_secret(&self) -> bool {
        matches!(self, InputPurpose::Password { .. })
    }
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Session partagée avec le client HTTP
    session: Arc<Session>,

    /// Utilisateur courant (None = anonyme ou pas encore résolu)
    pub user: Option<AuthenticatedUser>,

    /// L'identité a été résolue (avec ou sans utilisateur)
    pub user_resolved: bool,

    /// Solde de monnaie virtuelle (affiché dans le header)
    pub balance: Option<VcBalance>,

    /// Objets actifs du marketplace
    pub items: Vec<Item>,

    /// Index de l'objet sélectionné dans le marketplace
    pub selected_index: usize,

    /// Message d'erreur du marketplace
    pub marketplace_error: Option<String>,

    /// Recherche active (None = tous les objets actifs)
    pub search: Option<SearchQuery>,

    /// Historique de monnaie virtuelle
    pub transactions: Vec<VcTransaction>,
    pub wallet_error: Option<String>,

    /// Utilisateur dont la réputation est affichée
    pub reputation_user: Option<i64>,
    pub reputation: Option<UserReputation>,
    pub feedback: Vec<Feedback>,
    pub reputation_error: Option<String>,

    /// Page détail montée (None = démontée, les résultats tardifs sont jetés)
    pub item_view: Option<ItemView>,

    /// Dernière génération attribuée à un montage de la page détail
    generation: u64,

    /// Confirmation two-step du quit
    pub confirm_quit: bool,

    /// Chargement du marketplace en cours
    pub is_loading: bool,
    pub loading_message: Option<String>,

    /// Saisie en cours (None = pas de ligne de saisie)
    pub input_purpose: Option<InputPurpose>,
    pub input_buffer: String,
    pub input_prompt: String,

    /// Erreur affichée sur l'écran de login
    pub login_error: Option<String>,
}

impl App {
    /// Crée l'application autour d'une session
    ///
    /// Sans token, on démarre directement sur l'écran de login.
    pub fn new(session: Arc<Session>) -> Self {
        let authenticated = session.is_authenticated();

        let mut app = Self {
            running: true,
            current_screen: Screen::Marketplace,
            session,
            user: None,
            user_resolved: false,
            balance: None,
            items: Vec::new(),
            selected_index: 0,
            marketplace_error: None,
            search: None,
            transactions: Vec::new(),
            wallet_error: None,
            reputation_user: None,
            reputation: None,
            feedback: Vec::new(),
            reputation_error: None,
            item_view: None,
            generation: 0,
            confirm_quit: false,
            is_loading: false,
            loading_message: None,
            input_purpose: None,
            input_buffer: String::new(),
            input_prompt: String::new(),
            login_error: None,
        };

        if !authenticated {
            app.user_resolved = true;
            app.start_login();
        }

        app
    }

    /// Commandes à lancer au démarrage
    pub fn startup_commands(&mut self) -> Vec<AppCommand> {
        if self.session.is_authenticated() {
            self.start_loading(Some("Chargement du marketplace...".to_string()));
            vec![AppCommand::LoadSession, AppCommand::LoadMarketplace]
        } else {
            Vec::new()
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    // ========================================================================
    // Marketplace
    // ========================================================================

    /// Navigue vers le haut dans la liste
    ///
    /// CONCEPT RUST : Saturating arithmetic
    /// - saturating_sub() ne descend pas en dessous de 0
    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Navigue vers le bas dans la liste
    pub fn navigate_down(&mut self) {
        let max_index = self.items.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.items.get(self.selected_index)
    }

    /// Rafraîchit la liste (en gardant la recherche active)
    pub fn refresh_marketplace(&mut self) -> AppCommand {
        match &self.search {
            Some(query) => {
                let query = query.clone();
                self.start_loading(Some(format!("Recherche {}...", query.label())));
                AppCommand::SearchMarketplace { query }
            }
            None => {
                self.start_loading(Some("Chargement du marketplace...".to_string()));
                AppCommand::LoadMarketplace
            }
        }
    }

    /// Ouvre la saisie de la recherche (mot-clé puis catégorie)
    pub fn start_search(&mut self) {
        self.start_input(InputPurpose::SearchKeyword, "Search keyword (empty = any): ");
    }

    /// Valide l'étape courante de la recherche
    ///
    /// Catégorie inconnue : erreur affichée, saisie laissée ouverte.
    /// Deux champs vides : retour à la liste complète.
    pub fn submit_search_input(&mut self) -> Option<AppCommand> {
        match self.input_purpose.clone() {
            Some(InputPurpose::SearchKeyword) => {
                let keyword = self.input_buffer.trim().to_string();
                let prompt = format!("Category ({}, empty = any): ", CATEGORIES.join("/"));
                self.start_input(InputPurpose::SearchCategory { keyword }, &prompt);
                None
            }
            Some(InputPurpose::SearchCategory { keyword }) => {
                match SearchQuery::parse(&keyword, &self.input_buffer) {
                    Ok(query) => {
                        self.cancel_input();
                        self.marketplace_error = None;
                        self.selected_index = 0;
                        info!(?query, "Searching marketplace");
                        self.search = Some(query).filter(|q| !q.is_empty());
                        Some(self.refresh_marketplace())
                    }
                    Err(e) => {
                        debug!(input = %self.input_buffer, error = %e, "Invalid search category");
                        self.marketplace_error = Some(e.to_string());
                        None
                    }
                }
            }
            _ => None,
        }
    }

    /// Abandonne la recherche active
    pub fn clear_search(&mut self) -> Option<AppCommand> {
        self.search.take()?;
        self.selected_index = 0;
        Some(self.refresh_marketplace())
    }

    pub fn is_on_marketplace(&self) -> bool {
        self.current_screen == Screen::Marketplace
    }

    // ========================================================================
    // Page détail
    // ========================================================================

    /// Monte la page détail d'un objet
    ///
    /// CONCEPT : Compteur de génération
    /// - Chaque montage reçoit une nouvelle génération
    /// - Les réponses d'un montage précédent ne matchent plus et sont jetées
    pub fn open_item(&mut self, item_id: i64) -> AppCommand {
        self.generation += 1;
        let generation = self.generation;

        let mut view = ItemView::new(item_id, generation);
        if self.user_resolved {
            view.apply(ItemViewEvent::UserResolved(self.user.clone()));
        }

        info!(item_id, generation, "Opening item view");
        self.item_view = Some(view);
        self.current_screen = Screen::ItemDetail;
        self.cancel_input();

        AppCommand::LoadItem { item_id, generation }
    }

    /// Ouvre l'objet sélectionné dans le marketplace
    pub fn open_selected(&mut self) -> Option<AppCommand> {
        let item_id = self.selected_item()?.item_id;
        Some(self.open_item(item_id))
    }

    /// Démonte la page détail et retourne au marketplace
    pub fn close_item(&mut self) -> AppCommand {
        if let Some(view) = self.item_view.take() {
            debug!(item_id = view.item_id(), generation = view.generation(), "Closing item view");
        }
        self.cancel_input();
        self.current_screen = Screen::Marketplace;

        // Un achat a pu retirer l'objet des annonces actives
        self.refresh_marketplace()
    }

    pub fn is_on_item(&self) -> bool {
        self.current_screen == Screen::ItemDetail
    }

    // ========================================================================
    // Portefeuille et réputation (lecture seule)
    // ========================================================================

    /// Affiche le solde et l'historique de monnaie virtuelle
    pub fn open_wallet(&mut self) -> AppCommand {
        self.current_screen = Screen::Wallet;
        self.cancel_input();
        self.wallet_error = None;
        self.start_loading(Some("Chargement du portefeuille...".to_string()));
        AppCommand::LoadWallet
    }

    /// Affiche la réputation d'un utilisateur
    pub fn open_reputation(&mut self, user_id: i64) -> AppCommand {
        if self.reputation_user != Some(user_id) {
            self.reputation = None;
            self.feedback.clear();
        }
        self.reputation_user = Some(user_id);
        self.reputation_error = None;
        self.current_screen = Screen::Reputation;
        self.cancel_input();
        self.start_loading(Some("Chargement du profil...".to_string()));
        AppCommand::LoadReputation { user_id }
    }

    /// Réputation de l'utilisateur connecté
    pub fn open_own_reputation(&mut self) -> Option<AppCommand> {
        let user_id = self.user.as_ref()?.id;
        Some(self.open_reputation(user_id))
    }

    /// Réputation du vendeur de l'objet affiché
    pub fn open_seller_reputation(&mut self) -> Option<AppCommand> {
        let seller_id = self.item_view.as_ref()?.item()?.owner_id()?;
        Some(self.open_reputation(seller_id))
    }

    pub fn is_on_wallet(&self) -> bool {
        self.current_screen == Screen::Wallet
    }

    pub fn is_on_reputation(&self) -> bool {
        self.current_screen == Screen::Reputation
    }

    /// Quitte le portefeuille ou la réputation
    ///
    /// Retour à la page détail si elle est encore montée.
    pub fn close_side_screen(&mut self) {
        self.current_screen = if self.item_view.is_some() {
            Screen::ItemDetail
        } else {
            Screen::Marketplace
        };
        self.stop_loading();
    }

    /// Re-fetch de l'écran portefeuille ou réputation
    pub fn refresh_side_screen(&mut self) -> Option<AppCommand> {
        match self.current_screen {
            Screen::Wallet => Some(self.open_wallet()),
            Screen::Reputation => {
                let user_id = self.reputation_user?;
                Some(self.open_reputation(user_id))
            }
            _ => None,
        }
    }

    /// Re-fetch manuel de la page détail
    pub fn refresh_item(&mut self) -> Option<AppCommand> {
        let view = self.item_view.as_ref()?;
        if view.view_state() == ViewState::JustPurchased {
            return None;
        }
        Some(AppCommand::LoadItem {
            item_id: view.item_id(),
            generation: view.generation(),
        })
    }

    /// Ouvre la saisie du montant si l'enchère est permise
    pub fn start_bid_input(&mut self) -> bool {
        let allowed = self
            .item_view
            .as_ref()
            .is_some_and(|view| view.view_state() == ViewState::Active && view.can_place_bid());

        if allowed {
            self.start_input(InputPurpose::BidAmount, "Bid amount ($): ");
        }
        allowed
    }

    /// Valide la saisie du montant et prépare la commande d'enchère
    ///
    /// Montant invalide : erreur en ligne, aucune requête, saisie laissée ouverte.
    /// Le buyout est capturé ici, AVANT la soumission.
    pub fn submit_bid_input(&mut self) -> Option<AppCommand> {
        let Some(view) = self.item_view.as_mut() else {
            self.cancel_input();
            return None;
        };

        // Un résultat arrivé pendant la saisie a pu retirer le droit d'enchérir
        let still_allowed = view.view_state() == ViewState::Active && view.can_place_bid();
        let Some(item) = view.item().filter(|_| still_allowed) else {
            debug!(item_id = view.item_id(), "Bid no longer allowed, closing form");
            view.set_error(BID_NOT_ALLOWED);
            self.cancel_input();
            return None;
        };
        let current_price = item.current_price;
        let buyout_before = item.buyout_price;
        let item_id = item.item_id;

        match validate_bid_amount(&self.input_buffer, current_price) {
            Ok(amount) => {
                info!(item_id, amount, "Submitting bid");
                let generation = view.generation();
                self.cancel_input();
                Some(AppCommand::SubmitBid {
                    item_id,
                    generation,
                    amount,
                    buyout_before,
                })
            }
            Err(e) => {
                debug!(input = %self.input_buffer, error = %e, "Bid rejected client-side");
                view.set_error(e.to_string());
                None
            }
        }
    }

    // ========================================================================
    // Login / logout
    // ========================================================================

    /// Affiche l'écran de login et demande l'email
    pub fn start_login(&mut self) {
        self.current_screen = Screen::Login;
        self.start_input(InputPurpose::Email, "Email: ");
    }

    pub fn is_on_login(&self) -> bool {
        self.current_screen == Screen::Login
    }

    /// Valide la saisie courante du login
    ///
    /// Email -> demande le mot de passe ; mot de passe -> commande Login.
    pub fn submit_login_input(&mut self) -> Option<AppCommand> {
        let value = self.input_buffer.trim().to_string();

        match self.input_purpose.clone() {
            Some(InputPurpose::Email) if !value.is_empty() => {
                self.start_input(InputPurpose::Password { email: value }, "Password: ");
                None
            }
            Some(InputPurpose::Password { email }) if !self.input_buffer.is_empty() => {
                let password = std::mem::take(&mut self.input_buffer);
                self.input_purpose = None;
                self.input_prompt.clear();
                self.login_error = None;
                info!(email = %email, "Submitting login");
                Some(AppCommand::Login { email, password })
            }
            _ => None,
        }
    }

    /// Déconnexion explicite
    pub fn logout(&mut self) {
        info!("User logged out");
        self.session.invalidate();
        self.reset_identity();
        self.login_error = None;
        self.start_login();
    }

    /// 401 reçu : token effacé, page abandonnée, retour au login
    fn handle_auth_expired(&mut self) {
        warn!("Authorization failed, back to login");
        self.session.invalidate();
        self.reset_identity();
        self.login_error = Some(SESSION_EXPIRED.to_string());
        self.start_login();
    }

    fn reset_identity(&mut self) {
        self.user = None;
        self.user_resolved = true;
        self.balance = None;
        self.items.clear();
        self.selected_index = 0;
        self.search = None;
        self.transactions.clear();
        self.wallet_error = None;
        self.reputation_user = None;
        self.reputation = None;
        self.feedback.clear();
        self.reputation_error = None;
        self.item_view = None;
        self.stop_loading();
    }

    // ========================================================================
    // Résultats du worker
    // ========================================================================

    /// Applique un résultat du worker ; retourne les commandes qui en découlent
    pub fn handle_result(&mut self, result: AppResult) -> Vec<AppCommand> {
        match result {
            AppResult::LoggedIn => {
                self.login_error = None;
                self.current_screen = Screen::Marketplace;
                return vec![self.refresh_marketplace()];
            }

            AppResult::LoginFailed { error } => {
                self.login_error = Some(error);
                self.start_login();
            }

            AppResult::ProfileLoaded { user } => {
                self.user = user.clone();
                self.user_resolved = true;
                if let Some(view) = self.item_view.as_mut() {
                    view.apply(ItemViewEvent::UserResolved(user));
                }
            }

            AppResult::BalanceLoaded(balance) => {
                self.balance = Some(balance);
            }

            AppResult::MarketplaceLoaded(items) => {
                info!(count = items.len(), "Marketplace loaded");
                self.items = items;
                self.marketplace_error = None;
                let max_index = self.items.len().saturating_sub(1);
                self.selected_index = self.selected_index.min(max_index);
                self.stop_loading();
            }

            AppResult::MarketplaceError { error } => {
                self.marketplace_error = Some(error);
                self.stop_loading();
            }

            AppResult::TransactionsLoaded(transactions) => {
                self.transactions = transactions;
                self.stop_loading();
            }

            AppResult::WalletError { error } => {
                self.wallet_error = Some(error);
                self.stop_loading();
            }

            AppResult::ReputationLoaded(reputation) => {
                if self.reputation_user == Some(reputation.user_id) {
                    self.reputation = Some(reputation);
                } else {
                    debug!(user_id = reputation.user_id, "Reputation for another user, dropping");
                }
            }

            AppResult::FeedbackLoaded(feedback) => {
                self.feedback = feedback;
                self.stop_loading();
            }

            AppResult::ReputationError { error } => {
                self.reputation_error = Some(error);
                self.stop_loading();
            }

            AppResult::ItemView(event) => self.apply_item_event(event),

            AppResult::AuthExpired => self.handle_auth_expired(),
        }

        Vec::new()
    }

    fn apply_item_event(&mut self, event: ItemViewEvent) {
        let Some(view) = self.item_view.as_mut() else {
            debug!(?event, "No item view mounted, dropping late result");
            return;
        };

        if event.generation().is_some_and(|g| g != view.generation()) {
            debug!(?event, current = view.generation(), "Stale generation, dropping result");
            return;
        }

        view.apply(event);

        if view.auth_expired() {
            self.handle_auth_expired();
        } else if view.just_bought() && self.input_purpose.is_some() {
            // Plus de formulaire sur une page terminale
            self.cancel_input();
        }
    }

    // ========================================================================
    // Input Mode Management
    // ========================================================================

    /// Ouvre la ligne de saisie avec un prompt donné
    pub fn start_input(&mut self, purpose: InputPurpose, prompt: &str) {
        self.input_purpose = Some(purpose);
        self.input_buffer.clear();
        self.input_prompt = prompt.to_string();
    }

    /// Ferme la ligne de saisie
    pub fn cancel_input(&mut self) {
        self.input_purpose = None;
        self.input_buffer.clear();
        self.input_prompt.clear();
    }

    /// Ajoute un caractère au buffer si la saisie l'accepte
    pub fn append_char(&mut self, c: char) {
        if self.input_purpose.as_ref().is_some_and(|p| p.accepts(c)) {
            self.input_buffer.push(c);
        }
    }

    /// Supprime le dernier caractère du buffer
    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    pub fn is_in_input_mode(&self) -> bool {
        self.input_purpose.is_some()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
