// ============================================================================
// Tests d'intégration : ApiClient contre un faux serveur axum
// ============================================================================
// Le serveur tourne sur 127.0.0.1 avec un port choisi par l'OS
// ============================================================================

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use lazybid::api::{ApiClient, ApiError, MarketApi};
use lazybid::config::Config;
use lazybid::models::{ItemStatus, PlaceBidRequest, SearchQuery};
use lazybid::session::Session;

const TOKEN: &str = "tok-123";

#[derive(Clone, Default)]
struct StubState {
    bids: Arc<Mutex<Vec<PlaceBidRequest>>>,
    searches: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN))
}

fn item_json(id: i64) -> Value {
    json!({
        "itemId": id,
        "title": "Calculatrice graphique",
        "description": "TI-83, piles neuves",
        "category": "ELECTRONICS",
        "condition": "GOOD",
        "currentPrice": 100.0,
        "startingPrice": 40.0,
        "buyoutPrice": 150.0,
        "auctionEndTime": "2026-12-01T18:00:00",
        "status": "ACTIVE",
        "sellerId": 3,
        "sellerUsername": "alice",
        "imageUrls": []
    })
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == "bob@uni.edu" && body["password"] == "secret" {
        Json(json!({ "token": TOKEN })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid credentials" }))).into_response()
    }
}

async fn profile(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({ "userId": 9, "username": "bob", "email": "bob@uni.edu", "reputation": 4 }))
        .into_response()
}

async fn balance(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({ "balance": 250.5, "username": "bob", "userId": 9 })).into_response()
}

async fn active_items() -> Json<Value> {
    Json(json!([item_json(7), item_json(8)]))
}

async fn item(Path(id): Path<i64>) -> Response {
    match id {
        7 | 8 => Json(item_json(id)).into_response(),
        99 => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Item not found" }))).into_response(),
    }
}

async fn highest(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("itemId").map(String::as_str) {
        Some("7") => Json(json!({
            "bidId": 1,
            "itemId": 7,
            "userId": 4,
            "bidAmount": 120.0,
            "timestamp": "2026-10-01T12:30:00"
        }))
        .into_response(),
        Some(_) => StatusCode::NOT_FOUND.into_response(),
        None => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn search(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let matches = match params.get("category").map(String::as_str) {
        Some("ELECTRONICS") | None => vec![item_json(7)],
        Some(_) => Vec::new(),
    };
    state.searches.lock().unwrap().push(params);
    Json(json!(matches))
}

async fn transactions(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!([
        {
            "transactionId": 1,
            "type": "COMPLETED",
            "amount": 45.0,
            "description": "Item sold",
            "timestamp": "2026-10-02T14:30:00",
            "relatedItemTitle": "Calculatrice graphique",
            "sellerId": 9,
            "buyerId": 4
        },
        {
            "transactionId": 2,
            "type": "FEEDBACK_REWARD",
            "amount": 1.0,
            "timestamp": "2026-10-03T09:00:00"
        }
    ]))
    .into_response()
}

async fn reputation(Path(user_id): Path<i64>) -> Response {
    if user_id != 3 {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "User not found" }))).into_response();
    }
    Json(json!({
        "userId": 3,
        "username": "alice",
        "reputation": 7,
        "totalReviews": 2,
        "averageRating": 4.5,
        "fiveStarCount": 1,
        "fourStarCount": 1
    }))
    .into_response()
}

async fn feedback(Path(user_id): Path<i64>) -> Json<Value> {
    Json(json!([{
        "feedbackId": 5,
        "giverId": 9,
        "giverUsername": "bob",
        "receiverId": user_id,
        "itemId": 7,
        "itemTitle": "Calculatrice graphique",
        "score": "FIVE_STARS",
        "comment": "Parfait",
        "timestamp": "2026-10-04T10:00:00"
    }]))
}

async fn place_bid(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(request): Json<PlaceBidRequest>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if request.bid_amount <= 100.0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Bid must be higher than the current price" })),
        )
            .into_response();
    }
    state.bids.lock().unwrap().push(request);
    (StatusCode::CREATED, Json(json!({ "bidId": 2 }))).into_response()
}

/// Lance le faux serveur et retourne son URL de base
async fn spawn_stub(state: StubState) -> String {
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/profile", get(profile))
        .route("/virtual-currency/balance", get(balance))
        .route("/virtual-currency/transactions", get(transactions))
        .route("/feedback/reputation/:id", get(reputation))
        .route("/feedback/user/:id", get(feedback))
        .route("/items/active", get(active_items))
        .route("/items/search", get(search))
        .route("/items/:id", get(item))
        .route("/bids/highest", get(highest))
        .route("/bids", post(place_bid))
        .with_state(state);
    let router = Router::new().nest("/api/v1", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}/api/v1", addr)
}

fn client(base_url: String, session: Arc<Session>) -> ApiClient {
    let config = Config {
        api_url: base_url,
        ..Config::default()
    };
    ApiClient::new(&config, session).unwrap()
}

#[tokio::test]
async fn test_login_stores_token_and_authorizes_profile() {
    let base = spawn_stub(StubState::default()).await;
    let session = Arc::new(Session::in_memory());
    let api = client(base, session.clone());

    assert_eq!(api.fetch_profile().await, Err(ApiError::Unauthorized));

    api.login("bob@uni.edu", "secret").await.unwrap();
    assert_eq!(session.token().as_deref(), Some(TOKEN));

    let user = api.fetch_profile().await.unwrap();
    assert_eq!(user.id, 9);
    assert_eq!(user.reputation, Some(4));

    let balance = api.fetch_balance().await.unwrap();
    assert_eq!(balance.balance, 250.5);
}

#[tokio::test]
async fn test_bad_credentials_are_unauthorized() {
    let base = spawn_stub(StubState::default()).await;
    let session = Arc::new(Session::in_memory());
    let api = client(base, session.clone());

    let result = api.login("bob@uni.edu", "wrong").await;
    assert_eq!(result, Err(ApiError::Unauthorized));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_fetch_item_and_not_found() {
    let base = spawn_stub(StubState::default()).await;
    let api = client(base, Arc::new(Session::in_memory()));

    let item = api.fetch_item(7).await.unwrap();
    assert_eq!(item.title, "Calculatrice graphique");
    assert_eq!(item.buyout_price, Some(150.0));
    assert_eq!(item.status, ItemStatus::Active);
    assert_eq!(item.owner_id(), Some(3));

    assert_eq!(api.fetch_item(42).await, Err(ApiError::NotFound));
    assert!(matches!(
        api.fetch_item(99).await,
        Err(ApiError::Server { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_fetch_active_items() {
    let base = spawn_stub(StubState::default()).await;
    let api = client(base, Arc::new(Session::in_memory()));

    let items = api.fetch_active_items().await.unwrap();
    let ids: Vec<i64> = items.iter().map(|i| i.item_id).collect();
    assert_eq!(ids, vec![7, 8]);
}

#[tokio::test]
async fn test_highest_bid_uses_item_id_query() {
    let base = spawn_stub(StubState::default()).await;
    let api = client(base, Arc::new(Session::in_memory()));

    let bid = api.fetch_highest_bid(7).await.unwrap();
    assert_eq!(bid.bidder_id, 4);
    assert_eq!(bid.bid_amount, 120.0);

    // 404 = pas encore d'enchère
    assert_eq!(api.fetch_highest_bid(8).await, Err(ApiError::NotFound));
}

#[tokio::test]
async fn test_place_bid_accepted_and_rejected() {
    let state = StubState::default();
    let base = spawn_stub(state.clone()).await;
    let api = client(base, Arc::new(Session::with_token(TOKEN)));

    let rejected = api
        .place_bid(&PlaceBidRequest {
            item_id: 7,
            bid_amount: 90.0,
        })
        .await;
    assert_eq!(
        rejected,
        Err(ApiError::Validation(Some(
            "Bid must be higher than the current price".to_string()
        )))
    );

    api.place_bid(&PlaceBidRequest {
        item_id: 7,
        bid_amount: 130.0,
    })
    .await
    .unwrap();

    let bids = state.bids.lock().unwrap();
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0].bid_amount, 130.0);
}

#[tokio::test]
async fn test_place_bid_without_token_is_unauthorized() {
    let base = spawn_stub(StubState::default()).await;
    let api = client(base, Arc::new(Session::in_memory()));

    let result = api
        .place_bid(&PlaceBidRequest {
            item_id: 7,
            bid_amount: 130.0,
        })
        .await;
    assert_eq!(result, Err(ApiError::Unauthorized));
}

#[tokio::test]
async fn test_search_sends_only_given_filters() {
    let state = StubState::default();
    let base = spawn_stub(state.clone()).await;
    let api = client(base, Arc::new(Session::in_memory()));

    let keyword_only = SearchQuery::parse("calc", "").unwrap();
    let items = api.search_items(&keyword_only).await.unwrap();
    assert_eq!(items.len(), 1);

    let books = SearchQuery::parse("", "books").unwrap();
    assert!(api.search_items(&books).await.unwrap().is_empty());

    let searches = state.searches.lock().unwrap();
    assert_eq!(searches[0].get("keyword").map(String::as_str), Some("calc"));
    assert!(!searches[0].contains_key("category"));
    assert_eq!(searches[1].get("category").map(String::as_str), Some("BOOKS"));
    assert!(!searches[1].contains_key("keyword"));
}

#[tokio::test]
async fn test_transactions_require_token() {
    let base = spawn_stub(StubState::default()).await;

    let anonymous = client(base.clone(), Arc::new(Session::in_memory()));
    assert_eq!(anonymous.fetch_transactions().await, Err(ApiError::Unauthorized));

    let api = client(base, Arc::new(Session::with_token(TOKEN)));
    let ledger = api.fetch_transactions().await.unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[0].kind_label(), "Sale");
    assert_eq!(ledger[0].signed_amount(Some(9)), 45.0);
    assert_eq!(ledger[1].kind_label(), "Feedback Reward");
}

#[tokio::test]
async fn test_reputation_and_feedback() {
    let base = spawn_stub(StubState::default()).await;
    let api = client(base, Arc::new(Session::in_memory()));

    let reputation = api.fetch_reputation(3).await.unwrap();
    assert_eq!(reputation.username.as_deref(), Some("alice"));
    assert_eq!(reputation.total_reviews, 2);
    assert_eq!(reputation.star_counts()[1], (4, 1));

    let feedback = api.fetch_feedback(3).await.unwrap();
    assert_eq!(feedback[0].stars(), Some(5));
    assert_eq!(feedback[0].giver_username.as_deref(), Some("bob"));

    assert_eq!(api.fetch_reputation(42).await, Err(ApiError::NotFound));
}
