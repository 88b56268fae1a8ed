use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Multipart, Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

#[derive(Deserialize)]
pub struct CreateItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Default)]
pub struct Store {
    items: RwLock<HashMap<Uuid, Item>>,
    usernames: RwLock<HashSet<String>>,
}

pub type Db = Arc<Store>;

pub fn app() -> Router {
    let db: Db = Arc::new(Store::default());
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item).patch(update_item).delete(delete_item))
        .route("/register", post(register))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Token from an `Authorization: Bearer <token>` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

async fn list_items(State(db): State<Db>) -> Json<Vec<Item>> {
    let items = db.items.read().await;
    Json(items.values().cloned().collect())
}

async fn create_item(State(db): State<Db>, Json(input): Json<CreateItem>) -> (StatusCode, Json<Item>) {
    let item = Item {
        id: Uuid::new_v4(),
        name: input.name,
        description: input.description,
    };
    db.items.write().await.insert(item.id, item.clone());
    debug!(id = %item.id, "created item");
    (StatusCode::CREATED, Json(item))
}

async fn get_item(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<Json<Item>, StatusCode> {
    let items = db.items.read().await;
    items.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateItem>,
) -> Result<Json<Item>, StatusCode> {
    let mut items = db.items.write().await;
    let item = items.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        item.name = name;
    }
    if let Some(description) = input.description {
        item.description = description;
    }
    debug!(%id, "updated item");
    Ok(Json(item.clone()))
}

async fn delete_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    if bearer_token(&headers).is_none() {
        debug!(%id, "delete without bearer token");
        return Err(StatusCode::UNAUTHORIZED);
    }
    let mut items = db.items.write().await;
    items.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

/// Multipart registration form: 409 when the username is taken, otherwise
/// 303 with the page to go to in `redirectUrl`.
async fn register(State(db): State<Db>, mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    let mut username = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("username") {
                    continue;
                }
                match field.text().await {
                    Ok(text) => username = Some(text),
                    Err(e) => return (StatusCode::BAD_REQUEST, Json(json!({"detail": e.body_text()}))),
                }
            }
            Ok(None) => break,
            Err(e) => return (StatusCode::BAD_REQUEST, Json(json!({"detail": e.body_text()}))),
        }
    }

    let Some(username) = username.filter(|u| !u.is_empty()) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "username is required"})),
        );
    };

    let mut usernames = db.usernames.write().await;
    if !usernames.insert(username.clone()) {
        info!(%username, "registration conflict");
        return (StatusCode::CONFLICT, Json(json!({"detail": "username already exists"})));
    }
    info!(%username, "registered");
    (
        StatusCode::SEE_OTHER,
        Json(json!({"redirectUrl": format!("/welcome/{username}")})),
    )
}
