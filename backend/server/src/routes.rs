use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use catalog::{filter_products, Catalog, Category, Counts, Product, SubCategory};

use crate::{
    error::AppError,
    notify::QuoteRequest,
    session::Principal,
    state::AppState,
    utils::{bearer_token, require},
};

#[derive(Deserialize)]
pub struct SubCategoryParams {
    pub category: Option<String>,
}

#[derive(Deserialize)]
pub struct ProductParams {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct NewsletterRequest {
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn current_catalog_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Catalog>, AppError> {
    let catalog = state
        .store
        .current_catalog()
        .ok_or(AppError::NotFound("No current catalog found"))?;

    Ok(Json(catalog.clone()))
}

pub async fn categories_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Category>> {
    Json(state.store.categories().into_iter().cloned().collect())
}

pub async fn sub_categories_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SubCategoryParams>,
) -> Json<Vec<SubCategory>> {
    let sub_categories = state.store.sub_categories(params.category.as_deref());

    Json(sub_categories.into_iter().cloned().collect())
}

pub async fn products_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProductParams>,
) -> Json<Vec<Product>> {
    let products = state
        .store
        .products(params.category.as_deref(), params.subcategory.as_deref());
    let products = filter_products(products, params.q.as_deref());

    Json(products.into_iter().cloned().collect())
}

pub async fn quotes_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QuoteRequest>,
) -> Result<Json<Value>, AppError> {
    if !state.dispatcher.quote(&payload).await? {
        return Err(AppError::Delivery);
    }

    Ok(Json(json!({ "success": true })))
}

pub async fn newsletter_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewsletterRequest>,
) -> Result<Json<Value>, AppError> {
    if !state.dispatcher.newsletter(payload.email.as_deref()).await? {
        return Err(AppError::Delivery);
    }

    Ok(Json(json!({ "success": true })))
}

pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<Value>, AppError> {
    if !state.dispatcher.chat(payload.message.as_deref()).await? {
        return Err(AppError::Delivery);
    }

    Ok(Json(json!({ "success": true })))
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let email = require(payload.email.as_deref())?;
    let password = require(payload.password.as_deref())?;

    let (token, user) = state
        .sessions
        .login(email, password)
        .await
        .ok_or(AppError::Unauthorized)?;

    info!(%email, "admin logged in");

    Ok(Json(json!({ "token": token, "user": user })))
}

/// Logout always succeeds, even with a missing or stale token.
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<Value> {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.logout(&token).await;
    }

    Json(json!({ "success": true }))
}

pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Principal>, AppError> {
    let principal = authenticated(&state, &headers).await?;

    Ok(Json(principal))
}

pub async fn admin_stats_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Counts>, AppError> {
    authenticated(&state, &headers).await?;

    Ok(Json(state.store.counts()))
}

async fn authenticated(state: &AppState, headers: &HeaderMap) -> Result<Principal, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;

    state
        .sessions
        .current(&token)
        .await
        .ok_or(AppError::Unauthorized)
}
