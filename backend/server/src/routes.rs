use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::task::spawn_blocking;
use tracing::{debug, info};

use crate::{
    error::AppError,
    models::{ApiRow, LeaderboardResponse, ReloadResponse, SearchResponse},
    state::AppState,
    utils::normalize_username,
    views::{INDEX, LEADERBOARD, NO_DATA_MESSAGE, RESULT},
};

type SharedState = State<Arc<AppState>>;

#[derive(Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    username: String,
}

#[derive(Deserialize)]
pub struct ApiSearchParams {
    #[serde(default)]
    q: String,
}

pub async fn index_handler(State(state): SharedState) -> Result<Html<String>, AppError> {
    let index = state.store.snapshot();

    let html = state.render(INDEX, context! { days => index.day_list() })?;

    Ok(Html(html))
}

pub async fn search_form_handler(
    State(state): SharedState,
    Form(form): Form<SearchForm>,
) -> Result<Response, AppError> {
    search_page(&state, &form.username)
}

pub async fn search_query_handler(
    State(state): SharedState,
    Query(form): Query<SearchForm>,
) -> Result<Response, AppError> {
    search_page(&state, &form.username)
}

fn search_page(state: &AppState, username: &str) -> Result<Response, AppError> {
    let index = state.store.snapshot();

    let results: Vec<_> = match index.search(username) {
        Ok(results) => results
            .into_iter()
            .map(|record| record.or_username(username.trim()))
            .collect(),
        Err(AppError::MissingQuery) => return Ok(Redirect::to("/").into_response()),
        Err(e) => return Err(e),
    };
    debug!("Search for {} matched {} days", username.trim(), results.len());

    let html = state.render(
        RESULT,
        context! {
            username => username.trim(),
            results => results,
            days => index.day_list()
        },
    )?;

    Ok(Html(html).into_response())
}

pub async fn leaderboard_handler(
    State(state): SharedState,
    Path(day): Path<u32>,
) -> Result<Html<String>, AppError> {
    let index = state.store.snapshot();

    let (rows, message) = match index.leaderboard(day) {
        Some(rows) => (rows, None),
        None => (Vec::new(), Some(NO_DATA_MESSAGE)),
    };

    let html = state.render(
        LEADERBOARD,
        context! {
            day => day,
            rows => rows,
            days => index.day_list(),
            message => message
        },
    )?;

    Ok(Html(html))
}

pub async fn api_search_handler(
    State(state): SharedState,
    Query(params): Query<ApiSearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let username = normalize_username(&params.q).ok_or(AppError::MissingQuery)?;
    let results = state.store.snapshot().search(&username)?;

    Ok(Json(SearchResponse { username, results }))
}

pub async fn api_leaderboard_handler(
    State(state): SharedState,
    Path(day): Path<u32>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let rows = state
        .store
        .snapshot()
        .leaderboard(day)
        .ok_or(AppError::DayNotFound(day))?;

    Ok(Json(LeaderboardResponse {
        day,
        rows: rows.into_iter().map(ApiRow::from).collect(),
    }))
}

pub async fn reload_handler(State(state): SharedState) -> Result<Json<ReloadResponse>, AppError> {
    info!("Reload requested");

    let days = spawn_blocking(move || state.store.reload()).await?;

    Ok(Json(ReloadResponse {
        status: "reloaded",
        days,
    }))
}

pub async fn health_handler(State(state): SharedState) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "days": state.store.snapshot().len(),
    }))
}
