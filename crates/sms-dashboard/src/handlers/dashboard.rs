//! Login and dashboard pages.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;
use serde::Deserialize;

use super::auth::{token_query, AdminToken};
use crate::error::AppResult;
use crate::services::dashboard_stats;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub token: Option<String>,
}

/// `GET /`
///
/// A valid `token` goes straight to the dashboard, anything else gets the
/// login form.
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> AppResult<Response> {
    if let Some(token) = query.token.as_deref() {
        if token == state.config.admin_token {
            let target = format!("/dashboard?{}", token_query(token));
            return Ok(Redirect::to(&target).into_response());
        }
    }

    let page = state.views.render(
        "login.html",
        context! { app_name => state.config.app_name.as_str() },
    )?;
    Ok(page.into_response())
}

/// `GET /dashboard`
pub async fn dashboard(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
) -> AppResult<Html<String>> {
    let stats = dashboard_stats(&state.db).await?;

    state.views.render(
        "dashboard.html",
        context! {
            app_name => state.config.app_name.as_str(),
            token => token,
            stats => stats,
        },
    )
}
