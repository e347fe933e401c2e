//! Public unsubscribe page linked from every message.

use axum::{
    extract::{Path, State},
    response::Html,
};
use minijinja::context;

use crate::error::AppResult;
use crate::state::AppState;

/// `GET /u/{phone}`
///
/// No token required. Always answers with the confirmation page, whether or
/// not the number is known.
pub async fn unsubscribe(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> AppResult<Html<String>> {
    let phone = state.contacts.unsubscribe(&phone).await?;

    state.views.render(
        "unsubscribed.html",
        context! {
            app_name => state.config.app_name.as_str(),
            phone => phone,
        },
    )
}
