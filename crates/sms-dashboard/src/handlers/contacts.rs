//! Contact management pages.

use axum::{
    extract::{Multipart, Path, Query, State},
    response::{Html, Redirect},
    Form,
};
use minijinja::context;
use serde::{Deserialize, Serialize};

use super::auth::AdminToken;
use crate::db::models::contact::NewContact;
use crate::error::{AppError, AppResult};
use crate::services::ImportSummary;
use crate::state::AppState;

/// Fields of the add-contact form. An unchecked checkbox is simply absent.
#[derive(Debug, Deserialize)]
pub struct AddContactForm {
    #[serde(default)]
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub consented: Option<String>,
}

impl From<AddContactForm> for NewContact {
    fn from(form: AddContactForm) -> Self {
        Self {
            name: form.name,
            phone: form.phone,
            tags: form.tags,
            consented: form.consented.is_some(),
        }
    }
}

/// Result of the last CSV import, carried through the redirect.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ImportNotice {
    pub imported: Option<usize>,
    #[serde(default)]
    pub rejected: usize,
}

fn back_to_contacts(token: &AdminToken) -> Redirect {
    Redirect::to(&format!("/contacts?{}", token.query()))
}

fn after_import(token: &AdminToken, summary: ImportSummary) -> Redirect {
    Redirect::to(&format!(
        "/contacts?{}&imported={}&rejected={}",
        token.query(),
        summary.imported,
        summary.rejected
    ))
}

/// `GET /contacts`
pub async fn list(
    State(state): State<AppState>,
    token: AdminToken,
    Query(notice): Query<ImportNotice>,
) -> AppResult<Html<String>> {
    let contacts = state.contacts.list_recent().await?;
    let import = notice.imported.is_some().then_some(notice);

    state.views.render(
        "contacts.html",
        context! {
            app_name => state.config.app_name.as_str(),
            token => token.0,
            contacts => contacts,
            import => import,
        },
    )
}

/// `POST /contacts/add`
pub async fn add(
    State(state): State<AppState>,
    token: AdminToken,
    Form(form): Form<AddContactForm>,
) -> AppResult<Redirect> {
    state.contacts.add(form.into()).await?;
    Ok(back_to_contacts(&token))
}

/// `POST /contacts/import_csv`
///
/// Multipart upload with the CSV in the `file` field.
pub async fn import_csv(
    State(state): State<AppState>,
    token: AdminToken,
    mut multipart: Multipart,
) -> AppResult<Redirect> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            upload = Some(bytes);
            break;
        }
    }

    let bytes =
        upload.ok_or_else(|| AppError::BadRequest("Missing 'file' upload".to_string()))?;
    let summary = state.contacts.import_csv(&bytes).await?;
    Ok(after_import(&token, summary))
}

/// `POST /contacts/{contact_id}/optout`
pub async fn opt_out(
    State(state): State<AppState>,
    token: AdminToken,
    Path(contact_id): Path<i64>,
) -> AppResult<Redirect> {
    state.contacts.opt_out(contact_id).await?;
    Ok(back_to_contacts(&token))
}
