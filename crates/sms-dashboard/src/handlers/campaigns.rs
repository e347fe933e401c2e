//! Campaign pages.

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use minijinja::context;
use serde::Serialize;

use super::auth::AdminToken;
use crate::db::models::campaign::NewCampaign;
use crate::db::models::Campaign;
use crate::error::AppResult;
use crate::state::AppState;

/// Campaign row plus its derived lifecycle state.
#[derive(Debug, Serialize)]
struct CampaignRow {
    #[serde(flatten)]
    campaign: Campaign,
    state: &'static str,
}

impl From<Campaign> for CampaignRow {
    fn from(campaign: Campaign) -> Self {
        Self {
            state: campaign.state(),
            campaign,
        }
    }
}

fn back_to_campaigns(token: &AdminToken) -> Redirect {
    Redirect::to(&format!("/campaigns?{}", token.query()))
}

/// `GET /campaigns`
pub async fn list(State(state): State<AppState>, token: AdminToken) -> AppResult<Html<String>> {
    let campaigns: Vec<CampaignRow> = state
        .campaigns
        .list_recent()
        .await?
        .into_iter()
        .map(CampaignRow::from)
        .collect();

    state.views.render(
        "campaigns.html",
        context! {
            app_name => state.config.app_name.as_str(),
            token => token.0,
            campaigns => campaigns,
        },
    )
}

/// `POST /campaigns/create`
pub async fn create(
    State(state): State<AppState>,
    token: AdminToken,
    Form(form): Form<NewCampaign>,
) -> AppResult<Redirect> {
    state.campaigns.create(form).await?;
    Ok(back_to_campaigns(&token))
}

/// `POST /campaigns/{campaign_id}/start`
///
/// 404 for an unknown campaign, 409 if it was already started.
pub async fn start(
    State(state): State<AppState>,
    token: AdminToken,
    Path(campaign_id): Path<i64>,
) -> AppResult<Redirect> {
    state.campaigns.start(campaign_id).await?;
    Ok(back_to_campaigns(&token))
}

/// `GET /campaigns/{campaign_id}/stats`
pub async fn stats(
    State(state): State<AppState>,
    token: AdminToken,
    Path(campaign_id): Path<i64>,
) -> AppResult<Html<String>> {
    let stats = state.campaigns.stats(campaign_id).await?;

    state.views.render(
        "campaign_stats.html",
        context! {
            app_name => state.config.app_name.as_str(),
            token => token.0,
            state => stats.campaign.state(),
            campaign => stats.campaign,
            counts => stats.counts,
            recent => stats.recent,
        },
    )
}
