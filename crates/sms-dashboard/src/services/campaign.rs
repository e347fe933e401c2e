//! Campaign service: creation, fan-out into the message queue and stats.

use serde::Serialize;

use crate::db::models::campaign::NewCampaign;
use crate::db::models::{Campaign, Message, StatusCount};
use crate::db::queries::{audit, campaign as queries, contact, message};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::template::message::compose_body;

/// Campaigns shown on the campaigns page.
pub const CAMPAIGN_PAGE_LIMIT: i64 = 200;

/// Messages shown on a campaign's stats page.
pub const RECENT_MESSAGES_LIMIT: i64 = 50;

/// Per-campaign delivery overview.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignStats {
    pub campaign: Campaign,
    pub counts: Vec<StatusCount>,
    pub recent: Vec<Message>,
}

/// Service for campaign operations.
#[derive(Clone)]
pub struct CampaignService {
    pool: DbPool,
    public_base_url: String,
}

impl CampaignService {
    /// Create a new campaign service.
    ///
    /// `public_base_url` prefixes the opt-out link added to every message.
    pub fn new(pool: DbPool, public_base_url: impl Into<String>) -> Self {
        Self {
            pool,
            public_base_url: public_base_url.into(),
        }
    }

    /// Create a draft campaign and return its id.
    pub async fn create(&self, request: NewCampaign) -> AppResult<i64> {
        let name = request.name.trim();
        let template = request.message_template.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Campaign name is required".to_string()));
        }
        if template.is_empty() {
            return Err(AppError::Validation(
                "Message template is required".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let id = queries::insert(&mut *tx, name, template, request.target_tag.trim()).await?;
        audit::insert(&mut *tx, "campaign_created", &format!("id={}", id)).await?;
        tx.commit().await?;

        tracing::info!(campaign_id = id, name = %name, "Campaign created");
        Ok(id)
    }

    /// Start a campaign: queue one message per reachable, tag-matching contact.
    ///
    /// Returns the number of messages queued. A campaign can only be started
    /// once.
    pub async fn start(&self, id: i64) -> AppResult<usize> {
        let mut tx = self.pool.begin().await?;

        let campaign = queries::get_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Campaign not found".to_string()))?;

        if campaign.is_started() || !queries::mark_started(&mut *tx, id).await? {
            return Err(AppError::Conflict(format!(
                "Campaign {} was already started",
                id
            )));
        }

        let tag = campaign.target_tag.trim();
        let recipients: Vec<_> = contact::list_reachable(&mut *tx)
            .await?
            .into_iter()
            .filter(|c| tag.is_empty() || c.has_tag(tag))
            .collect();

        for recipient in &recipients {
            let body = compose_body(&campaign.message_template, recipient, &self.public_base_url);
            message::enqueue(&mut *tx, id, recipient.id, &recipient.phone, &body).await?;
        }

        audit::insert(
            &mut *tx,
            "campaign_started",
            &format!("id={},queued={}", id, recipients.len()),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            campaign_id = id,
            target_tag = %tag,
            queued = recipients.len(),
            "Campaign started"
        );
        Ok(recipients.len())
    }

    /// Delivery counts and the latest messages of one campaign.
    pub async fn stats(&self, id: i64) -> AppResult<CampaignStats> {
        let campaign = queries::get_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Campaign not found".to_string()))?;
        let counts = message::count_by_status(&self.pool, Some(id)).await?;
        let recent = message::list_for_campaign(&self.pool, id, RECENT_MESSAGES_LIMIT).await?;

        Ok(CampaignStats {
            campaign,
            counts,
            recent,
        })
    }

    /// Latest campaigns for the campaigns page.
    pub async fn list_recent(&self) -> AppResult<Vec<Campaign>> {
        queries::list_recent(&self.pool, CAMPAIGN_PAGE_LIMIT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::contact::NewContact;
    use crate::db::{create_memory_pool, init_schema};
    use crate::services::ContactService;

    async fn setup() -> (CampaignService, ContactService) {
        let pool = create_memory_pool().await.unwrap();
        init_schema(&pool).await.unwrap();
        (
            CampaignService::new(pool.clone(), "https://sms.example.com"),
            ContactService::new(pool),
        )
    }

    async fn add(contacts: &ContactService, phone: &str, tags: &str, consented: bool) {
        contacts
            .add(NewContact {
                name: format!("n{}", &phone[phone.len() - 2..]),
                phone: phone.to_string(),
                tags: tags.to_string(),
                consented,
            })
            .await
            .unwrap();
    }

    fn draft(tag: &str) -> NewCampaign {
        NewCampaign {
            name: " Promo ".to_string(),
            message_template: "Hello {{name}}".to_string(),
            target_tag: tag.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_requires_name_and_template() {
        let (campaigns, _) = setup().await;
        let mut request = draft("");
        request.name = "  ".to_string();
        assert!(matches!(
            campaigns.create(request).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_start_queues_only_reachable_tagged_contacts() {
        let (campaigns, contacts) = setup().await;
        add(&contacts, "+254700000001", "vip", true).await;
        add(&contacts, "+254700000002", "VIP,b2b", true).await;
        add(&contacts, "+254700000003", "vip", false).await;
        add(&contacts, "+254700000004", "b2b", true).await;
        add(&contacts, "+254700000005", "vip", true).await;
        contacts.unsubscribe("+254700000005").await.unwrap();

        let id = campaigns.create(draft("vip")).await.unwrap();
        let queued = campaigns.start(id).await.unwrap();
        assert_eq!(queued, 2);

        let stats = campaigns.stats(id).await.unwrap();
        assert!(stats.campaign.is_started());
        assert_eq!(stats.campaign.name, "Promo");
        assert_eq!(
            stats.counts,
            vec![StatusCount {
                status: "queued".to_string(),
                n: 2
            }]
        );
        let mut phones: Vec<_> = stats.recent.iter().map(|m| m.to_phone.clone()).collect();
        phones.sort();
        assert_eq!(phones, vec!["+254700000001", "+254700000002"]);

        let first = stats
            .recent
            .iter()
            .find(|m| m.to_phone == "+254700000001")
            .unwrap();
        assert_eq!(
            first.body,
            "Hello n01\nOpt out: https://sms.example.com/u/+254700000001"
        );
    }

    #[tokio::test]
    async fn test_start_without_tag_targets_everyone_reachable() {
        let (campaigns, contacts) = setup().await;
        add(&contacts, "+254700000001", "", true).await;
        add(&contacts, "+254700000002", "b2b", true).await;

        let id = campaigns.create(draft("")).await.unwrap();
        assert_eq!(campaigns.start(id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_start_twice_is_conflict() {
        let (campaigns, contacts) = setup().await;
        add(&contacts, "+254700000001", "", true).await;

        let id = campaigns.create(draft("")).await.unwrap();
        campaigns.start(id).await.unwrap();
        assert!(matches!(
            campaigns.start(id).await,
            Err(AppError::Conflict(_))
        ));

        let stats = campaigns.stats(id).await.unwrap();
        assert_eq!(stats.recent.len(), 1);
    }

    #[tokio::test]
    async fn test_start_unknown_campaign_is_not_found() {
        let (campaigns, _) = setup().await;
        assert!(matches!(
            campaigns.start(999).await,
            Err(AppError::NotFound(_))
        ));
    }
}
