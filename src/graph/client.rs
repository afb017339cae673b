//! Public operation surface.
//!
//! # Responsibilities
//! - Resolve credentials before any network call
//! - Map each operation onto its graph endpoint
//! - Return typed results or an [`OperationError`], never panic on upstream failure

use std::sync::Arc;

use thiserror::Error;
use tracing::Instrument;

use crate::config::{ConnectorConfig, InsightsConfig, MediaConfig};
use crate::credentials::{CredentialResolver, CredentialStore, Decryptor, OrgId};
use crate::error::{OperationError, OperationResult};
use crate::graph::insights::{
    aggregate_metrics, InsightWindow, InsightsResponse, ACCOUNT_METRICS, DEFAULT_MEDIA_METRICS,
};
use crate::graph::media::{page_size, MediaListResponse, MEDIA_FIELDS};
use crate::graph::publish::PublishWorkflow;
use crate::graph::types::{
    decode, AccountInfo, AccountInsights, InsightMetrics, MediaPage, MediaQuery, PublishRequest,
    PublishedMedia,
};
use crate::http::{GraphGateway, HttpTransport, ReqwestTransport, TransportError};
use crate::observability::spans::operation_span;

const ACCOUNT_FIELDS: &str = "id,username,name,followers_count,media_count";

/// Errors building a client from configuration.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid graph base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Client for one Graph-style social platform, shared across organisations.
#[derive(Clone)]
pub struct GraphClient {
    resolver: CredentialResolver,
    gateway: GraphGateway,
    insights: InsightsConfig,
    media: MediaConfig,
}

impl GraphClient {
    pub fn new(resolver: CredentialResolver, gateway: GraphGateway, config: &ConnectorConfig) -> Self {
        Self {
            resolver,
            gateway,
            insights: config.insights.clone(),
            media: config.media.clone(),
        }
    }

    /// Build a client over an arbitrary transport.
    pub fn with_transport(
        config: &ConnectorConfig,
        store: Arc<dyn CredentialStore>,
        decryptor: Arc<dyn Decryptor>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ClientBuildError> {
        let resolver = CredentialResolver::new(store, decryptor, config.graph.provider.clone());
        let gateway = GraphGateway::from_config(transport, config)?;
        Ok(Self::new(resolver, gateway, config))
    }

    /// Build a client that talks to the network through `reqwest`.
    pub fn from_config(
        config: &ConnectorConfig,
        store: Arc<dyn CredentialStore>,
        decryptor: Arc<dyn Decryptor>,
    ) -> Result<Self, ClientBuildError> {
        let transport = Arc::new(ReqwestTransport::new(&config.graph)?);
        Self::with_transport(config, store, decryptor, transport)
    }

    /// Profile summary: display name, follower count, media count.
    pub async fn account_info(&self, org_id: &OrgId) -> OperationResult<AccountInfo> {
        self.fetch_account_info(org_id)
            .instrument(operation_span("account_info", org_id))
            .await
            .map_err(log_failure)
    }

    /// Reach, accounts engaged and impressions over a trailing window of days.
    ///
    /// `days` defaults to the configured window and is clamped to the configured maximum.
    pub async fn account_insights(
        &self,
        org_id: &OrgId,
        days: Option<u32>,
    ) -> OperationResult<AccountInsights> {
        self.fetch_account_insights(org_id, days)
            .instrument(operation_span("account_insights", org_id))
            .await
            .map_err(log_failure)
    }

    /// One page of the account's media. Never follows cursors on its own.
    pub async fn list_media(&self, org_id: &OrgId, query: MediaQuery) -> OperationResult<MediaPage> {
        self.fetch_media_page(org_id, query)
            .instrument(operation_span("list_media", org_id))
            .await
            .map_err(log_failure)
    }

    /// Insights for one media item. Missing metrics are simply absent.
    pub async fn media_insights(
        &self,
        org_id: &OrgId,
        media_id: &str,
        metrics: Option<&[&str]>,
    ) -> OperationResult<InsightMetrics> {
        self.fetch_media_insights(org_id, media_id, metrics)
            .instrument(operation_span("media_insights", org_id))
            .await
            .map_err(log_failure)
    }

    /// Create a media container for an image and publish it.
    pub async fn publish_image(
        &self,
        org_id: &OrgId,
        request: PublishRequest,
    ) -> OperationResult<PublishedMedia> {
        self.run_publish(org_id, &request)
            .instrument(operation_span("publish_image", org_id))
            .await
            .map_err(log_failure)
    }

    async fn fetch_account_info(&self, org_id: &OrgId) -> OperationResult<AccountInfo> {
        let auth = self.resolver.require(org_id).await?;
        let body = self
            .gateway
            .get(
                "account_info",
                &auth.token,
                &auth.account_id,
                &[("fields", ACCOUNT_FIELDS.to_string())],
            )
            .await?;
        Ok(decode(body)?)
    }

    async fn fetch_account_insights(
        &self,
        org_id: &OrgId,
        days: Option<u32>,
    ) -> OperationResult<AccountInsights> {
        let auth = self.resolver.require(org_id).await?;
        let days = days
            .unwrap_or(self.insights.default_window_days)
            .clamp(1, self.insights.max_window_days.max(1));
        let window = InsightWindow::trailing_days_from_now(days);

        let body = self
            .gateway
            .get(
                "account_insights",
                &auth.token,
                &format!("{}/insights", auth.account_id),
                &[
                    ("metric", ACCOUNT_METRICS.join(",")),
                    ("period", "day".to_string()),
                    ("since", window.since.to_string()),
                    ("until", window.until.to_string()),
                ],
            )
            .await?;
        let response: InsightsResponse = decode(body)?;

        Ok(AccountInsights {
            metrics: aggregate_metrics(&response, ACCOUNT_METRICS),
            since: window.since,
            until: window.until,
        })
    }

    async fn fetch_media_page(&self, org_id: &OrgId, query: MediaQuery) -> OperationResult<MediaPage> {
        let auth = self.resolver.require(org_id).await?;

        let mut params = vec![
            ("fields", MEDIA_FIELDS.to_string()),
            ("limit", page_size(query.limit, &self.media).to_string()),
        ];
        if let Some(after) = query.after.filter(|c| !c.is_empty()) {
            params.push(("after", after));
        }

        let body = self
            .gateway
            .get(
                "list_media",
                &auth.token,
                &format!("{}/media", auth.account_id),
                &params,
            )
            .await?;
        let response: MediaListResponse = decode(body)?;
        let page = response.into_page();

        tracing::debug!(
            items = page.items.len(),
            has_more = page.next_cursor.is_some(),
            "Media page fetched"
        );
        Ok(page)
    }

    async fn fetch_media_insights(
        &self,
        org_id: &OrgId,
        media_id: &str,
        metrics: Option<&[&str]>,
    ) -> OperationResult<InsightMetrics> {
        let auth = self.resolver.require(org_id).await?;
        let wanted = metrics.filter(|m| !m.is_empty()).unwrap_or(DEFAULT_MEDIA_METRICS);

        let body = self
            .gateway
            .get(
                "media_insights",
                &auth.token,
                &format!("{}/insights", media_id),
                &[("metric", wanted.join(","))],
            )
            .await?;
        let response: InsightsResponse = decode(body)?;
        Ok(aggregate_metrics(&response, wanted))
    }

    async fn run_publish(&self, org_id: &OrgId, request: &PublishRequest) -> OperationResult<PublishedMedia> {
        let auth = self.resolver.require(org_id).await?;
        let mut workflow = PublishWorkflow::new(&self.gateway, &auth);
        let result = workflow.run(request).await;
        tracing::debug!(state = ?workflow.state(), "Publish workflow finished");
        Ok(result?)
    }
}

fn log_failure(err: OperationError) -> OperationError {
    match &err {
        OperationError::NoCredentials => {
            tracing::info!("Operation skipped: integration not connected");
        }
        OperationError::Api(failure) => {
            tracing::warn!(kind = ?failure.kind, details = %failure.details, "Operation failed");
        }
    }
    err
}
