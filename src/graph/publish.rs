//! Two-phase image publishing.
//!
//! # States
//! - Idle: nothing sent yet
//! - Created: upstream holds a media container
//! - Published: container published, media id known
//! - Failed: terminal, from either phase
//!
//! # State Transitions
//! ```text
//! Idle → Created: POST /{account}/media returns a container id
//! Idle → Failed: container creation fails (publish is never attempted)
//! Created → Published: POST /{account}/media_publish returns a media id
//! Created → Failed: publish fails; the container is left orphaned upstream
//! ```
//!
//! Neither phase is retried: a blind retry can create duplicate posts.
//! An orphaned container is logged and counted, not rolled back.

use crate::credentials::AuthContext;
use crate::error::ApiFailure;
use crate::graph::types::{response_id, PublishRequest, PublishedMedia};
use crate::http::GraphGateway;
use crate::observability::metrics;

/// Which call of the workflow failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishPhase {
    CreateContainer,
    Publish,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishState {
    Idle,
    Created { container_id: String },
    Published { media_id: String },
    Failed { phase: PublishPhase, details: String },
}

impl PublishState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PublishState::Published { .. } | PublishState::Failed { .. })
    }

    /// Container created upstream but never published.
    pub fn orphaned_container(&self) -> bool {
        matches!(
            self,
            PublishState::Failed {
                phase: PublishPhase::Publish,
                ..
            }
        )
    }
}

/// Drives one publish from `Idle` to a terminal state.
pub struct PublishWorkflow<'a> {
    gateway: &'a GraphGateway,
    auth: &'a AuthContext,
    state: PublishState,
}

impl<'a> PublishWorkflow<'a> {
    pub fn new(gateway: &'a GraphGateway, auth: &'a AuthContext) -> Self {
        Self {
            gateway,
            auth,
            state: PublishState::Idle,
        }
    }

    pub fn state(&self) -> &PublishState {
        &self.state
    }

    /// Run both phases and return the published media.
    pub async fn run(&mut self, request: &PublishRequest) -> Result<PublishedMedia, ApiFailure> {
        let container_id = self.create_container(request).await?;
        let media_id = self.publish(&container_id).await?;
        Ok(PublishedMedia { media_id })
    }

    async fn create_container(&mut self, request: &PublishRequest) -> Result<String, ApiFailure> {
        let mut params = vec![("image_url", request.image_url.clone())];
        if let Some(caption) = &request.caption {
            params.push(("caption", caption.clone()));
        }

        let path = format!("{}/media", self.auth.account_id);
        let result = self
            .gateway
            .post_once("create_container", &self.auth.token, &path, &params)
            .await
            .and_then(|body| {
                response_id(&body)
                    .ok_or_else(|| ApiFailure::permanent("container creation returned no id"))
            });

        match result {
            Ok(container_id) => {
                tracing::info!(container_id = %container_id, "Media container created");
                self.state = PublishState::Created {
                    container_id: container_id.clone(),
                };
                Ok(container_id)
            }
            Err(failure) => {
                tracing::warn!(error = %failure.details, "Media container creation failed");
                self.fail(PublishPhase::CreateContainer, &failure);
                Err(failure)
            }
        }
    }

    async fn publish(&mut self, container_id: &str) -> Result<String, ApiFailure> {
        let path = format!("{}/media_publish", self.auth.account_id);
        let params = [("creation_id", container_id.to_string())];
        let result = self
            .gateway
            .post_once("publish_container", &self.auth.token, &path, &params)
            .await
            .and_then(|body| {
                response_id(&body).ok_or_else(|| ApiFailure::permanent("publish returned no media id"))
            });

        match result {
            Ok(media_id) => {
                tracing::info!(container_id = %container_id, media_id = %media_id, "Media published");
                self.state = PublishState::Published {
                    media_id: media_id.clone(),
                };
                Ok(media_id)
            }
            Err(failure) => {
                tracing::warn!(
                    container_id = %container_id,
                    error = %failure.details,
                    "Publish failed; media container left unpublished upstream"
                );
                metrics::record_orphaned_container();
                self.fail(PublishPhase::Publish, &failure);
                Err(failure)
            }
        }
    }

    fn fail(&mut self, phase: PublishPhase, failure: &ApiFailure) {
        self.state = PublishState::Failed {
            phase,
            details: failure.details.clone(),
        };
    }
}
