#![allow(async_fn_in_trait)]

mod adapter;
mod domain;
mod service;

use std::{collections::BTreeMap, sync::Arc};

pub use domain::*;
pub use service::{ComfortReport, RoomSummary};

use crate::comfort::{adapter::db::MarkerRepository, service::ComfortService};
use crate::core::time::{DateTime, Duration};

/// Read and write access to stored markers. Rows come back in no particular order.
pub trait MarkerAccess {
    async fn markers_since(&self, location: &str, since: DateTime) -> anyhow::Result<Vec<MarkerEvent>>;

    async fn user_markers_since(
        &self,
        location: &str,
        user_id: &str,
        since: DateTime,
    ) -> anyhow::Result<Vec<UserMarker>>;

    async fn add_markers(&self, user_id: &str, location: &str, markers: &[NewMarker]) -> anyhow::Result<u64>;
}

pub struct ComfortModule<A: MarkerAccess = MarkerRepository> {
    service: Arc<ComfortService<A>>,
}

impl<A: MarkerAccess> Clone for ComfortModule<A> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

pub struct ComfortClient<A: MarkerAccess = MarkerRepository> {
    service: Arc<ComfortService<A>>,
}

impl<A: MarkerAccess> Clone for ComfortClient<A> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl ComfortModule {
    pub fn new(pool: sqlx::PgPool, default_window: Duration) -> Self {
        Self::with_access(MarkerRepository::new(pool), default_window)
    }
}

impl<A: MarkerAccess + 'static> ComfortModule<A> {
    pub fn with_access(access: A, default_window: Duration) -> Self {
        Self {
            service: Arc::new(ComfortService::new(access, default_window)),
        }
    }

    pub fn client(&self) -> ComfortClient<A> {
        ComfortClient {
            service: self.service.clone(),
        }
    }

    pub fn routes(&self) -> Vec<actix_web::Scope> {
        adapter::api::routes(self.client())
    }
}

impl<A: MarkerAccess> ComfortClient<A> {
    pub fn default_window(&self) -> Duration {
        self.service.default_window()
    }

    pub async fn comfort_report(&self, location: &str, window: Duration) -> anyhow::Result<ComfortReport> {
        self.service.comfort_report(location, window).await
    }

    pub async fn room_summaries(&self, location: &str, window: Duration) -> anyhow::Result<BTreeMap<String, RoomSummary>> {
        self.service.room_summaries(location, window).await
    }

    pub async fn submit_markers(&self, submission: ValidSubmission) -> anyhow::Result<u64> {
        self.service.submit_markers(submission).await
    }

    pub async fn user_markers(&self, location: &str, user_id: &str) -> anyhow::Result<Vec<UserMarker>> {
        self.service.user_markers(location, user_id).await
    }
}
