//! Decommission commands against a single cluster.
//!
//! The controller issues the cluster calls and returns plain outcomes; it never
//! prints. Every failure comes back as a [`CommandError`] naming the action.

use chrono::{DateTime, Utc};
use maxctl_admin::{AdminApi, PoolStatus};
use tracing::{debug, info};

use crate::{
    error::{CommandError, Context},
    render::Confirmation,
    view::{ActivePoolView, PoolProgress},
};

#[derive(Debug, Clone, PartialEq)]
pub enum CancelOutcome {
    /// The named pool's decommission was canceled.
    Canceled(Confirmation),
    /// No pool was named; the pools currently draining.
    Active(ActivePoolView),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusOutcome {
    List(Vec<PoolStatus>),
    Single {
        pool: PoolStatus,
        progress: PoolProgress,
    },
}

pub struct DecommissionController<'a> {
    api: &'a dyn AdminApi,
    target: &'a str,
}

impl<'a> DecommissionController<'a> {
    pub fn new(api: &'a dyn AdminApi, target: &'a str) -> Self {
        Self { api, target }
    }

    /// Cancels `pool`, or lists the draining pools when no pool is named.
    ///
    /// Listing never cancels anything.
    pub async fn cancel(&self, pool: Option<&str>) -> Result<CancelOutcome, CommandError> {
        match pool.filter(|pool| !pool.is_empty()) {
            Some(pool) => {
                info!(alias = %self.target, pool = %pool, "canceling decommission");
                self.api.cancel_decommission(pool).await.context(|| {
                    format!(
                        "Unable to cancel decommissioning of pool `{pool}` on `{}`, please try again",
                        self.target
                    )
                })?;
                Ok(CancelOutcome::Canceled(Confirmation::Canceled {
                    pool: pool.to_string(),
                }))
            }
            None => {
                let pools = self.list().await?;
                let view = ActivePoolView::from_snapshot(&pools);
                debug!(
                    alias = %self.target,
                    pools = pools.len(),
                    draining = view.pools.len(),
                    "listed draining pools"
                );
                Ok(CancelOutcome::Active(view))
            }
        }
    }

    pub async fn status(
        &self,
        pool: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<StatusOutcome, CommandError> {
        match pool.filter(|pool| !pool.is_empty()) {
            Some(name) => {
                let pool = self
                    .api
                    .status_pool(name)
                    .await
                    .context(|| {
                        format!("Unable to get status of pool `{name}` on `{}`", self.target)
                    })?;
                let progress = PoolProgress::from_pool(&pool, now);
                debug!(pool = %name, ?progress, "fetched pool status");
                Ok(StatusOutcome::Single { pool, progress })
            }
            None => Ok(StatusOutcome::List(self.list().await?)),
        }
    }

    pub async fn start(&self, pool: &str) -> Result<Confirmation, CommandError> {
        info!(alias = %self.target, pool = %pool, "starting decommission");
        self.api
            .decommission_pool(pool)
            .await
            .context(|| {
                format!(
                    "Unable to start decommissioning of pool `{pool}` on `{}`",
                    self.target
                )
            })?;
        Ok(Confirmation::Started {
            pool: pool.to_string(),
        })
    }

    async fn list(&self) -> Result<Vec<PoolStatus>, CommandError> {
        self.api
            .list_pools_status()
            .await
            .context(|| format!("Unable to get status for all pools on `{}`", self.target))
    }
}
