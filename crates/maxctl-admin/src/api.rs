use async_trait::async_trait;
use maxctl_common::error::Result;

use crate::types::PoolStatus;

/// Pool administration calls exposed by a cluster.
///
/// `pool` arguments are the pool's command-line form as the cluster knows it,
/// e.g. `http://server{5...8}/disk{1...4}`.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_pools_status(&self) -> Result<Vec<PoolStatus>>;

    async fn status_pool(&self, pool: &str) -> Result<PoolStatus>;

    async fn decommission_pool(&self, pool: &str) -> Result<()>;

    async fn cancel_decommission(&self, pool: &str) -> Result<()>;
}
