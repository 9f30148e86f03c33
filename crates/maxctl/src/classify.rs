use maxctl_admin::PoolStatus;

/// Where a pool stands in the decommission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolClass {
    /// No decommission was ever requested.
    Inactive,
    /// Requested, but the cluster has not started migrating yet.
    Pending,
    Finished,
    /// Data is being migrated off the pool.
    Draining,
}

pub fn classify(pool: &PoolStatus) -> PoolClass {
    match &pool.decommission {
        None => PoolClass::Inactive,
        Some(info) if !info.is_started() => PoolClass::Pending,
        Some(info) if info.complete => PoolClass::Finished,
        Some(_) => PoolClass::Draining,
    }
}

/// Pools currently draining, in the order the cluster reported them.
pub fn active_pools(pools: &[PoolStatus]) -> Vec<&PoolStatus> {
    pools
        .iter()
        .filter(|pool| classify(pool) == PoolClass::Draining)
        .collect()
}
