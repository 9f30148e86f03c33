//! Display models built from a pool status snapshot.
//!
//! Renderers only format these; every rule about which pools appear and what
//! their cells contain lives here.

use chrono::{DateTime, Utc};
use maxctl_admin::PoolStatus;
use maxctl_common::humanize::{format_ibytes, ordinal, percent, rel_time};
use serde::Serialize;

use crate::classify::active_pools;

pub const DRAINING: &str = "Draining";

/// Below this many seconds since start, no migration rate is reported.
const MIN_RATE_WINDOW_SECS: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivePoolRow {
    pub id: usize,
    pub ordinal: String,
    pub pool: String,
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub capacity: String,
    pub status: &'static str,
}

/// Pools draining at fetch time, in pool-index order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivePoolView {
    pub pools: Vec<ActivePoolRow>,
}

impl ActivePoolView {
    pub fn from_snapshot(pools: &[PoolStatus]) -> Self {
        let pools = active_pools(pools)
            .into_iter()
            .map(|pool| {
                let (used_bytes, total_bytes) = pool
                    .decommission
                    .as_ref()
                    .map(|info| (info.used_bytes(), info.total_bytes()))
                    .unwrap_or_default();
                ActivePoolRow {
                    id: pool.id,
                    ordinal: display_id(pool.id),
                    pool: pool.cmd_line.clone(),
                    used_bytes,
                    total_bytes,
                    capacity: capacity(used_bytes, total_bytes),
                    status: DRAINING,
                }
            })
            .collect();
        Self { pools }
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

/// One line of the `status` listing, covering every pool.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolStatusRow {
    pub ordinal: String,
    pub pool: String,
    pub drives_usage: String,
    pub status: &'static str,
}

impl PoolStatusRow {
    pub fn from_pool(pool: &PoolStatus) -> Self {
        let (used, total) = pool
            .decommission
            .as_ref()
            .map(|info| (info.used_bytes(), info.total_bytes()))
            .unwrap_or_default();
        let drives_usage = if total == 0 {
            format!("0% (total: {})", format_ibytes(0))
        } else {
            format!("{:.1}% (total: {})", percent(used, total), format_ibytes(total))
        };

        Self {
            ordinal: display_id(pool.id),
            pool: pool.cmd_line.clone(),
            drives_usage,
            status: status_label(pool),
        }
    }
}

pub fn status_label(pool: &PoolStatus) -> &'static str {
    match &pool.decommission {
        Some(info) if info.complete => "Complete",
        Some(info) if info.failed => "Draining(Failed)",
        Some(info) if info.canceled => "Draining(Canceled)",
        Some(info) if info.is_started() => DRAINING,
        _ => "Active",
    }
}

/// Progress summary for a single pool's decommission.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolProgress {
    Complete { pool: String },
    Failed { pool: String },
    Canceled { pool: String },
    Draining {
        bytes_per_sec: u64,
        used_bytes: u64,
        total_bytes: u64,
        started: String,
    },
    Starting,
    NotScheduled,
}

impl PoolProgress {
    pub fn from_pool(pool: &PoolStatus, now: DateTime<Utc>) -> Self {
        let Some(info) = &pool.decommission else {
            return Self::NotScheduled;
        };
        if info.complete {
            return Self::Complete {
                pool: pool.cmd_line.clone(),
            };
        }
        if info.failed {
            return Self::Failed {
                pool: pool.cmd_line.clone(),
            };
        }
        if info.canceled {
            return Self::Canceled {
                pool: pool.cmd_line.clone(),
            };
        }
        let Some(start_time) = info.start_time else {
            return Self::NotScheduled;
        };

        let used_at_start = info.used_bytes_at_start();
        let used_now = info.used_bytes();
        let elapsed = (now - start_time).num_milliseconds() as f64 / 1000.0;
        if used_at_start <= used_now || elapsed <= MIN_RATE_WINDOW_SECS {
            return Self::Starting;
        }

        let copied = used_at_start - used_now;
        Self::Draining {
            bytes_per_sec: (copied as f64 / elapsed) as u64,
            used_bytes: used_now,
            total_bytes: info.total_bytes(),
            started: rel_time(start_time, now),
        }
    }

    pub fn is_scheduled(&self) -> bool {
        !matches!(self, Self::NotScheduled)
    }

    pub fn message(&self) -> String {
        match self {
            Self::Complete { pool } => format!(
                "Decommission of pool {pool} is complete, you may now remove it from server command line"
            ),
            Self::Failed { pool } => {
                format!("Decommission of pool {pool} failed, please retry again")
            }
            Self::Canceled { pool } => {
                format!("Decommission of pool {pool} was canceled, you may start again")
            }
            Self::Draining {
                bytes_per_sec,
                used_bytes,
                total_bytes,
                started,
            } => format!(
                "Decommissioning rate at {}/sec [{}/{}]\nStarted: {started}",
                format_ibytes(*bytes_per_sec),
                format_ibytes(*used_bytes),
                format_ibytes(*total_bytes)
            ),
            Self::Starting => "Decommissioning is starting...".to_string(),
            Self::NotScheduled => {
                "This pool is currently not scheduled for decommissioning".to_string()
            }
        }
    }
}

pub fn display_id(id: usize) -> String {
    ordinal(id as u64 + 1)
}

pub fn capacity(used_bytes: u64, total_bytes: u64) -> String {
    format!(
        "{} (used) / {} (total)",
        format_ibytes(used_bytes),
        format_ibytes(total_bytes)
    )
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use maxctl_admin::DecommissionInfo;

    use super::*;
    use crate::classify::{PoolClass, tests::pool};

    #[test]
    fn capacity_uses_iec_units() {
        assert_eq!(
            capacity(536_870_912, 1_073_741_824),
            "512.0 MiB (used) / 1.0 GiB (total)"
        );
        assert_eq!(capacity(0, 0), "0 B (used) / 0 B (total)");
    }

    #[test]
    fn mixed_snapshot_yields_single_draining_row() {
        let snapshot = vec![
            pool(0, PoolClass::Inactive),
            pool(1, PoolClass::Pending),
            pool(2, PoolClass::Draining),
            pool(3, PoolClass::Finished),
        ];
        let view = ActivePoolView::from_snapshot(&snapshot);

        assert_eq!(view.pools.len(), 1);
        let row = &view.pools[0];
        assert_eq!(row.ordinal, "3rd");
        assert_eq!(row.pool, "http://server{9...12}/disk{1...4}");
        assert_eq!(row.capacity, "512.0 MiB (used) / 1.0 GiB (total)");
        assert_eq!(row.status, "Draining");
        assert_eq!(row.used_bytes, row.total_bytes - 536_870_912);
    }

    #[test]
    fn empty_snapshot_yields_empty_view() {
        assert!(ActivePoolView::from_snapshot(&[]).is_empty());
    }

    #[test]
    fn status_labels() {
        assert_eq!(status_label(&pool(0, PoolClass::Inactive)), "Active");
        assert_eq!(status_label(&pool(0, PoolClass::Pending)), "Active");
        assert_eq!(status_label(&pool(0, PoolClass::Draining)), "Draining");
        assert_eq!(status_label(&pool(0, PoolClass::Finished)), "Complete");

        let mut failed = pool(0, PoolClass::Draining);
        failed.decommission.as_mut().unwrap().failed = true;
        assert_eq!(status_label(&failed), "Draining(Failed)");

        let mut canceled = pool(0, PoolClass::Draining);
        canceled.decommission.as_mut().unwrap().canceled = true;
        assert_eq!(status_label(&canceled), "Draining(Canceled)");
    }

    #[test]
    fn drives_usage_column() {
        let row = PoolStatusRow::from_pool(&pool(1, PoolClass::Draining));
        assert_eq!(row.ordinal, "2nd");
        assert_eq!(row.drives_usage, "50.0% (total: 1.0 GiB)");

        let row = PoolStatusRow::from_pool(&pool(0, PoolClass::Inactive));
        assert_eq!(row.drives_usage, "0% (total: 0 B)");
    }

    #[test]
    fn progress_reports_rate_after_ten_seconds() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();
        let status = PoolStatus {
            id: 0,
            cmd_line: "p".to_string(),
            last_update: None,
            decommission: Some(DecommissionInfo {
                start_time: Some(start),
                start_size: 0,
                total_size: 2048 * 100,
                current_size: 2048 * 50,
                ..DecommissionInfo::default()
            }),
        };

        let progress = PoolProgress::from_pool(&status, start + Duration::seconds(100));
        assert_eq!(
            progress,
            PoolProgress::Draining {
                bytes_per_sec: 1024,
                used_bytes: 2048 * 50,
                total_bytes: 2048 * 100,
                started: "1 minute ago".to_string(),
            }
        );
        assert_eq!(
            progress.message(),
            "Decommissioning rate at 1.0 KiB/sec [100.0 KiB/200.0 KiB]\nStarted: 1 minute ago"
        );

        let early = PoolProgress::from_pool(&status, start + Duration::seconds(5));
        assert_eq!(early, PoolProgress::Starting);
    }

    #[test]
    fn progress_terminal_states() {
        let now = Utc::now();
        let finished = PoolProgress::from_pool(&pool(0, PoolClass::Finished), now);
        assert_eq!(
            finished.message(),
            "Decommission of pool http://server{1...4}/disk{1...4} is complete, you may now remove it from server command line"
        );
        assert!(!PoolProgress::from_pool(&pool(0, PoolClass::Inactive), now).is_scheduled());
        assert!(!PoolProgress::from_pool(&pool(0, PoolClass::Pending), now).is_scheduled());
    }
}
