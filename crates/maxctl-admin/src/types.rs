use chrono::{DateTime, Utc};
use maxctl_common::time::zero_time;
use serde::{Deserialize, Serialize};

/// One storage pool as reported by `pools/list` and `pools/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolStatus {
    pub id: usize,
    #[serde(rename = "cmdline")]
    pub cmd_line: String,
    #[serde(rename = "lastUpdate", with = "zero_time", default)]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(
        rename = "decommissionInfo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub decommission: Option<DecommissionInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecommissionInfo {
    /// `None` while the decommission is requested but not yet started.
    #[serde(with = "zero_time", default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_size: i64,
    #[serde(default)]
    pub total_size: i64,
    #[serde(default)]
    pub current_size: i64,
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub failed: bool,
    #[serde(default)]
    pub canceled: bool,
    #[serde(default)]
    pub objects_decommissioned: i64,
    #[serde(default, rename = "objectsDecommissionedFailed")]
    pub objects_decommission_failed: i64,
    #[serde(default)]
    pub bytes_decommissioned: i64,
    #[serde(default, rename = "bytesDecommissionedFailed")]
    pub bytes_decommission_failed: i64,
}

impl DecommissionInfo {
    pub fn is_started(&self) -> bool {
        self.start_time.is_some()
    }

    pub fn total_bytes(&self) -> u64 {
        to_bytes(self.total_size)
    }

    /// Bytes still held by the pool: `total_size - current_size`.
    pub fn used_bytes(&self) -> u64 {
        to_bytes(self.total_size.saturating_sub(self.current_size))
    }

    pub fn used_bytes_at_start(&self) -> u64 {
        to_bytes(self.total_size.saturating_sub(self.start_size))
    }
}

fn to_bytes(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
