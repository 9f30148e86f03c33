use maxctl_admin::PoolStatus;
use maxctl_common::error::Result;
use serde::Serialize;

use super::{Confirmation, Render};
use crate::view::{ActivePoolRow, ActivePoolView, PoolProgress};

/// Machine readable output, one pretty-printed JSON document per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

#[derive(Serialize)]
struct ActivePoolsMessage<'a> {
    status: &'static str,
    pools: &'a [ActivePoolRow],
}

#[derive(Serialize)]
struct ConfirmationMessage<'a> {
    status: &'static str,
    action: &'static str,
    pool: &'a str,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut rendered = serde_json::to_string_pretty(value)?;
    rendered.push('\n');
    Ok(rendered)
}

impl Render for JsonRenderer {
    fn active_pools(&self, view: &ActivePoolView) -> Result<String> {
        to_json(&ActivePoolsMessage {
            status: "success",
            pools: &view.pools,
        })
    }

    fn pool_list(&self, pools: &[PoolStatus]) -> Result<String> {
        to_json(pools)
    }

    fn pool_progress(&self, pool: &PoolStatus, _progress: &PoolProgress) -> Result<String> {
        to_json(pool)
    }

    fn confirmation(&self, confirmation: &Confirmation) -> Result<String> {
        let action = match confirmation {
            Confirmation::Started { .. } => "start",
            Confirmation::Canceled { .. } => "cancel",
        };
        to_json(&ConfirmationMessage {
            status: "success",
            action,
            pool: confirmation.pool(),
        })
    }
}
