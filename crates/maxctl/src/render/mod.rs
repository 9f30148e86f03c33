mod json;
mod table;

pub use json::JsonRenderer;
pub use table::TableRenderer;

use maxctl_admin::PoolStatus;
use maxctl_common::error::Result;

use crate::{
    config::OutputConfig,
    view::{ActivePoolView, PoolProgress},
};

/// A successful one-shot action, confirmed to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Started { pool: String },
    Canceled { pool: String },
}

impl Confirmation {
    pub fn pool(&self) -> &str {
        match self {
            Self::Started { pool } | Self::Canceled { pool } => pool,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Started { pool } => {
                format!("Decommission started successfully for pool {pool}.")
            }
            Self::Canceled { pool } => {
                format!("Decommission canceled successfully for pool {pool}.")
            }
        }
    }
}

/// Turns command results into the text written to stdout.
///
/// Every method returns the complete output, newline-terminated, or an empty
/// string when nothing should be printed.
pub trait Render {
    fn active_pools(&self, view: &ActivePoolView) -> Result<String>;

    fn pool_list(&self, pools: &[PoolStatus]) -> Result<String>;

    fn pool_progress(&self, pool: &PoolStatus, progress: &PoolProgress) -> Result<String>;

    fn confirmation(&self, confirmation: &Confirmation) -> Result<String>;
}

pub fn renderer_for(config: &OutputConfig) -> Box<dyn Render> {
    if config.json {
        Box::new(JsonRenderer)
    } else {
        Box::new(TableRenderer::new(config))
    }
}
