pub mod alias;
pub mod api;
pub mod client;
pub mod types;

pub use alias::{AliasConfig, HostConfig, ResolvedTarget, resolve_target};
pub use api::AdminApi;
pub use client::AdminClient;
pub use types::{DecommissionInfo, PoolStatus};
