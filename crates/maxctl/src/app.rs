use std::io::Write;

use maxctl_admin::AdminApi;
use maxctl_common::{MaxctlError, time};

use crate::{
    cli::DecommissionCommand,
    config::OutputConfig,
    controller::{CancelOutcome, DecommissionController, StatusOutcome},
    error::{CommandError, Context},
    render::renderer_for,
};

/// Runs one decommission command, writing results to `out` and non-fatal
/// warnings to `err`.
pub async fn run(
    command: &DecommissionCommand,
    api: &dyn AdminApi,
    config: &OutputConfig,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CommandError> {
    let renderer = renderer_for(config);
    let controller = DecommissionController::new(api, command.target());

    let rendered = match command {
        DecommissionCommand::Cancel { pool, .. } => {
            match controller.cancel(pool.as_deref()).await? {
                CancelOutcome::Canceled(confirmation) => renderer.confirmation(&confirmation),
                CancelOutcome::Active(view) => renderer.active_pools(&view),
            }
        }
        DecommissionCommand::Status { pool, .. } => {
            match controller.status(pool.as_deref(), time::now()).await? {
                StatusOutcome::List(pools) => renderer.pool_list(&pools),
                StatusOutcome::Single { pool, progress } => {
                    if !progress.is_scheduled() && !config.json {
                        write_warning(err, &progress.message())
                            .context(|| "Unable to write output".to_string())?;
                        return Ok(());
                    }
                    renderer.pool_progress(&pool, &progress)
                }
            }
        }
        DecommissionCommand::Start { pool, .. } => {
            let confirmation = controller.start(pool).await?;
            renderer.confirmation(&confirmation)
        }
    };

    let rendered = rendered.context(|| "Unable to render output".to_string())?;
    out.write_all(rendered.as_bytes())
        .and_then(|()| out.flush())
        .map_err(MaxctlError::from)
        .context(|| "Unable to write output".to_string())
}

fn write_warning(err: &mut dyn Write, message: &str) -> maxctl_common::Result<()> {
    writeln!(err, "maxctl: <ERROR> {message}")?;
    Ok(())
}
