//! Command dispatch.

pub mod exec;

use crate::compose::format::shell_join;
use crate::config::{Config, SKIP_SEND_VAR};
use crate::context::ServiceContext;
use crate::error::Error;
use crate::runner::ProcessRunner;

/// Runs `command` and delivers its notification as `config` dictates.
///
/// When `NOTIFY_EXEC_RECORD` is set, the send interaction is recorded to a
/// cassette in that directory, even if the run fails.
///
/// # Errors
///
/// Returns any fatal pipeline error, or a cassette error when recording
/// could not be saved.
pub fn dispatch(command: &[String], config: &Config) -> Result<(), Error> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)?;

    let ctx = ServiceContext::from_config(config, &shell_join(command))?;
    let report =
        runtime.block_on(exec::run(&ctx, &ProcessRunner::new(), command, config.skip_send));

    let recorded = ctx.finish();
    let report = report?;
    if let Some(path) = recorded? {
        eprintln!("Recording saved to: {}", path.display());
    }

    if report.receipt.is_none() {
        eprintln!("{SKIP_SEND_VAR}=true skipping send step");
    }
    Ok(())
}
