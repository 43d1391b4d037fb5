// Periodic refresh of the rendered fragments.

use election_board::refresh::SingleFlight;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::board::*;

/// Spawns `cycle` unless the previous one is still running.
///
/// The permit moves into the task, so the slot frees itself when the cycle
/// ends, whichever way it ends.
pub fn spawn_if_idle<F>(flight: &SingleFlight, cycle: F) -> Option<JoinHandle<()>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let permit = flight.try_begin()?;
    Some(tokio::spawn(async move {
        let _permit = permit;
        cycle.await;
    }))
}

/// Refreshes on every tick until Ctrl-C.
///
/// The first tick fires immediately. Ticks missed during a slow cycle are
/// skipped, and a tick that still finds a cycle running does nothing.
pub async fn run_refresh_loop(board: Arc<Board>, period: Duration) -> BoardResult<()> {
    info!("Refreshing every {:?}", period);
    let flight = SingleFlight::new();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            res = &mut shutdown => {
                res.context(SignalSnafu {})?;
                info!("Stopping the refresh loop");
                return Ok(());
            }
        }
        let b = Arc::clone(&board);
        let spawned = spawn_if_idle(&flight, async move {
            if let Err(e) = b.refresh().await {
                error!("Refresh failed: {}", e);
            }
        });
        if spawned.is_none() {
            warn!("Previous refresh still running, skipping this tick");
        }
    }
}
