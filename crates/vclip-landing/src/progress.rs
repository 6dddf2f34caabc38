//! Simulated processing progress.
//!
//! The backend does not report progress, so while the processing phase is
//! `processing` the bar advances linearly over a fixed window.

use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::config::ProgressConfig;
use crate::state::StateCell;

/// Percentage reached after `elapsed` of a `window`, capped at 100.
pub fn simulated_percent(elapsed: Duration, window: Duration) -> f64 {
    if window.is_zero() {
        return 100.0;
    }
    (elapsed.as_secs_f64() / window.as_secs_f64() * 100.0).min(100.0)
}

/// Drive the progress bar for one upload cycle.
///
/// Waits for the processing phase to begin, ticks while it lasts and returns
/// as soon as the phase changes, polling ends or the cycle is reset.
pub(crate) async fn run(state: StateCell, cycle: u64, config: ProgressConfig) {
    let mut rx = state.subscribe();

    loop {
        {
            let current = rx.borrow_and_update();
            if current.cycle != cycle || current.is_settled() {
                return;
            }
            if current.upload.is_processing() {
                break;
            }
        }
        if rx.changed().await.is_err() {
            return;
        }
    }

    debug!(cycle, "Processing started, simulating progress");
    let started = Instant::now();
    let mut ticker = interval_at(started + config.tick, config.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let percent = simulated_percent(started.elapsed(), config.window);
                let mut still_processing = false;
                let current = state.update_if_current(cycle, |s| {
                    if !s.upload.is_processing() || s.poll.is_terminal() {
                        return false;
                    }
                    still_processing = true;
                    s.upload.set_processing_progress(percent);
                    true
                });
                if !current || !still_processing {
                    break;
                }
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = rx.borrow_and_update();
                if current.cycle != cycle
                    || !current.upload.is_processing()
                    || current.poll.is_terminal()
                {
                    break;
                }
            }
        }
    }

    debug!(cycle, "Progress simulation stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_percent_is_linear_and_capped() {
        let window = Duration::from_secs(180);
        assert_eq!(simulated_percent(Duration::ZERO, window), 0.0);
        assert!((simulated_percent(Duration::from_secs(90), window) - 50.0).abs() < 1e-9);
        assert_eq!(simulated_percent(Duration::from_secs(400), window), 100.0);
        assert_eq!(simulated_percent(Duration::from_secs(1), Duration::ZERO), 100.0);
    }
}
