//! Timing for live-refreshing views: wait out the interval unless the user
//! interrupts with Ctrl-C.

use std::time::Duration;

/// What to do after a refresh tick.
#[derive(Debug, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Stop,
}

/// Sleep for `interval`, resolving early to [`Tick::Stop`] on Ctrl-C.
pub async fn sleep_or_interrupt(interval: Duration) -> Tick {
    tokio::select! {
        _ = tokio::time::sleep(interval) => Tick::Continue,
        _ = tokio::signal::ctrl_c() => Tick::Stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn short_interval_continues() {
        let tick = sleep_or_interrupt(Duration::from_millis(5)).await;
        assert_eq!(tick, Tick::Continue);
    }
}
