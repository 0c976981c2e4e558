//! Tree and driver configuration structures and loaders.
use std::env;
use std::time::Duration;

/// Default period between two root ticks.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(1000);

/// Behavior knobs applied to nodes at construction.
#[derive(Clone, Debug, Default)]
pub struct TreeConfig {
    /// How long [`ActionNode::halt`](crate::ActionNode) waits for the
    /// running cycle to acknowledge cancellation.
    ///
    /// `None` (default) fires the request and returns immediately.
    pub halt_ack_timeout: Option<Duration>,
}

impl TreeConfig {
    pub const fn new() -> Self {
        Self {
            halt_ack_timeout: None,
        }
    }

    pub fn with_halt_ack_timeout(mut self, timeout: Duration) -> Self {
        self.halt_ack_timeout = Some(timeout);
        self
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BT_HALT_ACK_TIMEOUT_MS` - Wait bound for halt acknowledgment (default: none)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(millis) = read_env::<u64>("BT_HALT_ACK_TIMEOUT_MS") {
            config.halt_ack_timeout = Some(Duration::from_millis(millis));
        }

        config
    }
}

/// Settings for the periodic root driver.
#[derive(Clone, Debug)]
pub struct DriverConfig {
    /// Pause between the end of one root tick and the start of the next.
    pub tick_period: Duration,
    /// Stop after this many ticks (`None` runs until cancelled).
    pub max_ticks: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_period: DEFAULT_TICK_PERIOD,
            max_ticks: None,
        }
    }
}

impl DriverConfig {
    pub const fn new(tick_period: Duration) -> Self {
        Self {
            tick_period,
            max_ticks: None,
        }
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BT_TICK_PERIOD_MS` - Milliseconds between root ticks (default: 1000)
    /// - `BT_MAX_TICKS` - Tick budget before the driver stops (default: unlimited)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(millis) = read_env::<u64>("BT_TICK_PERIOD_MS") {
            config.tick_period = Duration::from_millis(millis);
        }

        config.max_ticks = read_env::<u64>("BT_MAX_TICKS");

        config
    }
}

/// Parses environment variable `key`, returning `None` when unset or malformed.
pub fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
