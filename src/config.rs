use std::time::Duration;

/// Knobs shared by the message source, the distribution channel and the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    /// Interval between two produced records.
    pub period: Duration,

    /// Capacity of the distribution channel. A full channel blocks the source.
    pub channel_capacity: usize,

    /// Upper bound for a single consumer send. Slower consumers are evicted.
    pub send_timeout: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(5),
            channel_capacity: 100,
            send_timeout: Duration::from_secs(5),
        }
    }
}

impl HubConfig {
    pub fn period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    // tokio's bounded channel rejects a zero capacity
    pub(crate) fn effective_capacity(&self) -> usize {
        self.channel_capacity.max(1)
    }
}
