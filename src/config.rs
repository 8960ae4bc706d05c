use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Page size for list reads. Bigger pages mean fewer calls, but devices tend
/// to answer the following call with FS_NODE_BLOCKED more often.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// How long the device needs to settle after a call, see [`ClientConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cooldown {
    Read,
    Write,
    /// Power, mode and navigation changes.
    SlowWrite,
}

/// Settings of one [`crate::FsapiClient`]. The timeout applies to discovery,
/// session creation and every call alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub page_size: u32,
    pub read_cooldown: Duration,
    pub write_cooldown: Duration,
    pub slow_write_cooldown: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
            read_cooldown: Duration::ZERO,
            write_cooldown: Duration::from_millis(300),
            slow_write_cooldown: Duration::from_secs(1),
        }
    }
}

impl ClientConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_cooldowns(mut self, read: Duration, write: Duration, slow_write: Duration) -> Self {
        self.read_cooldown = read;
        self.write_cooldown = write;
        self.slow_write_cooldown = slow_write;
        self
    }

    /// No waiting between calls at all. Handy for tests against fake devices.
    pub fn without_cooldowns(self) -> Self {
        self.with_cooldowns(Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    pub fn cooldown(&self, cooldown: Cooldown) -> Duration {
        match cooldown {
            Cooldown::Read => self.read_cooldown,
            Cooldown::Write => self.write_cooldown,
            Cooldown::SlowWrite => self.slow_write_cooldown,
        }
    }
}
