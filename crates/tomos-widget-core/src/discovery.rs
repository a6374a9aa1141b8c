use std::future::Future;
use std::time::Duration;

pub const DEFAULT_DISCOVERY_INTERVAL: Duration = Duration::from_millis(800);
pub const DEFAULT_DISCOVERY_BUDGET: Duration = Duration::from_millis(6_000);
const MIN_DISCOVERY_INTERVAL: Duration = Duration::from_millis(10);

/// How often and for how long the frame is probed for its status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryPolicy {
    pub interval: Duration,
    pub budget: Duration,
}

impl Default for DiscoveryPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_DISCOVERY_INTERVAL,
            budget: DEFAULT_DISCOVERY_BUDGET,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStop {
    Acknowledged,
    BudgetExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStep {
    Ping,
    Stop(DiscoveryStop),
}

/// Tick-counting schedule; elapsed time is `ticks * interval`, so the
/// decision sequence does not depend on a wall clock.
#[derive(Debug, Clone)]
pub struct DiscoverySchedule {
    interval: Duration,
    budget: Duration,
    ticks: u32,
}

impl DiscoverySchedule {
    pub fn new(policy: DiscoveryPolicy) -> Self {
        Self {
            interval: policy.interval.max(MIN_DISCOVERY_INTERVAL),
            budget: policy.budget,
            ticks: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn elapsed(&self) -> Duration {
        self.interval.saturating_mul(self.ticks)
    }

    /// Called after each interval has elapsed.
    pub fn on_tick(&mut self, acknowledged: bool) -> DiscoveryStep {
        self.ticks = self.ticks.saturating_add(1);
        if acknowledged {
            return DiscoveryStep::Stop(DiscoveryStop::Acknowledged);
        }
        if self.elapsed() >= self.budget {
            return DiscoveryStep::Stop(DiscoveryStop::BudgetExhausted);
        }
        DiscoveryStep::Ping
    }
}

/// Drives the discovery loop with the host's timer.
///
/// `sleep` is awaited between rounds; `ping` runs once per round while
/// `is_acknowledged` reports false and the budget has not elapsed.
pub async fn run_discovery<Sl, Fut, Ack, Ping>(
    policy: DiscoveryPolicy,
    mut sleep: Sl,
    mut is_acknowledged: Ack,
    mut ping: Ping,
) -> DiscoveryStop
where
    Sl: FnMut(Duration) -> Fut,
    Fut: Future<Output = ()>,
    Ack: FnMut() -> bool,
    Ping: FnMut(),
{
    let mut schedule = DiscoverySchedule::new(policy);
    loop {
        sleep(schedule.interval()).await;
        match schedule.on_tick(is_acknowledged()) {
            DiscoveryStep::Ping => ping(),
            DiscoveryStep::Stop(reason) => {
                tracing::debug!(
                    ?reason,
                    elapsed_ms = schedule.elapsed().as_millis() as u64,
                    "discovery loop stopped"
                );
                return reason;
            }
        }
    }
}
