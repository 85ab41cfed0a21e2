// Runs a collection cycle at startup and then on the configured schedule.
// Schedule is either "@every <duration>" or a cron expression (local time).
// Each cycle runs in its own task, so a slow cycle never delays the next trigger.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::collector::Collector;

pub const DEFAULT_STATS_INTERVAL: &str = "@every 1m";

const EVERY_PREFIX: &str = "@every ";

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("invalid interval {0:?}: expected a duration like 30s, 1.5m or 1h30m")]
    InvalidInterval(String),
    #[error("interval must be greater than zero")]
    ZeroInterval,
    #[error("invalid cron expression {expr:?}: {source}")]
    Cron {
        expr: String,
        #[source]
        source: cron::error::Error,
    },
}

#[derive(Debug, Clone)]
enum Trigger {
    Every(Duration),
    Cron(Box<cron::Schedule>),
}

/// Parsed stats schedule.
#[derive(Debug, Clone)]
pub struct StatsSchedule {
    expr: String,
    trigger: Trigger,
}

impl StatsSchedule {
    pub fn parse(expr: &str) -> Result<Self, ScheduleError> {
        let expr = expr.trim();
        let trigger = if let Some(rest) = expr.strip_prefix(EVERY_PREFIX) {
            let d = parse_duration(rest)
                .ok_or_else(|| ScheduleError::InvalidInterval(rest.trim().to_string()))?;
            if d.is_zero() {
                return Err(ScheduleError::ZeroInterval);
            }
            Trigger::Every(d)
        } else {
            let schedule =
                cron::Schedule::from_str(expr).map_err(|source| ScheduleError::Cron {
                    expr: expr.to_string(),
                    source,
                })?;
            Trigger::Cron(Box::new(schedule))
        };
        Ok(Self {
            expr: expr.to_string(),
            trigger,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expr
    }

    /// Time to wait from `now` until the next run. `None` if a cron schedule has no future run.
    pub fn next_delay(&self, now: DateTime<Local>) -> Option<Duration> {
        match &self.trigger {
            Trigger::Every(d) => Some(*d),
            Trigger::Cron(schedule) => {
                let next = schedule.after(&now).next()?;
                Some((next - now).to_std().unwrap_or(Duration::from_secs(1)))
            }
        }
    }
}

impl fmt::Display for StatsSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

/// Go-style duration text: one or more `<number><unit>` parts, e.g. `1h30m`, `1.5m`,
/// `250ms`. Numbers may be fractional; units are ns, us (or µs), ms, s, m, h.
fn parse_duration(s: &str) -> Option<Duration> {
    let mut rest = s.trim();
    if rest.is_empty() {
        return None;
    }
    let mut nanos = 0f64;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let num = &rest[..num_len];
        if num.is_empty() || num == "." {
            return None;
        }
        let n: f64 = num.parse().ok()?;
        rest = &rest[num_len..];
        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "ns" => 1.0,
            "us" | "\u{b5}s" | "\u{3bc}s" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return None,
        };
        rest = &rest[unit_len..];
        nanos += n * scale;
    }
    if !nanos.is_finite() || nanos >= u64::MAX as f64 {
        return None;
    }
    Some(Duration::from_nanos(nanos.round() as u64))
}

/// Spawns the scheduling loop. Runs one cycle immediately, then one per trigger until
/// `shutdown_rx` fires. Cycles still in flight at shutdown are left to finish on their own.
pub fn spawn(
    collector: Collector,
    schedule: StatsSchedule,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(schedule = %schedule, "scheduler started");
        start_cycle(&collector);
        loop {
            let Some(delay) = schedule.next_delay(Local::now()) else {
                warn!(schedule = %schedule, "stats schedule has no upcoming run; scheduler stopping");
                break;
            };
            tokio::select! {
                _ = tokio::time::sleep(delay) => start_cycle(&collector),
                _ = &mut shutdown_rx => {
                    debug!("Scheduler shutting down");
                    break;
                }
            }
        }
    })
}

fn start_cycle(collector: &Collector) {
    let collector = collector.clone();
    tokio::spawn(async move {
        collector.run_cycle().await;
    });
}
