//! Per-tag rate limiting of deliveries.
//!
//! Tags broadcast about once a second; collectors rarely need that. A
//! throttle lets at most one measurement per tag through per interval.

use crate::mac_address::MacAddress;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Tracks the last delivered measurement of every tag.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last_sent: HashMap<MacAddress, Instant>,
}

impl Throttle {
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use ruuvigate::throttle::Throttle;
    ///
    /// let throttle = Throttle::new(Duration::from_secs(3));
    /// ```
    pub fn new(interval: Duration) -> Self {
        Throttle {
            interval,
            last_sent: HashMap::new(),
        }
    }

    /// Whether a measurement from `mac` should go out now. The first
    /// measurement of a tag always passes; a passing measurement restarts
    /// that tag's interval, a blocked one does not.
    pub fn should_emit(&mut self, mac: MacAddress) -> bool {
        self.should_emit_at(mac, Instant::now())
    }

    fn should_emit_at(&mut self, mac: MacAddress, now: Instant) -> bool {
        match self.last_sent.get(&mac) {
            Some(last) if now.saturating_duration_since(*last) < self.interval => false,
            _ => {
                self.last_sent.insert(mac, now);
                true
            }
        }
    }
}

const UNITS: [(&str, u64); 4] = [("ms", 1), ("h", 3_600_000), ("m", 60_000), ("s", 1_000)];

/// Parse a duration such as `3s`, `1m`, `500ms` or `2h`. A bare number is
/// taken as seconds.
///
/// # Examples
/// ```
/// use ruuvigate::throttle::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
/// assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
/// ```
pub fn parse_duration(src: &str) -> Result<Duration, String> {
    let src = src.trim();
    if src.is_empty() {
        return Err("empty duration string".to_string());
    }

    let (number, millis_per_unit) = UNITS
        .iter()
        .find_map(|(suffix, factor)| src.strip_suffix(suffix).map(|n| (n, *factor)))
        .unwrap_or((src, 1_000));

    let value: u64 = number
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration: {src}"))?;
    value
        .checked_mul(millis_per_unit)
        .map(Duration::from_millis)
        .ok_or_else(|| format!("duration out of range: {src}"))
}
