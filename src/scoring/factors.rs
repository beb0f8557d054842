use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Lag at which the availability term bottoms out.
pub const AVAILABILITY_HORIZON_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    Excellent,
    Good,
    Average,
    Weak,
}

impl Tier {
    /// Best to worst, the order used by histograms and reports.
    pub const ALL: [Tier; 4] = [Tier::Excellent, Tier::Good, Tier::Average, Tier::Weak];

    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Tier::Excellent
        } else if score >= 65.0 {
            Tier::Good
        } else if score >= 45.0 {
            Tier::Average
        } else {
            Tier::Weak
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Excellent => "EXCELLENT",
            Tier::Good => "GOOD",
            Tier::Average => "AVERAGE",
            Tier::Weak => "WEAK",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coerce an untrusted sub-score to an integer.
///
/// Integers pass through, floats truncate toward zero, strings holding a
/// number are parsed the same way. Anything else counts as 0.
pub fn coerce_to_int(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i
            } else if let Some(u) = n.as_u64() {
                i64::try_from(u).unwrap_or(i64::MAX)
            } else {
                n.as_f64().map(truncate).unwrap_or(0)
            }
        }
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(truncate))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn truncate(f: f64) -> i64 {
    if f.is_finite() {
        // `as` saturates at the i64 bounds.
        f.trunc() as i64
    } else {
        0
    }
}

pub fn clamp_sub_score(value: i64, max: i64) -> i64 {
    value.clamp(0, max.max(0))
}

/// 100 when available now, falling linearly to 0 at the horizon.
pub fn availability_term(lag_days: u32) -> f64 {
    let lag = lag_days.min(AVAILABILITY_HORIZON_DAYS) as f64;
    100.0 * (1.0 - lag / AVAILABILITY_HORIZON_DAYS as f64)
}

/// Scale a 0-100 metric into `[0, max]`.
pub fn scale_to_max(percent: f64, max: i64) -> f64 {
    let max = max.max(0) as f64;
    (percent.clamp(0.0, 100.0) / 100.0 * max).clamp(0.0, max)
}
