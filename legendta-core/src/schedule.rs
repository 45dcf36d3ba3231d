//! Linear parameter schedules over elapsed time.
//!
//! Both helpers ramp from `start` toward `end` between `start_time` and
//! `end_time` (minutes) and clamp at `end` afterwards. Before `start_time`
//! the value stays at `start`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("invalid schedule: start_time and end_time are both {0}")]
    InvalidConfiguration(i64),
}

/// Grow linearly from `start` to `end`.
pub fn linear_growth(
    start: f64,
    end: f64,
    start_time: i64,
    end_time: i64,
    trade_time: i64,
) -> Result<f64, ScheduleError> {
    let rate = (end - start) / span(start_time, end_time)?;
    let elapsed = elapsed(start_time, trade_time);
    Ok(end.min(start + rate * elapsed))
}

/// Decay linearly from `start` to `end`.
pub fn linear_decay(
    start: f64,
    end: f64,
    start_time: i64,
    end_time: i64,
    trade_time: i64,
) -> Result<f64, ScheduleError> {
    let rate = (start - end) / span(start_time, end_time)?;
    let elapsed = elapsed(start_time, trade_time);
    Ok(end.max(start - rate * elapsed))
}

fn span(start_time: i64, end_time: i64) -> Result<f64, ScheduleError> {
    if start_time == end_time {
        return Err(ScheduleError::InvalidConfiguration(start_time));
    }
    // f64 differences cannot overflow at the i64 extremes.
    Ok(end_time as f64 - start_time as f64)
}

fn elapsed(start_time: i64, trade_time: i64) -> f64 {
    (trade_time as f64 - start_time as f64).max(0.0)
}
