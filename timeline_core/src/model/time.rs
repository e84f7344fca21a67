//! 有理时间：用 (数值, 速率) 表示时间点或时长，避免常见视频帧率下的舍入误差。

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// 以 `value / rate` 秒表示的时间值。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RationalTime {
    /// 以 `rate` 为单位的计数。
    pub value: f64,
    /// 每秒的单位数。
    pub rate: f64,
}

impl RationalTime {
    #[must_use]
    pub const fn new(value: f64, rate: f64) -> Self {
        Self { value, rate }
    }

    /// 将秒数表示为指定速率下的有理时间。
    #[must_use]
    pub fn from_seconds(seconds: f64, rate: f64) -> Self {
        Self {
            value: seconds * rate,
            rate,
        }
    }

    /// 转换为秒。速率不为正时视为 0 秒。
    #[must_use]
    pub fn to_seconds(self) -> f64 {
        if self.rate > 0.0 {
            self.value / self.rate
        } else {
            0.0
        }
    }

    /// 在新的速率下表示同一时刻。
    #[must_use]
    pub fn rescaled_to(self, rate: f64) -> Self {
        if (self.rate - rate).abs() < f64::EPSILON {
            return self;
        }
        Self::from_seconds(self.to_seconds(), rate)
    }
}

impl Add for RationalTime {
    type Output = Self;

    /// 速率不同时，结果采用两者中较大的速率。
    fn add(self, rhs: Self) -> Self {
        if (self.rate - rhs.rate).abs() < f64::EPSILON {
            return Self::new(self.value + rhs.value, self.rate);
        }
        let rate = self.rate.max(rhs.rate);
        Self::new(
            self.rescaled_to(rate).value + rhs.rescaled_to(rate).value,
            rate,
        )
    }
}

/// 由起点和时长组成的时间范围。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_time: RationalTime,
    pub duration: RationalTime,
}

impl TimeRange {
    #[must_use]
    pub const fn new(start_time: RationalTime, duration: RationalTime) -> Self {
        Self {
            start_time,
            duration,
        }
    }

    /// 范围的结束时间（不含）。
    #[must_use]
    pub fn end_time_exclusive(&self) -> RationalTime {
        self.start_time + self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_seconds_round_trip() {
        let t = RationalTime::from_seconds(1.5, 24.0);
        assert!((t.value - 36.0).abs() < 1e-9);
        assert!((t.to_seconds() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_add_mixed_rates() {
        let a = RationalTime::new(12.0, 24.0);
        let b = RationalTime::new(15.0, 30.0);
        let sum = a + b;
        assert!((sum.rate - 30.0).abs() < f64::EPSILON);
        assert!((sum.to_seconds() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_rate_is_zero_seconds() {
        assert!(RationalTime::new(10.0, 0.0).to_seconds().abs() < f64::EPSILON);
    }

    #[test]
    fn test_range_end() {
        let range = TimeRange::new(RationalTime::new(10.0, 25.0), RationalTime::new(50.0, 25.0));
        assert!((range.end_time_exclusive().value - 60.0).abs() < f64::EPSILON);
    }
}
