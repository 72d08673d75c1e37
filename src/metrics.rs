use serde::Serialize;

use crate::models::{BotLoad, SeatLoad};

/// Load derived from a seat-based component (CRM, Marketing).
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct SeatMetrics {
    pub active_users: u32,
    /// Rounded to two decimals for reporting.
    pub triggers_per_second: f64,
    #[serde(skip)]
    pub exact_triggers_per_second: f64,
}

/// Load derived from the conversational-AI inputs.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct BotMetrics {
    pub active_users: u32,
    pub requests_per_minute: f64,
    pub tokens_per_minute: f64,
}

pub fn active_users(named_users: u32, concurrency_rate: f64) -> u32 {
    let active = (named_users as f64 * concurrency_rate) / 100.0;
    if active <= 0.0 {
        return 0;
    }
    active.ceil() as u32
}

pub fn derive_seat_metrics(load: &SeatLoad) -> SeatMetrics {
    let active_users = active_users(load.named_users, load.concurrency_rate);
    let triggers_per_second = (active_users as f64 * load.triggers_per_minute) / 60.0;
    SeatMetrics {
        active_users,
        triggers_per_second: round_to(triggers_per_second, 2),
        exact_triggers_per_second: triggers_per_second,
    }
}

pub fn derive_bot_metrics(load: &BotLoad) -> BotMetrics {
    let requests_per_minute = load.active_users as f64 * load.requests_per_user_per_minute;
    BotMetrics {
        active_users: load.active_users,
        requests_per_minute,
        tokens_per_minute: requests_per_minute * load.avg_tokens_per_request,
    }
}

pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    if decimals == 0 {
        return value.round();
    }
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BotPerformance;

    #[test]
    fn seat_metrics_follow_concurrency() {
        let metrics = derive_seat_metrics(&SeatLoad {
            named_users: 500,
            concurrency_rate: 10.0,
            triggers_per_minute: 3.0,
        });
        assert_eq!(metrics.active_users, 50);
        assert_eq!(metrics.triggers_per_second, 2.5);
    }

    #[test]
    fn active_users_round_up() {
        assert_eq!(active_users(101, 10.0), 11);
        assert_eq!(active_users(1, 1.0), 1);
        assert_eq!(active_users(0, 50.0), 0);
        assert_eq!(active_users(250, 0.0), 0);
    }

    #[test]
    fn triggers_are_reported_to_two_decimals() {
        let metrics = derive_seat_metrics(&SeatLoad {
            named_users: 70,
            concurrency_rate: 10.0,
            triggers_per_minute: 1.0,
        });
        assert_eq!(metrics.active_users, 7);
        assert_eq!(metrics.triggers_per_second, 0.12);
        assert!((metrics.exact_triggers_per_second - 7.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn bot_metrics_multiply_through() {
        let metrics = derive_bot_metrics(&BotLoad {
            active_users: 5,
            requests_per_user_per_minute: 2.0,
            avg_tokens_per_request: 500.0,
            performance: BotPerformance::Average,
        });
        assert_eq!(metrics.requests_per_minute, 10.0);
        assert_eq!(metrics.tokens_per_minute, 5000.0);
    }
}
