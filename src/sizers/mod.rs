mod analytics;
mod assistant;
mod crm;
mod marketing;
mod messaging;
mod proxy;

use crate::metrics::{BotMetrics, SeatMetrics};
use crate::models::{BotMode, DeploymentModel, SizingRequest};
use crate::report::CloudCostEstimate;
use crate::server::{LoadTier, ServerSpec};
use crate::tuning::{ConfigTable, Floor, Resources, SeatThreshold, SeatTuning};

pub use analytics::AnalyticsSizer;
pub use assistant::AssistantSizer;
pub use crm::CrmSizer;
pub use marketing::MarketingSizer;
pub use messaging::MessagingSizer;
pub use proxy::ForwardProxySizer;

/// Sizes one optional component from the derived metrics.
pub trait ComponentSizer {
    fn name(&self) -> &'static str;
    /// Whether the component contributes anything for this request.
    fn applies(&self, ctx: &SizingContext) -> bool;
    fn size(&self, ctx: &SizingContext) -> Sizing;
}

pub struct SizingContext<'a> {
    pub request: &'a SizingRequest,
    pub table: &'a ConfigTable,
    pub crm: SeatMetrics,
    pub marketing: SeatMetrics,
    pub bot: BotMetrics,
    pub multiplier: f64,
}

impl SizingContext<'_> {
    pub fn env_label(&self) -> &'static str {
        self.request.environment.label()
    }
}

/// Servers and side outputs produced by one sizer.
#[derive(Clone, Debug, Default)]
pub struct Sizing {
    pub servers: Vec<ServerSpec>,
    pub cloud_cost: Option<CloudCostEstimate>,
}

impl Sizing {
    pub fn servers(servers: Vec<ServerSpec>) -> Self {
        Self {
            servers,
            cloud_cost: None,
        }
    }
}

pub fn build_sizers() -> Vec<Box<dyn ComponentSizer>> {
    vec![
        Box::new(CrmSizer),
        Box::new(MarketingSizer),
        Box::new(AnalyticsSizer),
        Box::new(AssistantSizer),
        Box::new(MessagingSizer),
        Box::new(ForwardProxySizer),
    ]
}

/// Hosting actually used for the conversational-AI layer.
///
/// | deployment    | requested mode | effective   |
/// |---------------|----------------|-------------|
/// | on-premise    | self-hosted    | self-hosted |
/// | on-premise    | managed-api    | managed-api |
/// | on-cloud      | any            | managed-api |
/// | fully-managed | any            | managed-api |
pub fn effective_bot_mode(deployment: DeploymentModel, requested: BotMode) -> BotMode {
    match (deployment, requested) {
        (DeploymentModel::OnPremise, mode) => mode,
        (DeploymentModel::OnCloud, _) | (DeploymentModel::FullyManaged, _) => BotMode::ManagedApi,
    }
}

/// Two-boundary classification. A boundary is crossed when either metric
/// is strictly above its limit.
pub fn classify(metrics: [f64; 2], low_to_medium: [f64; 2], medium_to_high: [f64; 2]) -> LoadTier {
    let exceeds = |limits: [f64; 2]| metrics[0] > limits[0] || metrics[1] > limits[1];
    if exceeds(medium_to_high) {
        LoadTier::High
    } else if exceeds(low_to_medium) {
        LoadTier::Medium
    } else {
        LoadTier::Low
    }
}

pub fn classify_seats(metrics: &SeatMetrics, tuning: &SeatTuning) -> LoadTier {
    let limits =
        |threshold: &SeatThreshold| [threshold.triggers_per_sec, threshold.concurrent_users];
    classify(
        [
            metrics.exact_triggers_per_second,
            metrics.active_users as f64,
        ],
        limits(&tuning.low_to_medium),
        limits(&tuning.medium_to_high),
    )
}

/// `ceil(value)` tolerant of float noise such as `10 * 1.1 = 11.000000000000002`.
pub fn ceil_gb(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    ((value * 1e6).round() / 1e6).ceil() as u32
}

pub fn scale(value: u32, multiplier: f64) -> u32 {
    ceil_gb(value as f64 * multiplier)
}

/// Applies the CPU floor and, when the policy asks for it, rounds up to a
/// power of two with a minimum of four cores.
pub fn finalize_cpu(cores: u32, floor: u32, round_pow2: bool) -> u32 {
    let cores = cores.max(floor);
    if round_pow2 {
        cores.max(4).next_power_of_two()
    } else {
        cores
    }
}

/// Multiplier on cpu and ram, then floors. Storage passes through unchanged.
pub fn scale_compute(
    base: Resources,
    multiplier: f64,
    floor: Floor,
    round_pow2: bool,
) -> Resources {
    Resources {
        cpu: finalize_cpu(scale(base.cpu, multiplier), floor.cpu, round_pow2),
        ram_gb: scale(base.ram_gb, multiplier).max(floor.ram_gb),
        storage_gb: base.storage_gb,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::metrics::{derive_bot_metrics, derive_seat_metrics};

    pub fn context<'a>(request: &'a SizingRequest, table: &'a ConfigTable) -> SizingContext<'a> {
        SizingContext {
            request,
            table,
            crm: derive_seat_metrics(&request.crm),
            marketing: derive_seat_metrics(&request.marketing),
            bot: derive_bot_metrics(&request.bot),
            multiplier: table.multiplier(request.environment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_uses_either_metric() {
        let low = [10.0, 300.0];
        let high = [100.0, 3000.0];
        assert_eq!(classify([2.5, 50.0], low, high), LoadTier::Low);
        assert_eq!(classify([10.5, 50.0], low, high), LoadTier::Medium);
        assert_eq!(classify([2.5, 301.0], low, high), LoadTier::Medium);
        assert_eq!(classify([2.5, 3001.0], low, high), LoadTier::High);
        assert_eq!(classify([150.0, 0.0], low, high), LoadTier::High);
    }

    #[test]
    fn boundaries_are_exclusive() {
        assert_eq!(classify([10.0, 300.0], [10.0, 300.0], [100.0, 3000.0]), LoadTier::Low);
        assert_eq!(classify([100.0, 0.0], [10.0, 300.0], [100.0, 3000.0]), LoadTier::Medium);
    }

    #[test]
    fn finalize_cpu_rounds_to_power_of_two() {
        assert_eq!(finalize_cpu(3, 4, true), 4);
        assert_eq!(finalize_cpu(6, 4, true), 8);
        assert_eq!(finalize_cpu(12, 4, true), 16);
        assert_eq!(finalize_cpu(2, 0, true), 4);
        assert_eq!(finalize_cpu(6, 4, false), 6);
        assert_eq!(finalize_cpu(2, 4, false), 4);
    }

    #[test]
    fn scale_ignores_float_noise() {
        assert_eq!(scale(10, 1.1), 11);
        assert_eq!(scale(16, 0.8), 13);
        assert_eq!(scale(8, 1.5), 12);
        assert_eq!(scale(0, 1.5), 0);
    }

    #[test]
    fn scale_compute_applies_floors_after_multiplier() {
        let scaled = scale_compute(
            Resources::new(2, 8, 200),
            0.8,
            Floor { cpu: 4, ram_gb: 16 },
            false,
        );
        assert_eq!(scaled, Resources::new(4, 16, 200));
    }

    #[test]
    fn bot_mode_decision_table() {
        use BotMode::*;
        use DeploymentModel::*;
        assert_eq!(effective_bot_mode(OnPremise, SelfHosted), SelfHosted);
        assert_eq!(effective_bot_mode(OnPremise, ManagedApi), ManagedApi);
        assert_eq!(effective_bot_mode(OnCloud, SelfHosted), ManagedApi);
        assert_eq!(effective_bot_mode(FullyManaged, SelfHosted), ManagedApi);
    }
}
