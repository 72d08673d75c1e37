use tracing::{debug, info};

use crate::metrics::{derive_bot_metrics, derive_seat_metrics};
use crate::models::{DeploymentModel, Environment, SizingRequest};
use crate::pipeline::{self, PipelineContext};
use crate::report::{CalculationResult, ComponentMetrics};
use crate::sizers::{build_sizers, ComponentSizer, SizingContext};
use crate::tuning::ConfigTable;

pub const MANAGED_MESSAGE: &str = "Fully managed deployment: infrastructure is provisioned \
and operated by the provider, so no server sizing is required. Pricing is usage-based.";

pub struct SizingEngine {
    pub table: ConfigTable,
    pub sizers: Vec<Box<dyn ComponentSizer>>,
}

impl SizingEngine {
    pub fn new(table: ConfigTable) -> Self {
        Self {
            table,
            sizers: build_sizers(),
        }
    }

    /// Pure and deterministic: identical inputs give identical results.
    pub fn calculate(&self, request: &SizingRequest) -> CalculationResult {
        let metrics = ComponentMetrics {
            crm: derive_seat_metrics(&request.crm),
            marketing: derive_seat_metrics(&request.marketing),
            bot: derive_bot_metrics(&request.bot),
        };
        debug!(
            environment = %request.environment,
            crm_active_users = metrics.crm.active_users,
            tokens_per_minute = metrics.bot.tokens_per_minute,
            "derived metrics"
        );

        let mut result = CalculationResult {
            client_name: request.client_name.clone(),
            industry: request.industry,
            environment: request.environment,
            deployment: request.deployment,
            servers: Vec::new(),
            metrics: metrics.clone(),
            cloud_cost: None,
            managed_message: None,
            dr_message: None,
        };

        if request.deployment == DeploymentModel::FullyManaged {
            info!("fully managed deployment; skipping server sizing");
            result.managed_message = Some(MANAGED_MESSAGE.to_string());
            return result;
        }

        let ctx = SizingContext {
            request,
            table: &self.table,
            crm: metrics.crm,
            marketing: metrics.marketing,
            bot: metrics.bot,
            multiplier: self.table.multiplier(request.environment),
        };

        let mut servers = Vec::new();
        for sizer in &self.sizers {
            if !sizer.applies(&ctx) {
                continue;
            }
            let sizing = sizer.size(&ctx);
            debug!(sizer = sizer.name(), servers = sizing.servers.len(), "sizer finished");
            servers.extend(sizing.servers);
            if sizing.cloud_cost.is_some() {
                result.cloud_cost = sizing.cloud_cost;
            }
        }

        let output = pipeline::run(
            servers,
            &PipelineContext {
                environment: request.environment,
                ha_enabled: request.ha_enabled,
                dr_enabled: request.dr_enabled,
                crm_active_users: metrics.crm.active_users,
                ha_uat_user_threshold: self.table.ha_uat_user_threshold,
            },
        );
        info!(
            environment = %request.environment,
            nodes = output.servers.len(),
            "sizing complete"
        );

        result.servers = output.servers;
        result.dr_message = output.dr_message;
        result
    }
}

pub fn calculate(request: &SizingRequest, table: &ConfigTable) -> CalculationResult {
    SizingEngine::new(table.clone()).calculate(request)
}

/// Sizes the request as if it targeted `environment`.
pub fn calculate_for(
    request: &SizingRequest,
    table: &ConfigTable,
    environment: Environment,
) -> CalculationResult {
    calculate(&request.for_environment(environment), table)
}

/// Re-runs the request once per environment tier in report order.
pub fn calculate_all_environments(
    request: &SizingRequest,
    table: &ConfigTable,
) -> Vec<CalculationResult> {
    let engine = SizingEngine::new(table.clone());
    Environment::REPORT_ORDER
        .iter()
        .map(|environment| engine.calculate(&request.for_environment(*environment)))
        .collect()
}
