use tracing::debug;

use crate::metrics::round_to;
use crate::models::{BotMode, BotPerformance};
use crate::report::CloudCostEstimate;
use crate::server::{Accelerator, LoadTier, NetworkZone, Origin, Role, ServerSpec};
use crate::sizers::{
    classify, effective_bot_mode, scale_compute, ComponentSizer, Sizing, SizingContext,
};
use crate::tuning::{AssistantTuning, Floor, TokenThreshold};

/// Conversational-AI layer: self-hosted control and inference servers, or a
/// thin gateway in front of a managed LLM API with a monthly cost estimate.
pub struct AssistantSizer;

impl ComponentSizer for AssistantSizer {
    fn name(&self) -> &'static str {
        "assistant"
    }

    fn applies(&self, ctx: &SizingContext) -> bool {
        ctx.request.components.assistant
    }

    fn size(&self, ctx: &SizingContext) -> Sizing {
        let mode = effective_bot_mode(ctx.request.deployment, ctx.request.bot_mode);
        debug!(?mode, "sizing assistant");
        let mut sizing = match mode {
            BotMode::ManagedApi => managed(ctx),
            BotMode::SelfHosted => self_hosted(ctx),
        };

        // No CRM host to carry the chat UI.
        if !ctx.request.components.crm {
            sizing.servers.push(
                ServerSpec::new(
                    "assistant-frontend",
                    format!("{} AI Frontend Server", ctx.env_label()),
                    Role::Auxiliary,
                    Origin::Assistant,
                    ctx.table.assistant.frontend,
                )
                .with_specification("Chat Frontend Hosting")
                .with_tier(LoadTier::Low)
                .in_zone(NetworkZone::Dmz),
            );
        }

        sizing
    }
}

fn managed(ctx: &SizingContext) -> Sizing {
    let tuning = &ctx.table.assistant;
    let gateway = ServerSpec::new(
        "assistant-gateway",
        format!("{} AI Gateway Server", ctx.env_label()),
        Role::Auxiliary,
        Origin::Assistant,
        tuning.gateway,
    )
    .with_specification("Managed LLM API Proxy")
    .with_tier(LoadTier::Low)
    .in_zone(NetworkZone::Internal);

    Sizing {
        servers: vec![gateway],
        cloud_cost: Some(cloud_cost(tuning, ctx.bot.tokens_per_minute)),
    }
}

fn self_hosted(ctx: &SizingContext) -> Sizing {
    let tuning = &ctx.table.assistant;
    let limits = |threshold: &TokenThreshold| {
        [threshold.tokens_per_minute, threshold.requests_per_minute]
    };
    let tier = classify(
        [ctx.bot.tokens_per_minute, ctx.bot.requests_per_minute],
        limits(&tuning.low_to_medium),
        limits(&tuning.medium_to_high),
    );
    let floor = Floor {
        cpu: 0,
        ram_gb: tuning.ram_floor_gb,
    };
    let control_resources =
        scale_compute(tuning.specs.for_tier(tier), ctx.multiplier, floor, false);
    let env = ctx.env_label();

    let mut servers = vec![ServerSpec::new(
        "assistant-control",
        format!("{} AI Control Server", env),
        Role::AppServer,
        Origin::Assistant,
        control_resources,
    )
    .with_specification("Bot Orchestration API")
    .with_tier(tier)
    .in_zone(NetworkZone::Internal)];

    if ctx.bot.requests_per_minute > tuning.worker_rpm_threshold {
        let base = if ctx.bot.tokens_per_minute > tuning.worker_band_tpm {
            tuning.worker_large
        } else {
            tuning.worker_standard
        };
        let worker_resources = scale_compute(
            base,
            ctx.multiplier,
            Floor::default(),
            tuning.worker_round_cpu_pow2,
        );
        let accelerator = match ctx.request.bot.performance {
            BotPerformance::Average => Accelerator::from(&tuning.accelerator_average),
            BotPerformance::High => Accelerator::from(&tuning.accelerator_high),
        };
        debug!(?worker_resources, %accelerator, "adding inference worker");

        servers.push(
            ServerSpec::new(
                "assistant-worker",
                format!("{} AI Inference Worker (GPU)", env),
                Role::Accelerator,
                Origin::Assistant,
                worker_resources,
            )
            .with_specification("Self-hosted Model Inference")
            .with_tier(LoadTier::Enterprise)
            .in_zone(NetworkZone::Private)
            .with_accelerator(accelerator)
            .with_notes(format!(
                "Dedicated inference node above {} requests/min",
                tuning.worker_rpm_threshold
            )),
        );
    }

    Sizing::servers(servers)
}

pub(crate) fn cloud_cost(tuning: &AssistantTuning, tokens_per_minute: f64) -> CloudCostEstimate {
    let monthly_tokens = tokens_per_minute * tuning.minutes_per_month;
    let monthly_cost_usd = round_to(
        monthly_tokens / 1_000_000.0 * tuning.cost_per_million_tokens,
        2,
    );
    CloudCostEstimate {
        tokens_per_minute,
        monthly_tokens,
        monthly_cost_usd,
        provider: tuning.provider.clone(),
        notes: format!(
            "Based on ${:.2} per 1M tokens over {} minutes/month",
            tuning.cost_per_million_tokens, tuning.minutes_per_month
        ),
    }
}
