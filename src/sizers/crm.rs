use tracing::debug;

use crate::server::{LoadTier, NetworkZone, Origin, Role, ServerSpec, OS_WINDOWS};
use crate::sizers::{
    ceil_gb, classify_seats, scale, scale_compute, ComponentSizer, Sizing, SizingContext,
};

pub struct CrmSizer;

impl ComponentSizer for CrmSizer {
    fn name(&self) -> &'static str {
        "crm"
    }

    fn applies(&self, ctx: &SizingContext) -> bool {
        ctx.request.components.crm
    }

    fn size(&self, ctx: &SizingContext) -> Sizing {
        let tuning = &ctx.table.crm;
        let tier = classify_seats(&ctx.crm, tuning);
        let base = tuning.specs.for_tier(tier);
        let mut resources =
            scale_compute(base, ctx.multiplier, tuning.floor, tuning.round_cpu_pow2);
        if tuning.scale_storage {
            resources.storage_gb = scale(base.storage_gb, ctx.multiplier);
        }
        let data_floor = ceil_gb(ctx.request.data_volume_gb * tuning.storage_per_data_gb);
        resources.storage_gb = resources.storage_gb.max(data_floor);
        debug!(?tier, ?resources, "sized crm");

        let app_db = ServerSpec::new(
            "crm",
            format!("{} APP+DB Server (CRM)", ctx.env_label()),
            Role::CombinedAppDb,
            Origin::Crm,
            resources,
        )
        .with_tier(tier)
        .in_zone(NetworkZone::Internal);

        let integration = ServerSpec::new(
            "integration",
            format!("{} Integration Server", ctx.env_label()),
            Role::Auxiliary,
            Origin::Crm,
            ctx.table.integration_server,
        )
        .with_specification("Integration / ETL Server")
        .with_os(OS_WINDOWS)
        .with_tier(LoadTier::Medium)
        .in_zone(NetworkZone::Internal);

        Sizing::servers(vec![app_db, integration])
    }
}
