use tracing::debug;

use crate::server::{NetworkZone, Origin, Role, ServerSpec};
use crate::sizers::{
    ceil_gb, classify_seats, scale, scale_compute, ComponentSizer, Sizing, SizingContext,
};

/// Marketing gets a dedicated application server and database server of the same spec.
pub struct MarketingSizer;

impl ComponentSizer for MarketingSizer {
    fn name(&self) -> &'static str {
        "marketing"
    }

    fn applies(&self, ctx: &SizingContext) -> bool {
        ctx.request.components.marketing
    }

    fn size(&self, ctx: &SizingContext) -> Sizing {
        let tuning = &ctx.table.marketing;
        let tier = classify_seats(&ctx.marketing, tuning);
        let base = tuning.specs.for_tier(tier);
        let mut resources =
            scale_compute(base, ctx.multiplier, tuning.floor, tuning.round_cpu_pow2);
        if tuning.scale_storage {
            resources.storage_gb = scale(base.storage_gb, ctx.multiplier);
        }
        let data_floor = ceil_gb(ctx.request.data_volume_gb * tuning.storage_per_data_gb);
        resources.storage_gb = resources.storage_gb.max(data_floor);
        debug!(?tier, ?resources, "sized marketing");

        let env = ctx.env_label();
        let app = ServerSpec::new(
            "marketing-app",
            format!("{} APP Server (Marketing)", env),
            Role::AppServer,
            Origin::Marketing,
            resources,
        )
        .with_specification("Web Server + Marketing Application")
        .with_tier(tier)
        .in_zone(NetworkZone::Internal);
        let db = ServerSpec::new(
            "marketing-db",
            format!("{} DB Server (Marketing)", env),
            Role::DbServer,
            Origin::Marketing,
            resources,
        )
        .with_specification("Marketing Database")
        .with_tier(tier)
        .in_zone(NetworkZone::Internal);

        Sizing::servers(vec![app, db])
    }
}
