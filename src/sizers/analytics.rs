use tracing::debug;

use crate::server::{LoadTier, NetworkZone, Origin, Role, ServerSpec};
use crate::sizers::{ceil_gb, finalize_cpu, scale, ComponentSizer, Sizing, SizingContext};
use crate::tuning::{AnalyticsTuning, Resources};

/// OLAP and BI sizing, keyed on the CRM's concurrent users.
///
/// Below the consolidation threshold a single OLAP+BI host is enough. At or
/// above it the OLAP engine and the BI layer get their own servers, and the
/// pair is added even when neither was selected explicitly.
pub struct AnalyticsSizer;

impl ComponentSizer for AnalyticsSizer {
    fn name(&self) -> &'static str {
        "analytics"
    }

    fn applies(&self, ctx: &SizingContext) -> bool {
        let components = &ctx.request.components;
        components.analytics
            || components.visualization
            || (components.crm
                && ctx.crm.active_users >= ctx.table.analytics.consolidation_threshold)
    }

    fn size(&self, ctx: &SizingContext) -> Sizing {
        let tuning = &ctx.table.analytics;
        let storage_gb = analytics_storage(tuning, ctx.request.data_volume_gb);
        let env = ctx.env_label();

        if ctx.crm.active_users < tuning.consolidation_threshold {
            debug!(storage_gb, "sizing consolidated analytics");
            let resources = Resources {
                storage_gb,
                ..tuning.consolidated
            };
            let server = ServerSpec::new(
                "analytics",
                format!("{} Analytics Server (OLAP + BI)", env),
                Role::Analytics,
                Origin::Analytics,
                resources,
            )
            .with_specification("OLAP Database + BI Visualization")
            .with_tier(LoadTier::Medium)
            .in_zone(NetworkZone::Internal);
            return Sizing::servers(vec![server]);
        }

        let (base, tier) = if ctx.crm.active_users >= tuning.olap_user_threshold {
            (tuning.olap_large, LoadTier::High)
        } else {
            (tuning.olap_standard, LoadTier::Medium)
        };
        let olap_resources = Resources {
            cpu: finalize_cpu(
                scale(base.cpu, ctx.multiplier).max(base.cpu),
                0,
                tuning.round_cpu_pow2,
            ),
            ram_gb: scale(base.ram_gb, ctx.multiplier).max(base.ram_gb),
            storage_gb,
        };
        debug!(?tier, ?olap_resources, "sizing split analytics");

        let olap = ServerSpec::new(
            "olap",
            format!("{} OLAP Analytics Server", env),
            Role::Analytics,
            Origin::Analytics,
            olap_resources,
        )
        .with_specification("Columnar OLAP Database")
        .with_tier(tier)
        .in_zone(NetworkZone::Internal);
        let bi = ServerSpec::new(
            "bi",
            format!("{} BI Visualization Server", env),
            Role::Analytics,
            Origin::Analytics,
            tuning.visualization,
        )
        .with_specification("Reporting Engine")
        .with_tier(LoadTier::Low)
        .in_zone(NetworkZone::Internal);

        Sizing::servers(vec![olap, bi])
    }
}

fn analytics_storage(tuning: &AnalyticsTuning, data_volume_gb: f64) -> u32 {
    ceil_gb(data_volume_gb * tuning.storage_multiplier).max(tuning.base_storage_gb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComponentSelection, Environment, SeatLoad, SizingRequest};
    use crate::sizers::test_support::context;
    use crate::tuning::ConfigTable;

    fn request(named_users: u32, data_volume_gb: f64) -> SizingRequest {
        SizingRequest {
            environment: Environment::Prod,
            crm: SeatLoad {
                named_users,
                concurrency_rate: 10.0,
                triggers_per_minute: 1.0,
            },
            data_volume_gb,
            ..SizingRequest::default()
        }
    }

    #[test]
    fn small_crm_consolidates() {
        let table = ConfigTable::default();
        let request = request(500, 200.0);
        let sizing = AnalyticsSizer.size(&context(&request, &table));

        assert_eq!(sizing.servers.len(), 1);
        let server = &sizing.servers[0];
        assert_eq!(server.role, Role::Analytics);
        assert_eq!(server.resources, Resources::new(4, 16, 300));
    }

    #[test]
    fn storage_never_below_base() {
        let table = ConfigTable::default();
        let request = request(500, 10.0);
        let sizing = AnalyticsSizer.size(&context(&request, &table));

        assert_eq!(sizing.servers[0].resources.storage_gb, 80);
    }

    #[test]
    fn busy_crm_splits_olap_and_bi() {
        let table = ConfigTable::default();
        let request = request(2000, 50.0);
        let sizing = AnalyticsSizer.size(&context(&request, &table));

        assert_eq!(sizing.servers.len(), 2);
        let olap = &sizing.servers[0];
        let bi = &sizing.servers[1];
        assert_eq!(olap.load_tier, LoadTier::Medium);
        assert_eq!(olap.resources, Resources::new(12, 36, 80));
        assert_eq!(bi.resources, Resources::new(4, 8, 80));
    }

    #[test]
    fn very_busy_crm_uses_large_olap() {
        let table = ConfigTable::default();
        let request = request(10_000, 50.0);
        let sizing = AnalyticsSizer.size(&context(&request, &table));

        assert_eq!(sizing.servers[0].load_tier, LoadTier::High);
        assert_eq!(sizing.servers[0].resources.cpu, 24);
        assert_eq!(sizing.servers[0].resources.ram_gb, 96);
    }

    #[test]
    fn auto_enables_for_busy_crm() {
        let table = ConfigTable::default();
        let mut request = request(2000, 50.0);
        request.components = ComponentSelection {
            crm: true,
            ..ComponentSelection::none()
        };
        assert!(AnalyticsSizer.applies(&context(&request, &table)));

        let mut quiet = self::request(500, 50.0);
        quiet.components = request.components.clone();
        assert!(!AnalyticsSizer.applies(&context(&quiet, &table)));
    }
}
