use crate::server::{LoadTier, NetworkZone, Origin, Role, ServerSpec};
use crate::sizers::{finalize_cpu, ComponentSizer, Sizing, SizingContext};
use crate::tuning::Resources;

pub struct MessagingSizer;

impl ComponentSizer for MessagingSizer {
    fn name(&self) -> &'static str {
        "messaging"
    }

    fn applies(&self, ctx: &SizingContext) -> bool {
        ctx.request.components.messaging
    }

    fn size(&self, ctx: &SizingContext) -> Sizing {
        let tuning = &ctx.table.messaging;
        let (base, tier) = if ctx.crm.active_users > tuning.user_threshold {
            (tuning.large, LoadTier::High)
        } else {
            (tuning.standard, LoadTier::Medium)
        };
        let resources = Resources {
            cpu: finalize_cpu(base.cpu, 0, tuning.round_cpu_pow2),
            ..base
        };

        Sizing::servers(vec![ServerSpec::new(
            "messaging",
            format!("{} Messaging Server", ctx.env_label()),
            Role::AppServer,
            Origin::Messaging,
            resources,
        )
        .with_specification("Team Messaging Platform")
        .with_tier(tier)
        .in_zone(NetworkZone::Internal)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SeatLoad, SizingRequest};
    use crate::sizers::test_support::context;
    use crate::tuning::ConfigTable;

    fn request(named_users: u32) -> SizingRequest {
        SizingRequest {
            crm: SeatLoad {
                named_users,
                concurrency_rate: 10.0,
                triggers_per_minute: 1.0,
            },
            ..SizingRequest::default()
        }
    }

    #[test]
    fn switches_to_large_above_threshold() {
        let table = ConfigTable::default();

        let at_threshold = request(500);
        let sizing = MessagingSizer.size(&context(&at_threshold, &table));
        assert_eq!(sizing.servers[0].resources, Resources::new(4, 16, 100));
        assert_eq!(sizing.servers[0].load_tier, LoadTier::Medium);

        let above = request(510);
        let sizing = MessagingSizer.size(&context(&above, &table));
        assert_eq!(sizing.servers[0].resources, Resources::new(8, 24, 200));
        assert_eq!(sizing.servers[0].load_tier, LoadTier::High);
    }
}
