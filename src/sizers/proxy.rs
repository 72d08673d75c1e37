use crate::server::{LoadTier, NetworkZone, Origin, Role, ServerSpec};
use crate::sizers::{ComponentSizer, Sizing, SizingContext};

/// Shared outbound proxy for regulated industries when a component talks to
/// the outside world.
pub struct ForwardProxySizer;

impl ComponentSizer for ForwardProxySizer {
    fn name(&self) -> &'static str {
        "forward-proxy"
    }

    fn applies(&self, ctx: &SizingContext) -> bool {
        let components = &ctx.request.components;
        ctx.request.industry.is_restricted() && (components.marketing || components.assistant)
    }

    fn size(&self, ctx: &SizingContext) -> Sizing {
        Sizing::servers(vec![ServerSpec::new(
            "forward-proxy",
            format!("{} Forward Proxy Server", ctx.env_label()),
            Role::Auxiliary,
            Origin::Shared,
            ctx.table.forward_proxy,
        )
        .with_specification("Outbound Forward Proxy")
        .with_tier(LoadTier::Low)
        .in_zone(NetworkZone::Dmz)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComponentSelection, Industry, SizingRequest};
    use crate::sizers::test_support::context;
    use crate::tuning::ConfigTable;

    #[test]
    fn applies_only_to_restricted_industries_with_outbound_components() {
        let table = ConfigTable::default();
        let mut request = SizingRequest {
            industry: Industry::Financial,
            components: ComponentSelection {
                crm: true,
                ..ComponentSelection::none()
            },
            ..SizingRequest::default()
        };
        assert!(!ForwardProxySizer.applies(&context(&request, &table)));

        request.components.marketing = true;
        assert!(ForwardProxySizer.applies(&context(&request, &table)));

        request.industry = Industry::General;
        assert!(!ForwardProxySizer.applies(&context(&request, &table)));
    }

    #[test]
    fn proxy_sits_in_dmz() {
        let table = ConfigTable::default();
        let request = SizingRequest::default();
        let sizing = ForwardProxySizer.size(&context(&request, &table));
        assert_eq!(sizing.servers[0].zone, NetworkZone::Dmz);
        assert_eq!(sizing.servers[0].origin, Origin::Shared);
    }
}
