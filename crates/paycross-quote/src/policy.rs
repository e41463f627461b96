//! `buildBridgeOrder` (SPEC_FULL.md §4.4, tested by §8 property 4).

use paycross_repo::entities::RoutePolicy;
use paycross_types::{BridgeType, FallbackMode};

/// Builds the ordered sequence of bridge types to try, from an optional
/// [`RoutePolicy`]:
///
/// - No policy → `[Hyperbridge]`.
/// - `Strict` → `[defaultBridgeType]` only; `fallbackOrder` is ignored.
/// - `AutoFallback` → deduplicated walk of `[default, fallbackOrder...]`,
///   dropping out-of-range values and repeats.
/// - An out-of-range `defaultBridgeType` is treated as Hyperbridge.
///
/// Never returns an empty sequence (SPEC_FULL.md §8 property 4).
pub fn build_bridge_order(policy: Option<&RoutePolicy>) -> Vec<BridgeType> {
    let Some(policy) = policy else {
        return vec![BridgeType::Hyperbridge];
    };

    let default_bridge = BridgeType::from_u8(policy.default_bridge_type);

    match policy.fallback_mode {
        FallbackMode::Strict => vec![default_bridge.unwrap_or(BridgeType::Hyperbridge)],
        FallbackMode::AutoFallback => {
            let mut seen = Vec::with_capacity(3);
            let mut push = |candidate: u8| {
                if let Some(bridge) = BridgeType::from_u8(candidate) {
                    if !seen.contains(&bridge) {
                        seen.push(bridge);
                    }
                }
            };
            push(policy.default_bridge_type);
            for &candidate in &policy.fallback_order {
                push(candidate);
            }
            if seen.is_empty() {
                seen.push(BridgeType::Hyperbridge);
            }
            seen
        }
    }
}
