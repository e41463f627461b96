//! AutoFix plan derivation (SPEC_FULL.md §4.3): the ordered sequence of admin
//! transactions that would bring one bridge type's route from misconfigured
//! to ready.

use alloy_primitives::{Address, FixedBytes};
use serde::{Deserialize, Serialize};

use paycross_types::BridgeType;

use crate::snapshot::ConfigSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoFixStepKind {
    RegisterAdapter,
    SetDefaultBridge,
    SetHyperbridgeConfig,
    SetHyperbridgeDestination,
    SetCcipConfig,
    SetLayerZeroConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoFixStatus {
    /// Already correct; nothing to do.
    Skipped,
    /// Would be issued.
    Ready,
    /// A precondition wasn't met.
    Failed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoFixStep {
    pub kind: AutoFixStepKind,
    pub bridge_type: BridgeType,
    pub status: AutoFixStatus,
}

/// Builds the ordered AutoFix plan for `bridge_type` against `snapshot`.
///
/// Every bridge type gets `RegisterAdapter` then `SetDefaultBridge`; what
/// follows depends on the bridge's own configuration shape: Hyperbridge
/// needs two independent fields set (state machine id, destination
/// contract), CCIP and LayerZero each have a single combined config step.
pub fn build_autofix_plan(snapshot: &ConfigSnapshot, bridge_type: BridgeType) -> Vec<AutoFixStep> {
    let index = bridge_type.as_u8() as usize;
    let mut steps = Vec::with_capacity(4);

    let adapter_registered = snapshot.has_adapter[index];
    let register_status = if adapter_registered {
        AutoFixStatus::Skipped
    } else if snapshot.adapter_address[index] == Address::ZERO {
        AutoFixStatus::Failed("no adapter contract address on record to register".to_string())
    } else {
        AutoFixStatus::Ready
    };
    let register_blocked = matches!(register_status, AutoFixStatus::Failed(_));
    steps.push(AutoFixStep {
        kind: AutoFixStepKind::RegisterAdapter,
        bridge_type,
        status: register_status,
    });

    let default_status = if snapshot.default_bridge_type == bridge_type {
        AutoFixStatus::Skipped
    } else if register_blocked {
        AutoFixStatus::Failed("adapter is not registered".to_string())
    } else {
        AutoFixStatus::Ready
    };
    steps.push(AutoFixStep {
        kind: AutoFixStepKind::SetDefaultBridge,
        bridge_type,
        status: default_status,
    });

    let config_status = |already_set: bool| -> AutoFixStatus {
        if already_set {
            AutoFixStatus::Skipped
        } else if register_blocked {
            AutoFixStatus::Failed("adapter is not registered".to_string())
        } else {
            AutoFixStatus::Ready
        }
    };

    match bridge_type {
        BridgeType::Hyperbridge => {
            steps.push(AutoFixStep {
                kind: AutoFixStepKind::SetHyperbridgeConfig,
                bridge_type,
                status: config_status(
                    snapshot.hyperbridge_state_machine_id != FixedBytes::<32>::ZERO,
                ),
            });
            steps.push(AutoFixStep {
                kind: AutoFixStepKind::SetHyperbridgeDestination,
                bridge_type,
                status: config_status(
                    snapshot.hyperbridge_destination_contract != Address::ZERO,
                ),
            });
        }
        BridgeType::Ccip => {
            steps.push(AutoFixStep {
                kind: AutoFixStepKind::SetCcipConfig,
                bridge_type,
                status: config_status(
                    snapshot.ccip_chain_selector != 0
                        && snapshot.ccip_destination_adapter != Address::ZERO,
                ),
            });
        }
        BridgeType::LayerZero => {
            steps.push(AutoFixStep {
                kind: AutoFixStepKind::SetLayerZeroConfig,
                bridge_type,
                status: config_status(snapshot.layer_zero_configured),
            });
        }
    }

    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{PreflightErrorCode, PreflightRow};

    fn empty_row(bridge_type: BridgeType) -> PreflightRow {
        PreflightRow {
            bridge_type,
            ready: false,
            error_code: PreflightErrorCode::AdapterNotRegistered,
            adapter_address: Address::ZERO,
            extras: String::new(),
        }
    }

    fn base_snapshot() -> ConfigSnapshot {
        ConfigSnapshot {
            default_bridge_type: BridgeType::Hyperbridge,
            has_adapter: [false, false, false],
            adapter_address: [Address::ZERO, Address::ZERO, Address::ZERO],
            hyperbridge_configured: false,
            hyperbridge_state_machine_id: FixedBytes::<32>::ZERO,
            hyperbridge_destination_contract: Address::ZERO,
            ccip_chain_selector: 0,
            ccip_destination_adapter: Address::ZERO,
            layer_zero_configured: false,
            layer_zero_dst_eid: 0,
            layer_zero_peer: FixedBytes::<32>::ZERO,
            layer_zero_options_hex: "0x".to_string(),
            policy_executable: false,
            preflight: [
                empty_row(BridgeType::Hyperbridge),
                empty_row(BridgeType::Ccip),
                empty_row(BridgeType::LayerZero),
            ],
        }
    }

    #[test]
    fn fully_unregistered_adapter_fails_every_downstream_step() {
        let snapshot = base_snapshot();
        let plan = build_autofix_plan(&snapshot, BridgeType::Hyperbridge);
        assert_eq!(plan.len(), 4);
        assert!(matches!(plan[0].status, AutoFixStatus::Failed(_)));
        assert!(matches!(plan[1].status, AutoFixStatus::Failed(_)));
        assert!(matches!(plan[2].status, AutoFixStatus::Failed(_)));
        assert!(matches!(plan[3].status, AutoFixStatus::Failed(_)));
    }

    #[test]
    fn already_correct_route_is_fully_skipped() {
        let mut snapshot = base_snapshot();
        snapshot.has_adapter[0] = true;
        snapshot.adapter_address[0] = Address::repeat_byte(0xAA);
        snapshot.default_bridge_type = BridgeType::Hyperbridge;
        snapshot.hyperbridge_state_machine_id = FixedBytes::<32>::repeat_byte(0x01);
        snapshot.hyperbridge_destination_contract = Address::repeat_byte(0xBB);

        let plan = build_autofix_plan(&snapshot, BridgeType::Hyperbridge);
        assert!(plan.iter().all(|step| step.status == AutoFixStatus::Skipped));
    }

    #[test]
    fn registered_adapter_with_missing_config_is_ready() {
        let mut snapshot = base_snapshot();
        snapshot.has_adapter[1] = true;
        snapshot.adapter_address[1] = Address::repeat_byte(0xCC);

        let plan = build_autofix_plan(&snapshot, BridgeType::Ccip);
        assert_eq!(plan[0].status, AutoFixStatus::Skipped);
        assert_eq!(plan[1].status, AutoFixStatus::Ready);
        assert_eq!(plan[2].status, AutoFixStatus::Ready);
    }

    #[test]
    fn layer_zero_plan_has_a_single_config_step() {
        let snapshot = base_snapshot();
        let plan = build_autofix_plan(&snapshot, BridgeType::LayerZero);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[2].kind, AutoFixStepKind::SetLayerZeroConfig);
    }
}
