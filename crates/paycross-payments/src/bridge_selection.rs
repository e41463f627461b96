//! Centralized deterministic bridge selection (SPEC_FULL.md §4.6 step 3,
//! §9's third Open Question, §11).
//!
//! The source system picks a bridge type for routes with no [`RoutePolicy`]
//! row using a scheme ("CCIP for EVM<->EVM, Hyperlane for Solana<->EVM,
//! Hyperbridge otherwise") that names a bridge ("Hyperlane") absent from the
//! Probe's `{0: Hyperbridge, 1: CCIP, 2: LayerZero}` enumeration. We resolve
//! that conflict (see DESIGN.md) by routing every EVM<->SVM pair through
//! Hyperbridge, the one general-purpose adapter of the three that isn't
//! EVM-pair-specific (CCIP) or EVM-only in this system's adapter set
//! (LayerZero's configured peer is itself chain-specific, but is reserved
//! here for policy-driven routes, not the deterministic default).
//!
//! [`RoutePolicy`]: paycross_repo::entities::RoutePolicy

use paycross_types::{BridgeType, ChainType};

/// The bridge type a route would use in the absence of any [`RoutePolicy`]
/// row, purely as a function of the two chains' execution environments.
///
/// [`RoutePolicy`]: paycross_repo::entities::RoutePolicy
pub fn deterministic_bridge_type(source: ChainType, dest: ChainType) -> BridgeType {
    match (source, dest) {
        (ChainType::Evm, ChainType::Evm) => BridgeType::Ccip,
        _ => BridgeType::Hyperbridge,
    }
}
