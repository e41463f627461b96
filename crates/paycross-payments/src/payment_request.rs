//! `PaymentRequestService::expire_overdue` (SPEC_FULL.md §11, supplemented
//! feature): a pure function over a caller-supplied batch of requests. No
//! background scheduler lives in this crate — driving this on a timer is an
//! ambient concern the orchestrator's binary, not the core, owns, and is out
//! of scope here (SPEC_FULL.md §1 Non-goals).

use paycross_repo::entities::PaymentRequest;
use paycross_types::{EntityId, UnixTimestamp};

pub struct PaymentRequestService;

impl PaymentRequestService {
    /// Returns the ids of every request in `requests` that [`PaymentRequest::is_overdue`]
    /// considers overdue as of `now`. Callers are responsible for persisting
    /// the resulting `Expired` transition; this function never talks to a
    /// repository.
    pub fn expire_overdue(requests: &[PaymentRequest], now: UnixTimestamp) -> Vec<EntityId> {
        requests
            .iter()
            .filter(|request| request.is_overdue(now))
            .map(|request| request.id)
            .collect()
    }
}
