//! The manager-hierarchy walk used for delegated authorization.

use crate::application::gateway::StateGateway;
use crate::domain::errors::EngineError;
use rbac_addressing::user_attributes_address;
use rbac_types::{from_bytes, UserContainer};
use tracing::debug;

/// True when `requester_id` appears somewhere on the manager chain above
/// `subject_id`, within `max_hops` links.
///
/// The bound is absolute: a chain deeper than `max_hops`, or a cycle in the
/// manager links, exhausts the budget and the check fails closed. The walk
/// reads user attribute entries one link at a time through the gateway; the
/// client declares those addresses in the envelope's input set.
pub async fn is_hierarchical_manager_of(
    gateway: &StateGateway,
    max_hops: usize,
    requester_id: &str,
    subject_id: &str,
) -> Result<bool, EngineError> {
    let mut current = subject_id.to_owned();

    for hop in 0..max_hops {
        let address = user_attributes_address(&current);
        let Some(bytes) = gateway.fetch_optional(&address).await? else {
            return Ok(false);
        };
        let container: UserContainer = from_bytes(&bytes)?;
        let Some(manager_id) = container.get(&current).and_then(|u| u.manager_id.clone()) else {
            return Ok(false);
        };
        if manager_id == requester_id {
            debug!(requester = requester_id, subject = subject_id, hop, "manager chain matched");
            return Ok(true);
        }
        current = manager_id;
    }

    Ok(false)
}
