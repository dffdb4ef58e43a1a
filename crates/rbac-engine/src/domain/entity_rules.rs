//! Entity validators: pure checks over already-fetched ledger entries.

use crate::domain::errors::EngineError;
use crate::domain::Entries;
use rbac_addressing::Address;
use rbac_types::{from_bytes, RoleContainer, TaskContainer, User, UserContainer};
use serde::de::DeserializeOwned;

/// Decode the container at `address`, if the entry exists.
///
/// Decode failures here mean corrupt ledger state, not a bad message, so
/// they surface as serialization faults rather than validation failures.
pub fn decode_entry<T: DeserializeOwned>(
    entries: &Entries,
    address: &Address,
) -> Result<Option<T>, EngineError> {
    match entries.get(address) {
        Some(bytes) => Ok(Some(from_bytes(bytes)?)),
        None => Ok(None),
    }
}

/// Decode the container at `address`, falling back to an empty one when the
/// ledger has no entry there yet.
pub fn decode_or_default<T: DeserializeOwned + Default>(
    entries: &Entries,
    address: &Address,
) -> Result<T, EngineError> {
    Ok(decode_entry(entries, address)?.unwrap_or_default())
}

/// Confirm `id` exists as a user at its attribute address.
pub fn assert_is_user(entries: &Entries, id: &str, address: &Address) -> Result<(), EngineError> {
    let container: Option<UserContainer> = decode_entry(entries, address)?;
    match container {
        Some(c) if c.contains(id) => Ok(()),
        _ => Err(EngineError::NotAUser { id: id.to_owned() }),
    }
}

/// Confirm `id` exists as a role at its attribute address.
pub fn assert_is_role(entries: &Entries, id: &str, address: &Address) -> Result<(), EngineError> {
    let container: Option<RoleContainer> = decode_entry(entries, address)?;
    match container {
        Some(c) if c.contains(id) => Ok(()),
        _ => Err(EngineError::NotARole { id: id.to_owned() }),
    }
}

/// Confirm `id` exists as a task at its attribute address.
pub fn assert_is_task(entries: &Entries, id: &str, address: &Address) -> Result<(), EngineError> {
    let container: Option<TaskContainer> = decode_entry(entries, address)?;
    match container {
        Some(c) if c.contains(id) => Ok(()),
        _ => Err(EngineError::NotATask { id: id.to_owned() }),
    }
}

/// Fetch the attribute record of a user from pre-fetched entries.
pub fn get_user(entries: &Entries, id: &str, address: &Address) -> Result<User, EngineError> {
    let container: Option<UserContainer> = decode_entry(entries, address)?;
    container
        .and_then(|c| c.get(id).cloned())
        .ok_or_else(|| EngineError::NotAUser { id: id.to_owned() })
}
