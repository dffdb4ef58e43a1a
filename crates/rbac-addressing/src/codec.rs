//! Address derivation and classification.
//!
//! One constructor per entity/relationship kind, plus [`classify`] for the
//! inverse direction. Both sides are pure functions of their inputs.

use crate::address::{Address, AddressError, ADDRESS_LENGTH, PREFIX_LENGTH};
use sha2::{Digest, Sha512};
use std::sync::LazyLock;

/// Transaction-family name; hashing it yields the namespace prefix.
const FAMILY_NAME: &str = "rbac";

/// Hex length of the hash-derived suffix.
const SUFFIX_LENGTH: usize = ADDRESS_LENGTH - PREFIX_LENGTH - 2;

static FAMILY_PREFIX: LazyLock<String> = LazyLock::new(|| {
    let digest = Sha512::digest(FAMILY_NAME.as_bytes());
    hex::encode(&digest[..PREFIX_LENGTH / 2])
});

/// The constant namespace prefix identifying this family's ledger region.
pub fn family_prefix() -> &'static str {
    &FAMILY_PREFIX
}

/// The kind of entity or relationship stored at an address.
///
/// Each kind owns a disjoint sub-range of the bucket selector byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressKind {
    UserAttributes,
    RoleAttributes,
    RoleMembers,
    RoleOwners,
    RoleAdmins,
    RoleTasks,
    TaskAttributes,
    TaskOwners,
    TaskAdmins,
    Proposals,
}

impl AddressKind {
    /// Every kind, in selector-range order.
    pub const ALL: [AddressKind; 10] = [
        AddressKind::UserAttributes,
        AddressKind::RoleAttributes,
        AddressKind::RoleMembers,
        AddressKind::RoleOwners,
        AddressKind::RoleAdmins,
        AddressKind::RoleTasks,
        AddressKind::TaskAttributes,
        AddressKind::TaskOwners,
        AddressKind::TaskAdmins,
        AddressKind::Proposals,
    ];

    /// Inclusive bucket-selector range reserved for this kind.
    pub const fn selector_range(self) -> (u8, u8) {
        match self {
            AddressKind::UserAttributes => (0x00, 0x0f),
            AddressKind::RoleAttributes => (0x10, 0x1f),
            AddressKind::RoleMembers => (0x20, 0x2f),
            AddressKind::RoleOwners => (0x30, 0x3f),
            AddressKind::RoleAdmins => (0x40, 0x4f),
            AddressKind::RoleTasks => (0x50, 0x5f),
            AddressKind::TaskAttributes => (0x60, 0x6f),
            AddressKind::TaskOwners => (0x70, 0x7f),
            AddressKind::TaskAdmins => (0x80, 0x8f),
            AddressKind::Proposals => (0x90, 0x9f),
        }
    }

    fn containing(selector: u8) -> Option<AddressKind> {
        AddressKind::ALL.into_iter().find(|kind| {
            let (start, end) = kind.selector_range();
            (start..=end).contains(&selector)
        })
    }
}

/// Classify an address back into the kind that constructed it.
///
/// Fails when the namespace prefix belongs to a different family or when the
/// selector byte falls outside every reserved sub-range.
pub fn classify(address: &Address) -> Result<AddressKind, AddressError> {
    if address.prefix() != family_prefix() {
        return Err(AddressError::ForeignNamespace);
    }
    let selector = address.selector();
    AddressKind::containing(selector).ok_or(AddressError::UnknownBucket { selector })
}

fn compose(kind: AddressKind, digest: &[u8]) -> Address {
    let (start, end) = kind.selector_range();
    let selector = start + digest[0] % (end - start + 1);
    let suffix = hex::encode(&digest[1..1 + SUFFIX_LENGTH / 2]);
    Address::from_parts(family_prefix(), selector, &suffix)
}

fn derive(kind: AddressKind, id: &str) -> Address {
    let digest = Sha512::digest(id.as_bytes());
    compose(kind, &digest)
}

/// Derive the address of a pair-keyed container.
///
/// The two identifiers are fed to the hasher with a NUL separator, so the
/// pair ("ab", "c") never collides with ("a", "bc"). Identifiers are
/// UUID-like or public-key-like tokens and never contain NUL themselves.
fn derive_pair(kind: AddressKind, object_id: &str, related_id: &str) -> Address {
    let mut hasher = Sha512::new();
    hasher.update(object_id.as_bytes());
    hasher.update([0u8]);
    hasher.update(related_id.as_bytes());
    compose(kind, &hasher.finalize())
}

/// Address of a user's attribute container.
pub fn user_attributes_address(user_id: &str) -> Address {
    derive(AddressKind::UserAttributes, user_id)
}

/// Address of a role's attribute container.
pub fn role_attributes_address(role_id: &str) -> Address {
    derive(AddressKind::RoleAttributes, role_id)
}

/// Address of a role's member relationship container.
pub fn role_members_address(role_id: &str) -> Address {
    derive(AddressKind::RoleMembers, role_id)
}

/// Address of a role's owner relationship container.
pub fn role_owners_address(role_id: &str) -> Address {
    derive(AddressKind::RoleOwners, role_id)
}

/// Address of a role's admin relationship container.
pub fn role_admins_address(role_id: &str) -> Address {
    derive(AddressKind::RoleAdmins, role_id)
}

/// Address of a role's task relationship container.
pub fn role_tasks_address(role_id: &str) -> Address {
    derive(AddressKind::RoleTasks, role_id)
}

/// Address of a task's attribute container.
pub fn task_attributes_address(task_id: &str) -> Address {
    derive(AddressKind::TaskAttributes, task_id)
}

/// Address of a task's owner relationship container.
pub fn task_owners_address(task_id: &str) -> Address {
    derive(AddressKind::TaskOwners, task_id)
}

/// Address of a task's admin relationship container.
pub fn task_admins_address(task_id: &str) -> Address {
    derive(AddressKind::TaskAdmins, task_id)
}

/// Address of the proposal container for one (object, target) pair.
///
/// All proposal kinds for the pair share a single container; the single-open
/// invariant is enforced per kind by scanning it.
pub fn proposal_address(object_id: &str, related_id: &str) -> Address {
    derive_pair(AddressKind::Proposals, object_id, related_id)
}
