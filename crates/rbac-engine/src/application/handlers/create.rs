//! Create handlers for users, roles, and tasks.

use crate::application::handlers::{decode_content, require_field, HandlerContext, MessageHandler};
use crate::domain::entity_rules::{assert_is_user, decode_or_default};
use crate::domain::errors::EngineError;
use crate::domain::Entries;
use async_trait::async_trait;
use rbac_addressing::{
    role_admins_address, role_attributes_address, role_owners_address, task_admins_address,
    task_attributes_address, task_owners_address, user_attributes_address, Address,
};
use rbac_types::{
    to_bytes, CreateRolePayload, CreateTaskPayload, CreateUserPayload, RelationshipContainer, Role,
    RoleContainer, Task, TaskContainer, User, UserContainer,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Creates a user attribute record.
///
/// A user may create themselves; their declared manager may create them on
/// their behalf. Nobody else can.
pub struct CreateUserHandler;

#[async_trait]
impl MessageHandler for CreateUserHandler {
    async fn handle(
        &self,
        ctx: &HandlerContext<'_>,
        content: &[u8],
    ) -> Result<Vec<Address>, EngineError> {
        let payload: CreateUserPayload = decode_content(content)?;
        require_field(&payload.user_id, "user_id")?;
        require_field(&payload.name, "name")?;

        let self_creation = ctx.signer == payload.user_id;
        let by_manager = payload.manager_id.as_deref() == Some(ctx.signer);
        if !self_creation && !by_manager {
            return Err(EngineError::Unauthorized {
                signer: ctx.signer.to_owned(),
                reason: format!("only {} or their manager may create this user", payload.user_id),
            });
        }

        let address = user_attributes_address(&payload.user_id);
        ctx.require_inputs([&address])?;
        ctx.require_outputs([&address])?;

        let entries = ctx.gateway.fetch(std::slice::from_ref(&address)).await?;
        let mut container: UserContainer = decode_or_default(&entries, &address)?;
        if container.contains(&payload.user_id) {
            return Err(EngineError::AlreadyExists {
                kind: "user",
                id: payload.user_id,
            });
        }

        debug!(user_id = %payload.user_id, "creating user");
        container.users.push(User {
            user_id: payload.user_id,
            name: payload.name,
            manager_id: payload.manager_id,
            metadata: payload.metadata,
        });

        let mut batch = Entries::new();
        batch.insert(address.clone(), to_bytes(&container)?);
        ctx.gateway.write(batch).await?;
        Ok(vec![address])
    }
}

/// The addresses a grouping entity (role or task) is created at.
struct GroupingAddresses {
    attributes: Address,
    owners: Address,
    admins: Address,
}

/// Shared create path for roles and tasks: both are an attribute record
/// plus freshly seeded owner and admin relationship sets.
async fn create_grouping(
    ctx: &HandlerContext<'_>,
    addresses: GroupingAddresses,
    id: &str,
    owners: &[String],
    admins: &[String],
    exists: impl Fn(&Entries) -> Result<bool, EngineError>,
    build_attributes: impl Fn(&Entries) -> Result<Vec<u8>, EngineError>,
) -> Result<Vec<Address>, EngineError> {
    // The signer must be part of the initial owner or admin set; an empty
    // payload set can therefore never slip through.
    if !owners.iter().chain(admins).any(|u| u == ctx.signer) {
        return Err(EngineError::Unauthorized {
            signer: ctx.signer.to_owned(),
            reason: "creator must be listed among the owners or admins".into(),
        });
    }

    let user_addresses: BTreeSet<Address> = owners
        .iter()
        .chain(admins)
        .map(|u| user_attributes_address(u))
        .collect();

    let mut reads: Vec<Address> = vec![
        addresses.attributes.clone(),
        addresses.owners.clone(),
        addresses.admins.clone(),
    ];
    reads.extend(user_addresses.iter().cloned());
    ctx.require_inputs(&reads)?;
    ctx.require_outputs([&addresses.attributes, &addresses.owners, &addresses.admins])?;

    let entries = ctx.gateway.fetch(&reads).await?;

    for user_id in owners.iter().chain(admins) {
        assert_is_user(&entries, user_id, &user_attributes_address(user_id))?;
    }
    if exists(&entries)? {
        return Err(EngineError::AlreadyExists {
            kind: "grouping",
            id: id.to_owned(),
        });
    }

    let mut owner_container: RelationshipContainer =
        decode_or_default(&entries, &addresses.owners)?;
    for owner in owners {
        owner_container.insert(id, owner);
    }
    let mut admin_container: RelationshipContainer =
        decode_or_default(&entries, &addresses.admins)?;
    for admin in admins {
        admin_container.insert(id, admin);
    }

    let mut batch = Entries::new();
    batch.insert(addresses.attributes.clone(), build_attributes(&entries)?);
    batch.insert(addresses.owners.clone(), to_bytes(&owner_container)?);
    batch.insert(addresses.admins.clone(), to_bytes(&admin_container)?);
    ctx.gateway.write(batch).await?;
    Ok(vec![addresses.attributes, addresses.owners, addresses.admins])
}

/// Creates a role with its initial owner and admin sets.
pub struct CreateRoleHandler;

#[async_trait]
impl MessageHandler for CreateRoleHandler {
    async fn handle(
        &self,
        ctx: &HandlerContext<'_>,
        content: &[u8],
    ) -> Result<Vec<Address>, EngineError> {
        let payload: CreateRolePayload = decode_content(content)?;
        require_field(&payload.role_id, "role_id")?;
        require_field(&payload.name, "name")?;

        let attributes = role_attributes_address(&payload.role_id);
        let addresses = GroupingAddresses {
            attributes: attributes.clone(),
            owners: role_owners_address(&payload.role_id),
            admins: role_admins_address(&payload.role_id),
        };
        debug!(role_id = %payload.role_id, "creating role");

        create_grouping(
            ctx,
            addresses,
            &payload.role_id,
            &payload.owners,
            &payload.admins,
            |entries| {
                let container: RoleContainer = decode_or_default(entries, &attributes)?;
                Ok(container.contains(&payload.role_id))
            },
            |entries| {
                let mut container: RoleContainer = decode_or_default(entries, &attributes)?;
                container.roles.push(Role {
                    role_id: payload.role_id.clone(),
                    name: payload.name.clone(),
                    metadata: payload.metadata.clone(),
                });
                Ok(to_bytes(&container)?)
            },
        )
        .await
    }
}

/// Creates a task with its initial owner and admin sets.
pub struct CreateTaskHandler;

#[async_trait]
impl MessageHandler for CreateTaskHandler {
    async fn handle(
        &self,
        ctx: &HandlerContext<'_>,
        content: &[u8],
    ) -> Result<Vec<Address>, EngineError> {
        let payload: CreateTaskPayload = decode_content(content)?;
        require_field(&payload.task_id, "task_id")?;
        require_field(&payload.name, "name")?;

        let attributes = task_attributes_address(&payload.task_id);
        let addresses = GroupingAddresses {
            attributes: attributes.clone(),
            owners: task_owners_address(&payload.task_id),
            admins: task_admins_address(&payload.task_id),
        };
        debug!(task_id = %payload.task_id, "creating task");

        create_grouping(
            ctx,
            addresses,
            &payload.task_id,
            &payload.owners,
            &payload.admins,
            |entries| {
                let container: TaskContainer = decode_or_default(entries, &attributes)?;
                Ok(container.contains(&payload.task_id))
            },
            |entries| {
                let mut container: TaskContainer = decode_or_default(entries, &attributes)?;
                container.tasks.push(Task {
                    task_id: payload.task_id.clone(),
                    name: payload.name.clone(),
                    metadata: payload.metadata.clone(),
                });
                Ok(to_bytes(&container)?)
            },
        )
        .await
    }
}
