//! Pure authorization predicates over `(role, user id, organizer id)`.
//!
//! Side-effect free; the caller maps a `false` to `Forbidden`. Identity is
//! always passed in explicitly; there is no ambient session state.

use uuid::Uuid;

use crate::identity::Identity;
use crate::models::Role;

/// Owner or admin may edit an event.
pub fn can_edit(actor: &Identity, organizer_id: Uuid) -> bool {
    actor.role == Role::Admin || actor.user_id == organizer_id
}

/// Owner or admin may delete an event.
pub fn can_delete(actor: &Identity, organizer_id: Uuid) -> bool {
    can_edit(actor, organizer_id)
}

/// Owner or admin may see who holds tickets.
pub fn can_view_participants(actor: &Identity, organizer_id: Uuid) -> bool {
    can_edit(actor, organizer_id)
}

/// Organizers and admins may create events.
pub fn can_create_event(actor: &Identity) -> bool {
    matches!(actor.role, Role::Admin | Role::Organizer)
}

/// Only admins manage user accounts and roles.
pub fn can_manage_users(actor: &Identity) -> bool {
    actor.role == Role::Admin
}

/// Anyone but the event's own organizer may buy a ticket.
pub fn can_purchase(user_id: Uuid, organizer_id: Uuid) -> bool {
    user_id != organizer_id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn test_admin_can_edit_any_event() {
        let admin = actor(Role::Admin);
        assert!(can_edit(&admin, Uuid::new_v4()));
    }

    #[test]
    fn test_owner_can_edit_own_event_only() {
        let organizer = actor(Role::Organizer);
        assert!(can_edit(&organizer, organizer.user_id));
        assert!(!can_edit(&organizer, Uuid::new_v4()));
    }

    #[test]
    fn test_participant_cannot_create_events() {
        assert!(!can_create_event(&actor(Role::Participant)));
        assert!(can_create_event(&actor(Role::Organizer)));
        assert!(can_create_event(&actor(Role::Admin)));
    }

    #[test]
    fn test_only_admin_manages_users() {
        assert!(can_manage_users(&actor(Role::Admin)));
        assert!(!can_manage_users(&actor(Role::Organizer)));
        assert!(!can_manage_users(&actor(Role::Participant)));
    }

    #[test]
    fn test_organizer_cannot_purchase_own_event() {
        let id = Uuid::new_v4();
        assert!(!can_purchase(id, id));
        assert!(can_purchase(id, Uuid::new_v4()));
    }
}
