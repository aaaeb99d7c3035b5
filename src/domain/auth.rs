use uuid::Uuid;

/// Closed set of roles known to the core. Handlers translate whatever the
/// identity provider supplies into one of these before calling in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Teacher,
    Parent,
    Client,
}

impl Role {
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "teacher" => Some(Role::Teacher),
            "parent" => Some(Role::Parent),
            "client" => Some(Role::Client),
            _ => None,
        }
    }
}

/// The authenticated caller, as supplied by the external identity provider.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

/// Single capability check used at the top of every mutating operation:
/// an actor may modify a resource iff they own it.
pub fn can_modify(actor: &Actor, resource_owner: Uuid) -> bool {
    actor.id == resource_owner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_can_modify() {
        let id = Uuid::new_v4();
        let actor = Actor {
            id,
            role: Role::Teacher,
        };
        assert!(can_modify(&actor, id));
    }

    #[test]
    fn non_owner_cannot_modify_regardless_of_role() {
        for role in [Role::Teacher, Role::Parent, Role::Client] {
            let actor = Actor {
                id: Uuid::new_v4(),
                role,
            };
            assert!(!can_modify(&actor, Uuid::new_v4()));
        }
    }

    #[test]
    fn role_parse_rejects_unknown() {
        assert_eq!(Role::parse("teacher"), Some(Role::Teacher));
        assert_eq!(Role::parse("admin"), None);
    }
}
