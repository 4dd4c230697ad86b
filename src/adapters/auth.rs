use crate::domain::model::{Action, Caller};
use crate::domain::ports::AuthorizationGate;
use std::collections::HashSet;

/// Staff roles may do everything; customer roles may only list.
#[derive(Debug, Clone, Default)]
pub struct RoleGate {
    staff_roles: HashSet<String>,
    customer_roles: HashSet<String>,
}

impl RoleGate {
    pub fn new<I, J>(staff_roles: I, customer_roles: J) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        Self {
            staff_roles: staff_roles.into_iter().collect(),
            customer_roles: customer_roles.into_iter().collect(),
        }
    }

    fn is_staff(&self, caller: &Caller) -> bool {
        caller.roles.iter().any(|role| self.staff_roles.contains(role))
    }

    fn is_customer(&self, caller: &Caller) -> bool {
        caller
            .roles
            .iter()
            .any(|role| self.customer_roles.contains(role))
    }
}

impl AuthorizationGate for RoleGate {
    fn is_authorized(&self, caller: &Caller, action: Action) -> bool {
        if self.is_staff(caller) {
            return true;
        }
        !action.is_mutation() && self.is_customer(caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> RoleGate {
        RoleGate::new(
            vec!["shop_manager".to_string(), "administrator".to_string()],
            vec!["customer".to_string()],
        )
    }

    #[test]
    fn test_staff_can_mutate() {
        let staff = Caller::new("admin", &["administrator"]);
        for action in Action::ALL {
            assert!(gate().is_authorized(&staff, action));
        }
    }

    #[test]
    fn test_customer_can_only_list() {
        let customer = Caller::new("c-17", &["customer"]);
        assert!(gate().is_authorized(&customer, Action::List));
        assert!(!gate().is_authorized(&customer, Action::AddOne));
        assert!(!gate().is_authorized(&customer, Action::AddBulk));
        assert!(!gate().is_authorized(&customer, Action::DeleteAt));
    }

    #[test]
    fn test_unknown_role_gets_nothing() {
        let guest = Caller::new("anon", &[]);
        assert!(!gate().is_authorized(&guest, Action::List));
    }
}
