//! Centralised ownership checks for mutating operations.
//!
//! Services describe the target as a [`Resource`] carrying only the owner
//! facts needed for comparison, then ask [`AuthorizationPolicy::authorize`]
//! for a [`Decision`]. Rules are plain id comparisons; roles only matter for
//! the optional company-creation gate.

use super::{Error, Identity, Role, UserId};

/// What the caller is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
    /// Remove a participant from a trip.
    Remove,
}

/// Owner facts of the resource being acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Company { owner: UserId },
    /// `company_owner` is `None` for events without an organising company.
    Event { company_owner: Option<UserId> },
    Trip { organizer: UserId },
    CostItem { trip_organizer: UserId },
    VehicleOffer { company_owner: UserId },
    Participant { member: UserId, trip_organizer: UserId },
    NewCompany,
    NewEvent { company_owner: Option<UserId> },
    NewCostItem { trip_organizer: UserId },
    /// `company_owner` is `None` when the caller owns no company.
    NewVehicleOffer { company_owner: Option<UserId> },
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    fn deny(reason: &str) -> Self {
        Self::Deny(reason.to_owned())
    }

    fn when(allowed: bool, reason: &str) -> Self {
        if allowed { Self::Allow } else { Self::deny(reason) }
    }

    /// `true` when the decision is [`Decision::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Map a denial to [`Error::forbidden`].
    ///
    /// # Examples
    /// ```
    /// use eventgo::domain::{Decision, ErrorCode};
    ///
    /// assert!(Decision::Allow.into_result().is_ok());
    /// let err = Decision::Deny("nope".into()).into_result().unwrap_err();
    /// assert_eq!(err.code(), ErrorCode::Forbidden);
    /// ```
    pub fn into_result(self) -> Result<(), Error> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(Error::forbidden(reason)),
        }
    }
}

/// Whether creating a company requires the `COMPANY` role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompanyCreationPolicy {
    #[default]
    AnyAuthenticated,
    CompanyRoleOnly,
}

/// Ownership rules applied by every mutating use-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthorizationPolicy {
    company_creation: CompanyCreationPolicy,
}

impl AuthorizationPolicy {
    /// Build a policy with the given company-creation gate.
    pub fn new(company_creation: CompanyCreationPolicy) -> Self {
        Self { company_creation }
    }

    /// Decide whether `caller` may perform `action` on `resource`.
    pub fn authorize(&self, caller: &Identity, resource: Resource, action: Action) -> Decision {
        let me = caller.user_id;
        match (resource, action) {
            (Resource::NewCompany, _) => match self.company_creation {
                CompanyCreationPolicy::AnyAuthenticated => Decision::Allow,
                CompanyCreationPolicy::CompanyRoleOnly => Decision::when(
                    caller.role == Role::Company,
                    "only COMPANY users can create companies",
                ),
            },
            (Resource::Company { owner }, Action::Delete) => {
                Decision::when(owner == me, "you can only delete your own companies")
            }
            (Resource::Company { owner }, _) => {
                Decision::when(owner == me, "you can only edit your own companies")
            }
            (Resource::NewEvent { company_owner }, _) => match company_owner {
                None => Decision::Allow,
                Some(owner) => Decision::when(
                    owner == me,
                    "you can only create events for your own companies",
                ),
            },
            (Resource::Event { company_owner }, Action::Delete) => Decision::when(
                company_owner == Some(me),
                "only the organizer can delete the event",
            ),
            (Resource::Event { company_owner }, _) => Decision::when(
                company_owner == Some(me),
                "only the organizer can edit the event",
            ),
            (Resource::Trip { organizer }, Action::Delete) => {
                Decision::when(organizer == me, "only the organizer can delete the trip")
            }
            (Resource::Trip { organizer }, _) => {
                Decision::when(organizer == me, "only the organizer can edit the trip")
            }
            (Resource::NewCostItem { trip_organizer }, _) => Decision::when(
                trip_organizer == me,
                "only the organizer can create cost items",
            ),
            (Resource::CostItem { trip_organizer }, Action::Delete) => Decision::when(
                trip_organizer == me,
                "only the organizer can delete cost items",
            ),
            (Resource::CostItem { trip_organizer }, _) => Decision::when(
                trip_organizer == me,
                "only the organizer can edit cost items",
            ),
            (Resource::NewVehicleOffer { company_owner }, _) => match company_owner {
                None => Decision::deny("only companies can create vehicle offers"),
                Some(owner) => Decision::when(
                    owner == me,
                    "you can only create offers for your own companies",
                ),
            },
            (Resource::VehicleOffer { company_owner }, Action::Delete) => Decision::when(
                company_owner == me,
                "only the company owner can delete the offer",
            ),
            (Resource::VehicleOffer { company_owner }, _) => Decision::when(
                company_owner == me,
                "only the company owner can edit the offer",
            ),
            (
                Resource::Participant {
                    member,
                    trip_organizer,
                },
                _,
            ) => Decision::when(
                member == me || trip_organizer == me,
                "not allowed to remove this participation",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn caller() -> Identity {
        Identity {
            user_id: UserId::random(),
            role: Role::User,
        }
    }

    fn policy() -> AuthorizationPolicy {
        AuthorizationPolicy::default()
    }

    #[rstest]
    fn owners_may_edit_and_delete_their_company(caller: Identity) {
        let resource = Resource::Company {
            owner: caller.user_id,
        };
        assert!(policy().authorize(&caller, resource, Action::Update).is_allowed());
        assert!(policy().authorize(&caller, resource, Action::Delete).is_allowed());
    }

    #[rstest]
    #[case(Action::Update, "you can only edit your own companies")]
    #[case(Action::Delete, "you can only delete your own companies")]
    fn strangers_may_not_touch_a_company(
        caller: Identity,
        #[case] action: Action,
        #[case] reason: &str,
    ) {
        let resource = Resource::Company {
            owner: UserId::random(),
        };
        assert_eq!(
            policy().authorize(&caller, resource, action),
            Decision::Deny(reason.to_owned())
        );
    }

    #[rstest]
    #[case(Role::User, false)]
    #[case(Role::Organizer, false)]
    #[case(Role::Company, true)]
    fn company_role_gate(#[case] role: Role, #[case] allowed: bool) {
        let caller = Identity {
            user_id: UserId::random(),
            role,
        };
        let gated = AuthorizationPolicy::new(CompanyCreationPolicy::CompanyRoleOnly);
        assert_eq!(
            gated.authorize(&caller, Resource::NewCompany, Action::Create).is_allowed(),
            allowed
        );
        assert!(policy().authorize(&caller, Resource::NewCompany, Action::Create).is_allowed());
    }

    #[rstest]
    fn events_without_company_are_immutable(caller: Identity) {
        let resource = Resource::Event {
            company_owner: None,
        };
        assert!(!policy().authorize(&caller, resource, Action::Update).is_allowed());
        assert!(!policy().authorize(&caller, resource, Action::Delete).is_allowed());
    }

    #[rstest]
    fn new_events_without_company_are_allowed(caller: Identity) {
        let resource = Resource::NewEvent {
            company_owner: None,
        };
        assert!(policy().authorize(&caller, resource, Action::Create).is_allowed());
    }

    #[rstest]
    fn new_events_for_foreign_company_are_denied(caller: Identity) {
        let resource = Resource::NewEvent {
            company_owner: Some(UserId::random()),
        };
        assert_eq!(
            policy().authorize(&caller, resource, Action::Create),
            Decision::Deny("you can only create events for your own companies".to_owned())
        );
    }

    #[rstest]
    #[case(Resource::Trip { organizer: UserId::random() }, Action::Update, "only the organizer can edit the trip")]
    #[case(Resource::Trip { organizer: UserId::random() }, Action::Delete, "only the organizer can delete the trip")]
    #[case(Resource::NewCostItem { trip_organizer: UserId::random() }, Action::Create, "only the organizer can create cost items")]
    #[case(Resource::CostItem { trip_organizer: UserId::random() }, Action::Update, "only the organizer can edit cost items")]
    #[case(Resource::CostItem { trip_organizer: UserId::random() }, Action::Delete, "only the organizer can delete cost items")]
    #[case(Resource::VehicleOffer { company_owner: UserId::random() }, Action::Update, "only the company owner can edit the offer")]
    #[case(Resource::VehicleOffer { company_owner: UserId::random() }, Action::Delete, "only the company owner can delete the offer")]
    #[case(Resource::NewVehicleOffer { company_owner: None }, Action::Create, "only companies can create vehicle offers")]
    #[case(Resource::NewVehicleOffer { company_owner: Some(UserId::random()) }, Action::Create, "you can only create offers for your own companies")]
    #[case(Resource::Event { company_owner: Some(UserId::random()) }, Action::Update, "only the organizer can edit the event")]
    #[case(Resource::Event { company_owner: Some(UserId::random()) }, Action::Delete, "only the organizer can delete the event")]
    fn strangers_are_denied_with_named_reason(
        caller: Identity,
        #[case] resource: Resource,
        #[case] action: Action,
        #[case] reason: &str,
    ) {
        let err = policy()
            .authorize(&caller, resource, action)
            .into_result()
            .expect_err("denied");
        assert_eq!(err.message(), reason);
    }

    #[rstest]
    fn members_and_organizers_may_remove_participants(caller: Identity) {
        let own = Resource::Participant {
            member: caller.user_id,
            trip_organizer: UserId::random(),
        };
        let organized = Resource::Participant {
            member: UserId::random(),
            trip_organizer: caller.user_id,
        };
        let foreign = Resource::Participant {
            member: UserId::random(),
            trip_organizer: UserId::random(),
        };
        assert!(policy().authorize(&caller, own, Action::Remove).is_allowed());
        assert!(policy().authorize(&caller, organized, Action::Remove).is_allowed());
        assert_eq!(
            policy().authorize(&caller, foreign, Action::Remove),
            Decision::Deny("not allowed to remove this participation".to_owned())
        );
    }
}
