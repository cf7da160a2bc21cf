//! Administrative event domain model.

use std::collections::HashMap;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MetricsError;
use crate::ids::AdminEventId;

symbolic_enum! {
    /// CRUD-like action performed by an administrator.
    pub enum OperationType (unknown = MetricsError::UnknownOperationType) {
        Create => "CREATE",
        Update => "UPDATE",
        Delete => "DELETE",
        Action => "ACTION",
    }
}

symbolic_enum! {
    /// Kind of resource an administrative operation touched.
    pub enum ResourceType (unknown = MetricsError::UnknownResourceType) {
        Realm => "REALM",
        RealmRole => "REALM_ROLE",
        RealmRoleMapping => "REALM_ROLE_MAPPING",
        RealmScopeMapping => "REALM_SCOPE_MAPPING",
        AuthFlow => "AUTH_FLOW",
        AuthExecutionFlow => "AUTH_EXECUTION_FLOW",
        AuthExecution => "AUTH_EXECUTION",
        AuthenticatorConfig => "AUTHENTICATOR_CONFIG",
        RequiredAction => "REQUIRED_ACTION",
        IdentityProvider => "IDENTITY_PROVIDER",
        IdentityProviderMapper => "IDENTITY_PROVIDER_MAPPER",
        ProtocolMapper => "PROTOCOL_MAPPER",
        User => "USER",
        UserLoginFailure => "USER_LOGIN_FAILURE",
        UserSession => "USER_SESSION",
        UserFederationProvider => "USER_FEDERATION_PROVIDER",
        UserFederationMapper => "USER_FEDERATION_MAPPER",
        Group => "GROUP",
        GroupMembership => "GROUP_MEMBERSHIP",
        Client => "CLIENT",
        ClientInitialAccessModel => "CLIENT_INITIAL_ACCESS_MODEL",
        ClientRole => "CLIENT_ROLE",
        ClientRoleMapping => "CLIENT_ROLE_MAPPING",
        ClientScope => "CLIENT_SCOPE",
        ClientScopeMapping => "CLIENT_SCOPE_MAPPING",
        ClientScopeClientMapping => "CLIENT_SCOPE_CLIENT_MAPPING",
        ClusterNode => "CLUSTER_NODE",
        Component => "COMPONENT",
        AuthorizationResourceServer => "AUTHORIZATION_RESOURCE_SERVER",
        AuthorizationResource => "AUTHORIZATION_RESOURCE",
        AuthorizationScope => "AUTHORIZATION_SCOPE",
        AuthorizationPolicy => "AUTHORIZATION_POLICY",
        Custom => "CUSTOM",
        UserProfile => "USER_PROFILE",
        Organization => "ORGANIZATION",
        OrganizationMembership => "ORGANIZATION_MEMBERSHIP",
    }
}

/// Who performed an administrative operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthDetails {
    pub realm_id: Option<String>,
    pub client_id: Option<String>,
    pub user_id: Option<String>,
    pub ip_address: Option<String>,
}

/// A single administrative change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminEvent {
    /// Generated when the producer omits it.
    #[serde(default = "AdminEventId::new")]
    pub id: AdminEventId,
    /// Epoch milliseconds on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub time: DateTime<Utc>,
    pub realm_id: Option<String>,
    pub realm_name: Option<String>,
    #[serde(default)]
    pub auth_details: AuthDetails,
    pub operation_type: OperationType,
    pub resource_type: ResourceType,
    pub resource_path: Option<String>,
    pub representation: Option<String>,
    pub error: Option<String>,
    pub details: Option<HashMap<String, String>>,
}

impl AdminEvent {
    /// Create a new admin event for the given operation and resource.
    #[must_use]
    pub fn new(operation_type: OperationType, resource_type: ResourceType) -> Self {
        Self {
            id: AdminEventId::new(),
            time: Utc::now().trunc_subsecs(3),
            realm_id: None,
            realm_name: None,
            auth_details: AuthDetails::default(),
            operation_type,
            resource_type,
            resource_path: None,
            representation: None,
            error: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_realm_name(mut self, realm_name: impl Into<String>) -> Self {
        self.realm_name = Some(realm_name.into());
        self
    }

    #[must_use]
    pub fn with_realm_id(mut self, realm_id: impl Into<String>) -> Self {
        self.realm_id = Some(realm_id.into());
        self
    }

    #[must_use]
    pub fn with_auth_details(mut self, auth_details: AuthDetails) -> Self {
        self.auth_details = auth_details;
        self
    }

    #[must_use]
    pub fn with_resource_path(mut self, resource_path: impl Into<String>) -> Self {
        self.resource_path = Some(resource_path.into());
        self
    }

    /// Attach the JSON representation of the changed resource.
    #[must_use]
    pub fn with_representation(mut self, representation: impl Into<String>) -> Self {
        self.representation = Some(representation.into());
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_type_parse() {
        assert_eq!("create".parse::<OperationType>().unwrap(), OperationType::Create);
        assert!(matches!(
            "UPSERT".parse::<OperationType>(),
            Err(MetricsError::UnknownOperationType(_))
        ));
    }

    #[test]
    fn test_resource_type_display() {
        assert_eq!(ResourceType::RealmRoleMapping.to_string(), "REALM_ROLE_MAPPING");
        assert_eq!(
            "organization_membership".parse::<ResourceType>().unwrap(),
            ResourceType::OrganizationMembership
        );
    }

    #[test]
    fn test_admin_event_json_shape() {
        let event = AdminEvent::new(OperationType::Update, ResourceType::Client)
            .with_realm_name("demo")
            .with_resource_path("clients/1234");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["operationType"], "UPDATE");
        assert_eq!(json["resourceType"], "CLIENT");
        assert_eq!(json["resourcePath"], "clients/1234");

        let back: AdminEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
