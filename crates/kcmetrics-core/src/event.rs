//! User event domain model as delivered by the authentication flows.

use std::collections::HashMap;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MetricsError;
use crate::ids::EventId;

/// Well-known keys of [`Event::details`].
pub mod details {
    /// Alias of the identity provider that brokered the authentication.
    pub const IDENTITY_PROVIDER: &str = "identity_provider";
    pub const AUTH_METHOD: &str = "auth_method";
    pub const USERNAME: &str = "username";
    pub const REDIRECT_URI: &str = "redirect_uri";
}

/// Well-known values of [`Event::error`].
pub mod errors {
    /// The request named a client that does not exist in the realm.
    pub const CLIENT_NOT_FOUND: &str = "client_not_found";
    pub const INVALID_USER_CREDENTIALS: &str = "invalid_user_credentials";
    pub const USER_NOT_FOUND: &str = "user_not_found";
    pub const USER_DISABLED: &str = "user_disabled";
    pub const INVALID_CLIENT_CREDENTIALS: &str = "invalid_client_credentials";
    pub const INVALID_TOKEN: &str = "invalid_token";
}

/// Suffix shared by every failure event type.
pub const ERROR_SUFFIX: &str = "_ERROR";

symbolic_enum! {
    /// Kind of user event.
    pub enum EventType (unknown = MetricsError::UnknownEventType) {
        Login => "LOGIN",
        LoginError => "LOGIN_ERROR",
        Register => "REGISTER",
        RegisterError => "REGISTER_ERROR",
        Logout => "LOGOUT",
        LogoutError => "LOGOUT_ERROR",
        CodeToToken => "CODE_TO_TOKEN",
        CodeToTokenError => "CODE_TO_TOKEN_ERROR",
        ClientLogin => "CLIENT_LOGIN",
        ClientLoginError => "CLIENT_LOGIN_ERROR",
        RefreshToken => "REFRESH_TOKEN",
        RefreshTokenError => "REFRESH_TOKEN_ERROR",
        ValidateAccessToken => "VALIDATE_ACCESS_TOKEN",
        ValidateAccessTokenError => "VALIDATE_ACCESS_TOKEN_ERROR",
        IntrospectToken => "INTROSPECT_TOKEN",
        IntrospectTokenError => "INTROSPECT_TOKEN_ERROR",
        FederatedIdentityLink => "FEDERATED_IDENTITY_LINK",
        FederatedIdentityLinkError => "FEDERATED_IDENTITY_LINK_ERROR",
        RemoveFederatedIdentity => "REMOVE_FEDERATED_IDENTITY",
        RemoveFederatedIdentityError => "REMOVE_FEDERATED_IDENTITY_ERROR",
        UpdateEmail => "UPDATE_EMAIL",
        UpdateEmailError => "UPDATE_EMAIL_ERROR",
        UpdateProfile => "UPDATE_PROFILE",
        UpdateProfileError => "UPDATE_PROFILE_ERROR",
        UpdatePassword => "UPDATE_PASSWORD",
        UpdatePasswordError => "UPDATE_PASSWORD_ERROR",
        UpdateTotp => "UPDATE_TOTP",
        UpdateTotpError => "UPDATE_TOTP_ERROR",
        UpdateCredential => "UPDATE_CREDENTIAL",
        UpdateCredentialError => "UPDATE_CREDENTIAL_ERROR",
        VerifyEmail => "VERIFY_EMAIL",
        VerifyEmailError => "VERIFY_EMAIL_ERROR",
        VerifyProfile => "VERIFY_PROFILE",
        VerifyProfileError => "VERIFY_PROFILE_ERROR",
        RemoveTotp => "REMOVE_TOTP",
        RemoveTotpError => "REMOVE_TOTP_ERROR",
        RemoveCredential => "REMOVE_CREDENTIAL",
        RemoveCredentialError => "REMOVE_CREDENTIAL_ERROR",
        GrantConsent => "GRANT_CONSENT",
        GrantConsentError => "GRANT_CONSENT_ERROR",
        UpdateConsent => "UPDATE_CONSENT",
        UpdateConsentError => "UPDATE_CONSENT_ERROR",
        RevokeGrant => "REVOKE_GRANT",
        RevokeGrantError => "REVOKE_GRANT_ERROR",
        SendVerifyEmail => "SEND_VERIFY_EMAIL",
        SendVerifyEmailError => "SEND_VERIFY_EMAIL_ERROR",
        SendResetPassword => "SEND_RESET_PASSWORD",
        SendResetPasswordError => "SEND_RESET_PASSWORD_ERROR",
        SendIdentityProviderLink => "SEND_IDENTITY_PROVIDER_LINK",
        SendIdentityProviderLinkError => "SEND_IDENTITY_PROVIDER_LINK_ERROR",
        ResetPassword => "RESET_PASSWORD",
        ResetPasswordError => "RESET_PASSWORD_ERROR",
        RestartAuthentication => "RESTART_AUTHENTICATION",
        RestartAuthenticationError => "RESTART_AUTHENTICATION_ERROR",
        InvalidSignature => "INVALID_SIGNATURE",
        InvalidSignatureError => "INVALID_SIGNATURE_ERROR",
        RegisterNode => "REGISTER_NODE",
        RegisterNodeError => "REGISTER_NODE_ERROR",
        UnregisterNode => "UNREGISTER_NODE",
        UnregisterNodeError => "UNREGISTER_NODE_ERROR",
        UserInfoRequest => "USER_INFO_REQUEST",
        UserInfoRequestError => "USER_INFO_REQUEST_ERROR",
        IdentityProviderLinkAccount => "IDENTITY_PROVIDER_LINK_ACCOUNT",
        IdentityProviderLinkAccountError => "IDENTITY_PROVIDER_LINK_ACCOUNT_ERROR",
        IdentityProviderLogin => "IDENTITY_PROVIDER_LOGIN",
        IdentityProviderLoginError => "IDENTITY_PROVIDER_LOGIN_ERROR",
        IdentityProviderFirstLogin => "IDENTITY_PROVIDER_FIRST_LOGIN",
        IdentityProviderFirstLoginError => "IDENTITY_PROVIDER_FIRST_LOGIN_ERROR",
        IdentityProviderPostLogin => "IDENTITY_PROVIDER_POST_LOGIN",
        IdentityProviderPostLoginError => "IDENTITY_PROVIDER_POST_LOGIN_ERROR",
        IdentityProviderResponse => "IDENTITY_PROVIDER_RESPONSE",
        IdentityProviderResponseError => "IDENTITY_PROVIDER_RESPONSE_ERROR",
        IdentityProviderRetrieveToken => "IDENTITY_PROVIDER_RETRIEVE_TOKEN",
        IdentityProviderRetrieveTokenError => "IDENTITY_PROVIDER_RETRIEVE_TOKEN_ERROR",
        Impersonate => "IMPERSONATE",
        ImpersonateError => "IMPERSONATE_ERROR",
        CustomRequiredAction => "CUSTOM_REQUIRED_ACTION",
        CustomRequiredActionError => "CUSTOM_REQUIRED_ACTION_ERROR",
        ExecuteActions => "EXECUTE_ACTIONS",
        ExecuteActionsError => "EXECUTE_ACTIONS_ERROR",
        ExecuteActionToken => "EXECUTE_ACTION_TOKEN",
        ExecuteActionTokenError => "EXECUTE_ACTION_TOKEN_ERROR",
        ClientInfo => "CLIENT_INFO",
        ClientInfoError => "CLIENT_INFO_ERROR",
        ClientRegister => "CLIENT_REGISTER",
        ClientRegisterError => "CLIENT_REGISTER_ERROR",
        ClientUpdate => "CLIENT_UPDATE",
        ClientUpdateError => "CLIENT_UPDATE_ERROR",
        ClientDelete => "CLIENT_DELETE",
        ClientDeleteError => "CLIENT_DELETE_ERROR",
        ClientInitiatedAccountLinking => "CLIENT_INITIATED_ACCOUNT_LINKING",
        ClientInitiatedAccountLinkingError => "CLIENT_INITIATED_ACCOUNT_LINKING_ERROR",
        TokenExchange => "TOKEN_EXCHANGE",
        TokenExchangeError => "TOKEN_EXCHANGE_ERROR",
        Oauth2DeviceAuth => "OAUTH2_DEVICE_AUTH",
        Oauth2DeviceAuthError => "OAUTH2_DEVICE_AUTH_ERROR",
        Oauth2DeviceVerifyUserCode => "OAUTH2_DEVICE_VERIFY_USER_CODE",
        Oauth2DeviceVerifyUserCodeError => "OAUTH2_DEVICE_VERIFY_USER_CODE_ERROR",
        Oauth2DeviceCodeToToken => "OAUTH2_DEVICE_CODE_TO_TOKEN",
        Oauth2DeviceCodeToTokenError => "OAUTH2_DEVICE_CODE_TO_TOKEN_ERROR",
        AuthreqidToToken => "AUTHREQID_TO_TOKEN",
        AuthreqidToTokenError => "AUTHREQID_TO_TOKEN_ERROR",
        PermissionToken => "PERMISSION_TOKEN",
        PermissionTokenError => "PERMISSION_TOKEN_ERROR",
        DeleteAccount => "DELETE_ACCOUNT",
        DeleteAccountError => "DELETE_ACCOUNT_ERROR",
        PushedAuthorizationRequest => "PUSHED_AUTHORIZATION_REQUEST",
        PushedAuthorizationRequestError => "PUSHED_AUTHORIZATION_REQUEST_ERROR",
        Oauth2ExtensionGrant => "OAUTH2_EXTENSION_GRANT",
        Oauth2ExtensionGrantError => "OAUTH2_EXTENSION_GRANT_ERROR",
        FederatedIdentityOverrideLink => "FEDERATED_IDENTITY_OVERRIDE_LINK",
        FederatedIdentityOverrideLinkError => "FEDERATED_IDENTITY_OVERRIDE_LINK_ERROR",
        InviteOrg => "INVITE_ORG",
        InviteOrgError => "INVITE_ORG_ERROR",
        UserDisabledByPermanentLockout => "USER_DISABLED_BY_PERMANENT_LOCKOUT",
        UserDisabledByTemporaryLockout => "USER_DISABLED_BY_TEMPORARY_LOCKOUT",
    }
}

impl EventType {
    /// Whether this type records a failed operation.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.as_str().ends_with(ERROR_SUFFIX)
    }
}

/// A single user event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Generated when the producer omits it.
    #[serde(default = "EventId::new")]
    pub id: EventId,
    /// Epoch milliseconds on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub realm_id: Option<String>,
    pub realm_name: Option<String>,
    pub client_id: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub ip_address: Option<String>,
    pub error: Option<String>,
    pub details: Option<HashMap<String, String>>,
}

impl Event {
    /// Create a new event of the given type with every optional field unset.
    #[must_use]
    pub fn new(event_type: EventType) -> Self {
        Self {
            id: EventId::new(),
            time: Utc::now().trunc_subsecs(3),
            event_type,
            realm_id: None,
            realm_name: None,
            client_id: None,
            user_id: None,
            session_id: None,
            ip_address: None,
            error: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_realm_id(mut self, realm_id: impl Into<String>) -> Self {
        self.realm_id = Some(realm_id.into());
        self
    }

    #[must_use]
    pub fn with_realm_name(mut self, realm_name: impl Into<String>) -> Self {
        self.realm_name = Some(realm_name.into());
        self
    }

    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    #[must_use]
    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Add one detail entry, creating the details map on first use.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Look up a detail value; `None` when the key or the whole map is absent.
    #[must_use]
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|details| details.get(key))
            .map(String::as_str)
    }

    /// Identity provider alias from the details, if the event carries one.
    #[must_use]
    pub fn identity_provider(&self) -> Option<&str> {
        self.detail(details::IDENTITY_PROVIDER)
    }

    /// Whether the event reports that its client could not be resolved.
    #[must_use]
    pub fn is_client_not_found(&self) -> bool {
        self.error.as_deref() == Some(errors::CLIENT_NOT_FOUND)
    }
}
