//! Two-phase LTI 1.3 dynamic registration protocol.

pub mod registration;
pub mod types;

// Re-export frequently used items from each module
pub use registration::RegistrationService;
pub use types::{
    AuthConfig, AuthConfigMethod, ClientRegistrationRequest, ClientRegistrationResponse,
    GrantType, LtiMessage, LtiMessageType, LtiToolConfiguration, PendingRegistration, Platform,
    PlatformConfiguration, ResponseType, LTI_REGISTRATION_SCOPES,
};
