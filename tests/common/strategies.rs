use proptest::prelude::*;

use cosmos_probe::error::{CredentialError, OperationError};

/// Messages free of every classification keyword
pub fn neutral_message_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9 .:-]{0,64}".prop_filter("must avoid classification keywords", |m| {
        !["unauthorized", "forbidden", "authentication", "authorization", "already exists"]
            .iter()
            .any(|k| m.contains(k))
    })
}

/// Arbitrary messages, sometimes containing keywords in mixed case
pub fn any_message_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        neutral_message_strategy(),
        Just("Forbidden".to_string()),
        Just("UNAUTHORIZED request".to_string()),
        Just("Authentication failed".to_string()),
        Just("authorization header missing".to_string()),
        Just("The table specified Already Exists.".to_string()),
        "[ -~]{0,80}",
    ]
}

/// HTTP statuses the store may reply with
pub fn status_strategy() -> impl Strategy<Value = Option<u16>> {
    prop::option::of(prop_oneof![
        Just(400u16),
        Just(401),
        Just(403),
        Just(404),
        Just(409),
        Just(429),
        Just(500),
        Just(503),
        100u16..600,
    ])
}

/// Store error codes, including the already-exists code
pub fn error_code_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        Just("TableAlreadyExists".to_string()),
        Just("AuthorizationPermissionMismatch".to_string()),
        Just("ResourceNotFound".to_string()),
        "[A-Za-z]{1,24}",
    ])
}

/// Any operation error
pub fn operation_error_strategy() -> impl Strategy<Value = OperationError> {
    (any_message_strategy(), status_strategy(), error_code_strategy()).prop_map(
        |(message, status, error_code)| OperationError {
            message,
            status,
            error_code,
        },
    )
}

/// Any credential error
pub fn credential_error_strategy() -> impl Strategy<Value = CredentialError> {
    any_message_strategy().prop_flat_map(|message| {
        prop_oneof![
            Just(CredentialError::EndpointUnreachable(message.clone())),
            Just(CredentialError::InvalidTokenResponse(message.clone())),
            (100u16..600).prop_map(move |status| CredentialError::IdentityUnavailable {
                status,
                message: message.clone(),
            }),
        ]
    })
}
