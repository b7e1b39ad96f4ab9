//! Structural validation of inbound chat messages.
//!
//! Validation is pure: it never mutates the message or touches registry state.

use chrono::DateTime;

use super::{error::ValidationError, message::ChatMessage, message::MessageType};

/// Smallest accepted userId
pub const USER_ID_MIN: i64 = 1;
/// Largest accepted userId
pub const USER_ID_MAX: i64 = 100_000;
/// Shortest accepted username, in characters
pub const USERNAME_MIN_LEN: usize = 3;
/// Longest accepted username, in characters
pub const USERNAME_MAX_LEN: usize = 20;
/// Shortest accepted message body, in characters
pub const MESSAGE_MIN_LEN: usize = 1;
/// Longest accepted message body, in characters
pub const MESSAGE_MAX_LEN: usize = 500;

/// Validate a decoded payload that may be JSON `null`.
///
/// # Errors
///
/// Returns `ValidationError::MissingPayload` for `None`, otherwise whatever
/// [`validate`] reports
pub fn validate_payload(payload: Option<ChatMessage>) -> Result<ChatMessage, ValidationError> {
    let message = payload.ok_or(ValidationError::MissingPayload)?;
    validate(&message)?;
    Ok(message)
}

/// Check every field rule of a chat message.
///
/// # Errors
///
/// Returns the first rule that fails
pub fn validate(message: &ChatMessage) -> Result<(), ValidationError> {
    validate_user_id(required(&message.user_id, "userId")?)?;
    validate_username(required(&message.username, "username")?)?;
    validate_message(required(&message.message, "message")?)?;
    validate_timestamp(required(&message.timestamp, "timestamp")?)?;
    required(&message.message_type, "messageType")?.parse::<MessageType>()?;
    Ok(())
}

fn required<'a>(
    field: &'a Option<String>,
    name: &'static str,
) -> Result<&'a str, ValidationError> {
    field
        .as_deref()
        .ok_or(ValidationError::MissingField(name))
}

fn validate_user_id(user_id: &str) -> Result<(), ValidationError> {
    let value: i64 = user_id
        .parse()
        .map_err(|_| ValidationError::UserIdNotNumeric(user_id.to_string()))?;
    if !(USER_ID_MIN..=USER_ID_MAX).contains(&value) {
        return Err(ValidationError::UserIdOutOfRange {
            min: USER_ID_MIN,
            max: USER_ID_MAX,
            actual: value,
        });
    }
    Ok(())
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(ValidationError::UsernameLength {
            min: USERNAME_MIN_LEN,
            max: USERNAME_MAX_LEN,
            actual: len,
        });
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::UsernameCharacters);
    }
    Ok(())
}

fn validate_message(message: &str) -> Result<(), ValidationError> {
    let len = message.chars().count();
    if !(MESSAGE_MIN_LEN..=MESSAGE_MAX_LEN).contains(&len) {
        return Err(ValidationError::MessageLength {
            min: MESSAGE_MIN_LEN,
            max: MESSAGE_MAX_LEN,
            actual: len,
        });
    }
    Ok(())
}

fn validate_timestamp(timestamp: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::TimestampFormat(timestamp.to_string());
    // RFC 3339 also allows a space or lowercase `t`/`z`; an ISO-8601 instant does not.
    if timestamp.as_bytes().get(10) != Some(&b'T') || timestamp.ends_with('z') {
        return Err(invalid());
    }
    DateTime::parse_from_rfc3339(timestamp)
        .map(|_| ())
        .map_err(|_| invalid())
}
