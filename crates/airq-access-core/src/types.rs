//! Strong type definitions for access requests.
//!
//! Identifiers are newtypes and the closed vocabularies (sources, statuses,
//! actions) are enums, so the lifecycle can be matched exhaustively.

use std::borrow::Borrow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix carried by every generated request identifier.
pub const REQUEST_ID_PREFIX: &str = "PR";

/// Identifier of a single permission request.
///
/// Generated ids look like `PR-20240101120000-0001`: a UTC second-resolution
/// timestamp followed by a sequence number. Ids read back from a store are
/// kept verbatim, whatever their shape.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Build the id for the `seq`-th request created at `now`.
    pub fn generate(now: DateTime<Utc>, seq: usize) -> Self {
        Self(format!(
            "{}-{}-{:04}",
            REQUEST_ID_PREFIX,
            now.format("%Y%m%d%H%M%S"),
            seq
        ))
    }

    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestId({})", self.0)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RequestId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Upstream data source that access is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSource {
    /// World Bank indicators API.
    #[serde(rename = "world_bank_api")]
    WorldBankApi,

    /// OpenAQ city-level measurement snapshot (Kaggle export).
    #[serde(rename = "openaq_kaggle")]
    OpenAq,

    /// Any other source.
    #[serde(rename = "custom")]
    Custom,
}

impl DataSource {
    /// Every recognized source.
    pub const ALL: [DataSource; 3] = [DataSource::WorldBankApi, DataSource::OpenAq, DataSource::Custom];

    /// The persisted string form.
    pub const fn as_str(self) -> &'static str {
        match self {
            DataSource::WorldBankApi => "world_bank_api",
            DataSource::OpenAq => "openaq_kaggle",
            DataSource::Custom => "custom",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    /// Awaiting a decision.
    Pending,
    /// Access granted.
    Granted,
    /// Access refused. Terminal.
    Denied,
    /// A previous grant was withdrawn. Terminal.
    Revoked,
}

impl PermissionStatus {
    /// Every status.
    pub const ALL: [PermissionStatus; 4] = [
        PermissionStatus::Pending,
        PermissionStatus::Granted,
        PermissionStatus::Denied,
        PermissionStatus::Revoked,
    ];

    /// The persisted string form.
    pub const fn as_str(self) -> &'static str {
        match self {
            PermissionStatus::Pending => "pending",
            PermissionStatus::Granted => "granted",
            PermissionStatus::Denied => "denied",
            PermissionStatus::Revoked => "revoked",
        }
    }

    /// Whether no action can move a request out of this status.
    pub const fn is_terminal(self) -> bool {
        matches!(self, PermissionStatus::Denied | PermissionStatus::Revoked)
    }

    /// The status reached by applying `action`, or `None` if the move is illegal.
    pub const fn apply(self, action: Action) -> Option<PermissionStatus> {
        match (self, action) {
            (PermissionStatus::Pending, Action::Grant) => Some(PermissionStatus::Granted),
            (PermissionStatus::Pending, Action::Deny) => Some(PermissionStatus::Denied),
            (PermissionStatus::Granted, Action::Revoke) => Some(PermissionStatus::Revoked),
            (PermissionStatus::Pending, Action::Revoke)
            | (PermissionStatus::Granted, Action::Grant)
            | (PermissionStatus::Granted, Action::Deny)
            | (PermissionStatus::Denied, _)
            | (PermissionStatus::Revoked, _) => None,
        }
    }
}

impl fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state-changing action on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Pending -> Granted.
    Grant,
    /// Pending -> Denied.
    Deny,
    /// Granted -> Revoked.
    Revoke,
}

impl Action {
    /// The only status this action may be applied from.
    pub const fn required_status(self) -> PermissionStatus {
        match self {
            Action::Grant | Action::Deny => PermissionStatus::Pending,
            Action::Revoke => PermissionStatus::Granted,
        }
    }

    /// The status this action moves a request to.
    pub const fn target_status(self) -> PermissionStatus {
        match self {
            Action::Grant => PermissionStatus::Granted,
            Action::Deny => PermissionStatus::Denied,
            Action::Revoke => PermissionStatus::Revoked,
        }
    }

    /// Lowercase verb, used in messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Grant => "grant",
            Action::Deny => "deny",
            Action::Revoke => "revoke",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![Just(Action::Grant), Just(Action::Deny), Just(Action::Revoke)]
    }

    proptest! {
        #[test]
        fn test_terminal_status_is_absorbing(actions in prop::collection::vec(action(), 0..12)) {
            let mut status = PermissionStatus::Pending;
            for action in actions {
                match status.apply(action) {
                    Some(next) => {
                        prop_assert!(!status.is_terminal());
                        prop_assert_eq!(action.required_status(), status);
                        status = next;
                    }
                    None => prop_assert_ne!(action.required_status(), status),
                }
            }
        }
    }

    #[test]
    fn test_request_id_format() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        let id = RequestId::generate(now, 7);
        assert_eq!(id.as_str(), "PR-20240307090501-0007");
        assert_eq!(id.into_inner(), "PR-20240307090501-0007");
    }

    #[test]
    fn test_request_id_sequence_wider_than_padding() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        let id = RequestId::generate(now, 12345);
        assert_eq!(id.as_str(), "PR-20240307090501-12345");
    }

    #[test]
    fn test_enum_string_forms() {
        assert_eq!(
            serde_json::to_string(&DataSource::OpenAq).unwrap(),
            "\"openaq_kaggle\""
        );
        assert_eq!(
            serde_json::to_string(&PermissionStatus::Revoked).unwrap(),
            "\"revoked\""
        );
        for source in DataSource::ALL {
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(json, format!("\"{}\"", source.as_str()));
            assert_eq!(serde_json::from_str::<DataSource>(&json).unwrap(), source);
        }
        for status in PermissionStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(serde_json::from_str::<PermissionStatus>(&json).unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_strings_rejected() {
        assert!(serde_json::from_str::<DataSource>("\"openaq\"").is_err());
        assert!(serde_json::from_str::<PermissionStatus>("\"GRANTED\"").is_err());
        assert!(serde_json::from_str::<PermissionStatus>("\"approved\"").is_err());
    }

    #[test]
    fn test_transition_table() {
        use PermissionStatus::*;

        assert_eq!(Pending.apply(Action::Grant), Some(Granted));
        assert_eq!(Pending.apply(Action::Deny), Some(Denied));
        assert_eq!(Pending.apply(Action::Revoke), None);
        assert_eq!(Granted.apply(Action::Revoke), Some(Revoked));
        assert_eq!(Granted.apply(Action::Grant), None);
        assert_eq!(Granted.apply(Action::Deny), None);

        for action in [Action::Grant, Action::Deny, Action::Revoke] {
            assert_eq!(Denied.apply(action), None);
            assert_eq!(Revoked.apply(action), None);
        }
    }

    #[test]
    fn test_action_table_agrees_with_apply() {
        for action in [Action::Grant, Action::Deny, Action::Revoke] {
            assert_eq!(
                action.required_status().apply(action),
                Some(action.target_status())
            );
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!PermissionStatus::Pending.is_terminal());
        assert!(!PermissionStatus::Granted.is_terminal());
        assert!(PermissionStatus::Denied.is_terminal());
        assert!(PermissionStatus::Revoked.is_terminal());
    }
}
