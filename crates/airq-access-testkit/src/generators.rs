//! Proptest generators for property-based testing.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use airq_access_core::{Action, DataSource, PermissionRequest, PermissionStatus, RequestId};

/// Generate a data source.
pub fn data_source() -> impl Strategy<Value = DataSource> {
    prop_oneof![
        Just(DataSource::WorldBankApi),
        Just(DataSource::OpenAq),
        Just(DataSource::Custom),
    ]
}

/// Generate a status.
pub fn status() -> impl Strategy<Value = PermissionStatus> {
    prop_oneof![
        Just(PermissionStatus::Pending),
        Just(PermissionStatus::Granted),
        Just(PermissionStatus::Denied),
        Just(PermissionStatus::Revoked),
    ]
}

/// Generate an action.
pub fn action() -> impl Strategy<Value = Action> {
    prop_oneof![Just(Action::Grant), Just(Action::Deny), Just(Action::Revoke)]
}

/// Generate a requester from a small pool, so requests collide on purpose.
pub fn requester() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("alice".to_string()),
        Just("bob".to_string()),
        Just("Yash Lunawat".to_string()),
    ]
}

/// Generate free text, including non-ASCII and the empty string.
pub fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,'é漢-]{0,24}".prop_map(String::from)
}

/// Generate a timestamp in 2000..2040 with microsecond precision.
pub fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800i64..2_208_988_800i64, 0u32..1_000_000).prop_map(|(secs, micros)| {
        Utc.timestamp_opt(secs, micros * 1_000)
            .single()
            .unwrap_or_default()
    })
}

/// One step against a registry.
///
/// Transitions name their target by index into the ids created so far
/// (taken modulo the count), so every sequence is replayable.
#[derive(Debug, Clone)]
pub enum Op {
    Create {
        requester: String,
        data_source: DataSource,
        notes: Option<String>,
    },
    Transition {
        target: usize,
        action: Action,
        actor: String,
        notes: Option<String>,
    },
    Unknown {
        action: Action,
    },
}

/// Generate a single operation, weighted toward transitions.
pub fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (requester(), data_source(), proptest::option::of(text())).prop_map(
            |(requester, data_source, notes)| Op::Create {
                requester,
                data_source,
                notes,
            }
        ),
        6 => (any::<usize>(), action(), requester(), proptest::option::of(text())).prop_map(
            |(target, action, actor, notes)| Op::Transition {
                target,
                action,
                actor,
                notes,
            }
        ),
        1 => action().prop_map(|action| Op::Unknown { action }),
    ]
}

/// Generate a sequence of up to `max_len` operations.
pub fn ops(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op(), 0..=max_len)
}

/// Parameters for generating a stored request.
#[derive(Debug, Clone)]
pub struct RequestParams {
    pub seq: usize,
    pub requester: String,
    pub data_source: DataSource,
    pub purpose: String,
    pub created_at: DateTime<Utc>,
    /// Actions applied in order; ones invalid for the current status are skipped.
    pub actions: Vec<(Action, String)>,
    pub notes: Option<String>,
}

impl Arbitrary for RequestParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            1usize..=9999,
            requester(),
            data_source(),
            text(),
            timestamp(),
            prop::collection::vec((action(), requester()), 0..4),
            proptest::option::of(text()),
        )
            .prop_map(
                |(seq, requester, data_source, purpose, created_at, actions, notes)| {
                    RequestParams {
                        seq,
                        requester,
                        data_source,
                        purpose,
                        created_at,
                        actions,
                        notes,
                    }
                },
            )
            .boxed()
    }
}

/// Build a request from parameters, one hour per applied action.
pub fn request_from_params(params: &RequestParams) -> PermissionRequest {
    let mut request = PermissionRequest::new(
        RequestId::generate(params.created_at, params.seq),
        params.requester.clone(),
        params.data_source,
        params.purpose.clone(),
        params.notes.clone(),
        params.created_at,
    );

    let mut now = params.created_at;
    for (action, actor) in &params.actions {
        now += Duration::hours(1);
        let _ = request.apply(*action, actor.clone(), None, now);
    }
    request
}
