//! Random operation sequences checked against a simple model.

use proptest::prelude::*;

use airq_access::store::MemoryStore;
use airq_access::{Action, DataSource, PermissionRegistry, PermissionStatus, RegistryError, RequestId};
use airq_access_testkit::generators::{ops, Op};

/// Expected state of one request.
struct Expected {
    id: RequestId,
    requester: String,
    data_source: DataSource,
    status: PermissionStatus,
}

fn run(ops: &[Op]) -> Result<(), TestCaseError> {
    let mut registry = PermissionRegistry::new(MemoryStore::new()).unwrap();
    let mut model: Vec<Expected> = Vec::new();

    for op in ops {
        match op {
            Op::Create {
                requester,
                data_source,
                notes,
            } => {
                let created = registry
                    .create(requester, *data_source, "purpose", notes.as_deref())
                    .unwrap();
                prop_assert_eq!(created.status, PermissionStatus::Pending);
                prop_assert!(model.iter().all(|e| e.id != created.request_id));
                model.push(Expected {
                    id: created.request_id,
                    requester: requester.clone(),
                    data_source: *data_source,
                    status: PermissionStatus::Pending,
                });
            }
            Op::Transition {
                target,
                action,
                actor,
                notes,
            } => {
                if model.is_empty() {
                    continue;
                }
                let idx = target % model.len();
                let expected = &mut model[idx];
                let id = expected.id.as_str();
                let result = match action {
                    Action::Grant => registry.grant(id, actor, notes.as_deref()),
                    Action::Deny => registry.deny(id, actor, notes.as_deref()),
                    Action::Revoke => registry.revoke(id, actor, notes.as_deref()),
                };

                match (expected.status.apply(*action), result) {
                    (Some(next), Ok(updated)) => {
                        prop_assert_eq!(updated.status, next);
                        prop_assert_eq!(updated.granted_by.as_deref(), Some(actor.as_str()));
                        expected.status = next;
                    }
                    (None, Err(RegistryError::InvalidTransition { current, .. })) => {
                        prop_assert_eq!(current, expected.status);
                    }
                    (want, got) => {
                        return Err(TestCaseError::fail(format!(
                            "{action} from {}: expected {want:?}, got {got:?}",
                            expected.status
                        )))
                    }
                }
            }
            Op::Unknown { action } => {
                let result = match action {
                    Action::Grant => registry.grant("PR-missing", "x", None),
                    Action::Deny => registry.deny("PR-missing", "x", None),
                    Action::Revoke => registry.revoke("PR-missing", "x", None),
                };
                prop_assert!(matches!(result, Err(RegistryError::NotFound(_))));
            }
        }
    }

    prop_assert_eq!(registry.len(), model.len());
    for (request, expected) in registry.list_all().into_iter().zip(&model) {
        prop_assert_eq!(&request.request_id, &expected.id);
        prop_assert_eq!(request.status, expected.status);
        prop_assert!(request.updated_at >= request.created_at);
        prop_assert_eq!(
            request.granted_by.is_some(),
            request.status != PermissionStatus::Pending
        );
    }

    for requester in ["alice", "bob", "Yash Lunawat"] {
        for data_source in DataSource::ALL {
            let want = model.iter().any(|e| {
                e.requester == requester
                    && e.data_source == data_source
                    && e.status == PermissionStatus::Granted
            });
            prop_assert_eq!(registry.has_permission(requester, data_source), want);
        }
    }

    let before: Vec<_> = registry.list_all().into_iter().cloned().collect();
    let reloaded = PermissionRegistry::new(registry.into_store()).unwrap();
    let after: Vec<_> = reloaded.list_all().into_iter().cloned().collect();
    prop_assert_eq!(after, before);

    Ok(())
}

proptest! {
    #[test]
    fn test_registry_matches_model(sequence in ops(40)) {
        run(&sequence)?;
    }
}
