//! Query filters for listing requests.

use airq_access_core::{DataSource, PermissionRequest, PermissionStatus};

/// Criteria for [`PermissionRegistry::list`](crate::PermissionRegistry::list).
///
/// Every criterion that is set must match. An empty filter matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    /// Only requests in this status.
    pub status: Option<PermissionStatus>,
    /// Only requests for this source.
    pub data_source: Option<DataSource>,
    /// Only requests from this requester (exact match).
    pub requester: Option<String>,
}

impl RequestFilter {
    /// A filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one status.
    pub fn status(mut self, status: PermissionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restrict to one data source.
    pub fn data_source(mut self, data_source: DataSource) -> Self {
        self.data_source = Some(data_source);
        self
    }

    /// Restrict to one requester.
    pub fn requester(mut self, requester: impl Into<String>) -> Self {
        self.requester = Some(requester.into());
        self
    }

    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.data_source.is_none() && self.requester.is_none()
    }

    /// Check a request against every set criterion.
    pub fn matches(&self, request: &PermissionRequest) -> bool {
        self.status.map_or(true, |s| request.status == s)
            && self.data_source.map_or(true, |d| request.data_source == d)
            && self
                .requester
                .as_deref()
                .map_or(true, |r| request.requester == r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airq_access_core::{Action, RequestId};
    use chrono::{TimeZone, Utc};

    fn granted_world_bank(requester: &str) -> PermissionRequest {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut request = PermissionRequest::new(
            RequestId::from("PR-1"),
            requester,
            DataSource::WorldBankApi,
            "p",
            None,
            now,
        );
        request.apply(Action::Grant, "Admin", None, now).unwrap();
        request
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = RequestFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&granted_world_bank("User1")));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let request = granted_world_bank("User1");

        let all_match = RequestFilter::new()
            .status(PermissionStatus::Granted)
            .data_source(DataSource::WorldBankApi)
            .requester("User1");
        assert!(!all_match.is_empty());
        assert!(all_match.matches(&request));

        let wrong_source = all_match.clone().data_source(DataSource::OpenAq);
        assert!(!wrong_source.matches(&request));

        let wrong_status = all_match.clone().status(PermissionStatus::Pending);
        assert!(!wrong_status.matches(&request));

        let wrong_requester = all_match.requester("user1");
        assert!(!wrong_requester.matches(&request));
    }
}
