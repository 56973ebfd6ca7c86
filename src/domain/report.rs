//! Report snapshots and their load lifecycle
//!
//! A [`Report`] can only be built from counts that pass validation, so any
//! code holding one may render and export without re-checking. The
//! [`ReportState`] machine tracks which load request a snapshot belongs to
//! so a slow, superseded load can never replace a newer one.

use thiserror::Error;

use super::filter::FilterCriteria;
use super::stats::{DomainError, ReportSummary, StatsSnapshot};
use super::task::TaskRecord;

/// A validated, materialized report
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub filters: FilterCriteria,
    pub summary: ReportSummary,
    pub tasks: Vec<TaskRecord>,
}

impl Report {
    /// Validates the stats and freezes the task snapshot
    pub fn build(
        filters: FilterCriteria,
        stats: StatsSnapshot,
        tasks: Vec<TaskRecord>,
    ) -> Result<Self, DomainError> {
        let summary = stats.summarize()?;
        Ok(Self {
            filters,
            summary,
            tasks,
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Request {got} is stale; request {current} is in flight")]
    Stale { got: u64, current: u64 },

    #[error("No load in flight (state: {0})")]
    NotLoading(&'static str),
}

/// Lifecycle of a report load
///
/// Request ids only ever grow, across resets too.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportState {
    Idle {
        last: u64,
    },
    Loading {
        request: u64,
    },
    Ready {
        request: u64,
        report: Report,
    },
    Failed {
        request: u64,
        message: String,
    },
}

impl Default for ReportState {
    fn default() -> Self {
        ReportState::Idle { last: 0 }
    }
}

impl ReportState {
    pub fn name(&self) -> &'static str {
        match self {
            ReportState::Idle { .. } => "idle",
            ReportState::Loading { .. } => "loading",
            ReportState::Ready { .. } => "ready",
            ReportState::Failed { .. } => "failed",
        }
    }

    /// Starts a new load, superseding whatever came before
    ///
    /// Returns the request id the result must be delivered with.
    pub fn begin(&mut self) -> u64 {
        let request = self.last_request() + 1;
        *self = ReportState::Loading { request };
        request
    }

    /// Delivers a loaded report for `request`
    pub fn resolve(&mut self, request: u64, report: Report) -> Result<(), StateError> {
        self.expect_loading(request)?;
        *self = ReportState::Ready { request, report };
        Ok(())
    }

    /// Records a failed load for `request`
    pub fn fail(&mut self, request: u64, message: impl Into<String>) -> Result<(), StateError> {
        self.expect_loading(request)?;
        *self = ReportState::Failed {
            request,
            message: message.into(),
        };
        Ok(())
    }

    /// Returns to idle; the request counter carries over
    pub fn reset(&mut self) {
        *self = ReportState::Idle {
            last: self.last_request(),
        };
    }

    /// Returns the report when ready
    pub fn report(&self) -> Option<&Report> {
        match self {
            ReportState::Ready { report, .. } => Some(report),
            _ => None,
        }
    }

    /// Consumes the state, yielding the report when ready
    pub fn into_report(self) -> Option<Report> {
        match self {
            ReportState::Ready { report, .. } => Some(report),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ReportState::Loading { .. })
    }

    fn last_request(&self) -> u64 {
        match self {
            ReportState::Idle { last } => *last,
            ReportState::Loading { request }
            | ReportState::Ready { request, .. }
            | ReportState::Failed { request, .. } => *request,
        }
    }

    fn expect_loading(&self, request: u64) -> Result<(), StateError> {
        match self {
            ReportState::Loading { request: current } if *current == request => Ok(()),
            ReportState::Loading { request: current } => Err(StateError::Stale {
                got: request,
                current: *current,
            }),
            other => Err(StateError::NotLoading(other.name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(completed: i64, pending: i64) -> Report {
        Report::build(
            FilterCriteria::new(),
            StatsSnapshot::new(completed, pending),
            vec![TaskRecord::new("Only task")],
        )
        .unwrap()
    }

    #[test]
    fn build_rejects_negative_counts() {
        let result = Report::build(FilterCriteria::new(), StatsSnapshot::new(-1, 0), vec![]);
        assert!(matches!(result, Err(DomainError::InvalidCount { .. })));
    }

    #[test]
    fn load_lifecycle() {
        let mut state = ReportState::default();
        assert_eq!(state.name(), "idle");
        assert!(state.report().is_none());

        let request = state.begin();
        assert!(state.is_loading());

        state.resolve(request, report(1, 1)).unwrap();
        assert_eq!(state.name(), "ready");
        assert_eq!(state.report().unwrap().summary.completion_rate, 50);

        state.reset();
        assert_eq!(state, ReportState::Idle { last: request });
    }

    #[test]
    fn stale_result_is_rejected() {
        let mut state = ReportState::default();
        let first = state.begin();
        let second = state.begin();
        assert!(second > first);

        let err = state.resolve(first, report(0, 1)).unwrap_err();
        assert_eq!(
            err,
            StateError::Stale {
                got: first,
                current: second
            }
        );
        // still waiting on the newer request
        assert!(state.is_loading());

        state.resolve(second, report(2, 0)).unwrap();
        assert_eq!(state.report().unwrap().summary.completed, 2);
    }

    #[test]
    fn failure_is_recorded() {
        let mut state = ReportState::default();
        let request = state.begin();

        state.fail(request, "backend unavailable").unwrap();
        assert_eq!(
            state,
            ReportState::Failed {
                request,
                message: "backend unavailable".to_string()
            }
        );
        assert!(state.report().is_none());
    }

    #[test]
    fn resolve_without_load_is_an_error() {
        let mut state = ReportState::default();
        assert_eq!(
            state.resolve(1, report(1, 0)),
            Err(StateError::NotLoading("idle"))
        );
    }

    #[test]
    fn request_ids_keep_increasing_after_completion() {
        let mut state = ReportState::default();
        let first = state.begin();
        state.fail(first, "boom").unwrap();

        let second = state.begin();
        assert_eq!(second, first + 1);
    }

    #[test]
    fn reset_does_not_reuse_request_ids() {
        let mut state = ReportState::default();
        let old = state.begin();
        state.reset();

        let new = state.begin();
        assert!(new > old);

        let err = state.resolve(old, report(9, 0)).unwrap_err();
        assert_eq!(err, StateError::Stale { got: old, current: new });
        assert!(state.is_loading());

        state.resolve(new, report(1, 1)).unwrap();
        assert_eq!(state.report().unwrap().summary.completed, 1);
    }
}
