//! Pushes stored events to a remote calendar without duplicating them.

use std::collections::HashSet;
use std::time::Duration;

use chrono_tz::Tz;
use tracing::{debug, info, warn};

use super::outcome::{SyncOutcome, SyncSummary};
use crate::error::VeenzoResult;
use crate::occurrence::DedupKey;
use crate::persisted::PersistedEvent;
use crate::remote::{RemoteCalendar, RemoteEvent, RemoteEventDraft, RemoteQuery};

/// A weekly series is one remote event carrying the RRULE, so every row of a
/// series syncs (and deletes) through that one event.
pub struct Reconciler<'a, R: RemoteCalendar + ?Sized> {
    remote: &'a R,
    throttle: Duration,
}

impl<'a, R: RemoteCalendar + ?Sized> Reconciler<'a, R> {
    pub fn new(remote: &'a R) -> Self {
        Reconciler {
            remote,
            throttle: Duration::ZERO,
        }
    }

    /// Pause between consecutive remote calls in [`Reconciler::sync_all`].
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Push one event. Failures are reported in the outcome, never returned.
    pub async fn sync_one(&self, event: &PersistedEvent, check_duplicate: bool) -> SyncOutcome {
        match self.try_sync_one(event, check_duplicate).await {
            Ok(outcome) => {
                debug!(title = %event.title, ?outcome, "synced event");
                outcome
            }
            Err(e) => {
                warn!(title = %event.title, date = %event.date(), error = %e, "sync failed");
                SyncOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_sync_one(
        &self,
        event: &PersistedEvent,
        check_duplicate: bool,
    ) -> VeenzoResult<SyncOutcome> {
        let draft = RemoteEventDraft::from_event(event)?;

        if check_duplicate {
            let key = event.remote_key();
            if let Some(existing) = self.find_existing(&key, event.occurrence.time_zone()).await? {
                return Ok(SyncOutcome::Skipped {
                    remote_id: existing.id,
                });
            }
        }

        let created = self.remote.create_event(&draft).await?;
        Ok(SyncOutcome::Created {
            remote_id: created.id,
        })
    }

    /// Sync every event in order, one remote call at a time, with duplicate
    /// checks on. Rows of a series count once, through the series.
    pub async fn sync_all(&self, events: &[PersistedEvent]) -> SyncSummary {
        let mut summary = SyncSummary::default();
        let mut seen_series = HashSet::new();

        for event in events {
            if let Some(series_id) = event.series_id()
                && !seen_series.insert(series_id.to_string())
            {
                continue;
            }

            if summary.total() > 0 && !self.throttle.is_zero() {
                tokio::time::sleep(self.throttle).await;
            }

            let outcome = self.sync_one(event, true).await;
            summary.record(&outcome);
        }

        info!(%summary, "sync finished");
        summary
    }

    /// Best-effort removal of the remote event that represents `event`.
    ///
    /// Returns the deleted remote id. A missing remote event or a failing
    /// remote is logged and yields `None`.
    pub async fn delete_one(&self, event: &PersistedEvent) -> Option<String> {
        let key = event.remote_key();
        match self.try_delete_one(&key, event.occurrence.time_zone()).await {
            Ok(Some(remote_id)) => {
                info!(%key, remote_id = %remote_id, "deleted remote event");
                Some(remote_id)
            }
            Ok(None) => {
                debug!(%key, "no remote event to delete");
                None
            }
            Err(e) => {
                warn!(%key, error = %e, "remote delete failed");
                None
            }
        }
    }

    async fn try_delete_one(&self, key: &DedupKey, tz: Tz) -> VeenzoResult<Option<String>> {
        let Some(existing) = self.find_existing(key, tz).await? else {
            return Ok(None);
        };
        self.remote.delete_event(&existing.id).await?;
        Ok(Some(existing.id))
    }

    async fn find_existing(&self, key: &DedupKey, tz: Tz) -> VeenzoResult<Option<RemoteEvent>> {
        let query = RemoteQuery::for_key(key, tz);
        let found = self.remote.list_events(&query).await?;
        Ok(found.into_iter().find(|remote| remote.matches(key, tz)))
    }
}

/// Rows whose remote counterpart should go after `deleted` were removed
/// locally.
///
/// One-off rows always qualify. A series qualifies once, and only when no row
/// of it is left in `remaining`.
pub fn removal_targets(
    deleted: &[PersistedEvent],
    remaining: &[PersistedEvent],
) -> Vec<PersistedEvent> {
    let live_series: HashSet<&str> = remaining.iter().filter_map(|e| e.series_id()).collect();
    let mut queued_series = HashSet::new();

    deleted
        .iter()
        .filter(|event| match event.series_id() {
            Some(series_id) => {
                !live_series.contains(series_id) && queued_series.insert(series_id.to_string())
            }
            None => true,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VeenzoError;
    use crate::event_spec::{EventSpec, RecurrenceKind};
    use crate::persisted::rows_from_spec;
    use crate::remote::RemoteStart;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory calendar. Titles listed in `reject` fail on create.
    #[derive(Default)]
    struct FakeRemote {
        events: Mutex<Vec<(RemoteEvent, RemoteEventDraft)>>,
        reject: Vec<String>,
        offline: bool,
        next_id: AtomicUsize,
    }

    impl FakeRemote {
        fn rejecting(title: &str) -> Self {
            FakeRemote {
                reject: vec![title.to_string()],
                ..Default::default()
            }
        }

        fn offline() -> Self {
            FakeRemote {
                offline: true,
                ..Default::default()
            }
        }

        fn drafts(&self) -> Vec<RemoteEventDraft> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|(_, draft)| draft.clone())
                .collect()
        }

        fn len(&self) -> usize {
            self.events.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RemoteCalendar for FakeRemote {
        async fn list_events(&self, query: &RemoteQuery) -> VeenzoResult<Vec<RemoteEvent>> {
            if self.offline {
                return Err(VeenzoError::Remote("connection refused".into()));
            }
            Ok(self
                .events
                .lock()
                .unwrap()
                .iter()
                .map(|(event, _)| event.clone())
                .filter(|event| match event.start {
                    RemoteStart::DateTime(dt) => dt >= query.time_min && dt < query.time_max,
                    RemoteStart::Date(_) => true,
                })
                .filter(|event| event.summary.contains(&query.text))
                .collect())
        }

        async fn create_event(&self, draft: &RemoteEventDraft) -> VeenzoResult<RemoteEvent> {
            if self.offline {
                return Err(VeenzoError::Remote("connection refused".into()));
            }
            if self.reject.contains(&draft.summary) {
                return Err(VeenzoError::RemoteAuth("token expired".into()));
            }
            let id = format!("remote-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
            let event = RemoteEvent {
                id,
                summary: draft.summary.clone(),
                start: RemoteStart::DateTime(draft.start.with_timezone(&Utc)),
            };
            self.events
                .lock()
                .unwrap()
                .push((event.clone(), draft.clone()));
            Ok(event)
        }

        async fn delete_event(&self, remote_id: &str) -> VeenzoResult<()> {
            if self.offline {
                return Err(VeenzoError::Remote("connection refused".into()));
            }
            self.events
                .lock()
                .unwrap()
                .retain(|(event, _)| event.id != remote_id);
            Ok(())
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn spec(title: &str, recurrence: RecurrenceKind, start: NaiveDate) -> EventSpec {
        EventSpec {
            title: title.to_string(),
            description: None,
            start_date: start,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_date: start,
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            recurrence,
            weekdays: vec![Weekday::Mon, Weekday::Wed],
            recurrence_end_date: Some(date(16)),
            time_zone: chrono_tz::America::Sao_Paulo,
        }
    }

    fn standup_series() -> Vec<PersistedEvent> {
        rows_from_spec(&spec("Standup", RecurrenceKind::Weekly, date(2)), "acme", "ana")
    }

    fn one_off(title: &str, day: u32) -> PersistedEvent {
        rows_from_spec(&spec(title, RecurrenceKind::None, date(day)), "acme", "ana").remove(0)
    }

    #[tokio::test]
    async fn sync_one_creates_then_skips() {
        let remote = FakeRemote::default();
        let reconciler = Reconciler::new(&remote);
        let event = one_off("Review", 5);

        let first = reconciler.sync_one(&event, true).await;
        assert!(matches!(first, SyncOutcome::Created { .. }));

        let second = reconciler.sync_one(&event, true).await;
        assert!(second.skipped());
        assert_eq!(second.remote_id(), first.remote_id());
        assert_eq!(remote.len(), 1);
    }

    #[tokio::test]
    async fn sync_one_without_check_creates_again() {
        let remote = FakeRemote::default();
        let reconciler = Reconciler::new(&remote);
        let event = one_off("Review", 5);

        reconciler.sync_one(&event, false).await;
        reconciler.sync_one(&event, false).await;
        assert_eq!(remote.len(), 2);
    }

    #[tokio::test]
    async fn sync_one_reports_failure_instead_of_raising() {
        let remote = FakeRemote::offline();
        let outcome = Reconciler::new(&remote)
            .sync_one(&one_off("Review", 5), true)
            .await;
        assert!(!outcome.success());
    }

    #[tokio::test]
    async fn sync_all_twice_skips_everything_the_second_time() {
        let remote = FakeRemote::default();
        let reconciler = Reconciler::new(&remote);

        let mut events = standup_series();
        events.push(one_off("Review", 5));
        events.push(one_off("Retro", 13));

        let first = reconciler.sync_all(&events).await;
        assert_eq!(
            first,
            SyncSummary {
                created: 3,
                skipped: 0,
                errored: 0
            }
        );

        let second = reconciler.sync_all(&events).await;
        assert_eq!(
            second,
            SyncSummary {
                created: 0,
                skipped: 3,
                errored: 0
            }
        );
        assert_eq!(remote.len(), 3);
    }

    #[tokio::test]
    async fn series_is_pushed_once_with_its_rule() {
        let remote = FakeRemote::default();
        let reconciler = Reconciler::new(&remote);
        let rows = standup_series();

        // Syncing a later row registers the series from its first occurrence
        reconciler.sync_one(&rows[2], true).await;
        let summary = reconciler.sync_all(&rows).await;
        assert_eq!(summary.skipped, 1);

        let drafts = remote.drafts();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].start.date_naive(), date(2));
        assert_eq!(
            drafts[0].recurrence,
            vec!["RRULE:FREQ=WEEKLY;BYDAY=MO,WE;UNTIL=20250617T025959Z".to_string()]
        );
    }

    #[tokio::test]
    async fn series_keeps_its_planned_start_across_a_dst_gap() {
        let tz = chrono_tz::Europe::Madrid;
        let night = EventSpec {
            title: "Night shift".to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 3, 23).unwrap(),
            start_time: NaiveTime::from_hms_opt(2, 30, 0).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 23).unwrap(),
            end_time: NaiveTime::from_hms_opt(4, 0, 0).unwrap(),
            recurrence: RecurrenceKind::Weekly,
            weekdays: vec![Weekday::Sun],
            recurrence_end_date: NaiveDate::from_ymd_opt(2025, 4, 6),
            time_zone: tz,
        };
        let mut rows = rows_from_spec(&night, "acme", "ana");
        // The first row is gone locally; the 30th was moved to 03:30
        rows.remove(0);
        assert_eq!(
            rows[0].occurrence.start.time(),
            NaiveTime::from_hms_opt(3, 30, 0).unwrap()
        );

        let remote = FakeRemote::default();
        let summary = Reconciler::new(&remote).sync_all(&rows).await;
        assert_eq!(summary.created, 1);

        let drafts = remote.drafts();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].start, tz.with_ymd_and_hms(2025, 3, 23, 2, 30, 0).unwrap());
        assert_eq!(drafts[0].end, tz.with_ymd_and_hms(2025, 3, 23, 4, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn failures_are_isolated_and_counted() {
        let remote = FakeRemote::rejecting("Retro");
        let reconciler = Reconciler::new(&remote);

        let events = vec![
            one_off("Review", 5),
            one_off("Retro", 13),
            one_off("Demo", 14),
        ];
        let summary = reconciler.sync_all(&events).await;

        assert_eq!(summary.to_string(), "2 synced, 0 skipped, 1 errors");
        assert_eq!(remote.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn sync_all_waits_between_calls() {
        let remote = FakeRemote::default();
        let reconciler = Reconciler::new(&remote).with_throttle(Duration::from_secs(1));
        let events = vec![one_off("Review", 5), one_off("Retro", 13), one_off("Demo", 14)];

        let started = tokio::time::Instant::now();
        reconciler.sync_all(&events).await;
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn delete_one_removes_the_match() {
        let remote = FakeRemote::default();
        let reconciler = Reconciler::new(&remote);
        let review = one_off("Review", 5);
        let retro = one_off("Retro", 13);
        reconciler.sync_all(&[review.clone(), retro]).await;

        assert!(reconciler.delete_one(&review).await.is_some());
        assert_eq!(remote.len(), 1);

        // Already gone
        assert!(reconciler.delete_one(&review).await.is_none());
        assert_eq!(remote.len(), 1);
    }

    #[tokio::test]
    async fn delete_one_swallows_remote_errors() {
        let remote = FakeRemote::offline();
        assert!(
            Reconciler::new(&remote)
                .delete_one(&one_off("Review", 5))
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn deleting_any_series_row_targets_the_series() {
        let remote = FakeRemote::default();
        let reconciler = Reconciler::new(&remote);
        let rows = standup_series();
        reconciler.sync_all(&rows).await;

        assert!(reconciler.delete_one(&rows[4]).await.is_some());
        assert_eq!(remote.len(), 0);
    }

    #[test]
    fn removal_targets_waits_for_the_last_series_row() {
        let rows = standup_series();
        let review = one_off("Review", 5);

        let partial = removal_targets(&[rows[1].clone(), review.clone()], &rows[2..]);
        assert_eq!(partial, vec![review]);

        let whole = removal_targets(&rows, &[]);
        assert_eq!(whole.len(), 1);
        assert_eq!(whole[0].series_id(), rows[0].series_id());
    }
}
