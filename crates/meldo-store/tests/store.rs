use std::cell::RefCell;

use meldo_core::models::category::Category;
use meldo_core::models::location::Location;
use meldo_core::models::report::Status;
use meldo_core::models::subscription::SubscriptionKind;
use meldo_storage::StateDir;
use meldo_store::{AppState, Notification, NotificationSink, ReportDraft, StoreError};

#[derive(Default)]
struct MemorySink(RefCell<Vec<Notification>>);

impl NotificationSink for MemorySink {
    fn notify(&self, notification: &Notification) {
        self.0.borrow_mut().push(notification.clone());
    }
}

impl MemorySink {
    fn titles(&self) -> Vec<String> {
        self.0.borrow().iter().map(|n| n.title.clone()).collect()
    }
}

fn fresh() -> (tempfile::TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::load(StateDir::new(dir.path()));
    (dir, state)
}

fn draft() -> ReportDraft {
    ReportDraft {
        category: Some(Category::Pothole),
        description: "deep pothole on Gotthardstraße".to_string(),
        image: None,
        location: Some(Location::new(51.3542, 11.9926, "Merseburg", "06217")),
    }
}

#[test]
fn submit_without_category_fails_and_leaves_list_unchanged() {
    let (_dir, mut state) = fresh();
    let sink = MemorySink::default();
    let result = state.submit(
        ReportDraft {
            category: None,
            ..draft()
        },
        &sink,
    );
    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert!(state.reports.is_empty());
}

#[test]
fn submit_with_blank_description_fails() {
    let (_dir, mut state) = fresh();
    let sink = MemorySink::default();
    let result = state.submit(
        ReportDraft {
            description: "   ".to_string(),
            ..draft()
        },
        &sink,
    );
    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert!(state.reports.is_empty());
}

#[test]
fn submit_without_location_fails() {
    let (_dir, mut state) = fresh();
    let sink = MemorySink::default();
    let result = state.submit(
        ReportDraft {
            location: None,
            ..draft()
        },
        &sink,
    );
    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert!(state.reports.is_empty());
}

#[test]
fn submitted_report_starts_in_initial_state() {
    let (_dir, mut state) = fresh();
    let sink = MemorySink::default();
    let id = state.submit(draft(), &sink).unwrap();

    let report = &state.reports[0];
    assert_eq!(report.id, id);
    assert_eq!(report.status, Status::Reported);
    assert!(!report.approved);
    assert_eq!(report.votes.count(), 0);
    assert_eq!(report.status_history.len(), 1);
    assert_eq!(report.status_history[0].status, Status::Reported);
    assert_eq!(report.reporter_id.as_deref(), Some(state.identity()));
}

#[test]
fn new_reports_are_prepended() {
    let (_dir, mut state) = fresh();
    let sink = MemorySink::default();
    let first = state.submit(draft(), &sink).unwrap();
    let second = state.submit(draft(), &sink).unwrap();
    assert!(second > first);
    assert_eq!(state.reports[0].id, second);
    assert_eq!(state.reports[1].id, first);
}

#[test]
fn reports_survive_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let sink = MemorySink::default();
    let id = {
        let mut state = AppState::load(StateDir::new(dir.path()));
        state.submit(draft(), &sink).unwrap()
    };
    let reloaded = AppState::load(StateDir::new(dir.path()));
    assert_eq!(reloaded.reports.len(), 1);
    assert_eq!(reloaded.reports[0].id, id);
}

#[test]
fn device_id_is_stable_across_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let first = AppState::load(StateDir::new(dir.path())).device_id.clone();
    let second = AppState::load(StateDir::new(dir.path())).device_id.clone();
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn reporter_can_advance_own_report_through_the_cycle() {
    let (_dir, mut state) = fresh();
    let sink = MemorySink::default();
    let id = state.submit(draft(), &sink).unwrap();

    assert_eq!(state.advance_status(id, &sink).unwrap(), Status::Accepted);
    assert_eq!(state.advance_status(id, &sink).unwrap(), Status::Resolved);
    assert_eq!(state.advance_status(id, &sink).unwrap(), Status::Reported);
    assert_eq!(state.reports[0].status_history.len(), 4);
}

#[test]
fn strangers_cannot_advance_someone_elses_report() {
    let (_dir, mut state) = fresh();
    let sink = MemorySink::default();
    let id = state.submit(draft(), &sink).unwrap();
    state.reports[0].reporter_id = Some("someone-else".to_string());

    let result = state.advance_status(id, &sink);
    assert!(matches!(result, Err(StoreError::Forbidden(_))));
    assert_eq!(state.reports[0].status, Status::Reported);
    assert_eq!(state.reports[0].status_history.len(), 1);
}

#[test]
fn moderators_can_advance_any_report() {
    let (_dir, mut state) = fresh();
    let sink = MemorySink::default();
    let id = state.submit(draft(), &sink).unwrap();
    state.reports[0].reporter_id = Some("someone-else".to_string());

    state.login("Jonas", false, true);
    assert_eq!(state.advance_status(id, &sink).unwrap(), Status::Accepted);
}

#[test]
fn double_vote_is_counted_once() {
    let (_dir, mut state) = fresh();
    let sink = MemorySink::default();
    let id = state.submit(draft(), &sink).unwrap();
    assert_eq!(state.vote(id).unwrap(), 1);
    assert_eq!(state.vote(id).unwrap(), 1);
}

#[test]
fn moderation_actions_require_a_moderator() {
    let (_dir, mut state) = fresh();
    let sink = MemorySink::default();
    let id = state.submit(draft(), &sink).unwrap();

    assert!(matches!(state.approve(id), Err(StoreError::Forbidden(_))));
    assert!(matches!(state.reject(id), Err(StoreError::Forbidden(_))));
    assert!(matches!(
        state.forward(id, "Tiefbauamt"),
        Err(StoreError::Forbidden(_))
    ));
    assert!(!state.reports[0].approved);
}

#[test]
fn approve_flips_the_flag_and_reject_deletes() {
    let (_dir, mut state) = fresh();
    let sink = MemorySink::default();
    let id = state.submit(draft(), &sink).unwrap();
    state.login("Sabine", true, false);

    state.approve(id).unwrap();
    assert!(state.reports[0].approved);

    state.reject(id).unwrap();
    assert!(state.reports.is_empty());
}

#[test]
fn forward_stamps_routing_metadata_without_touching_status() {
    let (_dir, mut state) = fresh();
    let sink = MemorySink::default();
    let id = state.submit(draft(), &sink).unwrap();
    state.login("Jonas", false, true);

    state.forward(id, "Tiefbauamt Saalekreis").unwrap();
    let report = &state.reports[0];
    assert!(report.forwarded);
    assert!(report.forwarded_at.is_some());
    assert_eq!(report.forwarded_to.as_deref(), Some("Tiefbauamt Saalekreis"));
    assert_eq!(report.status, Status::Reported);
    assert_eq!(report.status_history.len(), 1);
}

#[test]
fn owners_may_remove_their_report_but_strangers_may_not() {
    let (_dir, mut state) = fresh();
    let sink = MemorySink::default();
    let id = state.submit(draft(), &sink).unwrap();

    state.reports[0].reporter_id = Some("someone-else".to_string());
    assert!(matches!(state.remove(id), Err(StoreError::Forbidden(_))));

    state.reports[0].reporter_id = Some(state.identity().to_string());
    state.remove(id).unwrap();
    assert!(state.reports.is_empty());
}

#[test]
fn duplicate_subscriptions_are_rejected_case_insensitively() {
    let (_dir, mut state) = fresh();
    state.subscribe(SubscriptionKind::Area, "Merseburg").unwrap();
    let result = state.subscribe(SubscriptionKind::Area, "  merseburg ");
    assert!(matches!(
        result,
        Err(StoreError::DuplicateSubscription { .. })
    ));
    assert_eq!(state.subscriptions.len(), 1);

    // Same value under the other kind is a different subscription.
    state.subscribe(SubscriptionKind::Zip, "Merseburg").unwrap();
    assert_eq!(state.subscriptions.len(), 2);
}

#[test]
fn unsubscribe_checks_bounds() {
    let (_dir, mut state) = fresh();
    state.subscribe(SubscriptionKind::Zip, "06217").unwrap();
    assert!(matches!(
        state.unsubscribe(5),
        Err(StoreError::SubscriptionNotFound(5))
    ));
    let removed = state.unsubscribe(0).unwrap();
    assert_eq!(removed.value, "06217");
    assert!(state.subscriptions.is_empty());
}

#[test]
fn zip_subscription_triggers_on_matching_creation_only() {
    let (_dir, mut state) = fresh();
    state.subscribe(SubscriptionKind::Zip, "06217").unwrap();

    assert!(state.subscription_matches("Merseburg", "06217"));
    assert!(!state.subscription_matches("Leuna", "06237"));

    let sink = MemorySink::default();
    state.submit(draft(), &sink).unwrap();
    assert_eq!(sink.0.borrow().len(), 1);

    let other = MemorySink::default();
    state
        .submit(
            ReportDraft {
                location: Some(Location::new(51.317, 12.015, "Leuna", "06237")),
                ..draft()
            },
            &other,
        )
        .unwrap();
    assert!(other.0.borrow().is_empty());
}

#[test]
fn status_change_notifies_subscribers_and_reporter_when_enabled() {
    let (_dir, mut state) = fresh();
    state.subscribe(SubscriptionKind::Area, "Merseburg").unwrap();
    let sink = MemorySink::default();
    let id = state.submit(draft(), &sink).unwrap();
    // Hand the report to another reporter so the self-notification
    // suppression does not apply.
    state.reports[0].reporter_id = Some("someone-else".to_string());
    state.login("Jonas", false, true);

    let sink = MemorySink::default();
    state.advance_status(id, &sink).unwrap();
    let titles = sink.titles();
    assert!(titles.iter().any(|t| t.contains("status changed")));
    assert!(titles.iter().any(|t| t.contains("your report")));
}

#[test]
fn status_change_notifications_respect_the_toggle() {
    let (_dir, mut state) = fresh();
    state.subscribe(SubscriptionKind::Area, "Merseburg").unwrap();
    state.set_notify_on_status_change(false);
    let sink = MemorySink::default();
    let id = state.submit(draft(), &sink).unwrap();

    let sink = MemorySink::default();
    state.advance_status(id, &sink).unwrap();
    assert!(sink.0.borrow().is_empty());
}

#[test]
fn toggles_persist_across_reloads() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut state = AppState::load(StateDir::new(dir.path()));
        assert!(state.notify_on_status_change);
        assert!(!state.live_geocoder);
        state.set_notify_on_status_change(false);
        state.set_live_geocoder(true);
    }
    let reloaded = AppState::load(StateDir::new(dir.path()));
    assert!(!reloaded.notify_on_status_change);
    assert!(reloaded.live_geocoder);
}

#[test]
fn login_and_logout_round_trip_through_storage() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut state = AppState::load(StateDir::new(dir.path()));
        state.login("Erika", false, false);
    }
    {
        let state = AppState::load(StateDir::new(dir.path()));
        assert_eq!(state.current_user.as_ref().map(|u| u.name.as_str()), Some("Erika"));
    }
    {
        let mut state = AppState::load(StateDir::new(dir.path()));
        state.logout();
    }
    let state = AppState::load(StateDir::new(dir.path()));
    assert!(state.current_user.is_none());
}
