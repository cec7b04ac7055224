use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use meldo_core::models::category::Category;
use meldo_core::models::location::Location;
use meldo_core::models::report::{Report, Status};
use meldo_core::models::subscription::{Subscription, SubscriptionKind};
use meldo_core::models::user::User;
use meldo_core::policy;
use meldo_storage::{StateDir, keys};

use crate::error::StoreError;
use crate::notify::{Notification, NotificationSink};

/// Form input for a new report. All three required fields are optional
/// here so validation can name the one that is missing.
#[derive(Debug, Clone, Default)]
pub struct ReportDraft {
    pub category: Option<Category>,
    pub description: String,
    pub image: Option<String>,
    pub location: Option<Location>,
}

/// The single container for all mutable session state: identity,
/// reports, subscriptions, and toggles. Mutations go through methods,
/// never ambient globals.
pub struct AppState {
    storage: StateDir,
    pub device_id: String,
    pub current_user: Option<User>,
    pub reports: Vec<Report>,
    pub subscriptions: Vec<Subscription>,
    pub notify_on_status_change: bool,
    pub live_geocoder: bool,
}

impl AppState {
    /// Load every record from storage; missing or corrupt records fall
    /// back to their defaults. A fresh device id is minted and persisted
    /// on first run.
    pub fn load(storage: StateDir) -> Self {
        let device_id = match load_or_default::<Option<String>>(&storage, keys::DEVICE_ID) {
            Some(id) if !id.is_empty() => id,
            _ => {
                let id = Uuid::new_v4().to_string();
                persist(&storage, keys::DEVICE_ID, &id);
                id
            }
        };

        Self {
            device_id,
            current_user: load_or_default(&storage, keys::CURRENT_USER),
            reports: load_or_default(&storage, keys::REPORTS),
            subscriptions: load_or_default(&storage, keys::SUBSCRIPTIONS),
            notify_on_status_change: load_or_default::<Option<bool>>(
                &storage,
                keys::NOTIFY_ON_STATUS_CHANGE,
            )
            .unwrap_or(true),
            live_geocoder: load_or_default::<Option<bool>>(&storage, keys::LIVE_GEOCODER)
                .unwrap_or(false),
            storage,
        }
    }

    /// The acting identity: the logged-in user's id, or the device id
    /// for anonymous guests.
    pub fn identity(&self) -> &str {
        self.current_user
            .as_ref()
            .map(|u| u.id.as_str())
            .unwrap_or(&self.device_id)
    }

    fn now(&self) -> jiff::Timestamp {
        jiff::Timestamp::now()
    }

    fn report_mut(&mut self, id: i64) -> Result<&mut Report, StoreError> {
        self.reports
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::ReportNotFound(id))
    }

    fn report(&self, id: i64) -> Result<&Report, StoreError> {
        self.reports
            .iter()
            .find(|r| r.id == id)
            .ok_or(StoreError::ReportNotFound(id))
    }

    fn persist_reports(&self) {
        persist(&self.storage, keys::REPORTS, &self.reports);
    }

    /// Validate and create a new report. Returns the new id. Fires
    /// subscription-match notifications for the creation.
    pub fn submit(
        &mut self,
        draft: ReportDraft,
        sink: &dyn NotificationSink,
    ) -> Result<i64, StoreError> {
        let category = draft
            .category
            .ok_or_else(|| StoreError::Validation("please choose a category".to_string()))?;
        let description = draft.description.trim().to_string();
        if description.is_empty() {
            return Err(StoreError::Validation(
                "please describe the issue".to_string(),
            ));
        }
        let location = draft.location.ok_or_else(|| {
            StoreError::Validation("please pick a location on the map or enter an address".to_string())
        })?;

        let at = self.now();
        let mut id = at.as_millisecond();
        if let Some(max) = self.reports.iter().map(|r| r.id).max()
            && id <= max
        {
            id = max + 1;
        }

        let mut report = Report::new(
            id,
            category,
            description,
            location,
            Some(self.identity().to_string()),
            at,
        );
        report.image = draft.image;

        self.notify_subscribers(&report, "new report", sink);
        self.reports.insert(0, report);
        self.persist_reports();
        Ok(id)
    }

    /// Cycle a report's status forward. Allowed for moderators, admins,
    /// and the reporter themselves.
    pub fn advance_status(
        &mut self,
        id: i64,
        sink: &dyn NotificationSink,
    ) -> Result<Status, StoreError> {
        let user = self.current_user.clone();
        let identity = self.identity().to_string();
        let at = self.now();
        let notify_enabled = self.notify_on_status_change;

        let report = self.report_mut(id)?;
        if !policy::can_advance(user.as_ref(), &identity, report) {
            return Err(StoreError::Forbidden(
                "only moderators or the reporter can change the status".to_string(),
            ));
        }
        let status = report.advance(at);
        let snapshot = report.clone();
        self.persist_reports();

        if notify_enabled {
            self.notify_subscribers(&snapshot, &format!("status changed to {status}"), sink);
            if let Some(reporter) = &snapshot.reporter_id
                && reporter != &identity
            {
                sink.notify(&Notification {
                    report_id: snapshot.id,
                    title: format!("your report is now {status}"),
                    body: snapshot.description.clone(),
                });
            }
        }
        Ok(status)
    }

    /// One vote per identity; repeat votes are a silent no-op.
    pub fn vote(&mut self, id: i64) -> Result<usize, StoreError> {
        let voter = self.identity().to_string();
        let report = self.report_mut(id)?;
        let added = report.votes.add(voter);
        let count = report.votes.count();
        if added {
            self.persist_reports();
        }
        Ok(count)
    }

    fn require_moderator(&self) -> Result<(), StoreError> {
        if policy::can_moderate(self.current_user.as_ref()) {
            Ok(())
        } else {
            Err(StoreError::Forbidden(
                "moderator or admin role required".to_string(),
            ))
        }
    }

    pub fn approve(&mut self, id: i64) -> Result<(), StoreError> {
        self.require_moderator()?;
        self.report_mut(id)?.approved = true;
        self.persist_reports();
        Ok(())
    }

    /// Moderation rejection deletes the report outright. The caller is
    /// expected to have confirmed with the user.
    pub fn reject(&mut self, id: i64) -> Result<(), StoreError> {
        self.require_moderator()?;
        self.report(id)?;
        self.reports.retain(|r| r.id != id);
        self.persist_reports();
        Ok(())
    }

    /// Mark a report as routed to an external authority. Status is
    /// unchanged.
    pub fn forward(&mut self, id: i64, authority: &str) -> Result<(), StoreError> {
        self.require_moderator()?;
        let at = self.now();
        let report = self.report_mut(id)?;
        report.forwarded = true;
        report.forwarded_at = Some(at);
        report.forwarded_to = Some(authority.to_string());
        self.persist_reports();
        Ok(())
    }

    /// Delete a report. Gated to moderators/admins and the owner.
    pub fn remove(&mut self, id: i64) -> Result<(), StoreError> {
        let user = self.current_user.clone();
        let identity = self.identity().to_string();
        let report = self.report(id)?;
        if !policy::can_delete(user.as_ref(), &identity, report) {
            return Err(StoreError::Forbidden(
                "only moderators or the reporter can delete a report".to_string(),
            ));
        }
        self.reports.retain(|r| r.id != id);
        self.persist_reports();
        Ok(())
    }

    pub fn subscribe(&mut self, kind: SubscriptionKind, value: &str) -> Result<(), StoreError> {
        let subscription = Subscription::new(kind, value);
        if subscription.value.is_empty() {
            return Err(StoreError::Validation(
                "subscription value must not be empty".to_string(),
            ));
        }
        if self.subscriptions.iter().any(|s| s.same_as(&subscription)) {
            return Err(StoreError::DuplicateSubscription {
                kind: kind.to_string(),
                value: subscription.value,
            });
        }
        self.subscriptions.push(subscription);
        persist(&self.storage, keys::SUBSCRIPTIONS, &self.subscriptions);
        Ok(())
    }

    pub fn unsubscribe(&mut self, index: usize) -> Result<Subscription, StoreError> {
        if index >= self.subscriptions.len() {
            return Err(StoreError::SubscriptionNotFound(index));
        }
        let removed = self.subscriptions.remove(index);
        persist(&self.storage, keys::SUBSCRIPTIONS, &self.subscriptions);
        Ok(removed)
    }

    /// True if any subscription covers the given area or zip.
    pub fn subscription_matches(&self, area: &str, zip: &str) -> bool {
        self.subscriptions.iter().any(|s| s.covers(area, zip))
    }

    pub fn set_notify_on_status_change(&mut self, enabled: bool) {
        self.notify_on_status_change = enabled;
        persist(&self.storage, keys::NOTIFY_ON_STATUS_CHANGE, &enabled);
    }

    pub fn set_live_geocoder(&mut self, enabled: bool) {
        self.live_geocoder = enabled;
        persist(&self.storage, keys::LIVE_GEOCODER, &enabled);
    }

    /// Demo login: mints a local user with the given roles.
    pub fn login(&mut self, name: &str, is_admin: bool, is_moderator: bool) -> User {
        let mut user = User::new(Uuid::new_v4().to_string(), name.trim());
        user.is_admin = is_admin;
        user.is_moderator = is_moderator;
        persist(&self.storage, keys::CURRENT_USER, &user);
        self.current_user = Some(user.clone());
        user
    }

    pub fn logout(&mut self) {
        self.current_user = None;
        if let Err(e) = self.storage.delete(keys::CURRENT_USER) {
            warn!(error = %e, "failed to clear stored user");
        }
    }

    fn notify_subscribers(&self, report: &Report, event: &str, sink: &dyn NotificationSink) {
        if self.subscription_matches(report.area(), report.zip()) {
            sink.notify(&Notification {
                report_id: report.id,
                title: format!("{event} in {}", placename(report)),
                body: report.description.clone(),
            });
        }
    }
}

fn placename(report: &Report) -> String {
    let area = report.area();
    if area.is_empty() {
        report.zip().to_string()
    } else {
        area.to_string()
    }
}

fn load_or_default<T: serde::de::DeserializeOwned + Default>(storage: &StateDir, key: &str) -> T {
    match storage.load_state(key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            warn!(key, error = %e, "unreadable record, falling back to default");
            T::default()
        }
    }
}

/// Fire-and-forget persistence: a failed write is logged and swallowed,
/// the in-memory state stays authoritative for the session.
fn persist<T: Serialize>(storage: &StateDir, key: &str, value: &T) {
    if let Err(e) = storage.save_state(key, value) {
        warn!(key, error = %e, "persistence failed, keeping in-memory state");
    }
}
