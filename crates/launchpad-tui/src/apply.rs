//! Controller for the apply panel: the slide-in view of one scheme with its
//! nested how-to-apply, report and sign-in panels.

use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use launchpad_core::{
    DescriptionOverflow, DetailsLoad, LaunchpadError, LoadTicket, ModalVisibility, Panel, Scheme,
    SchemeDetails, ScrollLock, ScrollLockGuard,
};
use launchpad_service::{BlockingHttpService, ServiceError};

use crate::components::report_form::ReportForm;

pub const REPORT_CREATED_MESSAGE: &str = "Report created successfully!";
pub const REPORT_FAILED_MESSAGE: &str = "Failed to create report. Please try again later.";

type DetailsResult = Result<SchemeDetails, ServiceError>;

/// A detail fetch in flight, tagged with the cycle it belongs to.
struct PendingLoad {
    ticket: LoadTicket,
    rx: Receiver<DetailsResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft was incomplete; the form shows a hint.
    Invalid,
    /// No token; the sign-in prompt was opened instead.
    SignInRequired,
    Created,
    Failed,
}

impl SubmitOutcome {
    /// Message for the blocking alert, if this outcome raises one.
    pub fn alert(&self) -> Option<&'static str> {
        match self {
            SubmitOutcome::Created => Some(REPORT_CREATED_MESSAGE),
            SubmitOutcome::Failed => Some(REPORT_FAILED_MESSAGE),
            SubmitOutcome::Invalid | SubmitOutcome::SignInRequired => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The scheme has no apply link, so saving is not offered.
    NotOffered,
    SignInRequired,
    Saved,
    Failed,
}

pub struct ApplyModal {
    scheme: Option<Scheme>,
    visibility: ModalVisibility,
    load: DetailsLoad,
    pending: Option<PendingLoad>,
    overflow: DescriptionOverflow,
    pub report: ReportForm,
    lock: ScrollLock,
    /// Held exactly while the primary panel is open.
    guard: Option<ScrollLockGuard>,
    scroll: u16,
}

impl ApplyModal {
    pub fn new(lock: ScrollLock) -> Self {
        Self {
            scheme: None,
            visibility: ModalVisibility::default(),
            load: DetailsLoad::default(),
            pending: None,
            overflow: DescriptionOverflow::default(),
            report: ReportForm::default(),
            lock,
            guard: None,
            scroll: 0,
        }
    }

    /// Show `scheme` and start fetching its criteria and documents.
    ///
    /// Any fetch still in flight for a previous scheme is abandoned.
    pub fn present(&mut self, scheme: Option<Scheme>, service: &BlockingHttpService) {
        self.scheme = scheme;
        self.pending = None;
        self.report.reset();
        self.scroll = 0;

        match self.load.begin(self.scheme.as_ref()) {
            Some(ticket) => {
                tracing::debug!(scheme_id = ticket.scheme_id(), "fetching scheme details");
                let rx = service.spawn_scheme_details(ticket.scheme_id());
                self.pending = Some(PendingLoad { ticket, rx });
            }
            None => {
                let title = self.scheme.as_ref().map(|s| s.title.as_str());
                tracing::warn!(?title, "scheme has no id, not fetching details");
            }
        }
    }

    /// Open or close the primary panel. Only transitions touch the lock.
    pub fn set_open(&mut self, open: bool) {
        if open && !self.visibility.primary() {
            self.visibility.open_primary();
            self.guard = Some(self.lock.acquire());
        } else if !open && self.visibility.primary() {
            self.visibility.close_primary();
            self.guard = None;
        }
    }

    pub fn is_open(&self) -> bool {
        self.visibility.primary()
    }

    /// Apply a finished fetch, if one has arrived. Returns `true` if the
    /// outcome changed.
    pub fn poll_load(&mut self) -> bool {
        let Some(pending) = &self.pending else {
            return false;
        };
        let result = match pending.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                Err(ServiceError::Internal("details task ended without a result".into()))
            }
        };
        self.settle(result)
    }

    /// Block until the fetch in flight settles or `timeout` passes.
    pub fn wait_load(&mut self, timeout: Duration) -> bool {
        let Some(pending) = &self.pending else {
            return false;
        };
        let result = match pending.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => return false,
            Err(RecvTimeoutError::Disconnected) => {
                Err(ServiceError::Internal("details task ended without a result".into()))
            }
        };
        self.settle(result)
    }

    fn settle(&mut self, result: DetailsResult) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        if let Err(ref e) = result {
            tracing::error!(scheme_id = pending.ticket.scheme_id(), error = %e, "failed to load scheme details");
        }
        self.load.resolve(pending.ticket, result)
    }

    /// Open the report form, or the sign-in prompt when there is no token.
    pub fn open_report(&mut self, token: Option<&str>) -> Panel {
        let panel = if token.is_some() {
            Panel::ReportForm
        } else {
            Panel::SavePrompt
        };
        self.visibility.open(panel);
        panel
    }

    pub fn cancel_report(&mut self) {
        self.report.reset();
        self.visibility.close(Panel::ReportForm);
    }

    pub fn submit_report(
        &mut self,
        service: &BlockingHttpService,
        token: Option<&str>,
    ) -> SubmitOutcome {
        let Some(token) = token else {
            self.visibility.open(Panel::SavePrompt);
            return SubmitOutcome::SignInRequired;
        };
        let report = match self.report.draft.validate() {
            Ok(report) => report,
            Err(LaunchpadError::InvalidScheme) => {
                self.report.set_hint(launchpad_core::details::INVALID_SCHEME_MESSAGE);
                return SubmitOutcome::Invalid;
            }
            Err(LaunchpadError::InvalidInput(msg)) => {
                self.report.set_hint(msg);
                return SubmitOutcome::Invalid;
            }
        };

        match service.submit_report(&report, token) {
            Ok(()) => {
                tracing::info!(scheme_id = report.scheme_id, category = %report.report_category, "report created");
                self.report.reset();
                self.visibility.close(Panel::ReportForm);
                SubmitOutcome::Created
            }
            Err(e) => {
                tracing::error!(scheme_id = report.scheme_id, error = %e, "error submitting report");
                SubmitOutcome::Failed
            }
        }
    }

    pub fn save_for_later(
        &mut self,
        service: &BlockingHttpService,
        token: Option<&str>,
    ) -> SaveOutcome {
        let Some(scheme_id) = self
            .scheme
            .as_ref()
            .filter(|s| s.apply_link().is_some())
            .and_then(|s| s.id)
        else {
            return SaveOutcome::NotOffered;
        };
        let Some(token) = token else {
            self.visibility.open(Panel::SavePrompt);
            return SaveOutcome::SignInRequired;
        };

        match service.save_scheme(scheme_id, token) {
            Ok(()) => {
                tracing::info!(scheme_id, "scheme saved");
                self.visibility.show_toast();
                SaveOutcome::Saved
            }
            Err(e) => {
                tracing::warn!(scheme_id, error = %e, "failed to save scheme");
                self.visibility.open(Panel::SavePrompt);
                SaveOutcome::Failed
            }
        }
    }

    pub fn open_how_to_apply(&mut self) -> bool {
        self.visibility.open(Panel::HowToApply)
    }

    pub fn close(&mut self, panel: Panel) {
        if panel == Panel::Primary {
            self.set_open(false);
        } else {
            self.visibility.close(panel);
        }
    }

    pub fn hide_toast(&mut self) {
        self.visibility.hide_toast();
    }

    pub fn toggle_description(&mut self) {
        self.overflow.toggle();
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.scroll = self.scroll.saturating_add(rows);
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.scroll = self.scroll.saturating_sub(rows);
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scheme(&self) -> Option<&Scheme> {
        self.scheme.as_ref()
    }

    pub fn visibility(&self) -> &ModalVisibility {
        &self.visibility
    }

    pub fn load(&self) -> &DetailsLoad {
        &self.load
    }

    pub fn is_fetching(&self) -> bool {
        self.pending.is_some()
    }

    pub fn overflow(&self) -> &DescriptionOverflow {
        &self.overflow
    }

    pub fn overflow_mut(&mut self) -> &mut DescriptionOverflow {
        &mut self.overflow
    }

    pub fn holds_scroll_lock(&self) -> bool {
        self.guard.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These exercise the paths that never reach the network.
    fn offline_service() -> BlockingHttpService {
        BlockingHttpService::new("http://127.0.0.1:9").unwrap()
    }

    #[test]
    fn lock_follows_primary_panel() {
        let lock = ScrollLock::new();
        let mut modal = ApplyModal::new(lock.clone());
        assert!(!lock.is_locked());

        modal.set_open(true);
        modal.set_open(true);
        assert_eq!(lock.holders(), 1);

        modal.set_open(false);
        assert!(!lock.is_locked());
        assert!(!modal.holds_scroll_lock());
    }

    #[test]
    fn dropping_open_modal_releases_lock() {
        let lock = ScrollLock::new();
        let mut modal = ApplyModal::new(lock.clone());
        modal.set_open(true);
        drop(modal);
        assert!(!lock.is_locked());
    }

    #[test]
    fn scheme_without_id_fails_without_fetching() {
        let svc = offline_service();
        let mut modal = ApplyModal::new(ScrollLock::new());
        modal.present(
            Some(Scheme {
                title: "No id".into(),
                ..Default::default()
            }),
            &svc,
        );
        assert!(!modal.is_fetching());
        assert_eq!(
            modal.load().error(),
            Some(launchpad_core::details::INVALID_SCHEME_MESSAGE)
        );
        assert!(!modal.poll_load());
    }

    #[test]
    fn report_requires_token() {
        let mut modal = ApplyModal::new(ScrollLock::new());
        modal.set_open(true);
        assert_eq!(modal.open_report(None), Panel::SavePrompt);
        assert!(!modal.visibility().is_open(Panel::ReportForm));
        assert_eq!(modal.open_report(Some("tok")), Panel::ReportForm);
        assert_eq!(modal.visibility().topmost(), Some(Panel::SavePrompt));
    }

    #[test]
    fn incomplete_draft_sets_hint() {
        let svc = offline_service();
        let mut modal = ApplyModal::new(ScrollLock::new());
        modal.set_open(true);
        modal.open_report(Some("tok"));
        modal.report.draft.set_description(1, "wrong title");

        let outcome = modal.submit_report(&svc, Some("tok"));
        assert_eq!(outcome, SubmitOutcome::Invalid);
        assert_eq!(outcome.alert(), None);
        assert_eq!(modal.report.hint(), Some("category is required"));
        assert!(modal.visibility().is_open(Panel::ReportForm));
    }

    #[test]
    fn missing_token_wins_over_incomplete_draft() {
        let svc = offline_service();
        let mut modal = ApplyModal::new(ScrollLock::new());
        modal.set_open(true);
        modal.open_report(Some("tok"));

        let outcome = modal.submit_report(&svc, None);
        assert_eq!(outcome, SubmitOutcome::SignInRequired);
        assert_eq!(modal.visibility().topmost(), Some(Panel::SavePrompt));
        assert_eq!(modal.report.hint(), None);
    }

    #[test]
    fn cancel_report_discards_draft() {
        let mut modal = ApplyModal::new(ScrollLock::new());
        modal.set_open(true);
        modal.open_report(Some("tok"));
        modal.report.draft.set_description(1, "half written");
        modal.cancel_report();
        assert!(modal.report.draft.is_empty());
        assert!(!modal.visibility().is_open(Panel::ReportForm));
        assert!(modal.is_open());
    }

    #[test]
    fn save_not_offered_without_link() {
        let svc = offline_service();
        let mut modal = ApplyModal::new(ScrollLock::new());
        modal.present(
            Some(Scheme {
                id: Some(2),
                ..Default::default()
            }),
            &svc,
        );
        modal.set_open(true);
        assert_eq!(modal.save_for_later(&svc, Some("tok")), SaveOutcome::NotOffered);
        assert!(!modal.visibility().any_nested_open());
    }

    #[test]
    fn closing_primary_closes_everything() {
        let mut modal = ApplyModal::new(ScrollLock::new());
        modal.set_open(true);
        modal.open_how_to_apply();
        modal.open_report(Some("tok"));
        modal.close(Panel::Primary);
        assert_eq!(modal.visibility().topmost(), None);
        assert!(!modal.holds_scroll_lock());
    }
}
