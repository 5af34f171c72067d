use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use shared_types::{CreatedBooking, ProviderSchedule, ServiceAvailability};

use super::availability::available_dates_in_month;
use super::backend::{BookingBackend, SessionShell};
use super::calendar::{CalendarView, MonthWindow};
use super::notification::{Notification, SCHEDULE_FETCH_FAILED, SLOT_FETCH_FAILED};
use super::selection::BookingSelection;
use super::slots::{SlotBoard, SlotOutcome, SlotTicket};
use super::submitter::{BookingSubmitter, PendingSubmission, SubmitOutcome};
use crate::error::BookingError;
use crate::utils::timezone::{resolve_timezone, today_in};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPolicy {
    /// How many months past the current one a customer may browse.
    pub horizon_months: u32,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self { horizon_months: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleTicket {
    seq: u64,
    pub provider_id: String,
    pub month: MonthWindow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Applied,
    Failed,
    /// A newer fetch was issued before this one resolved.
    Stale,
    /// The provider's "today" falls in another month. The session moved there
    /// and the returned fetch must be run as well.
    Moved(ScheduleTicket),
}

impl ScheduleOutcome {
    pub fn is_stale(&self) -> bool {
        matches!(self, ScheduleOutcome::Stale)
    }

    pub fn into_refetch(self) -> Option<ScheduleTicket> {
        match self {
            ScheduleOutcome::Moved(ticket) => Some(ticket),
            _ => None,
        }
    }
}

/// State of one customer's booking flow for one provider.
///
/// Every remote call is split into a `begin_*` step that hands out a ticket
/// and an `apply_*`/`finish_*` step that consumes the result, so a host can
/// await the backend without keeping the session borrowed. Results for
/// superseded tickets are dropped.
pub struct BookingSession<B, S> {
    backend: B,
    shell: S,
    policy: BookingPolicy,
    provider_id: String,
    now: DateTime<Utc>,
    tz: Tz,
    month: MonthWindow,
    /// Set once the month reflects the provider's timezone or the user navigated.
    month_settled: bool,
    schedule: Option<ProviderSchedule>,
    available: Vec<NaiveDate>,
    schedule_loading: bool,
    schedule_seq: u64,
    service_id: Option<String>,
    selected_date: Option<NaiveDate>,
    slots: SlotBoard,
    submitter: BookingSubmitter,
}

impl<B: BookingBackend, S: SessionShell> BookingSession<B, S> {
    pub fn new(
        backend: B,
        shell: S,
        provider_id: impl Into<String>,
        now: DateTime<Utc>,
        policy: BookingPolicy,
    ) -> Self {
        let tz = Tz::UTC;
        Self {
            backend,
            shell,
            policy,
            provider_id: provider_id.into(),
            now,
            tz,
            month: MonthWindow::containing(today_in(now, tz)),
            month_settled: false,
            schedule: None,
            available: Vec::new(),
            schedule_loading: false,
            schedule_seq: 0,
            service_id: None,
            selected_date: None,
            slots: SlotBoard::default(),
            submitter: BookingSubmitter::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn today(&self) -> NaiveDate {
        today_in(self.now, self.tz)
    }

    pub fn month(&self) -> MonthWindow {
        self.month
    }

    pub fn schedule(&self) -> Option<&ProviderSchedule> {
        self.schedule.as_ref()
    }

    pub fn available_dates(&self) -> &[NaiveDate] {
        &self.available
    }

    pub fn is_schedule_loading(&self) -> bool {
        self.schedule_loading
    }

    pub fn service_id(&self) -> Option<&str> {
        self.service_id.as_deref()
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn slots(&self) -> &SlotBoard {
        &self.slots
    }

    pub fn is_submitting(&self) -> bool {
        self.submitter.is_submitting()
    }

    pub fn calendar_view(&self) -> CalendarView {
        CalendarView::build(self.month, &self.available, self.today(), self.selected_date)
    }

    // ---- schedule -------------------------------------------------------

    pub fn begin_schedule_fetch(&mut self) -> ScheduleTicket {
        self.schedule_seq += 1;
        self.schedule_loading = true;
        ScheduleTicket {
            seq: self.schedule_seq,
            provider_id: self.provider_id.clone(),
            month: self.month,
        }
    }

    pub fn apply_schedule(
        &mut self,
        ticket: ScheduleTicket,
        result: Result<ProviderSchedule, BookingError>,
    ) -> ScheduleOutcome {
        if ticket.seq != self.schedule_seq {
            tracing::debug!(month = %ticket.month.label(), "dropping stale schedule response");
            return ScheduleOutcome::Stale;
        }
        self.schedule_loading = false;

        match result {
            Ok(schedule) => {
                self.tz = resolve_timezone(schedule.timezone.as_deref());
                if !self.month_settled {
                    self.month_settled = true;
                    let home = MonthWindow::containing(self.today());
                    if home != self.month {
                        tracing::debug!(
                            from = %self.month.label(),
                            to = %home.label(),
                            "moving to the provider's current month"
                        );
                        self.show_month(home);
                        return ScheduleOutcome::Moved(self.begin_schedule_fetch());
                    }
                }
                self.available = available_dates_in_month(&self.month, Some(&schedule), self.tz);
                self.schedule = Some(schedule);
                ScheduleOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(provider_id = %self.provider_id, error = %err, "schedule fetch failed");
                self.schedule = None;
                self.available.clear();
                self.shell
                    .notify(Notification::destructive(SCHEDULE_FETCH_FAILED, err.to_string()));
                ScheduleOutcome::Failed
            }
        }
    }

    fn first_month(&self) -> MonthWindow {
        MonthWindow::containing(self.today())
    }

    pub fn can_show_month(&self, month: &MonthWindow) -> bool {
        let offset = month.months_since(&self.first_month());
        offset >= 0 && offset <= self.policy.horizon_months as i32
    }

    pub fn can_go_back(&self) -> bool {
        self.month.offset(-1).is_some_and(|month| self.can_show_month(&month))
    }

    pub fn can_go_forward(&self) -> bool {
        self.month.offset(1).is_some_and(|month| self.can_show_month(&month))
    }

    /// Moves the visible month. The date and time selection do not survive it.
    pub fn navigate_month(&mut self, offset: i32) -> Option<ScheduleTicket> {
        let target = self.month.offset(offset)?;
        if offset == 0 || !self.can_show_month(&target) {
            return None;
        }
        self.month_settled = true;
        self.show_month(target);
        Some(self.begin_schedule_fetch())
    }

    fn show_month(&mut self, month: MonthWindow) {
        self.month = month;
        self.schedule = None;
        self.available.clear();
        self.selected_date = None;
        self.slots.reset();
    }

    // ---- service, date and time ----------------------------------------

    pub fn is_selectable(&self, date: NaiveDate) -> bool {
        self.month.contains(date) && date >= self.today() && self.available.contains(&date)
    }

    /// Chooses the service; refetches slots when a date is already picked.
    pub fn select_service(&mut self, service_id: &str) -> Option<SlotTicket> {
        if self.service_id.as_deref() == Some(service_id) || self.is_submitting() {
            return None;
        }
        self.service_id = Some(service_id.to_string());
        self.slots.reset();
        let date = self.selected_date?;
        Some(self.slots.begin_fetch(service_id, date))
    }

    /// Picks a date. Yields a ticket only when a service is already chosen.
    pub fn begin_select_date(&mut self, date: NaiveDate) -> Option<SlotTicket> {
        if !self.is_selectable(date) || self.is_submitting() {
            return None;
        }
        self.selected_date = Some(date);
        match self.service_id.clone() {
            Some(service_id) => Some(self.slots.begin_fetch(&service_id, date)),
            None => {
                self.slots.reset();
                None
            }
        }
    }

    pub fn apply_slots(
        &mut self,
        ticket: SlotTicket,
        result: Result<ServiceAvailability, BookingError>,
    ) -> SlotOutcome {
        let outcome = self.slots.resolve(&ticket, result);
        if let SlotOutcome::Failed(err) = &outcome {
            self.shell
                .notify(Notification::destructive(SLOT_FETCH_FAILED, err.to_string()));
        }
        outcome
    }

    pub fn select_time(&mut self, time: &str) -> bool {
        !self.is_submitting() && self.slots.select_time(time)
    }

    pub fn selection(&self) -> BookingSelection {
        BookingSelection {
            service_id: self.service_id.clone(),
            date: self.selected_date,
            time: self
                .selected_date
                .and_then(|date| self.slots.offered_time(date))
                .map(str::to_string),
        }
    }

    pub fn can_submit(&self) -> bool {
        self.submitter.can_submit(&self.selection())
    }

    // ---- submission -----------------------------------------------------

    pub fn begin_submit(&mut self) -> Option<PendingSubmission> {
        let selection = self.selection();
        self.submitter.begin(&selection)
    }

    pub fn finish_submit(
        &mut self,
        pending: PendingSubmission,
        result: Result<CreatedBooking, BookingError>,
    ) -> SubmitOutcome {
        let outcome = self.submitter.finish(pending, result);
        match &outcome {
            SubmitOutcome::Succeeded {
                route,
                notification,
                ..
            } => {
                self.service_id = None;
                self.selected_date = None;
                self.slots.reset();
                self.shell.notify(notification.clone());
                self.shell.navigate(route);
            }
            SubmitOutcome::Failed { notification } => {
                self.shell.notify(notification.clone());
            }
        }
        outcome
    }

    // ---- drivers for hosts that own the session -------------------------

    pub async fn load_schedule(&mut self) -> bool {
        let ticket = self.begin_schedule_fetch();
        self.run_schedule_fetch(ticket).await
    }

    pub async fn change_month(&mut self, offset: i32) -> bool {
        let Some(ticket) = self.navigate_month(offset) else {
            return false;
        };
        self.run_schedule_fetch(ticket).await
    }

    async fn run_schedule_fetch(&mut self, mut ticket: ScheduleTicket) -> bool {
        loop {
            let result = self.fetch_schedule(&ticket).await;
            match self.apply_schedule(ticket, result) {
                ScheduleOutcome::Moved(next) => ticket = next,
                outcome => return !outcome.is_stale(),
            }
        }
    }

    pub async fn change_service(&mut self, service_id: &str) -> Option<SlotOutcome> {
        let ticket = self.select_service(service_id)?;
        let result = self.fetch_slots(&ticket).await;
        Some(self.apply_slots(ticket, result))
    }

    pub async fn select_date(&mut self, date: NaiveDate) -> Option<SlotOutcome> {
        let ticket = self.begin_select_date(date)?;
        let result = self.fetch_slots(&ticket).await;
        Some(self.apply_slots(ticket, result))
    }

    pub async fn submit(&mut self) -> Option<SubmitOutcome> {
        let pending = self.begin_submit()?;
        let result = self.backend.create_booking(pending.request().clone()).await;
        Some(self.finish_submit(pending, result))
    }

    async fn fetch_schedule(
        &self,
        ticket: &ScheduleTicket,
    ) -> Result<ProviderSchedule, BookingError> {
        self.backend
            .provider_schedule(
                &ticket.provider_id,
                ticket.month.first_day(),
                ticket.month.last_day(),
            )
            .await
    }

    async fn fetch_slots(&self, ticket: &SlotTicket) -> Result<ServiceAvailability, BookingError> {
        self.backend
            .service_availability(&ticket.service_id, ticket.date)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use shared_types::{CreateBookingRequest, WorkingHours};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    use crate::booking::notification::BOOKING_FAILED_FALLBACK;

    #[derive(Default)]
    struct FakeBackend {
        schedule_error: Option<BookingError>,
        timezone: Option<String>,
        slots: HashMap<NaiveDate, Result<Vec<String>, BookingError>>,
        create_result: RefCell<Option<Result<CreatedBooking, BookingError>>>,
        schedule_calls: RefCell<Vec<(NaiveDate, NaiveDate)>>,
        slot_calls: Cell<usize>,
        created: RefCell<Vec<CreateBookingRequest>>,
    }

    #[async_trait(?Send)]
    impl BookingBackend for FakeBackend {
        async fn provider_schedule(
            &self,
            _provider_id: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<ProviderSchedule, BookingError> {
            self.schedule_calls.borrow_mut().push((start, end));
            if let Some(err) = &self.schedule_error {
                return Err(err.clone());
            }
            let working_hours = ["monday", "tuesday", "wednesday", "thursday", "friday"]
                .into_iter()
                .map(|day| (day.to_string(), WorkingHours::new("09:00", "17:00")))
                .collect();
            Ok(ProviderSchedule {
                working_hours,
                unavailable_dates: vec!["2025-03-14".parse().unwrap()],
                timezone: self.timezone.clone(),
                ..Default::default()
            })
        }

        async fn service_availability(
            &self,
            _service_id: &str,
            date: NaiveDate,
        ) -> Result<ServiceAvailability, BookingError> {
            self.slot_calls.set(self.slot_calls.get() + 1);
            match self.slots.get(&date) {
                Some(Ok(list)) => Ok(ServiceAvailability {
                    available_slots: list.clone(),
                }),
                Some(Err(err)) => Err(err.clone()),
                None => Ok(ServiceAvailability::default()),
            }
        }

        async fn create_booking(
            &self,
            request: CreateBookingRequest,
        ) -> Result<CreatedBooking, BookingError> {
            self.created.borrow_mut().push(request);
            self.create_result
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Ok(CreatedBooking::new("bk_default")))
        }
    }

    #[derive(Default)]
    struct RecordingShell {
        notifications: RefCell<Vec<Notification>>,
        routes: RefCell<Vec<String>>,
    }

    impl SessionShell for RecordingShell {
        fn notify(&self, notification: Notification) {
            self.notifications.borrow_mut().push(notification);
        }

        fn navigate(&self, path: &str) {
            self.routes.borrow_mut().push(path.to_string());
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn session(backend: FakeBackend) -> BookingSession<FakeBackend, RecordingShell> {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        BookingSession::new(
            backend,
            RecordingShell::default(),
            "prov1",
            now,
            BookingPolicy::default(),
        )
    }

    fn backend_with_slots() -> FakeBackend {
        let mut backend = FakeBackend::default();
        backend.slots.insert(day(7), Ok(strings(&["10:00", "10:30"])));
        backend.slots.insert(day(10), Ok(strings(&["09:00", "09:30"])));
        backend
    }

    async fn ready_session(backend: FakeBackend) -> BookingSession<FakeBackend, RecordingShell> {
        let mut session = session(backend);
        assert!(session.load_schedule().await);
        session.select_service("svc1");
        session
    }

    #[tokio::test]
    async fn loads_month_window_and_derives_available_dates() {
        let mut session = session(FakeBackend::default());
        session.load_schedule().await;

        assert_eq!(
            session.backend().schedule_calls.borrow().as_slice(),
            [(day(1), day(31))]
        );
        assert_eq!(session.available_dates().len(), 20);
        assert!(!session.available_dates().contains(&day(14)));
        assert!(!session.is_schedule_loading());
    }

    #[tokio::test]
    async fn new_date_without_previous_time_clears_it() {
        let mut session = ready_session(backend_with_slots()).await;

        session.select_date(day(7)).await;
        assert!(session.select_time("10:00"));

        let outcome = session.select_date(day(10)).await;

        assert_eq!(outcome, Some(SlotOutcome::Applied { cleared_time: true }));
        assert_eq!(session.selection().time, None);
        assert_eq!(session.slots().slots(), ["09:00", "09:30"]);
    }

    #[tokio::test]
    async fn reselecting_same_date_keeps_valid_time() {
        let mut session = ready_session(backend_with_slots()).await;
        session.select_date(day(10)).await;
        assert!(session.select_time("09:30"));

        session.select_date(day(10)).await;

        assert_eq!(session.selection().time.as_deref(), Some("09:30"));
    }

    #[tokio::test]
    async fn superseded_slot_fetch_cannot_overwrite_newer_date() {
        let mut session = ready_session(backend_with_slots()).await;

        let older = session.begin_select_date(day(7)).unwrap();
        let newer = session.begin_select_date(day(10)).unwrap();
        session.apply_slots(newer, Ok(ServiceAvailability { available_slots: strings(&["09:00"]) }));
        let outcome = session.apply_slots(older, Ok(ServiceAvailability { available_slots: strings(&["10:00"]) }));

        assert_eq!(outcome, SlotOutcome::Stale);
        assert_eq!(session.selected_date(), Some(day(10)));
        assert_eq!(session.slots().slots(), ["09:00"]);
    }

    #[tokio::test]
    async fn no_slot_fetch_without_service_or_for_closed_days() {
        let mut session = session(backend_with_slots());
        session.load_schedule().await;

        assert_eq!(session.select_date(day(10)).await, None);
        assert_eq!(session.selected_date(), Some(day(10)));
        assert_eq!(session.select_date(day(14)).await, None);
        assert_eq!(session.select_date(day(15)).await, None);
        assert_eq!(session.selected_date(), Some(day(10)));
        assert_eq!(session.backend().slot_calls.get(), 0);

        // choosing the service afterwards fetches for the picked date
        let outcome = session.change_service("svc1").await;
        assert_eq!(outcome, Some(SlotOutcome::Applied { cleared_time: false }));
        assert_eq!(session.backend().slot_calls.get(), 1);
    }

    #[tokio::test]
    async fn slot_fetch_failure_notifies_and_clears() {
        let mut backend = backend_with_slots();
        backend
            .slots
            .insert(day(11), Err(BookingError::Transport("offline".into())));
        let mut session = ready_session(backend).await;
        session.select_date(day(10)).await;
        session.select_time("09:00");

        let outcome = session.select_date(day(11)).await;

        assert!(matches!(outcome, Some(SlotOutcome::Failed(_))));
        assert!(session.slots().slots().is_empty());
        assert!(!session.slots().is_fetching());
        assert_eq!(session.selection().time, None);
        let notifications = session.shell().notifications.borrow();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].is_destructive());
        assert_eq!(notifications[0].title, SLOT_FETCH_FAILED);
    }

    #[tokio::test]
    async fn schedule_failure_means_no_availability() {
        let backend = FakeBackend {
            schedule_error: Some(BookingError::Transport("502".into())),
            ..Default::default()
        };
        let mut session = session(backend);

        assert!(session.load_schedule().await);

        assert!(session.available_dates().is_empty());
        assert!(session.schedule().is_none());
        assert!(!session.is_schedule_loading());
        assert_eq!(session.shell().notifications.borrow()[0].title, SCHEDULE_FETCH_FAILED);
    }

    #[tokio::test]
    async fn month_navigation_clears_selection_and_respects_horizon() {
        let mut session = ready_session(backend_with_slots()).await;
        session.select_date(day(10)).await;
        session.select_time("09:00");

        assert!(!session.can_go_back());
        assert!(!session.change_month(-1).await);

        assert!(session.change_month(1).await);
        assert_eq!(session.month(), MonthWindow::new(2025, 4).unwrap());
        assert_eq!(session.selected_date(), None);
        assert_eq!(session.selection().time, None);
        assert_eq!(session.service_id(), Some("svc1"));
        assert_eq!(
            session.backend().schedule_calls.borrow().last(),
            Some(&(
                NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 4, 30).unwrap()
            ))
        );

        assert!(session.change_month(2).await);
        assert!(!session.can_go_forward());
        assert!(!session.change_month(1).await);
    }

    #[tokio::test]
    async fn stale_schedule_response_is_dropped() {
        let mut session = session(FakeBackend::default());
        let first = session.begin_schedule_fetch();
        let second = session.navigate_month(1).unwrap();

        assert_eq!(
            session.apply_schedule(first, Ok(ProviderSchedule::default())),
            ScheduleOutcome::Stale
        );
        assert!(session.is_schedule_loading());
        assert_eq!(
            session.apply_schedule(second, Ok(ProviderSchedule::default())),
            ScheduleOutcome::Applied
        );
        assert!(!session.is_schedule_loading());
    }

    #[tokio::test]
    async fn successful_booking_navigates_and_clears_selection() {
        let backend = backend_with_slots();
        *backend.create_result.borrow_mut() = Some(Ok(CreatedBooking::new("bk_123")));
        let mut session = ready_session(backend).await;
        session.select_date(day(10)).await;
        session.select_time("09:00");

        let outcome = session.submit().await;

        assert!(matches!(outcome, Some(SubmitOutcome::Succeeded { .. })));
        let created = session.backend().created.borrow();
        assert_eq!(created[0].services, vec!["svc1".to_string()]);
        assert_eq!(created[0].date, "2025-03-10");
        assert_eq!(created[0].time, "09:00");

        let routes = session.shell().routes.borrow();
        assert!(routes[0].contains("bk_123"));
        let notifications = session.shell().notifications.borrow();
        let success = notifications.last().unwrap();
        assert!(!success.is_destructive());
        assert!(success.description.contains("March 10, 2025"));
        assert!(success.description.contains("09:00"));

        assert_eq!(session.selection(), BookingSelection::default());
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn rejected_booking_keeps_selection_for_retry() {
        let backend = backend_with_slots();
        *backend.create_result.borrow_mut() =
            Some(Err(BookingError::Remote("Slot no longer available".to_string())));
        let mut session = ready_session(backend).await;
        session.select_date(day(10)).await;
        session.select_time("09:00");
        let before = session.selection();

        let outcome = session.submit().await;

        assert!(matches!(outcome, Some(SubmitOutcome::Failed { .. })));
        assert_eq!(
            session.shell().notifications.borrow().last().unwrap().description,
            "Slot no longer available"
        );
        assert_eq!(session.selection(), before);
        assert!(session.shell().routes.borrow().is_empty());
        assert!(session.can_submit());

        // user-initiated retry goes through with the preserved selection
        assert!(matches!(session.submit().await, Some(SubmitOutcome::Succeeded { .. })));
    }

    #[tokio::test]
    async fn transport_failure_uses_fallback_message() {
        let backend = backend_with_slots();
        *backend.create_result.borrow_mut() = Some(Err(BookingError::Transport("reset".into())));
        let mut session = ready_session(backend).await;
        session.select_date(day(10)).await;
        session.select_time("09:00");

        session.submit().await;

        assert_eq!(
            session.shell().notifications.borrow().last().unwrap().description,
            BOOKING_FAILED_FALLBACK
        );
    }

    #[tokio::test]
    async fn submit_is_a_no_op_until_selection_is_complete() {
        let mut session = ready_session(backend_with_slots()).await;
        assert!(!session.can_submit());
        assert_eq!(session.submit().await, None);

        session.select_date(day(10)).await;
        assert!(!session.can_submit());
        assert_eq!(session.submit().await, None);
        assert!(session.backend().created.borrow().is_empty());
    }

    #[tokio::test]
    async fn double_submit_is_ignored_while_in_flight() {
        let mut session = ready_session(backend_with_slots()).await;
        session.select_date(day(10)).await;
        session.select_time("09:00");

        let pending = session.begin_submit().unwrap();
        assert!(session.begin_submit().is_none());
        assert!(!session.select_time("09:30"));
        assert!(session.begin_select_date(day(11)).is_none());

        session.finish_submit(pending, Ok(CreatedBooking::new("bk_9")));
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn previous_dates_time_is_not_submittable_while_new_slots_load() {
        let mut session = ready_session(backend_with_slots()).await;
        session.select_date(day(7)).await;
        assert!(session.select_time("10:00"));
        assert!(session.can_submit());

        let ticket = session.begin_select_date(day(10)).unwrap();

        assert_eq!(session.selection().time, None);
        assert!(!session.can_submit());
        assert!(session.begin_submit().is_none());
        assert!(!session.is_submitting());

        session.apply_slots(
            ticket,
            Ok(ServiceAvailability { available_slots: strings(&["09:00", "10:00"]) }),
        );
        assert_eq!(session.selection().time.as_deref(), Some("10:00"));
        let pending = session.begin_submit().unwrap();
        assert_eq!(pending.request().date, "2025-03-10");
        assert_eq!(pending.request().time, "10:00");
    }

    #[test]
    fn provider_timezone_drives_today() {
        let now = Utc.with_ymd_and_hms(2025, 4, 1, 2, 0, 0).unwrap();
        let mut session = BookingSession::new(
            FakeBackend::default(),
            RecordingShell::default(),
            "prov1",
            now,
            BookingPolicy::default(),
        );
        assert_eq!(session.today(), NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());

        assert_eq!(session.month(), MonthWindow::new(2025, 4).unwrap());

        let ticket = session.begin_schedule_fetch();
        let outcome = session.apply_schedule(
            ticket,
            Ok(ProviderSchedule {
                timezone: Some("America/Los_Angeles".to_string()),
                ..Default::default()
            }),
        );

        assert_eq!(session.timezone(), chrono_tz::America::Los_Angeles);
        assert_eq!(session.today(), day(31));
        assert_eq!(session.month(), MonthWindow::new(2025, 3).unwrap());
        let refetch = outcome.into_refetch().unwrap();
        assert_eq!(refetch.month, MonthWindow::new(2025, 3).unwrap());
        assert!(session.is_schedule_loading());
    }

    #[tokio::test]
    async fn first_load_opens_on_providers_current_month() {
        let backend = FakeBackend {
            timezone: Some("America/Los_Angeles".to_string()),
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2025, 4, 1, 2, 0, 0).unwrap();
        let mut session = BookingSession::new(
            backend,
            RecordingShell::default(),
            "prov1",
            now,
            BookingPolicy::default(),
        );

        assert!(session.load_schedule().await);

        assert_eq!(session.month(), MonthWindow::new(2025, 3).unwrap());
        assert_eq!(
            session.backend().schedule_calls.borrow().as_slice(),
            [
                (
                    NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2025, 4, 30).unwrap()
                ),
                (day(1), day(31)),
            ]
        );
        assert!(session.is_selectable(day(31)));
        assert!(!session.is_selectable(day(28)));
        assert!(!session.can_go_back());

        // later loads keep whatever month is showing
        assert!(session.change_month(1).await);
        assert!(session.load_schedule().await);
        assert_eq!(session.month(), MonthWindow::new(2025, 4).unwrap());
    }
}
