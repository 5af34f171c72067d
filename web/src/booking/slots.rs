use chrono::NaiveDate;
use shared_types::ServiceAvailability;

use crate::error::BookingError;

/// Identifies one slot fetch. Only the most recently issued ticket may
/// change the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTicket {
    seq: u64,
    pub service_id: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    Applied { cleared_time: bool },
    Failed(BookingError),
    /// A newer fetch was issued before this one resolved.
    Stale,
}

/// Time slots for the selected date plus the user's pick among them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotBoard {
    date: Option<NaiveDate>,
    slots: Vec<String>,
    selected: Option<String>,
    fetching: bool,
    issued: u64,
}

impl SlotBoard {
    pub fn begin_fetch(&mut self, service_id: &str, date: NaiveDate) -> SlotTicket {
        self.issued += 1;
        self.date = Some(date);
        self.slots.clear();
        self.fetching = true;
        SlotTicket {
            seq: self.issued,
            service_id: service_id.to_string(),
            date,
        }
    }

    pub fn resolve(
        &mut self,
        ticket: &SlotTicket,
        result: Result<ServiceAvailability, BookingError>,
    ) -> SlotOutcome {
        if ticket.seq != self.issued {
            tracing::debug!(date = %ticket.date, "dropping stale slot response");
            return SlotOutcome::Stale;
        }
        self.fetching = false;

        match result {
            Ok(availability) => {
                self.slots = availability.available_slots;
                let still_offered = self
                    .selected
                    .as_ref()
                    .is_some_and(|time| self.slots.contains(time));
                let cleared_time = self.selected.is_some() && !still_offered;
                if cleared_time {
                    self.selected = None;
                }
                SlotOutcome::Applied { cleared_time }
            }
            Err(err) => {
                tracing::warn!(date = %ticket.date, error = %err, "slot fetch failed");
                self.slots.clear();
                self.selected = None;
                SlotOutcome::Failed(err)
            }
        }
    }

    /// Accepts one time from the current list; rejected while a fetch is in flight.
    pub fn select_time(&mut self, time: &str) -> bool {
        if self.fetching || !self.slots.iter().any(|slot| slot == time) {
            return false;
        }
        self.selected = Some(time.to_string());
        true
    }

    /// Clears everything and invalidates any fetch still in flight.
    pub fn reset(&mut self) {
        self.issued += 1;
        self.date = None;
        self.slots.clear();
        self.selected = None;
        self.fetching = false;
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn selected_time(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    /// The selected time, but only once it is confirmed by a settled list for `date`.
    pub fn offered_time(&self, date: NaiveDate) -> Option<&str> {
        if self.fetching || self.date != Some(date) {
            return None;
        }
        self.selected
            .as_deref()
            .filter(|time| self.slots.iter().any(|slot| slot == time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn slots(list: &[&str]) -> Result<ServiceAvailability, BookingError> {
        Ok(ServiceAvailability {
            available_slots: list.iter().map(|s| s.to_string()).collect(),
        })
    }

    fn board_with_selection(day: u32, list: &[&str], time: &str) -> SlotBoard {
        let mut board = SlotBoard::default();
        let ticket = board.begin_fetch("svc1", date(day));
        board.resolve(&ticket, slots(list));
        assert!(board.select_time(time));
        board
    }

    #[test]
    fn new_list_without_previous_time_clears_selection() {
        let mut board = board_with_selection(7, &["10:00", "10:30"], "10:00");

        let ticket = board.begin_fetch("svc1", date(10));
        assert!(board.is_fetching());
        let outcome = board.resolve(&ticket, slots(&["09:00", "09:30"]));

        assert_eq!(outcome, SlotOutcome::Applied { cleared_time: true });
        assert_eq!(board.selected_time(), None);
        assert_eq!(board.slots(), ["09:00", "09:30"]);
        assert!(!board.is_fetching());
    }

    #[test]
    fn refetching_same_list_keeps_valid_time() {
        let mut board = board_with_selection(10, &["09:00", "09:30"], "09:30");

        let ticket = board.begin_fetch("svc1", date(10));
        let outcome = board.resolve(&ticket, slots(&["09:00", "09:30"]));

        assert_eq!(outcome, SlotOutcome::Applied { cleared_time: false });
        assert_eq!(board.selected_time(), Some("09:30"));
    }

    #[test]
    fn out_of_order_responses_are_ignored() {
        let mut board = SlotBoard::default();
        let first = board.begin_fetch("svc1", date(10));
        let second = board.begin_fetch("svc1", date(11));

        assert_eq!(board.resolve(&second, slots(&["13:00"])), SlotOutcome::Applied { cleared_time: false });
        assert_eq!(board.resolve(&first, slots(&["09:00"])), SlotOutcome::Stale);

        assert_eq!(board.slots(), ["13:00"]);
        assert_eq!(board.date(), Some(date(11)));
    }

    #[test]
    fn stale_response_does_not_end_newer_fetch() {
        let mut board = SlotBoard::default();
        let first = board.begin_fetch("svc1", date(10));
        let _second = board.begin_fetch("svc1", date(11));

        board.resolve(&first, Err(BookingError::Transport("timeout".into())));
        assert!(board.is_fetching());
    }

    #[test]
    fn failure_clears_list_and_loading() {
        let mut board = board_with_selection(10, &["09:00"], "09:00");
        let ticket = board.begin_fetch("svc1", date(10));

        let outcome = board.resolve(&ticket, Err(BookingError::Transport("offline".into())));

        assert!(matches!(outcome, SlotOutcome::Failed(_)));
        assert!(board.slots().is_empty());
        assert_eq!(board.selected_time(), None);
        assert!(!board.is_fetching());
    }

    #[test]
    fn selection_requires_listed_time_and_idle_board() {
        let mut board = SlotBoard::default();
        let ticket = board.begin_fetch("svc1", date(10));
        assert!(!board.select_time("09:00"));

        board.resolve(&ticket, slots(&["09:00", "09:30"]));
        assert!(!board.select_time("11:00"));
        assert!(board.select_time("09:00"));
        assert!(board.select_time("09:30"));
        assert_eq!(board.selected_time(), Some("09:30"));
    }

    #[test]
    fn time_is_not_offered_until_new_date_settles() {
        let mut board = board_with_selection(7, &["10:00", "10:30"], "10:00");
        assert_eq!(board.offered_time(date(7)), Some("10:00"));

        let ticket = board.begin_fetch("svc1", date(10));
        assert_eq!(board.offered_time(date(10)), None);
        assert_eq!(board.offered_time(date(7)), None);

        board.resolve(&ticket, slots(&["10:00", "11:00"]));
        assert_eq!(board.offered_time(date(10)), Some("10:00"));
    }

    #[test]
    fn reset_invalidates_in_flight_fetch() {
        let mut board = SlotBoard::default();
        let ticket = board.begin_fetch("svc1", date(10));
        board.reset();

        assert_eq!(board.resolve(&ticket, slots(&["09:00"])), SlotOutcome::Stale);
        assert!(board.slots().is_empty());
        assert_eq!(board.date(), None);
    }
}
