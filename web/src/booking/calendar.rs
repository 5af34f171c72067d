use chrono::{Datelike, Months, NaiveDate, Weekday};

/// One calendar month, anchored on its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthWindow {
    first: NaiveDate,
}

impl MonthWindow {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Every day of the month, first to last inclusive.
    pub fn days(&self) -> Vec<NaiveDate> {
        let month = self.month();
        self.first
            .iter_days()
            .take_while(|day| day.month() == month)
            .collect()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::containing(date) == *self
    }

    pub fn offset(&self, months: i32) -> Option<Self> {
        let shifted = if months >= 0 {
            self.first.checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            self.first.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        shifted.map(|first| Self { first })
    }

    /// Whole months from `earlier` to `self`; negative when `self` is before.
    pub fn months_since(&self, earlier: &MonthWindow) -> i32 {
        (self.year() - earlier.year()) * 12 + self.month() as i32 - earlier.month() as i32
    }

    pub fn label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    /// Empty cells before the first day in a Sunday-first grid.
    pub fn leading_blank_days(&self) -> usize {
        self.first.weekday().num_days_from_sunday() as usize
    }
}

/// Lowercase English weekday name, the key used by working-hours maps.
pub fn weekday_key(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub available: bool,
    pub past: bool,
    pub selected: bool,
}

impl CalendarDay {
    pub fn selectable(&self) -> bool {
        self.available && !self.past
    }
}

/// Month grid rendered by the date picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView {
    pub month: MonthWindow,
    pub leading_blanks: usize,
    pub days: Vec<CalendarDay>,
}

impl CalendarView {
    pub fn build(
        month: MonthWindow,
        available: &[NaiveDate],
        today: NaiveDate,
        selected: Option<NaiveDate>,
    ) -> Self {
        let days = month
            .days()
            .into_iter()
            .map(|date| CalendarDay {
                date,
                available: available.contains(&date),
                past: date < today,
                selected: selected == Some(date),
            })
            .collect();

        Self {
            month,
            leading_blanks: month.leading_blank_days(),
            days,
        }
    }
}
