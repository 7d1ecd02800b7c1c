//! Week calculation: Monday-start calendar weeks.
//!
//! The week is the uniqueness boundary for "one employee, one shift, one week",
//! so everything here works on `NaiveDate` (no time of day, no offset). Callers
//! holding a zoned timestamp normalize it with [`WeekWindow::containing_datetime`]
//! in their own timezone first.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// Seven consecutive dates, Monday through Sunday.
///
/// Only the Monday is stored; the rest is derived. A window only exists when
/// all seven days fit in the calendar, so the weeks at the very ends of
/// `NaiveDate`'s range have no window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "NaiveDate", into = "NaiveDate")]
pub struct WeekWindow {
    start: NaiveDate,
}

impl WeekWindow {
    /// The week containing `date`, or `None` when part of it falls outside the calendar.
    pub fn containing(date: NaiveDate) -> Option<Self> {
        let start = date.checked_sub_days(days_since_monday(date))?;
        start.checked_add_days(Days::new(6))?;
        Some(Self { start })
    }

    /// The week containing the calendar date of `at`, as seen in its own timezone.
    pub fn containing_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Option<Self> {
        Self::containing(at.date_naive())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Sunday of this week.
    pub fn end(&self) -> NaiveDate {
        self.day(6)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end()
    }

    pub fn dates(&self) -> [NaiveDate; 7] {
        std::array::from_fn(|i| self.day(i as u64))
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> {
        self.dates().into_iter()
    }

    /// Same weekday in `other`. `None` if `date` is not in this week.
    pub fn same_day_in(&self, other: WeekWindow, date: NaiveDate) -> Option<NaiveDate> {
        if !self.contains(date) {
            return None;
        }
        let offset = (date - self.start).num_days();
        Some(other.day(u64::try_from(offset).ok()?))
    }

    /// Shift the window by a whole number of weeks (negative goes back).
    pub fn offset_weeks(&self, weeks: i64) -> Option<Self> {
        let days = Days::new(weeks.unsigned_abs().checked_mul(7)?);
        let start = if weeks >= 0 {
            self.start.checked_add_days(days)?
        } else {
            self.start.checked_sub_days(days)?
        };
        Self::containing(start)
    }

    pub fn next(&self) -> Option<Self> {
        self.offset_weeks(1)
    }

    pub fn previous(&self) -> Option<Self> {
        self.offset_weeks(-1)
    }

    // 構築時に7日分収まることを確認済み
    fn day(&self, offset: u64) -> NaiveDate {
        self.start
            .checked_add_days(Days::new(offset.min(6)))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl TryFrom<NaiveDate> for WeekWindow {
    type Error = String;

    fn try_from(start: NaiveDate) -> Result<Self, Self::Error> {
        match Self::containing(start) {
            Some(week) if week.start == start => Ok(week),
            Some(_) => Err(format!("{start} is not a Monday")),
            None => Err(format!("week of {start} does not fit in the calendar")),
        }
    }
}

impl From<WeekWindow> for NaiveDate {
    fn from(week: WeekWindow) -> Self {
        week.start
    }
}

/// The 7 dates (Monday..Sunday) of the week containing `date`.
///
/// `None` only for the partial weeks at either end of the calendar.
pub fn week_of(date: NaiveDate) -> Option<[NaiveDate; 7]> {
    WeekWindow::containing(date).map(|week| week.dates())
}

/// Monday of `date`'s week, clamped to `NaiveDate::MIN` for the partial first week.
///
/// Total over every date, so it can key the one-shift-per-week rule even where
/// no [`WeekWindow`] exists.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(days_since_monday(date))
        .unwrap_or(NaiveDate::MIN)
}

fn days_since_monday(date: NaiveDate) -> Days {
    Days::new(u64::from(date.weekday().num_days_from_monday()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc, Weekday};
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case::monday(ymd(2024, 1, 1))]
    #[case::wednesday(ymd(2024, 1, 3))]
    #[case::saturday(ymd(2024, 1, 6))]
    #[case::sunday(ymd(2024, 1, 7))]
    fn any_day_maps_to_the_same_week(#[case] date: NaiveDate) {
        let dates = week_of(date).unwrap();
        assert_eq!(dates[0], ymd(2024, 1, 1));
        assert_eq!(dates[6], ymd(2024, 1, 7));
    }

    #[test]
    fn week_is_seven_consecutive_days_starting_monday() {
        // 2023-12-25 .. 2024-03-03 をまとめて確認（年またぎ・うるう年を含む）
        let mut date = ymd(2023, 12, 25);
        while date <= ymd(2024, 3, 3) {
            let dates = week_of(date).unwrap();
            assert_eq!(dates[0].weekday(), Weekday::Mon);
            for pair in dates.windows(2) {
                assert_eq!(pair[1], pair[0].succ_opt().unwrap());
            }
            assert!(dates.contains(&date));
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn week_spanning_year_boundary() {
        let week = WeekWindow::containing(ymd(2025, 1, 1)).unwrap();
        assert_eq!(week.start(), ymd(2024, 12, 30));
        assert_eq!(week.end(), ymd(2025, 1, 5));
    }

    #[test]
    fn zoned_timestamps_use_their_local_calendar_date() {
        // 2024-01-07 23:30 +09:00 is Sunday locally (14:30 UTC).
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let late_sunday = tokyo.with_ymd_and_hms(2024, 1, 7, 23, 30, 0).unwrap();
        assert_eq!(
            WeekWindow::containing_datetime(&late_sunday).unwrap().start(),
            ymd(2024, 1, 1)
        );

        // 2024-01-08 00:30 +09:00 is Sunday 15:30 UTC; local view wins.
        let early_monday = tokyo.with_ymd_and_hms(2024, 1, 8, 0, 30, 0).unwrap();
        assert_eq!(
            WeekWindow::containing_datetime(&early_monday).unwrap().start(),
            ymd(2024, 1, 8)
        );
        assert_eq!(
            WeekWindow::containing_datetime(&early_monday.with_timezone(&Utc))
                .unwrap()
                .start(),
            ymd(2024, 1, 1)
        );
    }

    #[test]
    fn offsets_move_whole_weeks() {
        let week = WeekWindow::containing(ymd(2024, 1, 3)).unwrap();
        assert_eq!(week.next().unwrap().start(), ymd(2024, 1, 8));
        assert_eq!(week.previous().unwrap().start(), ymd(2023, 12, 25));
        assert_eq!(week.offset_weeks(-2).unwrap().offset_weeks(2), Some(week));
        assert!(week.contains(ymd(2024, 1, 7)));
        assert!(!week.contains(ymd(2024, 1, 8)));
        assert_eq!(week.iter().count(), 7);
        assert_eq!(
            week.same_day_in(week.next().unwrap(), ymd(2024, 1, 3)),
            Some(ymd(2024, 1, 10))
        );
        assert_eq!(week.same_day_in(week.next().unwrap(), ymd(2024, 1, 8)), None);
    }

    #[rstest]
    #[case::first_date(NaiveDate::MIN)]
    #[case::last_date(NaiveDate::MAX)]
    fn partial_weeks_at_the_calendar_ends_have_no_window(#[case] date: NaiveDate) {
        assert_eq!(WeekWindow::containing(date), None);
        assert_eq!(week_of(date), None);
        // キーとしては常に計算できる
        assert!(week_start_of(date) <= date);
    }

    #[test]
    fn last_full_week_has_no_successor() {
        let mut monday = NaiveDate::MAX;
        while monday.weekday() != Weekday::Mon {
            monday = monday.pred_opt().unwrap();
        }
        let last_full = WeekWindow::containing(monday.pred_opt().unwrap()).unwrap();

        assert_eq!(last_full.end().weekday(), Weekday::Sun);
        assert_eq!(last_full.next(), None);
        assert_eq!(last_full.offset_weeks(i64::MAX), None);
        assert!(last_full.previous().is_some());
    }

    #[test]
    fn first_partial_week_shares_one_key() {
        let first = NaiveDate::MIN;
        let mut date = first;
        while date.weekday() != Weekday::Mon {
            assert_eq!(week_start_of(date), first);
            date = date.succ_opt().unwrap();
        }
        assert_eq!(week_start_of(date), date);
    }

    #[test]
    fn serde_only_accepts_mondays() {
        let week = WeekWindow::containing(ymd(2024, 1, 3)).unwrap();
        let json = serde_json::to_string(&week).unwrap();
        assert_eq!(json, "\"2024-01-01\"");
        assert_eq!(serde_json::from_str::<WeekWindow>(&json).unwrap(), week);
        assert!(serde_json::from_str::<WeekWindow>("\"2024-01-03\"").is_err());
    }
}
