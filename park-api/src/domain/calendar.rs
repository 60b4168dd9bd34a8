use time::{format_description::BorrowedFormatItem, macros::format_description, Date, Weekday};

const VISIT_DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Opening rules of the park: one fixed weekday on which nothing is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParkCalendar {
    closed_weekday: Weekday,
}

impl Default for ParkCalendar {
    fn default() -> Self {
        Self::new(Weekday::Monday)
    }
}

impl ParkCalendar {
    pub fn new(closed_weekday: Weekday) -> Self {
        Self { closed_weekday }
    }

    pub fn closed_weekday(&self) -> Weekday {
        self.closed_weekday
    }

    pub fn is_open(&self, date: Date) -> bool {
        date.weekday() != self.closed_weekday
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_visit_date(input: &str) -> Option<Date> {
    Date::parse(input, VISIT_DATE_FORMAT).ok()
}

/// Formats a date the way it is accepted by [`parse_visit_date`].
pub fn format_visit_date(date: Date) -> String {
    date.format(VISIT_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn parses_iso_calendar_dates() {
        let date = parse_visit_date("2025-10-15").unwrap();
        assert_eq!(date, Date::from_calendar_date(2025, Month::October, 15).unwrap());
        assert_eq!(format_visit_date(date), "2025-10-15");
    }

    #[test]
    fn rejects_malformed_dates() {
        for input in ["", "2025-13-01", "2025-02-30", "15/10/2025", "2025-10-15T10:00", "tomorrow"] {
            assert!(parse_visit_date(input).is_none(), "{input} should be rejected");
        }
    }

    #[test]
    fn park_is_closed_on_mondays_by_default() {
        let calendar = ParkCalendar::default();
        let monday = parse_visit_date("2025-10-13").unwrap();
        let tuesday = parse_visit_date("2025-10-14").unwrap();

        assert!(!calendar.is_open(monday));
        assert!(calendar.is_open(tuesday));
    }
}
