use chrono::{Datelike, Local, NaiveDate};

use crate::{error::CrawlError, extractor::Fields, numbers::NumberConvention};

pub const GERMAN_MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// Month number (1-based) of a canonical German month name.
pub fn month_number(name: &str) -> Result<u32, CrawlError> {
    GERMAN_MONTHS
        .iter()
        .position(|month| *month == name)
        .map(|index| index as u32 + 1)
        .ok_or_else(|| CrawlError::UnknownMonth {
            name: name.to_string(),
        })
}

/// Builds a date from "<day>. <Monat> [<year>]" parts.
///
/// `year` falls back to `default_year` when the source text carries none; no
/// attempt is made to guess a rollover around new year.
pub fn resolve_date(
    day: u64,
    month_name: &str,
    year: Option<i32>,
    default_year: i32,
) -> Result<NaiveDate, CrawlError> {
    let month = month_number(month_name)?;
    let year = year.unwrap_or(default_year);
    let invalid = || CrawlError::InvalidDate {
        text: format!("{day}. {month_name} {year}"),
    };
    let day = u32::try_from(day).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// [`resolve_date`] against the local calendar year at call time.
pub fn resolve_date_this_year(day: u64, month_name: &str) -> Result<NaiveDate, CrawlError> {
    resolve_date(day, month_name, None, current_year())
}

/// Resolves the `day`, `month` and optional `year` captures of `fields`.
pub fn resolve_date_fields(
    fields: &Fields,
    convention: &NumberConvention,
    default_year: i32,
) -> Result<NaiveDate, CrawlError> {
    let day = fields.integer("day", convention)?;
    let month = fields.get("month").unwrap_or_default();
    let year = match fields.get("year") {
        Some(raw) => Some(
            i32::try_from(convention.parse_integer(raw)?).map_err(|_| CrawlError::InvalidDate {
                text: format!("{day}. {month} {raw}"),
            })?,
        ),
        None => {
            log::debug!("no year in date text, assuming {default_year}");
            None
        }
    };
    resolve_date(day, month, year, default_year)
}

pub fn current_year() -> i32 {
    Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{extractor::PatternSet, numbers::GERMAN};

    #[test]
    fn test_resolve_with_year() {
        let date = resolve_date(5, "Januar", Some(2022), 1999).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2022, 1, 5).unwrap());
    }

    #[test]
    fn test_resolve_defaults_to_current_year() {
        let date = resolve_date_this_year(17, "August").unwrap();
        assert_eq!(date.year(), Local::now().year());
        assert_eq!(date.month(), 8);
        assert_eq!(date.day(), 17);
    }

    #[test]
    fn test_umlaut_month() {
        let date = resolve_date(3, "März", Some(2022), 2022).unwrap();
        assert_eq!(date.to_string(), "2022-03-03");
    }

    #[test]
    fn test_unknown_month() {
        match resolve_date_this_year(1, "Smaragd") {
            Err(CrawlError::UnknownMonth { name }) => assert_eq!(name, "Smaragd"),
            other => panic!("expected UnknownMonth, got {other:?}"),
        }
        // exact match only
        assert!(month_number("januar").is_err());
        assert!(month_number("Jan").is_err());
    }

    #[test]
    fn test_out_of_range_day() {
        assert!(matches!(
            resolve_date(30, "Februar", Some(2022), 2022),
            Err(CrawlError::InvalidDate { .. })
        ));
        assert!(matches!(
            resolve_date(0, "Mai", Some(2022), 2022),
            Err(CrawlError::InvalidDate { .. })
        ));
        assert!(matches!(
            resolve_date(u64::MAX, "Mai", Some(2022), 2022),
            Err(CrawlError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_resolve_from_fields() {
        let set = PatternSet::new(
            &[r"Stand:? (?P<day>\d+)\. (?P<month>\p{L}+)(?: (?P<year>\d{4}))?"],
            &["day", "month"],
        )
        .unwrap();
        let fields = set.extract("Stand: 5. Januar 2022").unwrap();
        assert_eq!(
            resolve_date_fields(&fields, &GERMAN, 1999).unwrap().to_string(),
            "2022-01-05"
        );

        let fields = set.extract("Stand 24. Dezember").unwrap();
        assert_eq!(
            resolve_date_fields(&fields, &GERMAN, 2021).unwrap().to_string(),
            "2021-12-24"
        );
    }

    #[test]
    fn test_leap_day_depends_on_year() {
        assert!(resolve_date(29, "Februar", Some(2024), 2024).is_ok());
        assert!(resolve_date(29, "Februar", None, 2023).is_err());
    }
}
