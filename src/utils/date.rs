use chrono::{Datelike, NaiveDate};

/// Parse ett datum från en sträng (flexibelt format)
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%Y/%m/%d", // 2024/01/15
        "%d-%m-%Y", // 15-01-2024
        "%d/%m/%Y", // 15/01/2024
    ];

    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    // Endast år
    if s.len() == 4 {
        if let Ok(year) = s.parse::<i32>() {
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
    }

    None
}

/// Formatera ett datum för visning
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Hela år mellan två datum. None om resultatet är orimligt (negativt eller > 150).
pub fn age_between(birth: NaiveDate, end: NaiveDate) -> Option<i32> {
    let years = end.year() - birth.year();
    if !(0..=150).contains(&years) {
        return None;
    }

    let had_birthday = (end.month(), end.day()) >= (birth.month(), birth.day());
    let age = if had_birthday { years } else { years - 1 };

    (age >= 0).then_some(age)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("1980-05-17"), Some(date(1980, 5, 17)));
        assert_eq!(parse_date("17/05/1980"), Some(date(1980, 5, 17)));
        assert_eq!(parse_date("1980"), Some(date(1980, 1, 1)));
        assert_eq!(parse_date("  "), None);
        assert_eq!(parse_date("kemarin"), None);
    }

    #[test]
    fn test_age_between() {
        assert_eq!(age_between(date(1980, 5, 17), date(2025, 5, 16)), Some(44));
        assert_eq!(age_between(date(1980, 5, 17), date(2025, 5, 17)), Some(45));
        assert_eq!(age_between(date(2030, 1, 1), date(2025, 1, 1)), None);
        assert_eq!(age_between(date(1800, 1, 1), date(2025, 1, 1)), None);
    }
}
