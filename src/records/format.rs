use chrono::NaiveDateTime;

/// `m:ss`
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// `Feb 12, 2026, 09:15 AM`
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// `$12.75`
pub fn format_price(amount: f64) -> String {
    format!("${:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(45), "0:45");
        assert_eq!(format_duration(125), "2:05");
        assert_eq!(format_duration(3600), "60:00");
    }

    #[test]
    fn test_format_timestamp() {
        let morning = NaiveDate::from_ymd_opt(2026, 2, 12)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        assert_eq!(format_timestamp(&morning), "Feb 12, 2026, 09:15 AM");

        let evening = NaiveDate::from_ymd_opt(2026, 2, 4)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap();
        assert_eq!(format_timestamp(&evening), "Feb 4, 2026, 07:00 PM");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(18.5), "$18.50");
        assert_eq!(format_price(4.0), "$4.00");
    }
}
