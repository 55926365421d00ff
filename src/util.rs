use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};

pub const SHORT_SHA_LEN: usize = 12;
pub const MAX_TITLE_CHARS: usize = 150;

/// First day of the calendar month, read from the timestamp's own offset.
pub fn month_start(timestamp: &DateTime<FixedOffset>) -> NaiveDate {
    // Day 1 exists in every month, the fallback is unreachable.
    NaiveDate::from_ymd_opt(timestamp.year(), timestamp.month(), 1)
        .unwrap_or_else(|| timestamp.date_naive())
}

pub fn month_key(start: &NaiveDate) -> String {
    format!("{}-{:02}", start.year(), start.month())
}

pub fn short_sha(sha: &str) -> String {
    sha.chars().take(SHORT_SHA_LEN).collect()
}

/// First line of a commit message, cut to `MAX_TITLE_CHARS` characters.
pub fn title(message: &str) -> String {
    let first = message.lines().next().unwrap_or("");
    if first.chars().count() > MAX_TITLE_CHARS {
        let head: String = first.chars().take(MAX_TITLE_CHARS - 3).collect();
        format!("{head}...")
    } else {
        first.to_string()
    }
}

/// `1234567` -> `1 234 567`
pub fn format_number(n: u64) -> String {
    group_digits(&n.to_string())
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

pub fn format_signed(n: i128) -> String {
    let sign = if n >= 0 { '+' } else { '-' };
    format!("{sign}{}", group_digits(&n.unsigned_abs().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn month_start_keeps_source_offset() {
        let ts = DateTime::parse_from_rfc3339("2020-02-01T00:30:00+02:00").unwrap();
        assert_eq!(month_start(&ts), NaiveDate::from_ymd_opt(2020, 2, 1).unwrap());
        assert_eq!(month_key(&month_start(&ts)), "2020-02");
    }

    #[test]
    fn title_truncates_long_first_line() {
        let long = "a".repeat(200);
        let t = title(&format!("{long}\nbody"));
        assert_eq!(t.chars().count(), MAX_TITLE_CHARS);
        assert!(t.ends_with("..."));
        assert_eq!(title("Article L1\n\nDétails"), "Article L1");
        assert_eq!(title(""), "");
    }

    #[test]
    fn numbers_are_grouped_by_thousands() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1 000");
        assert_eq!(format_number(1234567), "1 234 567");
        assert_eq!(format_signed(-4200), "-4 200");
        assert_eq!(format_signed(7), "+7");
        assert_eq!(format_signed(-i128::from(u64::MAX)), "-18 446 744 073 709 551 615");
    }

    #[test]
    fn short_sha_is_prefix() {
        assert_eq!(short_sha("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_sha("abc"), "abc");
    }
}
