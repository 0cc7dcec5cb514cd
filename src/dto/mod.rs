use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod game;
pub mod health;
pub mod phase;
pub mod session;
pub mod sse;
pub mod texts;
pub mod view;

fn format_unix_millis(millis: i64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .ok()
        .and_then(|moment| moment.format(&Rfc3339).ok())
        .unwrap_or_else(|| "invalid-timestamp".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_are_formatted_as_rfc3339() {
        assert_eq!(format_unix_millis(0), "1970-01-01T00:00:00Z");
        assert_eq!(format_unix_millis(1_500), "1970-01-01T00:00:01.5Z");
    }

    #[test]
    fn out_of_range_timestamps_are_flagged() {
        assert_eq!(format_unix_millis(i64::MAX), "invalid-timestamp");
    }
}
