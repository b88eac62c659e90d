use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};

/// UTC instants covering `[00:00:00.000, 23:59:59.999]` of `date` in the
/// configured timezone.
///
/// A record stamped at 23:59:59.999 local time belongs to the day; one at
/// the next midnight does not.
pub fn local_day_range(date: NaiveDate, offset: FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
    let shift = Duration::seconds(i64::from(offset.local_minus_utc()));
    let start = DateTime::<Utc>::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN) - shift, Utc);
    let end = start + Duration::days(1) - Duration::milliseconds(1);
    (start, end)
}

/// Today's calendar date in the configured timezone.
pub fn today_local(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn day_range_covers_exactly_one_local_day() {
        let kst = FixedOffset::east_opt(9 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let (start, end) = local_day_range(date, kst);

        // local midnight is 15:00 UTC the previous day
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 1, 15, 0, 0).unwrap());
        assert_eq!(
            end,
            Utc.with_ymd_and_hms(2026, 3, 2, 14, 59, 59).unwrap()
                + Duration::milliseconds(999)
        );
    }

    #[test]
    fn day_boundary_is_millisecond_exact() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let (start, end) = local_day_range(date, utc);

        let last_ms = Utc.with_ymd_and_hms(2026, 3, 2, 23, 59, 59).unwrap()
            + Duration::milliseconds(999);
        let next_midnight = Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap();

        assert!(last_ms >= start && last_ms <= end);
        assert!(next_midnight > end);
    }

    #[test]
    fn negative_offsets_shift_forward() {
        let ny = FixedOffset::west_opt(5 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let (start, _) = local_day_range(date, ny);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 2, 5, 0, 0).unwrap());
    }
}
