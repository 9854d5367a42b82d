//! Sampling-interval planning for a date range.
//!
//! The backend selects one image per interval; the client plans the same
//! intervals up front so admission control can bound how many samples a
//! submission would request.

use chrono::{Datelike, Days, NaiveDate};

use super::{DateRange, Frequency};

/// Plans the sampling windows a request covers.
///
/// Weekly cadence yields consecutive 7-day windows starting at the range
/// start. Monthly cadence yields calendar-month windows, with the first and
/// last clipped to the range. Windows never overlap and together cover the
/// whole range.
///
/// Returns an empty plan when `start > end`.
pub fn plan_intervals(range: &DateRange, frequency: Frequency) -> Vec<(NaiveDate, NaiveDate)> {
    let mut intervals = Vec::new();
    if range.start > range.end {
        return intervals;
    }

    match frequency {
        Frequency::Weekly => {
            let mut cursor = range.start;
            while cursor <= range.end {
                let window_end = cursor + Days::new(6);
                intervals.push((cursor, window_end.min(range.end)));
                cursor = cursor + Days::new(7);
            }
        }
        Frequency::Monthly => {
            let mut cursor = range.start;
            while cursor <= range.end {
                let month_end = last_day_of_month(cursor);
                intervals.push((cursor, month_end.min(range.end)));
                cursor = month_end + Days::new(1);
            }
        }
    }

    intervals
}

/// Number of samples a request would produce.
pub fn sample_count(range: &DateRange, frequency: Frequency) -> usize {
    plan_intervals(range, frequency).len()
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    // Jump past the 28th into the next month, then step back to day zero.
    let into_next = date
        .with_day(28)
        .expect("day 28 exists in every month")
        + Days::new(4);
    into_next - Days::new(into_next.day() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_plan_covers_range_without_overlap() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 31));
        let plan = plan_intervals(&range, Frequency::Weekly);

        assert_eq!(plan.len(), 5);
        assert_eq!(plan[0], (date(2024, 3, 1), date(2024, 3, 7)));
        assert_eq!(plan[4], (date(2024, 3, 29), date(2024, 3, 31)));

        for pair in plan.windows(2) {
            assert_eq!(
                pair[1].0,
                pair[0].1 + Days::new(1),
                "Windows should be contiguous"
            );
        }
    }

    #[test]
    fn test_monthly_plan_clips_to_calendar_months() {
        let range = DateRange::new(date(2024, 1, 15), date(2024, 3, 10));
        let plan = plan_intervals(&range, Frequency::Monthly);

        assert_eq!(
            plan,
            vec![
                (date(2024, 1, 15), date(2024, 1, 31)),
                (date(2024, 2, 1), date(2024, 2, 29)),
                (date(2024, 3, 1), date(2024, 3, 10)),
            ]
        );
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::new(date(2024, 6, 5), date(2024, 6, 5));
        assert_eq!(sample_count(&range, Frequency::Weekly), 1);
        assert_eq!(sample_count(&range, Frequency::Monthly), 1);
    }

    #[test]
    fn test_inverted_range_plans_nothing() {
        let range = DateRange::new(date(2024, 6, 5), date(2024, 6, 1));
        assert!(plan_intervals(&range, Frequency::Weekly).is_empty());
    }

    #[test]
    fn test_full_year_weekly_exceeds_fifty_samples() {
        // A 365-day weekly request plans 53 windows; admission control is
        // expected to reject it under the default sample cap.
        let range = DateRange::new(date(2023, 1, 1), date(2023, 12, 31));
        assert_eq!(sample_count(&range, Frequency::Weekly), 53);
        assert_eq!(sample_count(&range, Frequency::Monthly), 12);
    }

    #[test]
    fn test_last_day_of_month_handles_leap_february() {
        assert_eq!(last_day_of_month(date(2024, 2, 3)), date(2024, 2, 29));
        assert_eq!(last_day_of_month(date(2023, 2, 3)), date(2023, 2, 28));
        assert_eq!(last_day_of_month(date(2024, 12, 31)), date(2024, 12, 31));
    }
}
