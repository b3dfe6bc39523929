use std::slice;

use crate::date::CalendarDate;
use crate::range::DateRange;

/// Years covered on each unbounded side of a range.
pub const DEFAULT_SPAN_YEARS: u32 = 200;

/// Largest span accepted for an unbounded side.
pub const MAX_SPAN_YEARS: u32 = 10_000;

/// The pages a calendar can show: one month start per page, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthSequence {
    months: Vec<CalendarDate>,
}

impl MonthSequence {
    /// Builds the months spanned by `range`.
    ///
    /// A missing bound is replaced by `anchor` moved `span_years` into the
    /// past (for the minimum) or the future (for the maximum). If that would
    /// cross the other, present bound, the span is measured from that bound
    /// instead. Every entry is normalized to the first day of its month.
    /// Spans above [`MAX_SPAN_YEARS`] are capped.
    pub fn build(range: &DateRange, anchor: &CalendarDate, span_years: u32) -> Self {
        let span = span_years.min(MAX_SPAN_YEARS) as i32;

        let first = match (range.min(), range.max()) {
            (Some(min), _) => min,
            (None, Some(max)) if anchor.add_years(-span).is_after(&max) => max.add_years(-span),
            (None, _) => anchor.add_years(-span),
        }
        .month_start();
        let last = match (range.min(), range.max()) {
            (_, Some(max)) => max,
            (Some(min), None) if anchor.add_years(span).is_before(&min) => min.add_years(span),
            (_, None) => anchor.add_years(span),
        }
        .month_start();

        let count = last.month_ordinal() - first.month_ordinal() + 1;
        let mut months = Vec::with_capacity(count.max(1) as usize);
        let mut month = first;
        loop {
            months.push(month);
            if !month.is_before(&last) {
                break;
            }
            month = month.next_month();
        }

        log::debug!(
            "built {} month(s) from {} to {}",
            months.len(),
            first,
            last
        );

        MonthSequence { months }
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<CalendarDate> {
        self.months.get(position).copied()
    }

    pub fn first(&self) -> CalendarDate {
        self.months[0]
    }

    pub fn last(&self) -> CalendarDate {
        self.months[self.months.len() - 1]
    }

    pub fn last_index(&self) -> usize {
        self.months.len() - 1
    }

    pub fn middle_index(&self) -> usize {
        self.months.len() / 2
    }

    pub fn iter(&self) -> slice::Iter<'_, CalendarDate> {
        self.months.iter()
    }

    /// Page showing the month that contains `date`.
    ///
    /// Dates before the first month map to the first page, dates after the
    /// last month to the last page. `None` maps to the middle page.
    pub fn index_of_month_containing(&self, date: Option<&CalendarDate>) -> usize {
        let date = match date {
            Some(date) => date,
            None => return self.middle_index(),
        };

        if date.month_start().is_before(&self.first()) {
            return 0;
        }
        if date.month_start().is_after(&self.last()) {
            return self.last_index();
        }

        match self.position_of(date) {
            Some(position) => position,
            None => {
                log::warn!(
                    "{} lies within {}..={} but has no page, falling back to the middle",
                    date,
                    self.first(),
                    self.last()
                );
                self.middle_index()
            }
        }
    }

    /// Exact lookup by `(year, month)`.
    pub fn position_of(&self, month: &CalendarDate) -> Option<usize> {
        let offset = month.month_ordinal() - self.first().month_ordinal();
        if offset < 0 {
            return None;
        }

        let position = offset as usize;
        match self.months.get(position) {
            Some(candidate) if candidate.is_same_month(month) => Some(position),
            _ => self.months.iter().position(|m| m.is_same_month(month)),
        }
    }
}

impl<'a> IntoIterator for &'a MonthSequence {
    type Item = &'a CalendarDate;
    type IntoIter = slice::Iter<'a, CalendarDate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::new(y, m, d)
    }

    fn bounded(min: CalendarDate, max: CalendarDate) -> MonthSequence {
        let range = DateRange::new(Some(min), Some(max)).unwrap();
        MonthSequence::build(&range, &date(2020, 6, 15), DEFAULT_SPAN_YEARS)
    }

    #[test]
    fn single_month_range() {
        let months = bounded(date(2020, 3, 5), date(2020, 3, 20));
        assert_eq!(months.len(), 1);
        assert_eq!(months.first(), date(2020, 3, 1));
    }

    #[test]
    fn crosses_year_boundary() {
        let months = bounded(date(2019, 11, 30), date(2020, 2, 1));
        let collected: Vec<_> = months.iter().copied().collect();
        assert_eq!(
            collected,
            vec![
                date(2019, 11, 1),
                date(2019, 12, 1),
                date(2020, 1, 1),
                date(2020, 2, 1)
            ]
        );
    }

    #[test]
    fn unbounded_spans_default_years() {
        let anchor = date(2026, 10, 19);
        let months = MonthSequence::build(&DateRange::unbounded(), &anchor, DEFAULT_SPAN_YEARS);

        assert_eq!(months.first(), date(1826, 10, 1));
        assert_eq!(months.last(), date(2226, 10, 1));
        assert_eq!(months.len(), 400 * 12 + 1);
    }

    #[test]
    fn half_bounded_uses_anchor_for_missing_side() {
        let range = DateRange::new(Some(date(2000, 1, 1)), None).unwrap();
        let months = MonthSequence::build(&range, &date(2020, 6, 15), 1);

        assert_eq!(months.first(), date(2000, 1, 1));
        assert_eq!(months.last(), date(2021, 6, 1));
    }

    #[test]
    fn maximum_before_default_span_keeps_its_month() {
        let range = DateRange::new(None, Some(date(1700, 1, 1))).unwrap();
        let months = MonthSequence::build(&range, &date(2026, 10, 19), DEFAULT_SPAN_YEARS);

        assert_eq!(months.first(), date(1500, 1, 1));
        assert_eq!(months.last(), date(1700, 1, 1));
        assert_eq!(months.position_of(&date(1650, 5, 5)), Some(150 * 12 + 4));
    }

    #[test]
    fn minimum_after_default_span_keeps_its_month() {
        let range = DateRange::new(Some(date(2500, 1, 1)), None).unwrap();
        let months = MonthSequence::build(&range, &date(2026, 10, 19), DEFAULT_SPAN_YEARS);

        assert_eq!(months.first(), date(2500, 1, 1));
        assert_eq!(months.last(), date(2700, 1, 1));
        assert_eq!(months.position_of(&date(2600, 3, 3)), Some(100 * 12 + 2));
    }

    #[test]
    fn oversized_span_is_capped() {
        let anchor = date(2026, 10, 19);
        let months = MonthSequence::build(&DateRange::unbounded(), &anchor, 3_000_000_000);

        assert_eq!(months.first(), anchor.add_years(-(MAX_SPAN_YEARS as i32)).month_start());
        assert_eq!(months.last(), anchor.add_years(MAX_SPAN_YEARS as i32).month_start());
        assert!(months.first().is_before(&months.last()));
    }

    #[test]
    fn index_of_month_containing() {
        let months = bounded(date(2020, 1, 1), date(2020, 12, 31));

        assert_eq!(months.index_of_month_containing(Some(&date(2020, 6, 15))), 5);
        assert_eq!(months.index_of_month_containing(Some(&date(2019, 6, 15))), 0);
        assert_eq!(months.index_of_month_containing(Some(&date(2021, 1, 1))), 11);
        assert_eq!(months.index_of_month_containing(None), 6);
    }

    #[test]
    fn position_of_tracks_month_identity() {
        let months = bounded(date(2020, 3, 1), date(2020, 4, 30));

        assert_eq!(months.position_of(&date(2020, 4, 1)), Some(1));
        assert_eq!(months.position_of(&date(2020, 4, 17)), Some(1));
        assert_eq!(months.position_of(&date(2020, 6, 1)), None);
        assert_eq!(months.position_of(&date(2020, 2, 1)), None);
    }

    #[test]
    fn gap_in_sequence_falls_back_to_middle() {
        // Not reachable through `build`; guards against a malformed sequence.
        let months = MonthSequence {
            months: vec![date(2020, 1, 1), date(2020, 2, 1), date(2020, 4, 1)],
        };

        assert_eq!(months.index_of_month_containing(Some(&date(2020, 3, 10))), 1);
    }
}
