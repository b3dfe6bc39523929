use crate::date::CalendarDate;
use crate::error::{Error, ErrorKind, Result};

/// An inclusive date range, open on either side when a bound is missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    min: Option<CalendarDate>,
    max: Option<CalendarDate>,
}

impl DateRange {
    /// Fails with [`ErrorKind::InvalidRange`] if `min` is after `max`.
    /// The bounds are never swapped.
    pub fn new(min: Option<CalendarDate>, max: Option<CalendarDate>) -> Result<Self> {
        if let (Some(lo), Some(hi)) = (&min, &max) {
            if lo.is_after(hi) {
                return Err(Error::new(
                    ErrorKind::InvalidRange,
                    &format!("{} is after {}", lo, hi),
                ));
            }
        }

        Ok(DateRange { min, max })
    }

    pub fn unbounded() -> Self {
        DateRange::default()
    }

    pub fn min(&self) -> Option<CalendarDate> {
        self.min
    }

    pub fn max(&self) -> Option<CalendarDate> {
        self.max
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.min.map_or(true, |min| !date.is_before(&min))
            && self.max.map_or(true, |max| !date.is_after(&max))
    }

    /// Returns `date` if it lies in the range, otherwise the nearest bound.
    pub fn clamp(&self, date: CalendarDate) -> CalendarDate {
        match (self.min, self.max) {
            (Some(min), _) if date.is_before(&min) => min,
            (_, Some(max)) if date.is_after(&max) => max,
            _ => date,
        }
    }
}
