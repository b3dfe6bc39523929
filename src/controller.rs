use std::collections::VecDeque;

use crate::cmds::Cmd;
use crate::config::Config;
use crate::date::CalendarDate;
use crate::error::Result;
use crate::months::{MonthSequence, DEFAULT_SPAN_YEARS};
use crate::paging::Paging;
use crate::range::DateRange;
use crate::state::SavedState;

/// Follow-up commands processed per outer call before the rest is dropped.
pub const MAX_FOLLOW_UPS: usize = 64;

/// Receives the resolved selection whenever it changes.
///
/// The returned command is queued as a follow-up and applied after the
/// current change has been delivered to every listener. Return
/// [`Cmd::Noop`] for no follow-up.
pub trait SelectionListener {
    fn on_selection_changed(&mut self, date: Option<CalendarDate>) -> Cmd;
}

impl<F> SelectionListener for F
where
    F: FnMut(Option<CalendarDate>) -> Cmd,
{
    fn on_selection_changed(&mut self, date: Option<CalendarDate>) -> Cmd {
        self(date)
    }
}

// `Some(selection)` when listeners have to hear about `selection`
type Change = Option<Option<CalendarDate>>;

/// Paging and selection state of one calendar.
///
/// Keeps the current page inside the month sequence and the selection
/// inside the active range across every operation.
pub struct CalendarController {
    anchor: CalendarDate,
    span_years: u32,
    range: DateRange,
    months: MonthSequence,
    position: usize,
    selected: Option<CalendarDate>,
    listeners: Vec<Box<dyn SelectionListener>>,
}

impl Default for CalendarController {
    fn default() -> Self {
        CalendarController::new(CalendarDate::today())
    }
}

impl CalendarController {
    /// Unbounded controller showing the month of `anchor`. Unbounded range
    /// sides always extend [`DEFAULT_SPAN_YEARS`] around `anchor`.
    pub fn new(anchor: CalendarDate) -> Self {
        CalendarController::with_span(anchor, DEFAULT_SPAN_YEARS)
    }

    pub fn with_span(anchor: CalendarDate, span_years: u32) -> Self {
        let range = DateRange::unbounded();
        let months = MonthSequence::build(&range, &anchor, span_years);
        let position = months.index_of_month_containing(Some(&anchor));

        CalendarController {
            anchor,
            span_years,
            range,
            months,
            position,
            selected: None,
            listeners: Vec::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut controller =
            CalendarController::with_span(CalendarDate::today(), config.default_span_years);
        controller.set_range(config.min_date, config.max_date)?;
        Ok(controller)
    }

    pub fn add_listener<L: SelectionListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    pub fn anchor(&self) -> CalendarDate {
        self.anchor
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn months(&self) -> &MonthSequence {
        &self.months
    }

    pub fn page_count(&self) -> usize {
        self.months.len()
    }

    pub fn month_at(&self, position: usize) -> Option<CalendarDate> {
        self.months.get(position)
    }

    pub fn current_position(&self) -> usize {
        self.position
    }

    pub fn current_month(&self) -> CalendarDate {
        self.months.get(self.position).unwrap_or_else(|| self.months.last())
    }

    pub fn selected_date(&self) -> Option<CalendarDate> {
        self.selected
    }

    /// Replaces the active range.
    ///
    /// The page keeps showing the previously current month if it still
    /// exists, and the selection is clamped into the new range. Listeners
    /// hear about the selection only if clamping changed it. On error
    /// nothing is modified.
    pub fn set_range(
        &mut self,
        min: Option<CalendarDate>,
        max: Option<CalendarDate>,
    ) -> Result<()> {
        let change = self.apply_range(min, max)?;
        self.settle(change);
        Ok(())
    }

    /// Selects `date` clamped into the active range and shows its month.
    ///
    /// Listeners receive the clamped value, also when it equals the
    /// previous selection but differs from `date`.
    pub fn set_selected_date(&mut self, date: Option<CalendarDate>) {
        let change = self.apply_selection(date);
        self.settle(change);
    }

    /// Shows the page at `position`, clamped to the existing pages.
    pub fn set_current_position(&mut self, position: usize) {
        self.position = position.min(self.months.last_index());
    }

    /// Shows the page of the month containing `date`.
    pub fn set_current_month(&mut self, date: &CalendarDate) {
        let position = self.months.index_of_month_containing(Some(date));
        self.set_current_position(position);
    }

    pub fn send_cmd(&mut self, cmd: &Cmd) -> Result<()> {
        let change = self.apply(cmd)?;
        self.settle(change);
        Ok(())
    }

    pub fn snapshot(&self) -> SavedState {
        SavedState {
            min_date: self.range.min(),
            max_date: self.range.max(),
            selected_date: self.selected,
        }
    }

    /// Applies the range of `state`, then its selection.
    pub fn restore(&mut self, state: &SavedState) -> Result<()> {
        self.set_range(state.min_date, state.max_date)?;
        self.set_selected_date(state.selected_date);
        Ok(())
    }

    fn apply(&mut self, cmd: &Cmd) -> Result<Change> {
        match *cmd {
            Cmd::Noop | Cmd::Exit => {}
            Cmd::NextPage(n) => self.page_n_forward(n),
            Cmd::PrevPage(n) => self.page_n_backward(n),
            Cmd::ShowPosition(position) => self.set_current_position(position),
            Cmd::ShowMonth(date) => self.set_current_month(&date),
            Cmd::Select(date) => return Ok(self.apply_selection(date)),
            Cmd::SelectToday => return Ok(self.apply_selection(Some(CalendarDate::today()))),
            Cmd::SetRange(min, max) => return self.apply_range(min, max),
        }

        Ok(None)
    }

    fn apply_range(
        &mut self,
        min: Option<CalendarDate>,
        max: Option<CalendarDate>,
    ) -> Result<Change> {
        let range = DateRange::new(min, max)?;
        let months = MonthSequence::build(&range, &self.anchor, self.span_years);

        let current = self.current_month();
        self.position = months.index_of_month_containing(Some(&current));
        self.range = range;
        self.months = months;

        log::debug!(
            "re-homed {} to page {} of {}",
            current,
            self.position,
            self.months.len()
        );

        let previous = self.selected;
        self.selected = previous.map(|date| range.clamp(date));

        if self.selected != previous {
            Ok(Some(self.selected))
        } else {
            Ok(None)
        }
    }

    fn apply_selection(&mut self, date: Option<CalendarDate>) -> Change {
        let previous = self.selected;
        let resolved = date.map(|date| self.range.clamp(date));

        self.selected = resolved;
        if let Some(date) = &resolved {
            self.position = self.months.index_of_month_containing(Some(date));
        }

        if resolved != previous || resolved != date {
            Some(resolved)
        } else {
            None
        }
    }

    /// Notifies listeners of `change` and runs the follow-ups they return,
    /// one complete transition at a time.
    fn settle(&mut self, change: Change) {
        let mut pending = VecDeque::new();
        if let Some(selection) = change {
            self.notify(selection, &mut pending);
        }

        let mut processed = 0;
        while let Some(cmd) = pending.pop_front() {
            if processed == MAX_FOLLOW_UPS {
                log::warn!(
                    "dropping {} follow-up command(s) after {} processed",
                    pending.len() + 1,
                    MAX_FOLLOW_UPS
                );
                break;
            }
            processed += 1;

            match self.apply(&cmd) {
                Ok(Some(selection)) => self.notify(selection, &mut pending),
                Ok(None) => {}
                Err(err) => log::error!("dropping follow-up {:?}: {}", cmd, err),
            }
        }
    }

    fn notify(&mut self, selection: Option<CalendarDate>, pending: &mut VecDeque<Cmd>) {
        for listener in self.listeners.iter_mut() {
            match listener.on_selection_changed(selection) {
                Cmd::Noop => {}
                cmd => pending.push_back(cmd),
            }
        }
    }
}

impl Paging for CalendarController {
    fn page_n_backward(&mut self, n: usize) {
        self.set_current_position(self.position.saturating_sub(n));
    }

    fn page_n_forward(&mut self, n: usize) {
        self.set_current_position(self.position.saturating_add(n));
    }

    fn can_page_backward(&self) -> bool {
        self.position > 0
    }

    fn can_page_forward(&self) -> bool {
        self.position < self.months.last_index()
    }
}
