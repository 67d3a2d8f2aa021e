//! The calendar view model: the state behind a scrolling month calendar.
//!
//! [`CalendarView`] owns the calendar system, the displayed range, the cached
//! [`GridShape`] and the [`SelectionStateManager`]. The shape is rebuilt
//! whenever the range or the calendar changes; selection changes only
//! re-flag it. Scroll queries read the shape directly and never evaluate
//! cell flags.
//!
//! Every date entering through the view is normalized against the current
//! calendar first, so days the calendar does not have are refused with
//! [`CalendarError::InvalidDate`](crate::error::CalendarError::InvalidDate)
//! and never stored.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::calendar::{CalendarSystem, Gregorian};
use crate::day::{CalendarDay, YearMonth};
use crate::error::{CalendarResult, NotFound};
use crate::grid::{CalendarGridModel, GridShape};
use crate::grid_config::GridConfig;
use crate::normalize::{IntoCalendarDay, normalize};
use crate::scroll::{LayoutMetrics, ScrollPositionResolver};
use crate::selection::{
    AppliedSelection, Selectability, SelectionHooks, SelectionMode, SelectionStateManager,
};

/// Where the renderer should scroll to show a date's month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub month_index: usize,
    pub month: YearMonth,
    /// Target offset, when layout metrics are known.
    pub offset: Option<f64>,
    pub animated: bool,
}

/// State for a scrolling month calendar.
pub struct CalendarView {
    calendar: Arc<dyn CalendarSystem>,
    first_date: Option<CalendarDay>,
    last_date: Option<CalendarDay>,
    first_selectable_date: Option<CalendarDay>,
    shape: GridShape,
    selection: SelectionStateManager,
    layout: Option<Box<dyn LayoutMetrics>>,
}

impl CalendarView {
    /// A view using the host's Gregorian calendar, in single selection mode,
    /// with no dates to display yet.
    pub fn new() -> Self {
        Self::with_calendar(Arc::new(Gregorian::current()))
    }

    pub fn with_calendar(calendar: Arc<dyn CalendarSystem>) -> Self {
        CalendarView {
            calendar,
            first_date: None,
            last_date: None,
            first_selectable_date: None,
            shape: GridShape::default(),
            selection: SelectionStateManager::new(SelectionMode::default()),
            layout: None,
        }
    }

    /// Build a view from configuration.
    pub fn from_config(config: &GridConfig) -> CalendarResult<Self> {
        let mut view = Self::with_calendar(Arc::new(config.calendar()?));
        view.set_layout(config.layout);
        view.set_selection_mode(config.selection_mode);
        view.first_date = config.first_date.map(|d| view.calendar.validate(d)).transpose()?;
        view.last_date = config.last_date.map(|d| view.calendar.validate(d)).transpose()?;
        view.first_selectable_date = config
            .first_selectable_date
            .map(|d| view.calendar.validate(d))
            .transpose()?;
        view.rebuild()?;
        Ok(view)
    }

    pub fn with_hooks(mut self, hooks: SelectionHooks) -> Self {
        self.selection.set_hooks(hooks);
        self
    }

    pub fn set_hooks(&mut self, hooks: SelectionHooks) {
        self.selection.set_hooks(hooks);
    }

    pub fn set_layout<L: LayoutMetrics + 'static>(&mut self, layout: L) {
        self.layout = Some(Box::new(layout));
    }

    // =========================================================================
    // Date setup
    // =========================================================================

    pub fn calendar(&self) -> &Arc<dyn CalendarSystem> {
        &self.calendar
    }

    /// Swap the calendar system. Configured dates are revalidated against the
    /// new calendar; on failure nothing changes. Selected days the new
    /// calendar does not have are dropped.
    pub fn set_calendar(&mut self, calendar: Arc<dyn CalendarSystem>) -> CalendarResult<()> {
        for day in [self.first_date, self.last_date, self.first_selectable_date]
            .into_iter()
            .flatten()
        {
            calendar.validate(day)?;
        }

        let previous = std::mem::replace(&mut self.calendar, calendar);
        if let Err(e) = self.rebuild() {
            self.calendar = previous;
            return Err(e);
        }
        Ok(())
    }

    pub fn first_date(&self) -> Option<CalendarDay> {
        self.first_date
    }

    /// Set the earliest displayed month. Only its month and year matter.
    pub fn set_first_date<D: IntoCalendarDay>(&mut self, date: D) -> CalendarResult<()> {
        let day = normalize(date, self.calendar.as_ref())?;
        let previous = self.first_date.replace(day);
        self.rebuild_or_restore(|view| view.first_date = previous)
    }

    pub fn last_date(&self) -> Option<CalendarDay> {
        self.last_date
    }

    /// Set the latest displayed month. Only its month and year matter.
    pub fn set_last_date<D: IntoCalendarDay>(&mut self, date: D) -> CalendarResult<()> {
        let day = normalize(date, self.calendar.as_ref())?;
        let previous = self.last_date.replace(day);
        self.rebuild_or_restore(|view| view.last_date = previous)
    }

    /// The configured first selectable day, whether or not it is in effect.
    pub fn first_selectable_date(&self) -> Option<CalendarDay> {
        self.first_selectable_date
    }

    /// Days before `date` cannot be selected. Ignored when `date` lies outside
    /// the displayed months. Selected days before it are dropped.
    pub fn set_first_selectable_date<D: IntoCalendarDay>(&mut self, date: D) -> CalendarResult<()> {
        let day = normalize(date, self.calendar.as_ref())?;
        self.first_selectable_date = Some(day);
        self.update_selectability();
        Ok(())
    }

    pub fn clear_first_selectable_date(&mut self) {
        self.first_selectable_date = None;
        self.update_selectability();
    }

    /// The selectability rule currently applied.
    pub fn selectability(&self) -> Selectability {
        self.selection.selectability()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    /// Switching modes discards the current selection.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.selection.set_mode(mode);
    }

    pub fn selection(&self) -> &SelectionStateManager {
        &self.selection
    }

    /// The selected day; always `None` in multiple mode.
    pub fn selected_date(&self) -> Option<CalendarDay> {
        self.selection.current_single()
    }

    /// Set the selected day directly. Hooks are not consulted or notified.
    ///
    /// Returns `Ok(false)` without changing anything in multiple mode.
    pub fn set_selected_date<D: IntoCalendarDay>(&mut self, date: D) -> CalendarResult<bool> {
        let day = normalize(date, self.calendar.as_ref())?;
        Ok(self.selection.replace_single(Some(day)))
    }

    /// The selected days in ascending order; always empty in single mode.
    pub fn selected_dates(&self) -> BTreeSet<CalendarDay> {
        self.selection.current_multiple()
    }

    /// Set the selected days directly. Hooks are not consulted or notified.
    ///
    /// Returns `Ok(false)` without changing anything in single mode.
    pub fn set_selected_dates<I, D>(&mut self, dates: I) -> CalendarResult<bool>
    where
        I: IntoIterator<Item = D>,
        D: IntoCalendarDay,
    {
        let days = dates
            .into_iter()
            .map(|d| normalize(d, self.calendar.as_ref()))
            .collect::<CalendarResult<Vec<_>>>()?;
        Ok(self.selection.replace_multiple(days))
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Handle a tap on the cell for `date`.
    ///
    /// A refusal by the boundary or the hook is reported as
    /// [`CalendarError::Rejected`](crate::error::CalendarError::Rejected).
    pub fn select<D: IntoCalendarDay>(&mut self, date: D) -> CalendarResult<AppliedSelection> {
        let day = normalize(date, self.calendar.as_ref())?;
        Ok(self.selection.try_select(day)?)
    }

    /// Remove `date` from the selection. Returns whether it was selected.
    pub fn deselect<D: IntoCalendarDay>(&mut self, date: D) -> CalendarResult<bool> {
        let day = normalize(date, self.calendar.as_ref())?;
        Ok(self.selection.deselect(day))
    }

    /// Tap-to-toggle: deselect `date` if it is selected, otherwise select it.
    ///
    /// Returns `Ok(None)` when the tap removed the day.
    pub fn toggle<D: IntoCalendarDay>(
        &mut self,
        date: D,
    ) -> CalendarResult<Option<AppliedSelection>> {
        let day = normalize(date, self.calendar.as_ref())?;
        if self.selection.deselect(day) {
            return Ok(None);
        }
        Ok(Some(self.selection.try_select(day)?))
    }

    // =========================================================================
    // Grid and scrolling
    // =========================================================================

    /// The cached, selection-independent grid shape.
    pub fn shape(&self) -> &GridShape {
        &self.shape
    }

    /// The grid with cell flags for the current selection.
    pub fn grid(&self) -> CalendarGridModel {
        self.shape.flag(&self.selection)
    }

    /// Zero-based index of `date`'s month among the displayed months.
    pub fn month_index<D: IntoCalendarDay>(&self, date: D) -> CalendarResult<usize> {
        let day = normalize(date, self.calendar.as_ref())?;
        let month = day.year_month();
        Ok(self.shape.position(month).ok_or(NotFound { month })?)
    }

    /// Work out where to scroll so that `date`'s month is visible.
    ///
    /// Dates outside the displayed months fail with
    /// [`CalendarError::NotFound`](crate::error::CalendarError::NotFound).
    pub fn scroll_to_date<D: IntoCalendarDay>(
        &self,
        date: D,
        animated: bool,
    ) -> CalendarResult<ScrollRequest> {
        let day = normalize(date, self.calendar.as_ref())?;
        let months = self.shape.months();
        let month_index = ScrollPositionResolver::month_index(day, months)?;
        let offset = self
            .layout
            .as_deref()
            .and_then(|layout| ScrollPositionResolver::month_offset(month_index, months, layout));

        tracing::debug!(%day, month_index, ?offset, animated, "scroll to date");

        Ok(ScrollRequest {
            month_index,
            month: day.year_month(),
            offset,
            animated,
        })
    }

    /// The month at the top of the view at `offset`, when layout metrics are
    /// known and something is displayed.
    pub fn visible_month(&self, offset: f64) -> Option<YearMonth> {
        let layout = self.layout.as_deref()?;
        ScrollPositionResolver::visible_month(offset, self.shape.months(), layout)
            .map(|m| m.month())
    }

    fn rebuild(&mut self) -> CalendarResult<()> {
        self.shape = match (self.first_date, self.last_date) {
            (Some(first), Some(last)) => GridShape::build(first, last, self.calendar.as_ref())?,
            _ => GridShape::default(),
        };
        self.update_selectability();
        Ok(())
    }

    fn rebuild_or_restore(&mut self, restore: impl FnOnce(&mut Self)) -> CalendarResult<()> {
        if let Err(e) = self.rebuild() {
            restore(self);
            return Err(e);
        }
        Ok(())
    }

    fn update_selectability(&mut self) {
        let selectability = match (self.shape.first_month(), self.shape.last_month()) {
            (Some(first), Some(last)) => {
                Selectability::bounded(self.first_selectable_date, first, last)
            }
            _ => Selectability::unrestricted(),
        };
        self.selection.set_selectability(selectability);
        self.selection.revalidate(self.calendar.as_ref());
    }
}

impl Default for CalendarView {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CalendarView")
            .field("calendar", &self.calendar)
            .field("first_date", &self.first_date)
            .field("last_date", &self.last_date)
            .field("first_selectable_date", &self.first_selectable_date)
            .field("months", &self.shape.len())
            .field("selection", self.selection.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CalendarError, Rejected};
    use crate::scroll::UniformLayout;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc, Weekday};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn day(year: i32, month: u32, day: u32) -> CalendarDay {
        CalendarDay::new(year, month, day)
    }

    fn q1_view() -> CalendarView {
        let mut view = CalendarView::with_calendar(Arc::new(Gregorian::utc(Weekday::Sun)));
        view.set_first_date(day(2024, 1, 15)).unwrap();
        view.set_last_date(day(2024, 3, 10)).unwrap();
        view
    }

    #[test]
    fn test_defaults() {
        let view = CalendarView::with_calendar(Arc::new(Gregorian::utc(Weekday::Sun)));

        assert_eq!(view.selection_mode(), SelectionMode::Single);
        assert!(view.grid().is_empty());
        assert_eq!(view.selected_date(), None);
    }

    #[test]
    fn test_grid_follows_bounds() {
        let mut view = q1_view();
        assert_eq!(view.grid().len(), 3);

        view.set_last_date(day(2024, 5, 1)).unwrap();
        assert_eq!(view.grid().len(), 5);

        view.set_first_date(day(2024, 6, 1)).unwrap();
        assert!(view.grid().is_empty());
    }

    #[test]
    fn test_invalid_bound_leaves_view_unchanged() {
        let mut view = q1_view();

        let result = view.set_last_date(day(2024, 2, 30));
        assert!(matches!(result, Err(CalendarError::InvalidDate(_))));
        assert_eq!(view.last_date(), Some(day(2024, 3, 10)));
        assert_eq!(view.grid().len(), 3);
    }

    #[test]
    fn test_first_selectable_date_in_range() {
        let mut view = q1_view();
        view.set_first_selectable_date(day(2024, 2, 1)).unwrap();

        let result = view.select(day(2024, 1, 20));
        assert!(matches!(
            result,
            Err(CalendarError::Rejected(Rejected::BeforeFirstSelectable { .. }))
        ));
        assert_eq!(view.selected_date(), None);

        let grid = view.grid();
        assert!(!grid.cell(day(2024, 1, 31)).unwrap().is_selectable);
        assert!(grid.cell(day(2024, 2, 1)).unwrap().is_selectable);
    }

    #[test]
    fn test_first_selectable_date_out_of_range_is_ignored() {
        let mut view = q1_view();
        view.set_first_selectable_date(day(2024, 6, 1)).unwrap();

        assert_eq!(view.selectability().first_selectable(), None);
        assert!(view.select(day(2024, 1, 20)).is_ok());
    }

    #[test]
    fn test_first_selectable_date_comes_into_range() {
        let mut view = q1_view();
        view.set_first_selectable_date(day(2024, 4, 10)).unwrap();
        assert_eq!(view.selectability().first_selectable(), None);

        view.set_last_date(day(2024, 4, 30)).unwrap();
        assert_eq!(view.selectability().first_selectable(), Some(day(2024, 4, 10)));
    }

    #[test]
    fn test_selected_date_setter_is_mode_gated() {
        let mut view = q1_view();

        assert!(view.set_selected_date(day(2024, 2, 10)).unwrap());
        assert_eq!(view.selected_date(), Some(day(2024, 2, 10)));
        assert!(!view.set_selected_dates([day(2024, 2, 11)]).unwrap());
        assert!(view.selected_dates().is_empty());

        view.set_selection_mode(SelectionMode::Multiple);
        assert_eq!(view.selected_date(), None);
        assert!(!view.set_selected_date(day(2024, 2, 10)).unwrap());
        assert!(view.set_selected_dates([day(2024, 2, 20), day(2024, 2, 10)]).unwrap());
        assert_eq!(
            view.selected_dates().into_iter().collect::<Vec<_>>(),
            vec![day(2024, 2, 10), day(2024, 2, 20)]
        );
    }

    #[test]
    fn test_selected_date_setter_normalizes_instants() {
        let mut view = q1_view();
        let instant = Utc.with_ymd_and_hms(2024, 2, 10, 18, 45, 0).unwrap();

        view.set_selected_date(instant).unwrap();
        assert_eq!(view.selected_date(), Some(day(2024, 2, 10)));
        assert!(view.grid().cell(day(2024, 2, 10)).unwrap().is_selected);
    }

    #[test]
    fn test_toggle() {
        let mut view = q1_view();
        view.set_selection_mode(SelectionMode::Multiple);

        assert!(view.toggle(day(2024, 2, 10)).unwrap().is_some());
        assert!(view.toggle(day(2024, 2, 20)).unwrap().is_some());
        assert_eq!(view.toggle(day(2024, 2, 10)).unwrap(), None);
        assert_eq!(
            view.selected_dates().into_iter().collect::<Vec<_>>(),
            vec![day(2024, 2, 20)]
        );
    }

    #[test]
    fn test_hooks_receive_committed_selection() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut view = q1_view().with_hooks(
            SelectionHooks::new().on_select_single(move |d| sink.lock().unwrap().push(d)),
        );

        view.select(day(2024, 2, 10)).unwrap();
        view.select(day(2024, 2, 20)).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![day(2024, 2, 10), day(2024, 2, 20)]);
        assert_eq!(view.selected_date(), Some(day(2024, 2, 20)));
    }

    #[test]
    fn test_scroll_to_date() {
        let mut view = q1_view();

        let request = view.scroll_to_date(day(2024, 3, 5), true).unwrap();
        assert_eq!(request.month_index, 2);
        assert_eq!(request.offset, None);
        assert!(request.animated);

        view.set_layout(UniformLayout {
            header_height: 40.0,
            row_height: 10.0,
            content_inset_top: 0.0,
        });
        let request = view.scroll_to_date(day(2024, 2, 29), false).unwrap();
        assert_eq!(request.month_index, 1);
        assert_eq!(request.offset, Some(90.0));
        assert_eq!(view.visible_month(95.0), Some(YearMonth::new(2024, 2)));
    }

    #[test]
    fn test_scroll_to_date_outside_range() {
        let view = q1_view();

        let result = view.scroll_to_date(day(2024, 4, 1), false);
        assert!(matches!(
            result,
            Err(CalendarError::NotFound(NotFound { month })) if month == YearMonth::new(2024, 4)
        ));
        assert!(view.month_index(day(2023, 12, 1)).is_err());
        assert_eq!(view.month_index(day(2024, 1, 1)).unwrap(), 0);
    }

    #[test]
    fn test_changing_calendar_rebuilds_shape() {
        let mut view = q1_view();
        let first_week = view.grid().months()[0].weeks[0];
        assert!(first_week.cells()[0].is_padding());

        view.set_calendar(Arc::new(Gregorian::utc(Weekday::Mon))).unwrap();
        let first_week = view.grid().months()[0].weeks[0];
        assert_eq!(first_week.cells()[0].date, Some(day(2024, 1, 1)));
    }

    #[test]
    fn test_from_config() {
        let config = GridConfig {
            first_date: Some(day(2024, 1, 15)),
            last_date: Some(day(2024, 3, 10)),
            first_selectable_date: Some(day(2024, 2, 1)),
            selection_mode: SelectionMode::Multiple,
            time_zone: Some("UTC".to_string()),
            ..GridConfig::default()
        };

        let view = CalendarView::from_config(&config).unwrap();

        assert_eq!(view.grid().len(), 3);
        assert_eq!(view.selection_mode(), SelectionMode::Multiple);
        assert_eq!(view.selectability().first_selectable(), Some(day(2024, 2, 1)));
        assert!(view.scroll_to_date(day(2024, 2, 1), false).unwrap().offset.is_some());
    }

    #[test]
    fn test_select_refuses_days_the_calendar_lacks() {
        let mut view = q1_view();

        let result = view.select(day(2024, 2, 30));
        assert!(matches!(result, Err(CalendarError::InvalidDate(_))));
        assert!(matches!(
            view.select(day(2024, 13, 45)),
            Err(CalendarError::InvalidDate(_))
        ));
        assert!(matches!(
            view.toggle(day(2023, 2, 29)),
            Err(CalendarError::InvalidDate(_))
        ));
        assert!(view.deselect(day(2024, 4, 31)).is_err());
        assert_eq!(view.selected_date(), None);

        view.set_selection_mode(SelectionMode::Multiple);
        assert!(view.select(day(2024, 2, 30)).is_err());
        assert!(view.selected_dates().is_empty());
    }

    #[test]
    fn test_select_normalizes_instants() {
        let mut view = q1_view();
        let instant = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 0).unwrap();

        assert_eq!(
            view.select(instant).unwrap(),
            AppliedSelection::Single(day(2024, 2, 29))
        );
    }

    #[test]
    fn test_scrolling_does_not_evaluate_cell_flags() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut view = q1_view().with_hooks(SelectionHooks::new().should_select(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        }));
        view.set_layout(UniformLayout::default());

        let request = view.scroll_to_date(day(2024, 2, 5), true).unwrap();
        assert_eq!(request.month_index, 1);
        assert_eq!(view.visible_month(0.0), Some(YearMonth::new(2024, 1)));
        assert_eq!(view.month_index(day(2024, 3, 1)).unwrap(), 2);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_new_boundary_drops_earlier_selection() {
        let mut view = q1_view();
        view.select(day(2024, 1, 20)).unwrap();

        view.set_first_selectable_date(day(2024, 2, 1)).unwrap();

        assert_eq!(view.selected_date(), None);
        let cell = *view.grid().cell(day(2024, 1, 20)).unwrap();
        assert!(!cell.is_selectable);
        assert!(!cell.is_selected);
    }

    #[test]
    fn test_range_change_drops_selection_behind_boundary() {
        let mut view = q1_view();
        view.set_selection_mode(SelectionMode::Multiple);
        view.select(day(2024, 3, 20)).unwrap();
        view.select(day(2024, 4, 15)).unwrap();
        view.set_first_selectable_date(day(2024, 4, 10)).unwrap();
        assert_eq!(view.selected_dates().len(), 2);

        view.set_last_date(day(2024, 4, 30)).unwrap();

        assert_eq!(
            view.selected_dates().into_iter().collect::<Vec<_>>(),
            vec![day(2024, 4, 15)]
        );
    }

    /// Gregorian rules, except that no month runs past the 30th.
    #[derive(Debug)]
    struct ShortMonths(Gregorian);

    impl CalendarSystem for ShortMonths {
        fn identifier(&self) -> &str {
            "short-months"
        }

        fn first_weekday(&self) -> Weekday {
            self.0.first_weekday()
        }

        fn months_in_year(&self, year: i32) -> CalendarResult<u32> {
            self.0.months_in_year(year)
        }

        fn days_in_month(&self, month: YearMonth) -> CalendarResult<u32> {
            Ok(self.0.days_in_month(month)?.min(30))
        }

        fn weekday(&self, day: CalendarDay) -> CalendarResult<Weekday> {
            self.0.weekday(day)
        }

        fn day_of_instant(&self, instant: DateTime<Utc>) -> CalendarResult<CalendarDay> {
            self.0.day_of_instant(instant)
        }

        fn day_of_civil(&self, date: NaiveDate) -> CalendarResult<CalendarDay> {
            self.0.day_of_civil(date)
        }
    }

    #[test]
    fn test_changing_calendar_drops_days_it_lacks() {
        let mut view = q1_view();
        view.set_selection_mode(SelectionMode::Multiple);
        view.select(day(2024, 1, 10)).unwrap();
        view.select(day(2024, 1, 31)).unwrap();

        view.set_calendar(Arc::new(ShortMonths(Gregorian::utc(Weekday::Sun))))
            .unwrap();

        assert_eq!(
            view.selected_dates().into_iter().collect::<Vec<_>>(),
            vec![day(2024, 1, 10)]
        );
        assert!(view.grid().cell(day(2024, 1, 31)).is_none());
    }
}
