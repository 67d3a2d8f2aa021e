//! Optional owner callbacks consulted and notified by the selection manager.

use std::fmt;
use std::sync::Arc;

use crate::day::CalendarDay;

type Predicate = Arc<dyn Fn(CalendarDay) -> bool + Send + Sync>;
type SingleSink = Arc<dyn Fn(CalendarDay) + Send + Sync>;
type MultipleSink = Arc<dyn Fn(&[CalendarDay]) + Send + Sync>;

/// Callbacks supplied by whoever owns the calendar.
///
/// Every hook is optional. `should_select` is consulted for each concrete
/// cell when flags are computed, so keep it cheap.
#[derive(Clone, Default)]
pub struct SelectionHooks {
    should_select: Option<Predicate>,
    on_select_single: Option<SingleSink>,
    on_select_multiple: Option<MultipleSink>,
}

impl SelectionHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Veto individual days. Returning `false` makes the day unselectable.
    pub fn should_select<F>(mut self, f: F) -> Self
    where
        F: Fn(CalendarDay) -> bool + Send + Sync + 'static,
    {
        self.should_select = Some(Arc::new(f));
        self
    }

    /// Called after a day is selected in single mode.
    pub fn on_select_single<F>(mut self, f: F) -> Self
    where
        F: Fn(CalendarDay) + Send + Sync + 'static,
    {
        self.on_select_single = Some(Arc::new(f));
        self
    }

    /// Called after a day is added in multiple mode, with the whole selection
    /// in ascending order.
    pub fn on_select_multiple<F>(mut self, f: F) -> Self
    where
        F: Fn(&[CalendarDay]) + Send + Sync + 'static,
    {
        self.on_select_multiple = Some(Arc::new(f));
        self
    }

    pub(crate) fn allows(&self, day: CalendarDay) -> bool {
        self.should_select.as_ref().is_none_or(|f| f(day))
    }

    pub(crate) fn notify_single(&self, day: CalendarDay) {
        if let Some(f) = &self.on_select_single {
            f(day);
        }
    }

    pub(crate) fn notify_multiple(&self, days: &[CalendarDay]) {
        if let Some(f) = &self.on_select_multiple {
            f(days);
        }
    }
}

impl fmt::Debug for SelectionHooks {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SelectionHooks")
            .field("should_select", &self.should_select.is_some())
            .field("on_select_single", &self.on_select_single.is_some())
            .field("on_select_multiple", &self.on_select_multiple.is_some())
            .finish()
    }
}
