//! Selection state management.
//!
//! [`SelectionStateManager`] owns the one piece of frequently mutated state in
//! the engine. A selection attempt is checked against the [`Selectability`]
//! boundary and the owner's `should_select` hook before anything changes;
//! state is committed before any notification fires, so a handler always sees
//! the final selection.

mod hooks;
mod state;

pub use hooks::SelectionHooks;
pub use state::{SelectionMode, SelectionState};

use std::collections::BTreeSet;

use crate::calendar::CalendarSystem;
use crate::day::{CalendarDay, YearMonth};
use crate::error::Rejected;
use crate::grid::CellFlags;

/// The range rule deciding which days may be selected.
///
/// A first selectable day only takes effect when it falls inside the
/// displayed months; otherwise every day is selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selectability {
    first_selectable: Option<CalendarDay>,
}

impl Selectability {
    /// No restriction.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Restrict selection to days on or after `first_selectable`, provided it
    /// lies within `first_month..=last_month`.
    pub fn bounded(
        first_selectable: Option<CalendarDay>,
        first_month: YearMonth,
        last_month: YearMonth,
    ) -> Self {
        let first_selectable = first_selectable.filter(|day| {
            let in_range = (first_month..=last_month).contains(&day.year_month());
            if !in_range {
                tracing::debug!(
                    first_selectable = %day,
                    first = %first_month,
                    last = %last_month,
                    "first selectable date outside displayed range, ignoring"
                );
            }
            in_range
        });

        Selectability { first_selectable }
    }

    /// The boundary in effect, if any.
    pub fn first_selectable(&self) -> Option<CalendarDay> {
        self.first_selectable
    }

    pub fn check(&self, day: CalendarDay) -> Result<(), Rejected> {
        match self.first_selectable {
            Some(first) if day < first => Err(Rejected::BeforeFirstSelectable { day, first }),
            _ => Ok(()),
        }
    }
}

/// What a successful selection attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedSelection {
    /// Single mode: `day` is now the selected day.
    Single(CalendarDay),
    /// Multiple mode: a day was added; the full selection in ascending order.
    Multiple(Vec<CalendarDay>),
    /// Multiple mode: the day was already selected, nothing changed.
    AlreadySelected(CalendarDay),
}

/// Holds the selection and enforces mode exclusivity and selectability.
#[derive(Debug, Clone, Default)]
pub struct SelectionStateManager {
    state: SelectionState,
    selectability: Selectability,
    hooks: SelectionHooks,
}

impl SelectionStateManager {
    pub fn new(mode: SelectionMode) -> Self {
        SelectionStateManager {
            state: SelectionState::empty(mode),
            selectability: Selectability::unrestricted(),
            hooks: SelectionHooks::default(),
        }
    }

    pub fn with_hooks(mut self, hooks: SelectionHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn set_hooks(&mut self, hooks: SelectionHooks) {
        self.hooks = hooks;
    }

    pub fn mode(&self) -> SelectionMode {
        self.state.mode()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selectability(&self) -> Selectability {
        self.selectability
    }

    pub fn set_selectability(&mut self, selectability: Selectability) {
        self.selectability = selectability;
    }

    /// Switch mode. Any selection made in the previous mode is discarded.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        if self.mode() == mode {
            return;
        }
        tracing::debug!(
            from = %self.mode(),
            to = %mode,
            "selection mode changed, clearing selection"
        );
        self.state = SelectionState::empty(mode);
    }

    /// Whether `day` passes the boundary and the owner's hook.
    pub fn can_select(&self, day: CalendarDay) -> Result<(), Rejected> {
        self.selectability.check(day)?;
        if !self.hooks.allows(day) {
            return Err(Rejected::Vetoed(day));
        }
        Ok(())
    }

    /// Attempt to select `day`, as a tap on its cell would.
    ///
    /// In single mode the day replaces the current selection. In multiple mode
    /// it is added to the set; selecting a day that is already in the set
    /// changes nothing and does not notify. Use [`deselect`](Self::deselect)
    /// to remove a day.
    pub fn try_select(&mut self, day: CalendarDay) -> Result<AppliedSelection, Rejected> {
        if let Err(rejected) = self.can_select(day) {
            tracing::debug!(%day, reason = %rejected, "selection rejected");
            return Err(rejected);
        }

        match &mut self.state {
            SelectionState::Single(selected) => {
                *selected = Some(day);
                tracing::debug!(%day, "selected single day");
                self.hooks.notify_single(day);
                Ok(AppliedSelection::Single(day))
            }
            SelectionState::Multiple(selected) => {
                if !selected.insert(day) {
                    return Ok(AppliedSelection::AlreadySelected(day));
                }
                let days: Vec<CalendarDay> = selected.iter().copied().collect();
                tracing::debug!(%day, count = days.len(), "added day to selection");
                self.hooks.notify_multiple(&days);
                Ok(AppliedSelection::Multiple(days))
            }
        }
    }

    /// Remove `day` from the selection. Returns whether it was selected.
    ///
    /// Removal never notifies; the selection hooks only report additions.
    pub fn deselect(&mut self, day: CalendarDay) -> bool {
        let removed = match &mut self.state {
            SelectionState::Single(selected) if *selected == Some(day) => {
                *selected = None;
                true
            }
            SelectionState::Single(_) => false,
            SelectionState::Multiple(selected) => selected.remove(&day),
        };
        if removed {
            tracing::debug!(%day, "deselected day");
        }
        removed
    }

    /// Drop selected days that `calendar` does not recognize or that no
    /// longer pass [`can_select`](Self::can_select). Returns the dropped days.
    ///
    /// Run after the boundary, the displayed range or the calendar changes.
    /// Like [`deselect`](Self::deselect), dropping never notifies.
    pub fn revalidate(&mut self, calendar: &dyn CalendarSystem) -> Vec<CalendarDay> {
        let stale: Vec<CalendarDay> = self
            .state
            .days()
            .into_iter()
            .filter(|day| calendar.validate(*day).is_err() || self.can_select(*day).is_err())
            .collect();

        for day in &stale {
            self.deselect(*day);
        }
        if !stale.is_empty() {
            tracing::debug!(count = stale.len(), "dropped days that are no longer selectable");
        }
        stale
    }

    /// Empty the selection, keeping the mode.
    pub fn clear(&mut self) {
        self.state = SelectionState::empty(self.mode());
    }

    /// Replace the single selected day without consulting hooks.
    ///
    /// Does nothing and returns `false` in multiple mode.
    pub fn replace_single(&mut self, day: Option<CalendarDay>) -> bool {
        match &mut self.state {
            SelectionState::Single(selected) => {
                *selected = day;
                true
            }
            SelectionState::Multiple(_) => false,
        }
    }

    /// Replace the selected set without consulting hooks.
    ///
    /// Does nothing and returns `false` in single mode.
    pub fn replace_multiple<I>(&mut self, days: I) -> bool
    where
        I: IntoIterator<Item = CalendarDay>,
    {
        match &mut self.state {
            SelectionState::Multiple(selected) => {
                *selected = days.into_iter().collect();
                true
            }
            SelectionState::Single(_) => false,
        }
    }

    /// The selected day in single mode; always `None` in multiple mode.
    pub fn current_single(&self) -> Option<CalendarDay> {
        match &self.state {
            SelectionState::Single(selected) => *selected,
            SelectionState::Multiple(_) => None,
        }
    }

    /// The selected days in multiple mode; always empty in single mode.
    pub fn current_multiple(&self) -> BTreeSet<CalendarDay> {
        match &self.state {
            SelectionState::Multiple(selected) => selected.clone(),
            SelectionState::Single(_) => BTreeSet::new(),
        }
    }
}

impl CellFlags for SelectionStateManager {
    fn is_selectable(&self, day: CalendarDay) -> bool {
        self.can_select(day).is_ok()
    }

    fn is_selected(&self, day: CalendarDay) -> bool {
        self.state.contains(day)
    }
}
