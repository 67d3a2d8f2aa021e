//! Mapping between dates, month indices and scroll offsets.
//!
//! Pixel geometry belongs to the renderer. It reports its header and row
//! heights through [`LayoutMetrics`] and this module does the index
//! arithmetic on top of them. The arithmetic only needs each month's row
//! count, so it runs on the cached [`GridShape`](crate::grid::GridShape)
//! as well as on a flagged model, without evaluating any cell flags.

use serde::{Deserialize, Serialize};

use crate::day::{CalendarDay, YearMonth};
use crate::error::NotFound;
use crate::grid::{MonthDescriptor, MonthShape};

/// A laid-out month as scrolling sees it.
pub trait MonthRows {
    fn year_month(&self) -> YearMonth;

    /// Number of week rows drawn for the month.
    fn row_count(&self) -> usize;
}

impl MonthRows for MonthDescriptor {
    fn year_month(&self) -> YearMonth {
        MonthDescriptor::year_month(self)
    }

    fn row_count(&self) -> usize {
        self.weeks.len()
    }
}

impl MonthRows for MonthShape {
    fn year_month(&self) -> YearMonth {
        self.month()
    }

    fn row_count(&self) -> usize {
        self.weeks().len()
    }
}

/// Heights reported by the renderer, in its own units.
pub trait LayoutMetrics {
    /// Height of the header drawn above each month.
    fn header_height(&self) -> f64;

    /// Height of one week row.
    fn row_height(&self) -> f64;

    /// Distance from the top of the view to where content begins.
    fn content_inset_top(&self) -> f64 {
        0.0
    }

    /// Total height of a month with `rows` week rows, header included.
    fn month_height(&self, rows: usize) -> f64 {
        self.header_height() + self.row_height() * rows as f64
    }
}

/// Fixed header and row heights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniformLayout {
    pub header_height: f64,
    pub row_height: f64,
    pub content_inset_top: f64,
}

impl Default for UniformLayout {
    fn default() -> Self {
        UniformLayout {
            header_height: 44.0,
            row_height: 46.0,
            content_inset_top: 0.0,
        }
    }
}

impl LayoutMetrics for UniformLayout {
    fn header_height(&self) -> f64 {
        self.header_height
    }

    fn row_height(&self) -> f64 {
        self.row_height
    }

    fn content_inset_top(&self) -> f64 {
        self.content_inset_top
    }
}

/// Answers "where is this date" and "what is on screen" for a run of
/// consecutive months.
pub struct ScrollPositionResolver;

impl ScrollPositionResolver {
    /// Zero-based index of the month containing `date`.
    ///
    /// Dates outside the displayed months are reported as [`NotFound`]; the
    /// caller decides whether to clamp or ignore the request.
    pub fn month_index<M: MonthRows>(date: CalendarDay, months: &[M]) -> Result<usize, NotFound> {
        let month = date.year_month();
        months
            .binary_search_by(|m| m.year_month().cmp(&month))
            .map_err(|_| NotFound { month })
    }

    /// Scroll offset at which the month at `index` starts.
    pub fn month_offset<M: MonthRows>(
        index: usize,
        months: &[M],
        metrics: &dyn LayoutMetrics,
    ) -> Option<f64> {
        if index >= months.len() {
            return None;
        }
        let start: f64 = months[..index]
            .iter()
            .map(|m| metrics.month_height(m.row_count()))
            .sum();
        Some(start - metrics.content_inset_top())
    }

    /// The month at the top of the view when scrolled to `offset`.
    ///
    /// Offsets before the content resolve to the first month and offsets past
    /// it to the last. Returns `None` only when there are no months.
    pub fn visible_month<'a, M: MonthRows>(
        offset: f64,
        months: &'a [M],
        metrics: &dyn LayoutMetrics,
    ) -> Option<&'a M> {
        let index = Self::visible_month_index(offset, months, metrics)?;
        months.get(index)
    }

    /// Index form of [`visible_month`](Self::visible_month).
    pub fn visible_month_index<M: MonthRows>(
        offset: f64,
        months: &[M],
        metrics: &dyn LayoutMetrics,
    ) -> Option<usize> {
        if months.is_empty() {
            return None;
        }

        let top = offset + metrics.content_inset_top();
        let mut end = 0.0;
        for (index, month) in months.iter().enumerate() {
            end += metrics.month_height(month.row_count());
            if top < end {
                return Some(index);
            }
        }
        Some(months.len() - 1)
    }

    /// The offset of the month start nearest to `offset`, for paging that
    /// snaps to whole months.
    pub fn snap_offset<M: MonthRows>(
        offset: f64,
        months: &[M],
        metrics: &dyn LayoutMetrics,
    ) -> Option<f64> {
        let index = Self::visible_month_index(offset, months, metrics)?;
        let start = Self::month_offset(index, months, metrics)?;
        let height = metrics.month_height(months[index].row_count());

        if offset - start > height / 2.0 {
            if let Some(next) = Self::month_offset(index + 1, months, metrics) {
                return Some(next);
            }
        }
        Some(start)
    }
}
