//! Page planning shared by the paged listing queries.
//!
//! A [`PagePlan`] owns one filter predicate and one offset/limit window. The
//! data query and the count query are both derived from the same plan, so the
//! reported `total` always matches the filter that produced `data`.

use sea_orm::sea_query::{LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect, Select, Value};
use serde::Serialize;

use super::error::{StoreError, StoreResult};

pub const DEFAULT_PAGE_NUMBER: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct Pagination<T> {
    pub data: T,
    pub total: u64,
    pub page_size: u64,
    pub page_number: u64,
}

/// Offset/limit pair for a 1-indexed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page_number: u64,
    pub page_size: u64,
}

impl PageWindow {
    pub fn new(page_number: i64, page_size: i64, max_page_size: u64) -> StoreResult<Self> {
        if page_size <= 0 {
            return Err(StoreError::invalid_argument(format!(
                "Invalid page size: {page_size}. Page size must be a positive integer"
            )));
        }
        if page_number <= 0 {
            return Err(StoreError::invalid_argument(format!(
                "Invalid page number: {page_number}. Page numbers start at 1"
            )));
        }

        let page_size = page_size.unsigned_abs();
        if page_size > max_page_size {
            return Err(StoreError::invalid_argument(format!(
                "Invalid page size: {page_size}. Page size must be at most {max_page_size}"
            )));
        }

        Ok(Self {
            page_number: page_number.unsigned_abs(),
            page_size,
        })
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.page_size
    }

    #[must_use]
    pub const fn wrap<T>(&self, data: T, total: u64) -> Pagination<T> {
        Pagination {
            data,
            total,
            page_size: self.page_size,
            page_number: self.page_number,
        }
    }
}

/// Builds an AND-combined predicate from optional filter fields.
///
/// Absent values add nothing to the predicate. Blank strings are skipped
/// by the equality filters and empty ones by [`Filter::contains`].
#[derive(Debug, Clone)]
pub struct Filter {
    condition: Condition,
}

impl Default for Filter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            condition: Condition::all(),
        }
    }

    #[must_use]
    pub fn eq<C, V>(self, column: C, value: Option<V>) -> Self
    where
        C: ColumnTrait,
        V: Into<Value>,
    {
        match value {
            Some(v) => self.push(column.eq(v)),
            None => self,
        }
    }

    #[must_use]
    pub fn eq_str<C: ColumnTrait>(self, column: C, value: Option<&str>) -> Self {
        match non_blank(value) {
            Some(v) => self.push(column.eq(v)),
            None => self,
        }
    }

    /// Literal substring match. The value is used as given, so `%` and `_`
    /// match themselves and surrounding spaces are significant.
    #[must_use]
    pub fn contains<C: ColumnTrait>(self, column: C, value: Option<&str>) -> Self {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => {
                let pattern = format!("%{}%", escape_like(v));
                self.push(column.like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)))
            }
            None => self,
        }
    }

    fn push(self, expr: SimpleExpr) -> Self {
        Self {
            condition: self.condition.add(expr),
        }
    }

    #[must_use]
    pub fn into_condition(self) -> Condition {
        self.condition
    }
}

const LIKE_ESCAPE: char = '\\';

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct PagePlan {
    condition: Condition,
    window: PageWindow,
}

impl PagePlan {
    #[must_use]
    pub fn new(filter: Filter, window: PageWindow) -> Self {
        Self {
            condition: filter.into_condition(),
            window,
        }
    }

    /// Applies the predicate and the page window. Callers add the ordering.
    #[must_use]
    pub fn page<E: EntityTrait>(&self, select: Select<E>) -> Select<E> {
        select
            .filter(self.condition.clone())
            .offset(self.window.offset())
            .limit(self.window.limit())
    }

    /// Applies only the predicate, for the matching count query.
    #[must_use]
    pub fn count<E: EntityTrait>(&self, select: Select<E>) -> Select<E> {
        select.filter(self.condition.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{devices, prelude::*};
    use crate::models::status::LockState;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_page_window_offsets() {
        let first = PageWindow::new(1, 10, 100).unwrap();
        assert_eq!(first.offset(), 0);
        assert_eq!(first.limit(), 10);

        let third = PageWindow::new(3, 25, 100).unwrap();
        assert_eq!(third.offset(), 50);
    }

    #[test]
    fn test_page_window_rejects_bad_input() {
        assert!(matches!(
            PageWindow::new(1, 0, 100),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            PageWindow::new(0, 10, 100),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            PageWindow::new(-2, 10, 100),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(PageWindow::new(1, 101, 100).is_err());
    }

    #[test]
    fn test_plan_shares_predicate() {
        let filter = Filter::new()
            .contains(devices::Column::Name, Some("tv"))
            .eq(devices::Column::IsLocked, Some(LockState::Locked))
            .eq_str(devices::Column::Os, Some("   "));
        let plan = PagePlan::new(filter, PageWindow::new(2, 5, 100).unwrap());

        let page_sql = plan
            .page(Devices::find())
            .build(DbBackend::Sqlite)
            .to_string();
        let count_sql = plan
            .count(Devices::find())
            .build(DbBackend::Sqlite)
            .to_string();

        assert!(page_sql.contains("LIKE '%tv%'"));
        assert!(page_sql.contains("LIMIT 5"));
        assert!(page_sql.contains("OFFSET 5"));
        assert!(count_sql.contains("LIKE '%tv%'"));
        assert!(!count_sql.contains("LIMIT"));
        assert!(page_sql.contains("\"is_locked\" = 1"));
        assert!(!page_sql.contains("\"os\" ="));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("tv"), "tv");
        assert_eq!(escape_like("x_1"), "x\\_1");
        assert_eq!(escape_like("50%\\"), "50\\%\\\\");
    }

    #[test]
    fn test_contains_escapes_wildcards() {
        let filter = Filter::new().contains(devices::Column::Name, Some("x_1"));
        let sql = PagePlan::new(filter, PageWindow::new(1, 10, 100).unwrap())
            .count(Devices::find())
            .build(DbBackend::Sqlite)
            .to_string();

        assert!(sql.contains("LIKE '%x\\_1%'"), "{sql}");
        assert!(sql.contains("ESCAPE"), "{sql}");
    }

    #[test]
    fn test_contains_skips_only_empty_values() {
        let empty = Filter::new()
            .contains(devices::Column::Name, Some(""))
            .into_condition();
        assert!(empty.is_empty());

        let spaces = Filter::new()
            .contains(devices::Column::Name, Some(" "))
            .into_condition();
        assert!(!spaces.is_empty());
    }
}
