//! Scope predicates shared by the sort index and every row store.
//!
//! A [`ScopeQuery`] describes a slice of one ordering scope: which group it
//! belongs to, an optional primary key match, an optional comparison of the
//! sort key against a literal or against another row's sort key, whether
//! excluded rows are hidden, and how results are ordered and limited.
//!
//! Stores translate this into their own terms. The SQL store renders
//! correlated sub-selects for the "of row" references; the in-memory store
//! resolves them directly.

use crate::value::Value;

/// Which scope a query is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupFilter {
    /// No restriction. Used when the index has no group column.
    All,
    /// Rows whose group column equals this value.
    Value(Value),
    /// Rows sharing the group of the row with this primary key.
    OfRow(Value),
}

/// Comparison operator applied to the sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    /// SQL spelling of the operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }

    /// Evaluates `lhs <op> rhs`.
    pub fn eval(self, lhs: i64, rhs: i64) -> bool {
        match self {
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
        }
    }
}

/// Right-hand side of a sort key comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortBound {
    /// A fixed sort value.
    Literal(i64),
    /// The sort key of the row with this primary key.
    ///
    /// The referenced row is looked up under the same group value and
    /// visibility rule as the outer query. If it does not match, the
    /// comparison matches nothing.
    OfRow(Value),
}

/// A comparison on the sort column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortFilter {
    pub op: CmpOp,
    pub bound: SortBound,
}

/// Direction of the sort column in results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// A predicate over one ordering scope, plus ordering and limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeQuery {
    pub group: GroupFilter,
    pub pk: Option<Value>,
    pub sort: Option<SortFilter>,
    /// Hide rows matched by the table's exclusions.
    pub visible_only: bool,
    pub order: Option<SortOrder>,
    pub limit: Option<usize>,
}

impl ScopeQuery {
    /// Starts a query over the given scope with no further restriction.
    pub fn scope(group: GroupFilter) -> Self {
        Self {
            group,
            pk: None,
            sort: None,
            visible_only: false,
            order: None,
            limit: None,
        }
    }

    pub fn with_pk(mut self, pk: impl Into<Value>) -> Self {
        self.pk = Some(pk.into());
        self
    }

    pub fn with_sort(mut self, op: CmpOp, bound: SortBound) -> Self {
        self.sort = Some(SortFilter { op, bound });
        self
    }

    /// Hides excluded rows, including when resolving [`SortBound::OfRow`].
    pub fn visible(mut self) -> Self {
        self.visible_only = true;
        self
    }

    pub fn order_by(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
