//! The structured parts of a SELECT statement prior to rendering.

/// How a WHERE or HAVING predicate combines with the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn as_str(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

/// An explicit join kind tag; a join without one renders as a bare `JOIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
        }
    }
}

/// What a join attaches to: a plain table expression or a derived subselect.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinTarget {
    Table(String),
    Derived { clauses: Box<ClauseSet>, alias: String },
}

/// A single JOIN fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: Option<JoinKind>,
    pub target: JoinTarget,
    pub cond: String,
}

/// LIMIT count and offset; a count of zero means no limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limit {
    pub count: u64,
    pub offset: u64,
}

/// One resettable clause list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClausePart {
    Cols,
    From,
    Join,
    Where,
    Group,
    Having,
    Order,
    Limit,
}

/// Ordered clause lists for one SELECT statement.
///
/// Invariants: every `where_`/`having` entry after the first carries its
/// connective embedded up front; every `order` entry ends with an explicit
/// ` ASC` or ` DESC` suffix.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClauseSet {
    pub distinct: bool,
    pub cols: Vec<String>,
    pub from: Vec<String>,
    pub join: Vec<Join>,
    pub where_: Vec<String>,
    pub group: Vec<String>,
    pub having: Vec<String>,
    pub order: Vec<String>,
    pub limit: Limit,
}

impl ClauseSet {
    /// Reset one clause list, or everything (including the limit) when
    /// no part is named.
    pub fn clear(&mut self, part: Option<ClausePart>) {
        match part {
            Some(ClausePart::Cols) => self.cols.clear(),
            Some(ClausePart::From) => self.from.clear(),
            Some(ClausePart::Join) => self.join.clear(),
            Some(ClausePart::Where) => self.where_.clear(),
            Some(ClausePart::Group) => self.group.clear(),
            Some(ClausePart::Having) => self.having.clear(),
            Some(ClausePart::Order) => self.order.clear(),
            Some(ClausePart::Limit) => self.limit = Limit::default(),
            None => *self = ClauseSet::default(),
        }
    }
}

/// Split a comma-delimited spec into trimmed elements, dropping blanks.
pub fn split_list(spec: &str) -> Vec<String> {
    spec.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
