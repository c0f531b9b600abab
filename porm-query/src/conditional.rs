//! # Conditional
//!
//! WHERE clause expression tree. Leaves compare a column with a literal or
//! another column, inner nodes join two sub expressions with AND / OR.
//!
//! ```
//! use porm_query::{eq, gt, Conditional, ConjunctiveOperator};
//!
//! let cond = Conditional::builder(eq!("a", 1))
//!     .operator(ConjunctiveOperator::And)
//!     .second(Conditional::or(gt!("b", 2), eq!("c", "x")))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(&cond.to_string(), "a = 1 AND (b > 2 OR c = 'x')");
//! ```

use std::fmt;

use porm_error::Result;

use crate::{validate::Violations, ColumnRef, Value};

const STATEMENT_PREAMBLE: &str = "Failed to build conditional statement:";
const CONDITIONAL_PREAMBLE: &str = "Failed to build conditional:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    Is,
    IsNot,
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Like => "LIKE",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConjunctiveOperator {
    And,
    Or,
}

impl fmt::Display for ConjunctiveOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
        }
    }
}

/// Right hand side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    Column(ColumnRef),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{}", v),
            Self::Column(c) => write!(f, "{}", c),
        }
    }
}

impl<T: Into<Value>> From<T> for Operand {
    fn from(v: T) -> Self {
        Self::Value(v.into())
    }
}

/// Leaf comparison: `[NOT ]column operator operand`
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalStatement {
    column: ColumnRef,
    operator: ComparisonOperator,
    operand: Operand,
    negated: bool,
}

impl ConditionalStatement {
    pub fn builder<C: Into<ColumnRef>>(column: C) -> StatementOperatorStage {
        StatementOperatorStage {
            column: column.into(),
        }
    }

    /// Leaf comparison without going through the builder, the column name is
    /// not checked. Backs the `eq!`, `ne!`, ... macros.
    pub fn compare<C: Into<ColumnRef>>(
        column: C,
        operator: ComparisonOperator,
        operand: Operand,
    ) -> Conditional {
        Conditional::Statement(Self {
            column: column.into(),
            operator,
            operand,
            negated: false,
        })
    }

    pub fn column(&self) -> &ColumnRef {
        &self.column
    }

    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

impl fmt::Display for ConditionalStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "NOT ")?;
        }
        write!(f, "{} {} {}", self.column, self.operator, self.operand)
    }
}

#[derive(Debug)]
pub struct StatementOperatorStage {
    column: ColumnRef,
}

impl StatementOperatorStage {
    pub fn operator(self, operator: ComparisonOperator) -> StatementOperandStage {
        StatementOperandStage {
            column: self.column,
            operator,
        }
    }
}

#[derive(Debug)]
pub struct StatementOperandStage {
    column: ColumnRef,
    operator: ComparisonOperator,
}

impl StatementOperandStage {
    /// Compare against a literal
    pub fn value<V: Into<Value>>(self, value: V) -> StatementBuilder {
        self.operand(Operand::Value(value.into()))
    }

    /// Compare against another column
    pub fn column<C: Into<ColumnRef>>(self, column: C) -> StatementBuilder {
        self.operand(Operand::Column(column.into()))
    }

    pub fn operand(self, operand: Operand) -> StatementBuilder {
        StatementBuilder {
            column: self.column,
            operator: self.operator,
            operand,
            negated: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatementBuilder {
    column: ColumnRef,
    operator: ComparisonOperator,
    operand: Operand,
    negated: bool,
}

impl StatementBuilder {
    pub fn negate(&mut self) -> &mut Self {
        self.negated = true;
        self
    }

    /// Build conditional statement
    pub fn build(&self) -> Result<ConditionalStatement> {
        let mut v = Violations::new(STATEMENT_PREAMBLE);
        v.require_name(self.column.name(), "column name");
        if let Operand::Column(c) = &self.operand {
            v.require_name(c.name(), "operand column name");
        }
        v.finish()?;

        Ok(ConditionalStatement {
            column: self.column.clone(),
            operator: self.operator,
            operand: self.operand.clone(),
            negated: self.negated,
        })
    }
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Conditional {
    Statement(ConditionalStatement),
    Conjunction {
        first: Box<Conditional>,
        operator: ConjunctiveOperator,
        second: Box<Conditional>,
    },
}

impl Conditional {
    /// Start a conjunction from its required first operand
    pub fn builder<C: Into<Conditional>>(first: C) -> ConditionalBuilder {
        ConditionalBuilder {
            first: first.into(),
            operator: None,
            second: None,
        }
    }

    pub fn and<L: Into<Conditional>, R: Into<Conditional>>(first: L, second: R) -> Self {
        Self::Conjunction {
            first: Box::new(first.into()),
            operator: ConjunctiveOperator::And,
            second: Box::new(second.into()),
        }
    }

    pub fn or<L: Into<Conditional>, R: Into<Conditional>>(first: L, second: R) -> Self {
        Self::Conjunction {
            first: Box::new(first.into()),
            operator: ConjunctiveOperator::Or,
            second: Box::new(second.into()),
        }
    }

    /// Join every condition with AND from left to right, `None` when empty
    pub fn all<I: IntoIterator<Item = Conditional>>(conds: I) -> Option<Self> {
        conds.into_iter().reduce(Self::and)
    }

    pub fn is_conjunction(&self) -> bool {
        matches!(self, Self::Conjunction { .. })
    }

    fn fmt_operand(f: &mut fmt::Formatter<'_>, operand: &Conditional) -> fmt::Result {
        if operand.is_conjunction() {
            write!(f, "({})", operand)
        } else {
            write!(f, "{}", operand)
        }
    }
}

impl fmt::Display for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Statement(stmt) => write!(f, "{}", stmt),
            Self::Conjunction {
                first,
                operator,
                second,
            } => {
                Self::fmt_operand(f, first)?;
                write!(f, " {} ", operator)?;
                Self::fmt_operand(f, second)
            }
        }
    }
}

impl From<ConditionalStatement> for Conditional {
    fn from(stmt: ConditionalStatement) -> Self {
        Self::Statement(stmt)
    }
}

#[derive(Debug, Clone)]
pub struct ConditionalBuilder {
    first: Conditional,
    operator: Option<ConjunctiveOperator>,
    second: Option<Conditional>,
}

impl ConditionalBuilder {
    pub fn operator(&mut self, operator: ConjunctiveOperator) -> &mut Self {
        self.operator = Some(operator);
        self
    }

    pub fn second<C: Into<Conditional>>(&mut self, second: C) -> &mut Self {
        self.second = Some(second.into());
        self
    }

    /// Build conditional, a lone first operand builds to itself
    pub fn build(&self) -> Result<Conditional> {
        let mut v = Violations::new(CONDITIONAL_PREAMBLE);
        v.check(self.operator.is_some() && self.second.is_none(), || {
            "a conjunctive operator requires a second operand".into()
        });
        v.check(self.operator.is_none() && self.second.is_some(), || {
            "a second operand requires a conjunctive operator".into()
        });
        v.finish()?;

        match (self.operator, &self.second) {
            (Some(operator), Some(second)) => Ok(Conditional::Conjunction {
                first: Box::new(self.first.clone()),
                operator,
                second: Box::new(second.clone()),
            }),
            _ => Ok(self.first.clone()),
        }
    }
}

#[macro_export]
macro_rules! eq {
    ($col:expr, $val:expr) => {
        $crate::ConditionalStatement::compare(
            $col,
            $crate::ComparisonOperator::Eq,
            $crate::Operand::from($val),
        )
    };
}

#[macro_export]
macro_rules! ne {
    ($col:expr, $val:expr) => {
        $crate::ConditionalStatement::compare(
            $col,
            $crate::ComparisonOperator::Ne,
            $crate::Operand::from($val),
        )
    };
}

#[macro_export]
macro_rules! lt {
    ($col:expr, $val:expr) => {
        $crate::ConditionalStatement::compare(
            $col,
            $crate::ComparisonOperator::Lt,
            $crate::Operand::from($val),
        )
    };
}

#[macro_export]
macro_rules! le {
    ($col:expr, $val:expr) => {
        $crate::ConditionalStatement::compare(
            $col,
            $crate::ComparisonOperator::Le,
            $crate::Operand::from($val),
        )
    };
}

#[macro_export]
macro_rules! gt {
    ($col:expr, $val:expr) => {
        $crate::ConditionalStatement::compare(
            $col,
            $crate::ComparisonOperator::Gt,
            $crate::Operand::from($val),
        )
    };
}

#[macro_export]
macro_rules! ge {
    ($col:expr, $val:expr) => {
        $crate::ConditionalStatement::compare(
            $col,
            $crate::ComparisonOperator::Ge,
            $crate::Operand::from($val),
        )
    };
}

#[macro_export]
macro_rules! like {
    ($col:expr, $val:expr) => {
        $crate::ConditionalStatement::compare(
            $col,
            $crate::ComparisonOperator::Like,
            $crate::Operand::from($val),
        )
    };
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sql_str;

    fn leaf(col: &str, op: ComparisonOperator, v: i64) -> ConditionalStatement {
        ConditionalStatement::builder(col)
            .operator(op)
            .value(v)
            .build()
            .unwrap()
    }

    #[test]
    fn test_leaf() {
        assert_eq!(&leaf("a", ComparisonOperator::Eq, 1).to_string(), "a = 1");
        assert_eq!(&leaf("a", ComparisonOperator::Ne, 1).to_string(), "a <> 1");
        assert_eq!(&leaf("a", ComparisonOperator::Le, 1).to_string(), "a <= 1");

        let neg = ConditionalStatement::builder(ColumnRef::qualified("t", "name"))
            .operator(ComparisonOperator::Like)
            .value(sql_str("a%"))
            .negate()
            .build()
            .unwrap();
        assert_eq!(&neg.to_string(), "NOT t.name LIKE 'a%'");

        let join = ConditionalStatement::builder(ColumnRef::qualified("user", "address_id"))
            .operator(ComparisonOperator::Eq)
            .column(ColumnRef::qualified("address", "id"))
            .build()
            .unwrap();
        assert_eq!(&join.to_string(), "user.address_id = address.id");

        let null = ConditionalStatement::builder("deleted_at")
            .operator(ComparisonOperator::Is)
            .value(Value::Null)
            .build()
            .unwrap();
        assert_eq!(&null.to_string(), "deleted_at IS NULL");
    }

    #[test]
    fn test_leaf_blank_column() {
        let res = ConditionalStatement::builder("")
            .operator(ComparisonOperator::Eq)
            .value(1)
            .build();
        assert!(res.is_err());
    }

    #[test]
    fn test_degenerate_equals_leaf() {
        let stmt = leaf("a", ComparisonOperator::Gt, 5);
        let cond = Conditional::builder(stmt.clone()).build().unwrap();

        assert_eq!(cond, Conditional::Statement(stmt.clone()));
        assert_eq!(cond.to_string(), stmt.to_string());
    }

    #[test]
    fn test_operator_without_second() {
        let err = Conditional::builder(eq!("a", 1))
            .operator(ConjunctiveOperator::And)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            porm_error::Error::QueryBuilder(
                "Failed to build conditional:\n  - a conjunctive operator requires a second operand"
                    .into()
            )
        );
    }

    #[test]
    fn test_second_without_operator() {
        let res = Conditional::builder(eq!("a", 1)).second(eq!("b", 2)).build();
        assert!(res.is_err());
    }

    #[test]
    fn test_parenthesize_only_conjunctions() {
        let cond = Conditional::or(Conditional::and(eq!("a", 1), eq!("b", 2)), eq!("c", 3));
        assert_eq!(&cond.to_string(), "(a = 1 AND b = 2) OR c = 3");

        let cond = Conditional::builder(ne!("a", true))
            .operator(ConjunctiveOperator::Or)
            .second(Conditional::and(lt!("b", 1.5), ge!("c", sql_str("x"))))
            .build()
            .unwrap();
        assert_eq!(&cond.to_string(), "a <> true OR (b < 1.5 AND c >= 'x')");
    }

    #[test]
    fn test_all() {
        assert_eq!(Conditional::all(Vec::<Conditional>::new()), None);

        let cond = Conditional::all(vec![eq!("a", 1), eq!("b", 2), like!("c", "x%")]).unwrap();
        assert_eq!(&cond.to_string(), "(a = 1 AND b = 2) AND c LIKE 'x%'");
    }
}
