use std::fmt;

use crate::{Alter, Create, Delete, DropStatement, Insert, Select, Update};

/// Any statement the builders produce, ready to be handed to a connection
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Create(Create),
    Drop(DropStatement),
    Alter(Alter),
    Insert(Insert),
    Select(Select),
    Update(Update),
    Delete(Delete),
}

impl Statement {
    /// True for statements that return rows
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Select(_))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create(s) => write!(f, "{}", s),
            Self::Drop(s) => write!(f, "{}", s),
            Self::Alter(s) => write!(f, "{}", s),
            Self::Insert(s) => write!(f, "{}", s),
            Self::Select(s) => write!(f, "{}", s),
            Self::Update(s) => write!(f, "{}", s),
            Self::Delete(s) => write!(f, "{}", s),
        }
    }
}

macro_rules! impl_from_statement {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Statement {
                fn from(s: $ty) -> Self {
                    Self::$variant(s)
                }
            }
        )*
    };
}

impl_from_statement! {
    Create => Create,
    Drop => DropStatement,
    Alter => Alter,
    Insert => Insert,
    Select => Select,
    Update => Update,
    Delete => Delete,
}

#[cfg(test)]
mod test {
    use crate::*;

    #[test]
    fn test_statement() {
        let stmt: Statement = QueryBuilder::select_all()
            .from(["user"])
            .build()
            .unwrap()
            .into();
        assert!(stmt.is_query());
        assert_eq!(&stmt.to_string(), "SELECT * FROM user");

        let stmt: Statement = QueryBuilder::delete("user").build().unwrap().into();
        assert!(!stmt.is_query());
        assert_eq!(&stmt.to_string(), "DELETE FROM user");
    }
}
