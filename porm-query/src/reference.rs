use std::fmt;

/// Typed table reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    name: String,
}

impl TableRef {
    pub fn new<S: ToString>(name: S) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reference a column of this table
    pub fn column<S: ToString>(&self, name: S) -> ColumnRef {
        ColumnRef::qualified(&self.name, name)
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for TableRef {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

impl From<String> for TableRef {
    fn from(name: String) -> Self {
        Self { name }
    }
}

/// Typed column reference, optionally qualified by its table
///
/// # Examples
///
/// ```
/// use porm_query::ColumnRef;
///
/// assert_eq!(ColumnRef::new("id").to_string(), "id");
/// assert_eq!(ColumnRef::qualified("user", "id").to_string(), "user.id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    table: Option<String>,
    name: String,
}

impl ColumnRef {
    pub fn new<S: ToString>(name: S) -> Self {
        Self {
            table: None,
            name: name.to_string(),
        }
    }

    pub fn qualified<T: ToString, S: ToString>(table: T, name: S) -> Self {
        Self {
            table: Some(table.to_string()),
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

impl From<String> for ColumnRef {
    fn from(v: String) -> Self {
        Self::new(v)
    }
}
