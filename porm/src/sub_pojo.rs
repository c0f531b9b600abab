use porm_error::Result;
use porm_query::{validate::Violations, ColumnRef};

const PREAMBLE: &str = "Failed to build sub pojo definition:";

/// Join predicate between a parent table and a child table, both sides table
/// qualified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Junction {
    parent: ColumnRef,
    child: ColumnRef,
}

impl Junction {
    pub fn parent(&self) -> &ColumnRef {
        &self.parent
    }

    pub fn child(&self) -> &ColumnRef {
        &self.child
    }
}

/// How a child pojo hangs off its parent
///
/// # Examples
///
/// ```
/// use porm::SubPojoDefinition;
/// use porm::query::ColumnRef;
///
/// let def = SubPojoDefinition::builder("address")
///     .id_column("address_id")
///     .pojo_type("Address")
///     .junction(
///         ColumnRef::qualified("user", "address_id"),
///         ColumnRef::qualified("address", "id"),
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(def.key(), "address");
/// assert_eq!(def.id_column(), Some("address_id"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubPojoDefinition {
    key: String,
    id_column: Option<String>,
    pojo_type: Option<String>,
    junction: Option<Junction>,
}

impl SubPojoDefinition {
    pub fn builder<S: ToString>(key: S) -> SubPojoBuilder {
        SubPojoBuilder {
            key: key.to_string(),
            id_column: None,
            pojo_type: None,
            junction: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Local column holding the child's identifier
    pub fn id_column(&self) -> Option<&str> {
        self.id_column.as_deref()
    }

    /// Registry tag used to instantiate the child
    pub fn pojo_type(&self) -> Option<&str> {
        self.pojo_type.as_deref()
    }

    pub fn junction(&self) -> Option<&Junction> {
        self.junction.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct SubPojoBuilder {
    key: String,
    id_column: Option<String>,
    pojo_type: Option<String>,
    junction: Option<Junction>,
}

impl SubPojoBuilder {
    pub fn id_column<S: ToString>(&mut self, column: S) -> &mut Self {
        self.id_column = Some(column.to_string());
        self
    }

    pub fn pojo_type<S: ToString>(&mut self, tag: S) -> &mut Self {
        self.pojo_type = Some(tag.to_string());
        self
    }

    pub fn junction<P, C>(&mut self, parent: P, child: C) -> &mut Self
    where
        P: Into<ColumnRef>,
        C: Into<ColumnRef>,
    {
        self.junction = Some(Junction {
            parent: parent.into(),
            child: child.into(),
        });
        self
    }

    /// Build definition
    pub fn build(&self) -> Result<SubPojoDefinition> {
        // Validate builder
        self.validate()?;

        Ok(SubPojoDefinition {
            key: self.key.clone(),
            id_column: self.id_column.clone(),
            pojo_type: self.pojo_type.clone(),
            junction: self.junction.clone(),
        })
    }

    /// Validate builder
    fn validate(&self) -> Result<()> {
        let mut v = Violations::new(PREAMBLE);

        v.require_name(&self.key, "key");
        if let Some(col) = &self.id_column {
            v.require_name(col, "id column");
        }
        if let Some(tag) = &self.pojo_type {
            v.require_name(tag, "pojo type");
        }
        v.check(
            self.id_column.is_none() && (self.pojo_type.is_some() || self.junction.is_some()),
            || "an id column is required when a pojo type or junction is set".into(),
        );

        if let Some(junction) = &self.junction {
            for (side, col) in [("parent", &junction.parent), ("child", &junction.child)] {
                v.require_name(col.name(), &format!("junction {} column", side));
                v.check(col.table().map(str::trim).unwrap_or("").is_empty(), || {
                    format!("junction {} column `{}` must be table qualified", side, col)
                });
            }
        }

        v.finish()
    }
}
