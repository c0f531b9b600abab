use std::{collections::HashMap, fmt, sync::Arc};

use porm_error::Result;

use crate::Pojo;

type Factory = Arc<dyn Fn() -> Result<Pojo> + Send + Sync>;

/// Maps pojo type tags to constructors, used wherever the engine has to
/// create a pojo it was not handed (hydrating children, search results)
///
/// # Examples
///
/// ```
/// use porm::{Pojo, Registry};
/// use porm::query::ColumnDefinition;
///
/// let mut registry = Registry::new();
/// registry.register("Tag", || {
///     Pojo::builder("Tag", "tag")
///         .id_column("id")
///         .column(ColumnDefinition::builder("id").int().build()?)
///         .build()
/// });
///
/// assert_eq!(registry.instantiate("Tag").unwrap().table(), "tag");
/// assert!(registry.instantiate("Missing").is_err());
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    factories: HashMap<String, Factory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor, replacing any previous one for the same tag
    pub fn register<S, F>(&mut self, type_tag: S, factory: F) -> &mut Self
    where
        S: ToString,
        F: Fn() -> Result<Pojo> + Send + Sync + 'static,
    {
        self.factories.insert(type_tag.to_string(), Arc::new(factory));
        self
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.factories.contains_key(type_tag)
    }

    /// Create a fresh pojo of the given type
    pub fn instantiate(&self, type_tag: &str) -> Result<Pojo> {
        let factory = self
            .factories
            .get(type_tag)
            .ok_or_else(|| porm_error::instantiate!("Unknown pojo type `{}`", type_tag))?;

        let pojo = factory().map_err(|e| {
            porm_error::instantiate!("Cannot instantiate pojo type `{}`: {}", type_tag, e)
        })?;
        if pojo.type_tag() != type_tag {
            return Err(porm_error::instantiate!(
                "Factory for `{}` produced a pojo of type `{}`",
                type_tag,
                pojo.type_tag()
            ));
        }

        Ok(pojo)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags = self.factories.keys().collect::<Vec<_>>();
        tags.sort();

        f.debug_struct("Registry").field("types", &tags).finish()
    }
}

#[cfg(test)]
mod test {
    use porm_error::Error;
    use porm_query::ColumnDefinition;

    use super::*;

    fn tag(type_tag: &'static str) -> impl Fn() -> Result<Pojo> + Send + Sync + 'static {
        move || {
            Pojo::builder(type_tag, "tag")
                .id_column("id")
                .column(ColumnDefinition::builder("id").int().build()?)
                .build()
        }
    }

    #[test]
    fn test_instantiate() {
        let mut registry = Registry::new();
        registry.register("Tag", tag("Tag")).register("Other", tag("Tag"));

        assert!(registry.contains("Tag"));
        assert_eq!(registry.instantiate("Tag").unwrap().type_tag(), "Tag");

        let err = registry.instantiate("Other").unwrap_err();
        assert!(matches!(err, Error::Instantiate(_)));

        let err = registry.instantiate("Nope").unwrap_err();
        assert_eq!(err, Error::Instantiate("Unknown pojo type `Nope`".into()));
    }

    #[test]
    fn test_factory_error() {
        let mut registry = Registry::new();
        registry.register("Broken", || Pojo::builder("Broken", "").build());

        let err = registry.instantiate("Broken").unwrap_err();
        assert!(matches!(err, Error::Instantiate(_)));
        assert!(err.to_string().contains("table name must not be blank"));
    }
}
