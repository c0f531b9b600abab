//! # Validate
//!
//! Helpers shared by every builder. A builder collects all of its violations
//! into [`Violations`] and reports them at once.

use porm_error::Result;

/// True when the string is empty or contains only whitespace
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

pub fn is_empty<T>(list: &[T]) -> bool {
    list.is_empty()
}

/// Render the error list the way every builder reports it
///
/// # Examples
///
/// ```
/// use porm_query::validate::format_errors;
///
/// let text = format_errors("Invalid thing:", &["a is blank".into(), "b is empty".into()]);
///
/// assert_eq!(&text, "Invalid thing:\n  - a is blank\n  - b is empty");
/// ```
pub fn format_errors(preamble: &str, errors: &[String]) -> String {
    let mut lines = Vec::with_capacity(errors.len() + 1);
    lines.push(preamble.to_string());
    lines.extend(errors.iter().map(|e| format!("  - {}", e)));

    lines.join("\n")
}

#[derive(Debug)]
pub struct Violations {
    preamble: &'static str,
    list: Vec<String>,
}

impl Violations {
    pub fn new(preamble: &'static str) -> Self {
        Self {
            preamble,
            list: vec![],
        }
    }

    /// Record a violation
    pub fn push<S: Into<String>>(&mut self, msg: S) -> &mut Self {
        self.list.push(msg.into());
        self
    }

    /// Record `msg` when `violated` is true
    pub fn check<F>(&mut self, violated: bool, msg: F) -> &mut Self
    where
        F: FnOnce() -> String,
    {
        if violated {
            self.list.push(msg());
        }
        self
    }

    /// Record a violation when `name` is blank
    pub fn require_name(&mut self, name: &str, what: &str) -> &mut Self {
        self.check(is_blank(name), || format!("{} must not be blank", what))
    }

    /// Record a violation when `value` lies outside `min..=max`
    pub fn check_range(&mut self, value: u64, min: u64, max: u64, what: &str) -> &mut Self {
        self.check(value < min || value > max, || {
            format!(
                "{} must be between {} and {}, got {}",
                what, min, max, value
            )
        })
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.list
    }

    /// Merge violations reported by a nested builder
    pub fn extend<I: IntoIterator<Item = String>>(&mut self, list: I) -> &mut Self {
        self.list.extend(list);
        self
    }

    /// Fail with every collected violation, or succeed when there is none
    pub fn finish(self) -> Result<()> {
        if self.list.is_empty() {
            Ok(())
        } else {
            Err(porm_error::Error::QueryBuilder(format_errors(
                self.preamble,
                &self.list,
            )))
        }
    }
}
