use std::cmp::Ordering;
use std::fmt;

/// One distinct indexed value: a field name and the term text inside it.
///
/// Terms order by field first, then by text, both compared bytewise. That is
/// the same order the [`DelimitedKeyCodec`](crate::core::DelimitedKeyCodec)
/// row keys sort in, so a forward range scan yields terms in `Term` order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Term {
    field: String,
    text: String,
}

impl Term {
    pub fn new(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self { field: field.into(), text: text.into() }
    }

    /// The smallest term of `field`, used to start a full field enumeration.
    pub fn field_start(field: impl Into<String>) -> Self {
        Self::new(field, "")
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn same_field(&self, other: &Term) -> bool {
        self.field == other.field
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        self.field
            .as_bytes()
            .cmp(other.field.as_bytes())
            .then_with(|| self.text.as_bytes().cmp(other.text.as_bytes()))
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.text)
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::Term;

    #[test]
    fn test_field_orders_before_text() {
        let a = Term::new("body", "zebra");
        let b = Term::new("title", "apple");
        assert_eq!(a.cmp(&b), Ordering::Less);
        assert!(Term::new("body", "apple") < Term::new("body", "banana"));
    }

    #[test]
    fn test_bytewise_text_order() {
        // Uppercase sorts before lowercase in byte order.
        assert!(Term::new("body", "Zoo") < Term::new("body", "apple"));
        assert!(Term::field_start("body") < Term::new("body", "a"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Term::new("body", "wiki").to_string(), "body:wiki");
    }
}
