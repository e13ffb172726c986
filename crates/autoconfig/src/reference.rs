//! Recognizing reuse references such as `${train.seed}`
use crate::path::FieldPath;
use crate::value::Value;

pub const DEFAULT_START: &str = "${";
pub const DEFAULT_END: &str = "}";

/// Delimiters around a reference
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct Markers {
    #[new(into)]
    start: String,
    #[new(into)]
    end: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self::new(DEFAULT_START, DEFAULT_END)
    }
}

/// What a field value turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Plain,
    Reference(FieldPath),
}

impl Markers {
    /// Only a string that is wrapped in both markers, with something in between, is a reference
    pub fn parse(&self, value: &Value) -> Token {
        let Value::String(s) = value else {
            return Token::Plain;
        };

        let Some(inner) = s
            .strip_prefix(self.start.as_str())
            .and_then(|rest| rest.strip_suffix(self.end.as_str()))
        else {
            return Token::Plain;
        };

        if inner.is_empty() {
            return Token::Plain;
        }

        Token::Reference(inner.into())
    }

    pub fn reference(&self, value: &Value) -> Option<FieldPath> {
        match self.parse(value) {
            Token::Reference(path) => Some(path),
            Token::Plain => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_markers() {
        let markers = Markers::default();
        assert_eq!(
            markers.parse(&"${a.b.c}".into()),
            Token::Reference(["a", "b", "c"].into())
        );
        assert_eq!(markers.parse(&"${seed}".into()), Token::Reference("seed".into()));
    }

    #[test]
    fn plain_values() {
        let markers = Markers::default();
        assert_eq!(markers.parse(&"a.b".into()), Token::Plain);
        assert_eq!(markers.parse(&"${a.b".into()), Token::Plain);
        assert_eq!(markers.parse(&"x${a}".into()), Token::Plain);
        assert_eq!(markers.parse(&"${}".into()), Token::Plain);
        assert_eq!(markers.parse(&"$}".into()), Token::Plain);
        assert_eq!(markers.parse(&Value::Integer(1)), Token::Plain);
    }

    #[test]
    fn custom_markers() {
        let markers = Markers::new("<<", ">>");
        assert_eq!(markers.reference(&"<<a.b>>".into()), Some(["a", "b"].into()));
        assert_eq!(markers.reference(&"${a.b}".into()), None);
    }

    #[test]
    fn markers_from_owned_strings() {
        let markers = Markers::new(String::from("%("), String::from(")"));
        assert_eq!(markers.reference(&"%(seed)".into()), Some("seed".into()));
        assert_ne!(markers, Markers::default());
        assert_eq!(Markers::default(), Markers::new("${", "}"));
    }
}
