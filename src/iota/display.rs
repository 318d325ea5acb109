//! Rendering of iotas. Rather than going straight to a string, every iota
//! breaks down into an ordered sequence of display atoms ([Fragment]), so
//! hosts that render rich output (colored text, inline pattern drawings)
//! can intercept the structure. [std::fmt::Display] for [Iota] is the plain
//! concatenation of its fragments.

use crate::{hex::HexPattern, iota::Iota, util::fmt::format_double};
use std::fmt;

/// A single atom of a rendered iota: a piece of text, a nested iota, or a
/// raw pattern shape.
#[derive(Clone, Debug)]
pub enum Fragment {
    Text(String),
    Iota(Iota),
    Pattern(HexPattern),
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{}", text),
            Self::Iota(iota) => write!(f, "{}", iota),
            Self::Pattern(pattern) => write!(f, "<{}>", pattern),
        }
    }
}

impl Iota {
    /// Break this value down into display atoms. Lists yield their elements
    /// as nested [Fragment::Iota] atoms rather than flattening them, with
    /// commas suppressed around pattern elements so that runs of patterns
    /// read like program text.
    pub fn fragments(&self) -> Vec<Fragment> {
        match self {
            Self::Null => vec![Fragment::Text("NULL".to_owned())],
            Self::Garbage => vec![Fragment::Text("GARBAGE".to_owned())],
            Self::Bool(true) => vec![Fragment::Text("True".to_owned())],
            Self::Bool(false) => vec![Fragment::Text("False".to_owned())],
            Self::Double(value) => {
                vec![Fragment::Text(format_double(*value))]
            }
            Self::Str(value) => {
                vec![Fragment::Text(format!("\"{}\"", value))]
            }
            Self::Vector(v) => vec![Fragment::Text(format!(
                "({}, {}, {})",
                format_double(v.x),
                format_double(v.y),
                format_double(v.z)
            ))],
            Self::Entity(entity) => {
                vec![Fragment::Text(entity.name().to_owned())]
            }
            Self::EntityType(kind) => {
                vec![Fragment::Text(kind.name().to_owned())]
            }
            Self::Pattern(pattern) => {
                vec![Fragment::Pattern(pattern.pattern().clone())]
            }
            Self::List(items) => {
                let mut fragments = Vec::with_capacity(items.len() * 2 + 2);
                fragments.push(Fragment::Text("[".to_owned()));
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        let near_pattern =
                            matches!(items[i - 1], Iota::Pattern(_))
                                || matches!(item, Iota::Pattern(_));
                        let separator =
                            if near_pattern { " " } else { ", " };
                        fragments
                            .push(Fragment::Text(separator.to_owned()));
                    }
                    fragments.push(Fragment::Iota(item.clone()));
                }
                fragments.push(Fragment::Text("]".to_owned()));
                fragments
            }
            Self::Continuation(_) => {
                vec![Fragment::Text("[jump]".to_owned())]
            }
            Self::Type(tag) => vec![Fragment::Text(tag.to_string())],
        }
    }
}

impl fmt::Display for Iota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fragment in self.fragments() {
            write!(f, "{}", fragment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spell::builtins;

    #[test]
    fn test_scalar_display() {
        assert_eq!(Iota::Null.to_string(), "NULL");
        assert_eq!(Iota::Bool(true).to_string(), "True");
        assert_eq!(Iota::Double(1234.5).to_string(), "1,234.50");
        assert_eq!(Iota::Str("hi".into()).to_string(), "\"hi\"");
        assert_eq!(
            Iota::Vector(crate::iota::Vec3::new(1.0, -2.0, 0.5))
                .to_string(),
            "(1.00, -2.00, 0.50)"
        );
    }

    #[test]
    fn test_pattern_display() {
        let pattern = Iota::Pattern(builtins::introspection());
        assert_eq!(pattern.to_string(), "<west,qqq>");
    }

    #[test]
    fn test_list_display() {
        let plain =
            Iota::List(vec![Iota::Double(1.0), Iota::Double(2.0)]);
        assert_eq!(plain.to_string(), "[1.00, 2.00]");

        // Commas drop out around pattern elements
        let mixed = Iota::List(vec![
            Iota::Double(1.0),
            Iota::Pattern(builtins::introspection()),
            Iota::Pattern(builtins::retrospection()),
            Iota::Double(2.0),
        ]);
        assert_eq!(
            mixed.to_string(),
            "[1.00 <west,qqq> <east,eee> 2.00]"
        );

        let nested = Iota::List(vec![Iota::List(vec![Iota::Null])]);
        assert_eq!(nested.to_string(), "[[NULL]]");
    }
}
