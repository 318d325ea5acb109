//! The shorthand compiler: lowers a nested, heterogeneous literal tree
//! into the flat pattern sequence that builds it at runtime. Lists become
//! quotations, numbers become their reflections, and patterns that
//! manipulate the quotation state get wrapped in enough Considerations to
//! survive the nesting they appear under.

use crate::{
    iota::{PatternIota, Vec3},
    spell::{builtins, number},
};
use std::f64::consts;

/// A node of the literal tree accepted by [compile].
#[derive(Clone, Debug)]
pub enum Literal {
    Null,
    Bool(bool),
    Num(f64),
    Vector(Vec3),
    Pattern(PatternIota),
    List(Vec<Literal>),
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Num(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Num(value as f64)
    }
}

impl From<Vec3> for Literal {
    fn from(value: Vec3) -> Self {
        Self::Vector(value)
    }
}

impl From<PatternIota> for Literal {
    fn from(value: PatternIota) -> Self {
        Self::Pattern(value)
    }
}

impl From<Vec<Literal>> for Literal {
    fn from(value: Vec<Literal>) -> Self {
        Self::List(value)
    }
}

/// Lower a sequence of literals to the flat pattern list that constructs
/// them. Errors on numbers outside the Numerical Reflection table.
pub fn compile(items: &[Literal]) -> anyhow::Result<Vec<PatternIota>> {
    let mut out = Vec::new();
    for item in items {
        lower(item, 1, &mut out)?;
    }
    Ok(out)
}

fn lower(
    item: &Literal,
    escape_count: usize,
    out: &mut Vec<PatternIota>,
) -> anyhow::Result<()> {
    match item {
        Literal::Null => out.push(builtins::nullary_reflection()),
        Literal::Bool(true) => out.push(builtins::true_reflection()),
        Literal::Bool(false) => out.push(builtins::false_reflection()),
        Literal::Num(value) => lower_number(*value, out)?,
        Literal::Vector(vector) => {
            lower_vector(*vector, escape_count, out)?
        }
        Literal::Pattern(pattern) => {
            lower_pattern(pattern, escape_count, out)
        }
        Literal::List(items) => lower_list(items, escape_count, out)?,
    }
    Ok(())
}

fn lower_number(
    value: f64,
    out: &mut Vec<PatternIota>,
) -> anyhow::Result<()> {
    // The named constants match exactly or not at all
    let special = if value == consts::TAU {
        Some(builtins::circles_reflection())
    } else if value == consts::PI {
        Some(builtins::arcs_reflection())
    } else if value == consts::E {
        Some(builtins::eulers_reflection())
    } else {
        None
    };
    match special {
        Some(pattern) => out.push(pattern),
        None => out.push(number::numerical_reflection(value)?),
    }
    Ok(())
}

/// The seven vector constants with dedicated reflections.
const AXIS_VECTORS: [(Vec3, fn() -> PatternIota); 7] = [
    (Vec3::new(1.0, 0.0, 0.0), builtins::vector_reflection_pos_x),
    (Vec3::new(-1.0, 0.0, 0.0), builtins::vector_reflection_neg_x),
    (Vec3::new(0.0, 1.0, 0.0), builtins::vector_reflection_pos_y),
    (Vec3::new(0.0, -1.0, 0.0), builtins::vector_reflection_neg_y),
    (Vec3::new(0.0, 0.0, 1.0), builtins::vector_reflection_pos_z),
    (Vec3::new(0.0, 0.0, -1.0), builtins::vector_reflection_neg_z),
    (Vec3::ZERO, builtins::vector_reflection_zero),
];

fn lower_vector(
    vector: Vec3,
    escape_count: usize,
    out: &mut Vec<PatternIota>,
) -> anyhow::Result<()> {
    for (constant, reflection) in AXIS_VECTORS {
        if vector == constant {
            out.push(reflection());
            return Ok(());
        }
    }
    // A general vector builds its components and exalts them, all at the
    // current depth
    lower_number(vector.x, out)?;
    lower_number(vector.y, out)?;
    lower_number(vector.z, out)?;
    lower_pattern(&builtins::vector_exaltation(), escape_count, out);
    Ok(())
}

fn lower_pattern(
    pattern: &PatternIota,
    escape_count: usize,
    out: &mut Vec<PatternIota>,
) {
    // A quotation-manipulating pattern must survive every enclosing
    // Introspection; each one strips a single Consideration, so depth n
    // needs n - 1 of them
    if pattern.must_escape() && escape_count > 1 {
        for _ in 0..escape_count - 1 {
            out.push(builtins::consideration());
        }
    }
    out.push(pattern.clone());
}

fn lower_list(
    items: &[Literal],
    escape_count: usize,
    out: &mut Vec<PatternIota>,
) -> anyhow::Result<()> {
    match items {
        // An empty list is a single reflection
        [] => out.push(builtins::vacant_reflection()),
        // A singleton wrapping a list builds the inner list on the stack
        // and wraps it, avoiding a quotation level entirely
        [Literal::List(inner)] => {
            lower_list(inner, escape_count, out)?;
            out.push(builtins::singles_purification());
        }
        // A singleton wrapping an escape control quotes it one level
        // deeper and wraps, since a plain quotation would execute it
        [Literal::Pattern(pattern)] if pattern.must_escape() => {
            lower_pattern(pattern, escape_count * 2, out);
            out.push(builtins::singles_purification());
        }
        _ => {
            out.push(builtins::introspection());
            for item in items {
                lower(item, escape_count * 2, out)?;
            }
            out.push(builtins::retrospection());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spell::builtins::{
        consideration as c, introspection as i,
        minds_reflection as m, retrospection as r,
        singles_purification as s, vacant_reflection as v,
    };

    fn list(items: Vec<Literal>) -> Literal {
        Literal::List(items)
    }

    fn pat(pattern: PatternIota) -> Literal {
        Literal::Pattern(pattern)
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(compile(&[]).unwrap(), Vec::<PatternIota>::new());
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(compile(&[list(vec![])]).unwrap(), vec![v()]);
    }

    #[test]
    fn test_nested_empty_list() {
        assert_eq!(
            compile(&[list(vec![list(vec![])])]).unwrap(),
            vec![v(), s()]
        );
    }

    #[test]
    fn test_quoted_pattern() {
        assert_eq!(
            compile(&[list(vec![pat(m())])]).unwrap(),
            vec![i(), m(), r()]
        );
    }

    #[test]
    fn test_nested_quoted_pattern() {
        assert_eq!(
            compile(&[list(vec![list(vec![pat(m())])])]).unwrap(),
            vec![i(), m(), r(), s()]
        );
    }

    #[test]
    fn test_escape_controls() {
        // Bare Introspection compiles to itself
        assert_eq!(compile(&[pat(i())]).unwrap(), vec![i()]);
        // Quoted once it needs one Consideration and a singleton wrap
        assert_eq!(
            compile(&[list(vec![pat(i())])]).unwrap(),
            vec![c(), i(), s()]
        );
        // Alongside another element the generic quotation applies
        assert_eq!(
            compile(&[list(vec![pat(i()), pat(m())])]).unwrap(),
            vec![i(), c(), i(), m(), r()]
        );
        // Another level of nesting stays on the singleton path
        assert_eq!(
            compile(&[list(vec![list(vec![pat(i())])])]).unwrap(),
            vec![c(), i(), s(), s()]
        );
        // Mixing both: the inner singleton sits at doubled depth
        assert_eq!(
            compile(&[list(vec![list(vec![pat(i())]), pat(m())])])
                .unwrap(),
            vec![i(), c(), c(), c(), i(), s(), m(), r()]
        );
    }

    #[test]
    fn test_scalars() {
        let lowered =
            compile(&[Literal::Null, Literal::Bool(true), 7.into()])
                .unwrap();
        let names: Vec<_> =
            lowered.iter().map(|p| p.name().to_owned()).collect();
        assert_eq!(
            names,
            [
                "Nullary Reflection",
                "True Reflection",
                "Numerical Reflection: 7"
            ]
        );
    }

    #[test]
    fn test_special_constant_vector() {
        use crate::spell::builtins::{
            arcs_reflection, circles_reflection, eulers_reflection,
            vector_exaltation,
        };
        let lowered = compile(&[Literal::Vector(Vec3::new(
            consts::TAU,
            consts::PI,
            consts::E,
        ))])
        .unwrap();
        assert_eq!(
            lowered,
            vec![
                circles_reflection(),
                arcs_reflection(),
                eulers_reflection(),
                vector_exaltation()
            ]
        );
    }

    #[test]
    fn test_axis_vector() {
        let lowered =
            compile(&[Literal::Vector(Vec3::new(0.0, -1.0, 0.0))])
                .unwrap();
        assert_eq!(lowered.len(), 1);
        assert_eq!(lowered[0].name(), "Vector Reflection -Y");
    }

    #[test]
    fn test_fractional_number_is_rejected() {
        assert!(compile(&[Literal::Num(0.5)]).is_err());
        assert!(compile(&[Literal::Num(9000.0)]).is_err());
    }
}
