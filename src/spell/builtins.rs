//! The closed core action set, plus the registry that maps pattern shapes
//! back to their actions. Each constructor function builds a fresh
//! [PatternIota] bound to its behaviour, so compilers and hosts can mint
//! patterns without going through a registry instance.

use crate::{
    cast::{
        Change, Continuation, Environment, HermesFrame, Mishap,
        ResolutionType, Sound, ThothFrame,
    },
    hex::{HexAngle, HexDir, HexPattern},
    iota::{Action, Iota, IotaType, Outcome, PatternIota, Vec3},
    spell::number,
    CastVm,
};
use fnv::FnvBuildHasher;
use indexmap::IndexMap;
use log::info;
use std::{f64::consts, rc::Rc};

/// Build a pattern iota from a static angle signature. Signatures in this
/// module are known-valid, so a parse failure here is an internal bug.
fn pattern(
    name: &str,
    start_dir: HexDir,
    signature: &str,
    action: Action,
    must_escape: bool,
) -> PatternIota {
    let angles = signature
        .chars()
        .map(HexAngle::from_char)
        .collect::<anyhow::Result<Vec<_>>>()
        .unwrap();
    PatternIota::new(
        HexPattern::new(start_dir, angles),
        name,
        action,
        must_escape,
    )
}

// ---------------------------------------------------------------------
// Escape controls
// ---------------------------------------------------------------------

/// Open a quotation. Inside an open quotation this quotes itself *and*
/// deepens the nesting, which is what makes quotations nestable at all.
pub fn introspection() -> PatternIota {
    pattern(
        "Introspection",
        HexDir::West,
        "qqq",
        Action::Invoke(introspection_action),
        true,
    )
}

fn introspection_action(
    this: &PatternIota,
    vm: &CastVm,
    _env: &dyn Environment,
) -> Result<Outcome, Mishap> {
    if vm.paren_count() == 0 {
        Ok(Outcome {
            diff: vec![Change {
                escape_intro: true,
                ..Change::default()
            }],
            ..Outcome::default()
        })
    } else {
        Ok(Outcome {
            diff: vec![Change {
                escape_intro: true,
                escape_push: Some(Iota::Pattern(this.clone())),
                ..Change::default()
            }],
            resolution: ResolutionType::Escaped,
            ..Outcome::default()
        })
    }
}

/// Close a quotation. Closing the outermost level materializes the
/// quotation buffer as a list on the stack; closing an inner level quotes
/// itself, mirroring [introspection]. With nothing open, this mishaps.
pub fn retrospection() -> PatternIota {
    pattern(
        "Retrospection",
        HexDir::East,
        "eee",
        Action::Invoke(retrospection_action),
        true,
    )
}

fn retrospection_action(
    this: &PatternIota,
    vm: &CastVm,
    _env: &dyn Environment,
) -> Result<Outcome, Mishap> {
    match vm.paren_count() {
        0 => Err(Mishap::TooManyCloseParens),
        1 => {
            let items = vm
                .parenthesized()
                .iter()
                .map(|escaped| escaped.iota.clone())
                .collect();
            Ok(Outcome {
                diff: vec![Change {
                    escape_retro: true,
                    stack_push: vec![Iota::List(items)],
                    ..Change::default()
                }],
                ..Outcome::default()
            })
        }
        _ => Ok(Outcome {
            diff: vec![Change {
                escape_retro: true,
                escape_push: Some(Iota::Pattern(this.clone())),
                ..Change::default()
            }],
            resolution: ResolutionType::Escaped,
            ..Outcome::default()
        }),
    }
}

/// Quote the next iota, whatever it is. One-shot.
pub fn consideration() -> PatternIota {
    pattern(
        "Consideration",
        HexDir::West,
        "qqqaw",
        Action::Invoke(consideration_action),
        true,
    )
}

fn consideration_action(
    _this: &PatternIota,
    _vm: &CastVm,
    _env: &dyn Environment,
) -> Result<Outcome, Mishap> {
    Ok(Outcome {
        diff: vec![Change {
            escape_consider: Some(true),
            ..Change::default()
        }],
        ..Outcome::default()
    })
}

// ---------------------------------------------------------------------
// Stack literals
// ---------------------------------------------------------------------

/// Push an empty list.
pub fn vacant_reflection() -> PatternIota {
    pattern(
        "Vacant Reflection",
        HexDir::Northeast,
        "qqaeaae",
        Action::Push(Box::new(Iota::List(Vec::new()))),
        false,
    )
}

/// Pop one iota and push it back wrapped in a singleton list.
pub fn singles_purification() -> PatternIota {
    pattern(
        "Single's Purification",
        HexDir::East,
        "adeeed",
        Action::Invoke(singles_purification_action),
        false,
    )
}

fn singles_purification_action(
    _this: &PatternIota,
    vm: &CastVm,
    _env: &dyn Environment,
) -> Result<Outcome, Mishap> {
    let args = vm.stack_args(&[None])?;
    let item = args[0].clone();
    Ok(Outcome {
        diff: vec![Change {
            stack_pop: 1,
            stack_push: vec![Iota::List(vec![item])],
            ..Change::default()
        }],
        ..Outcome::default()
    })
}

/// Push the caster.
pub fn minds_reflection() -> PatternIota {
    pattern(
        "Mind's Reflection",
        HexDir::Northeast,
        "qaq",
        Action::Invoke(minds_reflection_action),
        false,
    )
}

fn minds_reflection_action(
    _this: &PatternIota,
    _vm: &CastVm,
    env: &dyn Environment,
) -> Result<Outcome, Mishap> {
    Ok(Outcome {
        diff: vec![Change {
            stack_push: vec![env.caster()],
            ..Change::default()
        }],
        ..Outcome::default()
    })
}

pub fn true_reflection() -> PatternIota {
    pattern(
        "True Reflection",
        HexDir::Southeast,
        "aqae",
        Action::Push(Box::new(Iota::Bool(true))),
        false,
    )
}

pub fn false_reflection() -> PatternIota {
    pattern(
        "False Reflection",
        HexDir::Northeast,
        "dedq",
        Action::Push(Box::new(Iota::Bool(false))),
        false,
    )
}

pub fn nullary_reflection() -> PatternIota {
    pattern(
        "Nullary Reflection",
        HexDir::East,
        "d",
        Action::Push(Box::new(Iota::Null)),
        false,
    )
}

pub fn vector_reflection_pos_x() -> PatternIota {
    pattern(
        "Vector Reflection +X",
        HexDir::Northeast,
        "qqqqqea",
        Action::Push(Box::new(Iota::Vector(Vec3::new(1.0, 0.0, 0.0)))),
        false,
    )
}

pub fn vector_reflection_neg_x() -> PatternIota {
    pattern(
        "Vector Reflection -X",
        HexDir::Northeast,
        "eeeeeqa",
        Action::Push(Box::new(Iota::Vector(Vec3::new(-1.0, 0.0, 0.0)))),
        false,
    )
}

pub fn vector_reflection_pos_y() -> PatternIota {
    pattern(
        "Vector Reflection +Y",
        HexDir::Northeast,
        "qqqqqew",
        Action::Push(Box::new(Iota::Vector(Vec3::new(0.0, 1.0, 0.0)))),
        false,
    )
}

pub fn vector_reflection_neg_y() -> PatternIota {
    pattern(
        "Vector Reflection -Y",
        HexDir::Northeast,
        "eeeeeqw",
        Action::Push(Box::new(Iota::Vector(Vec3::new(0.0, -1.0, 0.0)))),
        false,
    )
}

pub fn vector_reflection_pos_z() -> PatternIota {
    pattern(
        "Vector Reflection +Z",
        HexDir::Northeast,
        "qqqqqed",
        Action::Push(Box::new(Iota::Vector(Vec3::new(0.0, 0.0, 1.0)))),
        false,
    )
}

pub fn vector_reflection_neg_z() -> PatternIota {
    pattern(
        "Vector Reflection -Z",
        HexDir::Northeast,
        "eeeeeqd",
        Action::Push(Box::new(Iota::Vector(Vec3::new(0.0, 0.0, -1.0)))),
        false,
    )
}

pub fn vector_reflection_zero() -> PatternIota {
    pattern(
        "Vector Reflection Zero",
        HexDir::Northeast,
        "qqqqq",
        Action::Push(Box::new(Iota::Vector(Vec3::ZERO))),
        false,
    )
}

/// Push 2π.
pub fn circles_reflection() -> PatternIota {
    pattern(
        "Circle's Reflection",
        HexDir::Northwest,
        "eawae",
        Action::Push(Box::new(Iota::Double(consts::TAU))),
        false,
    )
}

/// Push π.
pub fn arcs_reflection() -> PatternIota {
    pattern(
        "Arc's Reflection",
        HexDir::Northeast,
        "qdwdq",
        Action::Push(Box::new(Iota::Double(consts::PI))),
        false,
    )
}

/// Push Euler's number.
pub fn eulers_reflection() -> PatternIota {
    pattern(
        "Euler's Reflection",
        HexDir::East,
        "aaq",
        Action::Push(Box::new(Iota::Double(consts::E))),
        false,
    )
}

/// Pop three doubles (z on top) and push the vector they describe.
pub fn vector_exaltation() -> PatternIota {
    pattern(
        "Vector Exaltation",
        HexDir::East,
        "eqqqqq",
        Action::Invoke(vector_exaltation_action),
        false,
    )
}

fn vector_exaltation_action(
    _this: &PatternIota,
    vm: &CastVm,
    _env: &dyn Environment,
) -> Result<Outcome, Mishap> {
    let args = vm.stack_args(&[Some(IotaType::Double); 3])?;
    let component = |iota: &Iota| match iota {
        Iota::Double(value) => *value,
        // stack_args checked the tags already
        _ => unreachable!(),
    };
    let vector = Vec3::new(
        component(&args[0]),
        component(&args[1]),
        component(&args[2]),
    );
    Ok(Outcome {
        diff: vec![Change {
            stack_pop: 3,
            stack_push: vec![Iota::Vector(vector)],
            ..Change::default()
        }],
        ..Outcome::default()
    })
}

// ---------------------------------------------------------------------
// Control flow
// ---------------------------------------------------------------------

/// Pop one iota and run it: a list runs element by element, anything else
/// runs as a single instruction.
pub fn hermes_gambit() -> PatternIota {
    pattern(
        "Hermes' Gambit",
        HexDir::Southeast,
        "deaqq",
        Action::Invoke(hermes_gambit_action),
        false,
    )
}

/// The instruction list a popped iota stands for.
fn instructions_of(iota: &Iota) -> Vec<Iota> {
    match iota {
        Iota::List(items) => items.clone(),
        other => vec![other.clone()],
    }
}

fn hermes_gambit_action(
    _this: &PatternIota,
    vm: &CastVm,
    _env: &dyn Environment,
) -> Result<Outcome, Mishap> {
    let args = vm.stack_args(&[None])?;
    let instructions = instructions_of(&args[0]);
    Ok(Outcome {
        diff: vec![Change {
            stack_pop: 1,
            frame_push: vec![Rc::new(HermesFrame::new(
                instructions,
                false,
            ))],
            ..Change::default()
        }],
        sound: Sound::Hermes,
        ..Outcome::default()
    })
}

/// Pop an instruction list and a data list (data on top) and fold the
/// instructions over the data, collecting every iteration's output.
pub fn thoths_gambit() -> PatternIota {
    pattern(
        "Thoth's Gambit",
        HexDir::Northeast,
        "dadad",
        Action::Invoke(thoths_gambit_action),
        false,
    )
}

fn thoths_gambit_action(
    _this: &PatternIota,
    vm: &CastVm,
    _env: &dyn Environment,
) -> Result<Outcome, Mishap> {
    let args = vm
        .stack_args(&[Some(IotaType::List), Some(IotaType::List)])?;
    // stack_args checked the tags already
    let instructions = args[0].as_list().unwrap().to_vec();
    let data = args[1].as_list().unwrap().to_vec();
    Ok(Outcome {
        diff: vec![Change {
            stack_pop: 2,
            frame_push: vec![Rc::new(ThothFrame::new(
                data,
                instructions,
            ))],
            ..Change::default()
        }],
        sound: Sound::Thoth,
        ..Outcome::default()
    })
}

/// Like [hermes_gambit], but first capture the rest of the cast as a
/// continuation and leave it on the stack, so the executed code can jump
/// back out.
pub fn iris_gambit() -> PatternIota {
    pattern(
        "Iris' Gambit",
        HexDir::Northwest,
        "qwaqde",
        Action::Invoke(iris_gambit_action),
        false,
    )
}

fn iris_gambit_action(
    _this: &PatternIota,
    vm: &CastVm,
    _env: &dyn Environment,
) -> Result<Outcome, Mishap> {
    let args = vm.stack_args(&[None])?;
    let instructions = instructions_of(&args[0]);
    let continuation =
        Iota::Continuation(Continuation::new(vm.frames().to_vec()));
    Ok(Outcome {
        diff: vec![Change {
            stack_pop: 1,
            stack_push: vec![continuation],
            frame_push: vec![Rc::new(HermesFrame::new(
                instructions,
                false,
            ))],
            ..Change::default()
        }],
        sound: Sound::Hermes,
        ..Outcome::default()
    })
}

// ---------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------

/// The set of patterns the runtime can resolve by shape. Keyed by angle
/// signature, which is exactly pattern identity, so lookup is
/// orientation-insensitive for free. Numerical Reflections are not stored;
/// [Self::find] decodes them on the fly.
#[derive(Debug, Default)]
pub struct PatternRegistry {
    patterns: IndexMap<String, PatternIota, FnvBuildHasher>,
}

impl PatternRegistry {
    /// The registry holding the runtime's closed core set.
    pub fn core() -> Self {
        let mut registry = Self::default();
        for pattern in [
            introspection(),
            retrospection(),
            consideration(),
            vacant_reflection(),
            singles_purification(),
            minds_reflection(),
            true_reflection(),
            false_reflection(),
            nullary_reflection(),
            vector_reflection_pos_x(),
            vector_reflection_neg_x(),
            vector_reflection_pos_y(),
            vector_reflection_neg_y(),
            vector_reflection_pos_z(),
            vector_reflection_neg_z(),
            vector_reflection_zero(),
            circles_reflection(),
            arcs_reflection(),
            eulers_reflection(),
            vector_exaltation(),
            hermes_gambit(),
            thoths_gambit(),
            iris_gambit(),
        ] {
            registry.insert(pattern);
        }
        info!(
            "initialized pattern registry with {} core patterns",
            registry.len()
        );
        registry
    }

    /// Register a pattern. A pattern with the same shape replaces the old
    /// one.
    pub fn insert(&mut self, pattern: PatternIota) {
        self.patterns
            .insert(pattern.pattern().angle_signature(), pattern);
    }

    /// Resolve a raw walk into an executable pattern, ignoring its
    /// orientation. Falls back to decoding the walk as a Numerical
    /// Reflection.
    pub fn find(&self, pattern: &HexPattern) -> Option<PatternIota> {
        let signature = pattern.angle_signature();
        if let Some(found) = self.patterns.get(&signature) {
            return Some(found.clone());
        }
        let value = number::decode_signature(&signature)?;
        number::numerical_reflection(value).ok()
    }

    /// Look a pattern up by name. Linear, for tooling and tests.
    pub fn get(&self, name: &str) -> Option<&PatternIota> {
        self.patterns.values().find(|pattern| pattern.name() == name)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternIota> {
        self.patterns.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_signatures_are_distinct() {
        let registry = PatternRegistry::core();
        assert_eq!(registry.len(), 23);
    }

    #[test]
    fn test_find_ignores_orientation() {
        let registry = PatternRegistry::core();
        let walk: HexPattern = "southwest,qqq".parse().unwrap();
        let found = registry.find(&walk).unwrap();
        assert_eq!(found.name(), "Introspection");
        assert!(found.must_escape());
    }

    #[test]
    fn test_find_decodes_numbers() {
        let registry = PatternRegistry::core();
        let walk: HexPattern = "east,aqaawaaw".parse().unwrap();
        let found = registry.find(&walk).unwrap();
        assert_eq!(found.name(), "Numerical Reflection: 5");

        let unknown: HexPattern = "east,wwww".parse().unwrap();
        assert!(registry.find(&unknown).is_none());
    }

    #[test]
    fn test_get_by_name() {
        let registry = PatternRegistry::core();
        assert!(registry.get("Thoth's Gambit").is_some());
        assert!(registry.get("Charon's Gambit").is_none());
    }
}
