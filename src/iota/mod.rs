//! The value algebra of the runtime. Every value that can appear on the
//! stack, inside a quotation or in a list is an [Iota]: a closed set of
//! tagged variants with a small uniform capability set (truthiness,
//! tolerance-based equality, a type tag, display fragments).

mod display;
mod entity;
mod pattern;

pub use self::{display::*, entity::*, pattern::*};

use crate::cast::Continuation;
use derive_more::{
    Add, AddAssign, Display, Div, DivAssign, Mul, MulAssign, Neg, Sub,
    SubAssign,
};
use std::rc::Rc;

/// How far apart two doubles (or two vectors) can be while still counting
/// as equal. Comparisons are strict, so a distance of exactly this value is
/// *not* equal.
pub const TOLERANCE: f64 = 1e-4;

/// A 3-component vector value. This is a value in the algebra, not a grid
/// position; see [crate::hex::HexCoord] for those.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
)]
#[display(fmt = "({}, {}, {})", "self.x", "self.y", "self.z")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance between two vectors.
    pub fn distance(self, other: Self) -> f64 {
        let diff = self - other;
        (diff.x * diff.x + diff.y * diff.y + diff.z * diff.z).sqrt()
    }
}

/// A value in the runtime's closed variant set.
///
/// Two iotas are compared with [Self::tolerates], which is tolerance-based
/// for numeric variants and reference-based for host objects. `PartialEq`
/// is deliberately not implemented; there is no context in the runtime
/// where exact structural equality of iotas is the right question to ask.
#[derive(Clone, Debug)]
pub enum Iota {
    /// The explicit null value. Falsy.
    Null,
    /// The result of something going wrong. Falsy, equal only to itself.
    Garbage,
    Bool(bool),
    Double(f64),
    Str(String),
    Vector(Vec3),
    Entity(Rc<Entity>),
    EntityType(Rc<EntityType>),
    Pattern(PatternIota),
    /// An ordered sequence of iotas. The runtime's only container.
    List(Vec<Iota>),
    /// A snapshot of the VM's frame stack; executing it jumps there.
    Continuation(Continuation),
    /// A type tag as a first-class value.
    Type(IotaType),
}

impl Iota {
    /// The type tag of this value. The VM uses tags for typed stack access.
    pub fn type_tag(&self) -> IotaType {
        match self {
            Self::Null => IotaType::Null,
            Self::Garbage => IotaType::Garbage,
            Self::Bool(_) => IotaType::Bool,
            Self::Double(_) => IotaType::Double,
            Self::Str(_) => IotaType::Str,
            Self::Vector(_) => IotaType::Vector,
            Self::Entity(_) => IotaType::Entity,
            Self::EntityType(_) => IotaType::EntityType,
            Self::Pattern(_) => IotaType::Pattern,
            Self::List(_) => IotaType::List,
            Self::Continuation(_) => IotaType::Continuation,
            Self::Type(_) => IotaType::Type,
        }
    }

    /// Whether executing this value directly does something, as opposed to
    /// it being plain data. Patterns carry actions; continuations jump.
    pub fn has_action(&self) -> bool {
        matches!(self, Self::Pattern(_) | Self::Continuation(_))
    }

    /// The truthiness of this value. Note that a vector is only truthy if
    /// **all three** of its components are non-zero.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null | Self::Garbage => false,
            Self::Bool(value) => *value,
            Self::Double(value) => *value != 0.0,
            Self::Str(value) => !value.is_empty(),
            Self::Vector(v) => v.x != 0.0 && v.y != 0.0 && v.z != 0.0,
            Self::Entity(_)
            | Self::EntityType(_)
            | Self::Pattern(_)
            | Self::Continuation(_)
            | Self::Type(_) => true,
            Self::List(items) => !items.is_empty(),
        }
    }

    /// Equality over the value algebra. Doubles and vectors compare within
    /// [TOLERANCE], entities and entity types by reference identity, lists
    /// recursively, patterns by shape, continuations by pairwise frame
    /// identity. Values of different variants are never equal.
    pub fn tolerates(&self, other: &Iota) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) | (Self::Garbage, Self::Garbage) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => (a - b).abs() < TOLERANCE,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Vector(a), Self::Vector(b)) => {
                a.distance(*b) < TOLERANCE
            }
            (Self::Entity(a), Self::Entity(b)) => Rc::ptr_eq(a, b),
            (Self::EntityType(a), Self::EntityType(b)) => Rc::ptr_eq(a, b),
            (Self::Pattern(a), Self::Pattern(b)) => a == b,
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| x.tolerates(y))
            }
            (Self::Continuation(a), Self::Continuation(b)) => {
                a.frames().len() == b.frames().len()
                    && a.frames()
                        .iter()
                        .zip(b.frames())
                        .all(|(x, y)| Rc::ptr_eq(x, y))
            }
            (Self::Type(a), Self::Type(b)) => a == b,
            _ => false,
        }
    }

    /// Convert a possibly-missing host literal. A missing value becomes
    /// [Iota::Garbage]; everything else converts as usual.
    pub fn from_host(value: Option<Iota>) -> Iota {
        value.unwrap_or(Iota::Garbage)
    }

    /// Borrow the items of a list iota, if this is one.
    pub fn as_list(&self) -> Option<&[Iota]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Iota {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Iota {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for Iota {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Iota {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec3> for Iota {
    fn from(value: Vec3) -> Self {
        Self::Vector(value)
    }
}

impl From<Vec<Iota>> for Iota {
    fn from(value: Vec<Iota>) -> Self {
        Self::List(value)
    }
}

impl From<PatternIota> for Iota {
    fn from(value: PatternIota) -> Self {
        Self::Pattern(value)
    }
}

/// The type tag of an [Iota], as a value of its own. Tags are compared by
/// plain equality.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum IotaType {
    #[display(fmt = "null")]
    Null,
    #[display(fmt = "garbage")]
    Garbage,
    #[display(fmt = "boolean")]
    Bool,
    #[display(fmt = "double")]
    Double,
    #[display(fmt = "string")]
    Str,
    #[display(fmt = "vector")]
    Vector,
    #[display(fmt = "entity")]
    Entity,
    #[display(fmt = "entity type")]
    EntityType,
    #[display(fmt = "pattern")]
    Pattern,
    #[display(fmt = "list")]
    List,
    #[display(fmt = "continuation")]
    Continuation,
    #[display(fmt = "type")]
    Type,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_tolerance() {
        assert!(Iota::Double(1.0).tolerates(&Iota::Double(1.0)));
        assert!(Iota::Double(1.0).tolerates(&Iota::Double(1.0 + 0.99e-4)));
        // Exactly the tolerance apart is not equal
        assert!(!Iota::Double(0.0).tolerates(&Iota::Double(1e-4)));
        assert!(!Iota::Double(0.0).tolerates(&Iota::Double(2e-4)));
    }

    #[test]
    fn test_vector_tolerance() {
        let a = Iota::Vector(Vec3::new(1.0, 2.0, 3.0));
        assert!(a.tolerates(&Iota::Vector(Vec3::new(1.0, 2.0, 3.00009))));
        assert!(!a.tolerates(&Iota::Vector(Vec3::new(1.0, 2.0, 3.0002))));
    }

    #[test]
    fn test_list_equality_is_recursive() {
        let a = Iota::List(vec![
            Iota::Double(1.0),
            Iota::List(vec![Iota::Str("x".into())]),
        ]);
        let b = Iota::List(vec![
            Iota::Double(1.000001),
            Iota::List(vec![Iota::Str("x".into())]),
        ]);
        let c = Iota::List(vec![Iota::Double(1.0)]);
        assert!(a.tolerates(&b));
        // Length must match
        assert!(!a.tolerates(&c));
        // Variants never cross-compare
        assert!(!Iota::Double(0.0).tolerates(&Iota::Null));
    }

    #[test]
    fn test_entity_reference_identity() {
        let kind = Rc::new(EntityType::new("Player"));
        let entity = Rc::new(Entity::new(Rc::clone(&kind), "Astavie"));
        let twin = Rc::new(Entity::new(Rc::clone(&kind), "Astavie"));
        assert!(Iota::Entity(Rc::clone(&entity))
            .tolerates(&Iota::Entity(Rc::clone(&entity))));
        // Same name, same type, different object
        assert!(!Iota::Entity(entity).tolerates(&Iota::Entity(twin)));
    }

    #[test]
    fn test_truthiness() {
        assert!(!Iota::Null.is_truthy());
        assert!(!Iota::Garbage.is_truthy());
        assert!(!Iota::Bool(false).is_truthy());
        assert!(Iota::Bool(true).is_truthy());
        assert!(!Iota::Double(0.0).is_truthy());
        assert!(Iota::Double(-2.5).is_truthy());
        assert!(!Iota::Str(String::new()).is_truthy());
        assert!(Iota::Str("x".into()).is_truthy());
        assert!(!Iota::List(Vec::new()).is_truthy());
        assert!(Iota::List(vec![Iota::Null]).is_truthy());
        // A vector needs all three components non-zero
        assert!(!Iota::Vector(Vec3::new(1.0, 0.0, 1.0)).is_truthy());
        assert!(Iota::Vector(Vec3::new(1.0, -1.0, 2.0)).is_truthy());
    }

    #[test]
    fn test_from_host() {
        assert!(matches!(Iota::from_host(None), Iota::Garbage));
        assert!(matches!(
            Iota::from_host(Some(Iota::from(true))),
            Iota::Bool(true)
        ));
        assert!(matches!(Iota::from(2.0), Iota::Double(_)));
        assert!(matches!(Iota::from("text"), Iota::Str(_)));
        assert!(matches!(Iota::from(vec![Iota::Null]), Iota::List(_)));
    }
}
