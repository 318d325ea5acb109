use crate::iota::Iota;
use fnv::FnvHashMap;

/// A category of entity, e.g. "Player". Entity types are compared by
/// reference identity, so hosts should create each type once and share the
/// `Rc` across every entity of that type.
#[derive(Debug)]
pub struct EntityType {
    name: String,
    props: FnvHashMap<String, Iota>,
}

impl EntityType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            props: FnvHashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a property shared by every entity of this type.
    pub fn prop(&self, key: &str) -> Option<&Iota> {
        self.props.get(key)
    }

    /// Attach a property to this type. Properties are opaque to the
    /// runtime; they exist so hosts can hang their own data off the values
    /// they pass in.
    pub fn insert_prop(&mut self, key: impl Into<String>, value: Iota) {
        self.props.insert(key.into(), value);
    }
}

/// A host-world object, e.g. the caster. The runtime never inspects an
/// entity beyond its name; entities are compared by reference identity and
/// are always truthy.
#[derive(Debug)]
pub struct Entity {
    kind: std::rc::Rc<EntityType>,
    name: String,
    props: FnvHashMap<String, Iota>,
}

impl Entity {
    pub fn new(kind: std::rc::Rc<EntityType>, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            props: FnvHashMap::default(),
        }
    }

    pub fn kind(&self) -> &std::rc::Rc<EntityType> {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a property on this entity, falling back to its type.
    pub fn prop(&self, key: &str) -> Option<&Iota> {
        self.props.get(key).or_else(|| self.kind.prop(key))
    }

    /// Attach a property to this entity. See [EntityType::insert_prop].
    pub fn insert_prop(&mut self, key: impl Into<String>, value: Iota) {
        self.props.insert(key.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_prop_fallback() {
        let mut kind = EntityType::new("Player");
        kind.insert_prop("health", Iota::Double(20.0));
        let mut entity = Entity::new(Rc::new(kind), "Astavie");
        assert!(entity
            .prop("health")
            .unwrap()
            .tolerates(&Iota::Double(20.0)));

        entity.insert_prop("health", Iota::Double(7.0));
        assert!(entity
            .prop("health")
            .unwrap()
            .tolerates(&Iota::Double(7.0)));
        assert!(entity.prop("mana").is_none());
    }
}
