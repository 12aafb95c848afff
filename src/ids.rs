//! Typed Ids

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Backend integer id tagged with the entity it identifies.
pub struct TypedId<T>(u64, PhantomData<T>);

impl<T> TypedId<T> {
    /// Wrap a raw backend id.
    pub const fn new(id: u64) -> Self {
        Self(id, PhantomData)
    }

    /// Returns the raw backend id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedId<T> {}

impl<T> Debug for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(&self.0, f)
    }
}

impl<T> Display for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl<T> PartialEq for TypedId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for TypedId<T> {}

impl<T> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> PartialOrd for TypedId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TypedId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> From<u64> for TypedId<T> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<T> From<TypedId<T>> for u64 {
    fn from(value: TypedId<T>) -> Self {
        value.get()
    }
}

impl<T> FromStr for TypedId<T> {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self::new)
    }
}

impl<T> Serialize for TypedId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de, T> Deserialize<'de> for TypedId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::new)
    }
}

/// Marker for laundry order ids.
#[derive(Debug)]
pub struct OrderMarker;

/// Marker for catalog service ids.
#[derive(Debug)]
pub struct ServiceMarker;

/// Marker for user ids (customers, cashiers, drivers, admins).
#[derive(Debug)]
pub struct UserMarker;

/// Order Id
pub type OrderId = TypedId<OrderMarker>;

/// Service Id
pub type ServiceId = TypedId<ServiceMarker>;

/// User Id
pub type UserId = TypedId<UserMarker>;

impl OrderId {
    /// Customer-facing order reference, e.g. `#ORD-42`.
    #[must_use]
    pub fn reference(self) -> String {
        format!("#ORD-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn ids_serialize_as_bare_integers() -> TestResult {
        let id = OrderId::new(42);

        assert_eq!(serde_json::to_string(&id)?, "42");
        assert_eq!(serde_json::from_str::<OrderId>("7")?, OrderId::new(7));

        Ok(())
    }

    #[test]
    fn order_reference_uses_ord_prefix() {
        assert_eq!(OrderId::new(42).reference(), "#ORD-42");
    }

    #[test]
    fn parses_trimmed_digits() -> TestResult {
        let id: ServiceId = " 12 ".parse()?;

        assert_eq!(id.get(), 12);

        Ok(())
    }
}
