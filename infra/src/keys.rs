use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use err_derive::Error;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A document type stored in its own collection.
pub trait Entity {
    const COLLECTION: &'static str;
}

/// A caller-supplied document identifier, tagged with the entity type it
/// names. Keys are opaque non-empty strings; we never mint them ourselves.
pub struct Key<T> {
    val: String,
    phantom: PhantomData<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(display = "empty identifier")]
pub struct EmptyKey;

impl<T> Key<T> {
    pub fn as_str(&self) -> &str {
        &self.val
    }
}

impl<T> fmt::Display for Key<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.val)
    }
}

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_tuple("Key").field(&self.val).finish()
    }
}

impl<T> FromStr for Key<T> {
    type Err = EmptyKey;
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        if src.is_empty() {
            return Err(EmptyKey);
        }
        Ok(Key {
            val: src.to_string(),
            phantom: PhantomData,
        })
    }
}

// Manual impls so that `T` needs no bounds of its own.

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        Key {
            val: self.val.clone(),
            phantom: PhantomData,
        }
    }
}

impl<T> PartialEq for Key<T> {
    fn eq(&self, other: &Self) -> bool {
        self.val == other.val
    }
}

impl<T> Eq for Key<T> {}

impl<T> PartialOrd for Key<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Key<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.val.cmp(&other.val)
    }
}

impl<T> Hash for Key<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.val.hash(state)
    }
}

impl<T> Serialize for Key<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.val)
    }
}

impl<'de, T> Deserialize<'de> for Key<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyStrVisitor<T>(PhantomData<T>);
        impl<'vi, T> de::Visitor<'vi> for KeyStrVisitor<T> {
            type Value = Key<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a non-empty identifier string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Key<T>, E> {
                value.parse::<Key<T>>().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(KeyStrVisitor(PhantomData))
    }
}
