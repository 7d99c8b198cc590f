//! Reflection modifier flags.
//!
//! Serialized as an object holding only the flags that are set, e.g.
//! `{"isPrivate": true, "isStatic": true}`.

use bitflags::bitflags;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Modifier flags of a reflection.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ReflectionFlags: u32 {
        const PRIVATE = 1 << 0;
        const PROTECTED = 1 << 1;
        const PUBLIC = 1 << 2;
        const STATIC = 1 << 3;
        const EXTERNAL = 1 << 4;
        const OPTIONAL = 1 << 5;
        const REST = 1 << 6;
        const ABSTRACT = 1 << 7;
        const CONST = 1 << 8;
        const READONLY = 1 << 9;
        const INHERITED = 1 << 10;

        /// Visibility group; at most one of these may be set.
        const VISIBILITY = Self::PRIVATE.bits() | Self::PROTECTED.bits() | Self::PUBLIC.bits();
    }
}

/// Serialized key for each single flag, in output order.
const FLAG_KEYS: &[(ReflectionFlags, &str)] = &[
    (ReflectionFlags::PRIVATE, "isPrivate"),
    (ReflectionFlags::PROTECTED, "isProtected"),
    (ReflectionFlags::PUBLIC, "isPublic"),
    (ReflectionFlags::STATIC, "isStatic"),
    (ReflectionFlags::EXTERNAL, "isExternal"),
    (ReflectionFlags::OPTIONAL, "isOptional"),
    (ReflectionFlags::REST, "isRest"),
    (ReflectionFlags::ABSTRACT, "isAbstract"),
    (ReflectionFlags::CONST, "isConst"),
    (ReflectionFlags::READONLY, "isReadonly"),
    (ReflectionFlags::INHERITED, "isInherited"),
];

impl ReflectionFlags {
    /// Set or clear a single flag.
    ///
    /// Setting one of private/protected/public clears the other two, so the
    /// visibility trio is never simultaneously set.
    pub fn set_flag(&mut self, flag: Self, value: bool) {
        debug_assert!(
            flag.bits().count_ones() == 1,
            "set_flag expects a single flag, got {flag:?}"
        );
        if value {
            if flag.intersects(Self::VISIBILITY) {
                self.remove(Self::VISIBILITY);
            }
            self.insert(flag);
        } else {
            self.remove(flag);
        }
    }

    #[inline]
    pub const fn has_flag(self, flag: Self) -> bool {
        self.contains(flag)
    }

    /// Serialized key of a single flag, e.g. `"isReadonly"`.
    pub fn json_key(flag: Self) -> Option<&'static str> {
        FLAG_KEYS.iter().find(|(f, _)| *f == flag).map(|(_, k)| *k)
    }

    /// Flag for a serialized key. Unknown keys return `None`.
    pub fn from_json_key(key: &str) -> Option<Self> {
        FLAG_KEYS.iter().find(|(_, k)| *k == key).map(|(f, _)| *f)
    }

    /// Iterate the set flags together with their serialized keys.
    pub fn iter_keys(self) -> impl Iterator<Item = (Self, &'static str)> {
        FLAG_KEYS
            .iter()
            .copied()
            .filter(move |(flag, _)| self.contains(*flag))
    }
}

impl Serialize for ReflectionFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let set: Vec<_> = self.iter_keys().collect();
        let mut map = serializer.serialize_map(Some(set.len()))?;
        for (_, key) in set {
            map.serialize_entry(key, &true)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ReflectionFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FlagsVisitor;

        impl<'de> Visitor<'de> for FlagsVisitor {
            type Value = ReflectionFlags;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of boolean reflection flags")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut flags = ReflectionFlags::empty();
                while let Some(key) = access.next_key::<String>()? {
                    // Values that are not booleans are tolerated and treated as unset.
                    let value = access.next_value::<serde_json::Value>()?;
                    if let Some(flag) = ReflectionFlags::from_json_key(&key)
                        && value.as_bool() == Some(true)
                    {
                        flags.set_flag(flag, true);
                    }
                }
                Ok(flags)
            }
        }

        deserializer.deserialize_map(FlagsVisitor)
    }
}

#[cfg(test)]
#[path = "../tests/flags_tests.rs"]
mod tests;
