//! Reflection kind tags.
//!
//! A reflection carries exactly one primary kind bit, but kinds are modelled as
//! a bitflag set so that membership tests against composite groups
//! (`CLASS_MEMBER`, `SOME_SIGNATURE`, ...) are a single AND.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Kind of a documented entity.
    ///
    /// Bit values are part of the serialized format and must not change.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ReflectionKind: u32 {
        const PROJECT = 0x1;
        const MODULE = 0x2;
        const NAMESPACE = 0x4;
        const ENUM = 0x8;
        const ENUM_MEMBER = 0x10;
        const VARIABLE = 0x20;
        const FUNCTION = 0x40;
        const CLASS = 0x80;
        const INTERFACE = 0x100;
        const CONSTRUCTOR = 0x200;
        const PROPERTY = 0x400;
        const METHOD = 0x800;
        const CALL_SIGNATURE = 0x1000;
        const INDEX_SIGNATURE = 0x2000;
        const CONSTRUCTOR_SIGNATURE = 0x4000;
        const PARAMETER = 0x8000;
        const TYPE_LITERAL = 0x10000;
        const TYPE_PARAMETER = 0x20000;
        const ACCESSOR = 0x40000;
        const GET_SIGNATURE = 0x80000;
        const SET_SIGNATURE = 0x100000;
        const TYPE_ALIAS = 0x200000;
        const REFERENCE = 0x400000;
        const DOCUMENT = 0x800000;

        // === Composite groups ===

        const CLASS_OR_INTERFACE = Self::CLASS.bits() | Self::INTERFACE.bits();
        const VARIABLE_OR_PROPERTY = Self::VARIABLE.bits() | Self::PROPERTY.bits();
        const FUNCTION_OR_METHOD = Self::FUNCTION.bits() | Self::METHOD.bits();
        const CLASS_MEMBER = Self::ACCESSOR.bits()
            | Self::CONSTRUCTOR.bits()
            | Self::METHOD.bits()
            | Self::PROPERTY.bits();
        const SOME_SIGNATURE = Self::CALL_SIGNATURE.bits()
            | Self::INDEX_SIGNATURE.bits()
            | Self::CONSTRUCTOR_SIGNATURE.bits()
            | Self::GET_SIGNATURE.bits()
            | Self::SET_SIGNATURE.bits();
        const SOME_MODULE = Self::MODULE.bits() | Self::NAMESPACE.bits();
        const SOME_TYPE = Self::INTERFACE.bits()
            | Self::TYPE_LITERAL.bits()
            | Self::TYPE_PARAMETER.bits()
            | Self::TYPE_ALIAS.bits();
        const SOME_VALUE = Self::VARIABLE.bits() | Self::FUNCTION.bits();
        const SOME_MEMBER = Self::ENUM_MEMBER.bits()
            | Self::PROPERTY.bits()
            | Self::METHOD.bits()
            | Self::ACCESSOR.bits();
        const SOME_EXPORT = Self::MODULE.bits()
            | Self::NAMESPACE.bits()
            | Self::ENUM.bits()
            | Self::VARIABLE.bits()
            | Self::FUNCTION.bits()
            | Self::CLASS.bits()
            | Self::INTERFACE.bits()
            | Self::TYPE_ALIAS.bits()
            | Self::REFERENCE.bits();
        const EXPORT_CONTAINER = Self::SOME_MODULE.bits() | Self::PROJECT.bits();
        /// Signature kinds skipped by friendly names.
        const FRIENDLY_NAME_SKIPPED = Self::CONSTRUCTOR_SIGNATURE.bits()
            | Self::CALL_SIGNATURE.bits()
            | Self::GET_SIGNATURE.bits()
            | Self::SET_SIGNATURE.bits();
    }
}

/// Primary kinds in bit order, paired with their singular and plural names.
const KIND_NAMES: &[(ReflectionKind, &str, &str)] = &[
    (ReflectionKind::PROJECT, "Project", "Projects"),
    (ReflectionKind::MODULE, "Module", "Modules"),
    (ReflectionKind::NAMESPACE, "Namespace", "Namespaces"),
    (ReflectionKind::ENUM, "Enumeration", "Enumerations"),
    (ReflectionKind::ENUM_MEMBER, "Enumeration Member", "Enumeration Members"),
    (ReflectionKind::VARIABLE, "Variable", "Variables"),
    (ReflectionKind::FUNCTION, "Function", "Functions"),
    (ReflectionKind::CLASS, "Class", "Classes"),
    (ReflectionKind::INTERFACE, "Interface", "Interfaces"),
    (ReflectionKind::CONSTRUCTOR, "Constructor", "Constructors"),
    (ReflectionKind::PROPERTY, "Property", "Properties"),
    (ReflectionKind::METHOD, "Method", "Methods"),
    (ReflectionKind::CALL_SIGNATURE, "Call Signature", "Call Signatures"),
    (ReflectionKind::INDEX_SIGNATURE, "Index Signature", "Index Signatures"),
    (ReflectionKind::CONSTRUCTOR_SIGNATURE, "Constructor Signature", "Constructor Signatures"),
    (ReflectionKind::PARAMETER, "Parameter", "Parameters"),
    (ReflectionKind::TYPE_LITERAL, "Type Literal", "Type Literals"),
    (ReflectionKind::TYPE_PARAMETER, "Type Parameter", "Type Parameters"),
    (ReflectionKind::ACCESSOR, "Accessor", "Accessors"),
    (ReflectionKind::GET_SIGNATURE, "Get Signature", "Get Signatures"),
    (ReflectionKind::SET_SIGNATURE, "Set Signature", "Set Signatures"),
    (ReflectionKind::TYPE_ALIAS, "Type Alias", "Type Aliases"),
    (ReflectionKind::REFERENCE, "Reference", "References"),
    (ReflectionKind::DOCUMENT, "Document", "Documents"),
];

impl ReflectionKind {
    /// True if this kind shares at least one bit with `other`.
    #[inline]
    pub const fn kind_of(self, other: Self) -> bool {
        self.bits() & other.bits() != 0
    }

    /// Human readable name of a primary kind, e.g. `"Type Alias"`.
    ///
    /// Composite or unknown values render as `"Unknown"`.
    pub fn singular_name(self) -> &'static str {
        KIND_NAMES
            .iter()
            .find(|(kind, _, _)| *kind == self)
            .map(|(_, name, _)| *name)
            .unwrap_or("Unknown")
    }

    /// Plural form used for group titles, e.g. `"Classes"`.
    pub fn plural_name(self) -> &'static str {
        KIND_NAMES
            .iter()
            .find(|(kind, _, _)| *kind == self)
            .map(|(_, _, plural)| *plural)
            .unwrap_or("Unknown")
    }

    /// All primary (single-bit) kinds in serialization order.
    pub fn primary_kinds() -> impl Iterator<Item = Self> {
        KIND_NAMES.iter().map(|(kind, _, _)| *kind)
    }
}

impl Serialize for ReflectionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for ReflectionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Unknown bits are retained so that kinds added by newer producers survive.
        u32::deserialize(deserializer).map(Self::from_bits_retain)
    }
}

#[cfg(test)]
#[path = "../tests/kind_tests.rs"]
mod tests;
