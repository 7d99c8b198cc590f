//! JSON serialization for the tsz documentation model.
//!
//! [`Serializer`] turns a [`ProjectReflection`](tsz_docs_models::ProjectReflection)
//! into JSON through prioritized components; [`Deserializer`] revives one or
//! more serialized projects, remapping every reflection id.

pub mod deserializer;
pub mod error;
pub mod json;
pub mod serializer;

pub use deserializer::{
    DeserializeContext, Deserializer, DeserializerComponent, DeserializerComponentId, Revived,
};
pub use error::{DeserializeError, DeserializeIssue, DeserializeResult};
pub use json::JsonObject;
pub use serializer::{
    ComponentId, ListenerId, SerializeContext, SerializeEvent, Serializer, SerializerComponent,
    SourceReferenceWrapper,
};
