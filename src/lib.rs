//! Documentation reflection model for the tsz TypeScript compiler.
//!
//! The model lives in three crates, re-exported here:
//!
//! - [`common`]: ids, kinds, flags, symbol identity, paths and the file registry
//! - [`models`]: types, comments, reflections and the [`ProjectReflection`] registry
//! - [`serialization`]: the JSON [`Serializer`] and [`Deserializer`]
//!
//! ```
//! use tsz_docs::{Deserializer, ProjectReflection, Serializer};
//!
//! let project = ProjectReflection::new("demo");
//! let json = serde_json::Value::Object(Serializer::new().project_to_object(&project, "/repo"));
//! let revived = Deserializer::new().revive_project(&json, None, "/repo").unwrap();
//! assert_eq!(revived.name(), "demo");
//! ```

pub use tsz_docs_common as common;
pub use tsz_docs_models as models;
pub use tsz_docs_serialization as serialization;

pub use tsz_docs_models::{
    Comment, CommentDisplayPart, ProjectReflection, Reflection, ReflectionFlags, ReflectionId,
    ReflectionKind, ReflectionSymbolId, TraverseProperty, Type,
};
pub use tsz_docs_serialization::{
    DeserializeError, DeserializeIssue, Deserializer, DeserializerComponent, SerializeContext,
    Serializer, SerializerComponent,
};

// Command-line front end: options file, argument parsing and the revive/check driver.
#[cfg(feature = "cli")]
pub mod cli;

// Tracing subscriber setup (TSZ_DOCS_LOG / TSZ_DOCS_LOG_FORMAT)
#[cfg(feature = "cli")]
pub mod tracing_config;
