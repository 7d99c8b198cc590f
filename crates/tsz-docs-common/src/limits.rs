//! Centralized limits for the documentation model.
//!
//! The reflection tree is acyclic by construction, but reference reflections
//! can point at each other and plugins can reparent reflections. These limits
//! bound the walks that follow such edges so a malformed graph degrades into
//! an unresolved edge instead of an unbounded loop.

/// Maximum number of reference reflections followed when resolving a
/// re-export chain to its final target.
///
/// ```typescript
/// // a.ts
/// export class Widget {}
/// // b.ts
/// export { Widget as W1 } from "./a";
/// // c.ts
/// export { W1 as W2 } from "./b";   // W2 -> W1 -> Widget
/// ```
pub const MAX_REFERENCE_CHAIN_DEPTH: u32 = 64;

/// Maximum number of parent links followed when computing full names and
/// aliases.
pub const MAX_PARENT_DEPTH: u32 = 1024;
