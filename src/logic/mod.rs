//! Logic modules: expand user requests into concrete template items.
//!
//! Both resolvers are pure: no I/O, no side effects, and they always
//! terminate, even on cyclic input.
//!
//! # Modules
//!
//! - `set_resolver`: template sets and their `extends` chains
//! - `tag_resolver`: search tags, including composite tags

pub mod set_resolver;
pub mod tag_resolver;
