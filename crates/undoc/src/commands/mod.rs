//! CLI command implementations.

pub(crate) mod include;

pub(crate) use include::IncludeArgs;
