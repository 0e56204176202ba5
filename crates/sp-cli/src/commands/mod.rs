//! CLI command implementations

pub(crate) mod common;
pub(crate) mod install;
pub(crate) mod new;
pub(crate) mod patch;
pub(crate) mod split;
pub(crate) mod version;
