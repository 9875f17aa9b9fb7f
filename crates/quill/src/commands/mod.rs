//! CLI command implementations.

pub(crate) mod rules;
pub(crate) mod split;

pub(crate) use rules::RulesArgs;
pub(crate) use split::SplitArgs;
