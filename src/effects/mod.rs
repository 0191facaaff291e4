pub(crate) mod filters;
pub(crate) mod profile;
pub(crate) mod rules;
