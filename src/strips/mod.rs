pub(crate) mod layout;
pub(crate) mod registry;
pub(crate) mod surfaces;
