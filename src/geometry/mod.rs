pub(crate) mod contain;
