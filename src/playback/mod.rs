pub(crate) mod controller;
pub(crate) mod encounter;
pub(crate) mod schedule;
pub(crate) mod scroll;
pub(crate) mod sequencer;
pub(crate) mod session;
pub(crate) mod snapshot;
