/// Frame type shared by the compositor and sinks.
pub mod backend;
/// `vello_cpu` compositor for play-mode frames.
pub mod cpu;
/// Session stepping and frame streaming.
pub mod pipeline;
pub(crate) mod raster;
