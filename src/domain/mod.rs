// Domain layer: core models and ports (interfaces). No knowledge of files, CLI or transport.

pub mod model;
pub mod ports;
