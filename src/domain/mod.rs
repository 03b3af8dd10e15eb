// Domain layer: table model and the ports (storage, pipeline) the core runs against.

pub mod model;
pub mod ports;
