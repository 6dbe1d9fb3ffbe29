// Domain layer: dataset models and ports (storage, config, pipeline).

pub mod model;
pub mod ports;
