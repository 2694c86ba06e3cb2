// Domain layer: models and ports. Adapters implement the ports, core only talks to them.

pub mod model;
pub mod ports;
