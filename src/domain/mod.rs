// Domain layer: request/response model and ports. No HTTP or numeric dependencies.

pub mod model;
pub mod ports;
