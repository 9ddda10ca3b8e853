// Domain layer: response models and callback ports, no client wiring here.

pub mod model;
pub mod ports;
