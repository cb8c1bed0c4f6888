// Domain layer: menu and conversation models plus the ports adapters implement.

pub mod model;
pub mod ports;
