// Domain layer: models, ports and the static flag table. No I/O here.

pub mod flags;
pub mod model;
pub mod ports;
