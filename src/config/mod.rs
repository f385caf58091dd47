pub mod fog_config;

pub use self::fog_config::*;
