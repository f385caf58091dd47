pub mod fog_tick;

pub use self::{
    fog_tick::*,
};
