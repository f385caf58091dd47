pub mod terrain;
pub mod observer;
pub mod components;

pub use self::{
    terrain::*,
    observer::*,
    components::*,
};
