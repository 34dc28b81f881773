pub mod fields;
pub mod settings;

pub use fields::*;
pub use settings::*;
