pub mod traits;

pub use traits::{LinkError, SerialLink};
