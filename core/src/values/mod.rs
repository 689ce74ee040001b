mod value;

pub use value::{Function, Value};
