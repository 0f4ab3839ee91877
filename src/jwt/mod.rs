mod caller;

pub use caller::*;
