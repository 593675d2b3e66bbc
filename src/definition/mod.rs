pub mod block;
pub mod parameter;
pub mod workflow;

pub use block::*;
pub use parameter::*;
pub use workflow::*;
