pub mod case;
pub mod intake;
pub mod money;
pub mod plan;

pub use case::*;
pub use intake::*;
pub use money::*;
pub use plan::*;
