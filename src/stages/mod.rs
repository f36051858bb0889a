pub mod stage0_normalize;
pub mod stage1_plan;
pub mod stage2_generate;
pub mod stage3_respond;

pub use stage0_normalize::*;
pub use stage1_plan::*;
pub use stage2_generate::*;
pub use stage3_respond::*;
