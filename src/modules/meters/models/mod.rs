mod deduction_link;
mod meter;

pub use deduction_link::DeductionLink;
pub use meter::{Meter, ResourceType};
