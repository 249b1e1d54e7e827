mod adjustment;
mod invoice;

pub use adjustment::Adjustment;
pub use invoice::Invoice;
