pub mod confirmation;
pub mod submission;

pub use confirmation::ReceiptSummary;
pub use submission::Submitter;
