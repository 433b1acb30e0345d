pub mod membership;
pub mod submission;
