pub mod movie;
pub mod review;
