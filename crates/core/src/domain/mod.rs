pub mod dashboard;
pub mod entity;
pub mod request;
pub mod result;
