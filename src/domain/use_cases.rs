pub mod abuse;
pub mod contact;
pub mod extractors;
