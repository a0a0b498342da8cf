pub mod client;
pub mod contact;
pub mod notification;
pub mod outcome;
