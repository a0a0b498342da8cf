pub mod contact;
pub mod fragments;
pub mod system;
