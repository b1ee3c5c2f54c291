//! Interface layer. REST is the only surface today.

pub mod rest;
