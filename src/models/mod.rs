pub mod poll;
pub mod poll_option;
pub mod question;
pub mod vote;
