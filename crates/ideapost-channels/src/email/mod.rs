//! Email channel (SMTP out, IMAP in).
//!
//! # Modules
//!
//! - [`types`] -- connection settings derived from `Config`
//! - [`smtp`] -- outbound delivery
//! - [`imap`] -- inbound reply polling
//! - [`extract`] -- body selection and quote stripping
//! - [`factory`] -- validated construction from `Config`

pub mod extract;
pub mod factory;
pub mod imap;
pub mod smtp;
pub mod types;

pub use self::factory::{build_inbox, build_mailer};
pub use self::imap::ImapInbox;
pub use self::smtp::SmtpMailer;
