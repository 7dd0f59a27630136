//! # ideapost-channels
//!
//! Mail transports behind the `ideapost-core` seams:
//!
//! - [`email::SmtpMailer`] implements [`Mailer`](ideapost_core::Mailer)
//!   over STARTTLS SMTP.
//! - [`email::ImapInbox`] implements [`Inbox`](ideapost_core::Inbox) by
//!   polling IMAP for unread replies.
//! - [`email::extract`] reduces a raw RFC 822 message to the reply text.

pub mod email;
