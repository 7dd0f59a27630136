//! Reduce a raw inbound message to the words the user actually typed.
//!
//! The body is taken from the first `text/plain` part, falling back to the
//! first `text/html` part with tags stripped. Everything from the first
//! quoted-history marker onward is dropped.

use std::sync::LazyLock;

use mailparse::{MailHeaderMap, ParsedMail};
use regex::Regex;
use sha2::{Digest, Sha256};

use ideapost_core::traits::InboundReply;
use ideapost_types::ChannelError;

static QUOTE_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"On .+wrote:",
        r"-{4,} ?Original Message ?-{4,}",
        r"(?m)^From: ",
        r"(?m)^[ \t]*> ",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static regex"))
    .collect()
});

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("static regex"));

/// Cut the body at the earliest quoted-history marker and trim.
pub fn strip_quoted(body: &str) -> String {
    let cut = QUOTE_MARKERS
        .iter()
        .filter_map(|re| re.find(body).map(|m| m.start()))
        .min()
        .unwrap_or(body.len());
    body[..cut].trim().to_owned()
}

/// Replace tags with spaces and decode the handful of entities mail clients
/// emit. Whitespace is collapsed so adjacent blocks stay separate words.
pub fn strip_html(html: &str) -> String {
    let text = HTML_TAG
        .replace_all(html, " ")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Stable id for messages without a `Message-ID` header.
pub fn fallback_message_id(from: &str, subject: &str, body: &str) -> String {
    let mut hasher = Sha256::new();
    for part in [from, subject, body] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("sha256:{hex}")
}

fn find_part<'a>(mail: &'a ParsedMail<'a>, mimetype: &str) -> Option<&'a ParsedMail<'a>> {
    if mail.subparts.is_empty() {
        return (mail.ctype.mimetype == mimetype).then_some(mail);
    }
    mail.subparts.iter().find_map(|part| find_part(part, mimetype))
}

fn body_text(mail: &ParsedMail<'_>) -> Result<String, ChannelError> {
    let decode = |part: &ParsedMail<'_>| {
        part.get_body()
            .map_err(|e| ChannelError::ReceiveFailed(format!("undecodable body: {e}")))
    };
    if let Some(plain) = find_part(mail, "text/plain") {
        return decode(plain);
    }
    if let Some(html) = find_part(mail, "text/html") {
        return Ok(strip_html(&decode(html)?));
    }
    Ok(String::new())
}

/// Parse a raw RFC 822 message into an [`InboundReply`].
pub fn parse_reply(raw: &[u8]) -> Result<InboundReply, ChannelError> {
    let mail = mailparse::parse_mail(raw)
        .map_err(|e| ChannelError::ReceiveFailed(format!("unparseable message: {e}")))?;

    let subject = mail.headers.get_first_value("Subject").unwrap_or_default();
    let from = mail.headers.get_first_value("From").unwrap_or_default();
    let body = strip_quoted(&body_text(&mail)?);
    let message_id = mail
        .headers
        .get_first_value("Message-ID")
        .map(|id| id.trim().to_owned())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| fallback_message_id(&from, &subject, &body));

    Ok(InboundReply {
        message_id,
        subject,
        from,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gmail_style_quote_removed() {
        let body = "Yes please!\r\n\r\nOn Sun, Oct 18, 2026 at 8:00 AM Briefing Bot <bot@example.com> wrote:\r\n> CEO DAILY BRIEFING\r\n> 1. Acme";
        assert_eq!(strip_quoted(body), "Yes please!");
    }

    #[test]
    fn outlook_and_forward_markers() {
        assert_eq!(
            strip_quoted("send 2\n\n----- Original Message -----\nFrom: bot"),
            "send 2"
        );
        assert_eq!(strip_quoted("acme\nFrom: Bot <bot@x>\nSent: today"), "acme");
        assert_eq!(strip_quoted("all\n\n  > quoted line"), "all");
    }

    #[test]
    fn earliest_marker_wins() {
        let body = "1 and 3\n> old\nOn Mon someone wrote:\nolder";
        assert_eq!(strip_quoted(body), "1 and 3");
    }

    #[test]
    fn unquoted_body_only_trimmed() {
        assert_eq!(strip_quoted("  bike rental \n"), "bike rental");
    }

    #[test]
    fn html_stripped() {
        assert_eq!(
            strip_html("<div>Tea &amp; <b>Export</b>&nbsp;please</div>"),
            "Tea & Export please"
        );
        assert_eq!(strip_html("<div>1</div><div>3</div>"), "1 3");
    }

    #[test]
    fn angle_bracket_without_space_is_not_a_quote() {
        assert_eq!(strip_quoted(">1 and 3"), ">1 and 3");
        assert_eq!(strip_quoted("2
> quoted"), "2");
    }

    #[test]
    fn fallback_id_is_stable() {
        let a = fallback_message_id("a@x", "Re: Briefing", "all");
        assert_eq!(a, fallback_message_id("a@x", "Re: Briefing", "all"));
        assert_ne!(a, fallback_message_id("a@x", "Re: Briefing", "1"));
        assert!(a.starts_with("sha256:"));
        assert_eq!(a.len(), "sha256:".len() + 64);
    }

    #[test]
    fn parse_plain_message() {
        let raw = b"Message-ID: <abc@mail.example.com>\r\n\
From: CEO <ceo@example.com>\r\n\
Subject: Re: CEO Briefing\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
Yes please!\r\n\
\r\n\
On Sun, Oct 18, 2026 at 8:00 AM Bot <bot@example.com> wrote:\r\n\
> old stuff\r\n";
        let reply = parse_reply(raw).unwrap();
        assert_eq!(reply.message_id, "<abc@mail.example.com>");
        assert_eq!(reply.subject, "Re: CEO Briefing");
        assert_eq!(reply.from, "CEO <ceo@example.com>");
        assert_eq!(reply.body, "Yes please!");
    }

    #[test]
    fn parse_multipart_prefers_plain() {
        let raw = b"From: ceo@example.com\r\n\
Subject: Re: Briefing\r\n\
Content-Type: multipart/alternative; boundary=\"XX\"\r\n\
\r\n\
--XX\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
<p>html version</p>\r\n\
--XX\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
plain version\r\n\
--XX--\r\n";
        let reply = parse_reply(raw).unwrap();
        assert_eq!(reply.body, "plain version");
        assert!(reply.message_id.starts_with("sha256:"));
    }

    #[test]
    fn parse_html_only_message() {
        let raw = b"From: ceo@example.com\r\n\
Subject: Re: Briefing\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
<div>Bike <b>Rental</b></div>\r\n";
        let reply = parse_reply(raw).unwrap();
        assert_eq!(reply.body, "Bike Rental");
    }

    #[test]
    fn html_only_blocks_match_separate_positions() {
        use ideapost_core::matcher::match_ideas;
        use ideapost_types::idea::Idea;
        use ideapost_types::state::PendingIdeas;

        let raw = b"From: ceo@example.com\r\n\
Subject: Re: Briefing\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
<div>1</div><div>3</div>\r\n";
        let reply = parse_reply(raw).unwrap();
        assert_eq!(reply.body, "1 3");

        let mut pending = PendingIdeas::new();
        let names = ["Alpha Tutors", "Bravo Couriers", "Charlie Farms"];
        for (i, name) in names.into_iter().enumerate() {
            pending.insert(name, Idea::new(i as i64 + 1, name));
        }
        let matched: Vec<&str> = match_ideas(&reply.body, &pending)
            .into_iter()
            .map(|idea| idea.business_name.as_str())
            .collect();
        assert_eq!(matched, ["Alpha Tutors", "Charlie Farms"]);
    }
}
