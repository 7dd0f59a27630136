//! Email and report rendering.
//!
//! Rendering is a pure function from selected ideas to text. It sits behind
//! [`Renderer`] so the run orchestration can be tested with a stub.

use std::fmt::Write as _;

use ideapost_types::{Idea, StartupCost};

use crate::selector::Selection;

/// A fully rendered outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    /// Plain-text alternative part.
    pub text: String,
}

/// Turns selections and matched ideas into messages.
pub trait Renderer: Send + Sync {
    /// Daily briefing for a selection.
    fn briefing(&self, selection: &Selection, date_display: &str) -> RenderedEmail;

    /// Full breakdown of ideas requested by a reply.
    fn details(&self, ideas: &[&Idea], date_display: &str) -> RenderedEmail;

    /// Response to a reply that matched nothing.
    fn help(&self, reply_body: &str, available: &[&str], date_display: &str) -> RenderedEmail;

    /// Markdown copy of the briefing, saved under the reports directory.
    fn report(&self, selection: &Selection, date_display: &str) -> String;
}

pub fn briefing_subject(date_display: &str) -> String {
    format!("🚀 CEO Briefing: Profitable SaaS Opportunities for Nepal — {date_display}")
}

pub fn details_subject(ideas: &[&Idea]) -> String {
    let names: Vec<&str> = ideas.iter().map(|i| i.business_name.as_str()).collect();
    format!("📋 Full Breakdown: {}", names.join(", "))
}

pub fn help_subject(date_display: &str) -> String {
    format!("📋 Help — Available Ideas for {date_display}")
}

/// Escape text for interpolation into HTML.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Text up to the first full stop.
fn first_sentence(s: &str) -> &str {
    s.split('.').next().unwrap_or("").trim()
}

fn cost_color(cost: &StartupCost) -> &'static str {
    match cost {
        StartupCost::Low => "#22c55e",
        StartupCost::Medium => "#f59e0b",
        StartupCost::High => "#ef4444",
        StartupCost::Other(_) => "#64748b",
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Default HTML renderer with inline styles.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    fn main_card(idea: &Idea) -> String {
        let steps: String = idea
            .action_plan
            .iter()
            .take(4)
            .map(|step| format!("<li>{}</li>", escape_html(step)))
            .collect();
        format!(
            r#"<div style="margin-bottom:32px;padding:24px;background:#fff;border:1px solid #e5e7eb;border-radius:12px;">
  <h2 style="margin:0 0 10px;color:#111827;font-size:22px;">💡 {name}</h2>
  <p style="margin:0 0 16px;color:#4b5563;font-size:16px;">🔹 {what}.</p>
  <p style="margin:0;"><strong>🎯 Target Customer</strong><br>{target}</p>
  <p style="margin:12px 0 0;"><strong>💰 Revenue Potential</strong><br><span style="color:#059669;font-weight:700;">{revenue}</span></p>
  <p style="margin:12px 0 0;"><strong>🧠 Why Now?</strong><br>{why}.</p>
  <p style="margin:12px 0 0;background:#f3f4f6;padding:12px;border-radius:8px;">💸 Startup Cost: <strong>{cost}</strong> {estimate}</p>
  <p style="margin:12px 0 4px;"><strong>🚀 Simple MVP Plan:</strong></p>
  <ol style="margin:0;padding-left:20px;color:#4b5563;font-size:14px;">{steps}</ol>
</div>"#,
            name = escape_html(&idea.business_name),
            what = escape_html(first_sentence(&idea.what_it_does)),
            target = escape_html(first_sentence(&idea.nepal_adaptation)),
            revenue = escape_html(first_sentence(&idea.monetization)),
            why = escape_html(first_sentence(&idea.why_growing)),
            cost = escape_html(idea.startup_cost.label()),
            estimate = escape_html(&idea.cost_estimate),
        )
    }

    fn preview_row(number: usize, idea: &Idea) -> String {
        let badge = if idea.is_high_risk {
            r#" <span style="color:#e94560;font-size:11px;">🔥 HIGH-RISK HIGH-REWARD</span>"#
        } else {
            ""
        };
        format!(
            r#"<li style="margin-bottom:10px;"><strong>{number}. {name}</strong>{badge}<br><span style="color:#6b7280;font-size:14px;">{what}.</span></li>"#,
            name = escape_html(&idea.business_name),
            what = escape_html(first_sentence(&idea.what_it_does)),
        )
    }

    fn detail_card(index: usize, idea: &Idea) -> String {
        let (border, label) = if idea.is_high_risk {
            ("#e94560", "🔥 HIGH-RISK HIGH-REWARD".to_owned())
        } else {
            ("#2d2d4a", format!("💡 Idea #{index}"))
        };
        let color = cost_color(&idea.startup_cost);
        let actions: String = idea
            .action_plan
            .iter()
            .map(|step| {
                format!(
                    r#"<tr><td style="padding:4px 8px;font-size:12px;color:#cbd5e1;border-bottom:1px solid #2d2d4a;">{}</td></tr>"#,
                    escape_html(step)
                )
            })
            .collect();
        let risk_box = if idea.is_high_risk {
            format!(
                r#"<table width="100%" style="margin-top:16px;" cellpadding="0" cellspacing="8"><tr>
  <td width="50%" style="background:#1a0a0a;border-radius:8px;padding:12px;vertical-align:top;"><p style="margin:0 0 4px;font-size:11px;font-weight:bold;color:#ef4444;">⚠ WHY HIGH RISK</p><p style="margin:0;font-size:13px;color:#fca5a5;">{reason}</p></td>
  <td width="50%" style="background:#0a1a0a;border-radius:8px;padding:12px;vertical-align:top;"><p style="margin:0 0 4px;font-size:11px;font-weight:bold;color:#22c55e;">💎 WHY HIGH REWARD</p><p style="margin:0;font-size:13px;color:#86efac;">{reward}</p></td>
</tr></table>"#,
                reason = escape_html(idea.high_risk_reason.as_deref().unwrap_or("")),
                reward = escape_html(idea.high_risk_reward.as_deref().unwrap_or("")),
            )
        } else {
            String::new()
        };

        let section = |title: &str, body: &str| {
            format!(
                r#"<p style="margin:16px 0 4px;font-size:11px;font-weight:bold;color:#e94560;text-transform:uppercase;">🔹 {title}</p><p style="margin:0;font-size:14px;color:#cbd5e1;line-height:1.6;">{}</p>"#,
                escape_html(body)
            )
        };

        format!(
            r#"<table width="100%" cellpadding="0" cellspacing="0" style="margin:20px 0;background:#1e1e32;border-radius:12px;border:1px solid {border};"><tr><td style="padding:24px;">
  <p style="margin:0;font-size:12px;font-weight:bold;color:#64748b;text-transform:uppercase;letter-spacing:2px;">{label}</p>
  <h2 style="margin:6px 0 0;font-size:22px;color:#e2e8f0;">{name}</h2>
  <span style="background:#2d2d4a;color:#a78bfa;padding:3px 10px;border-radius:20px;font-size:11px;">{category}</span>
  {what}{where_}{why}{adapt}
  {risk_box}
  <p style="margin:16px 0 4px;font-size:11px;font-weight:bold;color:#e94560;text-transform:uppercase;">🔹 Startup Cost</p>
  <p style="margin:0;"><span style="background:{color}22;color:{color};padding:3px 10px;border-radius:8px;font-size:13px;font-weight:bold;">{cost}</span> <span style="color:#64748b;font-size:12px;">{estimate}</span></p>
  {monetization}
  <p style="margin:16px 0 8px;font-size:11px;font-weight:bold;color:#e94560;text-transform:uppercase;">🔹 30-Day Action Plan</p>
  <table width="100%" style="background:#15152a;border-radius:8px;" cellpadding="0" cellspacing="0">{actions}</table>
</td></tr></table>"#,
            name = escape_html(&idea.business_name),
            category = escape_html(&idea.category),
            what = section("What It Does", &idea.what_it_does),
            where_ = section("Where It Is Working", &idea.where_working),
            why = section("Why It Is Growing", &idea.why_growing),
            adapt = section("How To Adapt For Nepal", &idea.nepal_adaptation),
            monetization = section("Monetization", &idea.monetization),
            cost = escape_html(idea.startup_cost.label()),
            estimate = escape_html(&idea.cost_estimate),
        )
    }
}

fn page(background: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1.0"></head>
<body style="margin:0;padding:0;background:{background};font-family:'Helvetica Neue',Helvetica,Arial,sans-serif;">
<div style="max-width:600px;margin:0 auto;padding:20px;">
{body}
</div>
</body></html>"#
    )
}

impl Renderer for HtmlRenderer {
    fn briefing(&self, selection: &Selection, date_display: &str) -> RenderedEmail {
        let mut body = format!(
            r#"<div style="text-align:center;padding:32px 0;"><h1 style="margin:0;font-size:28px;color:#111827;">🚀 CEO DAILY BRIEFING</h1><p style="margin:8px 0 0;font-size:15px;color:#6b7280;">SaaS Opportunities for Nepal • {}</p></div>"#,
            escape_html(date_display)
        );

        for idea in &selection.main {
            body.push_str(&Self::main_card(idea));
        }

        let previews: Vec<&Idea> = selection.previews().collect();
        if !previews.is_empty() {
            let rows: String = previews
                .iter()
                .enumerate()
                .map(|(i, idea)| Self::preview_row(i + 1, idea))
                .collect();
            let _ = write!(
                body,
                r#"<div style="padding:24px;border:1px solid #e5e7eb;border-radius:12px;margin-top:32px;"><h3 style="margin:0 0 12px;font-size:14px;text-transform:uppercase;color:#2563eb;">📬 Bonus Previews</h3><ul style="list-style:none;margin:0;padding:0;">{rows}</ul><p style="margin:12px 0 0;font-size:13px;color:#6b7280;">Reply with the names or numbers you want in full, or just "all".</p></div>"#
            );
        }

        if let Some(best) = selection.main.first() {
            let task = best
                .action_plan
                .first()
                .map(String::as_str)
                .unwrap_or("Market Research");
            let headline = task.split(':').next().unwrap_or(task);
            let _ = write!(
                body,
                r#"<div style="background:#111827;color:#fff;padding:28px;border-radius:12px;margin-top:32px;"><h3 style="margin:0 0 12px;font-size:14px;text-transform:uppercase;color:#60a5fa;">⭐ Today's Execution Task</h3><p style="margin:0 0 5px;font-size:18px;font-weight:600;">🪜 {}</p><p style="margin:0;font-size:14px;color:#9ca3af;">{}</p></div>
<div style="text-align:center;margin-top:32px;padding:20px;border:2px dashed #d1d5db;border-radius:12px;"><h3 style="margin:0 0 5px;font-size:14px;text-transform:uppercase;color:#059669;">🏆 Best Idea Today</h3><p style="margin:0;font-size:20px;font-weight:800;color:#111827;">{}</p></div>"#,
                escape_html(headline),
                escape_html(task),
                escape_html(&best.business_name),
            );
        }

        body.push_str(
            r#"<div style="text-align:center;margin-top:40px;padding-top:20px;border-top:1px solid #e5e7eb;color:#9ca3af;font-size:12px;"><p>Generated by ideapost</p></div>"#,
        );

        RenderedEmail {
            subject: briefing_subject(date_display),
            html: page("#f9fafb", &body),
            text: self.report(selection, date_display),
        }
    }

    fn details(&self, ideas: &[&Idea], date_display: &str) -> RenderedEmail {
        let plural = if ideas.len() == 1 { "" } else { "s" };
        let mut body = format!(
            r#"<div style="padding:30px 20px;text-align:center;"><h1 style="margin:0;font-size:26px;color:#e94560;">📋 Full Breakdown — {} Idea{plural}</h1><p style="margin:8px 0 0;font-size:14px;color:#a8b2d1;">{}</p><p style="margin:6px 0 0;font-size:12px;color:#94a3b8;">Here are the detailed breakdowns you requested</p></div>"#,
            ideas.len(),
            escape_html(date_display),
        );
        let mut text = format!("Full breakdown, {date_display}\n");
        for (i, idea) in ideas.iter().enumerate() {
            body.push_str(&Self::detail_card(i + 1, idea));
            let _ = write!(text, "\n## {}\n\n{}\n", idea.business_name, idea.what_it_does);
            for step in &idea.action_plan {
                let _ = writeln!(text, "- {step}");
            }
        }

        RenderedEmail {
            subject: details_subject(ideas),
            html: page("#0f0f1a", &body),
            text,
        }
    }

    fn help(&self, reply_body: &str, available: &[&str], date_display: &str) -> RenderedEmail {
        let quoted = truncate_chars(reply_body, 200);
        let items: String = available
            .iter()
            .map(|name| format!("<li>{}</li>", escape_html(name)))
            .collect();
        let body = format!(
            r#"<div style="background:#1e1e32;border-radius:12px;padding:24px;border:1px solid #2d2d4a;">
  <h2 style="color:#e94560;">🤔 Couldn't match your request</h2>
  <p style="color:#cbd5e1;">I couldn't find matching ideas for: <em>"{}"</em></p>
  <p style="color:#94a3b8;">Available ideas today:</p>
  <ul style="color:#a78bfa;">{items}</ul>
  <p style="color:#94a3b8;">Reply with one or more of these names, or just type <strong>"all"</strong> for everything.</p>
</div>"#,
            escape_html(quoted),
        );
        let mut text = format!("Couldn't match: \"{quoted}\"\n\nAvailable ideas:\n");
        for (i, name) in available.iter().enumerate() {
            let _ = writeln!(text, "{}. {name}", i + 1);
        }

        RenderedEmail {
            subject: help_subject(date_display),
            html: page("#0f0f1a", &body),
            text,
        }
    }

    fn report(&self, selection: &Selection, date_display: &str) -> String {
        let mut md = format!("# CEO Daily Briefing — {date_display}\n");
        for (i, idea) in selection.main.iter().enumerate() {
            let _ = write!(
                md,
                "\n## {}. {}\n\n*{}* · Startup cost: **{}**",
                i + 1,
                idea.business_name,
                idea.category,
                idea.startup_cost,
            );
            if !idea.cost_estimate.is_empty() {
                let _ = write!(md, " ({})", idea.cost_estimate);
            }
            let _ = write!(
                md,
                "\n\n**What it does:** {}\n\n**Where it works:** {}\n\n**Why it is growing:** {}\n\n**Nepal adaptation:** {}\n\n**Monetization:** {}\n",
                idea.what_it_does,
                idea.where_working,
                idea.why_growing,
                idea.nepal_adaptation,
                idea.monetization,
            );
            if !idea.action_plan.is_empty() {
                md.push_str("\n**Action plan:**\n\n");
                for step in &idea.action_plan {
                    let _ = writeln!(md, "- {step}");
                }
            }
        }

        let previews: Vec<&Idea> = selection.previews().collect();
        if !previews.is_empty() {
            md.push_str("\n## Bonus previews\n\n");
            for (i, idea) in previews.iter().enumerate() {
                let tag = if idea.is_high_risk { " (high-risk)" } else { "" };
                let _ = writeln!(
                    md,
                    "{}. **{}**{tag}: {}",
                    i + 1,
                    idea.business_name,
                    first_sentence(&idea.what_it_does),
                );
            }
        }
        md
    }
}
