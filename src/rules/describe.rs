//! Human-readable rule summaries
//!
//! Exported docs show a one-line summary of what a rule matches and what it
//! does. The matcher and step parts are opaque to the rest of the crate, so
//! everything that reads their fields lives behind [`RuleDescriber`].

use super::tree::{Rule, RulePart};

/// Produces display summaries for rules.
pub trait RuleDescriber {
    /// What requests the rule matches, e.g. `GET requests for /api/users`.
    fn summarize_matcher(&self, rule: &Rule) -> String;

    /// What the rule does, e.g. `Respond with status 200`.
    fn summarize_steps(&self, rule: &Rule) -> String;
}

/// Describes matchers and steps from their well-known fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDescriber;

impl RuleDescriber for DefaultDescriber {
    fn summarize_matcher(&self, rule: &Rule) -> String {
        let method = rule
            .matchers
            .iter()
            .find(|m| m.kind == "method")
            .and_then(|m| m.text_field("method"));

        let subject = match method {
            Some(method) => format!("{} {}", method.to_uppercase(), noun_for(&rule.kind)),
            None if rule.matchers.is_empty() => format!("Any {}", noun_for(&rule.kind)),
            None => capitalize(noun_for(&rule.kind)),
        };

        let conditions: Vec<String> = rule
            .matchers
            .iter()
            .filter(|m| m.kind != "method")
            .map(describe_matcher)
            .collect();

        if conditions.is_empty() {
            subject
        } else {
            format!("{} {}", subject, conditions.join(" and "))
        }
    }

    fn summarize_steps(&self, rule: &Rule) -> String {
        if rule.steps.is_empty() {
            return "Do nothing".to_string();
        }
        let steps: Vec<String> = rule.steps.iter().map(describe_step).collect();
        capitalize(&steps.join(", then "))
    }
}

fn noun_for(kind: &str) -> &str {
    match kind {
        "http" => "requests",
        "websocket" => "websockets",
        "webrtc" => "WebRTC connections",
        _ => "traffic",
    }
}

fn describe_matcher(part: &RulePart) -> String {
    if let Some(target) = part.text_field("path").or_else(|| part.text_field("url")) {
        return format!("for {}", target);
    }
    if let Some(host) = part.text_field("host") {
        return format!("to {}", host);
    }
    if let Some(name) = part.text_field("name") {
        return match part.text_field("value") {
            Some(value) => format!("with {} {}", name, value),
            None => format!("with {}", name),
        };
    }
    format!("matching {}", humanize(&part.kind))
}

fn describe_step(part: &RulePart) -> String {
    match part.kind.as_str() {
        "simple" => match part.text_field("status") {
            Some(status) => format!("respond with status {}", status),
            None => "respond with a fixed response".to_string(),
        },
        "passthrough" => "pass the request through to the target".to_string(),
        "forward-to-host" => match part.text_field("host") {
            Some(host) => format!("forward the request to {}", host),
            None => "forward the request".to_string(),
        },
        "close-connection" => "close the connection".to_string(),
        "reset-connection" => "reset the connection".to_string(),
        "timeout" => "time out with no response".to_string(),
        "delay" => match part.text_field("delayMs") {
            Some(ms) => format!("wait {}ms", ms),
            None => "wait".to_string(),
        },
        other => humanize(other),
    }
}

fn humanize(kind: &str) -> String {
    kind.replace(['-', '_'], " ")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
