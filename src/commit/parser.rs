//! Conventional commit parsing.
//!
//! Turns a raw commit message into a [`ConventionalCommit`]: the header
//! (`type(scope)!: subject`), an optional body, trailing footers, and the
//! notes derived from breaking-change markers.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CommitError;

/// Title given to every breaking-change note.
pub const BREAKING_CHANGE: &str = "BREAKING CHANGE";

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[^\s():!]+)(?:\((?P<scope>[^()]*)\))?(?P<breaking>!)?:[ \t]*(?P<subject>.*)$")
        .expect("invalid header regex")
});

static FOOTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<token>BREAKING CHANGE|BREAKING-CHANGE|[A-Za-z0-9][A-Za-z0-9-]*)(?::[ \t]+| #)(?P<value>.*)$")
        .expect("invalid footer regex")
});

/// A `Token: value` trailer at the end of a commit message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footer {
    pub token: String,
    pub value: String,
}

impl Footer {
    pub fn is_breaking(&self) -> bool {
        self.token == BREAKING_CHANGE || self.token == "BREAKING-CHANGE"
    }
}

/// A note extracted from a commit, e.g. a breaking-change description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub title: String,
    pub text: String,
}

/// A parsed conventional commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionalCommit {
    pub commit_type: String,
    pub scope: Option<String>,
    pub subject: String,
    pub body: Option<String>,
    pub footers: Vec<Footer>,
    pub notes: Vec<Note>,
}

impl ConventionalCommit {
    /// Whether any note marks this commit as a breaking change.
    pub fn is_breaking(&self) -> bool {
        self.notes.iter().any(|note| note.title == BREAKING_CHANGE)
    }
}

/// Parse a commit message following the conventional commit grammar.
pub fn parse(message: &str) -> Result<ConventionalCommit, CommitError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(CommitError::Empty);
    }

    let mut lines = message.lines();
    let header = lines.next().unwrap_or_default().trim_end();

    let caps = HEADER_RE
        .captures(header)
        .ok_or_else(|| malformed(header, "expected '<type>[(scope)][!]: <subject>'"))?;

    let commit_type = caps.name("type").map(|m| m.as_str()).unwrap_or_default();
    let scope = caps
        .name("scope")
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let header_breaking = caps.name("breaking").is_some();
    let subject = caps.name("subject").map(|m| m.as_str().trim()).unwrap_or_default();

    if subject.is_empty() {
        return Err(malformed(header, "missing subject"));
    }

    let (body, footers) = split_body_and_footers(lines);

    let mut notes: Vec<Note> = footers
        .iter()
        .filter(|footer| footer.is_breaking())
        .map(|footer| Note {
            title: BREAKING_CHANGE.to_string(),
            text: footer.value.clone(),
        })
        .collect();

    if header_breaking && notes.is_empty() {
        notes.push(Note {
            title: BREAKING_CHANGE.to_string(),
            text: subject.to_string(),
        });
    }

    Ok(ConventionalCommit {
        commit_type: commit_type.to_string(),
        scope,
        subject: subject.to_string(),
        body,
        footers,
        notes,
    })
}

fn malformed(header: &str, reason: &str) -> CommitError {
    CommitError::Malformed {
        header: header.to_string(),
        reason: reason.to_string(),
    }
}

/// Split everything after the header into body text and footers.
///
/// The footer block starts at the first footer-shaped line that follows a
/// blank line. Non-matching lines inside the block continue the previous
/// footer's value.
fn split_body_and_footers<'a>(lines: impl Iterator<Item = &'a str>) -> (Option<String>, Vec<Footer>) {
    let mut body_lines: Vec<&str> = Vec::new();
    let mut footers: Vec<Footer> = Vec::new();
    let mut previous_blank = true;
    let mut in_footers = false;

    for line in lines {
        let line = line.trim_end();

        if let Some(caps) = FOOTER_RE.captures(line)
            && (in_footers || previous_blank)
        {
            in_footers = true;
            footers.push(Footer {
                token: caps["token"].to_string(),
                value: caps["value"].trim().to_string(),
            });
        } else if in_footers {
            if let Some(last) = footers.last_mut() {
                last.value.push('\n');
                last.value.push_str(line);
            }
        } else {
            body_lines.push(line);
        }

        previous_blank = line.trim().is_empty();
    }

    for footer in &mut footers {
        footer.value = footer.value.trim_end().to_string();
    }

    let body = body_lines.join("\n").trim().to_string();
    let body = if body.is_empty() { None } else { Some(body) };

    (body, footers)
}
