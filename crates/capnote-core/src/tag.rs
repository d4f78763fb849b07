//! Bracket-tag grammar for plan lines.
//!
//! A line carries a tag when it contains `[<label>]<content>`. The leftmost
//! `[` opens the label and the nearest `]` after it closes it; everything
//! after is the content. Recognized labels are `plan`, `help`, `reflect` and
//! `self-work`. Anything else, or a tag with nothing after it, is not a tag.
//!
//! ```text
//! [help] w/jason,leesha debug the parser rep/sketch
//!  ^^^^  ^^^^^^^^^^^^^^ ^^^^^^^^^^^^^^^^ ^^^^^^^^^^
//!  kind  help target    content          representation
//! ```

use std::fmt;

/// A `[label]rest` split of a line, before the label is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker<'a> {
    pub prefix: &'a str,
    pub label: &'a str,
    pub rest: &'a str,
}

/// Split `line` at its leftmost bracket pair.
pub fn split_marker(line: &str) -> Option<Marker<'_>> {
    let open = line.find('[')?;
    let close = open + 1 + line[open + 1..].find(']')?;
    Some(Marker {
        prefix: &line[..open],
        label: &line[open + 1..close],
        rest: &line[close + 1..],
    })
}

/// Where a `[help]` request should be fulfilled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Venue {
    Mysore,
    PairResearch,
    /// Unrecognized `@venue`; the content is left as typed.
    Other(String),
}

/// Sub-variant of a `[help]` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpTarget {
    Generic,
    Venue(Venue),
    /// Raw names from `w/a,b`; resolved against a roster when formatted.
    People(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    Plan,
    Help(HelpTarget),
    Reflect,
    SelfWork,
}

impl TagKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Help(_) => "help",
            Self::Reflect => "reflect",
            Self::SelfWork => "self-work",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A parsed tag with its markers stripped from `content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub kind: TagKind,
    pub content: String,
    pub representation: Option<String>,
}

/// Parse one line into a tag, or `None` if the line carries no complete tag.
pub fn parse_tag(line: &str) -> Option<Tag> {
    let marker = split_marker(line)?;
    let label = marker.label.trim().to_ascii_lowercase();
    let content = marker.rest.trim();
    if content.is_empty() {
        return None;
    }

    let (content, representation) = take_representation(content);
    let (kind, content) = match label.as_str() {
        "plan" => (TagKind::Plan, content),
        "reflect" => (TagKind::Reflect, content),
        "self-work" => (TagKind::SelfWork, content),
        "help" => {
            let (target, content) = classify_help(&content);
            (TagKind::Help(target), content)
        }
        _ => return None,
    };

    // Only markers were typed, e.g. `[help] @mysore`.
    if content.is_empty() {
        return None;
    }

    Some(Tag {
        kind,
        content,
        representation,
    })
}

// ── Content markers ──

fn take_representation(content: &str) -> (String, Option<String>) {
    let Some(&(start, token)) = tokens(content)
        .iter()
        .find(|(_, t)| starts_with_ignore_case(t, "rep/"))
    else {
        return (content.to_string(), None);
    };

    let rep = token[4..].replace(['-', '_'], " ");
    let rep = rep.trim();
    let rep = (!rep.is_empty()).then(|| rep.to_string());
    (remove_span(content, start, start + token.len()), rep)
}

fn classify_help(content: &str) -> (HelpTarget, String) {
    let toks = tokens(content);

    if let Some(pos) = toks
        .iter()
        .position(|(_, t)| starts_with_ignore_case(t, "w/"))
    {
        // `w/a, B` spreads one list over several tokens: a trailing comma
        // carries on only into a capitalized token, so `w/a, debug` stops at `a`.
        let mut last = pos;
        while toks[last].1.ends_with(',')
            && last + 1 < toks.len()
            && toks[last + 1].1.starts_with(|c: char| c.is_uppercase())
        {
            last += 1;
        }
        let names: Vec<String> = toks[pos..=last]
            .iter()
            .map(|(_, t)| *t)
            .collect::<Vec<_>>()
            .join("")[2..]
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();
        let start = toks[pos].0;
        let end = toks[last].0 + toks[last].1.len();
        let mut rest = remove_span(content, start, end);

        // People win over a venue; a known venue marker is still dropped.
        if let Some((Venue::Mysore | Venue::PairResearch, start, end)) = find_venue(&rest) {
            rest = remove_marker(&rest, start, end);
        }
        return (HelpTarget::People(names), rest);
    }

    match find_venue(content) {
        Some((Venue::Other(venue), ..)) => (
            HelpTarget::Venue(Venue::Other(venue)),
            content.to_string(),
        ),
        Some((venue, start, end)) => (
            HelpTarget::Venue(venue),
            remove_marker(content, start, end),
        ),
        None => (HelpTarget::Generic, content.to_string()),
    }
}

/// First `@venue` marker in `content` with its byte span.
fn find_venue(content: &str) -> Option<(Venue, usize, usize)> {
    let &(start, token) = tokens(content).iter().find(|(_, t)| t.starts_with('@'))?;
    let lower = content[start..].to_ascii_lowercase();
    for (marker, venue) in [
        ("@mysore", Venue::Mysore),
        ("@pair research", Venue::PairResearch),
    ] {
        if lower.starts_with(marker) {
            return Some((venue, start, start + marker.len()));
        }
    }
    Some((Venue::Other(token[1..].to_string()), start, start + token.len()))
}

/// Like [`remove_span`], also swallowing `,;:` that trail the marker.
fn remove_marker(s: &str, start: usize, end: usize) -> String {
    let tail = &s[end..];
    let punct = tail.len() - tail.trim_start_matches([',', ';', ':']).len();
    remove_span(s, start, end + punct)
}

/// Whitespace-separated tokens with their byte offsets.
fn tokens(s: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, c) in s.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(st)) => {
                out.push((st, &s[st..i]));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(st) = start {
        out.push((st, &s[st..]));
    }
    out
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Cut `s[start..end]` and close the gap with a single space.
fn remove_span(s: &str, start: usize, end: usize) -> String {
    let head = s[..start].trim_end();
    let tail = s[end..].trim_start();
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}
