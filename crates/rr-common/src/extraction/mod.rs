pub mod facets;

use std::collections::HashMap;

use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Document;

pub use facets::FieldFacets;

/// Structured fields pulled out of one resume's free text.
///
/// Every field defaults to empty. A missing section is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub name: String,
    pub previous_department: String,
    pub previous_position: String,
    pub targeted_department: String,
    pub targeted_position: String,
    /// Order of appearance in the source text, duplicates kept.
    pub skills: Vec<String>,
}

impl ExtractedFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.previous_department.is_empty()
            && self.previous_position.is_empty()
            && self.targeted_department.is_empty()
            && self.targeted_position.is_empty()
            && self.skills.is_empty()
    }
}

lazy_static! {
    // "Name: Jane Doe" / "NAME - Jane Doe"
    static ref NAME_RE: Regex = Regex::new(r"(?i)Name[:\-]?\s*(.+)").unwrap();

    // Plain section labels; the "Targeted " qualifier is rejected in code
    // because the regex crate has no look-behind.
    static ref DEPARTMENT_RE: Regex = Regex::new(r"(?i)Department[:\-]?\s*(.+?)\n").unwrap();
    static ref POSITION_RE: Regex = Regex::new(r"(?i)Position[:\-]?\s*(.+?)\n").unwrap();

    // First label anywhere after the targeted-career header, across lines.
    static ref TARGETED_DEPARTMENT_RE: Regex = Regex::new(
        r"(?is)Targeted Career Information.*?Department[:\-]?\s*(.*?)\n"
    )
    .unwrap();
    static ref TARGETED_POSITION_RE: Regex = Regex::new(
        r"(?is)Targeted Career Information.*?Position[:\-]?\s*(.*?)\n"
    )
    .unwrap();

    static ref SKILLS_BLOCK_RE: Regex = Regex::new(r"(?is)Core Skills(.*?)Projects").unwrap();
    // Case-sensitive and line-bound on purpose: only the value part after a colon.
    static ref SKILL_LINE_RE: Regex = Regex::new(r":\s*(.*)").unwrap();
}

const TARGETED_QUALIFIER: &[u8] = b"targeted ";

/// Runs every field rule over the text. Never fails.
pub fn extract_fields(text: &str) -> ExtractedFields {
    let fields = ExtractedFields {
        name: extract_name(text),
        previous_department: extract_previous_department(text),
        previous_position: extract_previous_position(text),
        targeted_department: extract_targeted_department(text),
        targeted_position: extract_targeted_position(text),
        skills: extract_skills(text),
    };

    if fields.is_empty() && !text.trim().is_empty() {
        debug!(text_len = text.len(), "no structured fields matched");
    }

    fields
}

/// Extracts every document of a batch in parallel, keyed by document id.
pub fn extract_batch(documents: &[Document]) -> HashMap<String, ExtractedFields> {
    documents
        .par_iter()
        .map(|doc| (doc.id.clone(), extract_fields(&doc.text)))
        .collect()
}

/// Remainder of the first line labelled "Name".
pub fn extract_name(text: &str) -> String {
    first_capture(&NAME_RE, text)
}

/// First "Department" label not written as "Targeted Department".
pub fn extract_previous_department(text: &str) -> String {
    first_untargeted_capture(&DEPARTMENT_RE, text)
}

/// First "Position" label not written as "Targeted Position".
pub fn extract_previous_position(text: &str) -> String {
    first_untargeted_capture(&POSITION_RE, text)
}

pub fn extract_targeted_department(text: &str) -> String {
    first_capture(&TARGETED_DEPARTMENT_RE, text)
}

pub fn extract_targeted_position(text: &str) -> String {
    first_capture(&TARGETED_POSITION_RE, text)
}

/// Comma separated values following a colon, for every line between
/// "Core Skills" and the next "Projects" header.
pub fn extract_skills(text: &str) -> Vec<String> {
    let Some(block) = SKILLS_BLOCK_RE.captures(text).and_then(|caps| caps.get(1)) else {
        return Vec::new();
    };

    SKILL_LINE_RE
        .captures_iter(block.as_str())
        .filter_map(|caps| caps.get(1))
        .flat_map(|line| line.as_str().split(','))
        .map(|skill| skill.trim().to_string())
        .collect()
}

fn first_capture(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Leftmost match whose start is not directly preceded by "Targeted ".
/// A rejected match restarts the search one character later, so a label
/// nested inside the rejected span is still found.
fn first_untargeted_capture(re: &Regex, text: &str) -> String {
    let mut start = 0;

    while start <= text.len() {
        let Some(caps) = re.captures_at(text, start) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };

        if !preceded_by_targeted(text, whole.start()) {
            return caps
                .get(1)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
        }

        let step = text[whole.start()..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(1);
        start = whole.start() + step;
    }

    String::new()
}

fn preceded_by_targeted(text: &str, pos: usize) -> bool {
    let bytes = text.as_bytes();
    pos >= TARGETED_QUALIFIER.len()
        && bytes[pos - TARGETED_QUALIFIER.len()..pos].eq_ignore_ascii_case(TARGETED_QUALIFIER)
}
