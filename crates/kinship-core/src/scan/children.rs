use std::sync::LazyLock;

use regex::Regex;

use crate::profile::Profile;

/// Trailing parenthetical with at least one digit, read as a date token.
static DATE_PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]*\d[^)]*)\)\s*$").unwrap());

/// "and three others", "etc." — entries that name nobody.
static OTHERS_SENTINEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:others?|etc)\b").unwrap());

static LEADING_CONJUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:and|&)\s+").unwrap());

/// Expand an inline "children" field into synthetic per-child profiles
/// pending reconciliation. Ids are deterministic: the parent id plus an
/// ordinal suffix over the retained segments.
#[must_use]
pub fn expand(parent: &Profile, raw: &str) -> Vec<Profile> {
    let mut children = Vec::new();

    for segment in raw.split(';') {
        let segment = segment.trim().trim_matches([',', ' ']);
        if segment.is_empty() {
            continue;
        }

        let (name, date) = strip_date_token(segment);
        let name = LEADING_CONJUNCTION.replace(&name, "").trim().to_string();

        if name.is_empty() || OTHERS_SENTINEL.is_match(&name) {
            continue;
        }

        let ordinal = children.len() + 1;
        let id = format!("{}.c{ordinal}", parent.id);
        let mut child = Profile::synthetic_child(id, name, parent.id.clone());
        child.lineage = parent.lineage.clone();
        child.generation = parent.generation.clone();
        child.vital_stats.born_date = date;
        child.metadata.doc_paragraph_index = parent.metadata.doc_paragraph_index;
        child.story.notes = format!(
            "Listed among the children of {} ({}); entry read \"{segment}\".",
            parent.name, parent.id
        );
        children.push(child);
    }

    children
}

/// Peel a trailing digit-bearing parenthetical off a child entry. A date
/// range splits on its dash and keeps the start.
fn strip_date_token(segment: &str) -> (String, Option<String>) {
    let Some(caps) = DATE_PARENTHETICAL.captures(segment) else {
        return (segment.to_string(), None);
    };
    let name = segment[..caps.get(0).unwrap().start()].trim().to_string();
    let token = caps.get(1).unwrap().as_str().trim();
    let date = token
        .split(['-', '\u{2013}'])
        .next()
        .map(|start| start.trim().to_string())
        .filter(|start| !start.is_empty());
    (name, date)
}
