//! Irregular-verb line grammars.

use super::{first_match, lines, looks_like_hint, split_dashes, split_on, Grammar};
use crate::types::ParsedVerb;
use crate::validation::Candidate;
use regex::Regex;
use std::sync::LazyLock;

static BRACKETED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s*-+\s*(.+?)\s*-+\s*(.+?)\s*-+\s*(.+?)\s*\[(.+?)\]$")
        .expect("bracketed verb regex")
});

const GRAMMARS: &[(&str, Grammar<ParsedVerb>)] = &[
    ("bracketed", bracketed),
    ("dash", dashed),
    ("semicolon", semicolon),
];

/// Parse one line into an irregular-verb candidate.
pub fn parse_verb_line(line: &str) -> Option<ParsedVerb> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    first_match(trimmed, GRAMMARS).filter(|verb| verb.is_complete())
}

/// Parse multi-line text, keeping accepted lines in order.
pub fn parse_verbs(text: &str) -> Vec<ParsedVerb> {
    let mut verbs = Vec::new();
    let mut rejected = 0usize;
    for line in lines(text) {
        if line.trim().is_empty() {
            continue;
        }
        match parse_verb_line(line) {
            Some(verb) => verbs.push(verb),
            None => rejected += 1,
        }
    }

    if rejected > 0 {
        tracing::debug!(rejected, accepted = verbs.len(), "dropped unparseable verb lines");
    }
    verbs
}

fn bracketed(line: &str) -> Option<ParsedVerb> {
    let caps = BRACKETED.captures(line)?;
    Some(
        ParsedVerb::new(caps[1].trim(), caps[2].trim(), caps[3].trim(), caps[4].trim())
            .with_hint(caps[5].trim()),
    )
}

fn dashed(line: &str) -> Option<ParsedVerb> {
    from_fields(&split_dashes(line))
}

fn semicolon(line: &str) -> Option<ParsedVerb> {
    from_fields(&split_on(line, ';'))
}

/// Four fields carry no hint. With five, the second field is the hint when
/// it reads like target-script text, otherwise the hint is the last field.
fn from_fields(fields: &[&str]) -> Option<ParsedVerb> {
    match fields {
        [infinitive, past_simple, past_participle, translation] => Some(ParsedVerb::new(
            *infinitive,
            *past_simple,
            *past_participle,
            *translation,
        )),
        [infinitive, hint, past_simple, past_participle, translation] if looks_like_hint(hint) => {
            Some(
                ParsedVerb::new(*infinitive, *past_simple, *past_participle, *translation)
                    .with_hint(*hint),
            )
        }
        [infinitive, past_simple, past_participle, translation, hint] => Some(
            ParsedVerb::new(*infinitive, *past_simple, *past_participle, *translation)
                .with_hint(*hint),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn verb(inf: &str, ps: &str, pp: &str, tr: &str) -> ParsedVerb {
        ParsedVerb::new(inf, ps, pp, tr)
    }

    #[test]
    fn parse_four_dash_fields() {
        assert_eq!(
            parse_verb_line("go - went - gone - идти"),
            Some(verb("go", "went", "gone", "идти"))
        );
    }

    #[test]
    fn parse_bracketed_hint() {
        assert_eq!(
            parse_verb_line("go - went - gone - идти [гоу]"),
            Some(verb("go", "went", "gone", "идти").with_hint("гоу"))
        );
    }

    #[test]
    fn five_fields_with_cyrillic_second_field() {
        assert_eq!(
            parse_verb_line("go - гоу - went - gone - идти"),
            Some(verb("go", "went", "gone", "идти").with_hint("гоу"))
        );
    }

    #[test]
    fn five_fields_with_latin_second_field() {
        assert_eq!(
            parse_verb_line("go - went - gone - идти - гоу"),
            Some(verb("go", "went", "gone", "идти").with_hint("гоу"))
        );
    }

    #[test]
    fn parse_semicolon_variants() {
        assert_eq!(
            parse_verb_line("be;was/were;been;быть"),
            Some(verb("be", "was/were", "been", "быть"))
        );
        assert_eq!(
            parse_verb_line("be; бии ;was/were;been;быть"),
            Some(verb("be", "was/were", "been", "быть").with_hint("бии"))
        );
        assert_eq!(
            parse_verb_line("be;was/were;been;быть;бии"),
            Some(verb("be", "was/were", "been", "быть").with_hint("бии"))
        );
    }

    #[test]
    fn reject_wrong_field_counts() {
        assert_eq!(parse_verb_line("go - went - gone"), None);
        assert_eq!(parse_verb_line("go - went - gone - идти - гоу - extra"), None);
        assert_eq!(parse_verb_line("go, went, gone, идти"), None);
        assert_eq!(parse_verb_line("   "), None);
    }

    #[test]
    fn reject_empty_required_field() {
        assert_eq!(parse_verb_line("go;;gone;идти"), None);
    }

    #[test]
    fn batch_drops_malformed_lines() {
        let verbs = parse_verbs("go - went - gone - идти\r\nbroken line\n\nbe;was;been;быть");
        let infinitives: Vec<_> = verbs.iter().map(|v| v.infinitive.as_str()).collect();
        assert_eq!(infinitives, vec!["go", "be"]);
    }
}
