//! Vocabulary line grammars.

use super::table::parse_word_table;
use super::{first_match, lines, split_dashes, split_on, Grammar, ImportFormat, ImportOptions};
use crate::types::{push_tag, ParsedWord};
use crate::validation::Candidate;
use csv::{ReaderBuilder, Trim};
use regex::Regex;
use std::sync::LazyLock;

static BRACKETED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s*-+\s*(.+?)\s*\[(.+?)\]$").expect("bracketed word regex")
});

const GRAMMARS: &[(&str, Grammar<ParsedWord>)] = &[
    ("bracketed", bracketed),
    ("dash", dashed),
    ("semicolon", semicolon),
    ("comma", comma),
    ("tab", tab),
];

/// Parse one line into a vocabulary candidate.
///
/// Returns `None` for blank lines, lines that fit no grammar, and lines
/// whose term or translation is empty.
pub fn parse_word_line(line: &str) -> Option<ParsedWord> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    first_match(trimmed, GRAMMARS).filter(|word| word.is_complete())
}

/// Parse multi-line text, keeping accepted lines in order.
pub fn parse_words(text: &str, options: &ImportOptions) -> Vec<ParsedWord> {
    match options.format {
        ImportFormat::Text => {}
        ImportFormat::Csv => return parse_csv(text, options),
        ImportFormat::Table => {
            return parse_word_table(text)
                .into_iter()
                .map(|word| apply_default_tags(word, &options.default_tags))
                .collect()
        }
    }

    let mut words = Vec::new();
    let mut rejected = 0usize;
    for line in lines(text) {
        if line.trim().is_empty() {
            continue;
        }
        match parse_word_line(line) {
            Some(word) => words.push(apply_default_tags(word, &options.default_tags)),
            None => rejected += 1,
        }
    }

    if rejected > 0 {
        tracing::debug!(rejected, accepted = words.len(), "dropped unparseable vocabulary lines");
    }
    words
}

/// Parse comma-separated text. Fields are unquoted; fields past the second are tags.
pub fn parse_csv(text: &str, options: &ImportOptions) -> Vec<ParsedWord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());
    let mut words = Vec::new();
    let mut rejected = 0usize;

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(_) => {
                rejected += 1;
                continue;
            }
        };
        if record.iter().all(str::is_empty) {
            continue;
        }
        let fields: Vec<&str> = record.iter().map(unquote).collect();
        let parsed = match fields.as_slice() {
            [term, translation, tags @ ..] => {
                Some(ParsedWord::new(*term, *translation).with_tags(tags.iter().copied()))
            }
            _ => None,
        };
        match parsed.filter(|word| word.is_complete()) {
            Some(word) => words.push(apply_default_tags(word, &options.default_tags)),
            None => rejected += 1,
        }
    }

    if rejected > 0 {
        tracing::debug!(rejected, accepted = words.len(), "dropped unparseable csv rows");
    }
    words
}

fn unquote(field: &str) -> &str {
    let field = field.trim();
    let field = field.strip_prefix('"').unwrap_or(field);
    field.strip_suffix('"').unwrap_or(field)
}

fn apply_default_tags(mut word: ParsedWord, defaults: &[String]) -> ParsedWord {
    if defaults.is_empty() {
        return word;
    }
    let own = std::mem::take(&mut word.tags);
    for tag in defaults.iter().cloned().chain(own) {
        push_tag(&mut word.tags, tag);
    }
    word
}

fn bracketed(line: &str) -> Option<ParsedWord> {
    let caps = BRACKETED.captures(line)?;
    Some(ParsedWord::new(caps[1].trim(), caps[2].trim()).with_hint(caps[3].trim()))
}

fn dashed(line: &str) -> Option<ParsedWord> {
    from_fields(&split_dashes(line))
}

fn semicolon(line: &str) -> Option<ParsedWord> {
    from_fields(&split_on(line, ';'))
}

fn comma(line: &str) -> Option<ParsedWord> {
    with_trailing_tags(&split_on(line, ','))
}

fn tab(line: &str) -> Option<ParsedWord> {
    with_trailing_tags(&split_on(line, '\t'))
}

/// `word - translation` or `word - hint - translation`.
fn from_fields(fields: &[&str]) -> Option<ParsedWord> {
    match fields {
        [term, translation] => Some(ParsedWord::new(*term, *translation)),
        [term, hint, translation] => Some(ParsedWord::new(*term, *translation).with_hint(*hint)),
        _ => None,
    }
}

fn with_trailing_tags(fields: &[&str]) -> Option<ParsedWord> {
    match fields {
        [term, translation, tags @ ..] => {
            Some(ParsedWord::new(*term, *translation).with_tags(tags.iter().copied()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn word(term: &str, translation: &str) -> ParsedWord {
        ParsedWord::new(term, translation)
    }

    #[test]
    fn parse_dash_pair() {
        assert_eq!(parse_word_line("hello - привет"), Some(word("hello", "привет")));
        assert_eq!(parse_word_line("  hello-привет  "), Some(word("hello", "привет")));
    }

    #[test]
    fn parse_bracketed_hint() {
        assert_eq!(
            parse_word_line("hello - привет [хэллоу]"),
            Some(word("hello", "привет").with_hint("хэллоу"))
        );
    }

    #[test]
    fn parse_three_dash_fields_puts_hint_in_middle() {
        assert_eq!(
            parse_word_line("apple - эпл - яблоко"),
            Some(word("apple", "яблоко").with_hint("эпл"))
        );
    }

    #[test]
    fn parse_semicolon_variants() {
        assert_eq!(parse_word_line("cat;кот"), Some(word("cat", "кот")));
        assert_eq!(
            parse_word_line("cat ; кэт ; кот"),
            Some(word("cat", "кот").with_hint("кэт"))
        );
    }

    #[test]
    fn parse_comma_extra_fields_become_tags() {
        assert_eq!(
            parse_word_line("dog, собака, animals, a1"),
            Some(word("dog", "собака").with_tags(["animals", "a1"]))
        );
    }

    #[test]
    fn parse_tab_separated() {
        assert_eq!(
            parse_word_line("sun\tсолнце\tnature"),
            Some(word("sun", "солнце").with_tags(["nature"]))
        );
    }

    #[test]
    fn dash_wins_over_comma() {
        assert_eq!(
            parse_word_line("dog - собака, пёс"),
            Some(word("dog", "собака, пёс"))
        );
    }

    #[test]
    fn reject_blank_and_shapeless_lines() {
        assert_eq!(parse_word_line(""), None);
        assert_eq!(parse_word_line("   \t "), None);
        assert_eq!(parse_word_line("just one field"), None);
        assert_eq!(parse_word_line("a - b - c - d"), None);
    }

    #[test]
    fn reject_empty_required_field() {
        assert_eq!(parse_word_line("hello -"), None);
        assert_eq!(parse_word_line(";привет"), None);
        assert_eq!(parse_word_line("a - hint -"), None);
    }

    #[test]
    fn batch_keeps_order_and_drops_rejects() {
        let text = "hello - привет\r\n\nnonsense\nworld - мир\rcat;кот";
        let words = parse_words(text, &ImportOptions::default());
        let terms: Vec<_> = words.iter().map(|w| w.term.as_str()).collect();
        assert_eq!(terms, vec!["hello", "world", "cat"]);
    }

    #[test]
    fn batch_prepends_default_tags() {
        let options = ImportOptions::default().with_default_tags(["lesson1"]);
        let words = parse_words("dog, собака, animals, lesson1\ncat - кот", &options);
        assert_eq!(words[0].tags, vec!["lesson1", "animals"]);
        assert_eq!(words[1].tags, vec!["lesson1"]);
    }

    #[test]
    fn csv_strips_quotes_and_collects_tags() {
        let options = ImportOptions::default().csv();
        let words = parse_words("\"hello\",\"привет\",\"greetings\"\nbad-row\n,empty", &options);
        assert_eq!(words, vec![word("hello", "привет").with_tags(["greetings"])]);
    }

    #[test]
    fn csv_does_not_try_dash_grammar() {
        let options = ImportOptions::default().csv();
        assert!(parse_words("hello - привет", &options).is_empty());
    }

    #[test]
    fn csv_keeps_quoted_commas_inside_a_field() {
        let options = ImportOptions::default().csv();
        let words = parse_words("\"tea, green\",\"зелёный чай\",drinks", &options);
        assert_eq!(words, vec![word("tea, green", "зелёный чай").with_tags(["drinks"])]);
    }

    #[test]
    fn table_format_reads_export_rows() {
        let options = ImportOptions::default().table().with_default_tags(["backup"]);
        let words = parse_words("e-mail\tпочта\t\ttech", &options);
        assert_eq!(words, vec![word("e-mail", "почта").with_tags(["backup", "tech"])]);
    }
}
