//! Tab-separated export table.
//!
//! One record per row with fixed columns, quoted where a field holds a tab,
//! quote or line break, so every stored field comes back byte for byte:
//! ```text
//! term	translation	hint	tag	tag...
//! infinitive	past_simple	past_participle	translation	hint
//! ```
//! An empty hint column means no hint.

use crate::types::{ParsedVerb, ParsedWord};
use crate::validation::Candidate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};

fn reader(text: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes())
}

fn write_rows<I>(rows: I) -> csv::Result<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(&row)?;
    }
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_rows<T>(text: &str, kind: &str, row: fn(&StringRecord) -> Option<T>) -> Vec<T> {
    let mut parsed = Vec::new();
    let mut rejected = 0usize;

    for record in reader(text).records() {
        match record.ok().as_ref().and_then(row) {
            Some(item) => parsed.push(item),
            None => rejected += 1,
        }
    }

    if rejected > 0 {
        tracing::debug!(kind, rejected, accepted = parsed.len(), "dropped malformed table rows");
    }
    parsed
}

fn hint(field: Option<&str>) -> Option<String> {
    field.filter(|hint| !hint.is_empty()).map(str::to_string)
}

fn word_row(record: &StringRecord) -> Option<ParsedWord> {
    let mut word = ParsedWord::new(record.get(0)?, record.get(1)?);
    word.pronunciation_hint = hint(record.get(2));
    let word = word.with_tags(record.iter().skip(3));
    word.is_complete().then_some(word)
}

fn verb_row(record: &StringRecord) -> Option<ParsedVerb> {
    if record.len() > 5 {
        return None;
    }
    let mut verb = ParsedVerb::new(
        record.get(0)?,
        record.get(1)?,
        record.get(2)?,
        record.get(3)?,
    );
    verb.pronunciation_hint = hint(record.get(4));
    verb.is_complete().then_some(verb)
}

/// Read vocabulary rows written by [`write_word_table`].
pub fn parse_word_table(text: &str) -> Vec<ParsedWord> {
    read_rows(text, "vocabulary", word_row)
}

/// Read verb rows written by [`write_verb_table`].
pub fn parse_verb_table(text: &str) -> Vec<ParsedVerb> {
    read_rows(text, "irregular_verbs", verb_row)
}

pub fn write_word_table<'a, I>(words: I) -> csv::Result<String>
where
    I: IntoIterator<Item = &'a ParsedWord>,
{
    write_rows(words.into_iter().map(|word| {
        let mut row = vec![
            word.term.clone(),
            word.translation.clone(),
            word.pronunciation_hint.clone().unwrap_or_default(),
        ];
        row.extend(word.tags.iter().cloned());
        row
    }))
}

pub fn write_verb_table<'a, I>(verbs: I) -> csv::Result<String>
where
    I: IntoIterator<Item = &'a ParsedVerb>,
{
    write_rows(verbs.into_iter().map(|verb| {
        vec![
            verb.infinitive.clone(),
            verb.past_simple.clone(),
            verb.past_participle.clone(),
            verb.translation.clone(),
            verb.pronunciation_hint.clone().unwrap_or_default(),
        ]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_verb_line, parse_word_line, parse_words, ImportOptions};
    use pretty_assertions::assert_eq;

    fn word_round_trip(word: ParsedWord) {
        let text = write_word_table([&word]).unwrap();
        assert_eq!(parse_word_table(&text), vec![word]);
    }

    fn verb_round_trip(verb: ParsedVerb) {
        let text = write_verb_table([&verb]).unwrap();
        assert_eq!(parse_verb_table(&text), vec![verb]);
    }

    #[test]
    fn hyphenated_term_keeps_its_fields() {
        word_round_trip(ParsedWord::new("e-mail", "почта"));
        word_round_trip(ParsedWord::new("well-known", "известный").with_hint("уэл-ноун"));
    }

    #[test]
    fn bracket_suffix_stays_in_translation() {
        let parsed = parse_word_line("cat;кот [pet]").unwrap();
        assert_eq!(parsed.translation, "кот [pet]");
        assert_eq!(parsed.pronunciation_hint, None);
        word_round_trip(parsed);
    }

    #[test]
    fn csv_tags_survive() {
        let words = parse_words("\"e-mail\",\"почта\",\"tech\"", &ImportOptions::default().csv());
        assert_eq!(words, vec![ParsedWord::new("e-mail", "почта").with_tags(["tech"])]);
        word_round_trip(words[0].clone());
    }

    #[test]
    fn verb_translation_with_hyphen() {
        let verb = parse_verb_line("lie;lay;lain;лежать - валяться").unwrap();
        assert_eq!(verb.translation, "лежать - валяться");
        verb_round_trip(verb);
        verb_round_trip(ParsedVerb::new("go", "went", "gone", "идти").with_hint("гоу"));
    }

    #[test]
    fn separators_and_quotes_inside_fields_are_quoted() {
        word_round_trip(
            ParsedWord::new("say \"hi\"", "сказать\tпривет")
                .with_hint("сэй; хай")
                .with_tags(["a,b", "phrases"]),
        );
    }

    #[test]
    fn empty_hint_column_means_no_hint() {
        let text = write_word_table([&ParsedWord::new("cat", "кот")]).unwrap();
        assert_eq!(text, "cat\tкот\t\n");
    }

    #[test]
    fn short_and_blank_rows_are_dropped() {
        let words = parse_word_table("cat\tкот\t\nlonely\n\t\t\ndog\tсобака\tпёс");
        let terms: Vec<_> = words.iter().map(|w| w.term.as_str()).collect();
        assert_eq!(terms, vec!["cat", "dog"]);
        assert_eq!(words[1].pronunciation_hint.as_deref(), Some("пёс"));

        assert!(parse_verb_table("go\twent\tgone").is_empty());
        assert!(parse_verb_table("go\twent\tgone\tидти\tгоу\textra").is_empty());
    }
}
