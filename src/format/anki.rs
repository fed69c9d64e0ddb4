//! Anki tab-separated text import format.
//!
//! The file starts with `#key:value` directive lines describing how Anki
//! should read it, followed by one tab-separated line per note. Notes are
//! rendered as HTML, so line breaks become `<br>` and quotes become entities.
//!
//! Notes carry two fields and the tags, matching a `Basic` note type: the
//! answer field also holds the mnemonic and hint, and the category survives
//! only as a `dificuldade::<code>` tag.

use crate::domain::{Category, FinalRecord, Tags, hint::mnemonic_hint};

/// 1-based column holding the tags.
pub const TAGS_COLUMN: usize = 3;

/// Renders records into Anki's text import format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnkiText {
    deck: String,
    note_type: String,
    tag_root: String,
}

impl AnkiText {
    /// Creates a renderer targeting the given deck and note type.
    ///
    /// Tags are written below `tag_root` (`<root>::<tag>`); pass an empty
    /// root to write bare tags.
    pub fn new(
        deck: impl Into<String>,
        note_type: impl Into<String>,
        tag_root: impl Into<String>,
    ) -> Self {
        Self {
            deck: deck.into(),
            note_type: note_type.into(),
            tag_root: tag_root.into(),
        }
    }

    /// The directive lines opening the file.
    #[must_use]
    pub fn directives(&self) -> Vec<String> {
        vec![
            "#separator:tab".to_string(),
            "#html:true".to_string(),
            format!("#deck:{}", self.deck),
            format!("#notetype:{}", self.note_type),
            format!("#tags column:{TAGS_COLUMN}"),
        ]
    }

    /// Renders the whole file.
    #[must_use]
    pub fn render(&self, records: &[FinalRecord]) -> String {
        let mut out = String::new();
        for directive in self.directives() {
            out.push_str(&directive);
            out.push('\n');
        }
        for record in records {
            out.push_str(&self.render_record(record));
            out.push('\n');
        }
        out
    }

    /// Renders one note line (without terminator).
    #[must_use]
    pub fn render_record(&self, record: &FinalRecord) -> String {
        let columns = [
            escape(record.question()),
            escape(&answer_html(record)),
            hierarchical_tags(&self.tag_root, record.tags(), record.category()).join(" "),
        ];
        columns.join("\t")
    }
}

/// Builds the HTML of a note's answer field.
///
/// The answer is followed by the mnemonic and the hint, each on its own
/// paragraph when present. A hint that merely restates the mnemonic is left
/// out.
#[must_use]
pub fn answer_html(record: &FinalRecord) -> String {
    let mut html = line_breaks(record.answer());

    let mnemonic = record.mnemonic().trim();
    if !mnemonic.is_empty() {
        html.push_str("<br><br><i>Mnemônico:</i> ");
        html.push_str(&line_breaks(mnemonic));
    }

    let hint = record.hint();
    let restates_mnemonic = mnemonic_hint(mnemonic).is_some_and(|derived| derived == hint);
    if !hint.is_empty() && !restates_mnemonic {
        html.push_str("<br><br><i>Dica:</i> ");
        html.push_str(&line_breaks(hint));
    }

    html
}

/// Re-expresses tags as hierarchical tokens below `root`.
///
/// A difficulty token (`<root>::dificuldade::<code>`) is appended. Spaces
/// inside a tag would split it, so they become underscores.
#[must_use]
pub fn hierarchical_tags(root: &str, tags: &Tags, category: Category) -> Vec<String> {
    let prefix = |tag: &str| {
        let tag = tag.replace(char::is_whitespace, "_");
        if root.is_empty() {
            tag
        } else {
            format!("{root}::{tag}")
        }
    };

    tags.iter()
        .map(prefix)
        .chain(std::iter::once(prefix(&format!(
            "dificuldade::{}",
            category.code()
        ))))
        .collect()
}

/// Makes a field safe for a single tab-separated HTML cell.
#[must_use]
pub fn escape(field: &str) -> String {
    line_breaks(field).replace('\t', " ").replace('"', "&quot;")
}

fn line_breaks(text: &str) -> String {
    text.replace("\r\n", "<br>").replace(['\n', '\r'], "<br>")
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::ValidatedRecord;

    fn record(question: &str, tags: &str, category: Category, hint: &str) -> FinalRecord {
        let hint = hint.to_string();
        ValidatedRecord::new(question, "Resposta", Tags::parse(tags), "mn")
            .unwrap()
            .classify_as(category)
            .finish(move |_| hint)
    }

    fn pipeline_record(line: &str) -> FinalRecord {
        crate::Pipeline::default()
            .with_header(false)
            .run(line)
            .records
            .remove(0)
    }

    #[test_case("plain", "plain"; "untouched")]
    #[test_case("a\tb", "a b"; "tab")]
    #[test_case("a\nb", "a<br>b"; "line feed")]
    #[test_case("a\r\nb", "a<br>b"; "crlf is one break")]
    #[test_case("say \"hi\"", "say &quot;hi&quot;"; "quotes")]
    fn escaping(input: &str, expected: &str) {
        assert_eq!(escape(input), expected);
    }

    #[test]
    fn directives_name_deck_and_note_type() {
        let text = AnkiText::new("Neuro", "Basic", "neuro");
        assert_eq!(
            text.directives(),
            [
                "#separator:tab",
                "#html:true",
                "#deck:Neuro",
                "#notetype:Basic",
                "#tags column:3",
            ]
        );
    }

    #[test]
    fn tags_are_hierarchical_and_space_separated() {
        let tags = Tags::parse("forame-monro,ventriculos");
        assert_eq!(
            hierarchical_tags("neuro", &tags, Category::Difficult),
            [
                "neuro::forame-monro",
                "neuro::ventriculos",
                "neuro::dificuldade::D"
            ]
        );
        assert_eq!(
            hierarchical_tags("", &Tags::parse("a b"), Category::Easy),
            ["a_b", "dificuldade::E"]
        );
    }

    #[test]
    fn renders_one_line_per_record() {
        let text = AnkiText::new("Neuro", "Basic", "neuro");
        let output = text.render(&[
            record("Q\t1", "x", Category::Difficult, "dica \"um\""),
            record("Q2", "", Category::Medium, ""),
        ]);

        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(
            lines[5],
            "Q 1\tResposta<br><br><i>Mnemônico:</i> mn<br><br><i>Dica:</i> dica &quot;um&quot;\tneuro::x neuro::dificuldade::D"
        );
        assert_eq!(
            lines[6],
            "Q2\tResposta<br><br><i>Mnemônico:</i> mn\tneuro::dificuldade::M"
        );
        assert_eq!(lines[6].split('\t').count(), TAGS_COLUMN);
    }

    #[test]
    fn difficult_hint_lands_in_the_answer_column() {
        let record =
            pipeline_record("CASO: Paciente com lesão,Compressão do forame de Monro,forame-monro,,,");
        assert_eq!(record.category(), Category::Difficult);

        let line = AnkiText::new("Neuro", "Basic", "neuro").render_record(&record);
        let columns: Vec<_> = line.split('\t').collect();

        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0], "CASO: Paciente com lesão");
        assert!(columns[1].starts_with("Compressão do forame de Monro<br><br><i>Dica:</i> "));
        assert!(columns[1].ends_with(&escape(record.hint())));
        assert_eq!(columns[2], "neuro::forame-monro neuro::dificuldade::D");
    }

    #[test]
    fn hint_restating_the_mnemonic_is_not_repeated() {
        let record = pipeline_record("CASO: x,Resp,forame-monro,Monro une,,");
        assert_eq!(record.hint(), "Mnemônico: Monro une");

        assert_eq!(
            answer_html(&record),
            "Resp<br><br><i>Mnemônico:</i> Monro une"
        );
    }

    #[test]
    fn answer_keeps_line_breaks_as_html() {
        let record = ValidatedRecord::new("Q", "um\ndois", Tags::default(), "")
            .unwrap()
            .classify_as(Category::Medium)
            .finish(|_| String::new());

        assert_eq!(answer_html(&record), "um<br>dois");
    }
}
