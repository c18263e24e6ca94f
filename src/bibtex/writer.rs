//! BibTeX serialization.

use crate::models::NormalizedEntry;

/// Characters that cannot appear in a citation key
const KEY_FORBIDDEN: &[char] = &[',', '{', '}', '(', ')', '=', '"', '#', '%', '\'', '\\'];

/// Renders entries as BibTeX text.
///
/// Each entry becomes one `@type{key, ...}` block with one field per line;
/// blocks are separated by a blank line.
#[derive(Debug, Clone)]
pub struct BibtexWriter {
    indent: String,
}

impl Default for BibtexWriter {
    fn default() -> Self {
        Self {
            indent: " ".to_string(),
        }
    }
}

impl BibtexWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different field indent
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Render all entries; empty input gives an empty string
    pub fn write(&self, entries: &[NormalizedEntry]) -> String {
        entries
            .iter()
            .map(|entry| self.write_entry(entry))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render one entry block, including its trailing newline
    pub fn write_entry(&self, entry: &NormalizedEntry) -> String {
        let fields = entry
            .fields()
            .into_iter()
            .map(|(name, value)| format!("{}{} = {{{}}}", self.indent, name, escape_value(value)))
            .collect::<Vec<_>>()
            .join(",\n");

        format!(
            "@{}{{{},\n{}\n}}\n",
            entry.entry_type,
            sanitize_key(&entry.id),
            fields
        )
    }
}

/// Escape LaTeX special characters in a field value.
///
/// Braces become `\textbraceleft{}`/`\textbraceright{}`: BibTeX counts `\{`
/// as a brace, so an unbalanced one would end the field early.
pub fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\textbackslash{}"),
            '{' => escaped.push_str("\\textbraceleft{}"),
            '}' => escaped.push_str("\\textbraceright{}"),
            '&' | '%' | '$' | '#' | '_' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '~' => escaped.push_str("\\textasciitilde{}"),
            '^' => escaped.push_str("\\textasciicircum{}"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Strip characters BibTeX does not accept in a citation key
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_whitespace() && !KEY_FORBIDDEN.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryType;

    fn entry() -> NormalizedEntry {
        NormalizedEntry {
            entry_type: EntryType::InProceedings,
            id: "Lee2019".to_string(),
            title: "A Study".to_string(),
            author: "Ann Lee".to_string(),
            year: "2019".to_string(),
            venue: "ICSE".to_string(),
            volume: None,
            number: None,
        }
    }

    #[test]
    fn test_single_entry_block() {
        let text = BibtexWriter::new().write(&[entry()]);
        assert_eq!(
            text,
            "@inproceedings{Lee2019,\n title = {A Study},\n author = {Ann Lee},\n year = {2019},\n booktitle = {ICSE}\n}\n"
        );
    }

    #[test]
    fn test_blocks_separated_by_blank_line() {
        let mut second = entry();
        second.entry_type = EntryType::Article;
        second.id = "Lee2020".to_string();
        second.volume = Some("12".to_string());
        second.number = Some("3".to_string());

        let text = BibtexWriter::new().write(&[entry(), second]);
        let blocks: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("@inproceedings{Lee2019,"));
        assert!(blocks[1].starts_with("@article{Lee2020,"));
        assert!(blocks[1].contains(" journal = {ICSE},\n volume = {12},\n number = {3}\n}"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(BibtexWriter::new().write(&[]), "");
    }

    #[test]
    fn test_custom_indent() {
        let text = BibtexWriter::new().indent("  ").write_entry(&entry());
        assert!(text.contains("\n  title = {A Study},"));
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape_value("R&D at 100%"), "R\\&D at 100\\%");
        assert_eq!(
            escape_value("{Braces}"),
            "\\textbraceleft{}Braces\\textbraceright{}"
        );
        assert_eq!(escape_value("$x_1$ #1"), "\\$x\\_1\\$ \\#1");
        assert_eq!(escape_value("a\\b"), "a\\textbackslash{}b");
        assert_eq!(escape_value("~^"), "\\textasciitilde{}\\textasciicircum{}");
        assert_eq!(escape_value("Müller and Ünal"), "Müller and Ünal");
    }

    #[test]
    fn test_values_escaped_in_output() {
        let mut e = entry();
        e.title = "Fast & Furious: 50% {Faster}".to_string();
        let text = BibtexWriter::new().write_entry(&e);
        assert!(text.contains(
            " title = {Fast \\& Furious: 50\\% \\textbraceleft{}Faster\\textbraceright{}},"
        ));
    }

    /// Raw brace depth over a block; BibTeX ignores backslashes when counting
    fn brace_depths(text: &str) -> Vec<i32> {
        let mut depth = 0;
        text.chars()
            .filter_map(|c| match c {
                '{' => {
                    depth += 1;
                    Some(depth)
                }
                '}' => {
                    depth -= 1;
                    Some(depth)
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_unbalanced_braces_keep_block_intact() {
        let mut e = entry();
        e.title = "Sets like a} b".to_string();
        e.venue = "Proc. {of".to_string();
        let text = BibtexWriter::new().write_entry(&e);

        let depths = brace_depths(&text);
        assert!(depths.iter().all(|&d| d >= 0));
        assert_eq!(depths.last(), Some(&0));
        // Only the closing brace of the entry returns to depth 0
        assert_eq!(depths.iter().filter(|&&d| d == 0).count(), 1);
        assert!(text.contains(" title = {Sets like a\\textbraceright{} b},"));
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("Lee2019"), "Lee2019");
        assert_eq!(sanitize_key("conf/icse/Lee19"), "conf/icse/Lee19");
        assert_eq!(sanitize_key("van der2019"), "vander2019");
        assert_eq!(sanitize_key("O'Brien,2019"), "OBrien2019");
    }
}
