//! Helpers for emitting Typst source.

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\n', r"\n")
        .replace('\r', r"\r")
        .replace('\t', r"\t")
}

/// Quote a value as a Typst string literal. Strings coerce to content, so user
/// text is never interpreted as markup.
pub fn typst_str(value: &str) -> String {
    format!("\"{}\"", escape_typst_string(value))
}

/// Typst content block with one line per entry, e.g. `[#"a" \ #"b"]`.
pub fn typst_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let body = lines
        .iter()
        .map(|line| format!("#{}", typst_str(line.as_ref())))
        .collect::<Vec<_>>()
        .join(" \\ ");
    format!("[{}]", body)
}
