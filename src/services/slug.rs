use regex::Regex;
use std::sync::OnceLock;

fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}

/// URL slug: lowercased, whitespace runs turned into `-`, anything other than
/// ASCII word characters and `-` removed, repeated dashes collapsed.
#[must_use]
pub fn slugify(text: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    static NON_WORD: OnceLock<Regex> = OnceLock::new();
    static DASHES: OnceLock<Regex> = OnceLock::new();

    let lowered = text.to_lowercase();
    let dashed = get_regex(&WHITESPACE, r"\s+").replace_all(lowered.trim(), "-");
    let cleaned = get_regex(&NON_WORD, r"[^A-Za-z0-9_-]+").replace_all(&dashed, "");
    get_regex(&DASHES, r"--+")
        .replace_all(&cleaned, "-")
        .into_owned()
}
