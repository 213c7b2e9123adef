use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SUB_BRACKET_RE: Regex = Regex::new(r"\[\[(.+?)\]\]").unwrap();
    static ref SUP_BRACKET_RE: Regex = Regex::new(r"\[(.+?)\]").unwrap();
    static ref DOWN_TAG_RE: Regex = Regex::new(r"<down>(.+?)</down>").unwrap();
    static ref UP_TAG_RE: Regex = Regex::new(r"<up>(.+?)</up>").unwrap();
}

/// Bracket convention to markup tags: `[[x]]` → `<down>x</down>`, `[x]` → `<up>x</up>`.
///
/// Subscripts are rewritten first so their double brackets are not read as
/// two nested superscripts.
pub fn sub_sup_to_sgml(input: &str) -> String {
    let subs = SUB_BRACKET_RE.replace_all(input, "<down>$1</down>");
    SUP_BRACKET_RE.replace_all(&subs, "<up>$1</up>").into_owned()
}

/// Markup tags back to the bracket convention.
pub fn sgml_to_sub_sup(input: &str) -> String {
    let subs = DOWN_TAG_RE.replace_all(input, "[[$1]]");
    UP_TAG_RE.replace_all(&subs, "[$1]").into_owned()
}
