/// Turns a type identifier into a human-readable label.
///
/// Everything up to (and including) the last `:` or `/` is stripped, as long as something remains
/// after it. Then a space is inserted in front of every ASCII capital letter and the result is
/// trimmed.
///
/// ```
/// use registry_model::normalize_type_label;
///
/// assert_eq!(normalize_type_label("dcat:DataService"), "Data Service");
/// assert_eq!(normalize_type_label("SomeCPP"), "Some C P P");
/// ```
///
/// Consecutive capitals are split one by one, so acronyms are spelled out letter by letter.
pub fn normalize_type_label(raw: &str) -> String {
    let local_name = match raw.rfind(|c: char| c == ':' || c == '/') {
        Some(idx) if idx + 1 < raw.len() => &raw[idx + 1..],
        _ => raw,
    };

    let mut label = String::with_capacity(local_name.len() + 4);
    for c in local_name.chars() {
        if c.is_ascii_uppercase() {
            label.push(' ');
        }
        label.push(c);
    }
    label.trim().to_owned()
}
