/// Parse comma-separated tags, filtering empty ones
pub fn parse_tags(tags_str: &str) -> Vec<String> {
    normalize_tags(tags_str.split(','))
}

/// Trim tags, drop empty ones and duplicates, keep first-seen order.
///
/// Commas inside a tag split it, since commas delimit the stored form.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for raw in tags {
        for part in raw.as_ref().split(',') {
            let tag = part.trim();
            if !tag.is_empty() && !out.iter().any(|t| t == tag) {
                out.push(tag.to_string());
            }
        }
    }
    out
}

/// Stored form: delimited on both ends (",rust,testing,") so a tag lookup
/// can match `%,tag,%` exactly.
pub fn encode_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        return ",".to_string();
    }
    format!(",{},", tags.join(","))
}

pub fn decode_tags(stored: &str) -> Vec<String> {
    parse_tags(stored)
}
