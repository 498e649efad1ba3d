use std::borrow::Cow;

use crate::language::{PlaceholderStyle, UnresolvedPolicy};

/// Replace every placeholder in `line` with the value `resolve` returns for its name.
///
/// A placeholder is `style.prefix`, a name matching `[A-Za-z][A-Za-z0-9]*`
/// and `style.suffix`, and must not directly follow an ASCII alphanumeric
/// character. Under `UnresolvedPolicy::Error` the first unresolved name is
/// returned as `Err`.
pub fn substitute_placeholders<'v, F>(
    line: &str,
    style: &PlaceholderStyle,
    policy: UnresolvedPolicy,
    resolve: F,
) -> Result<String, String>
where
    F: Fn(&str) -> Option<Cow<'v, str>>,
{
    if style.prefix.is_empty() || !line.contains(style.prefix.as_str()) {
        return Ok(line.to_string());
    }

    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    let mut prev: Option<char> = None;

    while let Some(at) = rest.find(style.prefix.as_str()) {
        let (before, candidate) = rest.split_at(at);
        out.push_str(before);
        if let Some(c) = before.chars().next_back() {
            prev = Some(c);
        }

        let boundary = !prev.is_some_and(|c| c.is_ascii_alphanumeric());
        match placeholder_name(&candidate[style.prefix.len()..], &style.suffix) {
            Some(name) if boundary => {
                let len = style.prefix.len() + name.len() + style.suffix.len();
                match resolve(name) {
                    Some(value) => out.push_str(&value),
                    None if policy == UnresolvedPolicy::PassThrough => {
                        tracing::warn!(placeholder = name, "unresolved placeholder left in output");
                        out.push_str(&candidate[..len]);
                    }
                    None => return Err(name.to_string()),
                }
                prev = candidate[..len].chars().next_back();
                rest = &candidate[len..];
            }
            _ => {
                // not a placeholder: keep the first char and rescan after it
                let width = candidate.chars().next().map_or(1, char::len_utf8);
                out.push_str(&candidate[..width]);
                prev = candidate[..width].chars().next_back();
                rest = &candidate[width..];
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn placeholder_name<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let mut chars = text.char_indices();
    let (_, first) = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    let end = chars
        .find(|(_, c)| !c.is_ascii_alphanumeric())
        .map_or(text.len(), |(i, _)| i);
    let name = &text[..end];
    text[end..].starts_with(suffix).then_some(name)
}
