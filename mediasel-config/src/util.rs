/// Flag value as written in `MEDIASEL_*` variables: `1/true/yes/on` or
/// `0/false/no/off`, any case, surrounding whitespace ignored. Anything else
/// is `None` so the configured value stays in place.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn parse_bool_var(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|raw| parse_bool(&raw))
}

/// Value of `name` when set to something other than whitespace.
pub fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|raw| !raw.trim().is_empty())
}
