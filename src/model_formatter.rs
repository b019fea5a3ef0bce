//! Model name formatting for display
//!
//! Converts raw Gemini model ids to the short names used on the wrapped
//! card:
//! - `gemini-2.5-pro` → `2.5 Pro`
//! - `gemini-2.5-flash-lite` → `2.5 Flash Lite`
//! - `gemini-3-pro-preview` → `3 Pro Preview`
//!
//! Ids that don't follow the `gemini-<version>-<family>` shape are returned
//! unchanged so nothing ever renders blank.

/// Format a model id for display
///
/// # Examples
///
/// ```
/// use gemini_wrapped::model_formatter::format_model_name;
///
/// assert_eq!(format_model_name("gemini-2.5-pro", false), "2.5 Pro");
/// assert_eq!(format_model_name("gemini-2.5-pro", true), "gemini-2.5-pro");
/// ```
pub fn format_model_name(model_id: &str, use_full_name: bool) -> String {
    if use_full_name {
        return model_id.to_string();
    }

    let Some(rest) = model_id.strip_prefix("gemini-") else {
        return model_id.to_string();
    };

    let mut parts = rest.split('-');
    let Some(version) = parts.next().filter(|v| is_version(v)) else {
        return model_id.to_string();
    };

    let mut display = version.to_string();
    for part in parts {
        // Trailing date stamps (e.g. -0827) add nothing on a stats card
        if part.len() >= 4 && part.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        display.push(' ');
        display.push_str(&capitalize(part));
    }
    display
}

/// Format a list of model ids, joined with a separator
pub fn format_model_list(models: &[String], use_full_name: bool, separator: &str) -> String {
    models
        .iter()
        .map(|m| format_model_name(m, use_full_name))
        .collect::<Vec<_>>()
        .join(separator)
}

fn is_version(part: &str) -> bool {
    !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.')
        && !part.starts_with('.')
        && !part.ends_with('.')
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
