use time::OffsetDateTime;

/// Expand `%` macros against the current local time.
pub fn expand_macros(text: &str) -> String {
    if !text.contains('%') {
        return text.to_string();
    }
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    expand_macros_at(text, now)
}

/// Expand `%` macros against `now`.
///
/// `%%` is a literal percent, `%t`/`%T` the short/long time, `%d`/`%D`
/// the short/long date. Unknown macros expand to nothing; a `%` ending the
/// text is kept.
pub fn expand_macros_at(text: &str, now: OffsetDateTime) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            result.push(ch);
            continue;
        }
        let Some(macro_char) = chars.next() else {
            result.push('%');
            break;
        };
        match macro_char {
            '%' => result.push('%'),
            't' => result.push_str(&format!("{}:{:02}", now.hour(), now.minute())),
            'T' => result.push_str(&format!(
                "{}:{:02}:{:02}",
                now.hour(),
                now.minute(),
                now.second()
            )),
            'd' => result.push_str(&format!(
                "{:04}-{:02}-{:02}",
                now.year(),
                now.month() as u8,
                now.day()
            )),
            'D' => {
                let weekday = now.weekday().to_string();
                let month = now.month().to_string();
                result.push_str(&format!(
                    "{}, {} {}, {}",
                    &weekday[..3],
                    &month[..3],
                    now.day(),
                    now.year()
                ));
            }
            _ => {}
        }
    }

    result
}
