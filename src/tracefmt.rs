//! Normalisation helpers for trace-log output.
//!
//! Control-mode lines can embed carriage returns, newlines, and arbitrarily
//! long payloads. These helpers keep log records single-line and bounded so
//! trace output stays readable under load.

const COMMAND_LIMIT: usize = 512;
const OUTPUT_PREVIEW_LINES: usize = 5;
const OUTPUT_LINE_LIMIT: usize = 160;
const OUTPUT_TOTAL_LIMIT: usize = 512;

/// Normalise a control-mode command for logging.
pub fn format_command(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "<empty>".to_string();
    }
    clip_with_marker(&sanitise(raw), COMMAND_LIMIT)
}

/// Normalise a raw control-mode line received from tmux.
pub fn format_line(raw: &str) -> String {
    let raw = raw.trim_end_matches(['\r', '\n']);
    if raw.is_empty() {
        return "<empty>".to_string();
    }
    clip_with_marker(&sanitise(raw), COMMAND_LIMIT)
}

/// Produce a compact preview of the output lines returned by tmux.
pub fn summarise_lines(lines: &[String]) -> String {
    if lines.is_empty() {
        return "lines=0".to_string();
    }

    let mut out = format!("lines={}: ", lines.len());
    let preview_count = lines.len().min(OUTPUT_PREVIEW_LINES);
    let mut total_chars = 0;
    let mut truncated = false;

    for (idx, raw) in lines.iter().take(preview_count).enumerate() {
        if idx > 0 {
            out.push_str(" | ");
            total_chars += 3;
        }

        let mut line = sanitise(raw.trim_end_matches(['\r', '\n']));
        if line.is_empty() {
            line = "<empty>".to_string();
        }

        let (mut line, line_truncated) = clip(&line, OUTPUT_LINE_LIMIT);
        if line_truncated {
            truncated = true;
        }

        if total_chars + line.len() > OUTPUT_TOTAL_LIMIT {
            let remaining = OUTPUT_TOTAL_LIMIT.saturating_sub(total_chars);
            if remaining == 0 {
                truncated = true;
                break;
            }
            line = clip(&line, remaining).0;
            truncated = true;
        }

        total_chars += line.len();
        out.push_str(&line);

        if total_chars >= OUTPUT_TOTAL_LIMIT {
            truncated = true;
            break;
        }
    }

    if lines.len() > preview_count {
        out.push_str(&format!(" (+{} more lines)", lines.len() - preview_count));
        truncated = true;
    }

    if truncated {
        out.push_str(" (truncated)");
    }

    out
}

fn sanitise(raw: &str) -> String {
    raw.replace('\r', "\\r").replace('\n', "\\n")
}

fn clip_with_marker(value: &str, limit: usize) -> String {
    let (out, truncated) = clip(value, limit);
    if truncated {
        format!("{out} (truncated)")
    } else {
        out
    }
}

/// Clip to at most `limit` bytes on a char boundary, with a `...` tail when
/// the budget allows one.
fn clip(value: &str, limit: usize) -> (String, bool) {
    if value.len() <= limit {
        return (value.to_string(), false);
    }
    if limit <= 3 {
        return (safe_prefix(value, limit).to_string(), true);
    }
    (format!("{}...", safe_prefix(value, limit - 3)), true)
}

fn safe_prefix(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
