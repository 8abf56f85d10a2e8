//! Source excerpts around an error position.
//!
//! The layout follows the familiar Babel code frame:
//!
//! ```text
//!   1 | const a = 1
//! > 2 | const = 2
//!     |       ^ Unexpected token
//!   3 | mostrar(a)
//! ```

/// Window and message of a rendered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFrameOptions {
    pub lines_above: usize,
    pub lines_below: usize,
    pub message: Option<String>,
}

impl Default for CodeFrameOptions {
    fn default() -> Self {
        Self {
            lines_above: 2,
            lines_below: 3,
            message: None,
        }
    }
}

impl CodeFrameOptions {
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Render the lines around `line` (1-based) of `source`.
///
/// With a `column` (1-based) a caret marks the position and the message
/// follows it; without one the failing line is only flagged with `>` and the
/// message is printed above the frame.
pub fn code_frame_columns(
    source: &str,
    line: usize,
    column: Option<usize>,
    options: &CodeFrameOptions,
) -> String {
    let lines = split_lines(source);
    let column = column.filter(|column| *column > 0);

    let start = line.saturating_sub(options.lines_above + 1);
    let end = lines.len().min(line.saturating_add(options.lines_below));
    let number_width = end.to_string().len();

    let mut frame = lines
        .iter()
        .enumerate()
        .take(end)
        .skip(start)
        .map(|(index, text)| {
            let number = index + 1;
            let gutter = format!(" {number:>number_width$} |");
            let text = if text.is_empty() {
                String::new()
            } else {
                format!(" {text}")
            };

            if number != line {
                return format!(" {gutter}{text}");
            }

            let marker = column.map_or_else(String::new, |column| {
                let spacing: String = lines[index]
                    .chars()
                    .take(column - 1)
                    .map(|c| if c == '\t' { '\t' } else { ' ' })
                    .collect();
                let blank_gutter: String = gutter
                    .chars()
                    .map(|c| if c.is_ascii_digit() { ' ' } else { c })
                    .collect();
                let mut marker = format!("\n {blank_gutter} {spacing}^");
                if let Some(message) = &options.message {
                    marker.push(' ');
                    marker.push_str(message);
                }
                marker
            });
            format!(">{gutter}{text}{marker}")
        })
        .collect::<Vec<_>>()
        .join("\n");

    if column.is_none() {
        if let Some(message) = &options.message {
            frame = format!("{}{message}\n{frame}", " ".repeat(number_width + 1));
        }
    }
    frame
}

fn split_lines(source: &str) -> Vec<&str> {
    source
        .split("\r\n")
        .flat_map(|chunk| chunk.split(['\n', '\r', '\u{2028}', '\u{2029}']))
        .collect()
}
