use unicode_width::UnicodeWidthStr;

pub const MASK_CHAR: char = '*';
const ELLIPSIS: char = '…';

pub fn mask_secret(value: &str) -> String {
    value.chars().map(|_| MASK_CHAR).collect()
}

/// Control characters would break the line accounting of rendered blocks.
pub fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
}

pub fn truncate_for_display(value: &str, max_chars: usize) -> String {
    let value = single_line(value);
    if max_chars == 0 {
        return String::new();
    }
    let count = value.chars().count();
    if count <= max_chars {
        return value;
    }
    let mut head: String = value.chars().take(max_chars - 1).collect();
    head.push(ELLIPSIS);
    head
}

/// Keeps the end of typed input visible, the part the cursor is on.
pub fn tail_for_display(value: &str, max_chars: usize) -> String {
    let value = single_line(value);
    if max_chars == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max_chars {
        return value;
    }
    let mut tail = String::with_capacity(max_chars);
    tail.push(ELLIPSIS);
    tail.extend(&chars[chars.len() - (max_chars - 1)..]);
    tail
}

pub fn line_count(block: &str) -> usize {
    block.lines().count()
}

/// Terminal columns taken by `line`, with CSI styling sequences removed.
pub fn display_width(line: &str) -> usize {
    strip_ansi(line).width()
}

fn strip_ansi(line: &str) -> String {
    let mut plain = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\u{1b}' {
            plain.push(ch);
            continue;
        }
        if chars.peek() != Some(&'[') {
            continue;
        }
        chars.next();
        for next in chars.by_ref() {
            if ('\u{40}'..='\u{7e}').contains(&next) {
                break;
            }
        }
    }
    plain
}
