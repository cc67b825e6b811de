use crate::buffer::{Buffer, LineId};

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

// `from` の次の行から末尾に向かって探す
pub fn find_forward(buffer: &Buffer, from: LineId, lineno: usize, term: &[u8]) -> Option<usize> {
    let mut line = buffer.next(from);
    let mut index = lineno + 1;
    while let Some(id) = line {
        if contains(buffer.text(id), term) {
            return Some(index);
        }
        index += 1;
        line = buffer.next(id);
    }
    None
}

pub fn find_reverse(buffer: &Buffer, from: LineId, lineno: usize, term: &[u8]) -> Option<usize> {
    let mut line = buffer.prev_line(from);
    let mut index = lineno;
    while let Some(id) = line {
        // 先頭を越えたら打ち切り
        index = index.checked_sub(1)?;
        if contains(buffer.text(id), term) {
            return Some(index);
        }
        line = buffer.prev_line(id);
    }
    None
}
