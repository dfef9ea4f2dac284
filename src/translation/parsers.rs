pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'-') && bytes.get(idx + 1) == Some(&b'-')
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'/') && bytes.get(idx + 1) == Some(&b'*')
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'*') && bytes.get(idx + 1) == Some(&b'/')
}

/// `::` is the T-SQL static member operator (`geography::Point`), not a placeholder.
pub(super) fn is_scope_operator(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx + 1) == Some(&b':') || (idx > 0 && bytes.get(idx - 1) == Some(&b':'))
}

/// Byte offset of the first `(` outside bracketed identifiers, if any.
pub(super) fn find_open_paren(bytes: &[u8]) -> Option<usize> {
    let mut in_brackets = false;
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'[' if !in_brackets => in_brackets = true,
            b']' if in_brackets => {
                if bytes.get(idx + 1) == Some(&b']') {
                    idx += 1;
                } else {
                    in_brackets = false;
                }
            }
            b'(' if !in_brackets => return Some(idx),
            _ => {}
        }
        idx += 1;
    }
    None
}
