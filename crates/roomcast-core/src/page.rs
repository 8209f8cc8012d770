//! Tail-relative pagination over a room's message history.
//!
//! Page 0 is the most recent `size` messages; increasing page numbers walk
//! backward through history. Within a page, messages keep their original
//! oldest-first order -- only the window's position is chosen from the tail.
//!
//! Out-of-range requests are a normal, silent outcome: pages past the start
//! of history come back empty, never as an error. A non-positive size is
//! coerced to 1.

use roomcast_types::message::Message;

/// Select one page from an ordered message sequence, newest page first.
///
/// The window for page `p` with (coerced) size `s` over a log of length `n`:
///
/// ```text
/// end   = min(n, n - p * s)
/// start = max(0, n - (p + 1) * s)
/// ```
///
/// The oldest page is short rather than overlapping its neighbor, and a
/// window that falls entirely before the start of history is empty. All
/// arithmetic is signed and saturating so hostile query inputs cannot wrap.
pub fn page(messages: &[Message], page_number: i64, page_size: i64) -> Vec<Message> {
    let size = page_size.max(1);
    let len = messages.len() as i64;

    let end = len
        .saturating_sub(page_number.saturating_mul(size))
        .min(len);
    let start = len
        .saturating_sub(page_number.saturating_add(1).saturating_mul(size))
        .max(0);

    if start > end {
        return Vec::new();
    }
    messages[start as usize..end as usize].to_vec()
}
