/// Reference lists up to this length are expanded whole.
pub const FULL_EXPANSION_LIMIT: usize = 99;
/// Window used when the caller asks for none, or for one outside `(1, 99)`.
pub const DEFAULT_WINDOW: usize = 15;

/// A slice of a reference list selected for expansion.
#[derive(Debug, PartialEq, Eq)]
pub struct Window<'a, T> {
    pub refs: &'a [T],
    /// Exclusive end index of the next, older window.
    pub next: Option<usize>,
}

/// Window size for a caller request; only sizes strictly between 1 and 99 are honoured.
pub fn window_size(requested: Option<u32>) -> usize {
    match requested {
        Some(size) if size > 1 && (size as usize) < FULL_EXPANSION_LIMIT => size as usize,
        _ => DEFAULT_WINDOW,
    }
}

/// Selects which references to expand.
///
/// Short lists are returned whole. Longer ones yield the `window` entries ending
/// just before `end` (default: the last stored entry, which is always excluded).
pub fn expand_window<T>(refs: &[T], window: Option<u32>, end: Option<usize>) -> Window<'_, T> {
    if refs.len() <= FULL_EXPANSION_LIMIT {
        return Window { refs, next: None };
    }

    let tail = refs.len() - 1;
    let end = end.map_or(tail, |e| e.min(tail));
    let start = end.saturating_sub(window_size(window));
    Window {
        refs: &refs[start..end],
        next: (start > 0).then_some(start),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(len: usize) -> Vec<usize> {
        (0..len).collect()
    }

    #[test]
    fn test_short_list_is_expanded_whole() {
        let refs = indices(99);
        let window = expand_window(&refs, Some(15), None);

        assert_eq!(window.refs.len(), 99);
        assert_eq!(window.next, None);
    }

    #[test]
    fn test_window_excludes_last_entry() {
        let refs = indices(100);
        let window = expand_window(&refs, Some(15), None);

        assert_eq!(window.refs, &refs[84..99]);
        assert_eq!(window.refs.first(), Some(&84));
        assert_eq!(window.refs.last(), Some(&98));
        assert_eq!(window.next, Some(84));
    }

    #[test]
    fn test_window_on_101_entries() {
        let refs = indices(101);
        let window = expand_window(&refs, Some(15), None);

        assert_eq!(window.refs.len(), 15);
        assert_eq!(window.refs.last(), Some(&99));
    }

    #[test]
    fn test_boundary_sizes_fall_back_to_default() {
        let refs = indices(100);
        for size in [1, 99, 150] {
            let window = expand_window(&refs, Some(size), None);
            assert_eq!(window.refs.len(), DEFAULT_WINDOW, "size {size}");
            assert_eq!(window.refs.last(), Some(&98));
        }
        assert_eq!(expand_window(&refs, None, None).refs.len(), DEFAULT_WINDOW);
    }

    #[test]
    fn test_honoured_sizes() {
        let refs = indices(100);
        assert_eq!(expand_window(&refs, Some(2), None).refs, &[97, 98]);
        let wide = expand_window(&refs, Some(98), None);
        assert_eq!(wide.refs.len(), 98);
        assert_eq!(wide.next, Some(1));
    }

    #[test]
    fn test_cursor_walks_back_to_the_start() {
        let refs = indices(120);
        let first = expand_window(&refs, Some(50), None);
        assert_eq!(first.refs.first(), Some(&69));

        let second = expand_window(&refs, Some(50), first.next);
        assert_eq!(second.refs.first(), Some(&19));
        assert_eq!(second.refs.last(), Some(&68));

        let third = expand_window(&refs, Some(50), second.next);
        assert_eq!(third.refs, &refs[0..19]);
        assert_eq!(third.next, None);
    }
}
