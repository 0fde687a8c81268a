//! Sliding-window proximity/co-occurrence counting over a single document's
//! merged term-position list (spec §4.4; grounded on
//! `original_source/feature-gen/src/w_scanner.{h,cpp}`, adapted from a
//! multi-iterator inverted-list merge to an in-memory per-document scan).

/// One occurrence: which query term (`term_idx`, a dense index into the
/// query's unique-term list) at which token position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermPos {
    pub term_idx: usize,
    pub pos: u64,
}

/// Merge each query term's position list into one timeline sorted by
/// position, tagging each occurrence with its source term index.
pub fn build_cdf(term_positions: &[Vec<u64>]) -> Vec<TermPos> {
    let mut cdf: Vec<TermPos> = term_positions
        .iter()
        .enumerate()
        .flat_map(|(idx, positions)| positions.iter().map(move |&pos| TermPos { term_idx: idx, pos }))
        .collect();
    cdf.sort_by_key(|tp| tp.pos);
    cdf
}

/// Count qualifying windows of size `w_size` over `cdf`, where `qlen` is
/// the number of distinct query terms that must co-occur. `ordered`
/// additionally requires the terms to appear in strictly consecutive
/// query-term-index order; `overlap` controls whether the left edge
/// advances by one position each step or jumps past the last window used.
pub fn count_windows(cdf: &[TermPos], qlen: usize, w_size: u32, ordered: bool, overlap: bool) -> u64 {
    if ordered {
        count_ordered(cdf, qlen, w_size, overlap)
    } else {
        count_unordered(cdf, qlen, w_size, overlap)
    }
}

fn in_window(lhs: TermPos, rhs: TermPos, w_size: u32) -> bool {
    rhs.pos - lhs.pos + 1 <= w_size as u64
}

fn count_unordered(cdf: &[TermPos], qlen: usize, w_size: u32, overlap: bool) -> u64 {
    let mut cnt = 0u64;
    let mut l = 0usize;
    while l < cdf.len() {
        let lhs = cdf[l];
        let mut seen = std::collections::HashSet::new();
        seen.insert(lhs.term_idx);
        let mut r = l + 1;
        let mut last_pos = None;
        while r < cdf.len() && in_window(lhs, cdf[r], w_size) {
            let rhs = cdf[r];
            seen.insert(rhs.term_idx);
            if seen.len() == qlen {
                cnt += 1;
                last_pos = Some(r);
                break;
            }
            r += 1;
        }
        if overlap {
            l += 1;
        } else {
            match last_pos {
                Some(p) if p + 1 < cdf.len() => l = p + 1,
                Some(_) => break,
                None => l += 1,
            }
        }
    }
    cnt
}

fn count_ordered(cdf: &[TermPos], qlen: usize, w_size: u32, overlap: bool) -> u64 {
    let mut cnt = 0u64;
    let mut l = 0usize;
    while l < cdf.len() {
        let lhs = cdf[l];
        let mut seen = std::collections::HashSet::new();
        seen.insert(lhs.term_idx);
        let mut last_term = lhs.term_idx;
        let mut r = l + 1;
        let mut last_pos = None;
        while r < cdf.len() && in_window(lhs, cdf[r], w_size) {
            let rhs = cdf[r];
            if !seen.contains(&rhs.term_idx) {
                if rhs.term_idx.wrapping_sub(last_term) != 1 {
                    break;
                }
                last_term = rhs.term_idx;
                seen.insert(rhs.term_idx);
            }
            if seen.len() == qlen {
                cnt += 1;
                last_pos = Some(r);
                break;
            }
            r += 1;
        }
        if overlap {
            l += 1;
        } else {
            match last_pos {
                Some(p) if p + 1 < cdf.len() => l = p + 1,
                Some(_) => break,
                None => l += 1,
            }
        }
    }
    cnt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_worked_example() {
        // term_list [a,x,b,y,a,b], query {a,b}: positions a=[0,4], b=[2,5].
        let cdf = build_cdf(&[vec![0, 4], vec![2, 5]]);
        let count = count_windows(&cdf, 2, 3, false, true);
        assert_eq!(count, 3);
    }

    #[test]
    fn ordered_count_never_exceeds_unordered() {
        let cdf = build_cdf(&[vec![0, 10, 20], vec![1, 11, 21], vec![2, 3]]);
        let unordered = count_windows(&cdf, 3, 5, false, true);
        let ordered = count_windows(&cdf, 3, 5, true, true);
        assert!(ordered <= unordered);
    }

    #[test]
    fn no_window_when_a_term_never_occurs() {
        let cdf = build_cdf(&[vec![0, 1, 2], Vec::new()]);
        assert_eq!(count_windows(&cdf, 2, 10, false, true), 0);
    }
}
