//! Link-to-larger-image heuristic.
//!
//! Blogger wraps a display-sized `<img>` in an `<a>` pointing at the same
//! picture at another size, e.g.:
//!
//! ```text
//! <a href="http://x/s1600/pic.jpg"><img src="http://x/s200/pic.jpg"></a>
//! ```
//!
//! Comparing the two URLs as strings is enough to spot this without fetching
//! either image. The score is the Ratcliff/Obershelp ratio
//! `2 * M / (len(a) + len(b))`, where `M` counts the characters in matching
//! blocks found by recursively taking the longest common block and repeating
//! on both sides. Block selection follows the classic sequence-matcher rules
//! exactly (earliest block wins ties; for `b` of 200+ characters, characters
//! that make up more than 1% of `b` cannot start a match), so classifications
//! are stable across implementations.
//!
//! The ratio is not symmetric in general: swapping `a` and `b` can change tie
//! breaking and the popular-character rule. [`links_to_larger_image`] always
//! passes the link as `a` and the image source as `b`.
//!
//! This is a heuristic with no false-positive or false-negative correction.

use std::collections::HashMap;

/// Links scoring above this are taken to point at the full-size image.
pub const MIN_IMAGE_TO_LINK_RATIO: f64 = 0.8;

/// Length of `b` from which frequent characters stop seeding matches.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Whether a link target very likely points at a larger version of the image.
///
/// True iff the similarity ratio is strictly greater than
/// [`MIN_IMAGE_TO_LINK_RATIO`]; a ratio of exactly 0.8 is not enough.
pub fn links_to_larger_image(href: &str, src: &str) -> bool {
    ratio(href, src) > MIN_IMAGE_TO_LINK_RATIO
}

/// Similarity of `a` and `b` in `[0, 1]`. Two empty strings score 1.0.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches: usize = Matcher::new(&a, &b)
        .matching_blocks()
        .iter()
        .map(|block| block.size)
        .sum();
    2.0 * matches as f64 / total as f64
}

/// A run where `a[a_start..a_start + size] == b[b_start..b_start + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    a_start: usize,
    b_start: usize,
    size: usize,
}

struct Matcher<'s> {
    a: &'s [char],
    b: &'s [char],
    /// Positions of each character in `b`, minus autojunked characters.
    b_index: HashMap<char, Vec<usize>>,
}

impl<'s> Matcher<'s> {
    fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b_index.entry(*c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b_index.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b_index }
    }

    /// Longest matching block inside `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        // Length of the match ending at a[i - 1], b[j], keyed by j.
        let mut run_len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_run_len = HashMap::new();
            if let Some(positions) = self.b_index.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_run_len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            run_len = next_run_len;
        }

        // Autojunked characters cannot seed a match but may still extend one.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        Block {
            a_start: best_i,
            b_start: best_j,
            size: best_size,
        }
    }

    /// All matching blocks in order, adjacent blocks merged.
    fn matching_blocks(&self) -> Vec<Block> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            let (i, j, k) = (block.a_start, block.b_start, block.size);
            blocks.push(block);
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        blocks.sort_by_key(|b| (b.a_start, b.b_start, b.size));

        let mut merged: Vec<Block> = Vec::with_capacity(blocks.len());
        for block in blocks {
            match merged.last_mut() {
                Some(last)
                    if last.a_start + last.size == block.a_start
                        && last.b_start + last.size == block.b_start =>
                {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        merged
    }
}
