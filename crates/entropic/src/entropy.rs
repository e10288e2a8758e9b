//! Entropy measures over histograms and code trees.
//!
//! All quantities are in bits.
//!
//! ```
//! use entropic::{entropy, BinaryTree, Histogram};
//!
//! let hist = Histogram::from_array(&[1, 1, 2]);
//! assert_eq!(entropy::entropy(&hist).unwrap(), 1.5);
//!
//! let tree = BinaryTree::huffman(&hist, None).unwrap();
//! assert_eq!(entropy::expected_code_length(&tree, &hist).unwrap(), 1.5);
//! ```

use crate::bins::{self, Bins};
use crate::error::{Error, Result};
use crate::tree::BinaryTree;

/// Probability of each bin, in bin order.
///
/// Fails with [`Error::EmptyHistogram`] if there are no items.
pub fn probabilities<B: Bins + ?Sized>(bins: &B) -> Result<Vec<f64>> {
    probabilities_of(&bins.counts())
}

/// Probabilities of raw per-bin counts.
pub fn probabilities_of(counts: &[usize]) -> Result<Vec<f64>> {
    let total = bins::checked_total(counts)?;
    if total == 0 {
        return Err(Error::EmptyHistogram);
    }
    Ok(counts
        .iter()
        .map(|&count| count as f64 / total as f64)
        .collect())
}

/// Shannon entropy of a histogram. Empty bins contribute nothing.
pub fn entropy<B: Bins + ?Sized>(bins: &B) -> Result<f64> {
    Ok(probabilities(bins)?
        .into_iter()
        .filter(|&p| p > 0.0)
        .map(|p| p * (1.0 / p).log2())
        .sum())
}

/// Cross entropy of `q` relative to `p`.
///
/// Infinite if some bin is possible under `p` but empty in `q`. Fails with
/// [`Error::BinCountMismatch`] if the histograms have different bin counts.
pub fn cross_entropy<P, Q>(p: &P, q: &Q) -> Result<f64>
where
    P: Bins + ?Sized,
    Q: Bins + ?Sized,
{
    let p = probabilities(p)?;
    let q = probabilities(q)?;
    if p.len() != q.len() {
        return Err(Error::BinCountMismatch {
            expected: p.len(),
            found: q.len(),
        });
    }
    Ok(p.iter()
        .zip(&q)
        .filter(|&(&p, _)| p > 0.0)
        .map(|(&p, &q)| {
            if q > 0.0 {
                p * (1.0 / q).log2()
            } else {
                f64::INFINITY
            }
        })
        .sum())
}

/// Average code length of `bins` under the codes assigned by `tree`.
///
/// Each bin costs the layer of its genuine tag in the tree. With a Huffman
/// tree built from the same histogram this is the entropy the tree actually
/// achieves; with a tree built from another histogram it is the realized
/// cross entropy.
pub fn expected_code_length<B: Bins + ?Sized>(tree: &BinaryTree, bins: &B) -> Result<f64> {
    let probabilities = probabilities(bins)?;
    let lengths = tree.code_lengths();
    if lengths.len() != probabilities.len() {
        return Err(Error::BinCountMismatch {
            expected: probabilities.len(),
            found: lengths.len(),
        });
    }
    Ok(lengths
        .into_iter()
        .map(|(bin, layer)| probabilities.get(bin).copied().unwrap_or(0.0) * layer as f64)
        .sum())
}

/// Depth of the perfect tree needed to single out one item of `bin`.
///
/// This is `ceil(log2(total / count)) + 1`, where `count` is the size of the
/// bin. Returns `None` for a missing or empty bin.
pub fn code_tree_depth<B: Bins + ?Sized>(bins: &B, bin: usize) -> Option<usize> {
    let counts = bins.counts();
    let count = *counts.get(bin)?;
    if count == 0 {
        return None;
    }
    let total = bins::checked_total(&counts).ok()?;
    let distinct = total as f64 / count as f64;
    Some(distinct.log2().ceil() as usize + 1)
}
