//! The path tree of nontip monomials.
//!
//! Pattern `i` is the `i`-th nontip in the ordering. Nontips are closed
//! under dropping the last arrow, so they form a tree rooted at the empty
//! word (pattern 0); `child[a]` is the pattern of `word · a` when that is
//! again a nontip.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::GroupError;

/// A word in the arrows.
pub type Word = SmallVec<[u8; 8]>;

/// One nontip monomial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathNode {
    /// The word spelling this path.
    pub word: Word,
    /// Pattern of the word without its last arrow.
    pub parent: Option<usize>,
    /// Last arrow of the word.
    pub last_arrow: Option<u8>,
    /// Pattern of `word · a` for each arrow `a`, if it is a nontip.
    pub child: SmallVec<[Option<usize>; 4]>,
    /// Length (weighted for Jennings orderings).
    pub dim: usize,
}

/// All nontips, indexed by pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathTree {
    nodes: Vec<PathNode>,
    index: FxHashMap<Word, usize>,
}

impl PathTree {
    /// Builds the tree from the nontip words in pattern order.
    ///
    /// # Errors
    ///
    /// Fails if the words are not prefix closed, repeat, mention an arrow
    /// out of range or do not start with the empty word.
    pub fn new(words: Vec<Word>, arrows: usize, dims: &[usize]) -> Result<Self, GroupError> {
        if words.first().map_or(true, |w| !w.is_empty()) {
            return Err(GroupError::Inconsistent("pattern 0 must be the empty word".into()));
        }
        let mut index = FxHashMap::default();
        let mut nodes: Vec<PathNode> = Vec::with_capacity(words.len());
        for (pattern, word) in words.into_iter().enumerate() {
            if let Some(&bad) = word.iter().find(|&&a| usize::from(a) >= arrows) {
                return Err(GroupError::malformed("arrow index", bad));
            }
            let (parent, last_arrow) = match word.split_last() {
                None => (None, None),
                Some((&last, prefix)) => {
                    let Some(&parent) = index.get(prefix) else {
                        return Err(GroupError::Inconsistent(format!(
                            "pattern {pattern} has no parent among earlier patterns"
                        )));
                    };
                    (Some(parent), Some(last))
                }
            };
            let dim = dims.get(pattern).copied().unwrap_or(word.len());
            if index.insert(word.clone(), pattern).is_some() {
                return Err(GroupError::Inconsistent(format!("pattern {pattern} repeats a word")));
            }
            if let (Some(parent), Some(last)) = (parent, last_arrow) {
                let node: &mut PathNode = &mut nodes[parent];
                node.child[usize::from(last)] = Some(pattern);
            }
            nodes.push(PathNode {
                word,
                parent,
                last_arrow,
                child: SmallVec::from_elem(None, arrows),
                dim,
            });
        }
        Ok(Self { nodes, index })
    }

    /// Number of nontips.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if there are no nontips at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node of a pattern.
    #[must_use]
    pub fn node(&self, pattern: usize) -> &PathNode {
        &self.nodes[pattern]
    }

    /// All nodes in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = &PathNode> {
        self.nodes.iter()
    }

    /// Looks up the pattern of a word.
    #[must_use]
    pub fn pattern_of(&self, word: &[u8]) -> Option<usize> {
        self.index.get(word).copied()
    }

    /// Pattern of `pattern · a`, if it is a nontip.
    #[must_use]
    pub fn child(&self, pattern: usize, arrow: usize) -> Option<usize> {
        self.nodes[pattern].child[arrow]
    }

    /// Follows `word` from `pattern`, returning the pattern of the product.
    #[must_use]
    pub fn walk(&self, pattern: usize, word: &[u8]) -> Option<usize> {
        word.iter()
            .try_fold(pattern, |at, &a| self.child(at, usize::from(a)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn v4_words() -> Vec<Word> {
        vec![smallvec![], smallvec![0], smallvec![1], smallvec![0, 1]]
    }

    #[test]
    fn test_links() {
        let tree = PathTree::new(v4_words(), 2, &[0, 1, 1, 2]).unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.child(0, 0), Some(1));
        assert_eq!(tree.child(1, 1), Some(3));
        assert_eq!(tree.child(2, 0), None);
        assert_eq!(tree.node(3).parent, Some(1));
        assert_eq!(tree.node(3).last_arrow, Some(1));
        assert_eq!(tree.walk(0, &[0, 1]), Some(3));
        assert_eq!(tree.walk(0, &[1, 0]), None);
        assert_eq!(tree.pattern_of(&[1]), Some(2));
    }

    #[test]
    fn test_rejects_missing_parent() {
        let words: Vec<Word> = vec![smallvec![], smallvec![0, 1]];
        assert!(PathTree::new(words, 2, &[]).is_err());
    }

    #[test]
    fn test_rejects_bad_arrow() {
        let words: Vec<Word> = vec![smallvec![], smallvec![3]];
        assert!(PathTree::new(words, 2, &[]).is_err());
    }
}
