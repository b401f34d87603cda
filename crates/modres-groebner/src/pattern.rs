//! Pattern tries: which reduced vector covers each free-module monomial.
//!
//! For every block `b` and pattern `m` there is one node. A covered node
//! knows its divisor `R` and the quotient `u` (as a pattern, `qi`) with
//! `lead(R) · u = m`, so its node vector is `R · u`. `child[a]` links to
//! the node of `m · a` when that node was covered through this one.

use std::collections::VecDeque;

use modres_algebra::Group;
use smallvec::SmallVec;

use crate::error::BuchbergerError;
use crate::reduced::RvId;

/// Pattern of the empty word.
pub const ROOT: usize = 0;

/// Whether a node is covered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeStatus {
    /// No leading term divides this monomial.
    NoDivisor,
    /// Some reduced vector's leading term divides it.
    HasDivisor,
}

/// One free-module monomial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternNode {
    /// The covering reduced vector.
    pub divisor: Option<RvId>,
    /// Quotient pattern: this monomial is the divisor's lead times `qi`.
    pub qi: usize,
    /// Pattern of `m · a`, if covered through this node.
    pub child: SmallVec<[Option<usize>; 4]>,
}

impl PatternNode {
    /// Coverage status.
    #[must_use]
    pub fn status(&self) -> NodeStatus {
        if self.divisor.is_some() {
            NodeStatus::HasDivisor
        } else {
            NodeStatus::NoDivisor
        }
    }
}

/// The tries of all `blocks` blocks, stored flat.
#[derive(Clone, Debug)]
pub struct PatternTrie {
    nontips: usize,
    nodes: Vec<PatternNode>,
}

impl PatternTrie {
    /// Creates uncovered tries.
    #[must_use]
    pub fn new(blocks: usize, nontips: usize, arrows: usize) -> Self {
        let empty = PatternNode {
            divisor: None,
            qi: ROOT,
            child: SmallVec::from_elem(None, arrows),
        };
        Self {
            nontips,
            nodes: vec![empty; blocks * nontips],
        }
    }

    /// The node of `(block, pattern)`.
    #[must_use]
    pub fn node(&self, block: usize, pattern: usize) -> &PatternNode {
        &self.nodes[block * self.nontips + pattern]
    }

    /// Coverage status of `(block, pattern)`.
    #[must_use]
    pub fn status(&self, block: usize, pattern: usize) -> NodeStatus {
        self.node(block, pattern).status()
    }

    /// Number of uncovered nodes.
    #[must_use]
    pub fn uncovered(&self) -> usize {
        self.nodes.iter().filter(|n| n.divisor.is_none()).count()
    }

    /// Covers `(block, lead)` with `rv` and then, breadth first, every
    /// uncovered extension reachable through covered children. Returns the
    /// number of newly covered nodes.
    ///
    /// # Errors
    ///
    /// Fails if the lead is already covered or a quotient leaves the
    /// nontips, either of which means the reduction went wrong.
    pub fn cover(
        &mut self,
        group: &Group,
        rv: RvId,
        block: usize,
        lead: usize,
    ) -> Result<usize, BuchbergerError> {
        let base = block * self.nontips;
        let paths = group.paths();
        {
            let root = &mut self.nodes[base + lead];
            if root.divisor.is_some() {
                return Err(BuchbergerError::Inconsistent(format!(
                    "leading term (block {block}, pattern {lead}) is already covered"
                )));
            }
            root.divisor = Some(rv);
            root.qi = ROOT;
        }

        let mut covered = 1;
        let mut queue = VecDeque::from([lead]);
        while let Some(m) = queue.pop_front() {
            let qi = self.nodes[base + m].qi;
            for a in 0..group.arrows() {
                let Some(c) = paths.child(m, a) else {
                    continue;
                };
                if self.nodes[base + c].divisor.is_some() {
                    continue;
                }
                let quotient = paths.child(qi, a).ok_or_else(|| {
                    BuchbergerError::Inconsistent(format!("quotient of pattern {c} is a tip"))
                })?;
                let node = &mut self.nodes[base + c];
                node.divisor = Some(rv);
                node.qi = quotient;
                self.nodes[base + m].child[a] = Some(c);
                covered += 1;
                queue.push_back(c);
            }
        }
        Ok(covered)
    }
}
