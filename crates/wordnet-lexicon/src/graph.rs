//! Relation traversal over synsets.
//!
//! Pointers are `(offset, pos)` handles. Following one means decoding the
//! target line again through [`SenseGraph::decode`]; nothing is cached by
//! offset.
//!
//! Two behaviours here are inherited and kept on purpose, with tests pinning
//! them:
//! - targets are decoded in the category of the synset being traversed
//!   (`id.pos`), not the category letter stored in the pointer, and expanded
//!   ancestors are decoded in the category of the origin;
//! - the ancestor walk pops from a stack, so the depth recorded for a node is
//!   the depth at which this walk first reached it, which is not always the
//!   shortest path in the graph.

use std::collections::HashSet;

use tracing::debug;
use wordnet_db::{Result, WordNet};
use wordnet_types::{Pos, RelationKind, Synset, SynsetId};

/// Ancestors reached by [`SenseGraph::expanded_hypernyms_depth`].
#[derive(Clone, Debug, Default)]
pub struct HypernymDepths {
    /// Each ancestor with the depth at which the walk first visited it, in
    /// visit order. Direct hypernyms have depth 1.
    pub ancestors: Vec<(Synset, usize)>,
    pub max_depth: usize,
}

/// Anything that can turn a synset handle into a decoded synset.
///
/// Implementors provide [`decode`](SenseGraph::decode); relation accessors
/// and ancestor expansion come for free.
pub trait SenseGraph {
    /// Decode the synset at `offset` in `data.<pos>`.
    fn decode(&self, pos: Pos, offset: u32) -> Result<Synset>;

    /// Every pointer of `sense` carrying `symbol`, decoded in file order.
    fn relation(&self, sense: &Synset, symbol: &str) -> Result<Vec<Synset>> {
        sense
            .pointers_with(symbol)
            .map(|ptr| self.decode(sense.id.pos, ptr.target.offset))
            .collect()
    }

    fn relation_kind(&self, sense: &Synset, kind: RelationKind) -> Result<Vec<Synset>> {
        self.relation(sense, kind.symbol())
    }

    fn antonyms(&self, sense: &Synset) -> Result<Vec<Synset>> {
        self.relation_kind(sense, RelationKind::Antonym)
    }

    fn hypernyms(&self, sense: &Synset) -> Result<Vec<Synset>> {
        self.relation_kind(sense, RelationKind::Hypernym)
    }

    fn hyponyms(&self, sense: &Synset) -> Result<Vec<Synset>> {
        self.relation_kind(sense, RelationKind::Hyponym)
    }

    /// Hypernyms followed by hyponyms, without deduplication.
    fn synonyms(&self, sense: &Synset) -> Result<Vec<Synset>> {
        let mut out = self.hypernyms(sense)?;
        out.extend(self.hyponyms(sense)?);
        Ok(out)
    }

    /// The first hypernym, if any.
    fn hypernym(&self, sense: &Synset) -> Result<Option<Synset>> {
        sense
            .pointers_with(RelationKind::Hypernym.symbol())
            .next()
            .map(|ptr| self.decode(sense.id.pos, ptr.target.offset))
            .transpose()
    }

    /// Every ancestor reachable through hypernym pointers.
    ///
    /// Walks a LIFO worklist seeded with the direct hypernyms and skips
    /// offsets already visited, so cycles and diamonds terminate. Results
    /// are re-decoded in the origin's category.
    fn expanded_hypernyms(&self, sense: &Synset) -> Result<Vec<Synset>> {
        let mut worklist = self.hypernyms(sense)?;
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        while let Some(parent) = worklist.pop() {
            if !visited.insert(parent.id.offset) {
                continue;
            }
            order.push(parent.id.offset);
            worklist.extend(self.hypernyms(&parent)?);
        }
        debug!(origin = %sense.id, ancestors = order.len(), "expanded hypernyms");
        order
            .into_iter()
            .map(|offset| self.decode(sense.id.pos, offset))
            .collect()
    }

    /// Same walk as [`expanded_hypernyms`](SenseGraph::expanded_hypernyms),
    /// recording the depth of each ancestor at its first visit and the
    /// largest depth seen.
    fn expanded_hypernyms_depth(&self, sense: &Synset) -> Result<HypernymDepths> {
        let mut worklist: Vec<(Synset, usize)> = self
            .hypernyms(sense)?
            .into_iter()
            .map(|parent| (parent, 1))
            .collect();
        let mut visited = HashSet::new();
        let mut out = HypernymDepths::default();
        while let Some((parent, depth)) = worklist.pop() {
            if !visited.insert(parent.id.offset) {
                continue;
            }
            out.max_depth = out.max_depth.max(depth);
            worklist.extend(
                self.hypernyms(&parent)?
                    .into_iter()
                    .map(|grandparent| (grandparent, depth + 1)),
            );
            out.ancestors.push((parent, depth));
        }
        Ok(out)
    }

    /// Follow only the first hypernym at each step until the chain ends or
    /// comes back to an offset already listed.
    fn expanded_first_hypernyms(&self, sense: &Synset) -> Result<Vec<Synset>> {
        let mut order: Vec<u32> = Vec::new();
        let mut parent = self.hypernym(sense)?;
        while let Some(current) = parent {
            if order.contains(&current.id.offset) {
                break;
            }
            order.push(current.id.offset);
            parent = self.hypernym(&current)?;
        }
        order
            .into_iter()
            .map(|offset| self.decode(sense.id.pos, offset))
            .collect()
    }
}

impl SenseGraph for WordNet {
    fn decode(&self, pos: Pos, offset: u32) -> Result<Synset> {
        self.get_synset(SynsetId { pos, offset })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use wordnet_db::DbError;
    use wordnet_types::{Gloss, Pointer, SynsetType, SynsetWord};

    use super::*;

    /// In-memory graph keyed by offset; records every decode request.
    #[derive(Default)]
    struct FakeGraph {
        nodes: HashMap<u32, (Vec<&'static str>, Vec<(&'static str, u32, Pos)>)>,
        decoded: RefCell<Vec<(Pos, u32)>>,
    }

    impl FakeGraph {
        fn node(mut self, offset: u32, word: &'static str, edges: &[(&'static str, u32)]) -> Self {
            let edges = edges.iter().map(|(sym, to)| (*sym, *to, Pos::Noun)).collect();
            self.nodes.insert(offset, (vec![word], edges));
            self
        }

        fn edge_to(mut self, from: u32, symbol: &'static str, to: u32, pos: Pos) -> Self {
            if let Some((_, edges)) = self.nodes.get_mut(&from) {
                edges.push((symbol, to, pos));
            }
            self
        }

        fn offsets(senses: &[Synset]) -> Vec<u32> {
            senses.iter().map(|s| s.id.offset).collect()
        }
    }

    impl SenseGraph for FakeGraph {
        fn decode(&self, pos: Pos, offset: u32) -> Result<Synset> {
            self.decoded.borrow_mut().push((pos, offset));
            let (words, edges) = self.nodes.get(&offset).ok_or_else(|| {
                DbError::MalformedRecord {
                    context: format!("{pos}@{offset}"),
                    reason: "no such offset".into(),
                }
            })?;
            Ok(Synset {
                id: SynsetId { pos, offset },
                lex_filenum: 0,
                synset_type: SynsetType::Noun,
                words: words
                    .iter()
                    .map(|w| SynsetWord {
                        text: w.to_string(),
                        lex_id: 0,
                    })
                    .collect(),
                pointers: edges
                    .iter()
                    .map(|(symbol, to, target_pos)| Pointer {
                        symbol: symbol.to_string(),
                        target: SynsetId {
                            pos: *target_pos,
                            offset: *to,
                        },
                        src_word: None,
                        dst_word: None,
                    })
                    .collect(),
                frames: Vec::new(),
                gloss: Gloss::parse(words[0]),
            })
        }
    }

    /// dog -> {canine, pet}; canine -> animal; pet -> animal; animal -> entity.
    fn diamond() -> FakeGraph {
        FakeGraph::default()
            .node(1, "dog", &[("@", 2), ("@", 3), ("~", 6), ("!", 7)])
            .node(2, "canine", &[("@", 4)])
            .node(3, "pet", &[("@", 4)])
            .node(4, "animal", &[("@", 5)])
            .node(5, "entity", &[])
            .node(6, "puppy", &[("@", 1)])
            .node(7, "cat", &[])
    }

    #[test]
    fn relation_accessors_filter_by_symbol() {
        let g = diamond();
        let dog = g.decode(Pos::Noun, 1).unwrap();
        assert_eq!(FakeGraph::offsets(&g.hypernyms(&dog).unwrap()), vec![2, 3]);
        assert_eq!(FakeGraph::offsets(&g.hyponyms(&dog).unwrap()), vec![6]);
        assert_eq!(FakeGraph::offsets(&g.antonyms(&dog).unwrap()), vec![7]);
        assert_eq!(FakeGraph::offsets(&g.relation(&dog, "#m").unwrap()), Vec::<u32>::new());
        assert_eq!(g.hypernym(&dog).unwrap().unwrap().id.offset, 2);
    }

    #[test]
    fn synonyms_concatenate_without_dedup() {
        let g = FakeGraph::default()
            .node(1, "a", &[("~", 2), ("@", 2), ("@", 3)])
            .node(2, "b", &[])
            .node(3, "c", &[]);
        let a = g.decode(Pos::Noun, 1).unwrap();
        let mut expected = g.hypernyms(&a).unwrap();
        expected.extend(g.hyponyms(&a).unwrap());
        let synonyms = g.synonyms(&a).unwrap();
        assert_eq!(synonyms, expected);
        assert_eq!(FakeGraph::offsets(&synonyms), vec![2, 3, 2]);
    }

    #[test]
    fn expansion_visits_each_ancestor_once() {
        let g = diamond();
        let dog = g.decode(Pos::Noun, 1).unwrap();
        let ancestors = g.expanded_hypernyms(&dog).unwrap();
        // Stack order: pet (3) is popped before canine (2).
        assert_eq!(FakeGraph::offsets(&ancestors), vec![3, 4, 5, 2]);
    }

    #[test]
    fn expansion_terminates_on_cycles_back_to_origin() {
        let g = FakeGraph::default()
            .node(1, "chicken", &[("@", 2)])
            .node(2, "egg", &[("@", 1)]);
        let chicken = g.decode(Pos::Noun, 1).unwrap();
        let ancestors = g.expanded_hypernyms(&chicken).unwrap();
        // The origin is not pre-seeded as visited, so the cycle lists it.
        assert_eq!(FakeGraph::offsets(&ancestors), vec![2, 1]);

        let depths = g.expanded_hypernyms_depth(&chicken).unwrap();
        let pairs: Vec<(u32, usize)> = depths
            .ancestors
            .iter()
            .map(|(s, d)| (s.id.offset, *d))
            .collect();
        assert_eq!(pairs, vec![(2, 1), (1, 2)]);
        assert_eq!(depths.max_depth, 2);

        let first = g.expanded_first_hypernyms(&chicken).unwrap();
        assert_eq!(FakeGraph::offsets(&first), vec![2, 1]);
    }

    #[test]
    fn self_loop_terminates() {
        let g = FakeGraph::default().node(1, "ouroboros", &[("@", 1)]);
        let s = g.decode(Pos::Noun, 1).unwrap();
        assert_eq!(FakeGraph::offsets(&g.expanded_hypernyms(&s).unwrap()), vec![1]);
        assert_eq!(FakeGraph::offsets(&g.expanded_first_hypernyms(&s).unwrap()), vec![1]);
    }

    #[test]
    fn depth_follows_traversal_order_not_shortest_path() {
        // origin -> {far, near}; far -> mid -> top; near -> top.
        // `near` is pushed last and popped first, so `top` is reached at
        // depth 2 through it. Swapping the pointer order reaches `top` via
        // `far` first at depth 3 even though a depth-2 path exists.
        let short_first = FakeGraph::default()
            .node(1, "origin", &[("@", 2), ("@", 3)])
            .node(2, "far", &[("@", 4)])
            .node(3, "near", &[("@", 5)])
            .node(4, "mid", &[("@", 5)])
            .node(5, "top", &[]);
        let origin = short_first.decode(Pos::Noun, 1).unwrap();
        let depths = short_first.expanded_hypernyms_depth(&origin).unwrap();
        let top = depths.ancestors.iter().find(|(s, _)| s.id.offset == 5).unwrap();
        assert_eq!(top.1, 2);
        assert_eq!(depths.max_depth, 2);

        let long_first = FakeGraph::default()
            .node(1, "origin", &[("@", 3), ("@", 2)])
            .node(2, "far", &[("@", 4)])
            .node(3, "near", &[("@", 5)])
            .node(4, "mid", &[("@", 5)])
            .node(5, "top", &[]);
        let origin = long_first.decode(Pos::Noun, 1).unwrap();
        let depths = long_first.expanded_hypernyms_depth(&origin).unwrap();
        let top = depths.ancestors.iter().find(|(s, _)| s.id.offset == 5).unwrap();
        assert_eq!(top.1, 3);
        assert_eq!(depths.ancestors.len(), 4);
    }

    #[test]
    fn traversal_decodes_in_the_source_category() {
        // The pointer says the target is a verb; the walk still asks for a noun.
        let g = FakeGraph::default()
            .node(1, "runner", &[])
            .edge_to(1, "@", 2, Pos::Verb)
            .node(2, "run", &[]);
        let runner = g.decode(Pos::Noun, 1).unwrap();
        assert_eq!(runner.pointers[0].target.pos, Pos::Verb);
        g.decoded.borrow_mut().clear();

        let parents = g.hypernyms(&runner).unwrap();
        assert_eq!(parents[0].id, SynsetId { pos: Pos::Noun, offset: 2 });
        assert_eq!(g.decoded.borrow().as_slice(), &[(Pos::Noun, 2)]);
    }

    #[test]
    fn expanded_ancestors_use_the_origin_category() {
        let g = diamond();
        let dog = g.decode(Pos::Adj, 1).unwrap();
        let ancestors = g.expanded_hypernyms(&dog).unwrap();
        assert!(ancestors.iter().all(|s| s.id.pos == Pos::Adj));
    }

    #[test]
    fn decode_failures_propagate() {
        let g = FakeGraph::default().node(1, "orphan", &[("@", 99)]);
        let orphan = g.decode(Pos::Noun, 1).unwrap();
        assert!(g.hypernyms(&orphan).unwrap_err().is_malformed());
        assert!(g.expanded_hypernyms(&orphan).unwrap_err().is_malformed());
    }
}
