//! Upper Confidence Bound applied to Trees (Kocsis and Szepesvári).

use crate::tree::SearchTree;
use ego_tree::NodeId;

/// UCT value of a child with `num_rollouts` visits and accumulated `score`,
/// under a parent visited `parent_rollouts` times.
///
/// Unvisited children score `+inf`, so every move is tried once before the
/// average result starts to matter.
pub fn uct(exploration: f64, parent_rollouts: f64, num_rollouts: u32, score: i64) -> f64 {
    if num_rollouts == 0 {
        return f64::INFINITY;
    }

    let n = f64::from(num_rollouts);
    score as f64 / n + exploration * (parent_rollouts.ln() / n).sqrt()
}

/// Index of the child of `node_id` with the highest UCT value, or `None` if it
/// has no children. The first child wins ties.
///
/// The parent total here is the sum of the children's rollouts. Selection
/// instead uses the parent's stored `num_rollouts`; the two agree as long as
/// every rollout through a node also went through one of its children, which
/// is not checked. Returns `None` for an unknown node.
pub fn best_child_by_uct<S, M>(
    exploration: f64,
    tree: &SearchTree<S, M>,
    node_id: NodeId,
) -> Option<usize> {
    let children = tree.children_of(node_id)?;
    let total: u32 = children.iter().map(|child| child.num_rollouts).sum();
    let total = f64::from(total);

    let mut best: Option<(usize, f64)> = None;
    for (index, child) in children.iter().enumerate() {
        let value = child.uct(exploration, total);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((index, value)),
        }
    }

    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcts_node::MctsNode;
    use proptest::prelude::*;

    fn tree_with_children(stats: &[(u32, i64)]) -> SearchTree<(), u8> {
        let mut tree = SearchTree::new(());
        let root = tree.root_id();
        for (index, &(num_rollouts, score)) in stats.iter().enumerate() {
            tree.append_child(
                root,
                MctsNode::child(index as u8, ()).with_stats(num_rollouts, score),
            )
            .unwrap();
        }
        tree
    }

    #[test]
    fn uct_matches_formula() {
        assert_eq!(uct(1.0, 8f64.exp(), 2, 1), 2.5);
    }

    #[test]
    fn uct_of_unvisited_node_is_infinite() {
        assert_eq!(uct(1.0, 8f64.exp(), 0, 0), f64::INFINITY);
        assert_eq!(uct(0.3, 0.0, 0, 0), f64::INFINITY);
    }

    #[test]
    fn best_child_of_single_child() {
        let tree = tree_with_children(&[(2, 1)]);
        assert_eq!(best_child_by_uct(1.5, &tree, tree.root_id()), Some(0));
    }

    #[test]
    fn best_child_prefers_higher_uct() {
        let tree = tree_with_children(&[(2, 1), (8, 3)]);
        assert_eq!(best_child_by_uct(1.5, &tree, tree.root_id()), Some(0));
    }

    #[test]
    fn best_child_prefers_unvisited() {
        let tree = tree_with_children(&[(2, 1), (0, 0)]);
        assert_eq!(best_child_by_uct(1.5, &tree, tree.root_id()), Some(1));
    }

    #[test]
    fn best_child_first_wins_ties() {
        let tree = tree_with_children(&[(0, 0), (0, 0), (0, 0)]);
        assert_eq!(best_child_by_uct(1.5, &tree, tree.root_id()), Some(0));
    }

    #[test]
    fn best_child_of_leaf_is_none() {
        let tree = tree_with_children(&[]);
        assert_eq!(best_child_by_uct(1.5, &tree, tree.root_id()), None);
    }

    proptest! {
        #[test]
        fn uct_is_finite_and_increasing_in_exploration(
            num_rollouts in 1u32..10_000,
            extra_parent in 0u32..10_000,
            score_ratio in -1.0f64..=1.0,
            c in 0.01f64..10.0,
            dc in 0.01f64..10.0,
        ) {
            let score = (f64::from(num_rollouts) * score_ratio).round() as i64;
            let parent = f64::from(num_rollouts + extra_parent + 1);

            let low = uct(c, parent, num_rollouts, score);
            let high = uct(c + dc, parent, num_rollouts, score);

            prop_assert!(low.is_finite());
            prop_assert!(high.is_finite());
            prop_assert!(high > low);
        }
    }
}
