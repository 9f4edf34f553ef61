//! Arena-backed search tree addressed by move paths.
//!
//! Nodes live in an [`ego_tree::Tree`], a single `Vec` indexed by [`NodeId`].
//! A path is the sequence of moves taken from the root; an empty path
//! addresses the root itself.

use crate::board::{PlayerId, TurnBased};
use crate::error::MctsError;
use crate::mcts_node::MctsNode;
use ego_tree::{NodeId, NodeRef, Tree};

/// The search tree built during one move decision.
#[derive(Debug, Clone)]
pub struct SearchTree<S, M> {
    tree: Tree<MctsNode<S, M>>,
}

impl<S, M> SearchTree<S, M> {
    /// Creates a single-node tree rooted at `state`.
    pub fn new(state: S) -> Self {
        Self::from_root(MctsNode::root(state))
    }

    /// Creates a single-node tree from an existing node, statistics included.
    pub fn from_root(root: MctsNode<S, M>) -> Self {
        Self {
            tree: Tree::new(root),
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.tree.root().id()
    }

    pub fn root(&self) -> &MctsNode<S, M> {
        self.tree.root().value()
    }

    /// Returns the node with the given id.
    pub fn get(&self, id: NodeId) -> Option<&MctsNode<S, M>> {
        self.tree.get(id).map(|node| node.value())
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        self.tree.root().descendants().count()
    }

    /// Ids of every node reachable from the root, in depth-first order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.tree.root().descendants().map(|node| node.id()).collect()
    }

    /// Ids of the children of `id`, in insertion order.
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.tree
            .get(id)
            .map(|node| node.children().map(|child| child.id()).collect())
            .unwrap_or_default()
    }

    /// The children of `id` in insertion order, or `None` for an unknown id.
    pub fn children_of(&self, id: NodeId) -> Option<Vec<&MctsNode<S, M>>> {
        let node = self.tree.get(id)?;
        Some(node.children().map(|child| child.value()).collect())
    }

    /// Attaches `node` as the last child of `parent` and returns its id.
    pub fn append_child(
        &mut self,
        parent: NodeId,
        node: MctsNode<S, M>,
    ) -> Result<NodeId, MctsError> {
        let mut parent = self.tree.get_mut(parent).ok_or(MctsError::UnknownNode)?;
        Ok(parent.append(node).id())
    }
}

impl<S, M: PartialEq> SearchTree<S, M> {
    /// Returns the child of `parent` reached by `mv`.
    pub fn find_child(&self, parent: NodeId, mv: &M) -> Option<NodeId> {
        self.tree
            .get(parent)?
            .children()
            .find(|child| child.value().prev_move.as_ref() == Some(mv))
            .map(|child| child.id())
    }

    /// Follows `path` from the root and returns the id of the node it ends at.
    pub fn walk(&self, path: &[M]) -> Result<NodeId, MctsError> {
        let mut current = self.root_id();
        for (depth, mv) in path.iter().enumerate() {
            current = self
                .find_child(current, mv)
                .ok_or(MctsError::InvalidPath { depth })?;
        }
        Ok(current)
    }

    /// Like [`SearchTree::walk`], but returns every node id on the way,
    /// starting with the root.
    pub fn trace(&self, path: &[M]) -> Result<Vec<NodeId>, MctsError> {
        let mut current = self.root_id();
        let mut ids = Vec::with_capacity(path.len() + 1);
        ids.push(current);
        for (depth, mv) in path.iter().enumerate() {
            current = self
                .find_child(current, mv)
                .ok_or(MctsError::InvalidPath { depth })?;
            ids.push(current);
        }
        Ok(ids)
    }

    /// The node addressed by `path`.
    pub fn node_at(&self, path: &[M]) -> Result<&MctsNode<S, M>, MctsError> {
        let id = self.walk(path)?;
        self.get(id).ok_or(MctsError::UnknownNode)
    }

    pub fn is_path_valid(&self, path: &[M]) -> bool {
        self.walk(path).is_ok()
    }
}

impl<S: Clone, M: Clone + PartialEq> SearchTree<S, M> {
    /// Copies the subtree addressed by `path` into a tree of its own.
    pub fn subtree(&self, path: &[M]) -> Result<SearchTree<S, M>, MctsError> {
        let id = self.walk(path)?;
        let source = self.tree.get(id).ok_or(MctsError::UnknownNode)?;

        let mut copy = Tree::new(source.value().clone());
        let mut pending = vec![(source, copy.root().id())];
        while let Some((source, target)) = pending.pop() {
            for child in source.children() {
                let mut parent = copy.get_mut(target).ok_or(MctsError::UnknownNode)?;
                let copied = parent.append(child.value().clone()).id();
                pending.push((child, copied));
            }
        }

        Ok(SearchTree { tree: copy })
    }

    /// Replaces the subtree addressed by `path` with `subtree`.
    ///
    /// An empty path replaces the whole tree. The replacement becomes the last
    /// child of its parent, so sibling order is not preserved. The replaced
    /// nodes stay allocated in the arena until the tree is dropped.
    pub fn update(&mut self, path: &[M], subtree: SearchTree<S, M>) -> Result<(), MctsError> {
        let Some((_, parent_path)) = path.split_last() else {
            *self = subtree;
            return Ok(());
        };

        let parent = self.walk(parent_path)?;
        let target = self.walk(path)?;

        self.tree
            .get_mut(target)
            .ok_or(MctsError::UnknownNode)?
            .detach();
        self.tree
            .get_mut(parent)
            .ok_or(MctsError::UnknownNode)?
            .append_subtree(subtree.tree);

        Ok(())
    }
}

impl<S: TurnBased, M: PartialEq> SearchTree<S, M> {
    /// Folds one simulation result into every node on `path`, root included.
    ///
    /// Each node gains one rollout. Its score moves by +1 if `who_won` is the
    /// player who made the move into it, by 0 on a draw, and by -1 otherwise.
    /// `previous_player` stands in for that player at the root; with `None`
    /// the root loses a point on every decisive result, and its score carries
    /// no meaning.
    ///
    /// The whole path is resolved before any node is touched, so an invalid
    /// path leaves the tree unchanged.
    pub fn backpropagate(
        &mut self,
        who_won: Option<PlayerId>,
        path: &[M],
        previous_player: Option<PlayerId>,
    ) -> Result<(), MctsError> {
        let ids = self.trace(path)?;

        let mut previous = previous_player;
        for id in ids {
            let mut node = self.tree.get_mut(id).ok_or(MctsError::UnknownNode)?;
            let node = node.value();
            node.num_rollouts += 1;
            node.score += result_for(who_won, previous);
            previous = Some(node.state.player_to_move());
        }

        Ok(())
    }
}

/// Result of a simulation from the point of view of `player`.
fn result_for(who_won: Option<PlayerId>, player: Option<PlayerId>) -> i64 {
    match who_won {
        None => 0,
        Some(winner) if Some(winner) == player => 1,
        Some(_) => -1,
    }
}

impl<S: PartialEq, M: PartialEq> PartialEq for SearchTree<S, M> {
    /// Structural equality: same node values with children in the same order.
    fn eq(&self, other: &Self) -> bool {
        let mut pending: Vec<(NodeRef<'_, MctsNode<S, M>>, NodeRef<'_, MctsNode<S, M>>)> =
            vec![(self.tree.root(), other.tree.root())];

        while let Some((left, right)) = pending.pop() {
            if left.value() != right.value() {
                return false;
            }

            let mut left_children = left.children();
            let mut right_children = right.children();
            loop {
                match (left_children.next(), right_children.next()) {
                    (Some(l), Some(r)) => pending.push((l, r)),
                    (None, None) => break,
                    _ => return false,
                }
            }
        }

        true
    }
}
