use crate::board::{GameRules, PlayerId};
use crate::config::MctsConfig;
use crate::error::MctsError;
use crate::mcts_node::MctsNode;
use crate::random::{RandomSource, StandardRandomSource};
use crate::tree::SearchTree;
use ego_tree::NodeId;
use tracing::{debug, trace, warn};

/// The search tree for the states and moves of the game `R`.
pub type GameTree<R> = SearchTree<<R as GameRules>::State, <R as GameRules>::Move>;

/// Runs Monte Carlo tree search for one game.
///
/// Every call to [`MonteCarloTreeSearch::search`] builds a fresh tree from the
/// given position, spends the configured budget on it and throws it away once
/// the move is picked. Nothing carries over between calls except the state of
/// the random source.
pub struct MonteCarloTreeSearch<R: GameRules, K: RandomSource> {
    rules: R,
    random: K,
    config: MctsConfig,
}

/// A builder for creating instances of `MonteCarloTreeSearch`.
pub struct MonteCarloTreeSearchBuilder<R: GameRules, K: RandomSource> {
    rules: R,
    random: K,
    config: MctsConfig,
}

impl<R: GameRules> MonteCarloTreeSearchBuilder<R, StandardRandomSource> {
    /// Creates a builder with the default configuration and an OS-seeded random source.
    pub fn new(rules: R) -> Self {
        Self {
            rules,
            random: StandardRandomSource::default(),
            config: MctsConfig::default(),
        }
    }
}

impl<R: GameRules, K: RandomSource> MonteCarloTreeSearchBuilder<R, K> {
    /// Replaces the random source. All random choices of the search go through it.
    pub fn with_random_source<K2: RandomSource>(
        self,
        random: K2,
    ) -> MonteCarloTreeSearchBuilder<R, K2> {
        MonteCarloTreeSearchBuilder {
            rules: self.rules,
            random,
            config: self.config,
        }
    }

    /// Sets the exploration constant used by UCT.
    pub fn with_exploration_constant(mut self, exploration_constant: f64) -> Self {
        self.config.exploration_constant = exploration_constant;
        self
    }

    /// Sets the number of iterations spent on each decision.
    pub fn with_budget(mut self, budget: u32) -> Self {
        self.config.budget = budget;
        self
    }

    /// Sets the player the search decides for.
    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.config.player = player;
        self
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: MctsConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates the configuration and builds the search.
    pub fn build(self) -> Result<MonteCarloTreeSearch<R, K>, MctsError> {
        self.config.validate()?;
        Ok(MonteCarloTreeSearch {
            rules: self.rules,
            random: self.random,
            config: self.config,
        })
    }
}

/// What one select/expand/simulate/backpropagate cycle did.
#[derive(Debug, Clone, PartialEq)]
pub struct Iteration<M> {
    /// Moves from the root to the node the simulation started from.
    pub path: Vec<M>,
    /// Whether a new node was added to the tree.
    pub expanded: bool,
    /// Outcome of the simulation.
    pub winner: Option<PlayerId>,
}

impl<R: GameRules> MonteCarloTreeSearch<R, StandardRandomSource> {
    /// Returns a new builder for `MonteCarloTreeSearch`.
    pub fn builder(rules: R) -> MonteCarloTreeSearchBuilder<R, StandardRandomSource> {
        MonteCarloTreeSearchBuilder::new(rules)
    }
}

impl<R: GameRules, K: RandomSource> MonteCarloTreeSearch<R, K> {
    /// Returns the configuration the search was built with.
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Returns the rules of the game being searched.
    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// Searches from `state` for the configured budget and returns the move
    /// of the most visited root child.
    pub fn search(&mut self, state: &R::State) -> Result<R::Move, MctsError> {
        let tree = self.build_tree(state.clone())?;
        let best = robust_child(&tree, &mut self.random)?;

        let visits = tree
            .find_child(tree.root_id(), &best)
            .and_then(|id| tree.get(id))
            .map_or(0, |node| node.num_rollouts);
        debug!(
            player = %self.config.player,
            budget = self.config.budget,
            nodes = tree.node_count(),
            chosen = ?best,
            visits,
            "search finished"
        );

        Ok(best)
    }

    /// Builds a fresh tree rooted at `state` and runs the full budget on it.
    pub fn build_tree(&mut self, state: R::State) -> Result<GameTree<R>, MctsError> {
        let mut tree = SearchTree::new(state);
        self.iterate_n_times(&mut tree, self.config.budget)?;
        Ok(tree)
    }

    /// Runs `n` iterations on `tree`, stopping at the first error.
    pub fn iterate_n_times(&mut self, tree: &mut GameTree<R>, n: u32) -> Result<(), MctsError> {
        for iteration in 0..n {
            let Iteration {
                path,
                expanded,
                winner,
            } = self.iterate(tree)?;
            trace!(iteration, depth = path.len(), expanded, winner = ?winner, "iteration done");
        }
        Ok(())
    }

    /// Performs one full iteration: selection, expansion, simulation and
    /// backpropagation.
    pub fn iterate(&mut self, tree: &mut GameTree<R>) -> Result<Iteration<R::Move>, MctsError> {
        let (mut path, selected) = self.select(tree)?;

        let (leaf, expanded) = match self.expand(tree, selected)? {
            Some((mv, child)) => {
                path.push(mv);
                (child, true)
            }
            None => (selected, false),
        };

        let leaf = tree.get(leaf).ok_or(MctsError::UnknownNode)?;
        let winner = self.simulate(&leaf.state)?;
        tree.backpropagate(winner, &path, None)?;

        Ok(Iteration {
            path,
            expanded,
            winner,
        })
    }

    /// Descends from the root until it reaches a node that is terminal or
    /// still has an unexplored move, and returns the path to it with its id.
    ///
    /// At each fully expanded node the child with the highest UCT value is
    /// taken, using the node's own rollout count as the parent total. Ties
    /// are broken through the random source. A fully expanded node whose
    /// children cannot be ranked is reported as
    /// [`MctsError::InconsistentStatistics`].
    fn select(&mut self, tree: &GameTree<R>) -> Result<(Vec<R::Move>, NodeId), MctsError> {
        let exploration = self.config.exploration_constant;
        let mut path = Vec::new();
        let mut current = tree.root_id();

        loop {
            let node = tree.get(current).ok_or(MctsError::UnknownNode)?;
            let moves = self.rules.checked_moves(&node.state)?;
            let children = tree.child_ids(current);
            if moves.is_empty() || children.len() < moves.len() {
                return Ok((path, current));
            }

            let parent_rollouts = f64::from(node.num_rollouts);
            let mut best_value = f64::NEG_INFINITY;
            let mut best = Vec::new();
            for id in children {
                let child = tree.get(id).ok_or(MctsError::UnknownNode)?;
                let value = child.uct(exploration, parent_rollouts);
                if value.is_nan() {
                    return Err(MctsError::InconsistentStatistics { depth: path.len() });
                }
                if value > best_value {
                    best_value = value;
                    best.clear();
                    best.push(id);
                } else if value == best_value {
                    best.push(id);
                }
            }

            let Some(&next) = self.random.choose(&best) else {
                return Err(MctsError::InconsistentStatistics { depth: path.len() });
            };
            let mv = tree
                .get(next)
                .and_then(|child| child.prev_move.clone())
                .ok_or(MctsError::UnknownNode)?;
            path.push(mv);
            current = next;
        }
    }

    /// Attaches one child for a random unexplored move of `node_id`.
    ///
    /// Returns the move and the new child, or `None` when the node is
    /// terminal or has nothing left to explore.
    fn expand(
        &mut self,
        tree: &mut GameTree<R>,
        node_id: NodeId,
    ) -> Result<Option<(R::Move, NodeId)>, MctsError> {
        let node = tree.get(node_id).ok_or(MctsError::UnknownNode)?;
        let moves = self.rules.checked_moves(&node.state)?;
        if moves.is_empty() {
            return Ok(None);
        }

        let children = tree.children_of(node_id).ok_or(MctsError::UnknownNode)?;
        let explored: Vec<&R::Move> = children
            .iter()
            .filter_map(|child| child.prev_move.as_ref())
            .collect();
        let unexplored: Vec<R::Move> = moves
            .into_iter()
            .filter(|mv| !explored.contains(&mv))
            .collect();

        let Some(mv) = self.random.choose(&unexplored).cloned() else {
            warn!(
                children = explored.len(),
                "selected node has no unexplored moves"
            );
            return Ok(None);
        };

        let state = self.rules.apply_move(&node.state, &mv);
        let child = tree.append_child(node_id, MctsNode::child(mv.clone(), state))?;
        Ok(Some((mv, child)))
    }

    /// Plays uniformly random moves from `state` until the game ends and
    /// returns the winner.
    fn simulate(&mut self, state: &R::State) -> Result<Option<PlayerId>, MctsError> {
        let mut state = state.clone();
        loop {
            let moves = self.rules.checked_moves(&state)?;
            let Some(mv) = self.random.choose(&moves) else {
                return Ok(self.rules.check_win(&state));
            };
            state = self.rules.apply_move(&state, mv);
        }
    }

    /// Turns this search into a reusable decision function.
    pub fn into_agent(mut self) -> impl FnMut(&R::State) -> Result<R::Move, MctsError> {
        move |state: &R::State| self.search(state)
    }
}

/// Picks the move of the root child with the most rollouts, breaking ties
/// through `random`.
///
/// Visit counts are a steadier signal than average results once the budget
/// is spent, since a move with few visits can have a lucky average.
pub fn robust_child<S, M: Clone>(
    tree: &SearchTree<S, M>,
    random: &mut impl RandomSource,
) -> Result<M, MctsError> {
    let children = tree.children_of(tree.root_id()).unwrap_or_default();
    let most = children
        .iter()
        .map(|child| child.num_rollouts)
        .max()
        .ok_or(MctsError::NoMoveAvailable)?;

    let candidates: Vec<&MctsNode<S, M>> = children
        .into_iter()
        .filter(|child| child.num_rollouts == most)
        .collect();

    random
        .choose(&candidates)
        .and_then(|child| child.prev_move.clone())
        .ok_or(MctsError::NoMoveAvailable)
}

/// Builds a decision function that runs an independent search, with
/// `budget` iterations, each time it is called.
pub fn make_agent<R: GameRules>(
    exploration_constant: f64,
    rules: R,
    player: PlayerId,
    budget: u32,
) -> Result<impl FnMut(&R::State) -> Result<R::Move, MctsError>, MctsError> {
    let mcts = MonteCarloTreeSearch::builder(rules)
        .with_config(MctsConfig::new(exploration_constant, player, budget))
        .build()?;
    Ok(mcts.into_agent())
}
