//! Path finding algorithms

use super::types::{Direction, PathResult};
use crate::graph::{EntityId, GraphEngine};
use std::collections::{HashMap, HashSet, VecDeque};

/// Query for the shortest (fewest hops) path between two entities
#[derive(Debug, Clone)]
pub struct PathQuery {
    /// Source entity
    pub source: EntityId,
    /// Target entity
    pub target: EntityId,
    /// Maximum path length to search; unbounded when `None`
    pub max_length: Option<usize>,
    /// Direction to traverse edges
    pub direction: Direction,
}

impl PathQuery {
    /// Create a new path query between two entities
    pub fn between(source: EntityId, target: EntityId) -> Self {
        Self {
            source,
            target,
            max_length: None,
            direction: Direction::Outgoing,
        }
    }

    /// Set maximum path length
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Set traversal direction
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Execute the path query (BFS for shortest path)
    pub fn execute(&self, engine: &GraphEngine) -> PathResult {
        if !engine.contains(&self.source) || !engine.contains(&self.target) {
            return PathResult::not_found();
        }
        if self.source == self.target {
            return PathResult::found(vec![self.source.clone()]);
        }

        let mut visited: HashSet<&EntityId> = HashSet::new();
        let mut queue: VecDeque<&EntityId> = VecDeque::new();
        let mut predecessors: HashMap<&EntityId, &EntityId> = HashMap::new();

        visited.insert(&self.source);
        queue.push_back(&self.source);

        let mut depth = 0;
        while !queue.is_empty() && self.max_length.map_or(true, |max| depth < max) {
            let level_size = queue.len();

            for _ in 0..level_size {
                let Some(current) = queue.pop_front() else {
                    break;
                };

                for neighbor in self.neighbors(engine, current) {
                    if !visited.insert(neighbor) {
                        continue;
                    }
                    predecessors.insert(neighbor, current);
                    if neighbor == &self.target {
                        return self.reconstruct_path(&predecessors);
                    }
                    queue.push_back(neighbor);
                }
            }

            depth += 1;
        }

        PathResult::not_found()
    }

    /// Neighbours of a node based on direction, in a stable order
    fn neighbors<'e>(&self, engine: &'e GraphEngine, id: &EntityId) -> Vec<&'e EntityId> {
        match self.direction {
            Direction::Outgoing => engine.successors(id).into_iter().collect(),
            Direction::Incoming => engine.predecessors(id).into_iter().collect(),
            Direction::Both => {
                let mut all = engine.successors(id);
                all.extend(engine.predecessors(id));
                all.into_iter().collect()
            }
        }
    }

    /// Reconstruct the path from the predecessors map
    fn reconstruct_path(&self, predecessors: &HashMap<&EntityId, &EntityId>) -> PathResult {
        let mut path = vec![self.target.clone()];
        let mut current = &self.target;

        while let Some(&pred) = predecessors.get(current) {
            path.push(pred.clone());
            current = pred;
        }

        path.reverse();
        PathResult::found(path)
    }
}
