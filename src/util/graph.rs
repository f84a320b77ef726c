use {
    num::Zero,
    std::{
        cmp::Ordering,
        collections::{BinaryHeap, HashMap},
        hash::Hash,
        ops::Add,
    },
};

pub struct OpenSetElement<V, C>(pub V, pub C);

impl<V: Clone + PartialEq, C: Clone + Ord> PartialEq for OpenSetElement<V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.1 == other.1
    }
}

impl<V: Clone + PartialEq, C: Clone + Ord> PartialOrd for OpenSetElement<V, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        // Reverse the order so that cost is minimized when popping from the heap
        Some(other.1.cmp(&self.1))
    }
}

impl<V: Clone + PartialEq, C: Clone + Ord> Eq for OpenSetElement<V, C> {}

impl<V: Clone + PartialEq, C: Clone + Ord> Ord for OpenSetElement<V, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse the order so that cost is minimized when popping from the heap
        other.1.cmp(&self.1)
    }
}

/// An implementation of https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm over an implicitly
/// defined graph.
///
/// `BinaryHeap` has no decrease-key operation, so the open set uses lazy deletion: when a cheaper
/// path to an already-queued vertex is found, a second element is pushed for it, and the stale
/// element is skipped when it eventually surfaces. The best-known-cost map lives only for the
/// duration of one `run` call.
pub trait Dijkstra {
    type Vertex: Clone + Eq + Hash;
    type Cost: Add<Self::Cost, Output = Self::Cost> + Clone + Ord + Sized + Zero;

    fn start(&self) -> &Self::Vertex;
    fn is_end(&self, vertex: &Self::Vertex) -> bool;

    /// The cost is from `vertex` to the neighbor.
    fn neighbors(
        &self,
        vertex: &Self::Vertex,
        neighbors: &mut Vec<OpenSetElement<Self::Vertex, Self::Cost>>,
    );

    fn run(&self) -> Option<Self::Cost> {
        let mut best_costs: HashMap<Self::Vertex, Self::Cost> = HashMap::new();
        let mut open_set_heap: BinaryHeap<OpenSetElement<Self::Vertex, Self::Cost>> =
            BinaryHeap::new();
        let mut neighbors: Vec<OpenSetElement<Self::Vertex, Self::Cost>> = Vec::new();
        let start: Self::Vertex = self.start().clone();

        best_costs.insert(start.clone(), Self::Cost::zero());
        open_set_heap.push(OpenSetElement(start, Self::Cost::zero()));

        while let Some(OpenSetElement(current, start_to_current)) = open_set_heap.pop() {
            if self.is_end(&current) {
                return Some(start_to_current);
            }

            // A cheaper element for `current` was pushed while this one sat in the heap
            if best_costs
                .get(&current)
                .map_or(false, |best_cost| *best_cost < start_to_current)
            {
                continue;
            }

            self.neighbors(&current, &mut neighbors);

            for OpenSetElement(neighbor, current_to_neighbor) in neighbors.drain(..) {
                let start_to_neighbor: Self::Cost =
                    start_to_current.clone() + current_to_neighbor;

                if best_costs
                    .get(&neighbor)
                    .map_or(true, |best_cost| start_to_neighbor < *best_cost)
                {
                    best_costs.insert(neighbor.clone(), start_to_neighbor.clone());
                    open_set_heap.push(OpenSetElement(neighbor, start_to_neighbor));
                }
            }
        }

        None
    }
}
