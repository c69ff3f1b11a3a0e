use log::{debug, info};
use serde::{Deserialize, Serialize};

/// One labelled drawing, stored flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub input: Vec<f64>,
    pub target: usize,
}

impl Example {
    pub fn new(input: Vec<f64>, target: usize) -> Example {
        Example { input, target }
    }
}

/// What `ReplayMemory::admit` does with an incoming example.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Push at the end.
    Append,
    /// The class is full: evict the class's oldest example (`slot`) and push
    /// the new one at the end, so storage order stays arrival order.
    ReplaceOldest { slot: usize },
    /// The append would bring memory to capacity: trim every class to its most
    /// recent examples, then push at the end. Since full classes take the
    /// `ReplaceOldest` path, this only drops examples from memory restored
    /// over its caps; otherwise it just regroups storage by class.
    RebalanceThenAppend,
}

/// Bounded, class-balanced store of past examples.
///
/// Holds at most `max_examples` entries and at most `max_per_class` per label.
/// Storage order is arrival order, except that a rebalance groups it by class.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayMemory {
    examples: Vec<Example>,
    classes: usize,
    max_examples: usize,
    max_per_class: usize,
}

impl ReplayMemory {
    pub fn new(classes: usize, max_examples: usize) -> ReplayMemory {
        ReplayMemory {
            examples: Vec::with_capacity(max_examples.min(1024)),
            classes,
            max_examples,
            max_per_class: max_examples / classes.max(1),
        }
    }

    /// Wraps examples restored from a snapshot, verbatim.
    pub fn from_examples(examples: Vec<Example>, classes: usize, max_examples: usize) -> ReplayMemory {
        let mut memory = ReplayMemory::new(classes, max_examples);
        memory.examples = examples;
        memory
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn max_examples(&self) -> usize {
        self.max_examples
    }

    pub fn max_per_class(&self) -> usize {
        self.max_per_class
    }

    pub fn count(&self, class: usize) -> usize {
        self.examples.iter().filter(|ex| ex.target == class).count()
    }

    /// Number of stored examples per class, indexed by label.
    pub fn distribution(&self) -> Vec<usize> {
        let mut counts = vec![0; self.classes];
        for ex in &self.examples {
            if let Some(c) = counts.get_mut(ex.target) {
                *c += 1;
            }
        }
        counts
    }

    /// Examples of `class`, in storage order.
    pub fn of_class(&self, class: usize) -> impl Iterator<Item = &Example> + '_ {
        self.examples.iter().filter(move |ex| ex.target == class)
    }

    pub fn clear(&mut self) {
        self.examples.clear();
    }

    /// Decides how an example of `target` would be admitted, without changing
    /// anything.
    pub fn plan(&self, target: usize) -> Admission {
        if self.count(target) >= self.max_per_class {
            if let Some(slot) = self.examples.iter().position(|ex| ex.target == target) {
                return Admission::ReplaceOldest { slot };
            }
        }
        if self.examples.len() + 1 >= self.max_examples {
            Admission::RebalanceThenAppend
        } else {
            Admission::Append
        }
    }

    /// Stores `example` under the capacity policy and reports which path was
    /// taken. Afterwards `len() <= max_examples` and every class holds at most
    /// `max_per_class` examples.
    pub fn admit(&mut self, example: Example) -> Admission {
        // Restored snapshots may not respect the caps yet.
        if self.exceeds_caps() {
            self.rebalance();
        }

        let admission = self.plan(example.target);
        match admission {
            Admission::ReplaceOldest { slot } => {
                debug!("class {} is full, evicting slot {slot}", example.target);
                self.examples.remove(slot);
                self.examples.push(example);
            }
            Admission::RebalanceThenAppend => {
                self.rebalance();
                self.examples.push(example);
            }
            Admission::Append => {
                self.examples.push(example);
            }
        }
        debug!(
            "example stored: total={} distribution={:?}",
            self.examples.len(),
            self.distribution()
        );
        admission
    }

    /// Keeps only the most recent `max_per_class` examples of every class.
    /// The result is grouped by class, each group in storage order.
    pub fn rebalance(&mut self) {
        let mut kept = Vec::with_capacity(self.examples.len().min(self.max_examples));
        for class in 0..self.classes {
            let of_class: Vec<&Example> = self.of_class(class).collect();
            let skip = of_class.len().saturating_sub(self.max_per_class);
            kept.extend(of_class.into_iter().skip(skip).cloned());
        }
        let dropped = self.examples.len() - kept.len();
        self.examples = kept;
        if dropped > 0 {
            info!(
                "replay memory rebalanced: dropped={dropped} distribution={:?}",
                self.distribution()
            );
        } else {
            debug!("replay memory regrouped by class, nothing dropped");
        }
    }

    fn exceeds_caps(&self) -> bool {
        self.examples.len() > self.max_examples
            || self.distribution().iter().any(|&c| c > self.max_per_class)
            || self.examples.iter().any(|ex| ex.target >= self.classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(id: usize, target: usize) -> Example {
        Example::new(vec![id as f64], target)
    }

    fn ids(memory: &ReplayMemory) -> Vec<usize> {
        memory.examples().iter().map(|ex| ex.input[0] as usize).collect()
    }

    #[test]
    fn appends_while_there_is_room() {
        let mut memory = ReplayMemory::new(4, 100);
        assert_eq!(memory.admit(marked(0, 1)), Admission::Append);
        assert_eq!(memory.admit(marked(1, 3)), Admission::Append);
        assert_eq!(ids(&memory), vec![0, 1]);
        assert_eq!(memory.distribution(), vec![0, 1, 0, 1]);
    }

    #[test]
    fn full_class_replaces_its_oldest_example() {
        let mut memory = ReplayMemory::new(4, 100);
        memory.admit(marked(100, 1));
        for id in 0..25 {
            memory.admit(marked(id, 0));
        }
        assert_eq!(memory.plan(0), Admission::ReplaceOldest { slot: 1 });
        assert_eq!(memory.admit(marked(25, 0)), Admission::ReplaceOldest { slot: 1 });
        assert_eq!(memory.len(), 26);
        assert_eq!(memory.count(0), 25);
        assert_eq!(memory.examples().last(), Some(&marked(25, 0)));
        // Other classes are untouched.
        assert_eq!(memory.examples()[0], marked(100, 1));

        // The next eviction takes the next-oldest, not the newcomer.
        assert_eq!(memory.admit(marked(26, 0)), Admission::ReplaceOldest { slot: 1 });
        assert_eq!(memory.of_class(0).next(), Some(&marked(2, 0)));
    }

    #[test]
    fn thirty_of_one_class_keeps_the_most_recent_twenty_five() {
        let mut memory = ReplayMemory::new(4, 100);
        for id in 0..30 {
            memory.admit(marked(id, 0));
        }
        assert_eq!(memory.count(0), 25);
        assert_eq!(ids(&memory), (5..30).collect::<Vec<_>>());
    }

    #[test]
    fn long_runs_of_one_class_always_keep_the_newest() {
        let mut memory = ReplayMemory::new(4, 100);
        for id in 0..200 {
            memory.admit(marked(id, 2));
        }
        assert_eq!(ids(&memory), (175..200).collect::<Vec<_>>());
    }

    #[test]
    fn nearly_full_memory_rebalances_before_appending() {
        let mut memory = ReplayMemory::new(2, 4);
        memory.admit(marked(0, 0));
        memory.admit(marked(1, 1));
        memory.admit(marked(2, 0));
        assert_eq!(memory.plan(0), Admission::ReplaceOldest { slot: 0 });
        // 3 + 1 reaches capacity.
        assert_eq!(memory.plan(1), Admission::RebalanceThenAppend);
        assert_eq!(memory.admit(marked(3, 1)), Admission::RebalanceThenAppend);
        assert_eq!(ids(&memory), vec![0, 2, 1, 3]);
        assert_eq!(memory.distribution(), vec![2, 2]);
    }

    #[test]
    fn rebalance_within_caps_only_regroups() {
        let examples = vec![marked(0, 1), marked(1, 0), marked(2, 1), marked(3, 0)];
        let mut memory = ReplayMemory::from_examples(examples, 2, 4);
        memory.rebalance();
        assert_eq!(memory.len(), 4);
        assert_eq!(ids(&memory), vec![1, 3, 0, 2]);
    }

    #[test]
    fn rebalance_drops_oldest_excess_of_every_class() {
        let mut examples = Vec::new();
        for id in 0..30 {
            examples.push(marked(id, 0));
            examples.push(marked(100 + id, 2));
        }
        let mut memory = ReplayMemory::from_examples(examples, 4, 100);
        memory.rebalance();
        assert_eq!(memory.distribution(), vec![25, 0, 25, 0]);
        assert_eq!(memory.of_class(0).next().map(|ex| ex.input[0] as usize), Some(5));
        assert_eq!(memory.of_class(2).next().map(|ex| ex.input[0] as usize), Some(105));
    }

    #[test]
    fn oversized_restored_memory_is_trimmed_on_next_admission() {
        let examples = (0..120).map(|id| marked(id, 1)).collect();
        let mut memory = ReplayMemory::from_examples(examples, 4, 100);
        memory.admit(marked(500, 2));
        assert!(memory.len() <= 100);
        assert_eq!(memory.count(1), 25);
        assert_eq!(memory.count(2), 1);
    }

    #[test]
    fn caps_hold_under_mixed_traffic() {
        let mut memory = ReplayMemory::new(4, 100);
        for id in 0..1000 {
            memory.admit(marked(id, (id * 7 + id / 13) % 4));
            assert!(memory.len() <= 100);
            assert!(memory.distribution().iter().all(|&c| c <= 25));
        }
    }
}
