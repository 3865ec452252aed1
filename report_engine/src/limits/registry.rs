//! Per-dataset test number allocation

use std::collections::BTreeMap;

/// Maps parameter name to its assigned test number within one dataset.
/// Reset per dataset, never merged across datasets.
#[derive(Debug, Clone, Default)]
pub struct TestNumberRegistry {
    assigned: BTreeMap<String, u32>,
    counter: u32,
}

impl TestNumberRegistry {
    pub fn new() -> Self {
        Self {
            assigned: BTreeMap::new(),
            counter: 1,
        }
    }

    /// Idempotent allocation. The first parameter in an empty registry gets
    /// 1; later parameters get the first free number at or above the
    /// counter, skipping numbers seeded from the external limit table.
    pub fn assign(&mut self, parameter: &str) -> u32 {
        if let Some(&number) = self.assigned.get(parameter) {
            return number;
        }
        let number = if self.assigned.is_empty() {
            1
        } else {
            let mut candidate = self.counter;
            while self.assigned.values().any(|&used| used == candidate) {
                candidate += 1;
            }
            candidate
        };
        self.assigned.insert(parameter.to_string(), number);
        self.counter = number + 1;
        number
    }

    /// Record a test number sourced from the external limit table so the
    /// auto-counter never reuses it
    pub fn seed(&mut self, parameter: &str, number: u32) {
        self.assigned.insert(parameter.to_string(), number);
    }

    pub fn contains(&self, parameter: &str) -> bool {
        self.assigned.contains_key(parameter)
    }

    pub fn get(&self, parameter: &str) -> Option<u32> {
        self.assigned.get(parameter).copied()
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
