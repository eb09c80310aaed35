//! Problem model: items, instances and solutions.
//!
//! The index of an item inside [`Instance::items`] is the index space every
//! solver reports its selection in, so results of different solvers on the
//! same instance are directly comparable.

use super::error::KnapsackError;

/// A single knapsack item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub weight: u64,
    pub price: u64,
}

impl Item {
    pub fn new(weight: u64, price: u64) -> Self {
        Self { weight, price }
    }
}

/// An immutable 0/1 knapsack instance.
///
/// Construction guarantees that the total weight and the total price of all
/// items fit in a `u64`, so no subset sum computed by a solver can overflow.
/// Deserialization goes through [`Instance::new`] as well; the cached totals
/// are never read from or written to the serialized form.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawInstance", into = "RawInstance"))]
pub struct Instance {
    id: u64,
    items: Vec<Item>,
    capacity: u64,
    total_weight: u64,
    total_price: u64,
}

impl Instance {
    /// Creates an instance with identifier `0`.
    ///
    /// # Errors
    /// [`KnapsackError::InvalidInstance`] if the item weights or prices sum
    /// past `u64::MAX`.
    pub fn new(items: Vec<Item>, capacity: u64) -> Result<Self, KnapsackError> {
        let mut total_weight = 0u64;
        let mut total_price = 0u64;
        for (i, item) in items.iter().enumerate() {
            total_weight = total_weight.checked_add(item.weight).ok_or_else(|| {
                KnapsackError::InvalidInstance(format!("total weight overflows at item {i}"))
            })?;
            total_price = total_price.checked_add(item.price).ok_or_else(|| {
                KnapsackError::InvalidInstance(format!("total price overflows at item {i}"))
            })?;
        }
        Ok(Self {
            id: 0,
            items,
            capacity,
            total_weight,
            total_price,
        })
    }

    /// Builds an instance from `(weight, price)` pairs.
    pub fn from_pairs(pairs: &[(u64, u64)], capacity: u64) -> Result<Self, KnapsackError> {
        Self::new(pairs.iter().map(|&(w, p)| Item::new(w, p)).collect(), capacity)
    }

    /// Sets the identifier used by stats sinks and benchmark reports.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn total_price(&self) -> u64 {
        self.total_price
    }

    /// Maximum single-item price, `0` for an empty instance.
    pub fn max_price(&self) -> u64 {
        self.items.iter().map(|it| it.price).max().unwrap_or(0)
    }

    /// Decodes an index-aligned selection into a [`Solution`].
    ///
    /// Sums are recomputed from the items, so the returned solution always
    /// satisfies the price/weight consistency invariant.
    pub fn solution_from_selection(&self, selection: Vec<bool>) -> Solution {
        debug_assert_eq!(selection.len(), self.items.len());
        let (total_weight, total_price) = selection
            .iter()
            .zip(&self.items)
            .filter(|(&sel, _)| sel)
            .fold((0u64, 0u64), |(w, p), (_, it)| (w + it.weight, p + it.price));
        Solution {
            selection,
            total_price,
            total_weight,
        }
    }

    /// The empty selection: price 0, weight 0.
    pub fn empty_solution(&self) -> Solution {
        Solution {
            selection: vec![false; self.items.len()],
            total_price: 0,
            total_weight: 0,
        }
    }
}

/// Serialized form of an [`Instance`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawInstance {
    #[serde(default)]
    id: u64,
    items: Vec<Item>,
    capacity: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawInstance> for Instance {
    type Error = KnapsackError;

    fn try_from(raw: RawInstance) -> Result<Self, Self::Error> {
        Ok(Instance::new(raw.items, raw.capacity)?.with_id(raw.id))
    }
}

#[cfg(feature = "serde")]
impl From<Instance> for RawInstance {
    fn from(inst: Instance) -> Self {
        Self {
            id: inst.id,
            items: inst.items,
            capacity: inst.capacity,
        }
    }
}

/// A candidate answer: index-aligned selection flags plus achieved sums.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    pub selection: Vec<bool>,
    pub total_price: u64,
    pub total_weight: u64,
}

impl Solution {
    /// Whether the solution fits inside the instance capacity.
    pub fn is_feasible(&self, instance: &Instance) -> bool {
        self.total_weight <= instance.capacity()
    }

    /// Checks that the selection length matches the instance and that both
    /// totals equal the sums over the flagged items.
    pub fn is_consistent(&self, instance: &Instance) -> bool {
        if self.selection.len() != instance.len() {
            return false;
        }
        let (w, p) = self
            .selection
            .iter()
            .zip(instance.items())
            .filter(|(&sel, _)| sel)
            .fold((0u64, 0u64), |(w, p), (_, it)| (w + it.weight, p + it.price));
        w == self.total_weight && p == self.total_price
    }

    /// Number of selected items.
    pub fn selected_count(&self) -> usize {
        self.selection.iter().filter(|&&s| s).count()
    }

    /// Selection rendered as `0`/`1` flags, the format used in reports.
    pub fn selection_flags(&self) -> Vec<u8> {
        self.selection.iter().map(|&s| u8::from(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_totals() {
        let inst = Instance::from_pairs(&[(2, 3), (3, 4), (4, 5)], 5).unwrap();
        assert_eq!(inst.total_weight(), 9);
        assert_eq!(inst.total_price(), 12);
        assert_eq!(inst.max_price(), 5);
        assert_eq!(inst.len(), 3);
        assert_eq!(inst.id(), 0);
    }

    #[test]
    fn test_instance_overflow_rejected() {
        let result = Instance::from_pairs(&[(u64::MAX, 1), (1, 1)], 5);
        assert!(matches!(result, Err(KnapsackError::InvalidInstance(_))));

        let result = Instance::from_pairs(&[(1, u64::MAX), (1, 1)], 5);
        assert!(matches!(result, Err(KnapsackError::InvalidInstance(_))));
    }

    #[test]
    fn test_solution_from_selection() {
        let inst = Instance::from_pairs(&[(2, 3), (3, 4), (4, 5)], 5).unwrap();
        let sol = inst.solution_from_selection(vec![true, false, true]);
        assert_eq!(sol.total_price, 8);
        assert_eq!(sol.total_weight, 6);
        assert!(!sol.is_feasible(&inst));
        assert!(sol.is_consistent(&inst));
        assert_eq!(sol.selected_count(), 2);
        assert_eq!(sol.selection_flags(), vec![1, 0, 1]);
    }

    #[test]
    fn test_inconsistent_solution_detected() {
        let inst = Instance::from_pairs(&[(2, 3), (3, 4)], 5).unwrap();
        let sol = Solution {
            selection: vec![true, true],
            total_price: 8,
            total_weight: 5,
        };
        assert!(!sol.is_consistent(&inst));

        let short = Solution {
            selection: vec![true],
            total_price: 3,
            total_weight: 2,
        };
        assert!(!short.is_consistent(&inst));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates_totals() {
        let json = format!(
            r#"{{"items":[{{"weight":{},"price":1}},{{"weight":5,"price":1}}],"capacity":0,"total_weight":0,"total_price":0}}"#,
            u64::MAX
        );
        let err = serde_json::from_str::<Instance>(&json).unwrap_err();
        assert!(err.to_string().contains("total weight overflows"), "{err}");

        let inst: Instance =
            serde_json::from_str(r#"{"id":3,"items":[{"weight":2,"price":3},{"weight":4,"price":5}],"capacity":5}"#)
                .unwrap();
        assert_eq!(inst.id(), 3);
        assert_eq!(inst.total_weight(), 6);
        assert_eq!(inst.total_price(), 8);

        let text = serde_json::to_string(&inst).unwrap();
        assert!(!text.contains("total_"), "cached totals leaked: {text}");
        assert_eq!(serde_json::from_str::<Instance>(&text).unwrap(), inst);
    }

    #[test]
    fn test_empty_solution() {
        let inst = Instance::from_pairs(&[(10, 5)], 5).unwrap().with_id(7);
        let sol = inst.empty_solution();
        assert_eq!(sol.selection, vec![false]);
        assert_eq!(sol.total_price, 0);
        assert!(sol.is_feasible(&inst));
        assert_eq!(inst.id(), 7);
    }
}
