//! Subject grouping and round-robin selection.
//!
//! Candidates are bucketed by subject (in order of first appearance) and then
//! drawn one at a time from each subject in turn, so a subject with a large
//! backlog cannot crowd the others out of a bounded queue. Each subject keeps
//! its own internal order; callers sort the buckets before selecting.

use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};

/// Candidates bucketed by subject, preserving first-seen subject order.
#[derive(Debug, Clone)]
pub struct SubjectGroups<T> {
  groups: Vec<(String, Vec<T>)>,
  positions: HashMap<String, usize>,
}

impl<T> Default for SubjectGroups<T> {
  fn default() -> Self {
    Self {
      groups: Vec::new(),
      positions: HashMap::new(),
    }
  }
}

impl<T> SubjectGroups<T> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, subject: &str, item: T) {
    match self.positions.get(subject) {
      Some(&pos) => self.groups[pos].1.push(item),
      None => {
        self.positions.insert(subject.to_string(), self.groups.len());
        self.groups.push((subject.to_string(), vec![item]));
      }
    }
  }

  /// Stable-sort every subject's bucket with the same comparator
  pub fn sort_each_by<F>(&mut self, mut compare: F)
  where
    F: FnMut(&T, &T) -> Ordering,
  {
    for (_, items) in &mut self.groups {
      items.sort_by(&mut compare);
    }
  }

  #[cfg(test)]
  fn subjects(&self) -> impl Iterator<Item = &str> {
    self.groups.iter().map(|(subject, _)| subject.as_str())
  }

  #[cfg(test)]
  fn get(&self, subject: &str) -> Option<&[T]> {
    self
      .positions
      .get(subject)
      .map(|&pos| self.groups[pos].1.as_slice())
  }

  #[cfg(test)]
  fn len(&self) -> usize {
    self.groups.iter().map(|(_, items)| items.len()).sum()
  }

  #[cfg(test)]
  fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[cfg(test)]
impl<T> FromIterator<(String, T)> for SubjectGroups<T> {
  fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
    let mut groups = Self::new();
    for (subject, item) in iter {
      groups.push(&subject, item);
    }
    groups
  }
}

/// Take up to `cap` items, one per subject per turn.
///
/// Each turn takes the head of the current subject. A subject whose queue
/// runs dry leaves the rotation and its successor takes the next turn.
/// Returns `(subject, item)` in selection order.
pub fn round_robin<T>(groups: SubjectGroups<T>, cap: usize) -> Vec<(String, T)> {
  let mut rotation: VecDeque<(String, VecDeque<T>)> = groups
    .groups
    .into_iter()
    .filter(|(_, items)| !items.is_empty())
    .map(|(subject, items)| (subject, VecDeque::from(items)))
    .collect();

  let mut selected = Vec::with_capacity(cap.min(rotation.iter().map(|(_, q)| q.len()).sum()));

  while selected.len() < cap {
    let Some((subject, mut queue)) = rotation.pop_front() else {
      break;
    };

    if let Some(item) = queue.pop_front() {
      selected.push((subject.clone(), item));
    }

    if !queue.is_empty() {
      rotation.push_back((subject, queue));
    }
  }

  selected
}

#[cfg(test)]
mod tests {
  use super::*;

  fn groups(layout: &[(&str, &[i32])]) -> SubjectGroups<i32> {
    let mut g = SubjectGroups::new();
    for (subject, items) in layout {
      for item in *items {
        g.push(subject, *item);
      }
    }
    g
  }

  fn subjects_of(selected: &[(String, i32)]) -> Vec<&str> {
    selected.iter().map(|(s, _)| s.as_str()).collect()
  }

  #[test]
  fn test_push_keeps_first_seen_subject_order() {
    let mut g = SubjectGroups::new();
    g.push("Physics", 1);
    g.push("Maths", 2);
    g.push("Physics", 3);

    assert_eq!(g.subjects().collect::<Vec<_>>(), vec!["Physics", "Maths"]);
    assert_eq!(g.get("Physics"), Some(&[1, 3][..]));
    assert_eq!(g.get("Maths"), Some(&[2][..]));
    assert_eq!(g.get("Biology"), None);
    assert_eq!(g.len(), 3);
  }

  #[test]
  fn test_sort_each_by_sorts_within_subject_only() {
    let mut g = groups(&[("A", &[3, 1, 2]), ("B", &[9, 7])]);
    g.sort_each_by(|a, b| a.cmp(b));

    assert_eq!(g.get("A"), Some(&[1, 2, 3][..]));
    assert_eq!(g.get("B"), Some(&[7, 9][..]));
    assert_eq!(g.subjects().collect::<Vec<_>>(), vec!["A", "B"]);
  }

  #[test]
  fn test_round_robin_alternates_then_falls_back() {
    let g = groups(&[("A", &[1, 2, 3, 4, 5]), ("B", &[10])]);
    let selected = round_robin(g, 3);

    assert_eq!(subjects_of(&selected), vec!["A", "B", "A"]);
    assert_eq!(selected.iter().map(|(_, i)| *i).collect::<Vec<_>>(), vec![1, 10, 2]);
  }

  #[test]
  fn test_round_robin_three_subjects() {
    let g = groups(&[("A", &[1, 2]), ("B", &[10]), ("C", &[20, 21, 22])]);
    let selected = round_robin(g, 10);

    assert_eq!(
      selected.iter().map(|(_, i)| *i).collect::<Vec<_>>(),
      vec![1, 10, 20, 2, 21, 22]
    );
  }

  #[test]
  fn test_round_robin_exhausted_last_subject_wraps_to_first() {
    let g = groups(&[("A", &[1, 2, 3]), ("B", &[10, 11]), ("C", &[20])]);
    let selected = round_robin(g, 10);

    // C runs dry on its first turn, rotation wraps back to A
    assert_eq!(
      selected.iter().map(|(_, i)| *i).collect::<Vec<_>>(),
      vec![1, 10, 20, 2, 11, 3]
    );
  }

  #[test]
  fn test_round_robin_respects_cap() {
    let g = groups(&[("A", &[1, 2, 3]), ("B", &[10, 11, 12])]);
    assert_eq!(round_robin(g.clone(), 0).len(), 0);
    assert_eq!(round_robin(g.clone(), 4).len(), 4);
    assert_eq!(round_robin(g, 100).len(), 6);
  }

  #[test]
  fn test_round_robin_empty() {
    let g: SubjectGroups<i32> = SubjectGroups::new();
    assert!(g.is_empty());
    assert!(round_robin(g, 5).is_empty());
  }

  #[test]
  fn test_from_iterator() {
    let g: SubjectGroups<i32> = vec![("X".to_string(), 1), ("Y".to_string(), 2), ("X".to_string(), 3)]
      .into_iter()
      .collect();
    assert_eq!(g.get("X"), Some(&[1, 3][..]));
  }
}
