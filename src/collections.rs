use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChartError, ChartResult};

/// Describes one mutation applied to an `ObservableCollection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionChange {
    Added { index: usize },
    Removed { index: usize },
    Replaced { index: usize },
    Cleared { previous_len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&CollectionChange)>;

/// Ordered collection that reports every mutation.
///
/// Each mutating call returns its `CollectionChange`, delivers it synchronously
/// to subscribers and appends it to a pending log that owners drain with
/// `take_changes` before their next layout pass.
pub struct ObservableCollection<T> {
    items: Vec<T>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    pending: Vec<CollectionChange>,
    next_subscription: u64,
}

impl<T> Default for ObservableCollection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            subscribers: Vec::new(),
            pending: Vec::new(),
            next_subscription: 0,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableCollection")
            .field("items", &self.items)
            .field("subscribers", &self.subscribers.len())
            .field("pending", &self.pending)
            .finish()
    }
}

impl<T> ObservableCollection<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing items without recording changes for them.
    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// In-place access that publishes nothing; use `update` when
    /// subscribers must hear about the edit.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn push(&mut self, item: T) -> CollectionChange {
        self.items.push(item);
        self.publish(CollectionChange::Added {
            index: self.items.len() - 1,
        })
    }

    pub fn insert(&mut self, index: usize, item: T) -> ChartResult<CollectionChange> {
        if index > self.items.len() {
            return Err(ChartError::InvalidData(format!(
                "insert index {index} out of range (len {})",
                self.items.len()
            )));
        }
        self.items.insert(index, item);
        Ok(self.publish(CollectionChange::Added { index }))
    }

    pub fn remove(&mut self, index: usize) -> ChartResult<(T, CollectionChange)> {
        if index >= self.items.len() {
            return Err(ChartError::InvalidData(format!(
                "remove index {index} out of range (len {})",
                self.items.len()
            )));
        }
        let item = self.items.remove(index);
        Ok((item, self.publish(CollectionChange::Removed { index })))
    }

    pub fn replace(&mut self, index: usize, item: T) -> ChartResult<(T, CollectionChange)> {
        let Some(slot) = self.items.get_mut(index) else {
            return Err(ChartError::InvalidData(format!(
                "replace index {index} out of range (len {})",
                self.items.len()
            )));
        };
        let previous = std::mem::replace(slot, item);
        Ok((previous, self.publish(CollectionChange::Replaced { index })))
    }

    /// Mutates one item in place and reports it as replaced.
    pub fn update<F>(&mut self, index: usize, f: F) -> ChartResult<CollectionChange>
    where
        F: FnOnce(&mut T),
    {
        let Some(slot) = self.items.get_mut(index) else {
            return Err(ChartError::InvalidData(format!(
                "update index {index} out of range (len {})",
                self.items.len()
            )));
        };
        f(slot);
        Ok(self.publish(CollectionChange::Replaced { index }))
    }

    pub fn clear(&mut self) -> CollectionChange {
        let previous_len = self.items.len();
        self.items.clear();
        self.publish(CollectionChange::Cleared { previous_len })
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&CollectionChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns `false` when the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drains the change log accumulated since the previous call.
    pub fn take_changes(&mut self) -> Vec<CollectionChange> {
        std::mem::take(&mut self.pending)
    }

    fn publish(&mut self, change: CollectionChange) -> CollectionChange {
        debug!(?change, len = self.items.len(), "collection changed");
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&change);
        }
        self.pending.push(change);
        change
    }
}

impl<T> FromIterator<T> for ObservableCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a ObservableCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
