use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use kcmetrics_core::{Counter, MeterId, MeterRegistry, MetricsResult, Tags};
use parking_lot::RwLock;

type SeriesKey = (String, Vec<(String, String)>);

#[derive(Debug, Default)]
struct SimpleCounter(AtomicU64);

impl Counter for SimpleCounter {
    fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Default)]
struct Inner {
    index: HashMap<SeriesKey, usize>,
    series: Vec<(MeterId, Arc<SimpleCounter>)>,
}

/// In-memory registry, useful for tests and for embedding without a backend.
///
/// Series are identified by name and tag set regardless of tag order.
#[derive(Default)]
pub struct SimpleMeterRegistry {
    inner: RwLock<Inner>,
}

/// Value of one series at the time of [`SimpleMeterRegistry::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub id: MeterId,
    pub count: u64,
}

impl SimpleMeterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of the series `name{tags}`; zero when it was never created.
    #[must_use]
    pub fn count(&self, name: &str, tags: &[(&str, &str)]) -> u64 {
        let mut pairs: Vec<(String, String)> = tags
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        pairs.sort();

        let inner = self.inner.read();
        inner
            .index
            .get(&(name.to_string(), pairs))
            .map(|position| inner.series[*position].1.count())
            .unwrap_or(0)
    }

    /// Every series in the order it was first requested.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CounterSnapshot> {
        self.inner
            .read()
            .series
            .iter()
            .map(|(id, counter)| CounterSnapshot {
                id: id.clone(),
                count: counter.count(),
            })
            .collect()
    }

    /// Series with the given name.
    #[must_use]
    pub fn find(&self, name: &str) -> Vec<CounterSnapshot> {
        self.snapshot()
            .into_iter()
            .filter(|snapshot| snapshot.id.name == name)
            .collect()
    }

    /// Tags of the first series with the given name.
    #[must_use]
    pub fn tags_of(&self, name: &str) -> Option<Tags> {
        self.find(name).into_iter().next().map(|snapshot| snapshot.id.tags)
    }

    /// Sum over every series.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.inner
            .read()
            .series
            .iter()
            .map(|(_, counter)| counter.count())
            .sum()
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.inner.read().series.len()
    }
}

impl MeterRegistry for SimpleMeterRegistry {
    fn counter(&self, id: &MeterId) -> MetricsResult<Arc<dyn Counter>> {
        let key = id.series_key();

        {
            let inner = self.inner.read();
            if let Some(position) = inner.index.get(&key) {
                let counter: Arc<dyn Counter> = inner.series[*position].1.clone();
                return Ok(counter);
            }
        }

        let mut inner = self.inner.write();
        if let Some(position) = inner.index.get(&key) {
            let counter: Arc<dyn Counter> = inner.series[*position].1.clone();
            return Ok(counter);
        }

        let counter = Arc::new(SimpleCounter::default());
        let position = inner.series.len();
        inner.series.push((id.clone(), Arc::clone(&counter)));
        inner.index.insert(key, position);

        let counter: Arc<dyn Counter> = counter;
        Ok(counter)
    }
}
