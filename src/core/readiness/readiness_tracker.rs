// Cog readiness bookkeeping.
//
// Every cog in the registry starts out "not ready". Each cog flips its own
// entry from its `on_ready` hook, and the startup watcher waits until all of
// them have done so before announcing the bot as online.

use dashmap::DashMap;
use std::time::Duration;

pub type CogName = String;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReadinessError {
    #[error("Unknown cog: {0}")]
    UnknownCog(CogName),
}

pub struct ReadinessTracker {
    states: DashMap<CogName, bool>,
}

impl ReadinessTracker {
    /// Builds a tracker for a fixed set of cogs. The key set never changes
    /// after construction.
    pub fn new<I, N>(known: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<CogName>,
    {
        let states: DashMap<CogName, bool> =
            known.into_iter().map(|name| (name.into(), false)).collect();

        let tracker = Self { states };
        tracing::info!(cogs = ?tracker.cog_names(), "Discovered cogs");
        tracker
    }

    /// Marks a cog as ready. Calling this again for the same cog is a no-op.
    pub fn mark_ready(&self, name: &str) -> Result<(), ReadinessError> {
        let mut state = self
            .states
            .get_mut(name)
            .ok_or_else(|| ReadinessError::UnknownCog(name.to_string()))?;

        if !*state {
            *state = true;
            tracing::info!(cog = name, "{} cog ready", name);
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn is_ready(&self, name: &str) -> Option<bool> {
        self.states.get(name).map(|state| *state)
    }

    /// True once every known cog has reported in. An empty registry is
    /// trivially ready.
    pub fn all_ready(&self) -> bool {
        self.states.iter().all(|entry| *entry.value())
    }

    /// Cogs that have not reported yet, sorted by name.
    pub fn pending(&self) -> Vec<CogName> {
        let mut pending: Vec<CogName> = self
            .states
            .iter()
            .filter(|entry| !*entry.value())
            .map(|entry| entry.key().clone())
            .collect();
        pending.sort();
        pending
    }

    pub fn cog_names(&self) -> Vec<CogName> {
        let mut names: Vec<CogName> = self.states.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Polls until every cog is ready. There is no timeout: a cog whose hook
    /// never finishes keeps startup waiting.
    pub async fn wait_until_ready(&self, poll: Duration) {
        while !self.all_ready() {
            tracing::debug!(pending = ?self.pending(), "Waiting for cogs");
            tokio::time::sleep(poll).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn fresh_tracker_is_not_ready() {
        let tracker = ReadinessTracker::new(["Meta", "Errors"]);
        assert!(!tracker.all_ready());
        assert_eq!(tracker.pending(), vec!["Errors", "Meta"]);
    }

    #[test]
    fn ready_once_every_cog_reports() {
        let tracker = ReadinessTracker::new(["Meta", "Errors", "Fun"]);

        tracker.mark_ready("Fun").unwrap();
        tracker.mark_ready("Meta").unwrap();
        assert!(!tracker.all_ready());
        assert_eq!(tracker.is_ready("Errors"), Some(false));

        tracker.mark_ready("Errors").unwrap();
        assert!(tracker.all_ready());
        assert!(tracker.pending().is_empty());
    }

    #[test]
    fn mark_ready_is_idempotent() {
        let tracker = ReadinessTracker::new(["Meta", "Errors"]);
        tracker.mark_ready("Meta").unwrap();
        tracker.mark_ready("Meta").unwrap();
        assert!(!tracker.all_ready());

        tracker.mark_ready("Errors").unwrap();
        tracker.mark_ready("Errors").unwrap();
        assert!(tracker.all_ready());
        assert_eq!(tracker.cog_names().len(), 2);
    }

    #[test]
    fn unknown_cog_is_rejected_and_not_inserted() {
        let tracker = ReadinessTracker::new(["Meta"]);
        assert_eq!(
            tracker.mark_ready("Music"),
            Err(ReadinessError::UnknownCog("Music".to_string()))
        );
        assert_eq!(tracker.is_ready("Music"), None);
        assert_eq!(tracker.cog_names(), vec!["Meta"]);
    }

    #[test]
    fn empty_registry_is_ready() {
        let tracker = ReadinessTracker::new(Vec::<String>::new());
        assert!(tracker.all_ready());
    }

    #[tokio::test]
    async fn wait_until_ready_returns_after_last_cog() {
        let tracker = Arc::new(ReadinessTracker::new(["Meta", "Errors"]));

        let marker = Arc::clone(&tracker);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            marker.mark_ready("Errors").unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
            marker.mark_ready("Meta").unwrap();
        });

        tokio::time::timeout(
            Duration::from_secs(5),
            tracker.wait_until_ready(Duration::from_millis(5)),
        )
        .await
        .expect("tracker never became ready");
        assert!(tracker.all_ready());
    }
}
