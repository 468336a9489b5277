use crate::core::TradeEvent;
use crate::core::errors::Result;

/// Trait for sources that yield export rows in file order
pub trait EventSource {
    /// Get the next event, `None` at end of input
    fn next_event(&mut self) -> Result<Option<TradeEvent>>;

    /// Number of events read so far
    fn events_read(&self) -> usize;

    /// Drain the source into a vector, preserving order
    fn read_all(&mut self) -> Result<Vec<TradeEvent>> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event()? {
            events.push(event);
        }
        Ok(events)
    }
}
