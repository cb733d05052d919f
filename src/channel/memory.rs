use super::{Channel, ChannelError, Snapshot};

/// In-memory store for dry runs and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryChannel {
    values: Snapshot,
    writes: Vec<Snapshot>,
}

impl MemoryChannel {
    pub fn new(values: Snapshot) -> Self {
        Self {
            values,
            writes: Vec::new(),
        }
    }

    pub fn values(&self) -> &Snapshot {
        &self.values
    }

    /// Every partial map passed to `set`, in order.
    pub fn writes(&self) -> &[Snapshot] {
        &self.writes
    }
}

impl Channel for MemoryChannel {
    fn get(&self) -> Result<Snapshot, ChannelError> {
        Ok(self.values.clone())
    }

    fn set(&mut self, values: &Snapshot) -> Result<(), ChannelError> {
        self.writes.push(values.clone());
        self.values
            .extend(values.iter().map(|(key, value)| (key.clone(), value.clone())));
        Ok(())
    }

    fn describe(&self) -> String {
        "memory (dry run)".to_string()
    }
}
