use cognify_core::TrialRecord;

use crate::error::ArenaError;

/// One slot per trial position. A slot goes `Empty -> Finalized` exactly once.
#[derive(Debug, Clone, PartialEq)]
enum TrialSlot {
    Empty,
    Finalized(TrialRecord),
}

/// Trial records indexed by sequence position.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialArena {
    slots: Vec<TrialSlot>,
}

impl TrialArena {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![TrialSlot::Empty; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_finalized(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(TrialSlot::Finalized(_)))
    }

    /// Freezes `record` into slot `index`. A second finalization is refused.
    pub fn finalize(&mut self, index: usize, record: TrialRecord) -> Result<(), ArenaError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(ArenaError::OutOfRange { index, len })?;
        if let TrialSlot::Finalized(_) = slot {
            return Err(ArenaError::AlreadyFinalized(index));
        }
        *slot = TrialSlot::Finalized(record);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&TrialRecord> {
        match self.slots.get(index) {
            Some(TrialSlot::Finalized(record)) => Some(record),
            _ => None,
        }
    }

    pub fn finalized(&self) -> impl Iterator<Item = &TrialRecord> {
        self.slots.iter().filter_map(|slot| match slot {
            TrialSlot::Finalized(record) => Some(record),
            TrialSlot::Empty => None,
        })
    }

    pub fn finalized_count(&self) -> usize {
        self.finalized().count()
    }

    /// All records in order, or an error if any slot is still empty.
    pub fn into_records(self) -> Result<Vec<TrialRecord>, ArenaError> {
        let len = self.slots.len();
        let missing = len - self.finalized_count();
        if missing > 0 {
            return Err(ArenaError::Incomplete { missing, len });
        }
        Ok(self
            .slots
            .into_iter()
            .filter_map(|slot| match slot {
                TrialSlot::Finalized(record) => Some(record),
                TrialSlot::Empty => None,
            })
            .collect())
    }
}
