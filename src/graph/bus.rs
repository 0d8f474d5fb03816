use std::fmt;

/*
Global Buses
============

A bus is an orchestra-wide signal slot. One instrument writes into it with a
bus-send output and any instrument registered after it reads the value back
with a bus-receive source, inside the same tick:

  tick n:  [phasor] ──send──→ bus 0 ──receive──→ [filter] ──→ audio out

Rules:
  - every bus is cleared to 0.0 at the start of each tick
  - several sends to one bus in the same tick are summed
  - a receive that runs before any send of the tick reads 0.0
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BusId(usize);

impl BusId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bus#{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Buses {
    values: Vec<f32>,
}

impl Buses {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_len(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    pub fn allocate(&mut self) -> BusId {
        self.values.push(0.0);
        BusId(self.values.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, bus: BusId) -> bool {
        bus.0 < self.values.len()
    }

    pub fn read(&self, bus: BusId) -> f32 {
        self.values.get(bus.0).copied().unwrap_or(0.0)
    }

    pub(crate) fn write(&mut self, bus: BusId, value: f32) {
        if let Some(slot) = self.values.get_mut(bus.0) {
            *slot += value;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.values.fill(0.0);
    }
}
