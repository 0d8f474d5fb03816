use std::fmt;

use crate::{
    dsp::oscillator::{Phasor, Stick, TableOscillator},
    graph::{
        bus::BusId,
        error::GraphError,
        node::{SignalSource, TickCtx},
    },
};

/*
Sources
=======

Sources start a signal chain. Most take no inputs; the phasor and the table
oscillator take a single frequency input so their pitch can be automated
like any other parameter:

  [line 1→4 Hz] ──→ [phasor] ──→ ...
  [constant 440] ──→ [oscillator(sine table)] ──→ ...

  Constant     fixed value every tick
  Phasor       0..1 rising ramp               (input: frequency)
  Oscillator   sine-table lookup              (input: frequency)
  Stick        damped noise burst, seeded
  BusReceive   reads an orchestra bus written earlier in the tick
  Custom       any `SignalSource`
*/

pub enum Source {
    Constant(f32),
    Phasor(Phasor),
    Oscillator(TableOscillator),
    Stick(Stick),
    BusReceive(BusId),
    Custom(Box<dyn SignalSource>),
}

impl Source {
    pub fn arity(&self) -> usize {
        match self {
            Source::Phasor(_) | Source::Oscillator(_) => 1,
            Source::Constant(_) | Source::Stick(_) | Source::BusReceive(_) | Source::Custom(_) => 0,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), GraphError> {
        match self {
            Source::Constant(value) if !value.is_finite() => {
                Err(GraphError::invalid("constant", *value))
            }
            Source::Oscillator(osc) if osc.table().len() < 2 => {
                Err(GraphError::invalid("oscillator table size", osc.table().len() as f64))
            }
            Source::Stick(stick) if !stick.amplitude().is_finite() => {
                Err(GraphError::invalid("stick amplitude", stick.amplitude()))
            }
            Source::Stick(stick) if !(stick.damping().is_finite() && stick.damping() > 0.0) => {
                Err(GraphError::invalid("stick damping", stick.damping()))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn bus(&self) -> Option<BusId> {
        match self {
            Source::BusReceive(bus) => Some(*bus),
            _ => None,
        }
    }

    pub(crate) fn produce(&mut self, inputs: &[f32], ctx: &TickCtx<'_>) -> f32 {
        match self {
            Source::Constant(value) => *value,
            Source::Phasor(phasor) => phasor.next_sample(inputs[0], ctx.sample_rate),
            Source::Oscillator(osc) => osc.next_sample(inputs[0], ctx.sample_rate),
            Source::Stick(stick) => stick.next_sample(ctx.sample_rate),
            Source::BusReceive(bus) => ctx.bus(*bus),
            Source::Custom(source) => source.produce(ctx),
        }
    }

    pub(crate) fn reset(&mut self) {
        match self {
            Source::Phasor(phasor) => phasor.reset(),
            Source::Oscillator(osc) => osc.reset(),
            Source::Stick(stick) => stick.reset(),
            Source::Custom(source) => source.reset(),
            Source::Constant(_) | Source::BusReceive(_) => {}
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Source::Phasor(phasor) => f.debug_tuple("Phasor").field(phasor).finish(),
            Source::Oscillator(_) => f.write_str("Oscillator"),
            Source::Stick(stick) => f.debug_tuple("Stick").field(stick).finish(),
            Source::BusReceive(bus) => f.debug_tuple("BusReceive").field(bus).finish(),
            Source::Custom(_) => f.write_str("Custom"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::SineTable;
    use crate::graph::bus::Buses;

    struct Counter(u64);

    impl SignalSource for Counter {
        fn produce(&mut self, _ctx: &TickCtx<'_>) -> f32 {
            self.0 += 1;
            self.0 as f32
        }

        fn reset(&mut self) {
            self.0 = 0;
        }
    }

    #[test]
    fn test_bus_receive_reads_current_tick() {
        let mut buses = Buses::new();
        let bus = buses.allocate();
        buses.write(bus, 0.3);

        let mut source = Source::BusReceive(bus);
        let ctx = TickCtx::new(0, 44_100.0, &buses);
        assert_eq!(source.produce(&[], &ctx), 0.3);
        assert_eq!(source.bus(), Some(bus));
    }

    #[test]
    fn test_custom_source_resets() {
        let buses = Buses::new();
        let ctx = TickCtx::new(0, 44_100.0, &buses);
        let mut source = Source::Custom(Box::new(Counter(0)));
        source.produce(&[], &ctx);
        assert_eq!(source.produce(&[], &ctx), 2.0);
        source.reset();
        assert_eq!(source.produce(&[], &ctx), 1.0);
    }

    #[test]
    fn test_validate_rejects_unplayable_sources() {
        assert!(Source::Constant(f32::NAN).validate().is_err());
        assert!(Source::Stick(Stick::new(1.0, 0.0)).validate().is_err());
        assert!(Source::Stick(Stick::new(f32::INFINITY, 0.1)).validate().is_err());
        assert!(
            Source::Oscillator(TableOscillator::new(SineTable::with_partials(1, &[1.0])))
                .validate()
                .is_err()
        );
        assert!(Source::Stick(Stick::default()).validate().is_ok());
    }
}
