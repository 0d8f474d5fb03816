use clap::ValueEnum;
use color_eyre::eyre::{Result, WrapErr};
use orchestra_dsp::{
    dsp::{oscillator::Stick, plate::PlateParams},
    graph::{InstrumentBuilder, Node},
    Orchestra,
};

/// Parameter log cadence in seconds.
const LOG_INTERVAL: f32 = 0.1;
const PHASOR_HZ: f32 = 220.0;
const STICK_GAIN: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scene {
    /// Phasor shared over a bus, swept through the driven three-pole lowpass
    ThreePole,
    /// Amplified stick excitation striking a beaten plate
    Stick,
}

impl Scene {
    pub fn default_duration(self) -> f64 {
        match self {
            Scene::ThreePole => 10.0,
            Scene::Stick => 1.0,
        }
    }

    /// Add this scene's instruments to an idle orchestra.
    pub fn install(self, orchestra: &mut Orchestra, duration: f32) -> Result<()> {
        match self {
            Scene::ThreePole => three_pole(orchestra, duration),
            Scene::Stick => stick(orchestra),
        }
    }
}

fn three_pole(orchestra: &mut Orchestra, duration: f32) -> Result<()> {
    let bus = orchestra.bus()?;

    let mut source = InstrumentBuilder::new();
    let freq = source.connect(Node::constant(PHASOR_HZ));
    let phasor = source.connect(Node::phasor(freq));
    let send = source.connect(Node::bus_send(phasor, bus));
    orchestra
        .build_instrument(source, send)
        .wrap_err("building phasor instrument")?;

    let mut processor = InstrumentBuilder::new();
    let input = processor.connect(Node::bus_receive(bus));
    let distortion = processor.connect(Node::line(0.1, 0.9, duration));
    let cutoff = processor.connect(Node::line(300.0, 3000.0, duration));
    let resonance = processor.connect(Node::line(0.0, 1.0, duration));
    processor.connect(Node::parameter_log("distortion", distortion, LOG_INTERVAL));
    processor.connect(Node::parameter_log("cutoff", cutoff, LOG_INTERVAL));
    processor.connect(Node::parameter_log("resonance", resonance, LOG_INTERVAL));
    let filtered = processor.connect(Node::three_pole_lowpass(input, distortion, cutoff, resonance));
    let out = processor.connect(Node::audio_output(filtered, 0));
    orchestra
        .build_instrument(processor, out)
        .wrap_err("building filter instrument")?;

    Ok(())
}

fn stick(orchestra: &mut Orchestra) -> Result<()> {
    let mut builder = InstrumentBuilder::new();
    let excitation = builder.connect(Node::stick(Stick::default()));
    let gain = builder.connect(Node::constant(STICK_GAIN));
    let scaled = builder.connect(Node::scale(excitation, gain));

    let plate = PlateParams::default();
    let mut constants = |values: [f32; 2]| values.map(|value| builder.connect(Node::constant(value)));
    let frequency = constants(plate.frequency);
    let cutoff = constants(plate.cutoff_hz);
    let feedback = constants(plate.feedback);
    let resonator = builder.connect(Node::beaten_plate(scaled, frequency, cutoff, feedback));
    let out = builder.connect(Node::audio_output(resonator, 0));
    orchestra
        .build_instrument(builder, out)
        .wrap_err("building stick instrument")?;
    Ok(())
}
