/// Arithmetic on other signals.
///
/// `Scale` multiplies a signal by a factor (which may itself be a line or an
/// oscillator, giving amplitude or ring modulation). `Sum` adds any number of
/// inputs; with no inputs it produces silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Scale,
    Sum,
}

impl Modifier {
    pub fn arity(&self) -> Option<usize> {
        match self {
            Modifier::Scale => Some(2),
            Modifier::Sum => None,
        }
    }

    pub(crate) fn produce(&self, inputs: &[f32]) -> f32 {
        match self {
            Modifier::Scale => inputs[0] * inputs[1],
            Modifier::Sum => inputs.iter().sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_multiplies() {
        assert_eq!(Modifier::Scale.produce(&[0.5, 10.0]), 5.0);
    }

    #[test]
    fn test_sum_of_nothing_is_silence() {
        assert_eq!(Modifier::Sum.produce(&[]), 0.0);
        assert_eq!(Modifier::Sum.produce(&[0.25, 0.5, -1.0]), -0.25);
    }
}
