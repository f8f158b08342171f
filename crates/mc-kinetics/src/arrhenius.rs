//! Arrhenius-type rate constants.

/// `k(T) = A·exp(E/T)`.
///
/// `E` is stored with its sign: negative for an activated rate constant,
/// positive for an adsorption constant that falls with temperature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrhenius {
    pub pre_exponential: f64,
    /// Signed activation term [K]
    pub activation_k: f64,
}

impl Arrhenius {
    pub const fn new(pre_exponential: f64, activation_k: f64) -> Self {
        Self {
            pre_exponential,
            activation_k,
        }
    }

    /// Caller guarantees `t_k > 0`.
    #[inline]
    pub fn rate_constant(&self, t_k: f64) -> f64 {
        self.pre_exponential * (self.activation_k / t_k).exp()
    }
}
