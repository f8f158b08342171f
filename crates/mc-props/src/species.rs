//! Chemical species definitions.

/// Species carried by the exhaust gas model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Species {
    /// Carbon monoxide (CO)
    CO,
    /// Carbon dioxide (CO₂)
    CO2,
    /// Propane (C₃H₈), the hydrocarbon surrogate
    C3H8,
    /// Oxygen (O₂)
    O2,
    /// Air (pseudo-pure carrier gas)
    Air,
}

/// Species with a transported mole-fraction field, in state-vector order.
pub const TRACKED: [Species; 3] = [Species::CO, Species::CO2, Species::C3H8];

impl Species {
    pub const ALL: [Species; 5] = [
        Species::CO,
        Species::CO2,
        Species::C3H8,
        Species::O2,
        Species::Air,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Species::CO => "CO",
            Species::CO2 => "CO2",
            Species::C3H8 => "C3H8",
            Species::O2 => "O2",
            Species::Air => "Air",
        }
    }

    /// Molar mass [g/mol].
    pub fn molar_mass(&self) -> f64 {
        match self {
            Species::CO => 28.01,
            Species::CO2 => 44.01,
            Species::C3H8 => 44.1,
            Species::O2 => 32.0,
            Species::Air => 28.96,
        }
    }

    /// Fuller atomic diffusion volume [-].
    ///
    /// O₂ is never diffused in this model (its mole fraction is held fixed), so
    /// it carries the tabulated Fuller value only for completeness.
    pub fn diffusion_volume(&self) -> f64 {
        match self {
            Species::CO => 18.9,
            Species::CO2 => 22.262,
            Species::C3H8 => 65.34,
            Species::O2 => 16.6,
            Species::Air => 20.1,
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Species {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CO" | "CARBONMONOXIDE" | "CARBON MONOXIDE" => Ok(Species::CO),
            "CO2" | "CARBONDIOXIDE" | "CARBON DIOXIDE" => Ok(Species::CO2),
            "C3H8" | "PROPANE" | "HC" => Ok(Species::C3H8),
            "O2" | "OXYGEN" => Ok(Species::O2),
            "AIR" => Ok(Species::Air),
            _ => Err("unknown species"),
        }
    }
}
