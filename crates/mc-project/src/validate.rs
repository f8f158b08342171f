//! Configuration validation logic.

use crate::schema::{CompositionDef, MonolithConfig, CONFIG_VERSION};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive and finite"))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be non-negative and finite"))
    }
}

fn mole_fractions(prefix: &str, c: &CompositionDef) -> Result<(), ValidationError> {
    for (name, value) in [("co", c.co), ("co2", c.co2), ("hydrocarbon", c.hydrocarbon)] {
        let field = format!("{prefix}.{name}");
        non_negative(&field, value)?;
        if value > 1.0 {
            return Err(invalid(&field, value, "mole fraction cannot exceed 1"));
        }
    }
    Ok(())
}

pub fn validate_config(config: &MonolithConfig) -> Result<(), ValidationError> {
    if config.version > CONFIG_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    let g = &config.geometry;
    positive("geometry.channel_radius_m", g.channel_radius_m)?;
    positive("geometry.washcoat_thickness_m", g.washcoat_thickness_m)?;
    positive("geometry.substrate_thickness_m", g.substrate_thickness_m)?;
    positive("geometry.channel_length_m", g.channel_length_m)?;
    positive("geometry.monolith_diameter_m", g.monolith_diameter_m)?;
    positive("geometry.cells_per_square_inch", g.cells_per_square_inch)?;
    positive("geometry.hydraulic_diameter_m", g.hydraulic_diameter_m)?;
    non_negative("geometry.slice_mass_g", g.slice_mass_g)?;

    let op = &config.operating;
    mole_fractions("operating.initial", &op.initial)?;
    mole_fractions("operating.inlet", &op.inlet)?;
    positive("operating.initial_temperature_k", op.initial_temperature_k)?;
    positive("operating.inlet_temperature_k", op.inlet_temperature_k)?;
    positive("operating.pressure_pa", op.pressure_pa)?;
    positive("operating.mean_velocity_m_s", op.mean_velocity_m_s)?;
    positive("operating.molar_flow_mol_s", op.molar_flow_mol_s)?;
    non_negative("operating.o2_mole_fraction", op.o2_mole_fraction)?;
    positive("operating.prandtl", op.prandtl)?;

    let c = &config.catalyst;
    positive("catalyst.pt_loading_mol_per_g", c.pt_loading_mol_per_g)?;
    positive("catalyst.bet_area_m2_per_g", c.bet_area_m2_per_g)?;
    positive("catalyst.washcoat_density_g_m3", c.washcoat_density_g_m3)?;
    positive("catalyst.substrate_density_g_m3", c.substrate_density_g_m3)?;
    positive("catalyst.pt_mass_fraction", c.pt_mass_fraction)?;
    positive("catalyst.pt_molar_mass_g_mol", c.pt_molar_mass_g_mol)?;
    positive("catalyst.pt_atom_area_m2", c.pt_atom_area_m2)?;
    positive("catalyst.substrate_conductivity_w_m_k", c.substrate_conductivity_w_m_k)?;
    positive("catalyst.substrate_heat_capacity_j_kg_k", c.substrate_heat_capacity_j_kg_k)?;

    let p = &config.porous;
    positive("porous.pore_radius_m", p.pore_radius_m)?;
    positive("porous.porosity", p.porosity)?;
    if p.porosity >= 1.0 {
        return Err(invalid("porous.porosity", p.porosity, "must be below 1"));
    }
    positive("porous.tortuosity", p.tortuosity)?;
    positive("porous.constrictivity", p.constrictivity)?;

    let k = &config.kinetics;
    for (i, a) in k.pre_exponential.iter().enumerate() {
        non_negative(&format!("kinetics.pre_exponential[{i}]"), *a)?;
    }
    for (i, e) in k.activation_k.iter().enumerate() {
        if !e.is_finite() {
            return Err(invalid(&format!("kinetics.activation_k[{i}]"), e, "must be finite"));
        }
    }
    if !k.co_heat_of_reaction_j_mol.is_finite() {
        return Err(invalid(
            "kinetics.co_heat_of_reaction_j_mol",
            k.co_heat_of_reaction_j_mol,
            "must be finite",
        ));
    }

    let grid = &config.grid;
    for (name, n) in [("grid.nz", grid.nz), ("grid.ns", grid.ns), ("grid.nu", grid.nu)] {
        if n < 2 {
            return Err(invalid(name, n, "at least 2 points required"));
        }
    }

    for (i, seg) in config.schedule.segments.iter().enumerate() {
        positive(&format!("schedule.segments[{i}].duration_s"), seg.duration_s)?;
        positive(
            &format!("schedule.segments[{i}].end_temperature_k"),
            seg.end_temperature_k,
        )?;
    }

    let t = &config.time;
    if !t.start_s.is_finite() {
        return Err(invalid("time.start_s", t.start_s, "must be finite"));
    }
    if !(t.end_s.is_finite() && t.end_s > t.start_s) {
        return Err(invalid("time.end_s", t.end_s, "must be after time.start_s"));
    }
    positive("time.output_interval_s", t.output_interval_s)?;

    let s = &config.solver;
    positive("solver.atol", s.atol)?;
    positive("solver.rtol", s.rtol)?;
    if s.max_steps == 0 {
        return Err(invalid("solver.max_steps", s.max_steps, "must be at least 1"));
    }
    if let Some(h) = s.first_step_s {
        positive("solver.first_step_s", h)?;
    }
    if let Some(h) = s.max_step_s {
        positive("solver.max_step_s", h)?;
    }

    Ok(())
}
