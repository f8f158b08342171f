//! The state layout descriptor.
//!
//! A single description of where each field lives in the flat state vector,
//! shared by the packer, the RHS and the snapshot unpacker:
//!
//! ```text
//! [ gas CO | gas CO2 | gas HC | gas T ]            4 blocks of nz
//! [ wc CO  | wc CO2  | wc HC  | wc T  ]            4 blocks of nz·ns, row-major (axial, radial)
//! [ substrate T ]                                  nz·nu, only when integrated
//! ```

use crate::error::{SimError, SimResult};
use nalgebra::DVector;

/// Variables carried per node: the three tracked species then temperature.
pub const VARIABLES: usize = 4;
/// Index of temperature among the per-node variables.
pub const TEMPERATURE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// Gas-phase variable `v` (species `0..3`, or [`TEMPERATURE`])
    Gas(usize),
    /// Washcoat variable `v`
    Washcoat(usize),
    SubstrateTemperature,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateLayout {
    pub nz: usize,
    pub ns: usize,
    pub nu: usize,
    /// Whether the substrate block is part of the integrated vector.
    pub substrate_integrated: bool,
}

/// Unpacked state, one array per field.
#[derive(Clone, Debug, PartialEq)]
pub struct Fields {
    /// `gas[v][i]`
    pub gas: [Vec<f64>; VARIABLES],
    /// `washcoat[v][i * ns + j]`
    pub washcoat: [Vec<f64>; VARIABLES],
    /// `substrate[i * nu + k]`; empty when the substrate is not integrated
    pub substrate: Vec<f64>,
}

impl StateLayout {
    pub fn new(nz: usize, ns: usize, nu: usize, substrate_integrated: bool) -> Self {
        Self {
            nz,
            ns,
            nu,
            substrate_integrated,
        }
    }

    /// Number of entries of `field`; zero for a substrate that is not integrated.
    pub fn extent(&self, field: Field) -> usize {
        match field {
            Field::Gas(_) => self.nz,
            Field::Washcoat(_) => self.nz * self.ns,
            Field::SubstrateTemperature if self.substrate_integrated => self.nz * self.nu,
            Field::SubstrateTemperature => 0,
        }
    }

    /// First index of `field`.
    pub fn offset(&self, field: Field) -> usize {
        let gas_block = VARIABLES * self.nz;
        match field {
            Field::Gas(v) => v * self.nz,
            Field::Washcoat(v) => gas_block + v * self.nz * self.ns,
            Field::SubstrateTemperature => gas_block + VARIABLES * self.nz * self.ns,
        }
    }

    /// Total state length.
    pub fn len(&self) -> usize {
        self.offset(Field::SubstrateTemperature) + self.extent(Field::SubstrateTemperature)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn gas(&self, v: usize, i: usize) -> usize {
        self.offset(Field::Gas(v)) + i
    }

    #[inline]
    pub fn washcoat(&self, v: usize, i: usize, j: usize) -> usize {
        self.offset(Field::Washcoat(v)) + i * self.ns + j
    }

    #[inline]
    pub fn substrate(&self, i: usize, k: usize) -> usize {
        self.offset(Field::SubstrateTemperature) + i * self.nu + k
    }

    fn check_len(&self, what: &str, len: usize) -> SimResult<()> {
        if len != self.len() {
            return Err(SimError::Config {
                what: format!("{what} has length {len}, layout expects {}", self.len()),
            });
        }
        Ok(())
    }

    pub fn pack(&self, fields: &Fields) -> SimResult<DVector<f64>> {
        let mut x = DVector::zeros(self.len());
        let blocks = fields
            .gas
            .iter()
            .enumerate()
            .map(|(v, data)| (Field::Gas(v), data))
            .chain(
                fields
                    .washcoat
                    .iter()
                    .enumerate()
                    .map(|(v, data)| (Field::Washcoat(v), data)),
            )
            .chain(std::iter::once((Field::SubstrateTemperature, &fields.substrate)));
        for (field, data) in blocks {
            let n = self.extent(field);
            if data.len() != n {
                return Err(SimError::Config {
                    what: format!("{field:?} has {} entries, layout expects {n}", data.len()),
                });
            }
            let off = self.offset(field);
            x.as_mut_slice()[off..off + n].copy_from_slice(data);
        }
        Ok(x)
    }

    pub fn unpack(&self, x: &DVector<f64>) -> SimResult<Fields> {
        self.check_len("state", x.len())?;
        let xs = x.as_slice();
        let block = |field: Field| {
            let off = self.offset(field);
            xs[off..off + self.extent(field)].to_vec()
        };
        Ok(Fields {
            gas: std::array::from_fn(|v| block(Field::Gas(v))),
            washcoat: std::array::from_fn(|v| block(Field::Washcoat(v))),
            substrate: block(Field::SubstrateTemperature),
        })
    }

    pub(crate) fn ensure_len(&self, x: &DVector<f64>) -> SimResult<()> {
        self.check_len("state", x.len())
    }
}
