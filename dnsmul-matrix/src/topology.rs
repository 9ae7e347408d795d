use crate::{ConfigurationError, RunConfiguration};
use std::fmt::{self, Display, Formatter};
use std::ops::Range;
use std::str::FromStr;

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ProcessId(usize);

impl Display for ProcessId {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        self.0.fmt(formatter)
    }
}

impl From<usize> for ProcessId {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

impl From<ProcessId> for usize {
    fn from(process_id: ProcessId) -> Self {
        process_id.0
    }
}

impl FromStr for ProcessId {
    type Err = <usize as FromStr>::Err;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        <usize as FromStr>::from_str(string).map(Self::from)
    }
}

impl ProcessId {
    fn new(value: usize) -> Self {
        Self(value)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Position `(i, j, k)` of a process in the grid cube.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct ProcessCoordinates {
    i: usize,
    j: usize,
    k: usize,
}

impl Display for ProcessCoordinates {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "({}, {}, {})", self.i, self.j, self.k)
    }
}

impl From<ProcessCoordinates> for (usize, usize, usize) {
    fn from(coordinates: ProcessCoordinates) -> Self {
        (coordinates.i, coordinates.j, coordinates.k)
    }
}

impl ProcessCoordinates {
    pub fn new(i: usize, j: usize, k: usize) -> Self {
        Self { i, j, k }
    }

    pub fn i(&self) -> usize {
        self.i
    }

    pub fn j(&self) -> usize {
        self.j
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Process cube of side `n` holding `n³` processes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Topology {
    side: usize,
}

impl Topology {
    /// Finds the supported grid side whose cube equals `process_count`. Every process evaluates
    /// this on its own and reaches the same decision.
    pub fn resolve(
        process_count: usize,
        supported_sides: &[usize],
    ) -> Result<Self, ConfigurationError> {
        supported_sides
            .iter()
            .copied()
            .filter(|side| *side > 0)
            .find(|side| side.checked_pow(3) == Some(process_count))
            .map(Self::new)
            .ok_or_else(|| ConfigurationError::UnsupportedProcessCount {
                process_count,
                supported: supported_sides
                    .iter()
                    .map(|side| side.saturating_pow(3))
                    .collect(),
            })
    }

    pub fn from_configuration(
        process_count: usize,
        configuration: &RunConfiguration,
    ) -> Result<Self, ConfigurationError> {
        Self::resolve(process_count, configuration.supported_grid_sides())
    }

    fn new(side: usize) -> Self {
        Self { side }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn process_count(&self) -> usize {
        self.side * self.side * self.side
    }

    pub fn contains(&self, process_id: ProcessId) -> bool {
        usize::from(process_id) < self.process_count()
    }

    pub fn coordinates(&self, process_id: ProcessId) -> ProcessCoordinates {
        let value = usize::from(process_id);

        ProcessCoordinates::new(
            value / (self.side * self.side),
            (value / self.side) % self.side,
            value % self.side,
        )
    }

    pub fn process_id(&self, coordinates: ProcessCoordinates) -> ProcessId {
        ProcessId::new(
            coordinates.i() * self.side * self.side + coordinates.j() * self.side + coordinates.k(),
        )
    }

    /// Member `k = 0` of the `(i, j)` group sums the group's partial products.
    pub fn reducer(&self, i: usize, j: usize) -> ProcessId {
        self.process_id(ProcessCoordinates::new(i, j, 0))
    }

    pub fn is_reducer(&self, process_id: ProcessId) -> bool {
        self.coordinates(process_id).k() == 0
    }

    pub fn coordinator(&self) -> ProcessId {
        ProcessId::new(0)
    }

    /// Members of the `(i, j)` group in ascending `k`.
    pub fn group(&self, i: usize, j: usize) -> impl Iterator<Item = ProcessId> + '_ {
        (0..self.side).map(move |k| self.process_id(ProcessCoordinates::new(i, j, k)))
    }

    pub fn partition(&self, matrix_size: usize) -> Result<Partition, ConfigurationError> {
        if matrix_size == 0 || matrix_size % self.side != 0 {
            return Err(ConfigurationError::IndivisibleMatrixSize {
                matrix_size,
                side: self.side,
            });
        }

        Ok(Partition::new(self.side, matrix_size))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Split of an `N×N` matrix into `n×n` blocks of `N/n` rows and columns.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Partition {
    side: usize,
    matrix_size: usize,
    part_size: usize,
}

impl Partition {
    fn new(side: usize, matrix_size: usize) -> Self {
        Self {
            side,
            matrix_size,
            part_size: matrix_size / side,
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn matrix_size(&self) -> usize {
        self.matrix_size
    }

    pub fn part_size(&self) -> usize {
        self.part_size
    }

    pub fn block_element_count(&self) -> usize {
        self.part_size * self.part_size
    }

    /// Global rows (or columns) covered by block index `index`.
    pub fn block_range(&self, index: usize) -> Range<usize> {
        index * self.part_size..(index + 1) * self.part_size
    }

    /// Block index of global row (or column) `index`.
    pub fn block_index(&self, index: usize) -> usize {
        index / self.part_size
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
