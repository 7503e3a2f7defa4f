use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Living cell count of a single generation, and how it changed compared to the generation before.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    pub living_cells: f64,
    pub change: f64,

    /// Change in percent of the previous count. Growing from nothing counts as 100%.
    pub percent_change: f64,
}

impl Sample {
    pub fn as_array(&self) -> [f64; 3] {
        [self.living_cells, self.change, self.percent_change]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub generations: usize,
    pub min_cells: f64,
    pub max_cells: f64,
    pub average_cells: f64,

    /// Averages of the absolute changes, so shrinking and growing don't cancel out.
    pub average_change: f64,
    pub average_percent_change: f64,
}

/// Living cells per generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    samples: BTreeMap<usize, Sample>,
}

impl Analysis {
    pub fn new() -> Self {
        Self {
            samples: BTreeMap::from([(0, Sample::default())]),
        }
    }

    /// Stores the living cell count of `generation`. Samples of later generations are
    /// dropped first, recording an earlier generation means the play field went back in time.
    pub fn record(&mut self, generation: usize, living_cells: usize) {
        self.truncate(generation);

        let previous_cells = if generation == 0 {
            0.0
        } else {
            self.samples
                .range(..generation)
                .next_back()
                .map(|(_, sample)| sample.living_cells)
                .unwrap_or(0.0)
        };

        let living_cells = living_cells as f64;
        let change = living_cells - previous_cells;

        let percent_change = if previous_cells == 0.0 {
            if living_cells == 0.0 { 0.0 } else { 100.0 }
        } else {
            100.0 * change / previous_cells
        };

        self.samples.insert(
            generation,
            Sample {
                living_cells,
                change,
                percent_change,
            },
        );
    }

    /// Drops every sample after `generation`.
    pub fn truncate(&mut self, generation: usize) {
        if let Some(first_dropped) = generation.checked_add(1) {
            self.samples.split_off(&first_dropped);
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn sample(&self, generation: usize) -> Option<&Sample> {
        self.samples.get(&generation)
    }

    pub fn samples(&self) -> impl DoubleEndedIterator<Item = (usize, &Sample)> {
        self.samples
            .iter()
            .map(|(generation, sample)| (*generation, sample))
    }

    pub fn latest(&self) -> Option<(usize, &Sample)> {
        self.samples().next_back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn summary(&self) -> Option<Summary> {
        let (generations, _) = self.latest()?;
        let sample_count = self.samples.len() as f64;

        let (min_cells, max_cells) = self.samples.values().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), sample| (min.min(sample.living_cells), max.max(sample.living_cells)),
        );

        let average = |value: fn(&Sample) -> f64| -> f64 {
            self.samples.values().map(value).sum::<f64>() / sample_count
        };

        Some(Summary {
            generations,
            min_cells,
            max_cells,
            average_cells: average(|sample| sample.living_cells),
            average_change: average(|sample| sample.change.abs()),
            average_percent_change: average(|sample| sample.percent_change.abs()),
        })
    }
}

impl Default for Analysis {
    fn default() -> Self {
        Self::new()
    }
}
