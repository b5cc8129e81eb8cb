use crate::config::MAX_HORIZON;

/// Portfolio values indexed by step, where step 0 is the initial investment.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioPath {
    values: Vec<f64>,
}

impl PortfolioPath {
    pub(crate) fn with_initial(initial_value: f64, horizon: usize) -> Self {
        let capacity = horizon.saturating_add(1).min(MAX_HORIZON + 1);
        let mut values = Vec::with_capacity(capacity);
        values.push(initial_value);
        Self { values }
    }

    pub(crate) fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, step: usize) -> Option<f64> {
        self.values.get(step).copied()
    }

    pub fn initial_value(&self) -> f64 {
        self.values[0]
    }

    pub fn final_value(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

impl AsRef<[f64]> for PortfolioPath {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}
