#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopLossPhase {
    Armed,
    Triggered,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopLossTrigger {
    pub step: usize,
    pub value: f64,
}

/// One-shot stop-loss state. Once triggered it never re-arms.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StopLossState {
    trigger: Option<StopLossTrigger>,
}

impl StopLossState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> StopLossPhase {
        match self.trigger {
            Some(_) => StopLossPhase::Triggered,
            None => StopLossPhase::Armed,
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.trigger.is_some()
    }

    pub fn trigger(&self) -> Option<StopLossTrigger> {
        self.trigger
    }

    pub fn trigger_step(&self) -> Option<usize> {
        self.trigger.map(|trigger| trigger.step)
    }

    pub fn trigger_value(&self) -> Option<f64> {
        self.trigger.map(|trigger| trigger.value)
    }

    /// Returns false and leaves the state untouched if already triggered.
    pub(crate) fn fire(&mut self, step: usize, value: f64) -> bool {
        if self.trigger.is_some() {
            return false;
        }

        self.trigger = Some(StopLossTrigger { step, value });
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopLossRule {
    initial_investment: f64,
    fraction: f64,
}

impl StopLossRule {
    pub fn new(initial_investment: f64, fraction: f64) -> Self {
        Self {
            initial_investment,
            fraction,
        }
    }

    pub fn is_breached(&self, tentative_value: f64) -> bool {
        tentative_value / self.initial_investment < 1.0 - self.fraction
    }

    /// Exit value, relative to the previous step rather than the tentative value.
    pub fn floor_from(&self, previous_value: f64) -> f64 {
        previous_value * (1.0 - self.fraction)
    }
}
