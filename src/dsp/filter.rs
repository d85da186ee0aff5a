use std::f32::consts::PI;

/*
| type              | passes          | rejects      |
| ----------------- | --------------- | ------------ |
| low-pass          | below cutoff    | above cutoff |
| high-pass         | above cutoff    | below cutoff |
| band-pass         | around cutoff   | outside      |
| notch / band-stop | outside         | around       |

Topology-preserving (TPT) state-variable filter. The integrator gain

    g = tan(π · cutoff / sample_rate)

is computed once per `set_cutoff` / `set_sample_rate` so the filter can sit
inside a per-sample feedback loop (the comb resonators) without a tan() per
sample. Cutoff is kept below 0.49 · sample_rate where tan() blows up.

`resonance` 0.0 gives k = 2 (Q = 0.5): no peak anywhere, gain never above 1.
That is the setting used inside the resonator loop, where any gain above
unity would push the comb past its stability margin.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
    Notch,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
    pub notch: f32,
}

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    cutoff_hz: f32,
    resonance: f32,
    sample_rate: f32,
    filter_type: FilterType,

    g: f32,
    k: f32,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32, sample_rate: f32) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            resonance: 0.0,
            sample_rate,
            filter_type,
            g: 0.0,
            k: 2.0,
        };
        filter.update_coefficients();
        filter
    }

    pub fn lowpass(cutoff_hz: f32, sample_rate: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz, sample_rate)
    }

    pub fn highpass(cutoff_hz: f32, sample_rate: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz, sample_rate)
    }

    pub fn bandpass(cutoff_hz: f32, sample_rate: f32) -> Self {
        Self::new(FilterType::BandPass, cutoff_hz, sample_rate)
    }

    fn update_coefficients(&mut self) {
        let nyquist_guard = 0.49 * self.sample_rate;
        let cutoff = self.cutoff_hz.clamp(1.0, nyquist_guard);
        self.g = (PI * cutoff / self.sample_rate).tan();
        self.k = 2.0 - 2.0 * self.resonance.clamp(0.0, 0.99);
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32) -> FilterOutputs {
        let (g, k) = (self.g, self.k);
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
            notch: sample - k * v1,
        }
    }

    /// Filter one sample and return the configured response.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let outputs = self.next_sample(sample);
        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
            FilterType::BandPass => outputs.bandpass,
            FilterType::Notch => outputs.notch,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
        self.update_coefficients();
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance;
        self.update_coefficients();
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }
}
