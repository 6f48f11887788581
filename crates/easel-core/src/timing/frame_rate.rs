// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;
const SMOOTHING: f32 = 0.9;

/// Exponential moving average of the frame rate.
///
/// Each completed frame feeds the wall-clock delta since the previous one:
/// `estimate = estimate * 0.9 + rate * 0.1`, where `rate` is the
/// instantaneous frames-per-second value of that delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRateEstimator {
    estimate: f32,
    last_frame_nanos: u64,
}

impl FrameRateEstimator {
    /// The estimate before any frame has been measured.
    pub const INITIAL_ESTIMATE: f32 = 10.0;

    /// Creates an estimator with the initial estimate and a zero baseline.
    pub fn new() -> Self {
        Self {
            estimate: Self::INITIAL_ESTIMATE,
            last_frame_nanos: 0,
        }
    }

    /// The current smoothed estimate, in frames per second.
    pub fn estimate(&self) -> f32 {
        self.estimate
    }

    /// Timestamp of the previous frame, in nanoseconds.
    pub fn last_frame_nanos(&self) -> u64 {
        self.last_frame_nanos
    }

    /// Folds the delta between `now_nanos` and the recorded baseline into the
    /// estimate. A zero (or negative) delta leaves the estimate unchanged.
    pub fn update(&mut self, now_nanos: u64) {
        let delta = now_nanos.saturating_sub(self.last_frame_nanos);
        if delta == 0 {
            return;
        }
        let rate = (NANOS_PER_SECOND / delta as f64) as f32;
        self.apply_rate(rate);
    }

    /// Folds an already-computed instantaneous rate into the estimate.
    pub fn apply_rate(&mut self, rate: f32) {
        self.estimate = self.estimate * SMOOTHING + rate * (1.0 - SMOOTHING);
    }

    /// Records the end of a tick as the baseline for the next delta.
    pub fn record_baseline(&mut self, now_nanos: u64) {
        self.last_frame_nanos = now_nanos;
    }
}

impl Default for FrameRateEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MS: u64 = 1_000_000;

    #[test]
    fn starts_at_ten() {
        assert_relative_eq!(FrameRateEstimator::new().estimate(), 10.0);
    }

    #[test]
    fn one_update_at_twenty_fps_moves_ten_to_eleven() {
        let mut estimator = FrameRateEstimator::new();
        estimator.record_baseline(1_000 * MS);
        estimator.update(1_050 * MS);
        assert_relative_eq!(estimator.estimate(), 11.0, epsilon = 1e-4);
    }

    #[test]
    fn apply_rate_follows_the_recurrence() {
        let mut estimator = FrameRateEstimator::new();
        estimator.apply_rate(20.0);
        assert_relative_eq!(estimator.estimate(), 11.0, epsilon = 1e-5);
        estimator.apply_rate(20.0);
        assert_relative_eq!(estimator.estimate(), 11.9, epsilon = 1e-4);
    }

    #[test]
    fn zero_delta_is_ignored() {
        let mut estimator = FrameRateEstimator::new();
        estimator.record_baseline(5 * MS);
        estimator.update(5 * MS);
        assert_relative_eq!(estimator.estimate(), 10.0);
    }

    #[test]
    fn converges_towards_a_steady_rate() {
        let mut estimator = FrameRateEstimator::new();
        let mut now = 0;
        for _ in 0..200 {
            estimator.record_baseline(now);
            now += 16_666_667;
            estimator.update(now);
        }
        assert_relative_eq!(estimator.estimate(), 60.0, epsilon = 0.05);
    }
}
