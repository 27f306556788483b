//! Fixed-capacity trailing moving average.

use std::collections::VecDeque;

/// Trailing mean over the last `window_size` samples.
///
/// The buffer never grows past `window_size`; the oldest sample is evicted
/// first and the running sum keeps each update O(1).
#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverage {
    window_size: usize,
    buffer: VecDeque<f64>,
    sum: f64,
}

impl MovingAverage {
    /// `window_size` of 0 is treated as 1
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
            sum: 0.0,
        }
    }

    /// Push a sample and return the mean of the current window
    pub fn push(&mut self, x: f64) -> f64 {
        if self.buffer.len() == self.window_size {
            if let Some(oldest) = self.buffer.pop_front() {
                self.sum -= oldest;
            }
        }
        self.buffer.push_back(x);
        self.sum += x;

        self.sum / self.buffer.len() as f64
    }

    /// Mean of the current window, if any sample has been pushed
    pub fn mean(&self) -> Option<f64> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.sum / self.buffer.len() as f64)
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.sum = 0.0;
    }
}
