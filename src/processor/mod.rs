//! The in-place audio processor chain abstraction (spec §4.2, component C2)
//! and its canonical DSP stages (spec §4.3, component C3).

pub mod highpass;
pub mod normalize;

use crate::error::ConfigError;

/// A single in-place DSP stage. `initialize` must succeed before `process`
/// is called; once it has, `process` is infallible — a degraded internal
/// state logs and passes samples through rather than returning an error
/// (spec §7, kind 4), since the real-time capture thread cannot afford to
/// drop audio.
pub trait Processor: Send {
    /// Prepare the stage for the given format. May allocate; never called
    /// again with different parameters without an intervening `reset`.
    fn initialize(&mut self, sample_rate: u32, channels: u16) -> Result<(), ConfigError>;

    /// Process `samples` in place. `samples.len()` is always a whole number
    /// of frames (`frames * channels`). No allocation after `initialize`
    /// has succeeded.
    fn process(&mut self, samples: &mut [i16]);

    /// Clear internal state so the next `process` behaves as if freshly
    /// initialized, without repeating `initialize`.
    fn reset(&mut self);
}

/// Ordered sequence of `Processor` stages sharing one `(sample_rate,
/// channels)` configuration. Insertion order is processing order.
pub struct ProcessorChain {
    processors: Vec<Box<dyn Processor>>,
    initialized: bool,
    sample_rate: u32,
    channels: u16,
}

impl Default for ProcessorChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessorChain {
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
            initialized: false,
            sample_rate: 0,
            channels: 0,
        }
    }

    /// Add a processor. Only permitted while the chain is uninitialized;
    /// processors are owned exclusively by the chain thereafter.
    pub fn add(&mut self, processor: Box<dyn Processor>) -> Result<(), ConfigError> {
        if self.initialized {
            return Err(ConfigError::ChainAlreadyInitialized);
        }
        self.processors.push(processor);
        Ok(())
    }

    /// Initialize (or re-initialize, on an idle chain) every processor in
    /// insertion order. If any stage fails, previously initialized stages
    /// are reset and the chain remains uninitialized.
    pub fn initialize(&mut self, sample_rate: u32, channels: u16) -> Result<(), ConfigError> {
        self.initialized = false;
        for (idx, processor) in self.processors.iter_mut().enumerate() {
            if let Err(err) = processor.initialize(sample_rate, channels) {
                for earlier in self.processors[..idx].iter_mut() {
                    earlier.reset();
                }
                return Err(err);
            }
        }
        self.sample_rate = sample_rate;
        self.channels = channels;
        self.initialized = true;
        Ok(())
    }

    /// Run every stage's `process` on `samples`, in insertion order, on the
    /// same in-place buffer.
    pub fn process(&mut self, samples: &mut [i16]) {
        if !self.initialized {
            tracing::warn!("ProcessorChain::process called before initialize; ignoring");
            return;
        }
        for processor in self.processors.iter_mut() {
            processor.process(samples);
        }
    }

    /// Reset every stage. Does not clear the initialized flag: the chain
    /// reports the parameters it was last initialized with.
    pub fn reset(&mut self) {
        for processor in self.processors.iter_mut() {
            processor.reset();
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}
