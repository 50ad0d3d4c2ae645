//! Pattern generator
//!
//! Synthesizes the active pattern once per tick and pushes the samples to a
//! [`SampleSink`]. Timing follows the same portable scheme as a frame
//! scheduler: `tick` returns the next deadline and the caller sleeps, or
//! `run` does both on top of `embassy-time`.

use core::fmt;

use embassy_time::{Duration, Instant, Timer};
use log::{debug, info, warn};

use crate::intent::GeneratorControl;
use crate::pattern::{Pattern, PatternSlot};

/// Highest supported update rate, bounded by 1 ms timing granularity.
pub const MAX_UPDATE_RATE_HZ: u32 = 1000;

/// How long an idle (not started) generator asks the caller to wait.
pub const IDLE_POLL: Duration = Duration::from_millis(100);

/// Consumer of generated samples
///
/// Called synchronously from the generator's tick, so it must not block
/// for long or it delays subsequent ticks.
pub trait SampleSink {
    /// Receive one tick worth of samples
    ///
    /// `samples` holds a single value for scalar patterns and one value per
    /// lane for bursts. `cycle_complete` is set on the last tick of a cycle.
    fn on_samples(&mut self, samples: &[f32], pattern: Pattern, cycle_complete: bool);
}

impl<T: SampleSink + ?Sized> SampleSink for &mut T {
    fn on_samples(&mut self, samples: &[f32], pattern: Pattern, cycle_complete: bool) {
        (**self).on_samples(samples, pattern, cycle_complete);
    }
}

/// [`SampleSink`] backed by a closure
pub struct FnSink<F>(pub F);

impl<F: FnMut(&[f32], Pattern, bool)> SampleSink for FnSink<F> {
    fn on_samples(&mut self, samples: &[f32], pattern: Pattern, cycle_complete: bool) {
        (self.0)(samples, pattern, cycle_complete);
    }
}

/// Shape parameters shared by all patterns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Full-scale sample value
    pub amplitude: f32,
    /// Length of one Hann window pulse
    pub pulse_duration: Duration,
    /// Length of one Morse unit (a dot)
    pub morse_unit: Duration,
    /// Lanes lit behind the knight rider head
    pub trail_length: u8,
    /// Seed of the noise pattern
    pub noise_seed: u64,
}

impl GeneratorConfig {
    pub const DEFAULT: Self = Self {
        amplitude: 2000.0,
        pulse_duration: Duration::from_millis(1000),
        morse_unit: Duration::from_millis(120),
        trail_length: 4,
        noise_seed: 0x5EED,
    };
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Error returned by [`PatternGenerator::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
    /// The generator (or another one sharing its control) already runs
    AlreadyStarted,
    /// Pixel count is zero or exceeds the generator capacity
    InvalidPixelCount(usize),
    /// Update rate is zero or above [`MAX_UPDATE_RATE_HZ`]
    InvalidUpdateRate(u32),
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::AlreadyStarted => write!(f, "Generator is already started"),
            StartError::InvalidPixelCount(count) => write!(f, "Invalid pixel count {}", count),
            StartError::InvalidUpdateRate(rate) => write!(f, "Invalid update rate {} Hz", rate),
        }
    }
}

/// Result of a tick.
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// The deadline for the next tick.
    pub next_deadline: Instant,
    /// How long to wait until the next tick (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Number of samples pushed to the sink.
    pub emitted: usize,
}

struct Running<S> {
    sink: S,
    pixel_count: usize,
    update_rate_hz: u32,
    tick_period: Duration,
}

/// Periodic pattern generator.
///
/// `MAX_PIXELS` bounds the burst length; the pixel count given to
/// [`start`](Self::start) may be smaller.
pub struct PatternGenerator<'a, S: SampleSink, const MAX_PIXELS: usize> {
    control: &'a GeneratorControl,
    config: GeneratorConfig,
    running: Option<Running<S>>,

    // Pattern state, only touched from the tick context
    pattern: Pattern,
    slot: PatternSlot,
    phase: u32,
    done: bool,
    deferred: Option<Pattern>,
    switches: u64,

    next_tick: Instant,
    samples: [f32; MAX_PIXELS],
}

impl<'a, S: SampleSink, const MAX_PIXELS: usize> PatternGenerator<'a, S, MAX_PIXELS> {
    pub fn new(control: &'a GeneratorControl, config: GeneratorConfig) -> Self {
        Self {
            control,
            config,
            running: None,
            pattern: Pattern::None,
            slot: PatternSlot::Silence,
            phase: 0,
            done: false,
            deferred: None,
            switches: 0,
            next_tick: Instant::from_millis(0),
            samples: [0.0; MAX_PIXELS],
        }
    }

    /// Begin periodic emission of `pattern` into `sink`.
    pub fn start(
        &mut self,
        pattern: Pattern,
        pixel_count: usize,
        update_rate_hz: u32,
        sink: S,
    ) -> Result<(), StartError> {
        if self.running.is_some() || self.control.is_started() {
            warn!("generator: start rejected, already started");
            return Err(StartError::AlreadyStarted);
        }
        if pixel_count == 0 || pixel_count > MAX_PIXELS {
            warn!("generator: start rejected, invalid pixel count {}", pixel_count);
            return Err(StartError::InvalidPixelCount(pixel_count));
        }
        if update_rate_hz == 0 || update_rate_hz > MAX_UPDATE_RATE_HZ {
            warn!("generator: start rejected, invalid update rate {}", update_rate_hz);
            return Err(StartError::InvalidUpdateRate(update_rate_hz));
        }

        self.running = Some(Running {
            sink,
            pixel_count,
            update_rate_hz,
            tick_period: Duration::from_micros(1_000_000 / u64::from(update_rate_hz)),
        });
        self.switch_to(pattern, update_rate_hz);
        self.next_tick = Instant::from_millis(0);
        self.control.mark_started();

        info!(
            "generator: started {} with {} pixels at {} Hz",
            pattern.as_str(),
            pixel_count,
            update_rate_hz
        );
        Ok(())
    }

    /// Run one tick and return timing information.
    ///
    /// This method:
    /// 1. Applies drift correction if we've fallen too far behind
    /// 2. Takes pending restart and switch intents
    /// 3. Renders the current pattern and pushes it to the sink
    /// 4. Returns the deadline for the next tick
    pub fn tick(&mut self, now: Instant) -> TickResult {
        let Some(tick_period) = self.running.as_ref().map(|running| running.tick_period) else {
            return TickResult {
                next_deadline: now + IDLE_POLL,
                sleep_duration: IDLE_POLL,
                emitted: 0,
            };
        };

        // Drift correction: if we've fallen too far behind, reset to now
        // This prevents catch-up bursts after long stalls
        let max_drift = tick_period * 2;
        if now > self.next_tick + max_drift {
            self.next_tick = now;
        }

        let emitted = self.emit();

        self.next_tick += tick_period;
        let sleep_duration = if self.next_tick > now {
            self.next_tick - now
        } else {
            Duration::from_ticks(0)
        };

        TickResult {
            next_deadline: self.next_tick,
            sleep_duration,
            emitted,
        }
    }

    /// Tick forever at the configured rate.
    pub async fn run(&mut self) {
        loop {
            let result = self.tick(Instant::now());
            Timer::at(result.next_deadline).await;
        }
    }

    /// Currently active pattern
    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Phase the next tick will render
    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Whether a single-shot pattern reached its all-zero terminal state
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn is_started(&self) -> bool {
        self.running.is_some()
    }

    pub fn pixel_count(&self) -> Option<usize> {
        self.running.as_ref().map(|running| running.pixel_count)
    }

    pub fn tick_period(&self) -> Option<Duration> {
        self.running.as_ref().map(|running| running.tick_period)
    }

    /// Get a reference to the sink.
    pub fn sink(&self) -> Option<&S> {
        self.running.as_ref().map(|running| &running.sink)
    }

    /// Get a mutable reference to the sink.
    pub fn sink_mut(&mut self) -> Option<&mut S> {
        self.running.as_mut().map(|running| &mut running.sink)
    }

    /// Render one tick into the sink, returns the number of samples
    fn emit(&mut self) -> usize {
        let Some((pixel_count, update_rate_hz)) = self
            .running
            .as_ref()
            .map(|running| (running.pixel_count, running.update_rate_hz))
        else {
            return 0;
        };

        self.apply_intents(update_rate_hz);

        let lanes = &mut self.samples[..pixel_count];
        let cycle_len = self.slot.cycle_len(pixel_count);
        let (emitted, cycle_complete) = if self.done {
            (self.slot.render_idle(lanes), false)
        } else {
            let emitted = self.slot.render(self.phase, lanes);
            (emitted, self.phase + 1 >= cycle_len)
        };

        if let Some(running) = self.running.as_mut() {
            running
                .sink
                .on_samples(&self.samples[..emitted], self.pattern, cycle_complete);
        }

        if cycle_complete {
            self.finish_cycle(update_rate_hz);
        } else if !self.done {
            self.phase += 1;
        }

        emitted
    }

    /// Take pending intents, applied atomically at the tick boundary
    fn apply_intents(&mut self, update_rate_hz: u32) {
        let intents = self.control.take();

        if let Some(switch) = intents.switch {
            // A finished single-shot pattern sits on a cycle boundary
            if switch.restart_immediately || self.done {
                self.switch_to(switch.pattern, update_rate_hz);
            } else {
                debug!(
                    "generator: {} deferred to the end of the cycle",
                    switch.pattern.as_str()
                );
                self.deferred = Some(switch.pattern);
            }
        }

        if intents.restart {
            debug!("generator: restarting {}", self.pattern.as_str());
            self.phase = 0;
            self.done = false;
        }
    }

    /// Handle the natural end of a cycle
    fn finish_cycle(&mut self, update_rate_hz: u32) {
        if let Some(pattern) = self.deferred.take() {
            self.switch_to(pattern, update_rate_hz);
        } else if self.slot.is_repeating() {
            self.phase = 0;
        } else {
            self.done = true;
        }
    }

    /// Install `pattern` from phase zero
    fn switch_to(&mut self, pattern: Pattern, update_rate_hz: u32) {
        let seed = self.config.noise_seed.wrapping_add(self.switches);
        self.switches = self.switches.wrapping_add(1);

        self.slot = pattern.to_slot(&self.config, update_rate_hz, seed);
        self.pattern = pattern;
        self.phase = 0;
        self.done = false;
        self.deferred = None;

        debug!("generator: switched to {}", pattern.as_str());
    }
}
