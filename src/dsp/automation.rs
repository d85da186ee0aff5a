use crate::MIN_TIME;

/*
Parameter Automation
====================

Instead of poking a value from the control thread and hoping the audio
thread sees it at the right moment, every moving parameter owns a timeline
of events stamped with ABSOLUTE render-clock time (seconds). The render
thread evaluates the timeline once per sample; the control thread only ever
appends events.

Events
------

  SetValue(t, v)             jump to v at t
  LinearRamp(t, v)           straight line from the previous event to v at t
  ExponentialRamp(t, v)      geometric curve from the previous event to v at t
  SetTarget(t, v, τ)         from t on, approach v exponentially:
                               value = v + (start - v) · e^(-(now - t) / τ)

A ramp starts where the previous event left off (its time and value), so a
gate envelope is just a handful of events:

    SetValue(t0, 0) ─ LinearRamp(t0 + a, 1) ─ SetValue(t0 + a + d, 1) ─ SetTarget(…, 0, τ)

    1.0 ┤   ╱‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾╲
        │  ╱                      ╲_
    0.0 ┼─╱                          ‾‾‾‾───────
        t0

Ordering
--------

Events are kept sorted by time. An event scheduled at the same time as an
existing one goes AFTER it, so the latest write wins. An event stamped in
the past is applied on the next evaluation: late control messages still
converge on the value they asked for.

Exponential ramps follow the browser rule: if the start value is zero or the
two endpoints differ in sign, the value holds until the ramp's end time and
then jumps.

Consumed events are dropped when new ones are scheduled, so a parameter that
is retargeted forever does not grow without bound.
*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamEvent {
    SetValue { time: f64, value: f32 },
    LinearRamp { time: f64, value: f32 },
    ExponentialRamp { time: f64, value: f32 },
    SetTarget { time: f64, target: f32, time_constant: f64 },
}

impl ParamEvent {
    pub fn time(&self) -> f64 {
        match *self {
            ParamEvent::SetValue { time, .. }
            | ParamEvent::LinearRamp { time, .. }
            | ParamEvent::ExponentialRamp { time, .. }
            | ParamEvent::SetTarget { time, .. } => time,
        }
    }

    /// The value this event eventually settles at.
    fn end_value(&self) -> f32 {
        match *self {
            ParamEvent::SetValue { value, .. }
            | ParamEvent::LinearRamp { value, .. }
            | ParamEvent::ExponentialRamp { value, .. } => value,
            ParamEvent::SetTarget { target, .. } => target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Segment {
    Hold,
    Target { target: f32, time_constant: f64 },
}

pub struct AutomationParam {
    events: Vec<ParamEvent>,
    cursor: usize, // first event not yet reached

    // where the curve currently starts from
    anchor_time: f64,
    anchor_value: f32,
    segment: Segment,

    min: f32,
    max: f32,
}

impl AutomationParam {
    pub fn new(initial: f32) -> Self {
        Self {
            events: Vec::with_capacity(16),
            cursor: 0,
            anchor_time: 0.0,
            anchor_value: initial,
            segment: Segment::Hold,
            min: f32::MIN,
            max: f32::MAX,
        }
    }

    /// Clamp every evaluated value into `[min, max]`.
    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn set_value_at_time(&mut self, value: f32, time: f64) {
        self.schedule(ParamEvent::SetValue { time, value });
    }

    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, time: f64) {
        self.schedule(ParamEvent::LinearRamp { time, value });
    }

    pub fn exponential_ramp_to_value_at_time(&mut self, value: f32, time: f64) {
        self.schedule(ParamEvent::ExponentialRamp { time, value });
    }

    pub fn set_target_at_time(&mut self, target: f32, time: f64, time_constant: f64) {
        self.schedule(ParamEvent::SetTarget {
            time,
            target,
            time_constant: time_constant.max(MIN_TIME as f64),
        });
    }

    /// Insert an event in time order (after any event with the same time).
    pub fn schedule(&mut self, event: ParamEvent) {
        if self.cursor > 0 {
            self.events.drain(..self.cursor);
            self.cursor = 0;
        }

        let at = event.time();
        let index = self.events.partition_point(|e| e.time() <= at);
        self.events.insert(index, event);
    }

    /// Evaluate the timeline at `time`.
    ///
    /// Calls must use non-decreasing times; the render clock only moves forward.
    pub fn value_at(&mut self, time: f64) -> f32 {
        while let Some(&event) = self.events.get(self.cursor) {
            match event {
                ParamEvent::SetValue { time: at, value } => {
                    if at > time {
                        break;
                    }
                    self.anchor(at, value, Segment::Hold);
                }
                ParamEvent::SetTarget {
                    time: at,
                    target,
                    time_constant,
                } => {
                    if at > time {
                        break;
                    }
                    let start = self.segment_value(at);
                    self.anchor(at, start, Segment::Target {
                        target,
                        time_constant,
                    });
                }
                ParamEvent::LinearRamp { time: end, value }
                | ParamEvent::ExponentialRamp { time: end, value } => {
                    if end > time {
                        return self.clamp(self.ramp_value(&event, time));
                    }
                    self.anchor(end, value, Segment::Hold);
                }
            }
            self.cursor += 1;
        }

        self.clamp(self.segment_value(time))
    }

    /// Fill `out` with one value per sample starting at `start_time`.
    pub fn render(&mut self, out: &mut [f32], start_time: f64, sample_rate: f32) {
        let dt = 1.0 / sample_rate as f64;
        for (i, sample) in out.iter_mut().enumerate() {
            *sample = self.value_at(start_time + i as f64 * dt);
        }
    }

    /// Where the timeline ends up once every scheduled event has played out.
    pub fn settled_value(&self) -> f32 {
        let value = match self.events.last() {
            Some(event) if self.cursor < self.events.len() => event.end_value(),
            _ => match self.segment {
                Segment::Hold => self.anchor_value,
                Segment::Target { target, .. } => target,
            },
        };
        self.clamp(value)
    }

    /// Events scheduled but not yet reached.
    pub fn pending(&self) -> usize {
        self.events.len() - self.cursor
    }

    fn anchor(&mut self, time: f64, value: f32, segment: Segment) {
        self.anchor_time = time;
        self.anchor_value = value;
        self.segment = segment;
    }

    fn segment_value(&self, time: f64) -> f32 {
        match self.segment {
            Segment::Hold => self.anchor_value,
            Segment::Target {
                target,
                time_constant,
            } => {
                let elapsed = (time - self.anchor_time).max(0.0);
                let decay = (-elapsed / time_constant).exp() as f32;
                target + (self.anchor_value - target) * decay
            }
        }
    }

    fn ramp_value(&self, event: &ParamEvent, time: f64) -> f32 {
        let (t0, v0) = (self.anchor_time, self.anchor_value);
        let t1 = event.time();
        let span = t1 - t0;
        if span <= 0.0 {
            return event.end_value();
        }
        let progress = ((time - t0) / span).clamp(0.0, 1.0);

        match *event {
            ParamEvent::LinearRamp { value, .. } => v0 + (value - v0) * progress as f32,
            ParamEvent::ExponentialRamp { value, .. } => {
                if v0 == 0.0 || v0.signum() != value.signum() {
                    v0
                } else {
                    v0 * (value / v0).powf(progress as f32)
                }
            }
            _ => v0,
        }
    }

    #[inline]
    fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}
