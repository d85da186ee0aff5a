//! Live output through cpal.
//!
//! Opens the default output device, moves the [`Renderer`] into the device
//! callback and keeps the control half for the caller.
//!
//! ```ignore
//! use hyperflora::{runtime::FloraHost, EngineConfig, PitchClass, Snapshot};
//!
//! let mut host = FloraHost::open(EngineConfig::default())?;
//! let patch = Snapshot::default();
//! host.controller().set_parameters(&patch);
//! host.controller().trigger(PitchClass::C, 4, &patch);
//! ```
//!
//! [`Renderer`]: crate::Renderer

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info};

use crate::analysis::Analyser;
use crate::engine::{engine, Controller, EngineConfig};
use crate::error::EngineError;

pub struct FloraHost {
    controller: Controller,
    analyser: Analyser,
    stream: Option<cpal::Stream>,
    device_name: String,
    channels: usize,
}

impl FloraHost {
    /// Open the default output device and start rendering.
    ///
    /// The device's sample rate overrides `config.sample_rate`. Any failure
    /// leaves nothing running.
    pub fn open(config: EngineConfig) -> Result<Self, EngineError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| EngineError::Unavailable("no default output device".into()))?;
        let device_name = device.name().unwrap_or_else(|_| "unknown device".into());

        let supported = device.default_output_config()?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(EngineError::Unavailable(format!(
                "unsupported sample format {:?}",
                supported.sample_format()
            )));
        }

        let sample_rate = supported.sample_rate().0 as f32;
        let channels = supported.channels() as usize;

        let parts = engine(config.sample_rate(sample_rate));
        let mut renderer = parts.renderer;

        let stream = device.build_output_stream(
            &supported.into(),
            move |data: &mut [f32], _| renderer.render_interleaved(data, channels),
            |err| error!(%err, "output stream error"),
            None,
        )?;
        stream.play()?;

        info!(device = %device_name, sample_rate, channels, "output stream started");

        Ok(Self {
            controller: parts.controller,
            analyser: parts.analyser,
            stream: Some(stream),
            device_name,
            channels,
        })
    }

    pub fn controller(&mut self) -> &mut Controller {
        &mut self.controller
    }

    pub fn analyser(&mut self) -> &mut Analyser {
        &mut self.analyser
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Close the engine and drop the stream (and with it the renderer and
    /// every voice still connected). Idempotent.
    pub fn shutdown(&mut self) {
        self.controller.shutdown();
        if let Some(stream) = self.stream.take() {
            if let Err(err) = stream.pause() {
                error!(%err, "failed to pause output stream");
            }
        }
    }
}

impl Drop for FloraHost {
    fn drop(&mut self) {
        self.shutdown();
    }
}
