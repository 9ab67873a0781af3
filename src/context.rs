//! Service context wiring the notifier for the selected mode.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;

use crate::adapters::live::LivePushoverClient;
use crate::adapters::recording::RecordingNotifier;
use crate::adapters::replaying::ReplayingNotifier;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::Config;
use crate::error::Error;
use crate::ports::notifier::{Notifier, Recipient};

/// Port implementations and recipient for one run.
pub struct ServiceContext {
    /// Delivers the composed notification.
    pub notifier: Box<dyn Notifier>,
    /// Who receives it.
    pub recipient: Recipient,
    /// Present while recording; written by [`finish`](Self::finish).
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Picks live, recording, or replaying delivery from `config`.
    ///
    /// Replay wins over recording when both are configured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cassette`] if the replay cassette cannot be loaded.
    pub fn from_config(config: &Config, command: &str) -> Result<Self, Error> {
        if let Some(path) = &config.replay_path {
            return Self::replaying(config, path);
        }
        if let Some(dir) = &config.record_dir {
            return Ok(Self::recording(config, dir, command));
        }
        Ok(Self::live(config))
    }

    /// Sends through the Pushover API.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        Self::with_notifier(config, Box::new(live_client(config)))
    }

    /// Sends through the Pushover API and records the interaction to a
    /// timestamped cassette in `dir`.
    #[must_use]
    pub fn recording(config: &Config, dir: &Path, command: &str) -> Self {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S");
        let path = dir.join(format!("notify-{timestamp}.cassette.yaml"));
        let recorder =
            Arc::new(Mutex::new(CassetteRecorder::new(path, format!("notify-{timestamp}"), command)));

        let notifier = RecordingNotifier::new(Box::new(live_client(config)), Arc::clone(&recorder));
        let mut ctx = Self::with_notifier(config, Box::new(notifier));
        ctx.recorder = Some(recorder);
        ctx
    }

    /// Serves delivery results from the cassette at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cassette`] if the cassette cannot be read or parsed.
    pub fn replaying(config: &Config, path: &Path) -> Result<Self, Error> {
        let replayer = CassetteReplayer::load(path).map_err(Error::Cassette)?;
        Ok(Self::with_notifier(config, Box::new(ReplayingNotifier::new(replayer))))
    }

    /// Uses an arbitrary notifier.
    #[must_use]
    pub fn with_notifier(config: &Config, notifier: Box<dyn Notifier>) -> Self {
        Self {
            notifier,
            recipient: Recipient { user_key: config.user_key.clone(), device: config.device.clone() },
            recorder: None,
        }
    }

    /// Writes the cassette when recording; returns where it went.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cassette`] if the cassette cannot be written.
    pub fn finish(self) -> Result<Option<PathBuf>, Error> {
        let Self { notifier, recorder, .. } = self;
        // Release the recording adapter's handle on the recorder.
        drop(notifier);

        let Some(recorder) = recorder else {
            return Ok(None);
        };
        let recorder = Arc::try_unwrap(recorder)
            .map_err(|_| Error::Cassette("recorder is still in use".into()))?
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let path = recorder
            .finish()
            .map_err(|e| Error::Cassette(format!("failed to write cassette: {e}")))?;
        Ok(Some(path))
    }
}

fn live_client(config: &Config) -> LivePushoverClient {
    LivePushoverClient::new(config.api_url.clone(), config.api_token.clone())
}
