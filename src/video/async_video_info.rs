use std::process::Command;
use std::thread;
use tokio::sync::mpsc;
use crate::core::MediaSource;

/// Result of probing a source for its metadata
#[derive(Debug, Clone)]
pub struct VideoInfoResult {
    pub request_id: u64,
    pub source: MediaSource,
    pub result: Result<f64, String>,
}

/// Probes media duration with ffprobe on background threads so loading never
/// blocks the UI thread.
pub struct AsyncVideoInfoLoader {
    result_sender: mpsc::UnboundedSender<VideoInfoResult>,
    result_receiver: mpsc::UnboundedReceiver<VideoInfoResult>,
}

impl AsyncVideoInfoLoader {
    pub fn new() -> Self {
        let (result_sender, result_receiver) = mpsc::unbounded_channel();
        Self {
            result_sender,
            result_receiver,
        }
    }

    /// Request the duration of `source` (non-blocking)
    pub fn request(&self, source: MediaSource, request_id: u64) {
        let result_tx = self.result_sender.clone();

        thread::spawn(move || {
            log::debug!("Probing metadata for: {}", source);

            let result = match probe_duration(&source) {
                Ok(duration) => {
                    log::debug!("Probed {} (duration: {:.2}s)", source, duration);
                    Ok(duration)
                }
                Err(e) => {
                    log::debug!("Failed to probe {} - {}", source, e);
                    Err(e.to_string())
                }
            };

            let response = VideoInfoResult {
                request_id,
                source,
                result,
            };

            // Receiver is gone when the element was dropped mid-probe
            if let Err(e) = result_tx.send(response) {
                log::debug!("Dropping probe result: {}", e);
            }
        });
    }

    /// Completed probe results (non-blocking)
    pub fn completed(&mut self) -> Vec<VideoInfoResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.result_receiver.try_recv() {
            results.push(result);
        }
        results
    }

    #[cfg(test)]
    pub(crate) fn inject(&self, result: VideoInfoResult) {
        let _ = self.result_sender.send(result);
    }
}

impl Default for AsyncVideoInfoLoader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn probe_duration(source: &MediaSource) -> anyhow::Result<f64> {
    let output = Command::new("ffprobe")
        .arg("-v").arg("quiet")
        .arg("-print_format").arg("json")
        .arg("-show_format")
        .arg(source.as_probe_input())
        .output()
        .map_err(|e| anyhow::anyhow!("Failed to run ffprobe: {}", e))?;

    if !output.status.success() {
        return Err(anyhow::anyhow!("Unsupported or unreachable media: {}", source));
    }

    let json_str = String::from_utf8(output.stdout)?;
    parse_probe_duration(&json_str)
}

/// Extracts `format.duration` from ffprobe's JSON output.
pub fn parse_probe_duration(json_str: &str) -> anyhow::Result<f64> {
    let info: serde_json::Value = serde_json::from_str(json_str)?;

    let duration = info["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| info["format"]["duration"].as_f64())
        .ok_or_else(|| anyhow::anyhow!("Media reports no duration"))?;

    if !duration.is_finite() || duration <= 0.0 {
        return Err(anyhow::anyhow!("Media reports an invalid duration: {}", duration));
    }

    Ok(duration)
}
