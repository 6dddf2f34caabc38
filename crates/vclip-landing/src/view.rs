//! Plain-text rendering of the widget state.

use std::fmt::Write;

use vclip_landing_models::{PollState, ProcessingPhase, UploadPhase};

use crate::state::WidgetState;

/// Render the widget as it would appear to the user.
///
/// Clip links are resolved against `base_url`.
pub fn render(state: &WidgetState, base_url: &str) -> String {
    let mut out = String::new();
    let upload = &state.upload;
    let file_name = upload.file_name.as_deref().unwrap_or("");

    match upload.phase {
        UploadPhase::Idle => {
            out.push_str("Drop your video here\n");
        }
        UploadPhase::Uploading => {
            let _ = writeln!(out, "Uploading...");
            let _ = writeln!(out, "{}", file_name);
            let _ = writeln!(out, "{}% complete", upload.upload_progress);
        }
        UploadPhase::Error => {
            let _ = writeln!(out, "Upload Failed");
            let _ = writeln!(out, "{}", file_name);
            if let Some(error) = &upload.error {
                let _ = writeln!(out, "{}", error.message);
            }
            let _ = writeln!(out, "Try again");
        }
        UploadPhase::Uploaded => match upload.processing_phase {
            None => {
                let _ = writeln!(out, "Video ready for processing!");
                let _ = writeln!(out, "{}", file_name);
                if state.lead.visible {
                    let _ = writeln!(
                        out,
                        "Submit your phone number to receive your viral shorts"
                    );
                    if state.lead.submitting {
                        let _ = writeln!(out, "Sending...");
                    }
                    if let Some(message) = &state.lead.error_message {
                        let _ = writeln!(out, "{}", message);
                    }
                }
            }
            Some(ProcessingPhase::Processing) => {
                let percent = upload.processing_progress_percent.unwrap_or(0.0);
                let _ = writeln!(out, "Processing your video...");
                let _ = writeln!(out, "{}", file_name);
                let _ = writeln!(out, "AI is creating viral shorts from your video...");
                let _ = writeln!(out, "{}% complete", percent.round() as u32);
            }
            Some(ProcessingPhase::Success) => {
                let _ = writeln!(out, "Video processed successfully!");
                let _ = writeln!(out, "{}", file_name);
                if let Some(clips) = &upload.result_clips {
                    let _ = writeln!(out, "Generated {} viral shorts!", clips.len());
                    for clip in clips {
                        let _ = writeln!(
                            out,
                            "  {} ({}) {}",
                            clip.filename,
                            clip.display_size(),
                            clip.download_url(base_url)
                        );
                    }
                }
            }
            Some(ProcessingPhase::Failure) => {
                let _ = writeln!(out, "Processing failed");
                let _ = writeln!(out, "{}", file_name);
            }
        },
    }

    if state.poll == PollState::TimedOut {
        let _ = writeln!(
            out,
            "Still processing. Stopped checking for updates; check back later."
        );
    }

    out
}
