use std::io::{self, Write};

use crate::core::classifier::{classify_detailed, ClassificationReason};
use crate::core::profiles::{model_display_name, select_model};

pub fn print_classification(text: &str) {
    let mut stdout = io::stdout().lock();
    // Nothing useful to do if stdout is gone.
    let _ = write_classification(&mut stdout, text);
}

pub fn write_classification<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    let classification = classify_detailed(text);
    let profile = select_model(classification.category);

    let reason = match classification.reason {
        ClassificationReason::CodingOverride => "coding phrase".to_string(),
        ClassificationReason::ResearchOverride => "research phrase".to_string(),
        ClassificationReason::Scored { coding, research } => {
            format!("keyword score {coding} coding / {research} research")
        }
    };

    writeln!(out, "category:    {} ({reason})", classification.category)?;
    writeln!(
        out,
        "model:       {} ({})",
        profile.model,
        model_display_name(profile.model)
    )?;
    writeln!(out, "temperature: {}", profile.temperature)?;
    writeln!(out, "max tokens:  {}", profile.max_tokens)?;
    if classification.overlapping_overrides {
        writeln!(
            out,
            "note:        matched both coding and research phrases; coding wins"
        )?;
    }
    Ok(())
}
