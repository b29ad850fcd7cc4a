use std::fmt::Write;

use refiner_core::{
    AppViewModel, ArtifactKind, InputMethod, InterviewView, Page, RefineView, ReviewView, StageKind,
    STEP_LABELS,
};

const RULE: &str = "------------------------------------------------------------";
const SCORE_BAR_WIDTH: usize = 30;

/// Renders the whole screen for `view` as plain text.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    match view.page {
        Page::Home => render_home(&mut out),
        Page::Refine => {
            if let Some(refine) = &view.refine {
                render_refine(&mut out, refine);
            }
        }
        Page::Interview => {
            if let Some(interview) = &view.interview {
                render_interview(&mut out, interview);
            }
        }
    }
    out
}

fn render_home(out: &mut String) {
    line(out, RULE);
    line(out, "Resume Refiner");
    line(out, RULE);
    line(out, "  refine     Tailor your resume to a job description");
    line(out, "  interview  Prepare for an interview with generated questions");
    line(out, "Type `help` for all commands.");
}

fn render_refine(out: &mut String, view: &RefineView) {
    line(out, RULE);
    line(out, "Refine Your Resume");
    line(out, &stepper(view.active_step));
    line(out, RULE);

    if let Some(error) = &view.error {
        line(out, &format!("! {error}"));
    }

    match view.stage {
        StageKind::Upload => {
            line(out, "Upload your resume (.pdf, .doc, .docx): upload <path>");
        }
        StageKind::Describe => render_describe(out, view),
        StageKind::Review => {
            if let Some(review) = &view.review {
                render_review(out, review);
            }
        }
    }
}

fn render_describe(out: &mut String, view: &RefineView) {
    if let Some(name) = &view.file_name {
        line(out, &format!("Resume: {name}"));
    }
    let (text_mark, url_mark) = match view.input_method {
        InputMethod::Text => ("*", " "),
        InputMethod::Url => (" ", "*"),
    };
    line(
        out,
        &format!("[{text_mark}] Paste Job Description   [{url_mark}] Use Job Posting URL"),
    );
    match view.input_method {
        InputMethod::Text => line(
            out,
            &format!("Job description: {}", placeholder(&view.job_description)),
        ),
        InputMethod::Url => line(
            out,
            &format!("Job posting URL: {}", placeholder(&view.job_description_url)),
        ),
    }
    line(
        out,
        &format!("[{}] Generate Cover Letter", checkbox(view.wants_cover_letter)),
    );

    let status = if view.submitting {
        "Processing..."
    } else if view.submit_enabled {
        "ready: submit"
    } else {
        "add a job description to continue"
    };
    line(out, &format!("Refine Resume ({status})"));
}

fn render_review(out: &mut String, review: &ReviewView) {
    line(out, "Match Score");
    line(
        out,
        &format!("  {} {}", score_bar(review.match_percentage), review.match_label),
    );
    if !review.matched_requirements.is_empty() {
        line(
            out,
            &format!("  Matched: {}", review.matched_requirements.join(", ")),
        );
    }

    line(out, "");
    line(out, "Changes Made");
    if review.changes.is_empty() {
        line(out, "  (none)");
    }
    for change in &review.changes {
        line(out, &format!("  + {change}"));
    }

    line(out, "");
    line(out, "Refined Resume");
    indented(out, &review.refined_resume);
    line(
        out,
        &format!(
            "  {}",
            download_hint(review, ArtifactKind::Resume, &review.resume_filename)
        ),
    );

    if let (Some(cover_letter), Some(filename)) =
        (&review.cover_letter, &review.cover_letter_filename)
    {
        line(out, "");
        line(out, "Cover Letter");
        indented(out, cover_letter);
        line(
            out,
            &format!("  {}", download_hint(review, ArtifactKind::CoverLetter, filename)),
        );
    }

    if let Some(saved) = &review.last_saved {
        line(out, &format!("Saved {saved}"));
    }
    line(out, "");
    line(out, "Start New Refinement: restart");
}

fn render_interview(out: &mut String, view: &InterviewView) {
    line(out, RULE);
    line(out, "Interview Preparation");
    line(out, RULE);

    if let Some(error) = &view.error {
        line(out, &format!("! {error}"));
    }

    line(out, &format!("Company Name: {}", placeholder(&view.company_name)));
    line(out, &format!("Role Title: {}", placeholder(&view.role_title)));
    line(
        out,
        &format!("[{}] Include Resume", checkbox(view.include_resume)),
    );
    if view.include_resume {
        line(out, &format!("Resume text: {}", placeholder(&view.resume_text)));
    }

    let status = if view.submitting {
        "Generating..."
    } else if view.submit_enabled {
        "ready: submit"
    } else {
        "company and role are required"
    };
    line(out, &format!("Generate Questions ({status})"));

    if !view.questions.is_empty() {
        line(out, "");
        line(out, "Interview Questions & Answers");
        for row in &view.questions {
            line(out, &row.label);
            indented(out, &row.answer);
        }
    }
}

fn stepper(active_step: usize) -> String {
    STEP_LABELS
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let marker = if index == active_step { "*" } else { "" };
            format!("[{}{marker}] {label}", index + 1)
        })
        .collect::<Vec<_>>()
        .join(" > ")
}

fn score_bar(percentage: f64) -> String {
    let filled = ((percentage / 100.0) * SCORE_BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(SCORE_BAR_WIDTH);
    format!(
        "[{}{}]",
        "#".repeat(filled),
        ".".repeat(SCORE_BAR_WIDTH - filled)
    )
}

fn download_hint(review: &ReviewView, kind: ArtifactKind, filename: &str) -> String {
    let verb = match kind {
        ArtifactKind::Resume => "download resume",
        ArtifactKind::CoverLetter => "download cover",
    };
    if review.downloading == Some(kind) {
        format!("Downloading {filename}...")
    } else {
        format!("Download {filename}: {verb}")
    }
}

fn placeholder(value: &str) -> &str {
    if value.is_empty() {
        "(empty)"
    } else {
        value
    }
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "x"
    } else {
        " "
    }
}

fn indented(out: &mut String, text: &str) {
    for text_line in text.lines() {
        line(out, &format!("    {text_line}"));
    }
}

fn line(out: &mut String, text: &str) {
    let _ = writeln!(out, "{text}");
}
