use std::path::PathBuf;

use refiner_core::{ArtifactKind, InputMethod, Msg, Page};

pub const HELP_TEXT: &str = "\
Commands:
  home | refine | interview     switch page (the page starts fresh)
  upload <path>                 choose the resume file (.pdf, .doc, .docx)
  method text|url               paste the job description or use a posting URL
  jd <text>                     set the pasted job description
  url <link>                    set the job posting URL
  cover on|off                  also generate a cover letter
  submit                        refine the resume / generate questions
  download resume|cover         save the refined resume or cover letter
  restart                       start a new refinement
  company <name>                company for interview prep
  role <title>                  role for interview prep
  resume on|off                 include resume text in interview prep
  resume-text <text>            resume text for interview prep
  help                          show this list
  quit                          exit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Msg),
    /// The file is read by the caller; parsing stays free of IO.
    Upload(PathBuf),
    /// `submit` means different things on each page.
    Submit,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "home" => Command::Dispatch(Msg::NavigateTo(Page::Home)),
        "refine" => Command::Dispatch(Msg::NavigateTo(Page::Refine)),
        "interview" => Command::Dispatch(Msg::NavigateTo(Page::Interview)),
        "upload" if rest.is_empty() => Command::Invalid("upload needs a file path".into()),
        "upload" => Command::Upload(PathBuf::from(rest)),
        "method" => match rest.to_ascii_lowercase().as_str() {
            "text" => Command::Dispatch(Msg::InputMethodChanged(InputMethod::Text)),
            "url" => Command::Dispatch(Msg::InputMethodChanged(InputMethod::Url)),
            _ => Command::Invalid("method must be text or url".into()),
        },
        "jd" => Command::Dispatch(Msg::JobDescriptionChanged(rest.to_string())),
        "url" => Command::Dispatch(Msg::JobDescriptionUrlChanged(rest.to_string())),
        "cover" => on_off(rest, "cover").map_or_else(Command::Invalid, |on| {
            Command::Dispatch(Msg::CoverLetterToggled(on))
        }),
        "submit" => Command::Submit,
        "download" => match rest.to_ascii_lowercase().as_str() {
            "resume" => Command::Dispatch(Msg::DownloadClicked(ArtifactKind::Resume)),
            "cover" | "cover-letter" => {
                Command::Dispatch(Msg::DownloadClicked(ArtifactKind::CoverLetter))
            }
            _ => Command::Invalid("download must be resume or cover".into()),
        },
        "restart" => Command::Dispatch(Msg::RestartClicked),
        "company" => Command::Dispatch(Msg::CompanyNameChanged(rest.to_string())),
        "role" => Command::Dispatch(Msg::RoleTitleChanged(rest.to_string())),
        "resume" => on_off(rest, "resume").map_or_else(Command::Invalid, |on| {
            Command::Dispatch(Msg::IncludeResumeToggled(on))
        }),
        "resume-text" => Command::Dispatch(Msg::ResumeTextChanged(rest.to_string())),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command {other:?}; type help")),
    }
}

/// Picks the submit message for the page the user is on.
pub fn submit_msg(page: Page) -> Msg {
    match page {
        Page::Refine => Msg::RefineSubmitted,
        Page::Interview => Msg::InterviewSubmitted,
        Page::Home => Msg::NoOp,
    }
}

fn on_off(value: &str, verb: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" => Ok(true),
        "off" | "no" | "false" => Ok(false),
        _ => Err(format!("{verb} must be on or off")),
    }
}
