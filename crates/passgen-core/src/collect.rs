//! Field collectors: console prompts and form submissions

use std::io::{BufRead, Write};

use passgen_pdf::ExportFormat;

use crate::error::{PassError, Result};
use crate::pipeline::FieldCollector;
use crate::request::{field, parse_pass_count, PassRequest, PassType};
use crate::session::Session;

/// Sequential prompts on a reader/writer pair (stdin/stdout in the binary)
pub struct ConsoleCollector<R, W> {
    input: R,
    output: W,
    ask_format: bool,
}

impl<R: BufRead, W: Write> ConsoleCollector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            ask_format: true,
        }
    }

    /// Skip the export format prompt and always produce DOCX
    pub fn without_format_prompt(mut self) -> Self {
        self.ask_format = false;
        self
    }

    /// Print `label` and read one line, without its line ending.
    ///
    /// End of input reads as an empty line.
    fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn select_pass_type(&mut self) -> Result<PassType> {
        writeln!(self.output, "Select Template:")?;
        for pass_type in PassType::ALL {
            writeln!(self.output, "{} - {}", pass_type.selection(), pass_type.label())?;
        }
        let choice = self.prompt("Enter 1, 2 or 3: ")?;
        PassType::from_selection(&choice)
    }

    fn select_format(&mut self) -> Result<ExportFormat> {
        let answer = self.prompt("Export format [docx/pdf] (default docx): ")?;
        if answer.trim().is_empty() {
            return Ok(ExportFormat::Docx);
        }
        answer
            .parse()
            .map_err(|_| PassError::InvalidSelection(answer.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> FieldCollector for ConsoleCollector<R, W> {
    fn collect(&mut self) -> Result<PassRequest> {
        let pass_type = self.select_pass_type()?;

        let event_name = self.prompt("Enter Event Name: ")?;
        let dates = self.prompt("Enter Dates (e.g. 07/24/2025): ")?;
        let cell_phone = self.prompt("Enter Cell Phone #: ")?;

        let mut extras = Vec::new();
        if pass_type == PassType::LoadUnload {
            extras.push((field::TIME_ENTERED, self.prompt("Enter BOH Time: ")?));
            extras.push((field::DECK, self.prompt("Enter Deck Number: ")?));
        }

        let count = parse_pass_count(&self.prompt("How many passes? ")?)?;
        let format = if self.ask_format {
            self.select_format()?
        } else {
            ExportFormat::Docx
        };

        let mut request = PassRequest::new(pass_type, event_name, dates, cell_phone, count)?
            .with_export_format(format);
        for (name, value) in extras {
            request = request.with_extra(name, value);
        }
        Ok(request)
    }
}

/// Typed values from the form surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub pass_type: PassType,
    pub event_name: String,
    pub dates: String,
    pub cell_phone: String,
    pub pass_count: u32,
    /// Only used for load/unload passes
    pub time_entered: Option<String>,
    /// Only used for load/unload passes
    pub deck: Option<String>,
    pub export_format: ExportFormat,
}

/// Builds the request from a form submission, once the session is unlocked
pub struct FormCollector<'a> {
    session: &'a Session,
    submission: FormSubmission,
}

impl<'a> FormCollector<'a> {
    pub fn new(session: &'a Session, submission: FormSubmission) -> Self {
        Self {
            session,
            submission,
        }
    }
}

impl FieldCollector for FormCollector<'_> {
    fn collect(&mut self) -> Result<PassRequest> {
        self.session.require_authenticated()?;

        let form = &self.submission;
        let mut request = PassRequest::new(
            form.pass_type,
            form.event_name.clone(),
            form.dates.clone(),
            form.cell_phone.clone(),
            form.pass_count,
        )?
        .with_export_format(form.export_format);

        // extra fields are only shown for load/unload passes
        if form.pass_type == PassType::LoadUnload {
            if let Some(time) = &form.time_entered {
                request = request.with_extra(field::TIME_ENTERED, time.clone());
            }
            if let Some(deck) = &form.deck {
                request = request.with_extra(field::DECK, deck.clone());
            }
        }
        Ok(request)
    }
}
