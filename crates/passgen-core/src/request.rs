//! Pass requests: what the user asked for

use std::collections::BTreeMap;
use std::fmt;

use passgen_pdf::ExportFormat;

use crate::error::{PassError, Result};

/// Largest number of passes one request may print
pub const MAX_PASS_COUNT: u32 = 1000;

/// Field name to value mapping handed to the template engine
pub type Fields = BTreeMap<String, String>;

/// Placeholder names understood by the pass templates
pub mod field {
    pub const EVENT_NAME: &str = "EventName";
    pub const DATES: &str = "Dates";
    pub const CELL_PHONE: &str = "CellPhone";
    pub const PASS_NUMBER: &str = "PassNumber";
    pub const TIME_ENTERED: &str = "TimeEntered";
    pub const DECK: &str = "Deck";
}

/// Kind of pass, one template each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassType {
    /// Front of house
    Foh,
    /// Back of house
    Boh,
    /// Load/unload, with entry time and deck
    LoadUnload,
}

impl PassType {
    pub const ALL: [PassType; 3] = [PassType::Foh, PassType::Boh, PassType::LoadUnload];

    /// Resolve a console menu choice (`1`, `2` or `3`)
    pub fn from_selection(choice: &str) -> Result<Self> {
        match choice.trim() {
            "1" => Ok(PassType::Foh),
            "2" => Ok(PassType::Boh),
            "3" => Ok(PassType::LoadUnload),
            other => Err(PassError::InvalidSelection(other.to_string())),
        }
    }

    /// Menu number for this type
    pub fn selection(&self) -> u8 {
        match self {
            PassType::Foh => 1,
            PassType::Boh => 2,
            PassType::LoadUnload => 3,
        }
    }

    /// Label shown to users
    pub fn label(&self) -> &'static str {
        match self {
            PassType::Foh => "FOH Pass",
            PassType::Boh => "BOH Pass",
            PassType::LoadUnload => "Load/Unload Pass",
        }
    }

    /// Extra fields this type's template expects
    pub fn extra_field_names(&self) -> &'static [&'static str] {
        match self {
            PassType::LoadUnload => &[field::TIME_ENTERED, field::DECK],
            PassType::Foh | PassType::Boh => &[],
        }
    }
}

impl fmt::Display for PassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse a pass count typed by a user
pub fn parse_pass_count(input: &str) -> Result<u32> {
    match input.trim().parse::<u32>() {
        Ok(n) if (1..=MAX_PASS_COUNT).contains(&n) => Ok(n),
        _ => Err(PassError::InvalidCount(input.trim().to_string())),
    }
}

/// One generation request.
///
/// Built once by a collector and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassRequest {
    pass_type: PassType,
    event_name: String,
    dates: String,
    cell_phone: String,
    pass_count: u32,
    extra_fields: Fields,
    export_format: ExportFormat,
}

impl PassRequest {
    /// Create a request; `pass_count` must be in `1..=MAX_PASS_COUNT`
    pub fn new(
        pass_type: PassType,
        event_name: impl Into<String>,
        dates: impl Into<String>,
        cell_phone: impl Into<String>,
        pass_count: u32,
    ) -> Result<Self> {
        if !(1..=MAX_PASS_COUNT).contains(&pass_count) {
            return Err(PassError::InvalidCount(pass_count.to_string()));
        }
        let extra_fields = pass_type
            .extra_field_names()
            .iter()
            .map(|name| (name.to_string(), String::new()))
            .collect();
        Ok(Self {
            pass_type,
            event_name: event_name.into(),
            dates: dates.into(),
            cell_phone: cell_phone.into(),
            pass_count,
            extra_fields,
            export_format: ExportFormat::Docx,
        })
    }

    /// Set a type-specific field such as `TimeEntered`
    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_fields.insert(name.into(), value.into());
        self
    }

    pub fn with_export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = format;
        self
    }

    pub fn pass_type(&self) -> PassType {
        self.pass_type
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn dates(&self) -> &str {
        &self.dates
    }

    pub fn cell_phone(&self) -> &str {
        &self.cell_phone
    }

    pub fn pass_count(&self) -> u32 {
        self.pass_count
    }

    pub fn extra_fields(&self) -> &Fields {
        &self.extra_fields
    }

    pub fn export_format(&self) -> ExportFormat {
        self.export_format
    }

    /// Template fields for this request, without `PassNumber`.
    ///
    /// Always holds `EventName`, `Dates` and `CellPhone`, plus every extra
    /// field the pass type requires.
    pub fn fields(&self) -> Fields {
        let mut fields = self.extra_fields.clone();
        fields.insert(field::EVENT_NAME.to_string(), self.event_name.clone());
        fields.insert(field::DATES.to_string(), self.dates.clone());
        fields.insert(field::CELL_PHONE.to_string(), self.cell_phone.clone());
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_roundtrip() {
        for pass_type in PassType::ALL {
            let choice = pass_type.selection().to_string();
            assert_eq!(PassType::from_selection(&choice).unwrap(), pass_type);
        }
    }

    #[test]
    fn test_invalid_selection() {
        let err = PassType::from_selection("4").unwrap_err();
        assert!(matches!(err, PassError::InvalidSelection(ref s) if s == "4"));
        assert!(PassType::from_selection("").is_err());
        assert!(PassType::from_selection("foh").is_err());
    }

    #[test]
    fn test_parse_pass_count() {
        assert_eq!(parse_pass_count(" 3\n").unwrap(), 3);
        assert_eq!(parse_pass_count("1000").unwrap(), MAX_PASS_COUNT);
        for bad in ["0", "-1", "three", "", "2.5", "1001", "4294967295"] {
            assert!(
                matches!(parse_pass_count(bad), Err(PassError::InvalidCount(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_zero_count_rejected() {
        let err = PassRequest::new(PassType::Foh, "Fest", "", "", 0).unwrap_err();
        assert!(matches!(err, PassError::InvalidCount(_)));
    }

    #[test]
    fn test_huge_count_rejected() {
        let err = PassRequest::new(PassType::Foh, "Fest", "", "", u32::MAX).unwrap_err();
        assert!(matches!(err, PassError::InvalidCount(ref s) if s == "4294967295"));
        assert!(PassRequest::new(PassType::Foh, "Fest", "", "", MAX_PASS_COUNT).is_ok());
    }

    #[test]
    fn test_fields_for_foh() {
        let request = PassRequest::new(PassType::Foh, "Summer Fest", "07/24/2025", "555-1234", 3).unwrap();
        let fields = request.fields();

        assert_eq!(fields.len(), 3);
        assert_eq!(fields[field::EVENT_NAME], "Summer Fest");
        assert_eq!(fields[field::DATES], "07/24/2025");
        assert_eq!(fields[field::CELL_PHONE], "555-1234");
        assert_eq!(request.export_format(), ExportFormat::Docx);
    }

    #[test]
    fn test_load_unload_always_has_extra_fields() {
        let request = PassRequest::new(PassType::LoadUnload, "Fest", "", "", 1).unwrap();
        let fields = request.fields();
        assert_eq!(fields[field::TIME_ENTERED], "");
        assert_eq!(fields[field::DECK], "");

        let request = request
            .with_extra(field::TIME_ENTERED, "08:00")
            .with_extra(field::DECK, "B2");
        let fields = request.fields();
        assert_eq!(fields[field::TIME_ENTERED], "08:00");
        assert_eq!(fields[field::DECK], "B2");
    }

    #[test]
    fn test_standard_fields_win_over_extras() {
        let request = PassRequest::new(PassType::Boh, "Real", "", "", 1)
            .unwrap()
            .with_extra(field::EVENT_NAME, "Spoofed");
        assert_eq!(request.fields()[field::EVENT_NAME], "Real");
    }
}
