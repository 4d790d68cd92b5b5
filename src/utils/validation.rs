use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType, NewLeaveRequest};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const NAME_MIN: usize = 2;
const TEXT_MAX: usize = 100;
const REASON_MIN: usize = 10;

/// Raw add/edit form body. Every field defaults to empty so a missing field
/// becomes a validation message instead of a 400 from the extractor.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LeaveForm {
    #[schema(example = "Jane Doe")]
    pub employee_name: String,
    #[schema(example = "jane.doe@company.com")]
    pub email: String,
    #[schema(example = "annual")]
    pub leave_type: String,
    #[schema(example = "2026-01-01", format = "date")]
    pub start_date: String,
    #[schema(example = "2026-01-03", format = "date")]
    pub end_date: String,
    #[schema(example = "Family trip booked months ago")]
    pub reason: String,
    /// Only read on edit.
    #[schema(example = "approved")]
    pub status: String,
    pub csrf_token: String,
}

impl From<&LeaveRequest> for LeaveForm {
    fn from(leave: &LeaveRequest) -> Self {
        Self {
            employee_name: leave.employee_name.clone(),
            email: leave.email.clone(),
            leave_type: leave.leave_type.to_string(),
            start_date: leave.start_date.format(DATE_FORMAT).to_string(),
            end_date: leave.end_date.format(DATE_FORMAT).to_string(),
            reason: leave.reason.clone(),
            status: leave.status.to_string(),
            csrf_token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn messages_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

pub fn validate(form: &LeaveForm, mode: FormMode) -> Result<NewLeaveRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let employee_name = form.employee_name.trim();
    let name_len = employee_name.chars().count();
    if name_len < NAME_MIN {
        errors.add("employee_name", "Employee name must be at least 2 characters");
    } else if name_len > TEXT_MAX {
        errors.add("employee_name", "Employee name must be at most 100 characters");
    }

    let email = form.email.trim();
    if email.is_empty() || !email.contains('@') {
        errors.add("email", "Please enter a valid email");
    } else if email.chars().count() > TEXT_MAX {
        errors.add("email", "Email must be at most 100 characters");
    }

    let leave_type = match form.leave_type.trim() {
        "" => {
            errors.add("leave_type", "Please select leave type");
            None
        }
        raw => match raw.parse::<LeaveType>() {
            Ok(t) => Some(t),
            Err(_) => {
                errors.add("leave_type", "Unknown leave type");
                None
            }
        },
    };

    let start_date = parse_date(&form.start_date, "start_date", "Start date", &mut errors);
    let end_date = parse_date(&form.end_date, "end_date", "End date", &mut errors);
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            errors.add("end_date", "End date cannot be before start date");
        }
    }

    let reason = form.reason.trim();
    if reason.chars().count() < REASON_MIN {
        errors.add("reason", "Reason must be at least 10 characters");
    }

    let status = match (mode, form.status.trim()) {
        (FormMode::Create, _) | (FormMode::Update, "") => Some(LeaveStatus::Pending),
        (FormMode::Update, raw) => match raw.parse::<LeaveStatus>() {
            Ok(s) => Some(s),
            Err(_) => {
                errors.add("status", "Status must be pending, approved or rejected");
                None
            }
        },
    };

    match (leave_type, start_date, end_date, status) {
        (Some(leave_type), Some(start_date), Some(end_date), Some(status)) if errors.is_empty() => {
            Ok(NewLeaveRequest {
                employee_name: employee_name.to_string(),
                email: email.to_string(),
                leave_type,
                start_date,
                end_date,
                reason: reason.to_string(),
                status,
            })
        }
        _ => Err(errors),
    }
}

fn parse_date(
    raw: &str,
    field: &'static str,
    label: &str,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, format!("{label} is required"));
        return None;
    }

    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(d) => Some(d),
        Err(_) => {
            errors.add(field, format!("{label} must be a date in YYYY-MM-DD format"));
            None
        }
    }
}
