//! Member form controller.
//!
//! # Responsibility
//! - Track add-vs-edit mode and the raw form field text.
//! - Map form fields to a `MemberDraft` and commit through the repository.
//! - Keep the current query and push the filtered set to a render sink after
//!   every change.
//!
//! # Invariants
//! - In `FormMode::Edit`, the target id refers to an existing member.
//! - Deleting the member being edited returns the form to `FormMode::Add`.
//! - Persistence failures never abort the session; they become notices.

use crate::age::{age_on, Clock, SystemClock};
use crate::model::member::{Gender, Member, MemberDraft, MemberId, MemberValidationError, Relation};
use crate::repo::member_repo::{MemberRepository, RepoError};
use crate::search::filter::{visible, MemberQuery};
use crate::store::{Store, StoreError};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Editing mode of the member form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit { target: MemberId },
}

/// Fields of the member form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    DateOfBirth,
    Gender,
    Relation,
    Education,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::DateOfBirth => "date_of_birth",
            Self::Gender => "gender",
            Self::Relation => "relation",
            Self::Education => "education",
        }
    }
}

/// Raw text currently held by the member form.
///
/// `age` is display-only; it is never submitted as authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberForm {
    pub name: String,
    /// `YYYY-MM-DD` or empty.
    pub date_of_birth: String,
    pub age: String,
    pub gender: String,
    pub relation: String,
    pub education: String,
}

impl MemberForm {
    /// Pre-populates the form from a stored member.
    pub fn from_member(member: &Member) -> Self {
        Self {
            name: member.name.clone(),
            date_of_birth: member
                .date_of_birth
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            age: member.age_display(),
            gender: member.gender.as_str().to_string(),
            relation: member.relation.as_str().to_string(),
            education: member.education.clone(),
        }
    }

    /// Parses the raw fields into a candidate record.
    ///
    /// Name emptiness is left to the repository.
    pub fn to_draft(&self) -> Result<MemberDraft, ControllerError> {
        let date_of_birth = parse_date(&self.date_of_birth).map_err(|_| {
            ControllerError::invalid(FormField::DateOfBirth, &self.date_of_birth)
        })?;
        let gender = Gender::parse(&self.gender)
            .ok_or_else(|| ControllerError::invalid(FormField::Gender, &self.gender))?;
        let relation = Relation::parse(&self.relation)
            .ok_or_else(|| ControllerError::invalid(FormField::Relation, &self.relation))?;

        Ok(MemberDraft {
            name: self.name.clone(),
            date_of_birth,
            age: self.age.trim().parse().ok(),
            gender,
            relation,
            education: self.education.clone(),
        })
    }
}

/// Controller-level failure for a user command.
#[derive(Debug)]
pub enum ControllerError {
    /// A field could not be parsed.
    InvalidField { field: FormField, value: String },
    /// No member with this id.
    NotFound(MemberId),
    Repo(RepoError),
}

impl ControllerError {
    fn invalid(field: FormField, value: &str) -> Self {
        Self::InvalidField {
            field,
            value: value.to_string(),
        }
    }

    /// Field a UI should flag, when the failure is tied to one.
    pub fn field(&self) -> Option<FormField> {
        match self {
            Self::InvalidField { field, .. } => Some(*field),
            Self::Repo(RepoError::Validation(MemberValidationError::EmptyName)) => {
                Some(FormField::Name)
            }
            _ => None,
        }
    }

    /// Whether the failure came from the durable store.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Repo(RepoError::Persistence(_)))
    }
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidField { field, value } => {
                write!(f, "invalid {}: `{value}`", field.as_str())
            }
            Self::NotFound(id) => write!(f, "member not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ControllerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    LoadFailed,
    SaveFailed,
}

/// Non-fatal warning for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn load_failed(err: &StoreError, read_only: bool) -> Self {
        let message = if read_only {
            format!("saved members were written by a newer version, changes are disabled: {err}")
        } else {
            format!("saved members could not be loaded, starting empty: {err}")
        };
        Self {
            kind: NoticeKind::LoadFailed,
            message,
        }
    }

    fn save_failed(err: &RepoError) -> Self {
        Self {
            kind: NoticeKind::SaveFailed,
            message: format!("changes may not survive a restart: {err}"),
        }
    }
}

/// Consumer of the filtered member list.
pub trait RenderSink {
    /// `visible` is the filtered set; `total` is the unfiltered count.
    fn render(&mut self, visible: &[Member], total: usize);
}

/// Sink that drops every render.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn render(&mut self, _visible: &[Member], _total: usize) {}
}

/// Command surface for the member form and table.
pub struct FormController<S: Store, C: Clock = SystemClock, R: RenderSink = NullSink> {
    repo: MemberRepository<S, C>,
    mode: FormMode,
    fields: MemberForm,
    query: MemberQuery,
    sink: R,
    notices: Vec<Notice>,
}

impl<S: Store, C: Clock, R: RenderSink> FormController<S, C, R> {
    /// Starts in add mode with an empty query and renders once.
    pub fn new(mut repo: MemberRepository<S, C>, sink: R) -> Self {
        let mut notices = Vec::new();
        if let Some(err) = repo.take_load_error() {
            notices.push(Notice::load_failed(&err, repo.is_read_only()));
        }

        let mut controller = Self {
            repo,
            mode: FormMode::Add,
            fields: MemberForm::default(),
            query: MemberQuery::all(),
            sink,
            notices,
        };
        controller.rerender();
        controller
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Id of the member being edited; `None` in add mode.
    pub fn target_id(&self) -> Option<MemberId> {
        match self.mode {
            FormMode::Add => None,
            FormMode::Edit { target } => Some(target),
        }
    }

    pub fn fields(&self) -> &MemberForm {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut MemberForm {
        &mut self.fields
    }

    pub fn repository(&self) -> &MemberRepository<S, C> {
        &self.repo
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Sets the birth date field and refreshes the age preview.
    pub fn set_date_of_birth(&mut self, text: impl Into<String>) {
        self.fields.date_of_birth = text.into();
        let today = self.repo.clock().today();
        self.fields.age = parse_date(&self.fields.date_of_birth)
            .ok()
            .and_then(|date| age_on(date, today))
            .map(|age| age.to_string())
            .unwrap_or_default();
    }

    /// Commits the current fields.
    ///
    /// Creates a member in add mode, replaces the target in edit mode. On
    /// success the form is cleared and the controller returns to add mode.
    /// On failure fields and mode are kept so the user can correct and retry.
    pub fn submit(&mut self) -> Result<Member, ControllerError> {
        let draft = self.fields.to_draft()?;
        let target = self.target_id();

        let member = match self.repo.upsert(&draft, target) {
            Ok(member) => member,
            Err(err) => {
                if matches!(err, RepoError::Persistence(_)) {
                    self.notices.push(Notice::save_failed(&err));
                }
                return Err(err.into());
            }
        };

        self.reset();
        self.rerender();
        Ok(member)
    }

    /// Replaces every field with `form` and submits.
    pub fn add_or_update(&mut self, form: MemberForm) -> Result<Member, ControllerError> {
        self.fields = form;
        self.submit()
    }

    /// Loads a member into the form and enters edit mode.
    pub fn edit(&mut self, id: MemberId) -> Result<&MemberForm, ControllerError> {
        let member = self
            .repo
            .find_by_id(id)
            .ok_or(ControllerError::NotFound(id))?;

        self.fields = MemberForm::from_member(&member);
        self.mode = FormMode::Edit { target: id };
        info!("event=form_edit module=service status=ok member_id={}", id);
        Ok(&self.fields)
    }

    /// Deletes a member after `confirm` approves it.
    ///
    /// Returns `Ok(false)` when the id is unknown or the user declined.
    pub fn delete(
        &mut self,
        id: MemberId,
        confirm: impl FnOnce(&Member) -> bool,
    ) -> Result<bool, ControllerError> {
        let Some(member) = self.repo.find_by_id(id) else {
            return Ok(false);
        };
        if !confirm(&member) {
            info!(
                "event=member_delete module=service status=declined member_id={}",
                id
            );
            return Ok(false);
        }

        let removed = match self.repo.delete(id) {
            Ok(removed) => removed,
            Err(err) => {
                self.notices.push(Notice::save_failed(&err));
                return Err(err.into());
            }
        };

        if removed && self.target_id() == Some(id) {
            warn!(
                "event=form_edit module=service status=target_deleted member_id={}",
                id
            );
            self.reset();
        }
        self.rerender();
        Ok(removed)
    }

    /// Clears the form and returns to add mode.
    pub fn reset(&mut self) {
        self.fields = MemberForm::default();
        self.mode = FormMode::Add;
    }

    pub fn search(&mut self, term: impl Into<String>) {
        self.query.term = term.into();
        self.rerender();
    }

    pub fn filter(&mut self, gender: Option<Gender>, relation: Option<Relation>) {
        self.query.gender = gender;
        self.query.relation = relation;
        self.rerender();
    }

    /// Filtered members for the current query.
    pub fn visible(&self) -> Vec<Member> {
        visible(self.repo.all(), &self.query)
    }

    fn rerender(&mut self) {
        let shown = self.visible();
        self.sink.render(&shown, self.repo.len());
    }
}

fn parse_date(text: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).map(Some)
}
