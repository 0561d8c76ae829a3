// Poll creation form: field editing and local validation.

use crate::model::PollDraft;

/// Number of option fields a fresh form starts with (and the minimum kept).
pub const MIN_OPTION_FIELDS: usize = 2;

pub const VALIDATION_MESSAGE: &str =
    "Please provide a question and at least two non-empty options.";

/// Which input has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Question,
    Option(usize),
}

/// One editing step, as produced by the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    Insert(char),
    Backspace,
    NextField,
    PrevField,
    AddOption,
    /// Remove the focused option field.
    RemoveOption,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePollForm {
    open: bool,
    question: String,
    options: Vec<String>,
    focus: FormField,
    submitting: bool,
}

impl Default for CreatePollForm {
    fn default() -> Self {
        CreatePollForm {
            open: false,
            question: String::new(),
            options: vec![String::new(); MIN_OPTION_FIELDS],
            focus: FormField::Question,
            submitting: false,
        }
    }
}

impl CreatePollForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    /// Show or hide the form. Entered values survive a toggle.
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Closed, blank question, two blank options.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_question(&mut self, text: impl Into<String>) {
        self.question = text.into();
    }

    /// Overwrite option field `index`. Out-of-range indices are ignored.
    pub fn set_option(&mut self, index: usize, text: impl Into<String>) {
        if let Some(slot) = self.options.get_mut(index) {
            *slot = text.into();
        }
    }

    pub fn add_option(&mut self) {
        self.options.push(String::new());
    }

    /// Remove option field `index`, but never below two fields.
    pub fn remove_option(&mut self, index: usize) -> bool {
        if self.options.len() <= MIN_OPTION_FIELDS || index >= self.options.len() {
            return false;
        }
        self.options.remove(index);
        if let FormField::Option(i) = self.focus {
            if i >= self.options.len() {
                self.focus = FormField::Option(self.options.len() - 1);
            }
        }
        true
    }

    pub fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    /// Apply an editing step to the focused field.
    pub fn apply(&mut self, edit: FormEdit) {
        match edit {
            FormEdit::Insert(c) => {
                if let Some(text) = self.focused_text_mut() {
                    text.push(c);
                }
            }
            FormEdit::Backspace => {
                if let Some(text) = self.focused_text_mut() {
                    text.pop();
                }
            }
            FormEdit::NextField => {
                self.focus = match self.focus {
                    FormField::Question => FormField::Option(0),
                    FormField::Option(i) if i + 1 < self.options.len() => FormField::Option(i + 1),
                    FormField::Option(_) => FormField::Question,
                };
            }
            FormEdit::PrevField => {
                self.focus = match self.focus {
                    FormField::Question => FormField::Option(self.options.len() - 1),
                    FormField::Option(0) => FormField::Question,
                    FormField::Option(i) => FormField::Option(i - 1),
                };
            }
            FormEdit::AddOption => {
                self.add_option();
                self.focus = FormField::Option(self.options.len() - 1);
            }
            FormEdit::RemoveOption => {
                if let FormField::Option(i) = self.focus {
                    self.remove_option(i);
                }
            }
        }
    }

    /// Check the form locally. Blank option fields are dropped and the
    /// remaining text is trimmed.
    pub fn validate(&self) -> Result<PollDraft, &'static str> {
        let question = self.question.trim();
        let options: Vec<String> = self
            .options
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        if question.is_empty() || options.len() < MIN_OPTION_FIELDS {
            return Err(VALIDATION_MESSAGE);
        }

        Ok(PollDraft {
            question: question.to_string(),
            options,
        })
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Question => Some(&mut self.question),
            FormField::Option(i) => self.options.get_mut(i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(question: &str, options: &[&str]) -> CreatePollForm {
        let mut form = CreatePollForm::new();
        form.set_question(question);
        for (i, text) in options.iter().enumerate() {
            if i >= form.options().len() {
                form.add_option();
            }
            form.set_option(i, *text);
        }
        form
    }

    #[test]
    fn fresh_form_is_closed_with_two_blank_options() {
        let form = CreatePollForm::new();
        assert!(!form.is_open());
        assert_eq!(form.question(), "");
        assert_eq!(form.options(), &["".to_string(), "".to_string()]);
    }

    #[test]
    fn blank_question_is_rejected() {
        assert_eq!(
            filled("   ", &["Red", "Blue"]).validate(),
            Err(VALIDATION_MESSAGE)
        );
    }

    #[test]
    fn fewer_than_two_non_blank_options_is_rejected() {
        assert!(filled("Best color?", &["Red", "  "]).validate().is_err());
        assert!(filled("Best color?", &["", "", "Green"]).validate().is_err());
    }

    #[test]
    fn valid_form_trims_and_drops_blank_options() {
        let draft = filled("  Best color? ", &[" Red ", "", "Blue"])
            .validate()
            .unwrap();
        assert_eq!(draft.question, "Best color?");
        assert_eq!(draft.options, vec!["Red".to_string(), "Blue".to_string()]);
    }

    #[test]
    fn cannot_remove_below_two_fields() {
        let mut form = CreatePollForm::new();
        assert!(!form.remove_option(0));
        form.add_option();
        assert!(form.remove_option(2));
        assert_eq!(form.options().len(), 2);
    }

    #[test]
    fn edits_go_to_focused_field() {
        let mut form = CreatePollForm::new();
        form.apply(FormEdit::Insert('Q'));
        form.apply(FormEdit::NextField);
        form.apply(FormEdit::Insert('R'));
        form.apply(FormEdit::Insert('x'));
        form.apply(FormEdit::Backspace);
        form.apply(FormEdit::NextField);
        form.apply(FormEdit::Insert('B'));
        assert_eq!(form.question(), "Q");
        assert_eq!(form.options(), &["R".to_string(), "B".to_string()]);

        form.apply(FormEdit::NextField);
        assert_eq!(form.focus(), FormField::Question);
        form.apply(FormEdit::PrevField);
        assert_eq!(form.focus(), FormField::Option(1));
    }

    #[test]
    fn add_then_remove_focused_option() {
        let mut form = CreatePollForm::new();
        form.apply(FormEdit::AddOption);
        assert_eq!(form.focus(), FormField::Option(2));
        form.apply(FormEdit::Insert('G'));
        form.apply(FormEdit::RemoveOption);
        assert_eq!(form.options().len(), 2);
        assert_eq!(form.focus(), FormField::Option(1));
    }

    #[test]
    fn toggle_keeps_values_and_reset_clears_them() {
        let mut form = filled("Q", &["a", "b", "c"]);
        form.toggle();
        form.toggle();
        assert_eq!(form.question(), "Q");
        form.reset();
        assert_eq!(form, CreatePollForm::new());
    }
}
