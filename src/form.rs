use crate::catalog::{Section, Topic, TopicCatalog};
use crate::cost::{self, CostEstimate};
use crate::error::QuizError;
use crate::generation_worker::GenerationRequest;
use crate::models::{GenerationMode, QuestionType};
use crate::settings::Settings;
use crate::utils::cycle_index;

/// Upper bound on questions per run.
pub const MAX_QUESTIONS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Section,
    Topic,
    QuestionType,
    Mode,
    Count,
    ManualPricing,
    InputPrice,
    OutputPrice,
}

impl FormField {
    const ORDER: [FormField; 8] = [
        FormField::Section,
        FormField::Topic,
        FormField::QuestionType,
        FormField::Mode,
        FormField::Count,
        FormField::ManualPricing,
        FormField::InputPrice,
        FormField::OutputPrice,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Section => "Section",
            FormField::Topic => "Topic",
            FormField::QuestionType => "Question Type",
            FormField::Mode => "Generation Mode",
            FormField::Count => "Number of Questions",
            FormField::ManualPricing => "Use Manual Pricing",
            FormField::InputPrice => "Input ($/1M tok)",
            FormField::OutputPrice => "Output ($/1M tok)",
        }
    }

    fn is_price(&self) -> bool {
        matches!(self, FormField::InputPrice | FormField::OutputPrice)
    }
}

/// State of the quiz setup screen.
#[derive(Debug, Clone)]
pub struct SetupForm {
    pub section_index: Option<usize>,
    pub topic_index: Option<usize>,
    pub question_type: QuestionType,
    pub mode: GenerationMode,
    pub num_questions: String,
    pub manual_pricing: bool,
    pub manual_input: String,
    pub manual_output: String,
    pub focus: FormField,
}

impl SetupForm {
    pub fn from_settings(settings: &Settings, catalog: &TopicCatalog) -> Self {
        let section_index = catalog
            .sections()
            .iter()
            .position(|s| s.name == settings.section);
        let topic_index = section_index.and_then(|i| {
            let topics = &catalog.sections()[i].topics;
            topics
                .iter()
                .position(|t| t.name == settings.topic)
                .or(if topics.is_empty() { None } else { Some(0) })
        });

        Self {
            section_index,
            topic_index,
            question_type: settings.question_type(),
            mode: settings.mode(),
            num_questions: settings.num_questions.clone(),
            manual_pricing: settings.manual_pricing,
            manual_input: settings.manual_input.clone(),
            manual_output: settings.manual_output.clone(),
            focus: FormField::Section,
        }
    }

    pub fn to_settings(&self, catalog: &TopicCatalog) -> Settings {
        Settings {
            section: self
                .selected_section(catalog)
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            topic: self
                .selected_topic(catalog)
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            q_type: self.question_type.label().to_string(),
            mode: self.mode.label().to_string(),
            num_questions: self.num_questions.clone(),
            manual_pricing: self.manual_pricing,
            manual_input: self.manual_input.clone(),
            manual_output: self.manual_output.clone(),
        }
    }

    pub fn selected_section<'a>(&self, catalog: &'a TopicCatalog) -> Option<&'a Section> {
        self.section_index.and_then(|i| catalog.sections().get(i))
    }

    pub fn selected_topic<'a>(&self, catalog: &'a TopicCatalog) -> Option<&'a Topic> {
        let section = self.selected_section(catalog)?;
        self.topic_index.and_then(|i| section.topics.get(i))
    }

    /// Fields reachable with ↑/↓. Price fields only exist while manual pricing is on.
    pub fn visible_fields(&self) -> Vec<FormField> {
        FormField::ORDER
            .into_iter()
            .filter(|f| self.manual_pricing || !f.is_price())
            .collect()
    }

    pub fn focus_step(&mut self, forward: bool) {
        let fields = self.visible_fields();
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[cycle_index(current, fields.len(), forward)];
    }

    /// ←/→ on the focused field.
    pub fn cycle(&mut self, catalog: &TopicCatalog, forward: bool) {
        match self.focus {
            FormField::Section => {
                let len = catalog.sections().len();
                if len == 0 {
                    return;
                }
                let next = match self.section_index {
                    Some(i) => cycle_index(i, len, forward),
                    None => 0,
                };
                self.section_index = Some(next);
                // A new section starts at its first topic.
                self.topic_index = if catalog.sections()[next].topics.is_empty() {
                    None
                } else {
                    Some(0)
                };
            }
            FormField::Topic => {
                let Some(section) = self.selected_section(catalog) else {
                    return;
                };
                let len = section.topics.len();
                if len == 0 {
                    return;
                }
                self.topic_index = Some(match self.topic_index {
                    Some(i) => cycle_index(i, len, forward),
                    None => 0,
                });
            }
            FormField::QuestionType => {
                let all = QuestionType::ALL;
                let i = all.iter().position(|t| *t == self.question_type).unwrap_or(0);
                self.question_type = all[cycle_index(i, all.len(), forward)];
            }
            FormField::Mode => {
                let all = GenerationMode::ALL;
                let i = all.iter().position(|m| *m == self.mode).unwrap_or(0);
                self.mode = all[cycle_index(i, all.len(), forward)];
            }
            FormField::ManualPricing => self.toggle_manual_pricing(),
            FormField::Count | FormField::InputPrice | FormField::OutputPrice => {}
        }
    }

    pub fn toggle_manual_pricing(&mut self) {
        self.manual_pricing = !self.manual_pricing;
        if !self.manual_pricing && self.focus.is_price() {
            self.focus = FormField::ManualPricing;
        }
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Count => Some(&mut self.num_questions),
            FormField::InputPrice => Some(&mut self.manual_input),
            FormField::OutputPrice => Some(&mut self.manual_output),
            _ => None,
        }
    }

    /// Typing into the focused numeric field. Counts take digits; prices also take a dot.
    pub fn input_char(&mut self, c: char) {
        let allow_dot = self.focus.is_price();
        if let Some(text) = self.focused_text()
            && (c.is_ascii_digit() || (allow_dot && c == '.'))
        {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text() {
            text.pop();
        }
    }

    /// Check the form and build a worker request. Nothing is spawned here.
    pub fn validate(&self, catalog: &TopicCatalog) -> Result<GenerationRequest, QuizError> {
        let (Some(section), Some(topic)) =
            (self.selected_section(catalog), self.selected_topic(catalog))
        else {
            return Err(QuizError::InvalidInput("Please fill in all fields.".into()));
        };
        if self.num_questions.trim().is_empty() {
            return Err(QuizError::InvalidInput("Please fill in all fields.".into()));
        }

        let text = self.num_questions.trim();
        let too_many = || {
            QuizError::InvalidInput(format!(
                "Number of questions cannot exceed {}.",
                MAX_QUESTIONS
            ))
        };
        let count = match text.parse::<usize>() {
            Ok(n) if n > MAX_QUESTIONS => return Err(too_many()),
            Ok(n) if n >= 1 => n,
            // All digits but unparseable means it overflowed.
            Err(_) if text.chars().all(|c| c.is_ascii_digit()) => return Err(too_many()),
            _ => {
                return Err(QuizError::InvalidInput(
                    "Number of questions must be a positive integer.".into(),
                ));
            }
        };

        Ok(GenerationRequest {
            section: section.name.clone(),
            topic: topic.name.clone(),
            topic_path: topic.path.clone(),
            count,
            mode: self.mode,
            question_type: self.question_type,
        })
    }

    /// Cost line for the form. Reads the topic file on the calling thread.
    pub fn cost_estimate(&self, catalog: &TopicCatalog) -> CostEstimate {
        let topic_text = match self.selected_topic(catalog) {
            None => None,
            Some(topic) => match std::fs::read_to_string(&topic.path) {
                Ok(text) => Some(text),
                Err(e) => {
                    crate::logger::log(&format!(
                        "Could not read {} for cost estimate: {}",
                        topic.path.display(),
                        e
                    ));
                    return CostEstimate::Invalid;
                }
            },
        };

        cost::estimate(
            topic_text.as_deref(),
            &self.num_questions,
            self.mode,
            &self.manual_input,
            &self.manual_output,
        )
    }
}
