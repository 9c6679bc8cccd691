use crate::app::App;
use crate::form::FormField;
use crate::ui::layout::calculate_setup_chunks;
use crate::ui::{help_line, key_span};
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

fn field_value(app: &App, field: FormField) -> String {
    let form = &app.form;
    match field {
        FormField::Section => form
            .selected_section(&app.catalog)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| "[choose a section]".to_string()),
        FormField::Topic => match form.selected_section(&app.catalog) {
            None => "-".to_string(),
            Some(section) if section.topics.is_empty() => "[no topics in this section]".to_string(),
            Some(_) => form
                .selected_topic(&app.catalog)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| "[choose a topic]".to_string()),
        },
        FormField::QuestionType => form.question_type.label().to_string(),
        FormField::Mode => form.mode.label().to_string(),
        FormField::Count => form.num_questions.clone(),
        FormField::ManualPricing => String::from(if form.manual_pricing { "[x]" } else { "[ ]" }),
        FormField::InputPrice => form.manual_input.clone(),
        FormField::OutputPrice => form.manual_output.clone(),
    }
}

fn is_selector(field: FormField) -> bool {
    matches!(
        field,
        FormField::Section | FormField::Topic | FormField::QuestionType | FormField::Mode
    )
}

pub fn draw_setup(f: &mut Frame, app: &App) {
    let layout = calculate_setup_chunks(f.area());

    let title = Paragraph::new("Practice Quiz Generator")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    let mut lines = Vec::new();
    for field in app.form.visible_fields() {
        let focused = field == app.form.focus && !app.is_generating();
        let value = field_value(app, field);
        let value = if is_selector(field) && focused {
            format!("◀ {} ▶", value)
        } else {
            value
        };

        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let value_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:>22}: ", field.label()), label_style),
            Span::styled(value, value_style),
        ]));
    }

    if app.form.manual_pricing {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{:>22}  {}", "", app.cost),
            Style::default().fg(Color::Green),
        )));
    }

    let form = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Configure your practice quiz"),
        );
    f.render_widget(form, layout.form_area);

    let status = if app.is_generating() {
        Paragraph::new("Generating... Please wait.").style(Style::default().fg(Color::Yellow))
    } else {
        Paragraph::new(format!("Model: {}", app.config.model_name))
            .style(Style::default().fg(Color::DarkGray))
    };
    f.render_widget(
        status
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        layout.status_area,
    );

    let help = help_line(vec![
        key_span("↑/↓"),
        Span::from(" Field  "),
        key_span("←/→"),
        Span::from(" Change  "),
        key_span("Space"),
        Span::from(" Toggle  "),
        key_span("Enter"),
        Span::from(" Generate Quiz  "),
        key_span("?"),
        Span::from(" Modes  "),
        key_span("Esc"),
        Span::from(" Quit"),
    ]);
    f.render_widget(help, layout.help_area);
}
