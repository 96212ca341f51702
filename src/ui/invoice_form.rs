use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tracing::{error, info};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::invoice_gen::layout::{self, COLUMNS};
use crate::invoice_gen::{InvoiceGenerator, LogoStatus, PrintStatus};
use crate::ledger::Ledger;
use crate::models::{CustomerRecord, RawLineItem, Unit};

// Represents a field on the form, in screen order
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FormField {
    Name,
    Address,
    Contact,
    Email,
    Unit,
    Size,
    Description,
    Quantity,
    Rate,
    Count,
}

impl FormField {
    pub const ALL: [FormField; 10] = [
        FormField::Name,
        FormField::Address,
        FormField::Contact,
        FormField::Email,
        FormField::Unit,
        FormField::Size,
        FormField::Description,
        FormField::Quantity,
        FormField::Rate,
        FormField::Count,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Address => "Address",
            FormField::Contact => "Contact Number",
            FormField::Email => "Email",
            FormField::Unit => "Select Unit",
            FormField::Size => "Size",
            FormField::Description => "Description",
            FormField::Quantity => "Square Feet",
            FormField::Rate => "Rate",
            FormField::Count => "Quantity",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

pub enum FormAction {
    Quit,
    AddItem,
    GenerateInvoice,
}

/// Blocking popup shown over the form until any key is pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error { title: &'static str, message: String },
    Info { title: &'static str, message: String },
}

pub struct InvoiceFormState {
    pub customer: CustomerRecord,
    pub unit: Unit,
    pub item: RawLineItem,
    pub current_field: FormField,
    pub editing: bool,
    pub notice: Option<Notice>,
    table_state: TableState,
}

impl Default for InvoiceFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceFormState {
    pub fn new() -> Self {
        Self {
            customer: CustomerRecord::default(),
            unit: Unit::default(),
            item: RawLineItem::default(),
            current_field: FormField::Name,
            editing: false,
            notice: None,
            table_state: TableState::default(),
        }
    }

    pub fn toggle_editing(&mut self) {
        // the unit is a selector, not a text field
        if self.current_field == FormField::Unit {
            self.editing = false;
            return;
        }
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        self.current_field = self.current_field.next();
    }

    pub fn previous_field(&mut self) {
        self.current_field = self.current_field.previous();
    }

    fn text_field_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Name => Some(&mut self.customer.name),
            FormField::Address => Some(&mut self.customer.address),
            FormField::Contact => Some(&mut self.customer.contact),
            FormField::Email => Some(&mut self.customer.email),
            FormField::Unit => None,
            FormField::Size => Some(&mut self.item.size),
            FormField::Description => Some(&mut self.item.description),
            FormField::Quantity => Some(&mut self.item.quantity),
            FormField::Rate => Some(&mut self.item.rate),
            FormField::Count => Some(&mut self.item.count),
        }
    }

    pub fn field_value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.customer.name,
            FormField::Address => &self.customer.address,
            FormField::Contact => &self.customer.contact,
            FormField::Email => &self.customer.email,
            FormField::Unit => self.unit.as_tag(),
            FormField::Size => &self.item.size,
            FormField::Description => &self.item.description,
            FormField::Quantity => &self.item.quantity,
            FormField::Rate => &self.item.rate,
            FormField::Count => &self.item.count,
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let Some(field_value) = self.text_field_mut(self.current_field) else {
            return;
        };

        match key {
            KeyCode::Char(c) => {
                field_value.push(c);
            }
            KeyCode::Backspace => {
                field_value.pop();
            }
            _ => {}
        }
    }

    /// Snapshot of the customer block for the renderer
    pub fn customer(&self) -> CustomerRecord {
        self.customer.clone()
    }

    pub fn clear_item_fields(&mut self) {
        self.item = RawLineItem::default();
    }

    fn show_error(&mut self, title: &'static str, message: impl Into<String>) {
        self.notice = Some(Notice::Error {
            title,
            message: message.into(),
        });
    }

    fn show_info(&mut self, title: &'static str, message: impl Into<String>) {
        self.notice = Some(Notice::Info {
            title,
            message: message.into(),
        });
    }
}

/// Append the entered item; on bad numbers keep the fields so they can be fixed
pub fn add_item(state: &mut InvoiceFormState, ledger: &mut Ledger) {
    let appended = ledger.append(&state.item, state.unit).map(|item| item.serial_number);
    match appended {
        Ok(serial_number) => {
            state.clear_item_fields();
            state.table_state.select(Some(serial_number as usize - 1));
        }
        Err(err) => {
            info!(field = %err.field, value = %err.value, "rejected line item");
            state.show_error("Input Error", err.to_string());
        }
    }
}

pub fn generate_invoice(state: &mut InvoiceFormState, ledger: &Ledger, generator: &InvoiceGenerator) {
    let customer = state.customer();

    match generator.generate_invoice(&customer, ledger) {
        Ok(outcome) => {
            let mut message = format!("Invoice saved as {}", outcome.path.display());
            if let LogoStatus::Failed(reason) = &outcome.logo {
                message.push_str(&format!("\nLogo skipped: {reason}"));
            }
            if let PrintStatus::Failed(reason) = &outcome.print {
                message.push_str(&format!("\nCould not print: {reason}"));
            }
            state.show_info("Invoice Generated", message);
        }
        Err(err) => {
            error!("invoice generation failed: {err}");
            state.show_error("Invoice Error", err.to_string());
        }
    }
}

pub fn render_invoice_form<B: Backend>(frame: &mut Frame<B>, state: &mut InvoiceFormState, ledger: &Ledger) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),                               // Title
                Constraint::Length(FormField::ALL.len() as u16 + 2), // Form
                Constraint::Min(5),                                  // Items
                Constraint::Length(3),                               // Total
                Constraint::Length(3),                               // Help
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title = Paragraph::new("HVAC Ducting Bill Calculator")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    render_form(frame, state, chunks[1]);
    render_items(frame, state, ledger, chunks[2]);

    let total = Paragraph::new(layout::total_line(ledger.total()))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(total, chunks[3]);

    let help_text = if state.editing {
        "Enter - Save field | Esc - Stop editing"
    } else if state.current_field == FormField::Unit {
        "Left/Right/Enter - Change unit | Up/Down - Navigate | A - Add item | G - Generate invoice | Q - Quit"
    } else {
        "Enter - Edit field | Up/Down - Navigate | A - Add item | G - Generate invoice | Q - Quit"
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[4]);

    let size = frame.size();
    if let Some(notice) = &state.notice {
        render_notice(frame, size, notice);
    }
}

fn render_form<B: Backend>(frame: &mut Frame<B>, state: &InvoiceFormState, area: Rect) {
    let items: Vec<ListItem> = FormField::ALL
        .iter()
        .map(|field| {
            let selected = *field == state.current_field;
            let value = state.field_value(*field);

            let content = if selected && state.editing {
                Spans::from(vec![
                    Span::styled(format!("{}: ", field.label()), Style::default().fg(Color::Yellow)),
                    Span::styled(format!("{}|", value), Style::default().add_modifier(Modifier::BOLD)),
                ])
            } else if *field == FormField::Unit {
                let style = if selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Spans::from(vec![
                    Span::styled(format!("{}: ", field.label()), style),
                    Span::raw(format!("< {} >", value)),
                ])
            } else {
                let style = if selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Spans::from(vec![
                    Span::styled(format!("{}: ", field.label()), style),
                    Span::raw(value.to_string()),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Customer Information / Item"),
    );

    frame.render_widget(form_list, area);
}

fn render_items<B: Backend>(frame: &mut Frame<B>, state: &mut InvoiceFormState, ledger: &Ledger, area: Rect) {
    let header_cells = COLUMNS
        .iter()
        .map(|(label, _)| Cell::from(*label).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = ledger.items().iter().map(|item| {
        Row::new(vec![
            Cell::from(item.serial_number.to_string()),
            Cell::from(item.size.clone()),
            Cell::from(item.description.clone()),
            Cell::from(format!("{:.2}", item.normalized_quantity)),
            Cell::from(format!("{:.2}", item.rate)),
            Cell::from(item.quantity_count.to_string()),
            Cell::from(layout::format_money(item.amount)),
        ])
        .height(1)
    });

    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title("Line Items").borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .widths(&[
            Constraint::Percentage(8),
            Constraint::Percentage(12),
            Constraint::Percentage(28),
            Constraint::Percentage(12),
            Constraint::Percentage(12),
            Constraint::Percentage(12),
            Constraint::Percentage(16),
        ]);

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

fn render_notice<B: Backend>(frame: &mut Frame<B>, size: Rect, notice: &Notice) {
    let popup_area = centered_rect(60, 30, size);

    let (title, message, color) = match notice {
        Notice::Error { title, message } => (*title, message, Color::Red),
        Notice::Info { title, message } => (*title, message, Color::Green),
    };

    let mut lines = vec![Spans::from("")];
    lines.extend(message.lines().map(|line| Spans::from(line.to_string())));
    lines.push(Spans::from(""));
    lines.push(Spans::from("Press any key to continue"));

    let popup = Paragraph::new(lines)
        .block(Block::default().title(title).borders(Borders::ALL))
        .style(Style::default().fg(color));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Apply one key press to the form and report any action it triggers
pub fn handle_key(state: &mut InvoiceFormState, key: KeyCode) -> Option<FormAction> {
    // any key dismisses a popup
    if state.notice.take().is_some() {
        return None;
    }

    if state.editing {
        match key {
            KeyCode::Enter | KeyCode::Esc => state.toggle_editing(),
            _ => state.edit_current_field(key),
        }
        return None;
    }

    match key {
        KeyCode::Esc | KeyCode::Char('q') => return Some(FormAction::Quit),
        KeyCode::Char('a') => return Some(FormAction::AddItem),
        KeyCode::Char('g') => return Some(FormAction::GenerateInvoice),
        KeyCode::Up => state.previous_field(),
        KeyCode::Down | KeyCode::Tab => state.next_field(),
        KeyCode::Enter | KeyCode::Right if state.current_field == FormField::Unit => {
            state.unit = state.unit.next();
        }
        KeyCode::Left if state.current_field == FormField::Unit => {
            state.unit = state.unit.previous();
        }
        KeyCode::Enter => state.toggle_editing(),
        _ => {}
    }

    None
}

pub fn handle_input(state: &mut InvoiceFormState) -> Result<Option<FormAction>> {
    if let Event::Key(key) = event::read()? {
        // Windows reports releases too
        if key.kind == KeyEventKind::Press {
            return Ok(handle_key(state, key.code));
        }
    }

    Ok(None)
}
