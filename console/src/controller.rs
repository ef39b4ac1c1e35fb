//! Interactive workflows: login, add, browse/filter/export, update, delete,
//! logout.
//!
//! # Design
//! The controller owns the `Session` for one run and dispatches on its view.
//! Every workflow fetches fresh data from the API; nothing is cached between
//! views. API failures are shown as short generic messages and logged with
//! their cause.

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{info, warn};

use surgical_core::{
    export_pdf, normalize_all, Action, LoginOutcome, NameMatch, NormalizedRecord, Record,
    RecordFilter, RecordForm, RecordService, Session, Transport, View, CLEAR_INPUT, FIELDS,
};

use crate::table::render_table;
use crate::terminal::Terminal;

enum Flow {
    Continue,
    Quit,
}

enum Pick<T> {
    Picked(T),
    Back,
    Quit,
}

pub struct Controller<T, C> {
    service: RecordService<T>,
    terminal: C,
    session: Session,
    export_path: PathBuf,
    today: Option<NaiveDate>,
}

impl<T: Transport, C: Terminal> Controller<T, C> {
    pub fn new(service: RecordService<T>, terminal: C, export_path: impl Into<PathBuf>) -> Self {
        Self {
            service,
            terminal,
            session: Session::new(),
            export_path: export_path.into(),
            today: None,
        }
    }

    /// Pin the date used for date-field defaults.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn service(&self) -> &RecordService<T> {
        &self.service
    }

    pub fn terminal(&self) -> &C {
        &self.terminal
    }

    /// Run until the user quits or input ends.
    pub fn run(&mut self) -> Result<()> {
        self.say("Surgical records")?;
        loop {
            let flow = if self.session.is_authenticated() {
                self.menu()?
            } else {
                self.login()?
            };
            if let Flow::Quit = flow {
                return Ok(());
            }
        }
    }

    fn login(&mut self) -> Result<Flow> {
        self.say("== Login ==")?;
        let Some(username) = self.ask("Username: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(password) = self.ask("Password: ")? else {
            return Ok(Flow::Quit);
        };
        match self.session.login(&self.service, &username, &password) {
            LoginOutcome::Authenticated => {
                info!(%username, "login succeeded");
                self.say("Login successful!")?;
            }
            LoginOutcome::Rejected => {
                info!(%username, "login rejected");
                self.say("Invalid credentials!")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn menu(&mut self) -> Result<Flow> {
        self.say("")?;
        for (i, action) in Action::ALL.iter().enumerate() {
            self.say(&format!("{}) {action}", i + 1))?;
        }
        self.say("q) Quit")?;
        let Some(choice) = self.ask("Select action: ")? else {
            return Ok(Flow::Quit);
        };
        let choice = choice.trim();
        if choice.eq_ignore_ascii_case("q") {
            return Ok(Flow::Quit);
        }
        let Some(action) = choice.parse().ok().and_then(Action::from_menu) else {
            self.say("Unknown action.")?;
            return Ok(Flow::Continue);
        };

        match self.session.select(action)? {
            View::Create => self.create(),
            View::Browse => self.browse(),
            View::Update => self.update(),
            View::Delete => self.delete(),
            View::LoggedOut => {
                self.say("Logged out.")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn create(&mut self) -> Result<Flow> {
        self.say("== Add data ==")?;
        let mut form = RecordForm::blank(self.today());
        if !self.fill_form(&mut form)? {
            return Ok(Flow::Quit);
        }
        match self.service.add_record(form.record()) {
            Ok(()) => {
                info!(name = %form.record().name(), "record added");
                self.say("Data added successfully!")?;
            }
            Err(err) => {
                warn!(error = %err, "add failed");
                self.say("Failed to add data.")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn browse(&mut self) -> Result<Flow> {
        self.say("== View data ==")?;
        let mut filter = RecordFilter::default();
        loop {
            let Some(shown) = self.fetch(&filter)? else {
                return Ok(Flow::Continue);
            };
            self.say(&render_table(&shown))?;

            loop {
                let Some(choice) =
                    self.ask("[f] filter  [c] clear filters  [e] export PDF  [b] back: ")?
                else {
                    return Ok(Flow::Quit);
                };
                match choice.trim().to_ascii_lowercase().as_str() {
                    "f" => {
                        let Some(name) = self.ask("Patient name contains: ")? else {
                            return Ok(Flow::Quit);
                        };
                        let Some(hospital) = self.ask("Hospital contains: ")? else {
                            return Ok(Flow::Quit);
                        };
                        filter = RecordFilter::new(&name, &hospital);
                        break;
                    }
                    "c" => {
                        filter = RecordFilter::default();
                        break;
                    }
                    "e" => self.export(&shown)?,
                    "b" | "" => return Ok(Flow::Continue),
                    _ => self.say("Unknown option.")?,
                }
            }
        }
    }

    /// Fresh fetch, filtered and normalized. `None` after a reported failure.
    fn fetch(&mut self, filter: &RecordFilter) -> Result<Option<Vec<NormalizedRecord>>> {
        match self.service.list_records() {
            Ok(records) => Ok(Some(normalize_all(&filter.apply(records)))),
            Err(err) => {
                warn!(error = %err, "fetch failed");
                self.say("Failed to load data.")?;
                Ok(None)
            }
        }
    }

    fn export(&mut self, records: &[NormalizedRecord]) -> Result<()> {
        if records.is_empty() {
            return self.say("Nothing to export.");
        }
        let written = export_pdf(records)
            .map_err(anyhow::Error::from)
            .and_then(|pdf| Ok(std::fs::write(&self.export_path, pdf)?));
        match written {
            Ok(()) => {
                info!(path = %self.export_path.display(), records = records.len(), "pdf exported");
                let message = format!(
                    "PDF with {} record(s) written to {}",
                    records.len(),
                    self.export_path.display()
                );
                self.say(&message)
            }
            Err(err) => {
                warn!(error = %err, "pdf export failed");
                self.say("Failed to generate PDF.")
            }
        }
    }

    fn update(&mut self) -> Result<Flow> {
        self.say("== Update data ==")?;
        let record = match self.pick_record()? {
            Pick::Picked(record) => record,
            Pick::Back => return Ok(Flow::Continue),
            Pick::Quit => return Ok(Flow::Quit),
        };
        let Some(id) = record.id.clone() else {
            self.say("Record has no identifier; it cannot be updated.")?;
            return Ok(Flow::Continue);
        };

        let mut form = RecordForm::edit(&record, self.today());
        if !self.fill_form(&mut form)? {
            return Ok(Flow::Quit);
        }
        match self.service.update_record(&id, form.record()) {
            Ok(()) => {
                info!(%id, "record updated");
                self.say("Data updated successfully!")?;
            }
            Err(err) => {
                warn!(%id, error = %err, "update failed");
                self.say("Failed to update data.")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> Result<Flow> {
        self.say("== Delete data ==")?;
        let record = match self.pick_record()? {
            Pick::Picked(record) => record,
            Pick::Back => return Ok(Flow::Continue),
            Pick::Quit => return Ok(Flow::Quit),
        };
        let Some(id) = record.id.clone() else {
            self.say("Record has no identifier; it cannot be deleted.")?;
            return Ok(Flow::Continue);
        };

        let prompt = format!("Delete {} ({id})? [y/N]: ", record.name());
        let Some(confirm) = self.ask(&prompt)? else {
            return Ok(Flow::Quit);
        };
        if !confirm.trim().eq_ignore_ascii_case("y") {
            self.say("Delete cancelled.")?;
            return Ok(Flow::Continue);
        }
        match self.service.delete_record(&id) {
            Ok(()) => {
                info!(%id, "record deleted");
                self.say("Data deleted successfully!")?;
            }
            Err(err) => {
                warn!(%id, error = %err, "delete failed");
                self.say("Failed to delete data.")?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Pick a patient from the name list, then resolve the name with a
    /// second fetch. Duplicate names go through an explicit choice.
    fn pick_record(&mut self) -> Result<Pick<Record>> {
        let names = match self.service.patient_names() {
            Ok(names) => names,
            Err(err) => {
                warn!(error = %err, "fetch failed");
                self.say("Failed to load data.")?;
                return Ok(Pick::Back);
            }
        };
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        if unique.is_empty() {
            self.say("No patients found.")?;
            return Ok(Pick::Back);
        }

        for (i, name) in unique.iter().enumerate() {
            self.say(&format!("{}) {name}", i + 1))?;
        }
        let name = match self.choose("Patient number (blank to go back): ", unique.len())? {
            Pick::Picked(i) => unique.swap_remove(i),
            Pick::Back => return Ok(Pick::Back),
            Pick::Quit => return Ok(Pick::Quit),
        };

        match self.service.record_by_name(&name) {
            Ok(NameMatch::Unique(record)) => Ok(Pick::Picked(record)),
            Ok(NameMatch::NotFound) => {
                self.say("Patient not found.")?;
                Ok(Pick::Back)
            }
            Ok(NameMatch::Ambiguous(mut candidates)) => {
                self.say(&format!("Several records are named {name}; pick one:"))?;
                for (i, record) in candidates.iter().enumerate() {
                    let line = format!(
                        "{}) id={} hospital={} date={}",
                        i + 1,
                        record.id.as_deref().unwrap_or("-"),
                        record.hospital(),
                        record.text("DATA"),
                    );
                    self.say(&line)?;
                }
                Ok(match self.choose("Record number (blank to go back): ", candidates.len())? {
                    Pick::Picked(i) => Pick::Picked(candidates.swap_remove(i)),
                    Pick::Back => Pick::Back,
                    Pick::Quit => Pick::Quit,
                })
            }
            Err(err) => {
                warn!(error = %err, "fetch failed");
                self.say("Failed to load data.")?;
                Ok(Pick::Back)
            }
        }
    }

    /// Ask for a 1-based number up to `count`; returns the 0-based index.
    fn choose(&mut self, prompt: &str, count: usize) -> Result<Pick<usize>> {
        loop {
            let Some(input) = self.ask(prompt)? else {
                return Ok(Pick::Quit);
            };
            let input = input.trim();
            if input.is_empty() {
                return Ok(Pick::Back);
            }
            match input.parse::<usize>() {
                Ok(n) if (1..=count).contains(&n) => return Ok(Pick::Picked(n - 1)),
                _ => self.say(&format!("Enter a number between 1 and {count}."))?,
            }
        }
    }

    /// Walk every field; `false` if input ended midway.
    fn fill_form(&mut self, form: &mut RecordForm) -> Result<bool> {
        self.say("Press Enter to keep the value in brackets.")?;
        self.say(&format!("Enter {CLEAR_INPUT} to clear a text field."))?;
        for spec in &FIELDS {
            loop {
                let prompt = format!("{} [{}]: ", spec.label, form.prefill(spec));
                let Some(input) = self.ask(&prompt)? else {
                    return Ok(false);
                };
                match form.apply(spec, &input) {
                    Ok(()) => break,
                    Err(err) => self.say(&err.to_string())?,
                }
            }
        }
        Ok(true)
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    fn say(&mut self, line: &str) -> Result<()> {
        Ok(self.terminal.write_line(line)?)
    }

    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        Ok(self.terminal.read_line(prompt)?)
    }
}
